pub mod menu;
pub mod render;

use enade_core::{CourseId, CourseStore, Dataset, IndexKey, LoadOptions, ScoreKind, ScoreStore};
use render::Renderer;
use std::io::{self, Write};
use std::path::Path;

/// One request against the dataset, from the menu or the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Find(CourseId),
    List(IndexKey, i64),
    Grades(CourseId),
    Top { n: usize, kind: ScoreKind },
    Summary,
}

/// Load both files in order and index the courses. A file that cannot be read
/// is logged by the loader and leaves its store empty.
pub fn load_dataset(courses_path: &Path, scores_path: &Path, year: i64, options: &LoadOptions) -> Dataset {
    let mut courses = CourseStore::new();
    if let Err(e) = courses.load(courses_path, options) {
        tracing::debug!(error = %e, "course load incomplete");
    }
    let mut scores = ScoreStore::new();
    if let Err(e) = scores.load(scores_path, year, options) {
        tracing::debug!(error = %e, "score load incomplete");
    }
    let dataset = Dataset::new(courses.build_indexes(), scores);
    tracing::info!(courses = dataset.courses.len(), score_rows = dataset.scores.len(), "dataset ready");
    dataset
}

pub fn execute<W: Write>(dataset: &Dataset, query: Query, out: &mut Renderer<W>) -> io::Result<()> {
    match query {
        Query::Find(id) => out.course(id, dataset.find_course(id)),
        Query::List(key, value) => out.courses(key, value, &dataset.courses.list_by(key, value)),
        Query::Grades(id) => out.grades(&dataset.grades_for_course(id)),
        Query::Top { n, kind } => out.ranking(kind, &dataset.top_n(n, kind)),
        Query::Summary => out.summary(&dataset.summary()),
    }
}
