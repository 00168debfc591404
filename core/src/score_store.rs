use crate::error::LoadError;
use crate::loader::{for_each_data_line, LoadOptions, LoadReport};
use crate::parser::parse_score_line;
use crate::record::{CourseId, ScoreKind, ScoreRecord};
use std::path::Path;

/// Score rows in load order. Not indexed: queries scan or sort a copy.
#[derive(Debug, Default)]
pub struct ScoreStore {
    records: Vec<ScoreRecord>,
}

impl ScoreStore {
    pub fn new() -> Self { Self::default() }

    /// Append every score row with a positive course id, tagging each with
    /// `year`. See [`parse_score_line`] for how score columns are picked.
    pub fn load<P: AsRef<Path>>(&mut self, path: P, year: i64, options: &LoadOptions) -> Result<LoadReport, LoadError> {
        let path = path.as_ref();
        let report = for_each_data_line(path, options, |line| match parse_score_line(line, year) {
            Some(record) => {
                self.records.push(record);
                true
            }
            None => false,
        })?;
        tracing::info!(path = %path.display(), year, loaded = report.loaded, dropped = report.dropped, overlong = report.overlong, "loaded scores");
        Ok(report)
    }

    pub fn push(&mut self, record: ScoreRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn records(&self) -> &[ScoreRecord] { &self.records }

    pub fn for_course(&self, course_id: CourseId) -> impl Iterator<Item = &ScoreRecord> + '_ {
        self.records.iter().filter(move |r| r.course_id == course_id)
    }

    /// Number of rows that carry a value of the given kind.
    pub fn count_present(&self, kind: ScoreKind) -> usize {
        self.records.iter().filter(|r| r.score(kind).is_some()).count()
    }
}

impl FromIterator<ScoreRecord> for ScoreStore {
    fn from_iter<I: IntoIterator<Item = ScoreRecord>>(iter: I) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}
