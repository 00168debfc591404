use crate::course_store::CourseIndex;
use crate::error::QueryError;
use crate::record::{Code, CourseId, CourseRecord, InstitutionId, ScoreKind, ScoreRecord};
use crate::score_store::ScoreStore;
use serde::Serialize;

/// Both datasets, ready for queries. Can only be built from an indexed course store.
#[derive(Debug)]
pub struct Dataset {
    pub courses: CourseIndex,
    pub scores: ScoreStore,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    /// Present values, in load order.
    pub values: Vec<f32>,
    pub count: usize,
    /// `None` when no row had a value.
    pub mean: Option<f64>,
}

impl FieldSummary {
    fn from_values(values: Vec<f32>) -> Self {
        let count = values.len();
        let sum: f64 = values.iter().map(|&v| f64::from(v)).sum();
        let mean = (count > 0).then(|| sum / count as f64);
        Self { values, count, mean }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeReport {
    pub course_id: CourseId,
    /// Raw rows for display.
    pub rows: Vec<ScoreRecord>,
    pub general: FieldSummary,
    pub specific: FieldSummary,
}

impl GradeReport {
    pub fn field(&self, kind: ScoreKind) -> &FieldSummary {
        match kind {
            ScoreKind::General => &self.general,
            ScoreKind::Specific => &self.specific,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedEntry {
    /// 1-based.
    pub rank: usize,
    pub course_id: CourseId,
    /// `None` when the course is missing from the course dataset.
    pub institution_id: Option<InstitutionId>,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub courses: usize,
    pub score_rows: usize,
    pub with_general: usize,
    pub with_specific: usize,
}

impl Dataset {
    pub fn new(courses: CourseIndex, scores: ScoreStore) -> Self {
        Self { courses, scores }
    }

    pub fn find_course(&self, course_id: CourseId) -> Option<&CourseRecord> {
        self.courses.find_by_course(course_id)
    }

    pub fn list_by_institution(&self, institution_id: InstitutionId) -> Vec<&CourseRecord> {
        self.courses.list_by_institution(institution_id)
    }

    pub fn list_by_uf(&self, uf: Code) -> Vec<&CourseRecord> {
        self.courses.list_by_uf(uf)
    }

    pub fn list_by_group(&self, group: Code) -> Vec<&CourseRecord> {
        self.courses.list_by_group(group)
    }

    /// Per-kind mean over the rows of one course, skipping absent scores.
    pub fn grades_for_course(&self, course_id: CourseId) -> GradeReport {
        let rows: Vec<ScoreRecord> = self.scores.for_course(course_id).copied().collect();
        let present = |kind: ScoreKind| rows.iter().filter_map(|r| r.score(kind)).collect::<Vec<f32>>();
        let general = FieldSummary::from_values(present(ScoreKind::General));
        let specific = FieldSummary::from_values(present(ScoreKind::Specific));
        GradeReport { course_id, rows, general, specific }
    }

    /// The `n` best scores of `kind`, joined to the course dataset for the
    /// institution id. Absent scores never rank; equal scores keep load order.
    pub fn top_n(&self, n: usize, kind: ScoreKind) -> Result<Vec<RankedEntry>, QueryError> {
        if n == 0 {
            return Err(QueryError::InvalidN);
        }
        if self.scores.is_empty() {
            return Err(QueryError::EmptyData);
        }

        let mut sorted: Vec<ScoreRecord> = self.scores.records().to_vec();
        // descending; absent sorts after every present value
        sorted.sort_by(|a, b| match (a.score(kind), b.score(kind)) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        let ranked = sorted
            .iter()
            .filter_map(|r| r.score(kind).map(|score| (r.course_id, score)))
            .take(n)
            .enumerate()
            .map(|(i, (course_id, score))| RankedEntry {
                rank: i + 1,
                course_id,
                institution_id: self.find_course(course_id).map(|c| c.institution_id),
                score,
            })
            .collect();
        Ok(ranked)
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            courses: self.courses.len(),
            score_rows: self.scores.len(),
            with_general: self.scores.count_present(ScoreKind::General),
            with_specific: self.scores.count_present(ScoreKind::Specific),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course_store::CourseStore;

    fn score(course_id: i64, general: f32, specific: f32) -> ScoreRecord {
        let opt = |v: f32| (v >= 0.0).then_some(v);
        ScoreRecord { year: 2023, course_id, general: opt(general), specific: opt(specific) }
    }

    fn dataset(scores: Vec<ScoreRecord>) -> Dataset {
        let courses: CourseStore = [(101, 5001), (102, 5002)]
            .into_iter()
            .map(|(course_id, institution_id)| CourseRecord { course_id, institution_id, ..Default::default() })
            .collect();
        Dataset::new(courses.build_indexes(), scores.into_iter().collect())
    }

    #[test]
    fn top_n_skips_absent_scores() {
        let ds = dataset(vec![score(101, 90.0, -1.0), score(102, 95.0, -1.0), score(103, -1.0, -1.0)]);
        let top = ds.top_n(2, ScoreKind::General).unwrap();
        assert_eq!(
            top,
            vec![
                RankedEntry { rank: 1, course_id: 102, institution_id: Some(5002), score: 95.0 },
                RankedEntry { rank: 2, course_id: 101, institution_id: Some(5001), score: 90.0 },
            ]
        );
        assert!(ds.top_n(5, ScoreKind::Specific).unwrap().is_empty());
    }

    #[test]
    fn top_n_reports_unknown_institution_and_keeps_tie_order() {
        let ds = dataset(vec![score(900, 80.0, 0.0), score(101, 80.0, 0.0), score(102, 10.0, 0.0)]);
        let top = ds.top_n(10, ScoreKind::General).unwrap();
        assert_eq!(top.len(), 3);
        assert_eq!((top[0].course_id, top[0].institution_id), (900, None));
        assert_eq!(top[1].course_id, 101);
        assert_eq!(top[2].rank, 3);
        // a zero score is a real score
        assert_eq!(ds.top_n(10, ScoreKind::Specific).unwrap().len(), 3);
    }

    #[test]
    fn top_n_argument_errors() {
        let ds = dataset(vec![score(101, 50.0, 50.0)]);
        assert_eq!(ds.top_n(0, ScoreKind::General), Err(QueryError::InvalidN));
        let empty = dataset(vec![]);
        assert_eq!(empty.top_n(1, ScoreKind::General), Err(QueryError::EmptyData));
    }

    #[test]
    fn grades_average_only_present_values() {
        let ds = dataset(vec![score(101, 80.0, -1.0), score(101, 60.0, 30.0), score(102, 10.0, 10.0)]);
        let report = ds.grades_for_course(101);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.general.count, 2);
        assert_eq!(report.general.mean, Some(70.0));
        assert_eq!(report.specific.values, vec![30.0]);
        assert_eq!(report.specific.mean, Some(30.0));

        let none = ds.grades_for_course(555);
        assert_eq!(none.field(ScoreKind::General).count, 0);
        assert_eq!(none.field(ScoreKind::General).mean, None);
    }

    #[test]
    fn summary_counts() {
        let ds = dataset(vec![score(101, 80.0, -1.0), score(101, -1.0, -1.0)]);
        assert_eq!(ds.summary(), DatasetSummary { courses: 2, score_rows: 2, with_general: 1, with_specific: 0 });
    }
}
