use crate::error::LoadError;
use crate::loader::{for_each_data_line, LoadOptions, LoadReport};
use crate::parser::parse_course_line;
use crate::record::{Code, CourseId, CourseRecord, InstitutionId};
use serde::Serialize;
use std::path::Path;

/// Keys the course records are indexed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKey {
    Course,
    Institution,
    Uf,
    Group,
}

impl IndexKey {
    pub const ALL: [IndexKey; 4] = [IndexKey::Course, IndexKey::Institution, IndexKey::Uf, IndexKey::Group];

    pub fn of(self, record: &CourseRecord) -> i64 {
        match self {
            IndexKey::Course => record.course_id,
            IndexKey::Institution => record.institution_id,
            IndexKey::Uf => record.uf,
            IndexKey::Group => record.group,
        }
    }
}

/// Append-only course collection, filled before indexing.
#[derive(Debug, Default)]
pub struct CourseStore {
    records: Vec<CourseRecord>,
}

impl CourseStore {
    pub fn new() -> Self { Self::default() }

    /// Append every parseable row of a course file. Rows without a course id
    /// are dropped and only counted.
    pub fn load<P: AsRef<Path>>(&mut self, path: P, options: &LoadOptions) -> Result<LoadReport, LoadError> {
        let path = path.as_ref();
        let report = for_each_data_line(path, options, |line| match parse_course_line(line) {
            Some(record) => {
                self.records.push(record);
                true
            }
            None => false,
        })?;
        tracing::info!(path = %path.display(), loaded = report.loaded, dropped = report.dropped, overlong = report.overlong, "loaded courses");
        Ok(report)
    }

    pub fn push(&mut self, record: CourseRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Freeze the store and sort one view per [`IndexKey`].
    pub fn build_indexes(self) -> CourseIndex {
        let records = self.records;
        let view = |key: IndexKey| {
            let mut positions: Vec<usize> = (0..records.len()).collect();
            // stable: equal keys keep load order
            positions.sort_by_key(|&p| key.of(&records[p]));
            positions
        };
        let by_course = view(IndexKey::Course);
        let by_institution = view(IndexKey::Institution);
        let by_uf = view(IndexKey::Uf);
        let by_group = view(IndexKey::Group);
        tracing::debug!(records = records.len(), "built course indexes");
        CourseIndex { records, by_course, by_institution, by_uf, by_group }
    }
}

impl FromIterator<CourseRecord> for CourseStore {
    fn from_iter<I: IntoIterator<Item = CourseRecord>>(iter: I) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}

/// Read-only course records with four sorted views. Each view is a
/// permutation of positions into `records`.
#[derive(Debug)]
pub struct CourseIndex {
    records: Vec<CourseRecord>,
    by_course: Vec<usize>,
    by_institution: Vec<usize>,
    by_uf: Vec<usize>,
    by_group: Vec<usize>,
}

impl CourseIndex {
    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Records in load order.
    pub fn records(&self) -> &[CourseRecord] { &self.records }

    pub fn view_len(&self, key: IndexKey) -> usize { self.view(key).len() }

    fn view(&self, key: IndexKey) -> &[usize] {
        match key {
            IndexKey::Course => &self.by_course,
            IndexKey::Institution => &self.by_institution,
            IndexKey::Uf => &self.by_uf,
            IndexKey::Group => &self.by_group,
        }
    }

    /// Records of one view, in key order.
    pub fn iter_view(&self, key: IndexKey) -> impl Iterator<Item = &CourseRecord> + '_ {
        self.view(key).iter().map(move |&p| &self.records[p])
    }

    /// Position in `view` of the first record whose key is not below `value`.
    fn lower_bound(&self, key: IndexKey, value: i64) -> usize {
        self.view(key).partition_point(|&p| key.of(&self.records[p]) < value)
    }

    /// Binary search on the course id view. With duplicate ids the earliest
    /// loaded record wins.
    pub fn find_by_course(&self, course_id: CourseId) -> Option<&CourseRecord> {
        let at = self.lower_bound(IndexKey::Course, course_id);
        let &p = self.by_course.get(at)?;
        let record = &self.records[p];
        (record.course_id == course_id).then_some(record)
    }

    /// All records whose `key` equals `value`, in load order. Empty when none match.
    pub fn list_by(&self, key: IndexKey, value: i64) -> Vec<&CourseRecord> {
        let start = self.lower_bound(key, value);
        self.view(key)[start..]
            .iter()
            .map(|&p| &self.records[p])
            .take_while(|r| key.of(r) == value)
            .collect()
    }

    pub fn list_by_institution(&self, institution_id: InstitutionId) -> Vec<&CourseRecord> {
        self.list_by(IndexKey::Institution, institution_id)
    }

    pub fn list_by_uf(&self, uf: Code) -> Vec<&CourseRecord> {
        self.list_by(IndexKey::Uf, uf)
    }

    pub fn list_by_group(&self, group: Code) -> Vec<&CourseRecord> {
        self.list_by(IndexKey::Group, group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(course_id: i64, institution_id: i64, group: i64, uf: i64) -> CourseRecord {
        CourseRecord { year: 2023, course_id, institution_id, group, uf, ..Default::default() }
    }

    fn sample() -> CourseIndex {
        let store: CourseStore = vec![
            course(30, 1, 10, 35),
            course(10, 2, 20, 35),
            course(20, 1, 10, 33),
            course(40, 3, 10, 35),
            course(10, 9, 99, 11),
        ]
        .into_iter()
        .collect();
        store.build_indexes()
    }

    #[test]
    fn pushed_records_are_indexed() {
        let mut store = CourseStore::new();
        store.push(course(7, 70, 1, 41));
        store.push(course(3, 30, 1, 41));
        assert_eq!(store.len(), 2);
        let idx = store.build_indexes();
        assert_eq!(idx.find_by_course(3).unwrap().institution_id, 30);
        assert_eq!(idx.list_by_uf(41).len(), 2);
    }

    #[test]
    fn every_view_covers_all_records() {
        let idx = sample();
        for key in IndexKey::ALL {
            assert_eq!(idx.view_len(key), idx.len());
            let keys: Vec<i64> = idx.iter_view(key).map(|r| key.of(r)).collect();
            assert!(keys.windows(2).all(|w| w[0] <= w[1]), "{key:?} view not sorted");
        }
    }

    #[test]
    fn find_returns_first_loaded_duplicate() {
        let idx = sample();
        assert_eq!(idx.find_by_course(10).unwrap().institution_id, 2);
        assert_eq!(idx.find_by_course(40).unwrap().institution_id, 3);
        assert!(idx.find_by_course(15).is_none());
        assert!(idx.find_by_course(99).is_none());
    }

    #[test]
    fn listing_starts_at_the_first_match() {
        let idx = sample();
        let ids: Vec<i64> = idx.list_by_group(10).iter().map(|r| r.course_id).collect();
        assert_eq!(ids, vec![30, 20, 40]);
        let ids: Vec<i64> = idx.list_by_uf(35).iter().map(|r| r.course_id).collect();
        assert_eq!(ids, vec![30, 10, 40]);
        assert_eq!(idx.list_by_institution(1).len(), 2);
        assert!(idx.list_by_group(11).is_empty());
    }

    #[test]
    fn empty_store_indexes_cleanly() {
        let idx = CourseStore::new().build_indexes();
        assert!(idx.is_empty());
        assert_eq!(idx.view_len(IndexKey::Group), 0);
        assert!(idx.find_by_course(1).is_none());
        assert!(idx.list_by_uf(35).is_empty());
    }
}
