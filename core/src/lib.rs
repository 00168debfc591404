//! In-memory course and exam-score store.
//!
//! Courses are loaded into a [`CourseStore`], frozen into a [`CourseIndex`]
//! with one sorted view per [`IndexKey`], and paired with a [`ScoreStore`] in a
//! [`Dataset`] that answers lookups, listings, per-course grade summaries and
//! top-N rankings.

pub mod course_store;
pub mod error;
pub mod loader;
pub mod parser;
pub mod query;
pub mod record;
pub mod score_store;

pub use course_store::{CourseIndex, CourseStore, IndexKey};
pub use error::{LoadError, QueryError};
pub use loader::{LoadOptions, LoadReport};
pub use query::{Dataset, DatasetSummary, FieldSummary, GradeReport, RankedEntry};
pub use record::{Code, CourseId, CourseRecord, InstitutionId, ScoreKind, ScoreRecord, SCORE_SENTINEL};
pub use score_store::ScoreStore;
