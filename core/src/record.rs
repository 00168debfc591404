use serde::{Serialize, Serializer};

pub type CourseId = i64;
pub type InstitutionId = i64;
/// Numeric category codes (group, UF, region, ...) as they appear in the exports.
pub type Code = i64;

/// Value used by the exports (and by our output) for a score that was not recorded.
pub const SCORE_SENTINEL: f32 = -1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CourseRecord {
    pub year: i64,
    pub course_id: CourseId,
    pub institution_id: InstitutionId,
    /// Administrative category code.
    pub category: Code,
    /// Academic organization code.
    pub academic_org: Code,
    pub group: Code,
    pub modality: Code,
    pub municipality: Code,
    pub uf: Code,
    pub region: Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub year: i64,
    pub course_id: CourseId,
    #[serde(serialize_with = "score_or_sentinel")]
    pub general: Option<f32>,
    #[serde(serialize_with = "score_or_sentinel")]
    pub specific: Option<f32>,
}

impl ScoreRecord {
    pub fn score(&self, kind: ScoreKind) -> Option<f32> {
        match kind {
            ScoreKind::General => self.general,
            ScoreKind::Specific => self.specific,
        }
    }

    /// Score as written in the exports: the value, or `-1` when absent.
    pub fn raw_score(&self, kind: ScoreKind) -> f32 {
        self.score(kind).unwrap_or(SCORE_SENTINEL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreKind {
    General,
    Specific,
}

impl ScoreKind {
    pub fn label(self) -> &'static str {
        match self {
            ScoreKind::General => "general",
            ScoreKind::Specific => "specific",
        }
    }
}

impl std::fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub(crate) fn score_or_sentinel<S: Serializer>(score: &Option<f32>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f32(score.unwrap_or(SCORE_SENTINEL))
}
