use crate::record::{CourseRecord, ScoreRecord};

pub const DEFAULT_DELIMITER: char = ';';

/// Number of positional columns in a course row.
pub const COURSE_COLUMNS: usize = 10;

/// Position (0-based) of the course id in both datasets.
const COURSE_ID_COLUMN: usize = 1;

/// Return the first `;` or `,` found in the line, `;` when neither occurs.
pub fn detect_delimiter(line: &str) -> char {
    line.chars().find(|c| matches!(c, ';' | ',')).unwrap_or(DEFAULT_DELIMITER)
}

/// Split on a single delimiter; consecutive delimiters produce empty fields.
pub fn split_fields(line: &str, delimiter: char) -> Vec<&str> {
    line.split(delimiter).collect()
}

/// Greedy integer parse. `None` only when the trimmed token is empty; junk
/// without leading digits parses as 0 and trailing junk is ignored.
pub fn parse_integer_field(token: &str) -> Option<i64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(leading_integer(token).unwrap_or(0))
}

/// Like [`parse_integer_field`] but requires at least one leading digit.
pub fn parse_key_field(token: &str) -> Option<i64> {
    leading_integer(token.trim())
}

fn leading_integer(token: &str) -> Option<i64> {
    let bytes = token.as_bytes();
    let (negative, start) = match bytes.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };
    let digits = bytes[start..].iter().take_while(|b| b.is_ascii_digit());
    let mut value: i64 = 0;
    let mut seen = false;
    for d in digits {
        seen = true;
        value = value.saturating_mul(10).saturating_add(i64::from(d - b'0'));
    }
    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Parse one course row: ten positional integer columns, missing trailing
/// columns are zero. Rows without a usable course id are rejected.
pub fn parse_course_line(line: &str) -> Option<CourseRecord> {
    let fields = split_fields(line, detect_delimiter(line));
    let course_id = parse_key_field(fields.get(COURSE_ID_COLUMN)?)?;

    let mut values = [0i64; COURSE_COLUMNS];
    for (slot, token) in values.iter_mut().zip(fields.iter()) {
        if let Some(v) = parse_integer_field(token) {
            *slot = v;
        }
    }
    let [year, _, institution_id, category, academic_org, group, modality, municipality, uf, region] = values;

    Some(CourseRecord {
        year,
        course_id,
        institution_id,
        category,
        academic_org,
        group,
        modality,
        municipality,
        uf,
        region,
    })
}

/// Best-effort score row parse.
///
/// Exam exports do not share a fixed column layout, so only the course id
/// position is trusted (column 2). Every other column is tried as a float and
/// the first two values inside `[0, 100]` are taken as the general and the
/// specific score, in that order. The second one is a guess: some exports
/// place a different component there and it is still read as the specific
/// score. Rows are kept as long as the course id is positive, even when no
/// score candidate is found.
pub fn parse_score_line(line: &str, year: i64) -> Option<ScoreRecord> {
    let fields = split_fields(line, detect_delimiter(line));
    let course_id = parse_integer_field(fields.get(COURSE_ID_COLUMN)?)?;
    if course_id <= 0 {
        return None;
    }

    let mut candidates = fields
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != COURSE_ID_COLUMN)
        .filter_map(|(_, token)| score_candidate(token));

    let general = candidates.next();
    let specific = candidates.next();
    Some(ScoreRecord { year, course_id, general, specific })
}

fn score_candidate(token: &str) -> Option<f32> {
    let value: f32 = token.trim().parse().ok()?;
    // "-0" lands in range; store it as 0
    (0.0..=100.0).contains(&value).then_some(value + 0.0)
}
