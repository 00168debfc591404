use enade_core::{CourseId, CourseRecord, DatasetSummary, GradeReport, IndexKey, QueryError, RankedEntry, ScoreKind};
use serde::Serialize;
use serde_json::json;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    /// One JSON document per result, no prompts.
    Json,
}

pub struct Renderer<W: Write> {
    out: W,
    format: OutputFormat,
}

fn key_label(key: IndexKey) -> &'static str {
    match key {
        IndexKey::Course => "course",
        IndexKey::Institution => "institution",
        IndexKey::Uf => "UF",
        IndexKey::Group => "group",
    }
}

fn course_line(c: &CourseRecord) -> String {
    format!(
        "course {} | year {} | institution {} | category {} | org {} | group {} | modality {} | municipality {} | UF {} | region {}",
        c.course_id, c.year, c.institution_id, c.category, c.academic_org, c.group, c.modality, c.municipality, c.uf, c.region
    )
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W { self.out }

    fn json<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        writeln!(self.out)
    }

    pub fn prompt(&mut self, text: &str) -> io::Result<()> {
        if self.format == OutputFormat::Text {
            write!(self.out, "{text}")?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn message(&mut self, text: &str) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{text}"),
            OutputFormat::Json => self.json(&json!({ "message": text })),
        }
    }

    pub fn course(&mut self, course_id: CourseId, found: Option<&CourseRecord>) -> io::Result<()> {
        match (self.format, found) {
            (OutputFormat::Json, Some(c)) => self.json(c),
            (OutputFormat::Json, None) => self.json(&json!({ "course_id": course_id, "found": false })),
            (OutputFormat::Text, Some(c)) => writeln!(self.out, "{}", course_line(c)),
            (OutputFormat::Text, None) => writeln!(self.out, "Course {course_id} not found."),
        }
    }

    pub fn courses(&mut self, key: IndexKey, value: i64, records: &[&CourseRecord]) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(&json!({ "by": key, "value": value, "courses": records }));
        }
        let label = key_label(key);
        if records.is_empty() {
            return writeln!(self.out, "No courses with {label} {value}.");
        }
        writeln!(self.out, "{} course(s) with {label} {value}:", records.len())?;
        for c in records {
            writeln!(self.out, "  {}", course_line(c))?;
        }
        Ok(())
    }

    pub fn grades(&mut self, report: &GradeReport) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(report);
        }
        if report.rows.is_empty() {
            return writeln!(self.out, "No score records for course {}.", report.course_id);
        }
        writeln!(self.out, "Scores for course {} ({} rows):", report.course_id, report.rows.len())?;
        for r in &report.rows {
            writeln!(
                self.out,
                "  general {:.2} | specific {:.2}",
                r.raw_score(ScoreKind::General),
                r.raw_score(ScoreKind::Specific)
            )?;
        }
        for kind in [ScoreKind::General, ScoreKind::Specific] {
            let field = report.field(kind);
            match field.mean {
                Some(mean) => writeln!(self.out, "Mean {kind}: {mean:.2} (n={})", field.count)?,
                None => writeln!(self.out, "Mean {kind}: no records")?,
            }
        }
        Ok(())
    }

    pub fn ranking(&mut self, kind: ScoreKind, result: &Result<Vec<RankedEntry>, QueryError>) -> io::Result<()> {
        match (self.format, result) {
            (OutputFormat::Json, Ok(entries)) => self.json(&json!({ "kind": kind, "entries": entries })),
            (OutputFormat::Json, Err(e)) => self.json(&json!({ "kind": kind, "error": e.to_string() })),
            (OutputFormat::Text, Err(e)) => writeln!(self.out, "Cannot rank: {e}."),
            (OutputFormat::Text, Ok(entries)) if entries.is_empty() => {
                writeln!(self.out, "No {kind} scores recorded.")
            }
            (OutputFormat::Text, Ok(entries)) => {
                writeln!(self.out, "Top {} by {kind} score:", entries.len())?;
                for e in entries {
                    let institution = e.institution_id.map_or_else(|| "unknown".to_string(), |id| id.to_string());
                    writeln!(self.out, "  {:>3}. course {} | institution {} | score {:.2}", e.rank, e.course_id, institution, e.score)?;
                }
                Ok(())
            }
        }
    }

    pub fn summary(&mut self, summary: &DatasetSummary) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.json(summary),
            OutputFormat::Text => writeln!(
                self.out,
                "{} courses | {} score rows ({} with general, {} with specific)",
                summary.courses, summary.score_rows, summary.with_general, summary.with_specific
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text() -> Renderer<Vec<u8>> { Renderer::new(Vec::new(), OutputFormat::Text) }

    fn output(r: Renderer<Vec<u8>>) -> String { String::from_utf8(r.into_inner()).unwrap() }

    #[test]
    fn ranking_shows_unknown_institution() {
        let mut r = text();
        let entries = vec![RankedEntry { rank: 1, course_id: 9, institution_id: None, score: 88.0 }];
        r.ranking(ScoreKind::General, &Ok(entries)).unwrap();
        let s = output(r);
        assert!(s.contains("institution unknown"));
        assert!(s.contains("score 88.00"));
    }

    #[test]
    fn json_mode_has_no_prompts() {
        let mut r = Renderer::new(Vec::new(), OutputFormat::Json);
        r.prompt("Option: ").unwrap();
        r.course(5, None).unwrap();
        let v: serde_json::Value = serde_json::from_str(output(r).trim()).unwrap();
        assert_eq!(v["found"], false);
    }
}
