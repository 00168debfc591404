use crate::error::LoadError;
use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Lines longer than this are rejected instead of parsed.
pub const DEFAULT_MAX_LINE_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub max_line_bytes: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { max_line_bytes: DEFAULT_MAX_LINE_BYTES }
    }
}

/// Per-file ingestion counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Rows appended to the store.
    pub loaded: usize,
    /// Rows rejected for a missing or invalid course id.
    pub dropped: usize,
    /// Rows over `max_line_bytes`, never parsed.
    pub overlong: usize,
}

/// Open `path` and feed every data line (header skipped) to `on_line`.
///
/// `on_line` returns whether the row was kept. On an open failure a warning is
/// logged and nothing is read; a read failure mid-file keeps what was already
/// handed out and is reported as [`LoadError::Read`].
pub(crate) fn for_each_data_line<F>(path: &Path, options: &LoadOptions, mut on_line: F) -> Result<LoadReport, LoadError>
where
    F: FnMut(&str) -> bool,
{
    let file = File::open(path).map_err(|source| {
        tracing::warn!(path = %path.display(), error = %source, "cannot open input, continuing with no records");
        LoadError::Open { path: path.to_path_buf(), source }
    })?;
    let mut reader = BufReader::new(file);
    let mut report = LoadReport::default();
    let mut buf: Vec<u8> = Vec::new();
    let mut line_no = 0usize;
    // room for the line ending on top of the content limit
    let read_limit = options.max_line_bytes.saturating_add(2);

    loop {
        buf.clear();
        let (n, cut) = read_capped_line(&mut reader, &mut buf, read_limit).map_err(|source| {
            tracing::warn!(path = %path.display(), line_no, error = %source, "read failed, keeping rows loaded so far");
            LoadError::Read { path: path.to_path_buf(), lines: line_no, source }
        })?;
        if n == 0 {
            break;
        }
        line_no += 1;
        if line_no == 1 {
            continue; // header
        }

        let line = trim_line_ending(&buf);
        if cut || line.len() > options.max_line_bytes {
            report.overlong += 1;
            continue;
        }
        let text: Cow<'_, str> = String::from_utf8_lossy(line);
        if on_line(&text) {
            report.loaded += 1;
        } else {
            report.dropped += 1;
        }
    }

    tracing::debug!(path = %path.display(), lines = line_no, "finished reading");
    Ok(report)
}

/// Read one line into `buf`, keeping at most `limit` bytes of it. Returns the
/// bytes consumed (0 at end of file) and whether the line was cut short; the
/// rest of a cut line is consumed without being buffered.
fn read_capped_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>, limit: usize) -> io::Result<(usize, bool)> {
    let n = reader.by_ref().take(limit as u64).read_until(b'\n', buf)?;
    if n < limit || buf.last() == Some(&b'\n') {
        return Ok((n, false));
    }
    let mut consumed = n;
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            break;
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(i) => {
                reader.consume(i + 1);
                consumed += i + 1;
                break;
            }
            None => {
                let len = available.len();
                reader.consume(len);
                consumed += len;
            }
        }
    }
    Ok((consumed, true))
}

fn trim_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents).unwrap();
        f
    }

    #[test]
    fn skips_header_and_strips_crlf() {
        let f = write_tmp(b"HEADER\r\na\r\nb");
        let mut seen = Vec::new();
        let report = for_each_data_line(f.path(), &LoadOptions::default(), |l| {
            seen.push(l.to_string());
            true
        })
        .unwrap();
        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(report.loaded, 2);
    }

    #[test]
    fn overlong_lines_are_counted_not_parsed() {
        let f = write_tmp(b"h\nshort\nthis line is too long\n");
        let opts = LoadOptions { max_line_bytes: 8 };
        let mut seen = 0;
        let report = for_each_data_line(f.path(), &opts, |_| {
            seen += 1;
            true
        })
        .unwrap();
        assert_eq!(seen, 1);
        assert_eq!(report, LoadReport { loaded: 1, dropped: 0, overlong: 1 });
    }

    #[test]
    fn line_without_newline_is_not_buffered_whole() {
        let mut contents = b"h\n".to_vec();
        contents.extend(std::iter::repeat(b'x').take(100_000));
        contents.extend_from_slice(b"\nok\n");
        let f = write_tmp(&contents);
        let opts = LoadOptions { max_line_bytes: 16 };
        let mut seen = Vec::new();
        let report = for_each_data_line(f.path(), &opts, |l| {
            seen.push(l.to_string());
            true
        })
        .unwrap();
        assert_eq!(seen, vec!["ok"]);
        assert_eq!(report, LoadReport { loaded: 1, dropped: 0, overlong: 1 });
    }

    #[test]
    fn capped_read_keeps_the_limit_and_drains_the_tail() {
        let data = format!("{}\nnext\n", "y".repeat(50));
        let mut reader = BufReader::with_capacity(8, data.as_bytes());
        let mut buf = Vec::new();
        let (n, cut) = read_capped_line(&mut reader, &mut buf, 10).unwrap();
        assert!(cut);
        assert_eq!(n, 51);
        assert_eq!(buf.len(), 10);

        buf.clear();
        let (n, cut) = read_capped_line(&mut reader, &mut buf, 10).unwrap();
        assert_eq!((n, cut), (5, false));
        assert_eq!(buf, b"next\n");
    }

    #[test]
    fn crlf_line_at_the_limit_is_kept() {
        let f = write_tmp(b"h\r\n12345678\r\n");
        let opts = LoadOptions { max_line_bytes: 8 };
        let report = for_each_data_line(f.path(), &opts, |l| l == "12345678").unwrap();
        assert_eq!(report.loaded, 1);
    }

    #[test]
    fn latin1_bytes_do_not_abort_the_load() {
        let f = write_tmp(b"h\nS\xe3o Paulo;1\n");
        let report = for_each_data_line(f.path(), &LoadOptions::default(), |l| l.ends_with(";1")).unwrap();
        assert_eq!(report.loaded, 1);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = for_each_data_line(Path::new("/definitely/not/here.csv"), &LoadOptions::default(), |_| true).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }
}
