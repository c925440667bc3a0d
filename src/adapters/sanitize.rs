//! Log sanitization: redacts clinical measurements before they reach a log sink.
//!
//! Form values are patient measurements. Code paths should not log them, but
//! a `Debug` dump of `ClinicalInputs` or a formatted record can slip through.
//! `SanitizingMakeWriter` wraps any `tracing_subscriber` writer and rewrites
//! each formatted line:
//!
//! - `age=63`, `cholesterol: 240`, `"st_depression":1.5` -> value redacted
//! - emails and UUIDs -> redacted
//!
//! Input is capped per line at the limit passed to `SanitizingMakeWriter::new`
//! (`AppConfig::sanitize_max_bytes`, default 16 KiB).

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

/// Default per-line cap on sanitized input.
pub const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct Pattern {
    regex: Regex,
    replacement: &'static str,
}

struct Patterns {
    set: RegexSet,
    rules: Vec<Pattern>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn get_patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        let rules: Vec<(&'static str, &'static str)> = vec![
            // Clinical field followed by a number, in key=value, key: value or JSON form.
            (
                r#"(?i)(\b(?:age|sex|cholesterol|max_?hr|max_heart_rate|st_depression|chest_pain(?:_type)?|thallium|vessels|bp|resting_bp|fbs|ekg|slope|angina)"?\s*[:=]\s*)-?\d+(?:\.\d+)?"#,
                "${1}[REDACTED]",
            ),
            // Bare numeric rows, e.g. a Debug-printed feature vector.
            (
                r"\[\s*-?\d+(?:\.\d+)?(?:\s*,\s*-?\d+(?:\.\d+)?){6,}\s*\]",
                "[REDACTED-ROW]",
            ),
            (
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
                "[REDACTED-UUID]",
            ),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
                "[REDACTED-EMAIL]",
            ),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| Pattern {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect();

        Patterns { set, rules }
    })
}

/// Redact clinical values and identifiers from a string.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, DEFAULT_SANITIZE_MAX_BYTES)
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = get_patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        let rule = &patterns.rules[idx];
        result = rule.regex.replace_all(&result, rule.replacement).into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// A `tracing_subscriber` writer wrapper that sanitizes formatted log output
/// line by line before it is written to the underlying sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
    max_bytes: usize,
}

impl<M> SanitizingMakeWriter<M> {
    /// Wrap `inner`, capping each sanitized line at `max_bytes` (0 means the
    /// default).
    #[must_use]
    pub fn new(inner: M, max_bytes: usize) -> Self {
        let max_bytes = if max_bytes == 0 {
            DEFAULT_SANITIZE_MAX_BYTES
        } else {
            max_bytes
        };
        Self { inner, max_bytes }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
    max_bytes: usize,
}

impl<W> SanitizingWriter<W> {
    fn new(inner: W, max_bytes: usize) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            max_bytes,
        }
    }

    fn sanitize_bytes(&self, bytes: &[u8]) -> String {
        sanitize_with_limit(&String::from_utf8_lossy(bytes), self.max_bytes)
    }
}

impl<W> SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.drain(..=pos).collect::<Vec<u8>>();
            let sanitized = self.sanitize_bytes(&line);
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W> std::io::Write for SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A line with no newline must not buffer without bound.
        let hard_cap = self.max_bytes.saturating_mul(2);
        if self.buffer.len() > hard_cap {
            let sanitized = self.sanitize_bytes(&self.buffer);
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;

        if !self.buffer.is_empty() {
            let sanitized = self.sanitize_bytes(&self.buffer);
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }

        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer(), self.max_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sanitize_key_value_measurements() {
        let sanitized = sanitize("inputs age=63 cholesterol: 241 st_depression=2.3 ok");
        assert!(!sanitized.contains("63"));
        assert!(!sanitized.contains("241"));
        assert!(!sanitized.contains("2.3"));
        assert!(sanitized.contains("age=[REDACTED]"));
        assert!(sanitized.contains("ok"));
    }

    #[test]
    fn test_sanitize_debug_struct() {
        let line = "ClinicalInputs { age: 50, cholesterol: 200, max_heart_rate: 150, thallium: 0 }";
        let sanitized = sanitize(line);
        assert!(!sanitized.contains("150"));
        assert!(sanitized.contains("max_heart_rate: [REDACTED]"));
    }

    #[test]
    fn test_sanitize_feature_row() {
        let sanitized = sanitize("row=[50, 1, 0, 120, 200, 0, 1, 150, 0, 1.0, 1, 0, 0]");
        assert!(sanitized.contains("[REDACTED-ROW]"));
        assert!(!sanitized.contains("120"));
    }

    #[test]
    fn test_sanitize_identifiers() {
        let sanitized = sanitize("id 550e8400-e29b-41d4-a716-446655440000 by dr@clinic.org");
        assert!(sanitized.contains("[REDACTED-UUID]"));
        assert!(sanitized.contains("[REDACTED-EMAIL]"));
    }

    #[test]
    fn test_plain_text_untouched() {
        let line = "Loaded feature schema from \"models/model_features.json\" (13 columns)";
        assert_eq!(sanitize(line), line);
    }

    #[test]
    fn test_sanitize_truncates_large_inputs() {
        let sanitized = sanitize_with_limit("prefix that is long enough", 6);
        assert_eq!(sanitized, "prefix [TRUNCATED]");
    }

    #[test]
    fn test_writer_sanitizes_each_line() {
        let mut out = Vec::new();
        {
            let mut writer = SanitizingWriter::new(&mut out, DEFAULT_SANITIZE_MAX_BYTES);
            writer.write_all(b"first age=71\nsecond ").expect("write");
            writer.write_all(b"vessels=3\n").expect("write");
            writer.flush().expect("flush");
        }
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(
            text,
            "first age=[REDACTED]\nsecond vessels=[REDACTED]\n"
        );
    }

    #[test]
    fn test_make_writer_applies_configured_limit() {
        let make = SanitizingMakeWriter::new(Vec::<u8>::new(), 12);
        assert_eq!(make.max_bytes, 12);
        assert_eq!(
            SanitizingMakeWriter::new(Vec::<u8>::new(), 0).max_bytes,
            DEFAULT_SANITIZE_MAX_BYTES
        );

        let mut out = Vec::new();
        {
            let mut writer = SanitizingWriter::new(&mut out, make.max_bytes);
            writer
                .write_all(b"a long line age=44 that exceeds the cap\n")
                .expect("write");
            writer.flush().expect("flush");
        }
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "a long line  [TRUNCATED]\n");
    }
}
