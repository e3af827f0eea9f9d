//! Log sanitization for intake PII.
//!
//! Every formatted log line passes through [`SanitizingMakeWriter`], which
//! redacts:
//! - Phone numbers, formatted (`(11) 99999-9999`) or as bare digit runs
//! - CPF numbers (`123.456.789-09`)
//! - E-mail addresses
//!
//! Names cannot be recognized by pattern. Types that hold them
//! (`IntakeRecord`, `PhoneNumber`) redact themselves in `Debug`, and log
//! calls must not format them with `Display`.
//!
//! Input longer than `OBESCREEN_SANITIZE_MAX_BYTES` (default 16 KiB) is
//! truncated before scanning.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

/// Ordered so that the more specific shapes are replaced first.
const RULES: [(&str, &str); 4] = [
    (r"\b\d{3}\.\d{3}\.\d{3}-\d{2}\b", "[REDACTED-CPF]"),
    (r"\(\d{2}\)\s?\d{4,5}-?\d{4}\b", "[REDACTED-PHONE]"),
    (r"\b\d{10,13}\b", "[REDACTED-PHONE]"),
    (
        r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
        "[REDACTED-EMAIL]",
    ),
];

struct Patterns {
    set: RegexSet,
    rules: Vec<(Regex, &'static str)>,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        set: RegexSet::new(RULES.iter().map(|(p, _)| *p)).expect("Valid regex set"),
        rules: RULES
            .iter()
            .map(|(p, r)| (Regex::new(p).expect("Valid regex"), *r))
            .collect(),
    })
}

fn max_sanitize_bytes() -> usize {
    std::env::var("OBESCREEN_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Replace PII in `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    let matched = patterns.set.matches(prefix);
    if matched.matched_any() {
        for (idx, (regex, replacement)) in patterns.rules.iter().enumerate() {
            if matched.matched(idx) {
                result = regex.replace_all(&result, *replacement).into_owned();
            }
        }
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
        if input.ends_with('\n') {
            result.push('\n');
        }
    }
    result
}

/// `MakeWriter` wrapper that sanitizes each complete log line before
/// handing it to the inner writer.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn write_sanitized(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(bytes);
        self.inner.write_all(sanitize(&text).as_bytes())
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.write_sanitized(&line)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A single line with no newline must not grow without bound.
        if self.buffer.len() > max_sanitize_bytes().saturating_mul(2) {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
            self.inner.write_all(b"\n")?;
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
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
        SanitizingWriter {
            inner: self.inner.make_writer(),
            buffer: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_formatted_phone() {
        let out = sanitize("Patient phone (11) 99999-9999 registered");
        assert_eq!(out, "Patient phone [REDACTED-PHONE] registered");

        let out = sanitize("landline (21) 3456-7890");
        assert!(out.contains("[REDACTED-PHONE]"));
        assert!(!out.contains("3456"));
    }

    #[test]
    fn test_raw_phone_digits() {
        let out = sanitize("phone=11987654321");
        assert!(out.contains("[REDACTED-PHONE]"));
        assert!(!out.contains("987654321"));
    }

    #[test]
    fn test_cpf() {
        let out = sanitize("CPF 123.456.789-09 on file");
        assert_eq!(out, "CPF [REDACTED-CPF] on file");
    }

    #[test]
    fn test_email() {
        assert!(sanitize("contact: maria@example.com").contains("[REDACTED-EMAIL]"));
    }

    #[test]
    fn test_clinical_numbers_untouched() {
        let line = "Screening complete: code=4 bmi=31.02 age=34";
        assert_eq!(sanitize(line), line);
        assert_eq!(sanitize("Loaded model v1.0.0"), "Loaded model v1.0.0");
    }

    #[test]
    fn test_truncation() {
        let out = sanitize_with_limit("abcdefghijklmnopqrstuvwxyz", 10);
        assert_eq!(out, "abcdefghij [TRUNCATED]");

        // never split a multi-byte char
        let out = sanitize_with_limit("ééééé", 3);
        assert_eq!(out, "é [TRUNCATED]");
    }

    #[test]
    fn test_truncated_line_keeps_its_newline() {
        let out = sanitize_with_limit("abcdefghijklmnop\n", 10);
        assert_eq!(out, "abcdefghij [TRUNCATED]\n");
    }

    #[test]
    fn test_writer_does_not_join_truncated_records() {
        let long = "x".repeat(DEFAULT_SANITIZE_MAX_BYTES + 10);
        let mut sink = Vec::new();
        {
            let mut writer = SanitizingWriter {
                inner: &mut sink,
                buffer: Vec::new(),
            };
            writer.write_all(long.as_bytes()).expect("write");
            writer.write_all(b"\nsecond record\n").expect("write");
            writer.flush().expect("flush");
        }
        let out = String::from_utf8(sink).expect("utf8");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" [TRUNCATED]"));
        assert_eq!(lines[1], "second record");
    }

    #[test]
    fn test_writer_sanitizes_whole_lines() {
        let mut sink = Vec::new();
        {
            let mut writer = SanitizingWriter {
                inner: &mut sink,
                buffer: Vec::new(),
            };
            writer.write_all(b"mobile (11) 9999").expect("write");
            writer.write_all(b"9-9999 ok\nnext").expect("write");
            writer.flush().expect("flush");
        }
        let out = String::from_utf8(sink).expect("utf8");
        assert_eq!(out, "mobile [REDACTED-PHONE] ok\nnext");
    }
}
