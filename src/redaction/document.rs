//! Document text sources
//!
//! Container formats keep text in runs (paragraphs, table cells, spans) whose
//! boundaries carry formatting. Detection runs over the joined text and the
//! redacted output is written back run by run: each entity's offsets are
//! mapped onto the runs and separators it covers, so rendering the redacted
//! runs always yields the offset-redacted text.

use crate::redaction::models::Entity;
use crate::redaction::redactor::TokenTable;
use crate::domain::{RadactError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};

/// One run of text plus the separator that follows it in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// Run content
    pub text: String,
    /// Text between this run and the next (empty for the last run)
    pub separator: String,
}

/// Anything that can supply text for redaction
pub trait TextSource {
    /// Ordered runs of the document
    fn runs(&self) -> &[TextRun];

    /// Full text as detection should see it
    fn full_text(&self) -> String {
        render(self.runs())
    }
}

/// Join runs and their separators back into one string
pub fn render(runs: &[TextRun]) -> String {
    let capacity = runs.iter().map(|r| r.text.len() + r.separator.len()).sum();
    runs.iter().fold(String::with_capacity(capacity), |mut out, run| {
        out.push_str(&run.text);
        out.push_str(&run.separator);
        out
    })
}

/// UTF-8 plain text split into blank-line separated paragraphs
#[derive(Debug, Clone)]
pub struct PlainTextDocument {
    path: Option<PathBuf>,
    runs: Vec<TextRun>,
}

impl PlainTextDocument {
    /// Load a UTF-8 text file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            RadactError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut document = Self::from_text(&text)?;
        document.path = Some(path.to_path_buf());
        Ok(document)
    }

    /// Build a document from a string
    pub fn from_text(text: &str) -> Result<Self> {
        let paragraph_break = Regex::new(r"\r?\n(?:[ \t]*\r?\n)+")
            .map_err(|e| RadactError::Other(format!("Invalid paragraph pattern: {e}")))?;

        let mut runs = Vec::new();
        let mut last = 0;
        for separator in paragraph_break.find_iter(text) {
            runs.push(TextRun {
                text: text[last..separator.start()].to_string(),
                separator: separator.as_str().to_string(),
            });
            last = separator.end();
        }
        runs.push(TextRun {
            text: text[last..].to_string(),
            separator: String::new(),
        });

        Ok(Self { path: None, runs })
    }

    /// Source path, if loaded from disk
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl TextSource for PlainTextDocument {
    fn runs(&self) -> &[TextRun] {
        &self.runs
    }
}

/// Apply entity tokens to runs by offset.
///
/// `entities` carry offsets into the text the runs join to, sorted and
/// non-overlapping as the engine produces them. The token goes where the
/// entity starts and the rest of its span is removed, even across run
/// separators. Text outside entities is untouched.
pub fn redact_runs(runs: &[TextRun], entities: &[Entity], tokens: &TokenTable) -> Vec<TextRun> {
    let mut offset = 0;
    runs.iter()
        .map(|run| {
            let text = redact_segment(&run.text, offset, entities, tokens);
            offset += run.text.len();
            let separator = redact_segment(&run.separator, offset, entities, tokens);
            offset += run.separator.len();
            TextRun { text, separator }
        })
        .collect()
}

/// Redact the part of the joined text that `segment` occupies from `base`
fn redact_segment(segment: &str, base: usize, entities: &[Entity], tokens: &TokenTable) -> String {
    let end = base + segment.len();
    let mut out = String::with_capacity(segment.len());
    let mut cursor = base;

    for entity in entities {
        if entity.is_empty() || entity.end <= cursor || entity.start >= end {
            continue;
        }
        let cut = entity.start.max(cursor);
        if let Some(kept) = segment.get(cursor - base..cut - base) {
            out.push_str(kept);
        }
        if entity.start >= base {
            out.push_str(&tokens.token_for(&entity.category));
        }
        cursor = entity.end.min(end);
    }

    if let Some(rest) = segment.get(cursor - base..) {
        out.push_str(rest);
    }
    out
}

/// Output path for a redacted copy: `<stem>_redacted.<ext>` beside the input
pub fn output_path_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let file_name = match input.extension() {
        Some(ext) => format!("{stem}_redacted.{}", ext.to_string_lossy()),
        None => format!("{stem}_redacted"),
    };
    input.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redaction::models::{DetectionMethod, PiiCategory};
    use crate::redaction::redactor::{RedactionStyle, Redactor};

    fn entity_at(full: &str, text: &str, category: PiiCategory) -> Entity {
        let start = full.find(text).unwrap();
        Entity::new(text, category, start, start + text.len(), DetectionMethod::Pattern)
    }

    #[test]
    fn test_paragraph_runs_round_trip() {
        let text = "Dear team,\n\nJane Doe called.\r\n  \r\nThanks\n";
        let document = PlainTextDocument::from_text(text).unwrap();

        assert_eq!(document.runs().len(), 3);
        assert_eq!(document.runs()[0].text, "Dear team,");
        assert_eq!(document.runs()[1].text, "Jane Doe called.");
        assert_eq!(document.runs()[2].text, "Thanks\n");
        assert_eq!(document.full_text(), text);
    }

    #[test]
    fn test_redact_runs_by_offset() {
        let full = "Jane Doe and Jane\n\nmail jane@x.io";
        let document = PlainTextDocument::from_text(full).unwrap();
        let entities = vec![
            entity_at(full, "Jane Doe", PiiCategory::Name),
            entity_at(full, "jane@x.io", PiiCategory::Email),
        ];
        let tokens = TokenTable::new(RedactionStyle::Standard);

        let runs = redact_runs(document.runs(), &entities, &tokens);

        // only detected spans change; the second "Jane" was not detected
        assert_eq!(runs[0].text, "[NAME_REDACTED] and Jane");
        assert_eq!(runs[0].separator, "\n\n");
        assert_eq!(runs[1].text, "mail [EMAIL_REDACTED]");
        assert_eq!(
            render(&runs),
            Redactor::new(tokens.clone()).redact(full, &entities)
        );
    }

    #[test]
    fn test_entity_spanning_paragraphs_is_fully_removed() {
        let full = "Notes follow. Sarah Jenkins\n\n(CEO, J-Tech Solutions) approved it.";
        let document = PlainTextDocument::from_text(full).unwrap();
        let entities = vec![entity_at(
            full,
            "Sarah Jenkins\n\n(CEO, J-Tech Solutions)",
            PiiCategory::NameWithTitle,
        )];
        let tokens = TokenTable::new(RedactionStyle::Standard);

        let runs = redact_runs(document.runs(), &entities, &tokens);
        let written = render(&runs);

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "Notes follow. [NAME_REDACTED] (TITLE_REDACTED)");
        assert_eq!(runs[0].separator, "");
        assert_eq!(runs[1].text, " approved it.");
        assert_eq!(written, Redactor::new(tokens).redact(full, &entities));
        assert!(!written.contains("Jenkins"));
        assert!(!written.contains("J-Tech"));
    }

    #[test]
    fn test_output_path_for() {
        assert_eq!(
            output_path_for(Path::new("/tmp/notes/report.txt")),
            PathBuf::from("/tmp/notes/report_redacted.txt")
        );
        assert_eq!(
            output_path_for(Path::new("README")),
            PathBuf::from("README_redacted")
        );
    }
}
