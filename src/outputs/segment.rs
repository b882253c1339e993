//! Splitting summary text into renderable blocks.
//!
//! Rules, applied line by line after `\r\n` is normalized to `\n`:
//!
//! 1. A blank (or whitespace-only) line ends the current block.
//! 2. A line of one to six `#` followed by whitespace and text is a
//!    [`Segment::Heading`]; the hashes and surrounding whitespace are dropped.
//!    A bare run of hashes with no text is ignored.
//! 3. A line starting with `-`, `*`, `•` or `N.`/`N)` followed by whitespace
//!    is a bullet. Consecutive bullets form one [`Segment::Bullets`] list,
//!    with markers stripped.
//! 4. Any other consecutive lines form one [`Segment::Paragraph`], joined
//!    with `\n`. Switching between bullets and plain lines starts a new block.
//!
//! Seven or more `#` are not a heading and fall through to rule 4.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}(?:\s+(.*))?$").unwrap());
static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[-*•]|\d+[.)])\s+(.*)$").unwrap());
static MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*•]\s").unwrap());

/// True when `line` opens with a `-`, `*` or `•` marker followed by whitespace.
///
/// `**bold**` and `-5%` do not count.
pub fn starts_with_bullet_marker(line: &str) -> bool {
    MARKER.is_match(line)
}

/// One renderable block of a summary.
///
/// Serializes as `{"kind": "heading" | "bullets" | "paragraph", "content": ...}`
/// so the browser can switch on `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Segment {
    Heading(String),
    Bullets(Vec<String>),
    Paragraph(String),
}

enum Pending {
    None,
    Bullets(Vec<String>),
    Paragraph(Vec<String>),
}

impl Pending {
    fn flush(&mut self, out: &mut Vec<Segment>) {
        match std::mem::replace(self, Pending::None) {
            Pending::None => {}
            Pending::Bullets(items) => out.push(Segment::Bullets(items)),
            Pending::Paragraph(lines) => out.push(Segment::Paragraph(lines.join("\n"))),
        }
    }
}

/// Split summary text into blocks using the rules in the module docs.
///
/// # Arguments
/// * `text` - The summary as shown to the user, possibly with `\r\n` endings.
///
/// # Returns
/// The blocks in source order. Empty input gives an empty vector.
pub fn segment_summary(text: &str) -> Vec<Segment> {
    let normalized = text.replace("\r\n", "\n");
    let mut out = Vec::new();
    let mut pending = Pending::None;

    for raw in normalized.lines() {
        let line = raw.trim();
        if line.is_empty() {
            pending.flush(&mut out);
            continue;
        }

        // Lines of only '#' beyond six fail the regex and are treated as text.
        if let Some(caps) = HEADING.captures(line) {
            pending.flush(&mut out);
            let title = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            if !title.is_empty() {
                out.push(Segment::Heading(title.to_string()));
            }
            continue;
        }

        if let Some(caps) = BULLET.captures(line) {
            let item = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            match &mut pending {
                Pending::Bullets(items) => items.push(item.to_string()),
                _ => {
                    pending.flush(&mut out);
                    pending = Pending::Bullets(vec![item.to_string()]);
                }
            }
            continue;
        }

        match &mut pending {
            Pending::Paragraph(lines) => lines.push(line.to_string()),
            _ => {
                pending.flush(&mut out);
                pending = Pending::Paragraph(vec![line.to_string()]);
            }
        }
    }

    pending.flush(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_bullets_and_paragraphs() {
        let text = "## EHR News\n• Epic shipped an update\n• Oracle Health layoffs\n\n\
                    # AI in Healthcare\nAmbient scribes keep spreading.\nAdoption is up.\n";
        assert_eq!(
            segment_summary(text),
            vec![
                Segment::Heading("EHR News".into()),
                Segment::Bullets(vec![
                    "Epic shipped an update".into(),
                    "Oracle Health layoffs".into()
                ]),
                Segment::Heading("AI in Healthcare".into()),
                Segment::Paragraph("Ambient scribes keep spreading.\nAdoption is up.".into()),
            ]
        );
    }

    #[test]
    fn test_blank_lines_split_lists() {
        let segments = segment_summary("- a\n- b\n\n- c\r\n");
        assert_eq!(
            segments,
            vec![
                Segment::Bullets(vec!["a".into(), "b".into()]),
                Segment::Bullets(vec!["c".into()]),
            ]
        );
    }

    #[test]
    fn test_numbered_and_mixed_blocks() {
        let segments = segment_summary("Intro line\n1. first\n2) second\nOutro");
        assert_eq!(
            segments,
            vec![
                Segment::Paragraph("Intro line".into()),
                Segment::Bullets(vec!["first".into(), "second".into()]),
                Segment::Paragraph("Outro".into()),
            ]
        );
    }

    #[test]
    fn test_not_headings() {
        assert_eq!(
            segment_summary("#hashtag trends\n####### deep"),
            vec![Segment::Paragraph("#hashtag trends\n####### deep".into())]
        );
        assert_eq!(segment_summary("##\n"), vec![]);
    }

    #[test]
    fn test_dash_without_space_is_text() {
        assert_eq!(
            segment_summary("-5% margin"),
            vec![Segment::Paragraph("-5% margin".into())]
        );
    }

    #[test]
    fn test_marker_needs_trailing_whitespace() {
        assert!(starts_with_bullet_marker("- a"));
        assert!(starts_with_bullet_marker("* a"));
        assert!(starts_with_bullet_marker("• a"));
        assert!(!starts_with_bullet_marker("**EHR News**"));
        assert!(!starts_with_bullet_marker("-5% margin"));
        assert!(!starts_with_bullet_marker("1. numbered"));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(Segment::Heading("EHR".into())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "heading", "content": "EHR"}));
    }
}
