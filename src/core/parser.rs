//! Record parser
//!
//! Reads one stored document back into a [`StoredRecord`]. Parsing is an
//! explicit state machine over the block events from
//! [`markdown::tokenize`](super::markdown::tokenize):
//!
//! ```text
//! None ──Question──▶ InQuestion ──Answer──▶ InAnswer ──rule──▶ Done
//!   ▲                    │  ▲                   │
//!   └────────────────────┴──┴─── marker ────────┘
//! ```
//!
//! Never fails: missing sections come back as empty strings.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::markdown::{tokenize, Block};
use super::record::{Markers, StoredRecord};

static FALLBACK_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#[ \t]+(.+)$").expect("valid title regex"));

/// Parser position within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    None,
    InQuestion,
    InAnswer,
    /// A rule closed the Answer section; remaining events are ignored
    Done,
}

/// Section state machine
#[derive(Debug)]
pub struct SectionMachine<'m> {
    markers: &'m Markers,
    cursor: Cursor,
    buffer: Vec<String>,
    title: Option<String>,
    question: String,
    answer: String,
}

/// Result of running the machine over a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSections {
    pub title: Option<String>,
    pub question: String,
    pub answer: String,
}

impl<'m> SectionMachine<'m> {
    pub fn new(markers: &'m Markers) -> Self {
        Self {
            markers,
            cursor: Cursor::None,
            buffer: Vec::new(),
            title: None,
            question: String::new(),
            answer: String::new(),
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Feed one event
    pub fn feed(&mut self, block: &Block) {
        match block {
            Block::Heading { level, text, raw } => self.on_heading(*level, text, raw),
            Block::Paragraph(text) => self.on_paragraph(text),
            Block::Code(raw) => self.on_code(raw),
            Block::Rule => self.on_rule(),
        }
    }

    /// Only level-1 headings can be markers; shifted caller headings are
    /// level 2 or deeper and fall through to body text.
    pub fn on_heading(&mut self, level: usize, text: &str, raw: &str) {
        if self.cursor == Cursor::Done {
            return;
        }

        if level == 1 && self.markers.is_question(text) {
            self.enter(Cursor::InQuestion);
        } else if level == 1 && self.markers.is_answer(text) {
            self.enter(Cursor::InAnswer);
        } else if self.cursor == Cursor::None {
            if level == 1 && self.title.is_none() && !text.is_empty() {
                self.title = Some(text.to_string());
            }
        } else {
            self.buffer.push(raw.trim().to_string());
        }
    }

    pub fn on_paragraph(&mut self, text: &str) {
        if !self.in_section() {
            return;
        }
        let text = text.trim();
        if !text.is_empty() {
            self.buffer.push(text.to_string());
        }
    }

    pub fn on_code(&mut self, raw: &str) {
        if self.in_section() {
            self.buffer.push(raw.to_string());
        }
    }

    /// A rule ends the Answer section and the document; elsewhere it is ignored.
    pub fn on_rule(&mut self) {
        if self.cursor == Cursor::InAnswer {
            self.flush();
            self.cursor = Cursor::Done;
        }
    }

    /// Flush whatever section is still open
    pub fn finish(mut self) -> ParsedSections {
        self.flush();
        ParsedSections {
            title: self.title,
            question: self.question,
            answer: self.answer,
        }
    }

    fn in_section(&self) -> bool {
        matches!(self.cursor, Cursor::InQuestion | Cursor::InAnswer)
    }

    fn enter(&mut self, next: Cursor) {
        self.flush();
        self.cursor = next;
    }

    /// Overwrites the target field, so a repeated marker keeps the last section.
    fn flush(&mut self) {
        let text = self.buffer.join("\n").trim().to_string();
        self.buffer.clear();
        match self.cursor {
            Cursor::InQuestion => self.question = text,
            Cursor::InAnswer => self.answer = text,
            Cursor::None | Cursor::Done => {}
        }
    }
}

/// Parse a stored document
pub fn parse_sections(document: &str, markers: &Markers) -> ParsedSections {
    let mut machine = SectionMachine::new(markers);
    for block in tokenize(document) {
        machine.feed(&block);
        if machine.cursor() == Cursor::Done {
            break;
        }
    }
    machine.finish()
}

/// Parse a stored document into a record
///
/// Title resolution: first non-marker level-1 heading before any section,
/// else the first `# ` line anywhere in the raw text, else the filename.
pub fn parse_record(
    document: &str,
    filename: &str,
    timestamp: DateTime<Utc>,
    markers: &Markers,
) -> StoredRecord {
    let sections = parse_sections(document, markers);

    let title = sections
        .title
        .filter(|t| !t.is_empty())
        .or_else(|| fallback_title(document))
        .unwrap_or_else(|| filename.to_string());

    StoredRecord {
        filename: filename.to_string(),
        title,
        question: sections.question,
        answer: sections.answer,
        timestamp,
        sources: Vec::new(),
    }
}

fn fallback_title(document: &str) -> Option<String> {
    FALLBACK_TITLE_RE
        .captures(document)
        .map(|caps| caps[1].trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-15T14:30:22.123456Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn parse(doc: &str) -> StoredRecord {
        parse_record(doc, "20240115_143022_123456_message.md", ts(), &Markers::default())
    }

    #[test]
    fn test_canonical_document() {
        let record = parse("# Pergunta\n\nWhat is X?\n\n# Resposta\n\nX is Y.\n");
        assert_eq!(record.question, "What is X?");
        assert_eq!(record.answer, "X is Y.");
        assert_eq!(record.timestamp, ts());
        assert_eq!(record.filename, "20240115_143022_123456_message.md");
    }

    #[test]
    fn test_title_heading_before_sections() {
        let record = parse("# Deploy notes\n\n# Pergunta\n\nQ\n\n# Resposta\n\nA\n");
        assert_eq!(record.title, "Deploy notes");
        assert_eq!(record.question, "Q");
        assert_eq!(record.answer, "A");
    }

    #[test]
    fn test_first_title_wins() {
        let record = parse("# First\n\n# Second\n\n# Pergunta\n\nQ\n");
        assert_eq!(record.title, "First");
    }

    #[test]
    fn test_fallback_title_is_first_hash_line() {
        // no non-marker heading: the raw scan finds the marker line itself
        let record = parse("# Pergunta\n\nQ\n\n# Resposta\n\nA\n");
        assert_eq!(record.title, "Pergunta");
    }

    #[test]
    fn test_title_defaults_to_filename() {
        let record = parse("just some text\n");
        assert_eq!(record.title, "20240115_143022_123456_message.md");
        assert_eq!(record.question, "");
        assert_eq!(record.answer, "");
    }

    #[test]
    fn test_paragraphs_joined_with_newline() {
        let record = parse("# Pergunta\n\np1\n\np2\n\n# Resposta\n\na1\nstill a1\n\na2\n");
        assert_eq!(record.question, "p1\np2");
        assert_eq!(record.answer, "a1\nstill a1\na2");
    }

    #[test]
    fn test_shifted_subheadings_kept_verbatim() {
        let record = parse("# Pergunta\n\nQ\n\n# Resposta\n\n## Resposta\n\nbody\n\n### Steps\n\n1. one\n");
        assert_eq!(record.answer, "## Resposta\nbody\n### Steps\n1. one");
    }

    #[test]
    fn test_rule_terminates_answer() {
        let record = parse("# Pergunta\n\nQ\n\n# Resposta\n\nA\n\n---\n\nfooter\n\n# Pergunta\n\nignored\n");
        assert_eq!(record.answer, "A");
        assert_eq!(record.question, "Q");
    }

    #[test]
    fn test_rule_in_question_is_ignored() {
        let record = parse("# Pergunta\n\nQ1\n\n***\n\nQ2\n\n# Resposta\n\nA\n");
        assert_eq!(record.question, "Q1\nQ2");
        assert_eq!(record.answer, "A");
    }

    #[test]
    fn test_missing_rule_flushes_at_end() {
        let record = parse("# Pergunta\n\nQ\n\n# Resposta\n\nfirst\n\nsecond");
        assert_eq!(record.answer, "first\nsecond");
    }

    #[test]
    fn test_repeated_question_keeps_last() {
        let record = parse("# Pergunta\n\nold\n\n# Pergunta\n\nnew\n\n# Resposta\n\nA\n");
        assert_eq!(record.question, "new");
    }

    #[test]
    fn test_answer_only() {
        let record = parse("# Resposta\n\nA\n");
        assert_eq!(record.question, "");
        assert_eq!(record.answer, "A");
    }

    #[test]
    fn test_question_only() {
        let record = parse("# Pergunta\n\nQ\n");
        assert_eq!(record.question, "Q");
        assert_eq!(record.answer, "");
    }

    #[test]
    fn test_legacy_colon_marker() {
        let record = parse("# Pergunta:\n\nQ\n\n# Resposta\n\nA\n");
        assert_eq!(record.question, "Q");
        assert_eq!(record.answer, "A");
    }

    #[test]
    fn test_deeper_marker_text_is_not_a_marker() {
        let record = parse("# Pergunta\n\nQ\n\n## Resposta\n\nstill question\n");
        assert_eq!(record.question, "Q\n## Resposta\nstill question");
        assert_eq!(record.answer, "");
    }

    #[test]
    fn test_code_block_kept_in_answer() {
        let record = parse("# Pergunta\n\nQ\n\n# Resposta\n\n```\n---\n```\n\nafter\n");
        assert_eq!(record.answer, "```\n---\n```\nafter");
    }

    #[test]
    fn test_content_before_sections_ignored() {
        let record = parse("preamble\n\n## sub\n\n# Pergunta\n\nQ\n");
        assert_eq!(record.question, "Q");
    }

    #[test]
    fn test_custom_markers() {
        let markers = Markers::new("Question", "Answer");
        let record = parse_record("# Question\n\nQ\n\n# Answer\n\nA\n", "f.md", ts(), &markers);
        assert_eq!(record.question, "Q");
        assert_eq!(record.answer, "A");
    }

    #[test]
    fn test_machine_transitions() {
        let markers = Markers::default();
        let mut machine = SectionMachine::new(&markers);
        assert_eq!(machine.cursor(), Cursor::None);

        machine.on_rule();
        assert_eq!(machine.cursor(), Cursor::None);

        machine.on_heading(1, "Pergunta", "# Pergunta");
        assert_eq!(machine.cursor(), Cursor::InQuestion);

        machine.on_heading(1, "Resposta", "# Resposta");
        assert_eq!(machine.cursor(), Cursor::InAnswer);

        machine.on_paragraph("A");
        machine.on_rule();
        assert_eq!(machine.cursor(), Cursor::Done);

        machine.on_heading(1, "Pergunta", "# Pergunta");
        assert_eq!(machine.cursor(), Cursor::Done);

        let sections = machine.finish();
        assert_eq!(sections.answer, "A");
    }

    #[test]
    fn test_garbage_never_panics() {
        for doc in ["", "\n\n", "#", "# \n", "```", "---", "# Resposta\n---", "\u{0}\u{feff}#"] {
            let _ = parse(doc);
        }
    }
}
