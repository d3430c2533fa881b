//! Markdown block tokenizer
//!
//! Flattens a document into the block events the record parser needs:
//! ATX headings, paragraphs, fenced code and thematic breaks. Inline markup
//! is left as raw text.
//!
//! Differences from full CommonMark:
//! - Setext underlines stay part of the paragraph they follow, so a `---`
//!   under text is never a thematic break.
//! - A column-0 level-1 heading line closes an open code fence. Shifted
//!   caller content never contains such a line, so an unbalanced fence in a
//!   question cannot swallow the Answer marker.
//! - Lists, block quotes and indented code are read as paragraph text.

use once_cell::sync::Lazy;
use regex::Regex;

static ATX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?[ \t]*$").expect("valid atx heading regex")
});

static CLOSING_HASHES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[ \t]+)#+$").expect("valid closing sequence regex"));

static RULE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ {0,3}(?:(?:\*[ \t]*){3,}|(?:-[ \t]*){3,}|(?:_[ \t]*){3,})$")
        .expect("valid thematic break regex")
});

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})").expect("valid fence regex"));

/// One structural event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// ATX heading with its trimmed text and the original source line
    Heading {
        level: usize,
        text: String,
        raw: String,
    },
    /// Consecutive non-blank lines, joined with `\n`
    Paragraph(String),
    /// Fenced code block including its fence lines
    Code(String),
    /// Thematic break (`---`, `***`, `___`)
    Rule,
}

struct OpenFence {
    marker: char,
    len: usize,
    lines: Vec<String>,
}

/// Split a document into block events
pub fn tokenize(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut fence: Option<OpenFence> = None;

    for line in text.lines() {
        if let Some(open) = fence.as_mut() {
            if is_fence_close(line, open.marker, open.len) {
                open.lines.push(line.to_string());
                if let Some(done) = fence.take() {
                    blocks.push(Block::Code(done.lines.join("\n")));
                }
                continue;
            }
            if !is_top_level_heading(line) {
                open.lines.push(line.to_string());
                continue;
            }
            if let Some(done) = fence.take() {
                blocks.push(Block::Code(done.lines.join("\n")));
            }
        }

        if line.trim().is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            continue;
        }

        if let Some(heading) = parse_atx(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(heading);
            continue;
        }

        if let Some(caps) = FENCE_RE.captures(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            let run = &caps[1];
            fence = Some(OpenFence {
                marker: run.chars().next().unwrap_or('`'),
                len: run.len(),
                lines: vec![line.to_string()],
            });
            continue;
        }

        if RULE_RE.is_match(line) {
            // `---` directly under text is a setext underline
            let setext = !paragraph.is_empty() && line.trim_start().starts_with('-');
            if !setext {
                flush_paragraph(&mut paragraph, &mut blocks);
                blocks.push(Block::Rule);
                continue;
            }
        }

        paragraph.push(line);
    }

    if let Some(done) = fence.take() {
        blocks.push(Block::Code(done.lines.join("\n")));
    }
    flush_paragraph(&mut paragraph, &mut blocks);

    blocks
}

fn flush_paragraph(lines: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if lines.is_empty() {
        return;
    }
    let text = lines.join("\n").trim().to_string();
    lines.clear();
    if !text.is_empty() {
        blocks.push(Block::Paragraph(text));
    }
}

fn parse_atx(line: &str) -> Option<Block> {
    let caps = ATX_RE.captures(line)?;
    let level = caps[1].len();
    let content = caps.get(2).map_or("", |m| m.as_str());
    let text = CLOSING_HASHES_RE.replace(content, "").trim().to_string();

    Some(Block::Heading {
        level,
        text,
        raw: line.trim_end().to_string(),
    })
}

fn is_top_level_heading(line: &str) -> bool {
    line.starts_with("# ") || line.starts_with("#\t")
}

fn is_fence_close(line: &str, marker: char, len: usize) -> bool {
    let trimmed = line.trim();
    let run = trimmed.chars().take_while(|c| *c == marker).count();
    run >= len && run == trimmed.chars().count() && line.len() - line.trim_start().len() <= 3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(level: usize, text: &str, raw: &str) -> Block {
        Block::Heading {
            level,
            text: text.to_string(),
            raw: raw.to_string(),
        }
    }

    fn para(text: &str) -> Block {
        Block::Paragraph(text.to_string())
    }

    #[test]
    fn test_canonical_document() {
        let doc = "# Pergunta\n\nWhat is X?\n\n# Resposta\n\nX is Y.\n";
        assert_eq!(
            tokenize(doc),
            vec![
                heading(1, "Pergunta", "# Pergunta"),
                para("What is X?"),
                heading(1, "Resposta", "# Resposta"),
                para("X is Y."),
            ]
        );
    }

    #[test]
    fn test_heading_levels_and_closing_hashes() {
        let blocks = tokenize("### Deep ###\n####### seven");
        assert_eq!(blocks[0], heading(3, "Deep", "### Deep ###"));
        // seven hashes is not a heading
        assert_eq!(blocks[1], para("####### seven"));
    }

    #[test]
    fn test_empty_heading() {
        assert_eq!(tokenize("#"), vec![heading(1, "", "#")]);
    }

    #[test]
    fn test_heading_interrupts_paragraph() {
        let blocks = tokenize("line one\n## Sub\nline two");
        assert_eq!(
            blocks,
            vec![para("line one"), heading(2, "Sub", "## Sub"), para("line two")]
        );
    }

    #[test]
    fn test_multiline_paragraph() {
        assert_eq!(tokenize("a\nb\n  c  \n"), vec![para("a\nb\n  c")]);
    }

    #[test]
    fn test_rules() {
        for rule in ["---", "***", "___", " - - -", "*  *  *"] {
            assert_eq!(tokenize(rule), vec![Block::Rule], "{:?}", rule);
        }
        assert_eq!(tokenize("--"), vec![para("--")]);
    }

    #[test]
    fn test_setext_underline_is_not_a_rule() {
        assert_eq!(tokenize("Title\n---\nafter"), vec![para("Title\n---\nafter")]);
        assert_eq!(
            tokenize("Title\n\n---\nafter"),
            vec![para("Title"), Block::Rule, para("after")]
        );
    }

    #[test]
    fn test_star_rule_interrupts_paragraph() {
        assert_eq!(tokenize("text\n***"), vec![para("text"), Block::Rule]);
    }

    #[test]
    fn test_fenced_code_hides_structure() {
        let doc = "```\n---\n## not a heading\n\nstill code\n```\nafter";
        assert_eq!(
            tokenize(doc),
            vec![
                Block::Code("```\n---\n## not a heading\n\nstill code\n```".to_string()),
                para("after"),
            ]
        );
    }

    #[test]
    fn test_fence_needs_matching_marker() {
        let doc = "~~~~\n```\n~~~\n~~~~";
        assert_eq!(tokenize(doc), vec![Block::Code(doc.to_string())]);
    }

    #[test]
    fn test_unclosed_fence_closed_by_top_level_heading() {
        let doc = "```rust\nfn main() {}\n# Resposta\n\nanswer";
        assert_eq!(
            tokenize(doc),
            vec![
                Block::Code("```rust\nfn main() {}".to_string()),
                heading(1, "Resposta", "# Resposta"),
                para("answer"),
            ]
        );
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        assert_eq!(
            tokenize("```\ncode\n## x"),
            vec![Block::Code("```\ncode\n## x".to_string())]
        );
    }

    #[test]
    fn test_crlf_input() {
        assert_eq!(
            tokenize("# Pergunta\r\n\r\nQ\r\n"),
            vec![heading(1, "Pergunta", "# Pergunta"), para("Q")]
        );
    }
}
