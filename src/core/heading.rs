//! Heading shifter
//!
//! Deepens every ATX heading in caller text by one level so that no caller
//! line can be read back as a level-1 section marker. Pure line transform:
//! no clamp at level 6, code fences are not special-cased, and the read path
//! never reverses it.

use once_cell::sync::Lazy;
use regex::Regex;

/// Up to three spaces of indent, hash run, whitespace, content.
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^( {0,3})(#+[ \t]+\S)").expect("valid heading regex"));

/// Prepend one `#` to each heading line, leaving other lines untouched
pub fn shift_headings(text: &str) -> String {
    text.split('\n')
        .map(|line| match HEADING_RE.captures(line) {
            Some(caps) => {
                let indent = caps.get(1).map_or(0, |m| m.end());
                format!("{}#{}", &line[..indent], &line[indent..])
            }
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
