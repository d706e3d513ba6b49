use once_cell::sync::Lazy;
use regex::Regex;

static TITLE_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)title:").unwrap());
static DESCRIPTION_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)description:").unwrap());
static BACKSTORY_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)backstory:").unwrap());
static OTHER_LABEL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\n[ \t]*(?:title|description):").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedContent {
    pub title: String,
    pub description: String,
    pub backstory: String,
}

/// Pulls the labelled fields out of model output. Missing labels give empty fields.
pub fn parse_model_output(text: &str) -> ParsedContent {
    ParsedContent {
        title: field_after(text, &TITLE_LABEL, next_capitalized_line),
        description: field_after(text, &DESCRIPTION_LABEL, next_capitalized_line),
        backstory: field_after(text, &BACKSTORY_LABEL, |rest| {
            OTHER_LABEL_LINE.find(rest).map(|m| m.start())
        }),
    }
}

fn field_after(text: &str, label: &Regex, end_of: impl Fn(&str) -> Option<usize>) -> String {
    let Some(found) = label.find(text) else {
        return String::new();
    };
    let rest = text[found.end()..].trim_start();
    let end = end_of(rest).unwrap_or(rest.len());
    rest[..end].trim().to_string()
}

// Offset of the first newline that opens a line starting with A-Z.
fn next_capitalized_line(s: &str) -> Option<usize> {
    s.match_indices('\n')
        .map(|(i, _)| i)
        .find(|&i| s[i + 1..].starts_with(|c: char| c.is_ascii_uppercase()))
}
