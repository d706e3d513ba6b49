const SENTENCE_BREAK: &str = ". ";
const OPENER: &str = "This ";

const REPLACEMENTS: &[(&str, &str)] = &[
    ("This eco-friendly piece", "An eco-friendly piece"),
    ("This traditional design", "The traditional design"),
];

/// Rewrites stock phrases and drops the "This " opener from every sentence
/// after the first.
pub fn normalize_description(desc: &str) -> String {
    if desc.is_empty() {
        return String::new();
    }

    let mut text = desc.to_string();
    for (from, to) in REPLACEMENTS {
        text = text.replace(from, to);
    }

    text.split(SENTENCE_BREAK)
        .enumerate()
        .map(|(i, sentence)| if i == 0 { sentence.to_string() } else { drop_opener(sentence) })
        .collect::<Vec<_>>()
        .join(SENTENCE_BREAK)
        .trim()
        .to_string()
}

// The first sentence keeps its opener; later ones lose it.
fn drop_opener(sentence: &str) -> String {
    let body = sentence.trim_start();
    let indent = &sentence[..sentence.len() - body.len()];
    let mut body = body.to_string();
    while let Some(rest) = body.strip_prefix(OPENER) {
        body = capitalize_first(rest.trim_start());
    }
    format!("{indent}{body}")
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn later_sentences_lose_their_opener() {
        assert_eq!(normalize_description("This is red. This is round."), "This is red. Is round.");
    }

    #[test]
    fn stock_phrases_are_rewritten_everywhere() {
        assert_eq!(
            normalize_description("This eco-friendly piece is handmade."),
            "An eco-friendly piece is handmade."
        );
        assert_eq!(
            normalize_description("Lovely. This traditional design glows. This traditional design lasts."),
            "Lovely. The traditional design glows. The traditional design lasts."
        );
    }

    #[test]
    fn proper_nouns_keep_their_case() {
        assert_eq!(
            normalize_description("A vase. This piece from Jaipur shines."),
            "A vase. Piece from Jaipur shines."
        );
    }

    #[test]
    fn extra_spaces_after_opener_are_absorbed() {
        assert_eq!(normalize_description("A vase. This  bowl shines."), "A vase. Bowl shines.");
        assert_eq!(normalize_description(". This  This x"), ". X");
    }

    #[test]
    fn empty_and_whitespace_input() {
        assert_eq!(normalize_description(""), "");
        assert_eq!(normalize_description("  plain text  "), "plain text");
    }

    #[test]
    fn idempotent_on_its_own_output() {
        let samples = [
            "This is red. This is round.",
            "This eco-friendly piece is great. This This doubled. This this lower. ",
            "One. This . Two",
            "No openers here. Just text.",
            "This traditional design. This eco-friendly piece. This ",
            "A vase. This  bowl shines.",
            ". This  This x",
            "One. This \tthis  this two",
        ];
        for sample in samples {
            let once = normalize_description(sample);
            assert_eq!(normalize_description(&once), once, "{sample:?}");
        }
    }
}
