use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

// "in Springfield", "from Jaipur, Rajasthan"; capitalized words only.
static PLACE_PHRASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(in|from)\s+[A-Z][a-zA-Z]+(?:,\s*[A-Z][a-zA-Z]+)?").unwrap());

/// Rewrites place phrases to the artisan's real location and, if the location
/// is still not mentioned, appends a closing sentence naming it.
///
/// With an empty location the backstory is returned untouched.
pub fn ensure_location(backstory: &str, location: &str) -> String {
    if location.is_empty() {
        return backstory.to_string();
    }

    let replacement = format!("in {location}");
    let mut result = PLACE_PHRASE.replace_all(backstory, NoExpand(&replacement)).into_owned();

    if !result.to_lowercase().contains(&location.to_lowercase()) {
        result.push_str(&format!("\n\nThis product is lovingly made in {location}."));
    }
    result
}
