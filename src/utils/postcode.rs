use regex::Regex;

/// Extract the postcode area: the maximal leading run of letters, uppercased.
/// Input that does not start with a letter (including empty or whitespace)
/// yields an empty string, which matches no service area.
pub fn extract_prefix(postcode: &str) -> String {
    let upper = postcode.to_uppercase();
    let prefix_regex = Regex::new(r"^[A-Z]+").unwrap();

    prefix_regex
        .find(&upper)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
