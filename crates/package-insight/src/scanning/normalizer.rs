/// Trim, uppercase and drop everything that is not an ASCII letter or digit.
///
/// Lossy on purpose: GS1 group separators, parentheses around AIs and spaces all
/// disappear here, and every downstream strategy only ever sees this form.
pub(crate) fn clean_payload(raw: &str) -> String {
    raw.trim()
        .to_uppercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}
