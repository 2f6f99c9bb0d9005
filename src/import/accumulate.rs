//! Value accumulation: many source columns folded into one text field

/// Append `text`, putting a line break first only when `acc` already has content
///
/// Empty `text` leaves `acc` untouched.
pub fn append_with_line_break_if_needed(acc: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !acc.is_empty() {
        acc.push('\n');
    }
    acc.push_str(text);
}

/// Column map transform form of [`append_with_line_break_if_needed`]
pub fn appended(current: &str, text: &str) -> String {
    let mut out = current.to_string();
    append_with_line_break_if_needed(&mut out, text);
    out
}

/// Append `<prefix><value>` when `value` is not blank
pub fn append_prefixed(acc: &mut String, prefix: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    append_with_line_break_if_needed(acc, &format!("{}{}", prefix, value));
}

/// Look up the prefix configured for a column
pub fn prefix_for<'a>(columns: &[(&str, &'a str)], column: &str) -> Option<&'a str> {
    columns
        .iter()
        .find(|(name, _)| *name == column)
        .map(|(_, prefix)| *prefix)
}
