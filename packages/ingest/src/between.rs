//! Parsing a bylaw's free-text "between" field into two cross streets.
//!
//! The dumps describe a bylaw's extent as `"<street A> and <street B>"`,
//! sometimes with a directional qualifier clause (`"the west end of
//! Abbs Street"`). The qualifier is discarded: everything after the
//! first `"of"` is the street name.

/// Splits a "between" field into its two cross street names.
///
/// Returns `None` unless the text splits into exactly two parts on the
/// literal separator `" and "`. Capitalization is left alone — matching
/// against known highways is the resolver's job, and it is
/// case-insensitive.
#[must_use]
pub fn parse_between(between: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = between.split(" and ").collect();
    if parts.len() != 2 {
        return None;
    }
    Some((strip_qualifier(parts[0]), strip_qualifier(parts[1])))
}

/// Reduces a qualifier clause to its street name.
///
/// `"the west end of Abbs Street"` → `"Abbs Street"`. Parts without an
/// `" of "` clause are returned trimmed.
fn strip_qualifier(part: &str) -> String {
    if part.contains(" of ") {
        match part.split_once("of") {
            Some((_, street)) => street.trim().to_string(),
            None => part.trim().to_string(),
        }
    } else {
        part.trim().to_string()
    }
}
