//! Person name validation.
//!
//! Generated names are shown verbatim on register, note and report screens,
//! so they are held to a small display-safe alphabet.
//!
//! # Validation Rules
//!
//! - Length between [`PERSON_NAME_MIN`] and [`PERSON_NAME_MAX`] characters
//! - Letters, spaces, apostrophes and hyphens only
//! - Must start and end with a letter
//! - No two consecutive spaces

/// Minimum allowed length for a person name.
pub const PERSON_NAME_MIN: usize = 3;

/// Maximum allowed length for a person name.
pub const PERSON_NAME_MAX: usize = 48;

/// Validates a person name.
///
/// # Examples
///
/// ```
/// use example_data::is_valid_person_name;
///
/// assert!(is_valid_person_name("Ada Lovelace"));
/// assert!(is_valid_person_name("Siobhan O'Brien"));
/// assert!(is_valid_person_name("Marie-Claire Dubois"));
/// assert!(!is_valid_person_name("Al"));          // Too short
/// assert!(!is_valid_person_name("user_123"));    // Invalid characters
/// assert!(!is_valid_person_name(" Ada"));        // Leading space
/// ```
#[must_use]
pub fn is_valid_person_name(name: &str) -> bool {
    let length = name.chars().count();
    if !(PERSON_NAME_MIN..=PERSON_NAME_MAX).contains(&length) {
        return false;
    }
    let starts_with_letter = name.chars().next().is_some_and(char::is_alphabetic);
    let ends_with_letter = name.chars().last().is_some_and(char::is_alphabetic);
    starts_with_letter
        && ends_with_letter
        && !name.contains("  ")
        && name.chars().all(is_valid_person_name_char)
}

fn is_valid_person_name_char(c: char) -> bool {
    c.is_alphabetic() || matches!(c, ' ' | '\'' | '-')
}

/// Drops disallowed characters and collapses runs of whitespace.
///
/// Length is not enforced.
#[must_use]
pub(crate) fn sanitize_person_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| is_valid_person_name_char(*c))
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Ada")]
    #[case("Ada Lovelace")]
    #[case("Siobhan O'Brien")]
    #[case("Marie-Claire Dubois")]
    #[case("Zoë Müller")]
    fn accepts_names(#[case] name: &str) {
        assert!(is_valid_person_name(name));
    }

    #[rstest]
    #[case::too_short("Al")]
    #[case::empty("")]
    #[case::digits("Ada 2")]
    #[case::underscore("ada_lovelace")]
    #[case::leading_space(" Ada")]
    #[case::trailing_hyphen("Ada-")]
    #[case::double_space("Ada  Lovelace")]
    #[case::whitespace_only("   ")]
    fn rejects_names(#[case] name: &str) {
        assert!(!is_valid_person_name(name));
    }

    #[test]
    fn enforces_length_bounds() {
        assert!(is_valid_person_name(&"A".repeat(PERSON_NAME_MIN)));
        assert!(is_valid_person_name(&"A".repeat(PERSON_NAME_MAX)));
        assert!(!is_valid_person_name(&"A".repeat(PERSON_NAME_MAX + 1)));
    }

    #[rstest]
    #[case("O'Brien", "O'Brien")]
    #[case("Ada  Lovelace", "Ada Lovelace")]
    #[case("Jean-Luc 2nd", "Jean-Luc nd")]
    #[case("Dr. Who?", "Dr Who")]
    #[case(" 42 Ada ", "Ada")]
    fn sanitize_keeps_allowed_characters(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(sanitize_person_name(raw), expected);
    }
}
