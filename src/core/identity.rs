//! Identifier helpers: URL slugs and accession numbers generated from a mask

use chrono::NaiveDate;

/// Date fields a mask may reference with `%X`
const DATE_FIELDS: &[char] = &['Y', 'y', 'm', 'd', 'j', 'e', 'b', 'B', 'a', 'A'];

/// Turn free text into a lowercase, dash-separated slug
///
/// Runs of ASCII alphanumerics are kept; everything else collapses to a
/// single `-`. Returns `"untitled"` when nothing survives.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// Expand an accession mask into an identifier
///
/// Mask tokens:
/// - `%X` - date field `X` of `date` (Y, y, m, d, j, e, b, B, a, A); any
///   letters directly after the field are copied literally
/// - `#iii` - `counter`, zero-padded to the number of `i`s
/// - `#word` - the literal `word`
///
/// Everything else is copied verbatim, e.g. `%Y-#iii` gives `2024-007`.
pub fn generate_accession_identifier(mask: &str, counter: u64, date: NaiveDate) -> String {
    let mut out = String::with_capacity(mask.len() + 8);
    let mut chars = mask.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' && c != '#' {
            out.push(c);
            continue;
        }

        let mut word = String::new();
        while let Some(&next) = chars.peek() {
            if next.is_ascii_alphabetic() {
                word.push(next);
                chars.next();
            } else {
                break;
            }
        }

        if word.is_empty() {
            out.push(c);
            continue;
        }

        if c == '%' {
            let mut letters = word.chars();
            match letters.next() {
                Some(field) if DATE_FIELDS.contains(&field) => {
                    out.push_str(&date.format(&format!("%{}", field)).to_string());
                    out.extend(letters);
                }
                _ => {
                    out.push('%');
                    out.push_str(&word);
                }
            }
        } else if word.chars().all(|l| l == 'i') {
            out.push_str(&format!("{:0width$}", counter, width = word.len()));
        } else {
            out.push_str(&word);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_slugify_collapses_punctuation() {
        assert_eq!(slugify("Smith, John"), "smith-john");
        assert_eq!(slugify("  2011-04 / Box 3 "), "2011-04-box-3");
        assert_eq!(slugify("***"), "untitled");
    }

    #[test]
    fn test_default_mask() {
        assert_eq!(generate_accession_identifier("%Y-#iii", 7, day()), "2024-007");
    }

    #[test]
    fn test_counter_wider_than_padding() {
        assert_eq!(generate_accession_identifier("#ii", 1234, day()), "1234");
    }

    #[test]
    fn test_literal_words_and_date_fields() {
        assert_eq!(
            generate_accession_identifier("#ACC/%m%d/#iiii", 12, day()),
            "ACC/0309/0012"
        );
        assert_eq!(generate_accession_identifier("%Yx", 1, day()), "2024x");
    }

    #[test]
    fn test_unknown_tokens_are_kept() {
        assert_eq!(generate_accession_identifier("%Q-#", 1, day()), "%Q-#");
        assert_eq!(generate_accession_identifier("100%", 1, day()), "100%");
    }
}
