//! Input validation helpers
//!
//! Every request DTO implements [`Validate`]; handlers call it before handing
//! the input to a service so that services only ever see well-formed data.

use chrono::NaiveDate;
use unicode_normalization::UnicodeNormalization;

use super::DomainError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub trait Validate {
    fn validate(&self) -> Result<(), DomainError>;
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, DomainError> {
    // chrono accepts single-digit months/days, so check the shape first
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(DomainError::validation(format!(
            "{} must be formatted as YYYY-MM-DD",
            field
        )));
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| DomainError::validation(format!("{} is not a valid date", field)))
}

pub fn validate_date_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), DomainError> {
    let start_date = parse_date("start_date", start)?;
    let end_date = parse_date("end_date", end)?;
    if end_date < start_date {
        return Err(DomainError::validation(
            "end_date must not be before start_date",
        ));
    }
    Ok((start_date, end_date))
}

fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF   // pictographs, emoticons, transport, flags
            | 0x2600..=0x27BF // misc symbols, dingbats
            | 0x2B00..=0x2BFF // arrows and stars
            | 0x3030 | 0x303D
            | 0x200D          // zero width joiner
            | 0xFE0F          // emoji presentation selector
    )
}

pub fn contains_emoji(value: &str) -> bool {
    value.chars().any(is_emoji)
}

/// Trimmed, non-blank, emoji-free text with a length in `min..=max` chars
pub fn validate_text(field: &str, value: &str, min: usize, max: usize) -> Result<(), DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{} is required", field)));
    }
    let len = trimmed.chars().count();
    if len < min || len > max {
        return Err(DomainError::validation(format!(
            "{} must be between {} and {} characters",
            field, min, max
        )));
    }
    if contains_emoji(trimmed) {
        return Err(DomainError::validation(format!(
            "{} must not contain emoji",
            field
        )));
    }
    Ok(())
}

pub fn validate_optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), DomainError> {
    match value {
        Some(v) if !v.trim().is_empty() => validate_text(field, v, 1, max),
        _ => Ok(()),
    }
}

/// Optional leading `+`, then 8 to 15 digits
pub fn validate_phone(field: &str, value: &str) -> Result<(), DomainError> {
    let digits = value.strip_prefix('+').unwrap_or(value);
    if !(8..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::validation(format!(
            "{} must be 8 to 15 digits",
            field
        )));
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), DomainError> {
    let invalid = || DomainError::validation("email is not a valid address");
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || value.chars().any(char::is_whitespace)
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(invalid());
    }
    Ok(())
}

/// URL-safe lowercase identifier: accents stripped, separators collapsed
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for c in value.nfd() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' || c == '/' || c == '&' {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_calendar_dates() {
        let date = parse_date("start_date", "2024-02-29").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn parse_date_rejects_bad_shapes_and_days() {
        for bad in ["2024-13-01", "2024-02-30", "01-02-2024", "2024-1-01", "", "2024/01/01"] {
            assert!(parse_date("d", bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn date_range_must_be_ordered() {
        assert!(validate_date_range("2024-01-01", "2024-01-01").is_ok());
        assert!(validate_date_range("2024-01-02", "2024-01-01").is_err());
    }

    #[test]
    fn detects_emoji() {
        assert!(contains_emoji("Kaos Polos 👕"));
        assert!(contains_emoji("sale ⭐"));
        assert!(contains_emoji("☕ kopi"));
        assert!(!contains_emoji("Kaos Polos Hitam"));
        assert!(!contains_emoji("Café Jakarta - 100%"));
    }

    #[test]
    fn validate_text_trims_and_bounds() {
        assert!(validate_text("name", "  Rumah  ", 3, 10).is_ok());
        assert!(validate_text("name", "   ", 1, 10).is_err());
        assert!(validate_text("name", "ab", 3, 10).is_err());
        assert!(validate_text("name", "Rumah 🏠", 1, 20).is_err());
    }

    #[test]
    fn phone_numbers() {
        assert!(validate_phone("phone", "081234567890").is_ok());
        assert!(validate_phone("phone", "+6281234567890").is_ok());
        assert!(validate_phone("phone", "0812-3456").is_err());
        assert!(validate_phone("phone", "1234567").is_err());
    }

    #[test]
    fn emails() {
        assert!(validate_email("budi@kedai.id").is_ok());
        assert!(validate_email("budi@kedai").is_err());
        assert!(validate_email("@kedai.id").is_err());
        assert!(validate_email("budi@@kedai.id").is_err());
        assert!(validate_email("bu di@kedai.id").is_err());
    }

    #[test]
    fn slugify_strips_accents_and_collapses_separators() {
        assert_eq!(slugify("Fashion Pria"), "fashion-pria");
        assert_eq!(slugify("  Élégant -- Café  "), "elegant-cafe");
        assert_eq!(slugify("Rumah & Dapur"), "rumah-dapur");
        assert_eq!(slugify("HP/Tablet"), "hp-tablet");
    }
}
