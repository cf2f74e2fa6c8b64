//! crates/bookscan_core/src/isbn.rs
//!
//! Pure ISBN checksum and normalization helpers. All functions are total
//! over strings: invalid or unrecognized input yields `false`/`None`,
//! never a panic. Only ASCII digits are considered.

/// Strips hyphens and whitespace, the separators barcode payloads and
/// hand-typed ISBNs carry.
fn strip_separators(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

/// Computes the ISBN-13 check digit over the first 12 characters of
/// `base`. Returns `None` unless `base` is exactly 12 ASCII digits.
fn isbn13_check_digit(base: &str) -> Option<char> {
    if base.len() != 12 || !base.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let sum: u32 = base
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let digit = u32::from(b - b'0');
            if i % 2 == 0 {
                digit
            } else {
                digit * 3
            }
        })
        .sum();
    let check = (10 - sum % 10) % 10;
    char::from_digit(check, 10)
}

/// Validates an ISBN-13 checksum. Separators are stripped first; anything
/// that is not exactly 13 ASCII digits fails.
pub fn validate_isbn13(s: &str) -> bool {
    let cleaned = strip_separators(s);
    if cleaned.len() != 13 || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match isbn13_check_digit(&cleaned[..12]) {
        Some(check) => cleaned.as_bytes()[12] == check as u8,
        None => false,
    }
}

/// Validates an ISBN-10 checksum. The final character may be `X`,
/// representing a check value of 10.
pub fn validate_isbn10(s: &str) -> bool {
    let cleaned = strip_separators(s);
    if cleaned.len() != 10 {
        return false;
    }
    let bytes = cleaned.as_bytes();
    if !bytes[..9].iter().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let check = match bytes[9] {
        b'X' => 10,
        b if b.is_ascii_digit() => u32::from(b - b'0'),
        _ => return false,
    };
    let sum: u32 = bytes[..9]
        .iter()
        .enumerate()
        .map(|(i, b)| u32::from(b - b'0') * (10 - i as u32))
        .sum::<u32>()
        + check;
    sum % 11 == 0
}

/// Converts a valid ISBN-10 to its ISBN-13 form by prefixing `978` and
/// recomputing the check digit. Returns `None` when the input is not a
/// valid ISBN-10.
pub fn convert_isbn10_to_isbn13(s: &str) -> Option<String> {
    if !validate_isbn10(s) {
        return None;
    }
    let cleaned = strip_separators(s);
    let mut base = String::with_capacity(13);
    base.push_str("978");
    base.push_str(&cleaned[..9]);
    let check = isbn13_check_digit(&base)?;
    base.push(check);
    Some(base)
}

/// Normalizes an arbitrary scanned or typed string to canonical 13-digit
/// form. Valid ISBN-13 input is returned as-is (separators stripped);
/// 10-character input is converted; everything else is `None` — no
/// best-effort repair.
pub fn normalize_isbn(s: &str) -> Option<String> {
    let cleaned = strip_separators(s);
    if cleaned.len() == 13 && validate_isbn13(&cleaned) {
        return Some(cleaned);
    }
    if cleaned.len() == 10 {
        return convert_isbn10_to_isbn13(&cleaned);
    }
    None
}

/// Extracts a canonical ISBN from a raw barcode payload.
///
/// Valid Bookland EAN-13 payloads (978/979 prefix) pass through. Valid
/// ISBN-10 payloads are returned as-is, unconverted: the scan path keys
/// on whatever the barcode actually said, unlike [`normalize_isbn`].
/// A 12-digit payload is treated as UPC-A with the check digit stripped:
/// a candidate ISBN-13 is synthesized from `978` plus the first nine
/// digits and returned only if it passes validation.
pub fn extract_isbn_from_barcode(raw: &str) -> Option<String> {
    let cleaned = strip_separators(raw);

    if (cleaned.starts_with("978") || cleaned.starts_with("979")) && validate_isbn13(&cleaned) {
        return Some(cleaned);
    }
    if validate_isbn10(&cleaned) {
        return Some(cleaned);
    }
    if cleaned.len() == 12 && cleaned.bytes().all(|b| b.is_ascii_digit()) {
        let mut candidate = String::with_capacity(13);
        candidate.push_str("978");
        candidate.push_str(&cleaned[..9]);
        let check = isbn13_check_digit(&candidate)?;
        candidate.push(check);
        if validate_isbn13(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_isbn13_checksum() {
        assert!(validate_isbn13("9780134190440"));
        assert!(validate_isbn13("9780306406157"));
        // Last digit off by one.
        assert!(!validate_isbn13("9780134190441"));
        assert!(!validate_isbn13("978013419044"));
        assert!(!validate_isbn13("97801341904400"));
        assert!(!validate_isbn13("978013419044a"));
        assert!(!validate_isbn13(""));
    }

    #[test]
    fn isbn13_validation_ignores_hyphens_and_spaces() {
        assert!(validate_isbn13("978-0-13-419044-0"));
        assert!(validate_isbn13(" 978 0134190440 "));
        assert_eq!(
            validate_isbn13("9780134190440"),
            validate_isbn13("978-01-34-19-04-40")
        );
    }

    #[test]
    fn validates_isbn10_checksum() {
        assert!(validate_isbn10("0134190440"));
        assert!(validate_isbn10("0-306-40615-2"));
        // X check digit represents the value 10.
        assert!(validate_isbn10("097522980X"));
        assert!(!validate_isbn10("0134190441"));
        assert!(!validate_isbn10("013419044"));
        assert!(!validate_isbn10("X134190440"));
    }

    #[test]
    fn converts_valid_isbn10_to_isbn13() {
        assert_eq!(
            convert_isbn10_to_isbn13("0134190440").as_deref(),
            Some("9780134190440")
        );
        let converted = convert_isbn10_to_isbn13("097522980X").unwrap();
        assert!(validate_isbn13(&converted));
        assert!(converted.starts_with("978097522980"));
    }

    #[test]
    fn conversion_rejects_invalid_isbn10() {
        assert_eq!(convert_isbn10_to_isbn13("0134190441"), None);
        assert_eq!(convert_isbn10_to_isbn13("notanisbn!"), None);
    }

    #[test]
    fn normalize_accepts_isbn13_and_converts_isbn10() {
        assert_eq!(
            normalize_isbn("978-0-13-419044-0").as_deref(),
            Some("9780134190440")
        );
        assert_eq!(
            normalize_isbn("0134190440").as_deref(),
            Some("9780134190440")
        );
        assert_eq!(normalize_isbn("9780134190441"), None);
        assert_eq!(normalize_isbn("12345"), None);
    }

    #[test]
    fn normalize_is_idempotent_on_its_own_output() {
        let once = normalize_isbn("0134190440").unwrap();
        assert_eq!(normalize_isbn(&once).as_deref(), Some(once.as_str()));
    }

    #[test]
    fn extract_passes_through_valid_bookland_ean13() {
        assert_eq!(
            extract_isbn_from_barcode("9780134190440").as_deref(),
            Some("9780134190440")
        );
    }

    #[test]
    fn extract_returns_isbn10_unconverted() {
        // The scan path keys on the literal payload; normalize_isbn is the
        // one that converts. Both behaviors are pinned here.
        assert_eq!(
            extract_isbn_from_barcode("0134190440").as_deref(),
            Some("0134190440")
        );
        assert_eq!(
            normalize_isbn("0134190440").as_deref(),
            Some("9780134190440")
        );
    }

    #[test]
    fn extract_synthesizes_isbn13_from_upc12_payload() {
        let synthesized = extract_isbn_from_barcode("123456789012").unwrap();
        assert_eq!(synthesized, "9781234567897");
        assert!(validate_isbn13(&synthesized));
    }

    #[test]
    fn extract_rejects_twelve_char_payload_with_non_digit() {
        assert_eq!(extract_isbn_from_barcode("12345678901X"), None);
    }

    #[test]
    fn extract_rejects_garbage() {
        assert_eq!(extract_isbn_from_barcode("notanisbn"), None);
        assert_eq!(extract_isbn_from_barcode(""), None);
        assert_eq!(extract_isbn_from_barcode("9780134190441"), None);
    }
}
