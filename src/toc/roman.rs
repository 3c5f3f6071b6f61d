//! Roman numerals and chapter-number extraction

use once_cell::sync::Lazy;
use regex::Regex;

const ROMAN_TABLE: [(&str, u32); 13] = [
    ("m", 1000),
    ("cm", 900),
    ("d", 500),
    ("cd", 400),
    ("c", 100),
    ("xc", 90),
    ("l", 50),
    ("xl", 40),
    ("x", 10),
    ("ix", 9),
    ("v", 5),
    ("iv", 4),
    ("i", 1),
];

static CHAPTER_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bCHAPTER\s+([IVXLCDM]+)\b").expect("chapter number pattern is valid")
});

/// Parse a roman numeral, case-insensitive
///
/// Returns `None` for empty input or any character sequence that does not
/// consume cleanly into numeral values.
pub fn parse_roman(text: &str) -> Option<u32> {
    let text = text.trim().to_lowercase();
    let mut result = 0;
    let mut remaining = text.as_str();

    for (numeral, value) in ROMAN_TABLE {
        while remaining.starts_with(numeral) {
            result += value;
            remaining = &remaining[numeral.len()..];
        }
    }

    if remaining.is_empty() && result > 0 {
        Some(result)
    } else {
        None
    }
}

/// Format a number as an upper-case roman numeral (empty for 0)
pub fn to_roman(mut n: u32) -> String {
    let mut out = String::new();
    for (numeral, value) in ROMAN_TABLE {
        while n >= value {
            out.push_str(&numeral.to_uppercase());
            n -= value;
        }
    }
    out
}

/// Parse a chapter cell written either as a roman numeral or in digits
pub fn parse_chapter_number(text: &str) -> Option<u32> {
    let text = text.trim();
    match text.parse::<u32>() {
        Ok(n) if n > 0 => Some(n),
        Ok(_) => None,
        Err(_) => parse_roman(text),
    }
}

/// First `CHAPTER <roman>` number found in a title
pub fn chapter_number_from_title(title: &str) -> Option<u32> {
    CHAPTER_NUMBER
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_roman(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roman() {
        assert_eq!(parse_roman("I"), Some(1));
        assert_eq!(parse_roman("iv"), Some(4));
        assert_eq!(parse_roman("IX"), Some(9));
        assert_eq!(parse_roman("XIV"), Some(14));
        assert_eq!(parse_roman("XL"), Some(40));
        assert_eq!(parse_roman(" XCIX "), Some(99));
        assert_eq!(parse_roman("MCMXCIX"), Some(1999));
    }

    #[test]
    fn test_parse_roman_invalid() {
        assert_eq!(parse_roman(""), None);
        assert_eq!(parse_roman("ABC"), None);
        assert_eq!(parse_roman("X1"), None);
    }

    #[test]
    fn test_to_roman() {
        assert_eq!(to_roman(0), "");
        assert_eq!(to_roman(4), "IV");
        assert_eq!(to_roman(14), "XIV");
        assert_eq!(to_roman(1999), "MCMXCIX");
        for n in 1..200 {
            assert_eq!(parse_roman(&to_roman(n)), Some(n));
        }
    }

    #[test]
    fn test_parse_chapter_number() {
        assert_eq!(parse_chapter_number("XII"), Some(12));
        assert_eq!(parse_chapter_number("12"), Some(12));
        assert_eq!(parse_chapter_number("0"), None);
        assert_eq!(parse_chapter_number("-"), None);
    }

    #[test]
    fn test_chapter_number_from_title() {
        assert_eq!(chapter_number_from_title("CHAPTER IV. Of Prayer"), Some(4));
        assert_eq!(chapter_number_from_title("Chapter xii - Of Alms"), Some(12));
        assert_eq!(chapter_number_from_title("PART II, CHAPTER III."), Some(3));
        assert_eq!(chapter_number_from_title("Preface"), None);
        assert_eq!(chapter_number_from_title("CHAPTERS IN BRIEF"), None);
    }
}
