//! Codec for a single table cell
//!
//! TXT cells are plain strings; the structured format distinguishes
//! integers, strings, and absent values. Strings with leading or
//! trailing whitespace are bracketed in backticks so that editors and
//! the TOML layer cannot silently trim them.

/// A cell value as it appears in the structured format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// Empty/absent cell
    Empty,
    /// Integer value
    Integer(i64),
    /// String literal, exactly as written in the structured file
    /// (including the backtick brackets when present)
    Text(String),
}

impl CellValue {
    /// Encode a raw TXT cell into its structured-format value.
    ///
    /// Returns `None` when the value requires the backtick escape but
    /// contains a backtick itself, making it impossible to re-escape
    /// unambiguously.
    pub fn encode(raw: &str) -> Option<CellValue> {
        if raw.is_empty() {
            return Some(CellValue::Empty);
        }

        if let Some(i) = parse_strict_integer(raw) {
            return Some(CellValue::Integer(i));
        }

        if needs_escape(raw) {
            if raw.contains('`') {
                return None;
            }
            return Some(CellValue::Text(format!("`{raw}`")));
        }

        Some(CellValue::Text(raw.to_string()))
    }

    /// Decode back to the raw TXT cell string
    pub fn decode(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Text(s) => {
                if is_bracketed(s) {
                    s[1..s.len() - 1].to_string()
                } else {
                    s.clone()
                }
            }
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// Parse a string as a base-10 integer, accepting only the canonical
/// decimal form. `"007"`, `"+5"` and `"-0"` all fail, keeping their
/// byte-exact representation as strings.
fn parse_strict_integer(raw: &str) -> Option<i64> {
    let i: i64 = raw.parse().ok()?;
    if i.to_string() == raw {
        Some(i)
    } else {
        None
    }
}

/// A value needs the backtick escape when its first or last character
/// is whitespace, or when it is already bracketed by backticks (which
/// would otherwise be stripped on decode).
fn needs_escape(raw: &str) -> bool {
    let first = raw.chars().next();
    let last = raw.chars().next_back();
    first.is_some_and(char::is_whitespace)
        || last.is_some_and(char::is_whitespace)
        || is_bracketed(raw)
}

fn is_bracketed(s: &str) -> bool {
    s.len() >= 2 && s.starts_with('`') && s.ends_with('`')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_empty() {
        assert_eq!(CellValue::encode(""), Some(CellValue::Empty));
    }

    #[test]
    fn test_encode_integer() {
        assert_eq!(CellValue::encode("42"), Some(CellValue::Integer(42)));
        assert_eq!(CellValue::encode("-123"), Some(CellValue::Integer(-123)));
        assert_eq!(CellValue::encode("0"), Some(CellValue::Integer(0)));
    }

    #[test]
    fn test_non_canonical_integers_stay_strings() {
        assert_eq!(
            CellValue::encode("007"),
            Some(CellValue::Text("007".to_string()))
        );
        assert_eq!(
            CellValue::encode("+5"),
            Some(CellValue::Text("+5".to_string()))
        );
        assert_eq!(
            CellValue::encode("-0"),
            Some(CellValue::Text("-0".to_string()))
        );
        assert_eq!(
            CellValue::encode("99999999999999999999999"),
            Some(CellValue::Text("99999999999999999999999".to_string()))
        );
    }

    #[test]
    fn test_encode_plain_string() {
        assert_eq!(
            CellValue::encode("Fire Ball"),
            Some(CellValue::Text("Fire Ball".to_string()))
        );
    }

    #[test]
    fn test_encode_padded_string() {
        assert_eq!(
            CellValue::encode("  padded  "),
            Some(CellValue::Text("`  padded  `".to_string()))
        );
        assert_eq!(
            CellValue::encode(" "),
            Some(CellValue::Text("` `".to_string()))
        );
    }

    #[test]
    fn test_encode_backtick_in_padded_value_fails() {
        assert_eq!(CellValue::encode(" tick ` tock "), None);
        assert_eq!(CellValue::encode("`already bracketed`"), None);
    }

    #[test]
    fn test_interior_backtick_is_fine() {
        assert_eq!(
            CellValue::encode("tick`tock"),
            Some(CellValue::Text("tick`tock".to_string()))
        );
        // a single backtick is not a bracket pair
        assert_eq!(
            CellValue::encode("`"),
            Some(CellValue::Text("`".to_string()))
        );
    }

    #[test]
    fn test_decode() {
        assert_eq!(CellValue::Empty.decode(), "");
        assert_eq!(CellValue::Integer(-7).decode(), "-7");
        assert_eq!(CellValue::Text("abc".to_string()).decode(), "abc");
        assert_eq!(CellValue::Text("`  x  `".to_string()).decode(), "  x  ");
        assert_eq!(CellValue::Text("`".to_string()).decode(), "`");
    }

    #[test]
    fn test_round_trip() {
        for raw in ["", "42", "007", "Fire Ball", "  padded  ", "\tx\t", "a`b"] {
            let value = CellValue::encode(raw).unwrap();
            assert_eq!(value.decode(), raw, "round trip failed for {raw:?}");
        }
    }
}
