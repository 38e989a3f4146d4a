//! Validated primitive types shared across the RxPad crates.
//!
//! These newtypes guarantee their invariant at construction time so the rest
//! of the codebase never needs to re-check shape at call sites.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Errors that can occur when parsing a theme colour.
#[derive(Debug, thiserror::Error)]
pub enum ColorError {
    #[error("Colour cannot be empty")]
    Empty,
    #[error("Colour must start with '#', got: '{0}'")]
    MissingHash(String),
    #[error("Colour must be '#' followed by 3 or 6 hex digits, got: '{0}'")]
    BadFormat(String),
}

/// A string type that guarantees non-empty content.
///
/// Wraps a `String` and ensures it contains at least one non-whitespace
/// character. The input is trimmed of leading and trailing whitespace during
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the
    /// trimmed result is empty, an error is returned.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A prescription theme colour in strict hex notation.
///
/// Accepts `#RGB` or `#RRGGBB` (case-insensitive hex digits) and nothing
/// else: no hash-less forms, no named colours, no alpha channel. The value
/// is stored exactly as supplied, so `Display` reproduces the caller's
/// casing.
///
/// This is the only colour representation the template store and the print
/// pipeline accept; free-form colour strings live only in the canvas until
/// save-time validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexColor(String);

impl HexColor {
    /// Parses a strict 3- or 6-digit hex colour.
    ///
    /// # Errors
    ///
    /// Returns a `ColorError` describing exactly what is wrong: empty
    /// input, a missing leading `#`, or a digit run that is not 3 or 6
    /// hex characters.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        if input.is_empty() {
            return Err(ColorError::Empty);
        }

        let Some(digits) = input.strip_prefix('#') else {
            return Err(ColorError::MissingHash(input.to_owned()));
        };

        let len_ok = digits.len() == 3 || digits.len() == 6;
        let digits_ok = digits.bytes().all(|b| b.is_ascii_hexdigit());

        if !len_ok || !digits_ok {
            return Err(ColorError::BadFormat(input.to_owned()));
        }

        Ok(Self(input.to_owned()))
    }

    /// Returns the colour as supplied, including the leading `#`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HexColor::parse(s)
    }
}

impl serde::Serialize for HexColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        HexColor::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims_and_accepts() {
        let text = NonEmptyText::new("  hello  ").unwrap();
        assert_eq!(text.as_str(), "hello");
    }

    #[test]
    fn test_non_empty_text_rejects_whitespace_only() {
        assert!(NonEmptyText::new("").is_err());
        assert!(NonEmptyText::new("   ").is_err());
    }

    #[test]
    fn test_hex_color_accepts_six_digit() {
        let colour = HexColor::parse("#FFAA00").unwrap();
        assert_eq!(colour.as_str(), "#FFAA00");
    }

    #[test]
    fn test_hex_color_accepts_three_digit() {
        let colour = HexColor::parse("#fff").unwrap();
        assert_eq!(colour.as_str(), "#fff");
    }

    #[test]
    fn test_hex_color_preserves_casing() {
        assert_eq!(HexColor::parse("#3b82f6").unwrap().as_str(), "#3b82f6");
        assert_eq!(HexColor::parse("#3B82F6").unwrap().as_str(), "#3B82F6");
    }

    #[test]
    fn test_hex_color_rejects_missing_hash() {
        let err = HexColor::parse("FFAA00").expect_err("should reject");
        assert!(matches!(err, ColorError::MissingHash(_)));
    }

    #[test]
    fn test_hex_color_rejects_bad_digits() {
        let err = HexColor::parse("#ZZZZZZ").expect_err("should reject");
        assert!(matches!(err, ColorError::BadFormat(_)));
    }

    #[test]
    fn test_hex_color_rejects_wrong_lengths() {
        assert!(HexColor::parse("#ff").is_err());
        assert!(HexColor::parse("#ffff").is_err());
        assert!(HexColor::parse("#fffffff").is_err());
    }

    #[test]
    fn test_hex_color_rejects_empty() {
        let err = HexColor::parse("").expect_err("should reject");
        assert!(matches!(err, ColorError::Empty));
    }

    #[test]
    fn test_hex_color_rejects_named_colour() {
        assert!(HexColor::parse("blue").is_err());
    }

    #[test]
    fn test_hex_color_serde_round_trip() {
        let colour = HexColor::parse("#3B82F6").unwrap();
        let json = serde_json::to_string(&colour).unwrap();
        assert_eq!(json, "\"#3B82F6\"");

        let back: HexColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, colour);
    }

    #[test]
    fn test_hex_color_deserialize_rejects_invalid() {
        let result: Result<HexColor, _> = serde_json::from_str("\"blue\"");
        assert!(result.is_err());
    }
}
