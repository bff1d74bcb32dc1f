use image::Rgba;
use serde::Deserialize;

/// Tiled's background when a map sets none (or sets garbage).
pub const DEFAULT_BACKGROUND: Rgba<u8> = Rgba([128, 128, 128, 255]);

/// A `#RRGGBB` / `RRGGBB` color attribute as written in the map file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct HexColor(pub String);

impl HexColor {
    pub fn new(text: impl Into<String>) -> Self {
        HexColor(text.into())
    }

    pub fn is_set(&self) -> bool {
        !self.0.is_empty()
    }

    /// Strict parse; `None` unless the text is exactly six hex digits after
    /// an optional `#`.
    pub fn parse(&self) -> Option<Rgba<u8>> {
        let digits = self.0.strip_prefix('#').unwrap_or(&self.0);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).ok();
        Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
    }

    /// Lenient parse: anything unparseable becomes [`DEFAULT_BACKGROUND`].
    pub fn rgba(&self) -> Rgba<u8> {
        self.rgba_or(DEFAULT_BACKGROUND)
    }

    pub fn rgba_or(&self, fallback: Rgba<u8>) -> Rgba<u8> {
        self.parse().unwrap_or(fallback)
    }
}

impl From<&str> for HexColor {
    fn from(text: &str) -> Self {
        HexColor::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(HexColor::from("#23af40").rgba(), Rgba([35, 175, 64, 255]));
        assert_eq!(HexColor::from("23AF40").rgba(), Rgba([35, 175, 64, 255]));
    }

    #[test]
    fn falls_back_to_gray() {
        for text in ["", "#", "nocolor", "thisisnocolor", "fgaaaa", "faagaa", "faaaga", "#+f+f+f"] {
            assert_eq!(HexColor::from(text).rgba(), DEFAULT_BACKGROUND, "{text:?}");
        }
    }

    #[test]
    fn one_bad_channel_defaults_the_whole_color() {
        assert_eq!(HexColor::from("ffffzz").parse(), None);
        assert_eq!(HexColor::from("ffffzz").rgba(), Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn multibyte_text_does_not_panic() {
        assert_eq!(HexColor::from("ééé").parse(), None);
    }
}
