/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::str::FromStr;

/// Brand accent used for the status bar and the refresh indicator.
pub const BRAND_ACCENT_COLOR: &str = "#fff5eb";

/// Opaque-by-default sRGB color parsed from `#RRGGBB` or `#AARRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccentColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl AccentColor {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: u8::MAX,
        }
    }

    pub fn rgba(self) -> (u8, u8, u8, u8) {
        (self.red, self.green, self.blue, self.alpha)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    MissingHash,
    BadLength(usize),
    BadDigit(String),
}

impl std::fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHash => write!(f, "color must start with '#'"),
            Self::BadLength(len) => write!(f, "expected 6 or 8 hex digits, got {len}"),
            Self::BadDigit(text) => write!(f, "invalid hex digits in {text:?}"),
        }
    }
}

impl std::error::Error for ColorParseError {}

impl FromStr for AccentColor {
    type Err = ColorParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let digits = text
            .trim()
            .strip_prefix('#')
            .ok_or(ColorParseError::MissingHash)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigit(text.to_string()));
        }
        let channel = |index: usize| {
            u8::from_str_radix(&digits[index * 2..index * 2 + 2], 16)
                .map_err(|_| ColorParseError::BadDigit(text.to_string()))
        };
        match digits.len() {
            6 => Ok(Self::rgb(channel(0)?, channel(1)?, channel(2)?)),
            8 => Ok(Self {
                alpha: channel(0)?,
                red: channel(1)?,
                green: channel(2)?,
                blue: channel(3)?,
            }),
            len => Err(ColorParseError::BadLength(len)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn brand_accent_parses() {
        let color: AccentColor = BRAND_ACCENT_COLOR.parse().unwrap();
        assert_eq!(color.rgba(), (0xff, 0xf5, 0xeb, 0xff));
    }

    #[test]
    fn argb_form_puts_alpha_first() {
        let color: AccentColor = "#80102030".parse().unwrap();
        assert_eq!(color.rgba(), (0x10, 0x20, 0x30, 0x80));
    }

    #[rstest]
    #[case("fff5eb", ColorParseError::MissingHash)]
    #[case("#fff", ColorParseError::BadLength(3))]
    #[case("#ggf5eb", ColorParseError::BadDigit("#ggf5eb".to_string()))]
    #[case("#ffé5eb", ColorParseError::BadDigit("#ffé5eb".to_string()))]
    fn rejects_malformed_colors(#[case] text: &str, #[case] expected: ColorParseError) {
        assert_eq!(text.parse::<AccentColor>(), Err(expected));
    }
}
