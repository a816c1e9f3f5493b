//! Contrast Evaluation
//!
//! WCAG 2.x relative luminance and contrast ratio checks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ContrastConfig;
use crate::{A11yError, Result};

/// AA requirement for normal text
pub const AA_NORMAL: f64 = 4.5;
/// AA requirement for large text
pub const AA_LARGE: f64 = 3.0;
/// AAA requirement for normal text
pub const AAA_NORMAL: f64 = 7.0;
/// AAA requirement for large text
pub const AAA_LARGE: f64 = 4.5;

/// sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::from_rgb(0, 0, 0);
    pub const WHITE: Color = Color::from_rgb(255, 255, 255);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the `#` is optional)
    pub fn from_hex(input: &str) -> Result<Self> {
        let invalid = |reason: &'static str| A11yError::InvalidColorFormat { input: input.to_string(), reason };

        let digits = input.strip_prefix('#').unwrap_or(input);
        if digits.len() != 6 {
            return Err(invalid("expected exactly 6 hex digits"));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid("non-hex character"));
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid("non-hex character"));
        Ok(Self::from_rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Relative luminance in [0, 1]
    pub fn luminance(&self) -> f64 {
        fn channel(c: u8) -> f64 {
            let c = c as f64 / 255.0;
            if c <= 0.03928 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
        }
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }

    /// Unrounded contrast ratio against another color
    pub fn contrast_with(&self, other: &Color) -> f64 {
        let (l1, l2) = (self.luminance(), other.luminance());
        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
        (lighter + 0.05) / (darker + 0.05)
    }

    fn mix(&self, target: Color, t: f64) -> Color {
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8;
        Color::from_rgb(lerp(self.r, target.r), lerp(self.g, target.g), lerp(self.b, target.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = A11yError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = A11yError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// WCAG conformance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComplianceLevel {
    Fail,
    AA,
    AAA,
}

/// Outcome of a foreground/background check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastResult {
    /// Ratio rounded to two decimals
    pub ratio: f64,
    pub required_ratio: f64,
    pub level: ComplianceLevel,
}

impl ContrastResult {
    pub fn from_colors(foreground: Color, background: Color, large_text: bool) -> Self {
        let ratio = foreground.contrast_with(&background);
        let (required_ratio, aaa_ratio) = if large_text { (AA_LARGE, AAA_LARGE) } else { (AA_NORMAL, AAA_NORMAL) };

        // Thresholds compare against the unrounded ratio
        let level = if ratio >= aaa_ratio {
            ComplianceLevel::AAA
        } else if ratio >= required_ratio {
            ComplianceLevel::AA
        } else {
            ComplianceLevel::Fail
        };

        Self { ratio: round2(ratio), required_ratio, level }
    }

    /// Meets AA or better
    pub fn passes(&self) -> bool {
        self.level != ComplianceLevel::Fail
    }
}

/// Text size class input for the large-text rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size_px: f64,
    pub bold: bool,
}

impl TextStyle {
    pub fn new(font_size_px: f64) -> Self {
        Self { font_size_px, bold: false }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn is_large(&self, config: &ContrastConfig) -> bool {
        let threshold = if self.bold { config.large_bold_text_min_px } else { config.large_text_min_px };
        self.font_size_px >= threshold
    }
}

/// Relative luminance of a hex color
pub fn relative_luminance(color: &str) -> Result<f64> {
    Ok(Color::from_hex(color)?.luminance())
}

/// Contrast ratio between two hex colors, rounded to two decimals
pub fn contrast_ratio(a: &str, b: &str) -> Result<f64> {
    let (a, b) = (Color::from_hex(a)?, Color::from_hex(b)?);
    Ok(round2(a.contrast_with(&b)))
}

/// Evaluate a foreground/background pair
pub fn evaluate(foreground: &str, background: &str, large_text: bool) -> Result<ContrastResult> {
    let (fg, bg) = (Color::from_hex(foreground)?, Color::from_hex(background)?);
    Ok(ContrastResult::from_colors(fg, bg, large_text))
}

/// Evaluate a pair, classifying the text by its rendered style
pub fn evaluate_text(
    foreground: &str,
    background: &str,
    style: TextStyle,
    config: &ContrastConfig,
) -> Result<ContrastResult> {
    evaluate(foreground, background, style.is_large(config))
}

/// Named foreground/background pair from a theme palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPair {
    pub name: String,
    pub foreground: Color,
    pub background: Color,
    #[serde(default)]
    pub large_text: bool,
}

impl ColorPair {
    pub fn new(name: &str, foreground: Color, background: Color) -> Self {
        Self { name: name.into(), foreground, background, large_text: false }
    }

    pub fn large(mut self) -> Self {
        self.large_text = true;
        self
    }
}

/// Palette check result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteEntry {
    pub name: String,
    pub foreground: Color,
    pub background: Color,
    pub result: ContrastResult,
    /// Closest compliant foreground when the pair fails
    pub suggestion: Option<Color>,
}

/// Evaluate every pair in a palette, in order
pub fn audit_palette(pairs: &[ColorPair]) -> Vec<PaletteEntry> {
    let entries: Vec<PaletteEntry> = pairs
        .iter()
        .map(|pair| {
            let result = ContrastResult::from_colors(pair.foreground, pair.background, pair.large_text);
            let suggestion = if result.passes() {
                None
            } else {
                suggest_compliant_foreground(pair.foreground, pair.background, result.required_ratio)
            };
            PaletteEntry {
                name: pair.name.clone(),
                foreground: pair.foreground,
                background: pair.background,
                result,
                suggestion,
            }
        })
        .collect();

    let failing = entries.iter().filter(|e| !e.result.passes()).count();
    tracing::debug!(pairs = entries.len(), failing, "palette contrast audit");
    entries
}

/// Move the foreground toward black or white until `required` is met.
///
/// Heads toward whichever extreme contrasts more with the background.
/// Returns `None` if even the extreme does not reach the requirement.
pub fn suggest_compliant_foreground(fg: Color, bg: Color, required: f64) -> Option<Color> {
    if fg.contrast_with(&bg) >= required {
        return Some(fg);
    }

    let target = if Color::BLACK.contrast_with(&bg) >= Color::WHITE.contrast_with(&bg) {
        Color::BLACK
    } else {
        Color::WHITE
    };

    (1..=20)
        .map(|step| fg.mix(target, step as f64 / 20.0))
        .find(|candidate| candidate.contrast_with(&bg) >= required)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contrast_ratio() {
        assert_eq!(contrast_ratio("#FFFFFF", "#000000").unwrap(), 21.0);
        assert_eq!(contrast_ratio("#000000", "#FFFFFF").unwrap(), 21.0);
        assert_eq!(contrast_ratio("#777777", "#777777").unwrap(), 1.0);
    }

    #[test]
    fn test_luminance() {
        assert_eq!(relative_luminance("#000000").unwrap(), 0.0);
        assert!((relative_luminance("#ffffff").unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::from_hex("#1C8282").unwrap(), Color::from_rgb(0x1c, 0x82, 0x82));
        assert_eq!(Color::from_hex("1c8282").unwrap(), Color::from_rgb(0x1c, 0x82, 0x82));
        assert_eq!(Color::from_rgb(0x1c, 0x82, 0x82).to_string(), "#1c8282");
    }

    #[test]
    fn test_malformed_hex() {
        for input in ["", "#", "#fff", "#12345", "#1234567", "#gggggg", "#+12345", " #ffffff", "rgb(0,0,0)"] {
            let err = Color::from_hex(input).unwrap_err();
            assert!(matches!(err, A11yError::InvalidColorFormat { .. }), "accepted {input:?}");
        }
        assert!(contrast_ratio("#ffffff", "black").is_err());
        assert!(evaluate("#zzzzzz", "#000000", false).is_err());
    }

    #[test]
    fn test_primary_on_white() {
        let result = evaluate("#FFFFFF", "#1C8282", false).unwrap();
        assert!(result.passes());
        assert!(result.ratio >= 4.5);
        assert_eq!(result.level, ComplianceLevel::AA);
        assert_eq!(result.required_ratio, 4.5);
    }

    #[test]
    fn test_levels() {
        let black_white = evaluate("#000000", "#ffffff", false).unwrap();
        assert_eq!(black_white.level, ComplianceLevel::AAA);

        // #767676 on white is ~4.54:1
        let gray = evaluate("#767676", "#ffffff", false).unwrap();
        assert_eq!(gray.level, ComplianceLevel::AA);
        let gray_large = evaluate("#767676", "#ffffff", true).unwrap();
        assert_eq!(gray_large.level, ComplianceLevel::AAA);
        assert_eq!(gray_large.required_ratio, 3.0);

        let light = evaluate("#aaaaaa", "#ffffff", false).unwrap();
        assert_eq!(light.level, ComplianceLevel::Fail);
        assert!(!light.passes());
    }

    #[test]
    fn test_threshold_uses_unrounded_ratio() {
        // #777777 on white is 4.478:1, which rounds to 4.48 and must fail AA
        let result = evaluate("#777777", "#ffffff", false).unwrap();
        assert_eq!(result.ratio, 4.48);
        assert_eq!(result.level, ComplianceLevel::Fail);
    }

    #[test]
    fn test_text_style() {
        let config = ContrastConfig::default();
        assert!(TextStyle::new(24.0).is_large(&config));
        assert!(!TextStyle::new(18.0).is_large(&config));
        assert!(TextStyle::new(19.0).bold().is_large(&config));

        let result = evaluate_text("#949494", "#ffffff", TextStyle::new(32.0), &config).unwrap();
        assert_eq!(result.required_ratio, 3.0);
    }

    #[test]
    fn test_suggest_foreground() {
        let fg = Color::from_rgb(150, 150, 150);
        let suggestion = suggest_compliant_foreground(fg, Color::WHITE, AA_NORMAL).unwrap();
        assert!(suggestion.contrast_with(&Color::WHITE) >= AA_NORMAL);
        assert!(suggestion.r < fg.r);

        assert_eq!(suggest_compliant_foreground(Color::BLACK, Color::WHITE, AA_NORMAL), Some(Color::BLACK));
        assert_eq!(suggest_compliant_foreground(fg, Color::WHITE, 22.0), None);
    }

    #[test]
    fn test_audit_palette() {
        let palette = vec![
            ColorPair::new("primary-on-white", Color::WHITE, Color::from_rgb(0x1c, 0x82, 0x82)),
            ColorPair::new("muted-text", Color::from_rgb(0xaa, 0xaa, 0xaa), Color::WHITE),
        ];
        let entries = audit_palette(&palette);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].result.passes());
        assert!(entries[0].suggestion.is_none());
        assert!(!entries[1].result.passes());
        assert!(entries[1].suggestion.is_some());
    }

    #[test]
    fn test_color_serde() {
        let pair: ColorPair =
            serde_json::from_str(r##"{ "name": "link", "foreground": "#0000EE", "background": "#ffffff" }"##).unwrap();
        assert_eq!(pair.foreground, Color::from_rgb(0, 0, 0xee));
        assert!(!pair.large_text);
        assert_eq!(serde_json::to_string(&pair.foreground).unwrap(), r##""#0000ee""##);
        assert!(serde_json::from_str::<Color>(r##""#12""##).is_err());
    }
}
