//! User-adjustable render parameters.
//!
//! [`RenderParams`] is the configuration surface of the tool: every control of the preview maps to
//! one field, each with its own default. It (de)serializes with serde, so a partial JSON document
//! fills the missing fields with defaults.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParamsError;
use crate::layout;

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum QrCodeEcc {
    /// Tolerates ~7% erroneous codewords.
    #[serde(rename = "L", alias = "Low")]
    Low,
    /// Tolerates ~15% erroneous codewords.
    #[serde(rename = "M", alias = "Medium")]
    Medium,
    /// Tolerates ~25% erroneous codewords.
    #[serde(rename = "Q", alias = "Quartile")]
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    #[serde(rename = "H", alias = "High")]
    High,
}

impl QrCodeEcc {
    /// The single-letter name used by the controls.
    pub fn letter(self) -> char {
        use QrCodeEcc::*;
        match self {
            Low => 'L',
            Medium => 'M',
            Quartile => 'Q',
            High => 'H',
        }
    }

    /// Approximate share of codewords that can be restored, in percent.
    pub fn recovery_percent(self) -> u32 {
        use QrCodeEcc::*;
        match self {
            Low => 7,
            Medium => 15,
            Quartile => 25,
            High => 30,
        }
    }
}

impl fmt::Display for QrCodeEcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}%)", self.letter(), self.recovery_percent())
    }
}

impl FromStr for QrCodeEcc {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" | "LOW" => Ok(Self::Low),
            "M" | "MEDIUM" => Ok(Self::Medium),
            "Q" | "QUARTILE" => Ok(Self::Quartile),
            "H" | "HIGH" => Ok(Self::High),
            _ => Err(ParamsError::InvalidLevel(s.to_string())),
        }
    }
}

/// A straight-alpha RGBA color.
///
/// Parses and prints as `#rrggbb`, or `#rrggbbaa` when not opaque. The short `#rgb` form is
/// accepted on input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0, 255]);
    pub const WHITE: Color = Color([255, 255, 255, 255]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub fn alpha(self) -> u8 {
        self.0[3]
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba(self.0)
    }

    pub fn to_hex(self) -> String {
        if self.alpha() == 255 {
            format!("#{}", hex::encode(&self.0[..3]))
        } else {
            format!("#{}", hex::encode(self.0))
        }
    }
}

impl FromStr for Color {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParamsError::InvalidColor(s.to_string());
        let digits = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_string(),
            _ => return Err(invalid()),
        };
        let bytes = hex::decode(expanded).map_err(|_| invalid())?;
        match *bytes.as_slice() {
            [r, g, b] => Ok(Self::rgb(r, g, b)),
            [r, g, b, a] => Ok(Self::rgba(r, g, b, a)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ParamsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// The full set of user-adjustable controls.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderParams {
    /// Text or URL to encode.
    pub payload: String,
    /// Side of the square output raster, in pixels.
    pub side: u32,
    /// Quiet zone in pixels; the encoder works in modules, see [`RenderParams::quiet_zone_units`].
    pub margin: i32,
    pub correction_level: QrCodeEcc,
    /// Color of the dark modules.
    pub foreground: Color,
    /// Color of the light modules and the quiet zone.
    pub background: Color,
    /// Logo square side as a percentage of `side`.
    pub logo_percent: u32,
    /// Extra knockout padding around the logo as a percentage of `side`.
    pub knockout_percent: u32,
    pub rounded: bool,
    pub show_guide: bool,
}

impl RenderParams {
    pub const DEFAULT_PAYLOAD: &'static str = "https://example.com";

    pub const SIDE_RANGE: (u32, u32) = (256, 1024);
    pub const MARGIN_RANGE: (i32, i32) = (0, 64);
    pub const LOGO_PERCENT_RANGE: (u32, u32) = (10, 35);
    pub const KNOCKOUT_PERCENT_RANGE: (u32, u32) = (2, 10);

    /// Parses a JSON document; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ParamsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The text handed to the encoder. An empty payload becomes a single space so the encoder
    /// always has something to encode.
    pub fn encoded_payload(&self) -> &str {
        if self.payload.is_empty() {
            " "
        } else {
            &self.payload
        }
    }

    /// Side of the logo square in pixels.
    pub fn logo_side(&self) -> u32 {
        layout::percent_of(self.side, self.logo_percent)
    }

    /// Knockout padding around the logo square in pixels.
    pub fn knockout_pad(&self) -> u32 {
        layout::percent_of(self.side, self.knockout_percent)
    }

    /// Quiet zone converted to encoder modules.
    pub fn quiet_zone_units(&self) -> u32 {
        layout::margin_units(self.margin)
    }

    /// Checks every numeric control against the range its input allows.
    ///
    /// The renderer itself never calls this; out-of-range values still render.
    pub fn validate(&self) -> Result<(), ParamsError> {
        check_range("side", self.side.into(), Self::SIDE_RANGE)?;
        check_range("margin", self.margin.into(), Self::MARGIN_RANGE)?;
        check_range("logoPercent", self.logo_percent.into(), Self::LOGO_PERCENT_RANGE)?;
        check_range(
            "knockoutPercent",
            self.knockout_percent.into(),
            Self::KNOCKOUT_PERCENT_RANGE,
        )?;
        Ok(())
    }
}

fn check_range<T: Into<i64>>(
    name: &'static str,
    value: i64,
    (min, max): (T, T),
) -> Result<(), ParamsError> {
    let (min, max) = (min.into(), max.into());
    if value < min || value > max {
        return Err(ParamsError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            payload: Self::DEFAULT_PAYLOAD.to_string(),
            side: 512,
            margin: 16,
            correction_level: QrCodeEcc::High,
            foreground: Color::BLACK,
            background: Color::WHITE,
            logo_percent: 20,
            knockout_percent: 4,
            rounded: true,
            show_guide: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_order_by_tolerance() {
        use QrCodeEcc::*;
        let mut levels = [High, Low, Quartile, Medium];
        levels.sort();
        assert_eq!(levels, [Low, Medium, Quartile, High]);
        assert!(levels
            .windows(2)
            .all(|w| w[0].recovery_percent() < w[1].recovery_percent()));
    }

    #[test]
    fn test_defaults() {
        let params = RenderParams::default();
        assert_eq!(params.payload, "https://example.com");
        assert_eq!(params.side, 512);
        assert_eq!(params.correction_level, QrCodeEcc::High);
        assert_eq!(params.logo_side(), 102);
        assert_eq!(params.knockout_pad(), 20);
        assert_eq!(params.quiet_zone_units(), 2);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_empty_payload_becomes_space() {
        let params = RenderParams {
            payload: String::new(),
            ..RenderParams::default()
        };
        assert_eq!(params.encoded_payload(), " ");
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(QrCodeEcc::Low < QrCodeEcc::Medium);
        assert!(QrCodeEcc::Quartile < QrCodeEcc::High);
        assert_eq!("q".parse::<QrCodeEcc>().unwrap(), QrCodeEcc::Quartile);
        assert!("X".parse::<QrCodeEcc>().is_err());
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("#000000".parse::<Color>().unwrap(), Color::BLACK);
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!(
            "#11182780".parse::<Color>().unwrap(),
            Color::rgba(0x11, 0x18, 0x27, 0x80)
        );
        assert_eq!(Color::rgb(0x11, 0x18, 0x27).to_hex(), "#111827");
        assert!("111827".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let params =
            RenderParams::from_json(r##"{"side": 768, "correctionLevel": "L", "foreground": "#ff0000"}"##)
                .unwrap();
        assert_eq!(params.side, 768);
        assert_eq!(params.correction_level, QrCodeEcc::Low);
        assert_eq!(params.foreground, Color::rgb(255, 0, 0));
        assert_eq!(params.logo_percent, 20);
        assert!(params.rounded);

        let json = params.to_json().unwrap();
        assert_eq!(RenderParams::from_json(&json).unwrap(), params);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let params = RenderParams {
            logo_percent: 50,
            ..RenderParams::default()
        };
        match params.validate() {
            Err(ParamsError::OutOfRange { name, value, .. }) => {
                assert_eq!(name, "logoPercent");
                assert_eq!(value, 50);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
