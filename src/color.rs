use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress below this fraction of the particle estimate paints in the first band
const EARLY_THRESHOLD: f64 = 0.33;
/// Progress below this fraction paints in the middle band
const MIDDLE_THRESHOLD: f64 = 0.67;

/// 24-bit colour, serialized as `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional, case-insensitive)
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(format!("Invalid colour '{}': expected #RRGGBB", s));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| format!("Invalid colour '{}': {}", s, e))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Growth band, assigned by how far the aggregate has progressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Early,
    Middle,
    Late,
}

impl Band {
    /// Band for a progress ratio (`particle_count / estimate`)
    pub fn from_progress(progress: f64) -> Self {
        if progress < EARLY_THRESHOLD {
            Band::Early
        } else if progress < MIDDLE_THRESHOLD {
            Band::Middle
        } else {
            Band::Late
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Band::Early => 0,
            Band::Middle => 1,
            Band::Late => 2,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Band::Early => "Early",
            Band::Middle => "Middle",
            Band::Late => "Late",
        }
    }
}

/// The three band colours, darkest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub bands: [Rgb; 3],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            bands: [
                Rgb::new(0xF5, 0xC8, 0x42), // gold
                Rgb::new(0xF8, 0xD8, 0x6A), // lighter gold
                Rgb::new(0xFB, 0xE9, 0x98), // pale gold
            ],
        }
    }
}

impl Palette {
    pub fn color(&self, band: Band) -> Rgb {
        self.bands[band.index()]
    }

    pub fn band_for(&self, progress: f64) -> Rgb {
        self.color(Band::from_progress(progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#F5C842").unwrap(), Rgb::new(0xF5, 0xC8, 0x42));
        assert_eq!(Rgb::from_hex("f8d86a").unwrap(), Rgb::new(0xF8, 0xD8, 0x6A));
        assert!(Rgb::from_hex("#F5C8").is_err());
        assert!(Rgb::from_hex("#GGGGGG").is_err());
    }

    #[test]
    fn test_hex_display() {
        assert_eq!(Rgb::new(0xFB, 0xE9, 0x98).to_string(), "#FBE998");
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(Band::from_progress(0.0), Band::Early);
        assert_eq!(Band::from_progress(0.3299), Band::Early);
        assert_eq!(Band::from_progress(0.33), Band::Middle);
        assert_eq!(Band::from_progress(0.6699), Band::Middle);
        assert_eq!(Band::from_progress(0.67), Band::Late);
        assert_eq!(Band::from_progress(1.5), Band::Late);
    }

    #[test]
    fn test_palette_serializes_as_hex() {
        let json = serde_json::to_string(&Palette::default()).unwrap();
        assert_eq!(json, r##"{"bands":["#F5C842","#F8D86A","#FBE998"]}"##);

        let parsed: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Palette::default());

        assert!(serde_json::from_str::<Palette>(r##"{"bands":["red","#F8D86A","#FBE998"]}"##).is_err());
    }
}
