//! Rack Component Vocabulary
//!
//! Closed enumerations for the rack style, forklift class, dock orientation
//! and pallet footprint, plus the small hardware rules that hang off them
//! (deck widths, default anchor counts, upright connection type).
//!
//! ## Rack Styles
//!
//! - **Teardrop**: boltless roll-formed uprights; beams lock into teardrop
//!   slots, wire decks sit directly on the step beams.
//! - **Structural**: hot-rolled channel uprights; beams bolt to the columns and
//!   wire decks sit on flanged beams with separate pallet supports.
//!
//! ## Forklift Classes and Aisle Widths
//!
//! | Class          | Aisle  |
//! |----------------|--------|
//! | `sitdown`      | 144"   |
//! | `reach`        | 120"   |
//! | `narrow_aisle` | 72"    |
//! | `vna`          | 66"    |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Upright/beam connection system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RackStyle {
    /// Boltless teardrop-slot uprights
    #[default]
    Teardrop,
    /// Bolted structural-channel uprights
    Structural,
}

impl RackStyle {
    pub const ALL: [RackStyle; 2] = [RackStyle::Teardrop, RackStyle::Structural];

    /// Wire/serde tag
    pub fn code(&self) -> &'static str {
        match self {
            RackStyle::Teardrop => "teardrop",
            RackStyle::Structural => "structural",
        }
    }

    /// Title-case label used in BOM descriptions
    pub fn label(&self) -> &'static str {
        match self {
            RackStyle::Teardrop => "Teardrop",
            RackStyle::Structural => "Structural",
        }
    }

    /// Wire-deck profile matching the beam type
    pub fn deck_type(&self) -> &'static str {
        match self {
            RackStyle::Teardrop => "Step",
            RackStyle::Structural => "Flanged",
        }
    }

    /// Whether decks need separate pallet supports
    pub fn uses_pallet_supports(&self) -> bool {
        match self {
            RackStyle::Teardrop => false,
            RackStyle::Structural => true,
        }
    }

    /// Whether beam-to-column connections are bolted
    pub fn requires_bolted_hardware(&self) -> bool {
        match self {
            RackStyle::Teardrop => false,
            RackStyle::Structural => true,
        }
    }
}

impl fmt::Display for RackStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RackStyle {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        let needle = s.trim().to_ascii_lowercase();
        RackStyle::ALL
            .into_iter()
            .find(|style| style.code() == needle)
            .ok_or_else(|| CalcError::unknown_variant("rack style", s, &["teardrop", "structural"]))
    }
}

/// Forklift class, which fixes the working aisle width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForkliftClass {
    /// Sit-down counterbalanced truck
    Sitdown,
    /// Reach truck (most common for selective rack)
    #[default]
    Reach,
    /// Turret / swing-reach truck
    NarrowAisle,
    /// Very narrow aisle order picker
    Vna,
}

impl ForkliftClass {
    pub const ALL: [ForkliftClass; 4] = [
        ForkliftClass::Sitdown,
        ForkliftClass::Reach,
        ForkliftClass::NarrowAisle,
        ForkliftClass::Vna,
    ];

    /// Minimum working aisle width (in)
    pub fn aisle_width_in(&self) -> u32 {
        match self {
            ForkliftClass::Sitdown => 144,
            ForkliftClass::Reach => 120,
            ForkliftClass::NarrowAisle => 72,
            ForkliftClass::Vna => 66,
        }
    }

    /// Wire/serde tag
    pub fn code(&self) -> &'static str {
        match self {
            ForkliftClass::Sitdown => "sitdown",
            ForkliftClass::Reach => "reach",
            ForkliftClass::NarrowAisle => "narrow_aisle",
            ForkliftClass::Vna => "vna",
        }
    }

    /// Human-readable truck name
    pub fn display_name(&self) -> &'static str {
        match self {
            ForkliftClass::Sitdown => "Sit-Down Counterbalanced",
            ForkliftClass::Reach => "Reach Truck",
            ForkliftClass::NarrowAisle => "Narrow Aisle (Turret)",
            ForkliftClass::Vna => "Very Narrow Aisle",
        }
    }
}

impl FromStr for ForkliftClass {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        let needle = s.trim().to_ascii_lowercase();
        ForkliftClass::ALL
            .into_iter()
            .find(|class| class.code() == needle)
            .ok_or_else(|| {
                CalcError::unknown_variant("forklift class", s, &["sitdown", "reach", "narrow_aisle", "vna"])
            })
    }
}

/// Wall carrying the dock doors. Rows run perpendicular to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DockSide {
    North,
    #[default]
    South,
    East,
    West,
}

/// Pallet footprint in whole inches.
///
/// `width_in` is the face presented to the beam. Serializes as `"WxD"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PalletSize {
    pub width_in: u32,
    pub depth_in: u32,
}

impl PalletSize {
    /// GMA standard 48x40 pallet
    pub const GMA: PalletSize = PalletSize { width_in: 48, depth_in: 40 };

    pub fn new(width_in: u32, depth_in: u32) -> Self {
        PalletSize { width_in, depth_in }
    }
}

impl Default for PalletSize {
    fn default() -> Self {
        PalletSize::GMA
    }
}

impl FromStr for PalletSize {
    type Err = CalcError;

    /// Accepts `48x40`, `48 x 40`, `48X40` and `40"x48"`.
    fn from_str(s: &str) -> CalcResult<Self> {
        let cleaned = s.trim().to_ascii_lowercase().replace('"', "");
        let mut parts = cleaned.split('x').map(str::trim);

        let parse = |part: Option<&str>| -> CalcResult<u32> {
            part.and_then(|p| p.parse::<u32>().ok())
                .filter(|v| *v > 0)
                .ok_or_else(|| {
                    CalcError::invalid_input("palletSize", s, "Expected 'WxD' in whole inches, e.g. '48x40'")
                })
        };

        let width_in = parse(parts.next())?;
        let depth_in = parse(parts.next())?;
        if parts.next().is_some() {
            return Err(CalcError::invalid_input(
                "palletSize",
                s,
                "Expected exactly two dimensions",
            ));
        }
        Ok(PalletSize { width_in, depth_in })
    }
}

impl TryFrom<String> for PalletSize {
    type Error = CalcError;

    fn try_from(value: String) -> CalcResult<Self> {
        value.parse()
    }
}

impl From<PalletSize> for String {
    fn from(size: PalletSize) -> Self {
        size.to_string()
    }
}

impl fmt::Display for PalletSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width_in, self.depth_in)
    }
}

/// Deep frames take the wider manufactured deck.
pub const DEEP_FRAME_THRESHOLD_IN: f64 = 44.0;

/// Wire-deck width for a frame depth: 46" up to 44" deep, 58" beyond.
pub fn auto_deck_width_in(frame_depth_in: f64) -> f64 {
    if frame_depth_in <= DEEP_FRAME_THRESHOLD_IN {
        46.0
    } else {
        58.0
    }
}

/// Default frame anchors absent a seismic requirement: 2 up to 44" deep, 8 beyond.
pub fn auto_anchors_per_frame(frame_depth_in: f64) -> u32 {
    if frame_depth_in <= DEEP_FRAME_THRESHOLD_IN {
        2
    } else {
        8
    }
}

/// Decks spanning one beam pair: `floor(beam / deck)`, never fewer than one.
pub fn decks_per_level(beam_length_in: f64, deck_width_in: f64) -> u32 {
    if deck_width_in <= 0.0 {
        return 1;
    }
    ((beam_length_in / deck_width_in).floor() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aisle_widths() {
        assert_eq!(ForkliftClass::Sitdown.aisle_width_in(), 144);
        assert_eq!(ForkliftClass::Reach.aisle_width_in(), 120);
        assert_eq!(ForkliftClass::NarrowAisle.aisle_width_in(), 72);
        assert_eq!(ForkliftClass::Vna.aisle_width_in(), 66);
    }

    #[test]
    fn test_forklift_serde_tags() {
        let json = serde_json::to_string(&ForkliftClass::NarrowAisle).unwrap();
        assert_eq!(json, "\"narrow_aisle\"");
        assert!(serde_json::from_str::<ForkliftClass>("\"hovercraft\"").is_err());
    }

    #[test]
    fn test_rack_style_parse() {
        assert_eq!("Structural".parse::<RackStyle>().unwrap(), RackStyle::Structural);
        let err = "cantilever".parse::<RackStyle>().unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_VARIANT");
    }

    #[test]
    fn test_pallet_size_parse_variants() {
        assert_eq!("48x40".parse::<PalletSize>().unwrap(), PalletSize::new(48, 40));
        assert_eq!(" 42 X 42 ".parse::<PalletSize>().unwrap(), PalletSize::new(42, 42));
        assert_eq!("40\"x48\"".parse::<PalletSize>().unwrap(), PalletSize::new(40, 48));
    }

    #[test]
    fn test_pallet_size_rejects_garbage() {
        assert!("48".parse::<PalletSize>().is_err());
        assert!("48x".parse::<PalletSize>().is_err());
        assert!("0x40".parse::<PalletSize>().is_err());
        assert!("48x40x6".parse::<PalletSize>().is_err());
        assert!("big".parse::<PalletSize>().is_err());
    }

    #[test]
    fn test_pallet_size_serializes_as_string() {
        let json = serde_json::to_string(&PalletSize::GMA).unwrap();
        assert_eq!(json, "\"48x40\"");
        assert!(serde_json::from_str::<PalletSize>("\"abc\"").is_err());
    }

    #[test]
    fn test_depth_rules() {
        assert_eq!(auto_deck_width_in(42.0), 46.0);
        assert_eq!(auto_deck_width_in(44.0), 46.0);
        assert_eq!(auto_deck_width_in(48.0), 58.0);
        assert_eq!(auto_anchors_per_frame(42.0), 2);
        assert_eq!(auto_anchors_per_frame(48.0), 8);
    }

    #[test]
    fn test_decks_per_level() {
        assert_eq!(decks_per_level(96.0, 46.0), 2);
        assert_eq!(decks_per_level(144.0, 46.0), 3);
        assert_eq!(decks_per_level(144.0, 58.0), 2);
        assert_eq!(decks_per_level(40.0, 46.0), 1);
    }

    #[test]
    fn test_style_rules() {
        assert!(RackStyle::Structural.requires_bolted_hardware());
        assert!(!RackStyle::Teardrop.requires_bolted_hardware());
        assert_eq!(RackStyle::Teardrop.deck_type(), "Step");
        assert_eq!(RackStyle::Structural.deck_type(), "Flanged");
    }
}
