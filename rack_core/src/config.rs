//! # Engine Configuration
//!
//! Every fixed table and constant the layout engine relies on lives in
//! [`LayoutConfig`]. The `Default` impl is the industry-convention set the
//! engine ships with; a TOML file can override any subset of it.
//!
//! Configuration is immutable once built. Callers construct it at startup (or
//! read it from a project file) and pass it by reference into
//! [`crate::layout::design_layout_with`].
//!
//! ## TOML Example
//!
//! ```toml
//! sprinkler_clearance_in = 36
//! standard_frame_heights_in = [96, 120, 144, 168, 192, 216, 240, 264, 288, 336]
//! default_cross_aisle_spacing = 15
//!
//! [upright_width_in]
//! teardrop = 3
//! structural = 4
//! ```
//!
//! ```rust
//! use rack_core::config::LayoutConfig;
//!
//! let config = LayoutConfig::from_toml_str("default_cross_aisle_spacing = 15").unwrap();
//! assert_eq!(config.default_cross_aisle_spacing, 15);
//! assert_eq!(config.sprinkler_clearance_in, 36);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::racking::RackStyle;

/// Standard manufactured upright heights (in), ascending.
pub const STANDARD_FRAME_HEIGHTS_IN: [u32; 10] = [96, 120, 144, 168, 192, 216, 240, 264, 288, 336];

/// Standard manufactured beam lengths (in), ascending.
pub const STANDARD_BEAM_LENGTHS_IN: [u32; 9] = [48, 72, 84, 92, 96, 102, 108, 120, 144];

/// Minimum clearance between top of storage and ceiling sprinkler deflectors (ESFR).
pub const SPRINKLER_CLEARANCE_IN: u32 = 36;

/// Height of the first beam level (forklift mast clearance + floor pallet).
pub const FIRST_BEAM_HEIGHT_IN: u32 = 88;

/// Vertical module per level: 48" pallet + ~4" beam + ~6" operating clearance.
pub const LEVEL_SPACING_IN: u32 = 60;

/// Clearance kept from the back wall and both side walls.
pub const WALL_CLEARANCE_IN: u32 = 48;

/// Longitudinal flue between back-to-back rows.
pub const FLUE_SPACE_IN: u32 = 6;

/// Bays between cross-aisles when the caller does not specify.
pub const DEFAULT_CROSS_AISLE_SPACING: u32 = 20;

/// Tunnel beams span three pallets.
pub const TUNNEL_BEAM_LENGTH_IN: u32 = 144;

/// Pallet-to-beam-length convention for the common pallet widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PalletBeamMapping {
    /// Pallet face width presented to the beam (in)
    pub pallet_width_in: u32,
    /// Beam length used for a two-pallet bay (in)
    pub beam_length_in: u32,
}

/// Upright column profile width by rack style (in).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UprightWidths {
    pub teardrop: f64,
    pub structural: f64,
}

impl Default for UprightWidths {
    fn default() -> Self {
        UprightWidths {
            teardrop: 3.0,
            structural: 4.0,
        }
    }
}

/// Fixed tables and constants for layout synthesis.
///
/// Table-valued fields sit at the end so the struct serializes to valid TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Clearance from top of storage to sprinkler deflectors (in)
    pub sprinkler_clearance_in: u32,

    /// Height of the lowest beam level (in)
    pub first_beam_height_in: u32,

    /// Vertical spacing between beam levels (in)
    pub level_spacing_in: u32,

    /// Clearance from side walls and back wall (in)
    pub wall_clearance_in: u32,

    /// Longitudinal flue space between back-to-back rows (in)
    pub flue_space_in: u32,

    /// Bays between cross-aisles when the request leaves it at 0
    pub default_cross_aisle_spacing: u32,

    /// Pallets per standard bay (beam length convention assumes 2)
    pub pallets_per_bay: u32,

    /// Pallets per level in a tunnel bay
    pub tunnel_pallets_per_bay: u32,

    /// Beam length used for tunnel bays (in); also the cross-aisle width
    pub tunnel_beam_length_in: u32,

    /// Side clearance added to pallet widths when no mapping matches (in)
    pub beam_clearance_in: u32,

    /// Standard upright heights (in), ascending
    pub standard_frame_heights_in: Vec<u32>,

    /// Manufactured beam lengths (in), ascending
    pub standard_beam_lengths_in: Vec<u32>,

    /// Pallet-width → beam-length convention for two-pallet bays
    pub pallet_beam_lengths: Vec<PalletBeamMapping>,

    /// Upright profile widths by rack style
    pub upright_width_in: UprightWidths,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            sprinkler_clearance_in: SPRINKLER_CLEARANCE_IN,
            first_beam_height_in: FIRST_BEAM_HEIGHT_IN,
            level_spacing_in: LEVEL_SPACING_IN,
            wall_clearance_in: WALL_CLEARANCE_IN,
            flue_space_in: FLUE_SPACE_IN,
            default_cross_aisle_spacing: DEFAULT_CROSS_AISLE_SPACING,
            pallets_per_bay: 2,
            tunnel_pallets_per_bay: 3,
            tunnel_beam_length_in: TUNNEL_BEAM_LENGTH_IN,
            beam_clearance_in: 6,
            standard_frame_heights_in: STANDARD_FRAME_HEIGHTS_IN.to_vec(),
            standard_beam_lengths_in: STANDARD_BEAM_LENGTHS_IN.to_vec(),
            pallet_beam_lengths: vec![
                PalletBeamMapping { pallet_width_in: 48, beam_length_in: 96 },
                PalletBeamMapping { pallet_width_in: 42, beam_length_in: 96 },
                PalletBeamMapping { pallet_width_in: 40, beam_length_in: 96 },
            ],
            upright_width_in: UprightWidths::default(),
        }
    }
}

impl LayoutConfig {
    /// Parse a TOML document, filling omitted keys from the defaults.
    ///
    /// Unknown keys are rejected and the result is validated.
    pub fn from_toml_str(source: &str) -> CalcResult<Self> {
        let config: LayoutConfig =
            toml::from_str(source).map_err(|e| CalcError::serialization(format!("Invalid layout config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> CalcResult<String> {
        toml::to_string_pretty(self).map_err(|e| CalcError::serialization(e.to_string()))
    }

    /// Check internal consistency of the tables.
    pub fn validate(&self) -> CalcResult<()> {
        validate_ascending("standard_frame_heights_in", &self.standard_frame_heights_in)?;
        validate_ascending("standard_beam_lengths_in", &self.standard_beam_lengths_in)?;

        for (key, value) in [
            ("level_spacing_in", self.level_spacing_in),
            ("default_cross_aisle_spacing", self.default_cross_aisle_spacing),
            ("pallets_per_bay", self.pallets_per_bay),
            ("tunnel_pallets_per_bay", self.tunnel_pallets_per_bay),
            ("tunnel_beam_length_in", self.tunnel_beam_length_in),
        ] {
            if value == 0 {
                return Err(CalcError::invalid_config(key, "must be at least 1"));
            }
        }

        if self.upright_width_in.teardrop <= 0.0 || self.upright_width_in.structural <= 0.0 {
            return Err(CalcError::invalid_config("upright_width_in", "widths must be positive"));
        }

        if let Some(bad) = self.pallet_beam_lengths.iter().find(|m| m.beam_length_in == 0) {
            return Err(CalcError::invalid_config(
                "pallet_beam_lengths",
                format!("pallet width {} maps to a zero beam length", bad.pallet_width_in),
            ));
        }

        Ok(())
    }

    /// Upright profile width for a rack style (in)
    pub fn upright_width(&self, style: RackStyle) -> f64 {
        match style {
            RackStyle::Teardrop => self.upright_width_in.teardrop,
            RackStyle::Structural => self.upright_width_in.structural,
        }
    }

    /// Smallest standard upright height (in)
    pub fn min_frame_height_in(&self) -> u32 {
        self.standard_frame_heights_in.first().copied().unwrap_or(0)
    }
}

fn validate_ascending(key: &str, values: &[u32]) -> CalcResult<()> {
    if values.is_empty() {
        return Err(CalcError::invalid_config(key, "list must not be empty"));
    }
    if values[0] == 0 {
        return Err(CalcError::invalid_config(key, "values must be positive"));
    }
    if values.windows(2).any(|w| w[0] >= w[1]) {
        return Err(CalcError::invalid_config(key, "values must be strictly ascending"));
    }
    Ok(())
}
