//! Rack component sizing from building and pallet dimensions.
//!
//! Each function is a single table lookup or counting rule over
//! [`LayoutConfig`]; the engine composes them.

use crate::config::LayoutConfig;
use crate::units::Inches;

/// Selected upright height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeightChoice {
    pub height_in: u32,
    /// False when nothing fit and the smallest standard height was used
    pub fits: bool,
}

/// Largest standard upright with `height <= clear - sprinkler clearance`.
///
/// Falls back to the smallest standard height when none fit.
pub fn select_frame_height(config: &LayoutConfig, clear_height: Inches) -> FrameHeightChoice {
    let max_frame = clear_height.0 - f64::from(config.sprinkler_clearance_in);

    match config
        .standard_frame_heights_in
        .iter()
        .rev()
        .find(|h| f64::from(**h) <= max_frame)
    {
        Some(height) => FrameHeightChoice {
            height_in: *height,
            fits: true,
        },
        None => FrameHeightChoice {
            height_in: config.min_frame_height_in(),
            fits: false,
        },
    }
}

/// Beam levels an upright supports: one below the first beam height,
/// then one more per full level spacing.
pub fn beam_levels_for(config: &LayoutConfig, frame_height_in: u32) -> u32 {
    if frame_height_in <= config.first_beam_height_in {
        return 1;
    }
    (frame_height_in - config.first_beam_height_in) / config.level_spacing_in + 1
}

/// Beam levels after an optional caller cap (`0` = no cap).
pub fn capped_beam_levels(config: &LayoutConfig, frame_height_in: u32, max_beam_levels: u32) -> u32 {
    let levels = beam_levels_for(config, frame_height_in);
    if max_beam_levels > 0 {
        levels.min(max_beam_levels)
    } else {
        levels
    }
}

/// Selected beam length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeamLengthChoice {
    pub length_in: u32,
    /// True when the required length exceeded the longest standard beam
    pub capped: bool,
}

/// Beam length for a pallet face width and pallets per bay.
///
/// The pallet map covers the common two-pallet bays; anything else is
/// `width x pallets + clearance` rounded up to a standard length.
pub fn beam_length_for(config: &LayoutConfig, pallet_width_in: u32, pallets_per_bay: u32) -> BeamLengthChoice {
    if pallets_per_bay == 2 {
        if let Some(mapping) = config
            .pallet_beam_lengths
            .iter()
            .find(|m| m.pallet_width_in == pallet_width_in)
        {
            return BeamLengthChoice {
                length_in: mapping.beam_length_in,
                capped: false,
            };
        }
    }

    let raw = pallet_width_in
        .saturating_mul(pallets_per_bay)
        .saturating_add(config.beam_clearance_in);
    match config.standard_beam_lengths_in.iter().find(|len| **len >= raw) {
        Some(length) => BeamLengthChoice {
            length_in: *length,
            capped: false,
        },
        None => BeamLengthChoice {
            length_in: config.standard_beam_lengths_in.last().copied().unwrap_or(raw),
            capped: true,
        },
    }
}
