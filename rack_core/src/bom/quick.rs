//! Quick BOM estimate from bay and row counts.
//!
//! For early pricing, when all that is known is how many bays and rows of
//! each type there are, how many beam levels they carry and a global tunnel
//! count. The input is converted into a canonical [`BomRequest`] so both
//! paths produce the same output shape.

use serde::{Deserialize, Serialize};

use super::{BayType, BomRequest};
use crate::errors::{qty_mul, require_positive, CalcError, CalcResult};
use crate::racking::{auto_deck_width_in, decks_per_level, RackStyle};

/// Bay type in the quick estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuickBayType {
    pub name: String,
    pub bay_count: u32,
    /// Rows of this type; one end frame each
    pub row_count: u32,
    pub beam_levels: u32,
}

fn default_manufacturer() -> String {
    "Mecalux".to_string()
}

fn default_beam_length() -> f64 {
    96.0
}

fn default_frame_height_ft() -> f64 {
    20.0
}

fn default_frame_depth() -> f64 {
    42.0
}

fn default_tunnel_beam_length() -> f64 {
    144.0
}

fn default_tunnel_beam_levels() -> u32 {
    2
}

/// Quick estimate input.
///
/// `deckWidth` and `anchorsPerFrame` of 0 resolve from the frame depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuickBomInput {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub rack_style: RackStyle,
    #[serde(default = "default_manufacturer")]
    pub manufacturer: String,
    #[serde(default = "default_beam_length")]
    pub beam_length: f64,
    #[serde(default = "default_frame_height_ft")]
    pub frame_height_ft: f64,
    #[serde(default = "default_frame_depth")]
    pub frame_depth: f64,
    #[serde(default)]
    pub total_pallet_positions: u32,
    #[serde(default)]
    pub tunnel_count: u32,
    #[serde(default = "default_tunnel_beam_length")]
    pub tunnel_beam_length: f64,
    #[serde(default = "default_tunnel_beam_levels")]
    pub tunnel_beam_levels: u32,
    #[serde(default)]
    pub bay_types: Vec<QuickBayType>,
    #[serde(default)]
    pub deck_width: f64,
    #[serde(default)]
    pub anchors_per_frame: u32,
}

impl Default for QuickBomInput {
    fn default() -> Self {
        QuickBomInput {
            project_name: String::new(),
            client_name: String::new(),
            rack_style: RackStyle::default(),
            manufacturer: default_manufacturer(),
            beam_length: default_beam_length(),
            frame_height_ft: default_frame_height_ft(),
            frame_depth: default_frame_depth(),
            total_pallet_positions: 0,
            tunnel_count: 0,
            tunnel_beam_length: default_tunnel_beam_length(),
            tunnel_beam_levels: default_tunnel_beam_levels(),
            bay_types: Vec::new(),
            deck_width: 0.0,
            anchors_per_frame: 0,
        }
    }
}

impl QuickBomInput {
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("beamLength", self.beam_length)?;
        require_positive("frameHeightFt", self.frame_height_ft)?;
        require_positive("frameDepth", self.frame_depth)?;
        require_positive("tunnelBeamLength", self.tunnel_beam_length)?;
        if self.bay_types.iter().any(|bt| bt.name.trim().is_empty()) {
            return Err(CalcError::missing_field("bayTypes.name"));
        }
        Ok(())
    }

    pub fn total_rows(&self) -> u32 {
        self.bay_types
            .iter()
            .fold(0u32, |total, bt| total.saturating_add(bt.row_count))
    }

    /// Convert into the canonical request.
    ///
    /// Each bay type gets one end frame per row; tunnels become their own
    /// `Tunnel` bay type. End-of-aisle guards default to two per row on each
    /// side and row spacers are estimated.
    pub fn to_request(&self) -> CalcResult<BomRequest> {
        self.validate()?;

        let deck_width = if self.deck_width > 0.0 {
            self.deck_width
        } else {
            auto_deck_width_in(self.frame_depth)
        };
        let beam_length = self.beam_length.round() as u32;
        let tunnel_beam_length = self.tunnel_beam_length.round() as u32;
        let decks_per_bay_level = decks_per_level(f64::from(beam_length), deck_width);
        let supports_per_deck = if self.rack_style.uses_pallet_supports() { 2 } else { 0 };

        let tunnel_beams_per_bay = qty_mul("tunnelBeamLevels", self.tunnel_beam_levels, 2)?;

        let mut bay_types: Vec<BayType> = self
            .bay_types
            .iter()
            .map(|quick| {
                let wiredecks_per_bay = qty_mul("beamLevels", quick.beam_levels, decks_per_bay_level)?;
                Ok(BayType {
                    label: quick.name.clone(),
                    bays: quick.bay_count,
                    end_frames: quick.row_count,
                    tunnels: 0,
                    beam_length,
                    beams_per_bay: qty_mul("beamLevels", quick.beam_levels, 2)?,
                    wiredecks_per_bay,
                    pallet_supports_per_bay: qty_mul("beamLevels", wiredecks_per_bay, supports_per_deck)?,
                    tunnel_beam_length,
                    tunnel_beams_per_bay,
                })
            })
            .collect::<CalcResult<_>>()?;

        if self.tunnel_count > 0 {
            bay_types.push(BayType {
                label: "Tunnel".to_string(),
                bays: 0,
                end_frames: 0,
                tunnels: self.tunnel_count,
                beam_length,
                beams_per_bay: 0,
                wiredecks_per_bay: 0,
                pallet_supports_per_bay: 0,
                tunnel_beam_length,
                tunnel_beams_per_bay,
            });
        }

        let guards_per_side = qty_mul("rowCount", self.total_rows(), 2)?;

        Ok(BomRequest {
            project_name: self.project_name.clone(),
            client: self.client_name.clone(),
            rack_style: self.rack_style,
            manufacturer: self.manufacturer.clone(),
            frame_height: (self.frame_height_ft * 12.0).round() as u32,
            frame_depth: self.frame_depth,
            deck_width: Some(deck_width),
            anchors_per_frame: (self.anchors_per_frame > 0).then_some(self.anchors_per_frame),
            bay_types,
            eoa_guards_left: guards_per_side,
            eoa_guards_right: guards_per_side,
            spacers: None,
            pallet_positions: self.total_pallet_positions,
            ..BomRequest::default()
        })
    }
}
