//! # Bill of Materials
//!
//! Quantity takeoff for selective pallet rack. The engine consumes a list of
//! [`BayType`] stamps (hand-authored or produced by
//! [`crate::layout::design_layout`]) plus a few project-wide parameters and
//! emits merged [`BomLine`]s with a summary.
//!
//! ## Counting Model
//!
//! | Quantity        | Per bay type                                                  |
//! |-----------------|---------------------------------------------------------------|
//! | Frames          | `bays + endFrames + tunnels`                                   |
//! | Beams           | `bays × beamsPerBay + tunnels × tunnelBeamsPerBay`             |
//! | Wire decks      | `bays × wiredecksPerBay + tunnels × tunnelBeams/2 × decks/level`|
//! | Pallet supports | `bays × palletSupportsPerBay` (structural only)                |
//!
//! Anchors, shims and hardware are derived from the running frame and beam
//! totals. Lines sharing a (category, description) are merged.
//!
//! ## JSON Request
//!
//! ```json
//! {
//!   "rackStyle": "teardrop",
//!   "frameHeight": 264,
//!   "frameDepth": 42,
//!   "bayTypes": [
//!     { "label": "A", "bays": 100, "endFrames": 10, "tunnels": 2,
//!       "beamLength": 96, "beamsPerBay": 8, "wiredecksPerBay": 8 }
//!   ],
//!   "eoaGuardsLeft": 10,
//!   "eoaGuardsRight": 10,
//!   "spacers": [{ "size": "12", "qty": 150 }]
//! }
//! ```

mod engine;
pub mod quick;

pub use engine::compute_bom;
pub use quick::{QuickBayType, QuickBomInput};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::compliance::SeismicDesignCategory;
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::racking::RackStyle;

/// Frame anchor size when neither the caller nor a seismic category sets one.
pub const DEFAULT_ANCHOR_SIZE: &str = "1/2\" x 4\"";

/// End-of-aisle guards take dedicated 3/4" anchors.
pub const GUARD_ANCHOR_SIZE: &str = "3/4\" x 4\"";

/// Row spacers estimated per frame when no spacer list is given.
pub const SPACERS_PER_FRAME_ESTIMATE: f64 = 1.5;

fn default_label() -> String {
    "?".to_string()
}

fn default_beam_length() -> u32 {
    96
}

fn default_beams_per_bay() -> u32 {
    8
}

fn default_tunnel_beam_length() -> u32 {
    144
}

fn default_tunnel_beams_per_bay() -> u32 {
    4
}

/// One category of bay sharing a beam size and level count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BayType {
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default)]
    pub bays: u32,
    #[serde(default)]
    pub end_frames: u32,
    #[serde(default)]
    pub tunnels: u32,
    /// Standard beam length (in)
    #[serde(default = "default_beam_length")]
    pub beam_length: u32,
    /// Levels × 2 (front and back beam)
    #[serde(default = "default_beams_per_bay")]
    pub beams_per_bay: u32,
    #[serde(default)]
    pub wiredecks_per_bay: u32,
    #[serde(default)]
    pub pallet_supports_per_bay: u32,
    /// Tunnel beam length (in)
    #[serde(default = "default_tunnel_beam_length")]
    pub tunnel_beam_length: u32,
    #[serde(default = "default_tunnel_beams_per_bay")]
    pub tunnel_beams_per_bay: u32,
}

impl BayType {
    /// Frames this bay type needs: one per bay, per end and per tunnel.
    pub fn frames(&self) -> u32 {
        self.bays.saturating_add(self.end_frames).saturating_add(self.tunnels)
    }

    /// Beam levels in a tunnel bay
    pub fn tunnel_levels(&self) -> u32 {
        self.tunnel_beams_per_bay / 2
    }
}

/// Row spacer line supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpacerSpec {
    /// Spacer length in inches, as printed on the line
    #[serde(default = "default_spacer_size")]
    pub size: String,
    #[serde(default)]
    pub qty: u32,
}

fn default_spacer_size() -> String {
    "12".to_string()
}

fn default_frame_height() -> u32 {
    264
}

fn default_frame_depth() -> f64 {
    42.0
}

fn default_shims_per_frame() -> u32 {
    1
}

fn default_guard_anchors_per() -> u32 {
    4
}

/// BOM request.
///
/// `deckWidth` and `anchorsPerFrame` resolve from the frame depth (and, for
/// anchors, the seismic category) when omitted or zero. Omitting `spacers`
/// estimates them from the frame count; an explicit list, even empty, is
/// used as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BomRequest {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub rack_style: RackStyle,
    #[serde(default)]
    pub manufacturer: String,
    /// Upright height (in)
    #[serde(default = "default_frame_height")]
    pub frame_height: u32,
    /// Frame depth (in)
    #[serde(default = "default_frame_depth")]
    pub frame_depth: f64,
    #[serde(default)]
    pub deck_width: Option<f64>,
    #[serde(default)]
    pub anchors_per_frame: Option<u32>,
    #[serde(default = "default_shims_per_frame")]
    pub shims_per_frame: u32,
    #[serde(default)]
    pub bay_types: Vec<BayType>,
    #[serde(default)]
    pub eoa_guards_left: u32,
    #[serde(default)]
    pub eoa_guards_right: u32,
    #[serde(default)]
    pub spacers: Option<Vec<SpacerSpec>>,
    #[serde(default)]
    pub pallet_positions: u32,
    #[serde(default)]
    pub anchor_size: Option<String>,
    #[serde(default = "default_guard_anchors_per")]
    pub guard_anchors_per: u32,
    #[serde(default)]
    pub seismic_design_category: Option<SeismicDesignCategory>,
}

impl Default for BomRequest {
    fn default() -> Self {
        BomRequest {
            project_name: String::new(),
            client: String::new(),
            rack_style: RackStyle::default(),
            manufacturer: String::new(),
            frame_height: default_frame_height(),
            frame_depth: default_frame_depth(),
            deck_width: None,
            anchors_per_frame: None,
            shims_per_frame: default_shims_per_frame(),
            bay_types: Vec::new(),
            eoa_guards_left: 0,
            eoa_guards_right: 0,
            spacers: None,
            pallet_positions: 0,
            anchor_size: None,
            guard_anchors_per: default_guard_anchors_per(),
            seismic_design_category: None,
        }
    }
}

impl BomRequest {
    pub fn validate(&self) -> CalcResult<()> {
        if self.frame_height == 0 {
            return Err(CalcError::invalid_input("frameHeight", "0", "Must be a positive number"));
        }
        require_positive("frameDepth", self.frame_depth)?;
        if let Some(width) = self.deck_width {
            if width != 0.0 {
                require_positive("deckWidth", width)?;
            }
        }
        for bay_type in &self.bay_types {
            if bay_type.label.trim().is_empty() {
                return Err(CalcError::missing_field("bayTypes.label"));
            }
        }
        Ok(())
    }
}

/// BOM line category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BomCategory {
    Frames,
    Beams,
    #[serde(rename = "Wire Decks")]
    WireDecks,
    #[serde(rename = "Pallet Supports")]
    PalletSupports,
    #[serde(rename = "Row Spacers")]
    RowSpacers,
    Anchors,
    Shims,
    #[serde(rename = "End-of-Aisle Guards")]
    EndOfAisleGuards,
    Hardware,
}

impl BomCategory {
    pub fn name(&self) -> &'static str {
        match self {
            BomCategory::Frames => "Frames",
            BomCategory::Beams => "Beams",
            BomCategory::WireDecks => "Wire Decks",
            BomCategory::PalletSupports => "Pallet Supports",
            BomCategory::RowSpacers => "Row Spacers",
            BomCategory::Anchors => "Anchors",
            BomCategory::Shims => "Shims",
            BomCategory::EndOfAisleGuards => "End-of-Aisle Guards",
            BomCategory::Hardware => "Hardware",
        }
    }
}

impl fmt::Display for BomCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One priced line of the BOM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomLine {
    /// Description encoding style, dimension and material
    pub item: String,
    pub qty: u32,
    pub category: BomCategory,
    /// Quantity contributed by each bay type label
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub qty_by_type: BTreeMap<String, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Per-bay-type quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BayTypeDetail {
    pub label: String,
    pub bays: u32,
    pub end_frames: u32,
    pub tunnels: u32,
    pub beam_length: u32,
    pub beams_per_bay: u32,
    pub wiredecks_per_bay: u32,
    pub pallet_supports_per_bay: u32,
    pub frames: u32,
    pub beams: u32,
    pub wiredecks: u32,
    pub pallet_supports: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomSummary {
    pub total_bays: u32,
    pub total_tunnels: u32,
    pub total_frames: u32,
    pub total_beams: u32,
    pub total_wiredecks: u32,
    pub total_pallet_supports: u32,
    pub total_anchors: u32,
    pub total_eoa_guards: u32,
    pub total_pallet_positions: u32,
}

/// Full BOM output with the resolved project parameters echoed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomResult {
    pub project_name: String,
    pub client: String,
    pub rack_style: RackStyle,
    pub manufacturer: String,
    pub frame_height: u32,
    pub frame_depth: f64,
    pub deck_width: f64,
    pub anchors_per_frame: u32,
    pub anchor_size: String,
    pub shims_per_frame: u32,
    pub bay_type_details: Vec<BayTypeDetail>,
    pub bom_items: Vec<BomLine>,
    pub summary: BomSummary,
}

impl BomResult {
    /// Lines in one category, in output order
    pub fn lines_in(&self, category: BomCategory) -> impl Iterator<Item = &BomLine> {
        self.bom_items.iter().filter(move |line| line.category == category)
    }

    /// Summed quantity of one category
    pub fn category_total(&self, category: BomCategory) -> u32 {
        self.lines_in(category).map(|line| line.qty).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bay_type_defaults() {
        let bay_type: BayType = serde_json::from_str(r#"{"label": "A", "bays": 10}"#).unwrap();
        assert_eq!(bay_type.beam_length, 96);
        assert_eq!(bay_type.beams_per_bay, 8);
        assert_eq!(bay_type.tunnel_beam_length, 144);
        assert_eq!(bay_type.tunnel_beams_per_bay, 4);
        assert_eq!(bay_type.tunnel_levels(), 2);
    }

    #[test]
    fn test_bay_type_frames() {
        let bay_type = BayType {
            label: "A".to_string(),
            bays: 100,
            end_frames: 10,
            tunnels: 4,
            beam_length: 96,
            beams_per_bay: 8,
            wiredecks_per_bay: 8,
            pallet_supports_per_bay: 0,
            tunnel_beam_length: 144,
            tunnel_beams_per_bay: 6,
        };
        assert_eq!(bay_type.frames(), 114);
    }

    #[test]
    fn test_request_spacers_absent_vs_empty() {
        let absent: BomRequest = serde_json::from_str(r#"{"bayTypes": []}"#).unwrap();
        assert!(absent.spacers.is_none());
        let empty: BomRequest = serde_json::from_str(r#"{"bayTypes": [], "spacers": []}"#).unwrap();
        assert_eq!(empty.spacers, Some(vec![]));
    }

    #[test]
    fn test_request_rejects_bad_style() {
        assert!(serde_json::from_str::<BomRequest>(r#"{"rackStyle": "drive-in"}"#).is_err());
        assert!(serde_json::from_str::<BomRequest>(r#"{"frameHieght": 240}"#).is_err());
    }

    #[test]
    fn test_category_names() {
        let json = serde_json::to_string(&BomCategory::EndOfAisleGuards).unwrap();
        assert_eq!(json, "\"End-of-Aisle Guards\"");
        assert_eq!(BomCategory::WireDecks.to_string(), "Wire Decks");
    }

    #[test]
    fn test_validation() {
        assert!(BomRequest::default().validate().is_ok());
        let request = BomRequest {
            frame_depth: 0.0,
            ..BomRequest::default()
        };
        assert!(request.validate().is_err());
    }
}
