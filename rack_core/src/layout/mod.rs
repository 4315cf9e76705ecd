//! # Layout Synthesis
//!
//! Turns a building envelope and rack requirements into a selective pallet
//! rack arrangement: frame and beam sizing, back-to-back row pairs packed
//! across the building width, bays packed along its depth, cross-aisle
//! tunnels, a building-column overlay and the bay-type summary consumed by
//! [`crate::bom::compute_bom`].
//!
//! Placement is a single deterministic greedy pass. Rows run perpendicular to
//! the dock wall; x is measured from the side wall, y from the dock wall.
//!
//! ## Example
//!
//! ```rust
//! use rack_core::layout::{design_layout, BuildingEnvelope, RackRequirements};
//!
//! let building = BuildingEnvelope::new(600.0, 300.0, 32.0);
//! let result = design_layout(&building, &RackRequirements::default()).unwrap();
//!
//! assert_eq!(result.frame_height_in, 336);
//! assert_eq!(result.beam_length_in, 96);
//! assert!(result.total_pallet_positions > 0);
//! ```
//!
//! ## JSON Request
//!
//! ```json
//! {
//!   "building": { "lengthFt": 600, "widthFt": 300, "clearHeightFt": 32, "numDockDoors": 15 },
//!   "requirements": { "palletSize": "48x40", "frameDepthIn": 42, "forkliftType": "reach" }
//! }
//! ```

mod engine;
pub mod report;
pub mod sizing;

pub use engine::design_layout_with;

use serde::{Deserialize, Serialize};

use crate::bom::BayType;
use crate::config::LayoutConfig;
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::racking::{DockSide, ForkliftClass, PalletSize, RackStyle};

fn default_dock_doors() -> u32 {
    10
}

fn default_column_size() -> f64 {
    24.0
}

/// Rectangular area rows must stay out of (offices, mezzanines, chargers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExcludedZone {
    #[serde(default)]
    pub label: String,
    /// Offset from the side wall (ft)
    pub x_ft: f64,
    /// Offset from the dock wall (ft)
    pub y_ft: f64,
    /// Extent across the building width (ft)
    pub width_ft: f64,
    /// Extent along the building length (ft)
    pub length_ft: f64,
}

impl ExcludedZone {
    /// Whether this zone intersects the rectangle `[x0, x1] x [y0, y1]` (ft).
    pub fn overlaps(&self, x0: f64, x1: f64, y0: f64, y1: f64) -> bool {
        self.x_ft < x1 && x0 < self.x_ft + self.width_ft && self.y_ft < y1 && y0 < self.y_ft + self.length_ft
    }
}

/// Building shell the racking goes into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildingEnvelope {
    /// Dock wall to back wall (ft)
    pub length_ft: f64,
    /// Side wall to side wall (ft)
    pub width_ft: f64,
    /// Floor to lowest overhead obstruction (ft)
    pub clear_height_ft: f64,
    #[serde(default)]
    pub dock_side: DockSide,
    #[serde(default = "default_dock_doors")]
    pub num_dock_doors: u32,
    /// Column spacing across the width, 0 = no columns (ft)
    #[serde(default)]
    pub column_grid_x_ft: f64,
    /// Column spacing along the length, 0 = no columns (ft)
    #[serde(default)]
    pub column_grid_y_ft: f64,
    #[serde(default = "default_column_size")]
    pub column_size_in: f64,
    #[serde(default)]
    pub exclusions: Vec<ExcludedZone>,
}

impl BuildingEnvelope {
    /// Envelope with default dock, no columns and no exclusions.
    pub fn new(length_ft: f64, width_ft: f64, clear_height_ft: f64) -> Self {
        BuildingEnvelope {
            length_ft,
            width_ft,
            clear_height_ft,
            dock_side: DockSide::default(),
            num_dock_doors: default_dock_doors(),
            column_grid_x_ft: 0.0,
            column_grid_y_ft: 0.0,
            column_size_in: default_column_size(),
            exclusions: Vec::new(),
        }
    }

    pub fn area_sqft(&self) -> f64 {
        self.length_ft * self.width_ft
    }

    pub fn has_column_grid(&self) -> bool {
        self.column_grid_x_ft > 0.0 && self.column_grid_y_ft > 0.0
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_positive("lengthFt", self.length_ft)?;
        require_positive("widthFt", self.width_ft)?;
        require_positive("clearHeightFt", self.clear_height_ft)?;
        require_non_negative("columnGridXFt", self.column_grid_x_ft)?;
        require_non_negative("columnGridYFt", self.column_grid_y_ft)?;
        require_positive("columnSizeIn", self.column_size_in)?;
        for zone in &self.exclusions {
            require_non_negative("exclusions.xFt", zone.x_ft)?;
            require_non_negative("exclusions.yFt", zone.y_ft)?;
            require_positive("exclusions.widthFt", zone.width_ft)?;
            require_positive("exclusions.lengthFt", zone.length_ft)?;
        }
        Ok(())
    }
}

/// What the racking has to hold and how it is serviced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct RackRequirements {
    /// 0 = maximize
    pub target_pallet_positions: u32,
    pub pallet_size: PalletSize,
    pub pallet_weight_lbs: u32,
    pub rack_style: RackStyle,
    pub frame_depth_in: f64,
    pub forklift_type: ForkliftClass,
    pub min_staging_depth_ft: f64,
    /// Bays between cross-aisles, 0 = configured default
    pub cross_aisle_spacing: u32,
    /// 0 = as many as the frame allows
    pub max_beam_levels: u32,
}

impl Default for RackRequirements {
    fn default() -> Self {
        RackRequirements {
            target_pallet_positions: 0,
            pallet_size: PalletSize::GMA,
            pallet_weight_lbs: 2500,
            rack_style: RackStyle::Teardrop,
            frame_depth_in: 42.0,
            forklift_type: ForkliftClass::Reach,
            min_staging_depth_ft: 50.0,
            cross_aisle_spacing: 0,
            max_beam_levels: 0,
        }
    }
}

impl RackRequirements {
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("frameDepthIn", self.frame_depth_in)?;
        require_non_negative("minStagingDepthFt", self.min_staging_depth_ft)?;
        if self.pallet_weight_lbs == 0 {
            return Err(CalcError::invalid_input(
                "palletWeightLbs",
                "0",
                "Must be a positive number",
            ));
        }
        Ok(())
    }
}

/// Wire request for a layout design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LayoutRequest {
    pub building: BuildingEnvelope,
    #[serde(default)]
    pub requirements: RackRequirements,
}

/// Position of a row within its back-to-back pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowSide {
    Left,
    Right,
    /// Single-deep row against the far wall
    Wall,
}

/// One physical rack row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub row_id: u32,
    /// Distance from the side wall to the row's near face (ft)
    pub x_ft: f64,
    pub y_start_ft: f64,
    pub y_end_ft: f64,
    pub bays: u32,
    /// `None` for the unpaired wall row
    pub pair_id: Option<u32>,
    pub side: RowSide,
}

impl Row {
    pub fn is_back_to_back(&self) -> bool {
        self.pair_id.is_some()
    }
}

/// Tunnel cutting across every row at one bay position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossAisle {
    pub bay_position: u32,
    pub y_ft: f64,
    pub width_ft: f64,
}

/// Interior building column, with advisory conflict flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPosition {
    pub x_ft: f64,
    pub y_ft: f64,
    pub size_in: f64,
    /// Center falls inside a row footprint
    pub conflicts_with_rack: bool,
    /// Center falls in a working aisle within the rack zone
    pub protector_needed: bool,
}

/// Dock-side area left clear of racking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingArea {
    pub depth_ft: f64,
    pub width_ft: f64,
    pub area_sqft: f64,
    pub dock_side: DockSide,
    pub num_dock_doors: u32,
}

/// Complete layout design. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    // Rack specs
    pub frame_height_in: u32,
    pub beam_levels: u32,
    pub beam_length_in: u32,
    pub aisle_width_in: u32,
    pub pallets_per_bay: u32,

    // Geometry
    pub rows: Vec<Row>,
    pub row_pairs: u32,
    pub cross_aisles: Vec<CrossAisle>,
    pub columns: Vec<ColumnPosition>,
    pub staging_area: StagingArea,

    // BOM hand-off
    pub bay_types: Vec<BayType>,

    // Totals
    pub total_pallet_positions: u32,
    pub total_bays: u32,
    pub total_rows: u32,
    pub total_frames: u32,
    pub end_frames: u32,
    pub tunnel_bays: u32,
    pub utilization_pct: f64,

    pub notes: Vec<String>,
    pub warnings: Vec<String>,
}

impl LayoutResult {
    /// Whether any rack could be placed at all
    pub fn is_feasible(&self) -> bool {
        !self.rows.is_empty() && self.total_bays > 0
    }

    /// Bays that are not tunnels
    pub fn standard_bays(&self) -> u32 {
        self.total_bays - self.tunnel_bays
    }
}

/// Design a layout with the default configuration.
pub fn design_layout(building: &BuildingEnvelope, requirements: &RackRequirements) -> CalcResult<LayoutResult> {
    design_layout_with(&LayoutConfig::default(), building, requirements)
}
