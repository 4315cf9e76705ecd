//! # Estimate Pipeline
//!
//! Wires the three engines together: building and requirements go through
//! layout synthesis, the resulting bay types feed the BOM, and when site data
//! allows it the compliance rules run against the designed storage height.
//!
//! Site data only ever adds detail. Without a seismic category the BOM falls
//! back to the frame-depth anchor rule; without a commodity class the
//! compliance section is omitted. Neither aborts the estimate.
//!
//! ## Example
//!
//! ```rust
//! use rack_core::estimate::{run_estimate, EstimateRequest};
//! use rack_core::layout::BuildingEnvelope;
//!
//! let request = EstimateRequest::new(BuildingEnvelope::new(600.0, 300.0, 32.0));
//! let estimate = run_estimate(&request).unwrap();
//!
//! assert_eq!(estimate.bom.summary.total_frames, estimate.layout.total_frames);
//! assert!(estimate.compliance.is_none());
//! ```

use serde::{Deserialize, Serialize};

use crate::bom::{compute_bom, BomRequest, BomResult, SpacerSpec};
use crate::compliance::{assess, CommodityClass, ComplianceAssessment, ComplianceRequest, Jurisdiction};
use crate::config::LayoutConfig;
use crate::errors::CalcResult;
use crate::layout::{design_layout_with, BuildingEnvelope, LayoutResult, RackRequirements};
use crate::site::SiteData;

fn default_true() -> bool {
    true
}

/// End-to-end estimate request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EstimateRequest {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub manufacturer: String,
    pub building: BuildingEnvelope,
    #[serde(default)]
    pub requirements: RackRequirements,
    /// Resolved site data; absent means no lookup was possible
    #[serde(default)]
    pub site: Option<SiteData>,
    /// Overrides the site's commodity class
    #[serde(default)]
    pub commodity_class: Option<CommodityClass>,
    #[serde(default = "default_true")]
    pub building_sprinklered: bool,
    /// End-of-aisle guards per side; defaults to two per row
    #[serde(default)]
    pub eoa_guards_per_side: Option<u32>,
    /// Row spacers; estimated from the frame count when absent
    #[serde(default)]
    pub spacers: Option<Vec<SpacerSpec>>,
}

impl EstimateRequest {
    pub fn new(building: BuildingEnvelope) -> Self {
        EstimateRequest {
            project_name: String::new(),
            client: String::new(),
            manufacturer: String::new(),
            building,
            requirements: RackRequirements::default(),
            site: None,
            commodity_class: None,
            building_sprinklered: true,
            eoa_guards_per_side: None,
            spacers: None,
        }
    }
}

/// Layout, BOM and (when possible) compliance for one building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub layout: LayoutResult,
    pub bom: BomResult,
    pub compliance: Option<ComplianceAssessment>,
    pub site: SiteData,
    pub notes: Vec<String>,
}

/// Run the full pipeline with the default configuration.
pub fn run_estimate(request: &EstimateRequest) -> CalcResult<Estimate> {
    run_estimate_with(&LayoutConfig::default(), request)
}

pub fn run_estimate_with(config: &LayoutConfig, request: &EstimateRequest) -> CalcResult<Estimate> {
    let site = request.site.clone().unwrap_or_else(SiteData::unavailable);
    let mut notes = Vec::new();

    let layout = design_layout_with(config, &request.building, &request.requirements)?;

    if site.seismic_design_category.is_none() {
        notes.push("No seismic data; anchors sized by frame depth".to_string());
    }

    let guards_per_side = request.eoa_guards_per_side.unwrap_or(layout.total_rows * 2);
    let bom_request = BomRequest {
        project_name: request.project_name.clone(),
        client: request.client.clone(),
        rack_style: request.requirements.rack_style,
        manufacturer: request.manufacturer.clone(),
        frame_height: layout.frame_height_in,
        frame_depth: request.requirements.frame_depth_in,
        bay_types: layout.bay_types.clone(),
        eoa_guards_left: guards_per_side,
        eoa_guards_right: guards_per_side,
        spacers: request.spacers.clone(),
        pallet_positions: layout.total_pallet_positions,
        seismic_design_category: site.seismic_design_category,
        ..BomRequest::default()
    };
    let bom = compute_bom(&bom_request)?;

    let commodity = request.commodity_class.or(site.commodity_class);
    let compliance = match commodity {
        Some(commodity_class) => {
            let frame_height_ft = f64::from(layout.frame_height_in) / 12.0;
            let storage_depth_ft = (request.building.length_ft - request.requirements.min_staging_depth_ft).max(0.0);
            let compliance_request = ComplianceRequest {
                seismic_design_category: site.seismic_design_category,
                storage_height_ft: frame_height_ft,
                commodity_class,
                storage_area_sqft: storage_depth_ft * request.building.width_ft,
                building_sprinklered: request.building_sprinklered,
                jurisdiction: site.resolved_jurisdiction().unwrap_or(Jurisdiction::IBC),
                clear_height_ft: Some(request.building.clear_height_ft),
                rack_style: request.requirements.rack_style,
                total_frames: layout.total_frames,
                frame_height_ft: Some(frame_height_ft),
                sprinkler_modification: false,
            };
            Some(assess(&compliance_request)?)
        }
        None => {
            notes.push("No commodity class; compliance assessment omitted".to_string());
            None
        }
    };

    tracing::info!(
        pallet_positions = layout.total_pallet_positions,
        frames = bom.summary.total_frames,
        compliance = compliance.is_some(),
        "estimate complete"
    );

    Ok(Estimate {
        layout,
        bom,
        compliance,
        site,
        notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bom::BomCategory;
    use crate::compliance::SeismicDesignCategory;

    fn request() -> EstimateRequest {
        EstimateRequest::new(BuildingEnvelope::new(600.0, 300.0, 32.0))
    }

    #[test]
    fn test_estimate_without_site_data() {
        let estimate = run_estimate(&request()).unwrap();
        assert_eq!(estimate.bom.summary.total_frames, estimate.layout.total_frames);
        assert_eq!(estimate.bom.anchors_per_frame, 2);
        assert!(estimate.compliance.is_none());
        assert_eq!(estimate.notes.len(), 2);
    }

    #[test]
    fn test_estimate_with_high_seismic_site() {
        let mut req = request();
        req.site = Some(SiteData {
            seismic_design_category: Some(SeismicDesignCategory::D),
            commodity_class: Some(CommodityClass::III),
            jurisdiction: Some(Jurisdiction::CBC),
            ..SiteData::unavailable()
        });
        let estimate = run_estimate(&req).unwrap();

        assert_eq!(estimate.bom.anchors_per_frame, 8);
        let compliance = estimate.compliance.unwrap();
        // 336" frames = 28ft storage height
        assert!(compliance.high_pile.is_high_pile);
        assert_eq!(compliance.seismic.unwrap().anchors_per_frame, 8);
        assert_eq!(compliance.permits.typical_timeline_weeks, 6);
        assert!(estimate.notes.is_empty());
    }

    #[test]
    fn test_commodity_override_without_seismic() {
        let mut req = request();
        req.commodity_class = Some(CommodityClass::II);
        let estimate = run_estimate(&req).unwrap();
        let compliance = estimate.compliance.unwrap();
        assert!(compliance.seismic.is_none());
        assert_eq!(compliance.high_pile.commodity_class, CommodityClass::II);
    }

    #[test]
    fn test_guard_default_is_two_per_row() {
        let estimate = run_estimate(&request()).unwrap();
        assert_eq!(
            estimate.bom.category_total(BomCategory::EndOfAisleGuards),
            estimate.layout.total_rows * 4
        );
    }

    #[test]
    fn test_estimate_json_roundtrip_of_request() {
        let json = r#"{
            "building": {"lengthFt": 400, "widthFt": 200, "clearHeightFt": 28},
            "site": {"seismicDesignCategory": "B"},
            "eoaGuardsPerSide": 3
        }"#;
        let req: EstimateRequest = serde_json::from_str(json).unwrap();
        let estimate = run_estimate(&req).unwrap();
        assert_eq!(estimate.bom.category_total(BomCategory::EndOfAisleGuards), 6);
        assert_eq!(estimate.bom.anchors_per_frame, 2);
    }
}
