//! # Code & Compliance Rules
//!
//! Pure decision tables mapping site and storage parameters to fire-code,
//! seismic, permitting and stock-sourcing requirements. Nothing here holds
//! state; every function is total over its enumerated inputs.
//!
//! ## Rule Sets
//!
//! - [`fire`] - High-piled combustible storage, sprinklers, flue spaces, clearances
//! - [`seismic`] - SDC-driven anchor, bracing and engineering requirements
//! - [`permits`] - Aggregated permit/approval list with jurisdiction overlays
//! - [`used_rack`] - Used-vs-new stock advisory
//!
//! ## Example
//!
//! ```rust
//! use rack_core::compliance::{assess, CommodityClass, ComplianceRequest, SeismicDesignCategory};
//!
//! let request = ComplianceRequest {
//!     seismic_design_category: Some(SeismicDesignCategory::D),
//!     storage_height_ft: 28.0,
//!     commodity_class: CommodityClass::III,
//!     storage_area_sqft: 200_000.0,
//!     ..ComplianceRequest::default()
//! };
//!
//! let assessment = assess(&request).unwrap();
//! assert!(assessment.high_pile.is_high_pile);
//! assert_eq!(assessment.seismic.unwrap().anchors_per_frame, 8);
//! ```

pub mod fire;
pub mod permits;
pub mod seismic;
pub mod used_rack;

pub use fire::{
    assess_high_pile, sprinkler_clearance_requirements, ClearanceRequirements, HighPileAssessment, SprinklerSpec,
    SprinklerSystemType,
};
pub use permits::{assess_permits, PermitRequirements};
pub use seismic::{seismic_requirements, AnchorClass, BracingLevel, SeismicRequirements};
pub use used_rack::{assess_used_vs_new, StockRecommendation, UsedRackAssessment};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{require_non_negative, CalcError, CalcResult};
use crate::racking::RackStyle;

/// Code section references cited in assessment notes.
pub mod code_ref {
    /// High-pile storage height thresholds
    pub const HIGH_PILE_THRESHOLD: &str = "IFC 2021 Table 3206.2";
    /// Fire department access aisles
    pub const FIRE_ACCESS_AISLES: &str = "IFC 2021 3206.9";
    /// Storage rack seismic design
    pub const RACK_SEISMIC: &str = "IBC 2021 Section 2209";
    /// California rack seismic design
    pub const RACK_SEISMIC_CA: &str = "2022 CBC Section 2209";
    /// Seismic ground motion
    pub const SEISMIC_LOADS: &str = "ASCE 7-22";
    /// Sprinkler installation, flue spaces and clearances
    pub const SPRINKLERS: &str = "NFPA 13";
    /// California high-piled storage chapter
    pub const CBC_HIGH_PILE: &str = "2022 CBC Chapter 32";
}

// ============================================================================
// Enumerations
// ============================================================================

/// Seismic Design Category per ASCE 7, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeismicDesignCategory {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl SeismicDesignCategory {
    pub const ALL: [SeismicDesignCategory; 6] = [
        SeismicDesignCategory::A,
        SeismicDesignCategory::B,
        SeismicDesignCategory::C,
        SeismicDesignCategory::D,
        SeismicDesignCategory::E,
        SeismicDesignCategory::F,
    ];

    pub fn letter(&self) -> char {
        match self {
            SeismicDesignCategory::A => 'A',
            SeismicDesignCategory::B => 'B',
            SeismicDesignCategory::C => 'C',
            SeismicDesignCategory::D => 'D',
            SeismicDesignCategory::E => 'E',
            SeismicDesignCategory::F => 'F',
        }
    }

    /// Categories D through F
    pub fn is_high(&self) -> bool {
        *self >= SeismicDesignCategory::D
    }
}

impl fmt::Display for SeismicDesignCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for SeismicDesignCategory {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        let needle = s.trim().to_ascii_uppercase();
        SeismicDesignCategory::ALL
            .into_iter()
            .find(|sdc| needle.len() == 1 && needle.starts_with(sdc.letter()))
            .ok_or_else(|| {
                CalcError::unknown_variant("seismic design category", s, &["A", "B", "C", "D", "E", "F"])
            })
    }
}

/// NFPA 13 / IBC commodity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CommodityClass {
    /// Noncombustible products on wood pallets
    I,
    /// Class I products in corrugated cartons
    #[default]
    II,
    /// Wood, paper, natural fibers, Group C plastics
    III,
    /// Class I-III with limited Group A plastics
    IV,
    /// Group A expanded plastics, flammable liquids, aerosols
    #[serde(rename = "HH")]
    HighHazard,
}

impl CommodityClass {
    pub const ALL: [CommodityClass; 5] = [
        CommodityClass::I,
        CommodityClass::II,
        CommodityClass::III,
        CommodityClass::IV,
        CommodityClass::HighHazard,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            CommodityClass::I => "I",
            CommodityClass::II => "II",
            CommodityClass::III => "III",
            CommodityClass::IV => "IV",
            CommodityClass::HighHazard => "HH",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CommodityClass::I => "Noncombustible products on wood pallets",
            CommodityClass::II => "Class I products in corrugated cartons",
            CommodityClass::III => "Wood, paper, natural fibers, Group C plastics",
            CommodityClass::IV => "Class I-III with Group A plastics (up to 5% by weight)",
            CommodityClass::HighHazard => "Group A expanded plastics, flammable liquids, aerosols",
        }
    }

    /// Storage height above which high-pile rules apply (ft)
    pub fn high_pile_threshold_ft(&self) -> f64 {
        match self {
            CommodityClass::I | CommodityClass::II | CommodityClass::III | CommodityClass::IV => 12.0,
            CommodityClass::HighHazard => 6.0,
        }
    }

    /// Storage area above which a full high-pile storage plan is required (sqft)
    pub fn permit_area_threshold_sqft(&self) -> f64 {
        match self {
            CommodityClass::I | CommodityClass::II | CommodityClass::III | CommodityClass::IV => 500.0,
            CommodityClass::HighHazard => 200.0,
        }
    }
}

impl FromStr for CommodityClass {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        let needle = s.trim().to_ascii_uppercase();
        CommodityClass::ALL
            .into_iter()
            .find(|class| class.code() == needle)
            .ok_or_else(|| CalcError::unknown_variant("commodity class", s, &["I", "II", "III", "IV", "HH"]))
    }
}

/// Governing building code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Jurisdiction {
    /// International Building Code
    #[default]
    IBC,
    /// California Building Code (IBC + state amendments)
    CBC,
}

/// California bounding box, (lat range, lon range).
const CA_LAT_RANGE: (f64, f64) = (32.5, 42.0);
const CA_LON_RANGE: (f64, f64) = (-124.5, -114.1);

impl Jurisdiction {
    /// Jurisdiction from a US state code or name.
    pub fn from_state(state: &str) -> Self {
        match state.trim().to_ascii_uppercase().as_str() {
            "CA" | "CALIFORNIA" => Jurisdiction::CBC,
            _ => Jurisdiction::IBC,
        }
    }

    /// Rough jurisdiction from coordinates (California bounding box).
    pub fn from_coordinates(lat: f64, lon: f64) -> Self {
        let in_lat = (CA_LAT_RANGE.0..=CA_LAT_RANGE.1).contains(&lat);
        let in_lon = (CA_LON_RANGE.0..=CA_LON_RANGE.1).contains(&lon);
        if in_lat && in_lon {
            Jurisdiction::CBC
        } else {
            Jurisdiction::IBC
        }
    }

    /// Code profile (editions, fire code, seismic reference).
    pub fn profile(&self, state: &str) -> JurisdictionProfile {
        match self {
            Jurisdiction::CBC => JurisdictionProfile {
                building_code: Jurisdiction::CBC,
                edition: "2022".to_string(),
                fire_code: "CFC 2022".to_string(),
                seismic_reference: code_ref::RACK_SEISMIC_CA.to_string(),
                notes: vec![
                    "California Building Code (CBC) 2022 applies".to_string(),
                    "Based on 2021 IBC with California amendments".to_string(),
                    "California Fire Code (CFC) 2022 for fire protection".to_string(),
                    "State Fire Marshal jurisdiction for some occupancies".to_string(),
                    "All rack installations require building permit".to_string(),
                ],
            },
            Jurisdiction::IBC => JurisdictionProfile {
                building_code: Jurisdiction::IBC,
                edition: "2021".to_string(),
                fire_code: "IFC 2021".to_string(),
                seismic_reference: format!("{} / {}", code_ref::RACK_SEISMIC, code_ref::SEISMIC_LOADS),
                notes: vec![
                    format!("International Building Code (IBC) 2021 applies in {}", state.trim().to_ascii_uppercase()),
                    "Local amendments may apply; check with building department".to_string(),
                    "International Fire Code (IFC) 2021 for fire protection".to_string(),
                    "Verify local adoption year; some jurisdictions lag by 1-2 code cycles".to_string(),
                ],
            },
        }
    }
}

/// Which code editions govern a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JurisdictionProfile {
    pub building_code: Jurisdiction,
    pub edition: String,
    pub fire_code: String,
    pub seismic_reference: String,
    pub notes: Vec<String>,
}

/// Look up the code profile for a US state.
pub fn determine_jurisdiction(state: &str) -> JurisdictionProfile {
    Jurisdiction::from_state(state).profile(state)
}

// ============================================================================
// Request / Assessment
// ============================================================================

fn default_true() -> bool {
    true
}

fn default_total_frames() -> u32 {
    100
}

/// Compliance query.
///
/// ## JSON Example
///
/// ```json
/// {
///   "seismicDesignCategory": "D",
///   "storageHeightFt": 28,
///   "commodityClass": "III",
///   "storageAreaSqft": 200000,
///   "buildingSprinklered": true,
///   "jurisdiction": "CBC"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComplianceRequest {
    /// SDC letter; omitted when no seismic data is available
    #[serde(default)]
    pub seismic_design_category: Option<SeismicDesignCategory>,

    /// Height of stored goods (top of highest load), not rack height
    pub storage_height_ft: f64,

    pub commodity_class: CommodityClass,

    /// High-pile storage footprint
    pub storage_area_sqft: f64,

    #[serde(default = "default_true")]
    pub building_sprinklered: bool,

    #[serde(default)]
    pub jurisdiction: Jurisdiction,

    /// Clear height to deflectors; defaults to the storage height
    #[serde(default)]
    pub clear_height_ft: Option<f64>,

    #[serde(default)]
    pub rack_style: RackStyle,

    /// Frame count used by the used-vs-new advisory
    #[serde(default = "default_total_frames")]
    pub total_frames: u32,

    /// Upright height for the used-vs-new advisory; defaults to storage height
    #[serde(default)]
    pub frame_height_ft: Option<f64>,

    #[serde(default)]
    pub sprinkler_modification: bool,
}

impl Default for ComplianceRequest {
    fn default() -> Self {
        ComplianceRequest {
            seismic_design_category: None,
            storage_height_ft: 0.0,
            commodity_class: CommodityClass::default(),
            storage_area_sqft: 0.0,
            building_sprinklered: true,
            jurisdiction: Jurisdiction::default(),
            clear_height_ft: None,
            rack_style: RackStyle::default(),
            total_frames: default_total_frames(),
            frame_height_ft: None,
            sprinkler_modification: false,
        }
    }
}

impl ComplianceRequest {
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("storageHeightFt", self.storage_height_ft)?;
        require_non_negative("storageAreaSqft", self.storage_area_sqft)?;
        if let Some(clear) = self.clear_height_ft {
            require_non_negative("clearHeightFt", clear)?;
        }
        if let Some(height) = self.frame_height_ft {
            require_non_negative("frameHeightFt", height)?;
        }
        Ok(())
    }
}

/// Combined, read-only compliance result.
///
/// Seismic-dependent sections are `None` when the request carried no SDC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceAssessment {
    pub high_pile: HighPileAssessment,
    pub seismic: Option<SeismicRequirements>,
    pub permits: PermitRequirements,
    pub used_vs_new: Option<UsedRackAssessment>,
    pub clearances: ClearanceRequirements,
    pub notes: Vec<String>,
}

/// Run every rule set for one query.
pub fn assess(request: &ComplianceRequest) -> CalcResult<ComplianceAssessment> {
    request.validate()?;

    let high_pile = assess_high_pile(
        request.storage_height_ft,
        request.commodity_class,
        request.storage_area_sqft,
        request.building_sprinklered,
        request.jurisdiction,
    );

    let seismic = request.seismic_design_category.map(seismic_requirements);

    let permits = assess_permits(
        request.seismic_design_category,
        &high_pile,
        request.storage_area_sqft,
        request.jurisdiction,
        request.sprinkler_modification,
    );

    let frame_height_ft = request.frame_height_ft.unwrap_or(request.storage_height_ft);
    let used_vs_new = request
        .seismic_design_category
        .map(|sdc| assess_used_vs_new(sdc, frame_height_ft, request.total_frames, request.rack_style));

    let system = high_pile
        .sprinkler_spec
        .as_ref()
        .map(|spec| spec.system_type)
        .unwrap_or(SprinklerSystemType::Esfr);
    let clearances = sprinkler_clearance_requirements(
        system,
        request.clear_height_ft.unwrap_or(request.storage_height_ft),
    );

    let mut notes = Vec::new();
    if request.seismic_design_category.is_none() {
        tracing::debug!("compliance query without SDC; seismic sections omitted");
        notes.push("No seismic data available; seismic requirements and used-rack advisory omitted".to_string());
    }

    Ok(ComplianceAssessment {
        high_pile,
        seismic,
        permits,
        used_vs_new,
        clearances,
        notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdc_ordering_and_parse() {
        assert!(SeismicDesignCategory::D > SeismicDesignCategory::C);
        assert_eq!("d".parse::<SeismicDesignCategory>().unwrap(), SeismicDesignCategory::D);
        assert!("G".parse::<SeismicDesignCategory>().is_err());
        assert!("DD".parse::<SeismicDesignCategory>().is_err());
        assert!(serde_json::from_str::<SeismicDesignCategory>("\"Z\"").is_err());
    }

    #[test]
    fn test_commodity_serde_codes() {
        assert_eq!(serde_json::to_string(&CommodityClass::HighHazard).unwrap(), "\"HH\"");
        assert_eq!(
            serde_json::from_str::<CommodityClass>("\"III\"").unwrap(),
            CommodityClass::III
        );
        assert_eq!("hh".parse::<CommodityClass>().unwrap(), CommodityClass::HighHazard);
    }

    #[test]
    fn test_jurisdiction_lookup() {
        assert_eq!(Jurisdiction::from_state("ca"), Jurisdiction::CBC);
        assert_eq!(Jurisdiction::from_state("IL"), Jurisdiction::IBC);
        assert_eq!(Jurisdiction::from_coordinates(33.78, -117.23), Jurisdiction::CBC);
        assert_eq!(Jurisdiction::from_coordinates(41.52, -88.08), Jurisdiction::IBC);

        let profile = determine_jurisdiction("California");
        assert_eq!(profile.fire_code, "CFC 2022");
        let profile = determine_jurisdiction("tx");
        assert!(profile.notes[0].ends_with("in TX"));
    }

    #[test]
    fn test_request_rejects_unknown_fields() {
        let json = r#"{"storageHeightFt": 20, "commodityClass": "II", "storageAreaSqft": 1000, "colour": "red"}"#;
        assert!(serde_json::from_str::<ComplianceRequest>(json).is_err());
    }

    #[test]
    fn test_request_defaults() {
        let json = r#"{"storageHeightFt": 20, "commodityClass": "II", "storageAreaSqft": 1000}"#;
        let request: ComplianceRequest = serde_json::from_str(json).unwrap();
        assert!(request.building_sprinklered);
        assert_eq!(request.jurisdiction, Jurisdiction::IBC);
        assert_eq!(request.seismic_design_category, None);
    }

    #[test]
    fn test_assess_without_seismic_data_degrades() {
        let request = ComplianceRequest {
            storage_height_ft: 20.0,
            storage_area_sqft: 5000.0,
            ..ComplianceRequest::default()
        };
        let assessment = assess(&request).unwrap();
        assert!(assessment.seismic.is_none());
        assert!(assessment.used_vs_new.is_none());
        assert!(!assessment.permits.structural_engineering_required);
        assert_eq!(assessment.notes.len(), 1);
    }

    #[test]
    fn test_assess_rejects_negative_height() {
        let request = ComplianceRequest {
            storage_height_ft: -1.0,
            ..ComplianceRequest::default()
        };
        assert_eq!(assess(&request).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_assessment_json_shape() {
        let request = ComplianceRequest {
            seismic_design_category: Some(SeismicDesignCategory::D),
            storage_height_ft: 28.0,
            commodity_class: CommodityClass::III,
            storage_area_sqft: 200_000.0,
            ..ComplianceRequest::default()
        };
        let json = serde_json::to_value(assess(&request).unwrap()).unwrap();
        assert_eq!(json["highPile"]["isHighPile"], true);
        assert_eq!(json["highPile"]["longitudinalFlueIn"], 6.0);
        assert_eq!(json["highPile"]["sprinklerSpec"]["systemType"], "ESFR+IR");
        assert_eq!(json["seismic"]["anchorsPerBaseplate"], 4);
        assert_eq!(json["seismic"]["prelimEngineeringRequired"], true);
    }
}
