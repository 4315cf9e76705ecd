//! High-piled combustible storage and sprinkler rules.
//!
//! Storage height here is the top of the highest load, not the rack height.
//! Thresholds follow IFC 2021 Chapter 32 and NFPA 13 rules of thumb; every
//! result is advisory and must be confirmed with a fire protection engineer.

use serde::{Deserialize, Serialize};

use super::{code_ref, CommodityClass, Jurisdiction};

/// Storage height above which the longitudinal flue is always 6".
const TALL_STORAGE_FT: f64 = 20.0;

/// Ceiling-only ESFR limit for Class I-III.
const ESFR_LIMIT_FT: f64 = 25.0;

/// Upper limit of the K28 / single in-rack level band.
const K28_LIMIT_FT: f64 = 30.0;

/// Storage area that triggers fire department access aisles.
const FIRE_ACCESS_AREA_SQFT: f64 = 12_000.0;

/// Storage height above which baffles may be required.
const BAFFLE_HEIGHT_FT: f64 = 15.0;

/// Sprinkler system configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SprinklerSystemType {
    /// Early Suppression Fast Response, ceiling only
    #[serde(rename = "ESFR")]
    Esfr,
    /// Control Mode Specific Application
    #[serde(rename = "CMSA")]
    Cmsa,
    /// In-rack heads only
    #[serde(rename = "in_rack")]
    InRack,
    /// Ceiling ESFR plus in-rack heads
    #[serde(rename = "ESFR+IR")]
    EsfrPlusInRack,
}

impl SprinklerSystemType {
    /// Whether heads are installed within the rack structure
    pub fn includes_in_rack(&self) -> bool {
        matches!(self, SprinklerSystemType::InRack | SprinklerSystemType::EsfrPlusInRack)
    }

    /// Whether the ceiling system is ESFR
    pub fn is_esfr(&self) -> bool {
        matches!(self, SprinklerSystemType::Esfr | SprinklerSystemType::EsfrPlusInRack)
    }
}

/// Selected sprinkler design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprinklerSpec {
    pub system_type: SprinklerSystemType,
    pub ceiling_k_factor: f64,
    pub ceiling_temp_rating_f: u32,
    pub ceiling_pressure_psi: f64,
    /// Heights of in-rack sprinkler levels (ft)
    pub in_rack_levels_ft: Vec<u32>,
    pub in_rack_k_factor: Option<f64>,
    pub notes: String,
}

impl SprinklerSpec {
    fn esfr(k_factor: f64, pressure_psi: f64, notes: &str) -> Self {
        SprinklerSpec {
            system_type: SprinklerSystemType::Esfr,
            ceiling_k_factor: k_factor,
            ceiling_temp_rating_f: 165,
            ceiling_pressure_psi: pressure_psi,
            in_rack_levels_ft: Vec::new(),
            in_rack_k_factor: None,
            notes: notes.to_string(),
        }
    }

    fn esfr_with_in_rack(levels_ft: Vec<u32>, notes: &str) -> Self {
        SprinklerSpec {
            system_type: SprinklerSystemType::EsfrPlusInRack,
            ceiling_k_factor: 25.2,
            ceiling_temp_rating_f: 165,
            ceiling_pressure_psi: 25.0,
            in_rack_levels_ft: levels_ft,
            in_rack_k_factor: Some(8.0),
            notes: notes.to_string(),
        }
    }
}

/// High-pile storage requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighPileAssessment {
    pub is_high_pile: bool,
    pub storage_height_ft: f64,
    pub commodity_class: CommodityClass,
    pub threshold_ft: f64,

    // Permits
    pub operational_permit_required: bool,
    pub fire_protection_plan_required: bool,
    pub high_pile_permit_required: bool,
    /// Storage area exceeds the commodity's permit area threshold
    pub full_storage_plan_required: bool,

    // Fire protection
    /// `None` when not high-pile or the building is unsprinklered
    pub sprinkler_spec: Option<SprinklerSpec>,
    pub fire_department_access_aisle_required: bool,
    pub fire_department_access_aisle_width_ft: f64,

    // Flue spaces
    /// Between pallets across a beam
    pub transverse_flue_in: f64,
    /// Between back-to-back rows
    pub longitudinal_flue_in: f64,

    // Aisles and area
    /// `None` when not high-pile
    pub min_aisle_width_ft: Option<f64>,
    /// `None` means unlimited
    pub max_storage_area_sqft: Option<u32>,

    // Baffles
    pub fire_baffles_required: bool,
    pub baffle_spacing_bays: Option<u32>,

    pub notes: Vec<String>,
}

/// Assess high-piled combustible storage requirements.
pub fn assess_high_pile(
    storage_height_ft: f64,
    commodity_class: CommodityClass,
    storage_area_sqft: f64,
    building_sprinklered: bool,
    jurisdiction: Jurisdiction,
) -> HighPileAssessment {
    let threshold_ft = commodity_class.high_pile_threshold_ft();
    let is_high_pile = storage_height_ft > threshold_ft;

    let mut req = HighPileAssessment {
        is_high_pile,
        storage_height_ft,
        commodity_class,
        threshold_ft,
        operational_permit_required: false,
        fire_protection_plan_required: false,
        high_pile_permit_required: false,
        full_storage_plan_required: false,
        sprinkler_spec: None,
        fire_department_access_aisle_required: false,
        fire_department_access_aisle_width_ft: 0.0,
        transverse_flue_in: 3.0,
        longitudinal_flue_in: 6.0,
        min_aisle_width_ft: None,
        max_storage_area_sqft: None,
        fire_baffles_required: false,
        baffle_spacing_bays: None,
        notes: Vec::new(),
    };

    if !is_high_pile {
        req.notes.push(format!(
            "Storage height {}ft at or below {}ft threshold ({}); not high-pile",
            storage_height_ft,
            threshold_ft,
            code_ref::HIGH_PILE_THRESHOLD
        ));
        return req;
    }

    req.high_pile_permit_required = true;
    req.operational_permit_required = true;
    req.fire_protection_plan_required = true;

    if storage_area_sqft > commodity_class.permit_area_threshold_sqft() {
        req.full_storage_plan_required = true;
        req.notes
            .push("Exceeds area threshold; full high-pile storage plan required".to_string());
    }

    let low_hazard = matches!(commodity_class, CommodityClass::I | CommodityClass::II);
    req.longitudinal_flue_in = if storage_height_ft <= TALL_STORAGE_FT && low_hazard {
        3.0
    } else {
        6.0
    };

    if building_sprinklered {
        req.sprinkler_spec = Some(select_sprinkler(storage_height_ft, commodity_class));
    } else {
        req.notes.push(format!(
            "Building not sprinklered; high-pile storage needs an approved system per {}",
            code_ref::SPRINKLERS
        ));
    }

    if storage_area_sqft > FIRE_ACCESS_AREA_SQFT {
        req.fire_department_access_aisle_required = true;
        req.fire_department_access_aisle_width_ft = 8.0;
        req.notes.push(format!(
            "Fire department access aisles required (>12,000 sqft, {})",
            code_ref::FIRE_ACCESS_AISLES
        ));
    }

    req.max_storage_area_sqft = match commodity_class {
        CommodityClass::HighHazard if building_sprinklered => Some(2_500),
        CommodityClass::HighHazard => Some(500),
        CommodityClass::I | CommodityClass::II | CommodityClass::III | CommodityClass::IV => None,
    };

    req.min_aisle_width_ft = Some(if storage_height_ft > TALL_STORAGE_FT { 8.0 } else { 4.0 });

    let baffle_commodity = matches!(
        commodity_class,
        CommodityClass::III | CommodityClass::IV | CommodityClass::HighHazard
    );
    if storage_height_ft > BAFFLE_HEIGHT_FT && baffle_commodity {
        req.fire_baffles_required = true;
        req.baffle_spacing_bays = Some(10);
        req.notes.push("Fire baffles may be required; verify with AHJ".to_string());
    }

    if jurisdiction == Jurisdiction::CBC {
        req.notes.push(format!(
            "California: {} applies; stricter than IBC in some areas",
            code_ref::CBC_HIGH_PILE
        ));
        req.notes
            .push("California: State Fire Marshal may require additional review".to_string());
        req.notes
            .push("California: High-pile storage permit required from local fire authority".to_string());
    }

    req
}

/// Sprinkler selection for a sprinklered high-pile building.
fn select_sprinkler(storage_height_ft: f64, commodity_class: CommodityClass) -> SprinklerSpec {
    let esfr_class = matches!(
        commodity_class,
        CommodityClass::I | CommodityClass::II | CommodityClass::III
    );
    let low_hazard = matches!(commodity_class, CommodityClass::I | CommodityClass::II);

    if storage_height_ft <= ESFR_LIMIT_FT && esfr_class {
        SprinklerSpec::esfr(25.2, 25.0, "ESFR ceiling-only, K25.2; verify with fire protection engineer")
    } else if storage_height_ft <= K28_LIMIT_FT && low_hazard {
        SprinklerSpec::esfr(28.0, 40.0, "ESFR K28 ceiling-only; verify with FPE")
    } else if storage_height_ft <= K28_LIMIT_FT {
        SprinklerSpec::esfr_with_in_rack(vec![10], "ESFR + in-rack required for this commodity at this height")
    } else {
        SprinklerSpec::esfr_with_in_rack(vec![10, 20], "In-rack sprinklers required; consult fire protection engineer")
    }
}

/// Clearance between top of storage and sprinkler deflectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearanceRequirements {
    pub system_type: SprinklerSystemType,
    pub min_clearance_in: u32,
    pub recommended_clearance_in: u32,
    /// Highest allowed top-of-load below the deflectors (in)
    pub max_storage_height_in: u32,
    pub notes: Vec<String>,
}

/// Clearance rules for a ceiling system, given the clear height to deflectors.
pub fn sprinkler_clearance_requirements(system_type: SprinklerSystemType, clear_height_ft: f64) -> ClearanceRequirements {
    let (min_clearance_in, recommended_clearance_in) = if system_type.is_esfr() { (36, 36) } else { (18, 24) };

    let clear_in = (clear_height_ft * 12.0).floor().max(0.0) as u32;
    let max_storage_height_in = clear_in.saturating_sub(recommended_clearance_in);

    ClearanceRequirements {
        system_type,
        min_clearance_in,
        recommended_clearance_in,
        max_storage_height_in,
        notes: vec![
            format!(
                "Minimum {}\" clearance to sprinkler deflectors ({})",
                min_clearance_in,
                code_ref::SPRINKLERS
            ),
            format!("Recommended {}\" for optimal spray pattern", recommended_clearance_in),
            "Top of load (including pallet overhang) must not exceed max storage height".to_string(),
        ],
    }
}
