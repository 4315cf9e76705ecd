//! Permit and approval requirements.
//!
//! Seismic structural needs, high-pile fire needs, sprinkler modification and
//! slab analysis are combined into one list, then the CBC overlay extends the
//! review timeline.

use serde::{Deserialize, Serialize};

use super::{code_ref, HighPileAssessment, Jurisdiction, SeismicDesignCategory};

/// Storage above this height needs a slab check (ft).
const SLAB_ANALYSIS_HEIGHT_FT: f64 = 20.0;

/// California projects above this area take the long review track (sqft).
const CBC_LARGE_PROJECT_SQFT: f64 = 50_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitRequirements {
    pub building_permit_required: bool,
    pub fire_permit_required: bool,
    pub high_pile_permit_required: bool,
    pub structural_engineering_required: bool,
    pub prelim_engineering_required: bool,
    pub seismic_engineering_required: bool,
    pub fire_protection_plan_required: bool,
    pub sprinkler_modification_required: bool,
    pub special_inspection_required: bool,
    pub anchor_inspection_required: bool,
    pub slab_analysis_recommended: bool,
    pub typical_timeline_weeks: u32,
    pub notes: Vec<String>,
}

impl PermitRequirements {
    fn baseline() -> Self {
        PermitRequirements {
            building_permit_required: true,
            fire_permit_required: false,
            high_pile_permit_required: false,
            structural_engineering_required: false,
            prelim_engineering_required: false,
            seismic_engineering_required: false,
            fire_protection_plan_required: false,
            sprinkler_modification_required: false,
            special_inspection_required: false,
            anchor_inspection_required: false,
            slab_analysis_recommended: false,
            typical_timeline_weeks: 2,
            notes: Vec::new(),
        }
    }
}

/// Aggregate permit requirements.
///
/// An unknown SDC leaves the seismic flags unset and says so in the notes.
pub fn assess_permits(
    sdc: Option<SeismicDesignCategory>,
    high_pile: &HighPileAssessment,
    storage_area_sqft: f64,
    jurisdiction: Jurisdiction,
    sprinkler_modification: bool,
) -> PermitRequirements {
    let mut req = PermitRequirements::baseline();

    match sdc {
        Some(sdc) if sdc >= SeismicDesignCategory::C => {
            req.structural_engineering_required = true;
            req.prelim_engineering_required = true;
            req.seismic_engineering_required = true;
            req.anchor_inspection_required = true;
            if sdc.is_high() {
                req.special_inspection_required = true;
                req.typical_timeline_weeks = 4;
                req.notes.push(format!(
                    "SDC {}: Stamped seismic calcs required ({}, {})",
                    sdc,
                    code_ref::RACK_SEISMIC,
                    code_ref::SEISMIC_LOADS
                ));
            } else {
                req.notes
                    .push(format!("SDC {}: Preliminary seismic engineering required", sdc));
            }
        }
        Some(sdc) => {
            req.notes
                .push(format!("SDC {}: Standard permit process, minimal engineering", sdc));
        }
        None => {
            req.notes
                .push("No seismic data; structural permit scope not determined".to_string());
        }
    }

    if high_pile.is_high_pile {
        req.fire_permit_required = true;
        req.high_pile_permit_required = true;
        req.fire_protection_plan_required = true;
        req.notes.push(format!(
            "High-pile storage: {}ft > {}ft threshold",
            high_pile.storage_height_ft, high_pile.threshold_ft
        ));
    }

    if sprinkler_modification {
        req.sprinkler_modification_required = true;
        req.fire_permit_required = true;
        req.typical_timeline_weeks = req.typical_timeline_weeks.max(4);
        req.notes
            .push("Sprinkler modification requires fire protection engineer".to_string());
    }

    if high_pile.storage_height_ft > SLAB_ANALYSIS_HEIGHT_FT || sdc.is_some_and(|s| s.is_high()) {
        req.slab_analysis_recommended = true;
        req.notes
            .push("Slab analysis recommended for tall racking or high seismic".to_string());
    }

    if jurisdiction == Jurisdiction::CBC {
        req.typical_timeline_weeks = req.typical_timeline_weeks.max(4);
        req.notes
            .push("California: Expect longer review times (4-8 weeks typical)".to_string());
        req.notes
            .push("California: CBC requires structural calcs for all rack installations".to_string());
        if storage_area_sqft > CBC_LARGE_PROJECT_SQFT {
            req.typical_timeline_weeks = req.typical_timeline_weeks.max(6);
            req.notes
                .push("California: Large project may require additional plan check".to_string());
        }
    }

    tracing::debug!(
        weeks = req.typical_timeline_weeks,
        high_pile = high_pile.is_high_pile,
        "permit requirements assessed"
    );

    req
}
