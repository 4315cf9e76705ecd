//! Used-vs-new rack advisory.
//!
//! Seismic category is the gate: most high-seismic jurisdictions will not
//! accept used racking without traceable manufacturer documentation.

use serde::{Deserialize, Serialize};

use super::SeismicDesignCategory;
use crate::racking::RackStyle;

const DEFAULT_SAVINGS_PCT: f64 = 30.0;
const NEW_LEAD_TIME_WEEKS: u32 = 8;
const USED_LEAD_TIME_WEEKS: u32 = 2;

/// Orders above this frame count are hard to fill from used inventory.
const LARGE_ORDER_FRAMES: u32 = 500;

/// Uprights taller than this are scarce on the used market (ft).
const TALL_FRAME_FT: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockRecommendation {
    New,
    Used,
    Either,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsedRackAssessment {
    pub recommendation: StockRecommendation,
    pub cost_savings_pct: f64,
    pub lead_time_new_weeks: u32,
    pub lead_time_used_weeks: u32,
    /// 0 = no concerns; each risk factor adds to the score
    pub risk_score: u32,
    pub risks: Vec<String>,
    pub benefits: Vec<String>,
    pub inspection_checklist: Vec<String>,
    pub notes: Vec<String>,
}

/// Visual inspection items for any used rack purchase.
pub const INSPECTION_CHECKLIST: [&str; 6] = [
    "Check uprights for dents, bends, or damage (max 1/4\" deflection)",
    "Verify beam connectors are not cracked or deformed",
    "Confirm all safety locks/clips are present",
    "Check base plates for damage and proper welds",
    "Verify capacity labels are present and legible",
    "Ensure all components are from same manufacturer",
];

pub fn assess_used_vs_new(
    sdc: SeismicDesignCategory,
    frame_height_ft: f64,
    total_frames: u32,
    rack_style: RackStyle,
) -> UsedRackAssessment {
    let mut result = UsedRackAssessment {
        recommendation: StockRecommendation::Either,
        cost_savings_pct: DEFAULT_SAVINGS_PCT,
        lead_time_new_weeks: NEW_LEAD_TIME_WEEKS,
        lead_time_used_weeks: USED_LEAD_TIME_WEEKS,
        risk_score: 0,
        risks: Vec::new(),
        benefits: Vec::new(),
        inspection_checklist: INSPECTION_CHECKLIST.iter().map(|s| s.to_string()).collect(),
        notes: Vec::new(),
    };

    match sdc {
        SeismicDesignCategory::D | SeismicDesignCategory::E | SeismicDesignCategory::F => {
            result.recommendation = StockRecommendation::New;
            result.cost_savings_pct = 0.0;
            result.risk_score += 5;
            result.risks.extend([
                format!("SDC {} requires seismic-rated racking with traceable documentation", sdc),
                "Used racking may not meet current seismic design requirements".to_string(),
                "Engineering recertification of used racking is expensive".to_string(),
                "Many jurisdictions in high SDC won't permit used racking without full analysis".to_string(),
            ]);
            result
                .notes
                .push("New racking strongly recommended for high seismic zones".to_string());
        }
        SeismicDesignCategory::C => {
            result.risk_score += 2;
            result.risks.extend([
                "SDC C requires engineering review of used racking".to_string(),
                "Verify used racking meets current anchor and bracing requirements".to_string(),
            ]);
            result.benefits.extend([
                "Used racking acceptable with engineering review".to_string(),
                format!("Potential {:.0}% cost savings", DEFAULT_SAVINGS_PCT),
            ]);
            result
                .notes
                .push("Used racking viable with engineer review of capacity and condition".to_string());
        }
        SeismicDesignCategory::A | SeismicDesignCategory::B => {
            result.benefits.extend([
                format!("Low seismic (SDC {}): used racking generally acceptable", sdc),
                format!("Potential {:.0}% cost savings", DEFAULT_SAVINGS_PCT),
                format!("Faster lead time ({} weeks vs {} weeks)", USED_LEAD_TIME_WEEKS, NEW_LEAD_TIME_WEEKS),
            ]);
            result
                .notes
                .push("Used racking is a good option for low seismic areas".to_string());
        }
    }

    if rack_style == RackStyle::Structural {
        result.risk_score += 1;
        result
            .risks
            .push("Structural racking is heavier and more expensive to ship used".to_string());
        result
            .risks
            .push("Verify bolt holes are not elongated from previous installations".to_string());
        result.cost_savings_pct *= 0.8;
    }

    if total_frames > LARGE_ORDER_FRAMES {
        result.risk_score += 1;
        result
            .risks
            .push(format!("Large order ({} frames) may be hard to source used", total_frames));
        result
            .notes
            .push("Consider mixing new and used to meet quantity".to_string());
    }

    if frame_height_ft > TALL_FRAME_FT {
        result.risk_score += 1;
        result
            .risks
            .push(format!("Tall frames ({}ft) are less common in used market", frame_height_ft));
        result.lead_time_used_weeks = 3;
    }

    result
}
