//! Seismic requirements by Seismic Design Category.
//!
//! Rack anchorage and bracing per IBC Section 2209 and ASCE 7. Base plates on
//! both uprights of a frame are anchored, so anchors per frame is always
//! twice the per-plate count.

use serde::{Deserialize, Serialize};

use super::SeismicDesignCategory;

/// Anchor product class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorClass {
    /// Standard wedge anchor
    Wedge,
    /// Expansion anchor qualified for cracked concrete and seismic loading
    SeismicExpansion,
}

impl AnchorClass {
    pub fn description(&self) -> &'static str {
        match self {
            AnchorClass::Wedge => "Wedge anchor",
            AnchorClass::SeismicExpansion => "Seismic-qualified expansion anchor (e.g. Hilti Kwik Bolt TZ2)",
        }
    }
}

/// Required frame/row bracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracingLevel {
    Standard,
    Enhanced,
    FullSeismic,
}

/// Anchor, bracing and engineering requirements for one SDC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeismicRequirements {
    pub seismic_design_category: SeismicDesignCategory,
    pub anchors_per_baseplate: u32,
    /// Two base plates per frame
    pub anchors_per_frame: u32,
    pub anchor_class: AnchorClass,
    pub anchor_type: String,
    pub anchor_size: String,
    pub anchor_embedment: String,
    pub base_plate_bolts: u32,
    pub bracing: BracingLevel,
    pub row_spacers_required: bool,
    pub prelim_engineering_required: bool,
    pub special_inspection_required: bool,
    pub notes: Vec<String>,
}

/// Look up requirements for an SDC.
pub fn seismic_requirements(sdc: SeismicDesignCategory) -> SeismicRequirements {
    let anchors_per_baseplate = match sdc {
        SeismicDesignCategory::A | SeismicDesignCategory::B => 1,
        SeismicDesignCategory::C => 2,
        SeismicDesignCategory::D | SeismicDesignCategory::E | SeismicDesignCategory::F => 4,
    };

    let anchor_class = match sdc {
        SeismicDesignCategory::A | SeismicDesignCategory::B => AnchorClass::Wedge,
        _ => AnchorClass::SeismicExpansion,
    };

    let (anchor_size, anchor_embedment) = if sdc.is_high() {
        ("5/8\" x 4.5\"", "3.75\"")
    } else {
        ("1/2\" x 4\"", "2.25\"")
    };

    let bracing = match sdc {
        SeismicDesignCategory::A | SeismicDesignCategory::B => BracingLevel::Standard,
        SeismicDesignCategory::C => BracingLevel::Enhanced,
        SeismicDesignCategory::D | SeismicDesignCategory::E | SeismicDesignCategory::F => BracingLevel::FullSeismic,
    };

    let notes = match sdc {
        SeismicDesignCategory::A | SeismicDesignCategory::B => vec![
            "Low seismic risk: standard anchoring adequate".to_string(),
            "Wedge anchors at each base plate".to_string(),
        ],
        SeismicDesignCategory::C => vec![
            "Moderate seismic: enhanced anchoring and bracing required".to_string(),
            "Row spacers required between back-to-back rows".to_string(),
            "Preliminary engineering required for permit".to_string(),
        ],
        SeismicDesignCategory::D => vec![
            "High seismic: full seismic engineering required".to_string(),
            "Special inspection required for anchor installation".to_string(),
            "Seismic-rated base plates and anchors required".to_string(),
            "Row spacers and cross-aisle ties required".to_string(),
            "Stamped engineering calcs required for permit".to_string(),
        ],
        SeismicDesignCategory::E | SeismicDesignCategory::F => vec![
            "Very high seismic: maximum requirements".to_string(),
            "Full dynamic analysis may be required".to_string(),
            "Special inspection for all structural connections".to_string(),
            "Consider base isolation for tall racking".to_string(),
        ],
    };

    SeismicRequirements {
        seismic_design_category: sdc,
        anchors_per_baseplate,
        anchors_per_frame: anchors_per_baseplate * 2,
        anchor_class,
        anchor_type: anchor_class.description().to_string(),
        anchor_size: anchor_size.to_string(),
        anchor_embedment: anchor_embedment.to_string(),
        base_plate_bolts: anchors_per_baseplate,
        bracing,
        row_spacers_required: sdc >= SeismicDesignCategory::C,
        prelim_engineering_required: sdc >= SeismicDesignCategory::C,
        special_inspection_required: sdc.is_high(),
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdc_d() {
        let req = seismic_requirements(SeismicDesignCategory::D);
        assert_eq!(req.anchors_per_baseplate, 4);
        assert_eq!(req.anchors_per_frame, 8);
        assert!(req.prelim_engineering_required);
        assert!(req.special_inspection_required);
        assert_eq!(req.anchor_size, "5/8\" x 4.5\"");
        assert_eq!(req.bracing, BracingLevel::FullSeismic);
    }

    #[test]
    fn test_sdc_a() {
        let req = seismic_requirements(SeismicDesignCategory::A);
        assert_eq!(req.anchors_per_baseplate, 1);
        assert_eq!(req.anchors_per_frame, 2);
        assert!(!req.prelim_engineering_required);
        assert!(!req.row_spacers_required);
        assert_eq!(req.anchor_class, AnchorClass::Wedge);
    }

    #[test]
    fn test_sdc_c_is_moderate() {
        let req = seismic_requirements(SeismicDesignCategory::C);
        assert_eq!(req.anchors_per_frame, 4);
        assert!(req.prelim_engineering_required);
        assert!(!req.special_inspection_required);
        assert_eq!(req.anchor_class, AnchorClass::SeismicExpansion);
        assert_eq!(req.anchor_embedment, "2.25\"");
    }

    #[test]
    fn test_anchor_counts_never_decrease_with_severity() {
        let counts: Vec<u32> = SeismicDesignCategory::ALL
            .iter()
            .map(|sdc| seismic_requirements(*sdc).anchors_per_frame)
            .collect();
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(seismic_requirements(SeismicDesignCategory::E)).unwrap();
        assert_eq!(json["anchorsPerBaseplate"], 4);
        assert_eq!(json["bracing"], "full_seismic");
        assert_eq!(json["seismicDesignCategory"], "E");
    }
}
