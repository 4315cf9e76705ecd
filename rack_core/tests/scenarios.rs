//! End-to-end properties across the layout, BOM and compliance engines.

use rack_core::bom::{compute_bom, BomCategory, BomRequest};
use rack_core::compliance::{
    assess, assess_high_pile, seismic_requirements, CommodityClass, ComplianceRequest, Jurisdiction,
    SeismicDesignCategory,
};
use rack_core::estimate::{run_estimate, EstimateRequest};
use rack_core::layout::{design_layout, BuildingEnvelope, LayoutResult, RackRequirements};
use rack_core::racking::RackStyle;
use rack_core::site::SiteData;
use rstest::rstest;

fn reference_building() -> BuildingEnvelope {
    BuildingEnvelope::new(600.0, 300.0, 32.0)
}

fn layout_for(building: &BuildingEnvelope, style: RackStyle) -> LayoutResult {
    let requirements = RackRequirements {
        rack_style: style,
        ..RackRequirements::default()
    };
    design_layout(building, &requirements).unwrap()
}

fn bom_for(layout: &LayoutResult, style: RackStyle) -> BomRequest {
    BomRequest {
        rack_style: style,
        frame_height: layout.frame_height_in,
        bay_types: layout.bay_types.clone(),
        pallet_positions: layout.total_pallet_positions,
        ..BomRequest::default()
    }
}

#[test]
fn reference_building_end_to_end() {
    let layout = layout_for(&reference_building(), RackStyle::Teardrop);

    // Largest standard height at or below 384 - 36 = 348
    assert_eq!(layout.frame_height_in, 336);
    assert_eq!(layout.aisle_width_in, 120);
    assert_eq!(layout.beam_length_in, 96);
    assert_eq!(layout.beam_levels, 5);
    assert_eq!(layout.total_pallet_positions, 21_600);
    assert!(layout.utilization_pct > 0.0 && layout.utilization_pct < 100.0);

    let bom = compute_bom(&bom_for(&layout, RackStyle::Teardrop)).unwrap();
    assert_eq!(bom.summary.total_frames, 2144);
    assert_eq!(bom.summary.total_beams, 21_120);
    assert_eq!(bom.summary.total_wiredecks, 21_600);
}

#[rstest]
#[case(RackStyle::Teardrop)]
#[case(RackStyle::Structural)]
fn layout_and_bom_agree_on_frames(#[case] style: RackStyle) {
    let layout = layout_for(&reference_building(), style);
    let per_type: u32 = layout.bay_types.iter().map(|bt| bt.frames()).sum();
    assert_eq!(per_type, layout.total_frames);

    let bom = compute_bom(&bom_for(&layout, style)).unwrap();
    assert_eq!(bom.summary.total_frames, layout.total_frames);
    assert_eq!(bom.category_total(BomCategory::Frames), layout.total_frames);
}

#[rstest]
#[case(20.0, 24.0)]
#[case(24.0, 28.0)]
#[case(28.0, 32.0)]
#[case(32.0, 40.0)]
fn taller_buildings_never_hold_less(#[case] lower_ft: f64, #[case] higher_ft: f64) {
    let low = layout_for(&BuildingEnvelope::new(600.0, 300.0, lower_ft), RackStyle::Teardrop);
    let high = layout_for(&BuildingEnvelope::new(600.0, 300.0, higher_ft), RackStyle::Teardrop);

    assert!(high.frame_height_in >= low.frame_height_in);
    assert!(high.beam_levels >= low.beam_levels);
    assert!(high.total_pallet_positions >= low.total_pallet_positions);
}

#[test]
fn same_request_same_estimate() {
    let mut request = EstimateRequest::new(reference_building());
    request.site = Some(SiteData {
        seismic_design_category: Some(SeismicDesignCategory::C),
        commodity_class: Some(CommodityClass::II),
        ..SiteData::unavailable()
    });
    assert_eq!(run_estimate(&request).unwrap(), run_estimate(&request).unwrap());
}

#[rstest]
#[case(RackStyle::Structural, true)]
#[case(RackStyle::Teardrop, false)]
fn hardware_only_for_bolted_rack(#[case] style: RackStyle, #[case] has_hardware: bool) {
    let layout = layout_for(&BuildingEnvelope::new(300.0, 200.0, 28.0), style);
    let bom = compute_bom(&bom_for(&layout, style)).unwrap();
    assert_eq!(bom.lines_in(BomCategory::Hardware).next().is_some(), has_hardware);
    assert_eq!(bom.summary.total_pallet_supports > 0, has_hardware);
}

#[test]
fn class_iii_at_28_ft_is_high_pile_with_in_rack_sprinklers() {
    let assessment = assess_high_pile(28.0, CommodityClass::III, 100_000.0, true, Jurisdiction::IBC);
    assert!(assessment.is_high_pile);
    assert_eq!(assessment.longitudinal_flue_in, 6.0);
    let sprinklers = assessment.sprinkler_spec.unwrap();
    assert!(sprinklers.system_type.includes_in_rack());
    assert_eq!(sprinklers.in_rack_levels_ft, vec![10]);
}

#[rstest]
#[case(SeismicDesignCategory::D, 4, 8, true, true)]
#[case(SeismicDesignCategory::A, 1, 2, false, false)]
fn seismic_anchoring(
    #[case] sdc: SeismicDesignCategory,
    #[case] per_baseplate: u32,
    #[case] per_frame: u32,
    #[case] special_inspection: bool,
    #[case] prelim_engineering: bool,
) {
    let req = seismic_requirements(sdc);
    assert_eq!(req.anchors_per_baseplate, per_baseplate);
    assert_eq!(req.anchors_per_frame, per_frame);
    assert_eq!(req.special_inspection_required, special_inspection);
    assert_eq!(req.prelim_engineering_required, prelim_engineering);
}

#[test]
fn full_assessment_for_california_site() {
    let request = ComplianceRequest {
        seismic_design_category: Some(SeismicDesignCategory::D),
        storage_height_ft: 28.0,
        commodity_class: CommodityClass::III,
        storage_area_sqft: 200_000.0,
        jurisdiction: Jurisdiction::CBC,
        ..ComplianceRequest::default()
    };
    let assessment = assess(&request).unwrap();
    assert!(assessment.high_pile.full_storage_plan_required);
    assert!(assessment.permits.seismic_engineering_required);
    assert!(assessment.permits.special_inspection_required);
}
