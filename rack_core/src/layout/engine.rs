use tracing::{debug, info, warn};

use super::sizing::{self, BeamLengthChoice};
use super::{
    BuildingEnvelope, ColumnPosition, CrossAisle, LayoutResult, RackRequirements, Row, RowSide, StagingArea,
};
use crate::bom::BayType;
use crate::config::LayoutConfig;
use crate::errors::{qty_add, qty_mul, CalcResult};
use crate::racking::{auto_deck_width_in, decks_per_level};
use crate::units::{group_thousands, round_to, Feet, Inches, SqFt, SqIn};

/// Cross-aisle tunnels are reported 12ft wide.
const CROSS_AISLE_WIDTH_FT: f64 = 12.0;

/// Horizontal span `[start, end]` across the building width.
type Band = (Inches, Inches);

/// Design a layout against an explicit configuration.
///
/// Invalid inputs are errors. Geometry that cannot hold a single row or bay
/// returns a zero-total result with an explanatory note.
pub fn design_layout_with(
    config: &LayoutConfig,
    building: &BuildingEnvelope,
    requirements: &RackRequirements,
) -> CalcResult<LayoutResult> {
    config.validate()?;
    building.validate()?;
    requirements.validate()?;

    let mut notes = Vec::new();
    let mut warnings = Vec::new();

    // Step 1: rack component sizing
    let clear_height: Inches = Feet(building.clear_height_ft).into();
    let frame = sizing::select_frame_height(config, clear_height);
    if !frame.fits {
        warn!(
            clear_height_ft = building.clear_height_ft,
            frame_height_in = frame.height_in,
            "no standard frame fits under sprinkler clearance"
        );
        warnings.push(format!(
            "No standard frame fits under {}ft clear height with {}\" sprinkler clearance; using smallest frame ({}\"), verify clearance",
            building.clear_height_ft, config.sprinkler_clearance_in, frame.height_in
        ));
    }

    let beam_levels = sizing::capped_beam_levels(config, frame.height_in, requirements.max_beam_levels);
    let pallets_per_bay = config.pallets_per_bay;

    let pallet_width = requirements.pallet_size.width_in;
    let beam = sizing::beam_length_for(config, pallet_width, pallets_per_bay);
    if beam.capped {
        warn!(pallet_width, beam_length_in = beam.length_in, "beam length capped");
        warnings.push(beam_cap_warning(config, pallet_width, pallets_per_bay, beam));
    }

    let aisle_width_in = requirements.forklift_type.aisle_width_in();

    notes.push(format!(
        "Frame height: {}\" ({:.0}ft)",
        frame.height_in,
        f64::from(frame.height_in) / 12.0
    ));
    notes.push(format!("Beam levels: {}", beam_levels));
    notes.push(format!("Beam length: {}\"", beam.length_in));
    notes.push(format!(
        "Aisle width: {}\" ({:.1}ft), {}",
        aisle_width_in,
        f64::from(aisle_width_in) / 12.0,
        requirements.forklift_type.display_name()
    ));

    // Step 2: row module
    let depth = Inches(requirements.frame_depth_in);
    let flue = Inches(f64::from(config.flue_space_in));
    let aisle = Inches(f64::from(aisle_width_in));
    let row_module = depth * 2.0 + flue + aisle;
    notes.push(format!(
        "Row module: {}\" ({:.1}ft) = 2x{}\" + {}\" flue + {}\" aisle",
        row_module.0,
        Feet::from(row_module).0,
        depth.0,
        config.flue_space_in,
        aisle_width_in
    ));

    // Step 3: row pairs across the width
    let wall = Inches(f64::from(config.wall_clearance_in));
    let available_width = Inches::from(Feet(building.width_ft)) - wall * 2.0;
    let half_aisle = aisle / 2.0;
    let row_pairs = (available_width - half_aisle).modules_fit(row_module);
    let leftover = available_width - half_aisle - row_module * f64::from(row_pairs);
    let has_wall_row = leftover.0 >= (depth + aisle).0;
    notes.push(format!(
        "Row pairs: {} back-to-back{}",
        row_pairs,
        if has_wall_row { " + 1 wall row" } else { "" }
    ));

    // Step 4: bays along the depth
    let staging = Feet(requirements.min_staging_depth_ft);
    let staging_in: Inches = staging.into();
    let available_depth = Inches::from(Feet(building.length_ft)) - staging_in - wall;
    let upright = Inches(config.upright_width(requirements.rack_style));
    let bay_module = Inches(f64::from(beam.length_in)) + upright;
    let bays_per_row = available_depth.modules_fit(bay_module);
    notes.push(format!(
        "Bays per row: {} ({}\" module x {} = {:.0}ft)",
        bays_per_row,
        bay_module.0,
        bays_per_row,
        Feet::from(bay_module * f64::from(bays_per_row)).0
    ));

    debug!(
        frame_height_in = frame.height_in,
        beam_levels,
        beam_length_in = beam.length_in,
        row_pairs,
        has_wall_row,
        bays_per_row,
        "layout geometry sized"
    );

    let staging_area = StagingArea {
        depth_ft: staging.0,
        width_ft: building.width_ft,
        area_sqft: staging.0 * building.width_ft,
        dock_side: building.dock_side,
        num_dock_doors: building.num_dock_doors,
    };

    let mut result = LayoutResult {
        frame_height_in: frame.height_in,
        beam_levels,
        beam_length_in: beam.length_in,
        aisle_width_in,
        pallets_per_bay,
        rows: Vec::new(),
        row_pairs,
        cross_aisles: Vec::new(),
        columns: Vec::new(),
        staging_area,
        bay_types: Vec::new(),
        total_pallet_positions: 0,
        total_bays: 0,
        total_rows: 0,
        total_frames: 0,
        end_frames: 0,
        tunnel_bays: 0,
        utilization_pct: 0.0,
        notes,
        warnings,
    };

    let physical_rows = qty_add("rows", qty_mul("rowPairs", row_pairs, 2)?, u32::from(has_wall_row))?;
    if physical_rows == 0 || bays_per_row == 0 {
        let reason = if physical_rows == 0 {
            "building too narrow for one row module"
        } else {
            "building too short for one bay after staging and wall clearance"
        };
        warn!(reason, "infeasible layout");
        result.row_pairs = 0;
        result
            .notes
            .push(format!("No feasible rack layout: {}", reason));
        result.columns = overlay_columns(building, &[], &[], None);
        push_shortfall(&mut result, requirements.target_pallet_positions);
        return Ok(result);
    }

    let total_bays = qty_mul("totalBays", bays_per_row, physical_rows)?;

    // Step 5: cross-aisle tunnels
    let spacing = if requirements.cross_aisle_spacing > 0 {
        requirements.cross_aisle_spacing
    } else {
        config.default_cross_aisle_spacing
    };
    let tunnel_positions: Vec<u32> = (1u32..)
        .map_while(|i| i.checked_mul(spacing))
        .take_while(|pos| *pos < bays_per_row)
        .collect();

    result.cross_aisles = tunnel_positions
        .iter()
        .map(|pos| CrossAisle {
            bay_position: *pos,
            y_ft: (staging_in + bay_module * f64::from(*pos)).to_feet_rounded(1),
            width_ft: CROSS_AISLE_WIDTH_FT,
        })
        .collect();
    if !tunnel_positions.is_empty() {
        result
            .notes
            .push(format!("Cross-aisles at bay positions: {:?}", tunnel_positions));
    }

    // Step 6: rows
    let rack_end = staging_in + bay_module * f64::from(bays_per_row);
    let y_start_ft = round_to(staging.0, 2);
    let y_end_ft = rack_end.to_feet_rounded(2);
    let make_row = |row_id: u32, x: Inches, pair_id: Option<u32>, side: RowSide| Row {
        row_id,
        x_ft: x.to_feet_rounded(2),
        y_start_ft,
        y_end_ft,
        bays: bays_per_row,
        pair_id,
        side,
    };

    let mut rows = Vec::with_capacity(physical_rows as usize);
    let mut footprints: Vec<Band> = Vec::with_capacity(physical_rows as usize);
    let mut aisle_bands: Vec<Band> = vec![(wall, wall + half_aisle)];

    let mut x = wall + half_aisle;
    for pair in 0..row_pairs {
        let right_x = x + depth + flue;
        rows.push(make_row(pair * 2, x, Some(pair), RowSide::Left));
        rows.push(make_row(pair * 2 + 1, right_x, Some(pair), RowSide::Right));
        footprints.push((x, x + depth));
        footprints.push((right_x, right_x + depth));

        let pair_end = right_x + depth;
        aisle_bands.push((pair_end, pair_end + aisle));
        x = x + row_module;
    }

    if has_wall_row {
        let wall_x = wall + available_width - depth;
        rows.push(make_row(row_pairs * 2, wall_x, None, RowSide::Wall));
        footprints.push((wall_x, wall_x + depth));
        aisle_bands.push((wall_x - aisle, wall_x));
    }

    // Step 7: columns and exclusions (advisory)
    if building.has_column_grid() {
        result.columns = overlay_columns(building, &footprints, &aisle_bands, Some((staging_in, rack_end)));
        result.notes.push(format!(
            "Building columns: {}ft x {}ft grid ({} columns)",
            building.column_grid_x_ft,
            building.column_grid_y_ft,
            result.columns.len()
        ));
        let conflicts = result.columns.iter().filter(|c| c.conflicts_with_rack).count();
        if conflicts > 0 {
            result.warnings.push(format!(
                "{} building columns fall inside rack rows; adjust row spacing or verify column placement",
                conflicts
            ));
        }
    }

    let depth_ft = Feet::from(depth).0;
    for row in &rows {
        for (i, zone) in building.exclusions.iter().enumerate() {
            if zone.overlaps(row.x_ft, row.x_ft + depth_ft, row.y_start_ft, row.y_end_ft) {
                let label = if zone.label.is_empty() {
                    format!("#{}", i + 1)
                } else {
                    format!("'{}'", zone.label)
                };
                result
                    .warnings
                    .push(format!("Row {} overlaps excluded zone {}", row.row_id, label));
            }
        }
    }

    // Step 8: totals. Tunnel bays keep every beam level and hold the wider
    // tunnel pallet count per level.
    let total_rows = physical_rows;
    let tunnel_bays = qty_mul("tunnelBays", tunnel_positions.len() as u32, total_rows)?;
    let standard_bays = total_bays - tunnel_bays;

    let standard_positions = qty_mul(
        "totalPalletPositions",
        standard_bays,
        qty_mul("totalPalletPositions", beam_levels, pallets_per_bay)?,
    )?;
    let tunnel_positions_pp = qty_mul(
        "totalPalletPositions",
        tunnel_bays,
        qty_mul("totalPalletPositions", beam_levels, config.tunnel_pallets_per_bay)?,
    )?;
    let total_pallet_positions = qty_add("totalPalletPositions", standard_positions, tunnel_positions_pp)?;

    // One end frame per physical row; shared ends between rows are not modeled.
    let end_frames = total_rows;
    let total_frames = qty_add("totalFrames", total_bays, end_frames)?;

    let footprint = SqIn(
        f64::from(standard_bays) * f64::from(beam.length_in) * depth.0
            + f64::from(tunnel_bays) * f64::from(config.tunnel_beam_length_in) * depth.0,
    );
    let utilization_pct = round_to(SqFt::from(footprint).0 / building.area_sqft() * 100.0, 1);

    // Step 9: bay types for the BOM
    let deck_width = auto_deck_width_in(depth.0);
    let wiredecks_per_bay = beam_levels * decks_per_level(f64::from(beam.length_in), deck_width);
    let pallet_supports_per_bay = if requirements.rack_style.uses_pallet_supports() {
        wiredecks_per_bay * 2
    } else {
        0
    };
    result.bay_types = vec![BayType {
        label: "A".to_string(),
        bays: standard_bays,
        end_frames,
        tunnels: tunnel_bays,
        beam_length: beam.length_in,
        beams_per_bay: beam_levels * 2,
        wiredecks_per_bay,
        pallet_supports_per_bay,
        tunnel_beam_length: config.tunnel_beam_length_in,
        tunnel_beams_per_bay: beam_levels * 2,
    }];

    result.rows = rows;
    result.total_rows = total_rows;
    result.tunnel_bays = tunnel_bays;
    result.total_bays = total_bays;
    result.total_pallet_positions = total_pallet_positions;
    result.end_frames = end_frames;
    result.total_frames = total_frames;
    result.utilization_pct = utilization_pct;

    result.notes.push(format!(
        "Total: {} PP across {} bays in {} rows",
        group_thousands(u64::from(total_pallet_positions)),
        group_thousands(u64::from(total_bays)),
        total_rows
    ));
    result
        .notes
        .push(format!("Floor utilization: {}%", utilization_pct));

    push_shortfall(&mut result, requirements.target_pallet_positions);

    info!(
        pallet_positions = total_pallet_positions,
        bays = total_bays,
        rows = total_rows,
        frames = total_frames,
        utilization_pct,
        "layout designed"
    );

    Ok(result)
}

fn beam_cap_warning(config: &LayoutConfig, pallet_width: u32, pallets_per_bay: u32, beam: BeamLengthChoice) -> String {
    format!(
        "{} pallets at {}\" need a {}\" beam; capped at {}\"",
        pallets_per_bay,
        pallet_width,
        pallet_width
            .saturating_mul(pallets_per_bay)
            .saturating_add(config.beam_clearance_in),
        beam.length_in
    )
}

fn push_shortfall(result: &mut LayoutResult, target: u32) {
    if target == 0 || result.total_pallet_positions >= target {
        return;
    }
    let deficit = target - result.total_pallet_positions;
    warn!(target, achieved = result.total_pallet_positions, deficit, "pallet position shortfall");
    result.warnings.push(format!(
        "Target PP shortfall: need {} but only fit {} ({} short)",
        group_thousands(u64::from(target)),
        group_thousands(u64::from(result.total_pallet_positions)),
        group_thousands(u64::from(deficit))
    ));
    result
        .warnings
        .push("Consider: taller frames, narrower aisles, double-deep rack, or reducing staging area".to_string());
}

/// Interior grid columns with conflict flags.
///
/// `rack_zone` is the y-extent of the racking; columns outside it are never
/// flagged.
fn overlay_columns(
    building: &BuildingEnvelope,
    footprints: &[Band],
    aisle_bands: &[Band],
    rack_zone: Option<(Inches, Inches)>,
) -> Vec<ColumnPosition> {
    if !building.has_column_grid() {
        return Vec::new();
    }

    let count_x = (building.width_ft / building.column_grid_x_ft).floor() as u32;
    let count_y = (building.length_ft / building.column_grid_y_ft).floor() as u32;
    let within = |value: Inches, band: &Band| value >= band.0 && value <= band.1;

    let mut columns = Vec::new();
    for ix in 1..count_x {
        for iy in 1..count_y {
            let x_ft = f64::from(ix) * building.column_grid_x_ft;
            let y_ft = f64::from(iy) * building.column_grid_y_ft;
            let cx: Inches = Feet(x_ft).into();
            let cy: Inches = Feet(y_ft).into();

            let in_rack_zone = rack_zone.is_some_and(|zone| within(cy, &zone));
            let conflicts_with_rack = in_rack_zone && footprints.iter().any(|band| within(cx, band));
            let protector_needed =
                in_rack_zone && !conflicts_with_rack && aisle_bands.iter().any(|band| within(cx, band));

            columns.push(ColumnPosition {
                x_ft,
                y_ft,
                size_in: building.column_size_in,
                conflicts_with_rack,
                protector_needed,
            });
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{design_layout, ExcludedZone};
    use crate::racking::{ForkliftClass, PalletSize, RackStyle};

    fn reference_building() -> BuildingEnvelope {
        BuildingEnvelope::new(600.0, 300.0, 32.0)
    }

    #[test]
    fn test_reference_building_geometry() {
        let result = design_layout(&reference_building(), &RackRequirements::default()).unwrap();

        assert_eq!(result.frame_height_in, 336);
        assert_eq!(result.beam_levels, 5);
        assert_eq!(result.beam_length_in, 96);
        assert_eq!(result.aisle_width_in, 120);

        // (3504 - 60) / 210 = 16 pairs, 84" leftover < 162" for a wall row
        assert_eq!(result.row_pairs, 16);
        assert_eq!(result.total_rows, 32);
        assert!(result.rows.iter().all(|r| r.side != RowSide::Wall));

        // 6552 / 99 = 66 bays, tunnels at 20, 40, 60
        assert_eq!(result.rows[0].bays, 66);
        let positions: Vec<u32> = result.cross_aisles.iter().map(|c| c.bay_position).collect();
        assert_eq!(positions, vec![20, 40, 60]);
        assert_eq!(result.cross_aisles[0].y_ft, 215.0);
        assert_eq!(result.tunnel_bays, 96);
    }

    #[test]
    fn test_reference_building_totals() {
        let result = design_layout(&reference_building(), &RackRequirements::default()).unwrap();

        assert_eq!(result.total_bays, 2112);
        assert_eq!(result.standard_bays(), 2016);
        assert_eq!(result.total_pallet_positions, 2016 * 5 * 2 + 96 * 5 * 3);
        assert_eq!(result.end_frames, 32);
        assert_eq!(result.total_frames, 2016 + 96 + 32);
        assert_eq!(result.utilization_pct, 33.6);
    }

    #[test]
    fn test_row_positions() {
        let result = design_layout(&reference_building(), &RackRequirements::default()).unwrap();
        let rows = &result.rows;

        assert_eq!(rows[0].x_ft, 9.0);
        assert_eq!(rows[0].side, RowSide::Left);
        assert_eq!(rows[1].x_ft, 13.0);
        assert_eq!(rows[1].side, RowSide::Right);
        assert_eq!(rows[1].pair_id, Some(0));
        assert_eq!(rows[2].x_ft, 26.5);
        assert_eq!(rows[0].y_start_ft, 50.0);
        assert_eq!(rows[0].y_end_ft, 594.5);
    }

    #[test]
    fn test_bay_type_frame_conservation() {
        let result = design_layout(&reference_building(), &RackRequirements::default()).unwrap();
        let bay_type = &result.bay_types[0];

        assert_eq!(bay_type.frames(), result.total_frames);
        assert_eq!(bay_type.beams_per_bay, 10);
        assert_eq!(bay_type.wiredecks_per_bay, 10);
        assert_eq!(bay_type.pallet_supports_per_bay, 0);
        assert_eq!(bay_type.tunnel_beams_per_bay, 10);
    }

    #[test]
    fn test_wall_row_sits_flush_against_far_wall() {
        // 546" wide: 450" available, one pair, 180" left for a wall row
        let building = BuildingEnvelope::new(200.0, 45.5, 24.0);
        let result = design_layout(&building, &RackRequirements::default()).unwrap();

        assert_eq!(result.row_pairs, 1);
        assert_eq!(result.total_rows, 3);
        let wall_row = result.rows.last().unwrap();
        assert_eq!(wall_row.side, RowSide::Wall);
        assert_eq!(wall_row.pair_id, None);
        // 546 - 48 - 42 = 456" = 38ft
        assert_eq!(wall_row.x_ft, 38.0);
    }

    #[test]
    fn test_infeasible_width_returns_zero_totals() {
        let building = BuildingEnvelope::new(200.0, 20.0, 24.0);
        let result = design_layout(&building, &RackRequirements::default()).unwrap();

        assert!(!result.is_feasible());
        assert_eq!(result.total_pallet_positions, 0);
        assert_eq!(result.total_frames, 0);
        assert!(result.rows.is_empty());
        assert!(result.bay_types.is_empty());
        assert!(result.notes.iter().any(|n| n.starts_with("No feasible rack layout")));
    }

    #[test]
    fn test_infeasible_depth_returns_zero_totals() {
        let building = BuildingEnvelope::new(55.0, 300.0, 24.0);
        let result = design_layout(&building, &RackRequirements::default()).unwrap();
        assert!(!result.is_feasible());
        assert_eq!(result.utilization_pct, 0.0);
    }

    #[test]
    fn test_shortfall_warns_twice() {
        let requirements = RackRequirements {
            target_pallet_positions: 100_000,
            ..RackRequirements::default()
        };
        let result = design_layout(&reference_building(), &requirements).unwrap();
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].starts_with("Target PP shortfall: need 100,000"));
        assert!(result.warnings[1].starts_with("Consider:"));
    }

    #[test]
    fn test_met_target_has_no_warning() {
        let requirements = RackRequirements {
            target_pallet_positions: 1_000,
            ..RackRequirements::default()
        };
        let result = design_layout(&reference_building(), &requirements).unwrap();
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_low_clear_height_falls_back_with_warning() {
        let building = BuildingEnvelope::new(600.0, 300.0, 10.0);
        let result = design_layout(&building, &RackRequirements::default()).unwrap();
        assert_eq!(result.frame_height_in, 96);
        assert_eq!(result.beam_levels, 1);
        assert!(result.warnings[0].contains("No standard frame fits"));
    }

    #[test]
    fn test_structural_style() {
        let requirements = RackRequirements {
            rack_style: RackStyle::Structural,
            ..RackRequirements::default()
        };
        let result = design_layout(&reference_building(), &requirements).unwrap();
        // 6552 / 100 = 65 bays
        assert_eq!(result.rows[0].bays, 65);
        assert_eq!(result.bay_types[0].pallet_supports_per_bay, 20);
    }

    #[test]
    fn test_narrow_aisle_packs_more_rows() {
        let reach = design_layout(&reference_building(), &RackRequirements::default()).unwrap();
        let vna = design_layout(
            &reference_building(),
            &RackRequirements {
                forklift_type: ForkliftClass::Vna,
                ..RackRequirements::default()
            },
        )
        .unwrap();
        assert_eq!(vna.aisle_width_in, 66);
        assert!(vna.total_rows > reach.total_rows);
    }

    #[test]
    fn test_cross_aisle_override_and_cap() {
        let requirements = RackRequirements {
            cross_aisle_spacing: 30,
            max_beam_levels: 3,
            ..RackRequirements::default()
        };
        let result = design_layout(&reference_building(), &requirements).unwrap();
        let positions: Vec<u32> = result.cross_aisles.iter().map(|c| c.bay_position).collect();
        assert_eq!(positions, vec![30, 60]);
        assert_eq!(result.beam_levels, 3);
    }

    #[test]
    fn test_cross_aisle_not_placed_at_row_end() {
        // 4620 - 600 - 48 = 3972" of depth, 3972 / 99 = 40 bays
        let building = BuildingEnvelope::new(385.0, 300.0, 32.0);
        let result = design_layout(&building, &RackRequirements::default()).unwrap();
        assert_eq!(result.rows[0].bays, 40);
        let positions: Vec<u32> = result.cross_aisles.iter().map(|c| c.bay_position).collect();
        assert_eq!(positions, vec![20]);
        assert_eq!(result.tunnel_bays, result.total_rows);
    }

    #[test]
    fn test_oversized_building_is_an_input_error() {
        let building = BuildingEnvelope::new(1.0e7, 1.0e7, 32.0);
        let err = design_layout(&building, &RackRequirements::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_oversized_pallet_caps_beam() {
        let config = LayoutConfig {
            pallets_per_bay: 3,
            ..LayoutConfig::default()
        };
        let requirements = RackRequirements {
            pallet_size: PalletSize::new(48, 40),
            ..RackRequirements::default()
        };
        let result = design_layout_with(&config, &reference_building(), &requirements).unwrap();
        assert_eq!(result.beam_length_in, 144);
        assert!(result.warnings.iter().any(|w| w.contains("capped at 144")));
    }

    #[test]
    fn test_column_flags() {
        let mut building = reference_building();
        building.column_grid_x_ft = 50.0;
        building.column_grid_y_ft = 50.0;
        let result = design_layout(&building, &RackRequirements::default()).unwrap();

        // 5 x 11 interior columns
        assert_eq!(result.columns.len(), 55);
        // Column at x=50ft (600"): pair 2 spans 528-618", inside the right row (576-618")
        let col = result
            .columns
            .iter()
            .find(|c| c.x_ft == 50.0 && c.y_ft == 100.0)
            .unwrap();
        assert!(col.conflicts_with_rack);
        assert!(!col.protector_needed);
        assert!(result.warnings.iter().any(|w| w.contains("building columns fall inside rack rows")));
    }

    #[test]
    fn test_column_in_aisle_needs_protector() {
        let mut building = reference_building();
        // Aisle after pair 0 spans 198-318"; 20ft = 240" falls inside
        building.column_grid_x_ft = 20.0;
        building.column_grid_y_ft = 100.0;
        let result = design_layout(&building, &RackRequirements::default()).unwrap();
        let col = result
            .columns
            .iter()
            .find(|c| c.x_ft == 20.0 && c.y_ft == 100.0)
            .unwrap();
        assert!(!col.conflicts_with_rack);
        assert!(col.protector_needed);
    }

    #[test]
    fn test_exclusion_overlap_warns() {
        let mut building = reference_building();
        building.exclusions.push(ExcludedZone {
            label: "Office".to_string(),
            x_ft: 0.0,
            y_ft: 100.0,
            width_ft: 12.0,
            length_ft: 30.0,
        });
        let result = design_layout(&building, &RackRequirements::default()).unwrap();
        assert!(result
            .warnings
            .iter()
            .any(|w| w == "Row 0 overlaps excluded zone 'Office'"));
    }

    #[test]
    fn test_rejects_invalid_building() {
        let building = BuildingEnvelope::new(-1.0, 300.0, 32.0);
        let err = design_layout(&building, &RackRequirements::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_idempotent() {
        let a = design_layout(&reference_building(), &RackRequirements::default()).unwrap();
        let b = design_layout(&reference_building(), &RackRequirements::default()).unwrap();
        assert_eq!(a, b);
    }
}
