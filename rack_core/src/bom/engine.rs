use std::collections::BTreeMap;

use tracing::{debug, info};

use super::{
    BayTypeDetail, BomCategory, BomLine, BomRequest, BomResult, BomSummary, DEFAULT_ANCHOR_SIZE,
    GUARD_ANCHOR_SIZE, SPACERS_PER_FRAME_ESTIMATE,
};
use crate::compliance::seismic_requirements;
use crate::errors::{qty_add, qty_mul, CalcResult};
use crate::racking::{auto_anchors_per_frame, auto_deck_width_in, decks_per_level, RackStyle};

/// Insertion-ordered line accumulator that merges on (category, description).
#[derive(Debug, Default)]
struct LineBook {
    lines: Vec<BomLine>,
}

impl LineBook {
    fn add(&mut self, category: BomCategory, item: impl Into<String>, qty: u32) -> CalcResult<&mut BomLine> {
        let item = item.into();
        let index = match self
            .lines
            .iter()
            .position(|line| line.category == category && line.item == item)
        {
            Some(index) => {
                self.lines[index].qty = qty_add(&item, self.lines[index].qty, qty)?;
                index
            }
            None => {
                self.lines.push(BomLine {
                    item,
                    qty,
                    category,
                    qty_by_type: BTreeMap::new(),
                    note: None,
                });
                self.lines.len() - 1
            }
        };
        Ok(&mut self.lines[index])
    }

    /// Add a quantity attributed to one bay type.
    fn add_for_type(&mut self, category: BomCategory, item: impl Into<String>, label: &str, qty: u32) -> CalcResult<()> {
        let line = self.add(category, item, qty)?;
        let by_type = line.qty_by_type.entry(label.to_string()).or_insert(0);
        *by_type = qty_add(label, *by_type, qty)?;
        Ok(())
    }

    fn into_lines(self) -> Vec<BomLine> {
        self.lines
    }
}

/// Compute the merged BOM for a set of bay types.
pub fn compute_bom(request: &BomRequest) -> CalcResult<BomResult> {
    request.validate()?;

    let style = request.rack_style;
    let depth = request.frame_depth;
    let deck_width = request
        .deck_width
        .filter(|w| *w > 0.0)
        .unwrap_or_else(|| auto_deck_width_in(depth));

    let seismic = request.seismic_design_category.map(seismic_requirements);
    let anchors_per_frame = request
        .anchors_per_frame
        .filter(|n| *n > 0)
        .or_else(|| seismic.as_ref().map(|s| s.anchors_per_frame))
        .unwrap_or_else(|| auto_anchors_per_frame(depth));
    let anchor_size = request
        .anchor_size
        .clone()
        .or_else(|| seismic.as_ref().map(|s| s.anchor_size.clone()))
        .unwrap_or_else(|| DEFAULT_ANCHOR_SIZE.to_string());

    debug!(
        bay_types = request.bay_types.len(),
        deck_width,
        anchors_per_frame,
        "computing BOM"
    );

    let frame_item = format!(
        "{} | Frames | {:.0}' x {}\"",
        style.label(),
        f64::from(request.frame_height) / 12.0,
        depth
    );
    let deck_item = format!("{} | Wiredecks | {}\" x {}\"", style.deck_type(), depth, deck_width);

    // Frames, beams and decks are recorded in separate books so each
    // category keeps its own first-seen order.
    let mut frames_book = LineBook::default();
    let mut beams_book = LineBook::default();
    let mut decks_book = LineBook::default();

    let mut details = Vec::with_capacity(request.bay_types.len());
    let mut summary = BomSummary {
        total_bays: 0,
        total_tunnels: 0,
        total_frames: 0,
        total_beams: 0,
        total_wiredecks: 0,
        total_pallet_supports: 0,
        total_anchors: 0,
        total_eoa_guards: 0,
        total_pallet_positions: request.pallet_positions,
    };

    for bay_type in &request.bay_types {
        let label = bay_type.label.as_str();
        let frames = qty_add(
            "frames",
            qty_add("frames", bay_type.bays, bay_type.end_frames)?,
            bay_type.tunnels,
        )?;

        let standard_beams = qty_mul("beamsPerBay", bay_type.bays, bay_type.beams_per_bay)?;
        let tunnel_beams = qty_mul("tunnelBeamsPerBay", bay_type.tunnels, bay_type.tunnel_beams_per_bay)?;
        let beams = qty_add("beams", standard_beams, tunnel_beams)?;

        let standard_decks = qty_mul("wiredecksPerBay", bay_type.bays, bay_type.wiredecks_per_bay)?;
        let tunnel_decks = if bay_type.tunnels > 0 && bay_type.tunnel_beams_per_bay > 0 {
            let per_level = decks_per_level(f64::from(bay_type.tunnel_beam_length), deck_width);
            qty_mul(
                "tunnelBeamsPerBay",
                bay_type.tunnels,
                qty_mul("tunnelBeamsPerBay", bay_type.tunnel_levels(), per_level)?,
            )?
        } else {
            0
        };
        let wiredecks = qty_add("wiredecks", standard_decks, tunnel_decks)?;

        let pallet_supports = if style.uses_pallet_supports() {
            qty_mul("palletSupportsPerBay", bay_type.bays, bay_type.pallet_supports_per_bay)?
        } else {
            0
        };

        summary.total_frames = qty_add("totalFrames", summary.total_frames, frames)?;
        summary.total_beams = qty_add("totalBeams", summary.total_beams, beams)?;
        summary.total_wiredecks = qty_add("totalWiredecks", summary.total_wiredecks, wiredecks)?;
        summary.total_pallet_supports = qty_add("totalPalletSupports", summary.total_pallet_supports, pallet_supports)?;
        summary.total_bays = qty_add("totalBays", summary.total_bays, bay_type.bays)?;
        summary.total_tunnels = qty_add("totalTunnels", summary.total_tunnels, bay_type.tunnels)?;

        frames_book.add_for_type(BomCategory::Frames, frame_item.as_str(), label, frames)?;

        beams_book.add_for_type(
            BomCategory::Beams,
            format!("{} | Beams | {}\"", style.label(), bay_type.beam_length),
            label,
            standard_beams,
        )?;
        if tunnel_beams > 0 {
            beams_book.add_for_type(
                BomCategory::Beams,
                format!("{} | Beams | {}\" | Tunnel", style.label(), bay_type.tunnel_beam_length),
                label,
                tunnel_beams,
            )?;
        }

        if wiredecks > 0 {
            decks_book.add_for_type(BomCategory::WireDecks, deck_item.as_str(), label, wiredecks)?;
        }

        details.push(BayTypeDetail {
            label: bay_type.label.clone(),
            bays: bay_type.bays,
            end_frames: bay_type.end_frames,
            tunnels: bay_type.tunnels,
            beam_length: bay_type.beam_length,
            beams_per_bay: bay_type.beams_per_bay,
            wiredecks_per_bay: bay_type.wiredecks_per_bay,
            pallet_supports_per_bay: bay_type.pallet_supports_per_bay,
            frames,
            beams,
            wiredecks,
            pallet_supports,
        });
    }

    let mut items = frames_book.into_lines();
    if items.is_empty() {
        // No bay types still yields a well-formed frame line.
        items.push(BomLine {
            item: frame_item,
            qty: 0,
            category: BomCategory::Frames,
            qty_by_type: BTreeMap::new(),
            note: None,
        });
    }
    items.extend(beams_book.into_lines().into_iter().filter(|line| line.qty > 0));
    items.extend(decks_book.into_lines());

    let mut book = LineBook { lines: items };

    if summary.total_pallet_supports > 0 {
        book.add(
            BomCategory::PalletSupports,
            format!("Pallet Supports | {}\"", depth),
            summary.total_pallet_supports,
        )?;
    }

    match &request.spacers {
        Some(spacers) => {
            for spacer in spacers.iter().filter(|s| s.qty > 0) {
                book.add(BomCategory::RowSpacers, format!("Row Spacers | {}\"", spacer.size), spacer.qty)?;
            }
        }
        None => {
            let estimate = (f64::from(summary.total_frames) * SPACERS_PER_FRAME_ESTIMATE).round_ties_even() as u32;
            book.add(BomCategory::RowSpacers, "Row Spacers | 12\"", estimate)?.note =
                Some("Estimate, verify with layout".to_string());
        }
    }

    summary.total_anchors = qty_mul("anchorsPerFrame", summary.total_frames, anchors_per_frame)?;
    book.add(
        BomCategory::Anchors,
        format!("Anchors | {}", anchor_size),
        summary.total_anchors,
    )?;

    let total_shims = qty_mul("shimsPerFrame", summary.total_frames, request.shims_per_frame)?;
    if total_shims > 0 {
        book.add(BomCategory::Shims, "Shims", total_shims)?.note =
            Some(format!("{} per frame", request.shims_per_frame));
    }

    if request.eoa_guards_left > 0 {
        book.add(
            BomCategory::EndOfAisleGuards,
            format!("End of Aisle Guard | {}\" | Left", depth),
            request.eoa_guards_left,
        )?;
    }
    if request.eoa_guards_right > 0 {
        book.add(
            BomCategory::EndOfAisleGuards,
            format!("End of Aisle Guard | {}\" | Right", depth),
            request.eoa_guards_right,
        )?;
    }
    summary.total_eoa_guards = qty_add("eoaGuards", request.eoa_guards_left, request.eoa_guards_right)?;
    if summary.total_eoa_guards > 0 {
        book.add(
            BomCategory::Anchors,
            format!("Anchors | {}", GUARD_ANCHOR_SIZE),
            qty_mul("guardAnchorsPer", summary.total_eoa_guards, request.guard_anchors_per)?,
        )?;
    }

    match style {
        RackStyle::Structural => {
            let bolts = qty_mul("totalBeams", summary.total_beams, 4)?;
            book.add(BomCategory::Hardware, "Hardware | 1/2\" x 2\" Bolts", bolts)?;
            book.add(BomCategory::Hardware, "Hardware | 1/2\" Hex Nut", bolts)?;
        }
        RackStyle::Teardrop => {}
    }

    info!(
        frames = summary.total_frames,
        beams = summary.total_beams,
        wiredecks = summary.total_wiredecks,
        anchors = summary.total_anchors,
        "BOM computed"
    );

    Ok(BomResult {
        project_name: request.project_name.clone(),
        client: request.client.clone(),
        rack_style: style,
        manufacturer: request.manufacturer.clone(),
        frame_height: request.frame_height,
        frame_depth: depth,
        deck_width,
        anchors_per_frame,
        anchor_size,
        shims_per_frame: request.shims_per_frame,
        bay_type_details: details,
        bom_items: book.into_lines(),
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bom::{BayType, SpacerSpec};
    use crate::compliance::SeismicDesignCategory;

    fn bay_type(label: &str, bays: u32, end_frames: u32, tunnels: u32) -> BayType {
        BayType {
            label: label.to_string(),
            bays,
            end_frames,
            tunnels,
            beam_length: 96,
            beams_per_bay: 8,
            wiredecks_per_bay: 8,
            pallet_supports_per_bay: 16,
            tunnel_beam_length: 144,
            tunnel_beams_per_bay: 6,
        }
    }

    fn request(style: RackStyle, bay_types: Vec<BayType>) -> BomRequest {
        BomRequest {
            rack_style: style,
            bay_types,
            ..BomRequest::default()
        }
    }

    fn qty(result: &BomResult, item: &str) -> Option<u32> {
        result.bom_items.iter().find(|line| line.item == item).map(|line| line.qty)
    }

    #[test]
    fn test_single_type_quantities() {
        let result = compute_bom(&request(RackStyle::Teardrop, vec![bay_type("A", 100, 10, 4)])).unwrap();

        assert_eq!(result.summary.total_frames, 114);
        // 100 x 8 + 4 x 6
        assert_eq!(result.summary.total_beams, 824);
        // 100 x 8 + 4 x 3 levels x floor(144 / 46)
        assert_eq!(result.summary.total_wiredecks, 836);
        assert_eq!(qty(&result, "Teardrop | Frames | 22' x 42\""), Some(114));
        assert_eq!(qty(&result, "Teardrop | Beams | 96\""), Some(800));
        assert_eq!(qty(&result, "Teardrop | Beams | 144\" | Tunnel"), Some(24));
        assert_eq!(qty(&result, "Step | Wiredecks | 42\" x 46\""), Some(836));
    }

    #[test]
    fn test_teardrop_never_has_hardware_or_supports() {
        let result = compute_bom(&request(RackStyle::Teardrop, vec![bay_type("A", 100, 10, 0)])).unwrap();
        assert_eq!(result.lines_in(BomCategory::Hardware).count(), 0);
        assert_eq!(result.lines_in(BomCategory::PalletSupports).count(), 0);
        assert_eq!(result.summary.total_pallet_supports, 0);
    }

    #[test]
    fn test_structural_hardware_and_supports() {
        let result = compute_bom(&request(RackStyle::Structural, vec![bay_type("A", 100, 10, 0)])).unwrap();
        assert_eq!(qty(&result, "Hardware | 1/2\" x 2\" Bolts"), Some(3200));
        assert_eq!(qty(&result, "Hardware | 1/2\" Hex Nut"), Some(3200));
        assert_eq!(qty(&result, "Pallet Supports | 42\""), Some(1600));
        assert_eq!(qty(&result, "Flanged | Wiredecks | 42\" x 46\""), Some(800));
    }

    #[test]
    fn test_shared_beam_sizes_merge() {
        let result = compute_bom(&request(
            RackStyle::Teardrop,
            vec![bay_type("A", 50, 5, 0), bay_type("B", 30, 3, 0)],
        ))
        .unwrap();

        let beam_lines: Vec<&BomLine> = result.lines_in(BomCategory::Beams).collect();
        assert_eq!(beam_lines.len(), 1);
        assert_eq!(beam_lines[0].qty, 640);
        assert_eq!(beam_lines[0].qty_by_type.get("A"), Some(&400));
        assert_eq!(beam_lines[0].qty_by_type.get("B"), Some(&240));

        assert_eq!(result.lines_in(BomCategory::Frames).count(), 1);
        assert_eq!(result.category_total(BomCategory::Frames), 88);
    }

    #[test]
    fn test_distinct_beam_sizes_keep_order() {
        let mut long = bay_type("B", 10, 2, 0);
        long.beam_length = 120;
        let result = compute_bom(&request(RackStyle::Teardrop, vec![bay_type("A", 10, 2, 0), long])).unwrap();
        let items: Vec<&str> = result.lines_in(BomCategory::Beams).map(|l| l.item.as_str()).collect();
        assert_eq!(items, vec!["Teardrop | Beams | 96\"", "Teardrop | Beams | 120\""]);
    }

    #[test]
    fn test_spacer_estimate_when_absent() {
        let result = compute_bom(&request(RackStyle::Teardrop, vec![bay_type("A", 100, 10, 0)])).unwrap();
        let line = result.lines_in(BomCategory::RowSpacers).next().unwrap();
        assert_eq!(line.item, "Row Spacers | 12\"");
        assert_eq!(line.qty, 165);
        assert!(line.note.is_some());
    }

    #[test]
    fn test_spacer_estimate_rounds_half_to_even() {
        // 111 frames x 1.5 = 166.5
        let result = compute_bom(&request(RackStyle::Teardrop, vec![bay_type("A", 100, 11, 0)])).unwrap();
        assert_eq!(result.summary.total_frames, 111);
        assert_eq!(qty(&result, "Row Spacers | 12\""), Some(166));
    }

    #[test]
    fn test_quantity_overflow_is_an_input_error() {
        let mut big = bay_type("A", 1_000_000_000, 0, 0);
        big.beams_per_bay = 10;
        let err = compute_bom(&request(RackStyle::Teardrop, vec![big])).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("beamsPerBay"));
    }

    #[test]
    fn test_spacer_pass_through() {
        let mut req = request(RackStyle::Teardrop, vec![bay_type("A", 100, 10, 0)]);
        req.spacers = Some(vec![
            SpacerSpec { size: "12".to_string(), qty: 40 },
            SpacerSpec { size: "18".to_string(), qty: 0 },
            SpacerSpec { size: "12".to_string(), qty: 10 },
        ]);
        let result = compute_bom(&req).unwrap();
        let lines: Vec<&BomLine> = result.lines_in(BomCategory::RowSpacers).collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].qty, 50);
        assert!(lines[0].note.is_none());

        req.spacers = Some(Vec::new());
        let result = compute_bom(&req).unwrap();
        assert_eq!(result.lines_in(BomCategory::RowSpacers).count(), 0);
    }

    #[test]
    fn test_anchor_precedence() {
        let base = request(RackStyle::Teardrop, vec![bay_type("A", 100, 10, 0)]);

        let depth_rule = compute_bom(&base).unwrap();
        assert_eq!(depth_rule.anchors_per_frame, 2);
        assert_eq!(qty(&depth_rule, "Anchors | 1/2\" x 4\""), Some(220));

        let seismic = compute_bom(&BomRequest {
            seismic_design_category: Some(SeismicDesignCategory::D),
            ..base.clone()
        })
        .unwrap();
        assert_eq!(seismic.anchors_per_frame, 8);
        assert_eq!(qty(&seismic, "Anchors | 5/8\" x 4.5\""), Some(880));

        let explicit = compute_bom(&BomRequest {
            seismic_design_category: Some(SeismicDesignCategory::D),
            anchors_per_frame: Some(3),
            anchor_size: Some("1/2\" x 5\"".to_string()),
            ..base
        })
        .unwrap();
        assert_eq!(explicit.anchors_per_frame, 3);
        assert_eq!(qty(&explicit, "Anchors | 1/2\" x 5\""), Some(330));
    }

    #[test]
    fn test_deep_frames_resolve_wider_decks() {
        let req = BomRequest {
            frame_depth: 48.0,
            ..request(RackStyle::Teardrop, vec![bay_type("A", 10, 2, 1)])
        };
        let result = compute_bom(&req).unwrap();
        assert_eq!(result.deck_width, 58.0);
        assert_eq!(result.anchors_per_frame, 8);
        // tunnel: 3 levels x floor(144 / 58) = 6
        assert_eq!(result.summary.total_wiredecks, 86);
        assert_eq!(qty(&result, "Step | Wiredecks | 48\" x 58\""), Some(86));
    }

    #[test]
    fn test_guards_and_guard_anchors() {
        let req = BomRequest {
            eoa_guards_left: 6,
            eoa_guards_right: 4,
            ..request(RackStyle::Teardrop, vec![bay_type("A", 10, 2, 0)])
        };
        let result = compute_bom(&req).unwrap();
        assert_eq!(qty(&result, "End of Aisle Guard | 42\" | Left"), Some(6));
        assert_eq!(qty(&result, "End of Aisle Guard | 42\" | Right"), Some(4));
        assert_eq!(qty(&result, "Anchors | 3/4\" x 4\""), Some(40));
        assert_eq!(result.summary.total_eoa_guards, 10);
    }

    #[test]
    fn test_line_order() {
        let req = BomRequest {
            eoa_guards_left: 1,
            ..request(RackStyle::Structural, vec![bay_type("A", 10, 2, 1)])
        };
        let result = compute_bom(&req).unwrap();
        let categories: Vec<BomCategory> = result.bom_items.iter().map(|l| l.category).collect();
        assert_eq!(
            categories,
            vec![
                BomCategory::Frames,
                BomCategory::Beams,
                BomCategory::Beams,
                BomCategory::WireDecks,
                BomCategory::PalletSupports,
                BomCategory::RowSpacers,
                BomCategory::Anchors,
                BomCategory::Shims,
                BomCategory::EndOfAisleGuards,
                BomCategory::Anchors,
                BomCategory::Hardware,
                BomCategory::Hardware,
            ]
        );
    }

    #[test]
    fn test_empty_request_is_well_formed() {
        let result = compute_bom(&BomRequest::default()).unwrap();
        assert_eq!(result.summary.total_frames, 0);
        assert_eq!(result.bom_items[0].category, BomCategory::Frames);
        assert_eq!(result.bom_items[0].qty, 0);
    }

    #[test]
    fn test_idempotent() {
        let req = request(RackStyle::Structural, vec![bay_type("A", 100, 10, 4)]);
        assert_eq!(compute_bom(&req).unwrap(), compute_bom(&req).unwrap());
    }
}
