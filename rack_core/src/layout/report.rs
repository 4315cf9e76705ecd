//! Plain-text layout summary with a simplified top view.

use std::collections::BTreeMap;
use std::fmt::Write;

use super::{LayoutResult, Row};
use crate::units::group_thousands;

/// Bays drawn per row before the sketch is truncated.
const MAX_SKETCH_BAYS: usize = 50;

const RULE_WIDTH: usize = 60;

/// Render a layout as a human-readable report.
pub fn render_text(layout: &LayoutResult) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "WAREHOUSE RACKING LAYOUT");
    let _ = writeln!(out, "{}", rule);

    if layout.rows.is_empty() {
        let _ = writeln!(out, "No rows generated");
        write_list(&mut out, "Notes", &layout.notes);
        write_list(&mut out, "Warnings", &layout.warnings);
        return out;
    }

    let _ = writeln!(
        out,
        "Pallet Positions: {}",
        group_thousands(u64::from(layout.total_pallet_positions))
    );
    let _ = writeln!(
        out,
        "Bays: {}  Rows: {}  Frames: {}",
        group_thousands(u64::from(layout.total_bays)),
        layout.total_rows,
        group_thousands(u64::from(layout.total_frames))
    );
    let _ = writeln!(
        out,
        "Frame: {}\" ({:.0}ft)",
        layout.frame_height_in,
        f64::from(layout.frame_height_in) / 12.0
    );
    let _ = writeln!(
        out,
        "Beam Levels: {}  Beam Length: {}\"",
        layout.beam_levels, layout.beam_length_in
    );
    let _ = writeln!(out, "Aisle Width: {}\"", layout.aisle_width_in);
    let _ = writeln!(out, "Utilization: {}%", layout.utilization_pct);

    write_list(&mut out, "Notes", &layout.notes);
    write_list(&mut out, "Warnings", &layout.warnings);

    let _ = writeln!(out, "\n--- Top View (simplified) ---");
    let _ = writeln!(out, "{:^width$}", "DOCK", width = RULE_WIDTH);
    let _ = writeln!(out, "{:^width$}", "[STAGING AREA]", width = RULE_WIDTH);
    let _ = writeln!(out);

    let mut pairs: BTreeMap<u32, Vec<&Row>> = BTreeMap::new();
    let mut wall_rows = Vec::new();
    for row in &layout.rows {
        match row.pair_id {
            Some(pair) => pairs.entry(pair).or_default().push(row),
            None => wall_rows.push(row),
        }
    }

    for (pair, rows) in &pairs {
        let bays = rows.first().map(|r| r.bays).unwrap_or(0);
        let bar = sketch_bar(bays);
        let _ = writeln!(out, "  |{}|", bar);
        let _ = writeln!(out, "  |{}|  (pair {}, {} bays each)", bar, pair, bays);
        let _ = writeln!(out, "  {}  <- aisle", "~".repeat(bar.chars().count() + 2));
    }
    for row in wall_rows {
        let _ = writeln!(out, "  |{}|  (wall row, {} bays)", sketch_bar(row.bays), row.bays);
    }

    let _ = writeln!(out, "\n{:^width$}", "BACK WALL", width = RULE_WIDTH);

    let _ = writeln!(out, "\n--- Bay Types (for BOM) ---");
    for bay_type in &layout.bay_types {
        let _ = writeln!(
            out,
            "  Type {}: {} bays, {} end frames, {} tunnels",
            bay_type.label, bay_type.bays, bay_type.end_frames, bay_type.tunnels
        );
        let _ = writeln!(
            out,
            "    Beams/bay: {}, WD/bay: {}, PS/bay: {}",
            bay_type.beams_per_bay, bay_type.wiredecks_per_bay, bay_type.pallet_supports_per_bay
        );
    }

    out
}

fn sketch_bar(bays: u32) -> String {
    "#".repeat((bays as usize).min(MAX_SKETCH_BAYS))
}

fn write_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}:", title);
    for item in items {
        let _ = writeln!(out, "  - {}", item);
    }
}
