//! Text and JSON formatting of planning results.

use std::io::{self, Write};

use packplan_core::{Error, PlanningResult, Result};

/// Writes every non-empty pack, followed by a timing block when `timing` is
/// set.
pub fn write_text<W: Write>(out: &mut W, result: &PlanningResult, timing: bool) -> io::Result<()> {
    for pack in result.packs.iter().filter(|pack| !pack.is_empty()) {
        writeln!(out, "{pack}")?;
    }

    if timing {
        let summary = result.summary();
        writeln!(out)?;
        writeln!(out, "Strategy: {}", summary.strategy)?;
        if let Some(sorter) = &summary.sort_algorithm {
            writeln!(out, "Sort algorithm: {sorter}")?;
        }
        writeln!(out, "Sorting time: {:.3} ms", summary.sort_ms)?;
        writeln!(out, "Packing time: {:.3} ms", summary.pack_ms)?;
        writeln!(out, "Total time: {:.3} ms", summary.total_ms)?;
        writeln!(out, "Items processed: {}", summary.total_items)?;
        writeln!(out, "Packs created: {}", summary.packs)?;
        writeln!(out, "Items/second: {:.0}", summary.items_per_second)?;
        writeln!(out, "Utilization: {:.1}%", summary.utilization_percent)?;
    }
    Ok(())
}

/// Renders the text report into a string.
pub fn to_text(result: &PlanningResult, timing: bool) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_text(&mut buffer, result, timing);
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Serializes the whole result as pretty-printed JSON.
pub fn to_json(result: &PlanningResult) -> Result<String> {
    serde_json::to_string_pretty(result).map_err(|e| Error::Serialization(e.to_string()))
}
