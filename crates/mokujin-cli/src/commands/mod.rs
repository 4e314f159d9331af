pub mod audit;
pub mod roll;
pub mod seed;
pub mod simulate;
pub mod table;
pub mod verify;

use std::path::Path;

use mokujin_core::OutcomeTable;

/// Load a table definition, falling back to the built-in table.
/// The table is validated before it is returned.
fn load_table(path: Option<&Path>) -> Result<OutcomeTable, String> {
    let table = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read table '{}': {e}", path.display()))?;
            OutcomeTable::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => OutcomeTable::default(),
    };
    table.validate().map_err(|e| e.to_string())?;
    tracing::debug!(tiers = table.len(), "table loaded");
    Ok(table)
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}
