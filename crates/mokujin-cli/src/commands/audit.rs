use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use serde_json::Value;

use mokujin_core::{RollResult, audit_roll};

pub fn run(server_seed: Option<&str>, result: &Path, table: Option<&Path>) -> Result<(), String> {
    let table = super::load_table(table)?;
    let rolls = read_results(result)?;
    if rolls.is_empty() {
        println!("  No rolls to audit.");
        return Ok(());
    }

    let mut out = Table::new();
    out.set_content_arrangement(ContentArrangement::Dynamic);
    out.set_header(vec!["Nonce", "Tier", "Entry", "Status"]);

    let mut failed = 0usize;
    for roll in &rolls {
        let seed = server_seed.unwrap_or(&roll.debug.server_seed_used);
        let report = audit_roll(seed, roll, &table);
        let status = if report.is_valid() {
            "ok".to_string()
        } else {
            failed += 1;
            format!("failed: {}", report.failures().join(", "))
        };
        out.add_row(vec![
            roll.debug.nonce.to_string(),
            roll.tier_name.clone(),
            roll.selected_entry.clone().unwrap_or_else(|| "—".to_string()),
            status,
        ]);
    }

    println!("{out}");
    println!();

    if failed == 0 {
        println!("  {} {} rolls audited", "All passed:".green().bold(), rolls.len());
        Ok(())
    } else {
        Err(format!("{failed} of {} rolls failed audit", rolls.len()))
    }
}

/// Read one roll result or an array of them.
fn read_results(path: &Path) -> Result<Vec<RollResult>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {e}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| format!("{}: invalid JSON: {e}", path.display()))?;
    let parsed = if value.is_array() {
        serde_json::from_value::<Vec<RollResult>>(value)
    } else {
        serde_json::from_value::<RollResult>(value).map(|single| vec![single])
    };
    parsed.map_err(|e| format!("{}: not a roll result: {e}", path.display()))
}
