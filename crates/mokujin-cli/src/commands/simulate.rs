use std::collections::HashMap;
use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use mokujin_core::roll;

pub fn run(
    rolls: u64,
    server_seed: &str,
    client_seed: &str,
    table: Option<&Path>,
) -> Result<(), String> {
    let table = super::load_table(table)?;
    let total_weight = table.total_weight();

    let mut counts: HashMap<String, u64> = HashMap::new();
    for nonce in 0..rolls {
        let result = roll(server_seed, client_seed, nonce, &table, false)
            .map_err(|e| e.to_string())?;
        *counts.entry(result.tier_name).or_default() += 1;
    }

    println!(
        "  {} {}",
        "Simulation".bold(),
        format!("({rolls} rolls, client seed '{client_seed}')").dimmed()
    );
    println!();

    let mut out = Table::new();
    out.set_content_arrangement(ContentArrangement::Dynamic);
    out.set_header(vec!["Tier", "Weight", "Expected", "Observed", "Count"]);

    // Duplicate tier names share one count; report each name once.
    let mut seen = Vec::new();
    for tier in &table.tiers {
        if seen.contains(&tier.name.as_str()) {
            continue;
        }
        seen.push(tier.name.as_str());
        let weight: u64 = table
            .tiers
            .iter()
            .filter(|t| t.name == tier.name)
            .map(|t| u64::from(t.weight))
            .sum();
        let count = counts.get(&tier.name).copied().unwrap_or(0);
        out.add_row(vec![
            tier.name.clone(),
            weight.to_string(),
            format!("{:.2}%", super::percent(weight, total_weight)),
            format!("{:.2}%", super::percent(count, rolls)),
            count.to_string(),
        ]);
    }

    println!("{out}");
    Ok(())
}
