use std::path::Path;

use comfy_table::{ContentArrangement, Table};

pub fn run(table: Option<&Path>) -> Result<(), String> {
    let table = super::load_table(table)?;
    let total_weight = table.total_weight();

    let mut out = Table::new();
    out.set_content_arrangement(ContentArrangement::Dynamic);
    out.set_header(vec!["Tier", "Weight", "Probability", "Entries"]);

    for tier in &table.tiers {
        let entries = if tier.is_empty() {
            "—".to_string()
        } else {
            tier.entries.join(", ")
        };
        out.add_row(vec![
            tier.name.clone(),
            tier.weight.to_string(),
            format!("{:.2}%", super::percent(u64::from(tier.weight), total_weight)),
            entries,
        ]);
    }

    println!("{out}");
    println!();
    println!("  {} tiers, total weight {total_weight}", table.len());

    Ok(())
}
