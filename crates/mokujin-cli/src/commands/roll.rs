use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use mokujin_core::{RollConfig, RollSession, SeedPolicy, verify_hmac};

pub struct RollArgs {
    pub server_seed: String,
    pub client_seed: String,
    pub nonce: u64,
    pub count: u32,
    pub advance: bool,
    pub table: Option<PathBuf>,
    pub json: bool,
}

pub fn run(args: &RollArgs) -> Result<(), String> {
    let table = super::load_table(args.table.as_deref())?;
    let policy = if args.advance {
        SeedPolicy::AdvanceEachRoll
    } else {
        SeedPolicy::FixedEpoch
    };
    let config = RollConfig::default()
        .with_client_seed(args.client_seed.as_str())
        .with_start_nonce(args.nonce)
        .with_seed_policy(policy);

    let mut session = RollSession::new(args.server_seed.as_str(), table, config)
        .map_err(|e| e.to_string())?;
    for _ in 0..args.count {
        session.roll_next().map_err(|e| e.to_string())?;
    }

    if args.json {
        let json = session.log().export_json().map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    let mut out = Table::new();
    out.set_content_arrangement(ContentArrangement::Dynamic);
    out.set_header(vec!["Nonce", "Tier", "Entry", "Message", "Rarity HMAC", "Verified"]);

    for result in session.log().entries() {
        let debug = &result.debug;
        let verified = verify_hmac(
            &debug.server_seed_used,
            &debug.rarity_message,
            &debug.rarity_digest_hex,
        );
        out.add_row(vec![
            debug.nonce.to_string(),
            result.tier_name.clone(),
            result
                .selected_entry
                .clone()
                .unwrap_or_else(|| "—".to_string()),
            debug.rarity_message.clone(),
            debug.rarity_digest_hex.clone(),
            if verified { "yes" } else { "NO" }.to_string(),
        ]);
    }

    println!("{out}");
    println!();
    println!(
        "  {} {}",
        "Next server seed:".bold(),
        session.server_seed().dimmed()
    );

    Ok(())
}
