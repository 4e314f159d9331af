//! CLI frontend for mokujin provably fair rolls.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mokujin",
    about = "mokujin — provably fair weighted rolls",
    version,
    propagate_version = true
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll against a table, chaining the server seed between rolls
    Roll {
        /// Secret server seed for the first roll
        #[arg(short, long)]
        server_seed: String,

        /// Public client seed
        #[arg(short, long)]
        client_seed: String,

        /// Nonce of the first roll
        #[arg(short, long, default_value = "0")]
        nonce: u64,

        /// Number of rolls
        #[arg(long, default_value = "1")]
        count: u32,

        /// Keep the same server seed for every roll
        #[arg(long)]
        no_advance: bool,

        /// JSON table definition (default: built-in eight-tier table)
        #[arg(short, long)]
        table: Option<PathBuf>,

        /// Print the roll log as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a published HMAC digest against a revealed key
    Verify {
        /// Revealed server seed
        #[arg(short, long)]
        key: String,

        /// Message that was hashed, e.g. `client:0:rarity`
        #[arg(short, long)]
        message: String,

        /// Published digest (lowercase hex)
        #[arg(short, long)]
        digest: String,
    },

    /// Recompute recorded rolls from a revealed server seed
    Audit {
        /// Revealed server seed (default: the seed recorded in each roll)
        #[arg(short, long)]
        server_seed: Option<String>,

        /// JSON file with one roll result or an array of them
        #[arg(short, long)]
        result: PathBuf,

        /// JSON table definition (default: built-in eight-tier table)
        #[arg(short, long)]
        table: Option<PathBuf>,
    },

    /// Roll many nonces under one seed and compare tier frequencies to weights
    Simulate {
        /// Number of rolls
        #[arg(short, long, default_value = "1000")]
        rolls: u64,

        /// Server seed
        #[arg(short, long, default_value = "mokujin-simulation")]
        server_seed: String,

        /// Client seed
        #[arg(short, long, default_value = "client")]
        client_seed: String,

        /// JSON table definition (default: built-in eight-tier table)
        #[arg(short, long)]
        table: Option<PathBuf>,
    },

    /// Validate a table and show each tier's probability
    Table {
        /// JSON table definition (default: built-in eight-tier table)
        #[arg(short, long)]
        table: Option<PathBuf>,
    },

    /// Generate a random server seed
    Seed,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Roll {
            server_seed,
            client_seed,
            nonce,
            count,
            no_advance,
            table,
            json,
        } => commands::roll::run(&commands::roll::RollArgs {
            server_seed,
            client_seed,
            nonce,
            count,
            advance: !no_advance,
            table,
            json,
        }),
        Commands::Verify {
            key,
            message,
            digest,
        } => commands::verify::run(&key, &message, &digest),
        Commands::Audit {
            server_seed,
            result,
            table,
        } => commands::audit::run(server_seed.as_deref(), &result, table.as_deref()),
        Commands::Simulate {
            rolls,
            server_seed,
            client_seed,
            table,
        } => commands::simulate::run(rolls, &server_seed, &client_seed, table.as_deref()),
        Commands::Table { table } => commands::table::run(table.as_deref()),
        Commands::Seed => commands::seed::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
