//! ICD-10 recode command-line tool.

mod cli;
mod output;

use clap::Parser;
use icd_recode_loader::{discover_tables, Recoder};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::output::{format_lookup, tree_nodes, LookupReport};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Command::Tables { dir } = &cli.command {
        for table in discover_tables(dir)? {
            println!("{}", table.display());
        }
        return Ok(());
    }

    let path = cli
        .table
        .as_deref()
        .ok_or("no recode table given; pass --table or set RECODE_TABLE_PATH")?;
    let recoder = Recoder::from_path(path, cli.parse_config())?;

    if !recoder.stats().anomalies.is_empty() {
        tracing::warn!(
            "{} data anomalies repaired while parsing",
            recoder.stats().anomalies.len()
        );
    }

    match &cli.command {
        Command::Lookup { codes, json: false } => {
            let results = recoder.get_codes_batch(codes);
            for (code, result) in codes.iter().zip(&results) {
                println!("{}", format_lookup(code, result));
            }
        }
        Command::Lookup { codes, json: true } => {
            let reports: Vec<LookupReport<'_>> = codes
                .iter()
                .map(|code| LookupReport::new(&recoder, code))
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Command::Group { codes } => {
            println!("{}", format_lookup(codes, &recoder.get_codes_for_group(codes)));
        }
        Command::Tree { json: false } => print!("{}", recoder.describe()),
        Command::Tree { json: true } => {
            println!("{}", serde_json::to_string_pretty(&tree_nodes(recoder.tree()))?);
        }
        Command::Tables { .. } => {}
    }

    Ok(())
}
