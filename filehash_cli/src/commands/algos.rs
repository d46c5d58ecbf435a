//! Algorithm catalog listing

use anyhow::Result;
use filehash_core::{Algorithm, Settings};
use serde::Serialize;

#[derive(Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct AlgorithmInfo {
    id: &'static str,
    name: &'static str,
    hex_length: usize,
    enabled: bool,
}

/// Print the catalog, marking the currently enabled algorithms.
pub fn run(settings: &Settings, format: OutputFormat) -> Result<()> {
    let enabled = settings.enabled_algorithms();
    let catalog: Vec<AlgorithmInfo> = Algorithm::ALL
        .into_iter()
        .map(|algo| AlgorithmInfo {
            id: algo.id(),
            name: algo.display_name(),
            hex_length: algo.hex_len(),
            enabled: enabled.contains(&algo),
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&catalog)?),
        OutputFormat::Text => {
            println!("{:<14} {:<14} {:>10}  enabled", "id", "name", "hex length");
            for info in &catalog {
                println!(
                    "{:<14} {:<14} {:>10}  {}",
                    info.id,
                    info.name,
                    info.hex_length,
                    if info.enabled { "yes" } else { "" }
                );
            }
        }
    }
    Ok(())
}
