//! Config command - write the default game configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use panzer_core::GameConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Output JSON file (prints to stdout when omitted)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    let config = GameConfig::default();
    match args.output {
        Some(path) => {
            config
                .save(&path)
                .with_context(|| format!("Failed to write config {:?}", path))?;
            tracing::info!("Wrote default config to {:?}", path);
        }
        None => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}
