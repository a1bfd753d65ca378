use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use meishi::{build_card, CardOptions, OUTPUT_FILE};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TrueType font to embed instead of the built-in Helvetica
    #[arg(long, value_name = "PATH")]
    font: Option<PathBuf>,

    /// Outline every text run to check its alignment
    #[arg(long, default_value_t = false)]
    block: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::new();
    match env::var("RUST_LOG") {
        Ok(filters) => logger.parse_filters(&filters),
        Err(_) => logger.parse_filters("meishi=info"),
    };
    logger.init();

    let options = CardOptions {
        font_path: args.font.as_deref(),
        show_blocks: args.block,
        asset_root: None,
    };
    let bytes = build_card(&options).context("failed to build the card")?;

    fs::write(OUTPUT_FILE, &bytes).with_context(|| format!("failed to write {}", OUTPUT_FILE))?;
    info!("wrote {}", OUTPUT_FILE);
    Ok(())
}
