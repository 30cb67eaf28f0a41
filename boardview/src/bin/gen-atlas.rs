//! Write the index file for a piece sprite atlas
//!
//! The sheet itself is produced by whatever rasterizes the pieces; this lays out where each
//! piece goes and writes `<name>.atlas` pointing at `<name>.png`.

use std::path::PathBuf;

use boardview::atlas::{Atlas, AtlasError, AtlasLayout};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Lay out a piece sprite atlas and write its index")]
struct Args {
    /// Base name of the sheet and index files
    #[arg(long, default_value = "pieces")]
    name: String,

    /// Size of one piece cell in pixels
    #[arg(long, default_value_t = 72, value_parser = clap::value_parser!(u32).range(1..))]
    size: u32,

    /// Directory to write the index to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> Result<(), AtlasError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let layout = AtlasLayout::new(args.size);
    let (width, height) = layout.sheet_size();
    tracing::info!(width, height, cell = args.size, "sheet layout");

    let atlas = Atlas::generate(&args.name, layout);
    for (piece, region) in atlas.regions() {
        let (x, y) = layout.cell_origin(piece);
        tracing::debug!(%piece, x, y, ?region, "cell");
    }
    atlas.save(args.out_dir.join(format!("{}.atlas", args.name)))
}
