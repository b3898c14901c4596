//! kitchen-render - resolve and export kitchen designs from the command line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use kitchen_renderer::{
    Catalog, DEFAULT_JPEG_QUALITY, DesignSnapshot, DirectoryAssets, ExportFormat, ExportHandle,
    ExportSettings, KitchenDesigner, WallColor,
};
use tracing_subscriber::EnvFilter;

/// Resolve a kitchen design and optionally export it as an image.
///
/// Prints the resolved view as JSON on stdout. Logs go to stderr and
/// follow `RUST_LOG`.
#[derive(Parser)]
#[command(name = "kitchen-render")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Catalog JSON file (defaults to the built-in catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Saved design JSON to start from
    #[arg(long)]
    design: Option<PathBuf>,

    /// Wall color, #rrggbb or #rgb
    #[arg(long)]
    wall_color: Option<WallColor>,

    /// Cabinet style id
    #[arg(long)]
    cabinet: Option<String>,

    /// Backsplash pattern id
    #[arg(long)]
    backsplash: Option<String>,

    /// Flooring material id
    #[arg(long)]
    flooring: Option<String>,

    /// Print the design summary instead of the resolved view
    #[arg(long)]
    summary: bool,

    /// Write the exported image here (a directory gets the suggested file name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory holding the base assets
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "png")]
    format: OutputFormat,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY)]
    quality: u8,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Png,
    Jpeg,
}

impl Cli {
    fn export_format(&self) -> ExportFormat {
        match self.format {
            OutputFormat::Png => ExportFormat::Png,
            OutputFormat::Jpeg => ExportFormat::Jpeg {
                quality: self.quality,
            },
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read catalog {}", path.display()))?;
            Catalog::from_json(&json)
                .with_context(|| format!("invalid catalog {}", path.display()))
        }
        None => Ok(Catalog::builtin()),
    }
}

fn apply_selection(designer: &mut KitchenDesigner, cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.design {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read design {}", path.display()))?;
        let snapshot = DesignSnapshot::from_json(&json)
            .with_context(|| format!("invalid design {}", path.display()))?;
        designer.restore(&snapshot)?;
    }
    if let Some(color) = cli.wall_color {
        designer.set_wall_color(color)?;
    }
    if let Some(id) = &cli.cabinet {
        designer.set_cabinet(id)?;
    }
    if let Some(id) = &cli.backsplash {
        designer.set_backsplash(id)?;
    }
    if let Some(id) = &cli.flooring {
        designer.set_flooring(id)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let catalog = Arc::new(load_catalog(cli.catalog.as_ref())?);
    let assets = Arc::new(DirectoryAssets::new(&cli.assets));
    let settings = ExportSettings::default().with_format(cli.export_format());
    let mut designer = KitchenDesigner::new(catalog, assets, settings);

    apply_selection(&mut designer, &cli)?;

    let json = if cli.summary {
        serde_json::to_string_pretty(&designer.summary())?
    } else {
        serde_json::to_string_pretty(&designer.view()?)?
    };
    println!("{json}");

    if let Some(output) = &cli.output {
        let exported = designer
            .export(&ExportHandle::new())
            .await
            .map_err(|e| anyhow::anyhow!("{}: {e}", e.user_message()))?;

        let path = if output.is_dir() {
            output.join(&exported.file_name)
        } else {
            output.clone()
        };
        std::fs::write(&path, &exported.bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!(
            "Wrote {} ({}x{}, {} bytes)",
            path.display(),
            exported.width,
            exported.height,
            exported.bytes.len()
        );
    }

    Ok(())
}
