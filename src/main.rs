use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mapcraft::error::ConvertError;
use mapcraft::models::{AppConfig, EdgeSetting, MapCount, ModeSetting};
use mapcraft::services::ConvertService;

#[derive(Parser)]
#[command(name = "mapcraft")]
#[command(about = "Convert images into Minecraft map-art colors")]
struct Cli {
    /// YAML config file (defaults to $MAPCRAFT_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PNG image to map colors
    Convert {
        /// Input PNG file
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Conversion mode (overrides config)
        #[arg(short, long, value_enum)]
        mode: Option<ModeSetting>,

        /// Edge handling for dithering modes (overrides config)
        #[arg(long, value_enum)]
        edges: Option<EdgeSetting>,

        /// Cancel the conversion after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Resize to this many 128x128 maps before converting (e.g. 2x3)
        #[arg(long, value_name = "WxH")]
        maps: Option<MapCount>,
    },
    /// List the active palette
    Palette {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct PaletteEntry<'a> {
    index: usize,
    name: Option<&'a str>,
    hex: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mapcraft=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let config = AppConfig::load(cli.config.as_deref());

    match cli.command {
        Commands::Convert {
            input,
            output,
            mode,
            edges,
            timeout,
            maps,
        } => {
            let config = config.with_overrides(mode, edges, timeout, maps);
            run_convert_command(config, &input, &output).await
        }
        Commands::Palette { json } => run_palette_command(&config, json),
    }
}

async fn run_convert_command(
    config: AppConfig,
    input: &Path,
    output: &Path,
) -> anyhow::Result<()> {
    let service = ConvertService::from_config(&config)?;

    match service.convert_file(input, output).await {
        Ok(summary) => {
            println!(
                "Converted {} -> {} ({}x{}, {} map(s), {} colors, {:.2}s)",
                input.display(),
                output.display(),
                summary.grid.width,
                summary.grid.height,
                summary.grid.tile_count(),
                summary.colors_used,
                summary.elapsed.as_secs_f32()
            );
            Ok(())
        }
        Err(ConvertError::Cancelled) => {
            eprintln!("Conversion cancelled, no output written");
            std::process::exit(130);
        }
        Err(e) => Err(e.into()),
    }
}

fn run_palette_command(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let palette = config.palette()?;
    let entries: Vec<PaletteEntry> = palette
        .colors()
        .iter()
        .enumerate()
        .map(|(index, color)| PaletteEntry {
            index,
            name: palette.name(index),
            hex: color.to_string(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Palette ({} colors):\n", entries.len());
    for entry in &entries {
        match entry.name {
            Some(name) => println!("  {:>2}  {}  {name}", entry.index, entry.hex),
            None => println!("  {:>2}  {}", entry.index, entry.hex),
        }
    }
    Ok(())
}
