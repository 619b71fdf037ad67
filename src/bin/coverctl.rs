use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use cover_composer::{
    AssetLoader, CompositionConfig, EffectKey, Exporter, FsAssetLoader, Platform, QualityPreset,
    apply_effect, effect_layers, font_catalog,
};

#[derive(Parser, Debug)]
#[command(name = "coverctl", version, about = "Inspect and export profile cover slides")]
struct Cli {
    /// Log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resize an image the way a save would.
    Export(ExportArgs),
    /// Apply an effect to an image and write a PNG.
    Preview(PreviewArgs),
    /// Print overlay descriptors as JSON.
    Effects {
        /// Only this effect.
        #[arg(long)]
        key: Option<EffectKey>,
    },
    /// List font catalog keys.
    Fonts,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Source image.
    #[arg(long)]
    input: PathBuf,

    /// Quality preset: original, 1080p, 2K, 4K or 8K.
    #[arg(long, default_value = "original")]
    preset: QualityPreset,

    /// Target platform: ios, android or desktop.
    #[arg(long)]
    platform: Option<Platform>,

    /// Composition config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output path. Defaults to `<input>.<preset>.<ext>`.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Source image.
    #[arg(long)]
    input: PathBuf,

    #[arg(long)]
    effect: EffectKey,

    /// Output PNG path.
    #[arg(long)]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Effects { key } => cmd_effects(key),
        Command::Fonts => cmd_fonts(),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_config(path: Option<&Path>) -> anyhow::Result<CompositionConfig> {
    let Some(path) = path else {
        return Ok(CompositionConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    Ok(CompositionConfig::from_json(&json)?)
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut config = read_config(args.config.as_deref())?;
    if let Some(platform) = args.platform {
        config.export.platform = platform;
    }

    let source = FsAssetLoader.load(&args.input.to_string_lossy())?;
    let exported = Exporter::new(config.export).upscale(source, args.preset);

    let output = args.output.unwrap_or_else(|| {
        args.input
            .with_extension(format!("{}.{}", args.preset.as_str(), exported.extension()))
    });
    std::fs::write(&output, &exported.bytes)
        .with_context(|| format!("write '{}'", output.display()))?;

    match exported.dimensions {
        Some((width, height)) => {
            println!("{} {width}x{height} {}", output.display(), exported.mime)
        }
        None => println!("{} (unchanged) {}", output.display(), exported.mime),
    }
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let img = image::open(&args.input)
        .with_context(|| format!("open image '{}'", args.input.display()))?
        .to_rgba8();
    let out = apply_effect(&img, args.effect);
    out.save(&args.output)
        .with_context(|| format!("write '{}'", args.output.display()))?;
    println!("{}", args.output.display());
    Ok(())
}

fn cmd_effects(key: Option<EffectKey>) -> anyhow::Result<()> {
    let json = match key {
        Some(key) => serde_json::to_string_pretty(effect_layers(key))?,
        None => {
            let all: BTreeMap<&str, _> = EffectKey::ALL
                .into_iter()
                .map(|key| (key.as_str(), effect_layers(key)))
                .collect();
            serde_json::to_string_pretty(&all)?
        }
    };
    println!("{json}");
    Ok(())
}

fn cmd_fonts() -> anyhow::Result<()> {
    for style in font_catalog() {
        let italic = if style.italic { " italic" } else { "" };
        println!("{}\t{} {}{italic}", style.key, style.family, style.weight);
    }
    Ok(())
}
