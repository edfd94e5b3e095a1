use std::path::{Path, PathBuf};

use clap::Parser;
use svgfont::{build, Config, FontBuild, SvgFontError};

/// Turn a directory of per-glyph SVG artwork into a font source
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing one SVG file per glyph
    artwork_dir: PathBuf,

    /// Output path: a .ufo directory or a .json dump of the build
    #[arg(short, long)]
    output: PathBuf,

    /// JSON build configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Space glyphs from their artwork bounds instead of the default advance
    #[arg(long)]
    auto_sidebearings: bool,

    /// Sidebearing margin for --auto-sidebearings, overriding the configuration
    #[arg(long)]
    margin: Option<f64>,

    /// Also write the generated substitution features to this file
    #[arg(long)]
    fea: Option<PathBuf>,

    #[command(flatten)]
    verbosity: clap_verbosity_flag::Verbosity,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), SvgFontError> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if args.auto_sidebearings {
        config.sidebearings.auto = true;
    }
    if let Some(margin) = args.margin {
        config.sidebearings.margin = margin;
    }

    let font = build(&args.artwork_dir, &config)?;
    log::info!(
        "{} glyphs, {} features, {} kerning pairs",
        font.glyphs.len(),
        font.features.features.len(),
        font.kerning.len()
    );
    if font.diagnostics.has_errors() {
        log::warn!("Some artwork could not be used; see the errors above");
    }

    if let Some(fea) = &args.fea {
        std::fs::write(fea, font.features.to_fea())?;
        log::info!("Wrote {}", fea.display());
    }
    write_output(&font, &args.output)
}

fn write_output(font: &FontBuild, output: &Path) -> Result<(), SvgFontError> {
    match output.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            std::fs::write(output, font.to_json()?)?;
            log::info!("Wrote {}", output.display());
            Ok(())
        }
        #[cfg(feature = "ufo")]
        Some("ufo") => svgfont::ufo::save(font, output),
        _ => Err(SvgFontError::UnsupportedOutput {
            path: output.to_path_buf(),
        }),
    }
}
