//! Example: Convert FNF charts into an osu!mania `.osz`
//!
//! ```sh
//! RUST_LOG=info cargo run --example convert -- \
//!     --title Bopeebo --artist "Kawai Sprite" --creator me \
//!     --audio Inst.ogg \
//!     --chart "Hard:41:bopeebo-hard.json" --chart "Co-op:84:bopeebo-hard.json" \
//!     --out .
//! ```
//!
//! Mode codes are `{keys}{arrangement}`: arrangement 1 is player A alone, 2 player B
//! alone, 3 both players merged, 4 co-op with B on the left and 5 co-op with A on the
//! left.

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use fnf2osu::{
    diagnostics::emit_chart_error, error::ConvertError, mapset::read_chart_source, prelude::*,
};

/// A difficulty given as `NAME:MODE:PATH`.
#[derive(Debug, Clone)]
struct DifficultyArg {
    name: String,
    layout: Layout,
    path: PathBuf,
}

fn parse_difficulty(arg: &str) -> Result<DifficultyArg, String> {
    let mut parts = arg.splitn(3, ':');
    let (Some(name), Some(mode), Some(path)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected NAME:MODE:PATH, got `{arg}`"));
    };
    let layout = mode.parse::<Layout>().map_err(|err| err.to_string())?;
    Ok(DifficultyArg {
        name: name.to_string(),
        layout,
        path: PathBuf::from(path),
    })
}

#[derive(Debug, Parser)]
#[command(about = "Converts FNF charts into an osu!mania beatmap set")]
struct Args {
    /// Song title.
    #[arg(long)]
    title: String,
    /// Song artist.
    #[arg(long)]
    artist: Option<String>,
    /// osu! user name of the mapper.
    #[arg(long)]
    creator: String,
    /// Audio file. Only a single track at full volume can be copied.
    #[arg(long)]
    audio: PathBuf,
    /// Background image.
    #[arg(long)]
    background: Option<PathBuf>,
    /// A difficulty as `NAME:MODE:PATH`, may be repeated.
    #[arg(long = "chart", required = true, value_parser = parse_difficulty)]
    charts: Vec<DifficultyArg>,
    /// A single BPM for the whole song.
    #[arg(long)]
    bpm: Option<f64>,
    /// Audio offset in milliseconds.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset: i64,
    /// Converter settings as JSON.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Destination directory.
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

fn load_config(path: Option<&PathBuf>) -> Result<ConvertConfig, String> {
    let Some(path) = path else {
        return Ok(ConvertConfig::default());
    };
    let json = std::fs::read_to_string(path).map_err(|err| format!("{}: {err}", path.display()))?;
    ConvertConfig::from_json_str(&json).map_err(|err| format!("{}: {err}", path.display()))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match load_config(args.config.as_ref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut mapset = Mapset::new(MapsetMetadata {
        title: args.title,
        artist: args.artist,
        creator: args.creator,
        background: args.background,
        audio: vec![AudioTrack::new(args.audio, 100)],
        bpm_override: args.bpm,
        audio_offset_ms: args.offset,
        ..MapsetMetadata::default()
    });
    for DifficultyArg { name, layout, path } in args.charts {
        println!("{name}: {layout}");
        mapset.insert(name, Chart::new(path, layout));
    }

    let result = Exporter::new(&mapset, &config, CopyTranscoder).export(&args.out, |progress| {
        println!("[{:>3}%] {}", progress.percentage(), progress.message);
    });
    match result {
        Ok(archive) => {
            println!("Written {}", archive.display());
            ExitCode::SUCCESS
        }
        Err(ExportError::Convert(ConvertError::MalformedInput { path, source })) => {
            let text = read_chart_source(&path).unwrap_or_default();
            emit_chart_error(&path.display().to_string(), &text, &source);
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
