use std::path::PathBuf;

use clap::{Parser, Subcommand};
use glassconfig::{parse_shape, ShapeSetting};

#[derive(Parser, Debug)]
#[command(
    name = "glasskit",
    author,
    version,
    about = "Precompute liquid-glass filter artifacts and replay nav thumb interactions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the filter documents, raster maps, and scene dump for a bar.
    Render(RenderArgs),
    /// Replay a scripted pointer gesture headlessly and log each frame.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Nav bar TOML config; a stock three-item bar is used when omitted.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory the artifacts are written into.
    #[arg(long, value_name = "DIR", default_value = "glass-out")]
    pub out: PathBuf,

    /// Seed random filter-id suffixes instead of the default counter ids.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Also render one standalone filter with stock parameters at this
    /// surface size (e.g. `200x80`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Border shape for the standalone filter: `pill` or `rounded-rect`.
    #[arg(
        long,
        value_name = "SHAPE",
        value_parser = parse_shape,
        default_value = "pill"
    )]
    pub shape: ShapeSetting,
}

#[derive(Parser, Debug)]
pub struct SimulateArgs {
    /// Nav bar TOML config; a stock three-item bar is used when omitted.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Drag gesture as `FROM,TO` bar-relative x coordinates.
    #[arg(long, value_name = "FROM,TO", value_parser = parse_drag)]
    pub drag: Option<(f32, f32)>,

    /// Click at a bar-relative x coordinate (ignored when --drag is set).
    #[arg(long, value_name = "X")]
    pub click: Option<f32>,

    /// Maximum number of 16ms frames to run after the gesture.
    #[arg(long, value_name = "FRAMES", default_value_t = 240)]
    pub max_frames: u32,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let trimmed = value.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size '{trimmed}'; expected WIDTHxHEIGHT"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in '{trimmed}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in '{trimmed}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("size '{trimmed}' must be non-zero"));
    }
    Ok((width, height))
}

pub fn parse_drag(value: &str) -> Result<(f32, f32), String> {
    let trimmed = value.trim();
    let (from, to) = trimmed
        .split_once(',')
        .ok_or_else(|| format!("invalid drag '{trimmed}'; expected FROM,TO"))?;
    let from: f32 = from
        .trim()
        .parse()
        .map_err(|_| format!("invalid drag start in '{trimmed}'"))?;
    let to: f32 = to
        .trim()
        .parse()
        .map_err(|_| format!("invalid drag end in '{trimmed}'"))?;
    Ok((from, to))
}
