use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use filtergraph::{
    assemble, to_svg_document, CounterIds, FilterParams, IdAllocator, SeededIds,
};
use glassconfig::{NavConfig, ShapeSetting};
use navbar::{GlassNavBar, ThumbEvent};
use optics::{
    displacement_field, encode_png, specular_highlight, BorderShape, DisplacementTable,
    SolverConfig, DEFAULT_SPECULAR_ANGLE,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, RenderArgs, SimulateArgs};

/// Stock bar used when no config is supplied.
const STOCK_BAR: &str = r#"
version = 1
active = "home"

[[items]]
id = "home"
label = "Home"
href = "/home"

[[items]]
id = "search"
label = "Search"
href = "/search"

[[items]]
id = "profile"
label = "Profile"
href = "/profile"
"#;

pub fn run(args: Cli) -> Result<()> {
    initialise_tracing();
    match args.command {
        Command::Render(args) => render(&args),
        Command::Simulate(args) => simulate(&args),
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<NavConfig> {
    match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read nav config at {}", path.display()))?;
            NavConfig::from_toml_str(&contents)
                .with_context(|| format!("failed to parse nav config at {}", path.display()))
        }
        None => NavConfig::from_toml_str(STOCK_BAR).context("stock nav config"),
    }
}

fn render(args: &RenderArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut ids: Box<dyn IdAllocator> = match args.seed {
        Some(seed) => Box::new(SeededIds::new(seed)),
        None => Box::new(CounterIds::new()),
    };

    fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create output directory {}", args.out.display()))?;

    match GlassNavBar::from_config(&config, ids.as_mut()) {
        Some(bar) => {
            write_text(
                &args.out.join("background.svg"),
                &to_svg_document(bar.background()),
            )?;
            write_text(
                &args.out.join("thumb.svg"),
                &to_svg_document(bar.thumb_filter()),
            )?;
            let scene = serde_json::to_string_pretty(&bar.scene())
                .context("failed to serialize scene tree")?;
            write_text(&args.out.join("scene.json"), &scene)?;
        }
        None => info!("nav config declares no items; skipping bar artifacts"),
    }

    if let Some((width, height)) = args.size {
        render_standalone(args, width, height, ids.as_mut())?;
    }

    Ok(())
}

/// One stock-parameter filter plus its raw raster maps, for inspecting the
/// optics output outside a bar.
fn render_standalone(
    args: &RenderArgs,
    width: u32,
    height: u32,
    ids: &mut dyn IdAllocator,
) -> Result<()> {
    let shape = match args.shape {
        ShapeSetting::Pill => BorderShape::Pill,
        ShapeSetting::RoundedRect => BorderShape::RoundedRect { corner_radius: 0.5 },
    };
    let params = FilterParams {
        shape,
        ..FilterParams::default()
    };

    let graph = assemble(ids.allocate("glass"), width, height, &params);
    write_text(&args.out.join("filter.svg"), &to_svg_document(&graph))?;

    let table = DisplacementTable::solve(&SolverConfig {
        glass_thickness: params.glass_thickness,
        bezel_width: params.bezel_width,
        refractive_index: params.refractive_index,
        samples: params.samples,
        profile: params.profile,
    });
    let field = displacement_field(
        width,
        height,
        params.bezel_width,
        filtergraph::DISPLACEMENT_REFERENCE,
        &table,
        params.shape,
    );
    let highlight = specular_highlight(
        width,
        height,
        width.min(height) as f32 / 2.0,
        params.bezel_width,
        DEFAULT_SPECULAR_ANGLE,
    );

    write_bytes(&args.out.join("displacement.png"), &encode_png(&field)?)?;
    write_bytes(&args.out.join("specular.png"), &encode_png(&highlight)?)?;
    Ok(())
}

fn simulate(args: &SimulateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut ids = CounterIds::new();
    let Some(mut bar) = GlassNavBar::from_config(&config, &mut ids) else {
        bail!("nav config declares no items; nothing to simulate");
    };

    let mut now = Instant::now();
    let frame = Duration::from_millis(16);

    {
        let controller = bar.controller();
        match (args.drag, args.click) {
            (Some((from, to)), _) => {
                info!(from, to, "replaying drag gesture");
                controller.pointer_down(from, now);
                for step in 1..=8 {
                    let x = from + (to - from) * step as f32 / 8.0;
                    controller.pointer_move(x);
                }
                report(controller.pointer_up(to, now));
            }
            (None, Some(x)) => {
                info!(x, "replaying click");
                controller.pointer_down(x, now);
                report(controller.pointer_up(x, now));
            }
            (None, None) => {
                let last = controller.items().len() - 1;
                let x = controller.metrics().item_width * (last as f32 + 0.5);
                info!(x, "replaying click on the last item");
                controller.pointer_down(x, now);
                report(controller.pointer_up(x, now));
            }
        }
    }

    for frame_index in 0..args.max_frames {
        let controller = bar.controller();
        if !controller.is_animating() && !controller.has_pending_deadlines() {
            break;
        }
        now += frame;
        report(controller.tick(now));
        let scene = bar.scene();
        info!(
            frame = frame_index,
            x = scene.thumb.x,
            scale_x = scene.thumb.scale_x,
            scale_y = scene.thumb.scale_y,
            emphasized = scene.thumb.emphasized,
            "frame"
        );
    }

    let controller = bar.controller();
    info!(
        selected = controller.selected_index(),
        x = controller.current_x(),
        "simulation settled"
    );
    Ok(())
}

fn report(events: Vec<ThumbEvent>) {
    for event in events {
        match event {
            ThumbEvent::SelectionChanged { index } => info!(index, "selection changed"),
            ThumbEvent::Navigate { href } => info!(href = %href, "would navigate"),
        }
    }
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(())
}

fn write_bytes(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(())
}
