//! Filter assembly for glasskit.
//!
//! Takes the raster maps produced by the `optics` crate and wires them into
//! a declarative filter-effect graph under a unique id. The assembler does
//! no optics math itself; it solves the 1D table once (for the scale
//! factor), rasterizes the two maps, and lays down a fixed stage recipe.
//! Stage order matters: saturation applies before the specular composite so
//! the highlight stays neutral-toned, and the specular layer is blended
//! twice (masked, then faded) for a crisp in-shape highlight plus a soft
//! overall glow.

mod ids;
mod svg;

pub use ids::{CounterIds, IdAllocator, SeededIds};
pub use svg::to_svg_document;

use optics::{
    displacement_field, specular_highlight, to_data_uri, BorderShape, DisplacementTable,
    SolverConfig, SurfaceProfile, DEFAULT_SPECULAR_ANGLE,
};
use tracing::debug;

/// Fixed reference magnitude the 2D field encoding is normalized against.
/// The actual displacement strength is applied by the graph's scale factor,
/// not by the map itself.
pub const DISPLACEMENT_REFERENCE: f32 = 100.0;

/// One stage of the effect graph. Inputs and results are named handles
/// local to the graph; `SourceGraphic` refers to the content the filter is
/// applied over.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterStage {
    GaussianBlur {
        input: String,
        std_deviation: f32,
        result: String,
    },
    /// External raster reference, embedded as a data URI. An empty href is
    /// a degraded (but tolerated) artifact.
    Image {
        href: String,
        width: f32,
        height: f32,
        result: String,
    },
    DisplacementMap {
        input: String,
        map: String,
        scale: f32,
        x_channel: char,
        y_channel: char,
        result: String,
    },
    Saturate {
        input: String,
        amount: f32,
        result: String,
    },
    /// Masks `input` to the opaque region of `mask` (composite operator
    /// `in`).
    CompositeIn {
        input: String,
        mask: String,
        result: String,
    },
    /// Linear alpha transfer: `alpha' = alpha * slope`.
    AlphaSlope {
        input: String,
        slope: f32,
        result: String,
    },
    BlendOver {
        input: String,
        backdrop: String,
        result: Option<String>,
    },
}

/// Parameter set consumed by [`assemble`]. Defaults mirror the stock
/// glass look.
#[derive(Clone, Copy, Debug)]
pub struct FilterParams {
    pub glass_thickness: f32,
    pub bezel_width: f32,
    pub refractive_index: f32,
    pub blur: f32,
    pub scale_ratio: f32,
    pub specular_opacity: f32,
    pub specular_saturation: f32,
    pub shape: BorderShape,
    pub samples: usize,
    pub profile: SurfaceProfile,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            glass_thickness: 120.0,
            bezel_width: 30.0,
            refractive_index: 1.5,
            blur: 0.3,
            scale_ratio: 1.0,
            specular_opacity: 0.4,
            specular_saturation: 4.0,
            shape: BorderShape::Pill,
            samples: 128,
            profile: SurfaceProfile::default(),
        }
    }
}

/// An assembled effect graph: an ordered stage list under a unique id,
/// created once per logical surface and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct FilterGraph {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub stages: Vec<FilterStage>,
}

/// Builds the full glass filter graph for a `width` x `height` surface.
pub fn assemble(id: impl Into<String>, width: u32, height: u32, params: &FilterParams) -> FilterGraph {
    let id = id.into();
    let radius = width.min(height) as f32 / 2.0;

    let table = DisplacementTable::solve(&SolverConfig {
        glass_thickness: params.glass_thickness,
        bezel_width: params.bezel_width,
        refractive_index: params.refractive_index,
        samples: params.samples,
        profile: params.profile,
    });
    let max_displacement = table.max_magnitude();

    let field = displacement_field(
        width,
        height,
        params.bezel_width,
        DISPLACEMENT_REFERENCE,
        &table,
        params.shape,
    );
    let highlight = specular_highlight(
        width,
        height,
        radius,
        params.bezel_width,
        DEFAULT_SPECULAR_ANGLE,
    );

    let scale = max_displacement * params.scale_ratio;
    let (w, h) = (width as f32, height as f32);

    let stages = vec![
        FilterStage::GaussianBlur {
            input: "SourceGraphic".into(),
            std_deviation: params.blur,
            result: "blurred".into(),
        },
        FilterStage::Image {
            href: to_data_uri(&field),
            width: w,
            height: h,
            result: "disp_map".into(),
        },
        FilterStage::DisplacementMap {
            input: "blurred".into(),
            map: "disp_map".into(),
            scale,
            x_channel: 'R',
            y_channel: 'G',
            result: "displaced".into(),
        },
        FilterStage::Saturate {
            input: "displaced".into(),
            amount: params.specular_saturation,
            result: "displaced_sat".into(),
        },
        FilterStage::Image {
            href: to_data_uri(&highlight),
            width: w,
            height: h,
            result: "spec_layer".into(),
        },
        FilterStage::CompositeIn {
            input: "displaced_sat".into(),
            mask: "spec_layer".into(),
            result: "spec_sat".into(),
        },
        FilterStage::AlphaSlope {
            input: "spec_layer".into(),
            slope: params.specular_opacity,
            result: "spec_faded".into(),
        },
        FilterStage::BlendOver {
            input: "spec_sat".into(),
            backdrop: "displaced".into(),
            result: Some("with_sat".into()),
        },
        FilterStage::BlendOver {
            input: "spec_faded".into(),
            backdrop: "with_sat".into(),
            result: None,
        },
    ];

    debug!(
        id = %id,
        width,
        height,
        scale,
        "assembled glass filter graph"
    );

    FilterGraph {
        id,
        width,
        height,
        stages,
    }
}
