//! Optics crate for glasskit.
//!
//! Precomputes the raster artifacts behind the liquid-glass effect. The
//! overall flow is:
//!
//! ```text
//!   SurfaceProfile ──▶ DisplacementTable::solve ──▶ displacement_field() ──▶ RasterImage ──▶ data URI
//!                                                                               ▲
//!                                        specular_highlight() ──────────────────┘
//! ```
//!
//! The 1D solver is the only place the refraction law is evaluated; the 2D
//! rasterizer expands that table across an arbitrary pill or rounded-rect
//! outline by table lookup, and the specular rasterizer paints an
//! independent rim highlight. Everything here is synchronous, CPU-bound,
//! and runs once when a filter is constructed.

mod encode;
mod raster;
mod refraction;
mod specular;
mod surface;

pub use encode::{encode_png, to_data_uri, RasterError};
pub use raster::{displacement_field, BorderShape, RasterImage};
pub use refraction::{
    DisplacementTable, SolverConfig, DEFAULT_BEZEL_WIDTH, DEFAULT_GLASS_THICKNESS,
    DEFAULT_REFRACTIVE_INDEX, DEFAULT_SAMPLE_COUNT,
};
pub use specular::{specular_highlight, DEFAULT_SPECULAR_ANGLE};
pub use surface::{convex_squircle, SurfaceProfile};
