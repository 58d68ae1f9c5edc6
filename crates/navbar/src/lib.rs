//! Interactive glass nav bar.
//!
//! Owns the selection state and the per-frame motion of the sliding glass
//! thumb, and assembles the two filter graphs (background bar + thumb) the
//! visual layers reference. The runtime loop never recomputes optics; it
//! only re-targets the thumb's position and scale over the precomputed
//! filters.
//!
//! ```text
//!   NavConfig ──▶ GlassNavBar::from_config ──▶ { FilterGraph x2, ThumbController }
//!                                                        │
//!   host frame clock ──▶ controller.tick(now) ───────────┤
//!   pointer events ────▶ controller.pointer_*() ─────────┤
//!                                                        ▼
//!                                              GlassNavBar::scene() (layer tree)
//! ```

mod bar;
mod controller;
mod items;
mod motion;
mod scene;

pub use bar::{mount_all, GlassNavBar};
pub use controller::{ThumbController, ThumbEvent, TrackMetrics};
pub use items::NavItem;
pub use motion::Wobble;
pub use scene::{
    BackgroundLayer, InteractionLayer, ItemLayer, SceneTree, ThumbLayer,
};
