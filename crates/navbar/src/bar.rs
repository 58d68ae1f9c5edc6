use filtergraph::{assemble, FilterGraph, FilterParams, IdAllocator};
use glassconfig::{FilterSettings, NavConfig, ShapeSetting, SizePreset};
use optics::BorderShape;
use tracing::{debug, warn};

use crate::controller::{ThumbController, TrackMetrics};
use crate::items::NavItem;
use crate::scene::{
    BackgroundLayer, InteractionLayer, ItemLayer, SceneTree, ThumbLayer,
};

/// Accent color applied to the selected item's icon and label.
const ACTIVE_COLOR: &str = "#0082fb";
const INACTIVE_COLOR: &str = "rgba(255,255,255,0.9)";

/// Thumb fill alpha at rest and while the glass emphasis is active.
const THUMB_FILL_REST: f32 = 0.08;
const THUMB_FILL_ACTIVE: f32 = 0.02;

/// A fully assembled glass nav bar: the two filter graphs plus the thumb
/// controller that animates over them. Both graphs are built once here and
/// never recomputed at runtime.
#[derive(Debug)]
pub struct GlassNavBar {
    preset: SizePreset,
    background: FilterGraph,
    thumb_filter: FilterGraph,
    controller: ThumbController,
}

impl GlassNavBar {
    /// Builds a bar from a validated config. Returns `None` (quietly) when
    /// the config declares no items.
    pub fn from_config(config: &NavConfig, ids: &mut dyn IdAllocator) -> Option<Self> {
        let items: Vec<NavItem> = config.items.iter().map(NavItem::from).collect();
        if items.is_empty() {
            debug!("nav config has no items; skipping bar setup");
            return None;
        }

        let preset = config.preset.clone();
        let metrics = TrackMetrics {
            item_width: preset.item_width,
            thumb_width: preset.thumb_width(),
            item_count: items.len(),
        };

        let background_params = config
            .background
            .as_ref()
            .map(filter_params)
            .unwrap_or_else(|| background_recipe(&preset));
        let thumb_params = config
            .thumb
            .as_ref()
            .map(filter_params)
            .unwrap_or_else(|| thumb_recipe(&preset));

        let background = assemble(
            ids.allocate("glass-nav-bg"),
            metrics.slider_width().round() as u32,
            preset.height.round() as u32,
            &background_params,
        );
        let thumb_filter = assemble(
            ids.allocate("glass-nav-thumb"),
            metrics.thumb_width.round() as u32,
            preset.thumb_height.round() as u32,
            &thumb_params,
        );

        let controller = ThumbController::new(
            items,
            config.active.as_deref(),
            metrics,
            config.timing.clone(),
        )?;

        Some(Self {
            preset,
            background,
            thumb_filter,
            controller,
        })
    }

    pub fn controller(&mut self) -> &mut ThumbController {
        &mut self.controller
    }

    pub fn background(&self) -> &FilterGraph {
        &self.background
    }

    pub fn thumb_filter(&self) -> &FilterGraph {
        &self.thumb_filter
    }

    /// Snapshot of the visual layer tree for the current state.
    pub fn scene(&self) -> SceneTree {
        let controller = &self.controller;
        let metrics = controller.metrics();
        let preset = &self.preset;
        let active = controller.glass_visible() || controller.is_pointer_down();

        let base_scale_x = if active { preset.thumb_scale } else { 1.0 };
        let base_scale_y = if active { preset.thumb_scale_y } else { 1.0 };
        let wobble = controller.wobble();

        let items = controller
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let selected = index == controller.selected_index();
                ItemLayer {
                    id: item.id.clone(),
                    label: item.label.clone(),
                    icon: item.icon.clone(),
                    x: index as f32 * metrics.item_width,
                    width: metrics.item_width,
                    opacity: if selected { 1.0 } else { 0.6 },
                    scale: if selected { 1.05 } else { 1.0 },
                    color: if selected { ACTIVE_COLOR } else { INACTIVE_COLOR }.to_string(),
                    icon_size: preset.icon_size,
                    font_size: preset.font_size.clone(),
                    selected,
                }
            })
            .collect();

        SceneTree {
            background: BackgroundLayer {
                filter_id: self.background.id.clone(),
                width: metrics.slider_width(),
                height: preset.height,
                corner_radius: preset.height / 2.0,
            },
            thumb: ThumbLayer {
                filter_id: self.thumb_filter.id.clone(),
                x: controller.current_x(),
                y_center: preset.height / 2.0,
                width: metrics.thumb_width,
                height: preset.thumb_height,
                corner_radius: preset.thumb_height / 2.0,
                scale_x: base_scale_x * wobble.scale_x,
                scale_y: base_scale_y * wobble.scale_y,
                fill_alpha: if active { THUMB_FILL_ACTIVE } else { THUMB_FILL_REST },
                emphasized: active,
            },
            items,
            interaction: InteractionLayer {
                width: metrics.slider_width(),
                height: preset.height,
                grabbing: controller.is_pointer_down(),
            },
            items_above_thumb: !active,
        }
    }
}

/// Parses and mounts every source, isolating per-instance faults: a bar
/// that fails to parse or declares no items is reported and skipped without
/// affecting its siblings.
pub fn mount_all<'a>(
    sources: impl IntoIterator<Item = &'a str>,
    ids: &mut dyn IdAllocator,
) -> Vec<GlassNavBar> {
    sources
        .into_iter()
        .enumerate()
        .filter_map(|(index, source)| {
            let config = match NavConfig::from_toml_str(source) {
                Ok(config) => config,
                Err(err) => {
                    warn!(index, error = %err, "nav bar config rejected; skipping instance");
                    return None;
                }
            };
            GlassNavBar::from_config(&config, ids)
        })
        .collect()
}

/// Stock background filter: thick glass, strong saturation, heavy blur.
fn background_recipe(preset: &SizePreset) -> FilterParams {
    FilterParams {
        glass_thickness: 190.0,
        bezel_width: preset.background_bezel,
        refractive_index: 1.3,
        blur: 2.0,
        scale_ratio: 0.4,
        specular_opacity: 1.0,
        specular_saturation: 19.0,
        ..FilterParams::default()
    }
}

/// Stock thumb filter: thin bezel, no blur, subtle displacement.
fn thumb_recipe(preset: &SizePreset) -> FilterParams {
    FilterParams {
        glass_thickness: preset.thumb_glass_thickness,
        bezel_width: preset.thumb_bezel,
        refractive_index: 1.5,
        blur: 0.0,
        scale_ratio: 0.1,
        specular_opacity: 0.4,
        specular_saturation: 10.0,
        ..FilterParams::default()
    }
}

fn filter_params(settings: &FilterSettings) -> FilterParams {
    FilterParams {
        glass_thickness: settings.glass_thickness,
        bezel_width: settings.bezel_width,
        refractive_index: settings.refractive_index,
        blur: settings.blur,
        scale_ratio: settings.scale_ratio,
        specular_opacity: settings.specular_opacity,
        specular_saturation: settings.specular_saturation,
        shape: match settings.shape {
            ShapeSetting::Pill => BorderShape::Pill,
            ShapeSetting::RoundedRect => BorderShape::RoundedRect {
                corner_radius: settings.corner_radius,
            },
        },
        samples: settings.samples,
        ..FilterParams::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filtergraph::CounterIds;
    use std::time::Instant;

    const BAR: &str = r#"
version = 1
active = "files"

[[items]]
id = "home"
label = "Home"
href = "/"

[[items]]
id = "files"
label = "Files"
href = "/files"

[[items]]
id = "about"
label = "About"
"#;

    fn mounted() -> GlassNavBar {
        let config = NavConfig::from_toml_str(BAR).expect("config");
        let mut ids = CounterIds::new();
        GlassNavBar::from_config(&config, &mut ids).expect("bar")
    }

    #[test]
    fn filters_are_sized_from_the_preset() {
        let bar = mounted();
        // 3 items at medium width 80.
        assert_eq!(bar.background().width, 240);
        assert_eq!(bar.background().height, 54);
        assert_eq!(bar.thumb_filter().width, 76);
        assert_eq!(bar.thumb_filter().height, 50);
        assert_eq!(bar.background().id, "glass-nav-bg-1");
        assert_eq!(bar.thumb_filter().id, "glass-nav-thumb-2");
    }

    #[test]
    fn scene_reflects_selection_and_rest_state() {
        let bar = mounted();
        let scene = bar.scene();
        assert!(scene.items_above_thumb, "items sit on top at rest");
        assert!(!scene.thumb.emphasized);
        assert_eq!(scene.thumb.scale_x, 1.0);
        assert_eq!(scene.thumb.fill_alpha, THUMB_FILL_REST);
        assert_eq!(scene.items.len(), 3);
        assert!(scene.items[1].selected);
        assert_eq!(scene.items[1].opacity, 1.0);
        assert_eq!(scene.items[1].color, ACTIVE_COLOR);
        assert_eq!(scene.items[0].opacity, 0.6);
        assert_eq!(scene.background.filter_id, "glass-nav-bg-1");
        assert_eq!(scene.thumb.filter_id, "glass-nav-thumb-2");
    }

    #[test]
    fn active_gesture_emphasizes_the_thumb_and_drops_items_behind() {
        let mut bar = mounted();
        bar.controller().pointer_down(10.0, Instant::now());
        let scene = bar.scene();
        assert!(scene.thumb.emphasized);
        assert!(!scene.items_above_thumb);
        assert!(scene.interaction.grabbing);
        assert_eq!(scene.thumb.scale_x, 1.3);
        assert_eq!(scene.thumb.scale_y, 1.1);
        assert_eq!(scene.thumb.fill_alpha, THUMB_FILL_ACTIVE);
    }

    #[test]
    fn mount_all_isolates_broken_instances() {
        let good = BAR;
        let broken = "version = 9";
        let empty = "version = 1";
        let mut ids = CounterIds::new();
        let bars = mount_all([good, broken, empty], &mut ids);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].background().id, "glass-nav-bg-1");
    }
}
