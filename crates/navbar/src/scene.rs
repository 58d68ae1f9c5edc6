use serde::Serialize;

/// Retained-mode description of the bar's visual layers.
///
/// The controller emits this tree as plain data each time the host wants to
/// redraw; a thin presentation adapter maps it onto whatever rendering
/// surface the environment provides. Nothing here touches the optics — the
/// layers only reference the precomputed filters by id.
#[derive(Clone, Debug, Serialize)]
pub struct SceneTree {
    pub background: BackgroundLayer,
    pub thumb: ThumbLayer,
    pub items: Vec<ItemLayer>,
    pub interaction: InteractionLayer,
    /// While the glass emphasis window is active the items drop behind the
    /// thumb so the displacement filter visibly distorts them.
    pub items_above_thumb: bool,
}

/// Full-bar glass backdrop.
#[derive(Clone, Debug, Serialize)]
pub struct BackgroundLayer {
    pub filter_id: String,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
}

/// The sliding glass thumb. `x` is the current animated offset; the scale
/// pair folds the active emphasis and the wobble together.
#[derive(Clone, Debug, Serialize)]
pub struct ThumbLayer {
    pub filter_id: String,
    pub x: f32,
    /// Vertical center line of the bar; the thumb is centered on it.
    pub y_center: f32,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Alpha of the thumb's own fill; drops while emphasized so the
    /// refraction dominates.
    pub fill_alpha: f32,
    pub emphasized: bool,
}

/// One labelled destination, laid out left to right.
#[derive(Clone, Debug, Serialize)]
pub struct ItemLayer {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub x: f32,
    pub width: f32,
    pub opacity: f32,
    pub scale: f32,
    pub color: String,
    pub icon_size: f32,
    pub font_size: String,
    pub selected: bool,
}

/// Transparent layer that owns pointer capture for the whole bar.
#[derive(Clone, Debug, Serialize)]
pub struct InteractionLayer {
    pub width: f32,
    pub height: f32,
    pub grabbing: bool,
}
