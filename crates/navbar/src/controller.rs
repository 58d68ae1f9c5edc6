use std::time::Instant;

use glassconfig::Timing;
use tracing::debug;

use crate::items::NavItem;
use crate::motion::{
    Wobble, APPROACH_RATE, DRAG_GAIN, DRAG_LIMIT, SETTLE_GAIN, SETTLE_LIMIT,
};

/// Pointer travel (from the down position) beyond which the gesture is a
/// drag rather than a click.
const DRAG_THRESHOLD: f32 = 5.0;

/// Remaining distance below which the settle loop snaps to target.
const SETTLE_DISTANCE: f32 = 0.1;

/// Fraction of track overshoot that survives edge damping while dragging.
const EDGE_GIVE: f32 = 3.0;

/// Events surfaced to the host. Pointer handlers report selection changes
/// immediately; deadline-driven events (navigation) fire from [`ThumbController::tick`].
#[derive(Clone, Debug, PartialEq)]
pub enum ThumbEvent {
    SelectionChanged { index: usize },
    Navigate { href: String },
}

/// Horizontal track geometry derived from the item layout.
#[derive(Clone, Copy, Debug)]
pub struct TrackMetrics {
    pub item_width: f32,
    pub thumb_width: f32,
    pub item_count: usize,
}

impl TrackMetrics {
    pub fn slider_width(&self) -> f32 {
        self.item_width * self.item_count as f32
    }

    /// Rest position for the thumb when `index` is selected: the thumb sits
    /// centered inside the item's slot.
    pub fn target_x(&self, index: usize) -> f32 {
        index as f32 * self.item_width + self.center_offset()
    }

    fn center_offset(&self) -> f32 {
        (self.item_width - self.thumb_width) / 2.0
    }

    /// Leftmost/rightmost undamped thumb positions.
    pub fn min_x(&self) -> f32 {
        self.center_offset()
    }

    pub fn max_x(&self) -> f32 {
        self.slider_width() - self.thumb_width - self.center_offset()
    }

    /// Nearest item for a released thumb position.
    pub fn snap_index(&self, thumb_x: f32) -> usize {
        let center = thumb_x + self.thumb_width / 2.0;
        let index = (center / self.item_width).round() as isize;
        index.clamp(0, self.item_count as isize - 1) as usize
    }

    /// Item under a pointer position on the bar.
    pub fn index_at(&self, x: f32) -> usize {
        let index = (x / self.item_width).floor() as isize;
        index.clamp(0, self.item_count as isize - 1) as usize
    }
}

/// State machine driving the sliding thumb.
///
/// Three effective modes: settling (first-order approach toward the
/// selected slot), dragging (1:1 pointer follow with edge damping), and
/// released-snapping (settling toward the nearest slot after a drag). All
/// state is owned here and mutated only from pointer handlers and `tick`;
/// the host calls `tick` from its frame clock while [`Self::is_animating`]
/// holds, which replaces an opaque scheduled-callback handle.
#[derive(Debug)]
pub struct ThumbController {
    items: Vec<NavItem>,
    metrics: TrackMetrics,
    timing: Timing,
    selected: usize,
    current_x: f32,
    wobble: Wobble,
    pointer_down: bool,
    has_dragged: bool,
    initial_pointer_x: f32,
    initial_thumb_x: f32,
    animating: bool,
    glass_visible: bool,
    glass_hide_at: Option<Instant>,
    navigate_at: Option<(String, Instant)>,
}

impl ThumbController {
    /// Builds the controller, resolving the active id to an index (falling
    /// back to the first item). An empty item set is a silent no-op.
    pub fn new(
        items: Vec<NavItem>,
        active: Option<&str>,
        metrics: TrackMetrics,
        timing: Timing,
    ) -> Option<Self> {
        if items.is_empty() {
            debug!("no nav items found; skipping thumb controller setup");
            return None;
        }
        let selected = active
            .and_then(|id| items.iter().position(|item| item.id == id))
            .unwrap_or(0);
        let current_x = metrics.target_x(selected);
        Some(Self {
            items,
            metrics,
            timing,
            selected,
            current_x,
            wobble: Wobble::rest(),
            pointer_down: false,
            has_dragged: false,
            initial_pointer_x: 0.0,
            initial_thumb_x: 0.0,
            animating: false,
            glass_visible: false,
            glass_hide_at: None,
            navigate_at: None,
        })
    }

    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    pub fn metrics(&self) -> &TrackMetrics {
        &self.metrics
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn current_x(&self) -> f32 {
        self.current_x
    }

    pub fn wobble(&self) -> Wobble {
        self.wobble
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn is_pointer_down(&self) -> bool {
        self.pointer_down
    }

    pub fn glass_visible(&self) -> bool {
        self.glass_visible
    }

    /// Pointer capture begins. Cancels any in-flight settle and pins the
    /// glass emphasis on for the duration of the gesture.
    pub fn pointer_down(&mut self, x: f32, _now: Instant) {
        self.pointer_down = true;
        self.has_dragged = false;
        self.initial_pointer_x = x;
        self.initial_thumb_x = self.current_x;
        self.glass_hide_at = None;
        self.glass_visible = true;
        self.animating = false;
    }

    /// Pointer travel while captured. The thumb follows 1:1 inside the
    /// track; beyond the track bounds only a third of the excess survives.
    pub fn pointer_move(&mut self, x: f32) {
        if !self.pointer_down {
            return;
        }
        let delta = x - self.initial_pointer_x;
        if delta.abs() > DRAG_THRESHOLD {
            self.has_dragged = true;
        }

        let mut position = self.initial_thumb_x + delta;
        let min = self.metrics.min_x();
        let max = self.metrics.max_x();
        if position < min {
            position = min - (min - position) / EDGE_GIVE;
        }
        if position > max {
            position = max + (position - max) / EDGE_GIVE;
        }

        let velocity = position - self.current_x;
        self.wobble.chase(velocity.abs(), DRAG_GAIN, DRAG_LIMIT);
        self.current_x = position;
    }

    /// Pointer capture ends. A gesture that never crossed the drag
    /// threshold is a click on the item under the release position; a drag
    /// snaps to the nearest item. Either way the glass window is scheduled
    /// to hide and the settle loop restarts.
    pub fn pointer_up(&mut self, x: f32, now: Instant) -> Vec<ThumbEvent> {
        if !self.pointer_down {
            return Vec::new();
        }
        self.pointer_down = false;
        let mut events = Vec::new();

        let index = if self.has_dragged {
            self.metrics.snap_index(self.current_x)
        } else {
            self.metrics.index_at(x)
        };

        if index != self.selected {
            self.selected = index;
            events.push(ThumbEvent::SelectionChanged { index });
            let item = &self.items[index];
            if item.navigates() {
                self.navigate_at = Some((item.href.clone(), now + self.timing.navigate_delay));
            }
        }

        self.glass_hide_at = Some(now + self.timing.glass_hide);
        self.animating = true;
        events
    }

    /// Abort path for lost pointer capture; releases the gesture on the
    /// same terms as a normal up without classifying it.
    pub fn cancel_interaction(&mut self, now: Instant) {
        if !self.pointer_down {
            return;
        }
        self.pointer_down = false;
        self.has_dragged = false;
        self.glass_hide_at = Some(now + self.timing.glass_hide);
        self.animating = true;
    }

    /// Programmatic selection, equivalent to clicking `index`.
    pub fn select_index(&mut self, index: usize, now: Instant) -> Vec<ThumbEvent> {
        if index >= self.items.len() || index == self.selected {
            return Vec::new();
        }
        self.selected = index;
        self.glass_visible = true;
        self.glass_hide_at = Some(now + self.timing.glass_hide);
        self.animating = true;
        let item = &self.items[index];
        if item.navigates() {
            self.navigate_at = Some((item.href.clone(), now + self.timing.navigate_delay));
        }
        vec![ThumbEvent::SelectionChanged { index }]
    }

    /// One frame of work. Fires due deadlines, then advances the motion
    /// model. Returns the events that fired; the host may stop ticking once
    /// [`Self::is_animating`] goes false and no deadlines are pending.
    pub fn tick(&mut self, now: Instant) -> Vec<ThumbEvent> {
        let mut events = Vec::new();

        if let Some(at) = self.glass_hide_at {
            if now >= at {
                self.glass_hide_at = None;
                self.glass_visible = false;
            }
        }
        if let Some((href, at)) = self.navigate_at.take() {
            if now >= at {
                events.push(ThumbEvent::Navigate { href });
            } else {
                self.navigate_at = Some((href, at));
            }
        }

        if !self.animating {
            return events;
        }
        if self.pointer_down {
            self.wobble.relax();
            return events;
        }

        let target = self.metrics.target_x(self.selected);
        let diff = target - self.current_x;
        let velocity = diff * APPROACH_RATE;
        self.current_x += velocity;
        self.wobble.chase(velocity.abs(), SETTLE_GAIN, SETTLE_LIMIT);

        if diff.abs() < SETTLE_DISTANCE && self.wobble.near_rest() {
            self.current_x = target;
            self.wobble = Wobble::rest();
            self.animating = false;
        }

        events
    }

    /// True while a deadline is pending, so hosts can keep the clock alive
    /// past settle completion.
    pub fn has_pending_deadlines(&self) -> bool {
        self.glass_hide_at.is_some() || self.navigate_at.is_some()
    }
}
