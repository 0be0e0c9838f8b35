//! Viewer controller: the composition root wiring pointer input to puppets.
//!
//! `ViewerController` owns the scene, the pointer tracker, the gesture
//! classifier and the selection. Host input enters through the `on_*`
//! methods; each returns the [`Action`]s the host should carry out (cursor
//! changes, selection aid updates, motions started, redraws). Calls that are
//! not pointer events (loading, deleting, selecting) queue their actions;
//! they are returned by the next `on_*` call or by [`ViewerController::drain_actions`].
//!
//! All logic is synchronous apart from awaiting the asset loader.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ViewerConfig;
use crate::consts::FALLBACK_MODEL_SCALE;
use crate::gesture::{GestureClassifier, GestureState, wheel_scale, zoom_about};
use crate::geom::Point;
use crate::hit::{object_at, region_names, resolve_tap};
use crate::loader::{AssetLoader, LoadError};
use crate::motion;
use crate::pointer::{PointerId, PointerTracker};
use crate::scene::{Cursor, ObjectId, PuppetNode, Scene, TriggerGroup};
use crate::selection::SelectionManager;

// =============================================================================
// ACTIONS / ERRORS
// =============================================================================

/// Instruction for the host, produced by the controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SetCursor { id: ObjectId, cursor: Cursor },
    /// Show the selection outline on `id`.
    AidAttached { id: ObjectId, frames_visible: bool },
    AidDetached { id: ObjectId },
    RegionFramesToggled { id: ObjectId, visible: bool },
    SelectionChanged { selected: Option<ObjectId> },
    /// Objects in load order.
    ObjectListChanged { objects: Vec<ObjectId> },
    MotionStarted { id: ObjectId, group: String, index: usize },
    /// Briefly mark the named regions in the host's region list.
    HighlightRegions { id: ObjectId, names: Vec<String>, duration_ms: u64 },
    RenderNeeded,
}

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("no object selected")]
    NoSelection,
    #[error("unknown object: {0}")]
    UnknownObject(ObjectId),
    #[error(transparent)]
    Load(#[from] LoadError),
}

type SelectionObserver = Box<dyn FnMut(Option<ObjectId>) + Send>;
type ObjectListObserver = Box<dyn FnMut(&[ObjectId]) + Send>;

/// Bookkeeping for one press-to-release interaction.
#[derive(Debug, Clone, Copy, Default)]
struct Interaction {
    /// Where the first pointer went down.
    origin: Option<Point>,
    /// Highest simultaneous pointer count seen.
    peak_pointers: usize,
    /// The press of this interaction changed the selection.
    selected_on_press: bool,
}

/// Scale that fits a `width` x `height` model into the viewport.
///
/// Non-positive or non-finite dimensions give [`FALLBACK_MODEL_SCALE`].
#[must_use]
pub fn fit_scale(width: f64, height: f64, viewport_width: f64, viewport_height: f64, padding: f64) -> f64 {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !(valid(width) && valid(height) && valid(viewport_width) && valid(viewport_height)) {
        return FALLBACK_MODEL_SCALE;
    }
    (viewport_width * padding / width).min(viewport_height * padding / height)
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct ViewerController {
    scene: Scene,
    pointers: PointerTracker,
    gesture: GestureClassifier,
    selection: SelectionManager,
    config: ViewerConfig,
    rng: StdRng,
    viewport_width: f64,
    viewport_height: f64,
    interaction: Interaction,
    outbox: Vec<Action>,
    selection_observers: Vec<SelectionObserver>,
    object_list_observers: Vec<ObjectListObserver>,
}

impl Default for ViewerController {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl ViewerController {
    /// Controller seeded from the OS random source.
    #[must_use]
    pub fn new(config: ViewerConfig) -> Self {
        Self::with_rng(config, StdRng::from_rng(&mut rand::rng()))
    }

    /// Controller with a fixed seed, for reproducible trigger choices.
    #[must_use]
    pub fn with_seed(config: ViewerConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: ViewerConfig, rng: StdRng) -> Self {
        Self {
            scene: Scene::new(),
            pointers: PointerTracker::new(),
            gesture: GestureClassifier::new(config.min_zoom, config.max_zoom),
            selection: SelectionManager::new(),
            config,
            rng,
            viewport_width: 0.0,
            viewport_height: 0.0,
            interaction: Interaction::default(),
            outbox: Vec::new(),
            selection_observers: Vec::new(),
            object_list_observers: Vec::new(),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.selection.selected()
    }

    #[must_use]
    pub fn gesture_state(&self) -> GestureState {
        self.gesture.state()
    }

    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.pointers.count()
    }

    #[must_use]
    pub fn viewport(&self) -> (f64, f64) {
        (self.viewport_width, self.viewport_height)
    }

    #[must_use]
    pub fn region_frames_visible(&self) -> bool {
        self.selection.frames_visible()
    }

    #[must_use]
    pub fn region_frames_enabled(&self) -> bool {
        self.selection.frames_enabled()
    }

    #[must_use]
    pub fn cursor(&self, id: ObjectId) -> Option<Cursor> {
        self.scene.get(id).map(|obj| obj.cursor)
    }

    /// Object ids in load order.
    #[must_use]
    pub fn object_ids(&self) -> Vec<ObjectId> {
        let mut ids = self.scene.paint_order().to_vec();
        ids.sort_unstable();
        ids
    }

    /// Display names of the hit regions of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::UnknownObject`] for ids not in the scene.
    pub fn region_names(&self, id: ObjectId) -> Result<Vec<String>, ViewerError> {
        let obj = self.scene.get(id).ok_or(ViewerError::UnknownObject(id))?;
        Ok(region_names(&obj.node.hit_regions()))
    }

    /// Trigger groups of `id`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::UnknownObject`] for ids not in the scene.
    pub fn trigger_groups(&self, id: ObjectId) -> Result<Vec<TriggerGroup>, ViewerError> {
        let obj = self.scene.get(id).ok_or(ViewerError::UnknownObject(id))?;
        let mut groups = obj.node.trigger_groups();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    // --- Observers ---

    pub fn on_selection_changed(&mut self, observer: impl FnMut(Option<ObjectId>) + Send + 'static) {
        self.selection_observers.push(Box::new(observer));
    }

    pub fn on_object_list_changed(&mut self, observer: impl FnMut(&[ObjectId]) + Send + 'static) {
        self.object_list_observers.push(Box::new(observer));
    }

    /// Take the actions queued by non-pointer calls.
    pub fn drain_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.outbox)
    }

    // --- Object lifecycle ---

    /// Load a model through `loader`, then fit, insert and select it.
    ///
    /// On failure the scene is untouched; if nothing was selected the most
    /// recently added object becomes selected.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Load`] when the loader fails.
    pub async fn load_object<L: AssetLoader + ?Sized>(&mut self, loader: &L, source: &str) -> Result<ObjectId, ViewerError> {
        info!(source, "loading model");
        match loader.load(source).await {
            Ok(node) => Ok(self.insert_object(node)),
            Err(e) => {
                warn!(source, error = %e, "model load failed");
                if self.selection.selected().is_none() {
                    if let Some(last) = self.object_ids().last().copied() {
                        self.select(Some(last));
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Fit `node` to the viewport, place it on top and select it.
    pub fn insert_object(&mut self, mut node: Box<dyn PuppetNode>) -> ObjectId {
        self.fit_to_viewport(node.as_mut());
        let id = self.scene.insert(node);
        info!(object = %id, objects = self.scene.len(), "object added");
        self.emit_object_list();
        self.select(Some(id));
        id
    }

    /// Delete the selected object and select the new topmost one.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::NoSelection`] when nothing is selected.
    pub fn delete_selected(&mut self) -> Result<ObjectId, ViewerError> {
        let id = self.selection.selected().ok_or(ViewerError::NoSelection)?;
        self.delete_object(id)?;
        Ok(id)
    }

    /// Delete `id`. An active gesture on it is aborted.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::UnknownObject`] for ids not in the scene.
    pub fn delete_object(&mut self, id: ObjectId) -> Result<(), ViewerError> {
        if self.scene.remove(id).is_none() {
            return Err(ViewerError::UnknownObject(id));
        }
        if self.gesture.forget(id) {
            debug!(object = %id, "gesture target deleted; gesture aborted");
        }
        info!(object = %id, objects = self.scene.len(), "object deleted");
        if self.selection.is_selected(id) {
            let next = self.scene.topmost();
            self.select(next);
        }
        self.emit_object_list();
        Ok(())
    }

    /// Select `id`, or clear the selection with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::UnknownObject`] for ids not in the scene.
    pub fn select_object(&mut self, id: Option<ObjectId>) -> Result<(), ViewerError> {
        if let Some(id) = id {
            if !self.scene.contains(id) {
                return Err(ViewerError::UnknownObject(id));
            }
        }
        self.select(id);
        Ok(())
    }

    /// Programmatic tap on `region` of `id` (a body tap with `None`).
    ///
    /// Selects the object if needed, then fires its motion trigger.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::UnknownObject`] for ids not in the scene.
    pub fn simulate_tap(&mut self, id: ObjectId, region: Option<&str>) -> Result<(), ViewerError> {
        if !self.scene.contains(id) {
            return Err(ViewerError::UnknownObject(id));
        }
        info!(object = %id, region = region.unwrap_or("(body)"), "simulated tap");
        if !self.selection.is_selected(id) {
            self.select(Some(id));
        }
        self.fire(id, region);
        Ok(())
    }

    /// Show or hide region frames on the selection. Ignored without one.
    pub fn set_region_frames_visible(&mut self, visible: bool) {
        let actions = self.selection.set_frames_visible(visible);
        self.emit(actions);
    }

    /// Resize the viewport. A width change re-centres the selection horizontally.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        let width_changed = (width - self.viewport_width).abs() > f64::EPSILON;
        self.viewport_width = width;
        self.viewport_height = height;
        if !width_changed {
            return;
        }
        if let Some(obj) = self.selection.selected().and_then(|id| self.scene.get_mut(id)) {
            let pos = obj.node.position();
            obj.node.set_position(Point::new(width / 2.0, pos.y));
            self.emit(vec![Action::RenderNeeded]);
        }
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, pointer: PointerId, pos: Point) -> Vec<Action> {
        self.pointers.press(pointer, pos);
        let count = self.pointers.count();
        if count == 1 {
            self.gesture.take_tap_suppression();
            self.interaction = Interaction { origin: Some(pos), peak_pointers: 1, selected_on_press: false };
        } else {
            self.interaction.peak_pointers = self.interaction.peak_pointers.max(count);
        }

        match count {
            1 => match object_at(&self.scene, pos) {
                Some(id) => self.start_drag(id, pos),
                None => self.end_gesture(),
            },
            2 => match (self.selection.selected(), self.pointers.pair()) {
                (Some(target), Some((a, b))) => self.start_pinch(target, a, b),
                _ => self.end_gesture(),
            },
            _ => self.end_gesture(),
        }
        self.drain_actions()
    }

    pub fn on_pointer_move(&mut self, pointer: PointerId, pos: Point) -> Vec<Action> {
        if self.pointers.move_to(pointer, pos).is_none() {
            return self.drain_actions();
        }
        let beyond_slop = self.interaction.origin.is_none_or(|origin| origin.distance(pos) > self.config.tap_slop_px);

        match self.gesture.state() {
            GestureState::Dragging { target, .. } => {
                if !beyond_slop && !self.gesture.tap_suppressed() {
                    return self.drain_actions();
                }
                match self.scene.get_mut(target) {
                    Some(obj) => {
                        if self.gesture.drag_to(pos, obj.node.as_mut()) {
                            self.emit(vec![Action::RenderNeeded]);
                        }
                    }
                    None => self.end_gesture(),
                }
            }
            GestureState::Pinching { target, .. } => {
                let (Some((a, b)), Some(obj)) = (self.pointers.pair(), self.scene.get_mut(target)) else {
                    self.end_gesture();
                    return self.drain_actions();
                };
                if let Some(scale) = self.gesture.pinch_to(a, b, obj.node.as_mut()) {
                    debug!(object = %target, scale, "pinch zoom");
                    self.emit(vec![Action::RenderNeeded]);
                }
            }
            GestureState::Idle => {
                if beyond_slop {
                    self.gesture.mark_moved();
                }
            }
        }
        self.drain_actions()
    }

    pub fn on_pointer_up(&mut self, pointer: PointerId, pos: Point) -> Vec<Action> {
        if self.pointers.release(pointer).is_none() {
            return self.drain_actions();
        }
        if self.interaction.origin.is_some_and(|origin| origin.distance(pos) > self.config.tap_slop_px) {
            self.gesture.mark_moved();
        }

        match self.pointers.count() {
            0 => {
                self.end_gesture();
                let suppressed = self.gesture.take_tap_suppression();
                if !suppressed && self.interaction.peak_pointers == 1 {
                    self.handle_tap(pos);
                }
                self.interaction = Interaction::default();
            }
            _ => self.pointer_left(),
        }
        self.drain_actions()
    }

    /// Pointer lost by the host (e.g. touch cancelled).
    ///
    /// Handled like a release that never produces a tap: a pinch that loses
    /// one finger resumes dragging under the other.
    pub fn on_pointer_cancel(&mut self, pointer: PointerId) -> Vec<Action> {
        if self.pointers.release(pointer).is_none() {
            return self.drain_actions();
        }
        self.gesture.mark_moved();
        if self.pointers.is_empty() {
            self.end_gesture();
            self.gesture.take_tap_suppression();
            self.interaction = Interaction::default();
        } else {
            self.pointer_left();
        }
        self.drain_actions()
    }

    /// Zoom the selection about `pos`. Negative `delta_y` zooms in.
    pub fn on_wheel(&mut self, pos: Point, delta_y: f64) -> Vec<Action> {
        let Some(obj) = self.selection.selected().and_then(|id| self.scene.get_mut(id)) else {
            return self.drain_actions();
        };
        let current = obj.node.scale();
        let new_scale = self.gesture.clamp(wheel_scale(current, delta_y, self.config.zoom_sensitivity));
        if (new_scale - current).abs() < f64::EPSILON {
            return self.drain_actions();
        }
        zoom_about(obj.node.as_mut(), pos, new_scale);
        debug!(object = %obj.id, scale = new_scale, "wheel zoom");
        self.emit(vec![Action::RenderNeeded]);
        self.drain_actions()
    }

    // --- Internals ---

    fn start_drag(&mut self, id: ObjectId, pos: Point) {
        if !self.selection.is_selected(id) {
            self.select(Some(id));
            self.interaction.selected_on_press = true;
        }
        let Some(obj) = self.scene.get(id) else {
            return;
        };
        self.gesture.begin_drag(id, pos, obj.node.as_ref());
        self.set_cursor(id, Cursor::Grabbing);
    }

    fn start_pinch(&mut self, target: ObjectId, a: Point, b: Point) {
        self.end_gesture();
        let Some(obj) = self.scene.get(target) else {
            return;
        };
        self.gesture.begin_pinch(target, a, b, obj.node.as_ref());
        self.set_cursor(target, Cursor::Default);
    }

    /// Gesture transition after a pointer leaves while others stay pressed.
    ///
    /// Only a pinch dropping to one pointer turns into a drag.
    fn pointer_left(&mut self) {
        let was_pinching = self.gesture.is_pinching();
        let remaining = self.pointers.count();
        if remaining == 1 {
            self.end_gesture();
            if was_pinching {
                if let Some(pos) = self.pointers.single() {
                    if let Some(id) = object_at(&self.scene, pos) {
                        self.start_drag(id, pos);
                    }
                }
            }
        } else if self.gesture.state().required_pointers() > remaining {
            self.end_gesture();
        }
    }

    /// Return to idle and restore the previous target's cursor.
    fn end_gesture(&mut self) {
        if let Some(target) = self.gesture.end() {
            self.set_cursor(target, Cursor::Grab);
        }
    }

    fn handle_tap(&mut self, pos: Point) {
        let Some(tap) = resolve_tap(&self.scene, pos, &mut self.rng) else {
            debug!(x = pos.x, y = pos.y, "tap on empty space");
            return;
        };
        if !self.selection.is_selected(tap.object) || self.interaction.selected_on_press {
            if !self.selection.is_selected(tap.object) {
                self.select(Some(tap.object));
            }
            info!(object = %tap.object, "tap selected object; no motion");
            return;
        }
        info!(object = %tap.object, region = tap.region.as_deref().unwrap_or("(body)"), struck = ?tap.struck, "tap");
        self.fire(tap.object, tap.region.as_deref());
    }

    fn fire(&mut self, id: ObjectId, region: Option<&str>) {
        let mut actions = Vec::new();
        if let Some(region) = region {
            actions.push(Action::HighlightRegions {
                id,
                names: vec![region.to_string()],
                duration_ms: self.config.highlight_ms,
            });
        }
        if let Some(obj) = self.scene.get_mut(id) {
            if let Some(choice) = motion::fire(obj.node.as_mut(), region, &mut self.rng) {
                actions.push(Action::MotionStarted { id, group: choice.group, index: choice.index });
                actions.push(Action::RenderNeeded);
            }
        }
        self.emit(actions);
    }

    fn select(&mut self, id: Option<ObjectId>) {
        let actions = self.selection.select(&mut self.scene, id);
        self.emit(actions);
    }

    fn set_cursor(&mut self, id: ObjectId, cursor: Cursor) {
        if self.scene.set_cursor(id, cursor) {
            self.emit(vec![Action::SetCursor { id, cursor }]);
        }
    }

    fn emit_object_list(&mut self) {
        let objects = self.object_ids();
        self.emit(vec![Action::ObjectListChanged { objects }, Action::RenderNeeded]);
    }

    /// Queue actions, notifying observers of selection and list changes.
    fn emit(&mut self, actions: Vec<Action>) {
        for action in &actions {
            match action {
                Action::SelectionChanged { selected } => {
                    for observer in &mut self.selection_observers {
                        observer(*selected);
                    }
                }
                Action::ObjectListChanged { objects } => {
                    for observer in &mut self.object_list_observers {
                        observer(objects);
                    }
                }
                _ => {}
            }
        }
        self.outbox.extend(actions);
    }

    fn fit_to_viewport(&self, node: &mut dyn PuppetNode) {
        let (vw, vh) = (self.viewport_width, self.viewport_height);
        let bounds = node.bounds();
        let scale = node.scale();
        let (width, height) = if scale > 0.0 { (bounds.width / scale, bounds.height / scale) } else { (0.0, 0.0) };
        let fitted = self.gesture.clamp(fit_scale(width, height, vw, vh, self.config.fit_padding));
        node.set_scale(fitted);
        node.set_position(Point::new(vw / 2.0, vh / 2.0));
        debug!(width, height, scale = fitted, "fitted model to viewport");
    }
}
