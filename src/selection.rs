//! Single active selection and its visual aid.
//!
//! The selected puppet is always topmost. The aid (outline plus optional
//! region frames) is drawn by the host; this module only tells it when to
//! attach, detach, and toggle frames through [`Action`]s.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use tracing::{debug, info};

use crate::controller::Action;
use crate::scene::{ObjectId, Scene};

#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: Option<ObjectId>,
    /// Region-frame toggle. Always false while nothing is selected.
    frames_visible: bool,
}

impl SelectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    #[must_use]
    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selected == Some(id)
    }

    #[must_use]
    pub fn frames_visible(&self) -> bool {
        self.frames_visible
    }

    /// The region-frame toggle is only usable with a selection.
    #[must_use]
    pub fn frames_enabled(&self) -> bool {
        self.selected.is_some()
    }

    /// Select `id` (or nothing), raising it to the top of `scene`.
    ///
    /// The previous selection's aid is detached before the new one is
    /// attached. Ids not present in `scene` select nothing. Re-selecting the
    /// current selection only raises it; clearing an empty selection does nothing.
    pub fn select(&mut self, scene: &mut Scene, id: Option<ObjectId>) -> Vec<Action> {
        let id = id.filter(|id| scene.contains(*id));
        let mut actions = Vec::new();
        if id.is_none() && self.selected.is_none() {
            return actions;
        }

        if id.is_some() && id == self.selected {
            let raised = id.is_some_and(|id| scene.topmost() != Some(id) && scene.raise_to_top(id));
            if raised {
                actions.push(Action::RenderNeeded);
            }
            return actions;
        }

        if let Some(prev) = self.selected.take() {
            actions.push(Action::AidDetached { id: prev });
        }

        match id {
            Some(id) => {
                scene.raise_to_top(id);
                self.selected = Some(id);
                actions.push(Action::AidAttached { id, frames_visible: self.frames_visible });
                info!(object = %id, "selected");
            }
            None => {
                self.frames_visible = false;
                debug!("selection cleared");
            }
        }

        actions.push(Action::SelectionChanged { selected: self.selected });
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Show or hide the region frames on the selection's aid.
    ///
    /// Ignored, and the toggle kept off, when nothing is selected.
    pub fn set_frames_visible(&mut self, visible: bool) -> Vec<Action> {
        let Some(id) = self.selected else {
            self.frames_visible = false;
            return Vec::new();
        };
        if self.frames_visible == visible {
            return Vec::new();
        }
        self.frames_visible = visible;
        vec![Action::RegionFramesToggled { id, visible }, Action::RenderNeeded]
    }
}
