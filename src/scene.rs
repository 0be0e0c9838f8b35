//! Scene model: renderer capability traits and the arena of puppets.
//!
//! The renderer owns meshes, deformation, and silhouette tests. This module
//! only describes the capabilities the controller needs from a renderer node
//! (`Transformable`, `HitTestable`, `MotionPlayer`) and keeps the nodes in an
//! arena addressed by [`ObjectId`]. Paint order lives here too: the last id in
//! `order` is drawn on top and receives input first.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect};

/// Unique identifier for a puppet in one viewer. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pointer cursor shown over a puppet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    /// Idle puppet that can be picked up.
    #[default]
    Grab,
    /// Puppet under an active drag.
    Grabbing,
    /// Puppet under an active pinch.
    Default,
}

impl Cursor {
    /// CSS cursor keyword.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
            Self::Default => "default",
        }
    }
}

/// A named collection of clips a puppet can play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerGroup {
    pub name: String,
    /// Number of clips in the group; a start index is always below this.
    pub clips: usize,
}

impl TriggerGroup {
    #[must_use]
    pub fn new(name: impl Into<String>, clips: usize) -> Self {
        Self { name: name.into(), clips }
    }
}

/// A hit region as declared by the model definition.
///
/// Definitions in the wild spell the keys either way, so both `Name`/`name`
/// and `Id`/`id` are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitRegionDef {
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
    #[serde(default, alias = "Id")]
    pub id: Option<String>,
}

impl HitRegionDef {
    /// Label used for the region: a non-blank name, else a non-empty id.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => Some(name),
            _ => self.id.as_deref().filter(|id| !id.is_empty()),
        }
    }
}

/// Starting a clip failed inside the renderer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MotionError {
    #[error("unknown trigger group: {0}")]
    UnknownGroup(String),
    #[error("clip index {index} out of range for group {group}")]
    IndexOutOfRange { group: String, index: usize },
    #[error("renderer refused to play {group}[{index}]: {reason}")]
    Playback { group: String, index: usize, reason: String },
}

// =============================================================================
// CAPABILITIES
// =============================================================================

/// Position and uniform scale of a node within its parent.
pub trait Transformable {
    fn position(&self) -> Point;
    fn set_position(&mut self, position: Point);
    fn scale(&self) -> f64;
    fn set_scale(&mut self, scale: f64);
    fn parent_to_local(&self, parent: Point) -> Point;
    fn local_to_parent(&self, local: Point) -> Point;
}

/// Geometric queries the renderer answers for a node. Points are in parent space.
pub trait HitTestable {
    /// Names of the hit regions under `point`, empty when none.
    fn hit_test_regions(&self, point: Point) -> Vec<String>;
    /// Bounding-box test.
    fn contains_point(&self, point: Point) -> bool;
    /// Bounding box in parent space.
    fn bounds(&self) -> Rect;
    /// Hit regions as declared by the model definition.
    fn hit_regions(&self) -> Vec<HitRegionDef>;
}

/// Clip playback for a node.
pub trait MotionPlayer {
    fn trigger_groups(&self) -> Vec<TriggerGroup>;
    fn stop_all(&mut self);
    /// Start clip `index` of `group`.
    ///
    /// # Errors
    ///
    /// Returns a [`MotionError`] if the group or index is unknown or the
    /// renderer fails to start playback.
    fn start(&mut self, group: &str, index: usize) -> Result<(), MotionError>;
}

/// Everything the controller needs from a renderer node.
pub trait PuppetNode: Transformable + HitTestable + MotionPlayer + fmt::Debug + Send {}

impl<T: Transformable + HitTestable + MotionPlayer + fmt::Debug + Send> PuppetNode for T {}

// =============================================================================
// ARENA
// =============================================================================

/// A puppet placed in the scene.
#[derive(Debug)]
pub struct SceneObject {
    pub id: ObjectId,
    pub node: Box<dyn PuppetNode>,
    pub cursor: Cursor,
}

/// Arena of puppets plus their paint order.
#[derive(Debug, Default)]
pub struct Scene {
    objects: HashMap<ObjectId, SceneObject>,
    /// Bottom-to-top paint order.
    order: Vec<ObjectId>,
    next_id: u64,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a node on top of the scene and return its new id.
    pub fn insert(&mut self, node: Box<dyn PuppetNode>) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, SceneObject { id, node, cursor: Cursor::Grab });
        self.order.push(id);
        id
    }

    /// Take an object out of the scene.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let obj = self.objects.remove(&id)?;
        self.order.retain(|o| *o != id);
        Some(obj)
    }

    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Move `id` to the top of the paint order. Returns false for unknown ids.
    pub fn raise_to_top(&mut self, id: ObjectId) -> bool {
        let Some(idx) = self.order.iter().position(|o| *o == id) else {
            return false;
        };
        let id = self.order.remove(idx);
        self.order.push(id);
        true
    }

    /// Ids bottom to top, i.e. in paint order.
    #[must_use]
    pub fn paint_order(&self) -> &[ObjectId] {
        &self.order
    }

    /// Ids top to bottom, i.e. in input-priority order.
    pub fn top_down(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.order.iter().rev().copied()
    }

    /// Position of `id` in the paint order; higher is closer to the viewer.
    #[must_use]
    pub fn z_rank(&self, id: ObjectId) -> Option<usize> {
        self.order.iter().position(|o| *o == id)
    }

    #[must_use]
    pub fn topmost(&self) -> Option<ObjectId> {
        self.order.last().copied()
    }

    /// Set the cursor of `id`, returning true if it changed.
    pub fn set_cursor(&mut self, id: ObjectId, cursor: Cursor) -> bool {
        match self.objects.get_mut(&id) {
            Some(obj) if obj.cursor != cursor => {
                obj.cursor = cursor;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
