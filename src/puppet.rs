//! Reference renderer node: a rectangular puppet with rectangular hit regions.
//!
//! `BoxPuppet` stands in for a real mesh renderer. Its silhouette is its
//! bounding box, its regions are local-space rectangles, and "playing" a clip
//! only records which clip is current. It is what the replay CLI drives and
//! what the controller tests are written against.

#[cfg(test)]
#[path = "puppet_test.rs"]
mod puppet_test;

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect, Transform};
use crate::loader::{AssetLoader, LoadError};
use crate::scene::{HitRegionDef, HitTestable, MotionError, MotionPlayer, PuppetNode, Transformable, TriggerGroup};

/// One clip entry of a trigger group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipDef {
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
    #[serde(default, alias = "File")]
    pub file: Option<String>,
}

/// A hit region declaration plus its local-space rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitAreaDef {
    #[serde(flatten)]
    pub region: HitRegionDef,
    #[serde(flatten)]
    pub rect: Rect,
}

/// On-disk description of a box puppet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PuppetDef {
    #[serde(default)]
    pub name: Option<String>,
    pub width: f64,
    pub height: f64,
    #[serde(default, alias = "HitAreas")]
    pub hit_areas: Vec<HitAreaDef>,
    #[serde(default, alias = "Motions")]
    pub motions: BTreeMap<String, Vec<ClipDef>>,
}

impl PuppetDef {
    /// Parse a definition from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error for malformed input.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Rectangular puppet node.
#[derive(Debug, Clone)]
pub struct BoxPuppet {
    def: PuppetDef,
    transform: Transform,
    playing: Option<(String, usize)>,
    history: Vec<(String, usize)>,
    stops: usize,
}

impl BoxPuppet {
    /// A puppet of the given natural size, centred on the origin at scale 1.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self::from_def(PuppetDef { width, height, ..PuppetDef::default() })
    }

    #[must_use]
    pub fn from_def(def: PuppetDef) -> Self {
        let transform = Transform {
            position: Point::default(),
            scale: 1.0,
            anchor: Point::new(def.width / 2.0, def.height / 2.0),
        };
        Self { def, transform, playing: None, history: Vec::new(), stops: 0 }
    }

    /// Add a named region covering `rect` in local space.
    #[must_use]
    pub fn with_region(mut self, name: &str, rect: Rect) -> Self {
        self.def.hit_areas.push(HitAreaDef {
            region: HitRegionDef { name: Some(name.to_string()), id: None },
            rect,
        });
        self
    }

    /// Add a trigger group holding `clips` clips.
    #[must_use]
    pub fn with_group(mut self, name: &str, clips: usize) -> Self {
        self.def.motions.insert(name.to_string(), vec![ClipDef::default(); clips]);
        self
    }

    /// Place the puppet's centre at `position` with the given scale.
    #[must_use]
    pub fn at(mut self, position: Point, scale: f64) -> Self {
        self.transform.position = position;
        self.transform.scale = scale;
        self
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.def.name.as_deref()
    }

    /// The clip most recently started, if no stop happened since.
    #[must_use]
    pub fn playing(&self) -> Option<(&str, usize)> {
        self.playing.as_ref().map(|(g, i)| (g.as_str(), *i))
    }

    /// Every clip started, oldest first.
    #[must_use]
    pub fn history(&self) -> &[(String, usize)] {
        &self.history
    }

    /// How many times playback was stopped.
    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stops
    }

    fn local_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.def.width, self.def.height)
    }
}

impl Transformable for BoxPuppet {
    fn position(&self) -> Point {
        self.transform.position
    }

    fn set_position(&mut self, position: Point) {
        self.transform.position = position;
    }

    fn scale(&self) -> f64 {
        self.transform.scale
    }

    fn set_scale(&mut self, scale: f64) {
        self.transform.scale = scale;
    }

    fn parent_to_local(&self, parent: Point) -> Point {
        self.transform.parent_to_local(parent)
    }

    fn local_to_parent(&self, local: Point) -> Point {
        self.transform.local_to_parent(local)
    }
}

impl HitTestable for BoxPuppet {
    fn hit_test_regions(&self, point: Point) -> Vec<String> {
        let local = self.transform.parent_to_local(point);
        self.def
            .hit_areas
            .iter()
            .filter(|area| area.rect.contains(local))
            .filter_map(|area| area.region.display_name().map(str::to_string))
            .collect()
    }

    fn contains_point(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }

    fn bounds(&self) -> Rect {
        self.transform.rect_to_parent(self.local_bounds())
    }

    fn hit_regions(&self) -> Vec<HitRegionDef> {
        self.def.hit_areas.iter().map(|area| area.region.clone()).collect()
    }
}

impl MotionPlayer for BoxPuppet {
    fn trigger_groups(&self) -> Vec<TriggerGroup> {
        self.def
            .motions
            .iter()
            .map(|(name, clips)| TriggerGroup::new(name.clone(), clips.len()))
            .collect()
    }

    fn stop_all(&mut self) {
        self.playing = None;
        self.stops += 1;
    }

    fn start(&mut self, group: &str, index: usize) -> Result<(), MotionError> {
        let clips = self
            .def
            .motions
            .get(group)
            .ok_or_else(|| MotionError::UnknownGroup(group.to_string()))?;
        if index >= clips.len() {
            return Err(MotionError::IndexOutOfRange { group: group.to_string(), index });
        }
        self.playing = Some((group.to_string(), index));
        self.history.push((group.to_string(), index));
        Ok(())
    }
}

// =============================================================================
// LOADER
// =============================================================================

/// Loads [`PuppetDef`] JSON files from disk, relative to an optional root.
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    root: Option<PathBuf>,
}

impl FileLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative sources against `root`.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: Some(root.into()) }
    }

    fn resolve(&self, source: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(source),
            None => PathBuf::from(source),
        }
    }
}

#[async_trait]
impl AssetLoader for FileLoader {
    async fn load(&self, source: &str) -> Result<Box<dyn PuppetNode>, LoadError> {
        let path = self.resolve(source);
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|error| LoadError::Io { source_name: source.to_string(), error })?;
        let def = PuppetDef::from_json(&text)
            .map_err(|error| LoadError::Parse { source_name: source.to_string(), error })?;
        if !def.width.is_finite() || !def.height.is_finite() {
            return Err(LoadError::Invalid {
                source_name: source.to_string(),
                reason: "width and height must be finite".into(),
            });
        }
        tracing::debug!(%source, areas = def.hit_areas.len(), groups = def.motions.len(), "puppet definition parsed");
        Ok(Box::new(BoxPuppet::from_def(def)))
    }
}
