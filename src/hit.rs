//! Hit-testing puppets: which puppet, and which named region, lies under a point.
//!
//! Puppets are tested top of the z-order first and the first puppet that
//! answers wins; nothing underneath it is ever consulted.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use rand::Rng;

use crate::geom::Point;
use crate::scene::{HitRegionDef, ObjectId, Scene};

/// Which part of a puppet was hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitPart {
    /// One or more named regions, in the order the renderer reported them.
    Regions(Vec<String>),
    /// Inside the bounding box but outside every named region.
    Body,
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub object_id: ObjectId,
    pub part: HitPart,
}

/// What a tap landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapCandidate {
    pub object: ObjectId,
    /// Region chosen for the tap; `None` for a body tap.
    pub region: Option<String>,
    /// Every region under the tap point.
    pub struck: Vec<String>,
}

/// Find the topmost puppet under `point`, preferring named regions over the body.
#[must_use]
pub fn hit_test(scene: &Scene, point: Point) -> Option<Hit> {
    scene.top_down().find_map(|id| {
        let obj = scene.get(id)?;
        let regions = obj.node.hit_test_regions(point);
        if !regions.is_empty() {
            return Some(Hit { object_id: id, part: HitPart::Regions(regions) });
        }
        obj.node
            .contains_point(point)
            .then_some(Hit { object_id: id, part: HitPart::Body })
    })
}

/// Topmost puppet under `point`, ignoring which part was hit.
#[must_use]
pub fn object_at(scene: &Scene, point: Point) -> Option<ObjectId> {
    hit_test(scene, point).map(|hit| hit.object_id)
}

/// Resolve a tap at `point`.
///
/// When several regions are struck at once one is picked uniformly at random.
pub fn resolve_tap<R: Rng + ?Sized>(scene: &Scene, point: Point, rng: &mut R) -> Option<TapCandidate> {
    let hit = hit_test(scene, point)?;
    match hit.part {
        HitPart::Body => Some(TapCandidate { object: hit.object_id, region: None, struck: Vec::new() }),
        HitPart::Regions(struck) => {
            let region = match struck.len() {
                0 => None,
                1 => struck.first().cloned(),
                n => struck.get(rng.random_range(0..n)).cloned(),
            };
            Some(TapCandidate { object: hit.object_id, region, struck })
        }
    }
}

/// Display names of region definitions, skipping entries with neither a name nor an id.
#[must_use]
pub fn region_names(defs: &[HitRegionDef]) -> Vec<String> {
    defs.iter()
        .filter_map(|def| {
            let name = def.display_name();
            if name.is_none() {
                tracing::warn!(?def, "hit region has no name or id; skipping");
            }
            name.map(str::to_string)
        })
        .collect()
}
