//! Choosing which trigger group a tap plays.
//!
//! Region names and group names are authored independently, so a region
//! called `Head` may correspond to a group called `TapHead`, `tap_head`, or
//! `Flick_Head`. Resolution runs in three steps:
//!
//! 1. Derive candidate patterns from the region name (the name itself,
//!    prefixed variants, and the name with a known prefix stripped) and keep
//!    the groups whose lower-cased name contains any of them.
//! 2. Prefer a group that equals a pattern; otherwise pick among the
//!    containing groups at random.
//! 3. With no match, or no region at all, try the generic groups in
//!    [`GENERIC_TRIGGER_GROUPS`] order.
//!
//! A puppet with no suitable group is normal; it is logged, never an error.

#[cfg(test)]
#[path = "motion_test.rs"]
mod motion_test;

use rand::Rng;
use tracing::{info, warn};

use crate::consts::{GENERIC_TRIGGER_GROUPS, REGION_PREFIXES};
use crate::scene::{MotionPlayer, TriggerGroup};

/// How a group was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Group name equals a pattern derived from the region.
    Exact,
    /// Group name contains a pattern; chosen at random among such groups.
    Partial,
    /// Generic fallback group.
    Fallback,
}

/// A resolved trigger: group plus clip index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerChoice {
    pub group: String,
    pub index: usize,
    pub kind: MatchKind,
}

/// Lower-cased patterns a group name is matched against for `region`.
#[must_use]
pub fn candidate_patterns(region: &str) -> Vec<String> {
    let name = region.to_lowercase();
    let mut patterns = vec![name.clone()];
    patterns.extend(REGION_PREFIXES.iter().map(|prefix| format!("{prefix}{name}")));
    patterns.push(format!("tap{name}"));

    if REGION_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
        if let Some((_, rest)) = name.split_once('_') {
            patterns.push(rest.to_string());
        }
    } else if let Some(rest) = name.strip_prefix("tap") {
        if !name.contains('_') {
            patterns.push(rest.to_string());
        }
    }

    let mut unique: Vec<String> = Vec::with_capacity(patterns.len());
    for p in patterns {
        if !p.is_empty() && !unique.contains(&p) {
            unique.push(p);
        }
    }
    unique
}

/// Pick the group matching `region`, preferring exact matches.
pub fn choose_primary<'a, R: Rng + ?Sized>(
    groups: &'a [TriggerGroup],
    region: &str,
    rng: &mut R,
) -> Option<(&'a TriggerGroup, MatchKind)> {
    let patterns = candidate_patterns(region);
    let matches: Vec<&TriggerGroup> = groups
        .iter()
        .filter(|g| {
            let lower = g.name.to_lowercase();
            patterns.iter().any(|p| lower.contains(p.as_str()))
        })
        .collect();

    let exact = matches.iter().find(|g| {
        let lower = g.name.to_lowercase();
        patterns.iter().any(|p| *p == lower)
    });
    if let Some(group) = exact {
        return Some((*group, MatchKind::Exact));
    }

    match matches.len() {
        0 => None,
        n => matches.get(rng.random_range(0..n)).map(|g| (*g, MatchKind::Partial)),
    }
}

/// Generic fallback groups present on the puppet, in preference order.
#[must_use]
pub fn fallback_groups(groups: &[TriggerGroup]) -> Vec<&TriggerGroup> {
    GENERIC_TRIGGER_GROUPS
        .iter()
        .filter_map(|generic| groups.iter().find(|g| g.name.eq_ignore_ascii_case(generic)))
        .collect()
}

/// Clip index to start within `group`: random when it holds several clips.
pub fn clip_index<R: Rng + ?Sized>(group: &TriggerGroup, rng: &mut R) -> usize {
    if group.clips > 1 { rng.random_range(0..group.clips) } else { 0 }
}

/// Resolve the trigger for `region` without playing it.
pub fn resolve<R: Rng + ?Sized>(groups: &[TriggerGroup], region: Option<&str>, rng: &mut R) -> Option<TriggerChoice> {
    if let Some(region) = region {
        if let Some((group, kind)) = choose_primary(groups, region, rng) {
            let index = clip_index(group, rng);
            return Some(TriggerChoice { group: group.name.clone(), index, kind });
        }
    }
    let group = fallback_groups(groups).into_iter().next()?;
    let index = clip_index(group, rng);
    Some(TriggerChoice { group: group.name.clone(), index, kind: MatchKind::Fallback })
}

/// Resolve and play the trigger for `region` on `player`.
///
/// The first attempt is whatever [`resolve`] picks. Playback already running
/// is stopped before it starts; if it fails to start, the remaining generic
/// groups are tried in turn. Returns what actually started, or `None` when
/// nothing could play.
pub fn fire<P: MotionPlayer + ?Sized, R: Rng + ?Sized>(
    player: &mut P,
    region: Option<&str>,
    rng: &mut R,
) -> Option<TriggerChoice> {
    let label = region.unwrap_or("(body)");
    let groups = player.trigger_groups();
    if groups.is_empty() {
        info!(region = label, "no trigger groups defined");
        return None;
    }
    let Some(first) = resolve(&groups, region, rng) else {
        info!(region = label, "no suitable trigger group");
        return None;
    };

    player.stop_all();
    let tried = first.group.clone();
    if let Some(started) = try_start(player, first, label) {
        return Some(started);
    }
    for group in fallback_groups(&groups).into_iter().filter(|g| g.name != tried) {
        let choice = TriggerChoice { group: group.name.clone(), index: clip_index(group, rng), kind: MatchKind::Fallback };
        if let Some(started) = try_start(player, choice, label) {
            return Some(started);
        }
    }

    info!(region = label, "every candidate trigger failed to start");
    None
}

fn try_start<P: MotionPlayer + ?Sized>(player: &mut P, choice: TriggerChoice, region: &str) -> Option<TriggerChoice> {
    match player.start(&choice.group, choice.index) {
        Ok(()) => {
            info!(group = %choice.group, index = choice.index, kind = ?choice.kind, region, "trigger started");
            Some(choice)
        }
        Err(e) => {
            warn!(error = %e, group = %choice.group, index = choice.index, "trigger failed to start");
            None
        }
    }
}
