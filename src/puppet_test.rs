#![allow(clippy::float_cmp)]

use super::*;

fn head_puppet() -> BoxPuppet {
    BoxPuppet::new(100.0, 200.0)
        .with_region("Head", Rect::new(25.0, 0.0, 50.0, 50.0))
        .with_region("Body", Rect::new(0.0, 50.0, 100.0, 150.0))
        .with_group("TapHead", 2)
        .with_group("Idle", 1)
        .at(Point::new(300.0, 300.0), 1.0)
}

// =============================================================
// Geometry
// =============================================================

#[test]
fn bounds_are_centred_on_position() {
    let p = head_puppet();
    assert_eq!(p.bounds(), Rect::new(250.0, 200.0, 100.0, 200.0));
}

#[test]
fn bounds_follow_scale() {
    let p = head_puppet().at(Point::new(300.0, 300.0), 2.0);
    assert_eq!(p.bounds(), Rect::new(200.0, 100.0, 200.0, 400.0));
}

#[test]
fn contains_point_uses_bounds() {
    let p = head_puppet();
    assert!(p.contains_point(Point::new(300.0, 300.0)));
    assert!(!p.contains_point(Point::new(100.0, 100.0)));
}

#[test]
fn hit_test_regions_maps_through_local_space() {
    let p = head_puppet();
    // Local (50, 25) is inside Head; parent = (250 + 50, 200 + 25).
    assert_eq!(p.hit_test_regions(Point::new(300.0, 225.0)), vec!["Head".to_string()]);
    assert_eq!(p.hit_test_regions(Point::new(300.0, 350.0)), vec!["Body".to_string()]);
}

#[test]
fn hit_test_regions_outside_is_empty() {
    let p = head_puppet();
    assert!(p.hit_test_regions(Point::new(255.0, 205.0)).is_empty());
}

#[test]
fn hit_test_regions_skips_unnamed_regions() {
    let mut def = PuppetDef { width: 10.0, height: 10.0, ..PuppetDef::default() };
    def.hit_areas.push(HitAreaDef { region: HitRegionDef::default(), rect: Rect::new(0.0, 0.0, 10.0, 10.0) });
    let p = BoxPuppet::from_def(def);
    assert!(p.hit_test_regions(Point::new(0.0, 0.0)).is_empty());
}

// =============================================================
// Motions
// =============================================================

#[test]
fn trigger_groups_are_sorted_with_clip_counts() {
    let p = head_puppet();
    assert_eq!(p.trigger_groups(), vec![TriggerGroup::new("Idle", 1), TriggerGroup::new("TapHead", 2)]);
}

#[test]
fn start_records_playing_clip() {
    let mut p = head_puppet();
    p.start("TapHead", 1).unwrap();
    assert_eq!(p.playing(), Some(("TapHead", 1)));
    assert_eq!(p.history(), &[("TapHead".to_string(), 1)]);
}

#[test]
fn start_unknown_group_errors() {
    let mut p = head_puppet();
    assert_eq!(p.start("Nope", 0), Err(MotionError::UnknownGroup("Nope".into())));
}

#[test]
fn start_index_out_of_range_errors() {
    let mut p = head_puppet();
    assert!(matches!(p.start("Idle", 1), Err(MotionError::IndexOutOfRange { .. })));
}

#[test]
fn stop_all_clears_playing() {
    let mut p = head_puppet();
    p.start("Idle", 0).unwrap();
    p.stop_all();
    assert!(p.playing().is_none());
    assert_eq!(p.stop_count(), 1);
}

// =============================================================
// Definitions
// =============================================================

#[test]
fn def_parses_capitalised_keys() {
    let def = PuppetDef::from_json(
        r#"{
            "name": "Hiyori",
            "width": 400,
            "height": 800,
            "HitAreas": [
                { "Name": "Head", "Id": "HitArea1", "x": 100, "y": 0, "width": 200, "height": 200 },
                { "Id": "HitAreaBody", "x": 0, "y": 200, "width": 400, "height": 600 }
            ],
            "Motions": {
                "TapBody": [{ "File": "motions/tap_body.motion3.json" }],
                "Idle": [{ "File": "a.motion3.json" }, { "File": "b.motion3.json" }]
            }
        }"#,
    )
    .unwrap();
    assert_eq!(def.name.as_deref(), Some("Hiyori"));
    assert_eq!(def.hit_areas.len(), 2);
    assert_eq!(def.hit_areas[0].region.display_name(), Some("Head"));
    assert_eq!(def.hit_areas[1].region.display_name(), Some("HitAreaBody"));
    assert_eq!(def.hit_areas[1].rect, Rect::new(0.0, 200.0, 400.0, 600.0));
    assert_eq!(def.motions["Idle"].len(), 2);
}

#[test]
fn def_rejects_missing_size() {
    assert!(PuppetDef::from_json(r#"{ "name": "x" }"#).is_err());
}

// =============================================================
// FileLoader
// =============================================================

#[tokio::test]
async fn file_loader_reads_definition() {
    let dir = std::env::temp_dir().join(format!("puppetview-loader-{}", std::process::id()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    tokio::fs::write(dir.join("box.json"), r#"{ "width": 40, "height": 60, "motions": { "Tap": [{}] } }"#)
        .await
        .unwrap();

    let loader = FileLoader::with_root(&dir);
    let node = loader.load("box.json").await.unwrap();
    assert_eq!(node.bounds(), Rect::new(-20.0, -30.0, 40.0, 60.0));
    assert_eq!(node.trigger_groups(), vec![TriggerGroup::new("Tap", 1)]);

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test]
async fn file_loader_missing_file_is_io_error() {
    let loader = FileLoader::new();
    let err = loader.load("/definitely/not/here/model.json").await.unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("/definitely/not/here/model.json"));
}

#[tokio::test]
async fn file_loader_malformed_json_is_parse_error() {
    let dir = std::env::temp_dir().join(format!("puppetview-loader-bad-{}", std::process::id()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    tokio::fs::write(dir.join("bad.json"), "{ not json").await.unwrap();

    let err = FileLoader::with_root(&dir).load("bad.json").await.unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}
