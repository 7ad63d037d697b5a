use editor::doc::{Dimensions, MapObject};

use super::*;

fn rock(id: &str) -> MapObject {
    MapObject {
        id: id.to_owned(),
        name: "rock".to_owned(),
        image: "/assets/stones/rock.png".to_owned(),
        x: 12.5,
        y: 40.0,
        width: 64.0,
        height: 64.0,
        original_width: Some(128.0),
        original_height: Some(128.0),
        flip_x: true,
        flip_y: false,
        is_locked: false,
        parent_id: None,
    }
}

fn sample_level() -> Level {
    Level { objects: vec![rock("r1"), rock("r2")], dimensions: Dimensions { width: 1024.0, height: 768.0 } }
}

// =============================================================================
// validate_name
// =============================================================================

#[test]
fn validate_name_accepts_plain_names() {
    assert!(validate_name("level 1").is_ok());
    assert!(validate_name("Desert-Maze_2").is_ok());
}

#[test]
fn validate_name_rejects_traversal() {
    for name in ["", "  ", "../x", "a/b", "a\\b", "..", ".hidden", "x..y"] {
        assert!(matches!(validate_name(name), Err(LevelError::InvalidName(_))), "accepted {name:?}");
    }
}

// =============================================================================
// list
// =============================================================================

#[tokio::test]
async fn list_missing_dir_is_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let store = LevelStore::new(tmp.path().join("nope"));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn save_then_list_round_trips() {
    let tmp = tempfile::tempdir().unwrap();
    let store = LevelStore::new(tmp.path());
    let level = sample_level();

    let path = store.save("first", &level).await.unwrap();
    assert_eq!(path, tmp.path().join("first.json"));

    let levels = store.list().await.unwrap();
    assert_eq!(levels.len(), 1);
    assert_eq!(levels["first"], level);
}

#[tokio::test]
async fn save_creates_missing_dir_and_overwrites() {
    let tmp = tempfile::tempdir().unwrap();
    let store = LevelStore::new(tmp.path().join("nested/levels"));

    store.save("one", &sample_level()).await.unwrap();
    store.save("one", &Level::default()).await.unwrap();

    let levels = store.list().await.unwrap();
    assert_eq!(levels["one"], Level::default());
}

#[tokio::test]
async fn save_writes_pretty_json_without_temp_leftovers() {
    let tmp = tempfile::tempdir().unwrap();
    let store = LevelStore::new(tmp.path());
    store.save("pretty", &sample_level()).await.unwrap();

    let raw = std::fs::read_to_string(tmp.path().join("pretty.json")).unwrap();
    assert!(raw.contains("\n  \"objects\""));
    assert!(raw.contains("\"flipX\": true"));

    let names: Vec<String> = std::fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["pretty.json".to_owned()]);
}

#[tokio::test]
async fn save_rejects_bad_name_without_touching_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let store = LevelStore::new(tmp.path().join("levels"));
    let err = store.save("../escape", &Level::default()).await.unwrap_err();
    assert!(matches!(err, LevelError::InvalidName(_)));
    assert!(!tmp.path().join("levels").exists());
}

#[tokio::test]
async fn list_skips_malformed_and_foreign_files() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("broken.json"), "{ not json").unwrap();
    std::fs::write(tmp.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(tmp.path().join("bare.json"), "{}").unwrap();
    let store = LevelStore::new(tmp.path());
    store.save("good", &sample_level()).await.unwrap();

    let levels = store.list().await.unwrap();
    let names: Vec<&str> = levels.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["bare", "good"]);
    assert_eq!(levels["bare"], Level::default());
}
