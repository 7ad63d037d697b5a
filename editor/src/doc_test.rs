#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn obj(id: &str, parent: Option<&str>) -> MapObject {
    MapObject {
        id: id.to_owned(),
        name: id.to_owned(),
        image: format!("/assets/{id}.png"),
        x: 10.0,
        y: 20.0,
        width: 30.0,
        height: 40.0,
        original_width: Some(60.0),
        original_height: Some(80.0),
        flip_x: false,
        flip_y: false,
        is_locked: false,
        parent_id: parent.map(str::to_owned),
    }
}

fn ids(objects: &[MapObject]) -> Vec<&str> {
    objects.iter().map(|o| o.id.as_str()).collect()
}

// =============================================================
// Serialization
// =============================================================

#[test]
fn map_object_uses_camel_case_keys() {
    let value = serde_json::to_value(obj("a", Some("g"))).unwrap();
    assert_eq!(value["originalWidth"], json!(60.0));
    assert_eq!(value["flipX"], json!(false));
    assert_eq!(value["isLocked"], json!(false));
    assert_eq!(value["parentId"], json!("g"));
}

#[test]
fn map_object_omits_absent_optionals() {
    let mut o = obj("a", None);
    o.original_width = None;
    o.original_height = None;
    let value = serde_json::to_value(&o).unwrap();
    assert!(value.get("parentId").is_none());
    assert!(value.get("originalWidth").is_none());
}

#[test]
fn map_object_fills_defaults_on_load() {
    let o: MapObject = serde_json::from_value(json!({
        "id": "x", "x": 1, "y": 2, "width": 3, "height": 4
    }))
    .unwrap();
    assert_eq!(o.name, "");
    assert!(!o.flip_x && !o.flip_y && !o.is_locked);
    assert!(o.parent_id.is_none());
    assert!(o.intrinsic_size().is_none());
}

#[test]
fn level_defaults_missing_fields() {
    let level: Level = serde_json::from_value(json!({})).unwrap();
    assert!(level.objects.is_empty());
    assert_eq!(level.dimensions, Dimensions { width: 800.0, height: 600.0 });
}

#[test]
fn save_request_wraps_level_under_data() {
    let request = SaveLevelRequest { name: "one".to_owned(), data: Level::default() };
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["name"], json!("one"));
    assert_eq!(value["data"]["dimensions"]["width"], json!(800.0));
    assert_eq!(value["data"]["objects"], json!([]));
}

#[test]
fn asset_category_is_lowercase() {
    assert_eq!(serde_json::to_value(AssetCategory::Fruits).unwrap(), json!("fruits"));
    let c: AssetCategory = serde_json::from_value(json!("islands")).unwrap();
    assert_eq!(c, AssetCategory::Islands);
}

// =============================================================
// Geometry validation
// =============================================================

#[test]
fn partial_validate_accepts_sane_values() {
    assert!(PartialMapObject::position(-50.0, 0.0).validate().is_ok());
    assert!(PartialMapObject::size(0.5, 1000.0).validate().is_ok());
}

#[test]
fn partial_validate_rejects_bad_sizes() {
    assert_eq!(
        PartialMapObject::size(0.0, 10.0).validate().unwrap_err(),
        GeometryError::InvalidSize { field: "width", value: 0.0 }
    );
    assert!(PartialMapObject::size(10.0, -1.0).validate().is_err());
    assert!(PartialMapObject::size(f64::INFINITY, 10.0).validate().is_err());
}

#[test]
fn partial_validate_rejects_non_finite_position() {
    let err = PartialMapObject::position(0.0, f64::NEG_INFINITY).validate().unwrap_err();
    assert!(matches!(err, GeometryError::InvalidPosition { field: "y", .. }));
}

#[test]
fn partial_is_empty_only_without_fields() {
    assert!(PartialMapObject::default().is_empty());
    assert!(!PartialMapObject { flip_y: Some(false), ..Default::default() }.is_empty());
}

#[test]
fn dimensions_reject_non_positive() {
    assert!(Dimensions::new(0.0, 10.0).is_err());
    assert!(Dimensions::new(10.0, f64::NAN).is_err());
    assert_eq!(Dimensions::new(1.0, 2.0).unwrap(), Dimensions { width: 1.0, height: 2.0 });
}

// =============================================================
// Templates
// =============================================================

#[test]
fn item_templates_use_fixed_size() {
    let t = PlacingObject::from_asset("apple", "/assets/fruits/apple.png", AssetCategory::Fruits, 300.0, 200.0);
    assert_eq!((t.width, t.height), (64.0, 64.0));
    assert_eq!((t.original_width, t.original_height), (300.0, 200.0));
}

#[test]
fn large_templates_scale_to_fit() {
    let t = PlacingObject::from_asset("isle", "/assets/islands/isle.png", AssetCategory::Islands, 512.0, 256.0);
    assert_eq!((t.width, t.height), (128.0, 64.0));
}

#[test]
fn small_large_category_assets_keep_natural_size() {
    let t = PlacingObject::from_asset("flag", "/assets/start/flag.png", AssetCategory::Start, 40.0, 90.0);
    assert_eq!((t.width, t.height), (40.0, 90.0));
}

#[test]
fn instantiate_centres_on_point() {
    let t = PlacingObject::from_asset("rock", "/assets/stones/rock.png", AssetCategory::Stones, 64.0, 64.0);
    let o = t.instantiate(Point::new(100.0, 50.0));
    assert_eq!((o.x, o.y, o.width, o.height), (68.0, 18.0, 64.0, 64.0));
    assert_eq!(o.image, "/assets/stones/rock.png");
    assert_eq!(o.intrinsic_size(), Some((64.0, 64.0)));
    assert!(!o.id.is_empty());
    assert_ne!(o.id, t.instantiate(Point::new(0.0, 0.0)).id);
}

// =============================================================
// DocStore
// =============================================================

#[test]
fn store_lookup_by_id() {
    let mut store = DocStore::new();
    store.load_snapshot(vec![obj("a", None), obj("b", Some("a"))]);
    assert_eq!(store.len(), 2);
    assert_eq!(store.get("b").unwrap().parent_id.as_deref(), Some("a"));
    assert_eq!(store.position("b"), Some(1));
    assert!(store.get("zzz").is_none());
}

#[test]
fn store_reports_children() {
    let mut store = DocStore::new();
    store.load_snapshot(vec![obj("a", Some("g")), obj("b", None), obj("c", Some("g")), obj("g", None)]);
    assert!(store.has_children("g"));
    assert!(!store.has_children("b"));
    assert_eq!(store.children_of("g"), vec!["a".to_owned(), "c".to_owned()]);
}

#[test]
fn apply_partial_touches_only_present_fields() {
    let mut store = DocStore::new();
    store.load_snapshot(vec![obj("a", None)]);
    assert!(store.apply_partial("a", &PartialMapObject { name: Some("rock".to_owned()), ..Default::default() }));
    let a = store.get("a").unwrap();
    assert_eq!(a.name, "rock");
    assert_eq!((a.x, a.y, a.width, a.height), (10.0, 20.0, 30.0, 40.0));
    assert!(!store.apply_partial("missing", &PartialMapObject::position(0.0, 0.0)));
}

// =============================================================
// List transforms
// =============================================================

#[test]
fn without_cascade_drops_members_of_removed_group() {
    let objects = vec![obj("a", Some("g")), obj("b", None), obj("c", Some("g")), obj("g", None)];
    let next = without_cascade(&objects, &["g".to_owned()]);
    assert_eq!(ids(&next), vec!["b"]);
}

#[test]
fn without_cascade_keeps_order_of_survivors() {
    let objects = vec![obj("a", None), obj("b", None), obj("c", None)];
    let next = without_cascade(&objects, &["b".to_owned()]);
    assert_eq!(ids(&next), vec!["a", "c"]);
}

#[test]
fn with_update_leaves_input_untouched() {
    let objects = vec![obj("a", None), obj("b", None)];
    let next = with_update(&objects, "b", &PartialMapObject { is_locked: Some(true), ..Default::default() });
    assert!(next[1].is_locked);
    assert!(!objects[1].is_locked);
    assert!(!next[0].is_locked);
}
