#![allow(clippy::float_cmp)]

use super::*;

fn obj(id: &str, x: f64, y: f64, w: f64, h: f64) -> MapObject {
    MapObject {
        id: id.to_owned(),
        name: id.to_owned(),
        image: format!("/assets/{id}.png"),
        x,
        y,
        width: w,
        height: h,
        original_width: Some(w),
        original_height: Some(h),
        flip_x: false,
        flip_y: false,
        is_locked: false,
        parent_id: None,
    }
}

fn ids(list: &[&str]) -> Vec<ObjectId> {
    list.iter().map(|s| (*s).to_owned()).collect()
}

fn pair() -> Vec<MapObject> {
    vec![obj("a", 0.0, 0.0, 10.0, 10.0), obj("b", 20.0, 20.0, 10.0, 10.0)]
}

// =============================================================
// group
// =============================================================

#[test]
fn group_builds_union_hull() {
    let grouped = group(&pair(), &ids(&["a", "b"])).unwrap();
    let g = grouped.objects.iter().find(|o| o.id == grouped.group_id).unwrap();
    assert_eq!((g.x, g.y, g.width, g.height), (0.0, 0.0, 30.0, 30.0));
    assert_eq!(g.name, GROUP_NAME);
    assert!(g.image.is_empty());
    assert!(g.parent_id.is_none());
}

#[test]
fn group_appends_group_after_members() {
    let grouped = group(&pair(), &ids(&["a", "b"])).unwrap();
    assert_eq!(grouped.objects.len(), 3);
    assert_eq!(grouped.objects[2].id, grouped.group_id);
}

#[test]
fn group_links_members_and_keeps_their_geometry() {
    let before = pair();
    let grouped = group(&before, &ids(&["a", "b"])).unwrap();
    for (old, new) in before.iter().zip(&grouped.objects) {
        assert_eq!(new.parent_id.as_deref(), Some(grouped.group_id.as_str()));
        assert_eq!((new.x, new.y, new.width, new.height), (old.x, old.y, old.width, old.height));
    }
}

#[test]
fn group_leaves_non_members_alone() {
    let mut objects = pair();
    objects.push(obj("c", 100.0, 100.0, 5.0, 5.0));
    let grouped = group(&objects, &ids(&["a", "b"])).unwrap();
    let c = grouped.objects.iter().find(|o| o.id == "c").unwrap();
    assert!(c.parent_id.is_none());
}

#[test]
fn group_rejects_single_member() {
    assert_eq!(group(&pair(), &ids(&["a"])).unwrap_err(), GroupError::TooFew);
}

#[test]
fn group_counts_duplicate_ids_once() {
    assert_eq!(group(&pair(), &ids(&["a", "a"])).unwrap_err(), GroupError::TooFew);
}

#[test]
fn group_rejects_unknown_member() {
    assert_eq!(
        group(&pair(), &ids(&["a", "zzz"])).unwrap_err(),
        GroupError::NotFound("zzz".to_owned())
    );
}

#[test]
fn group_rejects_locked_member() {
    let mut objects = pair();
    objects[1].is_locked = true;
    assert_eq!(group(&objects, &ids(&["a", "b"])).unwrap_err(), GroupError::Locked("b".to_owned()));
}

#[test]
fn group_rejects_already_grouped_member() {
    let mut objects = group(&pair(), &ids(&["a", "b"])).unwrap().objects;
    objects.push(obj("c", 50.0, 50.0, 10.0, 10.0));
    assert_eq!(
        group(&objects, &ids(&["a", "c"])).unwrap_err(),
        GroupError::AlreadyGrouped("a".to_owned())
    );
}

#[test]
fn group_rejects_nesting_a_group() {
    let grouped = group(&pair(), &ids(&["a", "b"])).unwrap();
    let mut objects = grouped.objects;
    objects.push(obj("c", 50.0, 50.0, 10.0, 10.0));
    let err = group(&objects, &[grouped.group_id.clone(), "c".to_owned()]).unwrap_err();
    assert_eq!(err, GroupError::NestedGroup(grouped.group_id));
}

// =============================================================
// ungroup
// =============================================================

#[test]
fn ungroup_restores_members_and_removes_group() {
    let before = pair();
    let grouped = group(&before, &ids(&["a", "b"])).unwrap();
    let ungrouped = ungroup(&grouped.objects, &grouped.group_id).unwrap();

    assert_eq!(ungrouped.objects, before);
    assert_eq!(ungrouped.children, ids(&["a", "b"]));
    assert!(!ungrouped.objects.iter().any(|o| o.id == grouped.group_id));
}

#[test]
fn ungroup_rejects_unknown_id() {
    assert_eq!(ungroup(&pair(), "nope").unwrap_err(), UngroupError::NotFound("nope".to_owned()));
}

#[test]
fn ungroup_rejects_plain_object() {
    assert_eq!(ungroup(&pair(), "a").unwrap_err(), UngroupError::NotAGroup("a".to_owned()));
}

// =============================================================
// refresh_hulls
// =============================================================

#[test]
fn refresh_hulls_follows_moved_member() {
    let grouped = group(&pair(), &ids(&["a", "b"])).unwrap();
    let mut objects = grouped.objects;
    objects[1].x = 40.0;
    refresh_hulls(&mut objects);
    let g = objects.iter().find(|o| o.id == grouped.group_id).unwrap();
    assert_eq!((g.x, g.y, g.width, g.height), (0.0, 0.0, 50.0, 30.0));
}

#[test]
fn refresh_hulls_ignores_plain_objects() {
    let mut objects = pair();
    let before = objects.clone();
    refresh_hulls(&mut objects);
    assert_eq!(objects, before);
}
