//! Grouping over the flat `parent_id` model.
//!
//! A group is an ordinary `MapObject` whose box is the union hull of its
//! members. Members point at it through `parent_id` and keep their own
//! absolute geometry; the group box is derived, not a coordinate frame.
//! Hierarchy is exactly one level deep: already-grouped objects and groups
//! themselves cannot become members.
//!
//! `group` and `ungroup` are pure: they take the current list and return the
//! next one, leaving history and selection to the caller. `refresh_hulls`
//! re-derives group boxes after members move.

#[cfg(test)]
#[path = "group_test.rs"]
mod group_test;

use crate::consts::GROUP_NAME;
use crate::doc::{MapObject, ObjectId, new_object_id};
use crate::hit::{Rect, union_bounds};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupError {
    #[error("select at least two objects to group")]
    TooFew,
    #[error("object not found: {0}")]
    NotFound(ObjectId),
    #[error("locked objects cannot be grouped: {0}")]
    Locked(ObjectId),
    #[error("object is already in a group: {0}")]
    AlreadyGrouped(ObjectId),
    #[error("groups cannot be nested: {0}")]
    NestedGroup(ObjectId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UngroupError {
    #[error("object not found: {0}")]
    NotFound(ObjectId),
    #[error("object is not a group: {0}")]
    NotAGroup(ObjectId),
}

/// Result of a successful [`group`].
#[derive(Debug, Clone)]
pub struct Grouped {
    /// The next object list, with the group object appended.
    pub objects: Vec<MapObject>,
    /// Id of the new group object.
    pub group_id: ObjectId,
}

/// Result of a successful [`ungroup`].
#[derive(Debug, Clone)]
pub struct Ungrouped {
    /// The next object list, without the group object.
    pub objects: Vec<MapObject>,
    /// Former members, in list order.
    pub children: Vec<ObjectId>,
}

/// Fold `member_ids` into a new group object.
///
/// # Errors
///
/// Rejects fewer than two distinct members, unknown ids, locked members,
/// members that already have a parent, and members that are groups.
pub fn group(objects: &[MapObject], member_ids: &[ObjectId]) -> Result<Grouped, GroupError> {
    let mut members: Vec<&MapObject> = Vec::with_capacity(member_ids.len());
    for id in member_ids {
        if members.iter().any(|m| &m.id == id) {
            continue;
        }
        let obj = objects
            .iter()
            .find(|o| &o.id == id)
            .ok_or_else(|| GroupError::NotFound(id.clone()))?;
        if obj.is_locked {
            return Err(GroupError::Locked(id.clone()));
        }
        if obj.parent_id.is_some() {
            return Err(GroupError::AlreadyGrouped(id.clone()));
        }
        if objects.iter().any(|o| o.parent_id.as_ref() == Some(id)) {
            return Err(GroupError::NestedGroup(id.clone()));
        }
        members.push(obj);
    }
    if members.len() < 2 {
        return Err(GroupError::TooFew);
    }

    let hull = union_bounds(members.iter().copied()).ok_or(GroupError::TooFew)?;
    let group_id = new_object_id();
    let group_obj = MapObject {
        id: group_id.clone(),
        name: GROUP_NAME.to_owned(),
        image: String::new(),
        x: hull.x,
        y: hull.y,
        width: hull.width,
        height: hull.height,
        original_width: None,
        original_height: None,
        flip_x: false,
        flip_y: false,
        is_locked: false,
        parent_id: None,
    };

    let mut next: Vec<MapObject> = objects
        .iter()
        .map(|o| {
            let mut o = o.clone();
            if member_ids.contains(&o.id) {
                o.parent_id = Some(group_id.clone());
            }
            o
        })
        .collect();
    next.push(group_obj);

    Ok(Grouped { objects: next, group_id })
}

/// Dissolve `group_id`, releasing its members.
///
/// # Errors
///
/// Rejects unknown ids and objects that have no members.
pub fn ungroup(objects: &[MapObject], group_id: &str) -> Result<Ungrouped, UngroupError> {
    if !objects.iter().any(|o| o.id == group_id) {
        return Err(UngroupError::NotFound(group_id.to_owned()));
    }
    let children: Vec<ObjectId> = objects
        .iter()
        .filter(|o| o.parent_id.as_deref() == Some(group_id))
        .map(|o| o.id.clone())
        .collect();
    if children.is_empty() {
        return Err(UngroupError::NotAGroup(group_id.to_owned()));
    }

    let next = objects
        .iter()
        .filter(|o| o.id != group_id)
        .map(|o| {
            let mut o = o.clone();
            if o.parent_id.as_deref() == Some(group_id) {
                o.parent_id = None;
            }
            o
        })
        .collect();

    Ok(Ungrouped { objects: next, children })
}

/// Re-derive every group's box from its current members.
///
/// Groups without members keep their box.
pub fn refresh_hulls(objects: &mut [MapObject]) {
    let hulls: Vec<(usize, Rect)> = objects
        .iter()
        .enumerate()
        .filter_map(|(i, g)| {
            let members = objects.iter().filter(|o| o.parent_id.as_deref() == Some(g.id.as_str()));
            union_bounds(members).map(|hull| (i, hull))
        })
        .collect();
    for (i, hull) in hulls {
        if let Some(g) = objects.get_mut(i) {
            g.x = hull.x;
            g.y = hull.y;
            g.width = hull.width;
            g.height = hull.height;
        }
    }
}
