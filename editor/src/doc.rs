//! Document model: map objects, levels, and the in-memory object store.
//!
//! This module defines what a level is made of (`MapObject`, `Level`), the
//! sparse-update type used by property edits (`PartialMapObject`), the armed
//! palette template (`PlacingObject`), and the ordered store that owns the
//! live object list (`DocStore`).
//!
//! The JSON shape matches the level files written by the server: camelCase
//! keys, optional intrinsic sizes, and a flat `parentId` back-reference for
//! grouped objects. List order is significant: it is both draw order and the
//! order used by shift-click range selection.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{DEFAULT_LEVEL_HEIGHT, DEFAULT_LEVEL_WIDTH, ITEM_DEFAULT_SIZE, LARGE_ASSET_MAX_DIM};
use crate::hit::Rect;

/// Unique identifier for a map object. Opaque; fresh ids are UUID v4 strings.
pub type ObjectId = String;

/// All levels known to the editor, keyed by level name.
pub type Levels = BTreeMap<String, Level>;

/// Generate a fresh object id.
#[must_use]
pub fn new_object_id() -> ObjectId {
    Uuid::new_v4().to_string()
}

/// Rejected geometry input. Raised before anything reaches the object list.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("{field} must be a positive number, got {value}")]
    InvalidSize { field: &'static str, value: f64 },
    #[error("{field} must be a finite number, got {value}")]
    InvalidPosition { field: &'static str, value: f64 },
}

fn check_size(field: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::InvalidSize { field, value })
    }
}

fn check_position(field: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::InvalidPosition { field, value })
    }
}

/// A placed entity on the level canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapObject {
    /// Unique identifier, stable for the object's lifetime.
    pub id: ObjectId,
    /// Display label.
    #[serde(default)]
    pub name: String,
    /// Asset reference. Empty for group objects.
    #[serde(default)]
    pub image: String,
    /// Left edge in level coordinates.
    pub x: f64,
    /// Top edge in level coordinates.
    pub y: f64,
    /// Current render width.
    pub width: f64,
    /// Current render height.
    pub height: f64,
    /// Intrinsic asset width, used for aspect-ratio and percentage sizing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_width: Option<f64>,
    /// Intrinsic asset height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_height: Option<f64>,
    /// Mirror horizontally inside the same bounding box.
    #[serde(default)]
    pub flip_x: bool,
    /// Mirror vertically inside the same bounding box.
    #[serde(default)]
    pub flip_y: bool,
    /// Locked objects cannot be selected by clicking or dragged.
    #[serde(default)]
    pub is_locked: bool,
    /// Enclosing group, if any. Always points at an object without a parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ObjectId>,
}

impl MapObject {
    /// Axis-aligned bounding box. Flips mirror inside the box and do not move it.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Intrinsic `(width, height)` when both are known and positive.
    #[must_use]
    pub fn intrinsic_size(&self) -> Option<(f64, f64)> {
        match (self.original_width, self.original_height) {
            (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some((w, h)),
            _ => None,
        }
    }
}

/// Sparse update for a map object. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialMapObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip_x: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip_y: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
}

impl PartialMapObject {
    /// Update that only moves an object.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }

    /// Update that only resizes an object.
    #[must_use]
    pub fn size(width: f64, height: f64) -> Self {
        Self { width: Some(width), height: Some(height), ..Default::default() }
    }

    /// Reject non-finite positions and non-positive or non-finite sizes.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if let Some(x) = self.x {
            check_position("x", x)?;
        }
        if let Some(y) = self.y {
            check_position("y", y)?;
        }
        if let Some(w) = self.width {
            check_size("width", w)?;
        }
        if let Some(h) = self.height {
            check_size("height", h)?;
        }
        Ok(())
    }

    /// Whether the update carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply_to(&self, obj: &mut MapObject) {
        if let Some(x) = self.x {
            obj.x = x;
        }
        if let Some(y) = self.y {
            obj.y = y;
        }
        if let Some(w) = self.width {
            obj.width = w;
        }
        if let Some(h) = self.height {
            obj.height = h;
        }
        if let Some(ref name) = self.name {
            obj.name.clone_from(name);
        }
        if let Some(ref image) = self.image {
            obj.image.clone_from(image);
        }
        if let Some(flip_x) = self.flip_x {
            obj.flip_x = flip_x;
        }
        if let Some(flip_y) = self.flip_y {
            obj.flip_y = flip_y;
        }
        if let Some(locked) = self.is_locked {
            obj.is_locked = locked;
        }
    }
}

/// Canvas size of a level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    /// Validated canvas size.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidSize`] for NaN, infinite, zero or negative sides.
    pub fn new(width: f64, height: f64) -> Result<Self, GeometryError> {
        Ok(Self { width: check_size("width", width)?, height: check_size("height", height)? })
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self { width: DEFAULT_LEVEL_WIDTH, height: DEFAULT_LEVEL_HEIGHT }
    }
}

/// A persisted level: the flat object list plus the canvas size.
///
/// Missing fields fall back to an empty list and an 800×600 canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub objects: Vec<MapObject>,
    #[serde(default)]
    pub dimensions: Dimensions,
}

/// Body of a save request: `{ "name": ..., "data": { "objects": ..., "dimensions": ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveLevelRequest {
    pub name: String,
    pub data: Level,
}

/// Palette category an asset belongs to. Drives default placement size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Islands,
    Start,
    Fruits,
    Stones,
    Water,
    Trees,
    Finish,
    Extra,
}

impl AssetCategory {
    /// Small stampable items get a fixed default size instead of natural scaling.
    #[must_use]
    pub fn is_item(self) -> bool {
        !matches!(self, Self::Islands | Self::Start)
    }
}

/// An armed palette template awaiting one or more placement clicks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacingObject {
    pub name: String,
    pub image: String,
    /// Size the placed object will have.
    pub width: f64,
    pub height: f64,
    /// Intrinsic asset size.
    pub original_width: f64,
    pub original_height: f64,
}

impl PlacingObject {
    /// Build a template from a loaded asset and its natural pixel size.
    ///
    /// Item categories are placed at 64×64. Islands and start points keep
    /// their natural aspect, scaled down so neither side exceeds 128.
    #[must_use]
    pub fn from_asset(
        name: impl Into<String>,
        image: impl Into<String>,
        category: AssetCategory,
        natural_width: f64,
        natural_height: f64,
    ) -> Self {
        let (width, height) = if category.is_item() {
            (ITEM_DEFAULT_SIZE, ITEM_DEFAULT_SIZE)
        } else if natural_width > 0.0 && natural_height > 0.0 {
            let scale = 1.0_f64
                .min(LARGE_ASSET_MAX_DIM / natural_width)
                .min(LARGE_ASSET_MAX_DIM / natural_height);
            (natural_width * scale, natural_height * scale)
        } else {
            (LARGE_ASSET_MAX_DIM, LARGE_ASSET_MAX_DIM)
        };
        Self {
            name: name.into(),
            image: image.into(),
            width,
            height,
            original_width: natural_width,
            original_height: natural_height,
        }
    }

    /// Create a new object centred on `at` with a fresh id.
    #[must_use]
    pub fn instantiate(&self, at: Point) -> MapObject {
        MapObject {
            id: new_object_id(),
            name: self.name.clone(),
            image: self.image.clone(),
            x: at.x - self.width / 2.0,
            y: at.y - self.height / 2.0,
            width: self.width,
            height: self.height,
            original_width: Some(self.original_width),
            original_height: Some(self.original_height),
            flip_x: false,
            flip_y: false,
            is_locked: false,
            parent_id: None,
        }
    }
}

/// Ordered in-memory store of map objects.
#[derive(Debug, Clone, Default)]
pub struct DocStore {
    objects: Vec<MapObject>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { objects: Vec::new() }
    }

    /// All objects in list order.
    #[must_use]
    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    /// Owned copy of the object list, for building the next snapshot.
    #[must_use]
    pub fn to_vec(&self) -> Vec<MapObject> {
        self.objects.clone()
    }

    /// Replace all objects with a full snapshot.
    pub fn load_snapshot(&mut self, objects: Vec<MapObject>) {
        self.objects = objects;
    }

    /// Return a reference to an object by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&MapObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// List index of an object.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    /// Whether any object names `id` as its parent.
    #[must_use]
    pub fn has_children(&self, id: &str) -> bool {
        self.objects.iter().any(|o| o.parent_id.as_deref() == Some(id))
    }

    /// Ids of the objects grouped under `id`, in list order.
    #[must_use]
    pub fn children_of(&self, id: &str) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| o.parent_id.as_deref() == Some(id))
            .map(|o| o.id.clone())
            .collect()
    }

    /// Apply a partial update in place. Returns false if the object doesn't exist.
    ///
    /// No validation happens here; callers validate before mutating.
    pub fn apply_partial(&mut self, id: &str, partial: &PartialMapObject) -> bool {
        let Some(obj) = self.objects.iter_mut().find(|o| o.id == id) else {
            return false;
        };
        partial.apply_to(obj);
        true
    }

    /// Number of objects currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the store contains no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Copy of `objects` without `ids` and without any object grouped under one of them.
#[must_use]
pub fn without_cascade(objects: &[MapObject], ids: &[ObjectId]) -> Vec<MapObject> {
    objects
        .iter()
        .filter(|o| {
            let doomed = ids.contains(&o.id);
            let orphaned = o.parent_id.as_ref().is_some_and(|p| ids.contains(p));
            !doomed && !orphaned
        })
        .cloned()
        .collect()
}

/// Copy of `objects` with `partial` applied to `id`.
#[must_use]
pub fn with_update(objects: &[MapObject], id: &str, partial: &PartialMapObject) -> Vec<MapObject> {
    objects
        .iter()
        .map(|o| {
            let mut o = o.clone();
            if o.id == id {
                partial.apply_to(&mut o);
            }
            o
        })
        .collect()
}
