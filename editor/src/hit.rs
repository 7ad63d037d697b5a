#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{DocStore, MapObject, ObjectId};

/// Axis-aligned rectangle in level coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Normalized rectangle spanning two corners given in any order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Whether `other` lies entirely inside this rectangle (edges inclusive).
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x && other.y >= self.y && other.right() <= self.right() && other.bottom() <= self.bottom()
    }

    /// Smallest rectangle enclosing both.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Position of a resize handle on this rectangle.
    #[must_use]
    pub fn anchor_point(&self, anchor: ResizeAnchor) -> Point {
        let cx = self.x + self.width / 2.0;
        let cy = self.y + self.height / 2.0;
        match anchor {
            ResizeAnchor::N => Point::new(cx, self.y),
            ResizeAnchor::Ne => Point::new(self.right(), self.y),
            ResizeAnchor::E => Point::new(self.right(), cy),
            ResizeAnchor::Se => Point::new(self.right(), self.bottom()),
            ResizeAnchor::S => Point::new(cx, self.bottom()),
            ResizeAnchor::Sw => Point::new(self.x, self.bottom()),
            ResizeAnchor::W => Point::new(self.x, cy),
            ResizeAnchor::Nw => Point::new(self.x, self.y),
        }
    }
}

/// Which part of an object was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [ResizeAnchor; 8] = [
        ResizeAnchor::N,
        ResizeAnchor::Ne,
        ResizeAnchor::E,
        ResizeAnchor::Se,
        ResizeAnchor::S,
        ResizeAnchor::Sw,
        ResizeAnchor::W,
        ResizeAnchor::Nw,
    ];

    /// Whether dragging this handle moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Nw | Self::W | Self::Sw)
    }

    /// Whether dragging this handle moves the right edge.
    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::Ne | Self::E | Self::Se)
    }

    /// Whether dragging this handle moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::Nw | Self::N | Self::Ne)
    }

    /// Whether dragging this handle moves the bottom edge.
    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::Sw | Self::S | Self::Se)
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub object_id: ObjectId,
    pub part: HitPart,
}

/// Test which object (if any) is under `world_pt`.
///
/// Resize handles of `primary` are checked first, then object bodies from the
/// top of the draw order down. Locked objects are still reported so a click on
/// them is swallowed instead of falling through to the canvas.
#[must_use]
pub fn hit_test(world_pt: Point, doc: &DocStore, camera: &Camera, primary: Option<&str>) -> Option<Hit> {
    if let Some(obj) = primary.and_then(|id| doc.get(id)) {
        if !obj.is_locked {
            if let Some(anchor) = handle_at(world_pt, obj, camera) {
                return Some(Hit { object_id: obj.id.clone(), part: HitPart::ResizeHandle(anchor) });
            }
        }
    }

    doc.objects()
        .iter()
        .rev()
        .find(|o| o.bounds().contains_point(world_pt))
        .map(|o| Hit { object_id: o.id.clone(), part: HitPart::Body })
}

fn handle_at(world_pt: Point, obj: &MapObject, camera: &Camera) -> Option<ResizeAnchor> {
    let slop = camera.screen_dist_to_world(HANDLE_RADIUS_PX);
    let bounds = obj.bounds();
    ResizeAnchor::ALL.into_iter().find(|&anchor| {
        let p = bounds.anchor_point(anchor);
        (p.x - world_pt.x).abs() <= slop && (p.y - world_pt.y).abs() <= slop
    })
}

/// Ids of unlocked objects whose whole bounding box lies inside `rect`, in list order.
#[must_use]
pub fn objects_in_rect(rect: &Rect, doc: &DocStore) -> Vec<ObjectId> {
    doc.objects()
        .iter()
        .filter(|o| !o.is_locked && rect.contains_rect(&o.bounds()))
        .map(|o| o.id.clone())
        .collect()
}

/// Union bounding box of the given objects, or `None` for an empty slice.
#[must_use]
pub fn union_bounds<'a, I>(objects: I) -> Option<Rect>
where
    I: IntoIterator<Item = &'a MapObject>,
{
    objects
        .into_iter()
        .map(MapObject::bounds)
        .reduce(|acc, r| acc.union(&r))
}
