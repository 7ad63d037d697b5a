//! Editor controller.
//!
//! `EditorCore` owns the working object list, its undo history, the selection,
//! the UI toggles and the in-flight gesture. Every mutation of the object list
//! goes through [`EditorCore::commit`] (recorded) or a live gesture update
//! (unrecorded, committed once on pointer-up), so undo/redo sees exactly one
//! step per user action.
//!
//! Handlers return a list of [`Action`]s for the host: what to redraw, which
//! notification to show, which level to remember. An empty list means the
//! event was a no-op.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::mem;

use thiserror::Error;
use tracing::debug;

use crate::camera::{Camera, Point};
use crate::consts::{DRAG_SELECT_THRESHOLD, MIN_OBJECT_SIZE, NUDGE_STEP, NUDGE_STEP_LARGE};
use crate::doc::{
    Dimensions, DocStore, Level, Levels, MapObject, ObjectId, PartialMapObject, PlacingObject, SaveLevelRequest,
    with_update, without_cascade,
};
use crate::group;
use crate::history::History;
use crate::hit::{HitPart, Rect, ResizeAnchor, hit_test, objects_in_rect};
use crate::input::{Button, InputState, Key, Modifiers, Tool, UiState};
use crate::selection::Selection;
use crate::tree::LayerTree;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A toast for the host to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The object list changed; panels showing it should refresh.
    ObjectsChanged,
    /// The selection changed.
    SelectionChanged,
    /// The active tool changed.
    ToolChanged(Tool),
    /// A level was opened; hosts remember it as the last opened level.
    LevelOpened(String),
    /// Show a notification.
    Notify(Notice),
    /// Pointer cursor hint for the canvas element.
    SetCursor(String),
    /// Redraw the canvas.
    RenderNeeded,
}

/// Why a save could not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("no level is open")]
    NoLevel,
    #[error("a save is already in progress")]
    InFlight,
}

/// Why a level could not be created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateLevelError {
    #[error("level name cannot be empty")]
    EmptyName,
    #[error("a level named {0:?} already exists")]
    Exists(String),
}

/// Axis for percentage sizing and flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Editor state and transitions. Owns no rendering resources, so it runs the
/// same in a browser host and in tests.
#[derive(Debug, Default)]
pub struct EditorCore {
    pub doc: DocStore,
    pub history: History,
    pub selection: Selection,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    /// Every level known to the editor.
    pub levels: Levels,
    /// Name of the open level.
    pub level_name: Option<String>,
    /// Canvas size of the open level.
    pub dimensions: Dimensions,
    /// Canvas size at the history baseline.
    pub saved_dimensions: Dimensions,
    /// Request body of the save in flight, as captured by `begin_save`.
    pub pending_save: Option<SaveLevelRequest>,
    /// Last pointer position in level space, for the placement preview.
    pub pointer_world: Option<Point>,
}

impl EditorCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Levels ---

    /// Pick the level to open at startup: the last opened one if it still
    /// exists, otherwise the first by name.
    #[must_use]
    pub fn initial_level(levels: &Levels, last_opened: Option<&str>) -> Option<String> {
        last_opened
            .filter(|name| levels.contains_key(*name))
            .map(str::to_owned)
            .or_else(|| levels.keys().next().cloned())
    }

    /// Replace the known level map (e.g. after fetching `/api/levels`).
    pub fn load_levels(&mut self, levels: Levels) {
        self.levels = levels;
    }

    /// Open a known level, resetting history and selection.
    pub fn open_level(&mut self, name: &str) -> Vec<Action> {
        let Some(level) = self.levels.get(name).cloned() else {
            debug!(%name, "open_level: unknown level");
            return Vec::new();
        };
        self.doc.load_snapshot(level.objects.clone());
        self.history.reset(level.objects);
        self.dimensions = level.dimensions;
        self.saved_dimensions = level.dimensions;
        self.level_name = Some(name.to_owned());
        self.selection.select_none();
        self.input = InputState::Idle;
        self.ui.dirty = false;
        vec![
            Action::LevelOpened(name.to_owned()),
            Action::ObjectsChanged,
            Action::SelectionChanged,
            Action::RenderNeeded,
        ]
    }

    /// Add an empty 800×600 level and open it.
    ///
    /// # Errors
    ///
    /// Rejects blank names and names already in use.
    pub fn create_level(&mut self, name: &str) -> Result<Vec<Action>, CreateLevelError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CreateLevelError::EmptyName);
        }
        if self.levels.contains_key(name) {
            return Err(CreateLevelError::Exists(name.to_owned()));
        }
        self.levels.insert(name.to_owned(), Level::default());
        Ok(self.open_level(name))
    }

    /// Change the canvas size of the open level. Invalid sizes are dropped.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) -> Vec<Action> {
        match Dimensions::new(width, height) {
            Ok(dimensions) => {
                if dimensions == self.dimensions {
                    return Vec::new();
                }
                self.dimensions = dimensions;
                self.ui.dirty = self.has_unsaved_changes();
                vec![Action::RenderNeeded]
            }
            Err(e) => {
                debug!(error = %e, "set_canvas_size rejected");
                Vec::new()
            }
        }
    }

    /// The open level as it would be saved.
    #[must_use]
    pub fn level(&self) -> Level {
        Level { objects: self.doc.to_vec(), dimensions: self.dimensions }
    }

    // --- Saving ---

    /// Start a save and return the request body.
    ///
    /// # Errors
    ///
    /// Fails when no level is open or a save is already in flight.
    pub fn begin_save(&mut self) -> Result<SaveLevelRequest, SaveError> {
        if self.ui.saving {
            return Err(SaveError::InFlight);
        }
        let name = self.level_name.clone().ok_or(SaveError::NoLevel)?;
        let request = SaveLevelRequest { name, data: self.level() };
        self.pending_save = Some(request.clone());
        self.ui.saving = true;
        Ok(request)
    }

    /// Settle the in-flight save.
    ///
    /// On success the payload captured by `begin_save` is stored under its
    /// level name. If that level is still open it becomes the new history
    /// baseline and the selection is cleared. On failure nothing but the
    /// saving state changes.
    pub fn finish_save(&mut self, result: Result<(), String>) -> Vec<Action> {
        self.ui.saving = false;
        let Some(SaveLevelRequest { name, data }) = self.pending_save.take() else {
            debug!("finish_save: no save in flight");
            return Vec::new();
        };
        match result {
            Ok(()) => {
                let mut actions = vec![Action::Notify(Notice::success(format!("Level \"{name}\" saved")))];
                if self.level_name.as_deref() == Some(name.as_str()) {
                    self.mark_saved(data.clone());
                    self.selection.select_none();
                    actions.extend([Action::SelectionChanged, Action::RenderNeeded]);
                }
                self.levels.insert(name, data);
                actions
            }
            Err(e) => vec![Action::Notify(Notice::error(format!("Could not save level \"{name}\": {e}")))],
        }
    }

    /// Make `saved` the history baseline. Edits made after it was captured
    /// stay on top of it as one undo step and keep the level dirty.
    pub fn mark_saved(&mut self, saved: Level) {
        let live = self.doc.to_vec();
        let edited = live != saved.objects;
        self.history.reset(saved.objects);
        if edited {
            self.history.record(live);
        }
        self.saved_dimensions = saved.dimensions;
        self.ui.dirty = self.has_unsaved_changes();
    }

    fn has_unsaved_changes(&self) -> bool {
        !self.history.at_baseline() || self.dimensions != self.saved_dimensions
    }

    // --- History ---

    /// Replace the working list and record it as a new history step.
    pub fn commit(&mut self, mut objects: Vec<MapObject>) -> Vec<Action> {
        group::refresh_hulls(&mut objects);
        self.doc.load_snapshot(objects.clone());
        self.history.record(objects);
        self.ui.dirty = true;
        self.prune_selection();
        vec![Action::ObjectsChanged, Action::RenderNeeded]
    }

    /// Step back one history entry. No-op at the baseline.
    pub fn undo(&mut self) -> Vec<Action> {
        let Some(snapshot) = self.history.undo().map(<[MapObject]>::to_vec) else {
            return Vec::new();
        };
        self.replay(snapshot)
    }

    /// Step forward one history entry. No-op at the tail.
    pub fn redo(&mut self) -> Vec<Action> {
        let Some(snapshot) = self.history.redo().map(<[MapObject]>::to_vec) else {
            return Vec::new();
        };
        self.replay(snapshot)
    }

    fn replay(&mut self, snapshot: Vec<MapObject>) -> Vec<Action> {
        self.doc.load_snapshot(snapshot);
        self.selection.select_none();
        self.input = InputState::Idle;
        self.ui.dirty = self.has_unsaved_changes();
        vec![Action::ObjectsChanged, Action::SelectionChanged, Action::RenderNeeded]
    }

    fn prune_selection(&mut self) {
        let doc = &self.doc;
        self.selection.retain(|id| doc.get(id).is_some());
    }

    // --- Selection ---

    fn selectable(&self, id: &str) -> bool {
        self.doc.get(id).is_some_and(|o| !o.is_locked)
    }

    pub fn select_none(&mut self) -> Vec<Action> {
        if self.selection.is_empty() && self.selection.anchor().is_none() {
            return Vec::new();
        }
        self.selection.select_none();
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    pub fn select_single(&mut self, id: &str) -> Vec<Action> {
        if !self.selectable(id) {
            return Vec::new();
        }
        self.selection.select_single(id);
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    pub fn select_toggle(&mut self, id: &str) -> Vec<Action> {
        if !self.selectable(id) {
            return Vec::new();
        }
        self.selection.toggle(id);
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    /// Shift-click: extend from the anchor to `id`. Falls back to a single
    /// selection when there is no usable anchor.
    pub fn select_range(&mut self, id: &str) -> Vec<Action> {
        if !self.selectable(id) {
            return Vec::new();
        }
        if !self.selection.select_range(id, self.doc.objects()) {
            self.selection.select_single(id);
        }
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    /// Route a click on an object by its modifiers.
    pub fn click_object(&mut self, id: &str, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.shift {
            self.select_range(id)
        } else if modifiers.command() {
            self.select_toggle(id)
        } else {
            self.select_single(id)
        }
    }

    // --- Tools / placement ---

    /// Set the active tool. Choosing the pointer disarms any template.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        if tool == Tool::Pointer {
            self.ui.placing = None;
        }
        if self.ui.tool == tool {
            return Vec::new();
        }
        self.ui.tool = tool;
        vec![Action::ToolChanged(tool)]
    }

    /// Arm a palette template; canvas clicks will place it.
    pub fn arm(&mut self, template: PlacingObject) -> Vec<Action> {
        self.ui.placing = Some(template);
        self.input = InputState::Idle;
        let mut actions = self.set_tool(Tool::Placing);
        actions.push(Action::SetCursor("crosshair".to_owned()));
        actions
    }

    /// Clear the armed template and return to the pointer tool.
    pub fn disarm(&mut self) -> Vec<Action> {
        if self.ui.placing.is_none() && self.ui.tool != Tool::Placing {
            return Vec::new();
        }
        let mut actions = self.set_tool(Tool::Pointer);
        actions.push(Action::SetCursor("default".to_owned()));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Instantiate the armed template centred on `world_pt`.
    pub fn place_at(&mut self, world_pt: Point) -> Vec<Action> {
        let Some(template) = self.ui.placing.as_ref() else {
            return Vec::new();
        };
        let obj = template.instantiate(world_pt);
        let mut objects = self.doc.to_vec();
        objects.push(obj);
        let mut actions = self.commit(objects);
        if !self.ui.keep_after_placement {
            actions.extend(self.disarm());
        }
        actions
    }

    // --- Object editing ---

    /// Apply a property edit to one object and record it.
    ///
    /// Invalid geometry is rejected with a notification. With aspect ratio
    /// kept, a width-only or height-only edit derives the other side from the
    /// object's intrinsic size.
    ///
    /// A group's box follows its members: moving it moves the members, and
    /// resizing it is rejected.
    pub fn update_object(&mut self, id: &str, mut partial: PartialMapObject) -> Vec<Action> {
        let Some(obj) = self.doc.get(id) else {
            return Vec::new();
        };
        if let Err(e) = partial.validate() {
            debug!(%id, error = %e, "update_object rejected");
            return vec![Action::Notify(Notice::error(e.to_string()))];
        }
        if self.doc.has_children(id) {
            if partial.width.is_some() || partial.height.is_some() {
                debug!(%id, "update_object: group size follows its members");
                return vec![Action::Notify(Notice::error("Resize the objects in a group, not the group"))];
            }
            let dx = partial.x.take().map_or(0.0, |x| x - obj.x);
            let dy = partial.y.take().map_or(0.0, |y| y - obj.y);
            let moved = dx.abs() > f64::EPSILON || dy.abs() > f64::EPSILON;
            if partial.is_empty() && !moved {
                return Vec::new();
            }
            let mut next = with_update(self.doc.objects(), id, &partial);
            for member in next.iter_mut().filter(|o| o.parent_id.as_deref() == Some(id) && !o.is_locked) {
                member.x += dx;
                member.y += dy;
            }
            return self.commit(next);
        }
        if self.ui.keep_aspect_ratio {
            if let Some((ow, oh)) = obj.intrinsic_size() {
                match (partial.width, partial.height) {
                    (Some(w), None) => partial.height = Some(w * oh / ow),
                    (None, Some(h)) => partial.width = Some(h * ow / oh),
                    _ => {}
                }
            }
        }
        if partial.is_empty() {
            return Vec::new();
        }
        let next = with_update(self.doc.objects(), id, &partial);
        self.commit(next)
    }

    /// Size an object as a percentage of its intrinsic size.
    pub fn set_size_percent(&mut self, id: &str, axis: Axis, percent: f64) -> Vec<Action> {
        let Some(obj) = self.doc.get(id) else {
            return Vec::new();
        };
        if !(percent.is_finite() && percent > 0.0) {
            return Vec::new();
        }
        let factor = percent / 100.0;
        let mut partial = PartialMapObject::default();
        match axis {
            Axis::Horizontal => partial.width = obj.original_width.map(|w| w * factor),
            Axis::Vertical => partial.height = obj.original_height.map(|h| h * factor),
        }
        if self.ui.keep_aspect_ratio {
            if let Some((ow, oh)) = obj.intrinsic_size() {
                partial.width = Some(ow * factor);
                partial.height = Some(oh * factor);
            }
        }
        if partial.width.is_none() && partial.height.is_none() {
            return Vec::new();
        }
        // Both sides are already decided; skip the aspect derivation in update_object.
        let keep = mem::replace(&mut self.ui.keep_aspect_ratio, false);
        let actions = self.update_object(id, partial);
        self.ui.keep_aspect_ratio = keep;
        actions
    }

    /// Mirror an object along `axis`.
    pub fn flip(&mut self, id: &str, axis: Axis) -> Vec<Action> {
        let Some(obj) = self.doc.get(id) else {
            return Vec::new();
        };
        let partial = match axis {
            Axis::Horizontal => PartialMapObject { flip_x: Some(!obj.flip_x), ..Default::default() },
            Axis::Vertical => PartialMapObject { flip_y: Some(!obj.flip_y), ..Default::default() },
        };
        self.update_object(id, partial)
    }

    /// Lock or unlock an object. Locking drops it from the selection.
    pub fn toggle_lock(&mut self, id: &str) -> Vec<Action> {
        let Some(obj) = self.doc.get(id) else {
            return Vec::new();
        };
        let lock = !obj.is_locked;
        let mut actions = self.update_object(id, PartialMapObject { is_locked: Some(lock), ..Default::default() });
        if lock && self.selection.contains(id) {
            self.selection.retain(|s| s != id);
            actions.push(Action::SelectionChanged);
        }
        actions
    }

    /// Delete the selection. Deleting a group takes its members with it.
    pub fn delete_selection(&mut self) -> Vec<Action> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        let ids = self.selection.to_vec();
        let next = without_cascade(self.doc.objects(), &ids);
        self.selection.select_none();
        let mut actions = self.commit(next);
        actions.push(Action::SelectionChanged);
        actions
    }

    /// Delete one object by id, as the layer list does. Works on locked objects.
    pub fn delete_object(&mut self, id: &str) -> Vec<Action> {
        if self.doc.get(id).is_none() {
            return Vec::new();
        }
        let next = without_cascade(self.doc.objects(), &[id.to_owned()]);
        let was_selected = !self.selection.is_empty();
        let mut actions = self.commit(next);
        if was_selected && self.selection.is_empty() {
            actions.push(Action::SelectionChanged);
        }
        actions
    }

    // --- Grouping ---

    /// Group the selected objects. Violations are reported, not applied.
    pub fn group_selection(&mut self) -> Vec<Action> {
        let ids = self.selection.to_vec();
        match group::group(self.doc.objects(), &ids) {
            Ok(grouped) => {
                let mut actions = self.commit(grouped.objects);
                self.selection.select_single(&grouped.group_id);
                actions.push(Action::SelectionChanged);
                actions
            }
            Err(e) => {
                debug!(error = %e, "group rejected");
                vec![Action::Notify(Notice::error(e.to_string()))]
            }
        }
    }

    /// Dissolve a group and select its former members.
    pub fn ungroup(&mut self, group_id: &str) -> Vec<Action> {
        match group::ungroup(self.doc.objects(), group_id) {
            Ok(ungrouped) => {
                let mut actions = self.commit(ungrouped.objects);
                self.selection.replace(ungrouped.children);
                actions.push(Action::SelectionChanged);
                actions
            }
            Err(e) => {
                debug!(error = %e, "ungroup rejected");
                vec![Action::Notify(Notice::error(e.to_string()))]
            }
        }
    }

    /// Ungroup the primary selected object.
    pub fn ungroup_selection(&mut self) -> Vec<Action> {
        match self.selection.primary().map(str::to_owned) {
            Some(id) => self.ungroup(&id),
            None => vec![Action::Notify(Notice::error("select a single group to ungroup"))],
        }
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);
        self.pointer_world = Some(world);
        self.input = InputState::Idle;

        if self.ui.tool == Tool::Placing && self.ui.placing.is_some() {
            return Vec::new();
        }

        let handle_target = self.selection.primary().filter(|id| !self.doc.has_children(id));
        match hit_test(world, &self.doc, &self.camera, handle_target) {
            Some(hit) => match hit.part {
                HitPart::ResizeHandle(anchor) => self.begin_resize(hit.object_id, anchor, world),
                HitPart::Body => self.begin_drag(&hit.object_id, world, modifiers),
            },
            None => {
                if self.ui.tool == Tool::Pointer {
                    self.input = InputState::Marquee { start: world, current: world };
                }
                Vec::new()
            }
        }
    }

    fn begin_resize(&mut self, id: ObjectId, anchor: ResizeAnchor, world: Point) -> Vec<Action> {
        let Some(obj) = self.doc.get(&id) else {
            return Vec::new();
        };
        let orig = obj.bounds();
        self.input = InputState::ResizingObject { id, anchor, start_world: world, orig };
        Vec::new()
    }

    fn begin_drag(&mut self, id: &str, world: Point, modifiers: Modifiers) -> Vec<Action> {
        if !self.selectable(id) {
            return Vec::new();
        }
        let mut actions = if modifiers.shift || modifiers.command() {
            self.click_object(id, modifiers)
        } else if self.selection.contains(id) {
            Vec::new()
        } else {
            self.select_single(id)
        };
        if !self.selection.contains(id) {
            return actions;
        }

        let origins = self.drag_origins();
        if !origins.is_empty() {
            self.input = InputState::DraggingObjects { start_world: world, origins };
            actions.push(Action::SetCursor("move".to_owned()));
        }
        actions
    }

    /// Starting positions of everything a drag of the selection moves:
    /// selected unlocked objects plus the members of selected groups.
    fn drag_origins(&self) -> Vec<(ObjectId, f64, f64)> {
        self.doc
            .objects()
            .iter()
            .filter(|o| !o.is_locked)
            .filter(|o| {
                self.selection.contains(&o.id) || o.parent_id.as_deref().is_some_and(|p| self.selection.contains(p))
            })
            .map(|o| (o.id.clone(), o.x, o.y))
            .collect()
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        self.pointer_world = Some(world);

        match &mut self.input {
            InputState::Idle => {
                if self.ui.placing.is_some() {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            InputState::Marquee { current, .. } => {
                *current = world;
                vec![Action::RenderNeeded]
            }
            InputState::DraggingObjects { start_world, origins } => {
                let dx = world.x - start_world.x;
                let dy = world.y - start_world.y;
                for (id, x, y) in &*origins {
                    self.doc.apply_partial(id, &PartialMapObject::position(x + dx, y + dy));
                }
                vec![Action::RenderNeeded]
            }
            InputState::ResizingObject { id, anchor, start_world, orig } => {
                let dx = world.x - start_world.x;
                let dy = world.y - start_world.y;
                let Some(next) = resize_rect(*orig, *anchor, dx, dy, self.ui.keep_aspect_ratio) else {
                    return Vec::new();
                };
                let partial = PartialMapObject {
                    x: Some(next.x),
                    y: Some(next.y),
                    width: Some(next.width),
                    height: Some(next.height),
                    ..Default::default()
                };
                self.doc.apply_partial(id, &partial);
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);
        self.pointer_world = Some(world);

        match mem::take(&mut self.input) {
            InputState::Idle => {
                if self.ui.tool == Tool::Placing {
                    self.place_at(world)
                } else {
                    Vec::new()
                }
            }
            InputState::Marquee { start, .. } => self.finish_marquee(Rect::from_corners(start, world), modifiers),
            InputState::DraggingObjects { origins, .. } => {
                let mut actions = vec![Action::SetCursor("default".to_owned())];
                let moved = origins.iter().any(|(id, x, y)| {
                    self.doc.get(id).is_some_and(|o| (o.x - x).abs() > f64::EPSILON || (o.y - y).abs() > f64::EPSILON)
                });
                if moved {
                    actions.extend(self.commit(self.doc.to_vec()));
                }
                actions
            }
            InputState::ResizingObject { id, orig, .. } => {
                let changed = self.doc.get(&id).is_some_and(|o| o.bounds() != orig);
                if changed {
                    self.commit(self.doc.to_vec())
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn finish_marquee(&mut self, rect: Rect, modifiers: Modifiers) -> Vec<Action> {
        if rect.width <= DRAG_SELECT_THRESHOLD && rect.height <= DRAG_SELECT_THRESHOLD {
            // Too small to be a drag: a plain click on empty canvas.
            if modifiers.multi_select() {
                return vec![Action::RenderNeeded];
            }
            let mut actions = self.select_none();
            actions.push(Action::RenderNeeded);
            return actions;
        }
        let hits = objects_in_rect(&rect, &self.doc);
        if modifiers.multi_select() {
            self.selection.xor(hits);
        } else {
            self.selection.replace(hits);
        }
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    /// The pointer left the canvas; drop the placement preview.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        if self.pointer_world.take().is_some() && self.ui.placing.is_some() {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Keyboard ---

    /// Handle a key press. Ignored while a text field has focus.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers, text_input_focused: bool) -> Vec<Action> {
        if text_input_focused {
            return Vec::new();
        }
        if modifiers.command() {
            if key.is_letter('z') {
                return if modifiers.shift { self.redo() } else { self.undo() };
            }
            if key.is_letter('y') {
                return self.redo();
            }
            return Vec::new();
        }
        let step = if modifiers.shift { NUDGE_STEP_LARGE } else { NUDGE_STEP };
        match key.0.as_str() {
            "Delete" | "Backspace" => self.delete_selection(),
            "ArrowLeft" => self.nudge(-step, 0.0),
            "ArrowRight" => self.nudge(step, 0.0),
            "ArrowUp" => self.nudge(0.0, -step),
            "ArrowDown" => self.nudge(0.0, step),
            "Escape" => {
                let mut actions = self.disarm();
                actions.extend(self.select_none());
                actions
            }
            _ => Vec::new(),
        }
    }

    /// Move the primary object (and its members, if it is a group) by `(dx, dy)`.
    pub fn nudge(&mut self, dx: f64, dy: f64) -> Vec<Action> {
        let Some(primary) = self.selection.primary().map(str::to_owned) else {
            return Vec::new();
        };
        if !self.selectable(&primary) {
            return Vec::new();
        }
        let next: Vec<MapObject> = self
            .doc
            .objects()
            .iter()
            .map(|o| {
                let mut o = o.clone();
                let moves = o.id == primary || o.parent_id.as_deref() == Some(primary.as_str());
                if moves && !o.is_locked {
                    o.x += dx;
                    o.y += dy;
                }
                o
            })
            .collect();
        self.commit(next)
    }

    // --- Queries ---

    #[must_use]
    pub fn objects(&self) -> &[MapObject] {
        self.doc.objects()
    }

    /// Look up an object by id.
    #[must_use]
    pub fn object(&self, id: &str) -> Option<&MapObject> {
        self.doc.get(id)
    }

    /// The single selected object, if exactly one is selected.
    #[must_use]
    pub fn primary_object(&self) -> Option<&MapObject> {
        self.selection.primary().and_then(|id| self.doc.get(id))
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.ui.tool
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.ui.dirty
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Parent/children view for the layer panel.
    #[must_use]
    pub fn layer_tree(&self) -> LayerTree {
        LayerTree::build(self.doc.objects())
    }

    /// The marquee being drawn, if any.
    #[must_use]
    pub fn marquee(&self) -> Option<Rect> {
        self.input.marquee_rect()
    }
}

/// New box for a handle drag, or `None` when it would fall under the minimum size.
///
/// With `keep_aspect`, side handles (E/W) derive the height from the width and
/// every other handle derives the width from the height.
#[must_use]
pub fn resize_rect(orig: Rect, anchor: ResizeAnchor, dx: f64, dy: f64, keep_aspect: bool) -> Option<Rect> {
    let mut left = orig.x;
    let mut right = orig.right();
    let mut top = orig.y;
    let mut bottom = orig.bottom();
    if anchor.moves_left() {
        left += dx;
    }
    if anchor.moves_right() {
        right += dx;
    }
    if anchor.moves_top() {
        top += dy;
    }
    if anchor.moves_bottom() {
        bottom += dy;
    }

    let mut width = right - left;
    let mut height = bottom - top;
    if keep_aspect && orig.width > 0.0 && orig.height > 0.0 {
        let ratio = orig.width / orig.height;
        if matches!(anchor, ResizeAnchor::E | ResizeAnchor::W) {
            height = width / ratio;
        } else {
            width = height * ratio;
        }
    }
    if !(width >= MIN_OBJECT_SIZE && height >= MIN_OBJECT_SIZE) {
        return None;
    }

    let x = if anchor.moves_left() { right - width } else { left };
    let y = if anchor.moves_top() { bottom - height } else { top };
    Some(Rect::new(x, y, width, height))
}
