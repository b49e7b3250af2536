use std::mem;

use crate::camera::{Camera, Point};
use crate::consts::{DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_WIDTH, HISTORY_LIMIT};
use crate::doc::{Note, NoteId, NotePatch, NoteStore};
use crate::hit::{HitPart, hit_test};
use crate::history::{History, HistoryAction};
use crate::input::{Button, CursorStyle, InputState, Modifiers, UiState, WheelDelta};
use crate::viewport::{Viewport, ViewportConfig};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from operations and input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    NoteCreated(Note),
    /// `fields` carries the values actually stored, after clamping.
    NoteUpdated { id: NoteId, fields: NotePatch },
    NoteDeleted { id: NoteId },
    /// The whole collection was swapped (load, import, undo, redo).
    NotesReplaced,
    FocusText { id: NoteId },
    BlurText,
    SetCursor(CursorStyle),
    ViewportChanged(Camera),
    RenderNeeded,
}

impl Action {
    /// The note collection changed and should be persisted.
    #[must_use]
    pub fn changes_notes(&self) -> bool {
        matches!(
            self,
            Self::NoteCreated(_) | Self::NoteUpdated { .. } | Self::NoteDeleted { .. } | Self::NotesReplaced
        )
    }
}

/// Core engine state: the note store, its history, the viewport, and the
/// gesture in progress.
///
/// Every mutation goes through an operation here so that history policy is
/// applied in one place. Text edits update the store without a snapshot;
/// structural edits (create, delete, move, resize, color, import) record one.
/// A drag or resize records a single snapshot when the gesture ends, and only
/// if the note's geometry actually changed.
#[derive(Debug, Clone)]
pub struct EngineCore {
    pub doc: NoteStore,
    pub history: History,
    pub viewport: Viewport,
    pub ui: UiState,
    pub input: InputState,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(ViewportConfig::default(), HISTORY_LIMIT)
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(viewport: ViewportConfig, history_limit: usize) -> Self {
        Self {
            doc: NoteStore::new(),
            history: History::with_limit(&[], history_limit),
            viewport: Viewport::new(viewport),
            ui: UiState::default(),
            input: InputState::default(),
        }
    }

    // --- Data inputs ---

    /// Hydrate from persisted notes. Resets history to a single `init` entry.
    pub fn load_notes(&mut self, notes: Vec<Note>) -> Vec<Action> {
        self.input = InputState::Idle;
        self.doc.replace(notes);
        self.history.reset(self.doc.notes());
        let mut actions = self.drop_stale_focus();
        actions.extend([Action::NotesReplaced, Action::RenderNeeded]);
        actions
    }

    /// Replace every note with an imported collection. Undoable.
    pub fn import_notes(&mut self, notes: Vec<Note>) -> Vec<Action> {
        let mut actions = self.end_gesture();
        self.doc.replace(notes);
        self.history.save_snapshot(self.doc.snapshot(), HistoryAction::Import);
        tracing::info!(count = self.doc.len(), "notes imported");
        actions.extend(self.drop_stale_focus());
        actions.extend([Action::NotesReplaced, Action::RenderNeeded]);
        actions
    }

    /// Create a note.
    ///
    /// With `position` the note's top-left corner lands there; otherwise it is
    /// centered in the viewport with a diagonal stagger per existing note.
    /// The new note takes text focus.
    pub fn create_note(&mut self, position: Option<Point>, created_at: i64) -> Vec<Action> {
        let note = self.doc.create(position, self.viewport.center_canvas(), created_at);
        self.history.save_snapshot(self.doc.snapshot(), HistoryAction::Create);
        self.ui.focused_id = Some(note.id.clone());
        let id = note.id.clone();
        vec![Action::NoteCreated(note), Action::FocusText { id }, Action::RenderNeeded]
    }

    /// Merge `patch` into a note. Unknown ids and empty patches are no-ops.
    ///
    /// A history entry is recorded only when position, size or color actually
    /// changed. Content edits and patches that leave the note as it was do not.
    pub fn update_note(&mut self, id: &NoteId, patch: &NotePatch) -> Vec<Action> {
        if patch.is_empty() {
            return Vec::new();
        }
        let Some(before) = self.doc.get(id).cloned() else {
            return Vec::new();
        };
        let Some(fields) = self.apply_patch(id, patch) else {
            return Vec::new();
        };
        if let Some(action) = self.doc.get(id).and_then(|after| change_kind(&before, after)) {
            self.history.save_snapshot(self.doc.snapshot(), action);
        }
        vec![Action::NoteUpdated { id: id.clone(), fields }, Action::RenderNeeded]
    }

    /// Remove a note. Deleting an unknown id is a no-op.
    pub fn delete_note(&mut self, id: &NoteId) -> Vec<Action> {
        if self.doc.delete(id).is_none() {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if self.input.note_id() == Some(id) {
            tracing::debug!(%id, "gesture target deleted");
            self.input = InputState::Idle;
            self.set_cursor(CursorStyle::Default, &mut actions);
        }
        if self.ui.focused_id.as_ref() == Some(id) {
            self.ui.focused_id = None;
            actions.push(Action::BlurText);
        }
        self.history.save_snapshot(self.doc.snapshot(), HistoryAction::Delete);
        actions.extend([Action::NoteDeleted { id: id.clone() }, Action::RenderNeeded]);
        actions
    }

    /// Restore the previous snapshot. Returns nothing at the oldest entry.
    pub fn undo(&mut self) -> Vec<Action> {
        let mut actions = self.end_gesture();
        let Some(notes) = self.history.undo().map(<[Note]>::to_vec) else {
            return actions;
        };
        actions.extend(self.restore(notes));
        actions
    }

    /// Re-apply the next snapshot. Returns nothing at the newest entry.
    pub fn redo(&mut self) -> Vec<Action> {
        let mut actions = self.end_gesture();
        let Some(notes) = self.history.redo().map(<[Note]>::to_vec) else {
            return actions;
        };
        actions.extend(self.restore(notes));
        actions
    }

    // --- Text focus ---

    pub fn focus_text(&mut self, id: &NoteId) -> Vec<Action> {
        if !self.doc.contains(id) || self.ui.focused_id.as_ref() == Some(id) {
            return Vec::new();
        }
        self.ui.focused_id = Some(id.clone());
        vec![Action::FocusText { id: id.clone() }]
    }

    pub fn blur_text(&mut self) -> Vec<Action> {
        match self.ui.focused_id.take() {
            Some(_) => vec![Action::BlurText],
            None => Vec::new(),
        }
    }

    // --- Viewport ---

    pub fn set_viewport_size(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.viewport.set_size(width, height);
        vec![Action::RenderNeeded]
    }

    /// Adopt a transform reported by the host's pan/zoom layer.
    pub fn set_camera(&mut self, camera: Camera) -> Vec<Action> {
        if self.viewport.set_camera(camera) { self.viewport_changed() } else { Vec::new() }
    }

    pub fn set_wheel_enabled(&mut self, enabled: bool) {
        self.viewport.set_wheel_enabled(enabled);
    }

    pub fn set_panning_enabled(&mut self, enabled: bool) {
        self.viewport.set_panning_enabled(enabled);
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || !screen_pt.is_finite() {
            return Vec::new();
        }
        let mut actions = self.end_gesture();
        let canvas_pt = self.viewport.screen_to_canvas(screen_pt);
        match hit_test(canvas_pt, self.doc.notes(), self.ui.focused_id.as_ref()) {
            Some(hit) => {
                let id = hit.note_id;
                actions.extend(match hit.part {
                    HitPart::DragBar => self.begin_drag(&id, screen_pt),
                    HitPart::ResizeHandle => self.begin_resize(&id, screen_pt),
                    HitPart::DeleteButton => self.delete_note(&id),
                    HitPart::Swatch(color) => self.update_note(&id, &NotePatch::color(color)),
                    HitPart::Text => self.focus_text(&id),
                });
            }
            None => {
                actions.extend(self.blur_text());
                if self.viewport.config().panning_enabled {
                    self.input = InputState::Panning { last_screen: screen_pt };
                    self.set_cursor(CursorStyle::Grabbing, &mut actions);
                }
            }
        }
        actions
    }

    /// Start dragging a note from `screen_pt`. Unknown ids are ignored.
    pub fn begin_drag(&mut self, id: &NoteId, screen_pt: Point) -> Vec<Action> {
        let Some(note) = self.doc.get(id) else {
            return Vec::new();
        };
        let grab = self.viewport.screen_to_canvas(screen_pt) - note.origin();
        self.input = InputState::DraggingNote { id: id.clone(), grab, orig_x: note.x, orig_y: note.y };
        tracing::debug!(%id, "drag started");
        let mut actions = Vec::new();
        self.set_cursor(CursorStyle::Grabbing, &mut actions);
        actions
    }

    /// Start resizing a note from `screen_pt`. Unknown ids are ignored.
    pub fn begin_resize(&mut self, id: &NoteId, screen_pt: Point) -> Vec<Action> {
        let Some(note) = self.doc.get(id) else {
            return Vec::new();
        };
        self.input = InputState::ResizingNote {
            id: id.clone(),
            start_screen: screen_pt,
            orig_w: note.width,
            orig_h: note.height,
        };
        tracing::debug!(%id, "resize started");
        let mut actions = Vec::new();
        self.set_cursor(CursorStyle::NwseResize, &mut actions);
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        if !screen_pt.is_finite() {
            return Vec::new();
        }
        match self.input.clone() {
            InputState::Idle => self.hover(screen_pt),
            InputState::DraggingNote { id, grab, .. } => {
                let origin = self.viewport.screen_to_canvas(screen_pt) - grab;
                self.gesture_update(&id, &NotePatch::position(origin))
            }
            InputState::ResizingNote { id, start_screen, orig_w, orig_h } => {
                // Screen-space deltas: resize is not corrected for zoom.
                let width = orig_w + (screen_pt.x - start_screen.x);
                let height = orig_h + (screen_pt.y - start_screen.y);
                self.gesture_update(&id, &NotePatch::size(width, height))
            }
            InputState::Panning { last_screen } => {
                let delta = screen_pt - last_screen;
                self.input = InputState::Panning { last_screen: screen_pt };
                if self.viewport.pan_by(delta.x, delta.y) { self.viewport_changed() } else { Vec::new() }
            }
        }
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.end_gesture()
    }

    /// A context menu during a gesture ends it like a pointer-up.
    pub fn on_context_menu(&mut self, _screen_pt: Point) -> Vec<Action> {
        self.end_gesture()
    }

    /// Double-click on empty canvas creates a note centered on the cursor.
    pub fn on_double_click(&mut self, screen_pt: Point, created_at: i64) -> Vec<Action> {
        if !screen_pt.is_finite() || self.input.is_active() {
            return Vec::new();
        }
        let canvas_pt = self.viewport.screen_to_canvas(screen_pt);
        if hit_test(canvas_pt, self.doc.notes(), self.ui.focused_id.as_ref()).is_some() {
            return Vec::new();
        }
        let origin = canvas_pt - Point::new(DEFAULT_NOTE_WIDTH / 2.0, DEFAULT_NOTE_HEIGHT / 2.0);
        self.create_note(Some(origin), created_at)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if self.viewport.on_wheel(screen_pt, delta, modifiers) { self.viewport_changed() } else { Vec::new() }
    }

    // --- Queries ---

    /// All notes in stacking order.
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        self.doc.notes()
    }

    #[must_use]
    pub fn note(&self, id: &NoteId) -> Option<&Note> {
        self.doc.get(id)
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.viewport.camera()
    }

    #[must_use]
    pub fn focused(&self) -> Option<&NoteId> {
        self.ui.focused_id.as_ref()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Internals ---

    /// Finish the active gesture, recording one snapshot if geometry changed.
    fn end_gesture(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        match mem::take(&mut self.input) {
            InputState::Idle => {}
            InputState::DraggingNote { id, orig_x, orig_y, .. } => {
                let moved = self.doc.get(&id).is_some_and(|n| n.x != orig_x || n.y != orig_y);
                if moved {
                    self.history.save_snapshot(self.doc.snapshot(), HistoryAction::Move);
                }
                tracing::debug!(%id, moved, "drag ended");
                self.set_cursor(CursorStyle::Grab, &mut actions);
            }
            InputState::ResizingNote { id, orig_w, orig_h, .. } => {
                let resized = self.doc.get(&id).is_some_and(|n| n.width != orig_w || n.height != orig_h);
                if resized {
                    self.history.save_snapshot(self.doc.snapshot(), HistoryAction::Resize);
                }
                tracing::debug!(%id, resized, "resize ended");
                self.set_cursor(CursorStyle::NwseResize, &mut actions);
            }
            InputState::Panning { .. } => {
                self.set_cursor(CursorStyle::Default, &mut actions);
            }
        }
        actions
    }

    /// Store-only update used by pointer moves; history is left to `end_gesture`.
    fn gesture_update(&mut self, id: &NoteId, patch: &NotePatch) -> Vec<Action> {
        match self.apply_patch(id, patch) {
            Some(fields) => vec![Action::NoteUpdated { id: id.clone(), fields }, Action::RenderNeeded],
            None => {
                self.input = InputState::Idle;
                Vec::new()
            }
        }
    }

    /// Apply `patch` and report the stored values of the touched fields.
    fn apply_patch(&mut self, id: &NoteId, patch: &NotePatch) -> Option<NotePatch> {
        if !self.doc.update(id, patch) {
            return None;
        }
        let note = self.doc.get(id)?;
        Some(NotePatch {
            content: patch.content.as_ref().map(|_| note.content.clone()),
            x: patch.x.map(|_| note.x),
            y: patch.y.map(|_| note.y),
            width: patch.width.map(|_| note.width),
            height: patch.height.map(|_| note.height),
            color: patch.color.map(|_| note.color),
        })
    }

    fn hover(&mut self, screen_pt: Point) -> Vec<Action> {
        let canvas_pt = self.viewport.screen_to_canvas(screen_pt);
        let style = match hit_test(canvas_pt, self.doc.notes(), self.ui.focused_id.as_ref()).map(|h| h.part) {
            Some(HitPart::DragBar) => CursorStyle::Grab,
            Some(HitPart::ResizeHandle) => CursorStyle::NwseResize,
            Some(HitPart::DeleteButton | HitPart::Swatch(_)) => CursorStyle::Pointer,
            Some(HitPart::Text) => CursorStyle::Text,
            None => CursorStyle::Default,
        };
        let mut actions = Vec::new();
        self.set_cursor(style, &mut actions);
        actions
    }

    fn restore(&mut self, notes: Vec<Note>) -> Vec<Action> {
        self.doc.replace(notes);
        let mut actions = self.drop_stale_focus();
        actions.extend([Action::NotesReplaced, Action::RenderNeeded]);
        actions
    }

    fn drop_stale_focus(&mut self) -> Vec<Action> {
        match &self.ui.focused_id {
            Some(id) if !self.doc.contains(id) => {
                self.ui.focused_id = None;
                vec![Action::BlurText]
            }
            _ => Vec::new(),
        }
    }

    fn set_cursor(&mut self, style: CursorStyle, actions: &mut Vec<Action>) {
        if self.ui.cursor != style {
            self.ui.cursor = style;
            actions.push(Action::SetCursor(style));
        }
    }

    fn viewport_changed(&self) -> Vec<Action> {
        vec![Action::ViewportChanged(self.viewport.camera()), Action::RenderNeeded]
    }
}

/// History label for a structural patch, or `None` for a text-only edit.
/// History label for the structural difference between two versions of a note.
fn change_kind(before: &Note, after: &Note) -> Option<HistoryAction> {
    if before.width != after.width || before.height != after.height {
        Some(HistoryAction::Resize)
    } else if before.x != after.x || before.y != after.y {
        Some(HistoryAction::Move)
    } else if before.color != after.color {
        Some(HistoryAction::Color)
    } else {
        None
    }
}
