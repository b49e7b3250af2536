#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::NoteColor;

// =============================================================
// Helpers
// =============================================================

fn note_at(id: &str, x: f64, y: f64) -> Note {
    Note {
        id: NoteId::from(id),
        content: String::new(),
        x,
        y,
        width: 400.0,
        height: 300.0,
        created_at: 0,
        color: NoteColor::Default,
    }
}

fn engine() -> EngineCore {
    let mut core = EngineCore::new();
    core.set_viewport_size(1280.0, 800.0);
    core
}

fn engine_with(notes: Vec<Note>) -> EngineCore {
    let mut core = engine();
    core.load_notes(notes);
    core
}

fn no_modifiers() -> Modifiers {
    Modifiers::default()
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn id(s: &str) -> NoteId {
    NoteId::from(s)
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_render_needed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::RenderNeeded))
}

fn has_cursor(actions: &[Action], style: CursorStyle) -> bool {
    has_action(actions, |a| *a == Action::SetCursor(style))
}

fn down(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_down(pt(x, y), Button::Primary, no_modifiers())
}

fn drag_to(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_move(pt(x, y), no_modifiers())
}

fn up(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_up(pt(x, y), Button::Primary, no_modifiers())
}

fn last_history_action(core: &EngineCore) -> HistoryAction {
    core.history.current().unwrap().action
}

// =============================================================
// EngineCore: construction and defaults
// =============================================================

#[test]
fn core_new_is_empty_and_idle() {
    let core = EngineCore::new();
    assert!(core.notes().is_empty());
    assert!(core.focused().is_none());
    assert!(matches!(core.input, InputState::Idle));
    assert_eq!(core.camera(), Camera::default());
    assert!(!core.can_undo());
    assert!(!core.can_redo());
}

#[test]
fn core_with_config_applies_history_limit() {
    let mut core = EngineCore::with_config(ViewportConfig::default(), 3);
    for i in 0..5 {
        core.create_note(None, i);
    }
    assert_eq!(core.history.len(), 3);
}

// =============================================================
// EngineCore: load / import
// =============================================================

#[test]
fn load_notes_resets_history() {
    let mut core = engine();
    core.create_note(None, 0);
    let actions = core.load_notes(vec![note_at("a", 0.0, 0.0)]);
    assert!(has_action(&actions, |a| matches!(a, Action::NotesReplaced)));
    assert_eq!(core.notes().len(), 1);
    assert_eq!(core.history.len(), 1);
    assert!(!core.can_undo());
}

#[test]
fn load_notes_clears_missing_focus() {
    let mut core = engine();
    core.create_note(None, 0);
    let actions = core.load_notes(vec![note_at("a", 0.0, 0.0)]);
    assert!(has_action(&actions, |a| matches!(a, Action::BlurText)));
    assert!(core.focused().is_none());
}

#[test]
fn import_is_undoable() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    core.import_notes(vec![note_at("b", 0.0, 0.0), note_at("c", 10.0, 10.0)]);
    assert_eq!(core.notes().len(), 2);
    assert_eq!(last_history_action(&core), HistoryAction::Import);

    core.undo();
    assert_eq!(core.notes().len(), 1);
    assert_eq!(core.notes()[0].id.as_str(), "a");
}

// =============================================================
// EngineCore: create
// =============================================================

#[test]
fn first_note_centers_on_viewport_and_second_is_staggered() {
    let mut core = engine();
    core.create_note(None, 0);
    core.create_note(None, 0);
    let notes = core.notes();
    assert_eq!(notes[0].center(), pt(640.0, 400.0));
    assert_eq!(notes[1].x - notes[0].x, 30.0);
    assert_eq!(notes[1].y - notes[0].y, 30.0);
}

#[test]
fn create_centers_in_panned_viewport() {
    let mut core = engine();
    core.set_camera(Camera::new(2.0, -200.0, 100.0));
    core.create_note(None, 0);
    assert_eq!(core.notes()[0].center(), pt(420.0, 150.0));
}

#[test]
fn create_emits_note_and_focus() {
    let mut core = engine();
    let actions = core.create_note(None, 42);
    let Some(Action::NoteCreated(note)) = actions.first() else {
        panic!("expected NoteCreated first, got {actions:?}");
    };
    assert_eq!(note.created_at, 42);
    assert!(has_action(&actions, |a| *a == Action::FocusText { id: note.id.clone() }));
    assert!(has_render_needed(&actions));
    assert_eq!(core.focused(), Some(&note.id));
    assert_eq!(last_history_action(&core), HistoryAction::Create);
}

// =============================================================
// EngineCore: update
// =============================================================

#[test]
fn content_edit_does_not_snapshot() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    let actions = core.update_note(&id("a"), &NotePatch::content("hello"));
    assert!(has_action(&actions, |a| matches!(a, Action::NoteUpdated { .. })));
    assert_eq!(core.note(&id("a")).unwrap().content, "hello");
    assert_eq!(core.history.len(), 1);
}

#[test]
fn structural_edits_snapshot_with_matching_label() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    core.update_note(&id("a"), &NotePatch::color(NoteColor::Amber));
    assert_eq!(last_history_action(&core), HistoryAction::Color);
    core.update_note(&id("a"), &NotePatch::position(pt(5.0, 5.0)));
    assert_eq!(last_history_action(&core), HistoryAction::Move);
    core.update_note(&id("a"), &NotePatch::size(300.0, 200.0));
    assert_eq!(last_history_action(&core), HistoryAction::Resize);
    assert_eq!(core.history.len(), 4);
}

#[test]
fn text_typed_before_structural_edit_is_captured_by_it() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    core.update_note(&id("a"), &NotePatch::content("draft"));
    core.update_note(&id("a"), &NotePatch::color(NoteColor::Blue));
    core.update_note(&id("a"), &NotePatch::content("draft, edited"));
    core.update_note(&id("a"), &NotePatch::color(NoteColor::Purple));
    core.undo();
    let note = core.note(&id("a")).unwrap();
    assert_eq!(note.content, "draft");
    assert_eq!(note.color, NoteColor::Blue);
}

#[test]
fn update_reports_clamped_values() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    let actions = core.update_note(&id("a"), &NotePatch::size(10.0, 10.0));
    let expected = NotePatch::size(250.0, 150.0);
    assert!(has_action(&actions, |a| *a == Action::NoteUpdated { id: id("a"), fields: expected.clone() }));
}

#[test]
fn update_unknown_or_empty_is_noop() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    assert!(core.update_note(&id("missing"), &NotePatch::color(NoteColor::Blue)).is_empty());
    assert!(core.update_note(&id("a"), &NotePatch::default()).is_empty());
    assert_eq!(core.history.len(), 1);
}

#[test]
fn unchanged_structural_edits_record_nothing() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    core.update_note(&id("a"), &NotePatch::color(NoteColor::Default));
    core.update_note(&id("a"), &NotePatch { x: Some(f64::NAN), ..Default::default() });
    core.update_note(&id("a"), &NotePatch::position(pt(0.0, 0.0)));
    assert_eq!(core.history.len(), 1);

    core.update_note(&id("a"), &NotePatch::size(10.0, 10.0));
    core.update_note(&id("a"), &NotePatch::size(10.0, 10.0));
    assert_eq!(core.history.len(), 2);
    assert_eq!(last_history_action(&core), HistoryAction::Resize);
}

#[test]
fn mixed_patch_is_labelled_by_what_changed() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    let patch = NotePatch { width: Some(400.0), x: Some(20.0), ..Default::default() };
    core.update_note(&id("a"), &patch);
    assert_eq!(last_history_action(&core), HistoryAction::Move);
}

// =============================================================
// EngineCore: delete
// =============================================================

#[test]
fn delete_removes_and_snapshots() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0), note_at("b", 0.0, 0.0)]);
    let actions = core.delete_note(&id("a"));
    assert!(has_action(&actions, |a| *a == Action::NoteDeleted { id: id("a") }));
    assert_eq!(core.notes().len(), 1);
    assert_eq!(last_history_action(&core), HistoryAction::Delete);
}

#[test]
fn delete_twice_is_noop_second_time() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    core.delete_note(&id("a"));
    let len = core.history.len();
    assert!(core.delete_note(&id("a")).is_empty());
    assert_eq!(core.history.len(), len);
}

#[test]
fn delete_focused_note_blurs() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    core.focus_text(&id("a"));
    let actions = core.delete_note(&id("a"));
    assert!(has_action(&actions, |a| matches!(a, Action::BlurText)));
    assert!(core.focused().is_none());
}

#[test]
fn delete_dragged_note_resets_gesture() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    core.begin_drag(&id("a"), pt(10.0, 10.0));
    core.delete_note(&id("a"));
    assert!(matches!(core.input, InputState::Idle));
    let actions = drag_to(&mut core, 50.0, 50.0);
    assert!(!has_action(&actions, |a| matches!(a, Action::NoteUpdated { .. })));
}

// =============================================================
// EngineCore: undo / redo
// =============================================================

#[test]
fn undo_create_then_redo() {
    let mut core = engine();
    core.create_note(None, 0);
    let actions = core.undo();
    assert!(core.notes().is_empty());
    assert!(has_action(&actions, |a| matches!(a, Action::NotesReplaced)));
    assert!(has_action(&actions, |a| matches!(a, Action::BlurText)));
    assert!(core.focused().is_none());

    core.redo();
    assert_eq!(core.notes().len(), 1);
}

#[test]
fn undo_redo_at_bounds_return_nothing() {
    let mut core = engine();
    assert!(core.undo().is_empty());
    assert!(core.redo().is_empty());
}

#[test]
fn undo_during_drag_commits_gesture_first() {
    let mut core = engine_with(vec![note_at("a", 100.0, 100.0)]);
    down(&mut core, 150.0, 110.0);
    drag_to(&mut core, 250.0, 210.0);
    core.undo();
    assert!(matches!(core.input, InputState::Idle));
    assert_eq!(core.note(&id("a")).unwrap().origin(), pt(100.0, 100.0));
    core.redo();
    assert_eq!(core.note(&id("a")).unwrap().origin(), pt(200.0, 200.0));
}

// =============================================================
// Gestures: drag
// =============================================================

#[test]
fn drag_bar_pointer_down_starts_drag() {
    let mut core = engine_with(vec![note_at("a", 100.0, 100.0)]);
    let actions = down(&mut core, 150.0, 110.0);
    assert!(matches!(core.input, InputState::DraggingNote { .. }));
    assert!(has_cursor(&actions, CursorStyle::Grabbing));
}

#[test]
fn drag_moves_note_and_snapshots_once() {
    let mut core = engine_with(vec![note_at("a", 100.0, 100.0)]);
    down(&mut core, 150.0, 110.0);
    for step in 1..=10 {
        let d = f64::from(step) * 10.0;
        let actions = drag_to(&mut core, 150.0 + d, 110.0 + d);
        assert!(has_render_needed(&actions));
    }
    assert_eq!(core.history.len(), 1);

    let actions = up(&mut core, 250.0, 210.0);
    assert_eq!(core.note(&id("a")).unwrap().origin(), pt(200.0, 200.0));
    assert_eq!(core.history.len(), 2);
    assert_eq!(last_history_action(&core), HistoryAction::Move);
    assert!(has_cursor(&actions, CursorStyle::Grab));
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn drag_is_zoom_corrected() {
    let mut core = engine_with(vec![note_at("a", 100.0, 100.0)]);
    core.set_camera(Camera::new(2.0, 0.0, 0.0));
    down(&mut core, 220.0, 210.0);
    drag_to(&mut core, 420.0, 410.0);
    assert_eq!(core.note(&id("a")).unwrap().origin(), pt(200.0, 200.0));
}

#[test]
fn drag_without_movement_records_nothing() {
    let mut core = engine_with(vec![note_at("a", 100.0, 100.0)]);
    down(&mut core, 150.0, 110.0);
    up(&mut core, 150.0, 110.0);
    assert_eq!(core.history.len(), 1);
}

#[test]
fn drag_reports_position_fields() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    down(&mut core, 10.0, 10.0);
    let actions = drag_to(&mut core, 20.0, 30.0);
    let expected = NotePatch::position(pt(10.0, 20.0));
    assert!(has_action(&actions, |a| *a == Action::NoteUpdated { id: id("a"), fields: expected.clone() }));
}

#[test]
fn context_menu_ends_drag_like_pointer_up() {
    let mut core = engine_with(vec![note_at("a", 100.0, 100.0)]);
    down(&mut core, 150.0, 110.0);
    drag_to(&mut core, 160.0, 120.0);
    core.on_context_menu(pt(160.0, 120.0));
    assert!(matches!(core.input, InputState::Idle));
    assert_eq!(last_history_action(&core), HistoryAction::Move);
    let actions = drag_to(&mut core, 400.0, 400.0);
    assert!(!has_action(&actions, |a| matches!(a, Action::NoteUpdated { .. })));
}

// =============================================================
// Gestures: resize
// =============================================================

#[test]
fn resize_uses_screen_deltas() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    core.set_camera(Camera::new(2.0, 0.0, 0.0));
    let actions = down(&mut core, 780.0, 580.0);
    assert!(matches!(core.input, InputState::ResizingNote { .. }));
    assert!(has_cursor(&actions, CursorStyle::NwseResize));

    drag_to(&mut core, 880.0, 680.0);
    let note = core.note(&id("a")).unwrap();
    assert_eq!(note.width, 500.0);
    assert_eq!(note.height, 400.0);

    up(&mut core, 880.0, 680.0);
    assert_eq!(last_history_action(&core), HistoryAction::Resize);
}

#[test]
fn resize_floors_at_minimum() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    down(&mut core, 390.0, 290.0);
    let actions = drag_to(&mut core, 90.0, 90.0);
    let note = core.note(&id("a")).unwrap();
    assert_eq!(note.width, 250.0);
    assert_eq!(note.height, 150.0);
    let expected = NotePatch::size(250.0, 150.0);
    assert!(has_action(&actions, |a| *a == Action::NoteUpdated { id: id("a"), fields: expected.clone() }));
}

// =============================================================
// Gestures: chrome clicks
// =============================================================

#[test]
fn delete_button_click_deletes() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    let actions = down(&mut core, 376.0, 24.0);
    assert!(has_action(&actions, |a| *a == Action::NoteDeleted { id: id("a") }));
    assert!(core.notes().is_empty());
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn swatch_click_recolors() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    down(&mut core, 172.0, 270.0);
    assert_eq!(core.note(&id("a")).unwrap().color, NoteColor::Blue);
    assert_eq!(last_history_action(&core), HistoryAction::Color);
}

#[test]
fn swatch_click_on_current_color_records_nothing() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    down(&mut core, 144.0, 270.0);
    assert_eq!(core.note(&id("a")).unwrap().color, NoteColor::Default);
    assert_eq!(core.history.len(), 1);
    assert!(!core.can_undo());
}

#[test]
fn text_click_focuses() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    let actions = down(&mut core, 200.0, 150.0);
    assert!(has_action(&actions, |a| *a == Action::FocusText { id: id("a") }));
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn empty_click_blurs_without_panning() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    core.focus_text(&id("a"));
    let actions = down(&mut core, 900.0, 700.0);
    assert!(has_action(&actions, |a| matches!(a, Action::BlurText)));
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn secondary_button_is_ignored() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    let actions = core.on_pointer_down(pt(10.0, 10.0), Button::Secondary, no_modifiers());
    assert!(actions.is_empty());
    assert!(matches!(core.input, InputState::Idle));
}

// =============================================================
// Gestures: panning
// =============================================================

#[test]
fn empty_drag_pans_when_enabled() {
    let mut core = engine();
    core.set_panning_enabled(true);
    let actions = down(&mut core, 1000.0, 700.0);
    assert!(has_cursor(&actions, CursorStyle::Grabbing));

    let actions = drag_to(&mut core, 1010.0, 690.0);
    assert!(has_action(&actions, |a| matches!(a, Action::ViewportChanged(_))));
    let cam = core.camera();
    assert_eq!(cam.translate_x, 10.0);
    assert_eq!(cam.translate_y, -10.0);

    up(&mut core, 1010.0, 690.0);
    assert!(matches!(core.input, InputState::Idle));
}

// =============================================================
// Double-click
// =============================================================

#[test]
fn double_click_empty_creates_note_centered_on_cursor() {
    let mut core = engine();
    core.set_camera(Camera::new(0.5, 100.0, 0.0));
    let actions = core.on_double_click(pt(300.0, 200.0), 0);
    assert!(has_action(&actions, |a| matches!(a, Action::NoteCreated(_))));
    assert_eq!(core.notes()[0].center(), pt(400.0, 400.0));
    assert!(core.focused().is_some());
}

#[test]
fn double_click_on_note_is_ignored() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    assert!(core.on_double_click(pt(200.0, 150.0), 0).is_empty());
    assert_eq!(core.notes().len(), 1);
}

// =============================================================
// Hover, wheel, camera
// =============================================================

#[test]
fn hover_emits_cursor_only_on_change() {
    let mut core = engine_with(vec![note_at("a", 0.0, 0.0)]);
    let actions = drag_to(&mut core, 100.0, 10.0);
    assert!(has_cursor(&actions, CursorStyle::Grab));
    assert!(drag_to(&mut core, 110.0, 12.0).is_empty());
    let actions = drag_to(&mut core, 200.0, 150.0);
    assert!(has_cursor(&actions, CursorStyle::Text));
    let actions = drag_to(&mut core, 900.0, 700.0);
    assert!(has_cursor(&actions, CursorStyle::Default));
}

#[test]
fn wheel_zooms_and_reports_camera() {
    let mut core = engine();
    let actions = core.on_wheel(pt(640.0, 400.0), WheelDelta { dx: 0.0, dy: -100.0 }, no_modifiers());
    assert!(has_action(&actions, |a| matches!(a, Action::ViewportChanged(c) if c.scale > 1.0)));
}

#[test]
fn wheel_disabled_in_focus_mode() {
    let mut core = engine();
    core.set_wheel_enabled(false);
    assert!(core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: -100.0 }, no_modifiers()).is_empty());
}

#[test]
fn invalid_camera_is_ignored() {
    let mut core = engine();
    assert!(core.set_camera(Camera::new(0.0, 0.0, 0.0)).is_empty());
    assert_eq!(core.camera(), Camera::default());
}

#[test]
fn begin_drag_unknown_note_is_noop() {
    let mut core = engine();
    assert!(core.begin_drag(&id("ghost"), pt(0.0, 0.0)).is_empty());
    assert!(core.begin_resize(&id("ghost"), pt(0.0, 0.0)).is_empty());
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn changes_notes_classification() {
    assert!(Action::NotesReplaced.changes_notes());
    assert!(Action::NoteDeleted { id: id("a") }.changes_notes());
    assert!(!Action::RenderNeeded.changes_notes());
    assert!(!Action::BlurText.changes_notes());
    assert!(!Action::SetCursor(CursorStyle::Grab).changes_notes());
}
