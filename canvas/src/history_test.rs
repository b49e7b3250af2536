use super::*;
use crate::doc::{NoteColor, NoteId, NotePatch, NoteStore};

fn note(id: &str) -> Note {
    Note {
        id: NoteId::from(id),
        content: String::new(),
        x: 0.0,
        y: 0.0,
        width: 400.0,
        height: 300.0,
        created_at: 0,
        color: NoteColor::Default,
    }
}

fn ids(notes: &[Note]) -> Vec<&str> {
    notes.iter().map(|n| n.id.as_str()).collect()
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_history_has_single_init_entry() {
    let history = History::new(&[note("a")]);
    assert_eq!(history.len(), 1);
    assert_eq!(history.cursor(), 0);
    assert_eq!(history.limit(), HISTORY_LIMIT);
    let current = history.current().unwrap();
    assert_eq!(current.action, HistoryAction::Init);
    assert_eq!(ids(&current.notes), ["a"]);
    assert!(!history.can_undo());
    assert!(!history.can_redo());
}

#[test]
fn zero_limit_is_raised_to_one() {
    let history = History::with_limit(&[], 0);
    assert_eq!(history.limit(), 1);
}

#[test]
fn action_labels() {
    assert_eq!(HistoryAction::Init.to_string(), "init");
    assert_eq!(HistoryAction::Resize.as_str(), "resize");
    assert_eq!(serde_json::to_string(&HistoryAction::Import).unwrap(), "\"import\"");
}

// =============================================================
// Undo / redo
// =============================================================

#[test]
fn undo_returns_previous_state_and_redo_returns_next() {
    let mut history = History::new(&[]);
    history.save_state(&[note("a")], HistoryAction::Create);
    history.save_state(&[note("a"), note("b")], HistoryAction::Create);

    assert_eq!(ids(history.undo().unwrap()), ["a"]);
    assert_eq!(ids(history.redo().unwrap()), ["a", "b"]);
}

#[test]
fn undo_at_start_returns_none() {
    let mut history = History::new(&[]);
    assert!(history.undo().is_none());
    assert_eq!(history.cursor(), 0);
}

#[test]
fn redo_at_end_returns_none() {
    let mut history = History::new(&[]);
    history.save_state(&[note("a")], HistoryAction::Create);
    assert!(history.redo().is_none());
    assert_eq!(history.cursor(), 1);
}

#[test]
fn undo_walks_back_to_initial_state() {
    let mut history = History::new(&[note("seed")]);
    history.save_state(&[note("seed"), note("a")], HistoryAction::Create);
    history.save_state(&[note("a")], HistoryAction::Delete);
    assert!(history.undo().is_some());
    assert_eq!(ids(history.undo().unwrap()), ["seed"]);
    assert!(history.undo().is_none());
}

#[test]
fn save_after_undo_discards_redo_branch() {
    let mut history = History::new(&[]);
    history.save_state(&[note("a")], HistoryAction::Create);
    history.save_state(&[note("a"), note("b")], HistoryAction::Create);
    history.undo();
    history.save_state(&[note("a"), note("c")], HistoryAction::Create);

    assert_eq!(history.len(), 3);
    assert!(!history.can_redo());
    assert_eq!(ids(history.undo().unwrap()), ["a"]);
    assert_eq!(ids(history.redo().unwrap()), ["a", "c"]);
}

#[test]
fn snapshots_are_deep_copies() {
    let mut history = History::new(&[]);
    let mut live = vec![note("a")];
    history.save_state(&live, HistoryAction::Create);
    live[0].content = "changed".into();
    assert_eq!(history.current().unwrap().notes[0].content, "");
}

#[test]
fn store_snapshot_is_shared_until_the_store_changes() {
    let mut store = NoteStore::from_notes(vec![note("a")]);
    let mut history = History::new(store.notes());
    history.save_snapshot(store.snapshot(), HistoryAction::Create);
    assert!(Arc::ptr_eq(&history.current().unwrap().notes, &store.snapshot()));

    store.update(&NoteId::from("a"), &NotePatch::content("edited"));
    assert_eq!(history.current().unwrap().notes[0].content, "");
    assert_eq!(store.notes()[0].content, "edited");
}

// =============================================================
// Bound
// =============================================================

#[test]
fn sixty_saves_keep_most_recent_fifty() {
    let mut history = History::new(&[]);
    for i in 0..60 {
        history.save_state(&[note(&format!("n{i}"))], HistoryAction::Create);
    }
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert_eq!(history.cursor(), HISTORY_LIMIT - 1);
    assert_eq!(ids(&history.current().unwrap().notes), ["n59"]);

    let oldest = history.entries().next().unwrap();
    assert_eq!(ids(&oldest.notes), ["n10"]);

    let mut depth = 0;
    while history.undo().is_some() {
        depth += 1;
    }
    assert_eq!(depth, HISTORY_LIMIT - 1);
    assert_eq!(ids(&history.current().unwrap().notes), ["n10"]);
}

#[test]
fn eviction_drops_init_entry_first() {
    let mut history = History::with_limit(&[note("seed")], 3);
    history.save_state(&[note("a")], HistoryAction::Create);
    history.save_state(&[note("b")], HistoryAction::Create);
    history.save_state(&[note("c")], HistoryAction::Create);
    let actions: Vec<_> = history.entries().map(|e| e.action).collect();
    assert!(!actions.contains(&HistoryAction::Init));
    assert_eq!(history.cursor(), 2);
}

#[test]
fn reset_reseeds_history() {
    let mut history = History::new(&[]);
    history.save_state(&[note("a")], HistoryAction::Create);
    history.reset(&[note("x")]);
    assert_eq!(history.len(), 1);
    assert_eq!(history.cursor(), 0);
    assert_eq!(ids(&history.current().unwrap().notes), ["x"]);
}
