//! Document model: notes, their properties, and the in-memory store.
//!
//! This module defines the record that describes a sticky note on the canvas
//! (`Note`), a sparse-update type for incremental edits (`NotePatch`), and the
//! runtime store that owns the ordered note collection (`NoteStore`).
//!
//! Positions and sizes are canvas coordinates, never screen pixels. The store
//! keeps its collection behind an `Arc`, so taking a snapshot is free and a
//! snapshot is never affected by later edits: every mutation copies the
//! collection first if anyone else still holds it.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_WIDTH, MIN_NOTE_HEIGHT, MIN_NOTE_WIDTH, STAGGER_CYCLE, STAGGER_STEP};

/// Unique identifier for a note.
///
/// Newly issued ids are time-ordered UUIDv7 strings. Ids written by older
/// builds (plain millisecond timestamps) are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Issue a new time-ordered id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tint applied to a note's glass panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    #[default]
    Default,
    Blue,
    Purple,
    Amber,
    Emerald,
}

impl NoteColor {
    /// Every color in swatch order.
    pub const ALL: [NoteColor; 5] = [Self::Default, Self::Blue, Self::Purple, Self::Amber, Self::Emerald];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Amber => "amber",
            Self::Emerald => "emerald",
        }
    }

    /// Parse a lowercase color name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

/// A sticky note as stored in the document and in persisted JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier for this note.
    pub id: NoteId,
    /// Free text typed into the note.
    #[serde(default)]
    pub content: String,
    /// Left edge in canvas coordinates.
    pub x: f64,
    /// Top edge in canvas coordinates.
    pub y: f64,
    /// Width in canvas units.
    pub width: f64,
    /// Height in canvas units.
    pub height: f64,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Panel tint.
    #[serde(default)]
    pub color: NoteColor,
}

impl Note {
    /// Top-left corner in canvas coordinates.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Center in canvas coordinates.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether `pt` (canvas coordinates) lies inside the note's bounds.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }

    /// Position and size are equal to `other`'s.
    #[must_use]
    pub fn same_geometry(&self, other: &Note) -> bool {
        self.x == other.x && self.y == other.y && self.width == other.width && self.height == other.height
    }

    fn sanitize(&mut self) {
        if !self.x.is_finite() {
            self.x = 0.0;
        }
        if !self.y.is_finite() {
            self.y = 0.0;
        }
        self.width = clamp_width(self.width);
        self.height = clamp_height(self.height);
    }
}

/// Sparse update for a note. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<NoteColor>,
}

impl NotePatch {
    #[must_use]
    pub fn position(origin: Point) -> Self {
        Self { x: Some(origin.x), y: Some(origin.y), ..Default::default() }
    }

    #[must_use]
    pub fn size(width: f64, height: f64) -> Self {
        Self { width: Some(width), height: Some(height), ..Default::default() }
    }

    #[must_use]
    pub fn content(text: impl Into<String>) -> Self {
        Self { content: Some(text.into()), ..Default::default() }
    }

    #[must_use]
    pub fn color(color: NoteColor) -> Self {
        Self { color: Some(color), ..Default::default() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Touches position or size.
    #[must_use]
    pub fn touches_geometry(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.width.is_some() || self.height.is_some()
    }

    /// Touches anything other than the free text.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        self.touches_geometry() || self.color.is_some()
    }
}

fn clamp_width(width: f64) -> f64 {
    if width.is_finite() { width.max(MIN_NOTE_WIDTH) } else { DEFAULT_NOTE_WIDTH }
}

fn clamp_height(height: f64) -> f64 {
    if height.is_finite() { height.max(MIN_NOTE_HEIGHT) } else { DEFAULT_NOTE_HEIGHT }
}

/// Ordered in-memory collection of notes. Later notes stack above earlier ones.
#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    notes: Arc<Vec<Note>>,
}

impl NoteStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from a loaded collection. See [`NoteStore::replace`].
    #[must_use]
    pub fn from_notes(notes: Vec<Note>) -> Self {
        let mut store = Self::new();
        store.replace(notes);
        store
    }

    /// Replace the whole collection.
    ///
    /// Sizes are floored, non-finite positions reset to the origin, and only
    /// the first note carrying a given id is kept.
    pub fn replace(&mut self, notes: Vec<Note>) {
        let mut seen = HashSet::new();
        let mut sanitized = Vec::with_capacity(notes.len());
        for mut note in notes {
            if !seen.insert(note.id.clone()) {
                tracing::debug!(id = %note.id, "dropping duplicate note id");
                continue;
            }
            note.sanitize();
            sanitized.push(note);
        }
        self.notes = Arc::new(sanitized);
    }

    /// Create a note and append it to the collection.
    ///
    /// With an explicit `position` the note's top-left corner lands there.
    /// Otherwise the note is centered on `viewport_center` (canvas
    /// coordinates) and pushed diagonally by one stagger step per existing
    /// note, wrapping every [`STAGGER_CYCLE`] notes.
    pub fn create(&mut self, position: Option<Point>, viewport_center: Point, created_at: i64) -> Note {
        let origin = match position {
            Some(p) if p.is_finite() => p,
            _ => {
                let steps = u32::try_from(self.notes.len() % STAGGER_CYCLE).unwrap_or(0);
                let offset = f64::from(steps) * STAGGER_STEP;
                Point::new(
                    viewport_center.x - DEFAULT_NOTE_WIDTH / 2.0 + offset,
                    viewport_center.y - DEFAULT_NOTE_HEIGHT / 2.0 + offset,
                )
            }
        };
        let mut note = Note {
            id: self.fresh_id(),
            content: String::new(),
            x: origin.x,
            y: origin.y,
            width: DEFAULT_NOTE_WIDTH,
            height: DEFAULT_NOTE_HEIGHT,
            created_at,
            color: NoteColor::Default,
        };
        note.sanitize();
        Arc::make_mut(&mut self.notes).push(note.clone());
        note
    }

    /// Merge `patch` into the note with `id`. Returns false if no such note exists.
    ///
    /// Non-finite coordinates in the patch are ignored and sizes are floored
    /// at the resize minimum.
    pub fn update(&mut self, id: &NoteId, patch: &NotePatch) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let note = &mut Arc::make_mut(&mut self.notes)[index];
        if let Some(ref content) = patch.content {
            note.content.clone_from(content);
        }
        if let Some(x) = patch.x.filter(|v| v.is_finite()) {
            note.x = x;
        }
        if let Some(y) = patch.y.filter(|v| v.is_finite()) {
            note.y = y;
        }
        if let Some(w) = patch.width.filter(|v| v.is_finite()) {
            note.width = clamp_width(w);
        }
        if let Some(h) = patch.height.filter(|v| v.is_finite()) {
            note.height = clamp_height(h);
        }
        if let Some(color) = patch.color {
            note.color = color;
        }
        true
    }

    /// Remove a note by id, returning it if it was present.
    pub fn delete(&mut self, id: &NoteId) -> Option<Note> {
        let index = self.index_of(id)?;
        Some(Arc::make_mut(&mut self.notes).remove(index))
    }

    /// Return a reference to a note by id.
    #[must_use]
    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &NoteId) -> bool {
        self.index_of(id).is_some()
    }

    /// All notes in stacking order.
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// A handle to the current collection that later edits will not touch.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<Note>> {
        Arc::clone(&self.notes)
    }

    /// Number of notes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Returns `true` if the store contains no notes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    fn index_of(&self, id: &NoteId) -> Option<usize> {
        self.notes.iter().position(|n| &n.id == id)
    }

    fn fresh_id(&self) -> NoteId {
        loop {
            let id = NoteId::generate();
            if !self.contains(&id) {
                return id;
            }
        }
    }
}
