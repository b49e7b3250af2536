#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::consts::{
    DELETE_BUTTON_INSET, DELETE_BUTTON_SIZE, DRAG_BAR_HEIGHT, RESIZE_HANDLE_SIZE, SWATCH_BOTTOM_INSET, SWATCH_PITCH,
    SWATCH_SIZE,
};
use crate::doc::{Note, NoteColor, NoteId};

/// Which part of a note was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// Strip along the top edge; starts a drag.
    DragBar,
    /// Close button in the top-right corner.
    DeleteButton,
    /// Square in the bottom-right corner; starts a resize.
    ResizeHandle,
    /// One of the color swatches along the bottom edge.
    Swatch(NoteColor),
    /// The text-entry area; never starts a gesture.
    Text,
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub note_id: NoteId,
    pub part: HitPart,
}

/// Find the topmost note under `canvas_pt` and the part of it that was hit.
///
/// The note holding text focus stacks above all others; otherwise later
/// notes in `notes` stack above earlier ones.
#[must_use]
pub fn hit_test(canvas_pt: Point, notes: &[Note], focused: Option<&NoteId>) -> Option<Hit> {
    if let Some(id) = focused {
        if let Some(note) = notes.iter().find(|n| &n.id == id) {
            if note.contains(canvas_pt) {
                return Some(Hit { note_id: note.id.clone(), part: classify(note, canvas_pt) });
            }
        }
    }
    notes
        .iter()
        .rev()
        .find(|n| n.contains(canvas_pt))
        .map(|note| Hit { note_id: note.id.clone(), part: classify(note, canvas_pt) })
}

/// Which part of `note` contains `pt`. Assumes `pt` is inside the note.
#[must_use]
pub fn classify(note: &Note, pt: Point) -> HitPart {
    let right = note.x + note.width;
    let bottom = note.y + note.height;

    let delete_left = right - DELETE_BUTTON_INSET - DELETE_BUTTON_SIZE;
    let delete_top = note.y + DELETE_BUTTON_INSET;
    if in_square(pt, delete_left, delete_top, DELETE_BUTTON_SIZE) {
        return HitPart::DeleteButton;
    }

    if in_square(pt, right - RESIZE_HANDLE_SIZE, bottom - RESIZE_HANDLE_SIZE, RESIZE_HANDLE_SIZE) {
        return HitPart::ResizeHandle;
    }

    if let Some(color) = swatch_at(note, pt) {
        return HitPart::Swatch(color);
    }

    if pt.y <= note.y + DRAG_BAR_HEIGHT {
        return HitPart::DragBar;
    }

    HitPart::Text
}

fn swatch_at(note: &Note, pt: Point) -> Option<NoteColor> {
    let gap = SWATCH_PITCH - SWATCH_SIZE;
    let row_width = SWATCH_PITCH * 5.0 - gap;
    let first_left = note.x + note.width / 2.0 - row_width / 2.0;
    let top = note.y + note.height - SWATCH_BOTTOM_INSET - SWATCH_SIZE;
    NoteColor::ALL.into_iter().zip(0_u32..).find_map(|(color, i)| {
        let left = first_left + f64::from(i) * SWATCH_PITCH;
        in_square(pt, left, top, SWATCH_SIZE).then_some(color)
    })
}

fn in_square(pt: Point, left: f64, top: f64, size: f64) -> bool {
    pt.x >= left && pt.x <= left + size && pt.y >= top && pt.y <= top + size
}
