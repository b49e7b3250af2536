//! Global keyboard shortcuts.
//!
//! `dispatch` maps a key press to a [`Command`] given where keyboard focus is.
//! Inside a text field only New Note and Escape are intercepted, so native text
//! editing (including the browser's own undo) keeps working.

use canvas::input::{Key, Modifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NewNote,
    Undo,
    Redo,
    ToggleBackgrounds,
    ToggleAudio,
    ToggleFocus,
    ToggleShortcuts,
    BlurText,
    CloseModal,
    ExitFocus,
}

/// Where keyboard focus is when the key arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortcutContext {
    pub in_text_field: bool,
    pub modal_open: bool,
    pub focus_mode: bool,
}

/// Shortcut help rows: `(keys, description)`.
pub const SHORTCUT_HELP: [(&str, &str); 8] = [
    ("Ctrl+N", "New note"),
    ("Ctrl+Z", "Undo"),
    ("Ctrl+Shift+Z / Ctrl+Y", "Redo"),
    ("Ctrl+B", "Background"),
    ("Ctrl+M", "Audio"),
    ("Ctrl+F", "Focus mode"),
    ("Ctrl+/ or ?", "Shortcuts"),
    ("Esc", "Close / exit"),
];

#[must_use]
pub fn dispatch(key: &Key, modifiers: Modifiers, ctx: ShortcutContext) -> Option<Command> {
    if key.is("Escape") {
        return if ctx.in_text_field {
            Some(Command::BlurText)
        } else if ctx.modal_open {
            Some(Command::CloseModal)
        } else if ctx.focus_mode {
            Some(Command::ExitFocus)
        } else {
            None
        };
    }

    if modifiers.command() {
        if key.is("n") {
            return Some(Command::NewNote);
        }
        if ctx.in_text_field {
            return None;
        }
        return match key.0.to_ascii_lowercase().as_str() {
            "z" if modifiers.shift => Some(Command::Redo),
            "z" => Some(Command::Undo),
            "y" => Some(Command::Redo),
            "b" => Some(Command::ToggleBackgrounds),
            "m" => Some(Command::ToggleAudio),
            "f" => Some(Command::ToggleFocus),
            "/" => Some(Command::ToggleShortcuts),
            _ => None,
        };
    }

    if key.0 == "?" && !ctx.in_text_field {
        return Some(Command::ToggleShortcuts);
    }
    None
}

#[cfg(test)]
#[path = "shortcuts_test.rs"]
mod tests;
