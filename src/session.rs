//! A running board.
//!
//! `Session` owns the canvas engine together with everything around it: the
//! key-value store the notes live in, the selected wallpaper and track, the
//! open panels, and focus mode. Fullscreen and audio playback go through the
//! [`Fullscreen`] and [`AudioOutput`] traits so a host can plug in its
//! platform and tests can plug in fakes.
//!
//! Platform failures never abort an operation. A denied fullscreen request
//! still enters focus mode, and blocked autoplay is retried on the next
//! click or key press.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use canvas::camera::Point;
use canvas::doc::{Note, NoteId, NotePatch};
use canvas::engine::{Action, EngineCore};
use canvas::input::{Button, Key, Modifiers};
use time::Date;

use crate::catalog::{self, AudioTrack, BackgroundImage, Direction, GRID_COLUMNS};
use crate::config::AppConfig;
use crate::export::{self, ExportError};
use crate::shortcuts::{self, Command, ShortcutContext};
use crate::storage::{self, BACKGROUND_KEY, KeyValueStore, NOTES_KEY, StorageError, TRACK_KEY};

pub const DEFAULT_VOLUME: f64 = 0.25;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("request denied: {0}")]
    Denied(String),
    #[error("playback blocked until user interaction")]
    AutoplayBlocked,
}

pub trait Fullscreen {
    fn request(&mut self) -> Result<(), PlatformError>;
    fn exit(&mut self) -> Result<(), PlatformError>;
    fn is_active(&self) -> bool;
}

pub trait AudioOutput {
    /// Replace the current source. Playback is stopped until [`AudioOutput::play`].
    fn load(&mut self, url: &str, volume: f64, looping: bool) -> Result<(), PlatformError>;
    fn play(&mut self) -> Result<(), PlatformError>;
    fn pause(&mut self);
    fn set_volume(&mut self, volume: f64);
}

/// Platform for hosts with no display or audio device. Every request succeeds.
#[derive(Debug, Default)]
pub struct Headless {
    fullscreen: bool,
}

impl Fullscreen for Headless {
    fn request(&mut self) -> Result<(), PlatformError> {
        self.fullscreen = true;
        Ok(())
    }

    fn exit(&mut self) -> Result<(), PlatformError> {
        self.fullscreen = false;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.fullscreen
    }
}

impl AudioOutput for Headless {
    fn load(&mut self, _url: &str, _volume: f64, _looping: bool) -> Result<(), PlatformError> {
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn set_volume(&mut self, _volume: f64) {}
}

/// Ambient playback state.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioState {
    pub track: Option<AudioTrack>,
    pub playing: bool,
    pub volume: f64,
    pub looping: bool,
    /// Autoplay was refused; the next user interaction retries.
    pub awaiting_interaction: bool,
    loaded: Option<String>,
}

impl AudioState {
    #[must_use]
    pub fn new(track: Option<AudioTrack>) -> Self {
        Self { track, playing: true, volume: DEFAULT_VOLUME, looping: true, awaiting_interaction: false, loaded: None }
    }

    /// Id of the track currently loaded into the output.
    #[must_use]
    pub fn loaded(&self) -> Option<&str> {
        self.loaded.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Backgrounds,
    Audio,
    Shortcuts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Panels {
    pub backgrounds: bool,
    pub audio: bool,
    pub shortcuts: bool,
}

impl Panels {
    #[must_use]
    pub fn is_open(&self, panel: Panel) -> bool {
        match panel {
            Panel::Backgrounds => self.backgrounds,
            Panel::Audio => self.audio,
            Panel::Shortcuts => self.shortcuts,
        }
    }

    #[must_use]
    pub fn any_open(&self) -> bool {
        self.backgrounds || self.audio || self.shortcuts
    }

    /// The panel drawn on top: shortcuts, then audio, then wallpapers.
    #[must_use]
    pub fn topmost(&self) -> Option<Panel> {
        [Panel::Shortcuts, Panel::Audio, Panel::Backgrounds].into_iter().find(|p| self.is_open(*p))
    }

    fn set(&mut self, panel: Panel, open: bool) {
        match panel {
            Panel::Backgrounds => self.backgrounds = open,
            Panel::Audio => self.audio = open,
            Panel::Shortcuts => self.shortcuts = open,
        }
    }
}

pub struct Session<S, F, A> {
    engine: EngineCore,
    store: S,
    fullscreen: F,
    audio_out: A,
    background: BackgroundImage,
    audio: AudioState,
    panels: Panels,
    focus_mode: bool,
    picker_index: usize,
}

impl<S, F, A> Session<S, F, A>
where
    S: KeyValueStore,
    F: Fullscreen,
    A: AudioOutput,
{
    /// Restore notes, wallpaper and track from `store` and start playback.
    pub fn open(store: S, fullscreen: F, audio_out: A, config: &AppConfig) -> Self {
        let mut engine = EngineCore::with_config(config.viewport_config(), config.history_limit);
        engine.set_viewport_size(config.viewport_width, config.viewport_height);
        engine.load_notes(storage::load_or(&store, NOTES_KEY, Vec::new()));
        let background = storage::load_or(&store, BACKGROUND_KEY, catalog::default_background());
        let track: Option<AudioTrack> = storage::load_or(&store, TRACK_KEY, Some(catalog::default_track()));
        tracing::info!(notes = engine.notes().len(), background = %background.name, "session opened");

        let mut session = Self {
            engine,
            store,
            fullscreen,
            audio_out,
            background,
            audio: AudioState::new(track),
            panels: Panels::default(),
            focus_mode: false,
            picker_index: 0,
        };
        session.sync_audio();
        session
    }

    // --- Accessors ---

    #[must_use]
    pub fn engine(&self) -> &EngineCore {
        &self.engine
    }

    #[must_use]
    pub fn notes(&self) -> &[Note] {
        self.engine.notes()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn fullscreen(&self) -> &F {
        &self.fullscreen
    }

    pub fn fullscreen_mut(&mut self) -> &mut F {
        &mut self.fullscreen
    }

    #[must_use]
    pub fn audio_output(&self) -> &A {
        &self.audio_out
    }

    pub fn audio_output_mut(&mut self) -> &mut A {
        &mut self.audio_out
    }

    #[must_use]
    pub fn background(&self) -> &BackgroundImage {
        &self.background
    }

    #[must_use]
    pub fn audio(&self) -> &AudioState {
        &self.audio
    }

    #[must_use]
    pub fn panels(&self) -> Panels {
        self.panels
    }

    #[must_use]
    pub fn focus_mode(&self) -> bool {
        self.focus_mode
    }

    /// Highlighted cell in the wallpaper picker.
    #[must_use]
    pub fn picker_index(&self) -> usize {
        self.picker_index
    }

    // --- Notes ---

    /// Run an engine operation and persist the notes if it changed them.
    pub fn with_engine<R>(&mut self, op: R) -> Result<Vec<Action>, StorageError>
    where
        R: FnOnce(&mut EngineCore) -> Vec<Action>,
    {
        let actions = op(&mut self.engine);
        if actions.iter().any(Action::changes_notes) {
            storage::save(&mut self.store, NOTES_KEY, self.engine.notes())?;
        }
        Ok(actions)
    }

    pub fn create_note(&mut self, position: Option<Point>) -> Result<Vec<Action>, StorageError> {
        let now = now_ms();
        self.with_engine(|e| e.create_note(position, now))
    }

    pub fn update_note(&mut self, id: &NoteId, patch: &NotePatch) -> Result<Vec<Action>, StorageError> {
        self.with_engine(|e| e.update_note(id, patch))
    }

    pub fn delete_note(&mut self, id: &NoteId) -> Result<Vec<Action>, StorageError> {
        self.with_engine(|e| e.delete_note(id))
    }

    pub fn undo(&mut self) -> Result<Vec<Action>, StorageError> {
        self.with_engine(EngineCore::undo)
    }

    pub fn redo(&mut self) -> Result<Vec<Action>, StorageError> {
        self.with_engine(EngineCore::redo)
    }

    pub fn import_notes(&mut self, notes: Vec<Note>) -> Result<Vec<Action>, StorageError> {
        self.with_engine(|e| e.import_notes(notes))
    }

    /// Write the current notes to a dated export file in `dir`.
    pub fn export_to(&self, dir: &Path, date: Date) -> Result<PathBuf, ExportError> {
        export::write_export(dir, self.engine.notes(), date)
    }

    // --- Input ---

    pub fn on_pointer_down(
        &mut self,
        screen_pt: Point,
        button: Button,
        modifiers: Modifiers,
    ) -> Result<Vec<Action>, StorageError> {
        self.on_user_interaction();
        self.with_engine(|e| e.on_pointer_down(screen_pt, button, modifiers))
    }

    pub fn on_double_click(&mut self, screen_pt: Point) -> Result<Vec<Action>, StorageError> {
        self.on_user_interaction();
        let now = now_ms();
        self.with_engine(|e| e.on_double_click(screen_pt, now))
    }

    /// Route a key press: open panels get their navigation keys first, then
    /// global shortcuts apply.
    pub fn on_key_down(
        &mut self,
        key: &Key,
        modifiers: Modifiers,
        in_text_field: bool,
    ) -> Result<Vec<Action>, StorageError> {
        self.on_user_interaction();
        if !in_text_field && !modifiers.command() && self.panel_key(key)? {
            return Ok(Vec::new());
        }
        let ctx = ShortcutContext { in_text_field, modal_open: self.panels.any_open(), focus_mode: self.focus_mode };
        match shortcuts::dispatch(key, modifiers, ctx) {
            Some(command) => self.execute(command),
            None => Ok(Vec::new()),
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Vec<Action>, StorageError> {
        tracing::debug!(?command, "executing command");
        match command {
            Command::NewNote => self.create_note(None),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::ToggleBackgrounds => self.toggle_panel(Panel::Backgrounds).map(|()| Vec::new()),
            Command::ToggleAudio => self.toggle_panel(Panel::Audio).map(|()| Vec::new()),
            Command::ToggleShortcuts => self.toggle_panel(Panel::Shortcuts).map(|()| Vec::new()),
            Command::ToggleFocus => {
                self.toggle_focus();
                Ok(Vec::new())
            }
            Command::BlurText => Ok(self.engine.blur_text()),
            Command::CloseModal => {
                self.close_topmost();
                Ok(Vec::new())
            }
            Command::ExitFocus => {
                self.exit_focus();
                Ok(Vec::new())
            }
        }
    }

    fn panel_key(&mut self, key: &Key) -> Result<bool, StorageError> {
        let confirm = key.is("Enter") || key.0 == " ";
        let direction = Direction::from_key(&key.0);
        match self.panels.topmost() {
            Some(Panel::Backgrounds) => {
                if let Some(direction) = direction {
                    self.picker_index =
                        catalog::grid_step(self.picker_index, catalog::backgrounds().len(), direction, GRID_COLUMNS);
                    return Ok(true);
                }
                if confirm {
                    let id = catalog::backgrounds().get(self.picker_index).map(|b| b.id.clone());
                    if let Some(id) = id {
                        self.select_background(&id)?;
                    }
                    return Ok(true);
                }
                Ok(false)
            }
            Some(Panel::Audio) => {
                if let Some(direction @ (Direction::Up | Direction::Down)) = direction {
                    let all = catalog::tracks();
                    let current = self.track_index().unwrap_or(0);
                    let next = catalog::list_step(current, all.len(), direction);
                    if let Some(track) = all.get(next) {
                        self.select_track(Some(track.id.as_str()))?;
                    }
                    return Ok(true);
                }
                if confirm {
                    self.toggle_playing();
                    return Ok(true);
                }
                Ok(false)
            }
            Some(Panel::Shortcuts) | None => Ok(false),
        }
    }

    // --- Panels ---

    pub fn toggle_panel(&mut self, panel: Panel) -> Result<(), StorageError> {
        let open = !self.panels.is_open(panel);
        self.panels.set(panel, open);
        if !open {
            return Ok(());
        }
        match panel {
            Panel::Backgrounds => {
                self.picker_index =
                    catalog::backgrounds().iter().position(|b| b.id == self.background.id).unwrap_or(0);
            }
            Panel::Audio => {
                if self.audio.track.is_none() {
                    let first = catalog::default_track();
                    self.select_track(Some(first.id.as_str()))?;
                }
            }
            Panel::Shortcuts => {}
        }
        Ok(())
    }

    /// Close the topmost open panel, if any.
    pub fn close_topmost(&mut self) -> Option<Panel> {
        let panel = self.panels.topmost()?;
        self.panels.set(panel, false);
        Some(panel)
    }

    // --- Wallpaper ---

    /// Select and persist a wallpaper by id. Closes the picker. Unknown ids return `false`.
    pub fn select_background(&mut self, id: &str) -> Result<bool, StorageError> {
        let Some(background) = catalog::find_background(id) else {
            return Ok(false);
        };
        storage::save(&mut self.store, BACKGROUND_KEY, &background)?;
        tracing::debug!(id = %background.id, name = %background.name, "background selected");
        self.background = background;
        self.panels.backgrounds = false;
        Ok(true)
    }

    // --- Focus mode ---

    /// Enter or leave focus mode. Fullscreen failures are logged and ignored.
    pub fn toggle_focus(&mut self) {
        if self.focus_mode {
            self.exit_focus();
            return;
        }
        if let Err(e) = self.fullscreen.request() {
            tracing::warn!(error = %e, "fullscreen request failed; entering focus mode anyway");
        }
        self.focus_mode = true;
        self.engine.set_wheel_enabled(false);
        tracing::debug!("focus mode on");
    }

    pub fn exit_focus(&mut self) {
        if !self.focus_mode {
            return;
        }
        if self.fullscreen.is_active() {
            if let Err(e) = self.fullscreen.exit() {
                tracing::warn!(error = %e, "exit fullscreen failed");
            }
        }
        self.leave_focus();
    }

    /// The platform left fullscreen on its own (e.g. the user pressed Escape).
    pub fn on_fullscreen_change(&mut self, active: bool) {
        if !active && self.focus_mode {
            self.leave_focus();
        }
    }

    fn leave_focus(&mut self) {
        self.focus_mode = false;
        self.engine.set_wheel_enabled(true);
        tracing::debug!("focus mode off");
    }

    // --- Audio ---

    /// Select and persist a track by id, or clear it with `None`.
    /// Unknown ids return `false`.
    pub fn select_track(&mut self, id: Option<&str>) -> Result<bool, StorageError> {
        let track = match id {
            Some(id) => match catalog::find_track(id) {
                Some(track) => Some(track),
                None => return Ok(false),
            },
            None => None,
        };
        storage::save(&mut self.store, TRACK_KEY, &track)?;
        self.audio.track = track;
        self.sync_audio();
        Ok(true)
    }

    pub fn set_playing(&mut self, playing: bool) {
        if playing && self.audio.track.is_none() {
            return;
        }
        self.audio.playing = playing;
        self.sync_audio();
    }

    pub fn toggle_playing(&mut self) {
        self.set_playing(!self.audio.playing);
    }

    pub fn stop(&mut self) {
        self.set_playing(false);
    }

    /// Set volume in `0.0..=1.0`. Non-finite values are ignored.
    pub fn set_volume(&mut self, volume: f64) {
        if !volume.is_finite() {
            return;
        }
        self.audio.volume = volume.clamp(0.0, 1.0);
        self.audio_out.set_volume(self.audio.volume);
    }

    /// Bring the output in line with [`AudioState`]: load the selected track
    /// if it is not already loaded, then play or pause.
    pub fn sync_audio(&mut self) {
        let Some(track) = &self.audio.track else {
            self.audio_out.pause();
            return;
        };
        if self.audio.loaded.as_deref() != Some(track.id.as_str()) {
            self.audio_out.pause();
            if let Err(e) = self.audio_out.load(&track.url, self.audio.volume, self.audio.looping) {
                tracing::warn!(track = %track.name, error = %e, "audio load failed");
                return;
            }
            tracing::debug!(track = %track.name, "track loaded");
            self.audio.loaded = Some(track.id.clone());
        }
        if self.audio.playing {
            self.start_playback();
        } else {
            self.audio_out.pause();
            self.audio.awaiting_interaction = false;
        }
    }

    /// A click or key press happened. Retries playback that autoplay refused.
    pub fn on_user_interaction(&mut self) {
        if self.audio.awaiting_interaction && self.audio.playing && self.audio.track.is_some() {
            self.start_playback();
        }
    }

    fn start_playback(&mut self) {
        match self.audio_out.play() {
            Ok(()) => self.audio.awaiting_interaction = false,
            Err(PlatformError::AutoplayBlocked) => {
                tracing::debug!("autoplay blocked; waiting for user interaction");
                self.audio.awaiting_interaction = true;
            }
            Err(e) => tracing::warn!(error = %e, "audio playback failed"),
        }
    }

    fn track_index(&self) -> Option<usize> {
        let id = &self.audio.track.as_ref()?.id;
        catalog::tracks().iter().position(|t| &t.id == id)
    }
}

fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
