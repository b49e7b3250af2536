//! Built-in wallpapers and ambient tracks, and keyboard navigation over them.

use serde::{Deserialize, Serialize};

/// Wallpaper picker columns.
pub const GRID_COLUMNS: usize = 3;

const WALLPAPER_BASE: &str = "https://raw.githubusercontent.com/D3Ext/aesthetic-wallpapers/main/images/";

const WALLPAPERS: [(&str, &str); 10] = [
    ("Epic Waterfall", "beautiful.jpg"),
    ("Nord Knight", "black.jpg"),
    ("Colorful Planets", "colorful-planets.jpg"),
    ("Abstract Colors", "colors.jpg"),
    ("Ocean Clouds", "ocean_with_cloud.png"),
    ("Fantasy Forest", "forest.png"),
    ("Fantasy Woods", "fantasy-woods.jpg"),
    ("Space Orbit", "orbit.png"),
    ("Light Ring", "light-ring.jpg"),
    ("Kyoto Sunset", "yellow_kyoto.jpg"),
];

const TRACKS: [(&str, &str); 5] = [
    ("Distant Horizons", "/Distant Horizons.mp3"),
    ("Ocean Calm", "/Ocean Calm.mp3"),
    ("Shadows We Keep", "/Shadows-We-Keep.mp3"),
    ("Weightless Whispers", "/Weightless Whispers.mp3"),
    ("Winter's Breath", "/Winter's Breath.mp3"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundImage {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioTrack {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// Arrow keys as picker moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Map a browser key name (`ArrowLeft`, ...) to a direction.
    #[must_use]
    pub fn from_key(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            _ => None,
        }
    }
}

#[must_use]
pub fn backgrounds() -> Vec<BackgroundImage> {
    (1..)
        .zip(WALLPAPERS)
        .map(|(n, (name, file))| BackgroundImage {
            id: n.to_string(),
            name: name.to_owned(),
            url: format!("{WALLPAPER_BASE}{file}"),
            thumbnail: None,
        })
        .collect()
}

#[must_use]
pub fn tracks() -> Vec<AudioTrack> {
    (1..)
        .zip(TRACKS)
        .map(|(n, (name, url))| AudioTrack { id: n.to_string(), name: name.to_owned(), url: url.to_owned() })
        .collect()
}

#[must_use]
pub fn find_background(id: &str) -> Option<BackgroundImage> {
    backgrounds().into_iter().find(|b| b.id == id)
}

#[must_use]
pub fn find_track(id: &str) -> Option<AudioTrack> {
    tracks().into_iter().find(|t| t.id == id)
}

/// First wallpaper in the catalog.
#[must_use]
pub fn default_background() -> BackgroundImage {
    let (name, file) = WALLPAPERS[0];
    BackgroundImage { id: "1".into(), name: name.into(), url: format!("{WALLPAPER_BASE}{file}"), thumbnail: None }
}

/// First track in the catalog.
#[must_use]
pub fn default_track() -> AudioTrack {
    let (name, url) = TRACKS[0];
    AudioTrack { id: "1".into(), name: name.into(), url: url.into() }
}

/// Move a selection through a wrapping grid of `columns` columns.
///
/// Left/Right step by one, Up/Down by a full row. Steps wrap around the
/// whole list rather than within the row.
#[must_use]
pub fn grid_step(index: usize, len: usize, direction: Direction, columns: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let index = index % len;
    let step = match direction {
        Direction::Left | Direction::Right => 1,
        Direction::Up | Direction::Down => columns.max(1) % len,
    };
    match direction {
        Direction::Left | Direction::Up => (index + len - step % len) % len,
        Direction::Right | Direction::Down => (index + step) % len,
    }
}

/// Move a selection through a wrapping vertical list. Left/Right do nothing.
#[must_use]
pub fn list_step(index: usize, len: usize, direction: Direction) -> usize {
    match direction {
        Direction::Up | Direction::Down => grid_step(index, len, direction, 1),
        Direction::Left | Direction::Right => index,
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
