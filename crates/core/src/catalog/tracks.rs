//! Background music tracks.
//!
//! Audio files live under `static/music/`.

use std::sync::LazyLock;

use serde::Serialize;

/// A track in the background music playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    /// Path of the audio file, relative to the site root.
    pub src: String,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

static TRACKS: LazyLock<Vec<Track>> = LazyLock::new(|| {
    vec![
        Track {
            id: "toby-fox-shop".to_string(),
            name: "Shop Theme (Toni Leys Remix)".to_string(),
            src: "/static/music/undertale-shop-theme-toni-leys-remix.mp3".to_string(),
            artist: "Toby Fox / Toni Leys".to_string(),
            info: Some("Remix of Undertale Shop Theme".to_string()),
        },
        Track {
            id: "wii-shop".to_string(),
            name: "Wii Shopping Channel Remix".to_string(),
            src: "/static/music/wii-shopping-channel-nicky-flowers.mp3".to_string(),
            artist: "Nicky Flowers".to_string(),
            info: Some("Remix of Wii Shop Channel theme".to_string()),
        },
    ]
});

#[must_use]
pub fn tracks() -> &'static [Track] {
    &TRACKS
}
