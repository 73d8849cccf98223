//! Background music playlist.

use crate::catalog::{Track, tracks};

/// Cursor over a fixed list of tracks. `next` and `previous` wrap around.
#[derive(Debug, Clone, Copy)]
pub struct Playlist<'a> {
    tracks: &'a [Track],
    position: usize,
}

impl Playlist<'static> {
    /// Playlist over the built-in tracks, starting at the first.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(tracks())
    }
}

impl<'a> Playlist<'a> {
    #[must_use]
    pub const fn new(tracks: &'a [Track]) -> Self {
        Self {
            tracks,
            position: 0,
        }
    }

    #[must_use]
    pub const fn tracks(&self) -> &'a [Track] {
        self.tracks
    }

    #[must_use]
    pub fn current(&self) -> Option<&'a Track> {
        self.tracks.get(self.position)
    }

    /// Move to the next track, wrapping to the first.
    pub fn next(&mut self) -> Option<&'a Track> {
        if self.tracks.is_empty() {
            return None;
        }
        self.position = (self.position + 1) % self.tracks.len();
        self.current()
    }

    /// Move to the previous track, wrapping to the last.
    pub fn previous(&mut self) -> Option<&'a Track> {
        if self.tracks.is_empty() {
            return None;
        }
        self.position = self
            .position
            .checked_sub(1)
            .unwrap_or(self.tracks.len() - 1);
        self.current()
    }

    /// Jump to the track with `id`. Unknown ids leave the cursor where it is.
    pub fn select(&mut self, id: &str) -> Option<&'a Track> {
        let position = self.tracks.iter().position(|t| t.id == id)?;
        self.position = position;
        self.current()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_next_wraps_around() {
        let mut playlist = Playlist::builtin();
        let first = playlist.current().unwrap().id.clone();
        for _ in 0..playlist.tracks().len() {
            playlist.next();
        }
        assert_eq!(playlist.current().unwrap().id, first);
    }

    #[test]
    fn test_previous_from_first_is_last() {
        let mut playlist = Playlist::builtin();
        let last = playlist.tracks().last().unwrap();
        assert_eq!(playlist.previous().unwrap(), last);
    }

    #[test]
    fn test_select() {
        let mut playlist = Playlist::builtin();
        assert_eq!(playlist.select("wii-shop").unwrap().id, "wii-shop");
        assert!(playlist.select("missing").is_none());
        assert_eq!(playlist.current().unwrap().id, "wii-shop");
        assert_eq!(playlist.next().unwrap().id, "toby-fox-shop");
    }

    #[test]
    fn test_empty_playlist() {
        let mut playlist = Playlist::new(&[]);
        assert!(playlist.current().is_none());
        assert!(playlist.next().is_none());
        assert!(playlist.previous().is_none());
    }
}
