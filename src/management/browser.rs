use crate::types::Track;

/// Search results plus the song shown in the player bar.
///
/// Navigation clamps at both ends of the result list.
#[derive(Debug, Clone, Default)]
pub struct Browser {
    query: Option<String>,
    results: Vec<Track>,
    current: Option<usize>,
}

impl Browser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the result list. The current song survives only if the new
    /// list still contains it.
    pub fn set_results(&mut self, query: impl Into<String>, results: Vec<Track>) {
        let current_id = self.current_song().map(|t| t.id.clone());
        self.query = Some(query.into());
        self.results = results;
        self.current = current_id.and_then(|id| self.results.iter().position(|t| t.id == id));
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn results(&self) -> &[Track] {
        &self.results
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.results.get(index)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_song(&self) -> Option<&Track> {
        self.current.and_then(|i| self.results.get(i))
    }

    /// The player bar is shown once a song has been selected.
    pub fn player_visible(&self) -> bool {
        self.current_song().is_some()
    }

    pub fn select(&mut self, index: usize) -> Option<&Track> {
        if index < self.results.len() {
            self.current = Some(index);
        }
        self.current_song()
    }

    /// Advances to the next result; a no-op on the last one.
    pub fn next(&mut self) -> Option<&Track> {
        if let Some(index) = self.current {
            if index + 1 < self.results.len() {
                self.current = Some(index + 1);
            }
        }
        self.current_song()
    }

    /// Steps back to the previous result; a no-op on the first one.
    pub fn previous(&mut self) -> Option<&Track> {
        if let Some(index) = self.current {
            if index > 0 {
                self.current = Some(index - 1);
            }
        }
        self.current_song()
    }
}
