use tracing::trace;

use super::{Location, NavigateMode, split_href};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub path: String,
    pub search: String,
    pub hash: String,
}

impl HistoryEntry {
    fn parse(href: &str) -> Self {
        let (path, search, hash) = split_href(href);
        Self {
            path: path.to_string(),
            search: search.to_string(),
            hash: hash.to_string(),
        }
    }

    pub fn href(&self) -> String {
        format!("{}{}{}", self.path, self.search, self.hash)
    }
}

/// In-process location with a browser-style history stack.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl MemoryLocation {
    pub fn new(href: &str) -> Self {
        Self {
            entries: vec![HistoryEntry::parse(href)],
            cursor: 0,
        }
    }

    /// A user-initiated visit, as if the address bar was edited.
    pub fn visit(&mut self, href: &str) {
        self.navigate(href, NavigateMode::Push);
    }

    /// Step back one entry. Returns `false` at the start of history.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        trace!(href = %self.current().href(), "history back");
        true
    }

    /// Step forward one entry. Returns `false` at the end of history.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        trace!(href = %self.current().href(), "history forward");
        true
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Location for MemoryLocation {
    fn path(&self) -> &str {
        &self.current().path
    }

    fn search(&self) -> &str {
        &self.current().search
    }

    fn navigate(&mut self, href: &str, mode: NavigateMode) {
        let entry = HistoryEntry::parse(href);
        match mode {
            NavigateMode::Replace => self.entries[self.cursor] = entry,
            NavigateMode::Push => {
                self.entries.truncate(self.cursor + 1);
                self.entries.push(entry);
                self.cursor += 1;
            }
        }
        trace!(href, %mode, depth = self.entries.len(), "navigated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_keeps_history_length() {
        let mut loc = MemoryLocation::new("/shop");
        loc.navigate("/shop?status=PAID", NavigateMode::Replace);
        assert_eq!(loc.len(), 1);
        assert_eq!(loc.search(), "?status=PAID");
        assert_eq!(loc.href(), "/shop?status=PAID");
    }

    #[test]
    fn push_back_and_forward() {
        let mut loc = MemoryLocation::new("/a");
        loc.navigate("/a?x=1", NavigateMode::Push);
        loc.navigate("/a?x=2", NavigateMode::Push);
        assert_eq!(loc.len(), 3);

        assert!(loc.back());
        assert_eq!(loc.search(), "?x=1");
        assert!(loc.back());
        assert_eq!(loc.search(), "");
        assert!(!loc.back());

        assert!(loc.forward());
        assert_eq!(loc.search(), "?x=1");
    }

    #[test]
    fn push_truncates_forward_entries() {
        let mut loc = MemoryLocation::new("/a");
        loc.visit("/b");
        loc.visit("/c");
        loc.back();
        loc.back();
        loc.visit("/d");
        let hrefs: Vec<_> = loc.history().iter().map(HistoryEntry::href).collect();
        assert_eq!(hrefs, vec!["/a", "/d"]);
        assert!(!loc.forward());
    }

    #[test]
    fn hash_is_kept_out_of_search() {
        let loc = MemoryLocation::new("/a?x=1#details");
        assert_eq!(loc.search(), "?x=1");
        assert_eq!(loc.current().hash, "#details");
        assert_eq!(loc.href(), "/a?x=1");
    }
}
