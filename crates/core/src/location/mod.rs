pub mod memory;

use std::fmt;

/// How a navigation is recorded in history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavigateMode {
    /// Overwrite the current history entry.
    #[default]
    Replace,
    /// Add a new history entry.
    Push,
}

impl fmt::Display for NavigateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigateMode::Replace => write!(f, "replace"),
            NavigateMode::Push => write!(f, "push"),
        }
    }
}

/// The host's current location: a path plus a search string, and a way to
/// move to another one.
pub trait Location {
    fn path(&self) -> &str;

    /// Search portion including the leading `?`, or empty.
    fn search(&self) -> &str;

    fn href(&self) -> String {
        format!("{}{}", self.path(), self.search())
    }

    fn navigate(&mut self, href: &str, mode: NavigateMode);
}

/// Split an href into `(path, search, hash)`.
///
/// The path defaults to `/`, a lone `?` yields an empty search, and the hash
/// keeps its leading `#`.
pub fn split_href(href: &str) -> (&str, &str, &str) {
    let (rest, hash) = match href.find('#') {
        Some(at) => href.split_at(at),
        None => (href, ""),
    };
    let (path, search) = match rest.find('?') {
        Some(at) => rest.split_at(at),
        None => (rest, ""),
    };
    let path = if path.is_empty() { "/" } else { path };
    let search = if search == "?" { "" } else { search };
    (path, search, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_href_parts() {
        assert_eq!(
            split_href("/retailer/distributions?status=PAID#top"),
            ("/retailer/distributions", "?status=PAID", "#top")
        );
        assert_eq!(split_href("?a=1"), ("/", "?a=1", ""));
        assert_eq!(split_href("/x?"), ("/x", "", ""));
        assert_eq!(split_href("/x#frag?no"), ("/x", "", "#frag?no"));
    }
}
