use tracing::debug;

use crate::location::Location;
use crate::location::memory::MemoryLocation;
use crate::state::QueryState;
use crate::sync::{Inbound, Outbound, QuerySync};

/// Effects of one session step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Inbound pass triggered by a navigation, if the step navigated.
    pub inbound: Option<Inbound>,
    pub outbound: Outbound,
    /// Inbound pass triggered by our own outbound write.
    pub echo: Option<Inbound>,
}

impl SyncReport {
    pub fn navigated(&self) -> bool {
        matches!(self.outbound, Outbound::Navigated { .. })
    }
}

/// A page that owns filter state and keeps it mirrored in its location.
///
/// A navigation is folded into state first and only then is state written
/// back, so the outbound write always sees what inbound just applied.
pub struct PageSession<S, L = MemoryLocation> {
    state: S,
    location: L,
    sync: QuerySync,
}

impl<S: QueryState, L: Location> PageSession<S, L> {
    pub fn new(state: S, location: L, sync: QuerySync) -> Self {
        Self {
            state,
            location,
            sync,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    /// For hosts that move the location themselves; follow up with
    /// [`PageSession::on_navigation`].
    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }

    pub fn sync(&self) -> &QuerySync {
        &self.sync
    }

    pub fn into_parts(self) -> (S, L) {
        (self.state, self.location)
    }

    /// Initial render: read the URL, then write back whatever state remains.
    pub fn mount(&mut self) -> SyncReport {
        debug!(href = %self.location.href(), "mounting page");
        self.on_navigation()
    }

    /// A user edit to state.
    pub fn update(&mut self, edit: impl FnOnce(&mut S)) -> SyncReport {
        edit(&mut self.state);
        self.write_back(None)
    }

    /// The location changed underneath the page.
    pub fn on_navigation(&mut self) -> SyncReport {
        let inbound = self.sync.inbound(&self.location, &mut self.state);
        self.write_back(Some(inbound))
    }

    fn write_back(&mut self, inbound: Option<Inbound>) -> SyncReport {
        let outbound = self.sync.outbound(&mut self.location, &self.state);
        let echo = match outbound {
            Outbound::Navigated { .. } => Some(self.sync.inbound(&self.location, &mut self.state)),
            Outbound::Unchanged => None,
        };
        SyncReport {
            inbound,
            outbound,
            echo,
        }
    }
}

impl<S: QueryState> PageSession<S, MemoryLocation> {
    /// Address-bar edit.
    pub fn visit(&mut self, href: &str) -> SyncReport {
        self.location.visit(href);
        self.on_navigation()
    }

    /// Browser back button. `None` when there is nothing to go back to.
    pub fn back(&mut self) -> Option<SyncReport> {
        if !self.location.back() {
            return None;
        }
        Some(self.on_navigation())
    }

    /// Browser forward button. `None` at the end of history.
    pub fn forward(&mut self) -> Option<SyncReport> {
        if !self.location.forward() {
            return None;
        }
        Some(self.on_navigation())
    }
}
