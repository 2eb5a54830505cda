use tracing::{debug, trace};

use crate::location::{Location, NavigateMode};
use crate::query::QueryParams;
use crate::state::{QueryState, StatePatch, TrackedKeys, TrackedState};

pub type ExternalChange = Box<dyn FnMut(&TrackedState)>;

/// What an inbound pass did to state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// URL and state already agree.
    Unchanged,
    /// URL differs from state but matches our own last write; ignored.
    SelfPushed,
    /// URL changed externally; its tracked values were merged into state.
    Applied(TrackedState),
    /// Bare URL while state held tracked values; tracked keys were cleared.
    /// The external-change callback has already run unless the bare URL was
    /// our own write.
    Reset,
}

/// What an outbound pass did to the location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Unchanged,
    Navigated { href: String, mode: NavigateMode },
}

/// Two-way synchronization between tracked page state and the URL search.
///
/// The search string of the most recent outbound write is remembered until
/// the navigation it causes has been seen, so that navigation is not mistaken
/// for an external one.
pub struct QuerySync {
    keys: TrackedKeys,
    mode: NavigateMode,
    last_pushed: Option<String>,
    on_external_change: Option<ExternalChange>,
}

impl QuerySync {
    pub fn new(keys: TrackedKeys) -> Self {
        Self {
            keys,
            mode: NavigateMode::Replace,
            last_pushed: None,
            on_external_change: None,
        }
    }

    pub fn with_mode(mut self, mode: NavigateMode) -> Self {
        self.mode = mode;
        self
    }

    /// Called with the URL's tracked values whenever an external navigation
    /// changes state.
    pub fn on_external_change(mut self, callback: impl FnMut(&TrackedState) + 'static) -> Self {
        self.on_external_change = Some(Box::new(callback));
        self
    }

    pub fn keys(&self) -> &TrackedKeys {
        &self.keys
    }

    pub fn mode(&self) -> NavigateMode {
        self.mode
    }

    /// Search string of an outbound write whose navigation has not been
    /// seen yet.
    pub fn last_pushed(&self) -> Option<&str> {
        self.last_pushed.as_deref()
    }

    /// URL → state. Run after every navigation, including the initial one.
    pub fn inbound<L, S>(&mut self, location: &L, state: &mut S) -> Inbound
    where
        L: Location + ?Sized,
        S: QueryState + ?Sized,
    {
        let search = location.search();
        let candidate = self.keys.extract(&QueryParams::parse(search));
        let current = self.keys.snapshot(state);

        // The marker only covers the navigation our own write caused; once
        // that event is seen, a later visit to the same URL is external.
        let own_write = self.last_pushed.as_deref() == Some(search);
        if own_write {
            self.last_pushed = None;
        }

        let external = candidate != current && !own_write;
        if external {
            state.apply(&Self::patch_from(&candidate));
            debug!(search, applied = candidate.len(), "external URL change applied");
            if let Some(callback) = self.on_external_change.as_mut() {
                callback(&candidate);
            }
        }

        if search.is_empty() && !current.is_empty() {
            state.apply(&self.clear_patch());
            debug!(cleared = current.len(), "bare URL, tracked filters reset");
            return Inbound::Reset;
        }
        if external {
            return Inbound::Applied(candidate);
        }
        if candidate != current {
            debug!(search, "ignoring self-pushed URL");
            return Inbound::SelfPushed;
        }

        trace!(search, "URL and state in agreement");
        Inbound::Unchanged
    }

    /// State → URL. Run after every state change.
    ///
    /// Untracked parameters keep their position; tracked ones are rewritten
    /// after them in declaration order.
    pub fn outbound<L, S>(&mut self, location: &mut L, state: &S) -> Outbound
    where
        L: Location + ?Sized,
        S: QueryState + ?Sized,
    {
        let tracked = self.keys.snapshot(state);
        let current = QueryParams::parse(location.search());

        let mut desired = current.clone();
        for key in self.keys.iter() {
            desired.remove(key);
        }
        for (key, value) in tracked.iter() {
            desired.append(key, value);
        }

        if desired != current {
            let search = desired.to_search();
            let href = format!("{}{}", location.path(), search);
            debug!(href = %href, mode = %self.mode, "writing filters to URL");
            self.last_pushed = Some(search);
            location.navigate(&href, self.mode);
            return Outbound::Navigated {
                href,
                mode: self.mode,
            };
        }

        if tracked.is_empty() {
            self.last_pushed = None;
        }
        trace!("URL already reflects state");
        Outbound::Unchanged
    }

    /// Merge patch: keys the URL carries are set, all others are left alone.
    fn patch_from(candidate: &TrackedState) -> StatePatch {
        candidate
            .iter()
            .fold(StatePatch::new(), |patch, (key, value)| patch.set(key, value))
    }

    fn clear_patch(&self) -> StatePatch {
        self.keys
            .iter()
            .fold(StatePatch::new(), |patch, key| patch.clear(key))
    }
}

/// Tracked-only serialization of `state`: non-empty values in declaration
/// order, `?`-prefixed, or empty when nothing is set.
pub fn canonical_search<S: QueryState + ?Sized>(keys: &TrackedKeys, state: &S) -> String {
    keys.snapshot(state)
        .iter()
        .collect::<QueryParams>()
        .to_search()
}
