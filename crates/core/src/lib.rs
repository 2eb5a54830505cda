pub mod error;
pub mod filters;
pub mod location;
pub mod query;
pub mod session;
pub mod state;
pub mod sync;

pub use location::memory::MemoryLocation;
pub use location::{Location, NavigateMode};
pub use session::PageSession;
pub use state::{QueryState, StatePatch, TrackedKeys, TrackedState};
pub use sync::QuerySync;
