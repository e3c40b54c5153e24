//! Actor system: a supervisor owning per-conversation sessions, and the
//! transport boundary it is driven through.

pub mod messages;
pub mod supervisor;
pub mod traits;
