//! Read-side views over event and task collections.
//!
//! Everything here is pure: callers pass the records and the reference
//! instant (`now`/`today`), so results are deterministic under test.

pub mod events;
pub mod tasks;
