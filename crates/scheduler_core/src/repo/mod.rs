//! Persistence layer: storage media and the record store on top of them.
//!
//! # Responsibility
//! - Keep medium details (SQLite, in-memory) behind `StorageMedium`.
//! - Own all persisted bytes; callers never write the medium directly.
//!
//! # Invariants
//! - Record writes go through `RecordStore`, which validates before writing.
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   medium/transport errors.

pub mod medium;
pub mod record_store;
