//! Use-case services over the record store.
//!
//! # Responsibility
//! - Turn caller drafts into validated records (ids, timestamps, defaults).
//! - Combine store reads with query-layer views.
//! - Keep CLI/UI layers decoupled from persistence details.

use crate::model::ValidationError;
use crate::repo::record_store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod event_service;
pub mod reminder_service;
pub mod stats;
pub mod task_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for scheduler use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected before persistence; message is user-facing.
    Validation(ValidationError),
    /// Persistence-layer failure or unknown id.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

/// Trims optional free text, mapping blank input to `None`.
pub(crate) fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
