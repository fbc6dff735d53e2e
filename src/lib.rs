//! Storefront order service
//!
//! Catalog, checkout and order management behind a JSON REST API, persisted
//! as one JSON document per collection.
//!
//! ## Features
//! - Product catalog browsing and admin CRUD
//! - Checkout with deterministic pricing (shipping threshold, 18% tax)
//! - Order status lifecycle with owner cancellation requests and admin override
//! - Admin dashboard statistics and user management
//! - Optional domain event publishing to NATS

pub mod api;
pub mod config;
pub mod domain;
pub mod services;
pub mod storage;

use domain::aggregates::{OrderError, OrderStatus};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;

impl From<OrderError> for StorefrontError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotOwner => Self::Forbidden("Not authorized"),
            OrderError::InvalidTransition { from, to } => Self::InvalidTransition { from, to },
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for StorefrontError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages = Vec::new();
        describe(&errors, "", &mut messages);
        messages.sort();
        Self::Validation(messages.join("; "))
    }
}

fn describe(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() { field.to_string() } else { format!("{prefix}.{field}") };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for e in errs {
                    out.push(format!("{path}: {}", e.message.as_deref().unwrap_or(&*e.code)));
                }
            }
            ValidationErrorsKind::Struct(inner) => describe(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    describe(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}
