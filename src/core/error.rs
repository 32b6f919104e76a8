//! Typed error handling for the storefront core
//!
//! One top-level enum ([`ShopError`]) wraps a category enum per failure
//! class, so callers can match specific errors instead of unwinding a
//! generic `anyhow::Error`.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: malformed or missing input, rejected before any write
//! - [`NotFoundError`]: a referenced id does not exist
//! - [`StockError`]: insufficient stock (fail-closed policy) or an admin
//!   adjustment that would take a counter below zero
//! - [`InvalidTransitionError`]: illegal order status change
//! - [`ConflictError`]: referential-integrity or uniqueness violations
//! - [`StorageError`]: the backing store failed; the operation did not
//!   partially apply and is safe to retry as a whole

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::orders::OrderStatus;

/// The main error type for storefront operations
#[derive(Debug)]
pub enum ShopError {
    /// Input validation failures (rejected before any write)
    Validation(ValidationError),

    /// Referenced entity does not exist
    NotFound(NotFoundError),

    /// Stock reservation or adjustment failures
    Stock(StockError),

    /// Illegal order status transition
    Transition(InvalidTransitionError),

    /// Referential-integrity and uniqueness conflicts
    Conflict(ConflictError),

    /// Storage backend failures
    Storage(StorageError),
}

impl fmt::Display for ShopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopError::Validation(e) => write!(f, "{}", e),
            ShopError::NotFound(e) => write!(f, "{}", e),
            ShopError::Stock(e) => write!(f, "{}", e),
            ShopError::Transition(e) => write!(f, "{}", e),
            ShopError::Conflict(e) => write!(f, "{}", e),
            ShopError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ShopError {}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ShopError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShopError::Validation(_) => StatusCode::BAD_REQUEST,
            ShopError::NotFound(_) => StatusCode::NOT_FOUND,
            ShopError::Stock(_) => StatusCode::CONFLICT,
            ShopError::Transition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ShopError::Conflict(_) => StatusCode::CONFLICT,
            ShopError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShopError::Validation(e) => e.error_code(),
            ShopError::NotFound(e) => e.error_code(),
            ShopError::Stock(e) => e.error_code(),
            ShopError::Transition(_) => "INVALID_TRANSITION",
            ShopError::Conflict(e) => e.error_code(),
            ShopError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ShopError::Stock(StockError::Insufficient {
                product_id,
                size,
                requested,
                available,
            }) => Some(serde_json::json!({
                "product_id": product_id.to_string(),
                "size": size,
                "requested": requested,
                "available": available,
            })),
            ShopError::Transition(e) => Some(serde_json::json!({
                "order_id": e.order_id.to_string(),
                "from": e.from,
                "to": e.to,
            })),
            ShopError::NotFound(e) => Some(serde_json::json!({
                "id": e.id().to_string(),
            })),
            _ => None,
        }
    }
}

impl IntoResponse for ShopError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// Single field validation error
    Field { field: String, message: String },

    /// An order request with no line items
    EmptyOrder,

    /// Guest checkout without a usable identity (name plus email or phone)
    GuestIdentityMissing,

    /// A value outside the accepted enumeration (e.g. reporting period)
    UnknownEnumValue { field: String, value: String },

    /// Client-supplied unit price on a channel that must not set prices
    PriceOverrideForbidden,
}

impl ValidationError {
    /// Shorthand for single-field errors
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::Field {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::Field { .. } => "VALIDATION_ERROR",
            ValidationError::EmptyOrder => "EMPTY_ORDER",
            ValidationError::GuestIdentityMissing => "GUEST_IDENTITY_MISSING",
            ValidationError::UnknownEnumValue { .. } => "UNKNOWN_ENUM_VALUE",
            ValidationError::PriceOverrideForbidden => "PRICE_OVERRIDE_FORBIDDEN",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Field { field, message } => {
                write!(f, "Validation error for field '{}': {}", field, message)
            }
            ValidationError::EmptyOrder => {
                write!(f, "An order must contain at least one line item")
            }
            ValidationError::GuestIdentityMissing => {
                write!(
                    f,
                    "Guest orders require a name and at least one contact channel"
                )
            }
            ValidationError::UnknownEnumValue { field, value } => {
                write!(f, "Unknown value '{}' for '{}'", value, field)
            }
            ValidationError::PriceOverrideForbidden => {
                write!(f, "Unit price overrides are only allowed for POS sales")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ShopError {
    fn from(err: ValidationError) -> Self {
        ShopError::Validation(err)
    }
}

// =============================================================================
// Not Found Errors
// =============================================================================

/// A referenced id does not exist
#[derive(Debug)]
pub enum NotFoundError {
    Product { id: Uuid },
    Category { id: Uuid },
    Order { id: Uuid },
    Customer { id: Uuid },
}

impl NotFoundError {
    fn id(&self) -> Uuid {
        match self {
            NotFoundError::Product { id }
            | NotFoundError::Category { id }
            | NotFoundError::Order { id }
            | NotFoundError::Customer { id } => *id,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            NotFoundError::Product { .. } => "PRODUCT_NOT_FOUND",
            NotFoundError::Category { .. } => "CATEGORY_NOT_FOUND",
            NotFoundError::Order { .. } => "ORDER_NOT_FOUND",
            NotFoundError::Customer { .. } => "CUSTOMER_NOT_FOUND",
        }
    }
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundError::Product { id } => write!(f, "Product '{}' not found", id),
            NotFoundError::Category { id } => write!(f, "Category '{}' not found", id),
            NotFoundError::Order { id } => write!(f, "Order '{}' not found", id),
            NotFoundError::Customer { id } => write!(f, "Customer '{}' not found", id),
        }
    }
}

impl std::error::Error for NotFoundError {}

impl From<NotFoundError> for ShopError {
    fn from(err: NotFoundError) -> Self {
        ShopError::NotFound(err)
    }
}

// =============================================================================
// Stock Errors
// =============================================================================

/// Stock reservation and adjustment failures.
///
/// The inventory policy is fail-closed: a reservation that cannot be
/// covered rejects the whole order, and counters never go below zero.
#[derive(Debug)]
pub enum StockError {
    /// A line item requested more units than are available
    Insufficient {
        product_id: Uuid,
        size: Option<String>,
        requested: u32,
        available: u32,
    },

    /// An admin adjustment would take the counter below zero
    OutOfRange {
        product_id: Uuid,
        size: Option<String>,
        delta: i64,
        available: u32,
    },
}

impl StockError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StockError::Insufficient { .. } => "STOCK_INSUFFICIENT",
            StockError::OutOfRange { .. } => "STOCK_OUT_OF_RANGE",
        }
    }
}

impl fmt::Display for StockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockError::Insufficient {
                product_id,
                size,
                requested,
                available,
            } => match size {
                Some(size) => write!(
                    f,
                    "Insufficient stock for product '{}' size '{}': requested {}, available {}",
                    product_id, size, requested, available
                ),
                None => write!(
                    f,
                    "Insufficient stock for product '{}': requested {}, available {}",
                    product_id, requested, available
                ),
            },
            StockError::OutOfRange {
                product_id,
                delta,
                available,
                ..
            } => write!(
                f,
                "Stock adjustment of {} on product '{}' would go below zero (available {})",
                delta, product_id, available
            ),
        }
    }
}

impl std::error::Error for StockError {}

impl From<StockError> for ShopError {
    fn from(err: StockError) -> Self {
        ShopError::Stock(err)
    }
}

// =============================================================================
// Transition Errors
// =============================================================================

/// An order status change that the state machine does not allow
#[derive(Debug)]
pub struct InvalidTransitionError {
    pub order_id: Uuid,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl fmt::Display for InvalidTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order '{}' cannot move from {} to {}",
            self.order_id, self.from, self.to
        )
    }
}

impl std::error::Error for InvalidTransitionError {}

impl From<InvalidTransitionError> for ShopError {
    fn from(err: InvalidTransitionError) -> Self {
        ShopError::Transition(err)
    }
}

// =============================================================================
// Conflict Errors
// =============================================================================

/// Referential-integrity and uniqueness violations
#[derive(Debug)]
pub enum ConflictError {
    /// Product still referenced by at least one order item
    ProductReferenced { id: Uuid },

    /// Category still referenced by at least one product
    CategoryInUse { id: Uuid },

    /// Two size variants with the same label on one product
    DuplicateSizeLabel { label: String },

    /// A customer account already uses this email
    DuplicateEmail { email: String },
}

impl ConflictError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConflictError::ProductReferenced { .. } => "PRODUCT_REFERENCED",
            ConflictError::CategoryInUse { .. } => "CATEGORY_IN_USE",
            ConflictError::DuplicateSizeLabel { .. } => "DUPLICATE_SIZE_LABEL",
            ConflictError::DuplicateEmail { .. } => "DUPLICATE_EMAIL",
        }
    }
}

impl fmt::Display for ConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictError::ProductReferenced { id } => {
                write!(
                    f,
                    "Product '{}' is referenced by existing orders and cannot be deleted",
                    id
                )
            }
            ConflictError::CategoryInUse { id } => {
                write!(
                    f,
                    "Category '{}' is still referenced by products and cannot be deleted",
                    id
                )
            }
            ConflictError::DuplicateSizeLabel { label } => {
                write!(f, "Duplicate size label '{}'", label)
            }
            ConflictError::DuplicateEmail { email } => {
                write!(f, "A customer with email '{}' already exists", email)
            }
        }
    }
}

impl std::error::Error for ConflictError {}

impl From<ConflictError> for ShopError {
    fn from(err: ConflictError) -> Self {
        ShopError::Conflict(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by the storage backend.
///
/// A storage failure means the whole operation was rolled back; callers
/// may retry the operation as a unit.
#[derive(Debug)]
pub enum StorageError {
    /// A lock or connection became unusable
    Unavailable { backend: String, message: String },

    /// The backend rejected the write
    WriteFailed { backend: String, message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable { backend, message } => {
                write!(f, "Storage backend '{}' unavailable: {}", backend, message)
            }
            StorageError::WriteFailed { backend, message } => {
                write!(f, "{} write failed: {}", backend, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for ShopError {
    fn from(err: StorageError) -> Self {
        ShopError::Storage(err)
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for storefront operations
pub type ShopResult<T> = Result<T, ShopError>;

// =============================================================================
// Tests
// =============================================================================
