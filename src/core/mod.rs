//! Core module containing the error taxonomy and currency type shared by
//! every storefront component

pub mod error;
pub mod money;

pub use error::{
    ConflictError, ErrorResponse, InvalidTransitionError, NotFoundError, ShopError, ShopResult,
    StockError, StorageError, ValidationError,
};
pub use money::Money;
