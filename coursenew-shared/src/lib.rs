//! # coursenew-shared
//!
//! Domain types and helpers shared by every crate in the coursenew workspace.
//!
//! The API crate serializes these types onto the wire and any client crate
//! deserializes the very same definitions, so the JSON contract lives in one
//! place.
//!
//! ## Example
//!
//! ```rust
//! use coursenew_shared::prelude::*;
//!
//! assert!(is_valid_email("jane.smith@example.com"));
//!
//! let response: ApiResponse<()> = create_api_response(
//!     false,
//!     None,
//!     Some("User not found"),
//!     Some("No user found with the specified ID"),
//! );
//! assert!(!response.success);
//! assert!(response.data.is_none());
//! ```

pub mod types;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::types::{
        ApiResponse, CreateUserRequest, DeletedUser, NewUser, UpdateUserRequest, User,
        UserChanges, UserValidationError,
    };
    pub use crate::utils::{create_api_response, format_date, is_valid_email};
}
