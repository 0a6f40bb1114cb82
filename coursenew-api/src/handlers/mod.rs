//! Request handlers

pub mod extract;
pub mod users;

pub use extract::ApiBody;
