//! Request middleware for the user service.

pub mod auth;

pub use auth::{ACCESS_TOKEN_COOKIE, Authenticated};
