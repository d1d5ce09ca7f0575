//! Business-logic services for the back office.

pub mod auth;
pub mod tokens;
