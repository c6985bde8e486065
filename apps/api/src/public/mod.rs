//! Public, unauthenticated read API for tenant sites.

pub mod handlers;
pub mod views;
