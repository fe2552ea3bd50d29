//! API route handlers

pub mod health;
pub mod places;
pub mod stats;
pub mod stream;
