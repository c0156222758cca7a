//! Core business logic for voxpop.

pub mod services;

pub use services::*;
