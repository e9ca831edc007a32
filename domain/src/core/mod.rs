//! Core domain primitives

pub mod error;
pub mod math;

pub use error::DomainError;
pub use math::{Color, Vec3};
