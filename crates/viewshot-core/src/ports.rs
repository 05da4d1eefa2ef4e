//! Port definitions for Hexagonal Architecture
//!
//! These traits define the boundary between the core capture logic and the
//! host rendering runtime.

pub mod render;

pub use render::RenderSourcePort;
