//! Trellis Core Types and Definitions
//!
//! This crate provides the foundational types for the Trellis layout engine.
//! It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Model**: The component data model consumed and mutated by the layout
//!   engine ([`model`] module)

pub mod geometry;
pub mod identifier;
pub mod model;
