//! Tagflow Core Types and Definitions
//!
//! This crate provides the types shared between the Tagflow compiler and any
//! renderer consuming its output. It includes:
//!
//! - **Identifiers**: Namespace-qualified symbol names ([`identifier::QualifiedName`])
//! - **Geometry**: Grid rectangles and sizes in layout units ([`geometry`] module)
//! - **Semantic**: Event kinds, row slots and target slots ([`semantic`] module)
//! - **Layout**: Positioned objects, resolved edges and the finished
//!   [`layout::Diagram`] ([`layout`] module)

pub mod geometry;
pub mod identifier;
pub mod layout;
pub mod semantic;
