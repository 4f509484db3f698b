//! Common utilities for the Cutin crates.
//!
//! This crate provides the pieces shared by every format layer:
//!
//! - [`BinaryReader`] - Bounds-checked reading from byte slices, in both byte orders
//! - [`Error`] - The error raised when a read runs off the end of a buffer
//! - [`i32_field`] - Length conversion for the signed 32-bit size fields

mod error;
mod field;
mod reader;

pub use error::{Error, Result};
pub use field::i32_field;
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
