//! Shared primitives used by the scanner, the store and the logging system

pub mod span;

pub use span::{Position, Span};
