//! # Base types for kingfall
//!
//! This is an auxiliary crate for `kingfall`, which contains plain value types: squares, colors,
//! piece kinds and piece identities, together with the fixed board geometry.
//!
//! Normally you don't want to use this crate directly. Use `kingfall` instead, which re-exports
//! everything from here.

pub mod geometry;
pub mod types;
