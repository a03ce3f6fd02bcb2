//! Narrow seams to the operating system.
//!
//! Nothing in here interprets native handles; the rest of the crate only
//! compares and forwards them.

pub mod geometry;
pub mod screen;
pub mod window;
