//! Integration test crate for Scenecast.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the script, compiler, timeline, and audio crates to
//! verify they work together on complete compile scenarios.

#[cfg(test)]
mod support;

#[cfg(test)]
mod compile;

#[cfg(test)]
mod bgm;

#[cfg(test)]
mod envelope;
