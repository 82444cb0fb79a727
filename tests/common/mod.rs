//! Common test utilities: in-memory artifacts and event recording.

#![allow(dead_code)]

mod fixtures;

pub use fixtures::*;
