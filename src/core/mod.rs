//! Core types and the recursive download driver

pub mod config;
pub mod download;
pub mod error;
pub mod events;
pub mod output;
pub mod package;
