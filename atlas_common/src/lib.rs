//! ATLAS Common Library
//!
//! This crate provides shared constants, configuration loading utilities,
//! and the hardware capability layer for all ATLAS workspace crates.
//!
//! # Module Structure
//!
//! - [`hal`] - Hardware capability traits and device-facing value types
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - System-wide constants
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! atlas_common = { path = "../atlas_common" }
//! ```
//!
//! Then import:
//! ```rust
//! use atlas_common::prelude::*;
//! ```

pub mod config;
pub mod consts;
pub mod hal;
pub mod prelude;
