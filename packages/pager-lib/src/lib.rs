//! # pager-lib
//!
//! `pager-lib` is a collection of utilities used by the various `pager-*` crates:
//! service configuration, defaults, and logging setup.

#![deny(unused_crate_dependencies)]

pub mod config;
pub mod defaults;
pub mod utils;
