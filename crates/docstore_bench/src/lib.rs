//! Benchmark utilities for DocStore.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod utils;

pub use utils::*;
