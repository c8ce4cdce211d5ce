//! # tickvault-types
//!
//! Core types for tickvault: the schema shared between the recording engine,
//! the store adapters, and anything that consumes recorder output.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: the data model works without any
//!   serialization framework
//! - **Optional serialization**: enable the `serde` feature where a store or
//!   output format needs it
//! - **Store agnostic**: the same types flow through an in-memory store, a
//!   file store, or a remote service
//!
//! ## Features
//!
//! - `std` (default): standard library support, enables wall-clock access
//! - `serde`: JSON/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use tickvault_types::{Sample, UnixMillis};
//!
//! let sample = Sample::at(UnixMillis::from_secs(1_703_160_000));
//! assert_eq!(sample.recorded_at.as_millis(), 1_703_160_000_000);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

mod sample;
mod status;
mod timestamp;

pub use sample::*;
pub use status::*;
pub use timestamp::*;
