//! Internal Implementation Details
//!
//! This module contains implementation details that are not part of the public API.
//! Types in this module may change without notice between minor versions.
//!
//! # Contents
//!
//! - [`register`]: Register access backend and the DMAC register map
//! - [`constants`]: Limits, defaults and magic numbers
//!
//! # Stability
//!
//! **WARNING:** This module is `pub(crate)` only. Selected items are
//! re-exported from the crate root; everything else may change without notice.

pub(crate) mod constants;
pub(crate) mod register;
