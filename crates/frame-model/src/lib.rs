//! VACE Frame Model
//!
//! Defines the data the frame-editing nodes operate on:
//! - **Buffers:** Owned image and mask sequences with a shared frame shape
//! - **Ranges:** The `"3,5,10-15"` expression language and the validated
//!   index sets it parses into
//!
//! Buffers are value types. Every editing operation works on a clone and
//! hands back independent storage.

pub mod buffer;
pub mod range;

pub use buffer::*;
pub use range::*;
