//! Core runtime types
//!
//! This module provides the value representation and the minimal object model
//! used throughout the built-in library.

pub mod object;
pub mod runtime_value;
pub use object::{JsObject, NativeCallable, ObjectRef, PropertyKey};
pub use runtime_value::*;
