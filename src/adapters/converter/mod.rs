//! Argument converter implementations.

mod json;

pub use json::JsonArgumentConverter;
