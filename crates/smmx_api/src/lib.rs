//! Response-envelope API over `smmx_core`, one function per tool.

pub mod api;

pub use api::*;
