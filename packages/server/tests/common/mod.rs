// Common test utilities
#![allow(dead_code, unused_imports)]

pub mod harness;
pub mod http;

pub use harness::*;
pub use http::*;
