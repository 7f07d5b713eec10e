#![allow(dead_code, unused_imports)]

pub use hypher_test_utils::builders;
pub use hypher_test_utils::ops;
pub use hypher_test_utils::{init_tracing, with_timeout};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
