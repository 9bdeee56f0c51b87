pub mod test_utils;

pub use test_utils::{MockRestResponses, TestConfig};
