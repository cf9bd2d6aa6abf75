//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::TestSession;
//!
//! #[tokio::test]
//! async fn test_stats() {
//!     let mut session = TestSession::initialized().await;
//!     let text = session.call_tool("get_dataset_stats", serde_json::json!({})).await;
//!     assert!(text.contains("Total songs"));
//! }
//! ```

mod constants;
mod fixtures;
mod server;
mod session;

pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{create_test_dataset, missing_dataset_path};
#[allow(unused_imports)]
pub use server::TestServer;
#[allow(unused_imports)]
pub use session::{error_code, TestSession};
