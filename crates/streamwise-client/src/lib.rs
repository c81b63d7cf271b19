//! HTTP access to the streamwise scoring and admin services.
//!
//! Implements the `ScoringService` and `AdminService` traits from
//! `streamwise-core` over `reqwest`, plus configuration loading and
//! in-memory mocks for tests.

pub mod admin;
pub mod config;
pub mod mock;
pub mod scoring;
mod transport;

pub use admin::HttpAdminClient;
pub use config::{load_config, load_config_from, ClientConfig};
pub use scoring::HttpScoringClient;
