//! SoftLayer API client
//!
//! This crate puts an HTTP transport under the `softlayer-core` query
//! executor, key resolver and completion poller, and exposes one service per
//! SoftLayer resource.
//!
//! # Features
//!
//! - Basic-auth REST transport with optional retry of 5xx reads
//! - Application delivery controller load balancers (order and wait)
//! - Auto-scale groups and policies
//! - DNS domain resource records
//! - Provisioning hooks
//!
//! # Requirements
//!
//! - `SL_USERNAME` and `SL_API_KEY`, or a credentials file
//!   (see `softlayer-config`)
//!
//! # Example
//!
//! ```ignore
//! use softlayer_client::{LoadBalancerCreateOptions, SoftLayerClient};
//!
//! let client = SoftLayerClient::from_env()?;
//!
//! let options = LoadBalancerCreateOptions {
//!     connections: 250,
//!     location: "ams01".to_string(),
//! };
//! let lb = client
//!     .load_balancers()
//!     .create_load_balancer(&options, client.poll_config())
//!     .await?;
//! ```

pub mod client;
pub mod error;
pub mod services;

pub use client::{RetryConfig, SoftLayerClient, poll_config};
pub use error::{ClientError, Result};
pub use services::*;
