//! SoftLayer SDK core
//!
//! The pieces of the SDK that are independent of any particular resource:
//! the transport contract, the remote query executor, key resolution and
//! provisioning-completion polling.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │           softlayer-client services               │
//! │   (load balancer, scale group, DNS record, …)     │
//! └───────┬───────────────────────────┬──────────────┘
//!         │                           │
//! ┌───────▼────────┐        ┌─────────▼─────────┐
//! │  Key Resolver  │        │ Completion Poller │
//! │  resolve()     │        │ Poller::run()     │
//! └───────┬────────┘        └─────────┬─────────┘
//!         │                           │ probe
//! ┌───────▼───────────────────────────▼─────────┐
//! │          Remote Query Executor              │
//! │  execute_query() → trait Transport          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use softlayer_core::{ResourceKind, resolve_id};
//!
//! let id = resolve_id(&client, &ResourceKind::DATACENTER, "ams01").await?;
//! assert_eq!(id, 265592);
//! ```

pub mod clock;
pub mod error;
pub mod poll;
pub mod query;
pub mod resolve;
pub mod transport;

// Re-exports
pub use clock::{Clock, ManualClock, TokioClock};
pub use error::{Result, SoftLayerError};
pub use poll::{PollConfig, PollOutcome, Poller, classify_single, poll_until_complete};
pub use query::{
    ObjectFilter, ObjectMask, check_api_error, decode, execute_query, expect_true, fetch,
};
pub use resolve::{
    Candidate, KeynameRecord, LookupKey, NamedRecord, ResolutionEntry, ResolutionTable,
    ResourceKind, decode_table, fetch_table, resolve, resolve_id, resolve_name, resolve_value,
};
pub use transport::{ApiRequest, Method, RawResponse, Transport, is_http_error_code};
