//! Power data source abstractions and the HTTP implementation.
//!
//! This module contains:
//! - The `PowerDataSource` trait the aggregator polls
//! - `SourceOperation`, the identity of each remote read
//! - `HttpPowerSource`, a thin reqwest wrapper over the platform endpoints
//! - `MockPowerSource`, a scripted source for tests

mod http;
mod mock;
mod operation;
mod traits;

pub use http::{HttpPowerSource, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
pub use mock::{MockFailure, MockPowerSource, MockReply};
pub use operation::SourceOperation;
pub use traits::PowerDataSource;
