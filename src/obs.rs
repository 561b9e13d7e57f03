//! Optional observability helpers for crawler dispatches.
//!
//! # Feature Flags
//!
//! - `tracing`: each dispatch runs in a `proxycrawl.dispatch` span carrying `mode`, with
//!   `proxycrawl.dispatch.stage` children for the `rate_limit` and `network` waits.
//! - `metrics`: `proxycrawl_dispatch_total{mode, outcome}` counts attempts and their
//!   results; `proxycrawl_rate_limit_wait_seconds{mode}` tracks time spent on the bucket.

mod metrics;
mod tracing;

pub use self::metrics::*;
pub use self::tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
	/// Entry to the dispatcher.
	Attempt,
	/// Upstream response received (any status).
	Success,
	/// Construction or transport failure propagated back to the caller.
	Failure,
	/// Caller cancelled before the response arrived.
	Cancelled,
}
impl DispatchOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			DispatchOutcome::Attempt => "attempt",
			DispatchOutcome::Success => "success",
			DispatchOutcome::Failure => "failure",
			DispatchOutcome::Cancelled => "cancelled",
		}
	}

	/// Classifies a finished dispatch.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => Self::Success,
			Err(e) if e.is_cancelled() => Self::Cancelled,
			Err(_) => Self::Failure,
		}
	}
}
impl Display for DispatchOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
