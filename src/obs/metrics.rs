// self
use crate::{_prelude::*, client::RequestMode, obs::DispatchOutcome};

/// Bumps `proxycrawl_dispatch_total{mode, outcome}`.
pub fn record_dispatch_outcome(mode: RequestMode, outcome: DispatchOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"proxycrawl_dispatch_total",
			"mode" => mode.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (mode, outcome);
	}
}

/// Records how long a dispatch sat on the rate limiter in
/// `proxycrawl_rate_limit_wait_seconds{mode}`, whether or not it got a token.
pub fn record_rate_limit_wait(mode: RequestMode, waited: Duration) {
	#[cfg(feature = "metrics")]
	{
		metrics::histogram!("proxycrawl_rate_limit_wait_seconds", "mode" => mode.as_str())
			.record(waited.as_secs_f64());
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (mode, waited);
	}
}
