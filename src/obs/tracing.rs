// self
use crate::{_prelude::*, client::RequestMode, error::CancelStage};

/// Future type produced by [`DispatchSpan::instrument`]; a plain passthrough without the
/// `tracing` feature.
#[cfg(feature = "tracing")]
pub type InstrumentedDispatch<F> = tracing::instrument::Instrumented<F>;
/// Future type produced by [`DispatchSpan::instrument`]; a plain passthrough without the
/// `tracing` feature.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedDispatch<F> = F;

/// Span covering one dispatch, with child spans for each suspension point.
#[derive(Clone, Debug)]
pub struct DispatchSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl DispatchSpan {
	/// Opens the `proxycrawl.dispatch` span for `mode`.
	pub fn new(mode: RequestMode) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self { span: tracing::info_span!("proxycrawl.dispatch", mode = mode.as_str()) }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = mode;

			Self {}
		}
	}

	/// Opens a `proxycrawl.dispatch.stage` child span for the wait at `stage`.
	pub fn stage(&self, stage: CancelStage) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self {
				span: tracing::debug_span!(
					parent: &self.span,
					"proxycrawl.dispatch.stage",
					stage = stage.label()
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			self.clone()
		}
	}

	/// Runs `fut` inside this span; no guard is held across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedDispatch<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
