//! Single-request dispatch: encode, attach the token, wait on the bucket, `GET`.
//!
//! Construction happens before the rate limiter is consulted, so a malformed request never
//! spends a token. Once a token is spent it stays spent, whether the call succeeds, fails,
//! or is cancelled mid-flight: the quota counts attempts that reach the crawler.

// std
use std::{future, pin::pin};
// crates.io
use tokio::time::Instant;
// self
use crate::{
	_prelude::*,
	client::{Client, RequestMode},
	error::{CancelStage, TransportError},
	obs::{self, DispatchOutcome, DispatchSpan},
	options::RequestOptions,
	transport::{HttpResponse, UpstreamTransport},
};

impl<T> Client<T>
where
	T: ?Sized + UpstreamTransport,
{
	/// Dispatches one crawler request and returns the upstream response verbatim.
	///
	/// Dropping the returned future cancels the dispatch; see
	/// [`dispatch_with_cancel`](Self::dispatch_with_cancel) for an explicit signal.
	pub async fn dispatch(
		&self,
		options: &RequestOptions,
		mode: RequestMode,
	) -> Result<HttpResponse> {
		self.dispatch_with_cancel(options, mode, future::pending()).await
	}

	/// Dispatches one crawler request, aborting as soon as `cancel` resolves.
	///
	/// Cancellation while parked on the rate limiter leaves the bucket untouched and yields
	/// [`Error::Cancelled`] with [`CancelStage::RateLimit`]. Cancellation during the upstream
	/// call drops the in-flight request and yields [`CancelStage::Network`].
	pub async fn dispatch_with_cancel<F>(
		&self,
		options: &RequestOptions,
		mode: RequestMode,
		cancel: F,
	) -> Result<HttpResponse>
	where
		F: Future<Output = ()>,
	{
		let span = DispatchSpan::new(mode);

		obs::record_dispatch_outcome(mode, DispatchOutcome::Attempt);

		let result = span.instrument(self.send(&span, options, mode, cancel)).await;

		obs::record_dispatch_outcome(mode, DispatchOutcome::of(&result));

		result
	}

	/// Builds the final crawler URL for `options` without consuming a rate-limit token.
	///
	/// Parameters keep table order and `token` comes last; escaping happens here, once.
	pub fn request_url(&self, options: &RequestOptions, mode: RequestMode) -> Result<Url> {
		options.validate()?;

		let mut url = self.base_url.clone();

		url.query_pairs_mut()
			.extend_pairs(options.encode().iter())
			.append_pair("token", self.token(mode).expose());

		Ok(url)
	}

	async fn send<F>(
		&self,
		span: &DispatchSpan,
		options: &RequestOptions,
		mode: RequestMode,
		cancel: F,
	) -> Result<HttpResponse>
	where
		F: Future<Output = ()>,
	{
		let url = self.request_url(options, mode)?;
		let mut cancel = pin!(cancel);
		let waiting = span.stage(CancelStage::RateLimit).instrument(self.rate_limiter.acquire(1));
		let parked_at = Instant::now();
		let acquired = tokio::select! {
			biased;
			() = &mut cancel => Err(Error::Cancelled { stage: CancelStage::RateLimit }),
			acquired = waiting => acquired.map_err(Error::from),
		};

		obs::record_rate_limit_wait(mode, parked_at.elapsed());
		acquired?;

		let fetching = span.stage(CancelStage::Network).instrument(self.transport.get(url));

		tokio::select! {
			biased;
			() = &mut cancel => Err(Error::Cancelled { stage: CancelStage::Network }),
			response = fetching => response.map_err(|e| Error::from(TransportError::network(e))),
		}
	}
}
