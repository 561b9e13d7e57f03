//! Token-bucket limiter that keeps dispatches under the crawler's request quota.
//!
//! The bucket holds at most `quantum` tokens and starts full. Every `interval` another
//! `quantum` tokens land, capped at capacity. Waiters queue on an eventually fair async
//! mutex: a newcomer may occasionally take the turn at handoff, but a parked waiter cannot
//! be starved and grants stay in arrival order on average. The bucket state itself sits
//! behind a short synchronous lock that is never held across an `.await`.
//!
//! Cancelling an [`RateLimiter::acquire`] future (by dropping it) before it resolves never
//! deducts anything: tokens only leave the bucket in the same poll that returns `Ok`.

// crates.io
use tokio::time::{self, Instant};
// self
use crate::{_prelude::*, error::ConfigError};

/// Bucket settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
	/// Tokens added per refill; also the bucket capacity.
	pub quantum: u64,
	/// Time between refills.
	#[serde(rename = "interval_ms", with = "interval_ms")]
	pub interval: Duration,
}
impl RateLimitConfig {
	/// Creates a config adding `quantum` tokens every `interval`.
	pub const fn new(quantum: u64, interval: Duration) -> Self {
		Self { quantum, interval }
	}

	/// Rejects settings that could never hand out a token.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.quantum == 0 {
			return Err(ConfigError::InvalidRateLimit { reason: "quantum must be positive" });
		}
		if self.interval.is_zero() {
			return Err(ConfigError::InvalidRateLimit { reason: "interval must be positive" });
		}

		Ok(())
	}
}
impl Default for RateLimitConfig {
	/// The crawler allows 20 requests per second (one per 50ms); stay below it at one
	/// request per 60ms.
	fn default() -> Self {
		Self::new(1, Duration::from_millis(60))
	}
}

#[derive(Debug)]
struct Bucket {
	available: u64,
	last_refill: Instant,
}

/// Concurrency-safe token bucket.
#[derive(Debug)]
pub struct RateLimiter {
	config: RateLimitConfig,
	bucket: Mutex<Bucket>,
	queue: AsyncMutex<()>,
}
impl RateLimiter {
	/// Builds a full bucket after validating `config`.
	pub fn new(config: RateLimitConfig) -> Result<Self, ConfigError> {
		config.validate()?;

		Ok(Self {
			config,
			bucket: Mutex::new(Bucket { available: config.quantum, last_refill: Instant::now() }),
			queue: AsyncMutex::new(()),
		})
	}

	/// Returns the settings the bucket was built with.
	pub fn config(&self) -> RateLimitConfig {
		self.config
	}

	/// Maximum number of tokens the bucket can hold.
	pub fn capacity(&self) -> u64 {
		self.config.quantum
	}

	/// Tokens available right now, after applying any pending refills.
	pub fn available(&self) -> u64 {
		let mut bucket = self.bucket.lock();

		self.refill(&mut bucket, Instant::now());

		bucket.available
	}

	/// Waits until `count` tokens are available, then deducts them.
	///
	/// Fails immediately when `count` exceeds [`capacity`](Self::capacity), because such a
	/// request could never be satisfied.
	pub async fn acquire(&self, count: u64) -> Result<(), ConfigError> {
		self.ensure_within_capacity(count)?;

		if count == 0 {
			return Ok(());
		}

		let _turn = self.queue.lock().await;

		loop {
			let next_refill = {
				let mut bucket = self.bucket.lock();

				if self.take(&mut bucket, count) {
					return Ok(());
				}

				bucket.last_refill + self.config.interval
			};

			time::sleep_until(next_refill).await;
		}
	}

	/// Deducts `count` tokens only if they are available now and nobody is queued ahead.
	pub fn try_acquire(&self, count: u64) -> Result<bool, ConfigError> {
		self.ensure_within_capacity(count)?;

		let Some(_turn) = self.queue.try_lock() else {
			return Ok(false);
		};
		let mut bucket = self.bucket.lock();

		Ok(self.take(&mut bucket, count))
	}

	fn ensure_within_capacity(&self, count: u64) -> Result<(), ConfigError> {
		if count > self.capacity() {
			Err(ConfigError::AcquireExceedsCapacity {
				requested: count,
				capacity: self.capacity(),
			})
		} else {
			Ok(())
		}
	}

	fn take(&self, bucket: &mut Bucket, count: u64) -> bool {
		self.refill(bucket, Instant::now());

		if bucket.available >= count {
			bucket.available -= count;

			true
		} else {
			false
		}
	}

	fn refill(&self, bucket: &mut Bucket, now: Instant) {
		let interval = self.config.interval;
		let elapsed = now.saturating_duration_since(bucket.last_refill);
		let ticks = elapsed.as_nanos() / interval.as_nanos();

		if ticks == 0 {
			return;
		}

		let added = u64::try_from(ticks).unwrap_or(u64::MAX).saturating_mul(self.config.quantum);

		bucket.available = bucket.available.saturating_add(added).min(self.capacity());

		// Keep refills aligned to the original schedule; a long idle gap just resets it.
		match u32::try_from(ticks).ok().and_then(|ticks| interval.checked_mul(ticks)) {
			Some(advance) => bucket.last_refill += advance,
			None => bucket.last_refill = now,
		}
	}
}

mod interval_ms {
	// self
	use crate::_prelude::*;

	pub fn serialize<S>(interval: &Duration, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_u64(u64::try_from(interval.as_millis()).unwrap_or(u64::MAX))
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		u64::deserialize(deserializer).map(Duration::from_millis)
	}
}
