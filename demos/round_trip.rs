//! Routes ordinary HTTP requests through the crawler without the calling code knowing.
//!
//! 1. Build one shared [`Client`] from the two access tokens.
//! 2. Wrap it in a [`RenderedRoundTripper`] or [`PlainRoundTripper`].
//! 3. Hand the adapter to code that only knows about `Arc<dyn RoundTrip>`.
//!
//! Set `PROXYCRAWL_NORMAL_TOKEN` and `PROXYCRAWL_JS_TOKEN` before running.

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::Result;
// self
use proxycrawl::{
	client::Client,
	http::{self, header::USER_AGENT},
	round_trip::{PlainRoundTripper, RenderedRoundTripper, RoundTrip},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let client = Arc::new(Client::new(
		env::var("PROXYCRAWL_NORMAL_TOKEN")?,
		env::var("PROXYCRAWL_JS_TOKEN")?,
	)?);
	let rendered: Arc<dyn RoundTrip> = Arc::new(RenderedRoundTripper::new(client.clone()));
	let plain: Arc<dyn RoundTrip> = Arc::new(PlainRoundTripper::new(client));

	fetch(rendered.as_ref(), "https://example.com/").await?;
	fetch(plain.as_ref(), "https://example.com/robots.txt").await?;

	Ok(())
}

async fn fetch(transport: &dyn RoundTrip, uri: &str) -> Result<()> {
	let request =
		http::Request::get(uri).header(USER_AGENT, "proxycrawl-demo/0.1").body(Vec::new())?;

	match transport.round_trip(request).await {
		Ok(response) => println!(
			"{uri} -> {} ({} bytes, original status {:?}).",
			response.status(),
			response.body().len(),
			response.headers().get("original_status"),
		),
		Err(e) => println!("{uri} failed ({} mode): {e}.", e.mode),
	}

	Ok(())
}
