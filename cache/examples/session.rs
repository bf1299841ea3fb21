//! The fluent per-call session: key, TTL, bypass, loader, cancellation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strata_cache::{BoxError, Cache, EncodedStore, JsonCodec};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Quote {
  symbol: String,
  cents: u64,
}

async fn quote_from_upstream(symbol: &str) -> Result<Quote, BoxError> {
  tokio::time::sleep(Duration::from_millis(100)).await;
  Ok(Quote {
    symbol: symbol.to_owned(),
    cents: 13_370,
  })
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
  // A byte-oriented backend: every value round-trips through JSON.
  let cache: Cache<EncodedStore<JsonCodec>> = Cache::builder(EncodedStore::json()).build()?;

  let quote: Quote = cache
    .key("quote:STRA")
    .ttl(Duration::from_secs(2))
    .load_with(|| quote_from_upstream("STRA"))
    .find()
    .await?;
  println!("first  : {quote:?}");

  // Bypass mode: always fresh, never cached. A token is attached the way
  // a request handler would thread its shutdown signal through.
  let token = CancellationToken::new();
  let fresh: Quote = cache
    .key("quote:STRA")
    .should_cache(false)
    .cancel_with(token)
    .load_with(|| quote_from_upstream("STRA"))
    .find()
    .await?;
  println!("fresh  : {fresh:?}");

  Ok(())
}
