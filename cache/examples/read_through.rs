//! Minimal read-through usage: misses run the loader once, hits skip it.

use std::time::Duration;

use strata_cache::{with_ttl, BoxError, Cache, MemoryStore};

async fn fetch_motd() -> Result<String, BoxError> {
  // Stands in for a database query or an upstream HTTP call.
  tokio::time::sleep(Duration::from_millis(200)).await;
  Ok("the cache you read through is the herd you never see".to_owned())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
  let cache = Cache::builder(MemoryStore::new()).build()?;
  let ttl = [with_ttl(Duration::from_secs(30))];

  let motd: String = cache
    .get_or_load("motd", Some(|| fetch_motd()), &ttl)
    .await?;
  println!("loaded : {motd}");

  // Same key again: served from the backend, loader untouched.
  let cached: String = cache.get("motd").await?;
  println!("cached : {cached}");

  let metrics = cache.metrics();
  println!(
    "metrics: {} hit(s), {} miss(es), {} load(s)",
    metrics.hits, metrics.misses, metrics.loads
  );
  Ok(())
}
