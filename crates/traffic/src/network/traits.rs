//! Pluggable data fetching.
//!
//! Hosts implement this to hand the engine raw station and trip files from
//! wherever they live (HTTP, disk, an embedded asset).

use std::future::Future;
use std::pin::Pin;

use crate::models::types::Result;

/// Fetch raw bytes for a named source (URL, path, asset key)
pub trait DataFetcher: Send + Sync {
    fn fetch<'a>(
        &'a self,
        source: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;
}
