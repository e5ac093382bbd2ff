use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use station_traffic::models::Result;
use station_traffic::{DataFetcher, TrafficError};

/// Reads sources as paths relative to a base directory
pub struct FileFetcher {
    base: PathBuf,
}

impl FileFetcher {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl DataFetcher for FileFetcher {
    fn fetch<'a>(
        &'a self,
        source: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            let path = self.base.join(source);
            log::debug!("Reading {}", path.display());
            std::fs::read(&path).map_err(|e| TrafficError::Fetch {
                source_name: path.display().to_string(),
                message: e.to_string(),
            })
        })
    }
}
