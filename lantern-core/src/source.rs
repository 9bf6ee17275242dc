use async_trait::async_trait;

use crate::error::Result;
use crate::models::Snapshot;

/// Something that can fetch the current server snapshot.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn poll(&self) -> Result<Snapshot>;
}
