use async_trait::async_trait;

/// Object storage port for avatar blobs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> anyhow::Result<()>;

    /// Create a time-limited signed URL for an existing object.
    async fn signed_url(&self, key: &str, ttl_secs: u64) -> anyhow::Result<String>;
}
