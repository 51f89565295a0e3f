use crate::utils::error::Result;
use async_trait::async_trait;
use std::net::IpAddr;

/// DNS lookup port. The production implementation wraps hickory-resolver;
/// tests substitute a table-backed mock so no real DNS traffic is needed.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn lookup(&self, domain: &str) -> Result<Vec<IpAddr>>;
}
