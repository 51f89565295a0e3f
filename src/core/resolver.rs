use crate::domain::ports::Resolver;
use crate::utils::error::Result;
use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use std::net::IpAddr;

/// Production resolver backed by the host's DNS configuration, so the tool
/// sees the same answers the deployed clients do.
pub struct SystemResolver {
    inner: TokioAsyncResolver,
}

impl SystemResolver {
    pub fn from_system_conf() -> Result<Self> {
        let inner = TokioAsyncResolver::tokio_from_system_conf()?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl Resolver for SystemResolver {
    async fn lookup(&self, domain: &str) -> Result<Vec<IpAddr>> {
        let lookup = self.inner.lookup_ip(domain).await?;
        Ok(lookup.iter().collect())
    }
}
