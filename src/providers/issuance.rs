//! Issuance provider trait and method identifiers
//!
//! Defines the interface for pluggable certificate-issuance providers.

use crate::domain::{AccessConfig, CertificateBundle, DomainConfig};
use crate::errors::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tokio_util::sync::CancellationToken;

/// Issuance method a domain configuration can select
///
/// The variants mirror the DNS providers a certificate authority challenge
/// can be satisfied through. Stored in the database as the kebab-case string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssuanceMethod {
    /// Alibaba Cloud DNS
    Aliyun,
    /// Tencent Cloud DNS
    Tencent,
    /// Huawei Cloud DNS
    Huawei,
    /// AWS Route 53
    Route53,
    /// Cloudflare DNS
    Cloudflare,
    /// NameSilo DNS
    Namesilo,
    /// GoDaddy DNS
    Godaddy,
}

impl IssuanceMethod {
    /// Get the database representation of this method
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aliyun => "aliyun",
            Self::Tencent => "tencent",
            Self::Huawei => "huawei",
            Self::Route53 => "route53",
            Self::Cloudflare => "cloudflare",
            Self::Namesilo => "namesilo",
            Self::Godaddy => "godaddy",
        }
    }
}

impl FromStr for IssuanceMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "aliyun" => Ok(Self::Aliyun),
            "tencent" => Ok(Self::Tencent),
            "huawei" => Ok(Self::Huawei),
            "route53" => Ok(Self::Route53),
            "cloudflare" => Ok(Self::Cloudflare),
            "namesilo" => Ok(Self::Namesilo),
            "godaddy" => Ok(Self::Godaddy),
            _ => Err(format!("Unknown issuance method: {}", s)),
        }
    }
}

impl fmt::Display for IssuanceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A configured issuance provider, ready to obtain a certificate
///
/// Instances are built per run by an [`IssuanceProviderFactory`] with the
/// domain and credentials already bound, so `apply` needs nothing beyond a
/// cancellation token.
#[async_trait]
pub trait IssuanceProvider: Send + Sync {
    /// Obtain a certificate bundle for the bound domain
    ///
    /// May be slow (DNS propagation, CA rate limits). Implementations should
    /// observe the token and abort promptly when it is cancelled.
    async fn apply(&self, cancel: &CancellationToken) -> Result<CertificateBundle>;
}

/// Factory for issuance providers
///
/// Implementations must be Send + Sync for use in async contexts.
pub trait IssuanceProviderFactory: Send + Sync + std::fmt::Debug {
    /// Get the method identifier this factory serves
    fn method(&self) -> IssuanceMethod;

    /// Build a provider bound to the given configuration
    ///
    /// # Arguments
    /// - `config`: The domain configuration requesting issuance
    /// - `access`: Resolved issuance credentials, if the configuration references any
    ///
    /// Fails with a validation error when required credential fields are
    /// missing from `access`.
    fn create(
        &self,
        config: &DomainConfig,
        access: Option<&AccessConfig>,
    ) -> Result<Box<dyn IssuanceProvider>>;
}
