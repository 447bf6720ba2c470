//! Deployment provider trait and target identifiers
//!
//! Defines the interface for pluggable certificate-deployment providers.

use crate::domain::{AccessConfig, CertificateBundle, DomainConfig};
use crate::errors::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tokio_util::sync::CancellationToken;

/// Deployment target a domain configuration can select
///
/// Stored in the database as the kebab-case string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeployTarget {
    /// Alibaba Cloud OSS bucket
    AliyunOss,
    /// Alibaba Cloud CDN
    AliyunCdn,
    /// Tencent Cloud CDN
    TencentCdn,
    /// Qiniu CDN
    QiniuCdn,
    /// Remote host over SSH
    Ssh,
    /// Arbitrary HTTP webhook
    Webhook,
    /// Local filesystem paths
    Local,
}

impl DeployTarget {
    /// Get the database representation of this target
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AliyunOss => "aliyun-oss",
            Self::AliyunCdn => "aliyun-cdn",
            Self::TencentCdn => "tencent-cdn",
            Self::QiniuCdn => "qiniu-cdn",
            Self::Ssh => "ssh",
            Self::Webhook => "webhook",
            Self::Local => "local",
        }
    }
}

impl FromStr for DeployTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "aliyun-oss" => Ok(Self::AliyunOss),
            "aliyun-cdn" => Ok(Self::AliyunCdn),
            "tencent-cdn" => Ok(Self::TencentCdn),
            "qiniu-cdn" => Ok(Self::QiniuCdn),
            "ssh" => Ok(Self::Ssh),
            "webhook" => Ok(Self::Webhook),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown deploy target: {}", s)),
        }
    }
}

impl fmt::Display for DeployTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A configured deployment provider, ready to push a certificate
///
/// Instances are built per run by a [`DeploymentProviderFactory`] with the
/// domain, certificate material, and credentials already bound.
#[async_trait]
pub trait DeploymentProvider: Send + Sync {
    /// Push the bound certificate to the target system
    ///
    /// May perform network calls. Implementations should observe the token
    /// and abort promptly when it is cancelled.
    async fn deploy(&self, cancel: &CancellationToken) -> Result<()>;
}

/// Factory for deployment providers
///
/// Implementations must be Send + Sync for use in async contexts.
pub trait DeploymentProviderFactory: Send + Sync + std::fmt::Debug {
    /// Get the target identifier this factory serves
    fn target(&self) -> DeployTarget;

    /// Build a provider bound to the given configuration and certificate
    ///
    /// # Arguments
    /// - `config`: The domain configuration requesting deployment
    /// - `bundle`: The certificate material to deploy
    /// - `access`: Resolved target credentials, if the configuration references any
    ///
    /// Fails with a validation error when required credential fields are
    /// missing from `access`.
    fn create(
        &self,
        config: &DomainConfig,
        bundle: &CertificateBundle,
        access: Option<&AccessConfig>,
    ) -> Result<Box<dyn DeploymentProvider>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_target_roundtrip() {
        for target in [
            DeployTarget::AliyunOss,
            DeployTarget::AliyunCdn,
            DeployTarget::TencentCdn,
            DeployTarget::QiniuCdn,
            DeployTarget::Ssh,
            DeployTarget::Webhook,
            DeployTarget::Local,
        ] {
            let s = target.as_str();
            let parsed: DeployTarget = s.parse().unwrap();
            assert_eq!(target, parsed);
        }
    }

    #[test]
    fn test_deploy_target_display() {
        assert_eq!(DeployTarget::AliyunOss.to_string(), "aliyun-oss");
        assert_eq!(DeployTarget::Ssh.to_string(), "ssh");
        assert_eq!(DeployTarget::Local.to_string(), "local");
    }

    #[test]
    fn test_deploy_target_unknown_fails() {
        let result = "ftp".parse::<DeployTarget>();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Unknown deploy target"));
    }

    #[test]
    fn test_deploy_target_serialization() {
        let target = DeployTarget::TencentCdn;
        let json = serde_json::to_string(&target).unwrap();
        assert_eq!(json, "\"tencent-cdn\"");

        let parsed: DeployTarget = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, DeployTarget::TencentCdn);
    }
}
