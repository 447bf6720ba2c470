//! Pluggable provider architecture
//!
//! Certplane itself carries no protocol clients for certificate authorities
//! or deployment targets. Embedders register factories here and the workflow
//! resolves them by the identifier strings stored on domain configurations.
//!
//! ## Provider kinds
//!
//! - **Issuance**: obtains a certificate bundle for a domain (keyed by DNS
//!   provider method, e.g. `cloudflare`, `route53`)
//! - **Deployment**: pushes an issued certificate to a target system (keyed
//!   by target, e.g. `aliyun-cdn`, `ssh`, `local`)

pub mod deployment;
pub mod issuance;
pub mod registry;

pub use deployment::{DeployTarget, DeploymentProvider, DeploymentProviderFactory};
pub use issuance::{IssuanceMethod, IssuanceProvider, IssuanceProviderFactory};
pub use registry::ProviderRegistry;
