//! Property tests for the renewal decision policy
//!
//! The policy is a pure function of certificate state, margin, and the
//! passed-in clock, so every property here is deterministic.

use certplane::domain::{CertificateBundle, DomainConfig, DomainConfigId};
use certplane::workflow::{RenewalDecision, RenewalPolicy};
use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;

fn bundle(leaf: &str) -> CertificateBundle {
    CertificateBundle {
        cert_url: "https://ca.example.com/certs/1".to_string(),
        cert_stable_url: "https://ca.example.com/certs/stable/1".to_string(),
        private_key: "key".to_string(),
        certificate: leaf.to_string(),
        issuer_certificate: "issuer".to_string(),
        csr: "csr".to_string(),
    }
}

fn config_with(
    certificate: Option<CertificateBundle>,
    expires_at: Option<DateTime<Utc>>,
    deployed: bool,
    now: DateTime<Utc>,
) -> DomainConfig {
    DomainConfig {
        id: DomainConfigId::new(),
        domain: "prop.example.com".to_string(),
        issuance_method: "cloudflare".to_string(),
        deploy_target: "local".to_string(),
        access_id: None,
        target_access_id: None,
        certificate,
        expires_at,
        deployed,
        enabled: true,
        created_at: now,
        updated_at: now,
    }
}

proptest! {
    #[test]
    fn margin_strictly_separates_due_from_healthy(
        hours_left in -1_000i64..10_000,
        deployed in any::<bool>(),
    ) {
        let now = Utc::now();
        let policy = RenewalPolicy::new(Duration::hours(24));
        let config =
            config_with(Some(bundle("cert")), Some(now + Duration::hours(hours_left)), deployed, now);

        let expected = if hours_left <= 24 {
            // At or inside the margin counts as due, including exactly at it.
            RenewalDecision::IssueAndDeploy
        } else if deployed {
            RenewalDecision::SkipAll
        } else {
            RenewalDecision::DeployOnly
        };
        prop_assert_eq!(policy.decide(&config, now), expected);
    }

    #[test]
    fn missing_material_is_always_due(
        deployed in any::<bool>(),
        hours_left in 0i64..10_000,
        has_expiry in any::<bool>(),
    ) {
        let now = Utc::now();
        let policy = RenewalPolicy::default();
        let expires_at = has_expiry.then(|| now + Duration::hours(hours_left));
        let config = config_with(None, expires_at, deployed, now);

        prop_assert_eq!(policy.decide(&config, now), RenewalDecision::IssueAndDeploy);
    }

    #[test]
    fn empty_leaf_counts_as_missing(
        deployed in any::<bool>(),
        hours_left in 100i64..10_000,
    ) {
        let now = Utc::now();
        let policy = RenewalPolicy::default();
        let config =
            config_with(Some(bundle("")), Some(now + Duration::hours(hours_left)), deployed, now);

        prop_assert_eq!(policy.decide(&config, now), RenewalDecision::IssueAndDeploy);
    }

    #[test]
    fn widening_the_margin_never_makes_a_due_certificate_healthy(
        hours_left in 0i64..10_000,
        narrow in 1i64..500,
        extra in 0i64..500,
        deployed in any::<bool>(),
    ) {
        let now = Utc::now();
        let config =
            config_with(Some(bundle("cert")), Some(now + Duration::hours(hours_left)), deployed, now);

        let narrow_due = RenewalPolicy::new(Duration::hours(narrow)).decide(&config, now)
            == RenewalDecision::IssueAndDeploy;
        let wide_due = RenewalPolicy::new(Duration::hours(narrow + extra)).decide(&config, now)
            == RenewalDecision::IssueAndDeploy;

        if narrow_due {
            prop_assert!(wide_due);
        }
    }
}
