// SPDX-FileCopyrightText: 2026 The vpn-ca authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Collaborator interfaces consumed by the core.
//!
//! The secret store, the certificate importer and the CRL publisher are
//! external services. They are modeled as object-safe traits so that tests
//! can substitute fakes per collaborator; the AWS-backed implementations
//! live in [`aws`].

use async_trait::async_trait;

use crate::error::Result;

pub mod aws;

/// Remote store for private key material.
///
/// Only create-once semantics are exposed: there is no update or overwrite
/// operation, so a key cannot be rotated without explicit operator action
/// against the store itself.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Whether a secret exists under `name`. "Not found" is `false`; any
    /// other failure is `CaError::StoreUnavailable`.
    async fn exists(&self, name: &str) -> Result<bool>;

    /// Create the secret `name` with `value`. Fails with
    /// `CaError::AlreadyExists` if the name is already populated.
    async fn create(&self, name: &str, value: &str) -> Result<()>;

    /// Fetch the value of secret `name`. Fails with `CaError::KeyNotFound`
    /// if absent.
    async fn get(&self, name: &str) -> Result<String>;
}

/// Cloud certificate manager that receives issued certificates.
///
/// The returned import handle is not persisted by the core.
#[async_trait]
pub trait CertImporter: Send + Sync {
    async fn import(&self, certificate: &str, private_key: &str, chain: &str) -> Result<()>;
}

/// VPN endpoint that receives CRL uploads. Full-replace semantics: each
/// published CRL supersedes the previous one entirely.
#[async_trait]
pub trait CrlPublisher: Send + Sync {
    async fn publish(&self, crl_pem: &str, endpoint_id: &str) -> Result<()>;
}
