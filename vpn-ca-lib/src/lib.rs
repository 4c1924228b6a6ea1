// SPDX-FileCopyrightText: 2026 The vpn-ca authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Private-CA lifecycle management for a certificate-based VPN, as a
//! library.
//!
//! The CA's private key lives in a remote secret store and is written to
//! local disk only for the instant a signing operation needs it; the
//! custodian guarantees deletion on every exit path, including mid-way
//! failures of the PKI tool. All actual key generation and X.509 signing
//! is delegated to the external `easyrsa` command.
//!
//! Example usage:
//! ```no_run
//! # use vpn_ca_lib::{Config, ProfileParams, VpnCa};
//! # async fn example() -> vpn_ca_lib::Result<()> {
//! let config = Config {
//!     easyrsa_dir: "easyrsa3".into(),
//!     ca_cn: "Example Org CA".to_string(),
//!     server_cn: "vpn.example.org".to_string(),
//!     ca_key_secret: "vpn/ca-key".to_string(),
//!     server_key_secret: "vpn/server-key".to_string(),
//!     vpn_endpoint_id: "cvpn-endpoint-0a1b2c3d".to_string(),
//!     crl_days: vpn_ca_lib::DEFAULT_CRL_DAYS,
//!     profile: ProfileParams {
//!         protocol: "udp".to_string(),
//!         port: 443,
//!         region: "eu-central-1".to_string(),
//!     },
//! };
//!
//! // Collaborators backed by AWS (Secrets Manager, ACM, EC2 Client VPN).
//! let ca = VpnCa::connect_aws(config).await;
//!
//! // One-time CA setup; afterwards the CA key exists only in the store.
//! ca.ca_init().await?;
//!
//! // Issue the server certificate, then a client certificate with its
//! // connection profile.
//! ca.server_create().await?;
//! ca.client_create("alice-smith").await?;
//! let profile = ca.client_profile("alice-smith").await?;
//! # Ok(())
//! # }
//! ```

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod backend;
mod ca;
mod cert;
pub mod config;
pub mod custody;
mod easyrsa;
pub mod error;
mod profile;
mod revocation;

use std::sync::Arc;

use crate::backend::{CertImporter, CrlPublisher, SecretStore};
use crate::custody::KeyCustodian;
use crate::easyrsa::EasyRsa;

pub use crate::config::{Config, ProfileParams, DEFAULT_CRL_DAYS};
pub use crate::error::{CaError, Result};

/// A handle to one CA instance: its configuration, the PKI tool runner,
/// the key custodian and the cloud collaborators.
pub struct VpnCa {
    pub(crate) config: Config,
    pub(crate) easyrsa: EasyRsa,
    pub(crate) custodian: KeyCustodian,
    pub(crate) importer: Arc<dyn CertImporter>,
    pub(crate) publisher: Arc<dyn CrlPublisher>,
}

impl VpnCa {
    /// Set up a CA instance with explicit collaborators.
    pub fn new(
        config: Config,
        store: Arc<dyn SecretStore>,
        importer: Arc<dyn CertImporter>,
        publisher: Arc<dyn CrlPublisher>,
    ) -> Self {
        let easyrsa = EasyRsa::new(config.easyrsa_dir.clone());
        let custodian = KeyCustodian::new(store, easyrsa.pki_dir(), config.ca_key_secret.clone());

        Self {
            config,
            easyrsa,
            custodian,
            importer,
            publisher,
        }
    }

    /// Set up a CA instance against the AWS collaborators (Secrets Manager,
    /// ACM, EC2 Client VPN), using the default credential/region chain.
    pub async fn connect_aws(config: Config) -> Self {
        let (store, importer, publisher) = backend::aws::aws_collaborators().await;
        Self::new(config, store, importer, publisher)
    }

    /// The key custodian for this instance.
    pub fn custodian(&self) -> &KeyCustodian {
        &self.custodian
    }

    /// Initialize the CA: one-time keypair generation, certificate import
    /// and hand-off of the private key to the secret store.
    pub async fn ca_init(&self) -> Result<()> {
        ca::ca_init(self).await
    }

    /// Issue the server certificate and store its private key.
    pub async fn server_create(&self) -> Result<()> {
        cert::server_create(self).await
    }

    /// Issue a client certificate for `cn`; key material stays on local
    /// disk for profile pickup.
    pub async fn client_create(&self, cn: &str) -> Result<()> {
        cert::client_create(self, cn).await
    }

    /// Render the `.ovpn` connection profile for an issued client.
    pub async fn client_profile(&self, cn: &str) -> Result<String> {
        profile::client_profile(self, cn).await
    }

    /// Revoke the certificate for `cn` and republish the CRL.
    pub async fn client_revoke(&self, cn: &str) -> Result<()> {
        revocation::client_revoke(self, cn).await
    }

    /// Regenerate the CRL from current revocation state and republish it.
    pub async fn crl_regenerate(&self) -> Result<()> {
        revocation::crl_regenerate(self).await
    }
}
