// SPDX-FileCopyrightText: 2026 The vpn-ca authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! One-time CA initialization.

use tokio::fs;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::error::{CaError, Result};
use crate::VpnCa;

/// Initialize a fresh CA: generate the keypair and self-signed CA
/// certificate, import the certificate to the cloud certificate manager
/// and move the private key into the secret store.
///
/// Two independent guards reject re-initialization: the local pki
/// directory and the remote CA key secret. Either alone is an incomplete
/// signal of "already done".
///
/// A failure after the PKI tool has run leaves a partially-initialized
/// pki directory behind; that state requires manual operator cleanup. No
/// automatic rollback is attempted, since a retry under a different name
/// would create an inconsistent CA identity.
pub(crate) async fn ca_init(ca: &VpnCa) -> Result<()> {
    debug!("checking for existing pki directory");
    let pki_dir = ca.easyrsa.pki_dir();
    let pki_exists = fs::try_exists(&pki_dir).await.map_err(|source| CaError::Io {
        path: pki_dir.clone(),
        source,
    })?;
    if pki_exists {
        return Err(CaError::AlreadyInitialized(format!(
            "a pki directory already exists at {}; remove it first if you really \
             want to re-initialize",
            pki_dir.display()
        )));
    }

    debug!("checking for existing CA key in the secret store");
    if ca
        .custodian
        .key_exists_in_store(&ca.config.ca_key_secret)
        .await?
    {
        return Err(CaError::AlreadyInitialized(format!(
            "a CA private key already exists in the secret store under '{}'; \
             remove it first if you really want to re-initialize",
            ca.config.ca_key_secret
        )));
    }

    ca.easyrsa.init_pki().await?;
    ca.easyrsa.build_ca(&ca.config.ca_cn).await?;

    debug!("reading CA certificate and private key");
    let ca_cert = read_pem(&ca.easyrsa.ca_cert_path()).await?;
    let ca_key = Zeroizing::new(read_pem(&ca.custodian.ca_key_path()).await?);

    // The CA certificate is its own chain.
    ca.importer.import(&ca_cert, &ca_key, &ca_cert).await?;

    ca.custodian
        .persist_and_wipe("ca", &ca.config.ca_key_secret)
        .await?;

    info!(cn = %ca.config.ca_cn, "CA initialized, private key saved to the store");
    Ok(())
}

pub(crate) async fn read_pem(path: &std::path::Path) -> Result<String> {
    fs::read_to_string(path).await.map_err(|source| CaError::Io {
        path: path.to_path_buf(),
        source,
    })
}
