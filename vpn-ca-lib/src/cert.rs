// SPDX-FileCopyrightText: 2026 The vpn-ca authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Server and client certificate issuance.

use tracing::{debug, info};

use crate::ca::read_pem;
use crate::error::{CaError, Result};
use crate::VpnCa;

/// Issue the server certificate and move its private key into the secret
/// store.
///
/// Not idempotent: if the server key secret is already populated the
/// operation fails with `AlreadyIssued` before the PKI tool is invoked.
pub(crate) async fn server_create(ca: &VpnCa) -> Result<()> {
    let secret = &ca.config.server_key_secret;

    debug!("checking for existing server key in the secret store");
    if ca.custodian.key_exists_in_store(secret).await? {
        return Err(CaError::AlreadyIssued(secret.clone()));
    }

    let server_cn = &ca.config.server_cn;
    check_common_name(server_cn)?;

    // -- CA key custody --
    // Sign the server certificate and persist the fresh server key while
    // the CA key is on disk; the custodian wipes the CA key afterwards on
    // every exit path.
    ca.custodian
        .with_ca_key(|| async move {
            ca.easyrsa.build_server_full(server_cn).await?;
            ca.custodian.persist_and_wipe(server_cn, secret).await
        })
        .await?;

    // -- distribution --
    let private_key = ca.custodian.read_key_from_store(secret).await?;
    let cert = read_pem(&ca.easyrsa.issued_cert_path(server_cn)).await?;
    let ca_cert = read_pem(&ca.easyrsa.ca_cert_path()).await?;

    ca.importer.import(&cert, &private_key, &ca_cert).await?;

    info!(cn = %server_cn, "server certificate issued and imported");
    Ok(())
}

/// Issue a client certificate for `cn`.
///
/// The client private key and certificate intentionally remain on local
/// disk after this returns: they are the hand-off point for the client
/// profile. Re-issuance for an existing common name is not blocked here;
/// the PKI tool rejects duplicates itself.
pub(crate) async fn client_create(ca: &VpnCa, cn: &str) -> Result<()> {
    check_common_name(cn)?;

    ca.custodian
        .with_ca_key(|| async move { ca.easyrsa.build_client_full(cn).await })
        .await?;

    info!(%cn, "client certificate issued");
    Ok(())
}

/// A common name is used as a subject identity, a file name and a secret
/// lookup key; reject anything empty or containing whitespace before it
/// reaches the PKI tool.
pub(crate) fn check_common_name(cn: &str) -> Result<()> {
    if cn.is_empty() || cn.chars().any(char::is_whitespace) {
        return Err(CaError::InvalidCommonName(cn.to_string()));
    }
    Ok(())
}
