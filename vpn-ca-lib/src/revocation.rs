// SPDX-FileCopyrightText: 2026 The vpn-ca authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Certificate revocation and CRL distribution.
//!
//! A revocation is complete only once the regenerated CRL has been
//! published to the VPN endpoint. Each generated CRL fully supersedes the
//! previous one; until a publish succeeds the local `crl.pem` is not
//! effective and the operation reports failure.

use tracing::{debug, error, info};

use crate::ca::read_pem;
use crate::cert::check_common_name;
use crate::error::Result;
use crate::VpnCa;

/// Revoke the certificate issued for `cn`, regenerate the CRL and publish
/// it to the VPN endpoint. `issued → revoked` is one-way and terminal.
pub(crate) async fn client_revoke(ca: &VpnCa, cn: &str) -> Result<()> {
    check_common_name(cn)?;

    ca.custodian
        .with_ca_key(|| async move {
            ca.easyrsa.revoke(cn).await?;
            ca.easyrsa.gen_crl(ca.config.crl_days).await?;
            publish_crl(ca).await
        })
        .await?;

    info!(%cn, "certificate revoked, CRL republished");
    Ok(())
}

/// Regenerate the CRL from the current revocation state and republish it,
/// without adding a new revocation.
pub(crate) async fn crl_regenerate(ca: &VpnCa) -> Result<()> {
    let result = ca
        .custodian
        .with_ca_key(|| async move {
            ca.easyrsa.gen_crl(ca.config.crl_days).await?;
            publish_crl(ca).await
        })
        .await;

    match result {
        Ok(()) => {
            info!("CRL regenerated and republished");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "CRL regeneration failed");
            Err(e)
        }
    }
}

async fn publish_crl(ca: &VpnCa) -> Result<()> {
    debug!("reading crl.pem");
    let crl = read_pem(&ca.easyrsa.crl_path()).await?;

    ca.publisher
        .publish(&crl, &ca.config.vpn_endpoint_id)
        .await
}
