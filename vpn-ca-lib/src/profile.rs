// SPDX-FileCopyrightText: 2026 The vpn-ca authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! OpenVPN client connection profiles.
//!
//! After a client certificate has been issued, its private key and
//! certificate (plus the CA certificate) are retrievable from the pki
//! directory by common name; this module renders them into a `.ovpn`
//! profile. Pure string substitution, no certificate processing.

use std::io;

use zeroize::Zeroizing;

use crate::ca::read_pem;
use crate::config::ProfileParams;
use crate::error::{CaError, Result};
use crate::VpnCa;

const CERT_MARKER: &str = "-----BEGIN CERTIFICATE-----";

pub(crate) async fn client_profile(ca: &VpnCa, cn: &str) -> Result<String> {
    let private_key = Zeroizing::new(read_pem(&ca.easyrsa.private_key_path(cn)).await?);

    let cert_path = ca.easyrsa.issued_cert_path(cn);
    let cert_full = read_pem(&cert_path).await?;
    // Issued cert files carry a human-readable prologue; keep only the PEM
    // block itself.
    let cert = match cert_full.rfind(CERT_MARKER) {
        Some(start) => &cert_full[start..],
        None => {
            return Err(CaError::Io {
                path: cert_path,
                source: io::Error::new(io::ErrorKind::InvalidData, "no certificate marker found"),
            })
        }
    };

    let ca_cert = read_pem(&ca.easyrsa.ca_cert_path()).await?;

    Ok(render(
        cn,
        &ca.config.vpn_endpoint_id,
        &ca.config.profile,
        &ca_cert,
        cert,
        &private_key,
    ))
}

fn render(
    cn: &str,
    endpoint_id: &str,
    params: &ProfileParams,
    ca_cert: &str,
    cert: &str,
    private_key: &str,
) -> String {
    let ProfileParams {
        protocol,
        port,
        region,
    } = params;

    format!(
        "\nclient\n\
         dev tun\n\
         proto {protocol}\n\
         remote {cn}.{endpoint_id}.prod.clientvpn.{region}.amazonaws.com {port}\n\
         remote-random-hostname\n\
         resolv-retry infinite\n\
         nobind\n\
         persist-key\n\
         persist-tun\n\
         remote-cert-tls server\n\
         cipher AES-256-GCM\n\
         verb 3\n\
         <ca>\n\
         {ca_cert}\n\
         </ca>\n\
         \n\
         reneg-sec 0\n\
         \n\
         <cert>\n\
         {cert}\n\
         </cert>\n\
         <key>\n\
         {private_key}\n\
         </key>\n"
    )
}
