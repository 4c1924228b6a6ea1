// SPDX-FileCopyrightText: 2026 The vpn-ca authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration for a CA instance.
//!
//! All collaborator addresses and identity names are passed in explicitly;
//! there is no ambient (environment or global) state in the library.

use std::path::PathBuf;

/// CRL validity window used when none is configured.
pub const DEFAULT_CRL_DAYS: u32 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory that contains the `easyrsa` script. The tool keeps all of
    /// its state in a `pki/` subdirectory of this path.
    pub easyrsa_dir: PathBuf,

    /// Subject common name for the CA certificate.
    pub ca_cn: String,

    /// Subject common name for the server certificate.
    pub server_cn: String,

    /// Secret-store name under which the CA private key is kept.
    pub ca_key_secret: String,

    /// Secret-store name under which the server private key is kept.
    pub server_key_secret: String,

    /// Identifier of the VPN endpoint that receives CRL uploads.
    pub vpn_endpoint_id: String,

    /// Validity window, in days, for generated CRLs.
    pub crl_days: u32,

    /// Connection parameters rendered into client profiles.
    pub profile: ProfileParams,
}

/// Connection parameters for the `.ovpn` client profile template.
#[derive(Debug, Clone)]
pub struct ProfileParams {
    pub protocol: String,
    pub port: u16,
    pub region: String,
}
