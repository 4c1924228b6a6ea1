// SPDX-FileCopyrightText: 2026 The vpn-ca authors
// SPDX-License-Identifier: GPL-3.0-or-later

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "vpn-ca",
    about = "vpn-ca manages a private CA for a certificate-based VPN.",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the CA
    Ca {
        #[command(subcommand)]
        cmd: CaCommand,
    },
    /// Manage the server certificate
    Server {
        #[command(subcommand)]
        cmd: ServerCommand,
    },
    /// Manage client certificates
    Client {
        #[command(subcommand)]
        cmd: ClientCommand,
    },
    /// Manage the certificate revocation list
    Crl {
        #[command(subcommand)]
        cmd: CrlCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum CaCommand {
    /// Initialize the CA and store its private key in the secret store
    Init,
}

#[derive(Subcommand, Debug)]
pub enum ServerCommand {
    /// Issue the server certificate needed by the VPN endpoint
    Create,
}

#[derive(Subcommand, Debug)]
pub enum ClientCommand {
    /// Issue a client certificate and write its .ovpn profile
    Create {
        /// Client common name (first and last name, no spaces)
        cn: String,
    },
    /// Revoke a client certificate and republish the CRL
    Revoke {
        /// Client common name
        cn: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CrlCommand {
    /// Regenerate the CRL from current revocation state and republish it
    Regen,
}
