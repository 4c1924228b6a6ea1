// SPDX-FileCopyrightText: 2026 The vpn-ca authors
// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vpn_ca_lib::{Config, ProfileParams, VpnCa, DEFAULT_CRL_DAYS};

mod cli;

use cli::{CaCommand, ClientCommand, Command, CrlCommand, ServerCommand};

fn env_var(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set in the environment"))
}

fn config_from_env() -> Result<Config> {
    let easyrsa_dir = std::env::var("EASYRSA_DIR").unwrap_or_else(|_| "easyrsa3".to_string());

    let crl_days = match std::env::var("CRL_DAYS") {
        Ok(v) => v.parse().context("CRL_DAYS must be a number of days")?,
        Err(_) => DEFAULT_CRL_DAYS,
    };

    let port = match std::env::var("PORT") {
        Ok(v) => v.parse().context("PORT must be a port number")?,
        Err(_) => 443,
    };
    let protocol = std::env::var("PROTOCOL").unwrap_or_else(|_| "udp".to_string());

    Ok(Config {
        easyrsa_dir: easyrsa_dir.into(),
        ca_cn: env_var("CA_CN")?,
        server_cn: env_var("SERVER_CN")?,
        ca_key_secret: env_var("SECRETS_MANAGER_CA_KEY")?,
        server_key_secret: env_var("SECRETS_MANAGER_SERVER_KEY")?,
        vpn_endpoint_id: env_var("VPN_CLIENT_ENDPOINT_ID")?,
        crl_days,
        profile: ProfileParams {
            protocol,
            port,
            region: env_var("AWS_REGION")?,
        },
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = cli::Cli::parse();
    let config = config_from_env()?;
    let ca = VpnCa::connect_aws(config).await;

    match cli.cmd {
        Command::Ca {
            cmd: CaCommand::Init,
        } => {
            ca.ca_init().await?;
            println!("CA created and private key saved");
        }
        Command::Server {
            cmd: ServerCommand::Create,
        } => {
            ca.server_create().await?;
            println!("Server certificate created and private key saved");
        }
        Command::Client { cmd } => match cmd {
            ClientCommand::Create { cn } => {
                ca.client_create(&cn).await?;
                let profile = ca.client_profile(&cn).await?;
                let out = format!("{cn}.ovpn");
                std::fs::write(&out, profile)
                    .with_context(|| format!("failed to write {out}"))?;
                println!("Client certificate created, profile written to {out}");
            }
            ClientCommand::Revoke { cn } => {
                ca.client_revoke(&cn).await?;
                println!("Certificate for {cn} revoked, CRL republished");
            }
        },
        Command::Crl {
            cmd: CrlCommand::Regen,
        } => {
            ca.crl_regenerate().await?;
            println!("CRL regenerated and republished");
        }
    }

    Ok(())
}
