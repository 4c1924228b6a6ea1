// SPDX-FileCopyrightText: 2026 The vpn-ca authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Runner for the external `easyrsa` PKI tool.
//!
//! All key generation and X.509 signing is delegated to the tool; this
//! module only invokes it (always in batch mode, with a per-action
//! environment overlay) and knows the fixed paths where it leaves its
//! output.

use std::path::PathBuf;

use tokio::process::Command;
use tracing::debug;

use crate::error::{CaError, Result};

const EASYRSA_SCRIPT: &str = "./easyrsa";

pub(crate) struct EasyRsa {
    dir: PathBuf,
}

impl EasyRsa {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub(crate) fn pki_dir(&self) -> PathBuf {
        self.dir.join("pki")
    }

    pub(crate) fn ca_cert_path(&self) -> PathBuf {
        self.pki_dir().join("ca.crt")
    }

    pub(crate) fn private_key_path(&self, cn: &str) -> PathBuf {
        self.pki_dir().join("private").join(format!("{cn}.key"))
    }

    pub(crate) fn issued_cert_path(&self, cn: &str) -> PathBuf {
        self.pki_dir().join("issued").join(format!("{cn}.crt"))
    }

    pub(crate) fn crl_path(&self) -> PathBuf {
        self.pki_dir().join("crl.pem")
    }

    pub(crate) async fn init_pki(&self) -> Result<()> {
        self.run(&[], &["init-pki"]).await
    }

    pub(crate) async fn build_ca(&self, cn: &str) -> Result<()> {
        self.run(&[("EASYRSA_REQ_CN", cn)], &["build-ca", "nopass"])
            .await
    }

    pub(crate) async fn build_server_full(&self, cn: &str) -> Result<()> {
        self.run(&[], &["build-server-full", cn, "nopass"]).await
    }

    pub(crate) async fn build_client_full(&self, cn: &str) -> Result<()> {
        self.run(&[], &["build-client-full", cn, "nopass"]).await
    }

    pub(crate) async fn revoke(&self, cn: &str) -> Result<()> {
        self.run(&[], &["revoke", cn]).await
    }

    pub(crate) async fn gen_crl(&self, days: u32) -> Result<()> {
        let days = days.to_string();
        self.run(&[("EASYRSA_CRL_DAYS", days.as_str())], &["gen-crl"])
            .await
    }

    /// Invoke the tool with `args`, the standard batch-mode environment and
    /// the given overlay. Non-zero exit propagates with captured output.
    async fn run(&self, env: &[(&str, &str)], args: &[&str]) -> Result<()> {
        let action = args.first().copied().unwrap_or_default();
        debug!(?args, dir = %self.dir.display(), "executing easyrsa");

        let mut cmd = Command::new(EASYRSA_SCRIPT);
        cmd.args(args)
            .current_dir(&self.dir)
            .env("EASYRSA_BATCH", "true");
        for (k, v) in env {
            cmd.env(k, v);
        }

        let output = cmd.output().await.map_err(|e| CaError::PkiTool {
            action: action.to_string(),
            detail: format!("failed to execute {EASYRSA_SCRIPT}: {e}"),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(%stdout, %stderr, status = ?output.status, "easyrsa finished");

        if !output.status.success() {
            return Err(CaError::PkiTool {
                action: action.to_string(),
                detail: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        Ok(())
    }
}
