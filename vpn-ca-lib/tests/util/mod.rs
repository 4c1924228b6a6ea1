// SPDX-FileCopyrightText: 2026 The vpn-ca authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Test setup: a scripted stand-in for the easyrsa tool plus in-memory
//! fakes for the secret store, the certificate importer and the CRL
//! publisher.

use std::collections::HashMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;

use vpn_ca_lib::backend::{CertImporter, CrlPublisher, SecretStore};
use vpn_ca_lib::error::CaError;
use vpn_ca_lib::{Config, ProfileParams, VpnCa};

pub const CA_CN: &str = "TestCA";
pub const SERVER_CN: &str = "vpn-server";
pub const CA_SECRET: &str = "test/ca-key";
pub const SERVER_SECRET: &str = "test/server-key";
pub const ENDPOINT_ID: &str = "cvpn-endpoint-0123456789abcdef0";

/// Emulates the easyrsa actions and fixed output paths. Appends every
/// invocation to `invoked.log`; a marker file `fail_<action>` injects a
/// failure for that action.
const FAKE_EASYRSA: &str = r#"#!/bin/sh
set -e
action="$1"
echo "$action ${2:-}" >> invoked.log
if [ -e "fail_${action}" ]; then
  echo "injected failure for ${action}" >&2
  exit 1
fi
case "$action" in
  init-pki)
    mkdir -p pki/private pki/issued
    ;;
  build-ca)
    echo "CERT ${EASYRSA_REQ_CN}" > pki/ca.crt
    echo "KEY ${EASYRSA_REQ_CN}" > pki/private/ca.key
    ;;
  build-server-full|build-client-full)
    cn="$2"
    [ -f pki/private/ca.key ] || { echo "CA key not available" >&2; exit 1; }
    if [ -f "pki/issued/${cn}.crt" ]; then
      echo "duplicate common name ${cn}" >&2
      exit 1
    fi
    printf -- "-----BEGIN CERTIFICATE-----\nCERT %s\n-----END CERTIFICATE-----\n" "$cn" > "pki/issued/${cn}.crt"
    echo "KEY ${cn}" > "pki/private/${cn}.key"
    ;;
  revoke)
    [ -f pki/private/ca.key ] || { echo "CA key not available" >&2; exit 1; }
    echo "$2" >> pki/revoked.txt
    ;;
  gen-crl)
    [ -f pki/private/ca.key ] || { echo "CA key not available" >&2; exit 1; }
    { echo "CRL days=${EASYRSA_CRL_DAYS:-0}"; cat pki/revoked.txt 2>/dev/null || true; } > pki/crl.pem
    ;;
  *)
    echo "unknown action: $action" >&2
    exit 1
    ;;
esac
"#;

pub struct TestCa {
    pub tmp: TempDir,
    pub store: Arc<MemStore>,
    pub importer: Arc<RecordingImporter>,
    pub publisher: Arc<RecordingPublisher>,
    pub ca: VpnCa,
}

/// One uninitialized CA instance in a fresh temp dir, wired to fakes.
pub fn setup() -> Result<TestCa> {
    let tmp = tempfile::tempdir()?;
    write_fake_easyrsa(tmp.path())?;

    let store = Arc::new(MemStore::default());
    let importer = Arc::new(RecordingImporter::default());
    let publisher = Arc::new(RecordingPublisher::default());

    let config = Config {
        easyrsa_dir: tmp.path().to_path_buf(),
        ca_cn: CA_CN.to_string(),
        server_cn: SERVER_CN.to_string(),
        ca_key_secret: CA_SECRET.to_string(),
        server_key_secret: SERVER_SECRET.to_string(),
        vpn_endpoint_id: ENDPOINT_ID.to_string(),
        crl_days: 30,
        profile: ProfileParams {
            protocol: "udp".to_string(),
            port: 443,
            region: "eu-central-1".to_string(),
        },
    };

    let ca = VpnCa::new(
        config,
        store.clone(),
        importer.clone(),
        publisher.clone(),
    );

    Ok(TestCa {
        tmp,
        store,
        importer,
        publisher,
        ca,
    })
}

impl TestCa {
    /// Make the fake tool fail on its next `action` invocation.
    pub fn inject_tool_failure(&self, action: &str) -> Result<()> {
        fs::write(self.tmp.path().join(format!("fail_{action}")), b"")?;
        Ok(())
    }

    /// Number of tool invocations so far (including failed ones).
    pub fn tool_invocations(&self) -> usize {
        match fs::read_to_string(self.tmp.path().join("invoked.log")) {
            Ok(log) => log.lines().count(),
            Err(_) => 0,
        }
    }

    pub fn ca_key_on_disk(&self) -> bool {
        self.ca.custodian().ca_key_path().exists()
    }

    pub fn pki_path(&self, rel: &str) -> PathBuf {
        self.tmp.path().join("pki").join(rel)
    }
}

fn write_fake_easyrsa(dir: &Path) -> Result<()> {
    let script = dir.join("easyrsa");
    fs::write(&script, FAKE_EASYRSA)?;
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[derive(Default)]
pub struct MemStore {
    secrets: Mutex<HashMap<String, String>>,
    pub fail_exists: AtomicBool,
}

impl MemStore {
    pub fn value(&self, name: &str) -> Option<String> {
        self.secrets.lock().unwrap().get(name).cloned()
    }

    pub fn seed(&self, name: &str, value: &str) {
        self.secrets
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }
}

#[async_trait]
impl SecretStore for MemStore {
    async fn exists(&self, name: &str) -> vpn_ca_lib::Result<bool> {
        if self.fail_exists.load(Ordering::SeqCst) {
            return Err(CaError::StoreUnavailable("injected store outage".into()));
        }
        Ok(self.secrets.lock().unwrap().contains_key(name))
    }

    async fn create(&self, name: &str, value: &str) -> vpn_ca_lib::Result<()> {
        let mut secrets = self.secrets.lock().unwrap();
        if secrets.contains_key(name) {
            return Err(CaError::AlreadyExists(name.to_string()));
        }
        secrets.insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, name: &str) -> vpn_ca_lib::Result<String> {
        self.secrets
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| CaError::KeyNotFound(name.to_string()))
    }
}

pub struct ImportedCert {
    pub certificate: String,
    pub private_key: String,
    pub chain: String,
}

#[derive(Default)]
pub struct RecordingImporter {
    pub imports: Mutex<Vec<ImportedCert>>,
}

#[async_trait]
impl CertImporter for RecordingImporter {
    async fn import(
        &self,
        certificate: &str,
        private_key: &str,
        chain: &str,
    ) -> vpn_ca_lib::Result<()> {
        self.imports.lock().unwrap().push(ImportedCert {
            certificate: certificate.to_string(),
            private_key: private_key.to_string(),
            chain: chain.to_string(),
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    pub published: Mutex<Vec<(String, String)>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl CrlPublisher for RecordingPublisher {
    async fn publish(&self, crl_pem: &str, endpoint_id: &str) -> vpn_ca_lib::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CaError::Publish("injected publish failure".into()));
        }
        self.published
            .lock()
            .unwrap()
            .push((crl_pem.to_string(), endpoint_id.to_string()));
        Ok(())
    }
}
