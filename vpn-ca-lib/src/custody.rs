// SPDX-FileCopyrightText: 2026 The vpn-ca authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Custody of private key files on local disk.
//!
//! The CA private key lives durably in the remote secret store and exists
//! on local disk only for the duration of one signing operation. The
//! custodian owns every transition between those two places:
//!
//! - [`KeyCustodian::with_ca_key`] materializes the key, runs the given
//!   operation and deletes the key on every exit path. A failed deletion
//!   ([`CaError::KeyRetention`]) takes precedence over the operation's own
//!   error, since a key left on disk is the worse outcome.
//! - [`KeyCustodian::persist_and_wipe`] is the only path by which a freshly
//!   generated key moves from transient-local to durable-remote.
//!
//! The hold is non-reentrant: at most one caller holds the CA key between
//! materialization and deletion. Overlapping holds are a programming error
//! and fail fast with [`CaError::CustodyViolation`].

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};
use zeroize::Zeroizing;

use crate::backend::SecretStore;
use crate::error::{CaError, Result};

/// Common name the PKI tool uses for the CA key file.
const CA_KEY_CN: &str = "ca";

pub struct KeyCustodian {
    store: Arc<dyn SecretStore>,
    pki_dir: PathBuf,
    ca_key_secret: String,
    ca_key_held: AtomicBool,
}

impl KeyCustodian {
    pub(crate) fn new(store: Arc<dyn SecretStore>, pki_dir: PathBuf, ca_key_secret: String) -> Self {
        Self {
            store,
            pki_dir,
            ca_key_secret,
            ca_key_held: AtomicBool::new(false),
        }
    }

    /// Local path of the transient CA key file.
    pub fn ca_key_path(&self) -> PathBuf {
        self.key_path(CA_KEY_CN)
    }

    fn key_path(&self, cn: &str) -> PathBuf {
        self.pki_dir.join("private").join(format!("{cn}.key"))
    }

    /// Whether a secret exists under `name` in the remote store.
    pub async fn key_exists_in_store(&self, name: &str) -> Result<bool> {
        self.store.exists(name).await
    }

    /// Fetch a key value from the remote store.
    pub async fn read_key_from_store(&self, name: &str) -> Result<Zeroizing<String>> {
        Ok(Zeroizing::new(self.store.get(name).await?))
    }

    /// Materialize the CA key, run `op`, delete the key. The deletion runs
    /// on every exit path; its failure supersedes `op`'s error.
    pub async fn with_ca_key<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.materialize_ca_key().await?;

        let result = op().await;

        match self.delete_ca_key_from_disk().await {
            Ok(()) => result,
            Err(retention) => {
                if let Err(op_err) = result {
                    error!(error = %op_err, "operation error superseded by key retention failure");
                }
                Err(retention)
            }
        }
    }

    /// Fetch the CA key from the store and write it to its fixed local
    /// path, taking the non-reentrant hold.
    async fn materialize_ca_key(&self) -> Result<()> {
        if self.ca_key_held.swap(true, Ordering::SeqCst) {
            return Err(CaError::CustodyViolation(
                "the CA key is already materialized on disk",
            ));
        }

        let value = match self.store.get(&self.ca_key_secret).await {
            Ok(v) => Zeroizing::new(v),
            Err(e) => {
                self.ca_key_held.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let path = self.ca_key_path();
        debug!(path = %path.display(), "materializing CA key to disk");
        if let Err(e) = write_key_file(&path, &value).await {
            // A partially written key file may exist; it must not survive.
            if let Err(retention) = self.delete_ca_key_from_disk().await {
                error!(error = %e, "write error superseded by key retention failure");
                return Err(retention);
            }
            return Err(e);
        }

        Ok(())
    }

    /// Remove the CA key file from local disk and end the hold.
    ///
    /// Idempotent: an absent file is a successful no-op. A removal failure
    /// surfaces as [`CaError::KeyRetention`].
    pub async fn delete_ca_key_from_disk(&self) -> Result<()> {
        self.delete_key_from_disk(CA_KEY_CN).await
    }

    /// Store the local key file for `cn` under `secret_name` (create-once),
    /// then remove the file from disk.
    pub async fn persist_and_wipe(&self, cn: &str, secret_name: &str) -> Result<()> {
        let path = self.key_path(cn);
        debug!(%cn, secret = secret_name, "persisting private key to the store");

        let value = Zeroizing::new(fs::read_to_string(&path).await.map_err(|source| {
            CaError::Io {
                path: path.clone(),
                source,
            }
        })?);

        self.store.create(secret_name, &value).await?;
        self.delete_key_from_disk(cn).await
    }

    async fn delete_key_from_disk(&self, cn: &str) -> Result<()> {
        if cn == CA_KEY_CN {
            // The hold ends when deletion runs, whatever its outcome; a
            // retention failure is an operator incident, not a held key.
            self.ca_key_held.store(false, Ordering::SeqCst);
        }

        let path = self.key_path(cn);
        match fs::try_exists(&path).await {
            Ok(false) => {
                debug!(path = %path.display(), "key file already absent");
                Ok(())
            }
            Ok(true) => match fs::remove_file(&path).await {
                Ok(()) => {
                    debug!(path = %path.display(), "deleted key file");
                    Ok(())
                }
                Err(source) => {
                    error!(path = %path.display(), "private key NOT deleted from disk");
                    Err(CaError::KeyRetention { path, source })
                }
            },
            Err(source) => {
                error!(path = %path.display(), "could not verify key file deletion");
                Err(CaError::KeyRetention { path, source })
            }
        }
    }
}

async fn write_key_file(path: &Path, value: &str) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true).mode(0o600);

    let mut file = options.open(path).await.map_err(|source| CaError::DiskWrite {
        path: path.to_path_buf(),
        source,
    })?;

    file.write_all(value.as_bytes())
        .await
        .map_err(|source| CaError::DiskWrite {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(())
}
