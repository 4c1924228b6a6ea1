// SPDX-FileCopyrightText: 2026 The vpn-ca authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error types for vpn-ca.
//!
//! Every operation either fully succeeds or reports one of these error
//! classes; partial completion is always surfaced, never swallowed.

use std::path::PathBuf;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum CaError {
    /// The CA has been set up before (local pki directory or remote key).
    #[error("CA is already initialized: {0}")]
    AlreadyInitialized(String),

    /// A server key is already present in the secret store. Re-issuing
    /// silently would strand the old server identity.
    #[error("a server certificate was already issued (secret '{0}' exists)")]
    AlreadyIssued(String),

    /// The requested private key is not in the secret store.
    #[error("private key '{0}' not found in the secret store")]
    KeyNotFound(String),

    /// Create-once violation: the secret name is already populated.
    #[error("secret '{0}' already exists in the store")]
    AlreadyExists(String),

    /// The secret store failed in a way other than "not found".
    #[error("secret store unavailable")]
    StoreUnavailable(#[source] BoxError),

    /// Writing a private key file to local disk failed.
    #[error("failed to write key file {path}")]
    DiskWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A private key file could not be removed from local disk. This is a
    /// security incident, not a transient fault.
    #[error("private key file {path} was NOT removed from local disk")]
    KeyRetention {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external PKI tool failed (non-zero exit or failure to execute).
    #[error("easyrsa {action} failed: {detail}")]
    PkiTool { action: String, detail: String },

    /// Overlapping or nested holds of the CA key. Programming error.
    #[error("custody violation: {0}")]
    CustodyViolation(&'static str),

    /// The certificate-import collaborator rejected the upload.
    #[error("certificate import failed")]
    Import(#[source] BoxError),

    /// The CRL publisher rejected the upload; the locally generated CRL is
    /// not effective.
    #[error("CRL publish failed")]
    Publish(#[source] BoxError),

    /// A common name that cannot be used for issuance or revocation.
    #[error("invalid common name {0:?}")]
    InvalidCommonName(String),

    /// Local filesystem error outside the key-custody paths.
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CaError::KeyNotFound("prod/ca-key".to_string());
        assert_eq!(
            err.to_string(),
            "private key 'prod/ca-key' not found in the secret store"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CaError>();
    }
}
