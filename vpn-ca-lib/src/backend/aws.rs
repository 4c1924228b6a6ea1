// SPDX-FileCopyrightText: 2026 The vpn-ca authors
// SPDX-License-Identifier: GPL-3.0-or-later

//! AWS-backed collaborators: Secrets Manager for key custody, ACM for
//! certificate import, EC2 Client VPN for CRL distribution.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_acm::primitives::Blob;
use tracing::debug;

use crate::backend::{CertImporter, CrlPublisher, SecretStore};
use crate::error::{CaError, Result};

/// Load the shared AWS configuration (region and credentials come from the
/// usual provider chain) and build one client per collaborator.
pub async fn aws_collaborators() -> (
    Arc<dyn SecretStore>,
    Arc<dyn CertImporter>,
    Arc<dyn CrlPublisher>,
) {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .load()
        .await;

    (
        Arc::new(SecretsManagerStore {
            client: aws_sdk_secretsmanager::Client::new(&config),
        }),
        Arc::new(AcmCertImporter {
            client: aws_sdk_acm::Client::new(&config),
        }),
        Arc::new(Ec2CrlPublisher {
            client: aws_sdk_ec2::Client::new(&config),
        }),
    )
}

pub struct SecretsManagerStore {
    client: aws_sdk_secretsmanager::Client,
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn exists(&self, name: &str) -> Result<bool> {
        debug!(secret = name, "checking for secret");
        match self.client.describe_secret().secret_id(name).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                if err
                    .as_service_error()
                    .map(|e| e.is_resource_not_found_exception())
                    .unwrap_or(false)
                {
                    Ok(false)
                } else {
                    Err(CaError::StoreUnavailable(Box::new(err)))
                }
            }
        }
    }

    async fn create(&self, name: &str, value: &str) -> Result<()> {
        debug!(secret = name, "creating secret");
        self.client
            .create_secret()
            .name(name)
            .secret_string(value)
            .send()
            .await
            .map_err(|err| {
                if err
                    .as_service_error()
                    .map(|e| e.is_resource_exists_exception())
                    .unwrap_or(false)
                {
                    CaError::AlreadyExists(name.to_string())
                } else {
                    CaError::StoreUnavailable(Box::new(err))
                }
            })?;

        Ok(())
    }

    async fn get(&self, name: &str) -> Result<String> {
        debug!(secret = name, "fetching secret value");
        let output = self
            .client
            .get_secret_value()
            .secret_id(name)
            .send()
            .await
            .map_err(|err| {
                if err
                    .as_service_error()
                    .map(|e| e.is_resource_not_found_exception())
                    .unwrap_or(false)
                {
                    CaError::KeyNotFound(name.to_string())
                } else {
                    CaError::StoreUnavailable(Box::new(err))
                }
            })?;

        match output.secret_string() {
            Some(value) => Ok(value.to_string()),
            None => Err(CaError::StoreUnavailable(
                format!("secret '{name}' has no string value").into(),
            )),
        }
    }
}

pub struct AcmCertImporter {
    client: aws_sdk_acm::Client,
}

#[async_trait]
impl CertImporter for AcmCertImporter {
    async fn import(&self, certificate: &str, private_key: &str, chain: &str) -> Result<()> {
        debug!("importing certificate to ACM");
        self.client
            .import_certificate()
            .certificate(Blob::new(certificate.as_bytes()))
            .private_key(Blob::new(private_key.as_bytes()))
            .certificate_chain(Blob::new(chain.as_bytes()))
            .send()
            .await
            .map_err(|err| CaError::Import(Box::new(err)))?;

        Ok(())
    }
}

pub struct Ec2CrlPublisher {
    client: aws_sdk_ec2::Client,
}

#[async_trait]
impl CrlPublisher for Ec2CrlPublisher {
    async fn publish(&self, crl_pem: &str, endpoint_id: &str) -> Result<()> {
        debug!(endpoint = endpoint_id, "uploading CRL to VPN endpoint");
        self.client
            .import_client_vpn_client_certificate_revocation_list()
            .client_vpn_endpoint_id(endpoint_id)
            .certificate_revocation_list(crl_pem)
            .send()
            .await
            .map_err(|err| CaError::Publish(Box::new(err)))?;

        Ok(())
    }
}
