//! Signatures for direct browser uploads to the image CDN.
//!
//! The browser sends the upload parameters it intends to use, we sign them
//! with the account secret, and the CDN recomputes the same digest to accept
//! the upload. The secret never leaves the server.

use crate::config::{MediaConfig, SignatureAlgorithm};
use serde::Serialize;
use serde_json::{Map, Value};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use thiserror::Error;

/// Parameters the CDN never includes in the signed string.
const UNSIGNED_KEYS: &[&str] = &["file", "cloud_name", "resource_type", "api_key"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignError {
    #[error("upload signing secret is not configured")]
    MissingSecret,
    #[error("parameter '{0}' cannot be signed")]
    UnsupportedValue(String),
}

/// Builds the canonical `key=value&...` string that gets signed.
pub fn string_to_sign(params: &Map<String, Value>) -> Result<String, SignError> {
    let mut sorted = BTreeMap::new();

    for (key, value) in params {
        if UNSIGNED_KEYS.contains(&key.as_str()) {
            continue;
        }
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    Value::Number(n) => Ok(n.to_string()),
                    Value::Bool(b) => Ok(b.to_string()),
                    _ => Err(SignError::UnsupportedValue(key.clone())),
                })
                .collect::<Result<Vec<_>, _>>()?
                .join(","),
            Value::Object(_) => return Err(SignError::UnsupportedValue(key.clone())),
        };
        if text.is_empty() {
            continue;
        }
        sorted.insert(key.as_str(), text);
    }

    Ok(sorted
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&"))
}

pub fn sign_params(
    params: &Map<String, Value>,
    secret: &str,
    algorithm: SignatureAlgorithm,
) -> Result<String, SignError> {
    if secret.is_empty() {
        return Err(SignError::MissingSecret);
    }

    let payload = format!("{}{}", string_to_sign(params)?, secret);
    let digest = match algorithm {
        SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(payload.as_bytes())),
        SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(payload.as_bytes())),
    };
    Ok(digest)
}

#[derive(Debug, Clone, Serialize)]
pub struct SignedUpload {
    pub signature: String,
    pub timestamp: Value,
    pub api_key: String,
    pub cloud_name: String,
    pub signature_algorithm: &'static str,
}

#[derive(Clone)]
pub struct UploadSigner {
    cloud_name: String,
    api_key: String,
    api_secret: String,
    algorithm: SignatureAlgorithm,
}

impl UploadSigner {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            algorithm: config.signature_algorithm,
        }
    }

    pub fn sign(&self, mut params: Map<String, Value>) -> Result<SignedUpload, SignError> {
        if !params.contains_key("timestamp") {
            params.insert(
                "timestamp".to_string(),
                Value::from(chrono::Utc::now().timestamp()),
            );
        }

        let signature = sign_params(&params, &self.api_secret, self.algorithm)?;
        tracing::debug!(params = params.len(), "Signed upload request");

        Ok(SignedUpload {
            signature,
            timestamp: params.remove("timestamp").unwrap_or(Value::Null),
            api_key: self.api_key.clone(),
            cloud_name: self.cloud_name.clone(),
            signature_algorithm: self.algorithm.as_str(),
        })
    }
}
