//! CloudFront canned-policy signing.
//!
//! Signed URLs carry `Expires`, `Signature` and `Key-Pair-Id` query
//! parameters; signed cookies carry the full policy so one cookie set can
//! cover a wildcard resource such as `12/*`.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha1::Sha1;

use crate::error::CloudError;

/// Default signature lifetime (one hour).
pub const DEFAULT_LIFETIME_SECS: i64 = 3600;

pub const COOKIE_POLICY: &str = "CloudFront-Policy";
pub const COOKIE_SIGNATURE: &str = "CloudFront-Signature";
pub const COOKIE_KEY_PAIR_ID: &str = "CloudFront-Key-Pair-Id";

/// The three cookies CloudFront expects for a canned policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedCookies {
    pub policy: String,
    pub signature: String,
    pub key_pair_id: String,
    /// Epoch seconds after which CloudFront rejects the cookies.
    pub expires: i64,
}

impl SignedCookies {
    /// Cookie name/value pairs in the order CloudFront documents them.
    pub fn pairs(&self) -> [(&'static str, &str); 3] {
        [
            (COOKIE_POLICY, self.policy.as_str()),
            (COOKIE_SIGNATURE, self.signature.as_str()),
            (COOKIE_KEY_PAIR_ID, self.key_pair_id.as_str()),
        ]
    }
}

/// Signs CloudFront resources with an RSA key registered as a key pair.
#[derive(Clone)]
pub struct CloudFrontSigner {
    domain: String,
    key_pair_id: String,
    signing_key: SigningKey<Sha1>,
    lifetime_secs: i64,
}

impl std::fmt::Debug for CloudFrontSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudFrontSigner")
            .field("domain", &self.domain)
            .field("key_pair_id", &self.key_pair_id)
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl CloudFrontSigner {
    /// Build a signer from a PEM private key.
    ///
    /// Accepts PKCS#8 (`BEGIN PRIVATE KEY`) and falls back to PKCS#1
    /// (`BEGIN RSA PRIVATE KEY`).
    pub fn from_pem(
        domain: impl Into<String>,
        key_pair_id: impl Into<String>,
        pem: &str,
    ) -> Result<Self, CloudError> {
        let key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| CloudError::CloudFrontKey(e.to_string()))?;

        Ok(Self {
            domain: domain.into().trim_end_matches('/').to_string(),
            key_pair_id: key_pair_id.into(),
            signing_key: SigningKey::<Sha1>::new(key),
            lifetime_secs: DEFAULT_LIFETIME_SECS,
        })
    }

    pub fn from_pem_file(
        domain: impl Into<String>,
        key_pair_id: impl Into<String>,
        path: &Path,
    ) -> Result<Self, CloudError> {
        let pem = std::fs::read_to_string(path).map_err(|e| {
            CloudError::CloudFrontKey(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_pem(domain, key_pair_id, &pem)
    }

    pub fn with_lifetime_secs(mut self, secs: i64) -> Self {
        self.lifetime_secs = secs;
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// `https://{domain}/{path}`.
    pub fn resource_url(&self, path: &str) -> String {
        format!("https://{}/{}", self.domain, path.trim_start_matches('/'))
    }

    /// Signed URL for `path`, valid for the configured lifetime.
    pub fn signed_url(&self, path: &str) -> String {
        self.signed_url_at(path, self.expires_from_now())
    }

    /// Signed URL for `path` expiring at `expires` (epoch seconds).
    pub fn signed_url_at(&self, path: &str, expires: i64) -> String {
        let resource = self.resource_url(path);
        let signature = self.sign(&canned_policy(&resource, expires));
        format!(
            "{resource}?Expires={expires}&Signature={signature}&Key-Pair-Id={}",
            self.key_pair_id
        )
    }

    /// Signed cookies for `path`, which may contain `*` wildcards.
    pub fn signed_cookies(&self, path: &str) -> SignedCookies {
        self.signed_cookies_at(path, self.expires_from_now())
    }

    pub fn signed_cookies_at(&self, path: &str, expires: i64) -> SignedCookies {
        let policy = canned_policy(&self.resource_url(path), expires);
        SignedCookies {
            signature: self.sign(&policy),
            policy: cloudfront_base64(policy.as_bytes()),
            key_pair_id: self.key_pair_id.clone(),
            expires,
        }
    }

    fn expires_from_now(&self) -> i64 {
        chrono::Utc::now().timestamp() + self.lifetime_secs
    }

    fn sign(&self, policy: &str) -> String {
        let signature = self.signing_key.sign(policy.as_bytes());
        cloudfront_base64(&signature.to_bytes())
    }
}

/// Canned policy JSON. CloudFront requires it byte-exact with no whitespace.
pub fn canned_policy(resource: &str, expires: i64) -> String {
    format!(
        r#"{{"Statement":[{{"Resource":"{resource}","Condition":{{"DateLessThan":{{"AWS:EpochTime":{expires}}}}}}}]}}"#
    )
}

/// Standard base64 with `+`, `=` and `/` swapped for URL-safe characters.
pub fn cloudfront_base64(bytes: &[u8]) -> String {
    STANDARD
        .encode(bytes)
        .chars()
        .map(|c| match c {
            '+' => '-',
            '=' => '_',
            '/' => '~',
            other => other,
        })
        .collect()
}
