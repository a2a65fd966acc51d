// Copyright 2026 DSS SDK developers. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! X.509 certificates as immutable value objects.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;
use x509_parser::{certificate::X509Certificate, prelude::FromDer};

use crate::crypto::{
    base64,
    hash::{sha1, SHA1_LEN},
    raw_signature::oids::RSA_OID,
};

/// A DER-encoded X.509 certificate that is known to parse.
///
/// The commonly needed attributes are extracted once at construction so the
/// value can be shared freely between threads without re-parsing.
#[derive(Clone, Eq, PartialEq)]
pub struct Certificate {
    der: Vec<u8>,
    subject: String,
    issuer: String,
    serial: String,
    public_key_der: Vec<u8>,
    rsa_public_key: bool,
    not_before: Option<DateTime<Utc>>,
    not_after: Option<DateTime<Utc>>,
}

impl Certificate {
    /// Parse a DER-encoded certificate.
    ///
    /// Trailing bytes after the certificate structure are dropped so that
    /// [`der`] and [`sha1_fingerprint`] always describe the certificate
    /// itself.
    ///
    /// [`der`]: Self::der
    /// [`sha1_fingerprint`]: Self::sha1_fingerprint
    pub fn from_der(der: &[u8]) -> Result<Self, CertificateError> {
        let (rem, cert) = X509Certificate::from_der(der)
            .map_err(|e| CertificateError::InvalidDer(e.to_string()))?;

        if !rem.is_empty() {
            log::debug!("ignoring {} trailing bytes after certificate", rem.len());
        }

        let consumed = &der[..der.len() - rem.len()];
        let spki = cert.public_key();
        let validity = cert.validity();

        Ok(Self {
            der: consumed.to_vec(),
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            serial: cert.raw_serial_as_string(),
            public_key_der: spki.raw.to_vec(),
            rsa_public_key: spki.algorithm.algorithm == RSA_OID,
            not_before: DateTime::from_timestamp(validity.not_before.timestamp(), 0),
            not_after: DateTime::from_timestamp(validity.not_after.timestamp(), 0),
        })
    }

    /// Decode a base64 form value and parse the certificate it contains.
    pub fn from_base64(encoded: &str) -> Result<Self, CertificateError> {
        let der = base64::decode_form_value(encoded)
            .map_err(|e| CertificateError::InvalidBase64(e.to_string()))?;
        Self::from_der(&der)
    }

    /// The DER encoding of this certificate.
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// The DER encoding, base64-encoded for use as a form value.
    pub fn to_base64(&self) -> String {
        base64::encode(&self.der)
    }

    /// RFC 4514 rendering of the subject name.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// RFC 4514 rendering of the issuer name.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Serial number as colon-separated hex.
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// The DER-encoded `SubjectPublicKeyInfo`.
    pub fn public_key_der(&self) -> &[u8] {
        &self.public_key_der
    }

    /// Returns `true` if the subject key is an RSA key.
    pub fn has_rsa_public_key(&self) -> bool {
        self.rsa_public_key
    }

    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.not_before
    }

    pub fn not_after(&self) -> Option<DateTime<Utc>> {
        self.not_after
    }

    /// SHA-1 digest of the DER encoding.
    pub fn sha1_fingerprint(&self) -> [u8; SHA1_LEN] {
        sha1(&self.der)
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("subject", &self.subject)
            .field("issuer", &self.issuer)
            .field("serial", &self.serial)
            .finish_non_exhaustive()
    }
}

/// Describes errors that can occur when decoding a certificate.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum CertificateError {
    /// The value was not valid base64.
    #[error("certificate is not valid base64 ({0})")]
    InvalidBase64(String),

    /// The bytes do not form an X.509 certificate.
    #[error("not an X.509 certificate ({0})")]
    InvalidDer(String),
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crate::crypto::{
        base64,
        certificate::{Certificate, CertificateError},
        hash::sha1,
        raw_signature::signer::test_signer::test_credentials,
    };

    #[test]
    fn parses_generated_certificate() {
        let creds = test_credentials();
        let cert = Certificate::from_der(&creds.cert_der).unwrap();

        assert_eq!(cert.der(), creds.cert_der.as_slice());
        assert!(cert.subject().contains("test-service"));
        assert!(cert.has_rsa_public_key());
        assert!(cert.not_before().unwrap() < cert.not_after().unwrap());
    }

    #[test]
    fn fingerprint_is_sha1_of_der() {
        let creds = test_credentials();
        let cert = Certificate::from_der(&creds.cert_der).unwrap();

        assert_eq!(cert.sha1_fingerprint(), sha1(&creds.cert_der));
    }

    #[test]
    fn trailing_bytes_are_not_part_of_the_certificate() {
        let creds = test_credentials();
        let mut padded = creds.cert_der.clone();
        padded.extend_from_slice(b"junk");

        let cert = Certificate::from_der(&padded).unwrap();
        assert_eq!(cert.der(), creds.cert_der.as_slice());
    }

    #[test]
    fn base64_round_trip() {
        let creds = test_credentials();
        let encoded = base64::encode(&creds.cert_der);

        let cert = Certificate::from_base64(&encoded).unwrap();
        assert_eq!(cert.to_base64(), encoded);
    }

    #[test]
    fn rejects_non_certificate() {
        assert!(matches!(
            Certificate::from_der(b"definitely not DER"),
            Err(CertificateError::InvalidDer(_))
        ));

        assert!(matches!(
            Certificate::from_base64("%%%"),
            Err(CertificateError::InvalidBase64(_))
        ));
    }
}
