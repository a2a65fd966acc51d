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

use std::fmt;

use crate::{
    crypto::{
        hash::{sha1, SHA1_LEN},
        Certificate,
    },
    Error, Result,
};

/// The SHA-1 digest of the DER encoding of the DSS service certificate.
///
/// Only the leaf certificate is pinned. No chain building takes place.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct TrustAnchor([u8; SHA1_LEN]);

impl TrustAnchor {
    pub fn new(fingerprint: [u8; SHA1_LEN]) -> Self {
        Self(fingerprint)
    }

    /// Parse a hex fingerprint. Colons and whitespace between byte pairs are
    /// accepted, so values copied from `openssl x509 -fingerprint` work as is.
    pub fn from_hex(value: &str) -> Result<Self> {
        let cleaned: String = value
            .chars()
            .filter(|c| !c.is_ascii_whitespace() && *c != ':')
            .collect();

        let bytes = hex::decode(&cleaned)
            .map_err(|e| Error::BadParam(format!("invalid fingerprint hex: {e}")))?;

        let fingerprint: [u8; SHA1_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
            Error::BadParam(format!(
                "fingerprint must be {SHA1_LEN} bytes, got {}",
                b.len()
            ))
        })?;

        Ok(Self(fingerprint))
    }

    /// Pin the given certificate.
    pub fn from_certificate(cert: &Certificate) -> Self {
        Self(cert.sha1_fingerprint())
    }

    pub fn fingerprint(&self) -> &[u8; SHA1_LEN] {
        &self.0
    }

    /// Returns `true` if SHA-1 over `cert_der` equals the pinned value.
    pub fn matches(&self, cert_der: &[u8]) -> bool {
        sha1(cert_der) == self.0
    }
}

impl fmt::Debug for TrustAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrustAnchor({self})")
    }
}

impl fmt::Display for TrustAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
