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

//! Canonical byte layout for service signatures.
//!
//! The `ServiceSigned` list names the signed fields and fixes their order.
//! The bytes that are signed are the UTF-8 values of those fields
//! concatenated in list order, with no separators or length prefixes. A
//! field that has no value contributes nothing.

use std::{convert::Infallible, fmt, str::FromStr};

use crate::protocol::{params, FormParameters};

/// Field names that may appear in a `ServiceSigned` list.
pub const SIGNABLE_FIELDS: &[&str] = &[
    params::TARGET,
    params::SIGNATURE_REQUEST,
    params::SIGNATURE_REQUEST_ID,
    params::SIGNATURE_RESPONSE,
    params::SIGNATURE_RESPONSE_ID,
    params::SIGNATURE_CERTIFICATE,
    params::LANGUAGE,
    params::CONTENT_TYPE,
    params::RELAY_STATE,
];

/// Something that can resolve a signable field name to its wire value.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<&str>;
}

impl FieldSource for FormParameters {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name)
    }
}

/// Build the canonical bytes for `names` in the given order.
///
/// Names outside [`SIGNABLE_FIELDS`] are skipped.
pub fn canonical_bytes<'a, S>(names: impl IntoIterator<Item = &'a str>, source: &S) -> Vec<u8>
where
    S: FieldSource + ?Sized,
{
    let mut bytes = Vec::new();

    for name in names {
        if !SIGNABLE_FIELDS.contains(&name) {
            log::warn!("ignoring unknown service signed element: {name}");
            continue;
        }

        match source.field(name) {
            Some(value) => {
                log::debug!("service signed: {name}");
                bytes.extend_from_slice(value.as_bytes());
            }
            None => log::debug!("service signed: {name} (absent)"),
        }
    }

    bytes
}

/// The ordered field list carried in the `ServiceSigned` parameter.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct ServiceSigned {
    names: Vec<String>,
}

impl ServiceSigned {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma separated list.
    ///
    /// Empty tokens are dropped. The DSS URL-encodes the list before it is
    /// placed in the form, so a `%2C` separator left over after form
    /// decoding is accepted as a comma.
    pub fn parse(value: &str) -> Self {
        let value = value.replace("%2C", ",").replace("%2c", ",");

        Self::new(
            value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty()),
        )
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolve each listed field through `source` and concatenate the
    /// values in list order.
    pub fn canonical_bytes<S: FieldSource + ?Sized>(&self, source: &S) -> Vec<u8> {
        canonical_bytes(self.names(), source)
    }
}

impl fmt::Display for ServiceSigned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names.join(","))
    }
}

impl FromStr for ServiceSigned {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

#[cfg(test)]
mod tests {
    use super::{canonical_bytes, ServiceSigned};
    use crate::protocol::FormParameters;

    fn fields() -> FormParameters {
        [
            ("target", "https://sp.example/return"),
            ("SignatureRequestId", "artifact-123"),
            ("language", "en"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn concatenates_in_list_order() {
        let signed = ServiceSigned::parse("target,SignatureRequestId,language");

        assert_eq!(
            signed.canonical_bytes(&fields()),
            b"https://sp.example/returnartifact-123en".to_vec()
        );
    }

    #[test]
    fn order_changes_bytes() {
        let a = ServiceSigned::parse("target,SignatureRequestId,language");
        let b = ServiceSigned::parse("language,target,SignatureRequestId");

        assert_ne!(
            a.canonical_bytes(&fields()),
            b.canonical_bytes(&fields())
        );
        assert_eq!(
            b.canonical_bytes(&fields()),
            b"enhttps://sp.example/returnartifact-123".to_vec()
        );
    }

    #[test]
    fn absent_values_are_omitted() {
        let signed = ServiceSigned::parse("target,ContentType,language");

        assert_eq!(
            signed.canonical_bytes(&fields()),
            b"https://sp.example/returnen".to_vec()
        );
    }

    #[test]
    fn unknown_names_are_skipped() {
        let mut form = fields();
        form.push("Extra", "zzz");

        assert_eq!(
            canonical_bytes(["target", "Extra", "language"], &form),
            b"https://sp.example/returnen".to_vec()
        );
    }

    #[test]
    fn parse_and_display() {
        let signed = ServiceSigned::parse(" target, SignatureResponse,,SignatureCertificate ");

        assert_eq!(
            signed.names().collect::<Vec<_>>(),
            vec!["target", "SignatureResponse", "SignatureCertificate"]
        );
        assert_eq!(
            signed.to_string(),
            "target,SignatureResponse,SignatureCertificate"
        );
        assert!(signed.contains("SignatureResponse"));
        assert!(!signed.contains("RelayState"));
    }

    #[test]
    fn accepts_encoded_separator() {
        let signed = ServiceSigned::parse("target%2CSignatureRequest%2cSignatureResponse");

        assert_eq!(
            signed.to_string(),
            "target,SignatureRequest,SignatureResponse"
        );
    }

    #[test]
    fn empty_list() {
        let signed = ServiceSigned::parse("");

        assert!(signed.is_empty());
        assert!(signed.canonical_bytes(&fields()).is_empty());
    }
}
