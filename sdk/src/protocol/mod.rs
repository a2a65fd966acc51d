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

//! The Simple Protocol browser POST binding.
//!
//! A request is rendered with [`SignatureRequest::to_form_parameters`] and
//! optionally signed by a [`RequestSigner`]. The DSS answers by redirecting
//! the browser back with a form that is decoded into [`FormParameters`] and
//! handed to a [`SignatureResponseProcessor`].

pub mod canonical;
pub use canonical::ServiceSigned;

mod request;
pub use request::{RequestSigner, SignatureRequest};

mod response;
pub use response::{
    ExpectedRequest, SignatureOutcome, SignatureResponse, SignatureResponseProcessor,
};

mod service_signature;
pub use service_signature::{ServiceSignature, ServiceSignatureVerifier, SignedFieldValues};

/// Form field names used on the wire.
pub mod params {
    pub const TARGET: &str = "target";
    pub const SIGNATURE_REQUEST: &str = "SignatureRequest";
    pub const SIGNATURE_REQUEST_ID: &str = "SignatureRequestId";
    pub const LANGUAGE: &str = "language";
    pub const CONTENT_TYPE: &str = "ContentType";
    pub const RELAY_STATE: &str = "RelayState";

    pub const SIGNATURE_STATUS: &str = "SignatureStatus";
    pub const SIGNATURE_RESPONSE: &str = "SignatureResponse";
    pub const SIGNATURE_RESPONSE_ID: &str = "SignatureResponseId";
    pub const SIGNATURE_CERTIFICATE: &str = "SignatureCertificate";

    pub const SERVICE_SIGNED: &str = "ServiceSigned";
    pub const SERVICE_SIGNATURE: &str = "ServiceSignature";
    pub const SERVICE_CERTIFICATE_CHAIN_SIZE: &str = "ServiceCertificateChainSize";
    /// Followed by a 1-based index, e.g. `ServiceCertificate.1`.
    pub const SERVICE_CERTIFICATE_PREFIX: &str = "ServiceCertificate.";

    pub(crate) fn service_certificate(index: usize) -> String {
        format!("{SERVICE_CERTIFICATE_PREFIX}{index}")
    }
}

/// Values of the `SignatureStatus` field.
pub mod status {
    pub const OK: &str = "OK";
    pub const USER_CANCELLED: &str = "USER_CANCELLED";
}

/// An ordered list of decoded HTML form fields.
///
/// Lookups return the first value when a name repeats.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FormParameters {
    fields: Vec<(String, String)>,
}

impl FormParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` body.
    pub fn from_urlencoded(body: &[u8]) -> Self {
        url::form_urlencoded::parse(body).into_owned().collect()
    }

    /// Encode the fields as an `application/x-www-form-urlencoded` body.
    pub fn to_urlencoded(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.fields.iter())
            .finish()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for FormParameters {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.fields
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

#[cfg(test)]
mod tests {
    use super::{params, FormParameters};

    #[test]
    fn first_value_wins() {
        let form = FormParameters::from_urlencoded(b"RelayState=a&RelayState=b&target=x");

        assert_eq!(form.get(params::RELAY_STATE), Some("a"));
        assert_eq!(form.get(params::TARGET), Some("x"));
        assert_eq!(form.get(params::LANGUAGE), None);
        assert_eq!(form.len(), 3);
    }

    #[test]
    fn decodes_percent_and_plus() {
        // `+` in base64 must be percent-encoded on the wire; a literal `+`
        // decodes to a space.
        let form = FormParameters::from_urlencoded(b"a=x%2By&b=x+y&c=%2C");

        assert_eq!(form.get("a"), Some("x+y"));
        assert_eq!(form.get("b"), Some("x y"));
        assert_eq!(form.get("c"), Some(","));
    }

    #[test]
    fn urlencoded_round_trip() {
        let mut form = FormParameters::new();
        form.push(params::TARGET, "https://sp.example/return?x=1&y=2");
        form.push(params::SIGNATURE_REQUEST, "ab+/cd==");

        let decoded = FormParameters::from_urlencoded(form.to_urlencoded().as_bytes());

        assert_eq!(decoded, form);
    }

    #[test]
    fn service_certificate_names_are_one_based() {
        assert_eq!(params::service_certificate(1), "ServiceCertificate.1");
    }
}
