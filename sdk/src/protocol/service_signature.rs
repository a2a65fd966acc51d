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

use crate::{
    crypto::{
        base64,
        raw_signature::{validator_for_signing_alg, SigningAlg},
        Certificate,
    },
    protocol::{
        canonical::{FieldSource, ServiceSigned},
        params, FormParameters,
    },
    settings::Settings,
    trust::TrustAnchor,
    Error, Result,
};

/// A signature over a subset of the exchanged form fields.
///
/// Both sides of the protocol use the same structure: the SP may sign its
/// request and the DSS may sign its response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServiceSignature {
    service_signed: ServiceSigned,
    signature_value: Vec<u8>,
    certificate_chain: Vec<Certificate>,
}

impl ServiceSignature {
    /// `certificate_chain` is ordered leaf first and must not be empty.
    pub fn new(
        service_signed: ServiceSigned,
        signature_value: Vec<u8>,
        certificate_chain: Vec<Certificate>,
    ) -> Result<Self> {
        if certificate_chain.is_empty() {
            return Err(Error::MalformedServiceSignature(
                "empty certificate chain".to_string(),
            ));
        }

        Ok(Self {
            service_signed,
            signature_value,
            certificate_chain,
        })
    }

    /// Read the `Service*` parameters of a decoded form.
    ///
    /// Returns `Ok(None)` when the form was not service signed.
    pub fn from_parameters(form: &FormParameters) -> Result<Option<Self>> {
        let Some(service_signed) = form.get(params::SERVICE_SIGNED) else {
            return Ok(None);
        };
        let service_signed = ServiceSigned::parse(service_signed);

        let signature_value = form
            .get(params::SERVICE_SIGNATURE)
            .ok_or_else(|| malformed(format!("{} missing", params::SERVICE_SIGNATURE)))?;
        let signature_value = base64::decode_form_value(signature_value)
            .map_err(|e| malformed(format!("{}: {e}", params::SERVICE_SIGNATURE)))?;

        let chain_size = form
            .get(params::SERVICE_CERTIFICATE_CHAIN_SIZE)
            .ok_or_else(|| {
                malformed(format!("{} missing", params::SERVICE_CERTIFICATE_CHAIN_SIZE))
            })?;
        let chain_size: usize = chain_size.trim().parse().map_err(|_| {
            malformed(format!(
                "{} is not a number: {chain_size}",
                params::SERVICE_CERTIFICATE_CHAIN_SIZE
            ))
        })?;

        let certificate_chain = (1..=chain_size)
            .map(|index| {
                let name = params::service_certificate(index);
                let value = form
                    .get(&name)
                    .ok_or_else(|| malformed(format!("{name} missing")))?;
                Certificate::from_base64(value).map_err(|e| malformed(format!("{name}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "service signature over [{service_signed}] with {} certificate(s)",
            certificate_chain.len()
        );

        Self::new(service_signed, signature_value, certificate_chain).map(Some)
    }

    /// Append the `Service*` parameters to `form`.
    pub fn append_to(&self, form: &mut FormParameters) {
        form.push(params::SERVICE_SIGNED, self.service_signed.to_string());
        form.push(
            params::SERVICE_SIGNATURE,
            base64::encode(&self.signature_value),
        );
        form.push(
            params::SERVICE_CERTIFICATE_CHAIN_SIZE,
            self.certificate_chain.len().to_string(),
        );

        for (index, cert) in self.certificate_chain.iter().enumerate() {
            form.push(params::service_certificate(index + 1), cert.to_base64());
        }
    }

    pub fn service_signed(&self) -> &ServiceSigned {
        &self.service_signed
    }

    pub fn signature_value(&self) -> &[u8] {
        &self.signature_value
    }

    pub fn certificate_chain(&self) -> &[Certificate] {
        &self.certificate_chain
    }

    /// The certificate that made the signature.
    pub fn leaf(&self) -> &Certificate {
        // `new` rejects empty chains
        &self.certificate_chain[0]
    }
}

fn malformed(msg: String) -> Error {
    Error::MalformedServiceSignature(msg)
}

/// The field values a service signature may cover, as seen by the verifier.
///
/// Request-side values come from what the SP stored when it issued the
/// request. Response-side values are taken from the form as received.
/// `signature_certificate` must be the base64 text as received, not a
/// re-encoding of the parsed certificate.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SignedFieldValues {
    pub target: Option<String>,
    pub signature_request: Option<String>,
    pub signature_request_id: Option<String>,
    pub signature_response: Option<String>,
    pub signature_response_id: Option<String>,
    pub signature_certificate: Option<String>,
    pub language: Option<String>,
    pub content_type: Option<String>,
    pub relay_state: Option<String>,
}

impl FieldSource for SignedFieldValues {
    fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            params::TARGET => &self.target,
            params::SIGNATURE_REQUEST => &self.signature_request,
            params::SIGNATURE_REQUEST_ID => &self.signature_request_id,
            params::SIGNATURE_RESPONSE => &self.signature_response,
            params::SIGNATURE_RESPONSE_ID => &self.signature_response_id,
            params::SIGNATURE_CERTIFICATE => &self.signature_certificate,
            params::LANGUAGE => &self.language,
            params::CONTENT_TYPE => &self.content_type,
            params::RELAY_STATE => &self.relay_state,
            _ => return None,
        };

        value.as_deref()
    }
}

/// Checks service signatures and, optionally, pins the signing certificate.
///
/// Instances hold no mutable state and can be shared between threads.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ServiceSignatureVerifier {
    trust_anchor: Option<TrustAnchor>,
    alg: SigningAlg,
}

impl ServiceSignatureVerifier {
    /// A verifier for RSA/SHA-1 signatures.
    ///
    /// With a trust anchor every response must be service signed by the
    /// pinned certificate.
    pub fn new(trust_anchor: Option<TrustAnchor>) -> Self {
        Self {
            trust_anchor,
            alg: SigningAlg::default(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let anchor = settings.trust.trust_anchor()?;
        Ok(Self::new(anchor).with_alg(settings.signing.algorithm))
    }

    pub fn with_alg(mut self, alg: SigningAlg) -> Self {
        self.alg = alg;
        self
    }

    pub fn trust_anchor(&self) -> Option<&TrustAnchor> {
        self.trust_anchor.as_ref()
    }

    pub fn alg(&self) -> SigningAlg {
        self.alg
    }

    /// Verify `signature` over `values`.
    ///
    /// The signature is checked first, then the leaf certificate fingerprint.
    /// A missing signature is only acceptable when no trust anchor is
    /// configured.
    pub fn verify(
        &self,
        signature: Option<&ServiceSignature>,
        values: &SignedFieldValues,
    ) -> Result<()> {
        let Some(signature) = signature else {
            if self.trust_anchor.is_some() {
                log::error!("service fingerprint configured but no service signature present");
                return Err(Error::ServiceSignatureMissing);
            }
            log::debug!("no service signature present");
            return Ok(());
        };

        let data = signature.service_signed().canonical_bytes(values);
        let leaf = signature.leaf();

        let alg = self.alg;
        let validator = validator_for_signing_alg(alg)
            .ok_or_else(|| Error::BadParam(format!("unsupported signing algorithm {alg}")))?;

        let public_key = leaf.public_key_der();
        if let Err(err) = validator.validate(signature.signature_value(), &data, public_key) {
            log::error!("service signature not valid: {err}");
            return Err(Error::ServiceSignatureInvalid);
        }

        if let Some(anchor) = &self.trust_anchor {
            if !anchor.matches(leaf.der()) {
                log::error!(
                    "service certificate fingerprint mismatch: expected {anchor}, got {}",
                    hex::encode(leaf.sha1_fingerprint())
                );
                return Err(Error::FingerprintMismatch);
            }
        }

        log::debug!("service signature valid, signed by {}", leaf.subject());
        Ok(())
    }
}
