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
        raw_signature::{RawSigner, RawSignerError},
        Certificate,
    },
    protocol::{
        canonical::{self, FieldSource, ServiceSigned},
        params,
        service_signature::{ServiceSignature, SignedFieldValues},
        FormParameters,
    },
    settings::Settings,
    Error, Result,
};

/// The fields of an outgoing signature request.
///
/// Exactly one of the document (`SignatureRequest`) and the artifact
/// reference (`SignatureRequestId`) must be set before the request is
/// signed or rendered.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SignatureRequest {
    target: String,
    signature_request: Option<String>,
    signature_request_id: Option<String>,
    language: Option<String>,
    content_type: Option<String>,
    relay_state: Option<String>,
}

impl SignatureRequest {
    /// `target` is the SP URL the DSS posts the response back to.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Default::default()
        }
    }

    /// Send the document inline. It is base64 encoded here.
    pub fn with_document(self, document: &[u8]) -> Self {
        self.with_encoded_document(base64::encode(document))
    }

    /// Send an already base64 encoded document inline.
    pub fn with_encoded_document(mut self, encoded: impl Into<String>) -> Self {
        self.signature_request = Some(encoded.into());
        self
    }

    /// Refer to a document previously stored at the DSS.
    pub fn with_artifact_id(mut self, artifact_id: impl Into<String>) -> Self {
        self.signature_request_id = Some(artifact_id.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Apply the request defaults from `settings`.
    ///
    /// Values already set on the request are kept.
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        if self.language.is_none() {
            self.language = settings.client.language.clone();
        }
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_relay_state(mut self, relay_state: impl Into<String>) -> Self {
        self.relay_state = Some(relay_state.into());
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// The base64 encoded document, if sent inline.
    pub fn signature_request(&self) -> Option<&str> {
        self.signature_request.as_deref()
    }

    pub fn signature_request_id(&self) -> Option<&str> {
        self.signature_request_id.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn relay_state(&self) -> Option<&str> {
        self.relay_state.as_deref()
    }

    /// Check that the request can be sent.
    pub fn validate(&self) -> Result<()> {
        match (&self.signature_request, &self.signature_request_id) {
            (None, None) => {
                return Err(Error::InvalidFieldCombination(
                    "one of SignatureRequest or SignatureRequestId is required".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(Error::InvalidFieldCombination(
                    "SignatureRequest and SignatureRequestId are mutually exclusive".to_string(),
                ))
            }
            _ => {}
        }

        url::Url::parse(&self.target)
            .map_err(|e| Error::BadParam(format!("target is not a URL: {e}")))?;

        Ok(())
    }

    /// The field names a request signature covers, in signing order.
    fn signed_names(&self) -> Vec<&'static str> {
        let mut names = vec![params::TARGET];

        if self.signature_request.is_some() {
            names.push(params::SIGNATURE_REQUEST);
        } else if self.signature_request_id.is_some() {
            names.push(params::SIGNATURE_REQUEST_ID);
        }
        if self.language.is_some() {
            names.push(params::LANGUAGE);
        }
        if self.content_type.is_some() {
            names.push(params::CONTENT_TYPE);
        }
        if self.relay_state.is_some() {
            names.push(params::RELAY_STATE);
        }

        names
    }

    /// The request side values a verifier needs to check a signature.
    pub fn signed_field_values(&self) -> SignedFieldValues {
        SignedFieldValues {
            target: Some(self.target.clone()),
            signature_request: self.signature_request.clone(),
            signature_request_id: self.signature_request_id.clone(),
            language: self.language.clone(),
            content_type: self.content_type.clone(),
            relay_state: self.relay_state.clone(),
            ..Default::default()
        }
    }

    /// Render the POST form sent to the DSS.
    pub fn to_form_parameters(
        &self,
        signature: Option<&ServiceSignature>,
    ) -> Result<FormParameters> {
        self.validate()?;

        let mut form = FormParameters::new();

        if let Some(document) = &self.signature_request {
            form.push(params::SIGNATURE_REQUEST, document.as_str());
        }
        if let Some(artifact_id) = &self.signature_request_id {
            form.push(params::SIGNATURE_REQUEST_ID, artifact_id.as_str());
        }
        form.push(params::TARGET, self.target.as_str());
        if let Some(language) = &self.language {
            form.push(params::LANGUAGE, language.as_str());
        }
        if let Some(content_type) = &self.content_type {
            form.push(params::CONTENT_TYPE, content_type.as_str());
        }
        if let Some(relay_state) = &self.relay_state {
            form.push(params::RELAY_STATE, relay_state.as_str());
        }

        if let Some(signature) = signature {
            signature.append_to(&mut form);
        }

        Ok(form)
    }
}

impl FieldSource for SignatureRequest {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            params::TARGET => Some(self.target.as_str()),
            params::SIGNATURE_REQUEST => self.signature_request(),
            params::SIGNATURE_REQUEST_ID => self.signature_request_id(),
            params::LANGUAGE => self.language(),
            params::CONTENT_TYPE => self.content_type(),
            params::RELAY_STATE => self.relay_state(),
            _ => None,
        }
    }
}

/// Produces the optional service signature on outgoing requests.
pub struct RequestSigner {
    signer: Option<Box<dyn RawSigner + Send + Sync>>,
}

impl RequestSigner {
    pub fn new(signer: Box<dyn RawSigner + Send + Sync>) -> Self {
        Self {
            signer: Some(signer),
        }
    }

    /// A signer without key material. [`sign`](Self::sign) always reports
    /// [`Error::MissingKeyMaterial`].
    pub fn without_key() -> Self {
        Self { signer: None }
    }

    /// Sign `request`.
    ///
    /// Fails with [`Error::MissingKeyMaterial`] when no key or certificate
    /// chain is available. Callers that treat request signing as optional
    /// should match on that variant, or use
    /// [`form_parameters`](Self::form_parameters).
    pub fn sign(&self, request: &SignatureRequest) -> Result<ServiceSignature> {
        let signer = self.signer.as_ref().ok_or(Error::MissingKeyMaterial)?;

        let cert_chain = signer.cert_chain()?;
        if cert_chain.is_empty() {
            return Err(Error::MissingKeyMaterial);
        }

        request.validate()?;

        let names = request.signed_names();
        let data = canonical::canonical_bytes(names.iter().copied(), request);
        let signature_value = signer.sign(&data)?;

        let certificate_chain = cert_chain
            .iter()
            .map(|der| Certificate::from_der(der))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                Error::Signer(RawSignerError::InvalidSigningCredentials(format!(
                    "certificate chain: {e}"
                )))
            })?;

        let service_signed = ServiceSigned::new(names);
        log::debug!("signed request fields [{service_signed}] with {}", signer.alg());

        ServiceSignature::new(service_signed, signature_value, certificate_chain)
    }

    /// Render `request`, service signed when key material is available.
    pub fn form_parameters(&self, request: &SignatureRequest) -> Result<FormParameters> {
        match self.sign(request) {
            Ok(signature) => request.to_form_parameters(Some(&signature)),
            Err(Error::MissingKeyMaterial) => {
                log::debug!("no request signing key material, sending unsigned request");
                request.to_form_parameters(None)
            }
            Err(err) => Err(err),
        }
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("alg", &self.signer.as_ref().map(|s| s.alg()))
            .finish()
    }
}
