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

//! Validation of the DSS response posted back through the browser.

use std::fmt;

use crate::{
    crypto::{base64, Certificate},
    protocol::{
        params,
        request::SignatureRequest,
        service_signature::{ServiceSignature, ServiceSignatureVerifier, SignedFieldValues},
        status, FormParameters,
    },
    settings::Settings,
    trust::TrustAnchor,
    Error, Result,
};

/// What the SP remembered about the request it sent, typically kept in the
/// user's session.
///
/// `relay_state` is compared with the response when set. The other values
/// are needed to rebuild the bytes of a service signed response.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExpectedRequest {
    pub target: Option<String>,
    pub signature_request: Option<String>,
    pub signature_request_id: Option<String>,
    pub language: Option<String>,
    pub content_type: Option<String>,
    pub relay_state: Option<String>,
}

impl From<&SignatureRequest> for ExpectedRequest {
    fn from(request: &SignatureRequest) -> Self {
        Self {
            target: Some(request.target().to_string()),
            signature_request: request.signature_request().map(str::to_string),
            signature_request_id: request.signature_request_id().map(str::to_string),
            language: request.language().map(str::to_string),
            content_type: request.content_type().map(str::to_string),
            relay_state: request.relay_state().map(str::to_string),
        }
    }
}

/// A validated, successfully signed response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignatureResponse {
    document: Option<Vec<u8>>,
    response_id: Option<String>,
    signer_certificate: Certificate,
}

impl SignatureResponse {
    /// The signed document. `None` when artifact binding was used; fetch it
    /// with [`DigitalSignatureServiceClient::retrieve`] and
    /// [`response_id`](Self::response_id).
    ///
    /// [`DigitalSignatureServiceClient::retrieve`]: crate::client::DigitalSignatureServiceClient::retrieve
    pub fn document(&self) -> Option<&[u8]> {
        self.document.as_deref()
    }

    pub fn into_document(self) -> Option<Vec<u8>> {
        self.document
    }

    /// The artifact reference of the signed document, if artifact binding
    /// was used.
    pub fn response_id(&self) -> Option<&str> {
        self.response_id.as_deref()
    }

    /// The certificate of the person who signed the document.
    pub fn signer_certificate(&self) -> &Certificate {
        &self.signer_certificate
    }
}

/// The result of a signature ceremony that did not fail.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SignatureOutcome {
    Signed(SignatureResponse),

    /// The user declined to sign.
    UserCancelled,
}

impl SignatureOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::UserCancelled)
    }

    pub fn into_response(self) -> Option<SignatureResponse> {
        match self {
            Self::Signed(response) => Some(response),
            Self::UserCancelled => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ValidationState {
    Start,
    StatusChecked,
    PresenceChecked,
    RelayStateChecked,
    SignatureVerified,
    Done,
    Cancelled,
    Rejected,
}

impl fmt::Display for ValidationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

enum Transition {
    To(ValidationState),
    Finish(SignatureOutcome),
}

#[derive(Clone, Copy)]
enum Payload<'a> {
    Document(&'a str),
    Artifact(&'a str),
}

/// One pass over a single response.
struct Validation<'a> {
    form: &'a FormParameters,
    expected: &'a ExpectedRequest,
    verifier: &'a ServiceSignatureVerifier,
    state: ValidationState,
    payload: Option<Payload<'a>>,
    certificate: Option<&'a str>,
}

impl<'a> Validation<'a> {
    fn new(
        form: &'a FormParameters,
        expected: &'a ExpectedRequest,
        verifier: &'a ServiceSignatureVerifier,
    ) -> Self {
        Self {
            form,
            expected,
            verifier,
            state: ValidationState::Start,
            payload: None,
            certificate: None,
        }
    }

    fn run(mut self) -> Result<SignatureOutcome> {
        loop {
            let transition = match self.state {
                ValidationState::Start => self.check_status(),
                ValidationState::StatusChecked => self.check_presence(),
                ValidationState::PresenceChecked => self.check_relay_state(),
                ValidationState::RelayStateChecked => self.check_service_signature(),
                ValidationState::SignatureVerified => self.extract(),
                ValidationState::Done | ValidationState::Cancelled | ValidationState::Rejected => {
                    Err(Error::BadParam(format!(
                        "response validation already finished ({})",
                        self.state
                    )))
                }
            };

            match transition {
                Ok(Transition::To(next)) => self.enter(next),
                Ok(Transition::Finish(outcome)) => {
                    self.enter(if outcome.is_cancelled() {
                        ValidationState::Cancelled
                    } else {
                        ValidationState::Done
                    });
                    return Ok(outcome);
                }
                Err(err) => {
                    log::debug!("response rejected: {err}");
                    self.enter(ValidationState::Rejected);
                    return Err(err);
                }
            }
        }
    }

    fn enter(&mut self, next: ValidationState) {
        log::debug!("response validation: {} -> {next}", self.state);
        self.state = next;
    }

    fn check_status(&self) -> Result<Transition> {
        let signature_status = self
            .form
            .get(params::SIGNATURE_STATUS)
            .ok_or(Error::MissingStatus)?;

        match signature_status {
            status::OK => Ok(Transition::To(ValidationState::StatusChecked)),
            status::USER_CANCELLED => Ok(Transition::Finish(SignatureOutcome::UserCancelled)),
            other => {
                log::warn!("invalid signature status: {other}");
                Err(Error::InvalidStatus(other.to_string()))
            }
        }
    }

    fn check_presence(&mut self) -> Result<Transition> {
        self.payload = match (
            self.form.get(params::SIGNATURE_RESPONSE),
            self.form.get(params::SIGNATURE_RESPONSE_ID),
        ) {
            (Some(_), Some(_)) => return Err(Error::AmbiguousSignaturePayload),
            (None, None) => return Err(Error::MissingSignaturePayload),
            (Some(document), None) => Some(Payload::Document(document)),
            (None, Some(artifact)) => Some(Payload::Artifact(artifact)),
        };

        self.certificate = Some(
            self.form
                .get(params::SIGNATURE_CERTIFICATE)
                .ok_or(Error::MissingCertificate)?,
        );

        Ok(Transition::To(ValidationState::PresenceChecked))
    }

    fn check_relay_state(&self) -> Result<Transition> {
        if let Some(expected) = self.expected.relay_state.as_deref() {
            if self.form.get(params::RELAY_STATE) != Some(expected) {
                log::error!("relay state mismatch");
                return Err(Error::RelayStateMismatch);
            }
        }

        Ok(Transition::To(ValidationState::RelayStateChecked))
    }

    fn check_service_signature(&self) -> Result<Transition> {
        let signature = ServiceSignature::from_parameters(self.form)?;

        if signature.is_some() {
            if self.expected.target.is_none() {
                return Err(Error::MissingRequestContext(
                    "target is required to verify the service signature".to_string(),
                ));
            }
            if self.expected.signature_request.is_none()
                && self.expected.signature_request_id.is_none()
            {
                return Err(Error::MissingRequestContext(
                    "SignatureRequest or SignatureRequestId is required".to_string(),
                ));
            }
        }

        let values = SignedFieldValues {
            target: self.expected.target.clone(),
            signature_request: self.expected.signature_request.clone(),
            signature_request_id: self.expected.signature_request_id.clone(),
            signature_response: self
                .form
                .get(params::SIGNATURE_RESPONSE)
                .map(str::to_string),
            signature_response_id: self
                .form
                .get(params::SIGNATURE_RESPONSE_ID)
                .map(str::to_string),
            signature_certificate: self.certificate.map(str::to_string),
            language: self.expected.language.clone(),
            content_type: self.expected.content_type.clone(),
            relay_state: self.form.get(params::RELAY_STATE).map(str::to_string),
        };

        self.verifier.verify(signature.as_ref(), &values)?;

        Ok(Transition::To(ValidationState::SignatureVerified))
    }

    fn extract(&self) -> Result<Transition> {
        let certificate = self.certificate.ok_or(Error::MissingCertificate)?;
        let signer_certificate = Certificate::from_base64(certificate)?;

        let (document, response_id) = match self.payload {
            Some(Payload::Document(encoded)) => (
                Some(
                    base64::decode_form_value(encoded)
                        .map_err(|_| Error::InvalidSignaturePayload)?,
                ),
                None,
            ),
            Some(Payload::Artifact(id)) => (None, Some(id.to_string())),
            None => return Err(Error::MissingSignaturePayload),
        };

        log::debug!("document signed by {}", signer_certificate.subject());

        Ok(Transition::Finish(SignatureOutcome::Signed(SignatureResponse {
            document,
            response_id,
            signer_certificate,
        })))
    }
}

/// Validates Simple Protocol responses.
///
/// A processor is immutable once built and may be shared between threads;
/// each call to [`process`](Self::process) is independent.
#[derive(Clone, Debug, Default)]
pub struct SignatureResponseProcessor {
    verifier: ServiceSignatureVerifier,
}

impl SignatureResponseProcessor {
    /// With a trust anchor, responses must be service signed by the pinned
    /// certificate.
    pub fn new(trust_anchor: Option<TrustAnchor>) -> Self {
        Self::with_verifier(ServiceSignatureVerifier::new(trust_anchor))
    }

    pub fn with_verifier(verifier: ServiceSignatureVerifier) -> Self {
        Self { verifier }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::with_verifier(ServiceSignatureVerifier::from_settings(
            settings,
        )?))
    }

    pub fn verifier(&self) -> &ServiceSignatureVerifier {
        &self.verifier
    }

    /// Validate a decoded response form against what was sent.
    ///
    /// Checks run in this order: status, payload and certificate presence,
    /// relay state, service signature (including the fingerprint pin). The
    /// first failure ends validation.
    pub fn process(
        &self,
        form: &FormParameters,
        expected: &ExpectedRequest,
    ) -> Result<SignatureOutcome> {
        Validation::new(form, expected, &self.verifier).run()
    }

    /// Like [`process`](Self::process) for a raw
    /// `application/x-www-form-urlencoded` body.
    pub fn process_urlencoded(
        &self,
        body: &[u8],
        expected: &ExpectedRequest,
    ) -> Result<SignatureOutcome> {
        self.process(&FormParameters::from_urlencoded(body), expected)
    }
}
