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

//! Direct (back channel) calls to the DSS web service.
//!
//! The wire mechanics live behind [`DssTransport`]; this module adds request
//! correlation and result interpretation on top of it.

use chrono::{DateTime, Utc};

use crate::{Error, Result};

pub mod verification_report;
pub use verification_report::{
    parse_verification_report, ResultStatus, SignatureInfo, VerificationReport,
};

pub const RESULT_MAJOR_SUCCESS: &str = "urn:oasis:names:tc:dss:1.0:resultmajor:Success";
pub const RESULT_MAJOR_REQUESTER_ERROR: &str =
    "urn:oasis:names:tc:dss:1.0:resultmajor:RequesterError";

pub const RESULT_MINOR_VALID_SIGNATURE: &str =
    "urn:oasis:names:tc:dss:1.0:resultminor:valid:signature:OnAllDocuments";
pub const RESULT_MINOR_VALID_MULTI_SIGNATURES: &str =
    "urn:oasis:names:tc:dss:1.0:resultminor:ValidMultiSignatures";
pub const RESULT_MINOR_NOT_PARSEABLE_XML_DOCUMENT: &str =
    "urn:oasis:names:tc:dss:1.0:resultminor:NotParseableXMLDocument";

/// Result major used inside verification reports for a valid signature.
pub const VR_RESULT_MAJOR_VALID: &str = "urn:oasis:names:tc:dss:1.0:detail:valid";

/// Profile of the artifact binding store/retrieve calls.
pub const ARTIFACT_BINDING_PROFILE: &str = "be:fedict:eid:dss:profile:artifact-binding:1.0";

const XML_MIME_TYPE: &str = "text/xml";

/// A document as carried inside a DSS request or response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DocumentPayload {
    /// An XML document, sent as `Base64XML`.
    Xml(Vec<u8>),

    /// Any other document, sent as `Base64Data` with its mime type.
    Base64Data { mime_type: String, data: Vec<u8> },
}

impl DocumentPayload {
    /// A missing mime type means XML.
    pub fn new(data: Vec<u8>, mime_type: Option<&str>) -> Self {
        match mime_type {
            None | Some(XML_MIME_TYPE) => Self::Xml(data),
            Some(mime_type) => Self::Base64Data {
                mime_type: mime_type.to_string(),
                data,
            },
        }
    }

    pub fn data(&self) -> &[u8] {
        match self {
            Self::Xml(data) | Self::Base64Data { data, .. } => data,
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            Self::Xml(_) => XML_MIME_TYPE,
            Self::Base64Data { mime_type, .. } => mime_type,
        }
    }

    pub fn into_data(self) -> Vec<u8> {
        match self {
            Self::Xml(data) | Self::Base64Data { data, .. } => data,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VerifyRequest {
    pub request_id: String,
    pub document: DocumentPayload,
    /// The original document, for detached signature formats.
    pub original_document: Option<DocumentPayload>,
    pub return_verification_report: bool,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VerifyResponse {
    pub request_id: Option<String>,
    pub result: ResultStatus,
    pub verification_report: Option<VerificationReport>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoreRequest {
    pub request_id: String,
    pub profile: String,
    pub document: DocumentPayload,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StoreResponse {
    pub request_id: Option<String>,
    pub profile: Option<String>,
    pub result: ResultStatus,
    pub storage_info: Option<StorageInfo>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetrieveRequest {
    pub request_id: String,
    pub profile: String,
    pub artifact_id: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RetrieveResponse {
    pub request_id: Option<String>,
    pub profile: Option<String>,
    pub result: ResultStatus,
    pub document: Option<DocumentPayload>,
}

/// Where and for how long the DSS keeps a stored document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StorageInfo {
    /// Pass this as `SignatureRequestId` in a Simple Protocol request.
    pub artifact_id: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

/// Performs the actual web service calls.
///
/// Implementations own TLS, certificate pinning of the endpoint, timeouts
/// and XML (de)serialization. Errors they return are passed to the caller
/// unchanged.
#[cfg_attr(test, mockall::automock)]
pub trait DssTransport {
    fn verify(&self, request: &VerifyRequest) -> Result<VerifyResponse>;

    fn store(&self, request: &StoreRequest) -> Result<StoreResponse>;

    fn retrieve(&self, request: &RetrieveRequest) -> Result<RetrieveResponse>;
}

/// Client for the DSS web service.
///
/// Every call is made exactly once. A failed call is never retried here.
#[derive(Debug)]
pub struct DigitalSignatureServiceClient<T: DssTransport> {
    transport: T,
}

impl<T: DssTransport> DigitalSignatureServiceClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns `true` if the document carries one or more valid signatures.
    ///
    /// `mime_type` of `None` means `text/xml`.
    pub fn verify(&self, document: &[u8], mime_type: Option<&str>) -> Result<bool> {
        self.verify_with_original(document, mime_type, None)
    }

    /// Like [`verify`](Self::verify) with the original document of a
    /// detached signature.
    pub fn verify_with_original(
        &self,
        document: &[u8],
        mime_type: Option<&str>,
        original_document: Option<(&[u8], Option<&str>)>,
    ) -> Result<bool> {
        let response = self.do_verify(document, mime_type, original_document, false)?;

        match response.result.result_minor.as_deref() {
            Some(RESULT_MINOR_VALID_SIGNATURE) | Some(RESULT_MINOR_VALID_MULTI_SIGNATURES) => {
                Ok(true)
            }
            Some(minor) => {
                log::debug!("document not valid: {minor}");
                Ok(false)
            }
            None => Err(Error::TransportProtocolError(
                "missing ResultMinor".to_string(),
            )),
        }
    }

    /// Verify the document and return details about each valid signature.
    pub fn verify_with_signers(
        &self,
        document: &[u8],
        mime_type: Option<&str>,
    ) -> Result<Vec<SignatureInfo>> {
        let response = self.do_verify(document, mime_type, None, true)?;

        parse_verification_report(response.verification_report.as_ref())
    }

    fn do_verify(
        &self,
        document: &[u8],
        mime_type: Option<&str>,
        original_document: Option<(&[u8], Option<&str>)>,
        return_verification_report: bool,
    ) -> Result<VerifyResponse> {
        let request = VerifyRequest {
            request_id: new_request_id("dss-verify-request"),
            document: DocumentPayload::new(document.to_vec(), mime_type),
            original_document: original_document
                .map(|(data, mime_type)| DocumentPayload::new(data.to_vec(), mime_type)),
            return_verification_report,
        };

        let response = self.transport.verify(&request)?;

        check_request_id(&request.request_id, response.request_id.as_deref())?;
        check_result(&response.result)?;

        Ok(response)
    }

    /// Store a document at the DSS for later use with artifact binding.
    pub fn store(&self, document: &[u8], content_type: Option<&str>) -> Result<StorageInfo> {
        let request = StoreRequest {
            request_id: new_request_id("dss-sign-request"),
            profile: ARTIFACT_BINDING_PROFILE.to_string(),
            document: DocumentPayload::new(document.to_vec(), content_type),
        };

        let response = self.transport.store(&request)?;

        check_request_id(&request.request_id, response.request_id.as_deref())?;
        check_result(&response.result)?;
        check_profile(response.profile.as_deref())?;

        let storage_info = response.storage_info.ok_or(Error::MissingStorageInfo)?;
        log::debug!(
            "stored artifact {} valid {} to {}",
            storage_info.artifact_id,
            storage_info.not_before,
            storage_info.not_after
        );

        Ok(storage_info)
    }

    /// Fetch a signed document by the id returned in `SignatureResponseId`.
    pub fn retrieve(&self, artifact_id: &str) -> Result<Vec<u8>> {
        let request = RetrieveRequest {
            request_id: new_request_id("dss-sign-request"),
            profile: ARTIFACT_BINDING_PROFILE.to_string(),
            artifact_id: artifact_id.to_string(),
        };

        let response = self.transport.retrieve(&request)?;

        check_request_id(&request.request_id, response.request_id.as_deref())?;
        check_result(&response.result)?;
        check_profile(response.profile.as_deref())?;

        response
            .document
            .map(DocumentPayload::into_data)
            .ok_or(Error::DocumentNotFound)
    }
}

fn new_request_id(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}

fn check_request_id(sent: &str, received: Option<&str>) -> Result<()> {
    match received {
        Some(received) if received == sent => Ok(()),
        Some(received) => Err(Error::TransportProtocolError(format!(
            "response id {received} does not match request id {sent}"
        ))),
        None => Err(Error::TransportProtocolError(
            "missing response id".to_string(),
        )),
    }
}

fn check_result(result: &ResultStatus) -> Result<()> {
    if result.result_major == RESULT_MAJOR_SUCCESS {
        return Ok(());
    }

    log::warn!(
        "DSS result: {} {} {}",
        result.result_major,
        result.result_minor.as_deref().unwrap_or_default(),
        result.result_message.as_deref().unwrap_or_default()
    );

    if result.result_minor.as_deref() == Some(RESULT_MINOR_NOT_PARSEABLE_XML_DOCUMENT) {
        return Err(Error::NotParseableDocument);
    }

    Err(Error::UnsuccessfulResult {
        major: result.result_major.clone(),
        minor: result.result_minor.clone(),
    })
}

fn check_profile(profile: Option<&str>) -> Result<()> {
    match profile {
        Some(ARTIFACT_BINDING_PROFILE) => Ok(()),
        other => Err(Error::UnexpectedProfile(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}
