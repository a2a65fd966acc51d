// Copyright 2022 Adobe. All rights reserved.
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

use thiserror::Error;

use crate::crypto::{raw_signature::RawSignerError, CertificateError};

/// `Error` enumerates errors returned by Simple Protocol operations.
///
/// A cancelled ceremony is not an error; see
/// [`SignatureOutcome::UserCancelled`](crate::SignatureOutcome::UserCancelled).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    // --- response structure ---
    /// The response carried no `SignatureStatus`.
    #[error("signature status missing")]
    MissingStatus,

    /// The response carried a status other than `OK` or `USER_CANCELLED`.
    #[error("invalid signature status: {0}")]
    InvalidStatus(String),

    /// Neither `SignatureResponse` nor `SignatureResponseId` was present.
    #[error("signature response and signature response id both missing")]
    MissingSignaturePayload,

    #[error("signature response and signature response id are both present")]
    AmbiguousSignaturePayload,

    #[error("signature response is not valid base64")]
    InvalidSignaturePayload,

    /// `SignatureCertificate` was absent.
    #[error("signature certificate missing")]
    MissingCertificate,

    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    /// The response relay state differs from the one stored with the request.
    #[error("relay state mismatch")]
    RelayStateMismatch,

    // --- trust and integrity ---
    /// A trust anchor is configured but the response was not service signed.
    #[error("service signature missing")]
    ServiceSignatureMissing,

    /// The service signature does not verify over the signed fields.
    #[error("service signature invalid")]
    ServiceSignatureInvalid,

    /// The service certificate does not match the configured fingerprint.
    #[error("service certificate fingerprint mismatch")]
    FingerprintMismatch,

    #[error("malformed service signature: {0}")]
    MalformedServiceSignature(String),

    /// Request-side values needed to rebuild the signed bytes were not
    /// supplied.
    #[error("missing request context: {0}")]
    MissingRequestContext(String),

    // --- request construction ---
    /// No signing key or certificate chain is available.
    #[error("signing key material missing")]
    MissingKeyMaterial,

    /// Exactly one of `SignatureRequest` and `SignatureRequestId` must be set.
    #[error("invalid request field combination: {0}")]
    InvalidFieldCombination(String),

    #[error(transparent)]
    Signer(#[from] RawSignerError),

    // --- verification reports ---
    #[error("signer certificate missing from verification report")]
    MissingSignerCertificate,

    // --- transport ---
    /// The transport answer is structurally wrong (for example the
    /// correlation id is missing or does not match).
    #[error("transport protocol error: {0}")]
    TransportProtocolError(String),

    #[error("unsuccessful result: major = {major}, minor = {minor:?}")]
    UnsuccessfulResult {
        major: String,
        minor: Option<String>,
    },

    #[error("document is not parseable XML")]
    NotParseableDocument,

    #[error("document not found")]
    DocumentNotFound,

    #[error("storage info missing from response")]
    MissingStorageInfo,

    #[error("unexpected profile: {0}")]
    UnexpectedProfile(String),

    // --- settings ---
    #[error("bad parameter: {0}")]
    BadParam(String),

    #[error("unsupported settings format: {0}")]
    UnsupportedType(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` for errors that indicate the response may have been
    /// tampered with or does not come from the trusted service.
    ///
    /// These are never recovered from locally.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            Self::ServiceSignatureMissing
                | Self::ServiceSignatureInvalid
                | Self::FingerprintMismatch
                | Self::MalformedServiceSignature(_)
        )
    }
}

impl From<CertificateError> for Error {
    fn from(err: CertificateError) -> Self {
        Self::InvalidCertificate(err.to_string())
    }
}

/// A specialized `Result` type for Simple Protocol operations.
pub type Result<T> = std::result::Result<T, Error>;
