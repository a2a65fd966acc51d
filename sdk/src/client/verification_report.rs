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

//! Per-signer details from a DSS verification report.
//!
//! The report arrives already parsed (by whatever handles the XML envelope)
//! as the serde types in this module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as, skip_serializing_none};

use crate::{
    client::{RESULT_MAJOR_SUCCESS, VR_RESULT_MAJOR_VALID},
    crypto::Certificate,
    Error, Result,
};

/// A `ResultMajor` / `ResultMinor` pair.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultStatus {
    pub result_major: String,
    #[serde(default)]
    pub result_minor: Option<String>,
    #[serde(default)]
    pub result_message: Option<String>,
}

impl ResultStatus {
    pub fn new(result_major: impl Into<String>, result_minor: Option<&str>) -> Self {
        Self {
            result_major: result_major.into(),
            result_minor: result_minor.map(str::to_string),
            result_message: None,
        }
    }

    /// The DSS marks good individual reports with the verification report
    /// `detail:valid` code rather than the protocol success code.
    pub fn is_success(&self) -> bool {
        self.result_major == RESULT_MAJOR_SUCCESS || self.result_major == VR_RESULT_MAJOR_VALID
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    #[serde(default)]
    pub individual_reports: Vec<IndividualReport>,
}

/// The verification result for a single signature.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualReport {
    pub result: ResultStatus,
    #[serde(default)]
    pub signing_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub details: Vec<ReportDetail>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ReportDetail {
    DetailedSignatureReport(DetailedSignatureReport),

    /// Any detail this crate does not interpret.
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedSignatureReport {
    /// Certificate path validity details, signer certificate first.
    #[serde(default)]
    pub certificate_validity: Vec<CertificateValidity>,
    #[serde(default)]
    pub claimed_roles: Vec<String>,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateValidity {
    #[serde(default)]
    pub subject: Option<String>,
    /// DER certificate, base64 in serialized form.
    #[serde_as(as = "Option<Base64>")]
    #[serde(default)]
    pub certificate_value: Option<Vec<u8>>,
}

/// What the DSS reported about one valid signature.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignatureInfo {
    signer_certificate: Certificate,
    signing_time: Option<DateTime<Utc>>,
    role: Option<String>,
}

impl SignatureInfo {
    pub fn signer_certificate(&self) -> &Certificate {
        &self.signer_certificate
    }

    pub fn signing_time(&self) -> Option<DateTime<Utc>> {
        self.signing_time
    }

    /// The first claimed role, if the signer claimed one.
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

/// Extract signer information from `report`, in report order.
///
/// Individual reports that do not indicate success are skipped. A successful
/// report without a usable signer certificate fails the whole parse with
/// [`Error::MissingSignerCertificate`]. An absent report yields no signers.
pub fn parse_verification_report(
    report: Option<&VerificationReport>,
) -> Result<Vec<SignatureInfo>> {
    let Some(report) = report else {
        log::debug!("no verification report");
        return Ok(Vec::new());
    };

    let mut signatures = Vec::with_capacity(report.individual_reports.len());

    for (index, individual) in report.individual_reports.iter().enumerate() {
        if !individual.result.is_success() {
            log::warn!(
                "skipping individual report {index}: {} {}",
                individual.result.result_major,
                individual.result.result_minor.as_deref().unwrap_or("")
            );
            continue;
        }

        if individual.signing_time.is_none() {
            log::warn!("individual report {index} has no signing time");
        }

        let detailed = individual.details.iter().find_map(|detail| match detail {
            ReportDetail::DetailedSignatureReport(detailed) => Some(detailed),
            ReportDetail::Other => None,
        });

        let certificate_value = detailed
            .and_then(|d| d.certificate_validity.first())
            .and_then(|validity| validity.certificate_value.as_deref())
            .ok_or_else(|| {
                log::error!("individual report {index} has no signer certificate");
                Error::MissingSignerCertificate
            })?;

        let signer_certificate = Certificate::from_der(certificate_value).map_err(|e| {
            log::error!("individual report {index}: {e}");
            Error::MissingSignerCertificate
        })?;

        let role = detailed.and_then(|d| d.claimed_roles.first()).cloned();

        signatures.push(SignatureInfo {
            signer_certificate,
            signing_time: individual.signing_time,
            role,
        });
    }

    Ok(signatures)
}

impl VerificationReport {
    /// See [`parse_verification_report`].
    pub fn signatures(&self) -> Result<Vec<SignatureInfo>> {
        parse_verification_report(Some(self))
    }
}
