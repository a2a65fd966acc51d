// Copyright 2024 Adobe. All rights reserved.
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

#![allow(clippy::unwrap_used)]

mod test_signer;

use dss_simple::{
    crypto::{base64, raw_signature::RawSigner},
    protocol::{canonical::ServiceSigned, params},
    ExpectedRequest, FormParameters, ServiceSignature,
};
#[allow(unused)]
pub use test_signer::{citizen, dss, impostor, sp, Credentials};

#[allow(unused_macros)]
macro_rules! assert_err {
    ($expression:expr, $($pattern:tt)+) => {
        match $expression {
            $($pattern)+ => (),
            ref e => panic!("expected `{}` but got `{:?}`", stringify!($($pattern)+), e),
        }
    }
}
#[allow(unused_imports)]
pub(super) use assert_err;

pub const TARGET: &str = "https://sp.example/return";

#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// What the DSS signs on a browser POST response.
#[allow(dead_code)]
pub const DSS_SERVICE_SIGNED: &str =
    "target,SignatureRequest,SignatureResponse,SignatureCertificate";

/// A successful response carrying `document`, signed by the citizen.
#[allow(dead_code)]
pub fn ok_response(document: &[u8]) -> FormParameters {
    [
        (params::SIGNATURE_STATUS, "OK".to_string()),
        (params::SIGNATURE_RESPONSE, base64::encode(document)),
        (
            params::SIGNATURE_CERTIFICATE,
            base64::encode(&citizen().cert_der),
        ),
    ]
    .into_iter()
    .collect()
}

/// Add a service signature made by `signer` the way the DSS does it.
#[allow(dead_code)]
pub fn service_sign(
    form: &mut FormParameters,
    expected: &ExpectedRequest,
    service_signed: &str,
    signer: &Credentials,
) {
    let mut values = form.clone();
    if let Some(target) = &expected.target {
        values.push(params::TARGET, target.as_str());
    }
    if let Some(request) = &expected.signature_request {
        values.push(params::SIGNATURE_REQUEST, request.as_str());
    }
    if let Some(request_id) = &expected.signature_request_id {
        values.push(params::SIGNATURE_REQUEST_ID, request_id.as_str());
    }

    let service_signed = ServiceSigned::parse(service_signed);
    let data = service_signed.canonical_bytes(&values);
    let signature_value = signer.signer().sign(&data).unwrap();

    ServiceSignature::new(service_signed, signature_value, vec![signer.certificate()])
        .unwrap()
        .append_to(form);
}
