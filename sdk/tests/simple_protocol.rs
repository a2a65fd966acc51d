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

//! End-to-end Simple Protocol ceremonies: SP request, DSS response, SP
//! validation.

#![allow(clippy::unwrap_used)]

mod common;

use common::{
    assert_err, citizen, dss, impostor, init_logging, ok_response, service_sign, sp,
    DSS_SERVICE_SIGNED, TARGET,
};
use dss_simple::{
    crypto::base64,
    protocol::{canonical::ServiceSigned, params},
    Error, ExpectedRequest, FormParameters, RequestSigner, ServiceSignature,
    ServiceSignatureVerifier, SignatureOutcome, SignatureRequest, SignatureResponseProcessor,
    TrustAnchor,
};

const DOCUMENT: &[u8] = b"<?xml version=\"1.0\"?><doc>hello</doc>";
const SIGNED_DOCUMENT: &[u8] = b"<?xml version=\"1.0\"?><doc>hello<ds:Signature/></doc>";

fn pinned_processor() -> SignatureResponseProcessor {
    let anchor = TrustAnchor::from_certificate(&dss().certificate());
    SignatureResponseProcessor::new(Some(anchor))
}

#[test]
fn full_ceremony_with_service_signatures() {
    init_logging();

    // SP side: build and sign the request.
    let request = SignatureRequest::new(TARGET)
        .with_document(DOCUMENT)
        .with_language("en")
        .with_relay_state("session-1");
    let request_form = RequestSigner::new(sp().signer())
        .form_parameters(&request)
        .unwrap();

    // DSS side: check the SP signature over the request fields.
    let request_signature = ServiceSignature::from_parameters(&request_form)
        .unwrap()
        .unwrap();
    assert_eq!(
        request_signature.service_signed().to_string(),
        "target,SignatureRequest,language,RelayState"
    );
    ServiceSignatureVerifier::default()
        .verify(Some(&request_signature), &request.signed_field_values())
        .unwrap();

    // DSS answers through the browser.
    let expected = ExpectedRequest::from(&request);
    let mut response = ok_response(SIGNED_DOCUMENT);
    response.push(params::RELAY_STATE, "session-1");
    service_sign(&mut response, &expected, DSS_SERVICE_SIGNED, dss());

    let body = response.to_urlencoded();

    // SP side: validate.
    let outcome = pinned_processor()
        .process_urlencoded(body.as_bytes(), &expected)
        .unwrap();

    let SignatureOutcome::Signed(signed) = outcome else {
        panic!("expected a signed outcome");
    };
    assert_eq!(signed.document(), Some(SIGNED_DOCUMENT));
    assert_eq!(
        signed.signer_certificate().der(),
        citizen().cert_der.as_slice()
    );
}

#[test]
fn round_trip_for_every_field_combination() {
    let signer = RequestSigner::new(sp().signer());
    let anchor = TrustAnchor::from_certificate(&sp().certificate());
    let verifier = ServiceSignatureVerifier::new(Some(anchor));

    for inline in [true, false] {
        for language in [None, Some("nl")] {
            for content_type in [None, Some("text/xml")] {
                for relay_state in [None, Some("state")] {
                    let mut request = SignatureRequest::new(TARGET);
                    request = if inline {
                        request.with_document(DOCUMENT)
                    } else {
                        request.with_artifact_id("artifact-123")
                    };
                    if let Some(language) = language {
                        request = request.with_language(language);
                    }
                    if let Some(content_type) = content_type {
                        request = request.with_content_type(content_type);
                    }
                    if let Some(relay_state) = relay_state {
                        request = request.with_relay_state(relay_state);
                    }

                    let signature = signer.sign(&request).unwrap();
                    verifier
                        .verify(Some(&signature), &request.signed_field_values())
                        .unwrap();
                }
            }
        }
    }
}

#[test]
fn tampering_any_signed_field_is_detected() {
    let request = SignatureRequest::new(TARGET)
        .with_document(DOCUMENT)
        .with_language("en")
        .with_content_type("text/xml")
        .with_relay_state("state");
    let signature = RequestSigner::new(sp().signer()).sign(&request).unwrap();
    let verifier = ServiceSignatureVerifier::default();

    let flip = |value: &Option<String>| -> Option<String> {
        let mut bytes = value.clone().unwrap().into_bytes();
        bytes[0] ^= 0x01;
        Some(String::from_utf8(bytes).unwrap())
    };

    let original = request.signed_field_values();

    let mut tampered = original.clone();
    tampered.target = flip(&original.target);
    assert_err!(
        verifier.verify(Some(&signature), &tampered),
        Err(Error::ServiceSignatureInvalid)
    );

    let mut tampered = original.clone();
    tampered.signature_request = flip(&original.signature_request);
    assert_err!(
        verifier.verify(Some(&signature), &tampered),
        Err(Error::ServiceSignatureInvalid)
    );

    let mut tampered = original.clone();
    tampered.language = flip(&original.language);
    assert_err!(
        verifier.verify(Some(&signature), &tampered),
        Err(Error::ServiceSignatureInvalid)
    );

    let mut tampered = original.clone();
    tampered.content_type = flip(&original.content_type);
    assert_err!(
        verifier.verify(Some(&signature), &tampered),
        Err(Error::ServiceSignatureInvalid)
    );

    let mut tampered = original.clone();
    tampered.relay_state = flip(&original.relay_state);
    assert_err!(
        verifier.verify(Some(&signature), &tampered),
        Err(Error::ServiceSignatureInvalid)
    );

    // fields outside the signed list do not matter
    let mut unrelated = original.clone();
    unrelated.signature_response = Some("ignored".to_string());
    verifier.verify(Some(&signature), &unrelated).unwrap();
}

#[test]
fn order_of_signed_fields_matters() {
    let request = SignatureRequest::new("https://sp.example/return")
        .with_artifact_id("artifact-123")
        .with_language("en");
    let values = request.signed_field_values();

    let signature = RequestSigner::new(sp().signer()).sign(&request).unwrap();
    assert_eq!(
        signature.service_signed().to_string(),
        "target,SignatureRequestId,language"
    );
    assert_eq!(
        signature.service_signed().canonical_bytes(&values),
        b"https://sp.example/returnartifact-123en".to_vec()
    );

    let reordered = ServiceSigned::parse("language,target,SignatureRequestId");
    assert_ne!(
        reordered.canonical_bytes(&values),
        signature.service_signed().canonical_bytes(&values)
    );

    let replayed = ServiceSignature::new(
        reordered,
        signature.signature_value().to_vec(),
        signature.certificate_chain().to_vec(),
    )
    .unwrap();

    assert_err!(
        ServiceSignatureVerifier::default().verify(Some(&replayed), &values),
        Err(Error::ServiceSignatureInvalid)
    );

    // A genuine signature over the other order is a different signature.
    let mut values_form = FormParameters::new();
    values_form.push(params::TARGET, "https://sp.example/return");
    values_form.push(params::SIGNATURE_REQUEST_ID, "artifact-123");
    values_form.push(params::LANGUAGE, "en");
    let other_order = ServiceSigned::parse("language,target,SignatureRequestId")
        .canonical_bytes(&values_form);
    let other_signature = sp().signer().sign(&other_order).unwrap();
    assert_ne!(other_signature, signature.signature_value());
}

#[test]
fn valid_signature_from_untrusted_certificate() {
    let expected = ExpectedRequest {
        target: Some(TARGET.to_string()),
        signature_request: Some(base64::encode(DOCUMENT)),
        ..Default::default()
    };
    let mut response = ok_response(SIGNED_DOCUMENT);
    service_sign(&mut response, &expected, DSS_SERVICE_SIGNED, impostor());

    // cryptographically fine
    SignatureResponseProcessor::default()
        .process(&response, &expected)
        .unwrap();

    let err = pinned_processor()
        .process(&response, &expected)
        .unwrap_err();
    assert_err!(err, Error::FingerprintMismatch);
    assert!(err.is_integrity_failure());
}

#[test]
fn cancellation_is_not_a_failure() {
    let form = FormParameters::from_urlencoded(b"SignatureStatus=USER_CANCELLED");

    // Not even a required service signature is looked at.
    let outcome = pinned_processor()
        .process(&form, &ExpectedRequest::default())
        .unwrap();

    assert!(outcome.is_cancelled());
    assert_eq!(outcome.into_response(), None);
}

#[test]
fn response_needs_document_or_artifact() {
    let expected = ExpectedRequest {
        target: Some(TARGET.to_string()),
        signature_request: Some(base64::encode(DOCUMENT)),
        relay_state: Some("state".to_string()),
        ..Default::default()
    };

    let mut response: FormParameters = ok_response(SIGNED_DOCUMENT)
        .iter()
        .filter(|(name, _)| *name != params::SIGNATURE_RESPONSE)
        .collect();
    response.push(params::RELAY_STATE, "state");
    service_sign(&mut response, &expected, DSS_SERVICE_SIGNED, dss());

    assert_err!(
        pinned_processor().process(&response, &expected),
        Err(Error::MissingSignaturePayload)
    );
}

#[test]
fn artifact_binding_response() {
    let expected = ExpectedRequest {
        target: Some(TARGET.to_string()),
        signature_request_id: Some("artifact-123".to_string()),
        ..Default::default()
    };

    let mut response: FormParameters = [
        (params::SIGNATURE_STATUS, "OK".to_string()),
        (params::SIGNATURE_RESPONSE_ID, "artifact-456".to_string()),
        (
            params::SIGNATURE_CERTIFICATE,
            base64::encode(&citizen().cert_der),
        ),
    ]
    .into_iter()
    .collect();
    service_sign(
        &mut response,
        &expected,
        "target,SignatureRequestId,SignatureResponseId,SignatureCertificate",
        dss(),
    );

    let signed = pinned_processor()
        .process(&response, &expected)
        .unwrap()
        .into_response()
        .unwrap();

    assert_eq!(signed.document(), None);
    assert_eq!(signed.response_id(), Some("artifact-456"));
}

#[test]
fn processors_with_different_pins_run_side_by_side() {
    let expected = ExpectedRequest {
        target: Some(TARGET.to_string()),
        signature_request: Some(base64::encode(DOCUMENT)),
        ..Default::default()
    };
    let mut response = ok_response(SIGNED_DOCUMENT);
    service_sign(&mut response, &expected, DSS_SERVICE_SIGNED, dss());

    let trusting = std::sync::Arc::new(pinned_processor());
    let anchor = TrustAnchor::from_certificate(&impostor().certificate());
    let distrusting = std::sync::Arc::new(SignatureResponseProcessor::new(Some(anchor)));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let processor = if i % 2 == 0 {
                trusting.clone()
            } else {
                distrusting.clone()
            };
            let response = response.clone();
            let expected = expected.clone();
            std::thread::spawn(move || processor.process(&response, &expected).is_ok())
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![true, false, true, false]);
}
