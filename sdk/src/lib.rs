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

#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! This library implements the service provider side of the eID Digital
//! Signature Service (DSS) "Simple Protocol".
//!
//! A signature ceremony has two halves. The SP renders a browser POST form
//! with a [`SignatureRequest`], optionally service signed by a
//! [`RequestSigner`]. The DSS posts the answer back through the browser and
//! the SP hands the decoded form to a [`SignatureResponseProcessor`], which
//! checks status, payload, relay state, the DSS service signature and the
//! pinned service certificate before returning the signed document.
//!
//! # Example: Validating a response
//!
//! ```
//! use dss_simple::{
//!     ExpectedRequest, FormParameters, SignatureOutcome, SignatureResponseProcessor,
//! };
//!
//! # fn main() -> dss_simple::Result<()> {
//! let processor = SignatureResponseProcessor::new(None);
//!
//! let form = FormParameters::from_urlencoded(b"SignatureStatus=USER_CANCELLED");
//! let outcome = processor.process(&form, &ExpectedRequest::default())?;
//!
//! assert_eq!(outcome, SignatureOutcome::UserCancelled);
//! # Ok(())
//! # }
//! ```
//!
//! # Example: Building a request
//!
//! ```
//! use dss_simple::{RequestSigner, SignatureRequest};
//!
//! # fn main() -> dss_simple::Result<()> {
//! let request = SignatureRequest::new("https://sp.example/return")
//!     .with_document(b"<doc/>")
//!     .with_language("en");
//!
//! // Without key material the request is sent unsigned.
//! let form = RequestSigner::without_key().form_parameters(&request)?;
//! assert_eq!(form.get("SignatureRequest"), Some("PGRvYy8+"));
//! # Ok(())
//! # }
//! ```

pub mod client;

/// Cryptography primitives: base64, hashing, certificates and raw
/// RSA signatures.
pub mod crypto;

mod error;
pub use error::{Error, Result};

pub mod protocol;
pub use protocol::{
    ExpectedRequest, FormParameters, RequestSigner, ServiceSignature, ServiceSignatureVerifier,
    SignatureOutcome, SignatureRequest, SignatureResponse, SignatureResponseProcessor,
};

pub mod settings;

mod trust;
pub use trust::TrustAnchor;
