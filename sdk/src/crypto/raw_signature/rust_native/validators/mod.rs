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

//! This module binds Rust native logic for validating raw signatures to this
//! crate's [`RawSignatureValidator`] trait.

use crate::crypto::raw_signature::{RawSignatureValidator, SigningAlg};

mod rsa_legacy_validator;
pub(crate) use rsa_legacy_validator::RsaLegacyValidator;

/// Return a validator for the given signing algorithm.
pub(crate) fn validator_for_signing_alg(alg: SigningAlg) -> Option<Box<dyn RawSignatureValidator>> {
    match alg {
        SigningAlg::Rs1 => Some(Box::new(RsaLegacyValidator::Sha1)),
        SigningAlg::Rs256 => Some(Box::new(RsaLegacyValidator::Rsa256)),
        SigningAlg::Rs384 => Some(Box::new(RsaLegacyValidator::Rsa384)),
        SigningAlg::Rs512 => Some(Box::new(RsaLegacyValidator::Rsa512)),
    }
}
