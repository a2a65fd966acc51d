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

//! This module binds Rust native logic for generating raw signatures to this
//! crate's [`RawSigner`] trait.

use rsa::RsaPrivateKey;

use crate::crypto::raw_signature::{RawSigner, RawSignerError, SigningAlg};

mod rsa_signer;

/// Return a built-in [`RawSigner`] instance using the provided signing
/// certificate chain and private key, both PEM encoded.
///
/// May return an `Err` response if the certificate chain or private key are
/// invalid.
pub(crate) fn signer_from_cert_chain_and_private_key(
    cert_chain: &[u8],
    private_key: &[u8],
    alg: SigningAlg,
) -> Result<Box<dyn RawSigner + Send + Sync>, RawSignerError> {
    Ok(Box::new(
        rsa_signer::RsaSigner::from_cert_chain_and_private_key(cert_chain, private_key, alg)?,
    ))
}

/// Return a built-in [`RawSigner`] for a key that is already in memory.
pub(crate) fn signer_from_private_key(
    private_key: RsaPrivateKey,
    cert_chain: Vec<Vec<u8>>,
    alg: SigningAlg,
) -> Box<dyn RawSigner + Send + Sync> {
    Box::new(rsa_signer::RsaSigner::new(private_key, cert_chain, alg))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crate::crypto::{
        raw_signature::{rust_native, signer::test_signer::test_credentials, SigningAlg},
        Certificate,
    };

    const SAMPLE_DATA: &[u8] = b"some sample content to sign";

    fn sign_and_validate(alg: SigningAlg) {
        let creds = test_credentials();

        let signer = rust_native::signers::signer_from_cert_chain_and_private_key(
            creds.cert_pem.as_bytes(),
            creds.private_key_pem.as_bytes(),
            alg,
        )
        .unwrap();

        let signature = signer.sign(SAMPLE_DATA).unwrap();

        let cert = Certificate::from_der(&signer.cert_chain().unwrap()[0]).unwrap();

        let validator = rust_native::validators::validator_for_signing_alg(alg).unwrap();
        validator
            .validate(&signature, SAMPLE_DATA, cert.public_key_der())
            .unwrap();
    }

    #[test]
    fn rs1() {
        sign_and_validate(SigningAlg::Rs1);
    }

    #[test]
    fn rs256() {
        sign_and_validate(SigningAlg::Rs256);
    }

    #[test]
    fn rs384() {
        sign_and_validate(SigningAlg::Rs384);
    }

    #[test]
    fn rs512() {
        sign_and_validate(SigningAlg::Rs512);
    }
}
