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

use rsa::{
    pkcs1::DecodeRsaPrivateKey,
    pkcs1v15::SigningKey,
    pkcs8::DecodePrivateKey,
    signature::{SignatureEncoding, Signer},
    RsaPrivateKey,
};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use x509_parser::pem::Pem;

use crate::crypto::raw_signature::{RawSigner, RawSignerError, SigningAlg};

/// Implements `RawSigner` trait using the `rsa` crate's implementation of
/// RSASSA-PKCS1-v1_5.
pub(crate) struct RsaSigner {
    alg: SigningAlg,
    cert_chain: Vec<Vec<u8>>,
    private_key: RsaPrivateKey,
}

impl RsaSigner {
    pub(crate) fn new(
        private_key: RsaPrivateKey,
        cert_chain: Vec<Vec<u8>>,
        alg: SigningAlg,
    ) -> Self {
        Self {
            alg,
            cert_chain,
            private_key,
        }
    }

    pub(crate) fn from_cert_chain_and_private_key(
        cert_chain: &[u8],
        private_key: &[u8],
        alg: SigningAlg,
    ) -> Result<Self, RawSignerError> {
        let cert_chain = Pem::iter_from_buffer(cert_chain)
            .map(|r| match r {
                Ok(pem) => Ok(pem.contents),
                Err(e) => Err(RawSignerError::InvalidSigningCredentials(format!(
                    "invalid PEM in certificate chain: {e}"
                ))),
            })
            .collect::<Result<Vec<Vec<u8>>, RawSignerError>>()?;

        if cert_chain.is_empty() {
            return Err(RawSignerError::InvalidSigningCredentials(
                "certificate chain is empty".to_string(),
            ));
        }

        let private_key = std::str::from_utf8(private_key).map_err(|e| {
            RawSignerError::InvalidSigningCredentials(format!("private key is not UTF-8: {e}"))
        })?;

        let private_key = RsaPrivateKey::from_pkcs8_pem(private_key)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(private_key))
            .map_err(|e| {
                RawSignerError::InvalidSigningCredentials(format!("invalid RSA private key: {e}"))
            })?;

        Ok(Self::new(private_key, cert_chain, alg))
    }
}

impl RawSigner for RsaSigner {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, RawSignerError> {
        let key = self.private_key.clone();

        let signature = match self.alg {
            SigningAlg::Rs1 => SigningKey::<Sha1>::new(key).try_sign(data)?,
            SigningAlg::Rs256 => SigningKey::<Sha256>::new(key).try_sign(data)?,
            SigningAlg::Rs384 => SigningKey::<Sha384>::new(key).try_sign(data)?,
            SigningAlg::Rs512 => SigningKey::<Sha512>::new(key).try_sign(data)?,
        };

        Ok(signature.to_vec())
    }

    fn alg(&self) -> SigningAlg {
        self.alg
    }

    fn cert_chain(&self) -> Result<Vec<Vec<u8>>, RawSignerError> {
        Ok(self.cert_chain.clone())
    }
}

impl From<rsa::signature::Error> for RawSignerError {
    fn from(err: rsa::signature::Error) -> Self {
        Self::InternalError(format!("RSA signing failed: {err}"))
    }
}
