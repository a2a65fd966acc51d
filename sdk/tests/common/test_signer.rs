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

use std::sync::OnceLock;

use dss_simple::crypto::{
    raw_signature::{signer_from_private_key, RawSigner, SigningAlg},
    Certificate,
};
use rcgen::{CertificateParams, DnType, KeyPair};
use rsa::{pkcs8::EncodePrivateKey, RsaPrivateKey};

/// A key pair with a self-signed certificate, generated once per test binary.
pub struct Credentials {
    pub private_key: RsaPrivateKey,
    pub cert_der: Vec<u8>,
}

impl Credentials {
    fn generate(common_name: &str) -> Self {
        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, 2048).unwrap();

        let pkcs8 = private_key.to_pkcs8_der().unwrap();
        let key_pair = KeyPair::try_from(pkcs8.as_bytes()).unwrap();

        let mut params = CertificateParams::new(vec![format!("{common_name}.example")]).unwrap();
        params
            .distinguished_name
            .push(DnType::CommonName, common_name);

        let cert = params.self_signed(&key_pair).unwrap();

        Self {
            private_key,
            cert_der: cert.der().to_vec(),
        }
    }

    pub fn signer(&self) -> Box<dyn RawSigner + Send + Sync> {
        signer_from_private_key(
            self.private_key.clone(),
            vec![self.cert_der.clone()],
            SigningAlg::Rs1,
        )
    }

    pub fn certificate(&self) -> Certificate {
        Certificate::from_der(&self.cert_der).unwrap()
    }
}

/// The DSS service identity.
#[allow(dead_code)]
pub fn dss() -> &'static Credentials {
    static CREDS: OnceLock<Credentials> = OnceLock::new();
    CREDS.get_or_init(|| Credentials::generate("dss.example"))
}

/// A key the SP does not trust.
#[allow(dead_code)]
pub fn impostor() -> &'static Credentials {
    static CREDS: OnceLock<Credentials> = OnceLock::new();
    CREDS.get_or_init(|| Credentials::generate("impostor.example"))
}

/// The identity of the citizen who signs documents.
#[allow(dead_code)]
pub fn citizen() -> &'static Credentials {
    static CREDS: OnceLock<Credentials> = OnceLock::new();
    CREDS.get_or_init(|| Credentials::generate("citizen"))
}

/// The service provider's request signing identity.
#[allow(dead_code)]
pub fn sp() -> &'static Credentials {
    static CREDS: OnceLock<Credentials> = OnceLock::new();
    CREDS.get_or_init(|| Credentials::generate("sp.example"))
}
