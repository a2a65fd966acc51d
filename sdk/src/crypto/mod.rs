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

//! Cryptography primitives used by the Simple Protocol.
//!
//! Everything here is synchronous and pure: keys and certificates are
//! immutable values that can be shared across threads.

pub mod base64;

mod certificate;
pub use certificate::{Certificate, CertificateError};

pub mod hash;

pub mod raw_signature;
