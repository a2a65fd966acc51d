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

//! Hash convenience functions.

use sha1::{Digest, Sha1};

/// Length in bytes of a SHA-1 digest.
pub const SHA1_LEN: usize = 20;

/// Given a byte slice, return the SHA-1 hash of that content.
pub fn sha1(data: &[u8]) -> [u8; SHA1_LEN] {
    let mut hasher = Sha1::default();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use crate::crypto::hash::sha1;

    #[test]
    fn sha1_of_empty_input() {
        assert_eq!(
            hex::encode(sha1(b"")),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn sha1_of_abc() {
        assert_eq!(
            hex::encode(sha1(b"abc")),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }
}
