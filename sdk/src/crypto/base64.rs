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

//! Base64 convenience functions.

use ::base64::{engine::general_purpose, DecodeError, Engine as _};

/// Encode a byte slice to a Base64 string using the standard alphabet with
/// padding.
pub fn encode(data: &[u8]) -> String {
    general_purpose::STANDARD.encode(data)
}

/// Decode a Base64 string into a byte vector.
pub fn decode(data: &str) -> Result<Vec<u8>, DecodeError> {
    general_purpose::STANDARD.decode(data)
}

/// Decode a Base64 string that may have been line-wrapped or padded with
/// whitespace on its way through an HTML form.
///
/// Any ASCII whitespace is discarded before decoding.
pub fn decode_form_value(data: &str) -> Result<Vec<u8>, DecodeError> {
    if !data.bytes().any(|b| b.is_ascii_whitespace()) {
        return decode(data);
    }

    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    decode(&compact)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crate::crypto::base64;

    #[test]
    fn encode() {
        assert_eq!(base64::encode(b"Hello, world"), "SGVsbG8sIHdvcmxk");
    }

    #[test]
    fn decode() {
        assert_eq!(
            base64::decode("SGVsbG8sIHdvcmxk"),
            Ok(b"Hello, world".to_vec())
        );
    }

    #[test]
    fn decode_form_value_ignores_line_breaks() {
        assert_eq!(
            base64::decode_form_value("SGVsbG8s\r\nIHdv cmxk\n").unwrap(),
            b"Hello, world".to_vec()
        );
    }

    #[test]
    fn decode_form_value_rejects_garbage() {
        assert!(base64::decode_form_value("not*base64").is_err());
    }
}
