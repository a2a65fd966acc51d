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

//! Configuration for the service provider side of the Simple Protocol.
//!
//! Settings are plain values: load them once at startup and hand them to the
//! constructors that need them. Nothing is stored globally.

use std::path::Path;

use config::{Config, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{crypto::raw_signature::SigningAlg, trust::TrustAnchor, Error, Result};

// trait used to validate user input to make sure user supplied configurations are valid
pub(crate) trait SettingsValidate {
    // returns error if settings are invalid
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Settings that decide which DSS responses are trusted.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema), schemars(default))]
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct Trust {
    /// Hex SHA-1 fingerprint of the DSS service certificate.
    ///
    /// When set, every response must carry a service signature made with
    /// this certificate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_fingerprint: Option<String>,
}

impl Trust {
    /// The configured fingerprint as a [`TrustAnchor`], if any.
    pub fn trust_anchor(&self) -> Result<Option<TrustAnchor>> {
        self.service_fingerprint
            .as_deref()
            .map(TrustAnchor::from_hex)
            .transpose()
    }
}

impl SettingsValidate for Trust {
    fn validate(&self) -> Result<()> {
        self.trust_anchor().map(|_| ())
    }
}

/// Settings for service signatures, both produced and verified.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema), schemars(default))]
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct Signing {
    /// Defaults to `rs1` (RSA with SHA-1), which is what deployed services
    /// speak. Changing it breaks interoperability unless the DSS is
    /// configured the same way.
    pub algorithm: SigningAlg,
}

impl SettingsValidate for Signing {}

/// Defaults applied to outgoing requests by
/// [`SignatureRequest::with_settings`](crate::SignatureRequest::with_settings).
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema), schemars(default))]
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Language hint passed to the DSS user interface, e.g. `en` or `nl`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl SettingsValidate for ClientSettings {
    fn validate(&self) -> Result<()> {
        match self.language.as_deref() {
            Some(language) if language.trim().is_empty() => Err(Error::BadParam(
                "client.language must not be empty".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// All settings for this crate.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema), schemars(default))]
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct Settings {
    pub trust: Trust,
    pub signing: Signing,
    pub client: ClientSettings,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay a JSON document on top of these settings.
    ///
    /// ```
    /// # use dss_simple::settings::Settings;
    /// # fn main() -> dss_simple::Result<()> {
    /// let settings = Settings::new().with_json(r#"{"client": {"language": "nl"}}"#)?;
    /// assert_eq!(settings.client.language.as_deref(), Some("nl"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_json(self, json: &str) -> Result<Self> {
        self.with_string(json, "json")
    }

    /// Overlay a TOML document on top of these settings.
    ///
    /// ```
    /// # use dss_simple::settings::Settings;
    /// # fn main() -> dss_simple::Result<()> {
    /// let settings = Settings::new().with_toml(
    ///     r#"
    ///         [signing]
    ///         algorithm = "rs256"
    ///     "#,
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_toml(self, toml: &str) -> Result<Self> {
        self.with_string(toml, "toml")
    }

    /// Overlay a settings file. The format is taken from the extension.
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .ok_or(Error::BadParam(
                "settings file must have json or toml extension".into(),
            ))?
            .to_str()
            .ok_or(Error::BadParam("invalid settings file name".into()))?;

        let setting_buf = std::fs::read(path)?;
        self.with_string(&String::from_utf8_lossy(&setting_buf), ext)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::new().with_json(json)
    }

    pub fn from_toml(toml: &str) -> Result<Self> {
        Self::new().with_toml(toml)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new().with_file(path)
    }

    fn with_string(self, settings_str: &str, format: &str) -> Result<Self> {
        let f = match format.to_lowercase().as_str() {
            "json" => FileFormat::Json,
            "toml" => FileFormat::Toml,
            other => return Err(Error::UnsupportedType(other.to_string())),
        };

        let current_config = Config::try_from(&self).map_err(|e| Error::BadParam(e.to_string()))?;

        // merge overrides, allows for partial changes
        let updated_config = Config::builder()
            .add_source(current_config)
            .add_source(config::File::from_str(settings_str, f))
            .build()
            .map_err(|_e| Error::BadParam("could not parse configuration".into()))?;

        let settings = updated_config
            .try_deserialize::<Settings>()
            .map_err(|e| Error::BadParam(e.to_string()))?;

        settings.validate()?;

        Ok(settings)
    }
}

impl SettingsValidate for Settings {
    fn validate(&self) -> Result<()> {
        self.trust.validate()?;
        self.signing.validate()?;
        self.client.validate()
    }
}
