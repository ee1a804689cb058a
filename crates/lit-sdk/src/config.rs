//! Repository configuration stored in `.lit/config.toml`.

use std::fs;
use std::io;
use std::path::Path;

use lit_checkout::CheckoutPolicy;
use lit_tree::IgnoreRules;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Top-level configuration. Every section and key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    pub core: CoreConfig,
    pub user: UserConfig,
    pub checkout: CheckoutConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Names excluded at every depth. `.lit` is always excluded.
    pub ignore: Vec<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            ignore: vec!["node_modules".to_string()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub name: String,
    pub email: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            name: "lit".to_string(),
            email: "lit@localhost".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Also block checkout when the index differs from HEAD.
    pub enforce_index: bool,
}

impl RepoConfig {
    /// Load `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> SdkResult<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(text: &str) -> SdkResult<Self> {
        toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Commit author line: `name <email>`.
    pub fn author(&self) -> String {
        format!("{} <{}>", self.user.name, self.user.email)
    }

    pub fn ignore_rules(&self) -> IgnoreRules {
        IgnoreRules::new(self.core.ignore.iter().cloned())
    }

    pub fn checkout_policy(&self) -> CheckoutPolicy {
        CheckoutPolicy::from_enforce_index(self.checkout.enforce_index)
    }
}
