/* src/server/chart/rust/src/config.rs */

//! Process-wide chart defaults. Built once at startup, then shared read-only.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChartError, Result};
use crate::options::{Options, deep_merge};

pub const DEFAULT_LIBRARY: &str = "Chartkick";

fn library_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r"\A[A-Za-z_$][A-Za-z0-9_$]*(?:\.[A-Za-z_$][A-Za-z0-9_$]*)*\z")
      .expect("library pattern")
  })
}

fn navigation_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"\A[A-Za-z0-9_-]+\z").expect("navigation pattern"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartDefaults {
  /// Deep-merged under every call's options.
  pub options: Options,
  /// Buffer that receives scripts unless a call sets `content_for` itself.
  pub content_for: Option<String>,
  /// Global JS object the chart constructors live on.
  pub library: String,
  /// Navigation-interception library in use on the client (e.g.
  /// `turbolinks`). Charts then bind to `<navigation>:load`.
  pub navigation: Option<String>,
}

impl Default for ChartDefaults {
  fn default() -> Self {
    Self {
      options: Options::new(),
      content_for: None,
      library: DEFAULT_LIBRARY.to_string(),
      navigation: None,
    }
  }
}

impl ChartDefaults {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.options.insert(key.into(), value.into());
    self
  }

  /// Deep-merge `options` over the current defaults.
  pub fn with_options(mut self, options: &Options) -> Self {
    self.options = deep_merge(&self.options, options);
    self
  }

  pub fn with_content_for(mut self, name: impl Into<String>) -> Self {
    self.content_for = Some(name.into());
    self
  }

  pub fn with_library(mut self, library: impl Into<String>) -> Self {
    self.library = library.into();
    self
  }

  pub fn with_navigation(mut self, library: impl Into<String>) -> Self {
    self.navigation = Some(library.into());
    self
  }

  /// Parse and validate TOML, e.g.
  ///
  /// ```toml
  /// content_for = "charts"
  /// navigation = "turbolinks"
  ///
  /// [options]
  /// colors = ["#b00", "#666"]
  /// ```
  pub fn from_toml_str(source: &str) -> Result<Self> {
    let defaults: Self =
      toml::from_str(source).map_err(|e| ChartError::InvalidConfig(format!("parse toml: {e}")))?;
    defaults.validate()?;
    Ok(defaults)
  }

  pub fn from_json_str(source: &str) -> Result<Self> {
    let defaults: Self = serde_json::from_str(source)
      .map_err(|e| ChartError::InvalidConfig(format!("parse json: {e}")))?;
    defaults.validate()?;
    Ok(defaults)
  }

  /// `library` and `navigation` are written into script text unquoted or
  /// inside an event name, so both are restricted to identifier shapes.
  pub fn validate(&self) -> Result<()> {
    if !library_re().is_match(&self.library) {
      return Err(ChartError::InvalidConfig(format!(
        "library must be a JavaScript identifier path, got {:?}",
        self.library
      )));
    }
    if let Some(ref nav) = self.navigation {
      if !navigation_re().is_match(nav) {
        return Err(ChartError::InvalidConfig(format!(
          "navigation must match [A-Za-z0-9_-]+, got {nav:?}"
        )));
      }
    }
    Ok(())
  }
}
