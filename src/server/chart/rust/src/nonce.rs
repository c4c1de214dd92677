/* src/server/chart/rust/src/nonce.rs */

//! CSP nonce resolution for the generated `<script>` tag.
//!
//! Resolution is best-effort: providers are tried in order and the first
//! non-empty value wins. A provider that fails counts as "no nonce".

use std::fmt;

use serde_json::Value;

/// What the caller asked for through the `nonce` option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NonceRequest {
  /// No nonce attribute.
  #[default]
  Off,
  /// Ask the provider chain for the current response's nonce.
  Auto,
  /// Use this exact value.
  Literal(String),
}

impl NonceRequest {
  /// `true` means auto, `null`/`false` mean off, a string is a literal.
  /// Other values use their JSON text as the literal.
  pub fn from_value(value: &Value) -> Self {
    match value {
      Value::Null | Value::Bool(false) => Self::Off,
      Value::Bool(true) => Self::Auto,
      Value::String(s) => Self::Literal(s.clone()),
      other => Self::Literal(other.to_string()),
    }
  }
}

/// One source of per-response nonces.
pub trait NonceProvider: Send + Sync {
  /// Short label used in logs.
  fn name(&self) -> &str;

  fn nonce(&self) -> Option<String>;
}

/// A nonce already known when the render context is built, e.g. one a
/// CSP middleware attached to the request.
#[derive(Debug, Clone)]
pub struct StaticNonce {
  name: String,
  value: String,
}

impl StaticNonce {
  pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self { name: name.into(), value: value.into() }
  }
}

impl NonceProvider for StaticNonce {
  fn name(&self) -> &str {
    &self.name
  }

  fn nonce(&self) -> Option<String> {
    Some(self.value.clone())
  }
}

/// Wraps a fallible accessor. An `Err` is logged and treated as no nonce.
pub struct FallibleNonce<F> {
  name: String,
  accessor: F,
}

impl<F, E> FallibleNonce<F>
where
  F: Fn() -> Result<Option<String>, E> + Send + Sync,
  E: fmt::Display,
{
  pub fn new(name: impl Into<String>, accessor: F) -> Self {
    Self { name: name.into(), accessor }
  }
}

impl<F, E> NonceProvider for FallibleNonce<F>
where
  F: Fn() -> Result<Option<String>, E> + Send + Sync,
  E: fmt::Display,
{
  fn name(&self) -> &str {
    &self.name
  }

  fn nonce(&self) -> Option<String> {
    match (self.accessor)() {
      Ok(value) => value,
      Err(e) => {
        tracing::warn!(provider = %self.name, error = %e, "nonce accessor failed");
        None
      }
    }
  }
}

/// Ordered list of providers consulted for `NonceRequest::Auto`.
#[derive(Default)]
pub struct NonceChain {
  providers: Vec<Box<dyn NonceProvider>>,
}

impl NonceChain {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, provider: impl NonceProvider + 'static) {
    self.providers.push(Box::new(provider));
  }

  pub fn len(&self) -> usize {
    self.providers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.providers.is_empty()
  }

  pub fn resolve(&self, request: &NonceRequest) -> Option<String> {
    match request {
      NonceRequest::Off => None,
      NonceRequest::Literal(value) => Some(value.clone()),
      NonceRequest::Auto => self.first_available(),
    }
  }

  fn first_available(&self) -> Option<String> {
    for provider in &self.providers {
      match provider.nonce() {
        Some(value) if !value.is_empty() => return Some(value),
        _ => tracing::debug!(provider = provider.name(), "no nonce from provider"),
      }
    }
    None
  }
}

impl fmt::Debug for NonceChain {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.providers.iter().map(|p| p.name())).finish()
  }
}
