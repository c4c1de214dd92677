/* src/server/chart/rust/src/options.rs */

//! Option merging and extraction of the keys the renderer consumes itself.

use serde_json::{Map, Value};

use crate::nonce::NonceRequest;

/// Chart options as passed to the client library. Key order is preserved.
pub type Options = Map<String, Value>;

/// Keys read by the renderer. They are removed before the rest of the
/// options is serialized for the client library.
pub const RESERVED_KEYS: [&str; 7] = ["id", "height", "width", "defer", "content_for", "nonce", "html"];

/// Build an `Options` map from a JSON value. Anything but an object yields
/// an empty map.
pub fn options_from(value: Value) -> Options {
  match value {
    Value::Object(map) => map,
    _ => Options::new(),
  }
}

/// Recursively merge `overrides` over `defaults`.
///
/// Objects present on both sides merge key by key; any other override
/// value, explicit `null` included, replaces the default wholesale.
pub fn deep_merge(defaults: &Options, overrides: &Options) -> Options {
  let mut merged = defaults.clone();
  for (key, value) in overrides {
    let next = match (merged.get(key), value) {
      (Some(Value::Object(base)), Value::Object(over)) => Value::Object(deep_merge(base, over)),
      _ => value.clone(),
    };
    merged.insert(key.clone(), next);
  }
  merged
}

/// A setting that distinguishes "not given" from "given, possibly null".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Override<T> {
  #[default]
  Absent,
  Present(T),
}

impl<T> Override<T> {
  /// The given value, or `fallback` when absent.
  pub fn resolve(self, fallback: T) -> T {
    match self {
      Self::Absent => fallback,
      Self::Present(value) => value,
    }
  }
}

/// The renderer's own settings, pulled out of the merged options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedOptions {
  pub id: Option<String>,
  pub height: Option<String>,
  pub width: Option<String>,
  pub defer: bool,
  /// `Present(None)` suppresses buffering even when a default buffer exists.
  pub content_for: Override<Option<String>>,
  pub nonce: NonceRequest,
  pub html: Option<String>,
}

/// Split merged options into reserved settings and the payload forwarded
/// to the client library.
pub fn split_reserved(options: Options) -> (ReservedOptions, Options) {
  let mut reserved = ReservedOptions::default();
  let mut chart_options = Options::new();

  for (key, value) in options {
    match key.as_str() {
      "id" => reserved.id = text(&value),
      "height" => reserved.height = text(&value),
      "width" => reserved.width = text(&value),
      "defer" => reserved.defer = is_set(&value),
      "content_for" => reserved.content_for = Override::Present(text(&value)),
      "nonce" => reserved.nonce = NonceRequest::from_value(&value),
      "html" => reserved.html = text(&value),
      _ => {
        chart_options.insert(key, value);
      }
    }
  }

  (reserved, chart_options)
}

/// Only `null` and `false` count as unset; `0` and `""` are set.
pub(crate) fn is_set(value: &Value) -> bool {
  !matches!(value, Value::Null | Value::Bool(false))
}

/// String form of a set value. Strings are taken as-is, other scalars use
/// their JSON text.
pub(crate) fn text(value: &Value) -> Option<String> {
  match value {
    Value::Null | Value::Bool(false) => None,
    Value::String(s) => Some(s.clone()),
    other => Some(other.to_string()),
  }
}
