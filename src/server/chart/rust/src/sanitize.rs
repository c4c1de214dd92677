/* src/server/chart/rust/src/sanitize.rs */

// Attribute and CSS side of the output: the placeholder element.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ChartError, Result};

pub const DEFAULT_HEIGHT: &str = "300px";
pub const DEFAULT_WIDTH: &str = "100%";

/// Placeholder shown until the client library draws the chart.
pub const DEFAULT_TEMPLATE: &str = concat!(
  r#"<div id="%{id}" style="height: %{height}; width: %{width}; text-align: center; "#,
  r#"color: #999; line-height: %{height}; font-size: 14px; "#,
  r#"font-family: 'Lucida Grande', 'Lucida Sans Unicode', Verdana, Arial, Helvetica, sans-serif;">"#,
  "Loading...</div>",
);

fn dimension_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  // Dot needs no escaping inside the class. No calc(), no spaces: safety over expressiveness.
  RE.get_or_init(|| Regex::new(r"\A[a-zA-Z0-9%.]*\z").expect("dimension pattern"))
}

pub fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for ch in s.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#x27;"),
      c => out.push(c),
    }
  }
  out
}

/// Validate a height/width against `[a-zA-Z0-9%.]*`, then HTML-escape it.
/// The escape is a second line of defence; a valid value never changes.
pub fn sanitize_dimension(name: &'static str, value: &str) -> Result<String> {
  if !dimension_re().is_match(value) {
    return Err(ChartError::InvalidDimension { name, value: value.to_string() });
  }
  Ok(escape_html(value))
}

/// Element ids are not restricted, only escaped.
pub fn sanitize_id(id: &str) -> String {
  escape_html(id)
}

/// Already-escaped values for the placeholder template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderVars {
  pub id: String,
  pub height: String,
  pub width: String,
}

impl PlaceholderVars {
  /// Escape the id and validate both dimensions, falling back to the
  /// defaults for missing ones.
  pub fn sanitize(id: &str, height: Option<&str>, width: Option<&str>) -> Result<Self> {
    Ok(Self {
      id: sanitize_id(id),
      height: sanitize_dimension("height", height.unwrap_or(DEFAULT_HEIGHT))?,
      width: sanitize_dimension("width", width.unwrap_or(DEFAULT_WIDTH))?,
    })
  }

  fn get(&self, name: &str) -> Option<&str> {
    match name {
      "id" => Some(&self.id),
      "height" => Some(&self.height),
      "width" => Some(&self.width),
      _ => None,
    }
  }
}

/// Fill `%{id}`, `%{height}` and `%{width}` in `template`. `%%` yields a
/// literal percent sign; any other `%` is copied through. An unknown
/// `%{name}` is an error.
pub fn placeholder_markup(template: &str, vars: &PlaceholderVars) -> Result<String> {
  let mut out = String::with_capacity(template.len() + 64);
  let mut rest = template;

  while let Some(pos) = rest.find('%') {
    out.push_str(&rest[..pos]);
    let tail = &rest[pos + 1..];
    if let Some(after) = tail.strip_prefix('%') {
      out.push('%');
      rest = after;
    } else if let Some(body) = tail.strip_prefix('{') {
      let Some(end) = body.find('}') else {
        return Err(ChartError::Template(format!("unterminated placeholder in {template:?}")));
      };
      let name = &body[..end];
      let value = vars
        .get(name)
        .ok_or_else(|| ChartError::Template(format!("unknown placeholder %{{{name}}}")))?;
      out.push_str(value);
      rest = &body[end + 1..];
    } else {
      out.push('%');
      rest = tail;
    }
  }
  out.push_str(rest);
  Ok(out)
}
