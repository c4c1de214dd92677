/* src/server/chart/rust/src/script.rs */

//! The inline `<script>` that constructs the chart on the client.

use serde::Serialize;
use serde_json::Value;

use crate::error::{ChartError, Result};
use crate::kind::ChartKind;
use crate::options::Options;
use crate::sanitize::escape_html;

/// Escape JSON text for embedding in an inline script body.
///
/// `<`, `>` and `&` become `\u003c`, `\u003e`, `\u0026` so the text can never
/// close the `<script>` element; U+2028/U+2029 are escaped because older JS
/// engines treat them as line terminators inside string literals. The
/// result is still valid JSON that decodes to the same value.
pub fn json_escape(json: &str) -> String {
  let mut out = String::with_capacity(json.len());
  for ch in json.chars() {
    match ch {
      '&' => out.push_str("\\u0026"),
      '>' => out.push_str("\\u003e"),
      '<' => out.push_str("\\u003c"),
      '\u{2028}' => out.push_str("\\u2028"),
      '\u{2029}' => out.push_str("\\u2029"),
      c => out.push(c),
    }
  }
  out
}

/// Data that knows how to encode itself for the chart library, e.g. a
/// query result with a custom series layout.
pub trait ChartJson {
  fn chart_json(&self) -> Result<String>;
}

/// Chart data, either a plain JSON value or a self-encoding producer.
pub enum DataSource<'a> {
  Raw(Value),
  ChartJson(&'a dyn ChartJson),
}

impl<'a> DataSource<'a> {
  /// Convert any serializable value. Fails with `Serialization` when serde does.
  pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
    Ok(Self::Raw(serde_json::to_value(value)?))
  }

  pub fn producer(source: &'a dyn ChartJson) -> Self {
    Self::ChartJson(source)
  }

  /// Unescaped JSON text of the data.
  pub fn to_json(&self) -> Result<String> {
    match self {
      Self::Raw(value) => Ok(serde_json::to_string(value)?),
      Self::ChartJson(source) => source.chart_json(),
    }
  }
}

impl From<Value> for DataSource<'_> {
  fn from(value: Value) -> Self {
    Self::Raw(value)
  }
}

impl<'a, T: ChartJson> From<&'a T> for DataSource<'a> {
  fn from(source: &'a T) -> Self {
    Self::ChartJson(source)
  }
}

/// When the constructor call runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadTrigger {
  /// As soon as the script is parsed.
  Immediate,
  /// Inside a listener for this window event.
  Event(String),
}

impl LoadTrigger {
  /// A navigation-interception library (e.g. `turbolinks`) suppresses the
  /// native `load` on later visits, so its presence forces a listener on
  /// `<library>:load` even without `defer`.
  pub fn resolve(defer: bool, navigation: Option<&str>) -> Self {
    match navigation {
      Some(library) => Self::Event(format!("{library}:load")),
      None if defer => Self::Event("load".to_string()),
      None => Self::Immediate,
    }
  }
}

/// Everything needed to write one chart's script tag.
#[derive(Clone, Copy)]
pub struct ChartScript<'a> {
  /// Global JS object holding the chart constructors.
  pub library: &'a str,
  pub kind: ChartKind,
  /// Raw element id (escaping happens here).
  pub id: &'a str,
  pub data: &'a DataSource<'a>,
  pub options: &'a Options,
  pub defer: bool,
  pub navigation: Option<&'a str>,
  pub nonce: Option<&'a str>,
}

impl ChartScript<'_> {
  /// `new Library[type](id, data, options);` with each argument encoded and
  /// escaped on its own.
  pub fn constructor_call(&self) -> Result<String> {
    let kind = json_escape(&serde_json::to_string(self.kind.as_str())?);
    let id = json_escape(&serde_json::to_string(self.id)?);
    let data = json_escape(&self.data.to_json().map_err(into_data_error)?);
    let options = json_escape(&serde_json::to_string(self.options)?);
    Ok(format!("new {}[{kind}]({id}, {data}, {options});", self.library))
  }

  pub fn trigger(&self) -> LoadTrigger {
    LoadTrigger::resolve(self.defer, self.navigation)
  }

  pub fn compose(&self) -> Result<String> {
    let create = self.constructor_call()?;
    let nonce_attr = match self.nonce {
      Some(nonce) => format!(" nonce=\"{}\"", escape_html(nonce)),
      None => String::new(),
    };

    let script = match self.trigger() {
      LoadTrigger::Immediate => {
        format!("<script type=\"text/javascript\"{nonce_attr}>\n  {create}\n</script>\n")
      }
      LoadTrigger::Event(event) => {
        let event = json_escape(&serde_json::to_string(&event)?);
        format!(
          "<script type=\"text/javascript\"{nonce_attr}>
  (function() {{
    var createChart = function() {{ {create} }};
    if (window.addEventListener) {{
      window.addEventListener({event}, createChart, true);
    }} else if (window.attachEvent) {{
      window.attachEvent(\"onload\", createChart);
    }} else {{
      createChart();
    }}
  }})();
</script>
"
        )
      }
    };
    Ok(script)
  }
}

// Producer failures that are plain serde errors keep their variant.
fn into_data_error(err: ChartError) -> ChartError {
  match err {
    ChartError::Serialization(_) | ChartError::DataSource(_) => err,
    other => ChartError::DataSource(other.to_string()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn script<'a>(data: &'a DataSource<'a>, options: &'a Options) -> ChartScript<'a> {
    ChartScript {
      library: "Chartkick",
      kind: ChartKind::LineChart,
      id: "chart-1",
      data,
      options,
      defer: false,
      navigation: None,
      nonce: None,
    }
  }

  struct Precomputed(&'static str);

  impl ChartJson for Precomputed {
    fn chart_json(&self) -> Result<String> {
      Ok(self.0.to_string())
    }
  }

  struct Broken;

  impl ChartJson for Broken {
    fn chart_json(&self) -> Result<String> {
      Err(ChartError::DataSource("query timed out".into()))
    }
  }

  // -- json_escape --

  #[test]
  fn json_escape_script_breakers() {
    let escaped = json_escape(r#"{"a":"</script><b>&amp;"}"#);
    assert_eq!(escaped, r#"{"a":"\u003c/script\u003e\u003cb\u003e\u0026amp;"}"#);
  }

  #[test]
  fn json_escape_line_separators() {
    let escaped = json_escape("\"a\u{2028}b\u{2029}c\"");
    assert_eq!(escaped, r#""a\u2028b\u2029c""#);
  }

  #[test]
  fn json_escape_round_trips() {
    let value = json!({"title": "</script>&<!-- \u{2028}\u{2029}", "n": [1, 2.5, null]});
    let escaped = json_escape(&serde_json::to_string(&value).unwrap());
    for banned in ['<', '>', '&', '\u{2028}', '\u{2029}'] {
      assert!(!escaped.contains(banned), "{banned:?} survived");
    }
    let decoded: Value = serde_json::from_str(&escaped).unwrap();
    assert_eq!(decoded, value);
  }

  #[test]
  fn json_escape_passthrough() {
    assert_eq!(json_escape(r#"[[1,2],["a","b"]]"#), r#"[[1,2],["a","b"]]"#);
  }

  // -- DataSource --

  #[test]
  fn data_source_raw() {
    let data = DataSource::from(json!({"2024-01-01": 3}));
    assert_eq!(data.to_json().unwrap(), r#"{"2024-01-01":3}"#);
  }

  #[test]
  fn data_source_serialize_struct() {
    #[derive(Serialize)]
    struct Point {
      x: u32,
      y: u32,
    }
    let data = DataSource::serialize(&[Point { x: 1, y: 2 }]).unwrap();
    assert_eq!(data.to_json().unwrap(), r#"[{"x":1,"y":2}]"#);
  }

  #[test]
  fn data_source_serialize_rejects_non_string_keys() {
    let mut map = std::collections::HashMap::new();
    map.insert((1, 2), 3);
    let err = DataSource::serialize(&map).err().unwrap();
    assert!(matches!(err, ChartError::Serialization(_)));
  }

  #[test]
  fn data_source_producer_is_used() {
    let producer = Precomputed(r#"[{"name":"a","data":[]}]"#);
    let data = DataSource::from(&producer);
    assert_eq!(data.to_json().unwrap(), r#"[{"name":"a","data":[]}]"#);
  }

  // -- LoadTrigger --

  #[test]
  fn trigger_rules() {
    assert_eq!(LoadTrigger::resolve(false, None), LoadTrigger::Immediate);
    assert_eq!(LoadTrigger::resolve(true, None), LoadTrigger::Event("load".into()));
    assert_eq!(
      LoadTrigger::resolve(false, Some("turbolinks")),
      LoadTrigger::Event("turbolinks:load".into())
    );
    assert_eq!(LoadTrigger::resolve(true, Some("turbo")), LoadTrigger::Event("turbo:load".into()));
  }

  // -- compose --

  #[test]
  fn compose_immediate() {
    let data = DataSource::from(json!([[1, 2]]));
    let options = Options::new();
    let out = script(&data, &options).compose().unwrap();
    assert_eq!(
      out,
      "<script type=\"text/javascript\">\n  new Chartkick[\"LineChart\"](\"chart-1\", [[1,2]], {});\n</script>\n"
    );
  }

  #[test]
  fn compose_deferred() {
    let data = DataSource::from(json!([]));
    let options = Options::new();
    let out = ChartScript { defer: true, ..script(&data, &options) }.compose().unwrap();
    assert!(out.starts_with("<script type=\"text/javascript\">\n  (function() {\n"));
    assert!(out.contains(
      "var createChart = function() { new Chartkick[\"LineChart\"](\"chart-1\", [], {}); };"
    ));
    assert!(out.contains("window.addEventListener(\"load\", createChart, true);"));
    assert!(out.contains("window.attachEvent(\"onload\", createChart);"));
    assert!(out.ends_with("  })();\n</script>\n"));
  }

  #[test]
  fn compose_navigation_event() {
    let data = DataSource::from(json!([]));
    let options = Options::new();
    let out = ChartScript { navigation: Some("turbolinks"), ..script(&data, &options) }
      .compose()
      .unwrap();
    assert!(out.contains("window.addEventListener(\"turbolinks:load\", createChart, true);"));
  }

  #[test]
  fn compose_nonce_escaped() {
    let data = DataSource::from(json!([]));
    let options = Options::new();
    let out = ChartScript { nonce: Some("a\"b"), ..script(&data, &options) }.compose().unwrap();
    assert!(out.starts_with("<script type=\"text/javascript\" nonce=\"a&quot;b\">"));
  }

  #[test]
  fn compose_escapes_each_argument() {
    let data = DataSource::from(json!({"</script>": 1}));
    let mut options = Options::new();
    options.insert("title".into(), json!("a & b"));
    let out = ChartScript { id: "x<y", ..script(&data, &options) }.compose().unwrap();
    assert!(out.contains(r#"("x\u003cy", {"\u003c/script\u003e":1}, {"title":"a \u0026 b"})"#));
    assert_eq!(out.matches("</script>").count(), 1);
  }

  #[test]
  fn compose_producer_failure() {
    let broken = Broken;
    let data = DataSource::from(&broken);
    let options = Options::new();
    let err = script(&data, &options).compose().unwrap_err();
    assert!(matches!(err, ChartError::DataSource(ref m) if m == "query timed out"));
  }
}
