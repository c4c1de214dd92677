/* src/server/chart/rust/src/placement.rs */

use std::collections::BTreeMap;

/// Where a chart's script ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
  /// Right after the placeholder markup.
  Inline,
  /// In the named content buffer, for the host to place later.
  Buffer(String),
}

/// Final result of one render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
  markup: String,
  script: String,
  destination: Destination,
}

impl RenderedOutput {
  /// Placeholder element only, never the script.
  pub fn markup(&self) -> &str {
    &self.markup
  }

  pub fn script(&self) -> &str {
    &self.script
  }

  pub fn destination(&self) -> &Destination {
    &self.destination
  }

  /// Text to insert where the chart was requested: markup followed by the
  /// script when inline, markup alone when buffered.
  pub fn html(&self) -> String {
    match self.destination {
      Destination::Inline => format!("{}{}", self.markup, self.script),
      Destination::Buffer(_) => self.markup.clone(),
    }
  }

  /// Push a buffered script into `sink` and return the inline text.
  pub fn emit(self, sink: &mut dyn ContentSink) -> String {
    match self.destination {
      Destination::Inline => {
        let mut out = self.markup;
        out.push_str(&self.script);
        out
      }
      Destination::Buffer(name) => {
        sink.append(&name, &self.script);
        self.markup
      }
    }
  }
}

/// Decide between inline output and a named buffer.
pub fn place(markup: String, script: String, buffer: Option<String>) -> RenderedOutput {
  let destination = match buffer {
    Some(name) => Destination::Buffer(name),
    None => Destination::Inline,
  };
  RenderedOutput { markup, script, destination }
}

/// Host-side collector for buffered fragments.
pub trait ContentSink {
  fn append(&mut self, name: &str, fragment: &str);
}

/// Named buffers ordered by name, fragments kept in append order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentBuffers {
  buffers: BTreeMap<String, Vec<String>>,
}

impl ContentBuffers {
  pub fn new() -> Self {
    Self::default()
  }

  /// Concatenated contents of a buffer, if it received anything.
  pub fn get(&self, name: &str) -> Option<String> {
    self.buffers.get(name).map(|fragments| fragments.concat())
  }

  /// Drain a buffer. Returns an empty string when nothing was buffered.
  pub fn take(&mut self, name: &str) -> String {
    self.buffers.remove(name).map(|fragments| fragments.concat()).unwrap_or_default()
  }

  pub fn is_empty(&self) -> bool {
    self.buffers.is_empty()
  }

  /// Buffer names in sorted order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.buffers.keys().map(String::as_str)
  }
}

impl ContentSink for ContentBuffers {
  fn append(&mut self, name: &str, fragment: &str) {
    self.buffers.entry(name.to_string()).or_default().push(fragment.to_string());
  }
}

/// Insert `fragment` before the last `</body>`, or append it when the
/// document has no body end tag.
pub fn inject_before_body_end(html: &str, fragment: &str) -> String {
  if let Some(pos) = html.rfind("</body>") {
    let mut result = String::with_capacity(html.len() + fragment.len());
    result.push_str(&html[..pos]);
    result.push_str(fragment);
    result.push_str(&html[pos..]);
    result
  } else {
    format!("{html}{fragment}")
  }
}
