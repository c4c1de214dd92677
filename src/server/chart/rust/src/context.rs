/* src/server/chart/rust/src/context.rs */

use crate::nonce::{NonceChain, NonceProvider, NonceRequest};
use crate::placement::{ContentBuffers, inject_before_body_end};

/// Per-request render state: the element id counter, the nonce providers
/// for this response, and the content buffers.
///
/// Create one per page render. Sharing a context between requests leaks
/// ids and buffered scripts across pages.
#[derive(Debug, Default)]
pub struct RenderContext {
  chart_count: u32,
  nonces: NonceChain,
  content: ContentBuffers,
}

impl RenderContext {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a nonce provider. Providers are consulted in insertion order.
  pub fn with_nonce_provider(mut self, provider: impl NonceProvider + 'static) -> Self {
    self.nonces.push(provider);
    self
  }

  /// A non-empty explicit id is returned as-is; otherwise the next
  /// `chart-N` in this context.
  pub fn allocate_id(&mut self, explicit: Option<String>) -> String {
    match explicit {
      Some(id) if !id.is_empty() => id,
      _ => {
        self.chart_count += 1;
        format!("chart-{}", self.chart_count)
      }
    }
  }

  /// Number of ids allocated so far.
  pub fn chart_count(&self) -> u32 {
    self.chart_count
  }

  pub fn resolve_nonce(&self, request: &NonceRequest) -> Option<String> {
    self.nonces.resolve(request)
  }

  pub fn content(&self) -> &ContentBuffers {
    &self.content
  }

  pub fn content_mut(&mut self) -> &mut ContentBuffers {
    &mut self.content
  }

  /// Drain `buffer` into `html` right before `</body>`.
  pub fn finish(&mut self, html: &str, buffer: &str) -> String {
    let fragment = self.content.take(buffer);
    if fragment.is_empty() {
      return html.to_string();
    }
    inject_before_body_end(html, &fragment)
  }
}
