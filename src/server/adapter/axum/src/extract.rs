/* src/server/adapter/axum/src/extract.rs */

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::Html;
use inline_chart::{ChartDefaults, ChartRenderer, RenderContext, StaticNonce};

/// Router state holding the process-wide chart defaults.
#[derive(Debug, Clone)]
pub struct ChartState {
  defaults: Arc<ChartDefaults>,
}

impl ChartState {
  pub fn new(defaults: ChartDefaults) -> Self {
    Self { defaults: Arc::new(defaults) }
  }
}

/// Per-response nonce set by the CSP middleware. First in the nonce chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CspNonce(pub String);

/// Script nonce set by a secure-headers style middleware. Consulted when
/// no `CspNonce` is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecureHeadersNonce(pub String);

/// One request's chart rendering scope: fresh id counter and content
/// buffers, nonce providers taken from the request extensions.
pub struct ChartScope {
  defaults: Arc<ChartDefaults>,
  ctx: RenderContext,
}

impl<S> FromRequestParts<S> for ChartScope
where
  ChartState: FromRef<S>,
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let state = ChartState::from_ref(state);
    Ok(Self::from_parts(state.defaults, parts))
  }
}

impl ChartScope {
  /// Scope without request nonces, e.g. for rendering outside a handler.
  pub fn new(defaults: Arc<ChartDefaults>) -> Self {
    Self { defaults, ctx: RenderContext::new() }
  }

  fn from_parts(defaults: Arc<ChartDefaults>, parts: &Parts) -> Self {
    let mut ctx = RenderContext::new();
    if let Some(CspNonce(nonce)) = parts.extensions.get::<CspNonce>() {
      ctx = ctx.with_nonce_provider(StaticNonce::new("csp", nonce.clone()));
    }
    if let Some(SecureHeadersNonce(nonce)) = parts.extensions.get::<SecureHeadersNonce>() {
      ctx = ctx.with_nonce_provider(StaticNonce::new("secure_headers", nonce.clone()));
    }
    Self { defaults, ctx }
  }

  pub fn charts(&mut self) -> ChartRenderer<'_> {
    ChartRenderer::new(&self.defaults, &mut self.ctx)
  }

  pub fn context(&self) -> &RenderContext {
    &self.ctx
  }

  /// Place the default buffer's scripts before `</body>`. Without a
  /// configured default the page is returned unchanged; use
  /// [`ChartScope::finish_with`] for charts that name their own buffer.
  pub fn finish(self, html: &str) -> Html<String> {
    match self.defaults.content_for.clone() {
      Some(name) => self.finish_with(html, &name),
      None => {
        self.warn_leftover();
        Html(html.to_string())
      }
    }
  }

  /// Place the named buffer's scripts before `</body>`. Scripts left in
  /// other buffers are dropped with a warning.
  pub fn finish_with(mut self, html: &str, buffer: &str) -> Html<String> {
    let page = self.ctx.finish(html, buffer);
    self.warn_leftover();
    Html(page)
  }

  fn warn_leftover(&self) {
    if !self.ctx.content().is_empty() {
      let leftover: Vec<&str> = self.ctx.content().names().collect();
      tracing::warn!(buffers = ?leftover, "chart scripts left in unplaced content buffers");
    }
  }
}
