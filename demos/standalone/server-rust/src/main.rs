/* demos/standalone/server-rust/src/main.rs */

use std::path::PathBuf;

use axum::Router;
use axum::extract::{Extension, Request};
use axum::http::HeaderValue;
use axum::http::header::CONTENT_SECURITY_POLICY;
use axum::middleware::{self, Next};
use axum::response::{Html, Response};
use axum::routing::get;
use clap::Parser;
use inline_chart::{ChartDefaults, escape_html, options_from};
use inline_chart_axum::{ChartResponseError, ChartScope, ChartState, CspNonce};
use serde_json::json;
use tracing_subscriber::EnvFilter;

const CHART_JS: &str = "https://cdn.jsdelivr.net/npm/chart.js@4/dist/chart.umd.min.js";
const CHARTKICK_JS: &str = "https://cdn.jsdelivr.net/npm/chartkick@5/dist/chartkick.min.js";

#[derive(Parser)]
#[command(name = "inline-chart-demo", about = "Serve a dashboard of server-rendered charts")]
struct Cli {
  /// TOML file with chart defaults
  config: Option<PathBuf>,
  #[arg(long, env = "PORT", default_value_t = 3000)]
  port: u16,
}

fn load_defaults(path: Option<&PathBuf>) -> Result<ChartDefaults, Box<dyn std::error::Error>> {
  let Some(path) = path else {
    return Ok(ChartDefaults::new().with_content_for("charts"));
  };
  let source = std::fs::read_to_string(path)?;
  let defaults = ChartDefaults::from_toml_str(&source)?;
  tracing::info!(path = %path.display(), "loaded chart defaults");
  Ok(defaults)
}

/// Mint a per-response nonce and advertise it in the CSP header.
async fn csp_nonce(mut req: Request, next: Next) -> Response {
  let nonce = hex::encode(rand::random::<[u8; 16]>());
  req.extensions_mut().insert(CspNonce(nonce.clone()));
  let mut resp = next.run(req).await;
  let policy = format!("script-src 'nonce-{nonce}' https://cdn.jsdelivr.net; object-src 'none'");
  match HeaderValue::from_str(&policy) {
    Ok(value) => {
      resp.headers_mut().insert(CONTENT_SECURITY_POLICY, value);
    }
    Err(e) => tracing::warn!(error = %e, "invalid CSP header"),
  }
  resp
}

async fn dashboard(
  Extension(CspNonce(nonce)): Extension<CspNonce>,
  mut scope: ChartScope,
) -> Result<Html<String>, ChartResponseError> {
  let nonce = escape_html(&nonce);
  let mut body = format!(
    "<!DOCTYPE html>\n<html>\n<head>\n<title>Dashboard</title>\n\
     <script src=\"{CHART_JS}\" nonce=\"{nonce}\"></script>\n\
     <script src=\"{CHARTKICK_JS}\" nonce=\"{nonce}\"></script>\n\
     </head>\n<body>\n<h1>Dashboard</h1>\n"
  );

  let mut charts = scope.charts();
  body.push_str(&charts.line_chart(
    json!({"2024-01-01": 11, "2024-02-01": 6, "2024-03-01": 14, "2024-04-01": 9}),
    options_from(json!({"nonce": true, "title": "Signups"})),
  )?);
  body.push_str(&charts.pie_chart(
    json!([["Blueberry", 44], ["Strawberry", 23], ["<Other>", 8]]),
    options_from(json!({"nonce": true, "donut": true, "height": "240px"})),
  )?);
  body.push_str(&charts.column_chart(
    json!([{"name": "Won", "data": [["Q1", 4], ["Q2", 7]]}, {"name": "Lost", "data": [["Q1", 2], ["Q2", 1]]}]),
    options_from(json!({"nonce": true, "defer": true, "stacked": true, "width": "80%"})),
  )?);
  tracing::debug!(charts = charts.context().chart_count(), "dashboard rendered");

  body.push_str("</body>\n</html>\n");
  Ok(scope.finish(&body))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let cli = Cli::parse();
  let defaults = load_defaults(cli.config.as_ref())?;

  let app = Router::new()
    .route("/", get(dashboard))
    .layer(middleware::from_fn(csp_nonce))
    .with_state(ChartState::new(defaults));

  let addr = format!("0.0.0.0:{}", cli.port);
  let listener = tokio::net::TcpListener::bind(&addr).await?;
  tracing::info!(%addr, "demo listening");
  axum::serve(listener, app).await?;
  Ok(())
}
