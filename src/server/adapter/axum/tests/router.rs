/* src/server/adapter/axum/tests/router.rs */

use axum::Router;
use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{Html, Response};
use axum::routing::get;
use inline_chart_axum::inline_chart::{ChartDefaults, Options, options_from};
use inline_chart_axum::{ChartResponseError, ChartScope, ChartState, CspNonce};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn dashboard(mut scope: ChartScope) -> Result<Html<String>, ChartResponseError> {
  let mut body = String::from("<html><body>");
  {
    let mut charts = scope.charts();
    body.push_str(&charts.line_chart(json!([[1, 2]]), options_from(json!({"nonce": true})))?);
    body.push_str(&charts.pie_chart(json!([["a", 1]]), Options::new())?);
  }
  body.push_str("</body></html>");
  Ok(scope.finish(&body))
}

async fn broken(mut scope: ChartScope) -> Result<Html<String>, ChartResponseError> {
  let html = scope.charts().bar_chart(json!([]), options_from(json!({"height": "1px;x"})))?;
  Ok(Html(html))
}

async fn with_nonce(mut req: Request, next: Next) -> Response {
  req.extensions_mut().insert(CspNonce("n0nce".into()));
  next.run(req).await
}

fn app(defaults: ChartDefaults) -> Router {
  Router::new()
    .route("/", get(dashboard))
    .route("/broken", get(broken))
    .layer(middleware::from_fn(with_nonce))
    .with_state(ChartState::new(defaults))
}

async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
  let resp = app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn renders_inline_charts_with_request_nonce() {
  let (status, page) = get_body(app(ChartDefaults::new()), "/").await;
  assert_eq!(status, StatusCode::OK);
  assert!(page.contains(r#"<script type="text/javascript" nonce="n0nce">"#));
  assert!(page.contains(r#"new Chartkick["LineChart"]("chart-1""#));
  assert!(page.contains(r#"new Chartkick["PieChart"]("chart-2""#));
  // the pie chart did not ask for a nonce
  assert_eq!(page.matches("nonce=").count(), 1);
}

#[tokio::test]
async fn each_request_starts_a_fresh_counter() {
  let router = app(ChartDefaults::new());
  let (_, first) = get_body(router.clone(), "/").await;
  let (_, second) = get_body(router, "/").await;
  assert!(first.contains(r#"id="chart-1""#) && second.contains(r#"id="chart-1""#));
  assert!(!second.contains("chart-3"));
}

#[tokio::test]
async fn default_buffer_lands_before_body_end() {
  let (_, page) = get_body(app(ChartDefaults::new().with_content_for("charts")), "/").await;
  let last_div = page.rfind("Loading...</div>").unwrap();
  let first_script = page.find("<script").unwrap();
  assert!(last_div < first_script);
  assert!(page.ends_with("</script>\n</body></html>"));
}

#[tokio::test]
async fn invalid_dimension_is_bad_request() {
  let (status, body) = get_body(app(ChartDefaults::new()), "/broken").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let json: Value = serde_json::from_str(&body).unwrap();
  assert_eq!(json["ok"], json!(false));
  assert_eq!(json["error"]["code"], json!("INVALID_DIMENSION"));
}
