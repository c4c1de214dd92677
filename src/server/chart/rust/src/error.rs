/* src/server/chart/rust/src/error.rs */

/// Everything that can abort a chart render.
///
/// Nonce lookups never show up here: a provider that fails is treated as
/// "no nonce" and the attribute is simply omitted.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
  /// A height or width outside `[a-zA-Z0-9%.]*`.
  #[error("invalid {name}: {value:?}")]
  InvalidDimension { name: &'static str, value: String },

  #[error("serialize chart payload: {0}")]
  Serialization(#[from] serde_json::Error),

  /// A `ChartJson` producer refused to produce its payload.
  #[error("chart data source: {0}")]
  DataSource(String),

  #[error("unknown chart kind: {0}")]
  UnknownChartKind(String),

  /// An `html` template referenced a placeholder other than id/height/width.
  #[error("html template: {0}")]
  Template(String),

  #[error("invalid config: {0}")]
  InvalidConfig(String),
}

impl ChartError {
  /// Stable machine-readable code, used by host adapters in error bodies.
  pub fn code(&self) -> &'static str {
    match self {
      Self::InvalidDimension { .. } => "INVALID_DIMENSION",
      Self::Serialization(_) => "SERIALIZATION_ERROR",
      Self::DataSource(_) => "DATA_SOURCE_ERROR",
      Self::UnknownChartKind(_) => "UNKNOWN_CHART_KIND",
      Self::Template(_) => "TEMPLATE_ERROR",
      Self::InvalidConfig(_) => "INVALID_CONFIG",
    }
  }

  /// True for errors caused by what the caller passed in, as opposed to
  /// configuration or encoder failures.
  pub fn is_caller_error(&self) -> bool {
    matches!(
      self,
      Self::InvalidDimension { .. } | Self::UnknownChartKind(_) | Self::Template(_)
    )
  }
}

pub type Result<T> = std::result::Result<T, ChartError>;
