/* src/server/chart/rust/src/kind.rs */

use std::fmt;
use std::str::FromStr;

use crate::error::ChartError;

/// Constructor the client library is asked to instantiate.
/// The name is forwarded untouched; no kind carries extra semantics here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
  LineChart,
  PieChart,
  ColumnChart,
  BarChart,
  AreaChart,
  ScatterChart,
  GeoChart,
  Timeline,
}

impl ChartKind {
  pub const ALL: [ChartKind; 8] = [
    Self::LineChart,
    Self::PieChart,
    Self::ColumnChart,
    Self::BarChart,
    Self::AreaChart,
    Self::ScatterChart,
    Self::GeoChart,
    Self::Timeline,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::LineChart => "LineChart",
      Self::PieChart => "PieChart",
      Self::ColumnChart => "ColumnChart",
      Self::BarChart => "BarChart",
      Self::AreaChart => "AreaChart",
      Self::ScatterChart => "ScatterChart",
      Self::GeoChart => "GeoChart",
      Self::Timeline => "Timeline",
    }
  }
}

impl fmt::Display for ChartKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ChartKind {
  type Err = ChartError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|kind| kind.as_str() == s)
      .ok_or_else(|| ChartError::UnknownChartKind(s.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_every_kind() {
    for kind in ChartKind::ALL {
      assert_eq!(kind.as_str().parse::<ChartKind>().unwrap(), kind);
    }
  }

  #[test]
  fn parse_unknown() {
    let err = "RadarChart".parse::<ChartKind>().unwrap_err();
    assert!(matches!(err, ChartError::UnknownChartKind(ref s) if s == "RadarChart"));
  }

  #[test]
  fn parse_is_case_sensitive() {
    assert!("linechart".parse::<ChartKind>().is_err());
  }

  #[test]
  fn display_matches_literal() {
    assert_eq!(ChartKind::Timeline.to_string(), "Timeline");
    assert_eq!(ChartKind::GeoChart.to_string(), "GeoChart");
  }
}
