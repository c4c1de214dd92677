/* src/server/chart/rust/src/render.rs */

//! The render pipeline: merge, extract, sanitize, compose, place.

use serde_json::Value;

use crate::config::ChartDefaults;
use crate::context::RenderContext;
use crate::error::Result;
use crate::kind::ChartKind;
use crate::options::{Options, deep_merge, split_reserved};
use crate::placement::{Destination, RenderedOutput, place};
use crate::sanitize::{DEFAULT_TEMPLATE, PlaceholderVars, placeholder_markup};
use crate::script::{ChartScript, DataSource};

/// One chart to render.
pub struct ChartRequest<'a> {
  pub kind: ChartKind,
  pub data: DataSource<'a>,
  pub options: Options,
}

impl<'a> ChartRequest<'a> {
  pub fn new(kind: ChartKind, data: impl Into<DataSource<'a>>) -> Self {
    Self { kind, data: data.into(), options: Options::new() }
  }

  pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.options.insert(key.into(), value.into());
    self
  }

  pub fn options(mut self, options: Options) -> Self {
    self.options.extend(options);
    self
  }
}

/// Render one chart without touching any content buffer.
///
/// The returned output says where the script belongs; `RenderedOutput::emit`
/// (or [`render`]) carries that out.
pub fn render_chart(
  defaults: &ChartDefaults,
  ctx: &mut RenderContext,
  request: ChartRequest<'_>,
) -> Result<RenderedOutput> {
  defaults.validate()?;

  let merged = deep_merge(&defaults.options, &request.options);
  let (reserved, chart_options) = split_reserved(merged);

  let id = ctx.allocate_id(reserved.id);
  let vars = PlaceholderVars::sanitize(&id, reserved.height.as_deref(), reserved.width.as_deref())?;
  let template = reserved.html.as_deref().unwrap_or(DEFAULT_TEMPLATE);
  let markup = placeholder_markup(template, &vars)?;

  let nonce = ctx.resolve_nonce(&reserved.nonce);
  let script = ChartScript {
    library: &defaults.library,
    kind: request.kind,
    id: &id,
    data: &request.data,
    options: &chart_options,
    defer: reserved.defer,
    navigation: defaults.navigation.as_deref(),
    nonce: nonce.as_deref(),
  };
  let trigger = script.trigger();
  let script = script.compose()?;

  let buffer = reserved.content_for.resolve(defaults.content_for.clone());
  let output = place(markup, script, buffer);

  tracing::debug!(
    kind = %request.kind,
    id = %id,
    trigger = ?trigger,
    nonce = nonce.is_some(),
    destination = ?output.destination(),
    "rendered chart"
  );
  Ok(output)
}

/// Render one chart, sending a buffered script into the context's own
/// content buffers. Returns the text to insert at the call site.
pub fn render(
  defaults: &ChartDefaults,
  ctx: &mut RenderContext,
  request: ChartRequest<'_>,
) -> Result<String> {
  let output = render_chart(defaults, ctx, request)?;
  if let Destination::Buffer(name) = output.destination() {
    tracing::trace!(buffer = %name, "script buffered");
  }
  Ok(output.emit(ctx.content_mut()))
}

/// Template-facing helper bound to one request's context.
pub struct ChartRenderer<'a> {
  defaults: &'a ChartDefaults,
  ctx: &'a mut RenderContext,
}

macro_rules! chart_helpers {
  ($($name:ident => $kind:ident),* $(,)?) => {
    $(
      pub fn $name<'d>(&mut self, data: impl Into<DataSource<'d>>, options: Options) -> Result<String> {
        self.chart(ChartKind::$kind, data, options)
      }
    )*
  };
}

impl<'a> ChartRenderer<'a> {
  pub fn new(defaults: &'a ChartDefaults, ctx: &'a mut RenderContext) -> Self {
    Self { defaults, ctx }
  }

  pub fn chart<'d>(
    &mut self,
    kind: ChartKind,
    data: impl Into<DataSource<'d>>,
    options: Options,
  ) -> Result<String> {
    render(self.defaults, self.ctx, ChartRequest::new(kind, data).options(options))
  }

  chart_helpers! {
    line_chart => LineChart,
    pie_chart => PieChart,
    column_chart => ColumnChart,
    bar_chart => BarChart,
    area_chart => AreaChart,
    scatter_chart => ScatterChart,
    geo_chart => GeoChart,
    timeline => Timeline,
  }

  pub fn context(&self) -> &RenderContext {
    &*self.ctx
  }
}
