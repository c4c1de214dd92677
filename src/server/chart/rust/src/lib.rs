/* src/server/chart/rust/src/lib.rs */

pub mod config;
pub mod context;
pub mod error;
pub mod kind;
pub mod nonce;
pub mod options;
pub mod placement;
pub mod render;
pub mod sanitize;
pub mod script;

// Public API re-exports
pub use config::ChartDefaults;
pub use context::RenderContext;
pub use error::{ChartError, Result};
pub use kind::ChartKind;
pub use nonce::{FallibleNonce, NonceChain, NonceProvider, NonceRequest, StaticNonce};
pub use options::{
  Options, Override, RESERVED_KEYS, ReservedOptions, deep_merge, options_from, split_reserved,
};
pub use placement::{
  ContentBuffers, ContentSink, Destination, RenderedOutput, inject_before_body_end, place,
};
pub use render::{ChartRenderer, ChartRequest, render, render_chart};
pub use sanitize::{escape_html, sanitize_dimension, sanitize_id};
pub use script::{ChartJson, ChartScript, DataSource, LoadTrigger, json_escape};
