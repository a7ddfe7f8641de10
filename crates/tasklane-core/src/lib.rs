//! tasklane-core
//!
//! Event ingestion, correlation and dispatch for an event-driven task runner.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, event_type, envelope, event_data, outcome, errors）
//! - **codec**: envelope の decode / encode
//! - **context**: correlation context（`shkeptncontext`）の抽出
//! - **session**: TaskSession - started / finished の発行
//! - **typed**: 型付き Task API（Task, Handler, DynHandler, Observer, HandlerRegistry）
//! - **router**: event type による dispatch
//! - **app**: AppBuilder
//! - **ports**: 抽象化レイヤー（EventSink, ResourceFetcher, Clock, IdGenerator）
//! - **impls**: ports の実装
//!
//! # フロー
//! ```text
//! bytes ─► codec::decode ─► CorrelationContext::extract ─► TaskSession::open
//!       ─► Router::route ─► Handler ─► TaskSession::emit_* ─► EventSink
//! ```

pub mod app;
pub mod codec;
pub mod context;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod router;
pub mod session;
pub mod typed;

pub use app::{AppBuilder, BuildError};
pub use context::CorrelationContext;
pub use domain::{Envelope, EventData, EventType, Outcome, Phase, TaskResult, TaskStatus};
pub use router::{IgnoreReason, RouteResult, Router};
pub use session::{Publisher, TaskSession};
