//! Typed - 型付き Task API
//!
//! # 二層構造
//! - **表層（Typed）**: `Task` trait, `Handler<T>` trait - 型安全
//! - **内部（Dyn）**: `DynHandler` trait - object-safe, type erasure
//!
//! Passive `Observer`s sit next to handlers in the same registry.

pub mod handler;
pub mod observer;
pub mod registry;
pub mod task;

pub use self::handler::{DynHandler, Handler, TypedHandler};
pub use self::observer::{LoggingObserver, Observer};
pub use self::registry::{Binding, HandlerRegistry, RegistryError, Route};
pub use self::task::Task;
