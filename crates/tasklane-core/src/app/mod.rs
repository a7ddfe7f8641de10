//! App - アプリケーション層
//!
//! Wires handlers and observers into a frozen registry and hands back the
//! `Router` the receiver uses.

pub mod builder;

pub use self::builder::{AppBuilder, BuildError};
