//! Task trait - 型付き Task の定義
//!
//! A `Task` is the payload structure of one task's `triggered` event, tied to
//! the task name it is routed by.

use serde::de::DeserializeOwned;

/// Task は task 名と payload 型を対応付ける
///
/// # 使用例
/// ```ignore
/// #[derive(Deserialize)]
/// struct MonacoTask {
///     #[serde(flatten)]
///     event: EventData,
/// }
///
/// impl Task for MonacoTask {
///     const NAME: &'static str = "monaco";
/// }
/// ```
///
/// # Trait Bounds
/// - `DeserializeOwned`: envelope の data から復元するため
/// - `Send + Sync + 'static`: handler future を跨いで保持するため
pub trait Task: DeserializeOwned + Send + Sync + 'static {
    /// `<namespace>.event.<NAME>.triggered` を受け取る
    const NAME: &'static str;
}
