//! Ports - 抽象化レイヤー
//!
//! 各 trait は外部システム（event broker, configuration service, 時刻, ID）への
//! インターフェースを提供し、実装の詳細を隠蔽します。

pub mod clock;
pub mod event_sink;
pub mod id_generator;
pub mod resource_fetcher;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::EventSink;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::resource_fetcher::{ResourceFetcher, ResourceScope};
