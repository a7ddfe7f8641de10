//! IdGenerator port - ID 生成の抽象化
//!
//! Every outgoing envelope needs a fresh producer-assigned id.
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（本番用）

use crate::domain::EventId;
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は envelope の ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（全 session で共有される）
pub trait IdGenerator: Send + Sync {
    fn next_event_id(&self) -> EventId;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock を使って現在時刻ベースの ULID を生成します。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn next_event_id(&self) -> EventId {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        EventId::new(ulid.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};

    #[test]
    fn ulid_generator_generates_unique_ids() {
        let id_gen = UlidGenerator::new(SystemClock);

        let id1 = id_gen.next_event_id();
        let id2 = id_gen.next_event_id();

        assert_ne!(id1, id2);
        assert_eq!(id1.as_str().len(), 26);
    }

    #[test]
    fn ulid_generator_uses_clock_for_timestamp() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = UlidGenerator::new(FixedClock::new(fixed_time));

        let id1 = id_gen.next_event_id();
        let id2 = id_gen.next_event_id();

        // FixedClock を使っても、ランダム部分があるので ID は異なる
        assert_ne!(id1, id2);

        let ulid1 = Ulid::from_string(id1.as_str()).unwrap();
        let ulid2 = Ulid::from_string(id2.as_str()).unwrap();
        assert_eq!(ulid1.timestamp_ms(), fixed_time.timestamp_millis() as u64);
        assert_eq!(ulid1.timestamp_ms(), ulid2.timestamp_ms());
    }
}
