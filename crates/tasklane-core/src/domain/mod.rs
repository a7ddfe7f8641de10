//! Domain model (ids, event types, envelopes, payload data, outcomes, errors).

pub mod envelope;
pub mod errors;
pub mod event_data;
pub mod event_type;
pub mod ids;
pub mod outcome;

pub use self::envelope::Envelope;
pub use self::errors::{
    DecodeError, DispatchError, FetchError, HandlerError, PayloadMismatch, SessionError,
    TransportError,
};
pub use self::event_data::EventData;
pub use self::event_type::{EventType, EventTypeError, Phase};
pub use self::ids::{CorrelationId, EventId};
pub use self::outcome::{Outcome, TaskResult, TaskStatus};
