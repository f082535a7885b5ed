//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT, PollOptions, ReportRequest,
};
pub use response::{AccountStanding, PhraseShows, ReportInfo, ReportStatus, WordstatItem};
pub use validation::ValidationError;
pub use value::{Credentials, GeoId, Login, Phrase, ReportId, Token};
