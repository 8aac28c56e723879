//! Persistence Codec
//!
//! Converts the in-memory tierlist to and from the flat record stored by
//! every backend.

mod convert;
mod record;

pub use convert::{deserialize, serialize, RecordError};
pub use record::{TierRecord, TierlistRecord};
