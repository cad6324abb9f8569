//! Block records: blocked keywords, blocked users and channel-block status.
//!
//! One row per `(platform, scope)`. The global scope and a channel scope of
//! the same platform are independent rows; readers union them.

pub mod models;
pub mod queries;

pub use models::{BlockFields, BlockRecord, Scope};
pub use queries::BlockRepository;
