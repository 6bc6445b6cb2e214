pub mod access;
pub mod api;
pub mod error;
pub mod format;
pub mod magic;
pub mod snapshot;
pub mod utils;
pub mod value;
mod serialization;

pub use access::{Access, Operation};
pub use error::{Format, MagicError, ParseError};
pub use format::ini::{IniMode, IniOptions};
pub use format::json::JsonOptions;
pub use magic::Magic;
pub use serialization::sort_recursive;
pub use snapshot::SNAPSHOT_MARKER;
pub use value::{Lazy, Value};
