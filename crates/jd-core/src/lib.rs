pub mod error;
pub mod types;

pub use error::JabdoriError;
pub use types::*;
