pub mod error;
pub mod event;
pub mod field;
pub mod level;
pub mod occurrence;
pub mod value;
pub mod version;
mod util;

pub use error::{Error, Result};
pub use event::*;
pub use field::*;
pub use level::Level;
pub use occurrence::LogOccurrence;
pub use value::*;
pub use version::*;
pub use util::*;
