//! Configuration types
//!
//! Board-agnostic configuration structures and the TOML subset parser the
//! firmware uses for its embedded `seat.toml`. Tests build them directly.

pub mod hardware;
pub mod toml;
pub mod types;

pub use hardware::*;
pub use toml::{parse_config, ParseError};
pub use types::*;
