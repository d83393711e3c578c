//! Icon sequences as static RGB565 arrays in a C header.
//!
//! The header layout is:
//!
//! ```text
//! #include <cstdint>
//! typedef struct { ... } IconSequence;
//!
//! static const uint16_t PROGMEM icon_<sym>_bitmaps[] = { 0xHHHH, ... };
//! static const IconSequence PROGMEM icon_<sym> = { (uint16_t *) icon_<sym>_bitmaps, W, H, F };
//! ```
//!
//! with one array/descriptor pair per icon.
pub mod constants;
pub mod error;
mod parser;
mod types;
mod writer;

pub use error::IconSeqError;
pub use parser::{declares_icon_sequence, parse_header};
pub use types::*;
pub use writer::{format_bitmaps, HeaderArtifact, HeaderWriter};
