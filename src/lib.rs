//! Converts animated icons into RGB565 arrays inside a C header.
pub mod config;
pub mod modules;
pub mod utils;
