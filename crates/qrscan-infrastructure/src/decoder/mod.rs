//! Decode providers for desktop hosts.

mod zbar;

pub use zbar::{ZbarDecoder, parse_zbar_output};
