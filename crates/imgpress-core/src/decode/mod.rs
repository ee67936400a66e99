//! Decoder stage of the recompression pipeline.
//!
//! Turns an opaque source buffer into an RGBA [`Raster`] plus its intrinsic
//! dimensions. Decoding either yields a complete raster or an error; there
//! are no partial results.
//!
//! # Examples
//!
//! ```ignore
//! use imgpress_core::decode::decode_raster;
//!
//! let bytes = std::fs::read("photo.png").unwrap();
//! let raster = decode_raster(&bytes).unwrap();
//! println!("Decoded {}x{} image", raster.width, raster.height);
//! ```

mod reader;
mod types;

pub use reader::{decode_raster, extract_orientation};
pub use types::{DecodeError, FilterType, Orientation, Raster};
