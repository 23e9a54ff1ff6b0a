//! G.729 frame adapter - turns buffers of G.729 frames into 8 kHz mono
//! 16-bit PCM.
//!
//! Each input buffer is split into 10 byte voice frames, an optional trailing
//! 2 byte SID frame, or a single erased frame when the buffer is empty. One
//! output buffer sized for all frames is requested from an
//! [`OutputAllocator`], then every frame is handed to a [`ChannelBackend`]
//! which fills one 160 sample block.

// Clippy configuration for code quality
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are too restrictive for this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)] // Explicit casts are clearer in audio code
#![allow(clippy::uninlined_format_args)] // Explicit format args are often clearer
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::should_implement_trait)] // CodecType::from_str returns Option, not Result
#![allow(clippy::trivially_copy_pass_by_ref)] // &self is idiomatic for methods

pub mod buffer;
pub mod codec;
pub mod config;

pub use buffer::{HeapAllocator, OutputAllocator};
pub use codec::{
    AudioDecoder, ChannelBackend, CodecError, CodecType, DecodeParams, DecodeStats, FrameKind,
    FrameLayout, G729Decoder, PcmFormat,
};
pub use config::{Config, ConfigError};
