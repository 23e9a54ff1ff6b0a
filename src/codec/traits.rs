//! Codec traits, error types and the decode-parameter vocabulary shared by
//! the segmenter and the dispatcher.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Unsupported payload type: {0}")]
    UnsupportedPayloadType(u8),

    #[error("Invalid G.729 buffer size: {size} bytes (remainder {remainder}, expected 0 or 2)")]
    InvalidBufferSize { size: usize, remainder: usize },

    #[error("G.729 buffer of {size} bytes holds {frames} frames, too many to fit in one output buffer")]
    OutputTooLarge { size: usize, frames: usize },

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Initialization error: {0}")]
    InitError(String),

    #[error("Decoder channel is closed")]
    ChannelClosed,

    #[error("Invalid output buffer size: expected {expected}, got {got}")]
    InvalidOutputSize { expected: usize, got: usize },
}

/// Supported codec types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecType {
    G729,
}

impl CodecType {
    /// Get the RTP payload type for this codec
    #[must_use]
    pub const fn payload_type(&self) -> u8 {
        match self {
            CodecType::G729 => 18,
        }
    }

    /// Get the native sample rate for this codec
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        match self {
            CodecType::G729 => 8000,
        }
    }

    /// Get the number of channels
    #[must_use]
    pub const fn channels(&self) -> u8 {
        match self {
            CodecType::G729 => 1,
        }
    }

    /// Get a human-readable name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            CodecType::G729 => "G.729",
        }
    }

    /// Parse from string (case-insensitive)
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("g729") || s.eq_ignore_ascii_case("g729a") || s.eq_ignore_ascii_case("g.729") {
            Some(CodecType::G729)
        } else {
            None
        }
    }

    /// Detect codec from RTP payload type
    #[must_use]
    pub const fn from_payload_type(pt: u8) -> Option<Self> {
        match pt {
            18 => Some(CodecType::G729),
            _ => None,
        }
    }
}

impl std::fmt::Display for CodecType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Flags handed to the decode primitive for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodeParams {
    /// Frame is missing; run loss concealment.
    pub erasure: bool,
    /// Frame is a silence insertion descriptor.
    pub sid: bool,
    /// Generate RFC 3389 style comfort noise.
    pub comfort_noise: bool,
}

/// Trait for audio decoders
pub trait AudioDecoder {
    /// Decode compressed audio to PCM samples (i16)
    fn decode(&mut self, input: &[u8]) -> Result<Vec<i16>, CodecError>;

    /// Get the native sample rate of decoded audio
    fn sample_rate(&self) -> u32;

    /// Get the number of channels
    fn channels(&self) -> u8;

    /// Get the codec type
    fn codec_type(&self) -> CodecType;
}

/// The G.729 synthesis engine, driven one frame at a time.
///
/// Implementations own the algorithm (bit unpacking, LPC synthesis, pitch and
/// gain reconstruction). The adapter only opens a channel, threads it through
/// successive `decode` calls and closes it at session end.
pub trait ChannelBackend {
    /// Per-session decoder history (predictors, past excitation).
    type Channel;

    /// Create the state for a new decoding session.
    fn open_channel(&mut self) -> Result<Self::Channel, CodecError>;

    /// Release a channel. It is never used again afterwards.
    fn close_channel(&mut self, channel: Self::Channel);

    /// Decode one frame into exactly one PCM block.
    ///
    /// `frame` is 10, 2 or 0 bytes long; `pcm` always holds
    /// [`PCM_BLOCK_SAMPLES`](super::frame::PCM_BLOCK_SAMPLES) samples.
    fn decode(
        &mut self,
        channel: &mut Self::Channel,
        frame: &[u8],
        params: DecodeParams,
        pcm: &mut [i16],
    ) -> Result<(), CodecError>;
}
