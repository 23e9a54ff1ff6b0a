//! G.729 frame segmentation.
//!
//! An input buffer holds any number of 10 byte voice frames, optionally
//! followed by a single 2 byte SID frame. An empty buffer stands for one
//! erased frame. Every frame, whatever its encoded size, decodes to one
//! fixed-size PCM block.

use super::traits::{CodecError, DecodeParams};

/// Encoded size of a voice frame
pub const VOICE_FRAME_BYTES: usize = 10;

/// Encoded size of a silence insertion descriptor frame
pub const SID_FRAME_BYTES: usize = 2;

/// Encoded size of an erased (absent) frame
pub const ERASURE_FRAME_BYTES: usize = 0;

/// Samples produced per decoded frame
pub const PCM_BLOCK_SAMPLES: usize = 160;

/// Bytes produced per decoded frame (16-bit samples)
pub const PCM_BLOCK_BYTES: usize = PCM_BLOCK_SAMPLES * 2;

/// Classification of a frame by its encoded length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Voice,
    Sid,
    Erasure,
}

impl FrameKind {
    /// Classify an encoded frame length. Only 10, 2 and 0 are frames.
    #[must_use]
    pub const fn from_len(len: usize) -> Option<Self> {
        match len {
            VOICE_FRAME_BYTES => Some(FrameKind::Voice),
            SID_FRAME_BYTES => Some(FrameKind::Sid),
            ERASURE_FRAME_BYTES => Some(FrameKind::Erasure),
            _ => None,
        }
    }

    /// Encoded length of this kind of frame
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        match self {
            FrameKind::Voice => VOICE_FRAME_BYTES,
            FrameKind::Sid => SID_FRAME_BYTES,
            FrameKind::Erasure => ERASURE_FRAME_BYTES,
        }
    }

    /// Flags the decode primitive expects for this kind of frame
    #[must_use]
    pub const fn decode_params(&self) -> DecodeParams {
        match self {
            FrameKind::Voice => DecodeParams {
                erasure: false,
                sid: false,
                comfort_noise: false,
            },
            FrameKind::Sid => DecodeParams {
                erasure: false,
                sid: true,
                comfort_noise: false,
            },
            FrameKind::Erasure => DecodeParams {
                erasure: true,
                sid: false,
                comfort_noise: true,
            },
        }
    }
}

/// One frame within an input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Byte offset of the frame in the input
    pub offset: usize,
    pub kind: FrameKind,
    /// Encoded payload, `kind.encoded_len()` bytes long
    pub data: &'a [u8],
}

/// Validated size arithmetic for one input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    input_len: usize,
    num_frames: usize,
    output_bytes: usize,
}

impl FrameLayout {
    /// Check an input length and count the frames it holds.
    pub fn for_input_len(input_len: usize) -> Result<Self, CodecError> {
        let remainder = input_len % VOICE_FRAME_BYTES;
        if remainder != 0 && remainder != SID_FRAME_BYTES {
            return Err(CodecError::InvalidBufferSize {
                size: input_len,
                remainder,
            });
        }

        let mut num_frames = input_len / VOICE_FRAME_BYTES;
        if remainder == SID_FRAME_BYTES {
            num_frames += 1;
        }
        if input_len == 0 {
            num_frames = 1;
        }

        let output_bytes = num_frames
            .checked_mul(PCM_BLOCK_BYTES)
            .ok_or(CodecError::OutputTooLarge {
                size: input_len,
                frames: num_frames,
            })?;

        Ok(Self {
            input_len,
            num_frames,
            output_bytes,
        })
    }

    #[must_use]
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    #[must_use]
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Exact size of the PCM output for this input
    #[must_use]
    pub fn output_bytes(&self) -> usize {
        self.output_bytes
    }

    #[must_use]
    pub fn output_samples(&self) -> usize {
        self.output_bytes / 2
    }
}

/// Lazy left-to-right walk over the frames of a validated buffer.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    input: &'a [u8],
    offset: usize,
    remaining: usize,
}

impl<'a> Frames<'a> {
    #[must_use]
    pub fn new(input: &'a [u8], layout: FrameLayout) -> Self {
        debug_assert_eq!(input.len(), layout.input_len());
        Self {
            input,
            offset: 0,
            remaining: layout.num_frames(),
        }
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        // Every frame but the last is a voice frame; the last one takes
        // whatever is left (10, 2 or nothing).
        let left = self.input.len() - self.offset;
        let kind = if left >= VOICE_FRAME_BYTES {
            FrameKind::Voice
        } else if left == SID_FRAME_BYTES {
            FrameKind::Sid
        } else {
            FrameKind::Erasure
        };

        let offset = self.offset;
        let len = kind.encoded_len();
        self.offset += len;

        Some(Frame {
            offset,
            kind,
            data: &self.input[offset..offset + len],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}

/// Validate `input` and walk its frames.
pub fn segment(input: &[u8]) -> Result<(FrameLayout, Frames<'_>), CodecError> {
    let layout = FrameLayout::for_input_len(input.len())?;
    Ok((layout, Frames::new(input, layout)))
}
