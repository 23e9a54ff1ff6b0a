//! Raw PCM output: 16-bit signed samples in native byte order.

use super::frame::{PCM_BLOCK_BYTES, PCM_BLOCK_SAMPLES};
use super::traits::{CodecError, CodecType};

/// One decoded 10 ms block
pub type PcmBlock = [i16; PCM_BLOCK_SAMPLES];

/// Description of the raw audio produced by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u8,
    pub bits_per_sample: u16,
    /// Samples are stored in the host's byte order
    pub native_endian: bool,
    pub interleaved: bool,
}

impl PcmFormat {
    /// Output format of a G.729 decoder: 8 kHz mono S16, native endian
    #[must_use]
    pub const fn g729_output() -> Self {
        Self {
            sample_rate: CodecType::G729.sample_rate(),
            channels: CodecType::G729.channels(),
            bits_per_sample: 16,
            native_endian: true,
            interleaved: true,
        }
    }

    /// Bytes per frame of samples (one sample per channel)
    #[must_use]
    pub const fn bytes_per_frame(&self) -> usize {
        (self.bits_per_sample as usize / 8) * self.channels as usize
    }
}

/// Copy a decoded block into its slot in the output buffer
pub fn write_block(block: &PcmBlock, slot: &mut [u8]) -> Result<(), CodecError> {
    if slot.len() != PCM_BLOCK_BYTES {
        return Err(CodecError::DecodeError(format!(
            "PCM slot must be {} bytes, got {}",
            PCM_BLOCK_BYTES,
            slot.len()
        )));
    }

    for (dst, sample) in slot.chunks_exact_mut(2).zip(block.iter()) {
        dst.copy_from_slice(&sample.to_ne_bytes());
    }

    Ok(())
}

/// Read native-endian samples back out of a PCM byte buffer
pub fn samples_from_bytes(data: &[u8]) -> Result<Vec<i16>, CodecError> {
    if data.len() % 2 != 0 {
        return Err(CodecError::DecodeError(
            "PCM data must have even number of bytes".into(),
        ));
    }

    let samples: Vec<i16> = data
        .chunks_exact(2)
        .map(|chunk| i16::from_ne_bytes([chunk[0], chunk[1]]))
        .collect();

    Ok(samples)
}
