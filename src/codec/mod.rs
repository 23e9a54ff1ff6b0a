pub mod frame;
pub mod g729;
pub mod pcm;
pub mod traits;

pub use frame::{segment, Frame, FrameKind, FrameLayout, Frames, PCM_BLOCK_BYTES, PCM_BLOCK_SAMPLES};
pub use g729::{DecodeStats, G729Decoder};
pub use pcm::{samples_from_bytes, write_block, PcmBlock, PcmFormat};
pub use traits::{AudioDecoder, ChannelBackend, CodecError, CodecType, DecodeParams};

use crate::buffer::HeapAllocator;
use crate::config::Config;

/// Create a decoder for the given codec type
pub fn create_decoder<B: ChannelBackend>(
    codec_type: CodecType,
    backend: B,
    config: &Config,
) -> Result<G729Decoder<B, HeapAllocator>, CodecError> {
    match codec_type {
        CodecType::G729 => G729Decoder::with_config(backend, config),
    }
}

/// Create a decoder based on RTP payload type
pub fn create_decoder_for_payload_type<B: ChannelBackend>(
    pt: u8,
    backend: B,
    config: &Config,
) -> Result<G729Decoder<B, HeapAllocator>, CodecError> {
    match CodecType::from_payload_type(pt) {
        Some(codec_type) => create_decoder(codec_type, backend, config),
        None => Err(CodecError::UnsupportedPayloadType(pt)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SilentBackend;

    impl ChannelBackend for SilentBackend {
        type Channel = ();

        fn open_channel(&mut self) -> Result<(), CodecError> {
            Ok(())
        }

        fn close_channel(&mut self, _channel: ()) {}

        fn decode(&mut self, _: &mut (), _: &[u8], _: DecodeParams, pcm: &mut [i16]) -> Result<(), CodecError> {
            pcm.fill(0);
            Ok(())
        }
    }

    #[test]
    fn test_create_decoder() {
        let decoder = create_decoder(CodecType::G729, SilentBackend, &Config::default());
        assert!(decoder.is_ok());
        assert_eq!(decoder.unwrap().codec_type(), CodecType::G729);
    }

    #[test]
    fn test_create_decoder_by_payload_type() {
        let decoder = create_decoder_for_payload_type(18, SilentBackend, &Config::default());
        assert!(decoder.is_ok());

        let decoder = create_decoder_for_payload_type(0, SilentBackend, &Config::default());
        assert!(matches!(decoder, Err(CodecError::UnsupportedPayloadType(0))));
    }
}
