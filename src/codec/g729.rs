//! G.729 decoding session: segments each input buffer, allocates the output
//! once and dispatches every frame to the channel backend.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace};

use super::frame::{segment, FrameKind, PCM_BLOCK_BYTES, PCM_BLOCK_SAMPLES};
use super::pcm::{samples_from_bytes, write_block, PcmBlock, PcmFormat};
use super::traits::{AudioDecoder, ChannelBackend, CodecError, CodecType};
use crate::buffer::{HeapAllocator, OutputAllocator};
use crate::config::{Config, DecoderConfig};

/// Running totals for one decoding session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeStats {
    /// Buffers that produced output
    pub buffers: u64,
    pub voice_frames: u64,
    pub sid_frames: u64,
    pub erasure_frames: u64,
    /// Buffers refused for an illegal size
    pub rejected_buffers: u64,
    /// Buffers skipped because no output buffer was available
    pub dropped_buffers: u64,
}

impl DecodeStats {
    fn record_frame(&mut self, kind: FrameKind) {
        match kind {
            FrameKind::Voice => self.voice_frames += 1,
            FrameKind::Sid => self.sid_frames += 1,
            FrameKind::Erasure => self.erasure_frames += 1,
        }
    }

    /// Total frames handed to the backend
    #[must_use]
    pub fn total_frames(&self) -> u64 {
        self.voice_frames + self.sid_frames + self.erasure_frames
    }
}

/// One G.729 decoding session.
///
/// Owns the backend's channel state from [`open`](Self::open) until
/// [`stop`](Self::stop) or drop. Calls are sequential by construction since
/// every operation takes `&mut self`.
pub struct G729Decoder<B: ChannelBackend, A: OutputAllocator> {
    backend: B,
    allocator: A,
    channel: Option<B::Channel>,
    vad: bool,
    stats: DecodeStats,
}

impl<B: ChannelBackend> G729Decoder<B, HeapAllocator> {
    /// Open a session using the heap allocator described by `config`
    pub fn with_config(backend: B, config: &Config) -> Result<Self, CodecError> {
        Self::open(backend, config.output.allocator(), &config.decoder)
    }
}

impl<B: ChannelBackend, A: OutputAllocator> G729Decoder<B, A> {
    /// Open a decoder channel and start a session
    pub fn open(mut backend: B, allocator: A, config: &DecoderConfig) -> Result<Self, CodecError> {
        let channel = backend.open_channel()?;
        info!(vad = config.vad, "G.729 decoder channel opened");

        Ok(Self {
            backend,
            allocator,
            channel: Some(channel),
            vad: config.vad,
            stats: DecodeStats::default(),
        })
    }

    /// Decode one input buffer.
    ///
    /// Returns `Ok(None)` when the allocator refuses the output buffer; the
    /// input is then dropped without decoding and without an error.
    pub fn process(&mut self, input: &[u8]) -> Result<Option<Bytes>, CodecError> {
        let Self {
            backend,
            allocator,
            channel,
            stats,
            ..
        } = self;
        let channel = channel.as_mut().ok_or(CodecError::ChannelClosed)?;

        let (layout, frames) = match segment(input) {
            Ok(segmented) => segmented,
            Err(e) => {
                error!(size = input.len(), error = %e, "wrong buffer size");
                stats.rejected_buffers += 1;
                return Err(e);
            }
        };

        let expected = layout.output_bytes();
        let Some(mut output) = allocator.allocate_output(expected) else {
            debug!(size = expected, "no output buffer available, dropping input");
            stats.dropped_buffers += 1;
            return Ok(None);
        };
        if output.len() != expected {
            return Err(CodecError::InvalidOutputSize {
                expected,
                got: output.len(),
            });
        }

        trace!(bytes = input.len(), frames = layout.num_frames(), "decoding buffer");

        let mut block: PcmBlock = [0; PCM_BLOCK_SAMPLES];
        for (frame, slot) in frames.zip(output.chunks_exact_mut(PCM_BLOCK_BYTES)) {
            match frame.kind {
                FrameKind::Sid => debug!(offset = frame.offset, "SID frame"),
                FrameKind::Erasure => debug!(offset = frame.offset, "silence frame"),
                FrameKind::Voice => {}
            }

            block.fill(0);
            backend.decode(channel, frame.data, frame.kind.decode_params(), &mut block)?;
            write_block(&block, slot)?;
            stats.record_frame(frame.kind);
        }

        stats.buffers += 1;
        Ok(Some(output.freeze()))
    }

    /// End the session: clear the VAD flag and close the channel.
    /// Further calls to [`process`](Self::process) fail.
    pub fn stop(&mut self) {
        self.vad = false;
        if let Some(channel) = self.channel.take() {
            self.backend.close_channel(channel);
            info!(frames = self.stats.total_frames(), "G.729 decoder channel closed");
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    #[must_use]
    pub fn vad(&self) -> bool {
        self.vad
    }

    #[must_use]
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Format of the PCM this decoder produces
    #[must_use]
    pub fn output_format(&self) -> PcmFormat {
        PcmFormat::g729_output()
    }

    /// Current channel state, if the session is open
    #[must_use]
    pub fn channel(&self) -> Option<&B::Channel> {
        self.channel.as_ref()
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn allocator(&self) -> &A {
        &self.allocator
    }
}

impl<B: ChannelBackend, A: OutputAllocator> Drop for G729Decoder<B, A> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<B: ChannelBackend, A: OutputAllocator> AudioDecoder for G729Decoder<B, A> {
    fn decode(&mut self, input: &[u8]) -> Result<Vec<i16>, CodecError> {
        match self.process(input)? {
            Some(pcm) => samples_from_bytes(&pcm),
            None => Ok(Vec::new()),
        }
    }

    fn sample_rate(&self) -> u32 {
        CodecType::G729.sample_rate()
    }

    fn channels(&self) -> u8 {
        CodecType::G729.channels()
    }

    fn codec_type(&self) -> CodecType {
        CodecType::G729
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::traits::DecodeParams;

    /// Fills each block with a marker for the frame kind; channel counts calls.
    struct MarkerBackend {
        opened: u32,
        closed: u32,
    }

    impl ChannelBackend for MarkerBackend {
        type Channel = u32;

        fn open_channel(&mut self) -> Result<u32, CodecError> {
            self.opened += 1;
            Ok(0)
        }

        fn close_channel(&mut self, _channel: u32) {
            self.closed += 1;
        }

        fn decode(
            &mut self,
            channel: &mut u32,
            _frame: &[u8],
            params: DecodeParams,
            pcm: &mut [i16],
        ) -> Result<(), CodecError> {
            *channel += 1;
            let marker = match (params.erasure, params.sid) {
                (true, _) => -1,
                (_, true) => 2,
                _ => 10,
            };
            pcm.fill(marker);
            Ok(())
        }
    }

    fn open_decoder() -> G729Decoder<MarkerBackend, HeapAllocator> {
        let backend = MarkerBackend { opened: 0, closed: 0 };
        G729Decoder::with_config(backend, &Config::default()).unwrap()
    }

    #[test]
    fn test_output_blocks_follow_frames() {
        let mut decoder = open_decoder();
        let pcm = decoder.decode(&[0u8; 12]).unwrap();

        assert_eq!(pcm.len(), 320);
        assert!(pcm[..160].iter().all(|&s| s == 10));
        assert!(pcm[160..].iter().all(|&s| s == 2));
        assert_eq!(decoder.channel(), Some(&2));
    }

    #[test]
    fn test_empty_input_conceals() {
        let mut decoder = open_decoder();
        let pcm = decoder.decode(&[]).unwrap();

        assert_eq!(pcm.len(), 160);
        assert!(pcm.iter().all(|&s| s == -1));
        assert_eq!(decoder.stats().erasure_frames, 1);
    }

    #[test]
    fn test_stats_accumulate() {
        let mut decoder = open_decoder();
        decoder.process(&[0u8; 22]).unwrap();
        decoder.process(&[]).unwrap();
        assert!(decoder.process(&[0u8; 5]).is_err());

        let stats = decoder.stats();
        assert_eq!(stats.buffers, 2);
        assert_eq!(stats.voice_frames, 2);
        assert_eq!(stats.sid_frames, 1);
        assert_eq!(stats.erasure_frames, 1);
        assert_eq!(stats.rejected_buffers, 1);
        assert_eq!(stats.total_frames(), 4);
    }

    #[test]
    fn test_stop_closes_channel_once() {
        let mut decoder = open_decoder();
        assert!(decoder.is_open());
        assert_eq!(decoder.backend().opened, 1);

        decoder.stop();
        decoder.stop();
        assert!(!decoder.is_open());
        assert_eq!(decoder.backend().closed, 1);

        assert!(matches!(decoder.process(&[0u8; 10]), Err(CodecError::ChannelClosed)));
    }

    #[test]
    fn test_stop_clears_vad() {
        let backend = MarkerBackend { opened: 0, closed: 0 };
        let config = DecoderConfig { vad: true };
        let mut decoder = G729Decoder::open(backend, HeapAllocator::new(), &config).unwrap();
        assert!(decoder.vad());

        decoder.stop();
        assert!(!decoder.vad());
    }

    #[test]
    fn test_codec_properties() {
        let decoder = open_decoder();
        assert_eq!(AudioDecoder::sample_rate(&decoder), 8000);
        assert_eq!(AudioDecoder::channels(&decoder), 1);
        assert_eq!(decoder.codec_type(), CodecType::G729);
        assert_eq!(decoder.output_format(), PcmFormat::g729_output());
    }
}
