//! WAV container for raw PCM speech.

use bytes::{BufMut, Bytes, BytesMut};

const HEADER_LEN: usize = 44;
const DEFAULT_SAMPLE_RATE: u32 = 24_000;
const MAX_SAMPLE_RATE: u32 = 384_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl Default for WavFormat {
    fn default() -> Self {
        WavFormat {
            channels: 1,
            sample_rate: DEFAULT_SAMPLE_RATE,
            bits_per_sample: 16,
        }
    }
}

impl WavFormat {
    /// Mono 16-bit PCM at the rate named in a mime type such as
    /// `audio/L16;codec=pcm;rate=24000`. Unknown or out-of-range rates fall
    /// back to 24kHz.
    pub fn from_mime(mime_type: &str) -> Self {
        let sample_rate = mime_type
            .split(';')
            .filter_map(|param| param.trim().strip_prefix("rate="))
            .find_map(|rate| rate.trim().parse::<u32>().ok())
            .filter(|rate| (1..=MAX_SAMPLE_RATE).contains(rate))
            .unwrap_or(DEFAULT_SAMPLE_RATE);
        WavFormat {
            sample_rate,
            ..Default::default()
        }
    }

    fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }

    fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.block_align())
    }
}

/// Prepends a canonical 44-byte RIFF/WAVE header to `pcm`.
pub fn encode_wav(pcm: &[u8], format: WavFormat) -> Bytes {
    let data_len = pcm.len() as u32;
    let mut buf = BytesMut::with_capacity(HEADER_LEN + pcm.len());

    buf.put_slice(b"RIFF");
    buf.put_u32_le(36 + data_len);
    buf.put_slice(b"WAVE");

    buf.put_slice(b"fmt ");
    buf.put_u32_le(16);
    buf.put_u16_le(1); // PCM
    buf.put_u16_le(format.channels);
    buf.put_u32_le(format.sample_rate);
    buf.put_u32_le(format.byte_rate());
    buf.put_u16_le(format.block_align());
    buf.put_u16_le(format.bits_per_sample);

    buf.put_slice(b"data");
    buf.put_u32_le(data_len);
    buf.put_slice(pcm);

    buf.freeze()
}
