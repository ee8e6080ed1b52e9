//! Speech payloads arrive as raw 24 kHz mono 16-bit little-endian PCM. The
//! bytes are wrapped in a WAV container and saved so any player can open them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

pub const SPEECH_SAMPLE_RATE: u32 = 24_000;
pub const SPEECH_CHANNELS: u16 = 1;

const BITS_PER_SAMPLE: u16 = 16;

/// Wrap raw PCM in a minimal RIFF/WAVE header (PCM format tag, one data chunk).
pub fn wav_from_pcm(pcm: &[u8], sample_rate: u32, channels: u16) -> Vec<u8> {
    let byte_rate = sample_rate * u32::from(channels) * u32::from(BITS_PER_SAMPLE) / 8;
    let block_align = channels * BITS_PER_SAMPLE / 8;
    let data_len = pcm.len() as u32;

    let mut wav = Vec::with_capacity(44 + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend_from_slice(pcm);
    wav
}

/// Save a speech payload under `base_dir/speech/` and return the file path.
pub fn save_speech(base_dir: &Path, name: &str, pcm: &[u8]) -> Result<PathBuf> {
    let dir = base_dir.join("speech");
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{name}.wav"));
    fs::write(
        &path,
        wav_from_pcm(pcm, SPEECH_SAMPLE_RATE, SPEECH_CHANNELS),
    )?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_header_describes_the_payload() {
        let pcm = vec![0u8; 480];
        let wav = wav_from_pcm(&pcm, SPEECH_SAMPLE_RATE, SPEECH_CHANNELS);

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(wav.len(), 44 + pcm.len());
        // chunk size = 36 + data length
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 516);
        // sample rate
        assert_eq!(
            u32::from_le_bytes(wav[24..28].try_into().unwrap()),
            SPEECH_SAMPLE_RATE
        );
        // data length
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 480);
    }

    #[test]
    fn save_speech_writes_under_speech_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = save_speech(dir.path(), "question-1", &[1, 2, 3, 4]).unwrap();
        assert!(path.ends_with("speech/question-1.wav"));
        assert_eq!(fs::read(path).unwrap().len(), 48);
    }
}
