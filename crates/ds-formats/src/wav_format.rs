//! Mono 16-bit PCM WAV encoding and decoding.

use std::io::Write;

use crate::FormatError;

const HEADER_SIZE: u32 = 44;
const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BLOCK_ALIGN: u16 = CHANNELS * (BITS_PER_SAMPLE / 8);

/// Decoded mono 16-bit audio.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wav {
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

// --- Writing ---

/// Write `samples` as a complete WAV file. The header declares exactly
/// `samples.len()` samples.
pub fn write_wav(w: &mut impl Write, samples: &[i16], sample_rate: u32) -> Result<(), FormatError> {
    let data_size = samples
        .len()
        .checked_mul(BLOCK_ALIGN as usize)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| n.checked_add(HEADER_SIZE - 8).is_some())
        .ok_or(FormatError::TooLarge(samples.len()))?;

    write_riff_header(w, data_size)?;
    write_fmt_chunk(w, sample_rate)?;
    write_data_chunk(w, samples, data_size)?;
    Ok(())
}

pub fn samples_to_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, FormatError> {
    let mut buf = Vec::with_capacity(HEADER_SIZE as usize + samples.len() * 2);
    write_wav(&mut buf, samples, sample_rate)?;
    Ok(buf)
}

fn write_riff_header(w: &mut impl Write, data_size: u32) -> std::io::Result<()> {
    w.write_all(b"RIFF")?;
    w.write_all(&(HEADER_SIZE - 8 + data_size).to_le_bytes())?;
    w.write_all(b"WAVE")
}

fn write_fmt_chunk(w: &mut impl Write, sample_rate: u32) -> std::io::Result<()> {
    w.write_all(b"fmt ")?;
    w.write_all(&16u32.to_le_bytes())?;
    w.write_all(&1u16.to_le_bytes())?;
    w.write_all(&CHANNELS.to_le_bytes())?;
    w.write_all(&sample_rate.to_le_bytes())?;
    w.write_all(&(sample_rate * BLOCK_ALIGN as u32).to_le_bytes())?;
    w.write_all(&BLOCK_ALIGN.to_le_bytes())?;
    w.write_all(&BITS_PER_SAMPLE.to_le_bytes())
}

fn write_data_chunk(w: &mut impl Write, samples: &[i16], data_size: u32) -> std::io::Result<()> {
    w.write_all(b"data")?;
    w.write_all(&data_size.to_le_bytes())?;
    for sample in samples {
        w.write_all(&sample.to_le_bytes())?;
    }
    Ok(())
}

// --- Reading ---

/// Decode a mono 16-bit PCM WAV file.
pub fn load_wav(data: &[u8]) -> Result<Wav, FormatError> {
    if data.len() < HEADER_SIZE as usize {
        return Err(FormatError::UnexpectedEof);
    }
    if &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return Err(FormatError::InvalidHeader);
    }

    let mut pos = 12;
    let mut sample_rate = None;
    let mut data_chunk = None;

    while pos + 8 <= data.len() {
        let chunk_id = &data[pos..pos + 4];
        let chunk_size = read_u32_le(data, pos + 4) as usize;

        if chunk_id == b"fmt " && chunk_size >= 16 && pos + 24 <= data.len() {
            let format = read_u16_le(data, pos + 8);
            let channels = read_u16_le(data, pos + 10);
            let bits = read_u16_le(data, pos + 22);
            if format != 1 || channels != CHANNELS || bits != BITS_PER_SAMPLE {
                return Err(FormatError::Unsupported {
                    format,
                    channels,
                    bits,
                });
            }
            sample_rate = Some(read_u32_le(data, pos + 12));
        } else if chunk_id == b"data" {
            data_chunk = Some((pos + 8, chunk_size));
        }

        pos += 8 + chunk_size;
        if pos % 2 != 0 {
            pos += 1;
        }
    }

    let sample_rate = sample_rate.ok_or(FormatError::InvalidHeader)?;
    let (offset, size) = data_chunk.ok_or(FormatError::InvalidHeader)?;
    let end = offset
        .checked_add(size)
        .filter(|&end| end <= data.len())
        .ok_or(FormatError::UnexpectedEof)?;

    let samples = data[offset..end]
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect();
    Ok(Wav {
        sample_rate,
        samples,
    })
}

fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a minimal WAV file from raw parameters.
    fn make_wav(channels: u16, sample_rate: u32, bits: u16, pcm_data: &[u8]) -> Vec<u8> {
        let block_align = channels * (bits / 8);
        let byte_rate = sample_rate * block_align as u32;
        let data_size = pcm_data.len() as u32;

        let mut buf = Vec::new();
        buf.extend(b"RIFF");
        buf.extend(&(36 + data_size).to_le_bytes());
        buf.extend(b"WAVE");
        buf.extend(b"fmt ");
        buf.extend(&16u32.to_le_bytes());
        buf.extend(&1u16.to_le_bytes());
        buf.extend(&channels.to_le_bytes());
        buf.extend(&sample_rate.to_le_bytes());
        buf.extend(&byte_rate.to_le_bytes());
        buf.extend(&block_align.to_le_bytes());
        buf.extend(&bits.to_le_bytes());
        buf.extend(b"data");
        buf.extend(&data_size.to_le_bytes());
        buf.extend(pcm_data);
        buf
    }

    #[test]
    fn header_matches_layout() {
        let wav = samples_to_wav(&[1, -1, 300], 10_000).unwrap();
        assert_eq!(wav.len(), 44 + 6);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(read_u32_le(&wav, 4), 36 + 6);
        assert_eq!(read_u16_le(&wav, 22), 1);
        assert_eq!(read_u32_le(&wav, 24), 10_000);
        assert_eq!(read_u32_le(&wav, 28), 20_000);
        assert_eq!(read_u16_le(&wav, 32), 2);
        assert_eq!(read_u16_le(&wav, 34), 16);
        assert_eq!(read_u32_le(&wav, 40), 6);
        assert_eq!(&wav[44..], &[1, 0, 0xff, 0xff, 0x2c, 0x01]);
    }

    #[test]
    fn written_file_loads_back() {
        let samples = [0i16, 1000, -1000, i16::MAX, i16::MIN];
        let wav = samples_to_wav(&samples, 8192).unwrap();
        let loaded = load_wav(&wav).unwrap();
        assert_eq!(loaded.sample_rate, 8192);
        assert_eq!(loaded.samples, samples);
    }

    #[test]
    fn empty_capture_is_valid() {
        let wav = samples_to_wav(&[], 10_000).unwrap();
        assert_eq!(load_wav(&wav).unwrap().samples, Vec::<i16>::new());
    }

    #[test]
    fn stereo_rejected() {
        let wav = make_wav(2, 44100, 16, &[0; 8]);
        assert!(matches!(
            load_wav(&wav),
            Err(FormatError::Unsupported { channels: 2, .. })
        ));
    }

    #[test]
    fn eight_bit_rejected() {
        let wav = make_wav(1, 22050, 8, &[128, 255, 0, 192]);
        assert!(matches!(
            load_wav(&wav),
            Err(FormatError::Unsupported { bits: 8, .. })
        ));
    }

    #[test]
    fn truncated_data_rejected() {
        let mut wav = samples_to_wav(&[1, 2, 3, 4], 10_000).unwrap();
        wav.truncate(wav.len() - 2);
        assert!(matches!(load_wav(&wav), Err(FormatError::UnexpectedEof)));
    }

    #[test]
    fn invalid_header_rejected() {
        let mut wav = samples_to_wav(&[0; 4], 10_000).unwrap();
        wav[0] = b'X';
        assert!(matches!(load_wav(&wav), Err(FormatError::InvalidHeader)));
    }

    #[test]
    fn too_short_rejected() {
        assert!(matches!(load_wav(&[0; 10]), Err(FormatError::UnexpectedEof)));
    }
}
