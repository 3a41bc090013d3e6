//! Table phase shared by the fixed-length table algorithms.

use ds_core::{VoiceState, TABLE_LENGTH};

/// Position inside a `TABLE_LENGTH` table for the voice's current frame.
pub(crate) struct WavePhase {
    pub index: usize,
    /// The frame counter passed eight table periods and was reset.
    pub wrapped: bool,
}

/// `phase_frames_elapsed * freq * TABLE_LENGTH / sample_rate`, reduced
/// modulo the table. Resets the counter once the raw phase passes eight
/// periods so it stays bounded.
pub(crate) fn wave_phase(voice: &mut VoiceState, sample_rate: u32) -> WavePhase {
    let length = TABLE_LENGTH as i64;
    let raw = (voice.phase_frames_elapsed as i64 * voice.freq as i64 * length)
        / sample_rate.max(1) as i64;
    let wrapped = raw > 8 * length;
    if wrapped {
        voice.phase_frames_elapsed = 0;
    }
    WavePhase {
        index: raw.rem_euclid(length) as usize,
        wrapped,
    }
}
