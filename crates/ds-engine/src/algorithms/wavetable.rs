//! Two-table wavetable synth.
//!
//! Each voice reads `wave1` and `wave2` at the same phase and combines them
//! by the transition table value, which itself advances over
//! `transition_time` frames in one of three cycle modes. The only
//! exportable algorithm: it reports loop points through the export session
//! when its output becomes periodic.

use ds_core::{
    lerp, SynthParameters, TransitionAlgorithm, TransitionCycle, VoiceState, DEPOP_FRAMES,
    MAX_TRANSITION_TIME, TABLE_LENGTH, TABLE_MAX,
};

use super::phase::wave_phase;
use crate::algorithm::{AlgorithmInfo, ParamInfo, SynthAlgorithm};
use crate::export::ExportSession;

const LAST_INDEX: i32 = TABLE_LENGTH as i32 - 1;
const LAST_VALUE: i32 = TABLE_MAX as i32 - 1;

static INFO: AlgorithmInfo = AlgorithmInfo {
    name: "Wavetable",
    short_name: "Wav",
    exportable: true,
    params: &[
        ParamInfo {
            name: "transition_time",
            min: 0,
            max: MAX_TRANSITION_TIME,
            default: 0,
        },
        ParamInfo {
            name: "algorithm",
            min: 0,
            max: 2,
            default: 0,
        },
        ParamInfo {
            name: "cycle",
            min: 0,
            max: 2,
            default: 0,
        },
    ],
};

pub struct Wavetable {
    gain: i32,
    sample_rate: u32,
}

impl Wavetable {
    pub fn new(gain: i32, sample_rate: u32) -> Self {
        Self { gain, sample_rate }
    }

    /// Advance the transition counter for one frame, ending an export when
    /// the transition has come full circle.
    fn advance_transition(
        voice: &mut VoiceState,
        cycle: TransitionCycle,
        transition_time: i32,
        export: &mut ExportSession,
    ) {
        match cycle {
            TransitionCycle::Forward => {
                voice.transition_frames_elapsed += 1;
            }
            TransitionCycle::Loop => {
                voice.transition_frames_elapsed = if transition_time > 0 {
                    (voice.transition_frames_elapsed + 1) % transition_time
                } else {
                    0
                };
                if export.exporting && export.frames_elapsed >= transition_time {
                    export.finish(0, export.frames_elapsed - 1);
                }
            }
            TransitionCycle::PingPong => {
                if voice.ping_pong_direction {
                    if voice.transition_frames_elapsed >= transition_time {
                        voice.ping_pong_direction = false;
                    }
                    voice.transition_frames_elapsed += 1;
                } else {
                    if voice.transition_frames_elapsed <= 0 {
                        voice.ping_pong_direction = true;
                        if export.exporting {
                            export.finish(0, export.frames_elapsed - 1);
                        }
                    }
                    voice.transition_frames_elapsed -= 1;
                }
            }
        }
    }

    /// Fade the frozen last sample out over the release tail.
    fn release(voice: &mut VoiceState) -> i16 {
        if !voice.stopping {
            return 0;
        }
        let out = lerp(
            0,
            voice.last_sample_outputted,
            voice.depop_frames_elapsed,
            DEPOP_FRAMES,
        );
        voice.depop_frames_elapsed -= 1;
        if voice.depop_frames_elapsed <= 0 {
            voice.stopping = false;
        }
        out as i16
    }
}

/// Blend of the two table samples for transition value `tv`.
fn combine(algorithm: TransitionAlgorithm, phase: usize, s1: i32, s2: i32, tv: i32) -> i32 {
    let morph = || lerp(s1, s2, tv, LAST_VALUE);
    let swipe = || {
        let split = lerp(0, LAST_INDEX, tv, LAST_VALUE);
        if phase as i32 > split {
            s1
        } else {
            s2
        }
    };
    match algorithm {
        TransitionAlgorithm::Morph => morph(),
        TransitionAlgorithm::Swipe => swipe(),
        TransitionAlgorithm::Combo => lerp(swipe(), morph(), tv, LAST_VALUE),
    }
}

impl SynthAlgorithm for Wavetable {
    fn info(&self) -> &AlgorithmInfo {
        &INFO
    }

    fn sample(
        &mut self,
        voice: &mut VoiceState,
        params: &SynthParameters,
        export: &mut ExportSession,
    ) -> i16 {
        if !voice.playing {
            return Self::release(voice);
        }
        let wt = &params.wavetable;

        if voice.just_pressed {
            if export.exporting {
                export.restart();
            }
            voice.ping_pong_direction = true;
            voice.transition_frames_elapsed = 0;
            voice.just_pressed = false;
        }

        let phase = wave_phase(voice, self.sample_rate);
        if phase.wrapped
            && export.exporting
            && wt.cycle == TransitionCycle::Forward
            && export.frames_elapsed > wt.transition_time
        {
            match export.loop_start {
                None => export.loop_start = Some(export.frames_elapsed),
                Some(start) => export.finish(start, export.frames_elapsed - 1),
            }
        }

        let s1 = wt.wave1[phase.index] as i32;
        let s2 = wt.wave2[phase.index] as i32;
        let transition_index = lerp(
            0,
            LAST_INDEX,
            voice.transition_frames_elapsed,
            wt.transition_time,
        );
        let tv = wt.transition[transition_index as usize] as i32;

        let mut output = combine(wt.algorithm, phase.index, s1, s2, tv);

        if voice.depop_frames_elapsed < DEPOP_FRAMES {
            output = lerp(0, output, voice.depop_frames_elapsed, DEPOP_FRAMES);
            voice.depop_frames_elapsed += 1;
        } else {
            voice.phase_frames_elapsed += 1;
            Self::advance_transition(voice, wt.cycle, wt.transition_time, export);
        }

        let gained = self.gain.wrapping_mul(output);
        voice.last_sample_outputted = gained;

        if export.exporting {
            export.frames_elapsed += 1;
        }
        gained as i16
    }
}
