//! Captured notes written through the file formats.

use ds_core::{midi_entry, SynthParameters, TransitionCycle, TABLE_LENGTH};
use ds_engine::{Engine, SynthKind};
use ds_formats::{load_wav, samples_to_wav, sfz_to_string, SfzRegion};

fn wavetable_engine(cycle: TransitionCycle) -> Engine {
    let mut params = SynthParameters::default();
    for i in 0..TABLE_LENGTH {
        params.wavetable.wave1[i] = (i % 160) as i16;
        params.wavetable.wave2[i] = 80;
        params.wavetable.transition[i] = (i / 2) as i16;
    }
    params.wavetable.transition_time = 1500;
    params.wavetable.cycle = cycle;
    let mut engine = Engine::new(params);
    engine.select(SynthKind::Wavetable);
    engine
}

#[test]
fn captured_note_survives_wav() {
    let mut engine = wavetable_engine(TransitionCycle::Forward);
    let a4 = midi_entry(69).unwrap();
    let capture = engine.capture(a4.pitch).unwrap();

    let bytes = samples_to_wav(&capture.samples, engine.sample_rate()).unwrap();
    let declared = u32::from_le_bytes([bytes[40], bytes[41], bytes[42], bytes[43]]);
    assert_eq!(declared as usize, capture.samples.len() * 2);

    let wav = load_wav(&bytes).unwrap();
    assert_eq!(wav.sample_rate, 10_000);
    assert_eq!(wav.samples, capture.samples);
}

#[test]
fn loop_points_land_inside_sample() {
    for cycle in [
        TransitionCycle::Forward,
        TransitionCycle::Loop,
        TransitionCycle::PingPong,
    ] {
        let mut engine = wavetable_engine(cycle);
        let middle_c = midi_entry(60).unwrap();
        let capture = engine.capture(middle_c.pitch).unwrap();
        assert!(capture.loop_start < capture.loop_end, "{cycle:?}");
        assert!((capture.loop_end as usize) < capture.samples.len(), "{cycle:?}");

        let sfz = sfz_to_string(&[SfzRegion {
            sample: format!("{}.wav", middle_c.name),
            key: middle_c.key,
            loop_start: capture.loop_start,
            loop_end: capture.loop_end,
        }]);
        assert!(sfz.contains(&format!(
            "<region> sample={}.wav key=60 loop_start={} loop_end={}",
            middle_c.name, capture.loop_start, capture.loop_end
        )));
    }
}
