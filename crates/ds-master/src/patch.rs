//! Patch files: every editable parameter plus per-synth output settings,
//! stored as TOML.

use std::fs;
use std::path::{Path, PathBuf};

use ds_core::{
    BurstFill, FmParams, FmRouting, NoveltyAlgorithm, NoveltyParams, PluckedParams,
    SynthParameters, Table, TransitionAlgorithm, TransitionCycle, WavetableParams, FM_OPERATORS,
    FM_UI_SLOTS, MAX_TRANSITION_TIME, TABLE_LENGTH, TABLE_MAX,
};
use ds_engine::{SynthKind, SynthSettings, SYNTH_COUNT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest FM frequency ratio the editor offers.
const MAX_FM_RATIO: i32 = 12;

/// Gain bound. Every renderer's pre-gain magnitude stays below 2^16, so the
/// gained value fits in i32 before it is truncated to the output sample.
const MAX_GAIN: i32 = i16::MAX as i32;

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("failed to access patch {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid patch TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to encode patch: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("{field} must have {TABLE_LENGTH} entries, found {len}")]
    TableLength { field: &'static str, len: usize },
    #[error("{field}[{index}] = {value} is outside 0..{TABLE_MAX}")]
    TableValue {
        field: &'static str,
        index: usize,
        value: i16,
    },
    #[error("unknown {field} {value:?}")]
    UnknownName { field: &'static str, value: String },
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("{field} must have between {FM_OPERATORS} and {FM_UI_SLOTS} entries, found {len}")]
    VectorLength { field: &'static str, len: usize },
    #[error("synth {0} has a zero sample rate")]
    ZeroSampleRate(&'static str),
    #[error("synths.{synth}.{field} = {value} is outside {min}..={max}")]
    OutputRange {
        synth: &'static str,
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WavetablePatch {
    pub wave1: Vec<i16>,
    pub wave2: Vec<i16>,
    pub transition: Vec<i16>,
    pub transition_time: i32,
    pub algorithm: String,
    pub cycle: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluckedPatch {
    pub blend_factor: i32,
    pub burst_fill: String,
    pub burst_table: Vec<i16>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoveltyPatch {
    pub algorithm: String,
    pub table: Vec<i16>,
    pub slider: i32,
    pub fill: String,
}

/// FM editor vectors. Four to eight slots; only the first four drive
/// operators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FmPatch {
    pub amps: Vec<i32>,
    pub routing: Vec<i32>,
    pub ratios: Vec<i32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPatch {
    pub gain: i32,
    pub sample_rate: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthsPatch {
    pub square: OutputPatch,
    pub wavetable: OutputPatch,
    pub plucked: OutputPatch,
    pub novelty: OutputPatch,
    pub fm: OutputPatch,
}

/// A complete instrument setup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Patch {
    pub wavetable: WavetablePatch,
    pub plucked: PluckedPatch,
    pub novelty: NoveltyPatch,
    pub fm: FmPatch,
    pub synths: SynthsPatch,
}

impl Default for WavetablePatch {
    fn default() -> Self {
        Patch::from_parameters(&SynthParameters::default(), &default_settings()).wavetable
    }
}

impl Default for PluckedPatch {
    fn default() -> Self {
        Patch::from_parameters(&SynthParameters::default(), &default_settings()).plucked
    }
}

impl Default for NoveltyPatch {
    fn default() -> Self {
        Patch::from_parameters(&SynthParameters::default(), &default_settings()).novelty
    }
}

impl Default for FmPatch {
    fn default() -> Self {
        Patch::from_parameters(&SynthParameters::default(), &default_settings()).fm
    }
}

impl Default for SynthsPatch {
    fn default() -> Self {
        Patch::from_parameters(&SynthParameters::default(), &default_settings()).synths
    }
}

fn default_settings() -> [SynthSettings; SYNTH_COUNT] {
    SynthKind::ALL.map(SynthKind::default_settings)
}

impl From<SynthSettings> for OutputPatch {
    fn from(s: SynthSettings) -> Self {
        Self {
            gain: s.gain,
            sample_rate: s.sample_rate,
        }
    }
}

impl Patch {
    /// Read and validate a patch file.
    pub fn load(path: &Path) -> Result<Self, PatchError> {
        let text = fs::read_to_string(path).map_err(|source| PatchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let patch = Self::from_toml_str(&text)?;
        patch.validate()?;
        Ok(patch)
    }

    /// Write the patch as TOML.
    pub fn save(&self, path: &Path) -> Result<(), PatchError> {
        let text = self.to_toml_string()?;
        fs::write(path, text).map_err(|source| PatchError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, PatchError> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> Result<String, PatchError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Capture a running setup.
    pub fn from_parameters(params: &SynthParameters, settings: &[SynthSettings; SYNTH_COUNT]) -> Self {
        let wt = &params.wavetable;
        let fm = &params.fm;
        let output = |kind: SynthKind| OutputPatch::from(settings[kind.index()]);
        Self {
            wavetable: WavetablePatch {
                wave1: wt.wave1.to_vec(),
                wave2: wt.wave2.to_vec(),
                transition: wt.transition.to_vec(),
                transition_time: wt.transition_time,
                algorithm: wt.algorithm.name().to_owned(),
                cycle: wt.cycle.name().to_owned(),
            },
            plucked: PluckedPatch {
                blend_factor: params.plucked.blend_factor,
                burst_fill: params.plucked.burst_fill.name().to_owned(),
                burst_table: params.plucked.burst_table.to_vec(),
            },
            novelty: NoveltyPatch {
                algorithm: params.novelty.algorithm.name().to_owned(),
                table: params.novelty.table.to_vec(),
                slider: params.novelty.slider,
                fill: params.novelty.fill.name().to_owned(),
            },
            fm: FmPatch {
                amps: fm.amps.to_vec(),
                routing: fm.routings.iter().map(|r| r.slot()).collect(),
                ratios: fm.ratios.to_vec(),
            },
            synths: SynthsPatch {
                square: output(SynthKind::Square),
                wavetable: output(SynthKind::Wavetable),
                plucked: output(SynthKind::Plucked),
                novelty: output(SynthKind::Novelty),
                fm: output(SynthKind::Fm),
            },
        }
    }

    /// Check every field; the first problem found is reported.
    pub fn validate(&self) -> Result<(), PatchError> {
        self.parameters()?;
        self.settings()?;
        Ok(())
    }

    /// The engine parameter set described by this patch.
    pub fn parameters(&self) -> Result<SynthParameters, PatchError> {
        let wt = &self.wavetable;
        let wavetable = WavetableParams {
            wave1: table("wavetable.wave1", &wt.wave1)?,
            wave2: table("wavetable.wave2", &wt.wave2)?,
            transition: table("wavetable.transition", &wt.transition)?,
            transition_time: in_range("wavetable.transition_time", wt.transition_time, 0, MAX_TRANSITION_TIME)?,
            algorithm: named("wavetable.algorithm", &wt.algorithm, TransitionAlgorithm::from_name)?,
            cycle: named("wavetable.cycle", &wt.cycle, TransitionCycle::from_name)?,
        };

        let pl = &self.plucked;
        let plucked = PluckedParams {
            blend_factor: in_range("plucked.blend_factor", pl.blend_factor, 0, TABLE_LENGTH as i32 - 1)?,
            burst_fill: named("plucked.burst_fill", &pl.burst_fill, BurstFill::from_name)?,
            burst_table: table("plucked.burst_table", &pl.burst_table)?,
        };

        let nv = &self.novelty;
        let novelty = NoveltyParams {
            algorithm: named("novelty.algorithm", &nv.algorithm, NoveltyAlgorithm::from_name)?,
            table: table("novelty.table", &nv.table)?,
            slider: in_range("novelty.slider", nv.slider, 0, TABLE_LENGTH as i32 - 1)?,
            fill: named("novelty.fill", &nv.fill, BurstFill::from_name)?,
        };

        let amps = ui_slots("fm.amps", &self.fm.amps, 0, TABLE_LENGTH as i32 - 1)?;
        let routing = ui_slots("fm.routing", &self.fm.routing, 0, FmRouting::OFF_SLOT)?;
        let ratios = ui_slots("fm.ratios", &self.fm.ratios, 0, MAX_FM_RATIO)?;

        Ok(SynthParameters {
            wavetable,
            plucked,
            novelty,
            fm: FmParams::from_ui_slots(&amps, &routing, &ratios),
        })
    }

    /// Per-synth output settings, indexed by [`SynthKind::index`].
    pub fn settings(&self) -> Result<[SynthSettings; SYNTH_COUNT], PatchError> {
        let mut settings = default_settings();
        for kind in SynthKind::ALL {
            let out = self.synths.get(kind);
            if out.sample_rate == 0 {
                return Err(PatchError::ZeroSampleRate(kind.name()));
            }
            output_range(kind, "gain", out.gain.into(), 0, MAX_GAIN.into())?;
            output_range(kind, "sample_rate", out.sample_rate.into(), 1, i32::MAX.into())?;
            settings[kind.index()] = SynthSettings {
                gain: out.gain,
                sample_rate: out.sample_rate,
            };
        }
        Ok(settings)
    }
}

impl SynthsPatch {
    pub fn get(&self, kind: SynthKind) -> OutputPatch {
        match kind {
            SynthKind::Square => self.square,
            SynthKind::Wavetable => self.wavetable,
            SynthKind::Plucked => self.plucked,
            SynthKind::Novelty => self.novelty,
            SynthKind::Fm => self.fm,
        }
    }
}

fn table(field: &'static str, values: &[i16]) -> Result<Table, PatchError> {
    let table: Table = values.try_into().map_err(|_| PatchError::TableLength {
        field,
        len: values.len(),
    })?;
    if let Some((index, &value)) = table
        .iter()
        .enumerate()
        .find(|(_, v)| !(0..TABLE_MAX as i16).contains(*v))
    {
        return Err(PatchError::TableValue {
            field,
            index,
            value,
        });
    }
    Ok(table)
}

fn named<T>(field: &'static str, value: &str, parse: fn(&str) -> Option<T>) -> Result<T, PatchError> {
    parse(value).ok_or_else(|| PatchError::UnknownName {
        field,
        value: value.to_owned(),
    })
}

fn in_range(field: &'static str, value: i32, min: i32, max: i32) -> Result<i32, PatchError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(PatchError::OutOfRange {
            field,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        })
    }
}

fn output_range(kind: SynthKind, field: &'static str, value: i64, min: i64, max: i64) -> Result<(), PatchError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(PatchError::OutputRange {
            synth: kind.name(),
            field,
            value,
            min,
            max,
        })
    }
}

/// Pad an editor vector to the full slot count after checking its values.
fn ui_slots(
    field: &'static str,
    values: &[i32],
    min: i32,
    max: i32,
) -> Result<[i32; FM_UI_SLOTS], PatchError> {
    if !(FM_OPERATORS..=FM_UI_SLOTS).contains(&values.len()) {
        return Err(PatchError::VectorLength {
            field,
            len: values.len(),
        });
    }
    let mut slots = [0; FM_UI_SLOTS];
    for (slot, &value) in slots.iter_mut().zip(values) {
        *slot = in_range(field, value, min, max)?;
    }
    Ok(slots)
}
