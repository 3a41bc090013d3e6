//! SFZ instrument export: one looped WAV per MIDI note plus the
//! `export.sfz` that maps them.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ds_core::MIDI_TABLE;
use ds_engine::{CaptureError, Engine};
use ds_formats::{write_sfz, write_wav, FormatError, SfzRegion};
use thiserror::Error;
use tracing::{debug, info, warn};

/// File name of the instrument definition inside the export directory.
pub const SFZ_FILE_NAME: &str = "export.sfz";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("capture of {note} failed: {source}")]
    Capture {
        note: &'static str,
        #[source]
        source: CaptureError,
    },
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
    #[error("failed to encode audio: {0}")]
    Encode(#[from] FormatError),
    #[error(transparent)]
    Patch(#[from] crate::patch::PatchError),
}

/// What an export produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportSummary {
    pub sfz_path: PathBuf,
    pub regions: usize,
    pub total_samples: usize,
}

/// Capture every MIDI note from the engine's active synth into `dir`.
///
/// All captures finish before `export.sfz` is written, so a failed export
/// never leaves an instrument file pointing at missing samples.
pub fn export_sfz(engine: &mut Engine, dir: &Path) -> Result<ExportSummary, ExportError> {
    let sample_rate = engine.sample_rate();
    let synth = engine.active().info().name;
    info!(synth, dir = %dir.display(), "starting sfz export");

    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut regions = Vec::with_capacity(MIDI_TABLE.len());
    let mut total_samples = 0;
    for entry in &MIDI_TABLE {
        let capture = engine
            .capture(entry.pitch)
            .map_err(|source| {
                warn!(note = entry.name, freq = entry.pitch, %source, "capture failed");
                ExportError::Capture {
                    note: entry.name,
                    source,
                }
            })?;

        let file_name = format!("{}.wav", entry.name);
        let path = dir.join(&file_name);
        write_file(&path, |w| write_wav(w, &capture.samples, sample_rate))?;
        debug!(
            note = entry.name,
            key = entry.key,
            samples = capture.samples.len(),
            loop_start = capture.loop_start,
            loop_end = capture.loop_end,
            "captured"
        );

        total_samples += capture.samples.len();
        regions.push(SfzRegion {
            sample: file_name,
            key: entry.key,
            loop_start: capture.loop_start,
            loop_end: capture.loop_end,
        });
    }

    let sfz_path = dir.join(SFZ_FILE_NAME);
    write_file(&sfz_path, |w| write_sfz(w, &regions))?;
    info!(
        regions = regions.len(),
        total_samples,
        path = %sfz_path.display(),
        "sfz export finished"
    );

    Ok(ExportSummary {
        sfz_path,
        regions: regions.len(),
        total_samples,
    })
}

fn write_file(
    path: &Path,
    encode: impl FnOnce(&mut BufWriter<File>) -> Result<(), FormatError>,
) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut w = BufWriter::new(File::create(path).map_err(io_err)?);
    encode(&mut w).map_err(|source| match source {
        FormatError::Io(source) => io_err(source),
        source => ExportError::Format {
            path: path.to_path_buf(),
            source,
        },
    })?;
    w.flush().map_err(io_err)
}
