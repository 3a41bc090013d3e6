//! SFZ instrument text for looped single-note samples.

use std::fmt::Write as _;
use std::io::Write;

use crate::FormatError;

/// Opening of every exported instrument: all regions loop while held.
pub const SFZ_GLOBAL_HEADER: &str = "<global> loop_mode=loop_continuous\n\n";

/// One sample mapped onto one MIDI key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SfzRegion {
    /// Sample file name relative to the `.sfz` file.
    pub sample: String,
    pub key: u8,
    pub loop_start: u32,
    pub loop_end: u32,
}

impl SfzRegion {
    fn append_to(&self, out: &mut String) {
        // Writing to a String cannot fail
        let _ = write!(
            out,
            "<region> sample={} key={} loop_start={} loop_end={}\n\n",
            self.sample, self.key, self.loop_start, self.loop_end
        );
    }
}

/// Render a full instrument.
pub fn sfz_to_string(regions: &[SfzRegion]) -> String {
    let mut out = String::from(SFZ_GLOBAL_HEADER);
    for region in regions {
        region.append_to(&mut out);
    }
    out
}

pub fn write_sfz(w: &mut impl Write, regions: &[SfzRegion]) -> Result<(), FormatError> {
    w.write_all(sfz_to_string(regions).as_bytes())?;
    Ok(())
}
