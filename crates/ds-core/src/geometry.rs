//! Fixed table geometry and engine-wide sizes.
//!
//! Table dimensions derive from the drawing area of the editor screen:
//! one table slot per pixel column and one amplitude step per pixel row
//! inside the padded border.

/// Width of the editor screen in pixels.
pub const SCREEN_WIDTH: usize = 256;

/// Height of the editor screen in pixels.
pub const SCREEN_HEIGHT: usize = 192;

/// Border around the drawing area in pixels.
pub const SCREEN_PADDING: usize = 10;

/// Number of slots in every waveform and transition table.
pub const TABLE_LENGTH: usize = SCREEN_WIDTH - 2 * SCREEN_PADDING + 1;

/// Exclusive upper bound of table values (values are `0..TABLE_MAX`).
pub const TABLE_MAX: usize = SCREEN_HEIGHT - 2 * SCREEN_PADDING + 1;

/// Length of the attack and release ramps, in frames.
pub const DEPOP_FRAMES: i32 = 50;

/// Number of polyphonic voice slots (one per piano key).
pub const VOICE_COUNT: usize = 13;

/// Capacity of a per-voice burst buffer.
///
/// Burst algorithms size their buffer as `sample_rate / freq`; the length is
/// clamped to this capacity so low notes saturate instead of overrunning.
pub const MAX_BURST_LENGTH: usize = 3000;

const _: () = assert!(TABLE_LENGTH == 237);
const _: () = assert!(TABLE_MAX == 173);
const _: () = assert!(TABLE_MAX <= TABLE_LENGTH);
