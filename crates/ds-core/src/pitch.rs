//! Pitch tables: the piano's equal-tempered integer frequencies and the
//! MIDI note table used for sample export.

/// Integer frequencies (Hz) for ten octaves starting at A (14 Hz).
///
/// The piano indexes this with `root + 12 * octave + key`.
pub const PIANO_PITCHES: [i32; 120] = [
    14, 15, 15, 16, 17, 18, 19, 21, 22, 23, 24, 26,
    28, 29, 31, 33, 35, 37, 39, 41, 44, 46, 49, 52,
    55, 58, 62, 65, 69, 73, 78, 82, 87, 92, 98, 104,
    110, 117, 123, 131, 139, 147, 156, 165, 175, 185, 196, 208,
    220, 233, 247, 262, 277, 294, 311, 330, 349, 370, 392, 415,
    440, 466, 494, 523, 554, 587, 622, 659, 698, 740, 784, 831,
    880, 932, 988, 1047, 1109, 1175, 1245, 1319, 1397, 1480, 1568, 1661,
    1760, 1865, 1976, 2093, 2217, 2349, 2489, 2637, 2794, 2960, 3136, 3322,
    3520, 3729, 3951, 4186, 4435, 4699, 4978, 5274, 5588, 5920, 6272, 6645,
    7040, 7459, 7902, 8372, 8870, 9397, 9956, 10548, 11175, 11840, 12544, 13290,
];

/// Note names of the piano table, starting at A.
pub const NOTE_NAMES: [&str; 12] = [
    "A", "A#/Bb", "B", "C", "C#/Db", "D", "D#/Eb", "E", "F", "F#/Gb", "G", "G#/Ab",
];

/// One MIDI key: the exported file stem, key number and integer pitch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MidiEntry {
    pub name: &'static str,
    pub key: u8,
    pub pitch: i32,
}

impl MidiEntry {
    const fn new(name: &'static str, key: u8, pitch: i32) -> Self {
        Self { name, key, pitch }
    }
}

/// All 128 MIDI keys in key order.
pub const MIDI_TABLE: [MidiEntry; 128] = [
    MidiEntry::new("C-2", 0, 8),
    MidiEntry::new("C#-2", 1, 8),
    MidiEntry::new("D-2", 2, 9),
    MidiEntry::new("D#-2", 3, 9),
    MidiEntry::new("E-2", 4, 10),
    MidiEntry::new("F-2", 5, 10),
    MidiEntry::new("F#-2", 6, 11),
    MidiEntry::new("G-2", 7, 12),
    MidiEntry::new("G#-2", 8, 12),
    MidiEntry::new("A-1", 9, 13),
    MidiEntry::new("A#-1", 10, 14),
    MidiEntry::new("B-1", 11, 15),
    MidiEntry::new("C-1", 12, 16),
    MidiEntry::new("C#-1", 13, 17),
    MidiEntry::new("D-1", 14, 18),
    MidiEntry::new("D#-1", 15, 19),
    MidiEntry::new("E-1", 16, 20),
    MidiEntry::new("F-1", 17, 21),
    MidiEntry::new("F#-1", 18, 23),
    MidiEntry::new("G-1", 19, 24),
    MidiEntry::new("G#-1", 20, 25),
    MidiEntry::new("A0", 21, 27),
    MidiEntry::new("A#0", 22, 29),
    MidiEntry::new("B0", 23, 30),
    MidiEntry::new("C0", 24, 32),
    MidiEntry::new("C#0", 25, 34),
    MidiEntry::new("D0", 26, 36),
    MidiEntry::new("D#0", 27, 38),
    MidiEntry::new("E0", 28, 41),
    MidiEntry::new("F0", 29, 43),
    MidiEntry::new("F#0", 30, 46),
    MidiEntry::new("G0", 31, 48),
    MidiEntry::new("G#0", 32, 51),
    MidiEntry::new("A1", 33, 55),
    MidiEntry::new("A#1", 34, 58),
    MidiEntry::new("B1", 35, 61),
    MidiEntry::new("C1", 36, 65),
    MidiEntry::new("C#1", 37, 69),
    MidiEntry::new("D1", 38, 73),
    MidiEntry::new("D#1", 39, 77),
    MidiEntry::new("E1", 40, 82),
    MidiEntry::new("F1", 41, 87),
    MidiEntry::new("F#1", 42, 92),
    MidiEntry::new("G1", 43, 97),
    MidiEntry::new("G#1", 44, 103),
    MidiEntry::new("A2", 45, 110),
    MidiEntry::new("A#2", 46, 116),
    MidiEntry::new("B2", 47, 123),
    MidiEntry::new("C2", 48, 130),
    MidiEntry::new("C#2", 49, 138),
    MidiEntry::new("D2", 50, 146),
    MidiEntry::new("D#2", 51, 155),
    MidiEntry::new("E2", 52, 164),
    MidiEntry::new("F2", 53, 174),
    MidiEntry::new("F#2", 54, 184),
    MidiEntry::new("G2", 55, 195),
    MidiEntry::new("G#2", 56, 207),
    MidiEntry::new("A3", 57, 220),
    MidiEntry::new("A#3", 58, 233),
    MidiEntry::new("B3", 59, 246),
    MidiEntry::new("C3", 60, 261),
    MidiEntry::new("C#3", 61, 277),
    MidiEntry::new("D3", 62, 293),
    MidiEntry::new("D#3", 63, 311),
    MidiEntry::new("E3", 64, 329),
    MidiEntry::new("F3", 65, 349),
    MidiEntry::new("F#3", 66, 369),
    MidiEntry::new("G3", 67, 391),
    MidiEntry::new("G#3", 68, 415),
    MidiEntry::new("A4", 69, 440),
    MidiEntry::new("A#4", 70, 466),
    MidiEntry::new("B4", 71, 493),
    MidiEntry::new("C4", 72, 523),
    MidiEntry::new("C#4", 73, 554),
    MidiEntry::new("D4", 74, 587),
    MidiEntry::new("D#4", 75, 622),
    MidiEntry::new("E4", 76, 659),
    MidiEntry::new("F4", 77, 698),
    MidiEntry::new("F#4", 78, 739),
    MidiEntry::new("G4", 79, 783),
    MidiEntry::new("G#4", 80, 830),
    MidiEntry::new("A5", 81, 880),
    MidiEntry::new("A#5", 82, 932),
    MidiEntry::new("B5", 83, 987),
    MidiEntry::new("C5", 84, 1046),
    MidiEntry::new("C#5", 85, 1108),
    MidiEntry::new("D5", 86, 1174),
    MidiEntry::new("D#5", 87, 1244),
    MidiEntry::new("E5", 88, 1318),
    MidiEntry::new("F5", 89, 1396),
    MidiEntry::new("F#5", 90, 1479),
    MidiEntry::new("G5", 91, 1567),
    MidiEntry::new("G#5", 92, 1661),
    MidiEntry::new("A6", 93, 1760),
    MidiEntry::new("A#6", 94, 1864),
    MidiEntry::new("B6", 95, 1975),
    MidiEntry::new("C6", 96, 2093),
    MidiEntry::new("C#6", 97, 2217),
    MidiEntry::new("D6", 98, 2349),
    MidiEntry::new("D#6", 99, 2489),
    MidiEntry::new("E6", 100, 2637),
    MidiEntry::new("F6", 101, 2793),
    MidiEntry::new("F#6", 102, 2959),
    MidiEntry::new("G6", 103, 3135),
    MidiEntry::new("G#6", 104, 3322),
    MidiEntry::new("A7", 105, 3520),
    MidiEntry::new("A#7", 106, 3729),
    MidiEntry::new("B7", 107, 3951),
    MidiEntry::new("C7", 108, 4186),
    MidiEntry::new("C#7", 109, 4434),
    MidiEntry::new("D7", 110, 4698),
    MidiEntry::new("D#7", 111, 4978),
    MidiEntry::new("E7", 112, 5274),
    MidiEntry::new("F7", 113, 5587),
    MidiEntry::new("F#7", 114, 5919),
    MidiEntry::new("G7", 115, 6271),
    MidiEntry::new("G#7", 116, 6644),
    MidiEntry::new("A8", 117, 7040),
    MidiEntry::new("A#8", 118, 7458),
    MidiEntry::new("B8", 119, 7902),
    MidiEntry::new("C8", 120, 8372),
    MidiEntry::new("C#8", 121, 8869),
    MidiEntry::new("D8", 122, 9397),
    MidiEntry::new("D#8", 123, 9956),
    MidiEntry::new("E8", 124, 10548),
    MidiEntry::new("F8", 125, 11175),
    MidiEntry::new("F#8", 126, 11839),
    MidiEntry::new("G8", 127, 12543),
];

/// Look up a MIDI key.
pub fn midi_entry(key: u8) -> Option<&'static MidiEntry> {
    MIDI_TABLE.get(key as usize)
}
