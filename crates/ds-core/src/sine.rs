//! Table sine and the phase-accumulating oscillator built on it.
//!
//! Angles use a signed 16-bit circular domain (65536 units per turn) and
//! results are 4.12 fixed point, `-4096..=4096`.

/// First quadrant of the sine, 257 points over 16384 angle units.
const QUARTER_WAVE: [i16; 257] = [
    0, 25, 50, 75, 101, 126, 151, 176, 201, 226, 251, 276, 301, 326, 351, 376,
    401, 426, 451, 476, 501, 526, 551, 576, 601, 626, 651, 675, 700, 725, 750, 774,
    799, 824, 848, 873, 897, 922, 946, 971, 995, 1020, 1044, 1068, 1092, 1117, 1141, 1165,
    1189, 1213, 1237, 1261, 1285, 1309, 1332, 1356, 1380, 1404, 1427, 1451, 1474, 1498, 1521, 1544,
    1567, 1591, 1614, 1637, 1660, 1683, 1706, 1729, 1751, 1774, 1797, 1819, 1842, 1864, 1886, 1909,
    1931, 1953, 1975, 1997, 2019, 2041, 2062, 2084, 2106, 2127, 2149, 2170, 2191, 2213, 2234, 2255,
    2276, 2296, 2317, 2338, 2359, 2379, 2399, 2420, 2440, 2460, 2480, 2500, 2520, 2540, 2559, 2579,
    2598, 2618, 2637, 2656, 2675, 2694, 2713, 2732, 2751, 2769, 2788, 2806, 2824, 2843, 2861, 2878,
    2896, 2914, 2932, 2949, 2967, 2984, 3001, 3018, 3035, 3052, 3068, 3085, 3102, 3118, 3134, 3150,
    3166, 3182, 3198, 3214, 3229, 3244, 3260, 3275, 3290, 3305, 3320, 3334, 3349, 3363, 3378, 3392,
    3406, 3420, 3433, 3447, 3461, 3474, 3487, 3500, 3513, 3526, 3539, 3551, 3564, 3576, 3588, 3600,
    3612, 3624, 3636, 3647, 3659, 3670, 3681, 3692, 3703, 3713, 3724, 3734, 3745, 3755, 3765, 3775,
    3784, 3794, 3803, 3812, 3822, 3831, 3839, 3848, 3857, 3865, 3873, 3881, 3889, 3897, 3905, 3912,
    3920, 3927, 3934, 3941, 3948, 3954, 3961, 3967, 3973, 3979, 3985, 3991, 3996, 4002, 4007, 4012,
    4017, 4022, 4027, 4031, 4036, 4040, 4044, 4048, 4052, 4055, 4059, 4062, 4065, 4068, 4071, 4074,
    4076, 4079, 4081, 4083, 4085, 4087, 4088, 4090, 4091, 4092, 4093, 4094, 4095, 4095, 4096, 4096,
    4096,
];

const QUARTER_TURN: u32 = 1 << 14;

/// Interpolated first-quadrant lookup, `pos` in `0..=QUARTER_TURN`.
fn quarter(pos: u32) -> i32 {
    let idx = (pos >> 6) as usize;
    let frac = (pos & 63) as i32;
    if idx >= QUARTER_WAVE.len() - 1 {
        return QUARTER_WAVE[QUARTER_WAVE.len() - 1] as i32;
    }
    let a = QUARTER_WAVE[idx] as i32;
    let b = QUARTER_WAVE[idx + 1] as i32;
    a + (((b - a) * frac) >> 6)
}

/// Sine of a 16-bit angle, linearly interpolated between table points.
pub fn sin_lerp(angle: i16) -> i16 {
    let a = angle as u16 as u32;
    let within = a & (QUARTER_TURN - 1);
    let value = match a >> 14 {
        0 => quarter(within),
        1 => quarter(QUARTER_TURN - within),
        2 => -quarter(within),
        _ => -quarter(QUARTER_TURN - within),
    };
    value as i16
}

/// Sine oscillator whose frequency may change on every call.
///
/// The frame counter advances independently of the requested frequency, so
/// frequency modulation never resets the phase.
#[derive(Clone, Debug)]
pub struct Sine {
    t: i64,
    sample_rate: i64,
}

impl Sine {
    /// Create an oscillator at phase zero.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            t: 0,
            sample_rate: sample_rate.max(1) as i64,
        }
    }

    /// Rewind to phase zero.
    pub fn reset(&mut self) {
        self.t = 0;
    }

    /// Next sample at `freq` Hz.
    pub fn sin(&mut self, freq: i32) -> i16 {
        let angle = (self.t * freq as i64 * 65536) / self.sample_rate;
        // One full second is a whole number of turns for integer frequencies.
        self.t += 1;
        if self.t >= self.sample_rate {
            self.t = 0;
        }
        sin_lerp(angle as i16)
    }
}
