//! Slow per-voice pitch drift: a fixed constant offset per voice plus
//! fresh uniform noise, recomputed every `drift_interval_samples` and
//! slewed into each voice's drift change list with a long glide time so
//! the transition is inaudible as a step.

use rand::Rng;

/// Per-voice constant drift offsets. Sixteen entries; voices beyond index
/// 15 wrap around (`voice_index % 16`).
const DRIFT_CONSTANTS: [f32; 16] = [
    0.465, 0.005, 0.013, 0.019, 0.155, 0.933, 0.002, 0.024, 0.943, 0.924, 0.139, 0.501, 0.196,
    0.591, 0.961, 0.442,
];

/// Drift cadence and scaling. The engine advances drift roughly every ten
/// seconds of audio, not every block - see [`DriftSchedule::due`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriftSchedule {
    interval_samples: usize,
    samples_until_next: usize,
    constants_amount: f32,
    random_amount: f32,
}

impl DriftSchedule {
    #[must_use]
    pub fn new(sample_rate: f32, constants_amount: f32, random_amount: f32) -> Self {
        let interval_samples = (sample_rate * 10.0).round() as usize;
        DriftSchedule {
            interval_samples: interval_samples.max(1),
            samples_until_next: interval_samples.max(1),
            constants_amount,
            random_amount,
        }
    }

    /// Advances the schedule by `frames` samples and reports how many
    /// times it became due during that span (almost always `0` or `1` at
    /// typical block sizes).
    pub fn advance(&mut self, frames: usize) -> usize {
        let mut due = 0;
        let mut remaining = frames;
        while remaining >= self.samples_until_next {
            remaining -= self.samples_until_next;
            self.samples_until_next = self.interval_samples;
            due += 1;
        }
        self.samples_until_next -= remaining;
        due
    }

    /// The scaled `(constant, random)` pair for `voice_index`, for each
    /// time [`Self::advance`] reported this schedule became due.
    pub fn sample(&self, voice_index: usize, rng: &mut impl Rng) -> (f32, f32) {
        let constant = DRIFT_CONSTANTS[voice_index % DRIFT_CONSTANTS.len()] * self.constants_amount;
        let random = rng.gen_range(-1.0_f32..=1.0_f32) * self.random_amount;
        (constant, random)
    }

    /// Updates the scaling amounts applied to future drift samples. The
    /// cadence itself (`interval_samples`) is unaffected.
    pub fn set_amounts(&mut self, constants_amount: f32, random_amount: f32) {
        self.constants_amount = constants_amount;
        self.random_amount = random_amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn becomes_due_once_per_interval() {
        let mut schedule = DriftSchedule::new(100.0, 0.004, 0.002);
        assert_eq!(schedule.advance(500), 0);
        assert_eq!(schedule.advance(500), 1);
    }

    #[test]
    fn sample_scales_constant_and_random_terms() {
        let schedule = DriftSchedule::new(100.0, 0.004, 0.002);
        let mut rng = StdRng::seed_from_u64(42);
        let (constant, random) = schedule.sample(0, &mut rng);
        assert_eq!(constant, DRIFT_CONSTANTS[0] * 0.004);
        assert!(random.abs() <= 0.002);
    }

    #[test]
    fn constant_table_wraps_past_sixteen_voices() {
        let schedule = DriftSchedule::new(100.0, 1.0, 0.0);
        let mut rng = StdRng::seed_from_u64(0);
        let (c0, _) = schedule.sample(0, &mut rng);
        let (c16, _) = schedule.sample(16, &mut rng);
        assert_eq!(c0, c16);
    }

    #[test]
    fn set_amounts_rescales_future_samples() {
        let mut schedule = DriftSchedule::new(100.0, 0.004, 0.002);
        schedule.set_amounts(1.0, 0.0);
        let mut rng = StdRng::seed_from_u64(0);
        let (constant, random) = schedule.sample(0, &mut rng);
        assert_eq!(constant, DRIFT_CONSTANTS[0]);
        assert_eq!(random, 0.0);
    }
}
