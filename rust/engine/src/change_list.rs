//! Time-stamped scalar change lists, rendered into per-sample output with a
//! configurable linear glide that persists across block boundaries.
//!
//! This is the sample-accurate core of the whole crate: every voice
//! parameter (pitch, gate, amplitude, ...) and every global stream (pitch
//! bend, channel pressure, ...) is one of these.

use arrayvec::ArrayVec;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Change {
    time: usize,
    value: f32,
}

/// A bounded, time-ordered list of `(time, value)` changes for a single
/// parameter, plus the glide state needed to slew smoothly between them.
///
/// `MAX_CHANGES` bounds how many distinct changes a single block may carry
/// for this parameter - in practice this is "one key event per sample" in
/// the worst case, so a small bound (16-32) is plenty for anything but
/// pathological input.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeList<const MAX_CHANGES: usize = 16> {
    changes: ArrayVec<Change, MAX_CHANGES>,
    last_change_time: Option<usize>,

    current_value: f32,
    glide_start_value: f32,
    glide_end_value: f32,
    glide_counter: usize,

    glide_in_samples: usize,
    inv_glide_in_samples: f32,
}

impl<const MAX_CHANGES: usize> Default for ChangeList<MAX_CHANGES> {
    fn default() -> Self {
        ChangeList {
            changes: ArrayVec::new(),
            last_change_time: None,
            current_value: 0.0,
            glide_start_value: 0.0,
            glide_end_value: 0.0,
            glide_counter: 0,
            glide_in_samples: 0,
            inv_glide_in_samples: 0.0,
        }
    }
}

impl<const MAX_CHANGES: usize> ChangeList<MAX_CHANGES> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the glide time in seconds, given the current sample rate. A
    /// glide time of zero makes every change an instantaneous step.
    pub fn set_glide(&mut self, sample_rate: f32, glide_time_seconds: f32) {
        let samples = (sample_rate * glide_time_seconds).round();
        self.glide_in_samples = if samples > 0.0 { samples as usize } else { 0 };
        self.inv_glide_in_samples = if self.glide_in_samples > 0 {
            1.0 / self.glide_in_samples as f32
        } else {
            0.0
        };
    }

    /// Appends a change at `time` (a sample offset within the next call to
    /// [`Self::write_to_signal`]). Returns `false` and drops the change if
    /// `time` is earlier than the previous change in this block, or if the
    /// list is already full - both are documented silent-failure modes.
    pub fn add_change(&mut self, value: f32, time: usize) -> bool {
        if let Some(last) = self.last_change_time {
            if time < last {
                log::trace!("conformal_poly_input: dropping out-of-order change at {time}");
                return false;
            }
        }
        if self.changes.try_push(Change { time, value }).is_err() {
            log::trace!("conformal_poly_input: change list full, dropping change");
            return false;
        }
        self.last_change_time = Some(time);
        true
    }

    /// Drops pending changes for the block that just ended, but keeps
    /// `current_value` and any in-flight glide - a glide started near the
    /// end of one block keeps sliding into the next.
    pub fn clear_changes(&mut self) {
        self.changes.clear();
        self.last_change_time = None;
    }

    /// Forces every piece of state, including the current value and any
    /// in-flight glide, to zero.
    pub fn zero(&mut self) {
        self.clear_changes();
        self.current_value = 0.0;
        self.glide_start_value = 0.0;
        self.glide_end_value = 0.0;
        self.glide_counter = 0;
    }

    #[must_use]
    pub fn current_value(&self) -> f32 {
        self.current_value
    }

    /// Renders `out.len()` samples, consuming this block's pending
    /// changes in time order and slewing toward each target at the
    /// configured glide rate.
    pub fn write_to_signal(&mut self, out: &mut [f32]) {
        let mut next = 0;
        for (i, sample) in out.iter_mut().enumerate() {
            while next < self.changes.len() && self.changes[next].time == i {
                self.glide_start_value = self.current_value;
                self.glide_end_value = self.changes[next].value;
                self.glide_counter = self.glide_in_samples;
                if self.glide_counter == 0 {
                    self.current_value = self.glide_end_value;
                }
                next += 1;
            }
            if self.glide_counter > 0 {
                let step = (self.glide_end_value - self.glide_start_value) * self.inv_glide_in_samples;
                self.current_value += step;
                self.glide_counter -= 1;
                if self.glide_counter == 0 {
                    self.current_value = self.glide_end_value;
                }
            }
            *sample = self.current_value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn zero_glide_time_is_a_step_function() {
        let mut cl = ChangeList::<8>::new();
        cl.set_glide(100.0, 0.0);
        cl.add_change(1.0, 2);
        let mut out = [0.0_f32; 5];
        cl.write_to_signal(&mut out);
        assert_eq!(out, [0.0, 0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn glide_slews_linearly_toward_target() {
        let mut cl = ChangeList::<8>::new();
        cl.set_glide(4.0, 1.0); // glide_in_samples = 4
        cl.add_change(4.0, 0);
        let mut out = [0.0_f32; 5];
        cl.write_to_signal(&mut out);
        assert_approx_eq!(out[0], 1.0);
        assert_approx_eq!(out[1], 2.0);
        assert_approx_eq!(out[2], 3.0);
        assert_approx_eq!(out[3], 4.0);
        assert_approx_eq!(out[4], 4.0);
    }

    #[test]
    fn glide_persists_across_block_boundary() {
        let mut cl = ChangeList::<8>::new();
        cl.set_glide(4.0, 1.0);
        cl.add_change(4.0, 0);
        let mut first = [0.0_f32; 2];
        cl.write_to_signal(&mut first);
        assert_approx_eq!(first[1], 2.0);

        cl.clear_changes();
        let mut second = [0.0_f32; 2];
        cl.write_to_signal(&mut second);
        assert_approx_eq!(second[0], 3.0);
        assert_approx_eq!(second[1], 4.0);
    }

    #[test]
    fn retargeting_mid_glide_starts_from_current_value() {
        let mut cl = ChangeList::<8>::new();
        cl.set_glide(4.0, 1.0);
        cl.add_change(4.0, 0);
        cl.add_change(0.0, 2);
        let mut out = [0.0_f32; 6];
        cl.write_to_signal(&mut out);
        assert_approx_eq!(out[0], 1.0);
        assert_approx_eq!(out[1], 2.0);
        // retarget to 0.0 starting from 2.0, still 4-sample glide
        assert_approx_eq!(out[2], 1.5);
        assert_approx_eq!(out[3], 1.0);
        assert_approx_eq!(out[4], 0.5);
        assert_approx_eq!(out[5], 0.0);
    }

    #[test]
    fn out_of_order_change_is_dropped() {
        let mut cl = ChangeList::<8>::new();
        cl.add_change(1.0, 5);
        assert!(!cl.add_change(2.0, 3));
    }

    #[test]
    fn capacity_exceeded_is_dropped() {
        let mut cl = ChangeList::<2>::new();
        assert!(cl.add_change(1.0, 0));
        assert!(cl.add_change(2.0, 1));
        assert!(!cl.add_change(3.0, 2));
    }

    #[test]
    fn zero_resets_in_flight_glide() {
        let mut cl = ChangeList::<8>::new();
        cl.set_glide(4.0, 1.0);
        cl.add_change(4.0, 0);
        let mut out = [0.0_f32; 2];
        cl.write_to_signal(&mut out);
        cl.zero();
        assert_approx_eq!(cl.current_value(), 0.0);
        let mut after = [0.0_f32; 1];
        cl.write_to_signal(&mut after);
        assert_approx_eq!(after[0], 0.0);
    }
}
