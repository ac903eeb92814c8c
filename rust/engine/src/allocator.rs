//! Voice allocation policy: decide which voice an incoming note claims.

use crate::voice::{Voice, VoiceState};

/// Rotating free/steal allocator implementing the three-pass policy:
/// prefer an idle voice, then a voice whose key is no longer held (only
/// sounding because the sustain pedal is down), then steal the oldest
/// sounding voice. Rotation makes identical input sequences always produce
/// identical voice assignments.
#[derive(Clone, Debug)]
pub struct VoiceAllocator {
    // `usize::MAX` is a sentinel meaning "nothing allocated yet" - paired
    // with the `wrapping_add` in `rotate_find`, it makes the very first
    // allocation start its scan at index 0 rather than 1.
    last_allocated: usize,
}

impl Default for VoiceAllocator {
    fn default() -> Self {
        VoiceAllocator {
            last_allocated: usize::MAX,
        }
    }
}

impl VoiceAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.last_allocated = usize::MAX;
    }

    /// Picks a voice index in `0..voices.len()`. `is_key_held(v)` should
    /// report whether voice `v`'s note is still physically held (as
    /// opposed to sounding only because of the sustain pedal).
    ///
    /// Panics if `voices` is empty; polyphony zero means no notes should
    /// ever reach the allocator.
    pub fn allocate(&mut self, voices: &[Voice], is_key_held: impl Fn(usize) -> bool) -> usize {
        let n = voices.len();
        assert!(n > 0, "cannot allocate from an empty voice pool");

        if let Some(idx) = rotate_find(n, self.last_allocated, |i| voices[i].state() == VoiceState::Off) {
            self.last_allocated = idx;
            return idx;
        }

        if let Some(idx) = rotate_find(n, self.last_allocated, |i| !is_key_held(i)) {
            self.last_allocated = idx;
            return idx;
        }

        let mut oldest = 0;
        let mut oldest_age = voices[0].age();
        for (i, voice) in voices.iter().enumerate().skip(1) {
            if voice.age() > oldest_age {
                oldest = i;
                oldest_age = voice.age();
            }
        }
        self.last_allocated = oldest;
        oldest
    }
}

/// Scans `n` indices starting just after `start`, wrapping around, and
/// returns the first one for which `pred` holds. `start` may be
/// `usize::MAX` (the allocator's "nothing allocated yet" sentinel); the
/// `wrapping_add` makes that scan start at index `0`.
fn rotate_find(n: usize, start: usize, pred: impl Fn(usize) -> bool) -> Option<usize> {
    (1..=n)
        .map(|step| start.wrapping_add(step) % n)
        .find(|&idx| pred(idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::Scale;

    fn voices(n: usize) -> Vec<Voice> {
        (0..n).map(|_| Voice::new()).collect()
    }

    #[test]
    fn prefers_idle_voice() {
        let mut allocator = VoiceAllocator::new();
        let mut vs = voices(4);
        vs[1].sound_note(&Scale::default(), 1, 1, 0, 60.0, 0.5, false);
        let idx = allocator.allocate(&vs, |_| true);
        assert_eq!(idx, 0);
    }

    #[test]
    fn rotates_across_idle_voices() {
        let mut allocator = VoiceAllocator::new();
        let vs = voices(4);
        let first = allocator.allocate(&vs, |_| true);
        let second = allocator.allocate(&vs, |_| true);
        assert_eq!(first, 0);
        assert_eq!(second, 1);
    }

    #[test]
    fn prefers_unheld_sounding_voice_over_steal() {
        let mut allocator = VoiceAllocator::new();
        let mut vs = voices(2);
        vs[0].sound_note(&Scale::default(), 1, 1, 0, 60.0, 0.5, false);
        vs[1].sound_note(&Scale::default(), 1, 2, 0, 62.0, 0.5, false);
        // voice 0's key is no longer held (sustain-held); voice 1's is.
        let idx = allocator.allocate(&vs, |v| v != 0);
        assert_eq!(idx, 0);
    }

    #[test]
    fn sustained_voice_is_not_treated_as_free() {
        let mut allocator = VoiceAllocator::new();
        let mut vs = voices(2);
        vs[0].sound_note(&Scale::default(), 1, 1, 0, 60.0, 0.5, false);
        vs[0].release_note(0, true); // held by the pedal, still sounding
        // Every voice reports its key as still held, so pass 2 cannot
        // reclaim anything either - only pass 1's `Off` check should
        // distinguish the idle voice 1 from the sounding (Sustain) voice 0.
        let idx = allocator.allocate(&vs, |_| true);
        assert_eq!(idx, 1, "pass 1 must skip a Sustain voice, not reclaim it as idle");
    }

    #[test]
    fn steals_oldest_voice_when_all_keys_held() {
        let mut allocator = VoiceAllocator::new();
        let mut vs = voices(2);
        vs[0].sound_note(&Scale::default(), 1, 1, 0, 60.0, 0.5, false);
        vs[0].advance_age(100);
        vs[1].sound_note(&Scale::default(), 1, 2, 0, 62.0, 0.5, false);
        vs[1].advance_age(10);
        let idx = allocator.allocate(&vs, |_| true);
        assert_eq!(idx, 0);
    }
}
