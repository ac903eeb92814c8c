//! Global (non-per-voice) control streams: pitch bend, channel pressure,
//! and the three global modulation CCs. These are rendered once per block
//! and summed into every voice's corresponding output signal.
//!
//! In MPE mode, channel 1 is the "main channel" and plays the same role as
//! the single global stream in plain MIDI mode; channels 2-16 each carry
//! their own pitch bend and pressure, summed only into the voice currently
//! sounding on that channel.

use crate::change_list::ChangeList;

const MAX_CHANNELS: usize = 16;

#[derive(Clone, Debug)]
pub struct GlobalChangeLists {
    main_pitch_bend: ChangeList<32>,
    main_channel_pressure: ChangeList<32>,
    main_mod_a: ChangeList<32>,
    main_mod_b: ChangeList<32>,
    main_mod_c: ChangeList<32>,
    per_channel_pitch_bend: [ChangeList<32>; MAX_CHANNELS],
    per_channel_pressure: [ChangeList<32>; MAX_CHANNELS],

    // Rendered output, preallocated once to `max_block_size` and reused by
    // every `render` call - the audio thread never allocates.
    pitch_bend: Vec<f32>,
    channel_pressure: Vec<f32>,
    mod_a: Vec<f32>,
    mod_b: Vec<f32>,
    mod_c: Vec<f32>,
    per_channel_pitch_bend_out: [Vec<f32>; MAX_CHANNELS],
    per_channel_pressure_out: [Vec<f32>; MAX_CHANNELS],
}

impl Default for GlobalChangeLists {
    fn default() -> Self {
        GlobalChangeLists {
            main_pitch_bend: ChangeList::new(),
            main_channel_pressure: ChangeList::new(),
            main_mod_a: ChangeList::new(),
            main_mod_b: ChangeList::new(),
            main_mod_c: ChangeList::new(),
            per_channel_pitch_bend: std::array::from_fn(|_| ChangeList::new()),
            per_channel_pressure: std::array::from_fn(|_| ChangeList::new()),
            pitch_bend: Vec::new(),
            channel_pressure: Vec::new(),
            mod_a: Vec::new(),
            mod_b: Vec::new(),
            mod_c: Vec::new(),
            per_channel_pitch_bend_out: std::array::from_fn(|_| Vec::new()),
            per_channel_pressure_out: std::array::from_fn(|_| Vec::new()),
        }
    }
}

impl GlobalChangeLists {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preallocates every rendered output buffer to `max_block_size`
    /// samples. Must be called before the first [`Self::render`] (with a
    /// size at least as large as any `frames` passed to it); not itself
    /// part of the audio-thread hot path.
    pub fn set_max_block_size(&mut self, max_block_size: usize) {
        self.pitch_bend.resize(max_block_size, 0.0);
        self.channel_pressure.resize(max_block_size, 0.0);
        self.mod_a.resize(max_block_size, 0.0);
        self.mod_b.resize(max_block_size, 0.0);
        self.mod_c.resize(max_block_size, 0.0);
        for buf in &mut self.per_channel_pitch_bend_out {
            buf.resize(max_block_size, 0.0);
        }
        for buf in &mut self.per_channel_pressure_out {
            buf.resize(max_block_size, 0.0);
        }
    }

    pub fn set_sample_rate_and_glide(&mut self, sample_rate: f32, glide_time_seconds: f32) {
        self.main_pitch_bend.set_glide(sample_rate, glide_time_seconds);
        self.main_channel_pressure.set_glide(sample_rate, 0.0);
        self.main_mod_a.set_glide(sample_rate, glide_time_seconds);
        self.main_mod_b.set_glide(sample_rate, glide_time_seconds);
        self.main_mod_c.set_glide(sample_rate, glide_time_seconds);
        for cl in &mut self.per_channel_pitch_bend {
            cl.set_glide(sample_rate, glide_time_seconds);
        }
        for cl in &mut self.per_channel_pressure {
            cl.set_glide(sample_rate, 0.0);
        }
    }

    pub fn begin_block(&mut self) {
        self.main_pitch_bend.clear_changes();
        self.main_channel_pressure.clear_changes();
        self.main_mod_a.clear_changes();
        self.main_mod_b.clear_changes();
        self.main_mod_c.clear_changes();
        for cl in &mut self.per_channel_pitch_bend {
            cl.clear_changes();
        }
        for cl in &mut self.per_channel_pressure {
            cl.clear_changes();
        }
    }

    pub fn reset(&mut self) {
        self.main_pitch_bend.zero();
        self.main_channel_pressure.zero();
        self.main_mod_a.zero();
        self.main_mod_b.zero();
        self.main_mod_c.zero();
        for cl in &mut self.per_channel_pitch_bend {
            cl.zero();
        }
        for cl in &mut self.per_channel_pressure {
            cl.zero();
        }
    }

    /// `channel` is `1..=16`; channel `1` is always the "main" stream.
    pub fn add_pitch_bend(&mut self, channel: u8, time: usize, semitones: f32, mpe: bool) {
        if !mpe || channel == 1 {
            self.main_pitch_bend.add_change(semitones, time);
        } else {
            self.per_channel_pitch_bend[channel_index(channel)].add_change(semitones, time);
        }
    }

    pub fn add_channel_pressure(&mut self, channel: u8, time: usize, value: f32, mpe: bool) {
        if !mpe || channel == 1 {
            self.main_channel_pressure.add_change(value, time);
        } else {
            self.per_channel_pressure[channel_index(channel)].add_change(value, time);
        }
    }

    /// `axis` is `0`, `1`, or `2` for the three global mod streams (`mod`,
    /// `mod2`, `mod3`). Only the main-channel stream is modeled globally;
    /// per-voice MPE CCs on non-main channels are routed directly into the
    /// target voice's own modulation change lists by the dispatcher.
    pub fn add_main_mod(&mut self, axis: usize, time: usize, value: f32) {
        match axis {
            0 => self.main_mod_a.add_change(value, time),
            1 => self.main_mod_b.add_change(value, time),
            _ => self.main_mod_c.add_change(value, time),
        };
    }

    /// Renders every global stream into its preallocated output buffer.
    /// `frames` must not exceed the size passed to
    /// [`Self::set_max_block_size`]. The rendered streams are then read back
    /// through [`Self::pitch_bend_for_channel`], [`Self::pressure_for_channel`],
    /// and [`Self::mod_a`]/[`Self::mod_b`]/[`Self::mod_c`].
    pub fn render(&mut self, frames: usize) {
        debug_assert!(frames <= self.pitch_bend.len(), "render: frames exceeds max_block_size");
        self.main_pitch_bend
            .write_to_signal(&mut self.pitch_bend[..frames]);
        self.main_channel_pressure
            .write_to_signal(&mut self.channel_pressure[..frames]);
        self.main_mod_a.write_to_signal(&mut self.mod_a[..frames]);
        self.main_mod_b.write_to_signal(&mut self.mod_b[..frames]);
        self.main_mod_c.write_to_signal(&mut self.mod_c[..frames]);
        for (cl, buf) in self
            .per_channel_pitch_bend
            .iter_mut()
            .zip(self.per_channel_pitch_bend_out.iter_mut())
        {
            cl.write_to_signal(&mut buf[..frames]);
        }
        for (cl, buf) in self
            .per_channel_pressure
            .iter_mut()
            .zip(self.per_channel_pressure_out.iter_mut())
        {
            cl.write_to_signal(&mut buf[..frames]);
        }
    }

    #[must_use]
    pub fn pitch_bend_for_channel(&self, channel: u8, mpe: bool, frames: usize) -> &[f32] {
        if !mpe || channel == 1 {
            &self.pitch_bend[..frames]
        } else {
            &self.per_channel_pitch_bend_out[channel_index(channel)][..frames]
        }
    }

    #[must_use]
    pub fn pressure_for_channel(&self, channel: u8, mpe: bool, frames: usize) -> &[f32] {
        if !mpe || channel == 1 {
            &self.channel_pressure[..frames]
        } else {
            &self.per_channel_pressure_out[channel_index(channel)][..frames]
        }
    }

    #[must_use]
    pub fn mod_a(&self, frames: usize) -> &[f32] {
        &self.mod_a[..frames]
    }

    #[must_use]
    pub fn mod_b(&self, frames: usize) -> &[f32] {
        &self.mod_b[..frames]
    }

    #[must_use]
    pub fn mod_c(&self, frames: usize) -> &[f32] {
        &self.mod_c[..frames]
    }
}

fn channel_index(channel: u8) -> usize {
    (channel.saturating_sub(1) as usize).min(MAX_CHANNELS - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn non_mpe_channel_writes_always_go_to_main() {
        let mut globals = GlobalChangeLists::new();
        globals.set_max_block_size(4);
        globals.set_sample_rate_and_glide(100.0, 0.0);
        globals.add_pitch_bend(5, 0, 2.0, false);
        globals.render(4);
        assert_approx_eq!(globals.pitch_bend_for_channel(5, false, 4)[3], 2.0);
    }

    #[test]
    fn mpe_non_main_channel_is_isolated() {
        let mut globals = GlobalChangeLists::new();
        globals.set_max_block_size(4);
        globals.set_sample_rate_and_glide(100.0, 0.0);
        globals.add_pitch_bend(1, 0, 1.0, true);
        globals.add_pitch_bend(3, 0, -1.0, true);
        globals.render(4);
        assert_approx_eq!(globals.pitch_bend_for_channel(1, true, 4)[3], 1.0);
        assert_approx_eq!(globals.pitch_bend_for_channel(3, true, 4)[3], -1.0);
        assert_approx_eq!(globals.pitch_bend_for_channel(2, true, 4)[3], 0.0);
    }
}
