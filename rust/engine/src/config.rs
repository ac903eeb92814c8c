//! Caller-facing configuration. Every setter clamps its input into a valid
//! range rather than returning an error - per the crate's error-handling
//! policy, invalid configuration is a silent local recovery, not a
//! propagated failure. Clamping emits a `log::warn!` so a host application
//! can surface it in a debug build.

/// Which wire protocol is feeding events, and therefore which dispatch
/// rules and default glide times apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Protocol {
    /// Plain MIDI: one shared pitch-bend/pressure/CC stream for the whole
    /// instrument.
    #[default]
    Midi,
    /// MIDI Polyphonic Expression: channel 1 is the "main" voice, and
    /// every other channel carries its own pitch bend and pressure.
    MidiMpe,
    /// Continuous-touch control surface delivering `NoteUpdate` events.
    Osc,
}

/// Maximum polyphony this crate supports; voice arrays are fixed-size and
/// sized to this bound.
pub const MAX_VOICES: usize = 32;

/// Run-time-adjustable parameters. See the crate documentation's
/// configuration table for the effect of each field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    voices: usize,
    protocol: Protocol,
    data_rate: f32,
    bend_semitones: f32,
    bend_mpe_semitones: f32,
    mod_cc_base: u8,
    mod_mpe_x_cc: u8,
    unison: bool,
    glide_seconds: f32,
    master_tune_hz: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            voices: 8,
            protocol: Protocol::Midi,
            data_rate: 100.0,
            bend_semitones: 2.0,
            bend_mpe_semitones: 48.0,
            mod_cc_base: 1,
            mod_mpe_x_cc: 74,
            unison: false,
            glide_seconds: 0.0,
            master_tune_hz: 440.0,
        }
    }
}

impl Config {
    #[must_use]
    pub fn voices(&self) -> usize {
        self.voices
    }

    /// Sets polyphony, clamped to `[0, MAX_VOICES]`. The caller is expected
    /// to follow this with a full reset, since changing voice count
    /// invalidates voice indices held elsewhere.
    pub fn set_voices(&mut self, voices: usize) {
        let clamped = voices.min(MAX_VOICES);
        if clamped != voices {
            log::warn!("conformal_poly_input: clamping voices {voices} to {clamped}");
        }
        self.voices = clamped;
    }

    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn set_protocol(&mut self, protocol: Protocol) {
        self.protocol = protocol;
    }

    #[must_use]
    pub fn data_rate(&self) -> f32 {
        self.data_rate
    }

    /// Sets the target OSC input rate in Hz, clamped to a sane positive
    /// range. This also determines the default glide time (`1/rate`) used
    /// in OSC mode.
    pub fn set_data_rate(&mut self, hz: f32) {
        let clamped = clamp_finite(hz, 1.0, 2000.0);
        self.data_rate = clamped;
    }

    #[must_use]
    pub fn bend_semitones(&self) -> f32 {
        self.bend_semitones
    }

    pub fn set_bend_semitones(&mut self, semitones: f32) {
        self.bend_semitones = clamp_finite(semitones, 0.0, 96.0);
    }

    #[must_use]
    pub fn bend_mpe_semitones(&self) -> f32 {
        self.bend_mpe_semitones
    }

    pub fn set_bend_mpe_semitones(&mut self, semitones: f32) {
        self.bend_mpe_semitones = clamp_finite(semitones, 0.0, 96.0);
    }

    #[must_use]
    pub fn mod_cc_base(&self) -> u8 {
        self.mod_cc_base
    }

    /// Sets the base CC number for the three global modulation streams
    /// (`mod_cc_base`, `+1`, `+2`), clamped so the third stream stays a
    /// valid CC number.
    pub fn set_mod_cc_base(&mut self, cc: u8) {
        self.mod_cc_base = cc.min(125);
    }

    #[must_use]
    pub fn mod_mpe_x_cc(&self) -> u8 {
        self.mod_mpe_x_cc
    }

    pub fn set_mod_mpe_x_cc(&mut self, cc: u8) {
        self.mod_mpe_x_cc = cc.min(127);
    }

    #[must_use]
    pub fn unison(&self) -> bool {
        self.unison
    }

    pub fn set_unison(&mut self, unison: bool) {
        self.unison = unison;
    }

    #[must_use]
    pub fn glide_seconds(&self) -> f32 {
        self.glide_seconds
    }

    pub fn set_glide_seconds(&mut self, seconds: f32) {
        self.glide_seconds = clamp_finite(seconds, 0.0, 10.0);
    }

    #[must_use]
    pub fn master_tune_hz(&self) -> f32 {
        self.master_tune_hz
    }

    /// Sets the reference pitch in Hz, clamped to a musically sane range.
    /// `NaN` and other non-finite values are rejected in favor of the
    /// previous value.
    pub fn set_master_tune_hz(&mut self, hz: f32) {
        if !hz.is_finite() {
            log::warn!("conformal_poly_input: ignoring non-finite master tune {hz}");
            return;
        }
        self.master_tune_hz = hz.clamp(20.0, 20000.0);
    }
}

fn clamp_finite(value: f32, low: f32, high: f32) -> f32 {
    if !value.is_finite() {
        log::warn!("conformal_poly_input: clamping non-finite value to {low}");
        return low;
    }
    value.clamp(low, high)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voices_above_max_are_clamped() {
        let mut config = Config::default();
        config.set_voices(1000);
        assert_eq!(config.voices(), MAX_VOICES);
    }

    #[test]
    fn non_finite_master_tune_is_ignored() {
        let mut config = Config::default();
        let before = config.master_tune_hz();
        config.set_master_tune_hz(f32::NAN);
        assert_eq!(config.master_tune_hz(), before);
    }

    #[test]
    fn negative_glide_is_clamped_to_zero() {
        let mut config = Config::default();
        config.set_glide_seconds(-1.0);
        assert_eq!(config.glide_seconds(), 0.0);
    }
}
