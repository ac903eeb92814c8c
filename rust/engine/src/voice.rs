//! A single synthesis voice: its sounding state plus the nine change lists
//! that carry its control signals from event time to per-sample output.

use crate::change_list::ChangeList;
use crate::scale::Scale;

/// Maximum number of distinct changes any one voice parameter can carry in
/// a single block. Generous relative to any reasonable event rate.
pub const MAX_CHANGES_PER_BLOCK: usize = 16;

type VoiceChangeList = ChangeList<MAX_CHANGES_PER_BLOCK>;

/// The sounding state of a [`Voice`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VoiceState {
    #[default]
    Off,
    On,
    /// Holding past a `NoteOff` because the sustain pedal is down.
    Sustain,
}

/// One voice's control signals and the state machine that drives them.
///
/// A `Voice` is never destroyed once constructed; [`crate::allocator`]
/// only ever picks which existing `Voice` an incoming note is routed to.
#[derive(Clone, Debug, PartialEq)]
pub struct Voice {
    state: VoiceState,
    creator_id: u32,
    /// MIDI channel this voice is currently sounding on. Only meaningful in
    /// MPE mode, where each active note owns a dedicated channel and
    /// per-channel pitch bend/pressure/CC messages are routed by matching
    /// this field rather than by `creator_id` (see
    /// [`crate::dispatcher::InputDispatcher`]).
    channel: u8,
    age: usize,

    start_pitch: f32,
    start_x: f32,
    start_y: f32,
    x1: f32,
    y1: f32,
    z1: f32,

    pub(crate) pitch: VoiceChangeList,
    pub(crate) gate: VoiceChangeList,
    pub(crate) amp: VoiceChangeList,
    pub(crate) vel: VoiceChangeList,
    pub(crate) after: VoiceChangeList,
    pub(crate) moda: VoiceChangeList,
    pub(crate) modb: VoiceChangeList,
    pub(crate) modc: VoiceChangeList,
    pub(crate) drift: VoiceChangeList,
}

impl Default for Voice {
    fn default() -> Self {
        Voice {
            state: VoiceState::Off,
            creator_id: 0,
            channel: 0,
            age: 0,
            start_pitch: 0.0,
            start_x: 0.0,
            start_y: 0.0,
            x1: 0.0,
            y1: 0.0,
            z1: 0.0,
            pitch: VoiceChangeList::new(),
            gate: VoiceChangeList::new(),
            amp: VoiceChangeList::new(),
            vel: VoiceChangeList::new(),
            after: VoiceChangeList::new(),
            moda: VoiceChangeList::new(),
            modb: VoiceChangeList::new(),
            modc: VoiceChangeList::new(),
            drift: VoiceChangeList::new(),
        }
    }
}

impl Voice {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> VoiceState {
        self.state
    }

    #[must_use]
    pub fn creator_id(&self) -> u32 {
        self.creator_id
    }

    #[must_use]
    pub fn channel(&self) -> u8 {
        self.channel
    }

    #[must_use]
    pub fn age(&self) -> usize {
        self.age
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.state == VoiceState::On
    }

    pub fn set_sample_rate_and_glide(&mut self, sample_rate: f32, glide_time_seconds: f32) {
        self.pitch.set_glide(sample_rate, glide_time_seconds);
        self.amp.set_glide(sample_rate, 0.0);
        self.gate.set_glide(sample_rate, 0.0);
        self.vel.set_glide(sample_rate, 0.0);
        self.after.set_glide(sample_rate, 0.0);
        self.moda.set_glide(sample_rate, glide_time_seconds);
        self.modb.set_glide(sample_rate, glide_time_seconds);
        self.modc.set_glide(sample_rate, glide_time_seconds);
    }

    /// Advances `age` by the number of samples in the block that just
    /// finished, but only while the voice is sounding. Called once per
    /// block by the dispatcher, before events for the new block are
    /// applied.
    pub fn advance_age(&mut self, frames: usize) {
        if self.state != VoiceState::Off {
            self.age += frames;
        }
    }

    /// Drops this block's pending changes on every owned change list. Glide
    /// state and current values survive, per [`ChangeList::clear_changes`].
    pub fn begin_block(&mut self) {
        self.pitch.clear_changes();
        self.gate.clear_changes();
        self.amp.clear_changes();
        self.vel.clear_changes();
        self.after.clear_changes();
        self.moda.clear_changes();
        self.modb.clear_changes();
        self.modc.clear_changes();
        self.drift.clear_changes();
    }

    /// Resets the voice to `Off` with every change list zeroed.
    pub fn clear_state(&mut self) {
        self.state = VoiceState::Off;
        self.creator_id = 0;
        self.channel = 0;
        self.age = 0;
        self.start_pitch = 0.0;
        self.start_x = 0.0;
        self.start_y = 0.0;
        self.x1 = 0.0;
        self.y1 = 0.0;
        self.z1 = 0.0;
        self.pitch.zero();
        self.gate.zero();
        self.amp.zero();
        self.vel.zero();
        self.after.zero();
        self.moda.zero();
        self.modb.zero();
        self.modc.zero();
        self.drift.zero();
    }

    /// Sounds `note`/`velocity` from `creator_id` at `time`. If `retrig` is
    /// set, a one-sample `gate=0, amp=0` is inserted immediately before
    /// `time` first - the caller is responsible for having bumped `time`
    /// from `0` to `1` beforehand so that sample exists.
    pub fn sound_note(
        &mut self,
        scale: &Scale,
        channel: u8,
        creator_id: u32,
        time: usize,
        note: f32,
        velocity: f32,
        retrig: bool,
    ) {
        if retrig {
            debug_assert!(time >= 1, "retrig requires room for the pre-roll sample");
            self.gate.add_change(0.0, time - 1);
            self.amp.add_change(0.0, time - 1);
        }
        self.state = VoiceState::On;
        self.creator_id = creator_id;
        self.channel = channel;
        self.age = 0;
        self.start_pitch = scale.note_to_log_pitch(note);
        self.start_x = 0.0;
        self.start_y = 0.0;
        self.x1 = self.start_x;
        self.y1 = self.start_y;
        self.z1 = 0.0;

        self.pitch.add_change(self.start_pitch, time);
        self.gate.add_change(1.0, time);
        let amp = velocity * velocity;
        self.amp.add_change(amp, time);
        self.vel.add_change(amp, time);
    }

    /// Continuous-touch update (OSC `NoteUpdate`): `pitch_delta` is added to
    /// the pitch latched at note-on, `amp` replaces the amplitude
    /// directly, and `x`/`y` drive the first two modulation axes. The
    /// first update after a note-on snaps instantly rather than gliding,
    /// since there is no meaningful "previous touch position" to glide
    /// from.
    pub fn update_touch(&mut self, time: usize, pitch_delta: f32, amp: f32, x: f32, y: f32) {
        let first_touch = self.x1 == self.start_x && self.y1 == self.start_y;
        if first_touch {
            self.moda.zero();
            self.modb.zero();
        }
        self.pitch.add_change(self.start_pitch + pitch_delta, time);
        self.amp.add_change(amp, time);
        self.moda.add_change(x, time);
        self.modb.add_change(y, time);
        self.x1 = x;
        self.y1 = y;
    }

    /// Releases the voice. When the sustain pedal is down (`to_sustain`),
    /// the voice moves to `Sustain` with no output change at all - it keeps
    /// sounding exactly as it was. Otherwise `gate=0, amp=0` are pushed at
    /// `time` and the voice goes `Off`.
    pub fn release_note(&mut self, time: usize, to_sustain: bool) {
        if to_sustain {
            self.state = VoiceState::Sustain;
        } else {
            self.gate.add_change(0.0, time);
            self.amp.add_change(0.0, time);
            self.state = VoiceState::Off;
        }
    }

    /// Releases a voice being held only by the sustain pedal (no matching
    /// held key) once the pedal comes up.
    pub fn release_sustain(&mut self, time: usize) {
        if self.state == VoiceState::Sustain {
            self.gate.add_change(0.0, time);
            self.amp.add_change(0.0, time);
            self.state = VoiceState::Off;
        }
    }

    pub fn add_pressure(&mut self, time: usize, value: f32) {
        self.after.add_change(value, time);
    }

    /// Pushes directly into one of this voice's own modulation axes.
    /// `axis` is `0`, `1`, or `2` for `moda`/`modb`/`modc`. Used by the
    /// dispatcher to route MPE per-note CCs (e.g. the X-axis CC) straight
    /// into the target voice, bypassing the global modulation streams.
    pub fn add_mod(&mut self, axis: usize, time: usize, value: f32) {
        match axis {
            0 => self.moda.add_change(value, time),
            1 => self.modb.add_change(value, time),
            _ => self.modc.add_change(value, time),
        };
    }

    /// Advances drift by one step: combines `constant` (the per-voice
    /// constant-table entry) and `random` (fresh uniform noise), each
    /// pre-scaled by the caller, and slews toward their sum through the
    /// drift change list's own (long) glide time.
    pub fn advance_drift(&mut self, time: usize, constant: f32, random: f32) {
        self.drift.add_change(constant + random, time);
    }

    /// Renders every owned change list for this block into the
    /// corresponding slice of `out`. The rendered drift signal has no
    /// output slot of its own - the external signal layout has nine
    /// signals, not ten - so it is added directly into `out.pitch`
    /// instead, using `drift_scratch` (caller-owned, `frames` samples
    /// long) as scratch space.
    pub fn render(&mut self, out: &mut VoiceOutput<'_>, drift_scratch: &mut [f32]) {
        self.pitch.write_to_signal(out.pitch);
        self.drift.write_to_signal(drift_scratch);
        for (p, d) in out.pitch.iter_mut().zip(drift_scratch.iter()) {
            *p += *d;
        }
        self.gate.write_to_signal(out.gate);
        self.amp.write_to_signal(out.amp);
        self.vel.write_to_signal(out.vel);
        self.after.write_to_signal(out.after);
        self.moda.write_to_signal(out.moda);
        self.modb.write_to_signal(out.modb);
        self.modc.write_to_signal(out.modc);
    }
}

/// Borrowed output buffers for one voice's block, per the external signal
/// layout documented on [`crate::dispatcher::InputDispatcher`]. `voice`
/// carries the constant voice-index signal, which has no change list of
/// its own.
pub struct VoiceOutput<'a> {
    pub pitch: &'a mut [f32],
    pub gate: &'a mut [f32],
    pub amp: &'a mut [f32],
    pub vel: &'a mut [f32],
    pub voice: &'a mut [f32],
    pub after: &'a mut [f32],
    pub moda: &'a mut [f32],
    pub modb: &'a mut [f32],
    pub modc: &'a mut [f32],
}
