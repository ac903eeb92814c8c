//! Per-block driver: drains the event queue, dispatches every event by
//! kind, and renders every voice's and every global stream's change lists
//! into the caller-supplied output buffers.
//!
//! [`InputDispatcher`] is the only type in this crate that owns the voice
//! array, the key-event table, and the global change lists - see the
//! ownership rules in the crate's module documentation. It is constructed
//! once by the surrounding engine (with an explicit sample rate and block
//! size bound) and driven by exactly one call to [`InputDispatcher::process`]
//! per audio block, always on the audio thread.

use arrayvec::ArrayVec;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::allocator::VoiceAllocator;
use crate::config::{Config, MAX_VOICES, Protocol};
use crate::drift::DriftSchedule;
use crate::event::{Event, EventKind};
use crate::global::GlobalChangeLists;
use crate::key_table::{KeyEventTable, VoiceAssignment};
use crate::queue::{EventConsumer, EventProducer, event_queue};
use crate::scale::Scale;
use crate::voice::{Voice, VoiceOutput, VoiceState};

/// Capacity of the [`KeyEventTable`] backing held-note bookkeeping.
const KEY_TABLE_CAPACITY: usize = 16;

/// How many `ProgramChange` events [`InputDispatcher::process`] will buffer
/// per block before silently dropping the rest, per the crate's general
/// silent-drop error policy.
const MAX_PROGRAM_CHANGES_PER_BLOCK: usize = 8;

/// Tuning constants for per-voice pitch drift and its glide time, exposed
/// as named, overridable defaults rather than baked-in literals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriftTuning {
    /// Scale applied to each voice's fixed drift-table entry.
    pub constants_amount: f32,
    /// Scale applied to the fresh uniform noise term.
    pub random_amount: f32,
    /// How long drift takes to slew into a newly-sampled value.
    pub glide_seconds: f32,
}

impl Default for DriftTuning {
    fn default() -> Self {
        DriftTuning {
            constants_amount: 0.004,
            random_amount: 0.002,
            glide_seconds: 0.5,
        }
    }
}

/// Forwarded, caller-interpreted program change: `(channel, program)`.
pub type ProgramChange = (u8, u8);

/// The per-block control-signal converter. Owns every voice, the key-event
/// table, the global change lists, and the consumer half of the event
/// queue; renders the nine-signal-per-voice output layout documented in
/// `SPEC_FULL.md` §6.
pub struct InputDispatcher {
    config: Config,
    scale: Scale,
    sample_rate: f32,
    max_block_size: usize,

    voices: ArrayVec<Voice, MAX_VOICES>,
    key_table: KeyEventTable<KEY_TABLE_CAPACITY>,
    allocator: VoiceAllocator,
    globals: GlobalChangeLists,

    drift_schedule: DriftSchedule,
    drift_tuning: DriftTuning,
    rng: SmallRng,
    drift_scratch: Vec<f32>,

    sustain_active: bool,
    consumer: EventConsumer,
    program_changes: ArrayVec<ProgramChange, MAX_PROGRAM_CHANGES_PER_BLOCK>,
}

/// Per-voice output buffers for one [`InputDispatcher::process`] call.
/// Caller-owned for the duration of the call only - see the "caller lends
/// output buffers" contract in `SPEC_FULL.md` §9.
pub type BlockOutputs<'a, 'b> = &'a mut [VoiceOutput<'b>];

impl InputDispatcher {
    /// Constructs a dispatcher with `polyphony` voices fixed to at most
    /// [`MAX_VOICES`], plus the producer half of its event queue
    /// (`queue_capacity`, ideally a power of two) for a caller on another
    /// thread to push events into.
    #[must_use]
    pub fn new(
        sample_rate: f32,
        max_block_size: usize,
        queue_capacity: usize,
        config: Config,
    ) -> (Self, EventProducer) {
        let (producer, consumer) = event_queue(queue_capacity);
        let mut voices = ArrayVec::new();
        for _ in 0..MAX_VOICES {
            voices.push(Voice::new());
        }
        let mut globals = GlobalChangeLists::new();
        globals.set_max_block_size(max_block_size);
        let drift_tuning = DriftTuning::default();
        let mut dispatcher = InputDispatcher {
            config,
            scale: Scale::default(),
            sample_rate,
            max_block_size,
            voices,
            key_table: KeyEventTable::new(),
            allocator: VoiceAllocator::new(),
            globals,
            drift_schedule: DriftSchedule::new(
                sample_rate,
                drift_tuning.constants_amount,
                drift_tuning.random_amount,
            ),
            drift_tuning,
            rng: SmallRng::seed_from_u64(0x636f_6e66_6f72_6d61),
            drift_scratch: vec![0.0; max_block_size],
            sustain_active: false,
            consumer,
            program_changes: ArrayVec::new(),
        };
        dispatcher.apply_glide_config();
        for voice in &mut dispatcher.voices {
            voice.drift.set_glide(sample_rate, drift_tuning.glide_seconds);
        }
        (dispatcher, producer)
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the scale table (e.g. after the caller parses a new
    /// microtonal scale file). Shared read-only for the duration of a
    /// block; takes effect starting with the next [`Self::process`] call.
    pub fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    /// The drift tuning constants currently in effect.
    #[must_use]
    pub fn drift_tuning(&self) -> DriftTuning {
        self.drift_tuning
    }

    /// Replaces the per-voice pitch drift tuning constants, recomputing the
    /// drift schedule's cadence and every voice's drift glide time
    /// immediately. `constants_amount`/`random_amount` changes apply
    /// starting with the next due drift tick; `glide_seconds` applies
    /// immediately to the drift change lists' glide coefficient.
    pub fn set_drift_tuning(&mut self, drift_tuning: DriftTuning) {
        self.drift_tuning = drift_tuning;
        self.drift_schedule
            .set_amounts(drift_tuning.constants_amount, drift_tuning.random_amount);
        for voice in &mut self.voices {
            voice.drift.set_glide(self.sample_rate, drift_tuning.glide_seconds);
        }
    }

    /// Applies a new configuration. Changing `voices` or `unison` - the two
    /// parameters documented in `SPEC_FULL.md` §5 as reset triggers -
    /// clears every voice's state immediately. Any other change just
    /// recomputes glide coefficients.
    pub fn set_config(&mut self, config: Config) {
        let needs_reset =
            config.voices() != self.config.voices() || config.unison() != self.config.unison();
        self.config = config;
        self.apply_glide_config();
        if needs_reset {
            self.reset();
        }
    }

    fn apply_glide_config(&mut self) {
        let glide_seconds = match self.config.protocol() {
            Protocol::Osc => 1.0 / self.config.data_rate(),
            Protocol::Midi | Protocol::MidiMpe => self.config.glide_seconds(),
        };
        for voice in &mut self.voices {
            voice.set_sample_rate_and_glide(self.sample_rate, glide_seconds);
        }
        self.globals
            .set_sample_rate_and_glide(self.sample_rate, glide_seconds);
    }

    /// Clears every voice to `Off`, the key-event table, the global change
    /// lists, and flushes any events still sitting in the queue. Triggered
    /// by `CC 120` ("all sound off"), or by a `voices`/`unison`
    /// configuration change. Idempotent.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.clear_state();
        }
        self.key_table.clear_all();
        self.allocator.reset();
        self.globals.reset();
        self.sustain_active = false;
        self.program_changes.clear();
        loop {
            if self.consumer.pop().is_null() {
                break;
            }
        }
    }

    /// Program-change events forwarded during the most recent
    /// [`Self::process`] call. The core does not interpret these itself
    /// (`SPEC_FULL.md` §4.7.9); the caller is expected to read this after
    /// every block.
    #[must_use]
    pub fn program_changes(&self) -> &[ProgramChange] {
        &self.program_changes
    }

    /// Runs one audio block: drains the event queue, dispatches every
    /// event, advances drift and voice age, and renders every change list
    /// into `outputs`. `outputs` must have exactly [`MAX_VOICES`] entries,
    /// each `frames` samples long; voices beyond the configured polyphony
    /// are written as constant zero.
    pub fn process(&mut self, frames: usize, outputs: BlockOutputs<'_, '_>) {
        debug_assert!(frames > 0, "process: frames must be nonzero");
        debug_assert!(
            frames <= self.max_block_size,
            "process: frames exceeds the configured max_block_size"
        );
        debug_assert_eq!(outputs.len(), MAX_VOICES, "process: outputs must cover MAX_VOICES");

        self.program_changes.clear();
        for voice in &mut self.voices {
            voice.begin_block();
        }
        self.globals.begin_block();

        self.advance_drift(frames);
        let polyphony = self.config.voices();
        for voice in self.voices.iter_mut().take(polyphony) {
            voice.advance_age(frames);
        }

        loop {
            let event = self.consumer.pop();
            if event.is_null() {
                break;
            }
            self.dispatch(event, frames);
        }

        self.render(frames, outputs);
    }

    fn advance_drift(&mut self, frames: usize) {
        let due = self.drift_schedule.advance(frames);
        let polyphony = self.config.voices();
        for _ in 0..due {
            for (index, voice) in self.voices.iter_mut().enumerate().take(polyphony) {
                if voice.state() != VoiceState::Off {
                    let (constant, random) = self.drift_schedule.sample(index, &mut self.rng);
                    voice.advance_drift(0, constant, random);
                }
            }
        }
    }

    fn dispatch(&mut self, event: Event, frames: usize) {
        let time = event.time.min(frames.saturating_sub(1));
        match event.kind {
            EventKind::NoteOn => {
                self.note_on(event.channel, event.creator_id, time, event.value1, event.value2);
            }
            EventKind::NoteOff => {
                self.note_off(event.creator_id, time, event.value2, false);
            }
            EventKind::NoteSustain => {
                self.note_off(event.creator_id, time, event.value2, true);
            }
            EventKind::NoteUpdate => {
                self.note_update(
                    event.creator_id,
                    time,
                    event.value1,
                    event.value2,
                    event.value3,
                    event.value4,
                );
            }
            EventKind::Controller => {
                self.controller(event.channel, time, event.value1, event.value2);
            }
            EventKind::PitchWheel => self.pitch_wheel(event.channel, time, event.value1),
            EventKind::NotePressure => {
                self.note_pressure(event.creator_id, time, event.value1);
            }
            EventKind::ChannelPressure => {
                self.channel_pressure(event.channel, time, event.value1);
            }
            EventKind::SustainPedal => self.sustain_pedal(time, event.value1 != 0.0),
            EventKind::ProgramChange => {
                let _ = self
                    .program_changes
                    .try_push((event.channel, event.value1 as u8));
            }
            EventKind::Null => {}
        }
    }

    fn note_on(&mut self, channel: u8, creator_id: u32, time: usize, note: f32, velocity: f32) {
        if self.config.unison() {
            self.note_on_unison(channel, creator_id, time, note, velocity);
        } else {
            self.note_on_poly(channel, creator_id, time, note, velocity);
        }
    }

    fn note_on_poly(&mut self, channel: u8, creator_id: u32, time: usize, note: f32, velocity: f32) {
        let polyphony = self.config.voices();
        if polyphony == 0 {
            return;
        }
        let active = &self.voices[..polyphony];
        let key_table = &self.key_table;
        let index = self
            .allocator
            .allocate(active, |v| key_table.has_live_key_for_voice(v));

        let was_on = self.voices[index].is_on();
        let retrig_time = if was_on && time == 0 { 1 } else { time };
        self.voices[index].sound_note(&self.scale, channel, creator_id, retrig_time, note, velocity, was_on);

        // The voice being (re)claimed may have been stolen from a still-held
        // key; that key no longer has anything live under it.
        self.key_table.clear_by_voice(index);
        self.key_table
            .insert(creator_id, note, velocity, time, VoiceAssignment::Voice(index));
    }

    fn note_on_unison(&mut self, channel: u8, creator_id: u32, time: usize, note: f32, velocity: f32) {
        let polyphony = self.config.voices();
        if polyphony == 0 {
            return;
        }
        if let Some(sounding) = self.key_table.find_unison_sounding() {
            self.key_table.set_assignment(sounding, VoiceAssignment::Pending);
        }
        if self
            .key_table
            .insert(creator_id, note, velocity, time, VoiceAssignment::Unison)
            .is_none()
        {
            return;
        }
        for voice in self.voices.iter_mut().take(polyphony) {
            voice.sound_note(&self.scale, channel, creator_id, time, note, velocity, false);
        }
    }

    /// `force_sustain` is set for `NoteSustain` events: the voice moves to
    /// `Sustain` regardless of the pedal flag, distinguishing the kind from
    /// a plain `NoteOff` (which only sustains when the pedal is down).
    fn note_off(&mut self, creator_id: u32, time: usize, velocity: f32, force_sustain: bool) {
        if self.config.unison() {
            self.note_off_unison(creator_id, time, velocity, force_sustain);
        } else {
            self.note_off_poly(creator_id, time, force_sustain);
        }
    }

    fn note_off_poly(&mut self, creator_id: u32, time: usize, force_sustain: bool) {
        let polyphony = self.config.voices();
        let sustain = force_sustain || self.sustain_active;
        if let Some(index) = (0..polyphony)
            .find(|&i| self.voices[i].creator_id() == creator_id && self.voices[i].is_on())
        {
            self.voices[index].release_note(time, sustain);
        }
        self.key_table.clear_by_creator_id(creator_id);
    }

    /// Unison note-off: releasing the currently-sounding key uncovers the
    /// most-recently-pressed still-held key, if any (the "stack" behavior).
    /// While the sustain pedal is down (or `force_sustain` is set by a
    /// `NoteSustain` event) the currently-sounding stack entry simply holds
    /// (matching the general sustain rule in `SPEC_FULL.md` §4.7.2); the
    /// pending stack is left untouched until the pedal lifts.
    fn note_off_unison(&mut self, creator_id: u32, time: usize, velocity: f32, force_sustain: bool) {
        let Some(slot) = self.key_table.find_by_creator_id(creator_id) else {
            return;
        };
        let was_sounding = self.key_table.assignment(slot) == Some(VoiceAssignment::Unison);
        let polyphony = self.config.voices();

        if force_sustain || self.sustain_active {
            if was_sounding {
                for voice in self.voices.iter_mut().take(polyphony) {
                    voice.release_note(time, true);
                }
            }
            self.key_table.clear_slot(slot);
            return;
        }

        self.key_table.clear_slot(slot);
        if !was_sounding {
            return;
        }
        if let Some(next) = self.key_table.most_recent_pending() {
            let note = self.key_table.note(next).unwrap_or(0.0);
            let next_creator_id = self.key_table.creator_id(next).unwrap_or(0);
            self.key_table.set_assignment(next, VoiceAssignment::Unison);
            for voice in self.voices.iter_mut().take(polyphony) {
                voice.sound_note(&self.scale, voice.channel(), next_creator_id, time, note, velocity, false);
            }
        } else {
            for voice in self.voices.iter_mut().take(polyphony) {
                voice.release_note(time, false);
            }
        }
    }

    fn note_update(&mut self, creator_id: u32, time: usize, pitch_delta: f32, amp: f32, x: f32, y: f32) {
        let polyphony = self.config.voices();
        if let Some(index) = (0..polyphony).find(|&i| self.voices[i].creator_id() == creator_id) {
            self.voices[index].update_touch(time, pitch_delta, amp, x, y);
        }
    }

    fn controller(&mut self, channel: u8, time: usize, number: f32, value: f32) {
        let number = number.clamp(0.0, 127.0).round() as u8;
        let scaled = value.clamp(0.0, 127.0) / 127.0;
        match number {
            120 => self.reset(),
            123 => self.all_notes_off(time),
            n => self.route_cc(channel, time, n, scaled),
        }
    }

    fn all_notes_off(&mut self, time: usize) {
        let polyphony = self.config.voices();
        for voice in self.voices.iter_mut().take(polyphony) {
            if voice.is_on() {
                voice.release_note(time, false);
            }
        }
        self.key_table.clear_all();
    }

    fn route_cc(&mut self, channel: u8, time: usize, number: u8, scaled: f32) {
        let mpe = self.config.protocol() == Protocol::MidiMpe;
        if mpe && channel != 1 {
            if number == self.config.mod_mpe_x_cc() {
                let polyphony = self.config.voices();
                if let Some(index) = (0..polyphony).find(|&i| {
                    self.voices[i].channel() == channel && self.voices[i].is_on()
                }) {
                    self.voices[index].add_mod(0, time, scaled);
                }
            }
            return;
        }
        let base = self.config.mod_cc_base();
        if number == base {
            self.globals.add_main_mod(0, time, scaled);
        } else if number == base.wrapping_add(1) {
            self.globals.add_main_mod(1, time, scaled);
        } else if number == base.wrapping_add(2) {
            self.globals.add_main_mod(2, time, scaled);
        }
    }

    fn pitch_wheel(&mut self, channel: u8, time: usize, value14: f32) {
        let v = value14.clamp(0.0, 16383.0);
        let zero = v - 8192.0;
        let normalized = if zero >= 0.0 { zero / 8191.0 } else { zero / 8192.0 };
        let mpe = self.config.protocol() == Protocol::MidiMpe;
        let range_semitones = if mpe && channel != 1 {
            self.config.bend_mpe_semitones()
        } else {
            self.config.bend_semitones()
        };
        let octaves = (normalized * range_semitones) / 12.0;
        self.globals.add_pitch_bend(channel, time, octaves, mpe);
    }

    fn note_pressure(&mut self, creator_id: u32, time: usize, value: f32) {
        let scaled = value.clamp(0.0, 127.0) / 127.0;
        let polyphony = self.config.voices();
        if let Some(index) = (0..polyphony)
            .find(|&i| self.voices[i].creator_id() == creator_id && self.voices[i].is_on())
        {
            self.voices[index].add_pressure(time, scaled);
        }
    }

    fn channel_pressure(&mut self, channel: u8, time: usize, value: f32) {
        let scaled = value.clamp(0.0, 127.0) / 127.0;
        let mpe = self.config.protocol() == Protocol::MidiMpe;
        self.globals.add_channel_pressure(channel, time, scaled, mpe);
    }

    fn sustain_pedal(&mut self, time: usize, down: bool) {
        if down {
            self.sustain_active = true;
        } else if self.sustain_active {
            self.sustain_active = false;
            let polyphony = self.config.voices();
            for voice in self.voices.iter_mut().take(polyphony) {
                voice.release_sustain(time);
            }
        }
    }

    fn render(&mut self, frames: usize, outputs: BlockOutputs<'_, '_>) {
        self.globals.render(frames);
        let mpe = self.config.protocol() == Protocol::MidiMpe;
        let master_tune_offset = (self.config.master_tune_hz() / 440.0).log2();
        let polyphony = self.config.voices();

        let globals = &self.globals;
        let drift_scratch = &mut self.drift_scratch[..frames];
        for (index, (voice, out)) in self.voices.iter_mut().zip(outputs.iter_mut()).enumerate() {
            if index >= polyphony {
                zero_output(out, frames);
                continue;
            }
            voice.render(out, drift_scratch);

            let pitch_bend = globals.pitch_bend_for_channel(voice.channel(), mpe, frames);
            for (p, b) in out.pitch.iter_mut().zip(pitch_bend) {
                *p += *b + master_tune_offset;
            }

            let pressure = globals.pressure_for_channel(voice.channel(), mpe, frames);
            for (a, p) in out.after.iter_mut().zip(pressure) {
                *a += *p;
            }

            for (m, g) in out.moda.iter_mut().zip(globals.mod_a(frames)) {
                *m += *g;
            }
            for (m, g) in out.modb.iter_mut().zip(globals.mod_b(frames)) {
                *m += *g;
            }
            for (m, g) in out.modc.iter_mut().zip(globals.mod_c(frames)) {
                *m += *g;
            }

            for v in out.voice.iter_mut() {
                *v = index as f32;
            }
        }
    }
}

fn zero_output(out: &mut VoiceOutput<'_>, frames: usize) {
    for slice in [
        &mut *out.pitch,
        &mut *out.gate,
        &mut *out.amp,
        &mut *out.vel,
        &mut *out.voice,
        &mut *out.after,
        &mut *out.moda,
        &mut *out.modb,
        &mut *out.modc,
    ] {
        slice[..frames].fill(0.0);
    }
}

#[cfg(test)]
#[path = "dispatcher/tests.rs"]
mod tests;
