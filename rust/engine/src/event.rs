//! Event types flowing from the producer thread (MIDI parser, OSC listener)
//! into the [`crate::dispatcher::InputDispatcher`].

/// The kind of a control event, together with how many of `value1..value4`
/// it uses and what they mean. See the field docs on [`Event`] for the
/// per-kind payload layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    /// `value1` = note number, `value2` = normalized velocity in `[0, 1]`.
    NoteOn,
    /// `value1` = note number, `value2` = normalized release velocity.
    NoteOff,
    /// Note off that forces the voice to `Sustain` regardless of the
    /// pedal flag, unlike `NoteOff` which only sustains while the pedal
    /// is down.
    NoteSustain,
    /// Continuous-touch update (OSC): `value1` = pitch delta, `value2` =
    /// amplitude/z, `value3` = x, `value4` = y.
    NoteUpdate,
    /// `value1` = controller number, `value2` = raw value in `[0, 127]`.
    Controller,
    /// `value1` = 14-bit pitch-wheel value in `[0, 16383]`.
    PitchWheel,
    /// Polyphonic aftertouch: `value1` = raw value in `[0, 127]`.
    NotePressure,
    /// Channel pressure: `value1` = raw value in `[0, 127]`.
    ChannelPressure,
    /// `value1` = 0 (up) or nonzero (down).
    SustainPedal,
    /// `value1` = program number. Forwarded to the caller; the dispatcher
    /// does not interpret it.
    ProgramChange,
    /// The empty event. Returned by [`crate::queue::EventConsumer::pop`]
    /// when the queue is drained.
    #[default]
    Null,
}

/// A single control event with a sample-accurate offset into the current
/// processing block.
///
/// `Event` is a plain value type with no heap allocation, so it is cheap to
/// copy through the lock-free queue and safe to construct on any thread.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Event {
    /// What kind of event this is, and how to interpret `value1..value4`.
    pub kind: EventKind,
    /// MIDI channel, `1..=16`. Channel `1` is the MPE "main channel".
    pub channel: u8,
    /// Stable identifier pairing a `NoteOff`/`NoteSustain` with the
    /// `NoteOn` that started it: the MIDI note number for MIDI input, or a
    /// touch index for OSC input.
    pub creator_id: u32,
    /// Sample offset within the current block, `0 <= time < frames`.
    pub time: usize,
    /// First kind-specific payload value. See [`EventKind`] variant docs.
    pub value1: f32,
    /// Second kind-specific payload value. See [`EventKind`] variant docs.
    pub value2: f32,
    /// Third kind-specific payload value. See [`EventKind`] variant docs.
    pub value3: f32,
    /// Fourth kind-specific payload value. See [`EventKind`] variant docs.
    pub value4: f32,
}

impl Event {
    /// The sentinel "no event" value, identical to [`EventKind::Null`]
    /// with all other fields zeroed.
    pub const NULL: Event = Event {
        kind: EventKind::Null,
        channel: 0,
        creator_id: 0,
        time: 0,
        value1: 0.0,
        value2: 0.0,
        value3: 0.0,
        value4: 0.0,
    };

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.kind == EventKind::Null
    }

    #[must_use]
    pub fn note_on(channel: u8, creator_id: u32, time: usize, note: f32, velocity: f32) -> Self {
        Event {
            kind: EventKind::NoteOn,
            channel,
            creator_id,
            time,
            value1: note,
            value2: velocity,
            ..Event::NULL
        }
    }

    #[must_use]
    pub fn note_off(channel: u8, creator_id: u32, time: usize, velocity: f32) -> Self {
        Event {
            kind: EventKind::NoteOff,
            channel,
            creator_id,
            time,
            value2: velocity,
            ..Event::NULL
        }
    }

    #[must_use]
    pub fn note_sustain(channel: u8, creator_id: u32, time: usize, velocity: f32) -> Self {
        Event {
            kind: EventKind::NoteSustain,
            channel,
            creator_id,
            time,
            value2: velocity,
            ..Event::NULL
        }
    }

    #[must_use]
    pub fn controller(channel: u8, time: usize, number: u8, value: u8) -> Self {
        Event {
            kind: EventKind::Controller,
            channel,
            time,
            value1: f32::from(number),
            value2: f32::from(value),
            ..Event::NULL
        }
    }

    #[must_use]
    pub fn pitch_wheel(channel: u8, time: usize, value14: u16) -> Self {
        Event {
            kind: EventKind::PitchWheel,
            channel,
            time,
            value1: f32::from(value14),
            ..Event::NULL
        }
    }

    #[must_use]
    pub fn sustain_pedal(channel: u8, time: usize, down: bool) -> Self {
        Event {
            kind: EventKind::SustainPedal,
            channel,
            time,
            value1: f32::from(u8::from(down)),
            ..Event::NULL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_event_is_null() {
        assert!(Event::NULL.is_null());
        assert!(Event::default().is_null());
    }

    #[test]
    fn constructed_events_are_not_null() {
        assert!(!Event::note_on(1, 60, 0, 60.0, 0.8).is_null());
    }
}
