use super::*;
use crate::config::{Config, Protocol};
use crate::event::Event;
use crate::scale::Scale;
use crate::voice::VoiceOutput;
use assert_approx_eq::assert_approx_eq;

/// Owns every per-voice, per-signal output buffer for one [`InputDispatcher::process`]
/// call so the borrowed [`VoiceOutput`] slices handed to `process` have somewhere to live.
struct Outputs {
    pitch: Vec<Vec<f32>>,
    gate: Vec<Vec<f32>>,
    amp: Vec<Vec<f32>>,
    vel: Vec<Vec<f32>>,
    voice: Vec<Vec<f32>>,
    after: Vec<Vec<f32>>,
    moda: Vec<Vec<f32>>,
    modb: Vec<Vec<f32>>,
    modc: Vec<Vec<f32>>,
}

impl Outputs {
    fn new(frames: usize) -> Self {
        let make = || (0..MAX_VOICES).map(|_| vec![0.0_f32; frames]).collect();
        Outputs {
            pitch: make(),
            gate: make(),
            amp: make(),
            vel: make(),
            voice: make(),
            after: make(),
            moda: make(),
            modb: make(),
            modc: make(),
        }
    }

    fn as_block(&mut self) -> Vec<VoiceOutput<'_>> {
        self.pitch
            .iter_mut()
            .zip(self.gate.iter_mut())
            .zip(self.amp.iter_mut())
            .zip(self.vel.iter_mut())
            .zip(self.voice.iter_mut())
            .zip(self.after.iter_mut())
            .zip(self.moda.iter_mut())
            .zip(self.modb.iter_mut())
            .zip(self.modc.iter_mut())
            .map(|((((((((pitch, gate), amp), vel), voice), after), moda), modb), modc)| {
                VoiceOutput {
                    pitch: pitch.as_mut_slice(),
                    gate: gate.as_mut_slice(),
                    amp: amp.as_mut_slice(),
                    vel: vel.as_mut_slice(),
                    voice: voice.as_mut_slice(),
                    after: after.as_mut_slice(),
                    moda: moda.as_mut_slice(),
                    modb: modb.as_mut_slice(),
                    modc: modc.as_mut_slice(),
                }
            })
            .collect()
    }
}

fn run(dispatcher: &mut InputDispatcher, frames: usize, outputs: &mut Outputs) {
    let mut block = outputs.as_block();
    dispatcher.process(frames, &mut block);
}

#[test]
fn basic_mono_note() {
    let config = Config::default();
    let (mut dispatcher, mut producer) = InputDispatcher::new(1000.0, 64, 16, config);
    producer.push(Event::note_on(1, 60, 0, 69.0, 1.0));

    let mut outputs = Outputs::new(64);
    run(&mut dispatcher, 64, &mut outputs);

    assert_approx_eq!(outputs.pitch[0][0], 0.0);
    assert_approx_eq!(outputs.gate[0][0], 1.0);
    assert_approx_eq!(outputs.amp[0][0], 1.0);
    assert_approx_eq!(outputs.vel[0][0], 1.0);
    assert_approx_eq!(outputs.voice[0][0], 0.0);
    // untouched voices stay silent
    assert_approx_eq!(outputs.gate[1][0], 0.0);
}

#[test]
fn vel_carries_the_velocity_squared_curve_like_amp() {
    let config = Config::default();
    let (mut dispatcher, mut producer) = InputDispatcher::new(1000.0, 64, 16, config);
    producer.push(Event::note_on(1, 60, 0, 69.0, 0.5));

    let mut outputs = Outputs::new(64);
    run(&mut dispatcher, 64, &mut outputs);

    assert_approx_eq!(outputs.amp[0][0], 0.25);
    assert_approx_eq!(outputs.vel[0][0], 0.25);
}

#[test]
fn retrig_on_steal() {
    let mut config = Config::default();
    config.set_voices(2);
    let (mut dispatcher, mut producer) = InputDispatcher::new(1000.0, 64, 16, config);

    // block 1: voice 0 claims creator 1
    producer.push(Event::note_on(1, 1, 0, 60.0, 0.5));
    let mut outputs = Outputs::new(64);
    run(&mut dispatcher, 64, &mut outputs);

    // block 2: voice 1 claims creator 2; voice 0 is now the older voice
    producer.push(Event::note_on(1, 2, 0, 62.0, 0.5));
    run(&mut dispatcher, 64, &mut outputs);

    // block 3: a third note with both voices held steals the oldest (voice 0)
    producer.push(Event::note_on(1, 3, 0, 64.0, 0.8));
    run(&mut dispatcher, 64, &mut outputs);

    let expected_pitch = Scale::default().note_to_log_pitch(64.0);
    // retrig pre-roll: gate/amp dip to zero for one sample before the new note
    assert_approx_eq!(outputs.gate[0][0], 0.0);
    assert_approx_eq!(outputs.amp[0][0], 0.0);
    assert_approx_eq!(outputs.gate[0][1], 1.0);
    assert_approx_eq!(outputs.pitch[0][1], expected_pitch);
    // voice 1 is untouched by the steal
    assert_approx_eq!(outputs.gate[1][0], 1.0);
}

#[test]
fn sustain_hold_and_release() {
    let mut config = Config::default();
    config.set_voices(2);
    let (mut dispatcher, mut producer) = InputDispatcher::new(1000.0, 64, 16, config);

    producer.push(Event::note_on(1, 1, 0, 60.0, 0.5));
    let mut outputs = Outputs::new(64);
    run(&mut dispatcher, 64, &mut outputs);

    // pedal down, then release the key: the voice should keep sounding
    producer.push(Event::sustain_pedal(1, 0, true));
    producer.push(Event::note_off(1, 1, 1, 0.0));
    run(&mut dispatcher, 64, &mut outputs);
    assert!(outputs.gate[0].iter().all(|&g| g == 1.0));

    // pedal up: the voice should release immediately
    producer.push(Event::sustain_pedal(1, 0, false));
    run(&mut dispatcher, 64, &mut outputs);
    assert_approx_eq!(outputs.gate[0][0], 0.0);
}

#[test]
fn note_sustain_forces_sustain_even_with_pedal_up() {
    let config = Config::default();
    let (mut dispatcher, mut producer) = InputDispatcher::new(1000.0, 64, 16, config);

    producer.push(Event::note_on(1, 1, 0, 60.0, 0.5));
    let mut outputs = Outputs::new(64);
    run(&mut dispatcher, 64, &mut outputs);

    // pedal is never pressed, but NoteSustain should hold the voice anyway
    producer.push(Event::note_sustain(1, 1, 0, 0.0));
    run(&mut dispatcher, 64, &mut outputs);
    assert!(outputs.gate[0].iter().all(|&g| g == 1.0));
}

#[test]
fn pitch_bend_glides_toward_target() {
    let mut config = Config::default();
    config.set_glide_seconds(0.01);
    let (mut dispatcher, mut producer) = InputDispatcher::new(1000.0, 64, 16, config);

    producer.push(Event::note_on(1, 1, 0, 69.0, 1.0));
    producer.push(Event::pitch_wheel(1, 0, 16383));

    let mut outputs = Outputs::new(20);
    run(&mut dispatcher, 20, &mut outputs);

    // bend_semitones defaults to 2.0, full-up wheel bends by 2/12 octave
    let target = 2.0 / 12.0;
    let step = target / 10.0; // glide_in_samples = round(1000 * 0.01) = 10
    assert_approx_eq!(outputs.pitch[0][0], step);
    assert_approx_eq!(outputs.pitch[0][9], target);
    assert_approx_eq!(outputs.pitch[0][19], target);
}

#[test]
fn unison_stacks_and_recovers_held_notes() {
    let mut config = Config::default();
    config.set_voices(4);
    config.set_unison(true);
    let (mut dispatcher, mut producer) = InputDispatcher::new(1000.0, 64, 16, config);
    let scale = Scale::default();

    producer.push(Event::note_on(1, 1, 0, 60.0, 0.8));
    let mut outputs = Outputs::new(64);
    run(&mut dispatcher, 64, &mut outputs);
    for v in 0..4 {
        assert_approx_eq!(outputs.pitch[v][0], scale.note_to_log_pitch(60.0));
        assert_approx_eq!(outputs.gate[v][0], 1.0);
    }

    // a second held note takes over every voice
    producer.push(Event::note_on(1, 2, 0, 64.0, 0.8));
    run(&mut dispatcher, 64, &mut outputs);
    for v in 0..4 {
        assert_approx_eq!(outputs.pitch[v][0], scale.note_to_log_pitch(64.0));
    }

    // releasing the sounding note uncovers the still-held one underneath it
    producer.push(Event::note_off(1, 2, 0, 0.0));
    run(&mut dispatcher, 64, &mut outputs);
    for v in 0..4 {
        assert_approx_eq!(outputs.pitch[v][0], scale.note_to_log_pitch(60.0));
        assert_approx_eq!(outputs.gate[v][0], 1.0);
    }
}

#[test]
fn queue_overflow_drops_silently_without_panicking() {
    let config = Config::default();
    let (mut dispatcher, mut producer) = InputDispatcher::new(1000.0, 64, 4, config);

    let mut accepted = 0;
    for creator_id in 0..10u32 {
        if producer.push(Event::note_on(1, creator_id, 0, 60.0, 0.5)) {
            accepted += 1;
        }
    }
    assert!(accepted < 10, "queue should have rejected some events");

    let mut outputs = Outputs::new(64);
    run(&mut dispatcher, 64, &mut outputs);
    assert_approx_eq!(outputs.gate[0][0], 1.0);
}

#[test]
fn all_notes_off_silences_every_sounding_voice() {
    let mut config = Config::default();
    config.set_voices(2);
    let (mut dispatcher, mut producer) = InputDispatcher::new(1000.0, 64, 16, config);

    producer.push(Event::note_on(1, 1, 0, 60.0, 0.5));
    producer.push(Event::note_on(1, 2, 0, 62.0, 0.5));
    let mut outputs = Outputs::new(64);
    run(&mut dispatcher, 64, &mut outputs);

    producer.push(Event::controller(1, 0, 123, 0));
    run(&mut dispatcher, 64, &mut outputs);
    assert_approx_eq!(outputs.gate[0][0], 0.0);
    assert_approx_eq!(outputs.gate[1][0], 0.0);
}
