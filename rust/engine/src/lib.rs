//! Real-time MIDI/MPE/OSC input to per-voice control-signal conversion.
//!
//! This crate is the producer/consumer boundary between a non-audio thread
//! that decodes MIDI bytes or OSC packets and the audio thread that renders
//! control signals for a synthesis graph. It solves four problems together:
//! voice allocation under contention (free/steal/rotate policies, unison
//! fan-out, sustain-pedal semantics), sample-accurate event ordering within
//! a block, a lock-free producer/consumer handoff for events, and rendering
//! a compact time-stamped change list into a full per-sample signal with
//! glide that survives block boundaries.
//!
//! The entry point is [`dispatcher::InputDispatcher`]: construct one with
//! [`dispatcher::InputDispatcher::new`], push events into the returned
//! [`queue::EventProducer`] from any thread, and call
//! [`dispatcher::InputDispatcher::process`] once per audio block from the
//! audio thread to drain those events and render every voice's output
//! signals.
//!
//! This crate does not synthesize or render audio, does not parse MIDI
//! bytes or OSC packets (callers deliver already-decoded [`event::Event`]s),
//! does not parse microtonal scale files (callers construct a [`scale::Scale`]
//! from an already-parsed table), and persists no state between process
//! invocations beyond what [`dispatcher::InputDispatcher`] itself owns.

#![warn(
    nonstandard_style,
    rust_2018_idioms,
    future_incompatible,
    missing_docs,
    rustdoc::private_doc_tests,
    rustdoc::unescaped_backticks,
    clippy::pedantic,
    clippy::todo
)]
#![allow(
    clippy::type_complexity,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::default_trait_access
)]

pub mod allocator;
pub mod change_list;
pub mod config;
pub mod dispatcher;
pub mod drift;
pub mod event;
pub mod global;
pub mod key_table;
pub mod queue;
pub mod scale;
pub mod voice;
