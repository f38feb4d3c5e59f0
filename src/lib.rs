//! Sampling button engine.
//!
//! Turns a noisy boolean level, polled from a GPIO or a driver shim, into a
//! stream of semantic events: [`Pressed`](ButtonEvent::Pressed),
//! [`Released`](ButtonEvent::Released), [`Holding`](ButtonEvent::Holding)
//! auto-repeat, and [`Click`](ButtonEvent::Click) with a running count.
//!
//! The host drives the engine by calling [`ButtonPool::step`] (or
//! [`ButtonEngine::step`] when embedding a single machine) with a monotonic
//! millisecond timestamp. Each step works out how many sampling intervals
//! elapsed since the previous one, shifts that many fresh level samples into
//! a per-button waveform, classifies the waveform, and emits events
//! synchronously before returning. A late host is handled by re-sampling the
//! level once per skipped interval.
//!
//! No heap, no blocking, no hardware access: levels come in through
//! [`LevelReader`] and events go out through [`EventSink`].

#![cfg_attr(not(test), no_std)]
#![deny(unused_must_use)]

mod engine;
mod error;
mod event;
mod param;
mod pool;
mod reader;
mod waveform;

pub use engine::ButtonEngine;
pub use error::ButtonError;
pub use event::{ButtonEvent, EventSink, QueueSink};
pub use param::{
    ButtonParam, DEFAULT_CLICK_WINDOW_MS, DEFAULT_MIN_PRESS_TIME_MS, DEFAULT_REPEAT_DELAY_MS,
    DEFAULT_REPEAT_RATE_MS, DEFAULT_SAMPLING_INTERVAL_MS,
};
pub use pool::{ButtonId, ButtonPool, NoopLock, PoolLock, BUTTON_MAX};
pub use reader::{LevelReader, PinReader, Polarity};
