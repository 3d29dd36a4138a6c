//! Real-time playback of the JJY time code.
//!
//! This crate contains the two halves of the simulated transmitter:
//!
//! - [`Scheduler`]: a state machine that selects the active [`Symbol`](timecode::Symbol) for
//!   each one-second slot and computes the absolute deadline of the next transition. All
//!   deadlines derive from a fixed per-slot anchor that advances by exactly one second per slot,
//!   so scheduling jitter is absorbed instead of accumulating as drift.
//! - [`Synth`]: a continuous-phase square-wave generator that renders the scheduler's current
//!   symbol into 16-bit mono samples, at full volume during a symbol's on-duration and at a
//!   fixed attenuation during the [`Space`](timecode::Symbol::Space) remainder of each slot.
//!
//! The two halves only share a symbol snapshot: the scheduler never touches audio buffers, and
//! the synthesizer never looks at the clock. When they run on different threads (as they do
//! under a callback-driven audio backend), publishing the symbol through an atomic byte is
//! sufficient; see [`Symbol::from_raw`](timecode::Symbol::from_raw).
//!
//! This crate is `no_std`.
//!
//! # Examples
//! ```no_run
//! # use clock::now;
//! # use player::{Scheduler, Synth, DEFAULT_SAMPLE_RATE, DEFAULT_TONE_HZ, DEFAULT_VOLUME};
//! let mut scheduler = Scheduler::new();
//! let mut synth = Synth::new(DEFAULT_SAMPLE_RATE, DEFAULT_TONE_HZ, DEFAULT_VOLUME);
//! let mut buf = [0i16; 1024];
//!
//! scheduler.start(now().unwrap(), &mut ()).unwrap();
//! loop {
//! 	// Sleep until scheduler.next_wake(), then:
//! 	scheduler.on_wake(&mut ()).unwrap();
//! 	// Meanwhile the audio thread renders the current symbol:
//! 	synth.render(scheduler.state(), &mut buf);
//! }
//! ```

#![no_std]

use core::{error, fmt};

mod scheduler;
mod synth;

pub use scheduler::{Monitor, Scheduler};
pub use synth::{
	AudioSink, Synth, DEFAULT_SAMPLE_RATE, DEFAULT_TONE_HZ, DEFAULT_VOLUME, MIN_FILL,
	SPACE_ATTENUATION,
};

/// The error type for playback.
#[cfg_attr(test, derive(PartialEq))]
pub enum PlayerError {
	/// The host clock could not be converted to local calendar time, so no frame could be
	/// encoded. The timestamp that failed to convert is provided in the payload.
	ClockUnavailable(i64)
}

impl fmt::Display for PlayerError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PlayerError::ClockUnavailable(x) => write!(f, "No local calendar time for timestamp: {}", x),
		}
	}
}

impl fmt::Debug for PlayerError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}

impl error::Error for PlayerError {}
