//! Drift-free scheduling of time code playback.
//!
//! Playback is driven by a single repeating wake-up. Each one-second slot begins with its symbol
//! transmitted at full power for the symbol's on-duration (200 ms for a marker, 500 ms for a 1,
//! 800 ms for a 0), followed by the attenuated [`Space`](Symbol::Space) remainder of the second.
//! The scheduler tracks the start of the current slot in an anchor timestamp that is advanced by
//! exactly one second per slot and never recomputed from the live clock; every wake-up deadline
//! is an absolute offset from that anchor, so a late wake-up shortens the next interval instead
//! of shifting all subsequent slots.

use clock::{Civil, Nanoseconds, Seconds, TimeSpec};
use timecode::{encode, Frame, Symbol};

use crate::PlayerError;

/// Observer of playback progress, e.g. a time code visualization.
///
/// Implementations receive [`frame_updated`](Monitor::frame_updated) whenever a frame is encoded
/// (once per minute) and [`position_updated`](Monitor::position_updated) as playback enters each
/// slot (once per second). Both are purely observational; the scheduler never reads anything
/// back. `()` implements `Monitor` as a no-op for headless playback.
pub trait Monitor {
	/// A new frame has been encoded.
	fn frame_updated(&mut self, frame: &Frame);
	/// Playback entered slot `second`, ranged [0, 59].
	fn position_updated(&mut self, second: usize);
}

impl Monitor for () {
	fn frame_updated(&mut self, _frame: &Frame) {}
	fn position_updated(&mut self, _second: usize) {}
}

/// A symbol's full-power on-duration at the start of its slot, in nanoseconds.
const fn on_duration(symbol: Symbol) -> i64 {
	match symbol {
		Symbol::Marker => 200_000_000,
		Symbol::Bit1 => 500_000_000,
		Symbol::Bit0 => 800_000_000,
		_ => 0
	}
}

/// Playback scheduler state machine.
///
/// The state is the [`Symbol`] the transmitter is currently sending: `Stopped` when idle,
/// `Space` between symbol on-durations, or one of the three slot symbols.
/// [`start`](Scheduler::start) anchors playback to the next whole second of the host clock and
/// encodes the first frame; the driving loop then sleeps until
/// [`next_wake`](Scheduler::next_wake) and calls [`on_wake`](Scheduler::on_wake), repeatedly.
///
/// # Examples
///
/// ```no_run
/// # use clock::now;
/// # use player::Scheduler;
/// let mut scheduler = Scheduler::new();
/// scheduler.start(now().unwrap(), &mut ()).unwrap();
/// while let Some(_deadline) = scheduler.next_wake() {
/// 	// sleep until deadline, then:
/// 	scheduler.on_wake(&mut ()).unwrap();
/// }
/// ```
pub struct Scheduler {
	/// The symbol currently being transmitted.
	state: Symbol,
	/// The frame for the current minute of playback. `None` when stopped.
	frame: Option<Frame>,
	/// Start of the current one-second slot. Advanced by exactly one second per slot, never
	/// recomputed from the live clock.
	anchor: TimeSpec,
	/// Whole seconds of playback completed since the start anchor.
	elapsed: u64,
	/// Absolute deadline of the next wake-up. `None` when stopped.
	next_wake: Option<TimeSpec>
}

impl Scheduler {
	/// Create a stopped scheduler.
	pub fn new() -> Scheduler {
		Scheduler {
			state: Symbol::Stopped,
			frame: None,
			anchor: TimeSpec { sec: 0, nsec: 0 },
			elapsed: 0,
			next_wake: None
		}
	}

	/// The symbol currently being transmitted.
	#[inline(always)]
	pub fn state(&self) -> Symbol {
		self.state
	}

	/// The absolute deadline of the next wake-up, or `None` when stopped.
	#[inline(always)]
	pub fn next_wake(&self) -> Option<TimeSpec> {
		self.next_wake
	}

	/// Whole seconds of playback completed since start.
	#[inline(always)]
	pub fn seconds_elapsed(&self) -> u64 {
		self.elapsed
	}

	/// Start playback.
	///
	/// Anchors the first slot to `now` rounded up to the next whole second, encodes the frame
	/// for that instant's local minute, and schedules the first wake-up at the anchor itself.
	/// The state becomes [`Symbol::Space`], so the quiet carrier is audible during the fraction
	/// of a second before the first slot begins.
	///
	/// # Errors
	///
	/// Returns [`PlayerError::ClockUnavailable`] if `now` has no local calendar representation.
	pub fn start(&mut self, now: TimeSpec, monitor: &mut impl Monitor)
		-> Result<(), PlayerError>
	{
		let anchor = now.ceil_seconds();
		let frame = encode_at(anchor.sec)?;
		monitor.frame_updated(&frame);

		self.state = Symbol::Space;
		self.frame = Some(frame);
		self.anchor = anchor;
		self.elapsed = 0;
		self.next_wake = Some(anchor);
		Ok(())
	}

	/// Stop playback.
	///
	/// Resets to a freshly constructed scheduler: the pending wake-up is cancelled, the frame is
	/// discarded, and the state becomes [`Symbol::Stopped`] so the next audio fill renders
	/// silence. A subsequent [`start`](Scheduler::start) re-anchors and re-encodes from scratch.
	pub fn stop(&mut self) {
		*self = Scheduler::new();
	}

	/// Process a wake-up.
	///
	/// Advances the state machine one transition: entering a slot selects its symbol and
	/// schedules the end of the on-duration; leaving a slot advances the anchor by exactly one
	/// second and schedules the start of the next slot. Entering slot 0 of a new minute encodes
	/// a fresh frame first. Wake-ups while stopped are ignored.
	///
	/// Lateness is absorbed: deadlines are computed from the anchor, not from the time this
	/// function is called, so an overrun shortens the next interval and long-run drift stays
	/// zero.
	///
	/// # Errors
	///
	/// Returns [`PlayerError::ClockUnavailable`] if a minute rollover fails to convert the
	/// anchor to local calendar time. The scheduler is unchanged when this happens.
	pub fn on_wake(&mut self, monitor: &mut impl Monitor) -> Result<(), PlayerError> {
		match self.state {
			Symbol::Stopped => Ok(()),
			Symbol::Space => self.enter_slot(monitor),
			_ => {
				self.anchor += Seconds(1);
				self.elapsed += 1;
				self.state = Symbol::Space;
				self.next_wake = Some(self.anchor);
				Ok(())
			}
		}
	}

	/// Transition from [`Symbol::Space`] into the slot beginning at the anchor.
	fn enter_slot(&mut self, monitor: &mut impl Monitor) -> Result<(), PlayerError> {
		let second = (self.elapsed % Frame::LEN as u64) as usize;
		if second == 0 && self.elapsed > 0 {
			// Minute rollover: replace the frame wholesale for the minute now at the anchor.
			let frame = encode_at(self.anchor.sec)?;
			monitor.frame_updated(&frame);
			self.frame = Some(frame);
		}

		match self.frame.as_ref().and_then(|f| f.get(second)) {
			Some(symbol) => {
				self.state = symbol;
				self.next_wake = Some(self.anchor + Nanoseconds(on_duration(symbol)));
				monitor.position_updated(second);
			},
			None => {
				// No symbol for this slot: hold in Space through the second.
				self.anchor += Seconds(1);
				self.elapsed += 1;
				self.next_wake = Some(self.anchor);
			}
		}
		Ok(())
	}
}

impl Default for Scheduler {
	fn default() -> Scheduler {
		Scheduler::new()
	}
}

/// Encode the frame for the local minute containing timestamp `sec`.
fn encode_at(sec: i64) -> Result<Frame, PlayerError> {
	let date = Civil::from_local(sec).ok_or(PlayerError::ClockUnavailable(sec))?;
	Ok(encode(&date))
}

#[cfg(test)]
mod tests {
	extern crate std;
	use std::vec::Vec;
	use super::*;

	/// Records every observer callback.
	#[derive(Default)]
	struct Recorder {
		frames: Vec<Frame>,
		positions: Vec<usize>
	}

	impl Monitor for Recorder {
		fn frame_updated(&mut self, frame: &Frame) {
			self.frames.push(*frame);
		}

		fn position_updated(&mut self, second: usize) {
			self.positions.push(second);
		}
	}

	// Sat, July 4, 2020. 11:36:58.2 UTC (exact local date-time is host dependent).
	const T0: TimeSpec = TimeSpec { sec: 1593862618, nsec: 200000000 };

	#[test]
	fn start_test() {
		let mut recorder = Recorder::default();
		let mut s = Scheduler::new();
		assert_eq!(s.state(), Symbol::Stopped);
		assert_eq!(s.next_wake(), None);

		s.start(T0, &mut recorder).unwrap();
		let anchor = TimeSpec { sec: T0.sec + 1, nsec: 0 };
		assert_eq!(s.state(), Symbol::Space);
		assert_eq!(s.next_wake(), Some(anchor));
		assert_eq!(s.seconds_elapsed(), 0);
		assert_eq!(recorder.frames.len(), 1);
		assert_eq!(recorder.positions.len(), 0);
	}

	#[test]
	fn slot_timing_test() {
		let mut recorder = Recorder::default();
		let mut s = Scheduler::new();
		s.start(T0, &mut recorder).unwrap();
		let anchor = TimeSpec { sec: T0.sec + 1, nsec: 0 };
		let frame = recorder.frames[0];

		// First slot: symbol on for its duration, then Space for the remainder.
		s.on_wake(&mut recorder).unwrap();
		let symbol = frame.get(0).unwrap();
		assert_eq!(s.state(), symbol);
		assert_eq!(symbol, Symbol::Marker);
		assert_eq!(s.next_wake(), Some(anchor + Nanoseconds(200_000_000)));
		assert_eq!(recorder.positions, [0]);

		s.on_wake(&mut recorder).unwrap();
		assert_eq!(s.state(), Symbol::Space);
		assert_eq!(s.next_wake(), Some(anchor + Seconds(1)));
		assert_eq!(s.seconds_elapsed(), 1);

		// Second slot is a data bit with an 800 or 500 ms on-duration.
		s.on_wake(&mut recorder).unwrap();
		let symbol = frame.get(1).unwrap();
		assert_eq!(s.state(), symbol);
		let on = match symbol {
			Symbol::Bit0 => 800_000_000,
			Symbol::Bit1 => 500_000_000,
			_ => panic!("slot 1 must be a data bit")
		};
		assert_eq!(s.next_wake(), Some(anchor + Seconds(1) + Nanoseconds(on)));
		assert_eq!(recorder.positions, [0, 1]);
	}

	#[test]
	fn drift_test() {
		// Wake-ups carry no timestamp, so simulated lateness cannot leak into the schedule;
		// after N seconds the anchor is the start anchor plus exactly N seconds.
		let mut s = Scheduler::new();
		s.start(T0, &mut ()).unwrap();
		let anchor = TimeSpec { sec: T0.sec + 1, nsec: 0 };

		let n = 150;
		for _ in 0..n {
			s.on_wake(&mut ()).unwrap(); // enter slot
			s.on_wake(&mut ()).unwrap(); // leave slot
		}
		assert_eq!(s.seconds_elapsed(), n);
		assert_eq!(s.next_wake(), Some(anchor + Seconds(n as i64)));
	}

	#[test]
	fn rollover_test() {
		let mut recorder = Recorder::default();
		let mut s = Scheduler::new();
		s.start(T0, &mut recorder).unwrap();

		// Play out exactly one frame.
		for _ in 0..Frame::LEN {
			s.on_wake(&mut recorder).unwrap();
			s.on_wake(&mut recorder).unwrap();
		}
		assert_eq!(recorder.positions.len(), Frame::LEN);

		// Entering slot 0 of the next minute encodes a fresh frame.
		s.on_wake(&mut recorder).unwrap();
		assert_eq!(recorder.frames.len(), 2);
		assert_eq!(recorder.positions.len(), Frame::LEN + 1);
		assert_eq!(*recorder.positions.last().unwrap(), 0);

		// The new frame is for one minute later than the first.
		let anchor_min = Civil::from_local(T0.sec + 1).unwrap().min;
		let next_min = Civil::from_local(T0.sec + 61).unwrap().min;
		assert_eq!(recorder.frames[0], encode_at(T0.sec + 1).unwrap());
		assert_eq!(recorder.frames[1], encode_at(T0.sec + 61).unwrap());
		assert_ne!(anchor_min, next_min);
	}

	#[test]
	fn positions_wrap_test() {
		let mut recorder = Recorder::default();
		let mut s = Scheduler::new();
		s.start(T0, &mut recorder).unwrap();

		for _ in 0..Frame::LEN + 5 {
			s.on_wake(&mut recorder).unwrap();
			s.on_wake(&mut recorder).unwrap();
		}

		let expected: Vec<usize> = (0..Frame::LEN).chain(0..5).collect();
		assert_eq!(recorder.positions, expected);
	}

	#[test]
	fn stop_test() {
		let mut recorder = Recorder::default();
		let mut s = Scheduler::new();
		s.start(T0, &mut recorder).unwrap();
		s.on_wake(&mut recorder).unwrap();
		assert_ne!(s.state(), Symbol::Stopped);

		s.stop();
		assert_eq!(s.state(), Symbol::Stopped);
		assert_eq!(s.next_wake(), None);
		assert_eq!(s.seconds_elapsed(), 0);

		// Wake-ups after stop are ignored.
		s.on_wake(&mut recorder).unwrap();
		assert_eq!(s.state(), Symbol::Stopped);
		assert_eq!(s.next_wake(), None);
	}

	#[test]
	fn restart_test() {
		let mut recorder = Recorder::default();
		let mut s = Scheduler::new();
		s.start(T0, &mut recorder).unwrap();
		for _ in 0..10 {
			s.on_wake(&mut recorder).unwrap();
		}
		s.stop();

		// Restarting later re-anchors and re-encodes; nothing stale survives.
		let t1 = TimeSpec { sec: T0.sec + 3600, nsec: 1 };
		s.start(t1, &mut recorder).unwrap();
		assert_eq!(s.state(), Symbol::Space);
		assert_eq!(s.next_wake(), Some(TimeSpec { sec: t1.sec + 1, nsec: 0 }));
		assert_eq!(s.seconds_elapsed(), 0);
		assert_eq!(*recorder.frames.last().unwrap(), encode_at(t1.sec + 1).unwrap());
	}

	#[test]
	fn missing_slot_test() {
		// A slot with no symbol holds Space through the second without transmitting.
		let anchor = TimeSpec { sec: T0.sec, nsec: 0 };
		let mut s = Scheduler {
			state: Symbol::Space,
			frame: None,
			anchor,
			elapsed: 5,
			next_wake: Some(anchor)
		};

		let mut recorder = Recorder::default();
		s.on_wake(&mut recorder).unwrap();
		assert_eq!(s.state(), Symbol::Space);
		assert_eq!(s.seconds_elapsed(), 6);
		assert_eq!(s.next_wake(), Some(anchor + Seconds(1)));
		assert_eq!(recorder.positions.len(), 0);
	}

	#[test]
	fn whole_second_start_test() {
		// A start exactly on a second boundary anchors to that second.
		let t = TimeSpec { sec: T0.sec, nsec: 0 };
		let mut s = Scheduler::new();
		s.start(t, &mut ()).unwrap();
		assert_eq!(s.next_wake(), Some(t));
	}
}
