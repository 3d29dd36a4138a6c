//! Continuous-phase square-wave tone generation.
//!
//! The synthesizer renders the scheduler's current symbol as 16-bit signed mono samples: full
//! volume during a symbol's on-duration, a fixed fraction of it during [`Space`](Symbol::Space),
//! and silence when [`Stopped`](Symbol::Stopped). The phase accumulator persists across buffer
//! fills and keeps advancing even at zero amplitude, so the waveform stays continuous through
//! buffer boundaries and state toggles alike.
//!
//! The default tone is 40 kHz / 3, placing the real JJY carrier at the third harmonic of the
//! audio output.

use core::f64::consts::PI;

use timecode::Symbol;

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Default tone frequency in Hz. The 40 kHz JJY carrier is the third harmonic.
pub const DEFAULT_TONE_HZ: f64 = 40000.0 / 3.0;

/// Default peak output amplitude.
pub const DEFAULT_VOLUME: i16 = 32760;

/// Divisor applied to the volume during [`Symbol::Space`]: the quiet carrier between symbol
/// on-durations. A simulation choice rather than part of the broadcast format.
pub const SPACE_ATTENUATION: i32 = 10;

/// Minimum free sample count before the synthesizer will write to a sink.
///
/// Smaller writes are deferred to the next fill, avoiding a stream of tiny low-latency bursts.
pub const MIN_FILL: usize = 96;

/// Samples rendered per write while pumping a sink.
const CHUNK: usize = 256;

/// Output destination for rendered samples.
///
/// The sink buffers internally and drains at the sample rate the [`Synth`] was constructed
/// with: 16-bit signed, mono. [`write`](AudioSink::write) must accept any slice no longer than
/// the preceding [`free_capacity`](AudioSink::free_capacity) and must not block.
pub trait AudioSink {
	/// The number of samples that can be written without blocking.
	fn free_capacity(&self) -> usize;
	/// Write samples to the sink, returning how many were accepted.
	fn write(&mut self, samples: &[i16]) -> usize;
}

/// Continuous-phase square-wave generator.
///
/// # Examples
///
/// ```
/// # use player::{Synth, DEFAULT_SAMPLE_RATE, DEFAULT_VOLUME};
/// # use timecode::Symbol;
/// // A 12 kHz square wave at 48 kHz has a four-sample period.
/// let mut synth = Synth::new(DEFAULT_SAMPLE_RATE, 12000.0, DEFAULT_VOLUME);
/// let mut buf = [0i16; 8];
/// synth.render(Symbol::Marker, &mut buf);
/// let v = DEFAULT_VOLUME;
/// assert_eq!(buf, [v, v, -v, -v, v, v, -v, -v]);
/// ```
pub struct Synth {
	/// Waveform phase, ranged [0, 2π). Persists across fills.
	phase: f64,
	/// Phase advance per sample.
	step: f64,
	/// Peak amplitude of the square wave.
	volume: i16
}

impl Synth {
	/// Create a synthesizer producing `tone` Hz at `sample_rate` Hz with peak amplitude
	/// `volume`.
	pub fn new(sample_rate: u32, tone: f64, volume: i16) -> Synth {
		Synth {
			phase: 0.0,
			step: PI * 2.0 * tone / sample_rate as f64,
			volume
		}
	}

	/// Render `state` into `buf`, advancing the phase by one step per sample.
	///
	/// The square wave is positive for phase in [0, π) and negative for [π, 2π). Amplitude is
	/// zero for [`Symbol::Stopped`], `volume` for the slot symbols, and
	/// `volume / SPACE_ATTENUATION` for [`Symbol::Space`]; the phase advances regardless, so
	/// toggling state mid-stream cannot produce a discontinuity beyond the amplitude change
	/// itself.
	pub fn render(&mut self, state: Symbol, buf: &mut [i16]) {
		let amplitude = match state {
			Symbol::Stopped => 0,
			Symbol::Space => (self.volume as i32 / SPACE_ATTENUATION) as i16,
			Symbol::Marker | Symbol::Bit0 | Symbol::Bit1 => self.volume
		};

		for sample in buf.iter_mut() {
			*sample = if self.phase < PI { amplitude } else { -amplitude };
			self.phase += self.step;
			while self.phase >= PI * 2.0 {
				self.phase -= PI * 2.0;
			}
		}
	}

	/// Fill a sink's free capacity with `state`'s tone.
	///
	/// Writes in chunks while the sink has at least [`MIN_FILL`] samples free, then returns.
	/// Insufficient capacity is backpressure, not an error: the remainder is rendered on a later
	/// call. Never blocks.
	pub fn pump(&mut self, state: Symbol, sink: &mut impl AudioSink) {
		let mut chunk = [0i16; CHUNK];
		loop {
			let free = sink.free_capacity();
			if free < MIN_FILL {
				return;
			}
			let n = free.min(CHUNK);
			self.render(state, &mut chunk[..n]);
			if sink.write(&chunk[..n]) < n {
				return;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	extern crate std;
	use std::vec::Vec;
	use super::*;

	/// 12 kHz at 48 kHz: exactly four samples per period.
	fn test_synth() -> Synth {
		Synth::new(DEFAULT_SAMPLE_RATE, 12000.0, DEFAULT_VOLUME)
	}

	#[test]
	fn square_test() {
		let mut synth = test_synth();
		let mut buf = [0i16; 12];
		synth.render(Symbol::Bit1, &mut buf);
		let v = DEFAULT_VOLUME;
		assert_eq!(buf, [v, v, -v, -v, v, v, -v, -v, v, v, -v, -v]);
	}

	#[test]
	fn amplitude_test() {
		let v = DEFAULT_VOLUME;
		let q = (DEFAULT_VOLUME as i32 / SPACE_ATTENUATION) as i16;
		let mut buf = [0i16; 4];

		for state in [Symbol::Marker, Symbol::Bit0, Symbol::Bit1] {
			let mut synth = test_synth();
			synth.render(state, &mut buf);
			assert_eq!(buf, [v, v, -v, -v], "state: {:?}", state);
		}

		let mut synth = test_synth();
		synth.render(Symbol::Space, &mut buf);
		assert_eq!(buf, [q, q, -q, -q]);

		let mut synth = test_synth();
		synth.render(Symbol::Stopped, &mut buf);
		assert_eq!(buf, [0, 0, 0, 0]);
	}

	#[test]
	fn continuity_test() {
		// Consecutive fills continue the waveform where the previous one left off, including
		// across a state toggle and a silent stretch.
		let mut synth = test_synth();
		let v = DEFAULT_VOLUME;
		let q = (DEFAULT_VOLUME as i32 / SPACE_ATTENUATION) as i16;

		let mut buf = [0i16; 3];
		synth.render(Symbol::Marker, &mut buf);
		assert_eq!(buf, [v, v, -v]);

		// Phase is at 3π/2: the next sample is still in the negative half.
		let mut buf = [0i16; 2];
		synth.render(Symbol::Space, &mut buf);
		assert_eq!(buf, [-q, q]);

		// Silence advances the phase too; one stopped sample leaves us at the second
		// positive sample of the period.
		let mut buf = [0i16; 1];
		synth.render(Symbol::Stopped, &mut buf);
		assert_eq!(buf, [0]);

		let mut buf = [0i16; 3];
		synth.render(Symbol::Bit0, &mut buf);
		assert_eq!(buf, [-v, -v, v]);
	}

	/// Fixed-capacity sink that records everything written.
	struct TestSink {
		samples: Vec<i16>,
		capacity: usize
	}

	impl AudioSink for TestSink {
		fn free_capacity(&self) -> usize {
			self.capacity - self.samples.len()
		}

		fn write(&mut self, samples: &[i16]) -> usize {
			self.samples.extend_from_slice(samples);
			samples.len()
		}
	}

	#[test]
	fn pump_test() {
		let mut synth = test_synth();
		let mut sink = TestSink { samples: Vec::new(), capacity: 1000 };

		// Fills all free capacity, not just whole chunks.
		synth.pump(Symbol::Bit1, &mut sink);
		assert_eq!(sink.samples.len(), 1000);

		// A full sink defers to the next fill.
		synth.pump(Symbol::Bit1, &mut sink);
		assert_eq!(sink.samples.len(), 1000);

		// The waveform is continuous across chunked writes.
		let v = DEFAULT_VOLUME;
		for (i, &sample) in sink.samples.iter().enumerate() {
			let expected = if i % 4 < 2 { v } else { -v };
			assert_eq!(sample, expected, "sample: {}", i);
		}
	}

	#[test]
	fn min_fill_test() {
		let mut synth = test_synth();
		let mut sink = TestSink { samples: Vec::new(), capacity: MIN_FILL - 1 };
		synth.pump(Symbol::Marker, &mut sink);
		assert_eq!(sink.samples.len(), 0);

		let mut sink = TestSink { samples: Vec::new(), capacity: MIN_FILL };
		synth.pump(Symbol::Marker, &mut sink);
		assert_eq!(sink.samples.len(), MIN_FILL);
	}
}
