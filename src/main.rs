//! Simulate the JJY time signal using simple audio output.
//!
//! This application generates the [JJY] longwave time code for the host's current local time and
//! renders it as an audible gated square-wave tone on the device's default audio output. The
//! tone defaults to 40 kHz / 3, so the real 40 kHz carrier frequency is the third harmonic of
//! the output -- close enough to set a radio-controlled clock held against the speaker under
//! good conditions, and a faithful audible simulation of the broadcast either way.
//!
//! [JJY]: https://en.wikipedia.org/wiki/JJY
//!
//! While running, the terminal shows the wall-clock time and the frame being transmitted, with
//! the active slot highlighted.
//!
//! # Command Line Arguments
//!
//! General form: `jjysim [options...]`
//!
//! | Short form | Long form     | Argument        | Default           | Description                      |
//! | ---------- | ------------- | --------------- | ----------------- | -------------------------------- |
//! | `-n`, `-c` | `--count`     | Integer > 0     | 4                 | The number of minutes to transmit|
//! | `-f`       | `--frequency` | Hz, (0, 24000]  | 13333.33 (40k/3)  | The tone frequency               |
//! | `-v`       | `--volume`    | Integer >= 0    | 32760             | The peak output amplitude        |
//!
//! Transmission starts at the next whole second of the host clock and plays a full 60-slot
//! frame, re-encoded each minute, per `--count` minute requested.
//!
//! # Examples
//!
//! Transmit for four minutes with default settings
//! ```sh
//! jjysim
//! ```
//!
//! Transmit for ten minutes at reduced volume
//! ```sh
//! jjysim -n 10 -v 8000
//! ```

use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use args::{Arguments, ArgumentsError};
use clock::{now, Civil};
use player::{AudioSink, Scheduler, Synth, DEFAULT_SAMPLE_RATE};
use timecode::Symbol;

mod args;
mod display;

/// An [`AudioSink`] over one audio callback's output buffer.
///
/// Free capacity is the unwritten remainder of the buffer. [`SliceSink::finish`] zeroes
/// whatever the synthesizer left unfilled so the device never plays stale samples.
struct SliceSink<'a> {
	data: &'a mut [i16],
	written: usize
}

impl<'a> SliceSink<'a> {
	fn new(data: &'a mut [i16]) -> SliceSink<'a> {
		SliceSink { data, written: 0 }
	}

	/// Zero the unwritten tail of the buffer.
	fn finish(self) {
		self.data[self.written..].fill(0);
	}
}

impl AudioSink for SliceSink<'_> {
	fn free_capacity(&self) -> usize {
		self.data.len() - self.written
	}

	fn write(&mut self, samples: &[i16]) -> usize {
		let n = samples.len().min(self.free_capacity());
		self.data[self.written..self.written + n].copy_from_slice(&samples[..n]);
		self.written += n;
		n
	}
}

/// Error handler for audio streaming.
///
/// Panics and prints the error.
fn audio_error(error: cpal::StreamError) {
	panic!("Error occured on the stream: {}", error);
}

/// Generate the JJY time signal and play it over the default audio output device.
///
/// Creates and configures output at 48kHz, 1024 sample `i16` mono buffer, and transmits
/// `args.count` minutes of time code, blocking until complete. The playback scheduler runs on
/// this thread, sleeping until each symbol transition deadline; the audio callback renders
/// whatever symbol the scheduler last published through the shared atomic.
///
/// # Errors
///
/// This function can generate a variety of errors, all wrapped in `Box<dyn Error>`:
/// - [`cpal::BuildStreamError`], [`cpal::PlayStreamError`] from configuring and playing audio.
/// - `&str` for several untyped errors (no output audio device, failed to get system time).
/// - [`player::PlayerError`] if the host clock cannot be converted to local calendar time.
fn play(args: Arguments) -> Result<ExitCode, Box<dyn Error>> {
	// Set up output device
	let host = cpal::default_host();
	let device = host.default_output_device().ok_or("Failed to get default audio output device")?;
	let config = cpal::StreamConfig {
		channels: 1,
		sample_rate: cpal::SampleRate(DEFAULT_SAMPLE_RATE),
		buffer_size: cpal::BufferSize::Fixed(1024),
	};

	// The scheduler publishes its current symbol here; the audio callback takes snapshots.
	let current = Arc::new(AtomicU8::new(Symbol::Stopped as u8));

	// Create output stream rendering the published symbol
	let snapshot = current.clone();
	let mut synth = Synth::new(DEFAULT_SAMPLE_RATE, args.frequency, args.volume);
	let stream = device.build_output_stream(
					&config,
					move |data: &mut [i16], _info: &cpal::OutputCallbackInfo| {
						let state = Symbol::from_raw(snapshot.load(Ordering::Acquire));
						let mut sink = SliceSink::new(data);
						synth.pump(state, &mut sink);
						sink.finish();
					},
					audio_error,
					None)?;
	stream.play()?;

	// Start playback anchored to the next whole second
	let mut console = display::Console::new();
	let mut scheduler = Scheduler::new();
	let start = now().ok_or("Failed to get current system time")?;
	scheduler.start(start, &mut console)?;
	current.store(scheduler.state() as u8, Ordering::Release);

	// Drive the scheduler until the requested number of minutes has played
	let total = args.count.get() * 60;
	while let Some(deadline) = scheduler.next_wake() {
		let time = now().ok_or("Failed to get current system time")?;
		let wait = deadline - time;
		if wait.0 > 0 {
			thread::sleep(Duration::from_nanos(wait.0 as u64));
		}

		scheduler.on_wake(&mut console)?;
		current.store(scheduler.state() as u8, Ordering::Release);

		if let Some(time) = now() {
			if let Some(date) = Civil::from_local(time.sec) {
				console.status(&date);
			}
		}

		if scheduler.seconds_elapsed() >= total {
			scheduler.stop();
			current.store(Symbol::Stopped as u8, Ordering::Release);
		}
	}
	console.finish();

	Ok(ExitCode::SUCCESS)
}

/// Main program entry point.
///
/// Parses input arguments and plays the time signal. See [`crate`] documentation for details.
fn main() -> ExitCode {
	let args = match Arguments::parse(std::env::args_os().skip(1)) {
		Ok(a) => a,
		Err(e) => {
			return if let ArgumentsError::Help = e {
				println!("\
Simulate the JJY longwave time signal as an audible tone.

Usage: jjysim [OPTIONS]

Options:
  -n, -c, --count <COUNT>   the number of minutes to transmit, default 4
  -f, --frequency <HZ>      the tone frequency in Hz, default 13333.33 (40 kHz / 3)
  -v, --volume <AMPLITUDE>  the peak output amplitude, default 32760

Examples:
  jjysim
  jjysim -n 10
  jjysim -f 15000 -v 8000\n");
				ExitCode::SUCCESS
			} else {
				eprintln!("{}", e);
				ExitCode::FAILURE
			}
		}
	};

	play(args)
		.inspect_err(|e| eprintln!("{}", e))
		.unwrap_or(ExitCode::FAILURE)
}
