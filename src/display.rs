//! Terminal display of playback progress.
//!
//! The display is a single status line, redrawn in place: the wall-clock time as `HH:MM:SS`,
//! followed by the 60 slots of the frame currently playing. Markers are drawn red, 0 bits green,
//! and 1 bits yellow, with the slot currently being transmitted in reverse video.

use std::fmt::Write as _;
use std::io::{self, Write};

use clock::Civil;
use player::Monitor;
use timecode::{Frame, Symbol};

/// ANSI color and cell character for a slot symbol.
fn cell(symbol: Symbol) -> (&'static str, char) {
	match symbol {
		Symbol::Marker => ("\x1b[31m", 'M'),
		Symbol::Bit1 => ("\x1b[33m", '1'),
		_ => ("\x1b[32m", '0')
	}
}

/// Status line renderer. Implements [`Monitor`] to follow playback.
pub struct Console {
	/// The frame currently playing, if any.
	frame: Option<Frame>,
	/// The slot currently being transmitted.
	position: usize,
	/// Wall-clock time last drawn, to limit redraws to once per second.
	time: Option<(u8, u8, u8)>
}

impl Console {
	/// Create a console with nothing drawn yet.
	pub fn new() -> Console {
		Console {
			frame: None,
			position: 0,
			time: None
		}
	}

	/// Update the wall-clock portion of the status line.
	///
	/// Redraws only when the displayed second changes.
	pub fn status(&mut self, date: &Civil) {
		let time = (date.hour, date.min, date.sec);
		if self.time != Some(time) {
			self.time = Some(time);
			self.redraw();
		}
	}

	/// Terminate the status line before exit.
	pub fn finish(&mut self) {
		let mut out = io::stdout();
		let _ = out.write_all(b"\n");
		let _ = out.flush();
	}

	/// Redraw the whole status line in place.
	///
	/// Output errors are ignored; the display is best effort.
	fn redraw(&mut self) {
		let mut line = String::with_capacity(600);
		line.push('\r');
		if let Some((hour, min, sec)) = self.time {
			let _ = write!(line, "{:02}:{:02}:{:02} ", hour, min, sec);
		}
		if let Some(frame) = &self.frame {
			for (i, &slot) in frame.slots().iter().enumerate() {
				let (color, c) = cell(slot);
				line.push_str(color);
				if i == self.position {
					line.push_str("\x1b[7m");
				}
				line.push(c);
				line.push_str("\x1b[0m");
			}
		}
		let mut out = io::stdout();
		let _ = out.write_all(line.as_bytes());
		let _ = out.flush();
	}
}

impl Monitor for Console {
	fn frame_updated(&mut self, frame: &Frame) {
		self.frame = Some(*frame);
		self.position = 0;
		self.redraw();
	}

	fn position_updated(&mut self, second: usize) {
		self.position = second;
		self.redraw();
	}
}
