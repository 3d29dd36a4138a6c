//! Generate the JJY time code.
//!
//! See [JJY documentation](https://www.nict.go.jp/en/sts/jjy_signal.html) for details. This crate
//! converts a local calendar date-time into the 60-slot symbol sequence transmitted during one
//! minute of the broadcast: a marker on the minute and every tenth second, BCD-coded minute,
//! hour, day-of-year, year, and day-of-week fields, and two even-parity bits. The alternate
//! transmission mode during minutes 15 and 45 (call sign announcement and service interruption
//! bits) is not reproduced; those slots are sent as zeros like every other minute.
//!
//! This crate is `no_std`.
//!
//! # Examples
//! ```
//! # use clock::Civil;
//! # use timecode::{encode, Symbol};
//! // Monday, January 1, 2024. 00:00 local time.
//! let date = Civil { year: 2024, mon: 1, day: 1, hour: 0, min: 0, sec: 0 };
//! let frame = encode(&date);
//!
//! // Slot 0 and every tenth slot after second 9 mark the frame structure.
//! assert_eq!(frame.get(0), Some(Symbol::Marker));
//! assert_eq!(frame.get(9), Some(Symbol::Marker));
//! // Day of year 1: BCD ones digit ends at slot 33.
//! assert_eq!(frame.get(33), Some(Symbol::Bit1));
//! assert_eq!(frame.get(32), Some(Symbol::Bit0));
//! ```

#![no_std]

use core::fmt;

pub mod parity;
mod encode;

pub use encode::encode;
pub use parity::even_parity;

/// What the transmitter is doing during one second of playback.
///
/// `Marker`, `Bit0`, and `Bit1` are the three slot symbols of the time code, each transmitted at
/// full power for its own on-duration. `Space` is the attenuated remainder of each one-second
/// slot, and `Stopped` means no playback at all. The discriminants are stable so a symbol can be
/// published through an atomic byte and recovered with [`Symbol::from_raw`].
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
	/// Playback is stopped; no tone.
	Stopped = 0,
	/// The low-power remainder of a slot, between symbol on-durations.
	Space = 1,
	/// Minute or ten-second marker slot.
	Marker = 2,
	/// Data slot carrying binary 0.
	Bit0 = 3,
	/// Data slot carrying binary 1.
	Bit1 = 4
}

impl Symbol {
	/// Recover a symbol from its `u8` discriminant.
	///
	/// Unknown discriminants map to [`Symbol::Stopped`], the silent state.
	///
	/// # Examples
	///
	/// ```
	/// # use timecode::Symbol;
	/// assert_eq!(Symbol::from_raw(Symbol::Marker as u8), Symbol::Marker);
	/// assert_eq!(Symbol::from_raw(255), Symbol::Stopped);
	/// ```
	pub const fn from_raw(raw: u8) -> Symbol {
		match raw {
			1 => Symbol::Space,
			2 => Symbol::Marker,
			3 => Symbol::Bit0,
			4 => Symbol::Bit1,
			_ => Symbol::Stopped
		}
	}
}

/// One minute of the time code: exactly 60 symbols, one per second.
///
/// Slot 0 and every slot whose index is 9 mod 10 hold [`Symbol::Marker`]; the remaining 53 slots
/// hold the data bits. A frame is immutable once encoded and is replaced wholesale at each
/// minute rollover, never edited in place.
///
/// # Examples
///
/// ```
/// # use clock::Civil;
/// # use timecode::{encode, Symbol};
/// let date = Civil { year: 2024, mon: 7, day: 4, hour: 11, min: 36, sec: 0 };
/// let frame = encode(&date);
/// let markers = frame.slots().iter().filter(|&&s| s == Symbol::Marker).count();
/// assert_eq!(markers, 7);
/// assert_eq!(frame.get(60), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
	slots: [Symbol; Frame::LEN]
}

impl Frame {
	/// The number of one-second slots in a frame.
	pub const LEN: usize = 60;

	pub(crate) const fn new(slots: [Symbol; Frame::LEN]) -> Frame {
		Frame { slots }
	}

	/// Get the symbol for a given slot, or `None` past the end of the frame.
	#[inline(always)]
	pub fn get(&self, slot: usize) -> Option<Symbol> {
		self.slots.get(slot).copied()
	}

	/// All 60 slots in transmission order.
	#[inline(always)]
	pub fn slots(&self) -> &[Symbol] {
		&self.slots
	}
}

impl fmt::Display for Frame {
	/// Format the frame as 60 characters: `M` for markers, `0`/`1` for data slots.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for slot in self.slots {
			f.write_str(match slot {
				Symbol::Marker => "M",
				Symbol::Bit1 => "1",
				_ => "0"
			})?;
		}
		Ok(())
	}
}
