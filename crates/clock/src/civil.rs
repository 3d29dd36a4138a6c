//! Gregorian calendar math on a continuous day count.
//!
//! The time code encodes the day of year and day of week rather than month and day, so this
//! module counts days on a single continuous scale, the Chronological Julian Day, and derives
//! both values from differences and remainders of that count. Since none of the functions rely
//! on libc's mktime and gmtime functions, they are completely thread safe.
//!
//! # Examples
//!
//! ```
//! # use clock::civil::{cjd, wday_from_ymd, yday_from_ymd};
//! // J2000: January 1, 2000
//! assert_eq!(cjd(2000, 1, 1), 2451545);
//! assert_eq!(yday_from_ymd(2000, 12, 31), 366);
//! assert_eq!(wday_from_ymd(2000, 1, 1), 6); // Saturday
//! ```

#[cfg(feature = "local")]
use core::mem::MaybeUninit;
#[cfg(feature = "local")]
use libc::{localtime_r, time_t, tm};

/// Compute the Chronological Julian Day for a proleptic Gregorian date.
///
/// The count is continuous across all month and year boundaries, so consecutive dates always
/// differ by exactly one. `m` is the 1-indexed month starting at January, `d` the 1-indexed day
/// of the month.
///
/// The algorithm rotates the calendar so the year runs March through February, putting the leap
/// day last, then sums whole-century and four-year leap cycles. Division truncates, which is
/// well-defined here because the year offset keeps every operand positive for any date the host
/// clock can produce. Callers are responsible for supplying a valid date; out-of-range fields
/// (e.g. `d == 0`) produce a value on the same continuous scale but not a calendar day.
///
/// # Examples
///
/// ```
/// # use clock::civil::cjd;
/// assert_eq!(cjd(1970, 1, 1), 2440588);  // Unix epoch
/// assert_eq!(cjd(2000, 1, 1), 2451545);  // J2000
/// assert_eq!(cjd(2000, 1, 2), 2451546);
/// assert_eq!(cjd(2024, 2, 29), 2460370);
/// assert_eq!(cjd(2024, 3, 1), 2460371);
/// ```
pub const fn cjd(y: i32, m: u8, d: u8) -> i64 {
	let (y, m) = if m < 3 {
		(y as i64 - 1, m as i64 + 9)
	} else {
		(y as i64, m as i64 - 3)
	};
	let y = y + 4800;
	let c = y / 100;
	c * 146097 / 4 + (y - c * 100) * 1461 / 4 + (153 * m + 2) / 5 + d as i64 - 32045
}

/// Get the day of year (1-indexed, [1, 366]) for a given year, month, and day.
///
/// `y` must be the absolute Gregorian calendar year, `m` the 1-indexed month starting at
/// January, and `d` the day of the month.
///
/// # Examples
///
/// ```
/// # use clock::civil::yday_from_ymd;
/// assert_eq!(yday_from_ymd(2024, 1, 1), 1);
/// assert_eq!(yday_from_ymd(2024, 2, 29), 60);
/// assert_eq!(yday_from_ymd(2024, 12, 31), 366);
/// assert_eq!(yday_from_ymd(2023, 12, 31), 365);
/// ```
pub const fn yday_from_ymd(y: u16, m: u8, d: u8) -> u16 {
	(cjd(y as i32, m, d) - cjd(y as i32, 1, 1) + 1) as u16
}

/// Get the weekday (0-6 => Sunday-Saturday) for a given year, month, and day.
///
/// `y` must be the absolute Gregorian calendar year, `m` the 1-indexed month starting at
/// January, and `d` the day of the month.
///
/// # Examples
///
/// ```
/// # use clock::civil::wday_from_ymd;
/// assert_eq!(wday_from_ymd(2024, 1, 1), 1);   // Monday
/// assert_eq!(wday_from_ymd(2024, 2, 29), 4);  // Thursday
/// assert_eq!(wday_from_ymd(2024, 10, 27), 0); // Sunday
/// ```
pub const fn wday_from_ymd(y: u16, m: u8, d: u8) -> u8 {
	((cjd(y as i32, m, d) + 1) % 7) as u8
}

/// Local calendar date-time, the input to time code encoding.
///
/// Unlike `libc::tm`, `year` is the absolute Gregorian calendar year (i.e. 2024) and `mon` is
/// 1-indexed.
///
/// # Examples
///
/// ```
/// # use clock::civil::Civil;
/// let date = Civil { year: 2024, mon: 1, day: 1, hour: 0, min: 0, sec: 0 };
/// assert_eq!(date.yday(), 1);
/// assert_eq!(date.wday(), 1); // Monday
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Civil {
	/// Absolute Gregorian calendar year, e.g. 2024
	pub year: u16,
	/// Month of the year, ranged [1, 12]
	pub mon: u8,
	/// Day of the month, ranged [1, 31]
	pub day: u8,
	/// Hours, ranged [0, 23]
	pub hour: u8,
	/// Minutes, ranged [0, 59]
	pub min: u8,
	/// Seconds, ranged [0, 60] (60 only during a leap second)
	pub sec: u8
}

impl Civil {
	/// Get the day of year (1-indexed) for this date.
	#[inline(always)]
	pub const fn yday(&self) -> u16 {
		yday_from_ymd(self.year, self.mon, self.day)
	}

	/// Get the weekday (0-6 => Sunday-Saturday) for this date.
	#[inline(always)]
	pub const fn wday(&self) -> u8 {
		wday_from_ymd(self.year, self.mon, self.day)
	}

	/// Convert a Unix timestamp into the host's local calendar date-time.
	///
	/// This function will return `None` if `libc::localtime_r` fails, e.g. for timestamps whose
	/// local year does not fit in `libc::tm`.
	#[cfg(feature = "local")]
	pub fn from_local(time: i64) -> Option<Civil> {
		let time = time as time_t;
		let mut date = MaybeUninit::<tm>::uninit();
		// Safety:
		// - localtime_r does not read date, only writes
		// - if localtime_r returns non-null, date is successfully initialized
		let date = unsafe {
			if localtime_r(&time, date.as_mut_ptr()).is_null() {
				return None;
			}
			date.assume_init()
		};

		Some(Civil {
			year: (date.tm_year + 1900) as u16,
			mon: (date.tm_mon + 1) as u8,
			day: date.tm_mday as u8,
			hour: date.tm_hour as u8,
			min: date.tm_min as u8,
			sec: date.tm_sec as u8
		})
	}
}
