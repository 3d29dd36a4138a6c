//! Unix timestamps with nanosecond granularity and deadline arithmetic.
//!
//! The playback scheduler computes all of its wake-up deadlines as absolute [`TimeSpec`] values
//! derived from a fixed anchor, so this module supports addition of [`Seconds`] and
//! [`Nanoseconds`], subtraction of two timestamps, ordering, and rounding up to the next whole
//! second.
//!
//! # Examples
//!
//! ```
//! # use clock::time::{Nanoseconds, Seconds, TimeSpec};
//! // Jan 1, 2025. 12:00:00.123456789 UTC.
//! let c = TimeSpec { sec: 1735732800, nsec: 123456789 };
//! assert_eq!(c + Seconds(10), TimeSpec { sec: c.sec + 10, nsec: c.nsec });
//! assert_eq!(c.ceil_seconds(), TimeSpec { sec: c.sec + 1, nsec: 0 });
//! ```

use core::ops::{Add, AddAssign, Sub};
#[cfg(feature = "now")]
use core::mem::MaybeUninit;
#[cfg(feature = "now")]
use libc::{timespec, clock_gettime, CLOCK_REALTIME};

/// Nanoseconds per second.
pub const NANOS_PER_SECOND: i64 = 1000000000;

/// Helper type to support math on [`TimeSpec`]s. Represents seconds.
///
/// # Examples
///
/// ```
/// # use clock::time::{Seconds, TimeSpec};
/// let c = TimeSpec { sec: 1735732800, nsec: 123456789 };
/// assert_eq!(c + Seconds(10), TimeSpec { sec: c.sec + 10, nsec: c.nsec });
/// ```
#[repr(transparent)]
pub struct Seconds(pub i64);

/// Helper type to support math on [`TimeSpec`]s. Represents nanoseconds.
///
/// Adding nanoseconds to a [`TimeSpec`] will roll over seconds if needed, see the examples.
///
/// # Examples
///
/// ```
/// # use clock::time::{Nanoseconds, TimeSpec};
/// let mut c = TimeSpec { sec: 1735732800, nsec: 123456789 };
/// assert_eq!(c + Nanoseconds(10), TimeSpec { sec: c.sec, nsec: 123456799});
/// c.nsec = 999999999;
/// assert_eq!(c + Nanoseconds(10), TimeSpec { sec: c.sec + 1, nsec: 9});
/// ```
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nanoseconds(pub i64);

/// Unix time with nanosecond granularity.
///
/// Supports addition / addition-assignment with [`Seconds`] and [`Nanoseconds`], and subtraction
/// of two timestamps yielding [`Nanoseconds`]. The derived ordering is chronological because
/// `nsec` is kept in the range [0-999999999].
///
/// # Examples
///
/// ```
/// # use clock::time::{Seconds, Nanoseconds, TimeSpec};
/// // Jan 1, 2025. 12:00:00.999999999 UTC.
/// let c = TimeSpec { sec: 1735732800, nsec: 999999999 };
/// assert_eq!(c + Seconds(10) + Nanoseconds(10), TimeSpec { sec: c.sec + 11, nsec: 9});
/// assert!(c < c + Nanoseconds(1));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeSpec {
	/// Seconds since the Unix epoch
	pub sec: i64,
	/// Nanoseconds since the beginning of `sec`, ranging [0-999999999]
	pub nsec: i64
}

impl TimeSpec {
	/// Round up to the next whole second.
	///
	/// A timestamp already on a whole second is returned unchanged.
	///
	/// # Examples
	///
	/// ```
	/// # use clock::time::TimeSpec;
	/// let c = TimeSpec { sec: 100, nsec: 1 };
	/// assert_eq!(c.ceil_seconds(), TimeSpec { sec: 101, nsec: 0 });
	/// let c = TimeSpec { sec: 100, nsec: 0 };
	/// assert_eq!(c.ceil_seconds(), c);
	/// ```
	pub fn ceil_seconds(self) -> TimeSpec {
		if self.nsec == 0 {
			self
		} else {
			TimeSpec { sec: self.sec + 1, nsec: 0 }
		}
	}
}

#[cfg(feature = "now")]
impl From<timespec> for TimeSpec {
	/// Convert from `libc::timespec` to [`TimeSpec`] for better math ergonomics
	fn from(value: timespec) -> Self {
		TimeSpec {
			sec: value.tv_sec,
			nsec: value.tv_nsec
		}
	}
}

impl Add<Seconds> for TimeSpec {
	type Output = Self;

	/// Add `rhs` seconds to `self`.
	fn add(mut self, rhs: Seconds) -> Self::Output {
		self.sec += rhs.0;
		self
	}
}

impl AddAssign<Seconds> for TimeSpec {
	/// Add `rhs` seconds to `self`.
	fn add_assign(&mut self, rhs: Seconds) {
		*self = *self + rhs;
	}
}

impl Add<Nanoseconds> for TimeSpec {
	type Output = Self;

	/// Add `rhs` nanoseconds to `self`, rolling over seconds as needed to ensure `nsec` stays in
	/// the range of [0-999999999].
	fn add(mut self, rhs: Nanoseconds) -> Self::Output {
		self.nsec += rhs.0;
		let sec = self.nsec / NANOS_PER_SECOND;
		self.sec += sec;
		self.nsec %= NANOS_PER_SECOND;
		if self.nsec < 0 {
			self.sec -= 1;
			self.nsec += NANOS_PER_SECOND;
		}
		self
	}
}

impl AddAssign<Nanoseconds> for TimeSpec {
	/// Add `rhs` nanoseconds to `self`, rolling over seconds as needed to ensure `nsec` stays in
	/// the range of [0-999999999].
	fn add_assign(&mut self, rhs: Nanoseconds) {
		*self = *self + rhs;
	}
}

impl Sub for TimeSpec {
	type Output = Nanoseconds;

	/// The signed difference between two timestamps, in nanoseconds.
	///
	/// Negative when `rhs` is later than `self`, which is how the playback loop detects an
	/// already-expired deadline.
	fn sub(self, rhs: TimeSpec) -> Self::Output {
		Nanoseconds((self.sec - rhs.sec) * NANOS_PER_SECOND + (self.nsec - rhs.nsec))
	}
}

/// Get the current time as a Unix timestamp with nanosecond granularity.
///
/// This function will return `None` if `libc::clock_gettime` fails.
///
/// This function is thread safe.
///
/// # Examples
///
/// ```
/// # use clock::time::now;
/// let c = now().expect("Failed to get current time");
/// assert!(c.sec > 0);
/// ```
#[cfg(feature = "now")]
pub fn now() -> Option<TimeSpec> {
	let mut time = MaybeUninit::<timespec>::uninit();
	// Safety:
	// - clock_gettime does not read time, only writes
	// - if clock_gettime returns zero, time is successfully initialized
	unsafe {
		match clock_gettime(CLOCK_REALTIME, time.as_mut_ptr()) {
			0 => Some(time.assume_init().into()),
			_ => None
		}
	}
}
