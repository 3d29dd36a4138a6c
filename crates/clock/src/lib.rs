//! Utilities for dealing with wall-clock time.
//!
//! This crate is divided into two halves: [`time`] deals with Unix timestamps at nanosecond
//! granularity ([`TimeSpec`]) and simple deadline arithmetic on them; [`civil`] deals with
//! Gregorian calendar dates, providing day-count math on a continuous day number (the
//! Chronological Julian Day) and conversion from a Unix timestamp to the host's local calendar
//! time.
//!
//! This crate is `no_std` by default. Two optional features pull in [`libc`]:
//! - `now` enables [`time::now`], the current time via `clock_gettime`.
//! - `local` enables [`civil::Civil::from_local`], local calendar time via `localtime_r`.
//!
//! # Examples
//!
//! Deadline arithmetic on timestamps.
//! ```
//! # use clock::{TimeSpec, Seconds, Nanoseconds};
//! let anchor = TimeSpec { sec: 1735732800, nsec: 0 };
//! let deadline = anchor + Nanoseconds(200000000);
//! assert_eq!(deadline - anchor, Nanoseconds(200000000));
//! assert_eq!(anchor + Seconds(1), TimeSpec { sec: 1735732801, nsec: 0 });
//! ```
//!
//! Calendar math on a continuous day count.
//! ```
//! # use clock::civil::{cjd, wday_from_ymd, yday_from_ymd};
//! assert_eq!(cjd(2000, 1, 1), 2451545);
//! assert_eq!(yday_from_ymd(2024, 3, 1), 61);
//! assert_eq!(wday_from_ymd(2024, 1, 1), 1); // Monday
//! ```

#![no_std]

pub mod time;
pub mod civil;

pub use time::*;
pub use civil::*;
