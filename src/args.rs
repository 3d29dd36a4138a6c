//! Support for command line argument parsing.
//!
//! See [crate] documentation for details on command line arguments and examples.

use std::error::Error;
use std::ffi::OsString;
use std::fmt::{Display, Debug};
use std::num::NonZero;

use player::{DEFAULT_SAMPLE_RATE, DEFAULT_TONE_HZ, DEFAULT_VOLUME};

/// The error type for parsing command line arguments.
#[cfg_attr(test, derive(PartialEq))]
pub enum ArgumentsError {
	/// The option was unrecognized. The option is returned as the payload of this variant.
	UnrecognizedOption(String),
	/// A positional argument was supplied, but none are expected. The argument is returned as
	/// the payload of this variant.
	UnexpectedArgument(String),
	/// Error converting an option or parameter to UTF-8. The argument index and original
	/// [`OsString`] that could not be converted are returned as the payload of this variant.
	InvalidUTF8(usize, OsString),
	/// The provided minute count was invalid. The supplied count argument is returned as the
	/// payload of this variant.
	InvalidCount(String),
	/// The provided tone frequency was invalid. The supplied frequency argument is returned as
	/// the payload of this variant.
	InvalidFrequency(String),
	/// The provided volume was invalid. The supplied volume argument is returned as the payload
	/// of this variant.
	InvalidVolume(String),
	/// The parameter for an option was not supplied. The option is returned as the payload for
	/// this variant.
	MissingParameter(String),
	/// Help option (-h) was included, so print help details and exit.
	Help
}

impl Display for ArgumentsError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ArgumentsError::UnrecognizedOption(s) => write!(f, "Unrecognized option: {}", s),
			ArgumentsError::UnexpectedArgument(s) => write!(f, "Unexpected argument: {}", s),
			ArgumentsError::InvalidUTF8(i, v) => write!(f, "Invalid UTF-8 in argument {}: {:?}", i, v),
			ArgumentsError::InvalidCount(s) => write!(f, "Invalid count: {}", s),
			ArgumentsError::InvalidFrequency(s) => write!(f, "Invalid frequency: {}", s),
			ArgumentsError::InvalidVolume(s) => write!(f, "Invalid volume: {}", s),
			ArgumentsError::MissingParameter(s) => write!(f, "Missing parameter for option {}", s),
			ArgumentsError::Help => write!(f, "Help requested")
		}
	}
}

impl Debug for ArgumentsError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		Display::fmt(self, f)
	}
}

impl Error for ArgumentsError {}

/// Convert an argument to [`&str`].
///
/// The function takes the argument index `i`, optional argument name `a`, and the argument `s`.
///
/// # Errors
///
/// Returns [`ArgumentsError::InvalidUTF8`] if the argument could not be converted to UTF-8 or
/// [`ArgumentsError::MissingParameter`] if the argument is `None`.
fn arg_to_str<'a, 'b>(i: usize, a: Option<&'a str>, s: Option<&'b OsString>)
	-> Result<&'b str, ArgumentsError>
{
	match s {
		Some(v) => v.to_str().ok_or_else(|| ArgumentsError::InvalidUTF8(i, v.clone())),
		None => Err(ArgumentsError::MissingParameter(a.map(String::from).unwrap_or_default()))
	}
}

/// Parsed command line arguments.
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Arguments {
	/// The number of minutes to transmit.
	pub count: NonZero<u64>,
	/// The tone frequency in Hz.
	pub frequency: f64,
	/// The peak output amplitude.
	pub volume: i16
}

impl Arguments {
	/// Parse command line arguments.
	///
	/// The input can be any type that implements [`Iterator`] that yields [`OsString`], though
	/// typically this would be [`std::env::args_os`]. This function assumes that the application
	/// name is **not** supplied as the first item yielded by `args`, see examples for common
	/// use.
	///
	/// # Errors
	///
	/// This function can return any of the variants in [`ArgumentsError`]. See that
	/// documentation for more details.
	///
	/// # Examples
	///
	/// ```
	/// let args = match Arguments::parse(std::env::args_os().skip(1)) {
	/// 	Ok(a) => a,
	/// 	Err(e) => {
	/// 		// Handle error
	/// 		panic!("{}", e);
	/// 	}
	/// };
	/// ```
	pub fn parse(mut args: impl Iterator<Item = OsString>) -> Result<Arguments, ArgumentsError>
	{
		let mut count: Option<NonZero<u64>> = None;
		let mut frequency: Option<f64> = None;
		let mut volume: Option<i16> = None;
		let mut arg = args.next();
		let mut i = 0;
		loop {
			if arg.is_none() { break; }
			match arg_to_str(i, None, arg.as_ref())? {
				n @ ("-n" | "-c" | "--count") => {
					count = Some(
						arg_to_str(i+1, Some(n), args.next().as_ref())
						.and_then(
							|v| v.parse().map_err(|_| ArgumentsError::InvalidCount(v.to_string()))
						)?
					);
					// Increment because we called args.next()
					i += 1;
				},
				n @ ("-f" | "--frequency") => {
					frequency = Some(
						arg_to_str(i+1, Some(n), args.next().as_ref())
						.and_then(|v| {
							v.parse()
								.ok()
								.filter(|f| *f > 0.0 && *f <= DEFAULT_SAMPLE_RATE as f64 / 2.0)
								.ok_or_else(|| ArgumentsError::InvalidFrequency(v.to_string()))
						})?
					);
					// Increment because we called args.next()
					i += 1;
				},
				n @ ("-v" | "--volume") => {
					volume = Some(
						arg_to_str(i+1, Some(n), args.next().as_ref())
						.and_then(|v| {
							v.parse()
								.ok()
								.filter(|x| *x >= 0)
								.ok_or_else(|| ArgumentsError::InvalidVolume(v.to_string()))
						})?
					);
					// Increment because we called args.next()
					i += 1;
				},
				"-h" | "--help" => return Err(ArgumentsError::Help),
				v => {
					return if v.starts_with('-') {
						Err(ArgumentsError::UnrecognizedOption(v.to_string()))
					} else {
						Err(ArgumentsError::UnexpectedArgument(v.to_string()))
					}
				}
			}
			arg = args.next();
			// Increment because we called args.next()
			i += 1;
		}

		Ok(Arguments {
			count: count.unwrap_or(unsafe { NonZero::new_unchecked(4) }),
			frequency: frequency.unwrap_or(DEFAULT_TONE_HZ),
			volume: volume.unwrap_or(DEFAULT_VOLUME)
		})
	}
}

#[cfg(test)]
mod tests {
	use std::str::FromStr;
	use super::*;

	#[test]
	fn arg_to_str_test() {
		let valid = OsString::from_str("test").unwrap();
		assert_eq!(
			arg_to_str(1, Some("arg"), Some(&valid)),
			Ok("test")
		);
		assert_eq!(
			arg_to_str(1, Some("arg"), None),
			Err(ArgumentsError::MissingParameter(String::from("arg")))
		);

		let invalid = unsafe { OsString::from_encoded_bytes_unchecked(vec![b't', 0xff, b's', b't']) };
		assert_eq!(
			arg_to_str(1, Some("arg"), Some(&invalid)),
			Err(ArgumentsError::InvalidUTF8(1, invalid.clone()))
		);
	}

	#[test]
	fn arguments_parse_test() {
		let args: Vec<_> = vec![
			"-n", "5",
			"-f", "1000",
			"-v", "16000",
			"-c", "7",
			"-n", "asd",
			"-n", "0",
			"-f", "-3",
			"-f", "90000",
			"-v", "-1",
			"extra"
		].into_iter().map(OsString::from_str).map(Result::unwrap).collect();

		assert_eq!(
			// -n 5 -f 1000 -v 16000
			Arguments::parse(args.iter().take(6).cloned()),
			Ok(Arguments {
				count: NonZero::new(5).unwrap(),
				frequency: 1000.0,
				volume: 16000
			})
		);

		assert_eq!(
			// (no arguments)
			Arguments::parse(args.iter().take(0).cloned()),
			Ok(Arguments {
				count: NonZero::new(4).unwrap(),
				frequency: DEFAULT_TONE_HZ,
				volume: DEFAULT_VOLUME
			})
		);

		assert_eq!(
			// -n 5 -c 7
			Arguments::parse(args.iter().take(2).chain(args.iter().skip(6).take(2)).cloned()),
			Ok(Arguments {
				count: NonZero::new(7).unwrap(),
				frequency: DEFAULT_TONE_HZ,
				volume: DEFAULT_VOLUME
			})
		);

		assert_eq!(
			// -n
			Arguments::parse(args.iter().take(1).cloned()),
			Err(ArgumentsError::MissingParameter(String::from("-n")))
		);

		assert_eq!(
			// -n asd
			Arguments::parse(args.iter().skip(8).take(2).cloned()),
			Err(ArgumentsError::InvalidCount(String::from("asd")))
		);

		assert_eq!(
			// -n 0
			Arguments::parse(args.iter().skip(10).take(2).cloned()),
			Err(ArgumentsError::InvalidCount(String::from("0")))
		);

		assert_eq!(
			// -f -3
			Arguments::parse(args.iter().skip(12).take(2).cloned()),
			Err(ArgumentsError::InvalidFrequency(String::from("-3")))
		);

		assert_eq!(
			// -f 90000: above Nyquist for the 48 kHz output
			Arguments::parse(args.iter().skip(14).take(2).cloned()),
			Err(ArgumentsError::InvalidFrequency(String::from("90000")))
		);

		assert_eq!(
			// -v -1
			Arguments::parse(args.iter().skip(16).take(2).cloned()),
			Err(ArgumentsError::InvalidVolume(String::from("-1")))
		);

		assert_eq!(
			// extra
			Arguments::parse(args.iter().skip(18).take(1).cloned()),
			Err(ArgumentsError::UnexpectedArgument(String::from("extra")))
		);

		assert_eq!(
			// --frobnicate
			Arguments::parse([OsString::from_str("--frobnicate").unwrap()].into_iter()),
			Err(ArgumentsError::UnrecognizedOption(String::from("--frobnicate")))
		);

		assert_eq!(
			// -h
			Arguments::parse([OsString::from_str("-h").unwrap()].into_iter()),
			Err(ArgumentsError::Help)
		);
	}
}
