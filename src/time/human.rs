use anyhow::{bail, Context, Result};
use regex::Regex;

const SECOND: u32 = 1000;
const MINUTE: u32 = 60 * SECOND;
const HOUR: u32 = 60 * MINUTE;

/// Extensions to millisecond counts
pub trait MillisExt
where
    Self: Sized,
{
    /// Parse a millisecond count from a humanized string, for example "1m30s" or "250ms".
    ///
    /// A bare integer is taken as milliseconds.
    fn from_human(s: &str) -> Result<Self>;

    /// Formats the count as a "kitchen timer" string, e.g. mm:ss.mmm.
    ///
    /// If the count is longer than an hour, it is formatted as hh:mm:ss.mmm.
    fn to_kitchen(&self) -> String;

    /// Formats the count in a humanized way, for example 22m30s.
    fn to_human(&self) -> String;
}

impl MillisExt for u32 {
    fn from_human(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() {
            bail!("Duration string is empty");
        }

        if let Ok(ms) = s.parse::<u32>() {
            return Ok(ms);
        }

        let re = Regex::new(r"^(?:([0-9]+)h)?(?:([0-9]+)m)?(?:([0-9]+)s)?(?:([0-9]+)ms)?$")?;
        let caps = re
            .captures(s)
            .with_context(|| format!("String {:?} does not seem to be a duration", s))?;

        let mut total: u64 = 0;
        let mut matched = false;

        for (index, unit) in [(1, HOUR), (2, MINUTE), (3, SECOND), (4, 1)] {
            if let Some(part) = caps.get(index) {
                let value: u64 = part
                    .as_str()
                    .parse()
                    .with_context(|| format!("String {} is not an integer", part.as_str()))?;

                total = total.saturating_add(value.saturating_mul(unit as u64));
                matched = true;
            }
        }

        if !matched {
            bail!("String {:?} does not seem to be a duration", s);
        }

        u32::try_from(total).with_context(|| format!("Duration {} is too long", s))
    }

    fn to_kitchen(&self) -> String {
        let hours = self / HOUR;
        let minutes = (self % HOUR) / MINUTE;
        let seconds = (self % MINUTE) / SECOND;
        let millis = self % SECOND;

        if hours > 0 {
            format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
        } else {
            format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
        }
    }

    fn to_human(&self) -> String {
        if *self == 0 {
            return "0ms".to_string();
        }

        let mut acc = String::new();

        for (value, suffix) in [
            (self / HOUR, "h"),
            ((self % HOUR) / MINUTE, "m"),
            ((self % MINUTE) / SECOND, "s"),
            (self % SECOND, "ms"),
        ] {
            if value > 0 {
                acc.push_str(&format!("{}{}", value, suffix));
            }
        }

        acc
    }
}

#[cfg(test)]
mod test {
    use super::MillisExt;

    #[test]
    fn kitchen_test() {
        let clock = (25 * 60 * 1000u32).to_kitchen();

        assert_eq!(clock, "25:00.000");
    }

    #[test]
    fn kitchen_millis_test() {
        assert_eq!(12_345u32.to_kitchen(), "00:12.345");
    }

    #[test]
    fn kitchen_hours_test() {
        assert_eq!(3_723_004u32.to_kitchen(), "01:02:03.004");
    }

    #[test]
    fn human_test() {
        assert_eq!(0u32.to_human(), "0ms");
        assert_eq!(90_250u32.to_human(), "1m30s250ms");
        assert_eq!(3_600_000u32.to_human(), "1h");
        assert_eq!(3_723_004u32.to_human(), "1h2m3s4ms");
    }

    #[test]
    fn parse_human_units() {
        assert_eq!(u32::from_human("250ms").unwrap(), 250);
        assert_eq!(u32::from_human("2s").unwrap(), 2000);
        assert_eq!(u32::from_human("1m30s").unwrap(), 90_000);
        assert_eq!(u32::from_human("1h2m3s4ms").unwrap(), 3_723_004);
    }

    #[test]
    fn parse_bare_integer_as_millis() {
        assert_eq!(u32::from_human("1500").unwrap(), 1500);
        assert_eq!(u32::from_human(" 42 ").unwrap(), 42);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(u32::from_human("").is_err());
        assert!(u32::from_human("soon").is_err());
        assert!(u32::from_human("5d").is_err());
        assert!(u32::from_human("-5").is_err());
    }

    #[test]
    fn parse_rejects_overflow() {
        assert!(u32::from_human("2000h").is_err());
        assert!(u32::from_human("4294967296").is_err());
    }
}
