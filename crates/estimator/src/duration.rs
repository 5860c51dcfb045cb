//! Human readable durations in the `1h2m3.5s` style.
use std::fmt::Write as _;

use chrono::TimeDelta;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Format `d` using the largest units first, e.g. `1h2m3.5s`, `4.5ms` or `0s`.
pub fn format_duration(d: TimeDelta) -> String {
    let nanos = d.num_nanoseconds().unwrap_or(if d < TimeDelta::zero() { i64::MIN } else { i64::MAX });
    if nanos == 0 {
        return "0s".to_owned();
    }

    let mut out = String::new();
    if nanos < 0 {
        out.push('-');
    }
    let abs = nanos.unsigned_abs();

    if abs < NANOS_PER_SEC {
        let (unit, scale) = match abs {
            0..1_000 => ("ns", 1),
            1_000..1_000_000 => ("µs", 1_000),
            _ => ("ms", 1_000_000),
        };
        push_fraction(&mut out, abs, scale);
        out.push_str(unit);
        return out;
    }

    let secs = abs / NANOS_PER_SEC;
    let (hours, minutes) = (secs / 3600, secs / 60 % 60);
    if hours > 0 {
        let _ = write!(out, "{hours}h");
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{minutes}m");
    }
    push_fraction(&mut out, abs % (60 * NANOS_PER_SEC), NANOS_PER_SEC);
    out.push('s');
    out
}

/// Round `d` to the nearest second, halfway values away from zero.
pub fn round_to_seconds(d: TimeDelta) -> TimeDelta {
    let millis = d.num_milliseconds();
    let rem = millis % 1000;
    let whole = millis - rem;
    let rounded = if rem.abs() >= 500 { whole + rem.signum() * 1000 } else { whole };
    TimeDelta::milliseconds(rounded)
}

/// Appends `value / scale` with the remainder as trimmed decimal digits.
fn push_fraction(out: &mut String, value: u64, scale: u64) {
    let _ = write!(out, "{}", value / scale);
    let rem = value % scale;
    if rem == 0 {
        return;
    }
    let width = scale.ilog10() as usize;
    let digits = format!("{rem:0width$}");
    let _ = write!(out, ".{}", digits.trim_end_matches('0'));
}
