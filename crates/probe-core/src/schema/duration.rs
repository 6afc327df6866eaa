//! Protobuf JSON durations.
//!
//! `google.protobuf.Duration` is rendered in JSON as a decimal number of
//! seconds followed by `s`, e.g. `"3600s"` or `"0.250s"`. Uptime fields of
//! `server_info` use this form.

use std::time::Duration;

/// Parse a protobuf JSON duration such as `"12.5s"`.
///
/// Negative durations are rejected; the admin views only report elapsed time.
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let body = raw
        .strip_suffix('s')
        .ok_or_else(|| format!("duration '{raw}' is missing the 's' suffix"))?;

    let (secs, frac) = match body.split_once('.') {
        Some((secs, frac)) => (secs, frac),
        None => (body, ""),
    };

    if secs.is_empty() || !secs.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("duration '{raw}' has invalid seconds"));
    }
    if frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("duration '{raw}' has invalid fractional seconds"));
    }

    let secs: u64 = secs
        .parse()
        .map_err(|e| format!("duration '{raw}' is out of range: {e}"))?;
    let nanos = if frac.is_empty() {
        0
    } else {
        // Pad to nanosecond precision: "25" -> "250000000".
        format!("{frac:0<9}")
            .parse::<u32>()
            .map_err(|e| format!("duration '{raw}' has invalid fractional seconds: {e}"))?
    };

    Ok(Duration::new(secs, nanos))
}

/// Render a duration in protobuf JSON form.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.subsec_nanos();
    if nanos == 0 {
        return format!("{}s", duration.as_secs());
    }
    let frac = format!("{nanos:09}");
    format!("{}.{}s", duration.as_secs(), frac.trim_end_matches('0'))
}

/// Serde adapter for optional protobuf JSON durations.
pub(crate) mod optional {
    use std::time::Duration;

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(duration) => serializer.serialize_str(&super::format_duration(*duration)),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|raw| super::parse_duration(&raw).map_err(de::Error::custom))
            .transpose()
    }
}
