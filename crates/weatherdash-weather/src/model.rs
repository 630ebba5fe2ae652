//! Raw provider payload → typed, code-resolved display model.
//!
//! Pure functions, no I/O. Values are kept at full precision; rounding
//! happens only in the `format_*` helpers.

use chrono::{NaiveDate, NaiveDateTime};
use weatherdash_core::{NetworkError, WeatherError};

use crate::codes::WeatherCode;
use crate::provider::{RawCurrent, RawDaily, RawHourly, RawWeatherPayload};
use crate::types::{
    CurrentConditions, DailyPoint, DailySeries, HourlyPoint, HourlySeries, Location, ViewModel,
};

/// Hours shown in the hourly strip.
pub const HOURLY_WINDOW: usize = 24;
/// Days shown after today.
pub const DAILY_WINDOW: usize = 5;

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

fn malformed(message: String) -> WeatherError {
    WeatherError::FetchFailed(NetworkError::InvalidResponse(message))
}

fn parse_datetime(value: &str) -> Result<NaiveDateTime, WeatherError> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .map_err(|e| malformed(format!("bad timestamp {:?}: {}", value, e)))
}

fn parse_date(value: &str) -> Result<NaiveDate, WeatherError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| malformed(format!("bad date {:?}: {}", value, e)))
}

/// All parallel arrays must match the `time` array's length.
fn check_aligned(series: &str, expected: usize, lengths: &[(&str, usize)]) -> Result<(), WeatherError> {
    for (field, len) in lengths {
        if *len != expected {
            return Err(malformed(format!(
                "{} series misaligned: {} has {} entries, time has {}",
                series, field, len, expected
            )));
        }
    }
    Ok(())
}

pub fn normalize_current(raw: &RawCurrent) -> CurrentConditions {
    // The observation time is informational; a bad one is dropped, not fatal.
    let time = raw.time.as_deref().and_then(|t| {
        NaiveDateTime::parse_from_str(t, DATETIME_FORMAT)
            .map_err(|e| tracing::debug!("Ignoring current time {:?}: {}", t, e))
            .ok()
    });

    CurrentConditions {
        time,
        temperature_c: raw.temperature_2m,
        apparent_temperature_c: raw.apparent_temperature,
        humidity_pct: raw.relative_humidity_2m,
        wind_speed_kph: raw.wind_speed_10m,
        precipitation_mm: raw.precipitation.unwrap_or(0.0),
        weather_code: WeatherCode::from_wmo_code(raw.weather_code),
    }
}

/// The next [`DAILY_WINDOW`] days, skipping index 0 (today).
///
/// Five raw entries yield four days; one or zero yield none.
pub fn normalize_daily(raw: &RawDaily) -> Result<DailySeries, WeatherError> {
    let len = raw.time.len();
    let mut lengths = vec![
        ("temperature_2m_max", raw.temperature_2m_max.len()),
        ("temperature_2m_min", raw.temperature_2m_min.len()),
        ("weather_code", raw.weather_code.len()),
    ];
    if let Some(sums) = &raw.precipitation_sum {
        lengths.push(("precipitation_sum", sums.len()));
    }
    check_aligned("daily", len, &lengths)?;

    let end = len.min(DAILY_WINDOW + 1);
    let points = (1..end)
        .map(|i| {
            Ok(DailyPoint {
                date: parse_date(&raw.time[i])?,
                temperature_max_c: raw.temperature_2m_max[i],
                temperature_min_c: raw.temperature_2m_min[i],
                weather_code: WeatherCode::from_wmo_code(raw.weather_code[i]),
                precipitation_sum_mm: raw.precipitation_sum.as_ref().and_then(|s| s[i]),
            })
        })
        .collect::<Result<Vec<_>, WeatherError>>()?;

    Ok(DailySeries { points })
}

/// Up to [`HOURLY_WINDOW`] entries starting at index `current_hour`.
///
/// The hour is used directly as an index into the provider's series, which
/// begins at local midnight of the first forecast day. No wraparound: a start
/// past the end yields an empty series.
pub fn normalize_hourly(raw: &RawHourly, current_hour: u32) -> Result<HourlySeries, WeatherError> {
    let len = raw.time.len();
    let mut lengths = vec![
        ("temperature_2m", raw.temperature_2m.len()),
        ("weather_code", raw.weather_code.len()),
        ("precipitation_probability", raw.precipitation_probability.len()),
        ("wind_speed_10m", raw.wind_speed_10m.len()),
    ];
    if let Some(humidity) = &raw.relative_humidity_2m {
        lengths.push(("relative_humidity_2m", humidity.len()));
    }
    check_aligned("hourly", len, &lengths)?;

    let start = current_hour as usize;
    if start >= len {
        return Ok(HourlySeries::default());
    }
    let end = (start + HOURLY_WINDOW).min(len);

    let points = (start..end)
        .map(|i| {
            Ok(HourlyPoint {
                time: parse_datetime(&raw.time[i])?,
                temperature_c: raw.temperature_2m[i],
                weather_code: raw.weather_code[i].map(WeatherCode::from_wmo_code),
                precipitation_probability_pct: raw.precipitation_probability[i],
                wind_speed_kph: raw.wind_speed_10m[i],
                relative_humidity_pct: raw.relative_humidity_2m.as_ref().and_then(|h| h[i]),
            })
        })
        .collect::<Result<Vec<_>, WeatherError>>()?;

    Ok(HourlySeries { points })
}

impl ViewModel {
    /// Build the whole view from one response. If any part fails to
    /// normalize, no view is produced.
    pub fn from_payload(
        location: Location,
        payload: &RawWeatherPayload,
        current_hour: u32,
    ) -> Result<Self, WeatherError> {
        let current = normalize_current(&payload.current);
        let hourly = normalize_hourly(&payload.hourly, current_hour)?;
        let daily = normalize_daily(&payload.daily)?;

        Ok(Self {
            location,
            current,
            hourly,
            daily,
        })
    }
}

/// Whole degrees, e.g. `21°C`.
pub fn format_temperature(celsius: f64) -> String {
    format!("{}°C", celsius.round() as i64)
}

/// Whole km/h, e.g. `12 km/h`.
pub fn format_speed(kph: f64) -> String {
    format!("{} km/h", kph.round() as i64)
}
