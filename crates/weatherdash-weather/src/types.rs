use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::codes::WeatherCode;

/// Placeholder name when reverse geocoding can't name the coordinates.
pub const CURRENT_LOCATION_NAME: &str = "Current Location";

/// Raw device position, before it has a name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A named place; the subject of a weather query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub display_name: String,
    /// Empty when the geocoder didn't report one
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(
        display_name: impl Into<String>,
        country: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            country: country.into(),
            latitude,
            longitude,
        }
    }

    /// Location for coordinates that couldn't be named.
    pub fn unnamed(coords: Coordinates) -> Self {
        Self::new(CURRENT_LOCATION_NAME, "", coords.latitude, coords.longitude)
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// "Paris, France", or just the name when the country is unknown.
    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.display_name.clone()
        } else {
            format!("{}, {}", self.display_name, self.country)
        }
    }
}

/// Current conditions, stored at full precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Observation time in the location's local time
    pub time: Option<NaiveDateTime>,
    pub temperature_c: f64,
    pub apparent_temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_kph: f64,
    pub precipitation_mm: f64,
    pub weather_code: WeatherCode,
}

/// One hour of the hourly forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    pub time: NaiveDateTime,
    pub temperature_c: Option<f64>,
    pub weather_code: Option<WeatherCode>,
    pub precipitation_probability_pct: Option<f64>,
    pub wind_speed_kph: Option<f64>,
    pub relative_humidity_pct: Option<f64>,
}

/// Hourly forecast window. Each point holds every field for one hour, so the
/// provider's parallel arrays stay aligned by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    pub points: Vec<HourlyPoint>,
}

impl HourlySeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HourlyPoint> {
        self.points.iter()
    }
}

/// One day of the daily forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub temperature_max_c: f64,
    pub temperature_min_c: f64,
    pub weather_code: WeatherCode,
    pub precipitation_sum_mm: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    pub points: Vec<DailyPoint>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DailyPoint> {
        self.points.iter()
    }
}

/// Everything the dashboard displays for one query. All three series come
/// from the same provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub location: Location,
    pub current: CurrentConditions,
    pub hourly: HourlySeries,
    pub daily: DailySeries,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_includes_country_when_known() {
        let paris = Location::new("Paris", "France", 48.8566, 2.3522);
        assert_eq!(paris.label(), "Paris, France");

        let here = Location::unnamed(Coordinates {
            latitude: 1.0,
            longitude: 2.0,
        });
        assert_eq!(here.label(), "Current Location");
        assert_eq!(here.coordinates().latitude, 1.0);
    }
}
