//! WMO weather codes as reported by Open-Meteo.
//! See: https://open-meteo.com/en/docs#weathervariables

use serde::{Deserialize, Serialize};

/// Icon shown for codes outside the table.
pub const UNKNOWN_ICON: &str = "\u{1F30D}";
/// Description shown for codes outside the table.
pub const UNKNOWN_DESCRIPTION: &str = "Unknown";

/// Display info for one weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherCodeInfo {
    pub icon: &'static str,
    pub description: &'static str,
}

/// Weather code from the provider. Codes outside the known table are kept
/// as `Unknown` with their raw value so nothing is lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum WeatherCode {
    ClearSky,
    MainlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    RimeFog,
    LightDrizzle,
    Drizzle,
    DenseDrizzle,
    SlightRain,
    Rain,
    HeavyRain,
    SlightSnow,
    Snow,
    HeavySnow,
    SnowGrains,
    RainShowers,
    HeavyShowers,
    ViolentShowers,
    SnowShowers,
    HeavySnowShowers,
    Thunderstorm,
    ThunderstormSlightHail,
    ThunderstormHeavyHail,
    Unknown(i32),
}

const SUN: &str = "\u{2600}\u{FE0F}";
const SUN_SMALL_CLOUD: &str = "\u{1F324}\u{FE0F}";
const SUN_BEHIND_CLOUD: &str = "\u{26C5}";
const CLOUD: &str = "\u{2601}\u{FE0F}";
const FOG: &str = "\u{1F32B}\u{FE0F}";
const RAIN: &str = "\u{1F327}\u{FE0F}";
const THUNDER: &str = "\u{26C8}\u{FE0F}";
const SNOW: &str = "\u{2744}\u{FE0F}";

impl WeatherCode {
    /// Every code in the table, in provider order.
    pub const KNOWN: [WeatherCode; 24] = [
        WeatherCode::ClearSky,
        WeatherCode::MainlyClear,
        WeatherCode::PartlyCloudy,
        WeatherCode::Overcast,
        WeatherCode::Fog,
        WeatherCode::RimeFog,
        WeatherCode::LightDrizzle,
        WeatherCode::Drizzle,
        WeatherCode::DenseDrizzle,
        WeatherCode::SlightRain,
        WeatherCode::Rain,
        WeatherCode::HeavyRain,
        WeatherCode::SlightSnow,
        WeatherCode::Snow,
        WeatherCode::HeavySnow,
        WeatherCode::SnowGrains,
        WeatherCode::RainShowers,
        WeatherCode::HeavyShowers,
        WeatherCode::ViolentShowers,
        WeatherCode::SnowShowers,
        WeatherCode::HeavySnowShowers,
        WeatherCode::Thunderstorm,
        WeatherCode::ThunderstormSlightHail,
        WeatherCode::ThunderstormHeavyHail,
    ];

    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::ClearSky,
            1 => Self::MainlyClear,
            2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 => Self::Fog,
            48 => Self::RimeFog,
            51 => Self::LightDrizzle,
            53 => Self::Drizzle,
            55 => Self::DenseDrizzle,
            61 => Self::SlightRain,
            63 => Self::Rain,
            65 => Self::HeavyRain,
            71 => Self::SlightSnow,
            73 => Self::Snow,
            75 => Self::HeavySnow,
            77 => Self::SnowGrains,
            80 => Self::RainShowers,
            81 => Self::HeavyShowers,
            82 => Self::ViolentShowers,
            85 => Self::SnowShowers,
            86 => Self::HeavySnowShowers,
            95 => Self::Thunderstorm,
            96 => Self::ThunderstormSlightHail,
            99 => Self::ThunderstormHeavyHail,
            other => Self::Unknown(other),
        }
    }

    /// The raw provider value.
    pub fn code(self) -> i32 {
        match self {
            Self::ClearSky => 0,
            Self::MainlyClear => 1,
            Self::PartlyCloudy => 2,
            Self::Overcast => 3,
            Self::Fog => 45,
            Self::RimeFog => 48,
            Self::LightDrizzle => 51,
            Self::Drizzle => 53,
            Self::DenseDrizzle => 55,
            Self::SlightRain => 61,
            Self::Rain => 63,
            Self::HeavyRain => 65,
            Self::SlightSnow => 71,
            Self::Snow => 73,
            Self::HeavySnow => 75,
            Self::SnowGrains => 77,
            Self::RainShowers => 80,
            Self::HeavyShowers => 81,
            Self::ViolentShowers => 82,
            Self::SnowShowers => 85,
            Self::HeavySnowShowers => 86,
            Self::Thunderstorm => 95,
            Self::ThunderstormSlightHail => 96,
            Self::ThunderstormHeavyHail => 99,
            Self::Unknown(code) => code,
        }
    }

    pub fn info(self) -> WeatherCodeInfo {
        let (icon, description) = match self {
            Self::ClearSky => (SUN, "Clear Sky"),
            Self::MainlyClear => (SUN_SMALL_CLOUD, "Mainly Clear"),
            Self::PartlyCloudy => (SUN_BEHIND_CLOUD, "Partly Cloudy"),
            Self::Overcast => (CLOUD, "Overcast"),
            Self::Fog | Self::RimeFog => (FOG, "Foggy"),
            Self::LightDrizzle => (RAIN, "Light Drizzle"),
            Self::Drizzle => (RAIN, "Drizzle"),
            Self::DenseDrizzle => (RAIN, "Heavy Drizzle"),
            Self::SlightRain | Self::Rain => (RAIN, "Rain"),
            Self::HeavyRain => (THUNDER, "Heavy Rain"),
            Self::SlightSnow | Self::Snow => (SNOW, "Snow"),
            Self::HeavySnow => (SNOW, "Heavy Snow"),
            Self::SnowGrains => (SNOW, "Snow Grains"),
            Self::RainShowers => (RAIN, "Rain Showers"),
            Self::HeavyShowers => (RAIN, "Heavy Showers"),
            Self::ViolentShowers => (THUNDER, "Violent Showers"),
            Self::SnowShowers => (SNOW, "Snow Showers"),
            Self::HeavySnowShowers => (SNOW, "Heavy Snow Showers"),
            Self::Thunderstorm => (THUNDER, "Thunderstorm"),
            Self::ThunderstormSlightHail | Self::ThunderstormHeavyHail => {
                (THUNDER, "Thunderstorm with Hail")
            }
            Self::Unknown(_) => (UNKNOWN_ICON, UNKNOWN_DESCRIPTION),
        };
        WeatherCodeInfo { icon, description }
    }

    pub fn icon(self) -> &'static str {
        self.info().icon
    }

    pub fn description(self) -> &'static str {
        self.info().description
    }

    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<i32> for WeatherCode {
    fn from(code: i32) -> Self {
        Self::from_wmo_code(code)
    }
}

impl From<WeatherCode> for i32 {
    fn from(code: WeatherCode) -> Self {
        code.code()
    }
}

/// Icon for a raw provider code; total, with a fallback for unknown codes.
pub fn code_to_icon(code: i32) -> &'static str {
    WeatherCode::from_wmo_code(code).icon()
}

/// Description for a raw provider code; total, with "Unknown" as fallback.
pub fn code_to_description(code: i32) -> &'static str {
    WeatherCode::from_wmo_code(code).description()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wmo_code_clear() {
        assert_eq!(code_to_description(0), "Clear Sky");
        assert_eq!(code_to_icon(0), SUN);
    }

    #[test]
    fn test_wmo_code_cloud_cover() {
        assert_eq!(code_to_description(1), "Mainly Clear");
        assert_eq!(code_to_description(2), "Partly Cloudy");
        assert_eq!(code_to_description(3), "Overcast");
        assert_eq!(code_to_icon(2), SUN_BEHIND_CLOUD);
    }

    #[test]
    fn test_wmo_code_fog() {
        assert_eq!(code_to_description(45), "Foggy");
        assert_eq!(code_to_description(48), "Foggy");
        assert_eq!(code_to_icon(48), FOG);
    }

    #[test]
    fn test_wmo_code_drizzle() {
        assert_eq!(code_to_description(51), "Light Drizzle");
        assert_eq!(code_to_description(53), "Drizzle");
        assert_eq!(code_to_description(55), "Heavy Drizzle");
    }

    #[test]
    fn test_wmo_code_rain() {
        assert_eq!(code_to_description(61), "Rain");
        assert_eq!(code_to_description(63), "Rain");
        assert_eq!(code_to_description(65), "Heavy Rain");
        assert_eq!(code_to_icon(63), RAIN);
        assert_eq!(code_to_icon(65), THUNDER);
    }

    #[test]
    fn test_wmo_code_snow() {
        assert_eq!(code_to_description(71), "Snow");
        assert_eq!(code_to_description(73), "Snow");
        assert_eq!(code_to_description(75), "Heavy Snow");
        assert_eq!(code_to_description(77), "Snow Grains");
        for code in [71, 73, 75, 77, 85, 86] {
            assert_eq!(code_to_icon(code), SNOW, "code {}", code);
        }
    }

    #[test]
    fn test_wmo_code_showers() {
        assert_eq!(code_to_description(80), "Rain Showers");
        assert_eq!(code_to_description(81), "Heavy Showers");
        assert_eq!(code_to_description(82), "Violent Showers");
        assert_eq!(code_to_description(85), "Snow Showers");
        assert_eq!(code_to_description(86), "Heavy Snow Showers");
        assert_eq!(code_to_icon(82), THUNDER);
    }

    #[test]
    fn test_wmo_code_thunderstorm() {
        assert_eq!(code_to_description(95), "Thunderstorm");
        assert_eq!(code_to_description(96), "Thunderstorm with Hail");
        assert_eq!(code_to_description(99), "Thunderstorm with Hail");
        for code in [95, 96, 99] {
            assert_eq!(code_to_icon(code), THUNDER);
        }
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        for code in [-1, 4, 47, 56, 57, 66, 67, 100, 999] {
            assert_eq!(code_to_icon(code), UNKNOWN_ICON, "code {}", code);
            assert_eq!(code_to_description(code), UNKNOWN_DESCRIPTION, "code {}", code);
        }
    }

    #[test]
    fn test_known_table_is_total_and_consistent() {
        for known in WeatherCode::KNOWN {
            assert!(known.is_known());
            assert_eq!(WeatherCode::from_wmo_code(known.code()), known);
            assert_ne!(known.description(), UNKNOWN_DESCRIPTION);
        }
    }

    #[test]
    fn test_unknown_keeps_raw_value() {
        let code = WeatherCode::from_wmo_code(42);
        assert_eq!(code, WeatherCode::Unknown(42));
        assert_eq!(code.code(), 42);
    }

    #[test]
    fn test_serde_uses_raw_integer() {
        let code: WeatherCode = serde_json::from_str("95").unwrap();
        assert_eq!(code, WeatherCode::Thunderstorm);
        assert_eq!(serde_json::to_string(&WeatherCode::Unknown(7)).unwrap(), "7");
    }
}
