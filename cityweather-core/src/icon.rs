//! Condition keyword to icon mapping.

/// Condition groups the upstream documents for its `weather[].main` field.
pub const DOCUMENTED_CONDITIONS: &[&str] = &[
    "Thunderstorm",
    "Drizzle",
    "Rain",
    "Snow",
    "Mist",
    "Smoke",
    "Haze",
    "Dust",
    "Fog",
    "Sand",
    "Ash",
    "Squall",
    "Tornado",
    "Clear",
    "Clouds",
];

pub fn is_documented_condition(keyword: &str) -> bool {
    DOCUMENTED_CONDITIONS.contains(&keyword)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherIcon {
    Sun,
    Cloud,
    CloudRain,
    Snowflake,
    Bolt,
    CloudSunRain,
    Smog,
}

impl WeatherIcon {
    /// Icon for a condition keyword. Matching is case-sensitive; unknown
    /// keywords get [`WeatherIcon::Cloud`].
    pub fn for_condition(keyword: &str) -> Self {
        match keyword {
            "Clear" => WeatherIcon::Sun,
            "Clouds" => WeatherIcon::Cloud,
            "Rain" => WeatherIcon::CloudRain,
            "Snow" => WeatherIcon::Snowflake,
            "Thunderstorm" => WeatherIcon::Bolt,
            "Drizzle" => WeatherIcon::CloudSunRain,
            "Mist" | "Fog" | "Haze" => WeatherIcon::Smog,
            _ => WeatherIcon::Cloud,
        }
    }

    /// Font Awesome class identifier.
    pub fn class_name(&self) -> &'static str {
        match self {
            WeatherIcon::Sun => "fas fa-sun",
            WeatherIcon::Cloud => "fas fa-cloud",
            WeatherIcon::CloudRain => "fas fa-cloud-rain",
            WeatherIcon::Snowflake => "fas fa-snowflake",
            WeatherIcon::Bolt => "fas fa-bolt",
            WeatherIcon::CloudSunRain => "fas fa-cloud-sun-rain",
            WeatherIcon::Smog => "fas fa-smog",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            WeatherIcon::Sun => "☀",
            WeatherIcon::Cloud => "☁",
            WeatherIcon::CloudRain => "🌧",
            WeatherIcon::Snowflake => "❄",
            WeatherIcon::Bolt => "⚡",
            WeatherIcon::CloudSunRain => "🌦",
            WeatherIcon::Smog => "🌫",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_conditions_map_to_their_icons() {
        assert_eq!(WeatherIcon::for_condition("Clear").class_name(), "fas fa-sun");
        assert_eq!(WeatherIcon::for_condition("Rain").class_name(), "fas fa-cloud-rain");
        assert_eq!(WeatherIcon::for_condition("Drizzle").class_name(), "fas fa-cloud-sun-rain");
        assert_eq!(WeatherIcon::for_condition("Thunderstorm"), WeatherIcon::Bolt);
        assert_eq!(WeatherIcon::for_condition("Snow"), WeatherIcon::Snowflake);
    }

    #[test]
    fn mist_fog_haze_share_smog() {
        for keyword in ["Mist", "Fog", "Haze"] {
            assert_eq!(WeatherIcon::for_condition(keyword), WeatherIcon::Smog);
        }
    }

    #[test]
    fn unknown_keyword_falls_back_to_cloud() {
        assert_eq!(WeatherIcon::for_condition("Tornado"), WeatherIcon::Cloud);
        assert_eq!(WeatherIcon::for_condition("clear"), WeatherIcon::Cloud);
        assert_eq!(WeatherIcon::for_condition(""), WeatherIcon::Cloud);
    }

    #[test]
    fn documented_conditions() {
        assert!(is_documented_condition("Clouds"));
        assert!(is_documented_condition("Squall"));
        assert!(!is_documented_condition("Sunny"));
    }
}
