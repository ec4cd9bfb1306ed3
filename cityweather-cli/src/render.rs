use std::fmt::Write;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use cityweather_core::{
    CurrentConditions, ForecastSample, Preferences, UnitSystem, ViewState, WeatherIcon,
    WeatherReport,
};

/// Renders whatever the session currently shows.
pub fn view(view: &ViewState, today: NaiveDate) -> String {
    match view {
        ViewState::Empty => "No weather loaded yet.\n".to_string(),
        ViewState::Ready(report) => report_text(report, today),
        ViewState::Failed(msg) => format!("⚠ {msg}\n"),
    }
}

pub fn report_text(report: &WeatherReport, today: NaiveDate) -> String {
    let mut out = current_card(&report.current, report.unit);
    out.push('\n');
    out.push_str(&forecast_table(report, today));
    out
}

pub fn current_card(current: &CurrentConditions, unit: UnitSystem) -> String {
    let temp_unit = unit.temperature_suffix();
    let icon = WeatherIcon::for_condition(&current.condition);
    let mut out = String::new();

    let location = if current.country.is_empty() {
        current.location_name.clone()
    } else {
        format!("{}, {}", current.location_name, current.country)
    };

    let _ = writeln!(out, "{location}");
    let _ = writeln!(out, "{} • {}", current.condition, current.description);
    let _ = writeln!(out, "{} {}{}", icon.glyph(), current.temperature_rounded(), temp_unit);

    if let Some((sunrise, sunset)) = current.sun_times() {
        let _ = writeln!(
            out,
            "Sunrise: {}  •  Sunset: {}",
            clock_time(sunrise, &Local),
            clock_time(sunset, &Local)
        );
    }

    let _ = writeln!(out, "  Feels Like   {}{}", current.feels_like_rounded(), temp_unit);
    let _ = writeln!(out, "  Humidity     {}%", current.humidity_pct);
    let _ = writeln!(out, "  Wind Speed   {} {}", current.wind_speed, unit.speed_suffix());
    let _ = writeln!(out, "  Pressure     {} hPa", current.pressure_hpa);
    match current.visibility_km() {
        Some(km) => {
            let _ = writeln!(out, "  Visibility   {km:.1} km");
        }
        None => {
            let _ = writeln!(out, "  Visibility   n/a");
        }
    }
    let _ = writeln!(out, "  Cloudiness   {}%", current.cloudiness_pct);

    out
}

pub fn forecast_table(report: &WeatherReport, today: NaiveDate) -> String {
    let temp_unit = report.unit.temperature_suffix();
    let mut out = String::from("5-Day Forecast\n");

    if report.forecast.is_empty() {
        out.push_str("  (no forecast available)\n");
        return out;
    }

    for day in &report.forecast {
        let icon = WeatherIcon::for_condition(&day.condition);
        let (label, date) = match sample_date(day) {
            Some(date) => (day_label(date, today), date.format("%a, %b %-d").to_string()),
            None => (String::from("?"), day.timestamp_text.clone()),
        };

        let range = format!(
            "H: {}{temp_unit} • L: {}{temp_unit}",
            day.high_rounded(),
            day.low_rounded()
        );

        let _ = writeln!(
            out,
            "  {label:<9} {date:<12} {} {:>4}{temp_unit}  {range}  {}",
            icon.glyph(),
            day.temperature_rounded(),
            day.description,
        );
    }

    out
}

pub fn preferences_text(prefs: &Preferences) -> String {
    format!("theme: {}\nunit: {}\nlast city: {}\n", prefs.theme, prefs.unit, prefs.last_city)
}

/// `Today`, `Tomorrow`, or the short weekday name.
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if today.succ_opt() == Some(date) {
        "Tomorrow".to_string()
    } else {
        date.format("%a").to_string()
    }
}

/// Calendar date of the sample's formatted text, as the upstream wrote it.
fn sample_date(sample: &ForecastSample) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(&sample.timestamp_text, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

fn clock_time<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant.with_timezone(tz).format("%I:%M %p").to_string()
}
