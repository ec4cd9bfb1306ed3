//! Reduction of the 5-day/3-hour forecast feed to one entry per day.

use serde::Serialize;

use crate::model::ForecastSample;

/// Marker the upstream's formatted timestamp carries for the noon sample.
pub const NOON_MARKER: &str = "12:00:00";

/// Upper bound on entries in a [`DailyForecast`].
pub const MAX_DAYS: usize = 5;

/// At most [`MAX_DAYS`] noon samples in feed order.
///
/// Only [`reduce_to_daily`] builds one, so the cap and ordering always hold.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct DailyForecast(Vec<ForecastSample>);

impl DailyForecast {
    pub fn days(&self) -> &[ForecastSample] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastSample> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a DailyForecast {
    type Item = &'a ForecastSample;
    type IntoIter = std::slice::Iter<'a, ForecastSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Keeps the samples whose formatted text contains [`NOON_MARKER`], in input
/// order, and takes the first [`MAX_DAYS`] of them.
///
/// Matching is a plain substring test on `timestamp_text`: a sample at
/// `12:00:01` or formatted differently is dropped, and days without a noon
/// sample are absent rather than backfilled. The cap counts matches, not
/// distinct days.
pub fn reduce_to_daily(samples: &[ForecastSample]) -> DailyForecast {
    let days = samples
        .iter()
        .filter(|s| s.timestamp_text.contains(NOON_MARKER))
        .take(MAX_DAYS)
        .cloned()
        .collect();

    DailyForecast(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, TimeZone, Utc};

    fn sample(text: &str) -> ForecastSample {
        let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
            .expect("test timestamps are well-formed");

        ForecastSample {
            timestamp: Utc.from_utc_datetime(&naive),
            timestamp_text: text.to_string(),
            condition: "Clouds".into(),
            description: "scattered clouds".into(),
            temperature: 18.4,
            temp_min: 17.0,
            temp_max: 19.9,
        }
    }

    /// Five full days at 3-hour cadence starting at midnight: 8 samples per day.
    fn five_day_feed() -> Vec<ForecastSample> {
        (0..5)
            .flat_map(|day| {
                (0..8).map(move |slot| {
                    sample(&format!("2024-03-{:02} {:02}:00:00", 10 + day, slot * 3))
                })
            })
            .collect()
    }

    #[test]
    fn picks_the_noon_sample_of_each_day() {
        let feed = five_day_feed();
        assert_eq!(feed.len(), 40);

        let daily = reduce_to_daily(&feed);

        assert_eq!(daily.len(), 5);
        let expected: Vec<&ForecastSample> =
            [4, 12, 20, 28, 36].iter().map(|&i| &feed[i]).collect();
        let actual: Vec<&ForecastSample> = daily.iter().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn empty_feed_gives_empty_forecast() {
        let daily = reduce_to_daily(&[]);
        assert!(daily.is_empty());
    }

    #[test]
    fn no_noon_samples_is_not_an_error() {
        let feed = vec![sample("2024-03-10 09:00:00"), sample("2024-03-10 15:00:00")];
        assert!(reduce_to_daily(&feed).is_empty());
    }

    #[test]
    fn partial_feed_is_not_padded() {
        // Feed starts mid-afternoon, so day one has no noon sample.
        let feed: Vec<_> = five_day_feed().into_iter().skip(5).collect();
        let daily = reduce_to_daily(&feed);

        assert_eq!(daily.len(), 4);
        assert_eq!(daily.days()[0].timestamp_text, "2024-03-11 12:00:00");
    }

    #[test]
    fn cap_applies_to_matches_not_days() {
        let feed: Vec<_> = (1..=9)
            .map(|d| sample(&format!("2024-04-{d:02} 12:00:00")))
            .chain(std::iter::once(sample("2024-04-01 12:00:00")))
            .collect();

        let daily = reduce_to_daily(&feed);
        assert_eq!(daily.len(), MAX_DAYS);
        assert_eq!(daily.days()[4].timestamp_text, "2024-04-05 12:00:00");
    }

    #[test]
    fn duplicate_noon_on_same_day_is_kept() {
        let feed = vec![sample("2024-04-01 12:00:00"), sample("2024-04-01 12:00:00")];
        assert_eq!(reduce_to_daily(&feed).len(), 2);
    }

    #[test]
    fn near_noon_is_excluded() {
        let mut off = sample("2024-04-01 12:00:00");
        off.timestamp_text = "2024-04-01 12:00:01".into();
        let mut iso = sample("2024-04-02 12:00:00");
        iso.timestamp_text = "2024-04-02T12:00Z".into();

        assert!(reduce_to_daily(&[off, iso]).is_empty());
    }

    #[test]
    fn reducing_twice_equals_reducing_once() {
        let feed = five_day_feed();
        let once = reduce_to_daily(&feed);
        let twice = reduce_to_daily(once.days());
        assert_eq!(once, twice);
    }

    #[test]
    fn output_preserves_input_order() {
        let daily = reduce_to_daily(&five_day_feed());
        let stamps: Vec<_> = daily.iter().map(|s| s.timestamp).collect();
        let mut sorted = stamps.clone();
        sorted.sort();
        assert_eq!(stamps, sorted);
    }
}
