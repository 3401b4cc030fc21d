//! Sunrise and sunset times.
//!
//! [`AlmanacSun`] implements the sunrise/sunset algorithm from the Almanac for
//! Computers (1990) with the official zenith of 90°50'. Accuracy is about a
//! minute at mid latitudes, plenty for a face with one-minute markers.

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
    Utc,
};

use crate::error::SunTimeError;
use crate::geometry::minutes_of_day;

/// Official zenith for sunrise/sunset, in degrees.
pub const OFFICIAL_ZENITH: f64 = 90.833;

/// Local sunrise and sunset for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: NaiveTime,
    pub sunset: NaiveTime,
}

impl Default for SunTimes {
    /// 06:00 / 18:00, used when the real times cannot be computed.
    fn default() -> Self {
        Self {
            sunrise: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN),
            sunset: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl SunTimes {
    /// Ask `provider` for the sun times, falling back to `fallback` on error.
    pub fn resolve(
        provider: &dyn SunTimeProvider,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
        fallback: SunTimes,
    ) -> SunTimes {
        match provider.sun_times(latitude, longitude, date) {
            Ok(times) => {
                tracing::debug!(
                    sunrise = %times.sunrise.format("%H:%M"),
                    sunset = %times.sunset.format("%H:%M"),
                    "computed sun times"
                );
                times
            }
            Err(e) => {
                tracing::warn!("Sun time lookup failed, using defaults: {e}");
                fallback
            }
        }
    }

    pub fn sunrise_minutes(&self) -> u32 {
        minutes_of_day(self.sunrise.hour(), self.sunrise.minute())
    }

    pub fn sunset_minutes(&self) -> u32 {
        minutes_of_day(self.sunset.hour(), self.sunset.minute())
    }
}

/// Computes sunrise and sunset for a place and date.
pub trait SunTimeProvider {
    fn sun_times(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    ) -> Result<SunTimes, SunTimeError>;
}

/// Time zone the computed UTC events are converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UtcOffsetSource {
    /// The operating system's local zone.
    #[default]
    Local,
    Fixed(FixedOffset),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlmanacSun {
    pub zenith: f64,
    pub offset: UtcOffsetSource,
}

impl Default for AlmanacSun {
    fn default() -> Self {
        Self {
            zenith: OFFICIAL_ZENITH,
            offset: UtcOffsetSource::Local,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SunEvent {
    Rise,
    Set,
}

impl AlmanacSun {
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            offset: UtcOffsetSource::Fixed(offset),
            ..Self::default()
        }
    }

    /// Hours after UTC midnight of the event on `date`.
    fn utc_hours(
        &self,
        event: SunEvent,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    ) -> Result<f64, SunTimeError> {
        let day_of_year = f64::from(date.ordinal());
        let lng_hour = longitude / 15.0;
        let approx = match event {
            SunEvent::Rise => day_of_year + (6.0 - lng_hour) / 24.0,
            SunEvent::Set => day_of_year + (18.0 - lng_hour) / 24.0,
        };

        let mean_anomaly = 0.9856 * approx - 3.289;
        let true_longitude = normalize_degrees(
            mean_anomaly
                + 1.916 * sin_deg(mean_anomaly)
                + 0.020 * sin_deg(2.0 * mean_anomaly)
                + 282.634,
        );

        let mut right_ascension = normalize_degrees(atan_deg(0.91764 * tan_deg(true_longitude)));
        let l_quadrant = (true_longitude / 90.0).floor() * 90.0;
        let ra_quadrant = (right_ascension / 90.0).floor() * 90.0;
        right_ascension = (right_ascension + l_quadrant - ra_quadrant) / 15.0;

        let sin_dec = 0.39782 * sin_deg(true_longitude);
        let cos_dec = sin_dec.asin().cos();
        let cos_h = (cos_deg(self.zenith) - sin_dec * sin_deg(latitude)) / (cos_dec * cos_deg(latitude));
        if cos_h > 1.0 {
            return Err(SunTimeError::SunNeverRises(date));
        }
        if cos_h < -1.0 {
            return Err(SunTimeError::SunNeverSets(date));
        }

        let hour_angle = match event {
            SunEvent::Rise => 360.0 - cos_h.acos().to_degrees(),
            SunEvent::Set => cos_h.acos().to_degrees(),
        } / 15.0;

        let local_mean_time = hour_angle + right_ascension - 0.06571 * approx - 6.622;
        Ok((local_mean_time - lng_hour).rem_euclid(24.0))
    }

    fn to_local(&self, date: NaiveDate, utc_hours: f64) -> Result<NaiveTime, SunTimeError> {
        let seconds = (utc_hours * 3600.0).round() as u32 % 86_400;
        let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
            .ok_or_else(|| SunTimeError::InvalidTime(format!("{utc_hours} h")))?;
        let utc: DateTime<Utc> = Utc.from_utc_datetime(&NaiveDateTime::new(date, time));
        Ok(match self.offset {
            UtcOffsetSource::Local => utc.with_timezone(&Local).time(),
            UtcOffsetSource::Fixed(offset) => utc.with_timezone(&offset).time(),
        })
    }
}

impl SunTimeProvider for AlmanacSun {
    fn sun_times(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    ) -> Result<SunTimes, SunTimeError> {
        let rise = self.utc_hours(SunEvent::Rise, latitude, longitude, date)?;
        let set = self.utc_hours(SunEvent::Set, latitude, longitude, date)?;
        Ok(SunTimes {
            sunrise: self.to_local(date, rise)?,
            sunset: self.to_local(date, set)?,
        })
    }
}

fn normalize_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

fn sin_deg(degrees: f64) -> f64 {
    degrees.to_radians().sin()
}

fn cos_deg(degrees: f64) -> f64 {
    degrees.to_radians().cos()
}

fn tan_deg(degrees: f64) -> f64 {
    degrees.to_radians().tan()
}

fn atan_deg(x: f64) -> f64 {
    x.atan().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl SunTimeProvider for Failing {
        fn sun_times(&self, _: f64, _: f64, date: NaiveDate) -> Result<SunTimes, SunTimeError> {
            Err(SunTimeError::SunNeverSets(date))
        }
    }

    fn utc() -> AlmanacSun {
        AlmanacSun::with_offset(FixedOffset::east_opt(0).unwrap())
    }

    fn minutes(t: NaiveTime) -> i64 {
        i64::from(t.hour() * 60 + t.minute())
    }

    #[test]
    fn london_summer_solstice() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let times = utc().sun_times(51.5074, -0.1278, date).unwrap();
        // 03:43 and 20:21 UTC
        assert!((minutes(times.sunrise) - 223).abs() <= 4, "{:?}", times.sunrise);
        assert!((minutes(times.sunset) - 1221).abs() <= 4, "{:?}", times.sunset);
    }

    #[test]
    fn equator_near_equinox_is_about_twelve_hours() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let times = utc().sun_times(0.0, 0.0, date).unwrap();
        let day = minutes(times.sunset) - minutes(times.sunrise);
        assert!((day - 727).abs() <= 6, "day length {day}");
    }

    #[test]
    fn fixed_offset_shifts_local_times() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let plus_one = AlmanacSun::with_offset(FixedOffset::east_opt(3600).unwrap());
        let a = utc().sun_times(51.5074, -0.1278, date).unwrap();
        let b = plus_one.sun_times(51.5074, -0.1278, date).unwrap();
        assert_eq!((minutes(b.sunrise) - minutes(a.sunrise)).rem_euclid(1440), 60);
    }

    #[test]
    fn polar_day_and_night_are_errors() {
        let june = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let december = NaiveDate::from_ymd_opt(2024, 12, 21).unwrap();
        assert_eq!(
            utc().sun_times(78.22, 15.65, june),
            Err(SunTimeError::SunNeverSets(june))
        );
        assert_eq!(
            utc().sun_times(78.22, 15.65, december),
            Err(SunTimeError::SunNeverRises(december))
        );
    }

    #[test]
    fn resolve_falls_back_to_defaults() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let times = SunTimes::resolve(&Failing, 0.0, 0.0, date, SunTimes::default());
        assert_eq!(times, SunTimes::default());
        assert_eq!(times.sunrise_minutes(), 360);
        assert_eq!(times.sunset_minutes(), 1080);
    }
}
