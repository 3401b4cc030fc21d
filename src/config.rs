use std::path::PathBuf;
use std::time::Duration;

use bon::Builder;

use crate::color::Palette;
use crate::error::ArgError;
use crate::geometry::GeometryConfig;
use crate::mission::DEFAULT_BATTERY_DEPLETION_MINUTES;
use crate::sun::SunTimes;

/// Latitude used when none is given (London).
pub const DEFAULT_LATITUDE: f64 = 51.5074;

/// Longitude used when none is given (London).
pub const DEFAULT_LONGITUDE: f64 = -0.1278;

/// Planned mission length used when none is given.
pub const DEFAULT_MISSION_MINUTES: u64 = 40;

/// Everything needed to build and show a mission clock.
#[derive(Debug, Clone, Builder)]
pub struct MissionClockConfig {
    #[builder(into, default = "Mission Clock for SAR".to_string())]
    pub title: String,

    // Mission
    #[builder(default = DEFAULT_LATITUDE)]
    pub latitude: f64,
    #[builder(default = DEFAULT_LONGITUDE)]
    pub longitude: f64,
    #[builder(default = Duration::from_secs(DEFAULT_MISSION_MINUTES * 60))]
    pub mission_duration: Duration,
    #[builder(default = DEFAULT_BATTERY_DEPLETION_MINUTES)]
    pub battery_depletion_minutes: u32,
    #[builder(default)]
    pub sun_fallback: SunTimes,

    // Dial
    #[builder(default)]
    pub geometry: GeometryConfig,
    #[builder(default)]
    pub palette: Palette,

    // Window configuration
    #[builder(default = 800)]
    pub window_width: usize,
    #[builder(default = 800)]
    pub window_height: usize,
    #[builder(default = (100, 10))]
    pub canvas_origin: (i32, i32),
    #[builder(default = 600)]
    pub canvas_size: usize,

    // Font configuration
    pub font_path: Option<PathBuf>,
}

impl Default for MissionClockConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Result of parsing the command line.
#[derive(Debug, Clone)]
pub struct CliOptions {
    pub config: MissionClockConfig,
    /// Read commands from standard input.
    pub read_stdin: bool,
    pub show_help: bool,
}

pub const USAGE: &str = "\
Usage: mission-clock [OPTIONS]

Options:
  --lat DEG               Latitude for sunrise/sunset (default 51.5074)
  --lon DEG               Longitude for sunrise/sunset (default -0.1278)
  --duration MIN          Planned mission length in minutes (default 40)
  --battery-minutes MIN   Minute at which the simulated battery is empty (default 40)
  --font PATH             TrueType/OpenType font for labels
  --title TEXT            Window title
  --no-stdin              Do not read commands from standard input
  -h, --help              Show this message

Commands on standard input, one per line:
  start | time HH:MM | live | elapsed N | click X Y";

impl CliOptions {
    /// Parse arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Self, ArgError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut latitude = DEFAULT_LATITUDE;
        let mut longitude = DEFAULT_LONGITUDE;
        let mut duration_minutes = DEFAULT_MISSION_MINUTES;
        let mut battery_minutes = DEFAULT_BATTERY_DEPLETION_MINUTES;
        let mut font_path = None;
        let mut title = None;
        let mut read_stdin = true;
        let mut show_help = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--lat" => latitude = parse_value(&mut args, "--lat")?,
                "--lon" => longitude = parse_value(&mut args, "--lon")?,
                "--duration" => duration_minutes = parse_value(&mut args, "--duration")?,
                "--battery-minutes" => battery_minutes = parse_value(&mut args, "--battery-minutes")?,
                "--font" => font_path = Some(PathBuf::from(next_value(&mut args, "--font")?)),
                "--title" => title = Some(next_value(&mut args, "--title")?),
                "--no-stdin" => read_stdin = false,
                "-h" | "--help" => show_help = true,
                other => return Err(ArgError::UnknownFlag(other.to_string())),
            }
        }

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ArgError::InvalidValue {
                flag: "--lat",
                value: latitude.to_string(),
            });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ArgError::InvalidValue {
                flag: "--lon",
                value: longitude.to_string(),
            });
        }

        let duration_secs = duration_minutes
            .checked_mul(60)
            .ok_or_else(|| ArgError::InvalidValue {
                flag: "--duration",
                value: duration_minutes.to_string(),
            })?;

        let config = MissionClockConfig::builder()
            .latitude(latitude)
            .longitude(longitude)
            .mission_duration(Duration::from_secs(duration_secs))
            .battery_depletion_minutes(battery_minutes)
            .maybe_font_path(font_path)
            .maybe_title(title)
            .build();

        Ok(Self {
            config,
            read_stdin,
            show_help,
        })
    }
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &'static str) -> Result<String, ArgError> {
    args.next().ok_or(ArgError::MissingValue(flag))
}

fn parse_value<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<T, ArgError> {
    let value = next_value(args, flag)?;
    value
        .parse()
        .map_err(|_| ArgError::InvalidValue { flag, value })
}
