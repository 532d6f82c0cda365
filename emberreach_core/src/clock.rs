//! Game clock and weather (§4.1).

use serde::{Deserialize, Serialize};

use crate::config::{WEATHER_PERSISTENCE_CHANCE, WEATHER_TRANSITION_CHANCE};
use crate::rng::RollStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    Dawn,
    Morning,
    Afternoon,
    Dusk,
    Night,
}

fn period_for_hour(hour: u32, hours_per_day: u32) -> TimePeriod {
    let frac = f64::from(hour) / f64::from(hours_per_day.max(1));
    match frac {
        f if f < 0.08 => TimePeriod::Dawn,
        f if f < 0.45 => TimePeriod::Morning,
        f if f < 0.70 => TimePeriod::Afternoon,
        f if f < 0.83 => TimePeriod::Dusk,
        _ => TimePeriod::Night,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

fn season_for_month(month: u32, months_per_year: u32) -> Season {
    let quarter = months_per_year.max(1) / 4;
    match month / quarter.max(1) {
        0 => Season::Spring,
        1 => Season::Summer,
        2 => Season::Autumn,
        _ => Season::Winter,
    }
}

/// The authoritative game clock (§4.1). `game_time` is seconds of in-world
/// time; `real_seconds_per_game_second` is the conversion ratio `advance`
/// uses to turn wall-clock deltas into game-time deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    pub game_time: f64,
    pub real_seconds_per_game_second: f64,
    pub minutes_per_hour: u32,
    pub hours_per_day: u32,
    pub days_per_month: u32,
    pub months_per_year: u32,
    #[serde(skip)]
    last_period: Option<TimePeriod>,
}

impl Clock {
    pub fn new(real_seconds_per_game_second: f64, minutes_per_hour: u32, hours_per_day: u32, days_per_month: u32, months_per_year: u32) -> Self {
        Self {
            game_time: 0.0,
            real_seconds_per_game_second,
            minutes_per_hour,
            hours_per_day,
            days_per_month,
            months_per_year,
            last_period: None,
        }
    }

    fn seconds_per_game_minute(&self) -> f64 {
        60.0
    }

    pub fn minute(&self) -> u32 {
        let total_minutes = (self.game_time / self.seconds_per_game_minute()) as u64;
        (total_minutes % u64::from(self.minutes_per_hour)) as u32
    }

    pub fn hour(&self) -> u32 {
        let minutes_per_day = u64::from(self.minutes_per_hour) * u64::from(self.hours_per_day);
        let total_minutes = (self.game_time / self.seconds_per_game_minute()) as u64;
        let minute_of_day = total_minutes % minutes_per_day.max(1);
        (minute_of_day / u64::from(self.minutes_per_hour).max(1)) as u32
    }

    pub fn day(&self) -> u32 {
        let minutes_per_day = u64::from(self.minutes_per_hour) * u64::from(self.hours_per_day);
        let total_days = (self.game_time / self.seconds_per_game_minute()) as u64 / minutes_per_day.max(1);
        (total_days % u64::from(self.days_per_month)) as u32
    }

    pub fn month(&self) -> u32 {
        let minutes_per_day = u64::from(self.minutes_per_hour) * u64::from(self.hours_per_day);
        let total_days = (self.game_time / self.seconds_per_game_minute()) as u64 / minutes_per_day.max(1);
        (total_days / u64::from(self.days_per_month).max(1) % u64::from(self.months_per_year)) as u32
    }

    pub fn year(&self) -> u64 {
        let minutes_per_day = u64::from(self.minutes_per_hour) * u64::from(self.hours_per_day);
        let days_per_year = u64::from(self.days_per_month) * u64::from(self.months_per_year);
        let total_days = (self.game_time / self.seconds_per_game_minute()) as u64 / minutes_per_day.max(1);
        total_days / days_per_year.max(1)
    }

    pub fn time_period(&self) -> TimePeriod {
        period_for_hour(self.hour(), self.hours_per_day)
    }

    pub fn season(&self) -> Season {
        season_for_month(self.month(), self.months_per_year)
    }

    /// Advance by `real_dt` wall-clock seconds, scaled by the configured
    /// ratio. Returns the new period if a boundary was crossed this call.
    pub fn advance(&mut self, real_dt: f64) -> Option<TimePeriod> {
        self.game_time += real_dt / self.real_seconds_per_game_second.max(f64::EPSILON);
        let current = self.time_period();
        if self.last_period != Some(current) {
            self.last_period = Some(current);
            Some(current)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherKind {
    Clear,
    Cloudy,
    Rain,
    Storm,
    Snow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Mild,
    Moderate,
    Strong,
    Severe,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Weather {
    pub current_weather: WeatherKind,
    pub current_intensity: Intensity,
}

impl Default for Weather {
    fn default() -> Self {
        Self { current_weather: WeatherKind::Clear, current_intensity: Intensity::Mild }
    }
}

fn season_weather_distribution(season: Season) -> [(WeatherKind, f64); 5] {
    match season {
        Season::Spring => [
            (WeatherKind::Clear, 0.35),
            (WeatherKind::Cloudy, 0.25),
            (WeatherKind::Rain, 0.30),
            (WeatherKind::Storm, 0.10),
            (WeatherKind::Snow, 0.0),
        ],
        Season::Summer => [
            (WeatherKind::Clear, 0.55),
            (WeatherKind::Cloudy, 0.20),
            (WeatherKind::Rain, 0.15),
            (WeatherKind::Storm, 0.10),
            (WeatherKind::Snow, 0.0),
        ],
        Season::Autumn => [
            (WeatherKind::Clear, 0.30),
            (WeatherKind::Cloudy, 0.35),
            (WeatherKind::Rain, 0.25),
            (WeatherKind::Storm, 0.10),
            (WeatherKind::Snow, 0.0),
        ],
        Season::Winter => [
            (WeatherKind::Clear, 0.25),
            (WeatherKind::Cloudy, 0.25),
            (WeatherKind::Rain, 0.05),
            (WeatherKind::Storm, 0.05),
            (WeatherKind::Snow, 0.40),
        ],
    }
}

const INTENSITY_WEIGHTS: [(Intensity, f64); 4] =
    [(Intensity::Mild, 0.40), (Intensity::Moderate, 0.35), (Intensity::Strong, 0.18), (Intensity::Severe, 0.07)];

fn pick_weighted<T: Copy>(table: &[(T, f64)], rng: &mut RollStream) -> T {
    let weights: Vec<f64> = table.iter().map(|(_, w)| *w).collect();
    let idx = rng.weighted_index(&weights).unwrap_or(0);
    table[idx].0
}

/// On a period boundary: with `WEATHER_TRANSITION_CHANCE` resample weather
/// from the season's distribution; independently, with
/// `WEATHER_PERSISTENCE_CHANCE`, keep the current weather and resample only
/// intensity (§4.1).
pub fn resample_weather(weather: &mut Weather, season: Season, rng: &mut RollStream) {
    if rng.chance(WEATHER_TRANSITION_CHANCE) {
        weather.current_weather = pick_weighted(&season_weather_distribution(season), rng);
    } else if rng.chance(WEATHER_PERSISTENCE_CHANCE) {
        // weather unchanged
    }
    weather.current_intensity = pick_weighted(&INTENSITY_WEIGHTS, rng);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_reports_period_change_exactly_once() {
        let mut clock = Clock::new(1.0 / 60.0, 60, 24, 30, 12);
        assert!(clock.advance(1.0).is_some());
        assert!(clock.advance(1.0).is_none());
    }

    #[test]
    fn derived_fields_roll_over_correctly() {
        let mut clock = Clock::new(1.0, 60, 24, 30, 12);
        // one real second == one game second at this ratio; advance a full day.
        clock.advance(24.0 * 60.0 * 60.0);
        assert_eq!(clock.hour(), 0);
        assert_eq!(clock.day(), 1);
    }

    #[test]
    fn season_follows_month_quarters() {
        assert_eq!(season_for_month(0, 12), Season::Spring);
        assert_eq!(season_for_month(6, 12), Season::Autumn);
    }
}
