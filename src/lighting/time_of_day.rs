use crate::constants::light::{MAX_LIGHT_LEVEL, NIGHT_SKY_LEVEL};
use crate::constants::time::{SUNRISE_HOUR, SUNSET_HOUR, TWILIGHT_HOURS};

/// Time of day represented as hours (0-24)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeOfDay {
    /// Current time in hours (0.0 - 24.0)
    pub hours: f32,
}

impl TimeOfDay {
    pub fn new(hours: f32) -> Self {
        Self {
            hours: hours.rem_euclid(24.0),
        }
    }

    /// Create noon time
    pub fn noon() -> Self {
        Self { hours: 12.0 }
    }

    /// Create midnight time
    pub fn midnight() -> Self {
        Self { hours: 0.0 }
    }

    /// Advance time by delta seconds
    pub fn advance(&mut self, delta_seconds: f32, day_length_seconds: f32) {
        let hours_per_second = 24.0 / day_length_seconds;
        self.hours = (self.hours + delta_seconds * hours_per_second).rem_euclid(24.0);
    }

    /// Is it daytime?
    pub fn is_day(&self) -> bool {
        self.hours >= SUNRISE_HOUR && self.hours < SUNSET_HOUR
    }

    /// Is it nighttime?
    pub fn is_night(&self) -> bool {
        !self.is_day()
    }

    /// Discrete brightness band used to decide when baked lighting is stale
    pub fn band(&self) -> LightBand {
        let near_sunrise = (self.hours - SUNRISE_HOUR).abs() < TWILIGHT_HOURS;
        let near_sunset = (self.hours - SUNSET_HOUR).abs() < TWILIGHT_HOURS;
        if near_sunrise || near_sunset {
            LightBand::Twilight
        } else if self.is_day() {
            LightBand::Day
        } else {
            LightBand::Night
        }
    }

    /// Sky brightness multiplier (0.0 - 1.0) applied by meshers to sky light
    pub fn sky_brightness(&self) -> f32 {
        if self.is_day() {
            let day_progress = (self.hours - SUNRISE_HOUR) / (SUNSET_HOUR - SUNRISE_HOUR);
            let light = 1.0 - (2.0 * (day_progress - 0.5)).abs() * 0.2;
            light.max(0.8)
        } else {
            NIGHT_SKY_LEVEL as f32 / MAX_LIGHT_LEVEL as f32
        }
    }
}

/// Coarse sky brightness band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightBand {
    Day,
    Twilight,
    Night,
}

impl LightBand {
    /// Effective sky level of the band (0-15)
    pub fn sky_level(self) -> u8 {
        match self {
            LightBand::Day => MAX_LIGHT_LEVEL,
            LightBand::Twilight => (MAX_LIGHT_LEVEL + NIGHT_SKY_LEVEL) / 2,
            LightBand::Night => NIGHT_SKY_LEVEL,
        }
    }
}

/// Manages the day/night cycle
#[derive(Debug, Clone)]
pub struct DayNightCycle {
    /// Current time of day
    pub time: TimeOfDay,
    /// Length of a full day in seconds
    pub day_length_seconds: f32,
    /// Speed multiplier for time progression
    pub time_scale: f32,
}

impl Default for DayNightCycle {
    fn default() -> Self {
        Self::new(
            TimeOfDay::noon(),
            crate::constants::time::DEFAULT_DAY_LENGTH_SECONDS,
        )
    }
}

impl DayNightCycle {
    pub fn new(starting_time: TimeOfDay, day_length_seconds: f32) -> Self {
        Self {
            time: starting_time,
            day_length_seconds,
            time_scale: 1.0,
        }
    }

    /// Advance the cycle; returns the new band when it changed
    pub fn update(&mut self, delta_time: f32) -> Option<LightBand> {
        let before = self.time.band();
        self.time
            .advance(delta_time * self.time_scale, self.day_length_seconds);
        let after = self.time.band();
        (before != after).then_some(after)
    }

    pub fn band(&self) -> LightBand {
        self.time.band()
    }

    /// Set time scale (for debugging or gameplay features)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }
}
