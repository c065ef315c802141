//! Simulated environment sensor.
//!
//! Produces a seeded random walk around typical indoor conditions.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::app::ports::SensorPort;
use crate::error::SensorError;
use crate::telemetry::reading::Reading;

const BASE_TEMPERATURE: i32 = 25;
const BASE_PRESSURE: i32 = 1_000;

/// Maximum step per reading.
const TEMPERATURE_STEP: i32 = 1;
const PRESSURE_STEP: i32 = 5;
const HUMIDITY_STEP: i32 = 2;

/// The walk stays inside these bands.
const TEMPERATURE_SPREAD: i32 = 5;
const PRESSURE_SPREAD: i32 = 25;
const HUMIDITY_BAND: (i32, i32) = (20, 80);

pub struct SimulatedSensor {
    rng: SmallRng,
    current: Reading,
}

impl SimulatedSensor {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            current: Reading::new(BASE_TEMPERATURE, BASE_PRESSURE, 50),
        }
    }

    fn step(&mut self, value: i32, step: i32, lo: i32, hi: i32) -> i32 {
        (value + self.rng.gen_range(-step..=step)).clamp(lo, hi)
    }
}

impl SensorPort for SimulatedSensor {
    fn read(&mut self) -> Result<Reading, SensorError> {
        let c = self.current;
        self.current = Reading::new(
            self.step(
                c.temperature,
                TEMPERATURE_STEP,
                BASE_TEMPERATURE - TEMPERATURE_SPREAD,
                BASE_TEMPERATURE + TEMPERATURE_SPREAD,
            ),
            self.step(
                c.pressure,
                PRESSURE_STEP,
                BASE_PRESSURE - PRESSURE_SPREAD,
                BASE_PRESSURE + PRESSURE_SPREAD,
            ),
            self.step(c.humidity, HUMIDITY_STEP, HUMIDITY_BAND.0, HUMIDITY_BAND.1),
        );
        Ok(self.current)
    }
}
