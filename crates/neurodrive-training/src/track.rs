use serde::{Deserialize, Serialize};

use crate::Simulation;

/// One stretch of a [`CorridorTrack`], ending at a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub length: f64,
    pub speed_limit: f64,
}

impl Segment {
    #[must_use]
    pub const fn new(length: f64, speed_limit: f64) -> Self {
        Self {
            length,
            speed_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackParams {
    pub segments: Vec<Segment>,
    /// Acceleration at full throttle.
    pub max_acceleration: f64,
    /// Deceleration at full brake.
    pub max_braking: f64,
}

impl Default for TrackParams {
    fn default() -> Self {
        Self {
            segments: vec![
                Segment::new(20.0, 8.0),
                Segment::new(15.0, 4.0),
                Segment::new(25.0, 10.0),
                Segment::new(10.0, 3.0),
                Segment::new(30.0, 12.0),
                Segment::new(20.0, 6.0),
                Segment::new(15.0, 9.0),
                Segment::new(25.0, 5.0),
                Segment::new(20.0, 11.0),
                Segment::new(10.0, 4.0),
            ],
            max_acceleration: 4.0,
            max_braking: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VehicleState {
    Running,
    Crashed,
    Finished,
}

#[derive(Debug, Clone, Copy)]
struct Vehicle {
    position: f64,
    speed: f64,
    throttle: f64,
    state: VehicleState,
}

impl Vehicle {
    const START: Self = Self {
        position: 0.0,
        speed: 0.0,
        throttle: 0.0,
        state: VehicleState::Running,
    };
}

/// A one-dimensional course split into checkpoint segments with speed limits.
///
/// Each vehicle has a single actuator, the throttle in `[-1, 1]` (negative values brake).
/// Driving faster than the limit of the segment the vehicle is in crashes it; passing the
/// last checkpoint finishes the course. Sensors, all normalized:
///
/// 0. remaining distance to the next checkpoint over the segment length
/// 1. speed over the highest speed limit on the track
/// 2. current segment limit over the highest limit
/// 3. next segment limit over the highest limit (the current one on the last segment)
#[derive(Debug, Clone)]
pub struct CorridorTrack {
    params: TrackParams,
    // distance from the start to each checkpoint
    checkpoints: Vec<f64>,
    top_speed_limit: f64,
    vehicles: Vec<Vehicle>,
}

impl CorridorTrack {
    pub const SENSOR_COUNT: usize = 4;
    pub const OUTPUT_COUNT: usize = 1;

    pub fn new(params: TrackParams) -> Result<Self, TrackError> {
        if params.segments.is_empty() {
            return Err(TrackError::NoSegments);
        }
        for (index, segment) in params.segments.iter().enumerate() {
            if !(segment.length > 0.0 && segment.speed_limit > 0.0) {
                return Err(TrackError::InvalidSegment { index });
            }
        }
        if !(params.max_acceleration > 0.0 && params.max_braking > 0.0) {
            return Err(TrackError::InvalidDynamics);
        }

        let checkpoints = params
            .segments
            .iter()
            .scan(0.0, |end, segment| {
                *end += segment.length;
                Some(*end)
            })
            .collect();
        let top_speed_limit = params
            .segments
            .iter()
            .map(|s| s.speed_limit)
            .fold(0.0, f64::max);
        Ok(Self {
            params,
            checkpoints,
            top_speed_limit,
            vehicles: vec![],
        })
    }

    #[must_use]
    pub fn params(&self) -> &TrackParams {
        &self.params
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.checkpoints.last().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn position(&self, index: usize) -> Option<f64> {
        self.vehicles.get(index).map(|v| v.position)
    }

    #[must_use]
    pub fn speed(&self, index: usize) -> Option<f64> {
        self.vehicles.get(index).map(|v| v.speed)
    }

    #[must_use]
    pub fn has_crashed(&self, index: usize) -> bool {
        self.vehicles
            .get(index)
            .is_some_and(|v| v.state == VehicleState::Crashed)
    }

    #[must_use]
    pub fn has_finished(&self, index: usize) -> bool {
        self.vehicles
            .get(index)
            .is_some_and(|v| v.state == VehicleState::Finished)
    }

    fn segment_at(&self, position: f64) -> usize {
        self.checkpoints
            .partition_point(|&end| end <= position)
            .min(self.checkpoints.len() - 1)
    }
}

impl Simulation for CorridorTrack {
    fn sensor_count(&self) -> usize {
        Self::SENSOR_COUNT
    }

    fn output_count(&self) -> usize {
        Self::OUTPUT_COUNT
    }

    fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }

    fn reset(&mut self, population: usize) {
        self.vehicles.clear();
        self.vehicles.resize(population, Vehicle::START);
    }

    fn sensors(&self, index: usize) -> Vec<f64> {
        let Some(vehicle) = self.vehicles.get(index) else {
            return vec![0.0; Self::SENSOR_COUNT];
        };
        let segment = self.segment_at(vehicle.position);
        let current = self.params.segments[segment];
        let next = self
            .params
            .segments
            .get(segment + 1)
            .copied()
            .unwrap_or(current);
        let remaining = (self.checkpoints[segment] - vehicle.position).max(0.0);
        vec![
            remaining / current.length,
            vehicle.speed / self.top_speed_limit,
            current.speed_limit / self.top_speed_limit,
            next.speed_limit / self.top_speed_limit,
        ]
    }

    fn actuate(&mut self, index: usize, outputs: &[f64]) {
        if let Some(vehicle) = self.vehicles.get_mut(index) {
            vehicle.throttle = outputs.first().copied().unwrap_or(0.0).clamp(-1.0, 1.0);
        }
    }

    fn step(&mut self, dt: f64) {
        let length = self.length();
        for index in 0..self.vehicles.len() {
            let mut vehicle = self.vehicles[index];
            if vehicle.state != VehicleState::Running {
                continue;
            }
            let acceleration = if vehicle.throttle >= 0.0 {
                vehicle.throttle * self.params.max_acceleration
            } else {
                vehicle.throttle * self.params.max_braking
            };
            vehicle.speed = (vehicle.speed + acceleration * dt).max(0.0);
            vehicle.position += vehicle.speed * dt;

            if vehicle.position >= length {
                vehicle.state = VehicleState::Finished;
            } else {
                let limit = self.params.segments[self.segment_at(vehicle.position)].speed_limit;
                if vehicle.speed > limit {
                    vehicle.state = VehicleState::Crashed;
                }
            }
            self.vehicles[index] = vehicle;
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn progress(&self, index: usize) -> f64 {
        self.vehicles.get(index).map_or(0.0, |vehicle| {
            self.checkpoints
                .partition_point(|&end| end <= vehicle.position) as f64
        })
    }

    fn is_running(&self, index: usize) -> bool {
        self.vehicles
            .get(index)
            .is_some_and(|v| v.state == VehicleState::Running)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TrackError {
    #[display("track has no segments")]
    NoSegments,
    #[display("segment {index} must have a positive length and speed limit")]
    InvalidSegment { index: usize },
    #[display("acceleration and braking must be positive")]
    InvalidDynamics,
}
