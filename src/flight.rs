//! Minimal consumer of the sensor readings: barometric altitude and magnetic
//! heading, kept per instance instead of in module statics.

use nalgebra::{ComplexField, RealField, Vector3};

/// Standard sea level pressure in hPa
pub const SEA_LEVEL_HPA: f32 = 1013.25;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlightControl {
    reference_hpa: f32,
    altitude: f32,
    heading: f32,
}

impl Default for FlightControl {
    fn default() -> Self {
        Self::new(SEA_LEVEL_HPA)
    }
}

impl FlightControl {
    /// Start with zero altitude and heading, measuring altitude against
    /// `reference_hpa`
    pub const fn new(reference_hpa: f32) -> Self {
        Self {
            reference_hpa,
            altitude: 0.0,
            heading: 0.0,
        }
    }

    /// Feed one pressure sample (hPa) and one magnetic field sample (any unit)
    pub fn update(&mut self, pressure_hpa: f32, field: Vector3<f32>) {
        self.altitude = altitude(pressure_hpa, self.reference_hpa);
        self.heading = heading(field);
    }

    /// Altitude in meters above the reference pressure level
    pub fn altitude(&self) -> f32 {
        self.altitude
    }

    /// Heading in degrees, 0 to 360, measured from the X axis towards Y
    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn reference(&self) -> f32 {
        self.reference_hpa
    }
}

/// International barometric formula
pub fn altitude(pressure_hpa: f32, reference_hpa: f32) -> f32 {
    44330.0 * (1.0 - ComplexField::powf(pressure_hpa / reference_hpa, 0.1903))
}

/// Heading of the horizontal field component, assumes the board is level
pub fn heading(field: Vector3<f32>) -> f32 {
    let degrees = RealField::atan2(field.y, field.x).to_degrees();
    if degrees < 0.0 {
        degrees + 360.0
    } else {
        degrees
    }
}
