//! Device location sources.

use async_trait::async_trait;

use crate::types::{Coordinates, LocationError};

/// Reports the device's current position
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Host without any geolocation capability
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationSource for NoLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Always reports a configured position
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    position: Coordinates,
}

impl FixedLocation {
    pub fn new(position: Coordinates) -> Self {
        Self { position }
    }
}

#[async_trait]
impl LocationSource for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        if !self.position.is_valid() {
            return Err(LocationError::Other(format!(
                "configured position out of range: {}, {}",
                self.position.latitude, self.position.longitude
            )));
        }
        Ok(self.position)
    }
}
