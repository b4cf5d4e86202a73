use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::GeolocationError, model::Coordinates};

/// Device-position collaborator.
#[async_trait]
pub trait Locator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, GeolocationError>;
}

/// Answers with a position known up front (command-line flags or the
/// configured home), or reports the service as unavailable.
#[derive(Debug, Clone, Default)]
pub struct FixedLocator {
    position: Option<Coordinates>,
}

impl FixedLocator {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Locator for FixedLocator {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        self.position.ok_or(GeolocationError::Unavailable)
    }
}
