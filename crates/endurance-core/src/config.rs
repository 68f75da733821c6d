use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ParameterError;
use crate::snapshot::Snapshot;

pub(crate) const BYTES_PER_KIB: f64 = 1024.0;
pub(crate) const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceParameters {
    pub host_unit_size_kib: f64,
    pub flash_unit_size_kib: f64,
    pub rated_endurance_cycles: u64,
    pub capacity_gib: f64,
}

impl DeviceParameters {
    pub fn new(
        host_unit_size_kib: f64,
        flash_unit_size_kib: f64,
        rated_endurance_cycles: u64,
        capacity_gib: f64,
    ) -> Result<Self, ParameterError> {
        positive("host unit size", host_unit_size_kib)?;
        positive("flash unit size", flash_unit_size_kib)?;
        positive("rated endurance cycles", rated_endurance_cycles as f64)?;
        positive("capacity", capacity_gib)?;

        Ok(Self {
            host_unit_size_kib,
            flash_unit_size_kib,
            rated_endurance_cycles,
            capacity_gib,
        })
    }

    pub fn capacity_bytes(&self) -> f64 {
        self.capacity_gib * BYTES_PER_GIB
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacitySource {
    Supplied,
    Reported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInput {
    pub host_unit_size_kib: f64,
    pub flash_unit_size_kib: f64,
    pub rated_endurance_cycles: u64,
    pub capacity_gib: Option<f64>,
}

impl ParameterInput {
    pub fn resolve(
        &self,
        reference: &Snapshot,
    ) -> Result<(DeviceParameters, CapacitySource), ParameterError> {
        let (capacity_gib, source) = match (self.capacity_gib, reference.capacity_bytes) {
            (Some(gib), _) => (gib, CapacitySource::Supplied),
            (None, Some(bytes)) => (bytes as f64 / BYTES_PER_GIB, CapacitySource::Reported),
            (None, None) => return Err(ParameterError::MissingCapacity),
        };
        debug!(capacity_gib, ?source, "resolved drive capacity");

        let params = DeviceParameters::new(
            self.host_unit_size_kib,
            self.flash_unit_size_kib,
            self.rated_endurance_cycles,
            capacity_gib,
        )?;
        Ok((params, source))
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ParameterError> {
    // NaN fails this comparison too.
    if value > 0.0 {
        Ok(())
    } else {
        Err(ParameterError::NonPositive { field, value })
    }
}
