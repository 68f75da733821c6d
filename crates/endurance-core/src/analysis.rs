use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{CapacitySource, DeviceParameters, ParameterInput};
use crate::engine::{compute, EnduranceMetrics, FlashCounters};
use crate::error::AnalysisError;
use crate::extract::extract;
use crate::snapshot::Snapshot;
use crate::validate::validate_pair;

#[derive(Debug, Clone, Copy)]
pub struct SnapshotSource<'a> {
    pub name: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub first: Snapshot,
    pub second: Snapshot,
    pub params: DeviceParameters,
    pub capacity_source: CapacitySource,
    pub metrics: EnduranceMetrics,
}

pub fn analyze(
    first: SnapshotSource<'_>,
    second: SnapshotSource<'_>,
    input: &ParameterInput,
    flash: Option<FlashCounters>,
) -> Result<Analysis, AnalysisError> {
    let first_snapshot = extract(first.text, first.name)?;
    let second_snapshot = extract(second.text, second.name)?;

    validate_pair(&first_snapshot, &second_snapshot)?;

    let (params, capacity_source) = input.resolve(&second_snapshot)?;
    info!(capacity_gib = params.capacity_gib, ?capacity_source, "drive capacity");

    let metrics = compute(&first_snapshot, &second_snapshot, &params, flash)?;

    Ok(Analysis {
        first: first_snapshot,
        second: second_snapshot,
        params,
        capacity_source,
        metrics,
    })
}
