use serde::{Deserialize, Serialize};

use crate::config::{DeviceParameters, BYTES_PER_GIB, BYTES_PER_KIB};
use crate::error::EngineError;
use crate::snapshot::Snapshot;

const SECONDS_PER_DAY: f64 = 86_400.0;
const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashCounters {
    pub before: u64,
    pub after: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WafSource {
    Measured,
    Assumed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnduranceMetrics {
    pub elapsed_days: f64,
    pub host_bytes_delta: f64,
    pub flash_bytes_delta: f64,
    pub write_amplification_factor: f64,
    pub waf_source: WafSource,
    pub total_host_bytes_written: f64,
    pub total_flash_bytes_written: f64,
    pub drive_writes_per_day: f64,
    pub daily_write_rate_gib: f64,
    pub endurance_cycles_consumed: f64,
    pub wear_fraction_percent: f64,
    // INFINITY when the projected flash write rate is zero.
    pub estimated_remaining_days: f64,
    pub estimated_remaining_years: f64,
}

// Lifetime cycles apply the current-period WAF to the cumulative host counter.
pub fn compute(
    first: &Snapshot,
    second: &Snapshot,
    params: &DeviceParameters,
    flash: Option<FlashCounters>,
) -> Result<EnduranceMetrics, EngineError> {
    let elapsed_days = elapsed_days(first, second)?;

    let host_units_delta = second.data_units_written.saturating_sub(first.data_units_written);
    let host_bytes_delta = unit_bytes(host_units_delta, params.host_unit_size_kib);
    let total_host_bytes_written = unit_bytes(second.data_units_written, params.host_unit_size_kib);

    let daily_write_rate_gib = (host_bytes_delta / BYTES_PER_GIB) / elapsed_days;
    let drive_writes_per_day = daily_write_rate_gib / params.capacity_gib;

    let (write_amplification_factor, flash_bytes_delta, total_flash_bytes_written, waf_source) =
        match flash {
            Some(counters) => {
                if counters.after < counters.before {
                    return Err(EngineError::FlashCounterRegression {
                        before: counters.before,
                        after: counters.after,
                    });
                }
                let flash_units_delta = counters.after - counters.before;
                let flash_bytes_delta = unit_bytes(flash_units_delta, params.flash_unit_size_kib);
                let waf = if host_bytes_delta > 0.0 {
                    flash_bytes_delta / host_bytes_delta
                } else {
                    1.0
                };
                (
                    waf,
                    flash_bytes_delta,
                    unit_bytes(counters.after, params.flash_unit_size_kib),
                    WafSource::Measured,
                )
            }
            None => (
                1.0,
                host_bytes_delta,
                total_host_bytes_written,
                WafSource::Assumed,
            ),
        };

    let endurance_cycles_consumed =
        total_host_bytes_written * write_amplification_factor / params.capacity_bytes();
    let rated = params.rated_endurance_cycles as f64;
    let wear_fraction_percent = endurance_cycles_consumed / rated * 100.0;

    let estimated_remaining_days = remaining_days(
        rated - endurance_cycles_consumed,
        daily_write_rate_gib,
        write_amplification_factor,
        params.capacity_gib,
    );

    Ok(EnduranceMetrics {
        elapsed_days,
        host_bytes_delta,
        flash_bytes_delta,
        write_amplification_factor,
        waf_source,
        total_host_bytes_written,
        total_flash_bytes_written,
        drive_writes_per_day,
        daily_write_rate_gib,
        endurance_cycles_consumed,
        wear_fraction_percent,
        estimated_remaining_days,
        estimated_remaining_years: estimated_remaining_days / DAYS_PER_YEAR,
    })
}

fn elapsed_days(first: &Snapshot, second: &Snapshot) -> Result<f64, EngineError> {
    let start = first
        .timestamp
        .ok_or(EngineError::MissingTimestamp { which: "snapshot 1" })?;
    let end = second
        .timestamp
        .ok_or(EngineError::MissingTimestamp { which: "snapshot 2" })?;

    let days = (end - start).num_seconds() as f64 / SECONDS_PER_DAY;
    if days <= 0.0 {
        return Err(EngineError::NonPositiveElapsedTime { days });
    }
    Ok(days)
}

fn unit_bytes(units: u64, unit_size_kib: f64) -> f64 {
    units as f64 * unit_size_kib * BYTES_PER_KIB
}

// Zero when the budget is spent or there is no write rate to project from;
// infinite only when writes exist but amplify to nothing.
fn remaining_days(
    remaining_cycles: f64,
    daily_write_rate_gib: f64,
    waf: f64,
    capacity_gib: f64,
) -> f64 {
    if remaining_cycles <= 0.0 || daily_write_rate_gib <= 0.0 {
        return 0.0;
    }

    let daily_flash_gib = daily_write_rate_gib * waf;
    if daily_flash_gib > 0.0 {
        remaining_cycles * capacity_gib / daily_flash_gib
    } else {
        f64::INFINITY
    }
}
