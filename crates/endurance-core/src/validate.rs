use crate::error::ValidationError;
use crate::snapshot::Snapshot;

pub fn validate_pair(first: &Snapshot, second: &Snapshot) -> Result<(), ValidationError> {
    if let (Some(a), Some(b)) = (&first.serial, &second.serial) {
        if a != b {
            return Err(ValidationError::IdentityMismatch {
                first: a.clone(),
                second: b.clone(),
            });
        }
    }

    if let (Some(a), Some(b)) = (first.timestamp, second.timestamp) {
        if a >= b {
            return Err(ValidationError::OrderingViolation {
                first: a,
                second: b,
            });
        }
    }

    if second.data_units_written < first.data_units_written {
        return Err(ValidationError::CounterRegression {
            first: first.data_units_written,
            second: second.data_units_written,
        });
    }

    Ok(())
}
