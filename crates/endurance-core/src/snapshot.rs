use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    Flash,
    Legacy,
}

impl Dialect {
    pub fn label(&self) -> &'static str {
        match self {
            Dialect::Flash => "NVMe",
            Dialect::Legacy => "SATA",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: Option<NaiveDateTime>,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub capacity_bytes: Option<u64>,
    pub data_units_written: u64,
    pub data_units_read: Option<u64>,
    pub power_on_hours: Option<u64>,
    pub percentage_used: Option<u32>,
    pub available_spare: Option<u32>,
    pub dialect: Dialect,
}

impl Snapshot {
    pub fn new(data_units_written: u64, dialect: Dialect) -> Self {
        Self {
            timestamp: None,
            model: None,
            serial: None,
            capacity_bytes: None,
            data_units_written,
            data_units_read: None,
            power_on_hours: None,
            percentage_used: None,
            available_spare: None,
            dialect,
        }
    }

    pub fn is_flash_dialect(&self) -> bool {
        self.dialect == Dialect::Flash
    }
}
