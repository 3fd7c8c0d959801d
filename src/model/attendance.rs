use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Daily attendance status. The stored set is closed; unknown strings are
/// rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Leave,
}

/// One row per (person_id, date). The store enforces the natural key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: u64,
    pub person_id: u64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}
