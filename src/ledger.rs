use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::store::Store;

/// Single source of truth for daily attendance, keyed on (person, date).
/// The ledger has no knowledge of leave requests; the leave engine drives
/// it one-directionally.
#[derive(Clone)]
pub struct AttendanceLedger {
    store: Arc<Store>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarkEntry {
    pub person_id: u64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Serialize)]
pub struct BulkFailure {
    /// Position of the failed entry in the submitted batch.
    pub index: usize,
    pub message: String,
}

/// Outcome of a bulk mark: per-entry failures are reported here, distinct
/// from a total failure of the batch (a malformed request never reaches the
/// ledger at all).
#[derive(Debug, Default, Serialize)]
pub struct BulkOutcome {
    pub records: Vec<AttendanceRecord>,
    pub failures: Vec<BulkFailure>,
}

#[derive(Debug, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

impl AttendanceLedger {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Upsert by natural key: repeated marks for the same (person, date)
    /// overwrite the status in place, never duplicate the row.
    pub fn mark(
        &self,
        person_id: u64,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord> {
        self.store.ensure_person(person_id)?;
        Ok(self.store.upsert_attendance(person_id, date, status))
    }

    /// Applies `mark` to each entry in submitted order; duplicate keys in
    /// one batch resolve last-write-wins. A failing entry (unknown person)
    /// does not roll back the entries around it.
    pub fn mark_bulk(&self, entries: &[MarkEntry]) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for (index, entry) in entries.iter().enumerate() {
            match self.mark(entry.person_id, entry.date, entry.status) {
                Ok(record) => outcome.records.push(record),
                Err(e) => {
                    tracing::warn!(index, person_id = entry.person_id, error = %e, "bulk mark entry failed");
                    outcome.failures.push(BulkFailure {
                        index,
                        message: e.to_string(),
                    });
                }
            }
        }
        outcome
    }

    /// Date ascending.
    pub fn by_person(&self, person_id: u64) -> Result<Vec<AttendanceRecord>> {
        self.store.ensure_person(person_id)?;
        Ok(self.store.attendance_by_person(person_id))
    }

    pub fn by_date(&self, date: NaiveDate) -> Vec<AttendanceRecord> {
        self.store.attendance_by_date(date)
    }

    pub fn count_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<u64> {
        check_range(start, end)?;
        Ok(self.store.count_attendance_in_range(start, end, status))
    }

    pub fn count_by_status(&self, status: AttendanceStatus) -> u64 {
        self.store.count_attendance_by_status(status)
    }

    /// Per-day count of Present records in the range, date ascending. Days
    /// with no Present record are omitted.
    pub fn daily_present_counts(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyCount>> {
        check_range(start, end)?;
        Ok(self
            .store
            .daily_present_counts(start, end)
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect())
    }
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(Error::InvalidInput(format!(
            "start date {start} is after end date {end}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn ledger_with_person() -> (AttendanceLedger, u64) {
        let store = Arc::new(Store::new());
        let person = store.add_person("dana").unwrap();
        (AttendanceLedger::new(store), person.id)
    }

    #[test]
    fn remark_overwrites_in_place() {
        let (ledger, pid) = ledger_with_person();
        ledger.mark(pid, d(2024, 1, 8), AttendanceStatus::Absent).unwrap();
        ledger.mark(pid, d(2024, 1, 8), AttendanceStatus::Present).unwrap();
        ledger.mark(pid, d(2024, 1, 8), AttendanceStatus::Late).unwrap();

        let rows = ledger.by_person(pid).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, AttendanceStatus::Late);
    }

    #[test]
    fn mark_unknown_person_is_not_found() {
        let (ledger, _) = ledger_with_person();
        let err = ledger
            .mark(999, d(2024, 1, 8), AttendanceStatus::Present)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn by_person_is_chronological() {
        let (ledger, pid) = ledger_with_person();
        ledger.mark(pid, d(2024, 1, 20), AttendanceStatus::Present).unwrap();
        ledger.mark(pid, d(2024, 1, 5), AttendanceStatus::Absent).unwrap();
        ledger.mark(pid, d(2024, 1, 12), AttendanceStatus::Late).unwrap();

        let dates: Vec<_> = ledger.by_person(pid).unwrap().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(2024, 1, 5), d(2024, 1, 12), d(2024, 1, 20)]);
    }

    #[test]
    fn bulk_matches_sequential_marks_and_last_write_wins() {
        let (ledger, pid) = ledger_with_person();
        let outcome = ledger.mark_bulk(&[
            MarkEntry { person_id: pid, date: d(2024, 2, 1), status: AttendanceStatus::Present },
            MarkEntry { person_id: pid, date: d(2024, 2, 2), status: AttendanceStatus::Present },
            // duplicate key within the batch: the later entry wins
            MarkEntry { person_id: pid, date: d(2024, 2, 1), status: AttendanceStatus::Absent },
        ]);
        assert_eq!(outcome.records.len(), 3);
        assert!(outcome.failures.is_empty());

        let rows = ledger.by_person(pid).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, d(2024, 2, 1));
        assert_eq!(rows[0].status, AttendanceStatus::Absent);
    }

    #[test]
    fn bulk_reports_failures_per_entry() {
        let (ledger, pid) = ledger_with_person();
        let outcome = ledger.mark_bulk(&[
            MarkEntry { person_id: pid, date: d(2024, 2, 1), status: AttendanceStatus::Present },
            MarkEntry { person_id: 999, date: d(2024, 2, 1), status: AttendanceStatus::Present },
            MarkEntry { person_id: pid, date: d(2024, 2, 2), status: AttendanceStatus::Late },
        ]);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].index, 1);
    }

    #[test]
    fn counts_by_range_and_status() {
        let (ledger, pid) = ledger_with_person();
        ledger.mark(pid, d(2024, 3, 1), AttendanceStatus::Present).unwrap();
        ledger.mark(pid, d(2024, 3, 2), AttendanceStatus::Absent).unwrap();
        ledger.mark(pid, d(2024, 3, 3), AttendanceStatus::Present).unwrap();
        ledger.mark(pid, d(2024, 4, 1), AttendanceStatus::Present).unwrap();

        assert_eq!(
            ledger
                .count_in_range(d(2024, 3, 1), d(2024, 3, 31), AttendanceStatus::Present)
                .unwrap(),
            2
        );
        assert_eq!(ledger.count_by_status(AttendanceStatus::Present), 3);
        assert_eq!(ledger.count_by_status(AttendanceStatus::Leave), 0);

        let daily = ledger
            .daily_present_counts(d(2024, 3, 1), d(2024, 3, 31))
            .unwrap();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, d(2024, 3, 1));
        assert_eq!(daily[0].count, 1);
    }

    #[test]
    fn inverted_range_is_invalid_input() {
        let (ledger, _) = ledger_with_person();
        let err = ledger
            .count_in_range(d(2024, 3, 2), d(2024, 3, 1), AttendanceStatus::Present)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
