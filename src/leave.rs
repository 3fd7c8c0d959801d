use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::model::attendance::AttendanceStatus;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::store::Store;

/// Owns the leave request state machine and drives the attendance backfill
/// on approval. Depends on the ledger's tables one-directionally; nothing
/// in attendance handling knows about leave.
#[derive(Clone)]
pub struct LeaveEngine {
    store: Arc<Store>,
}

impl LeaveEngine {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Creates a Pending request. The date range and reason are validated
    /// here; `applied_at` is stamped with the current time.
    pub fn apply(
        &self,
        person_id: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: &str,
    ) -> Result<LeaveRequest> {
        self.store.ensure_person(person_id)?;
        if start_date > end_date {
            return Err(Error::InvalidInput(format!(
                "start date {start_date} is after end date {end_date}"
            )));
        }
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(Error::InvalidInput("reason must not be empty".into()));
        }
        let leave = self
            .store
            .insert_leave(person_id, start_date, end_date, reason.to_string());
        tracing::info!(leave_id = leave.id, person_id, "leave request submitted");
        Ok(leave)
    }

    /// Approves a Pending request and stamps every day in
    /// [start_date, end_date] as Leave in the ledger, overriding whatever
    /// status was already recorded there.
    ///
    /// The backfill is all-or-nothing: the person check runs before any
    /// write and the per-day upsert cannot fail after that, so a failed
    /// approval leaves the request Pending and the ledger untouched. The
    /// whole transition runs under the leave table's write lock, so of two
    /// racing reviewers exactly one wins.
    pub fn approve(&self, leave_id: u64, remarks: &str) -> Result<LeaveRequest> {
        self.store.transition_pending_leave(leave_id, |leave| {
            self.store.ensure_person(leave.person_id)?;
            let mut day = leave.start_date;
            while day <= leave.end_date {
                self.store
                    .upsert_attendance(leave.person_id, day, AttendanceStatus::Leave);
                match day.succ_opt() {
                    Some(next) => day = next,
                    None => break,
                }
            }
            leave.status = LeaveStatus::Approved;
            leave.remarks = Some(remarks.to_string());
            tracing::info!(
                leave_id,
                person_id = leave.person_id,
                start = %leave.start_date,
                end = %leave.end_date,
                "leave approved, attendance backfilled"
            );
            Ok(leave.clone())
        })
    }

    /// Rejects a Pending request. Never touches the ledger.
    pub fn reject(&self, leave_id: u64, remarks: &str) -> Result<LeaveRequest> {
        self.store.transition_pending_leave(leave_id, |leave| {
            leave.status = LeaveStatus::Rejected;
            leave.remarks = Some(remarks.to_string());
            tracing::info!(leave_id, person_id = leave.person_id, "leave rejected");
            Ok(leave.clone())
        })
    }

    pub fn get(&self, leave_id: u64) -> Result<LeaveRequest> {
        self.store.leave(leave_id)
    }

    /// applied_at descending.
    pub fn by_person(&self, person_id: u64) -> Result<Vec<LeaveRequest>> {
        self.store.ensure_person(person_id)?;
        Ok(self.store.leaves_by_person(person_id))
    }

    pub fn pending(&self) -> Vec<LeaveRequest> {
        self.store.pending_leaves()
    }

    /// applied_at descending.
    pub fn all(&self) -> Vec<LeaveRequest> {
        self.store.all_leaves()
    }
}
