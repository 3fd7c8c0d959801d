use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::person::Person;

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct AttendanceTable {
    rows: BTreeMap<u64, AttendanceRecord>,
    /// Natural-key index: (person_id, date) -> row id.
    by_key: HashMap<(u64, NaiveDate), u64>,
}

/// In-process storage boundary. Each table sits behind its own lock; the
/// attendance upsert and the leave terminal transition each run entirely
/// under a single write guard, which is what makes them atomic with respect
/// to concurrent callers.
///
/// Lock order is leaves before attendance (only leave approval holds both);
/// people is taken alone or innermost.
pub struct Store {
    people: RwLock<BTreeMap<u64, Person>>,
    attendance: RwLock<AttendanceTable>,
    leaves: RwLock<BTreeMap<u64, LeaveRequest>>,
    next_person_id: AtomicU64,
    next_attendance_id: AtomicU64,
    next_leave_id: AtomicU64,
}

impl Store {
    pub fn new() -> Self {
        Self {
            people: RwLock::new(BTreeMap::new()),
            attendance: RwLock::new(AttendanceTable::default()),
            leaves: RwLock::new(BTreeMap::new()),
            next_person_id: AtomicU64::new(1),
            next_attendance_id: AtomicU64::new(1),
            next_leave_id: AtomicU64::new(1),
        }
    }

    pub fn add_person(&self, name: &str) -> Result<Person> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("name must not be empty".into()));
        }
        let mut people = write(&self.people);
        if people.values().any(|p| p.name == name) {
            return Err(Error::Conflict(format!("person '{name}' already registered")));
        }
        let id = self.next_person_id.fetch_add(1, Ordering::Relaxed);
        let person = Person {
            id,
            name: name.to_string(),
        };
        people.insert(id, person.clone());
        Ok(person)
    }

    pub fn person(&self, id: u64) -> Result<Person> {
        read(&self.people)
            .get(&id)
            .cloned()
            .ok_or(Error::person_not_found(id))
    }

    pub fn people(&self) -> Vec<Person> {
        read(&self.people).values().cloned().collect()
    }

    pub fn ensure_person(&self, id: u64) -> Result<()> {
        if read(&self.people).contains_key(&id) {
            Ok(())
        } else {
            Err(Error::person_not_found(id))
        }
    }

    /// Find-by-natural-key, update-or-insert, under one write guard. After
    /// the call exactly one row exists for (person_id, date) and its status
    /// is `status`; concurrent callers for the same key serialize here.
    pub(crate) fn upsert_attendance(
        &self,
        person_id: u64,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> AttendanceRecord {
        let mut table = write(&self.attendance);
        if let Some(&id) = table.by_key.get(&(person_id, date)) {
            if let Some(row) = table.rows.get_mut(&id) {
                row.status = status;
                return row.clone();
            }
        }
        let id = self.next_attendance_id.fetch_add(1, Ordering::Relaxed);
        let record = AttendanceRecord {
            id,
            person_id,
            date,
            status,
        };
        table.by_key.insert((person_id, date), id);
        table.rows.insert(id, record.clone());
        record
    }

    pub(crate) fn attendance_by_person(&self, person_id: u64) -> Vec<AttendanceRecord> {
        let table = read(&self.attendance);
        let mut out: Vec<_> = table
            .rows
            .values()
            .filter(|r| r.person_id == person_id)
            .cloned()
            .collect();
        out.sort_by_key(|r| r.date);
        out
    }

    pub(crate) fn attendance_by_date(&self, date: NaiveDate) -> Vec<AttendanceRecord> {
        read(&self.attendance)
            .rows
            .values()
            .filter(|r| r.date == date)
            .cloned()
            .collect()
    }

    pub(crate) fn count_attendance_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        status: AttendanceStatus,
    ) -> u64 {
        read(&self.attendance)
            .rows
            .values()
            .filter(|r| r.status == status && r.date >= start && r.date <= end)
            .count() as u64
    }

    pub(crate) fn count_attendance_by_status(&self, status: AttendanceStatus) -> u64 {
        read(&self.attendance)
            .rows
            .values()
            .filter(|r| r.status == status)
            .count() as u64
    }

    pub(crate) fn daily_present_counts(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<(NaiveDate, u64)> {
        let table = read(&self.attendance);
        let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for r in table.rows.values() {
            if r.status == AttendanceStatus::Present && r.date >= start && r.date <= end {
                *counts.entry(r.date).or_insert(0) += 1;
            }
        }
        counts.into_iter().collect()
    }

    pub(crate) fn insert_leave(
        &self,
        person_id: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: String,
    ) -> LeaveRequest {
        let id = self.next_leave_id.fetch_add(1, Ordering::Relaxed);
        let leave = LeaveRequest {
            id,
            person_id,
            start_date,
            end_date,
            reason,
            status: LeaveStatus::Pending,
            applied_at: Utc::now(),
            remarks: None,
        };
        write(&self.leaves).insert(id, leave.clone());
        leave
    }

    pub(crate) fn leave(&self, id: u64) -> Result<LeaveRequest> {
        read(&self.leaves)
            .get(&id)
            .cloned()
            .ok_or(Error::leave_not_found(id))
    }

    pub(crate) fn leaves_by_person(&self, person_id: u64) -> Vec<LeaveRequest> {
        let mut out: Vec<_> = read(&self.leaves)
            .values()
            .filter(|l| l.person_id == person_id)
            .cloned()
            .collect();
        sort_applied_desc(&mut out);
        out
    }

    pub(crate) fn pending_leaves(&self) -> Vec<LeaveRequest> {
        read(&self.leaves)
            .values()
            .filter(|l| l.status == LeaveStatus::Pending)
            .cloned()
            .collect()
    }

    pub(crate) fn all_leaves(&self) -> Vec<LeaveRequest> {
        let mut out: Vec<_> = read(&self.leaves).values().cloned().collect();
        sort_applied_desc(&mut out);
        out
    }

    /// Runs `f` on the request while holding the leave table's write lock,
    /// and only if the request is still Pending. Of two racing terminal
    /// transitions exactly one observes Pending; the other gets
    /// InvalidState.
    pub(crate) fn transition_pending_leave<T>(
        &self,
        id: u64,
        f: impl FnOnce(&mut LeaveRequest) -> Result<T>,
    ) -> Result<T> {
        let mut leaves = write(&self.leaves);
        let leave = leaves.get_mut(&id).ok_or(Error::leave_not_found(id))?;
        if leave.status != LeaveStatus::Pending {
            return Err(Error::InvalidState(format!(
                "leave request {} already {}",
                id, leave.status
            )));
        }
        f(leave)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_applied_desc(leaves: &mut [LeaveRequest]) {
    leaves.sort_by(|a, b| b.applied_at.cmp(&a.applied_at).then(b.id.cmp(&a.id)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn upsert_keeps_one_row_per_key() {
        let store = Store::new();
        let first = store.upsert_attendance(1, d(2024, 1, 5), AttendanceStatus::Present);
        let second = store.upsert_attendance(1, d(2024, 1, 5), AttendanceStatus::Late);
        assert_eq!(first.id, second.id);
        assert_eq!(second.status, AttendanceStatus::Late);
        assert_eq!(store.attendance_by_person(1).len(), 1);
    }

    #[test]
    fn duplicate_person_name_conflicts() {
        let store = Store::new();
        store.add_person("alice").unwrap();
        let err = store.add_person(" alice ").unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn transition_rejects_non_pending() {
        let store = Store::new();
        let leave = store.insert_leave(1, d(2024, 2, 1), d(2024, 2, 2), "trip".into());
        store
            .transition_pending_leave(leave.id, |l| {
                l.status = LeaveStatus::Rejected;
                Ok(())
            })
            .unwrap();
        let err = store
            .transition_pending_leave(leave.id, |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }
}
