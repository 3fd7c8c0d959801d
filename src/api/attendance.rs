use std::str::FromStr;

use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::Error;
use crate::ledger::{AttendanceLedger, MarkEntry};
use crate::model::attendance::AttendanceStatus;

#[derive(Deserialize)]
pub struct MarkRequest {
    pub person_id: u64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Deserialize)]
pub struct RangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Only /summary uses this; /summary/daily counts Present implicitly.
    pub status: Option<String>,
}

fn parse_status(raw: &str) -> Result<AttendanceStatus, Error> {
    AttendanceStatus::from_str(raw)
        .map_err(|_| Error::InvalidInput(format!("unknown attendance status '{raw}'")))
}

/// Mark or overwrite one person's status for one day.
pub async fn mark_attendance(
    ledger: web::Data<AttendanceLedger>,
    payload: web::Json<MarkRequest>,
) -> Result<HttpResponse, Error> {
    let record = ledger.mark(payload.person_id, payload.date, payload.status)?;
    Ok(HttpResponse::Ok().json(record))
}

/// Mark a whole batch; per-entry failures come back in the outcome body.
pub async fn mark_bulk(
    ledger: web::Data<AttendanceLedger>,
    payload: web::Json<Vec<MarkRequest>>,
) -> Result<HttpResponse, Error> {
    let entries: Vec<MarkEntry> = payload
        .iter()
        .map(|r| MarkEntry {
            person_id: r.person_id,
            date: r.date,
            status: r.status,
        })
        .collect();
    Ok(HttpResponse::Ok().json(ledger.mark_bulk(&entries)))
}

pub async fn attendance_by_person(
    ledger: web::Data<AttendanceLedger>,
    path: web::Path<u64>,
) -> Result<HttpResponse, Error> {
    let records = ledger.by_person(path.into_inner())?;
    Ok(HttpResponse::Ok().json(records))
}

pub async fn attendance_by_date(
    ledger: web::Data<AttendanceLedger>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let raw = path.into_inner();
    let date = NaiveDate::from_str(&raw)
        .map_err(|_| Error::InvalidInput(format!("invalid date '{raw}'")))?;
    Ok(HttpResponse::Ok().json(ledger.by_date(date)))
}

/// Count of records in [start, end] with the given status.
pub async fn range_summary(
    ledger: web::Data<AttendanceLedger>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse, Error> {
    let status = parse_status(query.status.as_deref().unwrap_or("Present"))?;
    let count = ledger.count_in_range(query.start, query.end, status)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "count": count })))
}

/// Per-day Present counts for dashboard charts.
pub async fn daily_present(
    ledger: web::Data<AttendanceLedger>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse, Error> {
    let counts = ledger.daily_present_counts(query.start, query.end)?;
    Ok(HttpResponse::Ok().json(counts))
}
