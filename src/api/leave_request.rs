use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::Error;
use crate::leave::LeaveEngine;

#[derive(Deserialize)]
pub struct ApplyLeave {
    pub person_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

#[derive(Deserialize)]
pub struct ReviewLeave {
    pub remarks: Option<String>,
}

fn remarks_from(body: Option<web::Json<ReviewLeave>>) -> String {
    body.and_then(|b| b.into_inner().remarks).unwrap_or_default()
}

/// Submit a leave request; it always starts Pending.
pub async fn apply_leave(
    engine: web::Data<LeaveEngine>,
    payload: web::Json<ApplyLeave>,
) -> Result<HttpResponse, Error> {
    let leave = engine.apply(
        payload.person_id,
        payload.start_date,
        payload.end_date,
        &payload.reason,
    )?;
    Ok(HttpResponse::Ok().json(leave))
}

/// Approve a pending request and backfill its date range as Leave.
pub async fn approve_leave(
    engine: web::Data<LeaveEngine>,
    path: web::Path<u64>,
    body: Option<web::Json<ReviewLeave>>,
) -> Result<HttpResponse, Error> {
    let leave = engine.approve(path.into_inner(), &remarks_from(body))?;
    Ok(HttpResponse::Ok().json(leave))
}

/// Reject a pending request; the ledger is left alone.
pub async fn reject_leave(
    engine: web::Data<LeaveEngine>,
    path: web::Path<u64>,
    body: Option<web::Json<ReviewLeave>>,
) -> Result<HttpResponse, Error> {
    let leave = engine.reject(path.into_inner(), &remarks_from(body))?;
    Ok(HttpResponse::Ok().json(leave))
}

pub async fn get_leave(
    engine: web::Data<LeaveEngine>,
    path: web::Path<u64>,
) -> Result<HttpResponse, Error> {
    let leave = engine.get(path.into_inner())?;
    Ok(HttpResponse::Ok().json(leave))
}

pub async fn person_leaves(
    engine: web::Data<LeaveEngine>,
    path: web::Path<u64>,
) -> Result<HttpResponse, Error> {
    let leaves = engine.by_person(path.into_inner())?;
    Ok(HttpResponse::Ok().json(leaves))
}

pub async fn pending_leaves(engine: web::Data<LeaveEngine>) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(engine.pending()))
}

pub async fn leave_list(engine: web::Data<LeaveEngine>) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(engine.all()))
}
