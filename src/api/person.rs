use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::error::Error;
use crate::store::Store;

#[derive(Deserialize)]
pub struct CreatePerson {
    pub name: String,
}

/// Register a person so attendance and leave rows can reference them.
pub async fn create_person(
    store: web::Data<Store>,
    payload: web::Json<CreatePerson>,
) -> Result<HttpResponse, Error> {
    let person = store.add_person(&payload.name)?;
    Ok(HttpResponse::Ok().json(person))
}

pub async fn get_person(
    store: web::Data<Store>,
    path: web::Path<u64>,
) -> Result<HttpResponse, Error> {
    let person = store.person(path.into_inner())?;
    Ok(HttpResponse::Ok().json(person))
}

pub async fn list_people(store: web::Data<Store>) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(store.people()))
}
