use actix_web::web;

use crate::api::{attendance, leave_request, person};
use crate::config::Config;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/person")
                    // /person
                    .service(
                        web::resource("")
                            .route(web::post().to(person::create_person))
                            .route(web::get().to(person::list_people)),
                    )
                    // /person/{id}
                    .service(web::resource("/{id}").route(web::get().to(person::get_person))),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(web::resource("").route(web::post().to(attendance::mark_attendance)))
                    // /attendance/bulk
                    .service(web::resource("/bulk").route(web::post().to(attendance::mark_bulk)))
                    // /attendance/person/{id}
                    .service(
                        web::resource("/person/{id}")
                            .route(web::get().to(attendance::attendance_by_person)),
                    )
                    // /attendance/date/{date}
                    .service(
                        web::resource("/date/{date}")
                            .route(web::get().to(attendance::attendance_by_date)),
                    )
                    // /attendance/summary?start=&end=&status=
                    .service(
                        web::resource("/summary").route(web::get().to(attendance::range_summary)),
                    )
                    // /attendance/summary/daily?start=&end=
                    .service(
                        web::resource("/summary/daily")
                            .route(web::get().to(attendance::daily_present)),
                    ),
            )
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::post().to(leave_request::apply_leave))
                            .route(web::get().to(leave_request::leave_list)),
                    )
                    // /leave/pending (before /{id} so it is not captured)
                    .service(
                        web::resource("/pending")
                            .route(web::get().to(leave_request::pending_leaves)),
                    )
                    // /leave/person/{id}
                    .service(
                        web::resource("/person/{id}")
                            .route(web::get().to(leave_request::person_leaves)),
                    )
                    // /leave/{id}
                    .service(web::resource("/{id}").route(web::get().to(leave_request::get_leave)))
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave)),
                    ),
            ),
    );
}
