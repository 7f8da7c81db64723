//! Centralized route configuration, shared between the server binary and the
//! integration test harness.

use crate::handlers;
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route(
                "/submit-questionnaire",
                web::post().to(handlers::submit_questionnaire),
            )
            .route("/responses", web::get().to(handlers::list_responses))
            .route("/responses/{id}", web::get().to(handlers::get_response))
            .route(
                "/responses/{id}",
                web::delete().to(handlers::delete_response),
            )
            .route("/stats", web::get().to(handlers::get_stats))
            .route("/search", web::get().to(handlers::search_responses))
            .route("/export/csv", web::get().to(handlers::export_csv)),
    )
    .route("/", web::get().to(handlers::service_info))
    .route("/admin", web::get().to(handlers::admin_dashboard));
}
