use crate::config::AppConfig;
use crate::csv_export;
use crate::database::Database;
use crate::error::AppError;
use crate::models::{
    DeleteResponse, EndpointInfo, NewResponse, ResponseListResponse, SearchQuery, SearchResponse,
    ServiceInfo, SingleResponse, StatsQuery, StatsResponse, SubmitRequest, SubmitResponse,
};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Result};
use std::sync::Arc;

pub struct AppState {
    pub database: Arc<Database>,
    pub config: Arc<AppConfig>,
}

pub async fn submit_questionnaire(
    data: web::Data<AppState>,
    request: web::Json<SubmitRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let req = request.into_inner();

    let first_name = match req.first_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            return Err(AppError::InvalidRequest(
                "firstName is required and cannot be empty".to_string(),
            ))
        }
    };

    let email = match req.email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => email.to_string(),
        _ => {
            return Err(AppError::InvalidRequest(
                "email is required and cannot be empty".to_string(),
            ))
        }
    };

    let ip_address = http_req
        .connection_info()
        .realip_remote_addr()
        .map(|addr| addr.to_string());

    let user_agent = http_req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    let new_response = NewResponse {
        first_name,
        email,
        question_1: req.question_1,
        question_2: req.question_2,
        question_3: req.question_3,
        question_4: req.question_4,
        question_5: req.question_5,
        ip_address,
        user_agent,
    };

    let response_id = data.database.create_response(&new_response)?;

    Ok(HttpResponse::Ok().json(SubmitResponse {
        success: true,
        response_id,
        message: "Questionnaire submitted successfully".to_string(),
    }))
}

pub async fn list_responses(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let responses = data.database.get_all_responses()?;

    Ok(HttpResponse::Ok().json(ResponseListResponse {
        success: true,
        count: responses.len(),
        responses,
    }))
}

pub async fn get_response(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let response_id = path.into_inner();
    let response = data.database.get_response_by_id(response_id)?;

    Ok(HttpResponse::Ok().json(SingleResponse {
        success: true,
        response,
    }))
}

pub async fn get_stats(
    data: web::Data<AppState>,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse, AppError> {
    let extended = query.extended.unwrap_or(false);
    let stats = data.database.get_stats(extended)?;

    Ok(HttpResponse::Ok().json(StatsResponse {
        success: true,
        stats,
    }))
}

pub async fn delete_response(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let response_id = path.into_inner();
    data.database.delete_response(response_id)?;

    Ok(HttpResponse::Ok().json(DeleteResponse {
        success: true,
        message: format!("Response {response_id} deleted"),
    }))
}

pub async fn search_responses(
    data: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let search_term = match query.query.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => term.to_string(),
        _ => {
            return Err(AppError::InvalidRequest(
                "query parameter is required and cannot be empty".to_string(),
            ))
        }
    };

    let results = data.database.search_responses(&search_term)?;

    Ok(HttpResponse::Ok().json(SearchResponse {
        success: true,
        count: results.len(),
        results,
    }))
}

pub async fn export_csv(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let responses = data.database.get_all_responses()?;
    let document = csv_export::responses_to_csv(&responses)?;

    let filename = format!(
        "questionnaire-responses-{}.csv",
        chrono::Utc::now().format("%Y-%m-%d")
    );

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(document))
}

pub async fn service_info() -> Result<HttpResponse, AppError> {
    let endpoint = |method: &str, path: &str, description: &str| EndpointInfo {
        method: method.to_string(),
        path: path.to_string(),
        description: description.to_string(),
    };

    let info = ServiceInfo {
        service: "questionnaire-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: vec![
            endpoint("POST", "/api/submit-questionnaire", "Submit a questionnaire"),
            endpoint("GET", "/api/responses", "List all responses"),
            endpoint("GET", "/api/responses/{id}", "Get one response"),
            endpoint("GET", "/api/stats", "Submission statistics"),
            endpoint("DELETE", "/api/responses/{id}", "Delete a response"),
            endpoint("GET", "/api/search", "Search responses by name or email"),
            endpoint("GET", "/api/export/csv", "Export all responses as CSV"),
            endpoint("GET", "/admin", "Admin dashboard"),
        ],
    };

    Ok(HttpResponse::Ok().json(info))
}

/// Serves the dashboard asset. When the asset is missing, falls back to a
/// diagnostic page listing what the static directory actually contains.
pub async fn admin_dashboard(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let static_dir = &data.config.static_files.dir;
    let asset_path = static_dir.join("admin.html");

    match std::fs::read_to_string(&asset_path) {
        Ok(page) => Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(page)),
        Err(_) => {
            tracing::warn!("Dashboard asset missing at {}", asset_path.display());
            Ok(HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(missing_asset_page(static_dir)))
        }
    }
}

fn missing_asset_page(static_dir: &std::path::Path) -> String {
    let listing = match std::fs::read_dir(static_dir) {
        Ok(entries) => {
            let mut items: Vec<String> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| format!("<li>{}</li>", entry.file_name().to_string_lossy()))
                .collect();
            items.sort();
            if items.is_empty() {
                "<p>The static directory is empty.</p>".to_string()
            } else {
                format!("<ul>{}</ul>", items.join(""))
            }
        }
        Err(_) => format!(
            "<p>The static directory <code>{}</code> does not exist.</p>",
            static_dir.display()
        ),
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Dashboard asset missing</title></head>\n<body>\n\
         <h1>admin.html not found</h1>\n\
         <p>Place the dashboard at <code>{}/admin.html</code>.</p>\n{listing}\n</body>\n</html>\n",
        static_dir.display()
    )
}
