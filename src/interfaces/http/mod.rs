use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use actix_cors::Cors;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::http::StatusCode;
use actix_web::{
    delete, dev::Server, get, post, put, web, App, HttpResponse, HttpServer, Responder,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::application::SessionStore;
use crate::domain::chart::{BarChart, Visualization};
use crate::domain::cleaning::CleaningOptions;
use crate::domain::error::{AppError, Result};
use crate::domain::file_format::TabularFormat;
use crate::domain::uploaded_file::UploadedFile;
use crate::infrastructure::chart::SvgRenderer;
use crate::infrastructure::config::AppConfig;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

/// Bounded feed of the messages shown to the user; oldest entries fall off first
pub struct ActivityLog {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn add(&self, level: &str, source: &str, message: &str) -> LogEntry {
        let entry = LogEntry {
            time: Local::now().format("%H:%M:%S").to_string(),
            level: level.to_string(),
            source: source.to_string(),
            message: message.to_string(),
        };

        // A poisoned feed still holds usable entries
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.push_back(entry.clone());
        while entries.len() > self.capacity {
            entries.pop_front();
        }
        entry
    }

    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

pub struct HttpState {
    pub sessions: Mutex<SessionStore>,
    pub logs: ActivityLog,
}

impl HttpState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            sessions: Mutex::new(SessionStore::new(config.preview_rows)),
            logs: ActivityLog::new(config.log_capacity),
        }
    }

    fn lock_sessions(&self) -> Result<MutexGuard<'_, SessionStore>> {
        self.sessions
            .lock()
            .map_err(|_| AppError::Internal("Session store lock poisoned".to_string()))
    }

    /// Record a failure for the user and turn it into a response
    fn fail(&self, source: &str, err: AppError) -> HttpResponse {
        tracing::warn!(file = %source, error = %err, "Request failed");
        self.logs.add("ERROR", source, &err.to_string());
        error_response(&err)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSelectionRequest {
    pub columns: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    pub target: TabularFormat,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<BarChart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
}

#[get("/files")]
async fn list_files(data: web::Data<HttpState>) -> impl Responder {
    match data.lock_sessions() {
        Ok(sessions) => HttpResponse::Ok().json(sessions.files()),
        Err(e) => data.fail("HttpApi", e),
    }
}

#[post("/files/{name}")]
async fn upload_file(
    data: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> impl Responder {
    let name = path.into_inner();
    tracing::info!(file = %name, bytes = body.len(), "Upload received");

    let result = data
        .lock_sessions()
        .and_then(|mut sessions| sessions.upload(UploadedFile::new(name.clone(), body.to_vec())));

    match result {
        Ok(summary) => {
            data.logs.add(
                "INFO",
                &name,
                &format!(
                    "Loaded {} rows x {} columns",
                    summary.row_count,
                    summary.columns.len()
                ),
            );
            HttpResponse::Created().json(summary)
        }
        Err(e) => data.fail(&name, e),
    }
}

#[delete("/files/{name}")]
async fn remove_file(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let name = path.into_inner();

    match data.lock_sessions().and_then(|mut sessions| sessions.remove(&name)) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => data.fail(&name, e),
    }
}

#[get("/files/{name}/preview")]
async fn preview_file(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let name = path.into_inner();

    match data.lock_sessions().and_then(|sessions| sessions.preview(&name)) {
        Ok(preview) => HttpResponse::Ok().json(preview),
        Err(e) => data.fail(&name, e),
    }
}

#[post("/files/{name}/clean")]
async fn clean_file(
    data: web::Data<HttpState>,
    path: web::Path<String>,
    req: web::Json<CleaningOptions>,
) -> impl Responder {
    let name = path.into_inner();
    let options = req.into_inner();

    match data
        .lock_sessions()
        .and_then(|mut sessions| sessions.clean(&name, options))
    {
        Ok(report) => {
            if options.is_empty() {
                data.logs.add("INFO", &name, "No cleaning option selected");
            } else {
                data.logs.add("SUCCESS", &name, &report.summary(&options));
            }
            if !report.columns_left_missing.is_empty() {
                data.logs.add(
                    "WARNING",
                    &name,
                    &format!(
                        "No values to average in: {}",
                        report.columns_left_missing.join(", ")
                    ),
                );
            }
            HttpResponse::Ok().json(report)
        }
        Err(e) => data.fail(&name, e),
    }
}

#[put("/files/{name}/columns")]
async fn select_columns(
    data: web::Data<HttpState>,
    path: web::Path<String>,
    req: web::Json<ColumnSelectionRequest>,
) -> impl Responder {
    let name = path.into_inner();

    match data
        .lock_sessions()
        .and_then(|mut sessions| sessions.select_columns(&name, &req.columns))
    {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => data.fail(&name, e),
    }
}

#[get("/files/{name}/chart")]
async fn chart_file(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let name = path.into_inner();

    match data.lock_sessions().and_then(|sessions| sessions.visualize(&name)) {
        Ok(Visualization::Chart(chart)) => {
            let svg = SvgRenderer::default().render(&chart);
            HttpResponse::Ok().json(ChartResponse {
                warning: None,
                chart: Some(chart),
                svg: Some(svg),
            })
        }
        Ok(empty @ Visualization::NoNumericColumns) => {
            let warning = empty.warning().unwrap_or_default().to_string();
            data.logs.add("WARNING", &name, &warning);
            HttpResponse::Ok().json(ChartResponse {
                warning: Some(warning),
                chart: None,
                svg: None,
            })
        }
        Err(e) => data.fail(&name, e),
    }
}

#[post("/files/{name}/convert")]
async fn convert_file(
    data: web::Data<HttpState>,
    path: web::Path<String>,
    req: web::Json<ConvertRequest>,
) -> impl Responder {
    let name = path.into_inner();

    match data
        .lock_sessions()
        .and_then(|sessions| sessions.convert(&name, req.target))
    {
        Ok(artifact) => {
            data.logs.add(
                "SUCCESS",
                &name,
                &format!("Converted to {}", artifact.file_name),
            );
            HttpResponse::Ok()
                .content_type(artifact.mime_type.as_str())
                .insert_header(ContentDisposition {
                    disposition: DispositionType::Attachment,
                    parameters: vec![DispositionParam::Filename(artifact.file_name)],
                })
                .body(artifact.bytes)
        }
        Err(e) => data.fail(&name, e),
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(data.logs.snapshot())
}

pub fn error_status(err: &AppError) -> StatusCode {
    match err {
        AppError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        AppError::ParseError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Internal(_)
        | AppError::ExportError(_)
        | AppError::ConfigError(_)
        | AppError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: &AppError) -> HttpResponse {
    HttpResponse::build(error_status(err)).json(json!({ "error": err.to_string() }))
}

/// Mount every route under `/api`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(list_files)
            .service(upload_file)
            .service(remove_file)
            .service(preview_file)
            .service(clean_file)
            .service(select_columns)
            .service(chart_file)
            .service(convert_file)
            .service(get_logs),
    );
}

pub fn start_server(state: web::Data<HttpState>, config: &AppConfig) -> std::io::Result<Server> {
    let upload_limit = config.max_upload_bytes;

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Local tool, any front-end origin

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(upload_limit))
            .configure(configure)
    })
    .bind(config.bind_address())?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header;
    use actix_web::test as actix_test;

    fn state() -> web::Data<HttpState> {
        web::Data::new(HttpState::new(&AppConfig::default()))
    }

    macro_rules! app {
        ($state:expr) => {
            actix_test::init_service(App::new().app_data($state.clone()).configure(configure)).await
        };
    }

    #[actix_web::test]
    async fn test_upload_clean_and_list() {
        let state = state();
        let app = app!(state);

        let req = actix_test::TestRequest::post()
            .uri("/api/files/a.csv")
            .set_payload("id,val\n1,5\n1,5\n2,\n")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = actix_test::TestRequest::post()
            .uri("/api/files/a.csv/clean")
            .set_json(json!({ "removeDuplicates": true, "fillMissingNumeric": true }))
            .to_request();
        let report: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(report["duplicatesRemoved"], 1);
        assert_eq!(report["cellsFilled"], 1);

        let req = actix_test::TestRequest::get()
            .uri("/api/files/a.csv/preview")
            .to_request();
        let preview: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(preview["totalRows"], 2);
        assert_eq!(preview["rows"][1][1], 5.0);

        let req = actix_test::TestRequest::get().uri("/api/files").to_request();
        let files: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(files[0]["name"], "a.csv");
        assert_eq!(files[0]["cleaning"]["removeDuplicates"], true);
    }

    #[actix_web::test]
    async fn test_unsupported_upload_is_415() {
        let state = state();
        let app = app!(state);

        let req = actix_test::TestRequest::post()
            .uri("/api/files/notes.txt")
            .set_payload("hello")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"], "Unsupported file format: .txt");

        let logs = state.logs.snapshot();
        assert_eq!(logs.last().map(|l| l.level.as_str()), Some("ERROR"));
    }

    #[actix_web::test]
    async fn test_bad_column_selection_is_400() {
        let state = state();
        let app = app!(state);

        let req = actix_test::TestRequest::post()
            .uri("/api/files/a.csv")
            .set_payload("id,val\n1,5\n")
            .to_request();
        actix_test::call_service(&app, req).await;

        let req = actix_test::TestRequest::put()
            .uri("/api/files/a.csv/columns")
            .set_json(json!({ "columns": ["val", "missing"] }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = actix_test::TestRequest::put()
            .uri("/api/files/a.csv/columns")
            .set_json(json!({ "columns": ["val", "id"] }))
            .to_request();
        let summary: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(summary["selectedColumns"], json!(["id", "val"]));
    }

    #[actix_web::test]
    async fn test_convert_returns_download() {
        let state = state();
        let app = app!(state);

        let req = actix_test::TestRequest::post()
            .uri("/api/files/a.csv")
            .set_payload("id,val\n1,5\n")
            .to_request();
        actix_test::call_service(&app, req).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/files/a.csv/convert")
            .set_json(json!({ "target": "spreadsheet" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let headers = resp.headers();
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        let disposition = headers
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(disposition.contains("a.xlsx"), "{disposition}");

        let body = actix_test::read_body(resp).await;
        assert!(!body.is_empty());
    }

    #[actix_web::test]
    async fn test_chart_warning_and_missing_file() {
        let state = state();
        let app = app!(state);

        let req = actix_test::TestRequest::post()
            .uri("/api/files/names.csv")
            .set_payload("name\nAlice\nBob\n")
            .to_request();
        actix_test::call_service(&app, req).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/files/names.csv/chart")
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["warning"],
            "No numeric columns available for visualization."
        );
        assert!(body.get("chart").is_none());

        let req = actix_test::TestRequest::get()
            .uri("/api/files/other.csv/chart")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_chart_with_numbers_includes_svg() {
        let state = state();
        let app = app!(state);

        let req = actix_test::TestRequest::post()
            .uri("/api/files/n.csv")
            .set_payload("x,y,z\n1,2,3\n4,5,6\n")
            .to_request();
        actix_test::call_service(&app, req).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/files/n.csv/chart")
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["chart"]["series"].as_array().map(|s| s.len()), Some(2));
        assert!(body["svg"].as_str().unwrap_or_default().starts_with("<svg"));
    }

    #[actix_web::test]
    async fn test_clean_logs_summary() {
        let state = state();
        let app = app!(state);

        let req = actix_test::TestRequest::post()
            .uri("/api/files/a.csv")
            .set_payload("id,val\n1,5\n1,5\n2,\n")
            .to_request();
        actix_test::call_service(&app, req).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/files/a.csv/clean")
            .set_json(json!({ "removeDuplicates": true }))
            .to_request();
        actix_test::call_service(&app, req).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/files/a.csv/clean")
            .set_json(json!({}))
            .to_request();
        actix_test::call_service(&app, req).await;

        let logs = state.logs.snapshot();
        let cleaned: Vec<(&str, &str)> = logs[logs.len() - 2..]
            .iter()
            .map(|l| (l.level.as_str(), l.message.as_str()))
            .collect();
        assert_eq!(
            cleaned,
            vec![
                ("SUCCESS", "1 duplicate row(s) removed"),
                ("INFO", "No cleaning option selected"),
            ]
        );
    }

    #[actix_web::test]
    async fn test_unreadable_workbook_is_422() {
        let state = state();
        let app = app!(state);

        let req = actix_test::TestRequest::post()
            .uri("/api/files/broken.xlsx")
            .set_payload("not a zip archive")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        let message = body["error"].as_str().unwrap_or_default();
        assert!(message.starts_with("Parse error: "), "{message}");

        let req = actix_test::TestRequest::get().uri("/api/files").to_request();
        let files: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(files, json!([]));
    }

    #[actix_web::test]
    async fn test_remove_file_is_204_then_404() {
        let state = state();
        let app = app!(state);

        let req = actix_test::TestRequest::post()
            .uri("/api/files/a.csv")
            .set_payload("id,val\n1,5\n")
            .to_request();
        actix_test::call_service(&app, req).await;

        let req = actix_test::TestRequest::delete()
            .uri("/api/files/a.csv")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = actix_test::TestRequest::get()
            .uri("/api/files/a.csv/preview")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = actix_test::TestRequest::delete()
            .uri("/api/files/a.csv")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_logs_route_reports_conversion() {
        let state = state();
        let app = app!(state);

        let req = actix_test::TestRequest::post()
            .uri("/api/files/a.csv")
            .set_payload("id,val\n1,5\n")
            .to_request();
        actix_test::call_service(&app, req).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/files/a.csv/convert")
            .set_json(json!({ "target": "csv" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = actix_test::TestRequest::get().uri("/api/logs").to_request();
        let logs: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        let entries = logs.as_array().cloned().unwrap_or_default();
        assert!(entries.iter().any(|e| e["level"] == "SUCCESS"
            && e["source"] == "a.csv"
            && e["message"] == "Converted to a.csv"));
    }

    #[actix_web::test]
    async fn test_csv_export_without_columns_fails() {
        let state = state();
        let app = app!(state);

        let req = actix_test::TestRequest::post()
            .uri("/api/files/a.csv")
            .set_payload("id,val\n1,5\n")
            .to_request();
        actix_test::call_service(&app, req).await;

        let req = actix_test::TestRequest::put()
            .uri("/api/files/a.csv/columns")
            .set_json(json!({ "columns": [] }))
            .to_request();
        actix_test::call_service(&app, req).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/files/a.csv/convert")
            .set_json(json!({ "target": "csv" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(
            body["error"],
            "Export error: Cannot write a CSV file without columns"
        );
    }

    #[test]
    fn test_activity_log_is_bounded() {
        let log = ActivityLog::new(2);
        log.add("INFO", "a", "one");
        log.add("INFO", "a", "two");
        log.add("INFO", "a", "three");

        let messages: Vec<String> = log.snapshot().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["two", "three"]);
    }
}
