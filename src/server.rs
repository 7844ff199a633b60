use std::io;
use std::sync::{Arc, Mutex};

use chrono::Local;
use ntex::http::header;
use ntex::http::HttpMessage;
use ntex::http::ResponseBuilder as HttpResponseBuilder;
use ntex::util::Bytes;
use ntex::web;
use ntex::web::HttpRequest;
use spdlog::{error, info, warn};

use crate::auth::{AdminAuthorizer, AdminCredential, Authorizer, ADMIN_COOKIE, ADMIN_HEADER};
use crate::config::Config;
use crate::content_query::{FilePostRepository, PostRepository};
use crate::export::converter::HtmdConverter;
use crate::export::error::ExportError;
use crate::export::filter::default_file_name;
use crate::export::orchestrator::{ExportOrchestrator, ExportRequest};
use crate::form_data::FormData;
use crate::view::export_renderer::ExportRenderer;
use crate::view::login_renderer::LoginRenderer;
use crate::view::{read_template, EXPORT_TEMPLATE, LOGIN_TEMPLATE};

const LOGIN_FIELD: &str = "admin_key";

pub struct AppState {
    config: Config,
    repository: FilePostRepository,
    authorizer: AdminAuthorizer,
    converter: HtmdConverter,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let repository = FilePostRepository::new(
            config.paths.posts_dir.clone(),
            config.index_base_name(),
            &config.site.url,
        );
        let authorizer = AdminAuthorizer::new(&config.admin.key, config.nonce_lifetime());

        AppState {
            config,
            repository,
            authorizer,
            converter: HtmdConverter::default(),
        }
    }
}

/// Admin key from the admin header, or the session token from the cookie set by `POST /login`
fn admin_credential(req: &HttpRequest) -> Option<AdminCredential> {
    if let Some(key) = req.headers().get(ADMIN_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(AdminCredential::Key(key.to_string()));
    }

    req.cookie(ADMIN_COOKIE)
        .map(|cookie| AdminCredential::Session(cookie.value().to_string()))
}

fn render_login(state: &AppState, message: &str) -> io::Result<String> {
    let template_src = read_template(state.config.paths.template_dir.as_deref(), LOGIN_TEMPLATE)?;
    let renderer = LoginRenderer::new(&template_src)?;
    Ok(renderer.render(message))
}

fn render_export_form(state: &AppState) -> io::Result<String> {
    let terms = state.repository.terms()?;
    let template_src = read_template(state.config.paths.template_dir.as_deref(), EXPORT_TEMPLATE)?;
    let renderer = ExportRenderer::new(&template_src)?;
    let nonce = state.authorizer.issue_nonce();
    Ok(renderer.render(&terms, &nonce, &default_file_name(Local::now().date_naive())))
}

fn html_page(mut builder: HttpResponseBuilder, page: io::Result<String>) -> web::HttpResponse {
    match page {
        Ok(page) => builder
            .content_type("text/html; charset=utf-8")
            .body(page),
        Err(e) => {
            error!("Error rendering page: {}", e);
            web::HttpResponse::InternalServerError()
                .body(format!("Error rendering page: {}", e))
        }
    }
}

/// Only printable ASCII goes into the header, anything else becomes `_`
fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name.chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

fn error_response(err: &ExportError) -> web::HttpResponse {
    web::HttpResponse::build(err.status_code())
        .content_type("text/plain; charset=utf-8")
        .body(err.user_message())
}

#[web::get("/login")]
async fn login_form(state: web::types::State<Arc<Mutex<AppState>>>) -> web::HttpResponse {
    let state = state.lock().unwrap();
    html_page(web::HttpResponse::Ok(), render_login(&state, ""))
}

#[web::post("/login")]
async fn login(body: Bytes, state: web::types::State<Arc<Mutex<AppState>>>) -> web::HttpResponse {
    let state = state.lock().unwrap();
    let form = FormData::from(&String::from_utf8_lossy(&body));
    let key = form.get(LOGIN_FIELD).unwrap_or_default();

    if !state.authorizer.is_admin_key(key) {
        warn!("Rejected login attempt");
        return html_page(web::HttpResponse::Forbidden(), render_login(&state, &ExportError::PermissionDenied.user_message()));
    }

    info!("Admin signed in");
    let session = state.authorizer.start_session();
    web::HttpResponse::SeeOther()
        .header(header::LOCATION, "/export")
        .header(header::SET_COOKIE, format!("{}={}; Path=/; HttpOnly; SameSite=Strict", ADMIN_COOKIE, session))
        .finish()
}

#[web::get("/export")]
async fn export_form(req: HttpRequest, state: web::types::State<Arc<Mutex<AppState>>>) -> web::HttpResponse {
    let state = state.lock().unwrap();
    let request = ExportRequest {
        admin_credential: admin_credential(&req),
        form: FormData::default(),
    };
    if !state.authorizer.is_authorized_admin(&request) {
        return error_response(&ExportError::PermissionDenied);
    }

    html_page(web::HttpResponse::Ok(), render_export_form(&state))
}

#[web::post("/export")]
async fn export(req: HttpRequest, body: Bytes, state: web::types::State<Arc<Mutex<AppState>>>) -> web::HttpResponse {
    let state = state.lock().unwrap();
    let request = ExportRequest {
        admin_credential: admin_credential(&req),
        form: FormData::from(&String::from_utf8_lossy(&body)),
    };

    let mut orchestrator = ExportOrchestrator::new(
        &state.repository,
        &state.converter,
        &state.authorizer,
        state.config.export_settings(),
    );
    let exported = match orchestrator.run(&request) {
        Ok(exported) => exported,
        Err(e) => return error_response(&e),
    };

    let file_name = exported.file_name;
    let bytes = match exported.archive.into_bytes() {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Error reading archive {}: {}", file_name, e);
            return error_response(&ExportError::Io(e));
        }
    };

    web::HttpResponse::Ok()
        .content_type("application/zip")
        .header(header::CONTENT_DISPOSITION, content_disposition(&file_name))
        .body(bytes)
}

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.service(login_form)
        .service(login)
        .service(export_form)
        .service(export);
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    info!("Exporting posts from {}", config.paths.posts_dir.display());

    let app_state = Arc::new(Mutex::new(AppState::new(config)));

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .configure(app_config)
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}
