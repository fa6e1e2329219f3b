#![deny(missing_docs)]

//! # Mock Server
//!
//! The actix-web boundary around the core resolver.
//!
//! - One method-guarded resource per declared operation; `GET` operations
//!   also answer `HEAD` unless the path declares its own.
//! - Anything else gets the 404 diagnostic listing the known routes.
//! - Resolution errors become a 500 envelope; the server keeps running.
//! - Every response carries permissive CORS headers; a bare `OPTIONS`
//!   (preflight) is answered with `200`.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{Method, StatusCode};
use actix_web::{guard, middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use nicemock_core::{
    discover_spec, internal_error_body, not_found_body, resolve, AppResult, DispatchEntry,
    DispatchTable, FsOverrides, HttpMethod, SpecDocument, MOCKS_DIR,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a request handler needs. Built once, read-only afterwards.
#[derive(Debug)]
pub struct MockContext {
    document: SpecDocument,
    table: DispatchTable,
    overrides: FsOverrides,
}

impl MockContext {
    /// Creates a context serving `document` with records from `mocks_dir`.
    pub fn new(document: SpecDocument, mocks_dir: impl Into<PathBuf>) -> Self {
        let table = DispatchTable::build(&document.spec);
        MockContext {
            document,
            table,
            overrides: FsOverrides::new(mocks_dir),
        }
    }

    /// Loads the spec discovered in `dir` and serves `dir/mocks`.
    pub fn load(dir: &Path) -> AppResult<Self> {
        let spec_path = discover_spec(dir)?;
        let document = SpecDocument::from_file(&spec_path)?;
        log::info!("✓ Loaded OpenAPI spec: {:?}", spec_path);
        Ok(Self::new(document, dir.join(MOCKS_DIR)))
    }

    /// The dispatch table.
    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// The mocks directory.
    pub fn mocks_dir(&self) -> &Path {
        self.overrides.root()
    }
}

/// Builds the application for `context`.
pub fn build_app(
    context: web::Data<MockContext>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let mut app = App::new().app_data(context.clone());

    // One guarded resource per operation: a request whose method no guard
    // accepts moves on to later resources sharing the path, then to `unmatched`.
    for entry in context.table().entries() {
        let guard = method_guard(entry.method, context.table().answers_head(entry));
        let pattern = entry.route_pattern.clone();
        let entry = Arc::new(entry.clone());
        app = app.service(
            web::resource(pattern)
                .guard(guard)
                .to(move |ctx: web::Data<MockContext>| serve_operation(ctx, Arc::clone(&entry))),
        );
    }

    app.default_service(web::to(unmatched))
        .wrap(cors_headers())
        .wrap(middleware::Logger::default())
}

/// Binds `host:port` and serves until the process is stopped.
pub async fn serve(context: MockContext, host: &str, port: u16) -> std::io::Result<()> {
    for entry in context.table().entries() {
        log::info!("✓ Registered route: {} {}", entry.method, entry.route_pattern);
    }
    let mocks_dir = context.mocks_dir().to_path_buf();

    let context = web::Data::new(context);
    let server = HttpServer::new(move || build_app(context.clone()))
        .bind((host, port))?
        .run();

    log::info!("Mock server started at http://{}:{}", host, port);
    log::info!("Serving mocks from: {:?}", mocks_dir);
    log::info!("Press Ctrl+C to stop the server");

    server.await
}

fn method_guard(method: HttpMethod, answers_head: bool) -> guard::AnyGuard {
    let accepted = guard::Any(guard::Method(actix_method(method)));
    if answers_head {
        accepted.or(guard::Head())
    } else {
        accepted
    }
}

fn actix_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Options => Method::OPTIONS,
        HttpMethod::Trace => Method::TRACE,
    }
}

fn cors_headers() -> middleware::DefaultHeaders {
    middleware::DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add((
            "Access-Control-Allow-Methods",
            "GET,HEAD,OPTIONS,POST,PUT,DELETE,PATCH",
        ))
        .add((
            "Access-Control-Allow-Headers",
            "Origin, X-Requested-With, Content-Type, Accept, Authorization",
        ))
}

async fn serve_operation(ctx: web::Data<MockContext>, entry: Arc<DispatchEntry>) -> HttpResponse {
    match resolve(&entry.template, entry.method, &entry.operation, &ctx.overrides) {
        Ok(mock) => {
            let status = StatusCode::from_u16(mock.status).unwrap_or(StatusCode::OK);
            HttpResponse::build(status).json(mock.body)
        }
        Err(e) => {
            log::error!(
                "Error handling request for {} {}: {}",
                entry.method,
                entry.template,
                e
            );
            HttpResponse::InternalServerError().json(internal_error_body())
        }
    }
}

async fn unmatched(req: HttpRequest, ctx: web::Data<MockContext>) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        return HttpResponse::Ok().finish();
    }
    HttpResponse::NotFound().json(not_found_body(
        req.method().as_str(),
        &req.uri().to_string(),
        &ctx.document.spec,
    ))
}
