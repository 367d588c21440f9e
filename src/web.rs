use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{self, ApiError};
use crate::carousel::{Carousel, Rotator};
use crate::catalog::Catalog;
use crate::config::{RotatorConfig, SiteConfig};
use crate::forms::{FormData, FormKind};
use crate::gallery::GalleryService;
use crate::modal::{BookingModal, ChatHandoff, Confirmation, ContactModal};
use crate::models::{Review, TopDestination};
use crate::views::{self, Overlay, Page};

/// Shared state behind every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub catalog: Arc<Catalog>,
    pub gallery: Arc<GalleryService>,
    pub destinations: Arc<Rotator<TopDestination>>,
    pub reviews: Arc<Rotator<Review>>,
}

fn rotator<T>(name: &'static str, items: Vec<T>, settings: RotatorConfig) -> Rotator<T>
where
    T: Clone + Send + Sync + 'static,
{
    let carousel = Carousel::new(items, settings.window_size).with_wrap(settings.wrap);
    Rotator::spawn(name, carousel, settings.interval(), settings.pause_limit())
}

impl AppState {
    /// Build the state and start both rotators. Needs a tokio runtime.
    pub fn new(config: SiteConfig, catalog: Catalog) -> Self {
        let gallery = GalleryService::from_config(&config.gallery);
        let destinations = rotator(
            "destinations",
            catalog.top_destinations.clone(),
            config.carousel.destinations,
        );
        let reviews = rotator("reviews", catalog.reviews.clone(), config.carousel.reviews);

        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            gallery: Arc::new(gallery),
            destinations: Arc::new(destinations),
            reviews: Arc::new(reviews),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let server = &state.config.server;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/carousels/{name}", get(carousel_section))
        .route("/contact", post(submit_contact))
        .route("/packages/{index}/book", get(show_booking).post(submit_booking))
        .nest("/api", api::router())
        .fallback_service(ServeDir::new(&server.public_dir))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(server.body_limit_kb as usize * 1024))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(u64::from(server.request_timeout_seconds)),
        ))
        .layer(cors)
        .with_state(state)
}

pub async fn run(config: SiteConfig) -> Result<()> {
    let catalog = Catalog::embedded()?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, config.server.port))?;
    let tls = config.server.tls_cert.clone().zip(config.server.tls_key.clone());

    let state = AppState::new(config, catalog);
    let app = app(state);

    if let Some((cert, key)) = tls {
        return serve_tls(addr, app, &cert, &key).await;
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Web server running at http://{}", addr);
    axum::serve(listener, app).await.context("Web server stopped")?;
    Ok(())
}

#[cfg(feature = "tls")]
async fn serve_tls(addr: SocketAddr, app: Router, cert: &str, key: &str) -> Result<()> {
    let tls = axum_server::tls_rustls::RustlsConfig::from_pem_file(cert, key)
        .await
        .with_context(|| format!("Failed to load TLS certificate {cert} and key {key}"))?;
    info!("Web server running at https://{}", addr);
    axum_server::bind_rustls(addr, tls)
        .serve(app.into_make_service())
        .await
        .context("Web server stopped")?;
    Ok(())
}

#[cfg(not(feature = "tls"))]
async fn serve_tls(addr: SocketAddr, app: Router, _cert: &str, _key: &str) -> Result<()> {
    tracing::warn!("TLS certificate configured but the binary was built without the `tls` feature; serving plain HTTP");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Web server running at http://{}", addr);
    axum::serve(listener, app).await.context("Web server stopped")?;
    Ok(())
}

async fn render(state: &AppState, overlay: Overlay<'_>) -> Result<Html<String>, ApiError> {
    let destinations = state.destinations.snapshot().await?;
    let reviews = state.reviews.snapshot().await?;
    let gallery = state.gallery.list_images().await;

    let page = Page {
        config: &state.config,
        catalog: &state.catalog,
        destinations: &destinations,
        reviews: &reviews,
        gallery: &gallery.images,
        overlay,
    };
    Ok(Html(page.render()))
}

#[derive(Debug, Default, Deserialize)]
struct HomeQuery {
    contact: Option<String>,
}

async fn home(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> Result<Html<String>, ApiError> {
    if query.contact.as_deref() == Some("open") {
        let mut modal = ContactModal::new();
        modal.open();
        return render(&state, Overlay::Contact { modal: &modal, error: None }).await;
    }
    render(&state, Overlay::None).await
}

/// Current window of one rotator as an HTML section, polled by the page
async fn carousel_section(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Html<String>, ApiError> {
    let rotators = &state.config.carousel;
    let html = match name.as_str() {
        "destinations" => views::destinations_section(
            &state.destinations.snapshot().await?,
            rotators.destinations.interval(),
        ),
        "reviews" => views::reviews_section(&state.reviews.snapshot().await?, rotators.reviews.interval()),
        other => return Err(ApiError::not_found(format!("unknown carousel '{other}'"))),
    };
    Ok(Html(html))
}

/// Record of the submitted values the form knows about
fn record(kind: FormKind, pairs: &[(String, String)]) -> FormData {
    FormData::from_pairs(kind, pairs.iter().map(|(name, value)| (name.as_str(), value.as_str())))
}

async fn submit_contact(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let mut modal = ContactModal::new();
    modal.open_with(record(FormKind::Contact, &pairs))?;

    match modal.submit(&state.config.contact) {
        Ok(ChatHandoff { url, .. }) => Ok(Redirect::to(&url).into_response()),
        Err(e) if e.is_form_error() => {
            let overlay = Overlay::Contact {
                modal: &modal,
                error: Some(e.user_message()),
            };
            let page = render(&state, overlay).await?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

async fn show_booking(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Html<String>, ApiError> {
    let package = state.catalog.package(index)?.clone();
    let mut modal = BookingModal::new();
    modal.open(package);
    render(
        &state,
        Overlay::Booking {
            index,
            modal: &modal,
            error: None,
        },
    )
    .await
}

async fn submit_booking(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let package = state.catalog.package(index)?.clone();
    let mut modal = BookingModal::new();
    modal.open_with(package, record(FormKind::Booking, &pairs))?;

    match modal.submit() {
        Ok(Confirmation { message }) => {
            Ok(render(&state, Overlay::Confirmation { message }).await?.into_response())
        }
        Err(e) if e.is_form_error() => {
            let overlay = Overlay::Booking {
                index,
                modal: &modal,
                error: Some(e.user_message()),
            };
            let page = render(&state, overlay).await?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
