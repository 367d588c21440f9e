use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::WanderLensError;
use crate::carousel::{Control, Rotator};
use crate::gallery::GalleryImages;
use crate::models::{Inclusions, MoreDestination, Photo, Review, TopDestination, TourPackage};
use crate::web::AppState;

/// JSON error body returned by every API route
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<WanderLensError> for ApiError {
    fn from(err: WanderLensError) -> Self {
        let status = match &err {
            WanderLensError::NotFound { .. } => StatusCode::NOT_FOUND,
            WanderLensError::MissingField { .. } | WanderLensError::InvalidEmail { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            WanderLensError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!("API request failed: {err}");
        }
        Self::new(status, err.user_message())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JumpRequest {
    pub page: usize,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/gallery", get(get_gallery))
        .route("/packages", get(get_packages))
        .route("/destinations", get(get_destinations))
        .route("/photos", get(get_photos))
        .route("/reviews", get(get_reviews))
        .route("/inclusions", get(get_inclusions))
        .route("/carousels/{name}", get(get_carousel))
        .route("/carousels/{name}/jump", post(jump_carousel))
        .route("/carousels/{name}/{action}", post(control_carousel))
}

async fn get_gallery(State(state): State<AppState>) -> Json<GalleryImages> {
    Json(state.gallery.list_images().await)
}

async fn get_packages(State(state): State<AppState>) -> Json<Vec<TourPackage>> {
    Json(state.catalog.packages.clone())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Destinations {
    top: Vec<TopDestination>,
    more: Vec<MoreDestination>,
}

async fn get_destinations(State(state): State<AppState>) -> Json<Destinations> {
    Json(Destinations {
        top: state.catalog.top_destinations.clone(),
        more: state.catalog.more_destinations.clone(),
    })
}

async fn get_photos(State(state): State<AppState>) -> Json<Vec<Photo>> {
    Json(state.catalog.photos.clone())
}

async fn get_reviews(State(state): State<AppState>) -> Json<Vec<Review>> {
    Json(state.catalog.reviews.clone())
}

async fn get_inclusions(State(state): State<AppState>) -> Json<Inclusions> {
    Json(state.catalog.inclusions.clone())
}

async fn get_carousel(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    drive(&state, &name, None).await
}

async fn control_carousel(
    State(state): State<AppState>,
    Path((name, action)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let control = match action.as_str() {
        "next" => Control::Next,
        "prev" => Control::Prev,
        "pause" => Control::Pause,
        "resume" => Control::Resume,
        other => return Err(ApiError::not_found(format!("unknown carousel action '{other}'"))),
    };
    drive(&state, &name, Some(control)).await
}

async fn jump_carousel(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<JumpRequest>,
) -> Result<Response, ApiError> {
    drive(&state, &name, Some(Control::Jump(request.page))).await
}

async fn drive(state: &AppState, name: &str, control: Option<Control>) -> Result<Response, ApiError> {
    debug!(carousel = name, ?control, "Carousel request");
    match name {
        "destinations" => respond(&state.destinations, control).await,
        "reviews" => respond(&state.reviews, control).await,
        other => Err(ApiError::not_found(format!("unknown carousel '{other}'"))),
    }
}

async fn respond<T>(rotator: &Rotator<T>, control: Option<Control>) -> Result<Response, ApiError>
where
    T: Clone + Serialize + Send + Sync + 'static,
{
    let view = match control {
        Some(control) => rotator.control(control).await?,
        None => rotator.snapshot().await?,
    };
    Ok(Json(view).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (WanderLensError::not_found("x"), StatusCode::NOT_FOUND),
            (WanderLensError::validation("x"), StatusCode::BAD_REQUEST),
            (
                WanderLensError::missing_fields(["name"]),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                WanderLensError::invalid_email("a@b"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (WanderLensError::config("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn test_error_body_carries_user_message() {
        let err = ApiError::from(WanderLensError::missing_fields(["email"]));
        assert_eq!(err.message, "Please fill in all required fields.");
    }
}
