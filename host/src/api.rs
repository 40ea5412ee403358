//! HTTP surface of the host: action endpoint, plugin listing, lifecycle hooks.

use crate::render::{listing_page, RowExtra};
use crate::state::{HostState, LifecycleEvent};
use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};
use wvguard_license::wire::{
    ActionRequest, ActionResponse, ACTIVATE_ACTION, DEACTIVATE_ACTION, LICENSE_ERROR_CODE,
};
use wvguard_license::{
    is_valid_slug, ActivationResult, LicenseAction, LicenseController, LicenseError, RowDecision,
};

/// Local action endpoint the activation form posts to.
pub const AJAX_PATH: &str = "/wp-admin/admin-ajax.php";

/// Plugin listing page.
pub const PLUGINS_PATH: &str = "/wp-admin/plugins.php";

/// Lifecycle hook, `{event}` is `bootstrap`, `activate` or `deactivate`.
pub const LIFECYCLE_PATH: &str = "/lifecycle/{event}";

/// Metadata URL handed to the update checker.
pub const UPDATE_METADATA_PATH: &str = "/api/v1/update-metadata-url";

/// Build the HTTP router over the given host state.
pub fn build_router(state: Arc<HostState>) -> Router {
    Router::new()
        .route(AJAX_PATH, post(action_handler))
        .route(PLUGINS_PATH, get(plugins_handler))
        .route(LIFECYCLE_PATH, post(lifecycle_handler))
        .route(UPDATE_METADATA_PATH, get(update_metadata_handler))
        .with_state(state)
}

/// Answer for actions nobody registered, matching the host's admin-ajax.
fn unknown_action() -> Response {
    (StatusCode::BAD_REQUEST, "0").into_response()
}

fn error_response(err: &LicenseError) -> Response {
    let status = if err.is_remote() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ActionResponse::error(LICENSE_ERROR_CODE, err.to_string()))).into_response()
}

async fn action_handler(State(state): State<Arc<HostState>>, Form(request): Form<ActionRequest>) -> Response {
    // Actions only exist once the requirement check enabled them.
    if !state.license_required() {
        return unknown_action();
    }
    if !matches!(request.action.as_str(), ACTIVATE_ACTION | DEACTIVATE_ACTION) {
        return unknown_action();
    }
    if request.nonce != state.nonce() {
        debug!(action = %request.action, "Rejected action with stale nonce");
        return (
            StatusCode::FORBIDDEN,
            Json(ActionResponse::error("invalid_nonce", "The link you followed has expired.")),
        )
            .into_response();
    }

    let mut controller = state.controller();
    let result = if request.action == ACTIVATE_ACTION {
        activate(&mut controller, &request).await
    } else {
        deactivate(&mut controller).await
    };

    match result {
        Ok(response) => Json(response).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn activate(controller: &mut LicenseController, request: &ActionRequest) -> Result<ActionResponse, LicenseError> {
    if !is_valid_slug(&request.plugin_slug) {
        return Ok(ActionResponse::error(LICENSE_ERROR_CODE, "Invalid plugin slug."));
    }

    Ok(match controller.activate(&request.license_key, &request.plugin_slug).await? {
        ActivationResult::Success { metadata, .. } => ActionResponse::success(metadata.into_value()),
        ActivationResult::Failure { message } => ActionResponse::error(LICENSE_ERROR_CODE, message),
    })
}

async fn deactivate(controller: &mut LicenseController) -> Result<ActionResponse, LicenseError> {
    let message = if controller.deactivate().await? {
        "License deactivated."
    } else {
        "No license to deactivate."
    };
    Ok(ActionResponse::success(json!({
        "message": message,
        "redirect": PLUGINS_PATH,
    })))
}

#[derive(Debug, Deserialize)]
struct ListingQuery {
    license_action: Option<String>,
    plugin: Option<String>,
}

async fn plugins_handler(State(state): State<Arc<HostState>>, Query(query): Query<ListingQuery>) -> Response {
    let config = state.config();

    if !state.license_required() {
        return Html(listing_page(config.plugin_id(), config.plugin_version(), &[], &RowExtra::None)).into_response();
    }

    let mut controller = state.controller();
    let action = query.license_action.as_deref().and_then(LicenseAction::parse);
    let requested = query.plugin.as_deref().unwrap_or_default();

    let decision = match controller.decide(requested, action) {
        Ok(decision) => decision,
        Err(e) => return error_response(&e),
    };

    let extra = match decision {
        RowDecision::RenderActivationForm => RowExtra::ActivationForm {
            plugin_slug: requested.to_string(),
            nonce: state.nonce().to_string(),
        },
        RowDecision::PerformDeactivation => match controller.deactivate().await {
            Ok(_) => RowExtra::Redirect {
                location: PLUGINS_PATH.to_string(),
            },
            Err(e) => {
                warn!(error = %e, "Inline license deactivation failed");
                RowExtra::None
            }
        },
        RowDecision::NoOp => RowExtra::None,
    };

    match controller.row_meta(config.plugin_id()) {
        Ok(meta) => Html(listing_page(config.plugin_id(), config.plugin_version(), &meta, &extra)).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn lifecycle_handler(State(state): State<Arc<HostState>>, Path(event): Path<LifecycleEvent>) -> Response {
    match state.on_lifecycle(event).await {
        Ok(required) => Json(json!({ "event": event, "license_required": required })).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "event": event, "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn update_metadata_handler(State(state): State<Arc<HostState>>) -> Response {
    match state.controller().update_metadata_url() {
        Ok(url) => Json(json!({ "metadata_url": url.as_str() })).into_response(),
        Err(e) => error_response(&e),
    }
}
