use crate::bundle::CertBundle;
use crate::configs::AppConfig;
use crate::issuer::generate_certificate;
use crate::request::{CertRequest, DomainExtractor};
use anyhow::{Context, Result};
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use log::{error, info};
use std::sync::Arc;

const FAILURE_TEXT: &str = "Something went wrong";

#[derive(Clone)]
struct AppState {
    extractor: Arc<DomainExtractor>,
}

/// Build the router: `/` issues a certificate for GET or POST
///
/// Fields are read from a form-encoded body and from the query string, body
/// first. A body of any other content type is ignored rather than rejected.
pub fn router(extractor: DomainExtractor) -> Router {
    let state = AppState {
        extractor: Arc::new(extractor),
    };
    Router::new()
        .route("/", get(issue_certificate).post(issue_certificate))
        .with_state(state)
}

pub fn start_webserver(config: AppConfig) -> Result<()> {
    let extractor = DomainExtractor::new(&config.request.fallback_domain)
        .context("Failed to compile domain pattern")?;
    let addr = config.listen_addr()?;

    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .context(format!("Failed to bind {}", addr))?;

        info!("Certificate server listening on http://{}", addr);
        info!(
            "Fallback domain for requests without a link: {}",
            extractor.fallback()
        );

        axum::serve(listener, router(extractor))
            .await
            .context("HTTP server failed")
    })
}

async fn issue_certificate(
    State(state): State<AppState>,
    query: Option<Query<CertRequest>>,
    form: Option<Form<CertRequest>>,
) -> Response {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let request = match form {
        Some(Form(body)) => body.or(query),
        None => query,
    };
    let (user, domain) = request.identity(&state.extractor);
    info!("Issuing certificate for user={:?} domain={:?}", user, domain);

    // RSA key generation is CPU bound; keep it off the reactor threads
    match tokio::task::spawn_blocking(move || generate_certificate(&user, &domain)).await {
        Ok(Ok(bundle)) => Json(bundle).into_response(),
        Ok(Err(e)) => {
            error!("Certificate generation failed: {}", e);
            failure_response()
        }
        Err(e) => {
            error!("Certificate generation task aborted: {}", e);
            failure_response()
        }
    }
}

fn failure_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(CertBundle {
            text: FAILURE_TEXT.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failure_response() {
        let response = failure_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let bundle: CertBundle = serde_json::from_slice(&body).unwrap();
        assert_eq!(bundle.text, "Something went wrong");
    }
}
