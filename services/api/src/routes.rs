use crate::infra::{deserialize_optional_date, today, AppState, DocumentState};
use autocv::error::AppError;
use autocv::workflows::companies::CompanyBook;
use autocv::workflows::cover_letter::{
    Applicant, Company, CoverLetterField, CoverLetterRequest, JobCredentials, Substitution,
};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{MutexGuard, PoisonError};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub(crate) struct CoverLetterPayload {
    pub(crate) applicant: Applicant,
    /// Company given inline; wins over `company_name`.
    #[serde(default)]
    pub(crate) company: Option<Company>,
    /// Name of a company saved through `/api/v1/companies`.
    #[serde(default)]
    pub(crate) company_name: Option<String>,
    #[serde(default)]
    pub(crate) job: Option<JobCredentials>,
    pub(crate) job_title: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) date: Option<NaiveDate>,
    /// Template text to fill instead of the configured one.
    #[serde(default)]
    pub(crate) template: Option<String>,
    #[serde(default)]
    pub(crate) strict: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CoverLetterResponse {
    pub(crate) date: NaiveDate,
    pub(crate) complete: bool,
    pub(crate) text: String,
    pub(crate) substitutions: Vec<Substitution>,
    pub(crate) unresolved: Vec<CoverLetterField>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FieldEntry {
    pub(crate) field: CoverLetterField,
    pub(crate) marker: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct FieldsResponse {
    pub(crate) initial: CoverLetterField,
    pub(crate) order: Vec<FieldEntry>,
}

pub(crate) fn app_router(documents: DocumentState) -> Router {
    Router::new()
        .route("/api/v1/fields", get(fields_endpoint))
        .route("/api/v1/cover-letters", axum::routing::post(cover_letter_endpoint))
        .route(
            "/api/v1/companies",
            get(list_companies_endpoint).post(save_company_endpoint),
        )
        .with_state(documents)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn fields_endpoint(State(state): State<DocumentState>) -> Json<FieldsResponse> {
    let traversal = state.engine.traversal();
    Json(FieldsResponse {
        initial: traversal.initial(),
        order: traversal
            .ordered()
            .iter()
            .map(|&field| FieldEntry {
                field,
                marker: field.marker(),
            })
            .collect(),
    })
}

pub(crate) async fn cover_letter_endpoint(
    State(state): State<DocumentState>,
    Json(payload): Json<CoverLetterPayload>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let CoverLetterPayload {
        applicant,
        company,
        company_name,
        job,
        job_title,
        date,
        template,
        strict,
    } = payload;

    let company = match (company, company_name) {
        (Some(company), _) => company,
        (None, Some(name)) => lock_book(&state).get(&name).cloned().ok_or_else(|| {
            AppError::Rejected(format!("company '{name}' has not been saved"))
        })?,
        (None, None) => {
            return Err(AppError::Rejected(
                "either company or company_name is required".to_string(),
            ))
        }
    };

    let date = date.unwrap_or_else(today);
    let job = match job {
        Some(job) => job,
        None => JobCredentials::default_for(date)?,
    };
    let request = CoverLetterRequest {
        applicant,
        company,
        job,
        job_title,
        date,
    };

    let template = template.as_deref().unwrap_or(&state.template);
    let document = request.fill(&state.engine, template)?;

    if !document.is_complete() {
        warn!(
            company = %request.company,
            unresolved = document.unresolved.len(),
            "cover letter template ran out before every field was filled"
        );
        if strict {
            let missing = document
                .unresolved
                .iter()
                .map(|field| field.name())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(AppError::Rejected(format!(
                "template ran out before filling {missing}"
            )));
        }
    }

    Ok(Json(CoverLetterResponse {
        date,
        complete: document.is_complete(),
        text: document.to_text(),
        substitutions: document.substitutions,
        unresolved: document.unresolved,
    }))
}

pub(crate) async fn list_companies_endpoint(
    State(state): State<DocumentState>,
) -> Json<Vec<Company>> {
    Json(lock_book(&state).companies().cloned().collect())
}

pub(crate) async fn save_company_endpoint(
    State(state): State<DocumentState>,
    Json(company): Json<Company>,
) -> Response {
    if company.name.trim().is_empty() {
        return AppError::Rejected("company name must not be blank".to_string()).into_response();
    }

    let saved = lock_book(&state).save(company.clone());
    if saved {
        info!(company = %company, "saved company");
        (StatusCode::CREATED, Json(company)).into_response()
    } else {
        (
            StatusCode::CONFLICT,
            Json(json!({ "error": format!("company '{}' is already saved", company.name) })),
        )
            .into_response()
    }
}

// `CompanyBook::save` is a single insert, so a poisoned book is still whole.
fn lock_book(state: &DocumentState) -> MutexGuard<'_, CompanyBook> {
    state
        .companies
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autocv::workflows::cover_letter::{CoverLetterEngine, FieldTraversal, STANDARD_TEMPLATE};
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn documents() -> DocumentState {
        DocumentState::new(
            CoverLetterEngine::new(FieldTraversal::standard().expect("standard traversal")),
            STANDARD_TEMPLATE.to_string(),
        )
    }

    fn applicant_json() -> Value {
        json!({
            "full_name": "Ada Lovelace",
            "middle_initial": "K",
            "email": "ada@example.edu",
            "github_link": "github.com/ada",
            "linkedin_link": "linkedin.com/in/ada",
            "phone": "555-0199",
            "school_year": "SOPHOMORE",
            "is_rising": true,
            "present_address": {
                "street_address": "12 St James Sq",
                "city_state_zip": "London, UK",
                "tertiary": "Room 4"
            },
            "permanent_address": {
                "street_address": "Ockham Park",
                "city_state_zip": "Surrey, UK"
            }
        })
    }

    fn company_json() -> Value {
        json!({
            "name": "Analytical Engines",
            "address": { "street_address": "1 Babbage Rd", "city_state_zip": "Cambridge, UK" }
        })
    }

    async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn fills_letter_with_inline_company() {
        let router = app_router(documents());
        let payload = json!({
            "applicant": applicant_json(),
            "company": company_json(),
            "job": { "job_type": "CO-OP", "job_season": "FALL", "year": "2027" },
            "job_title": "Computation",
            "date": "2026-10-19"
        });

        let response = router
            .oneshot(post_json("/api/v1/cover-letters", &payload))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["complete"], json!(true));
        assert_eq!(body["unresolved"], json!([]));
        assert_eq!(body["substitutions"][0]["field"], json!("INITIAL_FIRST_NAME"));
        let text = body["text"].as_str().expect("text");
        assert!(text.contains("October 19, 2026"));
        assert!(text.contains("co-op position for the\n       fall of\n       2027 at"));
        assert!(text.contains("rising\n       sophomore"));
    }

    #[tokio::test]
    async fn saved_company_can_be_referenced_by_name() {
        let documents = documents();
        let saved = app_router(documents.clone())
            .oneshot(post_json("/api/v1/companies", &company_json()))
            .await
            .expect("route executes");
        assert_eq!(saved.status(), StatusCode::CREATED);

        let payload = json!({
            "applicant": applicant_json(),
            "company_name": "Analytical Engines",
            "job_title": "Computation"
        });
        let response = app_router(documents)
            .oneshot(post_json("/api/v1/cover-letters", &payload))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert!(body["text"]
            .as_str()
            .expect("text")
            .contains("1 Babbage Rd"));
    }

    #[tokio::test]
    async fn unknown_company_name_is_a_bad_request() {
        let payload = json!({
            "applicant": applicant_json(),
            "company_name": "Nobody",
            "job_title": "Computation"
        });
        let response = app_router(documents())
            .oneshot(post_json("/api/v1/cover-letters", &payload))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json_body(response).await;
        assert!(body["error"].as_str().expect("error").contains("Nobody"));
    }

    #[tokio::test]
    async fn company_without_address_is_unprocessable() {
        let payload = json!({
            "applicant": applicant_json(),
            "company": { "name": "Analytical Engines" },
            "job_title": "Computation"
        });
        let response = app_router(documents())
            .oneshot(post_json("/api/v1/cover-letters", &payload))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn short_template_reports_unresolved_fields() {
        let payload = json!({
            "applicant": applicant_json(),
            "company": company_json(),
            "job_title": "Computation",
            "template": "Dear team,\n[INITIAL_FIRST_NAME] [INITIAL_LAST_NAME]\n"
        });
        let response = app_router(documents())
            .oneshot(post_json("/api/v1/cover-letters", &payload))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["complete"], json!(false));
        assert_eq!(body["text"], json!("Dear team,\nAda [INITIAL_LAST_NAME]\n"));
        let unresolved = body["unresolved"].as_array().expect("unresolved");
        assert_eq!(unresolved.len(), CoverLetterField::ALL.len() - 1);
        assert_eq!(unresolved[0], json!("INITIAL_LAST_NAME"));
    }

    #[tokio::test]
    async fn default_job_rejects_year_zero_letter_date() {
        let payload = json!({
            "applicant": applicant_json(),
            "company": company_json(),
            "job_title": "Computation",
            "date": "0000-06-01"
        });
        let response = app_router(documents())
            .oneshot(post_json("/api/v1/cover-letters", &payload))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json_body(response).await;
        assert!(body["error"].as_str().expect("error").contains("'0'"));
    }

    #[tokio::test]
    async fn strict_request_rejects_short_template() {
        let payload = json!({
            "applicant": applicant_json(),
            "company": company_json(),
            "job_title": "Computation",
            "template": "[INITIAL_FIRST_NAME]\n",
            "strict": true
        });
        let response = app_router(documents())
            .oneshot(post_json("/api/v1/cover-letters", &payload))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_company_conflicts() {
        let documents = documents();
        let first = app_router(documents.clone())
            .oneshot(post_json("/api/v1/companies", &company_json()))
            .await
            .expect("route executes");
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app_router(documents.clone())
            .oneshot(post_json("/api/v1/companies", &company_json()))
            .await
            .expect("route executes");
        assert_eq!(second.status(), StatusCode::CONFLICT);

        let listing = app_router(documents)
            .oneshot(
                Request::get("/api/v1/companies")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        let body = read_json_body(listing).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn fields_lists_traversal_order() {
        let Json(body) = fields_endpoint(State(documents())).await;
        assert_eq!(body.initial, CoverLetterField::InitialFirstName);
        assert_eq!(body.order.len(), CoverLetterField::ALL.len());
        assert_eq!(body.order[0].marker, "[INITIAL_FIRST_NAME]");
        assert_eq!(body.order[28].field, CoverLetterField::LastName);
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_bound() {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };

        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
