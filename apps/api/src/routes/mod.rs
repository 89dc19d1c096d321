pub mod health;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::auth::handlers as auth;
use crate::report::handlers as report;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth API
        .route("/auth/signup", post(auth::handle_signup))
        .route("/auth/login", post(auth::handle_login))
        .route("/auth/me", get(auth::handle_me))
        // Report API
        .route(
            "/generate-departments",
            post(report::handle_generate_departments),
        )
        .route("/calculate-roi", post(report::handle_calculate_roi))
        .with_state(state)
}

/// CORS policy from the configured origin list. `*` allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {o:?}");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::auth::service::test_support::auth_service;
    use crate::auth::store::memory::InMemoryCredentialStore;
    use crate::llm_client::testing::ScriptedGateway;
    use crate::llm_client::GatewayError;
    use crate::report::service::{ReportService, RetryPolicy};

    fn app(gateway: ScriptedGateway) -> Router {
        let state = AppState {
            auth: Arc::new(auth_service(Arc::new(InMemoryCredentialStore::default()))),
            reports: Arc::new(ReportService::new(
                Arc::new(gateway),
                RetryPolicy::default(),
            )),
        };
        build_router(state)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn survey_body() -> Value {
        json!({
            "organization_industry": "Healthcare / MedTech",
            "company_size": "Mid-Market (51-200)",
            "department": "Claims Processing",
            "human_count": 12
        })
    }

    const REPORT_REPLY: &str = r#"```json
{
  "metrics": {"total_human_annual_cost": 780000, "total_ai_annual_cost": 120000,
              "net_annual_savings": 660000, "break_even_months": 2.2,
              "productivity_multiplier": 6.5, "department_equivalent": 12},
  "human_cost_breakdown": {"salary_overhead": 600000, "benefits_insurance": 150000,
              "recruiting_training_waste": 16000, "error_rework_cost": 9000,
              "tool_licensing_cost": 5000},
  "ai_cost_breakdown": {"llm_token_costs": 3000, "server_hosting_costs": 30000,
              "implementation_fee": 35000, "maintenance_cost": 5200},
  "strategic_analysis": {"executive_summary": "Claims backlog clears overnight.",
              "bottleneck_solution": "No hiring lag.",
              "scalability_argument": "Handles 20% growth without new seats."},
  "confidence_score": "High",
  "market_data_found": {"avg_salary": "$50,000"}
}
```"#;

    #[tokio::test]
    async fn test_health() {
        let app = app(ScriptedGateway::default());
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_signup_login_me_flow() {
        let app = app(ScriptedGateway::default());

        let (status, body) = send(
            &app,
            post_json(
                "/auth/signup",
                json!({"email": "ana@clinic.org", "password": "pw-123", "full_name": "Ana Ruiz"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "bearer");
        assert_eq!(body["user"]["email"], "ana@clinic.org");
        assert_eq!(body["user"]["full_name"], "Ana Ruiz");
        assert!(body["user"].get("password_hash").is_none());

        let (status, body) = send(
            &app,
            post_json("/auth/login", json!({"email": "ana@clinic.org", "password": "pw-123"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["access_token"].as_str().unwrap().to_string();

        let request = Request::get("/auth/me")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "ana@clinic.org");
    }

    #[tokio::test]
    async fn test_duplicate_signup_is_400() {
        let app = app(ScriptedGateway::default());
        let body = json!({"email": "ana@clinic.org", "password": "pw"});

        let (status, _) = send(&app, post_json("/auth/signup", body.clone())).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, post_json("/auth/signup", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "DUPLICATE_ACCOUNT");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let app = app(ScriptedGateway::default());
        send(
            &app,
            post_json("/auth/signup", json!({"email": "ana@clinic.org", "password": "pw"})),
        )
        .await;

        let wrong_password = send(
            &app,
            post_json("/auth/login", json!({"email": "ana@clinic.org", "password": "nope"})),
        )
        .await;
        let unknown_email = send(
            &app,
            post_json("/auth/login", json!({"email": "bob@clinic.org", "password": "pw"})),
        )
        .await;

        assert_eq!(wrong_password.0, StatusCode::BAD_REQUEST);
        assert_eq!(wrong_password, unknown_email);
    }

    #[tokio::test]
    async fn test_signup_rejects_malformed_email() {
        let app = app(ScriptedGateway::default());
        let (status, body) = send(
            &app,
            post_json("/auth/signup", json!({"email": "not-an-email", "password": "pw"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_me_without_token_is_401() {
        let app = app(ScriptedGateway::default());
        let request = Request::get("/auth/me").body(Body::empty()).unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_with_forged_token_is_401() {
        let app = app(ScriptedGateway::default());
        let request = Request::get("/auth/me")
            .header(header::AUTHORIZATION, "Bearer abc.def.ghi")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_generate_departments_healthcare() {
        let app = app(ScriptedGateway::replying(
            "```json\n{\"departments\":[\"Billing\",\"Scheduling\"]}\n```",
        ));
        let (status, body) = send(
            &app,
            post_json("/generate-departments", json!({"industry": "Healthcare"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"departments": ["Billing", "Scheduling"]}));
    }

    #[tokio::test]
    async fn test_generate_departments_blank_industry_is_400() {
        let app = app(ScriptedGateway::default());
        let (status, _) = send(
            &app,
            post_json("/generate-departments", json!({"industry": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_calculate_roi_returns_report() {
        let app = app(ScriptedGateway::replying(REPORT_REPLY));
        let (status, body) = send(&app, post_json("/calculate-roi", survey_body())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metrics"]["break_even_months"], 2.2);
        assert_eq!(body["metrics"]["department_equivalent"], 12.0);
        assert_eq!(body["confidence_score"], "High");
        assert_eq!(body["market_data_found"]["avg_salary"], "$50,000");
    }

    #[tokio::test]
    async fn test_calculate_roi_prose_reply_is_500_malformed() {
        let app = app(ScriptedGateway::replying(
            "I could not find enough market data to answer.",
        ));
        let (status, body) = send(&app, post_json("/calculate-roi", survey_body())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "MALFORMED_OUTPUT");
        assert!(!body.to_string().contains("market data"));
    }

    #[tokio::test]
    async fn test_calculate_roi_gateway_outage_is_500_unavailable() {
        let app = app(ScriptedGateway::new(vec![Err(GatewayError::Unavailable(
            "connection refused".to_string(),
        ))]));
        let (status, body) = send(&app, post_json("/calculate-roi", survey_body())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "GATEWAY_UNAVAILABLE");
        assert_eq!(body["error"]["retryable"], true);
    }

    #[tokio::test]
    async fn test_calculate_roi_zero_headcount_is_400() {
        let app = app(ScriptedGateway::default());
        let mut survey = survey_body();
        survey["human_count"] = json!(0);
        let (status, body) = send(&app, post_json("/calculate-roi", survey)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "human_count must be at least 1");
    }

    #[tokio::test]
    async fn test_calculate_roi_missing_department_is_400() {
        let app = app(ScriptedGateway::default());
        let (status, body) = send(
            &app,
            post_json(
                "/calculate-roi",
                json!({"organization_industry": "Retail", "company_size": "S", "human_count": 3}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(!body.to_string().contains("line 1"));
    }

    #[tokio::test]
    async fn test_signup_missing_password_is_400() {
        let app = app(ScriptedGateway::default());
        let (status, body) = send(&app, post_json("/auth/signup", json!({"email": "a@b.co"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_login_with_non_json_body_is_400() {
        let app = app(ScriptedGateway::default());
        let request = Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "request body is not valid JSON");
    }

    #[tokio::test]
    async fn test_me_reports_signup_time() {
        let app = app(ScriptedGateway::default());
        let (_, body) = send(
            &app,
            post_json("/auth/signup", json!({"email": "ana@clinic.org", "password": "pw"})),
        )
        .await;
        let token = body["access_token"].as_str().unwrap().to_string();
        let signed_up_at = body["user"]["created_at"].clone();
        assert!(signed_up_at.is_string());

        let request = Request::get("/auth/me")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["created_at"], signed_up_at);
    }

    #[test]
    fn test_cors_layer_accepts_wildcard_and_lists() {
        let _ = cors_layer(&["*".to_string()]);
        let _ = cors_layer(&[
            "http://localhost:3000".to_string(),
            "bad\norigin".to_string(),
        ]);
    }
}
