pub mod handlers;
pub mod models;
pub mod routes;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    use super::handlers::AppState;
    use super::models::{ErrorResponse, ReportItem, SmsReply};
    use super::routes::create_router;
    use crate::config::AppConfig;
    use crate::database::{create_memory_pool, divisions, players, setup};
    use crate::services::draw::DrawService;
    use crate::services::progression::ProgressionService;
    use crate::services::reports::ReportService;
    use crate::workflow::LogNotifier;

    fn app() -> (Router, i64) {
        let pool = create_memory_pool().unwrap();
        let division_id = {
            let conn = pool.get().unwrap();
            setup::ensure_schema(&conn).unwrap();
            let division = divisions::insert_division(&conn, "9-Ball", 9, false).unwrap();
            for (name, phone) in [("Mike Brown", "+100"), ("Lisa Gray", "+200")] {
                let p = players::upsert_player(&conn, name, Some(phone), None).unwrap();
                divisions::add_entry(&conn, division.id, p.id).unwrap();
            }
            division.id
        };

        let config = AppConfig::new();
        let state = Arc::new(AppState {
            reports: ReportService::new(pool.clone(), &config, Arc::new(LogNotifier)).unwrap(),
            draw: DrawService::new(pool.clone(), config.bracket.clone()),
            progression: ProgressionService::new(pool.clone(), config.bracket.clone()),
            pool,
        });
        (create_router(state), division_id)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read<T: DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_sms_flow_through_director_queue() {
        let (app, division_id) = app();

        let drawn = app
            .clone()
            .oneshot(post_json(&format!("/api/divisions/{}/draw", division_id), r#"{"seed": 7}"#))
            .await
            .unwrap();
        assert_eq!(drawn.status(), StatusCode::CREATED);

        let queued = app
            .clone()
            .oneshot(post_json("/api/sms", r#"{"from": "+100", "body": "Mike beat Lisa 7-2"}"#))
            .await
            .unwrap();
        assert_eq!(queued.status(), StatusCode::OK);
        let reply: SmsReply = read(queued).await;
        assert!(!reply.applied);

        let pending = app
            .clone()
            .oneshot(Request::get("/api/reports/pending").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let pending: Vec<ReportItem> = read(pending).await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].confidence_score, 40);

        let invalid = app
            .clone()
            .oneshot(post_json(&format!("/api/reports/{}/approve", pending[0].id), "{}"))
            .await
            .unwrap();
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let rejected = app
            .clone()
            .oneshot(post_json(
                &format!("/api/reports/{}/reject", pending[0].id),
                r#"{"reason": "race is to 9"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(rejected.status(), StatusCode::OK);

        let again = app
            .oneshot(post_json(&format!("/api/reports/{}/reject", pending[0].id), "{}"))
            .await
            .unwrap();
        assert_eq!(again.status(), StatusCode::CONFLICT);
        let body: ErrorResponse = read(again).await;
        assert!(body.error.contains("already rejected"));
    }

    #[tokio::test]
    async fn test_unknown_sender_gets_reply_text() {
        let (app, _) = app();

        let response = app
            .oneshot(post_json("/api/sms", r#"{"from": "+999", "body": "9-4"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let reply: SmsReply = read(response).await;
        assert_eq!(reply.reply, "No active match found for your number.");
        assert_eq!(reply.report_id, None);
    }

    #[tokio::test]
    async fn test_missing_division_is_not_found() {
        let (app, _) = app();

        let response = app
            .oneshot(Request::get("/api/divisions/404").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
