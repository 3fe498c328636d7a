//! Info-level logs of the admin endpoints must not carry personal data.

mod common;

use std::io;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use tracing::Level;

use common::{role_hash, test_env};
use users_admin::api::rest::{handlers::NoticeSettings, routes};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test(flavor = "current_thread")]
async fn store_logs_the_hash_not_the_email() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let env = test_env().await;
    let app = routes::register_routes(Router::new(), env.service.clone(), NoticeSettings::default());
    let admin = role_hash(&env.service, "Admin").await;

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/users")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!(
                    "name=Doe&firstname=Jane&email=jane.private%40example.com&role={admin}"
                )))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let users = env
        .service
        .list_users(env.service.page_request(None, None))
        .await
        .unwrap();
    let hash = &users.items[0].hash;

    let logs = captured.text();
    assert!(logs.contains("Stored user"), "{logs}");
    assert!(logs.contains(hash.as_str()), "{logs}");
    assert!(!logs.contains("jane.private@example.com"), "{logs}");
}
