use axum::{
    body::{to_bytes, Body},
    extract::Extension,
    http::{Request, Response, StatusCode},
    routing::{get, post},
    Router,
};
use tower::util::ServiceExt;

use adminkit::request_id::{HttpLayers, XRequestId};

fn app(layers: HttpLayers) -> Router {
    let routes = Router::new()
        .route(
            "/whoami",
            get(|Extension(XRequestId(id)): Extension<XRequestId>| async move { id }),
        )
        .route("/boom", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/echo", post(|body: String| async move { body }));
    layers.apply(routes)
}

fn echoed_id<B>(resp: &Response<B>) -> Option<String> {
    resp.headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

async fn body_text(resp: Response<Body>) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn missing_id_is_generated_and_shown_to_handlers() {
    let resp = app(HttpLayers::default())
        .oneshot(Request::get("/whoami").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let id = echoed_id(&resp).expect("x-request-id on the response");
    assert!(!id.is_empty());
    assert_eq!(body_text(resp).await, id);
}

#[tokio::test]
async fn client_id_is_kept() {
    let resp = app(HttpLayers::default())
        .oneshot(
            Request::get("/whoami")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(echoed_id(&resp).as_deref(), Some("req-42"));
    assert_eq!(body_text(resp).await, "req-42");
}

#[tokio::test]
async fn failed_requests_still_echo_the_id() {
    let resp = app(HttpLayers::default())
        .oneshot(
            Request::get("/boom")
                .header("x-request-id", "req-500")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(echoed_id(&resp).as_deref(), Some("req-500"));
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let layers = HttpLayers {
        body_limit_bytes: 16,
        ..HttpLayers::default()
    };
    let resp = app(layers)
        .oneshot(
            Request::post("/echo")
                .header("content-length", "64")
                .body(Body::from(vec![b'x'; 64]))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
