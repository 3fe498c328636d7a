mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{role_hash, test_env, TestEnv};
use users_admin::api::rest::{handlers::NoticeSettings, routes};

fn router(env: &TestEnv) -> Router {
    routes::register_routes(Router::new(), env.service.clone(), NoticeSettings::default())
}

async fn body_json(resp: Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(resp: &Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// `name=value` of the flash cookie set by a response.
fn flash_cookie(resp: &Response) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("notify="))
        .and_then(|v| v.split(';').next())
        .map(str::to_owned)
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn empty(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create_jane(app: &Router, role: &str) -> String {
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/users",
            &json!({"name": "Doe", "firstname": "Jane", "email": "jane@example.com", "role": role}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = app.clone().oneshot(get("/admin/users")).await.unwrap();
    let view = body_json(resp).await;
    view["users"]["items"][0]["hash"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn store_from_form_redirects_with_notice() {
    let env = test_env().await;
    let app = router(&env);
    let author = role_hash(&env.service, "Author").await;

    let resp = app
        .clone()
        .oneshot(form_post(
            "/admin/users",
            &format!("name=Doe&firstname=Jane&email=jane%40example.com&role={author}"),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/users");
    let cookie = flash_cookie(&resp).expect("flash cookie");
    assert_eq!(env.mailer.sent().len(), 1);

    // the next index render shows and clears the notice
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/users")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(flash_cookie(&resp).is_some(), "notice cookie should be cleared");

    let view = body_json(resp).await;
    assert_eq!(view["trashed"], false);
    assert_eq!(view["notice"]["level"], "success");
    assert_eq!(
        view["notice"]["message"],
        "The user \"Jane Doe\" has been created."
    );
    assert_eq!(view["users"]["page_info"]["total"], 1);
    let user = &view["users"]["items"][0];
    assert_eq!(user["username"], "doej");
    assert_eq!(user["role"]["name"], "Author");
    assert!(user.get("id").is_none());
    assert!(user.get("password").is_none());
}

#[tokio::test]
async fn index_without_cookie_has_no_notice() {
    let env = test_env().await;
    let resp = router(&env).oneshot(get("/admin/users")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(flash_cookie(&resp).is_none());
    let view = body_json(resp).await;
    assert!(view["notice"].is_null());
    assert_eq!(view["users"]["items"], json!([]));
}

#[tokio::test]
async fn notice_follows_accept_language() {
    let env = test_env().await;
    let app = router(&env);
    let admin = role_hash(&env.service, "Admin").await;
    let hash = create_jane(&app, &admin).await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/admin/users/{hash}"))
                .header(header::ACCEPT_LANGUAGE, "nl-BE,nl;q=0.9,en;q=0.8")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let cookie = flash_cookie(&resp).unwrap();

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/users/trashed")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let view = body_json(resp).await;
    assert_eq!(view["trashed"], true);
    assert_eq!(view["notice"]["message"], "De gebruiker \"Jane Doe\" is verwijderd.");
    assert_eq!(view["users"]["items"][0]["hash"], hash.as_str());
    assert!(view["users"]["items"][0]["deleted_at"].is_string());
}

#[tokio::test]
async fn update_accepts_put_patch_and_post() {
    let env = test_env().await;
    let app = router(&env);
    let admin = role_hash(&env.service, "Admin").await;
    let reviewer = role_hash(&env.service, "Reviewer").await;
    let hash = create_jane(&app, &admin).await;

    for (method, firstname) in [("PUT", "Janet"), ("PATCH", "Janine"), ("POST", "Jana")] {
        let resp = app
            .clone()
            .oneshot(json_request(
                method,
                &format!("/admin/users/{hash}"),
                &json!({"name": "Doe", "firstname": firstname, "email": "jane@example.com", "role": reviewer}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{method}");
        assert_eq!(location(&resp), "/admin/users");
    }

    let resp = app
        .clone()
        .oneshot(get(&format!("/admin/users/{hash}/edit")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let form = body_json(resp).await;
    assert_eq!(form["user"]["firstname"], "Jana");
    assert_eq!(form["user"]["role"]["name"], "Reviewer");
    assert_eq!(form["roles"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn destroy_then_restore() {
    let env = test_env().await;
    let app = router(&env);
    let admin = role_hash(&env.service, "Admin").await;
    let hash = create_jane(&app, &admin).await;

    let resp = app
        .clone()
        .oneshot(empty("DELETE", &format!("/admin/users/{hash}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/users");

    let view = body_json(app.clone().oneshot(get("/admin/users")).await.unwrap()).await;
    assert_eq!(view["users"]["page_info"]["total"], 0);

    let resp = app
        .clone()
        .oneshot(empty("POST", &format!("/admin/users/{hash}/restore")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/users/trashed");

    let view = body_json(app.clone().oneshot(get("/admin/users")).await.unwrap()).await;
    assert_eq!(view["users"]["page_info"]["total"], 1);
}

#[tokio::test]
async fn create_form_lists_roles() {
    let env = test_env().await;
    let resp = router(&env)
        .oneshot(get("/admin/users/create"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let form = body_json(resp).await;
    assert!(form["user"].is_null());
    let names: Vec<_> = form["roles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, ["Admin", "Author", "Reviewer", "Member"]);
}

#[tokio::test]
async fn unknown_user_is_a_404_problem() {
    let env = test_env().await;
    let resp = router(&env)
        .oneshot(
            Request::builder()
                .uri("/admin/users/nope/edit")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    let problem = body_json(resp).await;
    assert_eq!(problem["code"], "users_admin.user.not_found.v1");
    assert_eq!(problem["instance"], "/admin/users/nope/edit");
    assert_eq!(problem["request_id"], "req-42");
}

#[tokio::test]
async fn invalid_form_is_a_422_problem() {
    let env = test_env().await;
    let admin = role_hash(&env.service, "Admin").await;
    let resp = router(&env)
        .oneshot(form_post(
            "/admin/users",
            &format!("name=Doe&firstname=Jane&email=nope&role={admin}"),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(flash_cookie(&resp).is_none());
    let problem = body_json(resp).await;
    assert_eq!(problem["code"], "users_admin.user.validation.v1");
    assert_eq!(problem["errors"][0]["pointer"], "/email");
    assert!(env.mailer.sent().is_empty());
}

#[tokio::test]
async fn unknown_role_points_at_role_field() {
    let env = test_env().await;
    let resp = router(&env)
        .oneshot(json_request(
            "POST",
            "/admin/users",
            &json!({"name": "Doe", "firstname": "Jane", "email": "jane@example.com", "role": "ghost"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let problem = body_json(resp).await;
    assert_eq!(problem["code"], "users_admin.role.not_found.v1");
    assert_eq!(problem["errors"][0]["pointer"], "/role");
}

#[tokio::test]
async fn duplicate_email_is_a_409_problem() {
    let env = test_env().await;
    let app = router(&env);
    let admin = role_hash(&env.service, "Admin").await;
    create_jane(&app, &admin).await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/users",
            &json!({"name": "Roe", "firstname": "Rick", "email": "jane@example.com", "role": admin}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let problem = body_json(resp).await;
    assert_eq!(problem["code"], "users_admin.user.email_conflict.v1");
}

#[tokio::test]
async fn malformed_json_is_a_400_problem() {
    let env = test_env().await;
    let resp = router(&env)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let problem = body_json(resp).await;
    assert_eq!(problem["code"], "users_admin.request.invalid.v1");
}

#[tokio::test]
async fn trashed_users_cannot_be_updated() {
    let env = test_env().await;
    let app = router(&env);
    let admin = role_hash(&env.service, "Admin").await;
    let hash = create_jane(&app, &admin).await;
    app.clone()
        .oneshot(empty("DELETE", &format!("/admin/users/{hash}")))
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/admin/users/{hash}"),
            &json!({"name": "Doe", "firstname": "Jane", "email": "jane@example.com", "role": admin}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
