use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::{header::ACCEPT_LANGUAGE, HeaderMap, Uri},
    response::{Json, Redirect},
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, error, info};

use adminkit::{flash, request_id, Flash, Problem, ProblemResponse};

use crate::api::rest::dto::{IndexQuery, UserFormReq, UserFormView, UserIndexView};
use crate::api::rest::error::map_domain_error;
use crate::api::rest::extract::FormOrJson;
use crate::domain::service::Service;
use crate::i18n::{self, Action};

pub const INDEX_PATH: &str = "/admin/users";
pub const TRASHED_PATH: &str = "/admin/users/trashed";

/// Locale settings for flash notices.
#[derive(Debug, Clone)]
pub struct NoticeSettings {
    pub default_locale: String,
}

impl Default for NoticeSettings {
    fn default() -> Self {
        Self {
            default_locale: i18n::FALLBACK_LOCALE.to_string(),
        }
    }
}

fn req_id(headers: &HeaderMap) -> Option<String> {
    request_id::from_headers(headers).map(str::to_owned)
}

fn notice(headers: &HeaderMap, settings: &NoticeSettings, full_name: &str, action: Action) -> Flash {
    let accept = headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok());
    let locale = i18n::negotiate(accept, &settings.default_locale);
    Flash::success(i18n::user_notice(locale, full_name, action))
}

fn redirect_with(jar: CookieJar, to: &str, flash: &Flash) -> (CookieJar, Redirect) {
    (flash::push(jar, flash), Redirect::to(to))
}

/// List active users
#[utoipa::path(
    get,
    path = "/admin/users",
    params(IndexQuery),
    responses(
        (status = 200, description = "Users index", body = UserIndexView),
        (status = 500, description = "Internal Server Error", body = Problem)
    ),
    tags = ["users"],
    operation_id = "admin.users.index"
)]
pub async fn index(
    Extension(svc): Extension<Arc<Service>>,
    Query(query): Query<IndexQuery>,
    jar: CookieJar,
    headers: HeaderMap,
    uri: Uri,
) -> Result<(CookieJar, Json<UserIndexView>), ProblemResponse> {
    info!("Listing users: {:?}", query);
    let page = svc.page_request(query.page, query.per_page);

    match svc.list_users(page).await {
        Ok(users) => {
            let (jar, notice) = flash::take(jar);
            Ok((jar, Json(UserIndexView::new(users, false, notice))))
        }
        Err(e) => {
            error!("Failed to list users: {}", e);
            Err(map_domain_error(&e, uri.path(), req_id(&headers)))
        }
    }
}

/// List soft-deleted users
#[utoipa::path(
    get,
    path = "/admin/users/trashed",
    params(IndexQuery),
    responses(
        (status = 200, description = "Trashed users index", body = UserIndexView),
        (status = 500, description = "Internal Server Error", body = Problem)
    ),
    tags = ["users"],
    operation_id = "admin.users.trashed"
)]
pub async fn trashed(
    Extension(svc): Extension<Arc<Service>>,
    Query(query): Query<IndexQuery>,
    jar: CookieJar,
    headers: HeaderMap,
    uri: Uri,
) -> Result<(CookieJar, Json<UserIndexView>), ProblemResponse> {
    info!("Listing trashed users: {:?}", query);
    let page = svc.page_request(query.page, query.per_page);

    match svc.list_trashed(page).await {
        Ok(users) => {
            let (jar, notice) = flash::take(jar);
            Ok((jar, Json(UserIndexView::new(users, true, notice))))
        }
        Err(e) => {
            error!("Failed to list trashed users: {}", e);
            Err(map_domain_error(&e, uri.path(), req_id(&headers)))
        }
    }
}

/// Empty user form with all roles
#[utoipa::path(
    get,
    path = "/admin/users/create",
    responses(
        (status = 200, description = "Create form", body = UserFormView),
        (status = 500, description = "Internal Server Error", body = Problem)
    ),
    tags = ["users"],
    operation_id = "admin.users.create"
)]
pub async fn create(
    Extension(svc): Extension<Arc<Service>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<UserFormView>, ProblemResponse> {
    match svc.create_form().await {
        Ok(form) => Ok(Json(form.into())),
        Err(e) => {
            error!("Failed to build create form: {}", e);
            Err(map_domain_error(&e, uri.path(), req_id(&headers)))
        }
    }
}

/// User form filled with an existing user
#[utoipa::path(
    get,
    path = "/admin/users/{hash}/edit",
    params(("hash" = String, Path, description = "User hash")),
    responses(
        (status = 200, description = "Edit form", body = UserFormView),
        (status = 404, description = "Not Found", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem)
    ),
    tags = ["users"],
    operation_id = "admin.users.edit"
)]
pub async fn edit(
    Extension(svc): Extension<Arc<Service>>,
    Path(hash): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<UserFormView>, ProblemResponse> {
    info!("Editing user {}", hash);

    match svc.edit_form(&hash).await {
        Ok(form) => Ok(Json(form.into())),
        Err(e) => {
            error!("Failed to build edit form for {}: {}", hash, e);
            Err(map_domain_error(&e, uri.path(), req_id(&headers)))
        }
    }
}

/// Create a user and mail their generated password
#[utoipa::path(
    post,
    path = "/admin/users",
    request_body(content = UserFormReq, description = "JSON or urlencoded user form"),
    responses(
        (status = 303, description = "Created; redirects to the index", headers(("Location" = String), ("Set-Cookie" = String, description = "Flash notice"))),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 409, description = "Conflict", body = Problem),
        (status = 422, description = "Validation Failed", body = Problem),
        (status = 502, description = "Mail Delivery Failed", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem)
    ),
    tags = ["users"],
    operation_id = "admin.users.store"
)]
pub async fn store(
    Extension(svc): Extension<Arc<Service>>,
    Extension(settings): Extension<NoticeSettings>,
    jar: CookieJar,
    headers: HeaderMap,
    uri: Uri,
    FormOrJson(req): FormOrJson<UserFormReq>,
) -> Result<(CookieJar, Redirect), ProblemResponse> {
    debug!("Storing user");

    match svc.store_user(req.into()).await {
        Ok(stored) => {
            info!(user = %stored.user.hash, "Stored user");
            let flash = notice(&headers, &settings, &stored.user.full_name(), Action::Created);
            Ok(redirect_with(jar, INDEX_PATH, &flash))
        }
        Err(e) => {
            error!("Failed to store user: {}", e);
            Err(map_domain_error(&e, uri.path(), req_id(&headers)))
        }
    }
}

/// Update a user's fields and role
#[utoipa::path(
    method(put, patch, post),
    path = "/admin/users/{hash}",
    params(("hash" = String, Path, description = "User hash")),
    request_body(content = UserFormReq, description = "JSON or urlencoded user form"),
    responses(
        (status = 303, description = "Updated; redirects to the index", headers(("Location" = String), ("Set-Cookie" = String, description = "Flash notice"))),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 409, description = "Conflict", body = Problem),
        (status = 422, description = "Validation Failed", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem)
    ),
    tags = ["users"],
    operation_id = "admin.users.update"
)]
pub async fn update(
    Extension(svc): Extension<Arc<Service>>,
    Extension(settings): Extension<NoticeSettings>,
    Path(hash): Path<String>,
    jar: CookieJar,
    headers: HeaderMap,
    uri: Uri,
    FormOrJson(req): FormOrJson<UserFormReq>,
) -> Result<(CookieJar, Redirect), ProblemResponse> {
    info!("Updating user {}", hash);

    match svc.update_user(&hash, req.into()).await {
        Ok(user) => {
            let flash = notice(&headers, &settings, &user.full_name(), Action::Updated);
            Ok(redirect_with(jar, INDEX_PATH, &flash))
        }
        Err(e) => {
            error!("Failed to update user {}: {}", hash, e);
            Err(map_domain_error(&e, uri.path(), req_id(&headers)))
        }
    }
}

/// Soft-delete a user
#[utoipa::path(
    delete,
    path = "/admin/users/{hash}",
    params(("hash" = String, Path, description = "User hash")),
    responses(
        (status = 303, description = "Deleted; redirects to the index", headers(("Location" = String), ("Set-Cookie" = String, description = "Flash notice"))),
        (status = 404, description = "Not Found", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem)
    ),
    tags = ["users"],
    operation_id = "admin.users.destroy"
)]
pub async fn destroy(
    Extension(svc): Extension<Arc<Service>>,
    Extension(settings): Extension<NoticeSettings>,
    Path(hash): Path<String>,
    jar: CookieJar,
    headers: HeaderMap,
    uri: Uri,
) -> Result<(CookieJar, Redirect), ProblemResponse> {
    info!("Deleting user {}", hash);

    match svc.delete_user(&hash).await {
        Ok(user) => {
            let flash = notice(&headers, &settings, &user.full_name(), Action::Deleted);
            Ok(redirect_with(jar, INDEX_PATH, &flash))
        }
        Err(e) => {
            error!("Failed to delete user {}: {}", hash, e);
            Err(map_domain_error(&e, uri.path(), req_id(&headers)))
        }
    }
}

/// Bring a soft-deleted user back
#[utoipa::path(
    post,
    path = "/admin/users/{hash}/restore",
    params(("hash" = String, Path, description = "User hash")),
    responses(
        (status = 303, description = "Restored; redirects to the trashed listing", headers(("Location" = String), ("Set-Cookie" = String, description = "Flash notice"))),
        (status = 404, description = "Not Found", body = Problem),
        (status = 500, description = "Internal Server Error", body = Problem)
    ),
    tags = ["users"],
    operation_id = "admin.users.restore"
)]
pub async fn restore(
    Extension(svc): Extension<Arc<Service>>,
    Extension(settings): Extension<NoticeSettings>,
    Path(hash): Path<String>,
    jar: CookieJar,
    headers: HeaderMap,
    uri: Uri,
) -> Result<(CookieJar, Redirect), ProblemResponse> {
    info!("Restoring user {}", hash);

    match svc.restore_user(&hash).await {
        Ok(user) => {
            let flash = notice(&headers, &settings, &user.full_name(), Action::Restored);
            Ok(redirect_with(jar, TRASHED_PATH, &flash))
        }
        Err(e) => {
            error!("Failed to restore user {}: {}", hash, e);
            Err(map_domain_error(&e, uri.path(), req_id(&headers)))
        }
    }
}
