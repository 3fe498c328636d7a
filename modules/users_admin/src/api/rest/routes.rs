use axum::{
    routing::{get, post, put},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::rest::handlers::{self, NoticeSettings};
use crate::domain::service::Service;

/// Mount the users back-office routes onto `router`.
///
/// The service and notice settings are attached as extensions to these routes only.
pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    notices: NoticeSettings,
) -> Router {
    let users = Router::new()
        // GET /admin/users - index; POST /admin/users - store
        .route("/admin/users", get(handlers::index).post(handlers::store))
        .route("/admin/users/trashed", get(handlers::trashed))
        .route("/admin/users/create", get(handlers::create))
        // POST is accepted for update too
        .route(
            "/admin/users/{hash}",
            put(handlers::update)
                .patch(handlers::update)
                .post(handlers::update)
                .delete(handlers::destroy),
        )
        .route("/admin/users/{hash}/edit", get(handlers::edit))
        .route("/admin/users/{hash}/restore", post(handlers::restore))
        .layer(Extension(notices))
        .layer(Extension(service));

    router.merge(users)
}
