//! OpenAPI document for the users back-office routes.

use adminkit::{Flash, FlashLevel, PageInfo, Problem, ValidationError};
use utoipa::OpenApi;

use crate::api::rest::dto::{RoleDto, UserDto, UserFormReq, UserFormView, UserIndexView};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::rest::handlers::index,
        crate::api::rest::handlers::trashed,
        crate::api::rest::handlers::create,
        crate::api::rest::handlers::edit,
        crate::api::rest::handlers::store,
        crate::api::rest::handlers::update,
        crate::api::rest::handlers::destroy,
        crate::api::rest::handlers::restore,
    ),
    components(schemas(
        RoleDto,
        UserDto,
        UserFormReq,
        UserFormView,
        UserIndexView,
        PageInfo,
        Flash,
        FlashLevel,
        Problem,
        ValidationError
    )),
    tags(
        (name = "users", description = "Back-office user management")
    )
)]
pub struct UsersAdminApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = UsersAdminApiDoc::openapi();
        for path in [
            "/admin/users",
            "/admin/users/trashed",
            "/admin/users/create",
            "/admin/users/{hash}",
            "/admin/users/{hash}/edit",
            "/admin/users/{hash}/restore",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn update_accepts_put_patch_and_post() {
        let doc = UsersAdminApiDoc::openapi();
        let item = &doc.paths.paths["/admin/users/{hash}"];
        assert!(item.put.is_some());
        assert!(item.patch.is_some());
        assert!(item.post.is_some());
        assert!(item.delete.is_some());
        assert!(item.get.is_none());
    }

    #[test]
    fn problem_schema_is_registered() {
        let doc = UsersAdminApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.contains_key("Problem"));
        assert!(schemas.contains_key("UserDto"));
    }
}
