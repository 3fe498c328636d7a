//! Error catalog for the users_admin module.

adminkit::error_catalog! {
    /// Versioned problem codes returned by the users_admin endpoints.
    #[non_exhaustive]
    pub enum ErrorCode from "https://errors.blogify.dev/" {
        users_admin_user_not_found_v1 => (404, "users_admin.user.not_found.v1", "User Not Found"),
        users_admin_user_email_conflict_v1 => (409, "users_admin.user.email_conflict.v1", "Email Already Exists"),
        users_admin_user_validation_v1 => (422, "users_admin.user.validation.v1", "Validation Failed"),
        users_admin_role_not_found_v1 => (422, "users_admin.role.not_found.v1", "Unknown Role"),
        users_admin_request_invalid_v1 => (400, "users_admin.request.invalid.v1", "Bad Request"),
        users_admin_mail_unavailable_v1 => (502, "users_admin.mail.unavailable.v1", "Mail Delivery Failed"),
        users_admin_internal_database_v1 => (500, "users_admin.internal.database.v1", "Internal Database Error"),
        users_admin_internal_v1 => (500, "users_admin.internal.v1", "Internal Error"),
    }
}
