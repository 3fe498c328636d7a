use adminkit::ProblemResponse;

use crate::domain::error::DomainError;
use crate::errors::ErrorCode;

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(
    e: &DomainError,
    instance: &str,
    request_id: Option<String>,
) -> ProblemResponse {
    match e {
        DomainError::UserNotFound { hash } => ErrorCode::users_admin_user_not_found_v1
            .to_response(
                format!("User with hash '{hash}' was not found"),
                instance,
                request_id,
            ),
        DomainError::EmailAlreadyExists { email } => {
            ErrorCode::users_admin_user_email_conflict_v1.to_response(
                format!("Email '{email}' is already in use"),
                instance,
                request_id,
            )
        }
        DomainError::Validation { field, message } => ErrorCode::users_admin_user_validation_v1
            .to_response(message.clone(), instance, request_id)
            .with_field_error(field, message.clone()),
        DomainError::RoleNotFound { hash } => {
            let detail = format!("Role '{hash}' does not exist");
            ErrorCode::users_admin_role_not_found_v1
                .to_response(detail.clone(), instance, request_id)
                .with_field_error("role", detail)
        }
        DomainError::Mailer { .. } => {
            tracing::error!(error = ?e, "Mail gateway error");
            ErrorCode::users_admin_mail_unavailable_v1.to_response(
                "The user was saved but the password mail could not be delivered",
                instance,
                request_id,
            )
        }
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            ErrorCode::users_admin_internal_database_v1.to_response(
                "An internal database error occurred",
                instance,
                request_id,
            )
        }
        DomainError::GenerationExhausted { .. } | DomainError::PasswordHash { .. } => {
            tracing::error!(error = ?e, "Internal error");
            ErrorCode::users_admin_internal_v1.to_response(
                "An internal error occurred",
                instance,
                request_id,
            )
        }
    }
}
