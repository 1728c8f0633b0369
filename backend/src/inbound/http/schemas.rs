//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers here mirror their wire shape so utoipa can document them under
//! the domain type's name.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No valid session accompanies the request.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The caller's role does not permit the action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// An unexpected fault on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Shipment not found")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details; never present on internal errors.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::ShipmentStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ShipmentStatus)]
pub enum ShipmentStatusSchema {
    Created,
    PickedUp,
    InTransit,
    OutForDelivery,
    Delivered,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShipmentStatus;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_schema_is_named_after_domain_error() {
        let schema_json = schema_to_json::<ErrorSchema>();
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_json.contains("traceId"), "traceId is camelCase");
        assert!(schema_json.contains("message"));
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in ["invalid_request", "unauthorized", "forbidden", "internal_error"] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn status_schema_matches_domain_names() {
        let schema_json = schema_to_json::<ShipmentStatusSchema>();
        for status in ShipmentStatus::ALL {
            assert!(
                schema_json.contains(status.as_str()),
                "missing {}",
                status.as_str()
            );
        }
    }
}
