//! Explicit action-to-capability table, checked once per request at the
//! handler boundary. The services layer never looks at roles.

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

use crate::auth::Claims;

/// Actions that require the admin role. Everything else only needs a
/// valid token (the extractor already enforced that).
const ADMIN_ACTIONS: &[&str] = &[
    "city.create",
    "city.update",
    "city.delete",
    "arrival_point.create",
    "arrival_point.delete",
    "carriage_type.create",
    "carriage.create",
    "route.create",
    "discount_type.create",
    "order.patch",
    "user.list",
    "user.retrieve",
];

pub fn required_role(action: &str) -> Option<&'static str> {
    if ADMIN_ACTIONS.contains(&action) {
        Some("admin")
    } else {
        None
    }
}

pub fn authorize(claims: &Claims, action: &str) -> Result<(), (StatusCode, Json<Value>)> {
    if let Some(role) = required_role(action) {
        if claims.role != role {
            return Err((
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": format!("'{}' requires the {} role", action, role)
                })),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::required_role;

    #[test]
    fn mutating_reference_data_is_admin_only() {
        assert_eq!(required_role("route.create"), Some("admin"));
        assert_eq!(required_role("order.patch"), Some("admin"));
        assert_eq!(required_role("ticket.purchase"), None);
        assert_eq!(required_role("order.buy"), None);
    }
}
