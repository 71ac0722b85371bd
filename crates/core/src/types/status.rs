//! Status and classification enums shared across the platform.

use serde::{Deserialize, Serialize};

/// Order status as reported by the Provider.
///
/// The Provider owns order state; this enum mirrors its published values and
/// folds anything unrecognized into [`OrderStatus::Unknown`] rather than
/// failing deserialization (the Provider's schema is not contractually
/// stable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Parse a status string, folding unrecognized values into `Unknown`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "PENDING" => Self::Pending,
            "CONFIRMED" => Self::Confirmed,
            "PROCESSING" => Self::Processing,
            "SHIPPED" => Self::Shipped,
            "DELIVERED" => Self::Delivered,
            "CANCELLED" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Processing => "PROCESSING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// Cannabis strain classification.
///
/// The Provider omits this field for some catalog entries; absent values
/// default to `Hybrid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrainType {
    Indica,
    Sativa,
    #[default]
    Hybrid,
}

/// Actor role with different permission levels.
///
/// Roles travel inside the session payload, not in their own column, so
/// there is no database mapping here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform operator: manages tenants across the platform.
    SuperAdmin,
    /// Staff of a single tenant: manages that tenant's settings and orders.
    TenantAdmin,
    /// A patient shopping on a tenant storefront.
    Customer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::TenantAdmin => write!(f, "tenant_admin"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "tenant_admin" => Ok(Self::TenantAdmin),
            "customer" => Ok(Self::Customer),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_unknown_fallback() {
        let status: OrderStatus = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(status, OrderStatus::Unknown);
    }

    #[test]
    fn test_order_status_known_values() {
        let status: OrderStatus = serde_json::from_str("\"SHIPPED\"").unwrap();
        assert_eq!(status, OrderStatus::Shipped);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"SHIPPED\"");
    }

    #[test]
    fn test_strain_type_default_is_hybrid() {
        assert_eq!(StrainType::default(), StrainType::Hybrid);
    }

    #[test]
    fn test_role_roundtrip() {
        let role: Role = "tenant_admin".parse().unwrap();
        assert_eq!(role, Role::TenantAdmin);
        assert_eq!(role.to_string(), "tenant_admin");
        assert!("owner".parse::<Role>().is_err());
    }
}
