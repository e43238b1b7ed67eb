//! Store-owned records and the fixed projection shapes embedded in report
//! listings. The engine never mutates any of these; lifecycle ownership
//! belongs to the store's write paths.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{PropertyStatus, PropertyType, TaskCategory, TaskStatus};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub status: PropertyStatus,
    pub owner_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_available: bool,
    pub property_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub facility_id: Option<Uuid>,
}

/// Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub amount: f64,
    pub payment_date: DateTime<Utc>,
}

/// Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub amount: f64,
    pub expense_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub category: TaskCategory,
    pub status: TaskStatus,
    pub property_id: Uuid,
    pub facility_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// Owner / assignee projection. The engine never reads full user records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Facility projection embedded in the property listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilitySummary {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityRef {
    pub id: Uuid,
    pub name: String,
}

/// A property enriched with its owner and facility projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub status: PropertyStatus,
    pub owner: UserSummary,
    pub facilities: Vec<FacilitySummary>,
}

/// A task enriched with minimal property, facility, and assignee projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetails {
    pub id: Uuid,
    pub title: String,
    pub category: TaskCategory,
    pub status: TaskStatus,
    pub property: PropertyRef,
    pub facility: Option<FacilityRef>,
    pub assigned_to: Option<UserSummary>,
}

/// A tenant enriched with its full facility record, if assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantDetails {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub facility: Option<Facility>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PropertyStatus, PropertyType};

    #[test]
    fn property_serializes_with_camel_case_and_type_key() {
        let property = Property {
            id: Uuid::nil(),
            name: "Sunset Apartments".into(),
            kind: PropertyType::Apartment,
            status: PropertyStatus::Available,
            owner_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&property).unwrap();
        assert_eq!(json["type"], "APARTMENT");
        assert_eq!(json["status"], "AVAILABLE");
        assert!(json.get("ownerId").is_some());
        assert!(json.get("owner_id").is_none());
    }

    #[test]
    fn tenant_details_serializes_null_facility() {
        let tenant = TenantDetails {
            id: Uuid::nil(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: None,
            facility: None,
        };
        let json = serde_json::to_value(&tenant).unwrap();
        assert!(json["facility"].is_null());
    }
}
