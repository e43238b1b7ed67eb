//! Postgres implementation of the report store port.
//!
//! Enumerated columns are stored as TEXT and parsed on read; a value the
//! domain does not recognize is a query failure, never a silent default.
//! Queries use the runtime sqlx API so the crate builds without a live
//! database.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use estate_core::error::StoreError;
use estate_core::records::{
    Expense, Facility, FacilityRef, FacilitySummary, Payment, PropertyDetails, PropertyRef,
    TaskDetails, TenantDetails, UserSummary,
};
use estate_core::store::ReportStore;
use estate_core::types::{PropertyStatus, PropertyType, TaskCategory, TaskStatus};

/// Embedded schema migrations, applied once at startup.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

/// Connection-level failures mean the store is unreachable; everything
/// else is a rejected query.
fn store_err(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => StoreError::Unavailable(err.to_string()),
        _ => StoreError::Query(err.to_string()),
    }
}

fn parse_err(err: impl std::fmt::Display) -> StoreError {
    StoreError::Query(err.to_string())
}

// ---------------------------------------------------------------------------
// Row shapes
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct PropertyRow {
    id: Uuid,
    name: String,
    kind: String,
    status: String,
    owner_id: Uuid,
    owner_username: String,
    owner_first_name: String,
    owner_last_name: String,
}

#[derive(sqlx::FromRow)]
struct FacilityRow {
    id: Uuid,
    name: String,
    kind: String,
    is_available: bool,
    property_id: Uuid,
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    amount: f64,
    payment_date: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct ExpenseRow {
    id: Uuid,
    amount: f64,
    expense_date: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    category: String,
    status: String,
    property_id: Uuid,
    property_name: String,
    facility_id: Option<Uuid>,
    facility_name: Option<String>,
    assignee_id: Option<Uuid>,
    assignee_username: Option<String>,
    assignee_first_name: Option<String>,
    assignee_last_name: Option<String>,
}

#[derive(sqlx::FromRow)]
struct TenantRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: Option<String>,
    facility_id: Option<Uuid>,
    facility_name: Option<String>,
    facility_kind: Option<String>,
    facility_is_available: Option<bool>,
    facility_property_id: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// ReportStore
// ---------------------------------------------------------------------------

impl ReportStore for PgStore {
    async fn count_properties(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM properties")
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)
    }

    async fn properties_by_type(&self) -> Result<Vec<(PropertyType, i64)>, StoreError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT kind, COUNT(*) FROM properties GROUP BY kind ORDER BY kind")
                .fetch_all(&self.pool)
                .await
                .map_err(store_err)?;

        rows.into_iter()
            .map(|(kind, count)| Ok((kind.parse::<PropertyType>().map_err(parse_err)?, count)))
            .collect()
    }

    async fn properties_by_status(&self) -> Result<Vec<(PropertyStatus, i64)>, StoreError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM properties GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        rows.into_iter()
            .map(|(status, count)| {
                Ok((status.parse::<PropertyStatus>().map_err(parse_err)?, count))
            })
            .collect()
    }

    async fn list_properties(&self) -> Result<Vec<PropertyDetails>, StoreError> {
        let properties: Vec<PropertyRow> = sqlx::query_as(
            "SELECT p.id, p.name, p.kind, p.status, \
                    u.id AS owner_id, u.username AS owner_username, \
                    u.first_name AS owner_first_name, u.last_name AS owner_last_name \
             FROM properties p \
             INNER JOIN users u ON u.id = p.owner_id \
             ORDER BY p.name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        // One batch read instead of a facility query per property.
        let facilities: Vec<FacilityRow> = sqlx::query_as(
            "SELECT id, name, kind, is_available, property_id FROM facilities ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        let mut by_property: HashMap<Uuid, Vec<FacilitySummary>> = HashMap::new();
        for f in facilities {
            by_property
                .entry(f.property_id)
                .or_default()
                .push(FacilitySummary {
                    id: f.id,
                    name: f.name,
                    kind: f.kind,
                    is_available: f.is_available,
                });
        }

        properties
            .into_iter()
            .map(|row| {
                Ok(PropertyDetails {
                    id: row.id,
                    name: row.name,
                    kind: row.kind.parse().map_err(parse_err)?,
                    status: row.status.parse().map_err(parse_err)?,
                    owner: UserSummary {
                        id: row.owner_id,
                        username: row.owner_username,
                        first_name: row.owner_first_name,
                        last_name: row.owner_last_name,
                    },
                    facilities: by_property.remove(&row.id).unwrap_or_default(),
                })
            })
            .collect()
    }

    async fn count_tenants(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tenants")
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)
    }

    async fn tenants_by_facility(&self) -> Result<Vec<(Option<Uuid>, i64)>, StoreError> {
        sqlx::query_as(
            "SELECT facility_id, COUNT(*) FROM tenants GROUP BY facility_id ORDER BY facility_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)
    }

    async fn payments_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Payment>, StoreError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(
            "SELECT id, amount, payment_date FROM payments \
             WHERE payment_date >= $1 AND payment_date <= $2 \
             ORDER BY payment_date",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows
            .into_iter()
            .map(|row| Payment {
                id: row.id,
                amount: row.amount,
                payment_date: row.payment_date,
            })
            .collect())
    }

    async fn expenses_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>, StoreError> {
        let rows: Vec<ExpenseRow> = sqlx::query_as(
            "SELECT id, amount, expense_date FROM expenses \
             WHERE expense_date >= $1 AND expense_date <= $2 \
             ORDER BY expense_date",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows
            .into_iter()
            .map(|row| Expense {
                id: row.id,
                amount: row.amount,
                expense_date: row.expense_date,
            })
            .collect())
    }

    async fn tasks_in_category(
        &self,
        category: TaskCategory,
    ) -> Result<Vec<TaskDetails>, StoreError> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            "SELECT t.id, t.title, t.category, t.status, \
                    p.id AS property_id, p.name AS property_name, \
                    f.id AS facility_id, f.name AS facility_name, \
                    u.id AS assignee_id, u.username AS assignee_username, \
                    u.first_name AS assignee_first_name, u.last_name AS assignee_last_name \
             FROM tasks t \
             INNER JOIN properties p ON p.id = t.property_id \
             LEFT JOIN facilities f ON f.id = t.facility_id \
             LEFT JOIN users u ON u.id = t.assigned_to \
             WHERE t.category = $1 \
             ORDER BY t.title",
        )
        .bind(category.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        rows.into_iter()
            .map(|row| {
                let facility = row.facility_id.map(|id| FacilityRef {
                    id,
                    name: row.facility_name.clone().unwrap_or_default(),
                });
                let assigned_to = row.assignee_id.map(|id| UserSummary {
                    id,
                    username: row.assignee_username.clone().unwrap_or_default(),
                    first_name: row.assignee_first_name.clone().unwrap_or_default(),
                    last_name: row.assignee_last_name.clone().unwrap_or_default(),
                });
                Ok(TaskDetails {
                    id: row.id,
                    title: row.title,
                    category: row.category.parse().map_err(parse_err)?,
                    status: row.status.parse().map_err(parse_err)?,
                    property: PropertyRef {
                        id: row.property_id,
                        name: row.property_name,
                    },
                    facility,
                    assigned_to,
                })
            })
            .collect()
    }

    async fn task_status_counts(
        &self,
        category: TaskCategory,
    ) -> Result<Vec<(TaskStatus, i64)>, StoreError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM tasks WHERE category = $1 \
             GROUP BY status ORDER BY status",
        )
        .bind(category.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        rows.into_iter()
            .map(|(status, count)| Ok((status.parse::<TaskStatus>().map_err(parse_err)?, count)))
            .collect()
    }

    async fn count_facilities(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM facilities")
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)
    }

    async fn count_occupied_facilities(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM facilities WHERE is_available = FALSE")
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)
    }

    async fn list_tenants(&self) -> Result<Vec<TenantDetails>, StoreError> {
        let rows: Vec<TenantRow> = sqlx::query_as(
            "SELECT t.id, t.first_name, t.last_name, t.email, \
                    f.id AS facility_id, f.name AS facility_name, f.kind AS facility_kind, \
                    f.is_available AS facility_is_available, \
                    f.property_id AS facility_property_id \
             FROM tenants t \
             LEFT JOIN facilities f ON f.id = t.facility_id \
             ORDER BY t.last_name, t.first_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let facility = row.facility_id.map(|id| Facility {
                    id,
                    name: row.facility_name.clone().unwrap_or_default(),
                    kind: row.facility_kind.clone().unwrap_or_default(),
                    is_available: row.facility_is_available.unwrap_or_default(),
                    property_id: row.facility_property_id.unwrap_or_default(),
                });
                TenantDetails {
                    id: row.id,
                    first_name: row.first_name,
                    last_name: row.last_name,
                    email: row.email,
                    facility,
                }
            })
            .collect())
    }
}
