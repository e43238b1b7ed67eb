//! The store port. Reporting operations read through this trait so the
//! engine can be retargeted to a different store technology without
//! changing operation contracts.
//!
//! Grouped counts are a capability the store exposes (its native
//! group-by), not client-side aggregation: a group-by method returns only
//! observed values, never zero-count groups. The exception is the three
//! enriched listings, which read full rows because callers need the
//! composed structures, not just counts.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::records::{Expense, Payment, PropertyDetails, TaskDetails, TenantDetails};
use crate::types::{PropertyStatus, PropertyType, TaskCategory, TaskStatus};

pub trait ReportStore: Send + Sync + 'static {
    fn count_properties(&self) -> impl Future<Output = Result<i64, StoreError>> + Send;

    fn properties_by_type(
        &self,
    ) -> impl Future<Output = Result<Vec<(PropertyType, i64)>, StoreError>> + Send;

    fn properties_by_status(
        &self,
    ) -> impl Future<Output = Result<Vec<(PropertyStatus, i64)>, StoreError>> + Send;

    /// Full-table read, each property enriched with its owner and
    /// facility projections.
    fn list_properties(
        &self,
    ) -> impl Future<Output = Result<Vec<PropertyDetails>, StoreError>> + Send;

    fn count_tenants(&self) -> impl Future<Output = Result<i64, StoreError>> + Send;

    /// Tenant counts grouped by facility reference. Unassigned tenants
    /// group under `None`.
    fn tenants_by_facility(
        &self,
    ) -> impl Future<Output = Result<Vec<(Option<Uuid>, i64)>, StoreError>> + Send;

    /// Payments with `start <= payment_date <= end`, ascending by date.
    fn payments_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Payment>, StoreError>> + Send;

    /// Expenses with `start <= expense_date <= end`, ascending by date.
    fn expenses_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Expense>, StoreError>> + Send;

    /// Tasks in the given category, enriched. Must apply the same filter
    /// predicate as `task_status_counts`.
    fn tasks_in_category(
        &self,
        category: TaskCategory,
    ) -> impl Future<Output = Result<Vec<TaskDetails>, StoreError>> + Send;

    /// Task counts by status, restricted to the given category.
    fn task_status_counts(
        &self,
        category: TaskCategory,
    ) -> impl Future<Output = Result<Vec<(TaskStatus, i64)>, StoreError>> + Send;

    fn count_facilities(&self) -> impl Future<Output = Result<i64, StoreError>> + Send;

    /// Facilities with `is_available = false`.
    fn count_occupied_facilities(&self) -> impl Future<Output = Result<i64, StoreError>> + Send;

    /// Every tenant, enriched with its facility record when assigned.
    fn list_tenants(&self) -> impl Future<Output = Result<Vec<TenantDetails>, StoreError>> + Send;
}
