//! In-memory [`ReportStore`] over plain vectors. Backs unit and
//! integration tests and Postgres-free local runs; group-bys are computed
//! with hash maps and listings are returned in a deterministic order.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::records::{
    Expense, Facility, FacilityRef, FacilitySummary, Payment, Property, PropertyDetails,
    PropertyRef, Task, TaskDetails, Tenant, TenantDetails, UserSummary,
};
use crate::store::ReportStore;
use crate::types::{PropertyStatus, PropertyType, TaskCategory, TaskStatus};

#[derive(Debug, Clone, Default)]
pub struct MemStore {
    pub users: Vec<UserSummary>,
    pub properties: Vec<Property>,
    pub facilities: Vec<Facility>,
    pub tenants: Vec<Tenant>,
    pub payments: Vec<Payment>,
    pub expenses: Vec<Expense>,
    pub tasks: Vec<Task>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn user(&self, id: Uuid) -> Result<UserSummary, StoreError> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| StoreError::Query(format!("user not found: {id}")))
    }

    fn facility(&self, id: Uuid) -> Result<Facility, StoreError> {
        self.facilities
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| StoreError::Query(format!("facility not found: {id}")))
    }
}

impl ReportStore for MemStore {
    async fn count_properties(&self) -> Result<i64, StoreError> {
        Ok(self.properties.len() as i64)
    }

    async fn properties_by_type(&self) -> Result<Vec<(PropertyType, i64)>, StoreError> {
        let mut groups: HashMap<PropertyType, i64> = HashMap::new();
        for property in &self.properties {
            *groups.entry(property.kind).or_default() += 1;
        }
        let mut out: Vec<_> = groups.into_iter().collect();
        out.sort_by_key(|(kind, _)| *kind);
        Ok(out)
    }

    async fn properties_by_status(&self) -> Result<Vec<(PropertyStatus, i64)>, StoreError> {
        let mut groups: HashMap<PropertyStatus, i64> = HashMap::new();
        for property in &self.properties {
            *groups.entry(property.status).or_default() += 1;
        }
        let mut out: Vec<_> = groups.into_iter().collect();
        out.sort_by_key(|(status, _)| *status);
        Ok(out)
    }

    async fn list_properties(&self) -> Result<Vec<PropertyDetails>, StoreError> {
        let mut properties = self.properties.clone();
        properties.sort_by(|a, b| a.name.cmp(&b.name));

        properties
            .into_iter()
            .map(|property| {
                let owner = self.user(property.owner_id)?;
                let mut facilities: Vec<FacilitySummary> = self
                    .facilities
                    .iter()
                    .filter(|f| f.property_id == property.id)
                    .map(|f| FacilitySummary {
                        id: f.id,
                        name: f.name.clone(),
                        kind: f.kind.clone(),
                        is_available: f.is_available,
                    })
                    .collect();
                facilities.sort_by(|a, b| a.name.cmp(&b.name));
                Ok(PropertyDetails {
                    id: property.id,
                    name: property.name,
                    kind: property.kind,
                    status: property.status,
                    owner,
                    facilities,
                })
            })
            .collect()
    }

    async fn count_tenants(&self) -> Result<i64, StoreError> {
        Ok(self.tenants.len() as i64)
    }

    async fn tenants_by_facility(&self) -> Result<Vec<(Option<Uuid>, i64)>, StoreError> {
        let mut groups: HashMap<Option<Uuid>, i64> = HashMap::new();
        for tenant in &self.tenants {
            *groups.entry(tenant.facility_id).or_default() += 1;
        }
        let mut out: Vec<_> = groups.into_iter().collect();
        out.sort_by_key(|(facility_id, _)| *facility_id);
        Ok(out)
    }

    async fn payments_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Payment>, StoreError> {
        let mut payments: Vec<Payment> = self
            .payments
            .iter()
            .filter(|p| p.payment_date >= start && p.payment_date <= end)
            .cloned()
            .collect();
        payments.sort_by_key(|p| p.payment_date);
        Ok(payments)
    }

    async fn expenses_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>, StoreError> {
        let mut expenses: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|e| e.expense_date >= start && e.expense_date <= end)
            .cloned()
            .collect();
        expenses.sort_by_key(|e| e.expense_date);
        Ok(expenses)
    }

    async fn tasks_in_category(
        &self,
        category: TaskCategory,
    ) -> Result<Vec<TaskDetails>, StoreError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| t.category == category)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.title.cmp(&b.title));

        tasks
            .into_iter()
            .map(|task| {
                let property = self
                    .properties
                    .iter()
                    .find(|p| p.id == task.property_id)
                    .map(|p| PropertyRef {
                        id: p.id,
                        name: p.name.clone(),
                    })
                    .ok_or_else(|| {
                        StoreError::Query(format!("property not found: {}", task.property_id))
                    })?;
                let facility = task
                    .facility_id
                    .map(|id| {
                        self.facility(id).map(|f| FacilityRef {
                            id: f.id,
                            name: f.name,
                        })
                    })
                    .transpose()?;
                let assigned_to = task.assigned_to.map(|id| self.user(id)).transpose()?;
                Ok(TaskDetails {
                    id: task.id,
                    title: task.title,
                    category: task.category,
                    status: task.status,
                    property,
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
        let mut groups: HashMap<TaskStatus, i64> = HashMap::new();
        for task in self.tasks.iter().filter(|t| t.category == category) {
            *groups.entry(task.status).or_default() += 1;
        }
        let mut out: Vec<_> = groups.into_iter().collect();
        out.sort_by_key(|(status, _)| *status);
        Ok(out)
    }

    async fn count_facilities(&self) -> Result<i64, StoreError> {
        Ok(self.facilities.len() as i64)
    }

    async fn count_occupied_facilities(&self) -> Result<i64, StoreError> {
        Ok(self.facilities.iter().filter(|f| !f.is_available).count() as i64)
    }

    async fn list_tenants(&self) -> Result<Vec<TenantDetails>, StoreError> {
        let mut tenants = self.tenants.clone();
        tenants.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });

        tenants
            .into_iter()
            .map(|tenant| {
                let facility = tenant.facility_id.map(|id| self.facility(id)).transpose()?;
                Ok(TenantDetails {
                    id: tenant.id,
                    first_name: tenant.first_name,
                    last_name: tenant.last_name,
                    email: tenant.email,
                    facility,
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PropertyStatus, PropertyType};

    fn uuid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[tokio::test]
    async fn group_bys_only_contain_observed_values() {
        let mut store = MemStore::default();
        store.users.push(UserSummary {
            id: uuid(1),
            username: "mgreen".into(),
            first_name: "Mara".into(),
            last_name: "Green".into(),
        });
        store.properties.push(Property {
            id: uuid(2),
            name: "Lone House".into(),
            kind: PropertyType::House,
            status: PropertyStatus::Rented,
            owner_id: uuid(1),
        });

        let by_type = store.properties_by_type().await.unwrap();
        assert_eq!(by_type, vec![(PropertyType::House, 1)]);
        let by_status = store.properties_by_status().await.unwrap();
        assert_eq!(by_status, vec![(PropertyStatus::Rented, 1)]);
    }

    #[tokio::test]
    async fn listing_fails_when_owner_reference_is_dangling() {
        let mut store = MemStore::default();
        store.properties.push(Property {
            id: uuid(2),
            name: "Orphaned".into(),
            kind: PropertyType::Apartment,
            status: PropertyStatus::Available,
            owner_id: uuid(99),
        });

        let err = store.list_properties().await.unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));
    }

    #[tokio::test]
    async fn listings_are_deterministically_ordered() {
        let mut store = MemStore::default();
        store.users.push(UserSummary {
            id: uuid(1),
            username: "mgreen".into(),
            first_name: "Mara".into(),
            last_name: "Green".into(),
        });
        for (n, name) in [(2u128, "Zenith Tower"), (3, "Alder Court")] {
            store.properties.push(Property {
                id: uuid(n),
                name: name.into(),
                kind: PropertyType::Apartment,
                status: PropertyStatus::Available,
                owner_id: uuid(1),
            });
        }

        let listing = store.list_properties().await.unwrap();
        let names: Vec<_> = listing.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alder Court", "Zenith Tower"]);
    }
}
