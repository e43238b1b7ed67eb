//! The aggregation engine: six read-only reporting operations over a
//! [`ReportStore`]. Each operation is idempotent and side-effect-free
//! beyond the store round trip; any store failure aborts the whole
//! operation so partial aggregates are never returned.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EstateError, Result};
use crate::records::{Expense, Payment, PropertyDetails, TaskDetails, TenantDetails};
use crate::store::ReportStore;
use crate::types::{PropertyStatus, PropertyType, TaskCategory, TaskStatus};

// ---------------------------------------------------------------------------
// Aggregate shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: PropertyStatus,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityCount {
    pub facility_id: Option<Uuid>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusCount {
    pub status: TaskStatus,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyStats {
    pub total_properties: i64,
    pub by_type: Vec<TypeCount>,
    pub by_status: Vec<StatusCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantStats {
    pub total_tenants: i64,
    pub by_facility: Vec<FacilityCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub payments: Vec<Payment>,
    pub expenses: Vec<Expense>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSummary {
    pub tasks: Vec<TaskDetails>,
    pub by_status: Vec<TaskStatusCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancySummary {
    pub total_facilities: i64,
    pub occupied_facilities: i64,
    /// Fraction in `[0, 1]`, not a percentage.
    pub occupancy_rate: f64,
    pub tenants: Vec<TenantDetails>,
}

// ---------------------------------------------------------------------------
// Date range
// ---------------------------------------------------------------------------

/// Inclusive date window for the financial summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Resolve optional caller-supplied bounds against an injected `now`.
    ///
    /// Defaults are January 1 of `now`'s year and `now` itself. A supplied
    /// bound that parses as neither RFC 3339 nor `YYYY-MM-DD` is an
    /// [`EstateError::InvalidDate`]; defaults are never substituted for a
    /// malformed bound.
    pub fn resolve(start: Option<&str>, end: Option<&str>, now: DateTime<Utc>) -> Result<Self> {
        let start = match start {
            Some(raw) => parse_bound(raw)?,
            None => start_of_year(now),
        };
        let end = match end {
            Some(raw) => parse_bound(raw)?,
            None => now,
        };
        Ok(Self { start, end })
    }
}

fn parse_bound(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        // Bare dates from the dashboard's date pickers are read as
        // midnight UTC.
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    Err(EstateError::InvalidDate(raw.to_string()))
}

fn start_of_year(now: DateTime<Utc>) -> DateTime<Utc> {
    let jan1 = NaiveDate::from_ymd_opt(now.year(), 1, 1).unwrap_or_else(|| now.date_naive());
    Utc.from_utc_datetime(&jan1.and_time(NaiveTime::MIN))
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Total property count plus counts grouped by type and by status. A type
/// or status with no matching properties is omitted from its group list.
pub async fn property_stats<S: ReportStore>(store: &S) -> Result<PropertyStats> {
    let total_properties = store.count_properties().await?;
    let by_type = store
        .properties_by_type()
        .await?
        .into_iter()
        .map(|(kind, count)| TypeCount { kind, count })
        .collect();
    let by_status = store
        .properties_by_status()
        .await?
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect();
    Ok(PropertyStats {
        total_properties,
        by_type,
        by_status,
    })
}

/// Every property, enriched with owner and facility projections. No
/// filtering, no pagination.
pub async fn list_properties<S: ReportStore>(store: &S) -> Result<Vec<PropertyDetails>> {
    Ok(store.list_properties().await?)
}

/// Total tenant count plus counts grouped by facility reference, the
/// unassigned group included.
pub async fn tenant_stats<S: ReportStore>(store: &S) -> Result<TenantStats> {
    let total_tenants = store.count_tenants().await?;
    let by_facility = store
        .tenants_by_facility()
        .await?
        .into_iter()
        .map(|(facility_id, count)| FacilityCount { facility_id, count })
        .collect();
    Ok(TenantStats {
        total_tenants,
        by_facility,
    })
}

/// Payments and expenses inside the resolved window, each list ascending
/// by its date field.
pub async fn financial_summary<S: ReportStore>(
    store: &S,
    range: DateRange,
) -> Result<FinancialSummary> {
    let payments = store.payments_in_range(range.start, range.end).await?;
    let expenses = store.expenses_in_range(range.start, range.end).await?;
    Ok(FinancialSummary { payments, expenses })
}

/// Maintenance-category tasks, enriched, plus status counts over the same
/// subset. The listing and the counts share one filter predicate.
pub async fn maintenance_summary<S: ReportStore>(store: &S) -> Result<MaintenanceSummary> {
    let tasks = store.tasks_in_category(TaskCategory::Maintenance).await?;
    let by_status = store
        .task_status_counts(TaskCategory::Maintenance)
        .await?
        .into_iter()
        .map(|(status, count)| TaskStatusCount { status, count })
        .collect();
    Ok(MaintenanceSummary { tasks, by_status })
}

/// Facility totals, occupancy rate, and the enriched tenant list. The
/// rate is `occupied / total` when any facilities exist, else `0`.
pub async fn occupancy_summary<S: ReportStore>(store: &S) -> Result<OccupancySummary> {
    let total_facilities = store.count_facilities().await?;
    let occupied_facilities = store.count_occupied_facilities().await?;
    let tenants = store.list_tenants().await?;

    let occupancy_rate = if total_facilities > 0 {
        occupied_facilities as f64 / total_facilities as f64
    } else {
        0.0
    };

    Ok(OccupancySummary {
        total_facilities,
        occupied_facilities,
        occupancy_rate,
        tenants,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::MemStore;
    use crate::records::{Facility, Property, Task, Tenant, UserSummary};

    fn uuid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn owner() -> UserSummary {
        UserSummary {
            id: uuid(1),
            username: "mgreen".into(),
            first_name: "Mara".into(),
            last_name: "Green".into(),
        }
    }

    fn property(n: u128, kind: PropertyType, status: PropertyStatus) -> Property {
        Property {
            id: uuid(n),
            name: format!("Property {n}"),
            kind,
            status,
            owner_id: uuid(1),
        }
    }

    /// Store matching the reference scenario: 5 properties (3 APARTMENT,
    /// 2 HOUSE; 4 AVAILABLE, 1 RENTED).
    fn scenario_store() -> MemStore {
        let mut store = MemStore::default();
        store.users.push(owner());
        store.properties.extend([
            property(10, PropertyType::Apartment, PropertyStatus::Available),
            property(11, PropertyType::Apartment, PropertyStatus::Available),
            property(12, PropertyType::Apartment, PropertyStatus::Available),
            property(13, PropertyType::House, PropertyStatus::Available),
            property(14, PropertyType::House, PropertyStatus::Rented),
        ]);
        store
    }

    #[tokio::test]
    async fn property_stats_matches_reference_scenario() {
        let store = scenario_store();
        let stats = property_stats(&store).await.unwrap();

        assert_eq!(stats.total_properties, 5);
        let by_type: std::collections::HashMap<_, _> = stats
            .by_type
            .iter()
            .map(|g| (g.kind, g.count))
            .collect();
        assert_eq!(by_type[&PropertyType::Apartment], 3);
        assert_eq!(by_type[&PropertyType::House], 2);
        assert_eq!(by_type.len(), 2, "zero-count types must be omitted");

        let by_status: std::collections::HashMap<_, _> = stats
            .by_status
            .iter()
            .map(|g| (g.status, g.count))
            .collect();
        assert_eq!(by_status[&PropertyStatus::Available], 4);
        assert_eq!(by_status[&PropertyStatus::Rented], 1);
        assert_eq!(by_status.len(), 2, "zero-count statuses must be omitted");
    }

    #[tokio::test]
    async fn property_totals_agree_across_groupings_and_listing() {
        let store = scenario_store();
        let stats = property_stats(&store).await.unwrap();
        let listing = list_properties(&store).await.unwrap();

        let type_sum: i64 = stats.by_type.iter().map(|g| g.count).sum();
        let status_sum: i64 = stats.by_status.iter().map(|g| g.count).sum();
        assert_eq!(stats.total_properties, type_sum);
        assert_eq!(stats.total_properties, status_sum);
        assert_eq!(stats.total_properties, listing.len() as i64);
    }

    #[tokio::test]
    async fn empty_store_yields_zero_totals_and_empty_groups() {
        let store = MemStore::default();
        let stats = property_stats(&store).await.unwrap();
        assert_eq!(stats.total_properties, 0);
        assert!(stats.by_type.is_empty());
        assert!(stats.by_status.is_empty());

        let occupancy = occupancy_summary(&store).await.unwrap();
        assert_eq!(occupancy.total_facilities, 0);
        assert_eq!(occupancy.occupancy_rate, 0.0);
    }

    #[tokio::test]
    async fn tenant_stats_counts_unassigned_group_and_agrees_with_occupancy() {
        let mut store = MemStore::default();
        store.users.push(owner());
        store
            .properties
            .push(property(10, PropertyType::Apartment, PropertyStatus::Rented));
        store.facilities.push(Facility {
            id: uuid(20),
            name: "Unit 1A".into(),
            kind: "UNIT".into(),
            is_available: false,
            property_id: uuid(10),
        });
        store.tenants.extend([
            Tenant {
                id: uuid(30),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                email: None,
                facility_id: Some(uuid(20)),
            },
            Tenant {
                id: uuid(31),
                first_name: "Alan".into(),
                last_name: "Turing".into(),
                email: Some("alan@example.com".into()),
                facility_id: Some(uuid(20)),
            },
            Tenant {
                id: uuid(32),
                first_name: "Grace".into(),
                last_name: "Hopper".into(),
                email: None,
                facility_id: None,
            },
        ]);

        let stats = tenant_stats(&store).await.unwrap();
        assert_eq!(stats.total_tenants, 3);
        let group_sum: i64 = stats.by_facility.iter().map(|g| g.count).sum();
        assert_eq!(stats.total_tenants, group_sum);
        let null_group = stats
            .by_facility
            .iter()
            .find(|g| g.facility_id.is_none())
            .expect("unassigned tenants must form their own group");
        assert_eq!(null_group.count, 1);

        let occupancy = occupancy_summary(&store).await.unwrap();
        assert_eq!(occupancy.tenants.len() as i64, stats.total_tenants);
    }

    #[tokio::test]
    async fn occupancy_rate_is_occupied_over_total() {
        let mut store = MemStore::default();
        store.users.push(owner());
        store
            .properties
            .push(property(10, PropertyType::Apartment, PropertyStatus::Rented));
        for n in 0..10u128 {
            store.facilities.push(Facility {
                id: uuid(100 + n),
                name: format!("Unit {n}"),
                kind: "UNIT".into(),
                is_available: n >= 6,
                property_id: uuid(10),
            });
        }

        let occupancy = occupancy_summary(&store).await.unwrap();
        assert_eq!(occupancy.total_facilities, 10);
        assert_eq!(occupancy.occupied_facilities, 6);
        assert_eq!(occupancy.occupancy_rate, 0.6);
        assert!((0.0..=1.0).contains(&occupancy.occupancy_rate));
    }

    #[tokio::test]
    async fn maintenance_listing_and_counts_share_one_predicate() {
        let mut store = MemStore::default();
        store.users.push(owner());
        store
            .properties
            .push(property(10, PropertyType::House, PropertyStatus::Rented));
        let task = |n: u128, category, status| Task {
            id: uuid(200 + n),
            title: format!("Task {n}"),
            category,
            status,
            property_id: uuid(10),
            facility_id: None,
            assigned_to: Some(uuid(1)),
        };
        store.tasks.extend([
            task(0, TaskCategory::Maintenance, TaskStatus::Open),
            task(1, TaskCategory::Maintenance, TaskStatus::Open),
            task(2, TaskCategory::Maintenance, TaskStatus::Completed),
            task(3, TaskCategory::Cleaning, TaskStatus::Open),
            task(4, TaskCategory::Inspection, TaskStatus::Completed),
        ]);

        let summary = maintenance_summary(&store).await.unwrap();
        assert!(summary
            .tasks
            .iter()
            .all(|t| t.category == TaskCategory::Maintenance));

        for group in &summary.by_status {
            let listed = summary
                .tasks
                .iter()
                .filter(|t| t.status == group.status)
                .count() as i64;
            assert_eq!(listed, group.count, "status {}", group.status);
        }
        let count_sum: i64 = summary.by_status.iter().map(|g| g.count).sum();
        assert_eq!(count_sum, summary.tasks.len() as i64);
    }

    fn financial_store() -> MemStore {
        let mut store = MemStore::default();
        store.payments.extend([
            Payment {
                id: uuid(300),
                amount: 1200.0,
                payment_date: ts("2024-01-05T10:00:00Z"),
            },
            Payment {
                id: uuid(301),
                amount: 890.5,
                payment_date: ts("2024-01-31T00:00:00Z"),
            },
            Payment {
                id: uuid(302),
                amount: 1200.0,
                payment_date: ts("2024-02-01T09:00:00Z"),
            },
        ]);
        store.expenses.extend([
            Expense {
                id: uuid(310),
                amount: 75.0,
                expense_date: ts("2024-01-20T12:00:00Z"),
            },
            Expense {
                id: uuid(311),
                amount: 40.0,
                expense_date: ts("2024-01-02T08:00:00Z"),
            },
        ]);
        store
    }

    #[tokio::test]
    async fn financial_summary_applies_inclusive_bounds() {
        let store = financial_store();
        let range = DateRange::resolve(
            Some("2024-01-01"),
            Some("2024-01-31"),
            ts("2024-06-01T00:00:00Z"),
        )
        .unwrap();

        let summary = financial_summary(&store, range).await.unwrap();
        let ids: Vec<Uuid> = summary.payments.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![uuid(300), uuid(301)], "2024-02-01 is out of range");
        assert_eq!(summary.expenses.len(), 2);
    }

    #[tokio::test]
    async fn financial_summary_orders_ascending_and_is_idempotent() {
        let store = financial_store();
        let range = DateRange::resolve(None, None, ts("2024-12-31T00:00:00Z")).unwrap();

        let first = financial_summary(&store, range).await.unwrap();
        let second = financial_summary(&store, range).await.unwrap();
        assert_eq!(first, second);

        for pair in first.payments.windows(2) {
            assert!(pair[0].payment_date <= pair[1].payment_date);
        }
        for pair in first.expenses.windows(2) {
            assert!(pair[0].expense_date <= pair[1].expense_date);
        }
    }

    #[test]
    fn date_range_defaults_to_start_of_year_and_now() {
        let now = ts("2024-07-15T12:30:00Z");
        let range = DateRange::resolve(None, None, now).unwrap();
        assert_eq!(range.start, ts("2024-01-01T00:00:00Z"));
        assert_eq!(range.end, now);
    }

    #[test]
    fn date_range_accepts_rfc3339_and_bare_dates() {
        let now = ts("2024-07-15T12:30:00Z");
        let range = DateRange::resolve(
            Some("2024-03-01T06:00:00+02:00"),
            Some("2024-04-01"),
            now,
        )
        .unwrap();
        assert_eq!(range.start, ts("2024-03-01T04:00:00Z"));
        assert_eq!(range.end, ts("2024-04-01T00:00:00Z"));
    }

    #[test]
    fn date_range_rejects_unparseable_bounds() {
        let now = ts("2024-07-15T12:30:00Z");
        let err = DateRange::resolve(Some("not-a-date"), None, now).unwrap_err();
        assert!(matches!(err, EstateError::InvalidDate(_)));
        let err = DateRange::resolve(None, Some("31/01/2024"), now).unwrap_err();
        assert!(matches!(err, EstateError::InvalidDate(_)));
    }

    #[test]
    fn aggregates_serialize_with_dashboard_wire_keys() {
        let stats = PropertyStats {
            total_properties: 5,
            by_type: vec![TypeCount {
                kind: PropertyType::Apartment,
                count: 3,
            }],
            by_status: vec![StatusCount {
                status: PropertyStatus::Available,
                count: 4,
            }],
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalProperties"], 5);
        assert_eq!(json["byType"][0]["type"], "APARTMENT");
        assert_eq!(json["byStatus"][0]["status"], "AVAILABLE");

        let tenant_stats = TenantStats {
            total_tenants: 1,
            by_facility: vec![FacilityCount {
                facility_id: None,
                count: 1,
            }],
        };
        let json = serde_json::to_value(&tenant_stats).unwrap();
        assert!(json["byFacility"][0]["facilityId"].is_null());
    }
}
