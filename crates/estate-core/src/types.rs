use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// PropertyType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    Apartment,
    House,
    Commercial,
    Land,
}

impl PropertyType {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::Apartment => "APARTMENT",
            PropertyType::House => "HOUSE",
            PropertyType::Commercial => "COMMERCIAL",
            PropertyType::Land => "LAND",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PropertyType {
    type Err = crate::error::EstateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APARTMENT" => Ok(PropertyType::Apartment),
            "HOUSE" => Ok(PropertyType::House),
            "COMMERCIAL" => Ok(PropertyType::Commercial),
            "LAND" => Ok(PropertyType::Land),
            _ => Err(crate::error::EstateError::InvalidPropertyType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// PropertyStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    Available,
    Rented,
    Maintenance,
    Inactive,
}

impl PropertyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyStatus::Available => "AVAILABLE",
            PropertyStatus::Rented => "RENTED",
            PropertyStatus::Maintenance => "MAINTENANCE",
            PropertyStatus::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PropertyStatus {
    type Err = crate::error::EstateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(PropertyStatus::Available),
            "RENTED" => Ok(PropertyStatus::Rented),
            "MAINTENANCE" => Ok(PropertyStatus::Maintenance),
            "INACTIVE" => Ok(PropertyStatus::Inactive),
            _ => Err(crate::error::EstateError::InvalidPropertyStatus(
                s.to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// TaskCategory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskCategory {
    Maintenance,
    Cleaning,
    Inspection,
    Other,
}

impl TaskCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskCategory::Maintenance => "MAINTENANCE",
            TaskCategory::Cleaning => "CLEANING",
            TaskCategory::Inspection => "INSPECTION",
            TaskCategory::Other => "OTHER",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = crate::error::EstateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MAINTENANCE" => Ok(TaskCategory::Maintenance),
            "CLEANING" => Ok(TaskCategory::Cleaning),
            "INSPECTION" => Ok(TaskCategory::Inspection),
            "OTHER" => Ok(TaskCategory::Other),
            _ => Err(crate::error::EstateError::InvalidTaskCategory(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Open => "OPEN",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = crate::error::EstateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(TaskStatus::Open),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "COMPLETED" => Ok(TaskStatus::Completed),
            "CANCELLED" => Ok(TaskStatus::Cancelled),
            _ => Err(crate::error::EstateError::InvalidTaskStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_type_round_trips_through_str() {
        for kind in [
            PropertyType::Apartment,
            PropertyType::House,
            PropertyType::Commercial,
            PropertyType::Land,
        ] {
            assert_eq!(kind.as_str().parse::<PropertyType>().unwrap(), kind);
        }
    }

    #[test]
    fn task_status_round_trips_through_str() {
        for status in [
            TaskStatus::Open,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_property_type_is_rejected() {
        assert!("CASTLE".parse::<PropertyType>().is_err());
    }

    #[test]
    fn unknown_task_status_is_rejected() {
        assert!("in_progress".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn enums_serialize_as_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&PropertyType::Apartment).unwrap(),
            "\"APARTMENT\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
    }
}
