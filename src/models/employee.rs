//! Employee model and related types.
//!
//! This module defines the Employee struct and the Role enum used to
//! group schedule rows into department sections.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Staff role, which doubles as the department grouping key for the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Restaurant and shift managers.
    Manager,
    /// Head and sous chefs.
    Chef,
    /// Line cooks.
    Cook,
    /// Kitchen porters and dish staff.
    KitchenPorter,
    /// Floor waiters.
    Waiter,
    /// Hosts and greeters.
    Host,
    /// Bar staff.
    Bartender,
    /// Cleaning staff.
    Cleaner,
}

impl Role {
    /// Returns the department label shown as the grid group header.
    pub fn department_label(&self) -> &'static str {
        match self {
            Role::Manager => "Managers",
            Role::Chef => "Chefs",
            Role::Cook => "Cooks",
            Role::KitchenPorter => "Kitchen Porters",
            Role::Waiter => "Waiters",
            Role::Host => "Hosts",
            Role::Bartender => "Bartenders",
            Role::Cleaner => "Cleaning",
        }
    }

    /// Returns the display order of this role's department group.
    pub fn department_order(&self) -> u8 {
        match self {
            Role::Manager => 0,
            Role::Chef => 1,
            Role::Cook => 2,
            Role::KitchenPorter => 3,
            Role::Waiter => 4,
            Role::Host => 5,
            Role::Bartender => 6,
            Role::Cleaner => 7,
        }
    }
}

/// Represents a rostered member of staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Full display name.
    pub full_name: String,
    /// The employee's role, used for department grouping and sector filters.
    pub role: Role,
    /// Hourly rate used for labor cost totals.
    pub hourly_rate: Decimal,
    /// Whether the employee is currently rostered. Inactive employees are
    /// excluded from the grid.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_employee() {
        let json = r#"{
            "id": "emp_001",
            "full_name": "Ana Moreno",
            "role": "waiter",
            "hourly_rate": "15.00"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, "emp_001");
        assert_eq!(employee.role, Role::Waiter);
        assert_eq!(employee.hourly_rate, Decimal::new(1500, 2));
        assert!(employee.active);
    }

    #[test]
    fn test_role_serialization_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::KitchenPorter).unwrap(),
            "\"kitchen_porter\""
        );
        assert_eq!(serde_json::to_string(&Role::Chef).unwrap(), "\"chef\"");
    }

    #[test]
    fn test_department_order_follows_kitchen_then_floor() {
        assert!(Role::Chef.department_order() < Role::Waiter.department_order());
        assert!(Role::Manager.department_order() < Role::Chef.department_order());
    }

    #[test]
    fn test_employee_round_trip() {
        let employee = Employee {
            id: "emp_002".to_string(),
            full_name: "Luis Ferrer".to_string(),
            role: Role::Chef,
            hourly_rate: Decimal::new(1850, 2),
            active: true,
        };

        let json = serde_json::to_string(&employee).unwrap();
        let deserialized: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(employee, deserialized);
    }
}
