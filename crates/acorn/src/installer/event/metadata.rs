use std::{fmt, time::SystemTime};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one operation and stamps each of its events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMetadata {
    operation_id: Uuid,
    operation_type: OperationType,
    component: String,
    timestamp: SystemTime,
}

impl EventMetadata {
    pub(crate) fn new(operation_type: OperationType, component: impl Into<String>) -> Self {
        Self {
            operation_id: Uuid::new_v4(),
            operation_type,
            component: component.into(),
            timestamp: SystemTime::now(),
        }
    }

    /// A copy stamped with the current time, for the next event.
    pub(crate) fn touch_and_clone(&self) -> Self {
        Self {
            timestamp: SystemTime::now(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn operation_id(&self) -> Uuid {
        self.operation_id
    }

    #[must_use]
    pub fn operation_type(&self) -> OperationType {
        self.operation_type
    }

    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    #[must_use]
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    ComponentInstall,
    ComponentPlan,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ComponentInstall => f.write_str("component_install"),
            Self::ComponentPlan => f.write_str("component_plan"),
        }
    }
}
