//! Classification enums for stored entities
//!
//! Each enum is backed by a lowercase string in SQLite (enforced by CHECK
//! constraints in the schema) and round-trips through `as_str`/`parse`.

use serde::{Deserialize, Serialize};

/// How often a habit is meant to be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HabitCadence {
    #[default]
    Daily,
    Weekly,
    Monthly,
    /// Specific weekdays, stored alongside in `habits.custom_days`
    Custom,
}

impl HabitCadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Party goal lifecycle
///
/// `Active` is the only non-terminal state. The only transition driven by
/// progress is active -> completed; failed and cancelled are externally
/// triggered (expiry sweep, explicit cancellation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Failed,
    Cancelled,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// Member roles within a party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    Leader,
    Officer,
    #[default]
    Member,
}

impl PartyRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leader => "leader",
            Self::Officer => "officer",
            Self::Member => "member",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "leader" => Some(Self::Leader),
            "officer" => Some(Self::Officer),
            "member" => Some(Self::Member),
            _ => None,
        }
    }

    /// Role level for hierarchy checks
    fn level(&self) -> u8 {
        match self {
            Self::Leader => 3,
            Self::Officer => 2,
            Self::Member => 1,
        }
    }

    /// Check if this role has at least the minimum required level
    pub fn has_min_role(&self, min: PartyRole) -> bool {
        self.level() >= min.level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence_round_trip() {
        for cadence in [
            HabitCadence::Daily,
            HabitCadence::Weekly,
            HabitCadence::Monthly,
            HabitCadence::Custom,
        ] {
            assert_eq!(HabitCadence::parse(cadence.as_str()), Some(cadence));
        }
        assert_eq!(HabitCadence::parse("hourly"), None);
    }

    #[test]
    fn test_goal_status_round_trip() {
        for status in [
            GoalStatus::Active,
            GoalStatus::Completed,
            GoalStatus::Failed,
            GoalStatus::Cancelled,
        ] {
            assert_eq!(GoalStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(GoalStatus::parse("done"), None);
    }

    #[test]
    fn test_goal_status_terminality() {
        assert!(!GoalStatus::Active.is_terminal());
        assert!(GoalStatus::Completed.is_terminal());
        assert!(GoalStatus::Failed.is_terminal());
        assert!(GoalStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_party_role_hierarchy() {
        assert!(PartyRole::Leader.has_min_role(PartyRole::Leader));
        assert!(PartyRole::Leader.has_min_role(PartyRole::Member));
        assert!(PartyRole::Officer.has_min_role(PartyRole::Officer));
        assert!(PartyRole::Officer.has_min_role(PartyRole::Member));
        assert!(!PartyRole::Officer.has_min_role(PartyRole::Leader));
        assert!(!PartyRole::Member.has_min_role(PartyRole::Officer));
    }
}
