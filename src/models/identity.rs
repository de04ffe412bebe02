use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of role tags used across the kudos application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    TeamLead,
    TechLead,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::TeamLead => "team_lead",
            Role::TechLead => "tech_lead",
            Role::Admin => "admin",
        }
    }

    /// Roles allowed to act on any resource regardless of ownership.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Admin | Role::TechLead)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated user's public profile. Always replaced wholesale:
/// there is no partial-update path anywhere in the session core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

impl Identity {
    pub fn new(id: Uuid, display_name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            email: email.into(),
            role,
            team: None,
        }
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_snake_case_tags() {
        for (role, tag) in [
            (Role::User, "\"user\""),
            (Role::TeamLead, "\"team_lead\""),
            (Role::TechLead, "\"tech_lead\""),
            (Role::Admin, "\"admin\""),
        ] {
            assert_eq!(serde_json::to_string(&role).unwrap(), tag);
            let parsed: Role = serde_json::from_str(tag).unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn identity_serialization_omits_missing_team() {
        let identity = Identity::new(Uuid::new_v4(), "Ada Lovelace", "ada@example.com", Role::User);
        let json = serde_json::to_value(&identity).unwrap();
        assert!(json.get("team").is_none());

        let with_team = identity.with_team("Platform");
        let json = serde_json::to_value(&with_team).unwrap();
        assert_eq!(json["team"], "Platform");
    }
}
