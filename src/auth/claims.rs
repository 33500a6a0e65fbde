use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Fixed lifetime of an issued token
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Role carried in a token. Parsing ignores case; unknown roles are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Admin,
    Employee,
    TeamLead,
    Other(CustomRole),
}

/// A role name outside the known set. Only [`Role::parse`] builds one, so it
/// never spells a known role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomRole(String);

impl CustomRole {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Role {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "employee" => Role::Employee,
            "teamlead" => Role::TeamLead,
            _ => Role::Other(CustomRole(value.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::TeamLead => "teamLead",
            Role::Other(custom) => custom.as_str(),
        }
    }

    /// Roles allowed into the admin area
    pub fn is_admin_capable(&self) -> bool {
        matches!(self, Role::Admin | Role::TeamLead)
    }

    /// Roles allowed into the employee area
    pub fn is_employee_capable(&self) -> bool {
        matches!(self, Role::Employee | Role::Admin | Role::TeamLead)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::parse(&raw))
    }
}

/// Identity payload embedded in an auth token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Employee id
    pub id: i64,
    pub email: String,
    pub role: Role,
    /// Display name
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Build claims issued at `issued_at`, expiring `TOKEN_TTL_HOURS` later
    pub fn new(
        id: i64,
        email: impl Into<String>,
        role: Role,
        name: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let iat = issued_at.timestamp();
        Self {
            id,
            email: email.into(),
            role,
            name: name.into(),
            iat,
            exp: iat + Duration::hours(TOKEN_TTL_HOURS).num_seconds(),
        }
    }
}

/// Authenticated caller, inserted into request extensions by the gatekeeper
#[derive(Clone, Debug, Serialize)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub name: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
            role: claims.role,
            name: claims.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_ignores_case() {
        assert_eq!(Role::parse("ADMIN"), Role::Admin);
        assert_eq!(Role::parse("Employee"), Role::Employee);
        assert_eq!(Role::parse("teamlead"), Role::TeamLead);
        assert_eq!(Role::parse("TeamLead"), Role::TeamLead);
        assert_eq!(Role::parse("contractor").as_str(), "contractor");
        assert!(matches!(Role::parse("Contractor"), Role::Other(_)));
    }

    #[test]
    fn role_capabilities() {
        assert!(Role::Admin.is_admin_capable());
        assert!(Role::TeamLead.is_admin_capable());
        assert!(!Role::Employee.is_admin_capable());
        assert!(Role::TeamLead.is_employee_capable());
        assert!(!Role::parse("guest").is_employee_capable());
        assert!(!Role::parse("guest").is_admin_capable());
    }

    #[test]
    fn claims_wire_shape() {
        let issued = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims::new(7, "a@b.co", Role::TeamLead, "Ana", issued);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["role"], "teamLead");
        assert_eq!(json["name"], "Ana");
        assert_eq!(json["iat"], 1_700_000_000);
    }
}
