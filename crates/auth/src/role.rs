use serde::{Deserialize, Serialize};

/// Role granted to an authenticated staff account.
///
/// A closed enum: the shop has exactly two kinds of operator. Admin is a
/// strict superset of staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }

    /// Whether a holder of this role satisfies `required`.
    pub fn allows(&self, required: Role) -> bool {
        match (self, required) {
            (Role::Admin, _) => true,
            (Role::Staff, Role::Staff) => true,
            (Role::Staff, Role::Admin) => false,
        }
    }
}

impl core::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            other => Err(format!("unknown role: {other:?}")),
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_allows_everything() {
        assert!(Role::Admin.allows(Role::Admin));
        assert!(Role::Admin.allows(Role::Staff));
    }

    #[test]
    fn staff_cannot_act_as_admin() {
        assert!(Role::Staff.allows(Role::Staff));
        assert!(!Role::Staff.allows(Role::Admin));
    }

    #[test]
    fn parses_lowercase_names() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("barista".parse::<Role>().is_err());
    }
}
