use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Entity, FieldValue};
use crate::enum_display_fromstr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRole {
    Admin,
    Responsable,
    Technicien,
}

enum_display_fromstr!(UserRole, "role", {
    Admin => "ADMIN",
    Responsable => "RESPONSABLE",
    Technicien => "TECHNICIEN",
});

impl UserRole {
    pub fn permissions(&self) -> UserPermissions {
        match self {
            UserRole::Admin => UserPermissions {
                can_manage_users: true,
                can_manage_assets: true,
                can_manage_directions: true,
                can_view_reports: true,
                can_edit_settings: true,
            },
            UserRole::Responsable => UserPermissions {
                can_manage_users: false,
                can_manage_assets: true,
                can_manage_directions: true,
                can_view_reports: true,
                can_edit_settings: false,
            },
            UserRole::Technicien => UserPermissions::default(),
        }
    }
}

/// Capabilities granted by a role. An unknown role grants nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPermissions {
    pub can_manage_users: bool,
    pub can_manage_assets: bool,
    pub can_manage_directions: bool,
    pub can_view_reports: bool,
    pub can_edit_settings: bool,
}

impl UserPermissions {
    pub fn entries(&self) -> [(&'static str, bool); 5] {
        [
            ("canManageUsers", self.can_manage_users),
            ("canManageAssets", self.can_manage_assets),
            ("canManageDirections", self.can_manage_directions),
            ("canViewReports", self.can_view_reports),
            ("canEditSettings", self.can_edit_settings),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

impl Entity for User {
    type Id = String;

    const LABEL: &'static str = "user";
    const SEARCH_FIELDS: &'static [&'static str] = &["firstName", "lastName", "email"];
    const SORT_FIELDS: &'static [&'static str] =
        &["firstName", "lastName", "email", "role", "isActive", "createdAt"];

    fn id(&self) -> Option<String> {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => FieldValue::opt_text(self.id.as_deref()),
            "firstName" => FieldValue::opt_text(Some(&self.first_name)),
            "lastName" => FieldValue::opt_text(Some(&self.last_name)),
            "email" => FieldValue::opt_text(Some(&self.email)),
            "role" => self.role.map(|r| FieldValue::text(r.as_str())),
            "isActive" | "active" | "status" => Some(FieldValue::Flag(self.is_active)),
            "createdAt" => FieldValue::opt_date(self.created_at.as_deref()),
            _ => None,
        }
    }
}

/// Body of `POST /users` (password required) and `PUT /users/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub by_role: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissions_by_role() {
        let admin = UserRole::Admin.permissions();
        assert!(admin.entries().iter().all(|(_, granted)| *granted));

        let responsable = UserRole::Responsable.permissions();
        assert!(!responsable.can_manage_users);
        assert!(responsable.can_manage_assets);
        assert!(!responsable.can_edit_settings);

        let technicien = UserRole::Technicien.permissions();
        assert_eq!(technicien, UserPermissions::default());
    }

    #[test]
    fn test_user_projection() {
        let user: User = serde_json::from_str(
            r#"{"id": "u-1", "firstName": "Moussa", "lastName": "Ba",
                "email": "m.ba@example.org", "role": "TECHNICIEN", "isActive": true}"#,
        )
        .unwrap();
        assert_eq!(user.full_name(), "Moussa Ba");
        assert_eq!(user.field("role").unwrap().as_key(), "TECHNICIEN");
        assert_eq!(user.field("isActive"), Some(FieldValue::Flag(true)));
        assert_eq!(user.id(), Some("u-1".to_string()));
    }
}
