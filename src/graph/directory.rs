//! Entra ID directory objects: groups, users and directory roles
//!
//! Collections such as `owners`, `members` and `ownedObjects` mix entity
//! types. They are decoded into [`DirectoryObject`] using the
//! `@odata.type` discriminator carried by every item.

use crate::graph::{GraphClient, GraphRequest};
use serde::{Deserialize, Serialize};

pub const ODATA_TYPE_GROUP: &str = "#microsoft.graph.group";
pub const ODATA_TYPE_USER: &str = "#microsoft.graph.user";
pub const ODATA_TYPE_DIRECTORY_ROLE: &str = "#microsoft.graph.directoryRole";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub display_name: Option<String>,
    pub mail: Option<String>,
    pub mail_nickname: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub group_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: Option<String>,
    pub mail: Option<String>,
    pub user_principal_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryRole {
    pub id: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

/// An item from a mixed directory collection
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawDirectoryObject")]
pub enum DirectoryObject {
    Group(Group),
    User(User),
    DirectoryRole(DirectoryRole),
    /// Any other type (service principals, devices, ...). Only the id and
    /// the type tag are kept.
    Other { id: String, odata_type: String },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDirectoryObject {
    #[serde(rename = "@odata.type")]
    odata_type: Option<String>,
    id: String,
    display_name: Option<String>,
    mail: Option<String>,
    mail_nickname: Option<String>,
    description: Option<String>,
    user_principal_name: Option<String>,
    #[serde(default)]
    group_types: Vec<String>,
}

impl From<RawDirectoryObject> for DirectoryObject {
    fn from(raw: RawDirectoryObject) -> Self {
        match raw.odata_type.as_deref() {
            Some(ODATA_TYPE_GROUP) => DirectoryObject::Group(Group {
                id: raw.id,
                display_name: raw.display_name,
                mail: raw.mail,
                mail_nickname: raw.mail_nickname,
                description: raw.description,
                group_types: raw.group_types,
            }),
            Some(ODATA_TYPE_USER) => DirectoryObject::User(User {
                id: raw.id,
                display_name: raw.display_name,
                mail: raw.mail,
                user_principal_name: raw.user_principal_name,
            }),
            Some(ODATA_TYPE_DIRECTORY_ROLE) => DirectoryObject::DirectoryRole(DirectoryRole {
                id: raw.id,
                display_name: raw.display_name,
                description: raw.description,
            }),
            _ => DirectoryObject::Other {
                id: raw.id,
                odata_type: raw.odata_type.unwrap_or_default(),
            },
        }
    }
}

impl DirectoryObject {
    pub fn id(&self) -> &str {
        match self {
            DirectoryObject::Group(g) => &g.id,
            DirectoryObject::User(u) => &u.id,
            DirectoryObject::DirectoryRole(r) => &r.id,
            DirectoryObject::Other { id, .. } => id,
        }
    }

    pub fn odata_type(&self) -> &str {
        match self {
            DirectoryObject::Group(_) => ODATA_TYPE_GROUP,
            DirectoryObject::User(_) => ODATA_TYPE_USER,
            DirectoryObject::DirectoryRole(_) => ODATA_TYPE_DIRECTORY_ROLE,
            DirectoryObject::Other { odata_type, .. } => odata_type,
        }
    }

    pub fn as_user(&self) -> Option<&User> {
        match self {
            DirectoryObject::User(u) => Some(u),
            _ => None,
        }
    }
}

/// `GET /groups`
pub fn groups(client: &GraphClient) -> GraphRequest<'_> {
    client.request("groups")
}

/// `GET /groups/{id}`
pub fn group<'a>(client: &'a GraphClient, group_id: &str) -> GraphRequest<'a> {
    client.request(&format!("groups/{}", group_id))
}

/// `GET /groups/{id}/owners`
pub fn group_owners<'a>(client: &'a GraphClient, group_id: &str) -> GraphRequest<'a> {
    client.request(&format!("groups/{}/owners", group_id))
}

/// `GET /groups/{id}/members`
pub fn group_members<'a>(client: &'a GraphClient, group_id: &str) -> GraphRequest<'a> {
    client.request(&format!("groups/{}/members", group_id))
}

/// `GET /me/ownedObjects`
pub fn my_owned_objects(client: &GraphClient) -> GraphRequest<'_> {
    client.request("me/ownedObjects")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_mixed_collection() {
        let items: Vec<DirectoryObject> = serde_json::from_value(serde_json::json!([
            {
                "@odata.type": "#microsoft.graph.user",
                "id": "u1",
                "displayName": "Adele Vance",
                "mail": "adele@contoso.com",
                "userPrincipalName": "adele@contoso.com"
            },
            {
                "@odata.type": "#microsoft.graph.group",
                "id": "g1",
                "displayName": "Sales",
                "mailNickname": "sales",
                "groupTypes": ["Unified"]
            },
            {
                "@odata.type": "#microsoft.graph.directoryRole",
                "id": "r1",
                "displayName": "Global Reader"
            },
            {
                "@odata.type": "#microsoft.graph.servicePrincipal",
                "id": "sp1",
                "displayName": "Some App"
            }
        ]))
        .unwrap();

        assert_eq!(items[0].as_user().unwrap().display_name.as_deref(), Some("Adele Vance"));
        match &items[1] {
            DirectoryObject::Group(g) => assert_eq!(g.group_types, vec!["Unified"]),
            other => panic!("expected group, got {:?}", other),
        }
        assert!(matches!(items[2], DirectoryObject::DirectoryRole(_)));
        assert_eq!(
            items[3],
            DirectoryObject::Other {
                id: "sp1".to_string(),
                odata_type: "#microsoft.graph.servicePrincipal".to_string()
            }
        );
    }

    #[test]
    fn test_missing_type_tag_is_other() {
        let item: DirectoryObject = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(item.odata_type(), "");
        assert_eq!(item.id(), "x");
        assert!(item.as_user().is_none());
    }

    #[test]
    fn test_group_from_list_without_type_tag() {
        let group: Group = serde_json::from_str(
            r#"{"id":"g","displayName":"Team","mail":null,"securityEnabled":false}"#,
        )
        .unwrap();
        assert_eq!(group.mail, None);
        assert!(group.group_types.is_empty());
    }
}
