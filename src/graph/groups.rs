//! Group provisioning: create a Microsoft 365 group and turn it into a team

use crate::error::Result;
use crate::graph::directory::Group;
use crate::graph::{GRAPH_API_BASE, GraphClient};
use serde::{Deserialize, Serialize};

/// Request body for `POST /groups`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub description: String,
    pub display_name: String,
    pub group_types: Vec<String>,
    pub mail_enabled: bool,
    pub mail_nickname: String,
    pub security_enabled: bool,
    #[serde(rename = "owners@odata.bind", skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<String>,
    #[serde(rename = "members@odata.bind", skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
}

fn user_bind(user_id: &str) -> String {
    format!("{}/users/{}", GRAPH_API_BASE, user_id)
}

impl NewGroup {
    /// A mail-enabled Microsoft 365 ("Unified") group
    pub fn unified(display_name: &str, mail_nickname: &str, description: &str) -> Self {
        Self {
            description: description.to_string(),
            display_name: display_name.to_string(),
            group_types: vec!["Unified".to_string()],
            mail_enabled: true,
            mail_nickname: mail_nickname.to_string(),
            security_enabled: false,
            owners: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn with_owners<'a>(mut self, user_ids: impl IntoIterator<Item = &'a str>) -> Self {
        self.owners.extend(user_ids.into_iter().map(user_bind));
        self
    }

    pub fn with_members<'a>(mut self, user_ids: impl IntoIterator<Item = &'a str>) -> Self {
        self.members.extend(user_ids.into_iter().map(user_bind));
        self
    }

    /// Demo group with one owner and two members
    pub fn sample() -> Self {
        Self::unified(
            "My First Group",
            "myfirstgroup01",
            "My first group created with the Microsoft Graph .NET SDK",
        )
        .with_owners(["d280a087-e05b-4c23-b073-738cdb82b25e"])
        .with_members([
            "70c095fe-df9d-4250-867d-f298e237d681",
            "8c2da469-1eba-47a4-9322-ee0ddd24d99a",
        ])
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberSettings {
    pub allow_create_update_channels: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMessagingSettings {
    pub allow_user_edit_messages: Option<bool>,
    pub allow_user_delete_messages: Option<bool>,
}

/// Team resource of a group (`/groups/{id}/team`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub member_settings: TeamMemberSettings,
    #[serde(default)]
    pub messaging_settings: TeamMessagingSettings,
}

impl Team {
    /// Members may create channels and edit or delete their own messages
    pub fn collaborative() -> Self {
        Self {
            id: None,
            member_settings: TeamMemberSettings {
                allow_create_update_channels: Some(true),
            },
            messaging_settings: TeamMessagingSettings {
                allow_user_edit_messages: Some(true),
                allow_user_delete_messages: Some(true),
            },
        }
    }
}

/// Create a group
pub async fn create_group(client: &GraphClient, group: &NewGroup) -> Result<Group> {
    let created: Group = client.request("groups").post(group).await?;
    tracing::debug!("Created group {} ({})", created.id, group.display_name);
    Ok(created)
}

/// Attach a team to an existing Microsoft 365 group
pub async fn teamify_group(client: &GraphClient, group_id: &str) -> Result<Team> {
    client
        .request(&format!("groups/{}/team", group_id))
        .put(&Team::collaborative())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_group_body() {
        let body = serde_json::to_value(NewGroup::sample()).unwrap();
        assert_eq!(body["displayName"], "My First Group");
        assert_eq!(body["mailNickname"], "myfirstgroup01");
        assert_eq!(
            body["description"],
            "My first group created with the Microsoft Graph .NET SDK"
        );
        assert_eq!(body["groupTypes"], serde_json::json!(["Unified"]));
        assert_eq!(body["mailEnabled"], true);
        assert_eq!(body["securityEnabled"], false);
        assert_eq!(
            body["owners@odata.bind"],
            serde_json::json!([
                "https://graph.microsoft.com/v1.0/users/d280a087-e05b-4c23-b073-738cdb82b25e"
            ])
        );
        assert_eq!(body["members@odata.bind"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_group_without_bindings_omits_them() {
        let body = serde_json::to_value(NewGroup::unified("A", "a", "d")).unwrap();
        assert!(body.get("owners@odata.bind").is_none());
        assert!(body.get("members@odata.bind").is_none());
    }

    #[test]
    fn test_collaborative_team_body() {
        let body = serde_json::to_value(Team::collaborative()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "memberSettings": { "allowCreateUpdateChannels": true },
                "messagingSettings": {
                    "allowUserEditMessages": true,
                    "allowUserDeleteMessages": true
                }
            })
        );
    }
}
