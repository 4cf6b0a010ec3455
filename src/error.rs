use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupctlError {
    #[error("Invalid {0} file.")]
    InvalidConfig(String),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Graph API error: {0}")]
    GraphApiError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GroupctlError>;

/// Parse Graph API error response and provide helpful context
pub fn enhance_graph_error(error_response: &str) -> String {
    if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(error_response) {
        if let Some(error_obj) = error_json.get("error") {
            let code = error_obj
                .get("code")
                .and_then(|c| c.as_str())
                .unwrap_or("Unknown");
            let message = error_obj
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("No message");

            let hint = match code {
                "Unauthorized" | "InvalidAuthenticationToken" => {
                    "\nHint: The access token was rejected. Sign in again."
                }
                "Forbidden" | "Authorization_RequestDenied" => {
                    "\nHint: Check that the app registration has the Group and Directory permissions and that consent was granted."
                }
                "Request_ResourceNotFound" | "NotFound" => {
                    "\nHint: The group does not exist in this tenant. Check groupId in appsettings.json."
                }
                "Request_BadRequest" | "BadRequest" => {
                    if message.contains("mailNickname") {
                        "\nHint: A group with this mail nickname may already exist."
                    } else {
                        "\nHint: The request body may be incorrect."
                    }
                }
                _ => "",
            };

            return format!("{}: {}{}", code, message, hint);
        }
    }

    error_response.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enhance_graph_error_with_hint() {
        let body = r#"{"error":{"code":"Request_ResourceNotFound","message":"Resource 'x' does not exist."}}"#;
        let enhanced = enhance_graph_error(body);
        assert!(enhanced.starts_with("Request_ResourceNotFound: Resource 'x' does not exist."));
        assert!(enhanced.contains("groupId"));
    }

    #[test]
    fn test_enhance_graph_error_unknown_code() {
        let body = r#"{"error":{"code":"Weird","message":"Something"}}"#;
        assert_eq!(enhance_graph_error(body), "Weird: Something");
    }

    #[test]
    fn test_enhance_graph_error_not_json() {
        assert_eq!(enhance_graph_error("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_invalid_config_message() {
        let err = GroupctlError::InvalidConfig("appsettings.json".into());
        assert_eq!(err.to_string(), "Invalid appsettings.json file.");
    }
}
