//! Secrets Manager property records for the generated database credentials.
//!
//! The secret value is generated by Secrets Manager at deploy time; the
//! declaration only carries the generation rules, so no credential material
//! ever appears in a synthesized template.

use serde::Serialize;
use serde_json::Value;

/// `AWS::SecretsManager::Secret` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecretProperties {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub generate_secret_string: GenerateSecretString,
}

/// Generation rules for the secret value.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenerateSecretString {
    /// JSON template the generated key is merged into; carries the username.
    pub secret_string_template: String,
    pub generate_string_key: String,
    pub password_length: u32,
    /// Characters that break connection strings or shell quoting.
    pub exclude_characters: String,
}

impl GenerateSecretString {
    /// Rules for a database credential secret: a generated password merged
    /// into a `{"username": ...}` template.
    pub fn database_credentials(username: &str) -> Self {
        Self {
            secret_string_template: format!("{{\"username\":\"{username}\"}}"),
            generate_string_key: "password".to_string(),
            password_length: 30,
            exclude_characters: "\"@/\\".to_string(),
        }
    }
}

/// `AWS::SecretsManager::SecretTargetAttachment` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecretTargetAttachmentProperties {
    pub secret_id: Value,
    pub target_id: Value,
    pub target_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_template_embeds_username_only() {
        let rules = GenerateSecretString::database_credentials("example");
        assert_eq!(rules.secret_string_template, "{\"username\":\"example\"}");
        assert_eq!(rules.generate_string_key, "password");
        // Nothing resembling a password literal in the declaration.
        let rendered = serde_json::to_string(&rules).unwrap();
        assert!(!rendered.contains("Password\":\""));
    }
}
