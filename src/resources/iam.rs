//! IAM resource property records for the bastion's instance role.

use serde::Serialize;
use serde_json::{json, Value};

/// `AWS::IAM::Role` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleProperties {
    pub assume_role_policy_document: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub managed_policy_arns: Vec<String>,
}

impl RoleProperties {
    /// A role assumable by an AWS service principal.
    pub fn for_service(service: &str, managed_policy_arns: Vec<String>) -> Self {
        Self {
            assume_role_policy_document: json!({
                "Version": "2012-10-17",
                "Statement": [{
                    "Effect": "Allow",
                    "Principal": { "Service": service },
                    "Action": "sts:AssumeRole",
                }],
            }),
            managed_policy_arns,
        }
    }
}

/// `AWS::IAM::InstanceProfile` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceProfileProperties {
    pub roles: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_role_trust_policy() {
        let role = RoleProperties::for_service(
            "ec2.amazonaws.com",
            vec!["arn:aws:iam::aws:policy/AmazonSSMManagedInstanceCore".into()],
        );
        let statement = &role.assume_role_policy_document["Statement"][0];
        assert_eq!(statement["Principal"]["Service"], "ec2.amazonaws.com");
        assert_eq!(statement["Action"], "sts:AssumeRole");
    }
}
