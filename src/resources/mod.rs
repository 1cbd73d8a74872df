//! Typed property records for the AWS resources this crate declares.
//!
//! Each struct here serializes into the `Properties` block of one
//! CloudFormation resource type, with field names renamed to the PascalCase
//! keys CloudFormation expects. Fields that carry intrinsic function nodes
//! (`Ref`, `Fn::ImportValue`, ...) are typed as [`serde_json::Value`]; literal
//! fields are plain Rust types.
//!
//! Only the property subset this crate actually declares is modeled; these
//! are declaration records, not a full binding of every CloudFormation
//! resource property.
//!
//! ## Available records
//!
//! - [`ec2`]: VPC, subnets, route tables, security groups, VPC endpoints,
//!   instances
//! - [`iam`]: instance role and instance profile for the bastion host
//! - [`rds`]: DB subnet group and DB instance
//! - [`secretsmanager`]: generated database credentials

pub mod ec2;
pub mod iam;
pub mod rds;
pub mod secretsmanager;

use serde::Serialize;

/// A resource tag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    /// Creates a `Name` tag, the tag every named resource in this crate
    /// carries.
    pub fn name(value: impl Into<String>) -> Self {
        Self {
            key: "Name".to_string(),
            value: value.into(),
        }
    }
}
