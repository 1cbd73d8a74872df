//! RDS resource property records: DB subnet group and DB instance.

use serde::Serialize;
use serde_json::Value;

/// `AWS::RDS::DBSubnetGroup` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DbSubnetGroupProperties {
    pub d_b_subnet_group_name: String,
    pub d_b_subnet_group_description: String,
    pub subnet_ids: Vec<Value>,
}

/// `AWS::RDS::DBInstance` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DbInstanceProperties {
    pub d_b_instance_identifier: String,
    pub engine: String,
    pub d_b_instance_class: String,
    pub allocated_storage: String,
    /// Dynamic reference into the credentials secret, never a literal.
    pub master_username: Value,
    /// Dynamic reference into the credentials secret, never a literal.
    pub master_user_password: Value,
    pub auto_minor_version_upgrade: bool,
    pub publicly_accessible: bool,
    pub d_b_subnet_group_name: Value,
    #[serde(rename = "VPCSecurityGroups")]
    pub vpc_security_groups: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // The DB* property names have an irregular acronym casing in
    // CloudFormation; pin the exact wire keys.
    #[test]
    fn db_property_keys_match_cloudformation() {
        let group = DbSubnetGroupProperties {
            d_b_subnet_group_name: "example-subnet-group-rds".into(),
            d_b_subnet_group_description: "Subnet group for RDS".into(),
            subnet_ids: vec![json!("subnet-1")],
        };
        let rendered = serde_json::to_value(&group).unwrap();
        assert!(rendered.get("DBSubnetGroupName").is_some());
        assert!(rendered.get("DBSubnetGroupDescription").is_some());

        let instance = DbInstanceProperties {
            d_b_instance_identifier: "example-rds".into(),
            engine: "postgres".into(),
            d_b_instance_class: "db.t4g.small".into(),
            allocated_storage: "100".into(),
            master_username: json!("example"),
            master_user_password: json!("secret"),
            auto_minor_version_upgrade: false,
            publicly_accessible: false,
            d_b_subnet_group_name: json!("example-subnet-group-rds"),
            vpc_security_groups: vec![json!("sg-1")],
        };
        let rendered = serde_json::to_value(&instance).unwrap();
        assert!(rendered.get("DBInstanceIdentifier").is_some());
        assert!(rendered.get("DBInstanceClass").is_some());
        assert!(rendered.get("VPCSecurityGroups").is_some());
    }
}
