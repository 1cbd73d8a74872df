//! Managed database definition: PostgreSQL reachable only from the bastion.
//!
//! The instance lives in the private subnets behind a dedicated security
//! group whose single ingress rule admits the bastion security group on the
//! PostgreSQL port. Credentials are generated by Secrets Manager at deploy
//! time and resolved into the instance through dynamic references, so no
//! credential material exists in the synthesized template.

use crate::config::Config;
use crate::error::Result;
use crate::resources::ec2::{SecurityGroupProperties, SecurityGroupRule};
use crate::resources::rds::{DbInstanceProperties, DbSubnetGroupProperties};
use crate::resources::secretsmanager::{
    GenerateSecretString, SecretProperties, SecretTargetAttachmentProperties,
};
use crate::resources::Tag;
use crate::stack::Stack;
use crate::template::{intrinsics, DeletionPolicy, Output, Resource};

use super::{SecurityGroupHandle, VpcHandle, BASTION_STACK, POSTGRES_PORT, RDS_STACK, VPC_STACK};

/// Database master username; the password is generated, never declared.
const DB_USERNAME: &str = "example";

/// Builds the database stack.
pub fn build(
    config: &Config,
    vpc: &VpcHandle,
    bastion_sg: &SecurityGroupHandle,
) -> Result<Stack> {
    let mut stack = Stack::new(
        RDS_STACK,
        "PostgreSQL instance reachable only from the bastion host",
        &config.target,
    );
    stack.add_dependency(VPC_STACK);
    stack.add_dependency(BASTION_STACK);

    stack.add_resource(
        "RdsSubnetGroup",
        "AWS::RDS::DBSubnetGroup",
        &DbSubnetGroupProperties {
            d_b_subnet_group_name: "example-subnet-group-rds".to_string(),
            d_b_subnet_group_description: "Subnet group for RDS".to_string(),
            subnet_ids: vpc.subnet_ids.clone(),
        },
    )?;

    stack.add_resource(
        "RdsSecurityGroup",
        "AWS::EC2::SecurityGroup",
        &SecurityGroupProperties {
            group_name: "example-security-group-rds".to_string(),
            group_description: "RDS security group".to_string(),
            vpc_id: vpc.vpc_id.clone(),
            security_group_ingress: vec![SecurityGroupRule::tcp_from_security_group(
                POSTGRES_PORT,
                bastion_sg.group_id.clone(),
            )
            .description("Allow the rds to be communicated from bastion-host ec2 instance")],
            security_group_egress: Vec::new(),
            tags: vec![Tag::name("example-security-group-rds")],
        },
    )?;

    stack.add_resource(
        "RdsCredentialsSecret",
        "AWS::SecretsManager::Secret",
        &SecretProperties {
            name: "example-rds-credentials".to_string(),
            description: Some("Generated credentials for the example RDS instance".to_string()),
            generate_secret_string: GenerateSecretString::database_credentials(DB_USERNAME),
        },
    )?;

    let instance = Resource::new(
        "AWS::RDS::DBInstance",
        serde_json::to_value(&DbInstanceProperties {
            d_b_instance_identifier: "example-rds".to_string(),
            engine: "postgres".to_string(),
            d_b_instance_class: "db.t4g.small".to_string(),
            allocated_storage: "100".to_string(),
            master_username: intrinsics::sub(
                "{{resolve:secretsmanager:${RdsCredentialsSecret}:SecretString:username}}",
            ),
            master_user_password: intrinsics::sub(
                "{{resolve:secretsmanager:${RdsCredentialsSecret}:SecretString:password}}",
            ),
            auto_minor_version_upgrade: false,
            publicly_accessible: false,
            d_b_subnet_group_name: intrinsics::r#ref("RdsSubnetGroup"),
            vpc_security_groups: vec![intrinsics::get_att("RdsSecurityGroup", "GroupId")],
        })?,
    )
    .deletion_policy(DeletionPolicy::Snapshot);
    stack.add("RdsInstance", instance)?;

    stack.add_resource(
        "RdsCredentialsAttachment",
        "AWS::SecretsManager::SecretTargetAttachment",
        &SecretTargetAttachmentProperties {
            secret_id: intrinsics::r#ref("RdsCredentialsSecret"),
            target_id: intrinsics::r#ref("RdsInstance"),
            target_type: "AWS::RDS::DBInstance".to_string(),
        },
    )?;

    stack.add_output(
        "DbInstanceIdentifier",
        Output::new(intrinsics::r#ref("RdsInstance"))
            .description("Identifier of the database instance"),
    )?;

    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stacks::{bastion, vpc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn built() -> Stack {
        let config = Config::default();
        let (_, vpc_handle) = vpc::build(&config).unwrap();
        let (_, bastion_sg) = bastion::build(&config, &vpc_handle).unwrap();
        build(&config, &vpc_handle, &bastion_sg).unwrap()
    }

    #[test]
    fn single_ingress_rule_from_the_bastion_group() {
        let stack = built();
        let sg = &stack.template().resources["RdsSecurityGroup"].properties;

        let ingress = sg["SecurityGroupIngress"].as_array().unwrap();
        assert_eq!(ingress.len(), 1);
        assert_eq!(ingress[0]["FromPort"], 5432);
        assert_eq!(ingress[0]["ToPort"], 5432);
        assert_eq!(
            ingress[0]["SourceSecurityGroupId"],
            json!({ "Fn::ImportValue": "bastion-host:SecurityGroupId" })
        );
    }

    #[test]
    fn credentials_are_generated_not_embedded() {
        let stack = built();
        let template = stack.template();

        let secret = &template.resources["RdsCredentialsSecret"].properties;
        assert_eq!(secret["Name"], "example-rds-credentials");
        assert_eq!(
            secret["GenerateSecretString"]["SecretStringTemplate"],
            "{\"username\":\"example\"}"
        );

        let instance = &template.resources["RdsInstance"].properties;
        assert!(instance["MasterUserPassword"]["Fn::Sub"]
            .as_str()
            .unwrap()
            .starts_with("{{resolve:secretsmanager:"));
    }

    #[test]
    fn instance_is_private_and_pinned_to_its_minor_version() {
        let stack = built();
        let instance = &stack.template().resources["RdsInstance"].properties;

        assert_eq!(instance["Engine"], "postgres");
        assert_eq!(instance["DBInstanceClass"], "db.t4g.small");
        assert_eq!(instance["AutoMinorVersionUpgrade"], false);
        assert_eq!(instance["PubliclyAccessible"], false);
        assert_eq!(
            stack.template().resources["RdsInstance"].deletion_policy,
            Some(DeletionPolicy::Snapshot)
        );
    }

    #[test]
    fn depends_on_both_network_and_bastion() {
        let stack = built();
        assert_eq!(stack.dependencies(), ["vpc", "bastion-host"]);
    }
}
