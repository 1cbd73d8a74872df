//! Bastion definition: a Session-Manager-only host inside the isolated VPC.
//!
//! The host has no public IP, no key pair, and no SSH ingress; the only way
//! in is the Session Manager channel, which reaches the isolated subnets
//! through three interface VPC endpoints (`ssm`, `ec2messages`,
//! `ssmmessages`). An S3 gateway endpoint on the private route tables lets
//! `yum` reach the Amazon Linux package repositories without a NAT gateway.
//!
//! The bastion security group denies all egress by default and then allows
//! exactly three ports out: 22, 443, and 5432.

use serde_json::Value;

use crate::config::Config;
use crate::error::Result;
use crate::resources::ec2::{
    InstanceProperties, SecurityGroupProperties, SecurityGroupRule, VpcEndpointProperties,
    VpcEndpointType,
};
use crate::resources::iam::{InstanceProfileProperties, RoleProperties};
use crate::resources::Tag;
use crate::stack::Stack;
use crate::template::{intrinsics, Output, Parameter};

use super::{
    endpoint_service_name, import, VpcHandle, BASTION_STACK, HTTPS_PORT, POSTGRES_PORT, SSH_PORT,
    VPC_STACK,
};

/// The Session Manager sub-services that need an interface endpoint inside
/// the VPC, with the logical ids of their endpoints.
const SSM_ENDPOINTS: [(&str, &str); 3] = [
    ("ssm", "SsmEndpoint"),
    ("ec2messages", "Ec2MessagesEndpoint"),
    ("ssmmessages", "SsmMessagesEndpoint"),
];

/// Ports the bastion is allowed to dial out on.
const EGRESS_PORTS: [i32; 3] = [SSH_PORT, HTTPS_PORT, POSTGRES_PORT];

/// First-boot script: refresh the package cache and install a PostgreSQL
/// client for use from Session Manager sessions.
const USER_DATA: &str = "#!/bin/bash\nyum -y update && amazon-linux-extras install postgresql13";

/// SSM parameter resolving to the latest Amazon Linux 2 AMI.
const AMAZON_LINUX_2_AMI_PARAMETER: &str =
    "/aws/service/ami-amazon-linux-latest/amzn2-ami-hvm-x86_64-gp2";

/// Import-value token over the bastion security group export, handed to the
/// database definition.
#[derive(Debug, Clone)]
pub struct SecurityGroupHandle {
    pub group_id: Value,
}

/// Builds the bastion host stack and the handle to its security group.
pub fn build(config: &Config, vpc: &VpcHandle) -> Result<(Stack, SecurityGroupHandle)> {
    let region = &config.target.region;
    let mut stack = Stack::new(
        BASTION_STACK,
        "Bastion host reachable only via Session Manager",
        &config.target,
    );
    stack.add_dependency(VPC_STACK);

    // Default-deny egress: declaring explicit egress entries suppresses the
    // allow-all rule CloudFormation would otherwise add.
    stack.add_resource(
        "BastionSecurityGroup",
        "AWS::EC2::SecurityGroup",
        &SecurityGroupProperties {
            group_name: "example-security-group-bastion-host".to_string(),
            group_description: "Bastion host security group".to_string(),
            vpc_id: vpc.vpc_id.clone(),
            security_group_ingress: Vec::new(),
            security_group_egress: EGRESS_PORTS
                .iter()
                .map(|&port| SecurityGroupRule::tcp_to_cidr(port, "0.0.0.0/0"))
                .collect(),
            tags: vec![Tag::name("example-security-group-bastion-host")],
        },
    )?;

    // The interface endpoints sit in the private subnets and must accept
    // HTTPS from anywhere inside the VPC.
    stack.add_resource(
        "EndpointSecurityGroup",
        "AWS::EC2::SecurityGroup",
        &SecurityGroupProperties {
            group_name: "example-security-group-vpc-endpoints".to_string(),
            group_description: "HTTPS from within the VPC to interface endpoints".to_string(),
            vpc_id: vpc.vpc_id.clone(),
            security_group_ingress: vec![SecurityGroupRule {
                ip_protocol: "tcp".to_string(),
                from_port: HTTPS_PORT,
                to_port: HTTPS_PORT,
                cidr_ip: Some(vpc.vpc_cidr.clone()),
                source_security_group_id: None,
                description: Some("HTTPS from the VPC".to_string()),
            }],
            security_group_egress: Vec::new(),
            tags: Vec::new(),
        },
    )?;

    for (service, logical_id) in SSM_ENDPOINTS {
        stack.add_resource(
            logical_id,
            "AWS::EC2::VPCEndpoint",
            &VpcEndpointProperties {
                vpc_id: vpc.vpc_id.clone(),
                service_name: endpoint_service_name(region, service),
                vpc_endpoint_type: VpcEndpointType::Interface,
                private_dns_enabled: Some(true),
                subnet_ids: vpc.subnet_ids.clone(),
                security_group_ids: vec![intrinsics::r#ref("EndpointSecurityGroup")],
                route_table_ids: Vec::new(),
            },
        )?;
    }

    // Package-repository access without a NAT: S3 gateway endpoint on every
    // private route table.
    stack.add_resource(
        "S3GatewayEndpoint",
        "AWS::EC2::VPCEndpoint",
        &VpcEndpointProperties {
            vpc_id: vpc.vpc_id.clone(),
            service_name: endpoint_service_name(region, "s3"),
            vpc_endpoint_type: VpcEndpointType::Gateway,
            private_dns_enabled: None,
            subnet_ids: Vec::new(),
            security_group_ids: Vec::new(),
            route_table_ids: vpc.route_table_ids.clone(),
        },
    )?;

    stack.add_resource(
        "BastionRole",
        "AWS::IAM::Role",
        &RoleProperties::for_service(
            "ec2.amazonaws.com",
            vec!["arn:aws:iam::aws:policy/AmazonSSMManagedInstanceCore".to_string()],
        ),
    )?;
    stack.add_resource(
        "BastionInstanceProfile",
        "AWS::IAM::InstanceProfile",
        &InstanceProfileProperties {
            roles: vec![intrinsics::r#ref("BastionRole")],
        },
    )?;

    stack.add_parameter(
        "BastionImageId",
        Parameter {
            parameter_type: "AWS::SSM::Parameter::Value<AWS::EC2::Image::Id>".to_string(),
            default: Some(AMAZON_LINUX_2_AMI_PARAMETER.to_string()),
            description: Some("AMI for the bastion host (latest Amazon Linux 2)".to_string()),
        },
    )?;

    stack.add_resource(
        "BastionHost",
        "AWS::EC2::Instance",
        &InstanceProperties {
            instance_type: "t3.small".to_string(),
            image_id: intrinsics::r#ref("BastionImageId"),
            subnet_id: vpc.subnet_ids[0].clone(),
            security_group_ids: vec![intrinsics::r#ref("BastionSecurityGroup")],
            iam_instance_profile: Some(intrinsics::r#ref("BastionInstanceProfile")),
            user_data: Some(intrinsics::base64(Value::String(USER_DATA.to_string()))),
            tags: vec![Tag::name("example-bastion-host")],
        },
    )?;

    stack.add_output(
        "SecurityGroupId",
        Output::new(intrinsics::get_att("BastionSecurityGroup", "GroupId"))
            .description("Bastion security group, reused by the database stack")
            .exported_as(Stack::export_name(BASTION_STACK, "SecurityGroupId")),
    )?;

    let handle = SecurityGroupHandle {
        group_id: import(BASTION_STACK, "SecurityGroupId"),
    };

    Ok((stack, handle))
}
