//! EC2 resource property records: VPC, subnets, routing, security groups,
//! VPC endpoints, and instances.

use serde::Serialize;
use serde_json::Value;

use super::Tag;

/// `AWS::EC2::VPC` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VpcProperties {
    pub cidr_block: String,
    pub enable_dns_support: bool,
    pub enable_dns_hostnames: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// `AWS::EC2::Subnet` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubnetProperties {
    pub vpc_id: Value,
    pub cidr_block: String,
    pub availability_zone: Value,
    /// Isolated subnets never assign public addresses.
    pub map_public_ip_on_launch: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// `AWS::EC2::RouteTable` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteTableProperties {
    pub vpc_id: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// `AWS::EC2::SubnetRouteTableAssociation` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubnetRouteTableAssociationProperties {
    pub subnet_id: Value,
    pub route_table_id: Value,
}

/// `AWS::EC2::SecurityGroup` properties.
///
/// CloudFormation adds an allow-all egress rule when `SecurityGroupEgress`
/// is absent; declaring explicit egress entries replaces that default, which
/// is how default-deny egress is expressed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroupProperties {
    pub group_name: String,
    pub group_description: String,
    pub vpc_id: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_group_ingress: Vec<SecurityGroupRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_group_egress: Vec<SecurityGroupRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// A single ingress or egress rule entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroupRule {
    /// IP protocol: tcp, udp, icmp, -1 (all)
    pub ip_protocol: String,
    pub from_port: i32,
    pub to_port: i32,
    /// IPv4 peer, exclusive with `source_security_group_id`. A JSON value
    /// so it can carry an imported CIDR as well as a literal one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr_ip: Option<Value>,
    /// Peer security group, for group-to-group rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_security_group_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SecurityGroupRule {
    /// A TCP rule whose peer is an IPv4 CIDR block.
    pub fn tcp_to_cidr(port: i32, cidr: impl Into<String>) -> Self {
        Self {
            ip_protocol: "tcp".to_string(),
            from_port: port,
            to_port: port,
            cidr_ip: Some(Value::String(cidr.into())),
            source_security_group_id: None,
            description: None,
        }
    }

    /// A TCP rule whose peer is another security group.
    pub fn tcp_from_security_group(port: i32, source: Value) -> Self {
        Self {
            ip_protocol: "tcp".to_string(),
            from_port: port,
            to_port: port,
            cidr_ip: None,
            source_security_group_id: Some(source),
            description: None,
        }
    }

    /// Sets the rule description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// VPC endpoint kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VpcEndpointType {
    Interface,
    Gateway,
}

/// `AWS::EC2::VPCEndpoint` properties.
///
/// Interface endpoints bind to subnets and security groups; gateway
/// endpoints bind to route tables. The unused bindings stay empty.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VpcEndpointProperties {
    pub vpc_id: Value,
    pub service_name: String,
    pub vpc_endpoint_type: VpcEndpointType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_dns_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subnet_ids: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_group_ids: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub route_table_ids: Vec<Value>,
}

/// `AWS::EC2::Instance` properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceProperties {
    pub instance_type: String,
    pub image_id: Value,
    pub subnet_id: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_group_ids: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iam_instance_profile: Option<Value>,
    /// First-boot script, wrapped in `Fn::Base64`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn cidr_rule_omits_group_peer() {
        let rule = SecurityGroupRule::tcp_to_cidr(443, "0.0.0.0/0");
        let rendered = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            rendered,
            json!({
                "IpProtocol": "tcp",
                "FromPort": 443,
                "ToPort": 443,
                "CidrIp": "0.0.0.0/0",
            })
        );
    }

    #[test]
    fn group_rule_omits_cidr_peer() {
        let rule = SecurityGroupRule::tcp_from_security_group(
            5432,
            json!({ "Fn::ImportValue": "bastion-host:SecurityGroupId" }),
        )
        .description("db access");
        let rendered = serde_json::to_value(&rule).unwrap();
        assert_eq!(rendered["SourceSecurityGroupId"]["Fn::ImportValue"], "bastion-host:SecurityGroupId");
        assert!(rendered.get("CidrIp").is_none());
        assert_eq!(rendered["Description"], "db access");
    }

    #[test]
    fn endpoint_type_serializes_as_plain_string() {
        assert_eq!(
            serde_json::to_value(VpcEndpointType::Interface).unwrap(),
            json!("Interface")
        );
        assert_eq!(
            serde_json::to_value(VpcEndpointType::Gateway).unwrap(),
            json!("Gateway")
        );
    }
}
