//! Network definition: an isolated VPC with private-only subnets.
//!
//! One /24 subnet per availability zone is carved sequentially out of the
//! VPC block, each with its own route table carrying only the implicit local
//! route. No internet gateway, no NAT gateway, no public subnets exist in
//! this stack, so nothing in the network has a route to the internet.

use std::net::Ipv4Addr;

use serde_json::Value;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::resources::ec2::{
    RouteTableProperties, SubnetProperties, SubnetRouteTableAssociationProperties, VpcProperties,
};
use crate::resources::Tag;
use crate::stack::Stack;
use crate::template::{intrinsics, Output};

use super::{import, VPC_STACK};

/// Import-value tokens over the network stack's exports, handed to the
/// bastion and database definitions.
#[derive(Debug, Clone)]
pub struct VpcHandle {
    pub vpc_id: Value,
    pub vpc_cidr: Value,
    pub subnet_ids: Vec<Value>,
    pub route_table_ids: Vec<Value>,
}

/// Builds the network stack and its handle.
pub fn build(config: &Config) -> Result<(Stack, VpcHandle)> {
    let network = &config.network;
    let mut stack = Stack::new(
        VPC_STACK,
        "Isolated VPC with private-only subnets",
        &config.target,
    );

    stack.add_resource(
        "Vpc",
        "AWS::EC2::VPC",
        &VpcProperties {
            cidr_block: network.vpc_cidr.clone(),
            enable_dns_support: true,
            enable_dns_hostnames: true,
            tags: vec![Tag::name("example-vpc")],
        },
    )?;
    stack.add_output(
        "VpcId",
        Output::new(intrinsics::r#ref("Vpc"))
            .exported_as(Stack::export_name(VPC_STACK, "VpcId")),
    )?;
    stack.add_output(
        "VpcCidr",
        Output::new(intrinsics::get_att("Vpc", "CidrBlock"))
            .exported_as(Stack::export_name(VPC_STACK, "VpcCidr")),
    )?;

    let subnet_cidrs = carve_subnets(&network.vpc_cidr, network.subnet_mask, network.max_azs)?;
    for (index, cidr) in subnet_cidrs.iter().enumerate() {
        let ordinal = index + 1;
        let subnet_id = format!("PrivateSubnet{ordinal}");
        let route_table_id = format!("PrivateSubnet{ordinal}RouteTable");
        let association_id = format!("PrivateSubnet{ordinal}RouteTableAssociation");

        stack.add_resource(
            &subnet_id,
            "AWS::EC2::Subnet",
            &SubnetProperties {
                vpc_id: intrinsics::r#ref("Vpc"),
                cidr_block: cidr.clone(),
                availability_zone: intrinsics::availability_zone(index),
                map_public_ip_on_launch: false,
                tags: vec![Tag::name(format!("example-vpc/private{ordinal}"))],
            },
        )?;
        stack.add_resource(
            &route_table_id,
            "AWS::EC2::RouteTable",
            &RouteTableProperties {
                vpc_id: intrinsics::r#ref("Vpc"),
                tags: vec![Tag::name(format!("example-vpc/private{ordinal}"))],
            },
        )?;
        stack.add_resource(
            &association_id,
            "AWS::EC2::SubnetRouteTableAssociation",
            &SubnetRouteTableAssociationProperties {
                subnet_id: intrinsics::r#ref(&subnet_id),
                route_table_id: intrinsics::r#ref(&route_table_id),
            },
        )?;

        stack.add_output(
            &format!("{subnet_id}Id"),
            Output::new(intrinsics::r#ref(&subnet_id))
                .exported_as(Stack::export_name(VPC_STACK, &format!("{subnet_id}Id"))),
        )?;
        stack.add_output(
            &format!("{route_table_id}Id"),
            Output::new(intrinsics::r#ref(&route_table_id))
                .exported_as(Stack::export_name(VPC_STACK, &format!("{route_table_id}Id"))),
        )?;
    }

    let handle = VpcHandle {
        vpc_id: import(VPC_STACK, "VpcId"),
        vpc_cidr: import(VPC_STACK, "VpcCidr"),
        subnet_ids: (1..=network.max_azs)
            .map(|i| import(VPC_STACK, &format!("PrivateSubnet{i}Id")))
            .collect(),
        route_table_ids: (1..=network.max_azs)
            .map(|i| import(VPC_STACK, &format!("PrivateSubnet{i}RouteTableId")))
            .collect(),
    };

    Ok((stack, handle))
}

/// Carves `count` sequential subnet blocks of the given prefix length out of
/// the VPC CIDR.
fn carve_subnets(vpc_cidr: &str, subnet_mask: u8, count: usize) -> Result<Vec<String>> {
    let (base, vpc_mask) = parse_cidr(vpc_cidr)?;
    if subnet_mask <= vpc_mask {
        return Err(Error::InvalidConfig {
            key: "network.subnet_mask".to_string(),
            message: format!("/{subnet_mask} does not fit inside {vpc_cidr}"),
        });
    }

    let subnet_size = 1u32 << (32 - subnet_mask);
    let vpc_size = 1u64 << (32 - vpc_mask);
    if (count as u64) * u64::from(subnet_size) > vpc_size {
        return Err(Error::InvalidConfig {
            key: "network.max_azs".to_string(),
            message: format!("{count} /{subnet_mask} subnets do not fit inside {vpc_cidr}"),
        });
    }

    Ok((0..count)
        .map(|i| {
            let address = Ipv4Addr::from(base + (i as u32) * subnet_size);
            format!("{address}/{subnet_mask}")
        })
        .collect())
}

/// Parses `a.b.c.d/len` into the network base address and prefix length.
fn parse_cidr(cidr: &str) -> Result<(u32, u8)> {
    let invalid = || Error::InvalidConfig {
        key: "network.vpc_cidr".to_string(),
        message: format!("'{cidr}' is not a valid IPv4 CIDR block"),
    };

    let (address, mask) = cidr.split_once('/').ok_or_else(invalid)?;
    let address: Ipv4Addr = address.parse().map_err(|_| invalid())?;
    let mask: u8 = mask.parse().map_err(|_| invalid())?;
    if mask > 32 {
        return Err(invalid());
    }
    let base = u32::from(address);
    // The address must be the network base; host bits would make the carved
    // subnets drift outside the declared block.
    if mask < 32 && base & ((1u32 << (32 - mask)) - 1) != 0 {
        return Err(invalid());
    }
    Ok((base, mask))
}
