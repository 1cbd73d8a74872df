//! The three stack definitions and their composition root.
//!
//! Composition is a single pass in strict dependency order: build the
//! network, pass its handle into the bastion definition, pass both handles
//! into the database definition. Handles are immutable bundles of
//! `Fn::ImportValue` tokens over the exporting stack's outputs; dependents
//! never hold references into another stack's resource graph.
//!
//! ## Stacks
//!
//! - [`vpc`]: isolated two-AZ network, no route to the internet
//! - [`bastion`]: Session-Manager-only bastion host with VPC endpoints
//! - [`rds`]: PostgreSQL instance reachable only from the bastion

pub mod bastion;
pub mod rds;
pub mod vpc;

use serde_json::Value;

use crate::config::Config;
use crate::error::Result;
use crate::stack::StackApp;

pub use bastion::SecurityGroupHandle;
pub use vpc::VpcHandle;

/// Name of the network stack.
pub const VPC_STACK: &str = "vpc";
/// Name of the bastion host stack.
pub const BASTION_STACK: &str = "bastion-host";
/// Name of the database stack.
pub const RDS_STACK: &str = "rds";

/// Secure-shell-compatible port the bastion may dial out on.
pub const SSH_PORT: i32 = 22;
/// HTTPS, for the Session Manager and package-repository endpoints.
pub const HTTPS_PORT: i32 = 443;
/// PostgreSQL port.
pub const POSTGRES_PORT: i32 = 5432;

/// Builds the fully wired app: network, then bastion, then database.
///
/// Takes no ambient state; everything flows from `config`. Calling this
/// twice with the same configuration yields structurally identical apps.
pub fn compose(config: &Config) -> Result<StackApp> {
    let mut app = StackApp::new();

    let (vpc_stack, vpc_handle) = vpc::build(config)?;
    app.add(vpc_stack)?;

    let (bastion_stack, bastion_sg) = bastion::build(config, &vpc_handle)?;
    app.add(bastion_stack)?;

    let rds_stack = rds::build(config, &vpc_handle, &bastion_sg)?;
    app.add(rds_stack)?;

    Ok(app)
}

/// Fully qualified endpoint service name, `com.amazonaws.<region>.<service>`.
fn endpoint_service_name(region: &str, service: &str) -> String {
    format!("com.amazonaws.{region}.{service}")
}

/// Convenience for handle fields: import token for a stack export.
fn import(stack_name: &str, attribute: &str) -> Value {
    crate::template::intrinsics::import_value(&crate::stack::Stack::export_name(
        stack_name, attribute,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_wires_the_dependency_dag() {
        let app = compose(&Config::default()).unwrap();

        let names: Vec<_> = app.stacks().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec![VPC_STACK, BASTION_STACK, RDS_STACK]);

        assert!(app.get(VPC_STACK).unwrap().dependencies().is_empty());
        assert_eq!(app.get(BASTION_STACK).unwrap().dependencies(), [VPC_STACK]);
        assert_eq!(
            app.get(RDS_STACK).unwrap().dependencies(),
            [VPC_STACK, BASTION_STACK]
        );
    }

    #[test]
    fn endpoint_service_names_are_region_qualified() {
        assert_eq!(
            endpoint_service_name("ap-northeast-1", "ssm"),
            "com.amazonaws.ap-northeast-1.ssm"
        );
    }
}
