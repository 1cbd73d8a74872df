//! # Stacksmith - Declarative AWS Stacks for a Private Database Environment
//!
//! Stacksmith declares three AWS CloudFormation stacks (an isolated VPC, a
//! Session-Manager-only bastion host, and an RDS PostgreSQL instance) as
//! plain immutable Rust records and synthesizes them into deployable JSON
//! templates plus a deployment manifest. It owns nothing but the
//! declarations; CloudFormation does all provisioning.
//!
//! ## Core Concepts
//!
//! - **Stack**: a named, independently deployable unit of declared resources
//!   with explicit dependencies on sibling stacks
//! - **Handle**: an immutable bundle of `Fn::ImportValue` tokens a stack
//!   returns for its dependents, instead of live object references
//! - **Synthesis**: serializing the declared stacks into CloudFormation
//!   templates on disk, in deploy order
//!
//! ## Architecture Overview
//!
//! ```text
//! compose(&Config)
//!    │
//!    ├── stacks::vpc::build      ──► Stack "vpc"          ──► VpcHandle
//!    ├── stacks::bastion::build  ──► Stack "bastion-host" ──► SecurityGroupHandle
//!    └── stacks::rds::build      ──► Stack "rds"
//!                 │
//!                 ▼
//!        StackApp::synth_to_dir ──► vpc.template.json
//!                                   bastion-host.template.json
//!                                   rds.template.json
//!                                   manifest.json
//! ```
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use stacksmith::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = Config::default();
//!     let app = compose(&config)?;
//!     app.synth_to_dir(&config.synth.out_dir)?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod resources;
pub mod stack;
pub mod stacks;
pub mod template;

pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::config::{Config, DeployTarget};
    pub use crate::error::{Error, Result};
    pub use crate::stack::{Stack, StackApp};
    pub use crate::stacks::{compose, BASTION_STACK, RDS_STACK, VPC_STACK};
    pub use crate::template::{Output, Resource, Template};
}

pub use config::Config;
pub use error::{Error, Result};
pub use stack::{Stack, StackApp};
pub use stacks::compose;
