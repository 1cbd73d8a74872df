//! Stack records and the deployable app that groups them.
//!
//! A [`Stack`] is one independently deployable CloudFormation template plus
//! its deployment target and its dependencies on sibling stacks. A
//! [`StackApp`] is an ordered set of stacks whose insertion order is a valid
//! deploy order; [`StackApp::add`] rejects dependencies on stacks that are
//! not already present, so the set is a DAG by construction.
//!
//! Stacks are built once, handed around by reference, and never mutated
//! after composition returns.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::DeployTarget;
use crate::error::{Error, Result};
use crate::template::{Output, Parameter, Resource, Template};

/// One deployable stack: name, target, dependencies, template.
#[derive(Debug, Clone)]
pub struct Stack {
    name: String,
    target: DeployTarget,
    dependencies: Vec<String>,
    template: Template,
}

impl Stack {
    /// Creates an empty stack addressed to the given target.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        target: &DeployTarget,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.clone(),
            dependencies: Vec::new(),
            template: Template::new(Some(description.into())),
        }
    }

    /// The stack name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The deployment target the stack is addressed to.
    pub fn target(&self) -> &DeployTarget {
        &self.target
    }

    /// Names of the stacks this stack must be deployed after.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// The synthesized template.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Declares a deploy-order dependency on another stack.
    pub fn add_dependency(&mut self, stack_name: impl Into<String>) {
        self.dependencies.push(stack_name.into());
    }

    /// Export name for one of this stack's outputs, `<stack>:<attribute>`.
    pub fn export_name(stack_name: &str, attribute: &str) -> String {
        format!("{stack_name}:{attribute}")
    }

    /// Serializes `properties` and adds a resource under `logical_id`.
    pub fn add_resource<P: Serialize>(
        &mut self,
        logical_id: &str,
        resource_type: &str,
        properties: &P,
    ) -> Result<()> {
        let value = serde_json::to_value(properties)
            .map_err(|e| Error::property_serialization(logical_id, e.to_string()))?;
        self.add(logical_id, Resource::new(resource_type, value))
    }

    /// Adds an already-built resource under `logical_id`.
    pub fn add(&mut self, logical_id: &str, resource: Resource) -> Result<()> {
        if self.template.resources.contains_key(logical_id)
            || self.template.parameters.contains_key(logical_id)
        {
            return Err(Error::duplicate_logical_id(&self.name, logical_id));
        }
        debug!(stack = %self.name, logical_id, resource_type = %resource.resource_type, "declared resource");
        self.template.resources.insert(logical_id.to_string(), resource);
        Ok(())
    }

    /// Adds a template parameter under `logical_id`.
    pub fn add_parameter(&mut self, logical_id: &str, parameter: Parameter) -> Result<()> {
        if self.template.parameters.contains_key(logical_id)
            || self.template.resources.contains_key(logical_id)
        {
            return Err(Error::duplicate_logical_id(&self.name, logical_id));
        }
        self.template.parameters.insert(logical_id.to_string(), parameter);
        Ok(())
    }

    /// Adds an output under `logical_id`.
    pub fn add_output(&mut self, logical_id: &str, output: Output) -> Result<()> {
        if self.template.outputs.contains_key(logical_id) {
            return Err(Error::duplicate_logical_id(&self.name, logical_id));
        }
        self.template.outputs.insert(logical_id.to_string(), output);
        Ok(())
    }

    /// File name of the synthesized template.
    pub fn template_file_name(&self) -> String {
        format!("{}.template.json", self.name)
    }
}

/// An ordered set of stacks; insertion order is deploy order.
#[derive(Debug, Clone, Default)]
pub struct StackApp {
    stacks: Vec<Stack>,
}

impl StackApp {
    /// Creates an empty app.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stack.
    ///
    /// Fails if the name is already taken or the stack depends on a stack
    /// not yet added; the second check is what keeps insertion order a
    /// valid deploy order.
    pub fn add(&mut self, stack: Stack) -> Result<()> {
        if self.get(stack.name()).is_some() {
            return Err(Error::DuplicateStack(stack.name().to_string()));
        }
        for dependency in stack.dependencies() {
            if self.get(dependency).is_none() {
                return Err(Error::unknown_dependency(stack.name(), dependency));
            }
        }
        self.stacks.push(stack);
        Ok(())
    }

    /// All stacks in deploy order.
    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    /// Looks a stack up by name.
    pub fn get(&self, name: &str) -> Option<&Stack> {
        self.stacks.iter().find(|s| s.name() == name)
    }

    /// The deployment manifest for this app.
    pub fn manifest(&self) -> Manifest {
        Manifest {
            stacks: self
                .stacks
                .iter()
                .map(|stack| ManifestEntry {
                    name: stack.name().to_string(),
                    template_file: stack.template_file_name(),
                    region: stack.target().region.clone(),
                    account: stack.target().account.clone(),
                    dependencies: stack.dependencies().to_vec(),
                })
                .collect(),
        }
    }

    /// Writes one template file per stack plus `manifest.json` into `dir`,
    /// returning the written paths.
    pub fn synth_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::new();

        for stack in &self.stacks {
            let path = dir.join(stack.template_file_name());
            let mut rendered = serde_json::to_string_pretty(stack.template())?;
            rendered.push('\n');
            fs::write(&path, rendered)?;
            info!(stack = %stack.name(), path = %path.display(), "synthesized template");
            written.push(path);
        }

        let manifest_path = dir.join("manifest.json");
        let mut rendered = serde_json::to_string_pretty(&self.manifest())?;
        rendered.push('\n');
        fs::write(&manifest_path, rendered)?;
        written.push(manifest_path);

        Ok(written)
    }
}

/// Deployment manifest: stacks in deploy order with their targets.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub stacks: Vec<ManifestEntry>,
}

/// One stack entry in the manifest.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub name: String,
    pub template_file: String,
    pub region: String,
    pub account: String,
    pub dependencies: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::intrinsics;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn target() -> DeployTarget {
        DeployTarget::default()
    }

    #[test]
    fn duplicate_logical_id_is_rejected() {
        let mut stack = Stack::new("vpc", "test", &target());
        stack
            .add("Vpc", Resource::new("AWS::EC2::VPC", json!({})))
            .unwrap();
        let err = stack
            .add("Vpc", Resource::new("AWS::EC2::VPC", json!({})))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateLogicalId { .. }));
    }

    #[test]
    fn parameter_and_resource_ids_share_a_namespace() {
        let mut stack = Stack::new("bastion-host", "test", &target());
        stack
            .add_parameter(
                "ImageId",
                Parameter {
                    parameter_type: "String".into(),
                    default: None,
                    description: None,
                },
            )
            .unwrap();
        let err = stack
            .add("ImageId", Resource::new("AWS::EC2::Instance", json!({})))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateLogicalId { .. }));
    }

    #[test]
    fn dependency_on_missing_stack_is_rejected() {
        let mut app = StackApp::new();
        let mut orphan = Stack::new("rds", "test", &target());
        orphan.add_dependency("vpc");
        let err = app.add(orphan).unwrap_err();
        assert!(matches!(err, Error::UnknownDependency { .. }));
    }

    #[test]
    fn duplicate_stack_name_is_rejected() {
        let mut app = StackApp::new();
        app.add(Stack::new("vpc", "test", &target())).unwrap();
        let err = app.add(Stack::new("vpc", "test", &target())).unwrap_err();
        assert!(matches!(err, Error::DuplicateStack(_)));
    }

    #[test]
    fn manifest_preserves_deploy_order_and_targets() {
        let mut app = StackApp::new();
        app.add(Stack::new("vpc", "network", &target())).unwrap();
        let mut bastion = Stack::new("bastion-host", "bastion", &target());
        bastion.add_dependency("vpc");
        app.add(bastion).unwrap();

        let manifest = app.manifest();
        let names: Vec<_> = manifest.stacks.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["vpc", "bastion-host"]);
        assert_eq!(manifest.stacks[1].dependencies, vec!["vpc"]);
        assert_eq!(manifest.stacks[0].region, "ap-northeast-1");
    }

    #[test]
    fn export_names_are_stack_scoped() {
        assert_eq!(Stack::export_name("vpc", "VpcId"), "vpc:VpcId");
        let _ = intrinsics::import_value(&Stack::export_name("vpc", "VpcId"));
    }
}
