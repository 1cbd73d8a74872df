//! CloudFormation template model.
//!
//! A [`Template`] is the synthesized form of one stack: parameters, resources,
//! and outputs keyed by logical id. Maps are insertion-ordered so that two
//! syntheses from the same declarations produce byte-identical JSON.
//!
//! The [`intrinsics`] submodule builds CloudFormation intrinsic function
//! nodes (`Ref`, `Fn::GetAtt`, `Fn::ImportValue`, ...) as plain JSON values;
//! nothing in this crate evaluates them, that is CloudFormation's job.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// The CloudFormation template format version this crate emits.
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// A synthesized CloudFormation template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Parameter>,

    pub resources: IndexMap<String, Resource>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub outputs: IndexMap<String, Output>,
}

impl Template {
    /// Creates an empty template with the standard format version.
    pub fn new(description: Option<String>) -> Self {
        Self {
            format_version: TEMPLATE_FORMAT_VERSION.to_string(),
            description,
            parameters: IndexMap::new(),
            resources: IndexMap::new(),
            outputs: IndexMap::new(),
        }
    }

    /// Returns the logical ids of resources with the given type, in
    /// declaration order.
    pub fn resources_of_type<'a>(&'a self, resource_type: &'a str) -> impl Iterator<Item = &'a str> {
        self.resources
            .iter()
            .filter(move |(_, r)| r.resource_type == resource_type)
            .map(|(id, _)| id.as_str())
    }
}

/// A template parameter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(rename = "Type")]
    pub parameter_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single declared resource.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,

    pub properties: Value,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<DeletionPolicy>,
}

impl Resource {
    /// Creates a resource of the given type with already-serialized
    /// properties.
    pub fn new(resource_type: impl Into<String>, properties: Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties,
            depends_on: Vec::new(),
            deletion_policy: None,
        }
    }

    /// Adds an in-stack ordering dependency on another logical id.
    pub fn depends_on(mut self, logical_id: impl Into<String>) -> Self {
        self.depends_on.push(logical_id.into());
        self
    }

    /// Sets the deletion policy.
    pub fn deletion_policy(mut self, policy: DeletionPolicy) -> Self {
        self.deletion_policy = Some(policy);
        self
    }
}

/// Resource deletion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeletionPolicy {
    Delete,
    Retain,
    Snapshot,
}

/// A stack output, optionally exported for cross-stack imports.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    pub value: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<Export>,
}

impl Output {
    /// Creates an output holding the given value.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            description: None,
            export: None,
        }
    }

    /// Exports the output under the given name for `Fn::ImportValue`.
    pub fn exported_as(mut self, name: impl Into<String>) -> Self {
        self.export = Some(Export { name: name.into() });
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Export block of an output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Export {
    pub name: String,
}

/// CloudFormation intrinsic function builders.
pub mod intrinsics {
    use serde_json::{json, Value};

    /// `{"Ref": logical_id}`
    pub fn r#ref(logical_id: &str) -> Value {
        json!({ "Ref": logical_id })
    }

    /// `{"Fn::GetAtt": [logical_id, attribute]}`
    pub fn get_att(logical_id: &str, attribute: &str) -> Value {
        json!({ "Fn::GetAtt": [logical_id, attribute] })
    }

    /// `{"Fn::ImportValue": export_name}`
    pub fn import_value(export_name: &str) -> Value {
        json!({ "Fn::ImportValue": export_name })
    }

    /// `{"Fn::Select": [index, {"Fn::GetAZs": ""}]}`, the nth availability
    /// zone of the target region.
    pub fn availability_zone(index: usize) -> Value {
        json!({ "Fn::Select": [index, { "Fn::GetAZs": "" }] })
    }

    /// `{"Fn::Sub": template}`
    pub fn sub(template: &str) -> Value {
        json!({ "Fn::Sub": template })
    }

    /// `{"Fn::Base64": value}`
    pub fn base64(value: Value) -> Value {
        json!({ "Fn::Base64": value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn intrinsics_serialize_to_cloudformation_shapes() {
        assert_eq!(intrinsics::r#ref("Vpc"), json!({ "Ref": "Vpc" }));
        assert_eq!(
            intrinsics::get_att("Role", "Arn"),
            json!({ "Fn::GetAtt": ["Role", "Arn"] })
        );
        assert_eq!(
            intrinsics::import_value("vpc:VpcId"),
            json!({ "Fn::ImportValue": "vpc:VpcId" })
        );
        assert_eq!(
            intrinsics::availability_zone(1),
            json!({ "Fn::Select": [1, { "Fn::GetAZs": "" }] })
        );
    }

    #[test]
    fn empty_sections_are_omitted() {
        let mut template = Template::new(None);
        template
            .resources
            .insert("Thing".into(), Resource::new("AWS::EC2::VPC", json!({})));

        let rendered = serde_json::to_value(&template).unwrap();
        assert!(rendered.get("Parameters").is_none());
        assert!(rendered.get("Outputs").is_none());
        assert!(rendered.get("Description").is_none());
        assert_eq!(rendered["AWSTemplateFormatVersion"], "2010-09-09");
    }

    #[test]
    fn depends_on_and_deletion_policy_render() {
        let resource = Resource::new("AWS::RDS::DBInstance", json!({}))
            .depends_on("SubnetGroup")
            .deletion_policy(DeletionPolicy::Snapshot);

        let rendered = serde_json::to_value(&resource).unwrap();
        assert_eq!(rendered["DependsOn"], json!(["SubnetGroup"]));
        assert_eq!(rendered["DeletionPolicy"], "Snapshot");
    }
}
