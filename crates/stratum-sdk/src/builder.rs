//! Fluent builders for the recognized resource kinds.
//!
//! Every setter accepts either a literal or a [`Reference`] obtained from a
//! [`ResourceHandle`](stratum_compose::graph::ResourceHandle), so resources
//! can be wired together before their values exist.

use std::collections::BTreeMap;

use stratum_common::error::{Result, StratumError};
use stratum_compose::descriptor::{ResourceDescriptor, ResourceKind};
use stratum_compose::value::{Reference, Value};

fn missing(kind: ResourceKind, id: &str, field: &str) -> StratumError {
    StratumError::Config {
        message: format!("{kind} \"{id}\" requires {field}"),
    }
}

fn require(kind: ResourceKind, id: &str, field: &str, value: Option<Value>) -> Result<Value> {
    value.ok_or_else(|| missing(kind, id, field))
}

/// Rejects literal policy documents that are not JSON. References pass through.
fn check_policy_document(kind: ResourceKind, id: &str, document: &Value) -> Result<()> {
    if let Value::String(text) = document {
        let _: serde_json::Value = serde_json::from_str(text).map_err(|e| StratumError::Config {
            message: format!("{kind} \"{id}\" has an invalid policy document: {e}"),
        })?;
    }
    Ok(())
}

fn tags_value(tags: BTreeMap<String, String>) -> Option<Value> {
    (!tags.is_empty()).then(|| Value::map(tags))
}

/// Builder for an identity group.
#[derive(Debug)]
pub struct GroupBuilder {
    id: String,
    name: Option<Value>,
    path: Option<Value>,
}

impl GroupBuilder {
    /// Creates a builder for the group with logical id `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            path: None,
        }
    }

    /// Sets the group name.
    #[must_use]
    pub fn name(mut self, name: impl Into<Value>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the group path.
    #[must_use]
    pub fn path(mut self, path: impl Into<Value>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Builds the descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is missing.
    pub fn build(self) -> Result<ResourceDescriptor> {
        let kind = ResourceKind::IamGroup;
        let mut descriptor = ResourceDescriptor::new(kind, &self.id)
            .with_attribute("name", require(kind, &self.id, "a name", self.name)?);
        if let Some(path) = self.path {
            descriptor = descriptor.with_attribute("path", path);
        }
        Ok(descriptor)
    }
}

/// Builder for an identity user.
#[derive(Debug)]
pub struct UserBuilder {
    id: String,
    name: Option<Value>,
    tags: BTreeMap<String, String>,
}

impl UserBuilder {
    /// Creates a builder for the user with logical id `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            tags: BTreeMap::new(),
        }
    }

    /// Sets the user name.
    #[must_use]
    pub fn name(mut self, name: impl Into<Value>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.tags.insert(key.into(), value.into());
        self
    }

    /// Builds the descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is missing.
    pub fn build(self) -> Result<ResourceDescriptor> {
        let kind = ResourceKind::IamUser;
        let mut descriptor = ResourceDescriptor::new(kind, &self.id)
            .with_attribute("name", require(kind, &self.id, "a name", self.name)?);
        if let Some(tags) = tags_value(self.tags) {
            descriptor = descriptor.with_attribute("tags", tags);
        }
        Ok(descriptor)
    }
}

/// Builder for an assumable role.
#[derive(Debug)]
pub struct RoleBuilder {
    id: String,
    name: Option<Value>,
    assume_role_policy: Option<Value>,
    tags: BTreeMap<String, String>,
}

impl RoleBuilder {
    /// Creates a builder for the role with logical id `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            assume_role_policy: None,
            tags: BTreeMap::new(),
        }
    }

    /// Sets the role name.
    #[must_use]
    pub fn name(mut self, name: impl Into<Value>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the trust policy document (JSON).
    #[must_use]
    pub fn assume_role_policy(mut self, document: impl Into<Value>) -> Self {
        self.assume_role_policy = Some(document.into());
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.tags.insert(key.into(), value.into());
        self
    }

    /// Builds the descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or trust policy is missing, or if a
    /// literal trust policy is not valid JSON.
    pub fn build(self) -> Result<ResourceDescriptor> {
        let kind = ResourceKind::IamRole;
        let policy = require(kind, &self.id, "an assume_role_policy", self.assume_role_policy)?;
        check_policy_document(kind, &self.id, &policy)?;
        let mut descriptor = ResourceDescriptor::new(kind, &self.id)
            .with_attribute("name", require(kind, &self.id, "a name", self.name)?)
            .with_attribute("assume_role_policy", policy);
        if let Some(tags) = tags_value(self.tags) {
            descriptor = descriptor.with_attribute("tags", tags);
        }
        Ok(descriptor)
    }
}

/// Builder for a managed policy.
#[derive(Debug)]
pub struct PolicyBuilder {
    id: String,
    name: Option<Value>,
    policy: Option<Value>,
    description: Option<Value>,
}

impl PolicyBuilder {
    /// Creates a builder for the policy with logical id `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            policy: None,
            description: None,
        }
    }

    /// Sets the policy name.
    #[must_use]
    pub fn name(mut self, name: impl Into<Value>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the policy document (JSON).
    #[must_use]
    pub fn policy(mut self, document: impl Into<Value>) -> Self {
        self.policy = Some(document.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<Value>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds the descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or document is missing, or if a literal
    /// document is not valid JSON.
    pub fn build(self) -> Result<ResourceDescriptor> {
        let kind = ResourceKind::IamPolicy;
        let policy = require(kind, &self.id, "a policy document", self.policy)?;
        check_policy_document(kind, &self.id, &policy)?;
        let mut descriptor = ResourceDescriptor::new(kind, &self.id)
            .with_attribute("name", require(kind, &self.id, "a name", self.name)?)
            .with_attribute("policy", policy);
        if let Some(description) = self.description {
            descriptor = descriptor.with_attribute("description", description);
        }
        Ok(descriptor)
    }
}

/// Builder for the membership of users in a group.
#[derive(Debug)]
pub struct GroupMembershipBuilder {
    id: String,
    name: Option<Value>,
    group: Option<Value>,
    users: Vec<Value>,
}

impl GroupMembershipBuilder {
    /// Creates a builder for the membership with logical id `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            group: None,
            users: Vec::new(),
        }
    }

    /// Sets the membership name.
    #[must_use]
    pub fn name(mut self, name: impl Into<Value>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the group, usually a reference to a group's `name`.
    #[must_use]
    pub fn group(mut self, group: impl Into<Value>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Adds a member user, usually a reference to a user's `name`.
    #[must_use]
    pub fn user(mut self, user: impl Into<Value>) -> Self {
        self.users.push(user.into());
        self
    }

    /// Builds the descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or group is missing or no user was added.
    pub fn build(self) -> Result<ResourceDescriptor> {
        let kind = ResourceKind::IamGroupMembership;
        if self.users.is_empty() {
            return Err(missing(kind, &self.id, "at least one user"));
        }
        Ok(ResourceDescriptor::new(kind, &self.id)
            .with_attribute("name", require(kind, &self.id, "a name", self.name)?)
            .with_attribute("group", require(kind, &self.id, "a group", self.group)?)
            .with_attribute("users", Value::List(self.users)))
    }
}

/// Builder for attaching a managed policy to groups, roles, and users.
#[derive(Debug)]
pub struct PolicyAttachmentBuilder {
    id: String,
    name: Option<Value>,
    policy_arn: Option<Value>,
    groups: Vec<Value>,
    roles: Vec<Value>,
    users: Vec<Value>,
}

impl PolicyAttachmentBuilder {
    /// Creates a builder for the attachment with logical id `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            policy_arn: None,
            groups: Vec::new(),
            roles: Vec::new(),
            users: Vec::new(),
        }
    }

    /// Sets the attachment name.
    #[must_use]
    pub fn name(mut self, name: impl Into<Value>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the attached policy, usually a reference to a policy's `arn`.
    #[must_use]
    pub fn policy_arn(mut self, arn: impl Into<Value>) -> Self {
        self.policy_arn = Some(arn.into());
        self
    }

    /// Adds a group.
    #[must_use]
    pub fn group(mut self, group: impl Into<Value>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Adds a role.
    #[must_use]
    pub fn role(mut self, role: impl Into<Value>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Adds a user.
    #[must_use]
    pub fn user(mut self, user: impl Into<Value>) -> Self {
        self.users.push(user.into());
        self
    }

    /// Builds the descriptor. Empty principal lists are omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or policy ARN is missing, or if no
    /// group, role, or user was added.
    pub fn build(self) -> Result<ResourceDescriptor> {
        let kind = ResourceKind::IamPolicyAttachment;
        if self.groups.is_empty() && self.roles.is_empty() && self.users.is_empty() {
            return Err(missing(kind, &self.id, "at least one group, role, or user"));
        }
        let mut descriptor = ResourceDescriptor::new(kind, &self.id)
            .with_attribute("name", require(kind, &self.id, "a name", self.name)?)
            .with_attribute(
                "policy_arn",
                require(kind, &self.id, "a policy_arn", self.policy_arn)?,
            );
        for (field, list) in [("groups", self.groups), ("roles", self.roles), ("users", self.users)] {
            if !list.is_empty() {
                descriptor = descriptor.with_attribute(field, Value::List(list));
            }
        }
        Ok(descriptor)
    }
}

/// Returns a reference to `attribute` on the resource with id `id`.
///
/// Useful for wiring to resources declared elsewhere (or later) without a handle.
#[must_use]
pub fn reference(id: impl Into<String>, attribute: impl Into<String>) -> Reference {
    Reference::new(id, attribute)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_requires_name() {
        let err = GroupBuilder::new("g").build().unwrap_err();
        assert!(err.to_string().contains("requires a name"), "got: {err}");
    }

    #[test]
    fn user_tags_become_map_attribute() {
        let user = UserBuilder::new("u")
            .name("alice")
            .tag("Team", "Devops")
            .build()
            .expect("build");
        assert_eq!(user.attribute("tags.Team"), Some(&Value::from("Devops")));
    }

    #[test]
    fn user_without_tags_has_no_tags_attribute() {
        let user = UserBuilder::new("u").name("alice").build().expect("build");
        assert!(user.attribute("tags").is_none());
    }

    #[test]
    fn role_rejects_malformed_trust_policy() {
        let err = RoleBuilder::new("r")
            .name("r")
            .assume_role_policy("{ not json")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("invalid policy document"), "got: {err}");
    }

    #[test]
    fn policy_accepts_referenced_document() {
        let policy = PolicyBuilder::new("p")
            .name("p")
            .policy(reference("doc", "json"))
            .build()
            .expect("build");
        assert_eq!(policy.references().count(), 1);
    }

    #[test]
    fn membership_requires_users() {
        let err = GroupMembershipBuilder::new("m")
            .name("m")
            .group(reference("g", "name"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("at least one user"), "got: {err}");
    }

    #[test]
    fn attachment_omits_empty_principal_lists() {
        let attachment = PolicyAttachmentBuilder::new("at")
            .name("at")
            .policy_arn(reference("p", "arn"))
            .role(reference("r", "name"))
            .build()
            .expect("build");
        assert!(attachment.attribute("roles").is_some());
        assert!(attachment.attribute("groups").is_none());
        assert!(attachment.attribute("users").is_none());
    }

    #[test]
    fn attachment_requires_a_principal() {
        let err = PolicyAttachmentBuilder::new("at")
            .name("at")
            .policy_arn(reference("p", "arn"))
            .build()
            .unwrap_err();
        assert!(matches!(err, StratumError::Config { .. }));
    }
}
