//! Resource descriptors and the closed set of recognized resource kinds.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stratum_common::error::StratumError;

use crate::value::{Reference, Value};

/// Recognized resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// An identity group.
    IamGroup,
    /// An identity user.
    IamUser,
    /// An assumable role.
    IamRole,
    /// A managed policy document.
    IamPolicy,
    /// Membership of users in a group.
    IamGroupMembership,
    /// Attachment of a managed policy to groups, roles, and users.
    IamPolicyAttachment,
}

impl ResourceKind {
    /// Every recognized kind, in declaration order of this enum.
    pub const ALL: [Self; 6] = [
        Self::IamGroup,
        Self::IamUser,
        Self::IamRole,
        Self::IamPolicy,
        Self::IamGroupMembership,
        Self::IamPolicyAttachment,
    ];

    /// Returns the backend type name, e.g. `aws_iam_group`.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::IamGroup => "aws_iam_group",
            Self::IamUser => "aws_iam_user",
            Self::IamRole => "aws_iam_role",
            Self::IamPolicy => "aws_iam_policy",
            Self::IamGroupMembership => "aws_iam_group_membership",
            Self::IamPolicyAttachment => "aws_iam_policy_attachment",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for ResourceKind {
    type Err = StratumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.type_name() == s)
            .ok_or_else(|| StratumError::NotFound {
                kind: "resource kind",
                id: s.to_string(),
            })
    }
}

/// One declared resource: a kind, a stable logical id, and its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Logical id, unique within a graph.
    pub id: String,
    /// Kind tag.
    pub kind: ResourceKind,
    /// Attribute name to value.
    pub attributes: BTreeMap<String, Value>,
}

impl ResourceDescriptor {
    /// Creates a descriptor with no attributes.
    #[must_use]
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            attributes: BTreeMap::new(),
        }
    }

    /// Sets an attribute, replacing any previous value.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Returns the value at a dot-separated attribute path.
    #[must_use]
    pub fn attribute(&self, path: &str) -> Option<&Value> {
        let (head, rest) = path.split_once('.').unwrap_or((path, ""));
        self.attributes.get(head)?.lookup(rest)
    }

    /// Returns every `(attribute, reference)` pair, in attribute order.
    pub fn references(&self) -> impl Iterator<Item = (&str, &Reference)> {
        self.attributes
            .iter()
            .flat_map(|(name, value)| value.references().into_iter().map(move |r| (name.as_str(), r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_type_name() {
        for kind in ResourceKind::ALL {
            let parsed: ResourceKind = kind.type_name().parse().expect("known kind");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = "aws_s3_bucket".parse::<ResourceKind>().unwrap_err();
        assert!(err.to_string().contains("aws_s3_bucket"));
    }

    #[test]
    fn attribute_path_reaches_nested_tags() {
        let user = ResourceDescriptor::new(ResourceKind::IamUser, "u")
            .with_attribute("name", "demo")
            .with_attribute("tags", Value::map([("Team", "Devops")]));

        assert_eq!(user.attribute("name"), Some(&Value::from("demo")));
        assert_eq!(user.attribute("tags.Team"), Some(&Value::from("Devops")));
        assert_eq!(user.attribute("arn"), None);
    }

    #[test]
    fn references_report_owning_attribute() {
        let membership = ResourceDescriptor::new(ResourceKind::IamGroupMembership, "m")
            .with_attribute("group", Reference::new("g", "name"))
            .with_attribute("users", Value::list([Reference::new("u", "name")]))
            .with_attribute("name", "group-membership");

        let refs: Vec<(&str, String)> = membership
            .references()
            .map(|(attr, r)| (attr, r.to_string()))
            .collect();
        assert_eq!(
            refs,
            vec![("group", "g.name".to_string()), ("users", "u.name".to_string())]
        );
    }
}
