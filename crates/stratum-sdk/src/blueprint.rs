//! Ready-made stacks.

use stratum_common::error::Result;

use crate::builder::{
    GroupBuilder, GroupMembershipBuilder, PolicyAttachmentBuilder, PolicyBuilder, RoleBuilder,
    UserBuilder,
};
use crate::stack::Stack;

const EC2_TRUST_POLICY: &str = r#"{
  "Version": "2012-10-17",
  "Statement": [{
    "Effect": "Allow",
    "Principal": { "Service": "ec2.amazonaws.com" },
    "Action": "sts:AssumeRole"
  }]
}"#;

const CLIENT_VPN_POLICY: &str = r#"{
  "Version": "2012-10-17",
  "Statement": [{
    "Action": "*",
    "Resource": ["arn:aws:ec2:*:*:client-vpn-endpoint/*"],
    "Effect": "Allow"
  }]
}"#;

const TAG_TEAM: &str = "Devops";
const TAG_COMPANY: &str = "Your compnay";

/// Names of the outputs bound by [`iam_demo`], in bind order.
pub const IAM_DEMO_OUTPUTS: [&str; 5] = [
    "iam-group",
    "iam-user",
    "iam-role",
    "iam-policy",
    "iam-attachment",
];

/// Builds the IAM demo stack: a group, a user, an EC2 role, a client VPN
/// policy, the user's membership in the group, and an attachment of the
/// policy to all three principals, with five outputs.
///
/// # Errors
///
/// Returns an error if any resource fails to build or declare.
pub fn iam_demo(stack_name: &str) -> Result<Stack> {
    let mut stack = Stack::new(stack_name);

    let group = stack.add(
        GroupBuilder::new("iam-group-demo")
            .name("CDKtf-Golang-Group-Demo")
            .build()?,
    )?;

    let user_name = "CDKtf-Golang-User-Demo";
    let user = stack.add(
        UserBuilder::new("iam-user-demo")
            .name(user_name)
            .tag("Name", user_name)
            .tag("Team", TAG_TEAM)
            .tag("Company", TAG_COMPANY)
            .build()?,
    )?;

    let role_name = "CDKtf-Golang-role-Demo";
    let role = stack.add(
        RoleBuilder::new("iam-role-demo")
            .name(role_name)
            .assume_role_policy(EC2_TRUST_POLICY)
            .tag("Name", role_name)
            .tag("Team", TAG_TEAM)
            .tag("Company", TAG_COMPANY)
            .build()?,
    )?;

    let policy = stack.add(
        PolicyBuilder::new("iam-policy-demo")
            .name("CDKtf-Golang-policy-Demo")
            .policy(CLIENT_VPN_POLICY)
            .description("This policy is for Golang demo")
            .build()?,
    )?;

    let _ = stack.add(
        GroupMembershipBuilder::new("iam-group-membership-demo")
            .name("group-membership")
            .group(group.attribute("name"))
            .user(user.attribute("name"))
            .build()?,
    )?;

    let attachment = stack.add(
        PolicyAttachmentBuilder::new("iam-application-managed-policy-demo")
            .name("CDKtf-Golang-iam-attachment-Demo")
            .group(group.attribute("name"))
            .role(role.attribute("name"))
            .user(user.attribute("name"))
            .policy_arn(policy.attribute("arn"))
            .build()?,
    )?;

    let [group_out, user_out, role_out, policy_out, attachment_out] = IAM_DEMO_OUTPUTS;
    stack.output(group_out, group.attribute("name"))?;
    // The user's name, not the group's: the upstream CDKtf demo exposed the
    // group name under "iam-user".
    stack.output(user_out, user.attribute("name"))?;
    stack.output(role_out, role.attribute("arn"))?;
    stack.output(policy_out, policy.attribute("arn"))?;
    stack.output(attachment_out, attachment.attribute("name"))?;

    tracing::info!(stack = stack_name, resources = stack.graph().len(), "declared IAM demo stack");
    Ok(stack)
}
