//! # stratum-sdk
//!
//! Public SDK for declaring identity stacks as a Rust library.
//!
//! Provides three main entry points:
//! - [`builder`]: Fluent builders for every recognized resource kind.
//! - [`Stack`](stack::Stack): Owns a composition graph and its outputs, and synthesizes them.
//! - [`blueprint`]: Ready-made stacks, such as the IAM demo stack.
//!
//! # Example
//!
//! ```rust
//! use stratum_sdk::builder::{GroupBuilder, UserBuilder, GroupMembershipBuilder};
//! use stratum_sdk::stack::Stack;
//!
//! # fn main() -> stratum_common::error::Result<()> {
//! let mut stack = Stack::new("demo");
//! let group = stack.add(GroupBuilder::new("ops").name("ops").build()?)?;
//! let user = stack.add(UserBuilder::new("alice").name("alice").build()?)?;
//! let _ = stack.add(
//!     GroupMembershipBuilder::new("ops-members")
//!         .name("ops-members")
//!         .group(group.attribute("name"))
//!         .user(user.attribute("name"))
//!         .build()?,
//! )?;
//! stack.output("group", group.attribute("name"))?;
//!
//! let synthesis = stack.synthesize()?;
//! assert_eq!(synthesis.resolved.ordered_ids(), vec!["ops", "alice", "ops-members"]);
//! # Ok(())
//! # }
//! ```

pub mod blueprint;
pub mod builder;
pub mod stack;
