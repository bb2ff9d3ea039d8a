//! System-wide constants and default settings.

/// Default cloud region handed to the provider block.
pub const DEFAULT_REGION: &str = "us-west-1";

/// Default remote backend hostname.
pub const DEFAULT_BACKEND_HOSTNAME: &str = "app.terraform.io";

/// Default remote backend organization.
pub const DEFAULT_ORGANIZATION: &str = "jigsaw373";

/// Default remote backend workspace name.
pub const DEFAULT_WORKSPACE: &str = "cdktf-go-aws-iam";

/// Default stack name; also the stem of the emitted artifact.
pub const DEFAULT_STACK_NAME: &str = "aws_instance";

/// Default directory for synthesized artifacts.
pub const DEFAULT_OUTPUT_DIR: &str = "stratum.out";

/// File extension of emitted JSON documents.
pub const ARTIFACT_EXTENSION: &str = ".tf.json";

/// Provider name used for the provider and resource type prefixes.
pub const PROVIDER_NAME: &str = "aws";

/// Application name used in CLI output.
pub const APP_NAME: &str = "stratum";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "strat";
