use clap::{ArgAction, Parser};
use iam_copy_role_core::{ClientOptions, CopyRoleArgs, CopyRoleResult};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "iam-copy-role",
    version,
    about = "Copy an IAM role with its trust policy, inline policies and managed policies to a new role",
    long_about = "Copy an IAM role with its trust policy, inline policies and managed policies to a new role.\n\n\
The source role is read with the ambient AWS credentials. When ROLE_TO_ASSUME_ARN is given, that role is \
assumed and the new role is created with its temporary credentials, e.g. in another account."
)]
pub struct Cli {
    #[arg(value_name = "SOURCE_ROLE_NAME", help = "Name of the role to copy")]
    pub source_role_name: String,

    #[arg(value_name = "TARGET_ROLE_NAME", help = "Name of the role to create")]
    pub target_role_name: String,

    #[arg(
        value_name = "ROLE_TO_ASSUME_ARN",
        help = "Role to assume for creating the target role"
    )]
    pub role_to_assume_arn: Option<String>,

    #[arg(long, help = "AWS region for the IAM and STS clients")]
    pub region: Option<String>,

    #[arg(long, help = "Print a JSON summary of the copy on success")]
    pub json: bool,

    #[arg(short = 'v', long, action = ArgAction::Count, help = "Increase verbosity (-v debug, -vv trace)")]
    pub verbose: u8,
}

impl Cli {
    pub fn copy_args(&self) -> CopyRoleResult<CopyRoleArgs> {
        CopyRoleArgs::new(
            self.source_role_name.clone(),
            self.target_role_name.clone(),
            self.role_to_assume_arn.clone(),
        )
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            region: self.region.clone(),
        }
    }
}
