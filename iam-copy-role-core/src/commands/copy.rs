//! Copy pipeline: credentials, source read, destination write.

use std::fmt;

use log::{debug, info, warn};

use crate::aws::client_provider::ClientProvider;
use crate::credentials::{get_credentials, resolve_ambient_credentials};
use crate::error::CopyRoleResult;
use crate::reader::RoleReader;
use crate::types::{CopyReport, CopyRoleArgs};
use crate::writer::RoleWriter;

/// Steps of a copy run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStage {
    ParseArgs,
    CheckCredentials,
    BuildSourceClient,
    ResolveDestCredentials,
    BuildDestClient,
    ReadRole,
    ReadInlinePolicies,
    ReadManagedPolicies,
    CreateRole,
    WriteInlinePolicies,
    WriteManagedPolicies,
    Done,
}

impl fmt::Display for CopyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CopyStage::ParseArgs => "parse arguments",
            CopyStage::CheckCredentials => "check credentials",
            CopyStage::BuildSourceClient => "build source client",
            CopyStage::ResolveDestCredentials => "resolve destination credentials",
            CopyStage::BuildDestClient => "build destination client",
            CopyStage::ReadRole => "read role",
            CopyStage::ReadInlinePolicies => "read inline policies",
            CopyStage::ReadManagedPolicies => "read managed policies",
            CopyStage::CreateRole => "create role",
            CopyStage::WriteInlinePolicies => "write inline policies",
            CopyStage::WriteManagedPolicies => "write managed policies",
            CopyStage::Done => "done",
        };
        f.write_str(name)
    }
}

fn enter(current: &mut CopyStage, next: CopyStage) {
    debug!("Stage: {} -> {}", current, next);
    *current = next;
}

impl<P: ClientProvider> super::service::RoleCopyService<P> {
    /// Copy `args.source_role_name` to a new role `args.target_role_name`.
    ///
    /// Everything is read from the source before anything is written to the destination.
    /// Each remote call is attempted once; the first failure ends the run.
    pub async fn copy_role(&self, args: &CopyRoleArgs) -> CopyRoleResult<CopyReport> {
        let mut stage = CopyStage::ParseArgs;
        let result = self.run(args, &mut stage).await;

        if let Err(e) = &result {
            debug!("Copy failed during stage '{}'", stage);
            if e.leaves_partial_target() {
                warn!(
                    "Role {} was created but is not fully configured; it is not rolled back",
                    args.target_role_name
                );
            }
        }
        result
    }

    async fn run(&self, args: &CopyRoleArgs, stage: &mut CopyStage) -> CopyRoleResult<CopyReport> {
        enter(stage, CopyStage::CheckCredentials);
        info!("Checking if AWS credentials are loaded...");
        resolve_ambient_credentials(&self.provider).await?;
        info!("AWS credentials found.");

        enter(stage, CopyStage::BuildSourceClient);
        let source = self.provider.source_iam();

        enter(stage, CopyStage::ResolveDestCredentials);
        let sts = self.provider.sts();
        let destination_credentials =
            get_credentials(&sts, args.role_to_assume_arn.as_deref()).await?;

        enter(stage, CopyStage::BuildDestClient);
        let destination = self
            .provider
            .destination_iam(destination_credentials.as_ref());

        let snapshot = RoleReader::new(&source)
            .read_snapshot(&args.source_role_name, |next| enter(stage, next))
            .await?;

        let target_role_arn = RoleWriter::new(&destination)
            .write_snapshot(&snapshot, &args.target_role_name, |next| enter(stage, next))
            .await?;

        enter(stage, CopyStage::Done);
        Ok(CopyReport {
            source_role: args.source_role_name.clone(),
            target_role: args.target_role_name.clone(),
            target_role_arn,
            assumed_role_arn: args.role_to_assume_arn.clone(),
            inline_policies: snapshot.inline_policies.into_iter().map(|p| p.name).collect(),
            managed_policies: snapshot
                .managed_policies
                .into_iter()
                .map(|p| p.policy_arn)
                .collect(),
        })
    }
}
