//! In-memory IAM/STS doubles that record every call, for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::aws::client_provider::ClientProvider;
use crate::aws::iam_client::IamApi;
use crate::aws::sts::StsApi;
use crate::aws::{AwsError, AwsResult};
use crate::types::{
    CredentialBundle, InlinePolicy, ManagedPolicyRef, Page, RemoteInlinePolicy, RemoteRole,
    RoleSpec,
};

/// Which client issued a recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Side {
    Source,
    Destination,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetRole(String),
    ListRolePolicies(String, Option<String>),
    GetRolePolicy(String, String),
    ListAttachedRolePolicies(String, Option<String>),
    CreateRole(String, RoleSpec),
    PutRolePolicy(String, String, String),
    AttachRolePolicy(String, String),
    AssumeRole(String, String),
    BuildDestination(Option<CredentialBundle>),
}

/// Canned remote state plus the shared call log
#[derive(Debug, Default)]
pub struct MockState {
    pub roles: HashMap<String, RemoteRole>,
    pub inline_pages: Vec<Page<String>>,
    pub inline_documents: HashMap<String, String>,
    pub managed_pages: Vec<Page<ManagedPolicyRef>>,
    pub failing_operations: HashSet<&'static str>,
    /// Calls of an operation still allowed to succeed before it starts failing
    pub operation_budgets: HashMap<&'static str, usize>,
    pub failing_policies: HashSet<String>,
    pub credentials_present: bool,
    pub assumed_credentials: Option<CredentialBundle>,
    pub calls: Vec<(Side, Call)>,
}

#[derive(Clone, Default)]
pub struct MockAws {
    state: Arc<Mutex<MockState>>,
}

impl MockAws {
    pub fn new() -> Self {
        let mock = Self::default();
        mock.with_state(|s| s.credentials_present = true);
        mock
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut state = self.state.lock().expect("mock state poisoned");
        f(&mut state)
    }

    pub fn add_role(&self, role: RemoteRole) {
        self.with_state(|s| {
            s.roles.insert(role.role_name.clone(), role);
        });
    }

    pub fn add_inline_page(&self, page: Page<String>) {
        self.with_state(|s| s.inline_pages.push(page));
    }

    pub fn add_inline_document(&self, name: &str, encoded: &str) {
        self.with_state(|s| {
            s.inline_documents
                .insert(name.to_string(), encoded.to_string());
        });
    }

    pub fn add_managed_page(&self, page: Page<ManagedPolicyRef>) {
        self.with_state(|s| s.managed_pages.push(page));
    }

    /// Make every call of `operation` (e.g. `"GetRole"`) fail
    pub fn fail(&self, operation: &'static str) {
        self.with_state(|s| {
            s.failing_operations.insert(operation);
        });
    }

    /// Let `successes` calls of `operation` through, then fail every later one
    pub fn fail_after(&self, operation: &'static str, successes: usize) {
        self.with_state(|s| {
            s.operation_budgets.insert(operation, successes);
        });
    }

    /// Make writes or reads of one policy (by name or ARN) fail
    pub fn fail_policy(&self, identifier: &str) {
        self.with_state(|s| {
            s.failing_policies.insert(identifier.to_string());
        });
    }

    pub fn calls(&self) -> Vec<(Side, Call)> {
        self.with_state(|s| s.calls.clone())
    }

    pub fn calls_on(&self, side: Side) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|(s, _)| *s == side)
            .map(|(_, call)| call)
            .collect()
    }

    pub fn client(&self, side: Side) -> MockIam {
        MockIam {
            side,
            aws: self.clone(),
        }
    }

    fn record(&self, side: Side, call: Call, operation: &str, identifier: Option<&str>) -> AwsResult<()> {
        self.with_state(|s| {
            s.calls.push((side, call));
            let policy_fails = identifier.is_some_and(|id| s.failing_policies.contains(id));
            let budget_spent = match s.operation_budgets.get_mut(operation) {
                Some(0) => true,
                Some(remaining) => {
                    *remaining -= 1;
                    false
                }
                None => false,
            };
            if s.failing_operations.contains(operation) || policy_fails || budget_spent {
                Err(AwsError::IamError(format!("{operation} failed: simulated error")))
            } else {
                Ok(())
            }
        })
    }
}

pub struct MockIam {
    side: Side,
    aws: MockAws,
}

#[async_trait]
impl IamApi for MockIam {
    async fn get_role(&self, role_name: &str) -> AwsResult<RemoteRole> {
        self.aws
            .record(self.side.clone(), Call::GetRole(role_name.to_string()), "GetRole", None)?;
        self.aws
            .with_state(|s| s.roles.get(role_name).cloned())
            .ok_or_else(|| {
                AwsError::IamError(format!(
                    "NoSuchEntity: The role with name {role_name} cannot be found."
                ))
            })
    }

    async fn list_role_policies(
        &self,
        role_name: &str,
        marker: Option<String>,
    ) -> AwsResult<Page<String>> {
        let call = Call::ListRolePolicies(role_name.to_string(), marker.clone());
        self.aws
            .record(self.side.clone(), call, "ListRolePolicies", None)?;
        Ok(self
            .aws
            .with_state(|s| page_for(&s.inline_pages, marker.as_deref())))
    }

    async fn get_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
    ) -> AwsResult<RemoteInlinePolicy> {
        let call = Call::GetRolePolicy(role_name.to_string(), policy_name.to_string());
        self.aws
            .record(self.side.clone(), call, "GetRolePolicy", Some(policy_name))?;
        let document = self
            .aws
            .with_state(|s| s.inline_documents.get(policy_name).cloned())
            .ok_or_else(|| AwsError::IamError(format!("NoSuchEntity: policy {policy_name}")))?;
        Ok(RemoteInlinePolicy {
            policy_name: policy_name.to_string(),
            policy_document: document,
        })
    }

    async fn list_attached_role_policies(
        &self,
        role_name: &str,
        marker: Option<String>,
    ) -> AwsResult<Page<ManagedPolicyRef>> {
        let call = Call::ListAttachedRolePolicies(role_name.to_string(), marker.clone());
        self.aws
            .record(self.side.clone(), call, "ListAttachedRolePolicies", None)?;
        Ok(self
            .aws
            .with_state(|s| page_for(&s.managed_pages, marker.as_deref())))
    }

    async fn create_role(&self, role_name: &str, spec: &RoleSpec) -> AwsResult<Option<String>> {
        let call = Call::CreateRole(role_name.to_string(), spec.clone());
        self.aws
            .record(self.side.clone(), call, "CreateRole", Some(role_name))?;
        Ok(Some(format!(
            "arn:aws:iam::210987654321:role{}{role_name}",
            spec.path
        )))
    }

    async fn put_role_policy(&self, role_name: &str, policy: &InlinePolicy) -> AwsResult<()> {
        let call = Call::PutRolePolicy(
            role_name.to_string(),
            policy.name.clone(),
            policy.document.clone(),
        );
        self.aws
            .record(self.side.clone(), call, "PutRolePolicy", Some(&policy.name))
    }

    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> AwsResult<()> {
        let call = Call::AttachRolePolicy(role_name.to_string(), policy_arn.to_string());
        self.aws
            .record(self.side.clone(), call, "AttachRolePolicy", Some(policy_arn))
    }
}

/// Page `n` is served for marker `"page-n"`; no marker means page 0.
fn page_for<T: Clone>(pages: &[Page<T>], marker: Option<&str>) -> Page<T> {
    let index = marker
        .and_then(|m| m.strip_prefix("page-"))
        .and_then(|n| n.parse::<usize>().ok())
        .unwrap_or(0);
    pages
        .get(index)
        .cloned()
        .unwrap_or_else(|| Page::last(Vec::new()))
}

#[async_trait]
impl StsApi for MockAws {
    async fn assume_role(
        &self,
        role_arn: &str,
        session_name: &str,
    ) -> AwsResult<CredentialBundle> {
        self.with_state(|s| {
            s.calls.push((
                Side::Source,
                Call::AssumeRole(role_arn.to_string(), session_name.to_string()),
            ));
            if s.failing_operations.contains("AssumeRole") {
                return Err(AwsError::StsError(format!(
                    "AccessDenied: not authorized to assume {role_arn}"
                )));
            }
            Ok(s.assumed_credentials.clone().unwrap_or(CredentialBundle {
                access_key_id: "ASIAMOCK".to_string(),
                secret_access_key: "mock-secret".to_string(),
                session_token: "mock-token".to_string(),
            }))
        })
    }
}

#[async_trait]
impl ClientProvider for MockAws {
    type Iam = MockIam;
    type Sts = MockAws;

    async fn check_ambient_credentials(&self) -> AwsResult<()> {
        if self.with_state(|s| s.credentials_present) {
            Ok(())
        } else {
            Err(AwsError::ConfigError("no credentials in mock".to_string()))
        }
    }

    fn source_iam(&self) -> MockIam {
        self.client(Side::Source)
    }

    fn sts(&self) -> MockAws {
        self.clone()
    }

    fn destination_iam(&self, credentials: Option<&CredentialBundle>) -> MockIam {
        self.with_state(|s| {
            s.calls
                .push((Side::Destination, Call::BuildDestination(credentials.cloned())));
        });
        self.client(Side::Destination)
    }
}
