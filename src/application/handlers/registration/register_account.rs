//! RegisterAccountHandler - Provisions an institutional account for a caller.
//!
//! Runs the registration pipeline:
//!
//! ```text
//! Authenticating → Validating → CheckingDuplicate → Provisioning → Persisting → Done
//! ```
//!
//! Any stage may abort. Nothing durable happens before `Provisioning`. The
//! account-creation call and the insert run on one spawned task, so once the
//! directory has been asked for an account the outcome is always recorded or
//! logged for reconciliation, even if the caller goes away.

use std::sync::Arc;

use crate::domain::foundation::{StateMachine, Timestamp};
use crate::domain::identity::{AccessToken, CallerIdentity, TrustTier};
use crate::domain::registration::{
    generate_credential, DuplicateField, GeneratedCredential, InputPolicy, NewRegistration,
    RegistrationAbort, RegistrationError, RegistrationRecord, RegistrationRequest,
    RegistrationStage,
};
use crate::ports::{
    DirectoryAccount, DirectoryError, DirectoryProvisioner, RegistrationStore, StoreError,
};

/// Command to register the authenticated caller.
#[derive(Debug, Clone)]
pub struct RegisterAccountCommand {
    pub caller: CallerIdentity,
    pub request: RegistrationRequest,
}

/// Result of a completed registration.
///
/// `credential` is the only copy of the password; the record has none.
#[derive(Debug)]
pub struct RegisterAccountResult {
    pub record: RegistrationRecord,
    pub credential: GeneratedCredential,
}

/// Handler for account registration.
pub struct RegisterAccountHandler {
    store: Arc<dyn RegistrationStore>,
    directory: Arc<dyn DirectoryProvisioner>,
    policy: InputPolicy,
    min_trust_tier: TrustTier,
}

/// Tracks the current stage of one attempt.
struct Pipeline<'a> {
    stage: RegistrationStage,
    external_username: &'a str,
}

impl<'a> Pipeline<'a> {
    fn start(external_username: &'a str) -> Self {
        Self {
            stage: RegistrationStage::Authenticating,
            external_username,
        }
    }

    fn advance(&mut self, next: RegistrationStage) -> Result<(), RegistrationAbort> {
        let next = self.stage.transition_to(next).map_err(|e| {
            RegistrationAbort::new(self.stage, RegistrationError::Internal(e.to_string()))
        })?;
        tracing::debug!(
            external_username = %self.external_username,
            from = %self.stage,
            to = %next,
            "Registration stage advanced"
        );
        self.stage = next;
        Ok(())
    }

    fn abort(&self, reason: RegistrationError) -> RegistrationAbort {
        if reason.is_client_error() {
            tracing::info!(
                external_username = %self.external_username,
                stage = %self.stage,
                reason = %reason,
                "Registration rejected"
            );
        } else {
            tracing::warn!(
                external_username = %self.external_username,
                stage = %self.stage,
                reason = ?reason,
                "Registration failed"
            );
        }
        RegistrationAbort::new(self.stage, reason)
    }
}

impl RegisterAccountHandler {
    pub fn new(
        store: Arc<dyn RegistrationStore>,
        directory: Arc<dyn DirectoryProvisioner>,
        policy: InputPolicy,
        min_trust_tier: TrustTier,
    ) -> Self {
        Self {
            store,
            directory,
            policy,
            min_trust_tier,
        }
    }

    pub async fn handle(
        &self,
        cmd: RegisterAccountCommand,
    ) -> Result<RegisterAccountResult, RegistrationAbort> {
        let RegisterAccountCommand { caller, request } = cmd;
        let mut pipeline = Pipeline::start(&caller.username);

        // 1. Trust gate
        if !caller.may_register(self.min_trust_tier) {
            return Err(pipeline.abort(RegistrationError::InsufficientTrust {
                actual: caller.trust_tier,
                required: self.min_trust_tier,
            }));
        }
        pipeline.advance(RegistrationStage::Validating)?;

        // 2. Input rules on the normalized request
        let request = self
            .policy
            .validate(request)
            .map_err(|violation| pipeline.abort(violation.into()))?;
        pipeline.advance(RegistrationStage::CheckingDuplicate)?;

        // 3. Early duplicate exit; insert re-checks atomically
        self.check_duplicates(&caller, &request)
            .await
            .map_err(|e| pipeline.abort(e))?;
        pipeline.advance(RegistrationStage::Provisioning)?;

        // 4. Service token; cancelling up to here leaves no trace
        let service_token = self
            .directory
            .obtain_service_token()
            .await
            .map_err(|e| pipeline.abort(directory_failed(e)))?;

        // 5. Directory account and local record, committed together
        let credential = generate_credential();
        let account = directory_account(&request, &credential);
        let registration = NewRegistration::from_validated(&caller, &request);
        let record = match self.commit(service_token, account, registration).await {
            Ok(record) => record,
            Err(CommitFailure::NotProvisioned(reason)) => return Err(pipeline.abort(reason)),
            Err(CommitFailure::NotRecorded(reason)) => {
                pipeline.advance(RegistrationStage::Persisting)?;
                return Err(pipeline.abort(reason));
            }
        };
        pipeline.advance(RegistrationStage::Persisting)?;
        pipeline.advance(RegistrationStage::Done)?;

        tracing::info!(
            registration_id = %record.id,
            external_username = %record.external_username,
            institutional_email = %record.institutional_email,
            "Registration completed"
        );

        Ok(RegisterAccountResult { record, credential })
    }

    async fn check_duplicates(
        &self,
        caller: &CallerIdentity,
        request: &RegistrationRequest,
    ) -> Result<(), RegistrationError> {
        if self
            .store
            .exists(&caller.username)
            .await
            .map_err(lookup_failed)?
        {
            return Err(RegistrationError::Duplicate(DuplicateField::ExternalUsername));
        }

        if self
            .store
            .email_taken(&request.institutional_email)
            .await
            .map_err(lookup_failed)?
        {
            return Err(RegistrationError::Duplicate(DuplicateField::InstitutionalEmail));
        }

        Ok(())
    }

    /// Creates the directory account and inserts the record on a spawned
    /// task. Once the POST is sent, dropping this future cannot stop the
    /// insert or the reconciliation log that replaces it.
    async fn commit(
        &self,
        service_token: AccessToken,
        account: DirectoryAccount,
        registration: NewRegistration,
    ) -> Result<RegistrationRecord, CommitFailure> {
        let directory = Arc::clone(&self.directory);
        let store = Arc::clone(&self.store);
        let institutional_email = account.primary_email.clone();

        let task = tokio::spawn(async move {
            if let Err(e) = directory.create_account(&service_token, &account).await {
                if let DirectoryError::AccountCreation { status: None, detail } = &e {
                    tracing::error!(
                        institutional_email = %account.primary_email,
                        external_username = %registration.external_username,
                        detail = %detail,
                        "Directory account creation outcome unknown; reconcile manually"
                    );
                }
                return Err(CommitFailure::NotProvisioned(directory_failed(e)));
            }
            insert_record(store.as_ref(), registration, Timestamp::now())
                .await
                .map_err(CommitFailure::NotRecorded)
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                tracing::error!(
                    %institutional_email,
                    detail = %join_error,
                    "Registration commit task failed; directory state unknown, reconcile manually"
                );
                Err(CommitFailure::NotProvisioned(RegistrationError::Internal(
                    join_error.to_string(),
                )))
            }
        }
    }
}

/// Where a commit stopped.
enum CommitFailure {
    /// The directory did not confirm the account.
    NotProvisioned(RegistrationError),
    /// The account exists but the registration was not recorded.
    NotRecorded(RegistrationError),
}

fn directory_account(
    request: &RegistrationRequest,
    credential: &GeneratedCredential,
) -> DirectoryAccount {
    DirectoryAccount {
        primary_email: request.institutional_email.clone(),
        recovery_email: request.recovery_email.clone(),
        given_name: request.first_name.clone(),
        family_name: request.last_name.clone(),
        password: credential.to_secret(),
    }
}

async fn insert_record(
    store: &dyn RegistrationStore,
    registration: NewRegistration,
    provisioned_at: Timestamp,
) -> Result<RegistrationRecord, RegistrationError> {
    let institutional_email = registration.institutional_email.clone();
    let external_username = registration.external_username.clone();

    let detail = match store.insert(registration).await {
        Ok(record) => return Ok(record),
        Err(StoreError::Duplicate(field)) => {
            tracing::error!(
                %institutional_email,
                %external_username,
                %provisioned_at,
                duplicate_field = %field,
                "Directory account provisioned but registration lost a uniqueness race; reconcile manually"
            );
            return Err(RegistrationError::Duplicate(field));
        }
        Err(StoreError::Unavailable(detail)) => detail,
    };

    tracing::error!(
        %institutional_email,
        %external_username,
        %provisioned_at,
        detail = %detail,
        "Directory account provisioned but registration was not recorded; reconcile manually"
    );
    Err(RegistrationError::Persistence {
        institutional_email,
        provisioned_at,
        detail,
    })
}

fn lookup_failed(e: StoreError) -> RegistrationError {
    RegistrationError::Internal(format!("duplicate check failed: {e}"))
}

fn directory_failed(e: DirectoryError) -> RegistrationError {
    match e {
        DirectoryError::ServiceToken { status, detail } => {
            RegistrationError::UpstreamAuth { status, detail }
        }
        DirectoryError::AccountCreation { status, detail } => {
            RegistrationError::Provisioning { status, detail }
        }
    }
}
