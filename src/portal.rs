//! Portal workflows: the login, dashboard and evaluation flows that tie the
//! API client, normalizers, fan-out and session store together.
//! Each call rebuilds its view model from scratch.

use serde::Serialize;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::fanout::aggregate;
use crate::identity::{resolve_destination, Identity, Profile, RoleTag, RoutePath, SessionStore};
use crate::normalize::{extract_current_user, extract_evaluation, extract_identity, extract_records};
use crate::proposal::{summarize_submissions, EvaluatedRecord, Record, SubmissionSummary};
use crate::stats::{derive_stats, StatsSnapshot};

/// What the view layer needs after a successful login. The token stays in the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginOutcome {
    pub role: RoleTag,
    pub profile: Profile,
    pub destination: RoutePath,
}

impl LoginOutcome {
    fn from_identity(identity: &Identity) -> Self {
        Self {
            role: identity.role.clone(),
            profile: identity.profile.clone(),
            destination: resolve_destination(&identity.role),
        }
    }

    pub fn greeting(&self) -> String {
        format!("Connexion réussie ! Bienvenue, {}", self.profile.display_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorOverview {
    pub stats: StatsSnapshot,
    pub recent: Vec<SubmissionSummary>,
}

#[derive(Clone)]
pub struct Portal {
    api: ApiClient,
    session: SessionStore,
}

impl Portal {
    pub fn new(api: ApiClient, session: SessionStore) -> Self { Self { api, session } }

    pub fn session(&self) -> &SessionStore { &self.session }

    /// Authenticate, normalize the response and store the session.
    /// On any failure the previous session (if any) is left as it was.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginOutcome> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ClientError::invalid_input("Veuillez saisir l'email et le mot de passe"));
        }
        let raw = self.api.login(email, password).await?;
        let identity = extract_identity(&raw, email)?;
        self.session.write(&identity)?;
        let outcome = LoginOutcome::from_identity(&identity);
        info!(target: "portal", role = %outcome.role, destination = %outcome.destination, "login succeeded");
        Ok(outcome)
    }

    pub fn logout(&self) -> ClientResult<RoutePath> {
        self.session.clear()?;
        Ok(RoutePath::Login)
    }

    /// The signed-in author's proposals.
    pub async fn my_records(&self) -> ClientResult<Vec<Record>> {
        let token = self.session.token()?;
        let raw = self.api.my_proposals(&token).await?;
        Ok(extract_records(&raw))
    }

    pub async fn author_overview(&self) -> ClientResult<AuthorOverview> {
        let records = self.my_records().await.map_err(|e| {
            if e.is_fatal() {
                warn!(target: "portal", error = %e, "could not load proposals");
            }
            e
        })?;
        Ok(AuthorOverview { stats: derive_stats(&records), recent: summarize_submissions(&records) })
    }

    /// Proposals joined with their evaluations. Unevaluated proposals come back
    /// with no reviews and no overall score.
    pub async fn evaluations(&self) -> ClientResult<Vec<EvaluatedRecord>> {
        let token = self.session.token()?;
        let api = &self.api;
        let token = token.as_str();
        aggregate(
            || async move {
                let raw = api.my_proposals(token).await.map_err(|e| e.user_message())?;
                Ok::<_, String>(extract_records(&raw))
            },
            |record| {
                let id = record.id.clone();
                async move { api.evaluation(token, &id).await.map(|raw| extract_evaluation(&raw)) }
            },
        )
        .await
    }

    /// Cached profile if the session has one, otherwise the current-user endpoint.
    pub async fn participant_profile(&self) -> ClientResult<Profile> {
        if let Some(profile) = self.session.cached_profile() {
            return Ok(profile);
        }
        let token = self.session.token()?;
        let raw = self.api.me(&token).await?;
        let profile = extract_current_user(&raw);
        self.session.update_profile(profile.clone())?;
        Ok(profile)
    }
}
