use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, SaltString},
    Argon2, PasswordVerifier as _,
};
use chrono::{Duration, Utc};
use rand::Rng;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::config::AccountsConfig;
use crate::contract::model::{
    AvatarUpload, FamilyLink, FamilyLinkStatus, NewRegistration, Notification, ProfilePatch,
    UserProfile,
};
use crate::domain::error::DomainError;
use crate::domain::ports::{IdentityProvider, Mailer, ObjectStore, ProfileMirror};
use crate::domain::repo::{AccountsRepository, EmailChangeCreate};

const FAMILY_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Domain service for account lifecycle, family links, and the email-change
/// workflow. Depends only on the repository and service ports, not on infra
/// types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn AccountsRepository>,
    identity: Arc<dyn IdentityProvider>,
    mirror: Arc<dyn ProfileMirror>,
    objects: Arc<dyn ObjectStore>,
    mailer: Arc<dyn Mailer>,
    config: AccountsConfig,
}

impl Service {
    pub fn new(
        repo: Arc<dyn AccountsRepository>,
        identity: Arc<dyn IdentityProvider>,
        mirror: Arc<dyn ProfileMirror>,
        objects: Arc<dyn ObjectStore>,
        mailer: Arc<dyn Mailer>,
        config: AccountsConfig,
    ) -> Self {
        Self {
            repo,
            identity,
            mirror,
            objects,
            mailer,
            config,
        }
    }

    #[instrument(name = "accounts.service.register", skip_all, fields(email = %reg.email))]
    pub async fn register(&self, reg: NewRegistration) -> Result<UserProfile, DomainError> {
        info!("Registering new account");

        self.validate_registration(&reg)?;

        // The identity service owns credentials; an unknown email is the
        // success path here.
        let existing = self
            .identity
            .find_by_email(&reg.email)
            .await
            .map_err(|e| DomainError::identity(e.to_string()))?;
        if existing.is_some() {
            return Err(DomainError::email_already_exists(reg.email));
        }

        let account = self
            .identity
            .create_account(&reg.email, &reg.password, &reg.name)
            .await
            .map_err(|e| DomainError::identity(e.to_string()))?;

        // Join an existing family via invite code, or mint a fresh link.
        // Failures past this point leave the identity record behind; the
        // source behaved the same way and we keep the orphan visible in logs
        // instead of compensating.
        let family_id = match reg.family_code.as_deref() {
            Some(code) => {
                let link = self
                    .repo
                    .find_link_by_code(code)
                    .await
                    .map_err(|e| self.orphaned(account.uid, e))?
                    .filter(|l| l.status == FamilyLinkStatus::Active)
                    .ok_or_else(|| DomainError::invalid_family_code(code))?;
                self.repo
                    .bump_member_count(link.id)
                    .await
                    .map_err(|e| self.orphaned(account.uid, e))?;
                link.family_id
            }
            None => {
                let link = FamilyLink {
                    id: Uuid::new_v4(),
                    unique_code: self.mint_family_code(),
                    creator_id: account.uid,
                    family_id: Uuid::new_v4(),
                    status: FamilyLinkStatus::Active,
                    member_count: 1,
                    created_at: Utc::now(),
                };
                self.repo
                    .insert_link(link.clone())
                    .await
                    .map_err(|e| self.orphaned(account.uid, e))?;
                link.family_id
            }
        };

        let now = Utc::now();
        let profile = UserProfile {
            id: account.uid,
            name: reg.name,
            email: reg.email,
            relation_to_patient: reg.relation_to_patient,
            family_id,
            avatar_key: None,
            avatar_url: None,
            main_challenges: Vec::new(),
            help_needs: Vec::new(),
            terms_accepted_at: now,
            created_at: now,
            updated_at: now,
        };
        self.repo
            .insert_profile(profile.clone())
            .await
            .map_err(|e| self.orphaned(account.uid, e))?;

        self.mirror_upsert(&profile).await;

        info!(user_id = %profile.id, "Account registered");
        Ok(profile)
    }

    #[instrument(name = "accounts.service.login", skip_all, fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, DomainError> {
        if email.is_empty() {
            return Err(DomainError::missing_field("email"));
        }
        if password.is_empty() {
            return Err(DomainError::missing_field("password"));
        }

        // One generic failure for unknown email and wrong password.
        let account = self
            .identity
            .verify_password(email, password)
            .await
            .map_err(|e| DomainError::identity(e.to_string()))?
            .ok_or(DomainError::InvalidCredentials)?;

        self.repo
            .find_profile(account.uid)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or(DomainError::InvalidCredentials)
    }

    #[instrument(name = "accounts.service.change_password", skip_all, fields(user_id = %user_id))]
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        if new_password.is_empty() {
            return Err(DomainError::missing_field("newPassword"));
        }

        let profile = self
            .repo
            .find_profile(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;

        self.identity
            .verify_password(&profile.email, current_password)
            .await
            .map_err(|e| DomainError::identity(e.to_string()))?
            .ok_or(DomainError::InvalidCredentials)?;

        self.identity
            .update_password(user_id, new_password)
            .await
            .map_err(|e| DomainError::identity(e.to_string()))?;

        info!("Password rotated");
        Ok(())
    }

    #[instrument(name = "accounts.service.request_email_change", skip_all, fields(user_id = %user_id))]
    pub async fn request_email_change(
        &self,
        user_id: Uuid,
        new_email: &str,
    ) -> Result<(), DomainError> {
        self.validate_email(new_email)?;

        self.repo
            .find_profile(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;

        let taken = self
            .identity
            .find_by_email(new_email)
            .await
            .map_err(|e| DomainError::identity(e.to_string()))?;
        if taken.is_some() {
            return Err(DomainError::email_in_use(new_email));
        }

        let code = mint_confirmation_code();
        let code_hash = hash_code(&code)?;
        let now = Utc::now();
        let cooldown = Duration::seconds(self.config.resend_cooldown_sec);

        match self
            .repo
            .create_email_change(user_id, new_email, &code_hash, now, cooldown)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            EmailChangeCreate::CooldownActive { since } => {
                let elapsed = (now - since).num_seconds();
                let retry_in = (self.config.resend_cooldown_sec - elapsed).max(1);
                return Err(DomainError::cooldown_active(retry_in));
            }
            EmailChangeCreate::Created => {}
        }

        self.mailer
            .send_confirmation_code(new_email, &code)
            .await
            .map_err(|e| DomainError::upstream("email", e.to_string()))?;

        info!("Confirmation code sent");
        Ok(())
    }

    #[instrument(name = "accounts.service.confirm_email_change", skip_all, fields(user_id = %user_id))]
    pub async fn confirm_email_change(
        &self,
        user_id: Uuid,
        code: &str,
    ) -> Result<String, DomainError> {
        let request = self
            .repo
            .latest_unverified(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or(DomainError::NoPendingRequest)?;

        let now = Utc::now();
        if now - request.sent_at > Duration::seconds(self.config.code_ttl_sec) {
            // Expiry is checked lazily; there is no sweeper.
            return Err(DomainError::CodeExpired);
        }

        if !verify_code(code, &request.code_hash) {
            return Err(DomainError::CodeMismatch);
        }

        self.identity
            .update_email(user_id, &request.new_email)
            .await
            .map_err(|e| DomainError::identity(e.to_string()))?;

        self.repo
            .finalize_email_change(user_id, request.id, &request.new_email, now)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        if let Ok(Some(profile)) = self.repo.find_profile(user_id).await {
            self.mirror_upsert(&profile).await;
        }

        info!("Email change confirmed");
        Ok(request.new_email)
    }

    #[instrument(name = "accounts.service.delete_account", skip_all, fields(user_id = %user_id))]
    pub async fn delete_account(
        &self,
        user_id: Uuid,
        bearer_token: &str,
    ) -> Result<(), DomainError> {
        let claims = self
            .identity
            .verify_token(bearer_token)
            .await
            .map_err(|e| DomainError::identity(e.to_string()))?
            .ok_or(DomainError::InvalidToken)?;

        // Authorization, not just authentication: the token subject must be
        // the account being deleted.
        if claims.subject != user_id {
            return Err(DomainError::NotAccountOwner);
        }

        let deleted = self
            .repo
            .delete_account_data(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if !deleted {
            return Err(DomainError::user_not_found(user_id));
        }

        if let Err(e) = self.mirror.delete_profile(user_id).await {
            warn!(error = %e, "Profile mirror delete failed");
        }

        // The relational data is already gone; a failure here leaves the
        // credential behind. Known gap, surfaced loudly.
        if let Err(e) = self.identity.delete_account(user_id).await {
            error!(error = %e, "Identity delete failed after data fan-out");
            return Err(DomainError::identity(e.to_string()));
        }

        info!("Account deleted");
        Ok(())
    }

    #[instrument(name = "accounts.service.upload_avatar", skip_all, fields(user_id = %user_id, size = bytes.len()))]
    pub async fn upload_avatar(
        &self,
        user_id: Uuid,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<AvatarUpload, DomainError> {
        self.repo
            .find_profile(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;

        if bytes.len() > self.config.avatar_max_bytes {
            return Err(DomainError::avatar_too_large(
                bytes.len(),
                self.config.avatar_max_bytes,
            ));
        }
        let ext = match content_type.strip_prefix("image/") {
            Some(sub) if !sub.is_empty() => sub,
            _ => return Err(DomainError::unsupported_media_type(content_type)),
        };

        // Per-user timestamped key; earlier objects are intentionally left in
        // place.
        let key = format!(
            "avatars/{}/{}.{}",
            user_id,
            Utc::now().timestamp_millis(),
            ext
        );

        self.objects
            .put_object(&key, content_type, bytes)
            .await
            .map_err(|e| DomainError::upstream("storage", e.to_string()))?;
        let signed_url = self
            .objects
            .signed_url(&key, self.config.signed_url_ttl_sec)
            .await
            .map_err(|e| DomainError::upstream("storage", e.to_string()))?;

        self.repo
            .set_avatar(user_id, &key, &signed_url)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        if let Ok(Some(profile)) = self.repo.find_profile(user_id).await {
            self.mirror_upsert(&profile).await;
        }

        debug!(key = %key, "Avatar stored");
        Ok(AvatarUpload { key, signed_url })
    }

    #[instrument(name = "accounts.service.profile", skip(self), fields(user_id = %user_id))]
    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile, DomainError> {
        self.repo
            .find_profile(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(user_id))
    }

    #[instrument(name = "accounts.service.update_profile", skip_all, fields(user_id = %user_id))]
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        patch: ProfilePatch,
    ) -> Result<UserProfile, DomainError> {
        let mut profile = self.profile(user_id).await?;

        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name", "cannot be empty"));
            }
            profile.name = name;
        }
        if let Some(relation) = patch.relation_to_patient {
            profile.relation_to_patient = relation;
        }
        if let Some(challenges) = patch.main_challenges {
            profile.main_challenges = challenges;
        }
        if let Some(needs) = patch.help_needs {
            profile.help_needs = needs;
        }
        profile.updated_at = Utc::now();

        self.repo
            .update_profile(profile.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        self.mirror_upsert(&profile).await;
        Ok(profile)
    }

    #[instrument(name = "accounts.service.register_push_token", skip_all, fields(user_id = %user_id, platform = %platform))]
    pub async fn register_push_token(
        &self,
        user_id: Uuid,
        token: &str,
        platform: &str,
    ) -> Result<(), DomainError> {
        if token.is_empty() {
            return Err(DomainError::missing_field("token"));
        }
        if !matches!(platform, "ios" | "android") {
            return Err(DomainError::validation(
                "platform",
                "must be 'ios' or 'android'",
            ));
        }

        self.repo
            .find_profile(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;

        self.repo
            .upsert_push_token(user_id, token, platform, Utc::now())
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    #[instrument(name = "accounts.service.notifications", skip(self), fields(user_id = %user_id))]
    pub async fn notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, DomainError> {
        self.repo
            .list_notifications(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    #[instrument(name = "accounts.service.generate_family_link", skip(self), fields(user_id = %user_id))]
    pub async fn generate_family_link(&self, user_id: Uuid) -> Result<FamilyLink, DomainError> {
        let profile = self.profile(user_id).await?;

        if let Some(link) = self
            .repo
            .find_link_by_creator(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .filter(|l| l.status == FamilyLinkStatus::Active)
        {
            return Ok(link);
        }

        let link = FamilyLink {
            id: Uuid::new_v4(),
            unique_code: self.mint_family_code(),
            creator_id: user_id,
            family_id: profile.family_id,
            status: FamilyLinkStatus::Active,
            member_count: 1,
            created_at: Utc::now(),
        };
        self.repo
            .insert_link(link.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        Ok(link)
    }

    #[instrument(name = "accounts.service.family_link_for_user", skip(self), fields(user_id = %user_id))]
    pub async fn family_link_for_user(&self, user_id: Uuid) -> Result<FamilyLink, DomainError> {
        self.repo
            .find_link_by_creator(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or(DomainError::FamilyLinkNotFound)
    }

    #[instrument(name = "accounts.service.set_family_link_status", skip(self), fields(link_id = %link_id))]
    pub async fn set_family_link_status(
        &self,
        link_id: Uuid,
        status: &str,
    ) -> Result<FamilyLink, DomainError> {
        let status =
            FamilyLinkStatus::parse(status).ok_or_else(|| DomainError::invalid_status(status))?;

        let updated = self
            .repo
            .set_link_status(link_id, status)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if !updated {
            return Err(DomainError::FamilyLinkNotFound);
        }

        self.repo
            .find_link_by_id(link_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or(DomainError::FamilyLinkNotFound)
    }

    // --- helpers ---

    async fn mirror_upsert(&self, profile: &UserProfile) {
        if let Err(e) = self.mirror.upsert_profile(profile).await {
            warn!(user_id = %profile.id, error = %e, "Profile mirror write failed");
        }
    }

    /// A downstream failure after the identity record was created. The write
    /// is not compensated; log the orphan so operators can reconcile.
    fn orphaned(&self, uid: Uuid, e: anyhow::Error) -> DomainError {
        warn!(identity_uid = %uid, error = %e, "Registration failed after identity create; identity record left behind");
        DomainError::database(e.to_string())
    }

    fn validate_registration(&self, reg: &NewRegistration) -> Result<(), DomainError> {
        if reg.name.trim().is_empty() {
            return Err(DomainError::missing_field("name"));
        }
        if reg.email.is_empty() {
            return Err(DomainError::missing_field("email"));
        }
        if reg.password.is_empty() {
            return Err(DomainError::missing_field("password"));
        }
        if reg.relation_to_patient.trim().is_empty() {
            return Err(DomainError::missing_field("relationToDementiaPerson"));
        }
        if !reg.terms_accepted {
            return Err(DomainError::TermsNotAccepted);
        }
        self.validate_email(&reg.email)
    }

    fn validate_email(&self, email: &str) -> Result<(), DomainError> {
        if email.is_empty() || !email.contains('@') || !email.contains('.') {
            return Err(DomainError::invalid_email(email));
        }
        Ok(())
    }

    fn mint_family_code(&self) -> String {
        mint_family_code(
            self.config.family_code_min_len,
            self.config.family_code_max_len,
        )
    }
}

fn mint_family_code(min_len: usize, max_len: usize) -> String {
    let mut rng = rand::thread_rng();
    let len = rng.gen_range(min_len..=max_len);
    (0..len)
        .map(|_| FAMILY_CODE_CHARSET[rng.gen_range(0..FAMILY_CODE_CHARSET.len())] as char)
        .collect()
}

fn mint_confirmation_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

fn hash_code(code: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(code.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| DomainError::validation("code", e.to_string()))
}

pub(crate) fn verify_code(code: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(code.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccountsConfig;

    fn service_config() -> AccountsConfig {
        AccountsConfig::default()
    }

    #[test]
    fn family_codes_are_uppercase_and_bounded() {
        let cfg = service_config();
        for _ in 0..100 {
            let code = mint_family_code(cfg.family_code_min_len, cfg.family_code_max_len);
            assert!(code.len() >= cfg.family_code_min_len);
            assert!(code.len() <= cfg.family_code_max_len);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn confirmation_codes_are_six_digits() {
        for _ in 0..100 {
            let code = mint_confirmation_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn code_hash_roundtrip() {
        let hash = hash_code("123456").unwrap();
        assert!(verify_code("123456", &hash));
        assert!(!verify_code("654321", &hash));
    }

    #[test]
    fn verify_code_rejects_garbage_hash() {
        assert!(!verify_code("123456", "not-a-phc-string"));
    }
}
