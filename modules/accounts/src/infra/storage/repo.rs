//! SeaORM-backed repository implementation for the accounts domain port.
//!
//! The email-change invariants and the account-deletion fan-out run inside
//! database transactions here; callers get the one-pending-request guarantee
//! without holding any locks of their own.

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use crate::contract::model::{
    EmailChangeRequest, FamilyLink, FamilyLinkStatus, Notification, UserProfile,
};
use crate::domain::repo::{AccountsRepository, EmailChangeCreate};
use crate::infra::storage::entity::{
    email_change_request, family_link, notification, push_token, user_profile,
};
use crate::infra::storage::mapper::json_list;

pub struct SeaOrmAccountsRepository {
    conn: DatabaseConnection,
}

impl SeaOrmAccountsRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

fn profile_active_model(p: &UserProfile) -> user_profile::ActiveModel {
    user_profile::ActiveModel {
        id: Set(p.id),
        name: Set(p.name.clone()),
        email: Set(p.email.clone()),
        relation_to_patient: Set(p.relation_to_patient.clone()),
        family_id: Set(p.family_id),
        avatar_key: Set(p.avatar_key.clone()),
        avatar_url: Set(p.avatar_url.clone()),
        main_challenges: Set(json_list(&p.main_challenges)),
        help_needs: Set(json_list(&p.help_needs)),
        terms_accepted_at: Set(p.terms_accepted_at),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    }
}

#[async_trait::async_trait]
impl AccountsRepository for SeaOrmAccountsRepository {
    async fn insert_profile(&self, profile: UserProfile) -> anyhow::Result<()> {
        profile_active_model(&profile)
            .insert(&self.conn)
            .await
            .context("insert_profile failed")?;
        Ok(())
    }

    async fn find_profile(&self, id: Uuid) -> anyhow::Result<Option<UserProfile>> {
        let found = user_profile::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_profile failed")?;
        Ok(found.map(Into::into))
    }

    async fn update_profile(&self, profile: UserProfile) -> anyhow::Result<()> {
        profile_active_model(&profile)
            .update(&self.conn)
            .await
            .context("update_profile failed")?;
        Ok(())
    }

    async fn set_avatar(&self, id: Uuid, key: &str, signed_url: &str) -> anyhow::Result<()> {
        let m = user_profile::ActiveModel {
            id: Set(id),
            avatar_key: Set(Some(key.to_string())),
            avatar_url: Set(Some(signed_url.to_string())),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        m.update(&self.conn).await.context("set_avatar failed")?;
        Ok(())
    }

    async fn find_link_by_code(&self, code: &str) -> anyhow::Result<Option<FamilyLink>> {
        let found = family_link::Entity::find()
            .filter(family_link::Column::UniqueCode.eq(code))
            .one(&self.conn)
            .await
            .context("find_link_by_code failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_link_by_creator(&self, creator_id: Uuid) -> anyhow::Result<Option<FamilyLink>> {
        let found = family_link::Entity::find()
            .filter(family_link::Column::CreatorId.eq(creator_id))
            .order_by_desc(family_link::Column::CreatedAt)
            .one(&self.conn)
            .await
            .context("find_link_by_creator failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_link_by_id(&self, id: Uuid) -> anyhow::Result<Option<FamilyLink>> {
        let found = family_link::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_link_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert_link(&self, link: FamilyLink) -> anyhow::Result<()> {
        let m = family_link::ActiveModel {
            id: Set(link.id),
            unique_code: Set(link.unique_code),
            creator_id: Set(link.creator_id),
            family_id: Set(link.family_id),
            status: Set(link.status.as_str().to_string()),
            member_count: Set(link.member_count),
            created_at: Set(link.created_at),
        };
        m.insert(&self.conn).await.context("insert_link failed")?;
        Ok(())
    }

    async fn bump_member_count(&self, id: Uuid) -> anyhow::Result<()> {
        family_link::Entity::update_many()
            .col_expr(
                family_link::Column::MemberCount,
                Expr::col(family_link::Column::MemberCount).add(1),
            )
            .filter(family_link::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("bump_member_count failed")?;
        Ok(())
    }

    async fn set_link_status(&self, id: Uuid, status: FamilyLinkStatus) -> anyhow::Result<bool> {
        let res = family_link::Entity::update_many()
            .col_expr(family_link::Column::Status, Expr::value(status.as_str()))
            .filter(family_link::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("set_link_status failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn create_email_change(
        &self,
        user_id: Uuid,
        new_email: &str,
        code_hash: &str,
        now: DateTime<Utc>,
        cooldown: Duration,
    ) -> anyhow::Result<EmailChangeCreate> {
        let txn = self.conn.begin().await.context("begin failed")?;

        let latest = email_change_request::Entity::find()
            .filter(email_change_request::Column::UserId.eq(user_id))
            .filter(email_change_request::Column::VerifiedAt.is_null())
            .order_by_desc(email_change_request::Column::SentAt)
            .one(&txn)
            .await
            .context("cooldown lookup failed")?;

        if let Some(prev) = latest {
            if now - prev.sent_at < cooldown {
                txn.rollback().await.context("rollback failed")?;
                return Ok(EmailChangeCreate::CooldownActive {
                    since: prev.sent_at,
                });
            }
        }

        // A new request replaces every stale unverified one.
        email_change_request::Entity::delete_many()
            .filter(email_change_request::Column::UserId.eq(user_id))
            .filter(email_change_request::Column::VerifiedAt.is_null())
            .exec(&txn)
            .await
            .context("stale request cleanup failed")?;

        let m = email_change_request::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            new_email: Set(new_email.to_string()),
            code_hash: Set(code_hash.to_string()),
            sent_at: Set(now),
            verified_at: Set(None),
        };
        m.insert(&txn).await.context("request insert failed")?;

        txn.commit().await.context("commit failed")?;
        Ok(EmailChangeCreate::Created)
    }

    async fn latest_unverified(
        &self,
        user_id: Uuid,
    ) -> anyhow::Result<Option<EmailChangeRequest>> {
        let found = email_change_request::Entity::find()
            .filter(email_change_request::Column::UserId.eq(user_id))
            .filter(email_change_request::Column::VerifiedAt.is_null())
            .order_by_desc(email_change_request::Column::SentAt)
            .one(&self.conn)
            .await
            .context("latest_unverified failed")?;
        Ok(found.map(Into::into))
    }

    async fn finalize_email_change(
        &self,
        user_id: Uuid,
        request_id: Uuid,
        new_email: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let txn = self.conn.begin().await.context("begin failed")?;

        email_change_request::Entity::update_many()
            .col_expr(email_change_request::Column::VerifiedAt, Expr::value(now))
            .filter(email_change_request::Column::Id.eq(request_id))
            .exec(&txn)
            .await
            .context("mark verified failed")?;

        email_change_request::Entity::delete_many()
            .filter(email_change_request::Column::UserId.eq(user_id))
            .filter(email_change_request::Column::Id.ne(request_id))
            .filter(email_change_request::Column::VerifiedAt.is_null())
            .exec(&txn)
            .await
            .context("unverified cleanup failed")?;

        user_profile::Entity::update_many()
            .col_expr(user_profile::Column::Email, Expr::value(new_email))
            .col_expr(user_profile::Column::UpdatedAt, Expr::value(now))
            .filter(user_profile::Column::Id.eq(user_id))
            .exec(&txn)
            .await
            .context("profile email update failed")?;

        txn.commit().await.context("commit failed")?;
        Ok(())
    }

    async fn upsert_push_token(
        &self,
        user_id: Uuid,
        token: &str,
        platform: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let m = push_token::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            token: Set(token.to_string()),
            platform: Set(platform.to_string()),
            created_at: Set(now),
        };
        push_token::Entity::insert(m)
            .on_conflict(
                OnConflict::columns([push_token::Column::UserId, push_token::Column::Token])
                    .update_column(push_token::Column::Platform)
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("upsert_push_token failed")?;
        Ok(())
    }

    async fn list_notifications(&self, user_id: Uuid) -> anyhow::Result<Vec<Notification>> {
        let rows = notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("list_notifications failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_account_data(&self, user_id: Uuid) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await.context("begin failed")?;

        let profile = user_profile::Entity::find_by_id(user_id)
            .one(&txn)
            .await
            .context("profile lookup failed")?;
        if profile.is_none() {
            txn.rollback().await.context("rollback failed")?;
            return Ok(false);
        }

        let planner_rows = planner::infra::storage::repo::purge_user_rows(&txn, user_id)
            .await
            .context("planner purge failed")?;

        let notifications = notification::Entity::delete_many()
            .filter(notification::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .context("notification purge failed")?
            .rows_affected;
        let push_tokens = push_token::Entity::delete_many()
            .filter(push_token::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .context("push token purge failed")?
            .rows_affected;
        let family_links = family_link::Entity::delete_many()
            .filter(family_link::Column::CreatorId.eq(user_id))
            .exec(&txn)
            .await
            .context("family link purge failed")?
            .rows_affected;
        let email_changes = email_change_request::Entity::delete_many()
            .filter(email_change_request::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .context("email change purge failed")?
            .rows_affected;

        user_profile::Entity::delete_by_id(user_id)
            .exec(&txn)
            .await
            .context("profile delete failed")?;

        txn.commit().await.context("commit failed")?;

        debug!(
            %user_id,
            planner_rows,
            notifications,
            push_tokens,
            family_links,
            email_changes,
            "Account data fan-out deleted"
        );
        Ok(true)
    }
}
