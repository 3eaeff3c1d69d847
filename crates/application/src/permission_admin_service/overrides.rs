use super::*;

use caseline_domain::dedup_tokens;

impl PermissionAdminService {
    /// Replaces the overrides of an account with `tokens`.
    ///
    /// Every token must name a catalog permission. Duplicates are dropped
    /// while keeping first-seen order.
    pub async fn set_overrides(
        &self,
        actor: &UserAccount,
        user_id: &str,
        tokens: &[String],
    ) -> AppResult<UserAccount> {
        self.require_user_administration(actor)?;
        for token in tokens {
            Permission::from_transport(token.as_str())?;
        }

        let account = self.load_user(user_id).await?;
        let overrides = dedup_tokens(tokens);
        let detail = format!("set {} permission overrides", overrides.len());
        self.write_overrides(
            actor,
            account,
            overrides,
            AuditAction::PermissionOverridesUpdated,
            detail,
        )
        .await
    }

    /// Adds one catalog permission to the overrides of an account.
    ///
    /// Granting a permission that is already overridden is a no-op write.
    pub async fn grant_override(
        &self,
        actor: &UserAccount,
        user_id: &str,
        permission: Permission,
    ) -> AppResult<UserAccount> {
        self.require_user_administration(actor)?;
        let account = self.load_user(user_id).await?;

        let overrides = dedup_tokens(
            account
                .permission_overrides
                .iter()
                .map(String::as_str)
                .chain([permission.as_str()]),
        );
        let detail = format!("granted override '{}'", permission.as_str());
        self.write_overrides(
            actor,
            account,
            overrides,
            AuditAction::PermissionOverridesUpdated,
            detail,
        )
        .await
    }

    /// Removes one token from the overrides of an account.
    ///
    /// Tokens outside the catalog are accepted so stale entries can be
    /// cleaned up. Permissions granted by the role are unaffected.
    pub async fn revoke_override(
        &self,
        actor: &UserAccount,
        user_id: &str,
        token: &str,
    ) -> AppResult<UserAccount> {
        self.require_user_administration(actor)?;
        let account = self.load_user(user_id).await?;

        let overrides: Vec<String> = account
            .permission_overrides
            .iter()
            .filter(|held| held.as_str() != token)
            .cloned()
            .collect();
        let detail = format!("revoked override '{token}'");
        self.write_overrides(
            actor,
            account,
            overrides,
            AuditAction::PermissionOverridesUpdated,
            detail,
        )
        .await
    }
}
