use super::*;

impl PermissionAdminService {
    /// Replaces the overrides of an account with the permissions of a
    /// template. Prior overrides are discarded.
    pub async fn apply_template(
        &self,
        actor: &UserAccount,
        user_id: &str,
        template_name: &str,
    ) -> AppResult<UserAccount> {
        self.require_user_administration(actor)?;
        self.require_template(template_name)?;
        let account = self.load_user(user_id).await?;

        let overrides = self
            .authorization_service
            .template_registry()
            .apply(template_name);
        self.write_overrides(
            actor,
            account,
            overrides,
            AuditAction::PermissionTemplateApplied,
            format!("applied template '{template_name}'"),
        )
        .await
    }

    /// Merges the permissions of a template into the overrides of an
    /// account. Existing overrides are kept.
    pub async fn add_template(
        &self,
        actor: &UserAccount,
        user_id: &str,
        template_name: &str,
    ) -> AppResult<UserAccount> {
        self.require_user_administration(actor)?;
        self.require_template(template_name)?;
        let account = self.load_user(user_id).await?;

        let overrides = self
            .authorization_service
            .template_registry()
            .add(template_name, &account.permission_overrides);
        self.write_overrides(
            actor,
            account,
            overrides,
            AuditAction::PermissionTemplateAdded,
            format!("added template '{template_name}'"),
        )
        .await
    }

    fn require_template(&self, template_name: &str) -> AppResult<()> {
        if self
            .authorization_service
            .template_registry()
            .template(template_name)
            .is_some()
        {
            return Ok(());
        }

        Err(AppError::NotFound(format!(
            "permission template '{template_name}' does not exist"
        )))
    }
}
