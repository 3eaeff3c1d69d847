use super::*;

impl PermissionAdminService {
    /// Changes the role of an account.
    ///
    /// Overrides are left untouched, so grants made for the previous role
    /// stay in effect under the new one.
    pub async fn change_role(
        &self,
        actor: &UserAccount,
        user_id: &str,
        role_name: &str,
    ) -> AppResult<UserAccount> {
        self.require_user_administration(actor)?;
        if !self
            .authorization_service
            .role_registry()
            .contains(role_name)
        {
            return Err(AppError::NotFound(format!("role '{role_name}' does not exist")));
        }

        let mut account = self.load_user(user_id).await?;
        let previous_role = std::mem::replace(&mut account.role, role_name.to_owned());
        self.user_directory
            .save_role(account.id.as_str(), role_name)
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.id.clone(),
                action: AuditAction::UserRoleChanged,
                resource_type: "user_role".to_owned(),
                resource_id: account.id.clone(),
                detail: Some(format!("changed role from '{previous_role}' to '{role_name}'")),
            })
            .await?;

        info!(
            actor = %actor.id,
            subject = %account.id,
            previous_role = %previous_role,
            role = %role_name,
            "user role changed"
        );

        Ok(self.recompute(account))
    }
}
