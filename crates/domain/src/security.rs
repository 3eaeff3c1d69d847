use std::fmt::{Display, Formatter};
use std::str::FromStr;

use caseline_core::AppError;
use serde::{Deserialize, Serialize};

/// Functional area a permission token belongs to.
///
/// The prefix before the first `.` of every token is its domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionDomain {
    /// Client records and demographics.
    Client,
    /// Visit logging.
    Visit,
    /// Clinical, HIV and mental-health records.
    Clinical,
    /// Program and location configuration.
    Program,
    /// Report generation.
    Report,
    /// Dashboards and analytics.
    Analytics,
    /// Intake and assessment forms.
    Form,
    /// Client follow-ups.
    Followup,
    /// Interventions and referrals.
    Intervention,
    /// Outreach and needle-syringe program contacts.
    Outreach,
    /// Staff accounts.
    User,
    /// System settings and audit.
    System,
}

impl PermissionDomain {
    /// Returns all domains in catalog order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionDomain] = &[
            PermissionDomain::Client,
            PermissionDomain::Visit,
            PermissionDomain::Clinical,
            PermissionDomain::Program,
            PermissionDomain::Report,
            PermissionDomain::Analytics,
            PermissionDomain::Form,
            PermissionDomain::Followup,
            PermissionDomain::Intervention,
            PermissionDomain::Outreach,
            PermissionDomain::User,
            PermissionDomain::System,
        ];

        ALL
    }

    /// Returns the token prefix for this domain.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Visit => "visit",
            Self::Clinical => "clinical",
            Self::Program => "program",
            Self::Report => "report",
            Self::Analytics => "analytics",
            Self::Form => "form",
            Self::Followup => "followup",
            Self::Intervention => "intervention",
            Self::Outreach => "outreach",
            Self::User => "user",
            Self::System => "system",
        }
    }

    /// Returns the catalog tokens grouped under this domain.
    #[must_use]
    pub fn permissions(&self) -> Vec<Permission> {
        Permission::all()
            .iter()
            .copied()
            .filter(|permission| permission.domain() == *self)
            .collect()
    }
}

/// Atomic capability tokens recognised by the access-control engine.
///
/// The storage value (see [`Permission::as_str`]) is the identity of a
/// permission. Renaming a value is a breaking change for every stored
/// override list that references it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Permission {
    /// Allows viewing client records.
    ClientView,
    /// Allows registering new clients.
    ClientCreate,
    /// Allows editing client records.
    ClientEdit,
    /// Allows deleting client records.
    ClientDelete,
    /// Allows exporting client lists.
    ClientExport,
    /// Allows viewing visits.
    VisitView,
    /// Allows logging visits.
    VisitCreate,
    /// Allows editing visits.
    VisitEdit,
    /// Allows deleting visits.
    VisitDelete,
    /// Allows viewing clinical records.
    ClinicalView,
    /// Allows creating clinical records.
    ClinicalCreate,
    /// Allows editing clinical records.
    ClinicalEdit,
    /// Allows approving clinical records.
    ClinicalApprove,
    /// Allows viewing HIV status and the HIV module.
    ClinicalHiv,
    /// Allows viewing mental-health assessments and scores.
    ClinicalMentalHealth,
    /// Allows viewing programs.
    ProgramView,
    /// Allows managing programs and locations.
    ProgramManage,
    /// Allows viewing reports.
    ReportView,
    /// Allows building reports.
    ReportCreate,
    /// Allows exporting reports.
    ReportExport,
    /// Allows viewing dashboards.
    AnalyticsView,
    /// Allows viewing forms.
    FormView,
    /// Allows submitting forms.
    FormSubmit,
    /// Allows designing forms.
    FormManage,
    /// Allows viewing follow-ups.
    FollowupView,
    /// Allows scheduling follow-ups.
    FollowupCreate,
    /// Allows editing follow-ups.
    FollowupEdit,
    /// Allows viewing interventions.
    InterventionView,
    /// Allows recording interventions.
    InterventionCreate,
    /// Allows editing interventions.
    InterventionEdit,
    /// Allows viewing outreach contacts.
    OutreachView,
    /// Allows logging outreach contacts.
    OutreachCreate,
    /// Allows editing outreach contacts.
    OutreachEdit,
    /// Allows viewing staff accounts.
    UserView,
    /// Allows creating staff accounts.
    UserCreate,
    /// Allows editing staff accounts.
    UserEdit,
    /// Allows deactivating staff accounts.
    UserDelete,
    /// Allows editing per-user permission overrides.
    UserPermissions,
    /// Allows changing system settings.
    SystemSettings,
    /// Allows reading the audit log.
    SystemAudit,
    /// Allows running backups.
    SystemBackup,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientView => "client.view",
            Self::ClientCreate => "client.create",
            Self::ClientEdit => "client.edit",
            Self::ClientDelete => "client.delete",
            Self::ClientExport => "client.export",
            Self::VisitView => "visit.view",
            Self::VisitCreate => "visit.create",
            Self::VisitEdit => "visit.edit",
            Self::VisitDelete => "visit.delete",
            Self::ClinicalView => "clinical.view",
            Self::ClinicalCreate => "clinical.create",
            Self::ClinicalEdit => "clinical.edit",
            Self::ClinicalApprove => "clinical.approve",
            Self::ClinicalHiv => "clinical.hiv",
            Self::ClinicalMentalHealth => "clinical.mental_health",
            Self::ProgramView => "program.view",
            Self::ProgramManage => "program.manage",
            Self::ReportView => "report.view",
            Self::ReportCreate => "report.create",
            Self::ReportExport => "report.export",
            Self::AnalyticsView => "analytics.view",
            Self::FormView => "form.view",
            Self::FormSubmit => "form.submit",
            Self::FormManage => "form.manage",
            Self::FollowupView => "followup.view",
            Self::FollowupCreate => "followup.create",
            Self::FollowupEdit => "followup.edit",
            Self::InterventionView => "intervention.view",
            Self::InterventionCreate => "intervention.create",
            Self::InterventionEdit => "intervention.edit",
            Self::OutreachView => "outreach.view",
            Self::OutreachCreate => "outreach.create",
            Self::OutreachEdit => "outreach.edit",
            Self::UserView => "user.view",
            Self::UserCreate => "user.create",
            Self::UserEdit => "user.edit",
            Self::UserDelete => "user.delete",
            Self::UserPermissions => "user.permissions",
            Self::SystemSettings => "system.settings",
            Self::SystemAudit => "system.audit",
            Self::SystemBackup => "system.backup",
        }
    }

    /// Returns the domain this permission is grouped under.
    #[must_use]
    pub fn domain(&self) -> PermissionDomain {
        match self {
            Self::ClientView
            | Self::ClientCreate
            | Self::ClientEdit
            | Self::ClientDelete
            | Self::ClientExport => PermissionDomain::Client,
            Self::VisitView | Self::VisitCreate | Self::VisitEdit | Self::VisitDelete => {
                PermissionDomain::Visit
            }
            Self::ClinicalView
            | Self::ClinicalCreate
            | Self::ClinicalEdit
            | Self::ClinicalApprove
            | Self::ClinicalHiv
            | Self::ClinicalMentalHealth => PermissionDomain::Clinical,
            Self::ProgramView | Self::ProgramManage => PermissionDomain::Program,
            Self::ReportView | Self::ReportCreate | Self::ReportExport => PermissionDomain::Report,
            Self::AnalyticsView => PermissionDomain::Analytics,
            Self::FormView | Self::FormSubmit | Self::FormManage => PermissionDomain::Form,
            Self::FollowupView | Self::FollowupCreate | Self::FollowupEdit => {
                PermissionDomain::Followup
            }
            Self::InterventionView | Self::InterventionCreate | Self::InterventionEdit => {
                PermissionDomain::Intervention
            }
            Self::OutreachView | Self::OutreachCreate | Self::OutreachEdit => {
                PermissionDomain::Outreach
            }
            Self::UserView
            | Self::UserCreate
            | Self::UserEdit
            | Self::UserDelete
            | Self::UserPermissions => PermissionDomain::User,
            Self::SystemSettings | Self::SystemAudit | Self::SystemBackup => {
                PermissionDomain::System
            }
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::ClientView,
            Permission::ClientCreate,
            Permission::ClientEdit,
            Permission::ClientDelete,
            Permission::ClientExport,
            Permission::VisitView,
            Permission::VisitCreate,
            Permission::VisitEdit,
            Permission::VisitDelete,
            Permission::ClinicalView,
            Permission::ClinicalCreate,
            Permission::ClinicalEdit,
            Permission::ClinicalApprove,
            Permission::ClinicalHiv,
            Permission::ClinicalMentalHealth,
            Permission::ProgramView,
            Permission::ProgramManage,
            Permission::ReportView,
            Permission::ReportCreate,
            Permission::ReportExport,
            Permission::AnalyticsView,
            Permission::FormView,
            Permission::FormSubmit,
            Permission::FormManage,
            Permission::FollowupView,
            Permission::FollowupCreate,
            Permission::FollowupEdit,
            Permission::InterventionView,
            Permission::InterventionCreate,
            Permission::InterventionEdit,
            Permission::OutreachView,
            Permission::OutreachCreate,
            Permission::OutreachEdit,
            Permission::UserView,
            Permission::UserCreate,
            Permission::UserEdit,
            Permission::UserDelete,
            Permission::UserPermissions,
            Permission::SystemSettings,
            Permission::SystemAudit,
            Permission::SystemBackup,
        ];

        ALL
    }

    /// Parses a transport value into a permission.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl AsRef<str> for Permission {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for Permission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}

impl TryFrom<String> for Permission {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(value.as_str())
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.as_str().to_owned()
    }
}

/// Stable audit actions emitted by permission administration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a user's override list is replaced by hand.
    PermissionOverridesUpdated,
    /// Emitted when a template replaces a user's override list.
    PermissionTemplateApplied,
    /// Emitted when a template is merged into a user's override list.
    PermissionTemplateAdded,
    /// Emitted when a user's role changes.
    UserRoleChanged,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionOverridesUpdated => "security.permission_overrides.updated",
            Self::PermissionTemplateApplied => "security.permission_template.applied",
            Self::PermissionTemplateAdded => "security.permission_template.added",
            Self::UserRoleChanged => "security.user_role.changed",
        }
    }
}
