use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::auth::password::{hash_password, PasswordError};
use crate::auth::Role;
use crate::config::InvitationPolicy;
use crate::database::models::{Employee, EmployeeFields};
use crate::database::{DatabaseError, Repository};
use crate::notify::{send_invitation, Mailer, NotificationError};

pub const DEFAULT_EMPLOYEE_ROLE: &str = "employee";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] PasswordError),

    /// Invitation failed and the employee was rolled back
    #[error(transparent)]
    Notification(#[from] NotificationError),

    /// Invitation failed after the employee was committed
    #[error("Employee {id} created but the invitation failed: {source}", id = .employee.id)]
    InvitationFailed {
        employee: Box<Employee>,
        source: NotificationError,
    },
}

/// Employee lifecycle: password hashing and the invitation email
#[derive(Clone)]
pub struct EmployeeService {
    pool: PgPool,
    employees: Repository<Employee>,
    mailer: Arc<dyn Mailer>,
    policy: InvitationPolicy,
    login_url: String,
}

/// A validated create request: the record to insert and the invitation inputs
struct Onboarding {
    fields: EmployeeFields,
    email: String,
    name: String,
    password: String,
}

impl EmployeeService {
    pub fn new(
        pool: PgPool,
        mailer: Arc<dyn Mailer>,
        policy: InvitationPolicy,
        public_url: &str,
    ) -> Self {
        Self {
            employees: Repository::new(pool.clone()),
            pool,
            mailer,
            policy,
            login_url: format!("{}/", public_url.trim_end_matches('/')),
        }
    }

    pub fn repository(&self) -> &Repository<Employee> {
        &self.employees
    }

    /// Create an employee and send the invitation under the configured policy
    pub async fn create_employee(&self, fields: EmployeeFields) -> Result<Employee, ServiceError> {
        let onboarding = prepare_new(fields).await?;

        match self.policy {
            InvitationPolicy::Proceed => self.create_then_invite(onboarding).await,
            InvitationPolicy::Rollback => self.create_and_invite_atomically(onboarding).await,
        }
    }

    async fn create_then_invite(&self, onboarding: Onboarding) -> Result<Employee, ServiceError> {
        let Onboarding {
            fields,
            email,
            name,
            password,
        } = onboarding;

        let employee = self.employees.create(fields).await?;
        info!(employee_id = employee.id, "Created employee");

        if let Err(source) =
            send_invitation(self.mailer.as_ref(), &email, &password, &name, &self.login_url).await
        {
            warn!(employee_id = employee.id, "Employee kept without invitation");
            return Err(ServiceError::InvitationFailed {
                employee: Box::new(employee),
                source,
            });
        }

        Ok(employee)
    }

    async fn create_and_invite_atomically(
        &self,
        onboarding: Onboarding,
    ) -> Result<Employee, ServiceError> {
        let Onboarding {
            fields,
            email,
            name,
            password,
        } = onboarding;

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        let employee = Repository::<Employee>::create_in(&mut *tx, fields).await?;

        match send_invitation(self.mailer.as_ref(), &email, &password, &name, &self.login_url).await {
            Ok(()) => {
                tx.commit().await.map_err(DatabaseError::from)?;
                info!(employee_id = employee.id, "Created employee");
                Ok(employee)
            }
            Err(e) => {
                warn!(email = %email, error = %e, "Invitation failed, rolling back employee");
                Err(rolled_back(e, tx.rollback().await))
            }
        }
    }

    /// Partial update; a supplied password is re-hashed
    pub async fn update_employee(
        &self,
        id: i64,
        patch: EmployeeFields,
    ) -> Result<Employee, ServiceError> {
        let patch = prepare_patch(patch).await?;
        Ok(self.employees.update(id, patch).await?)
    }
}

/// The invitation error wins over a failed rollback, which is only logged
fn rolled_back(cause: NotificationError, rollback: Result<(), sqlx::Error>) -> ServiceError {
    if let Err(e) = rollback {
        error!("Rollback after failed invitation errored: {}", e);
    }
    ServiceError::Notification(cause)
}

fn canonical_role(role: &str) -> String {
    Role::parse(role).as_str().to_string()
}

async fn prepare_new(mut fields: EmployeeFields) -> Result<Onboarding, ServiceError> {
    let name = fields
        .name
        .clone()
        .ok_or_else(|| ServiceError::Validation("name is required".into()))?;
    let email = fields
        .email
        .clone()
        .ok_or_else(|| ServiceError::Validation("email is required".into()))?;
    let password = fields
        .password
        .take()
        .ok_or_else(|| ServiceError::Validation("password is required".into()))?;

    fields.role = Some(
        fields
            .role
            .as_deref()
            .map(canonical_role)
            .unwrap_or_else(|| DEFAULT_EMPLOYEE_ROLE.to_string()),
    );
    fields.password_hash = Some(hash_password(&password).await?);

    Ok(Onboarding {
        fields,
        email,
        name,
        password,
    })
}

async fn prepare_patch(mut patch: EmployeeFields) -> Result<EmployeeFields, ServiceError> {
    if let Some(password) = patch.password.take() {
        patch.password_hash = Some(hash_password(&password).await?);
    }
    patch.role = patch.role.as_deref().map(canonical_role);
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::query_builder::Bind;
    use crate::database::repository::{present_only, IntoAssignments};
    use serde_json::json;

    fn fields(value: serde_json::Value) -> EmployeeFields {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn new_employee_gets_default_role_and_hash() {
        let onboarding = prepare_new(fields(json!({
            "name": "Ana",
            "email": "ana@timey.test",
            "password": "hunter22",
            "role": ""
        })))
        .await
        .unwrap();

        assert_eq!(onboarding.password, "hunter22");
        assert!(onboarding.fields.password.is_none());
        assert_eq!(onboarding.fields.role.as_deref(), Some(DEFAULT_EMPLOYEE_ROLE));
        let hash = onboarding.fields.password_hash.clone().unwrap();
        assert!(bcrypt::verify("hunter22", &hash).unwrap());
    }

    #[tokio::test]
    async fn role_is_canonicalized() {
        let onboarding = prepare_new(fields(json!({
            "name": "Lee",
            "email": "lee@timey.test",
            "password": "pw",
            "role": "TEAMLEAD"
        })))
        .await
        .unwrap();
        assert_eq!(onboarding.fields.role.as_deref(), Some("teamLead"));
    }

    #[tokio::test]
    async fn missing_required_fields() {
        let err = prepare_new(fields(json!({ "email": "a@b.c", "password": "x" })))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ServiceError::Validation(m) if m.contains("name")));

        let err = prepare_new(fields(json!({ "name": "A", "email": "a@b.c", "password": "  " })))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ServiceError::Validation(m) if m.contains("password")));
    }

    #[test]
    fn failed_rollback_keeps_the_invitation_error() {
        let err = rolled_back(
            NotificationError::Provider("422 invalid recipient".into()),
            Err(sqlx::Error::PoolClosed),
        );
        assert!(
            matches!(err, ServiceError::Notification(NotificationError::Provider(m)) if m.contains("422"))
        );

        let err = rolled_back(NotificationError::MissingCredential, Ok(()));
        assert!(matches!(
            err,
            ServiceError::Notification(NotificationError::MissingCredential)
        ));
    }

    #[tokio::test]
    async fn patch_rehashes_password_only_when_supplied() {
        let patch = prepare_patch(fields(json!({ "phone": "555-0100" })))
            .await
            .unwrap();
        let assignments = present_only(patch.into_assignments());
        assert_eq!(
            assignments,
            vec![("phone", Bind::Text(Some("555-0100".into())))]
        );

        let patch = prepare_patch(fields(json!({ "password": "new-pass" })))
            .await
            .unwrap();
        let assignments = present_only(patch.into_assignments());
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].0, "password_hash");
    }
}
