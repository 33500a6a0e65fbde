//! Data-access tests against a real Postgres.
//!
//! Ignored by default. Run with `cargo test --test 30_data_access -- --ignored`
//! and TIMEY_TEST_DATABASE_URL pointing at a disposable database.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use sqlx::{Executor, PgPool};
use timey::config::InvitationPolicy;
use timey::database::models::{Client, ClientFields, Employee, EmployeeFields};
use timey::database::{Bind, DatabaseError, Repository};
use timey::error::ApiError;
use timey::notify::{EmailMessage, Mailer, NotificationError};
use timey::services::{EmployeeService, ServiceError};

const SCHEMA: &str = include_str!("../sql/schema.sql");

async fn pool() -> Result<PgPool> {
    let url = std::env::var("TIMEY_TEST_DATABASE_URL")
        .context("TIMEY_TEST_DATABASE_URL must be set to run the data-access tests")?;
    let pool = PgPool::connect(&url).await?;
    pool.execute(SCHEMA).await?;
    Ok(pool)
}

fn unique_email(tag: &str) -> String {
    format!(
        "{}-{}@timey.test",
        tag,
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    )
}

struct OfflineMailer;

#[async_trait]
impl Mailer for OfflineMailer {
    async fn send(&self, _message: &EmailMessage) -> Result<(), NotificationError> {
        Err(NotificationError::MissingCredential)
    }
}

fn client_fields(value: serde_json::Value) -> ClientFields {
    serde_json::from_value(value).expect("client fields")
}

#[tokio::test]
#[ignore = "needs TIMEY_TEST_DATABASE_URL"]
async fn blank_fields_are_stored_as_null() -> Result<()> {
    let pool = pool().await?;
    let repo = Repository::<Client>::new(pool);

    let created = repo
        .create(client_fields(json!({ "name": "Acme", "email": "", "phone": "  " })))
        .await?;
    assert_eq!(created.name, "Acme");
    assert!(created.email.is_none());
    assert!(created.phone.is_none());

    repo.delete(created.id).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs TIMEY_TEST_DATABASE_URL"]
async fn empty_patch_leaves_record_unchanged() -> Result<()> {
    let pool = pool().await?;
    let repo = Repository::<Client>::new(pool);

    let created = repo
        .create(client_fields(json!({ "name": "Globex", "address": "1 Main St" })))
        .await?;

    let after = repo.update(created.id, client_fields(json!({}))).await?;
    assert_eq!(after, created);

    let after = repo
        .update(created.id, client_fields(json!({ "email": "", "phone": null })))
        .await?;
    assert_eq!(after, created);
    assert_eq!(repo.get(created.id).await?, created);

    repo.delete(created.id).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs TIMEY_TEST_DATABASE_URL"]
async fn partial_update_touches_only_given_fields() -> Result<()> {
    let pool = pool().await?;
    let repo = Repository::<Client>::new(pool);

    let created = repo
        .create(client_fields(json!({ "name": "Initech", "address": "4120 Freidrich Ln" })))
        .await?;
    let updated = repo
        .update(created.id, client_fields(json!({ "contact_person": "Bill" })))
        .await?;

    assert_eq!(updated.contact_person.as_deref(), Some("Bill"));
    assert_eq!(updated.address, created.address);
    assert_eq!(updated.name, created.name);
    assert!(updated.updated_at >= created.updated_at);

    repo.delete(created.id).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs TIMEY_TEST_DATABASE_URL"]
async fn missing_rows_are_not_found() -> Result<()> {
    let pool = pool().await?;
    let repo = Repository::<Client>::new(pool);

    let err = repo.get(i64::MAX).await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
    let err = repo
        .update(i64::MAX, client_fields(json!({ "name": "x" })))
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
    Ok(())
}

#[tokio::test]
#[ignore = "needs TIMEY_TEST_DATABASE_URL"]
async fn duplicate_email_is_a_conflict() -> Result<()> {
    let pool = pool().await?;
    let repo = Repository::<Employee>::new(pool.clone());
    let email = unique_email("dup");

    let fields = || -> EmployeeFields {
        serde_json::from_value(json!({ "name": "Dup", "email": email, "role": "employee" }))
            .expect("employee fields")
    };
    let first = repo.create(fields()).await?;
    let err = repo.create(fields()).await.unwrap_err();
    assert_eq!(err.sql_state().as_deref(), Some("23505"));
    assert!(matches!(ApiError::from(err), ApiError::Conflict(_)));

    let by_email = repo.list_by("email", Bind::Text(Some(email.clone()))).await?;
    assert_eq!(by_email.len(), 1);

    repo.delete(first.id).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs TIMEY_TEST_DATABASE_URL"]
async fn proceed_policy_keeps_employee_when_invitation_fails() -> Result<()> {
    let pool = pool().await?;
    let service = EmployeeService::new(
        pool.clone(),
        Arc::new(OfflineMailer),
        InvitationPolicy::Proceed,
        "http://localhost:3000",
    );
    let email = unique_email("proceed");

    let err = service
        .create_employee(serde_json::from_value(json!({
            "name": "Pat", "email": email, "password": "changeme"
        }))?)
        .await
        .unwrap_err();

    let employee = match err {
        ServiceError::InvitationFailed { employee, .. } => employee,
        other => panic!("expected InvitationFailed, got {:?}", other),
    };
    let stored = service.repository().get(employee.id).await?;
    assert_eq!(stored.role, "employee");
    assert!(stored.password_hash.is_some());

    service.repository().delete(employee.id).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs TIMEY_TEST_DATABASE_URL"]
async fn rollback_policy_discards_employee_when_invitation_fails() -> Result<()> {
    let pool = pool().await?;
    let service = EmployeeService::new(
        pool.clone(),
        Arc::new(OfflineMailer),
        InvitationPolicy::Rollback,
        "http://localhost:3000",
    );
    let email = unique_email("rollback");

    let err = service
        .create_employee(serde_json::from_value(json!({
            "name": "Sam", "email": email, "password": "changeme"
        }))?)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Notification(NotificationError::MissingCredential)
    ));

    let left = service
        .repository()
        .count_by("email", Bind::Text(Some(email)))
        .await?;
    assert_eq!(left, 0);
    Ok(())
}
