//! Planner service tests against the real SeaORM repository (in-memory
//! SQLite).

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use planner::contract::model::{AppointmentPatch, LogPatch, NewAppointment, NewLog};
use planner::domain::error::DomainError;
use planner::domain::service::Service;
use planner::infra::storage::entity::{appointment, care_log};
use planner::infra::storage::repo::SeaOrmPlannerRepository;

async fn service() -> (Service, DatabaseConnection) {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    opts.max_connections(1);
    let conn = Database::connect(opts).await.expect("sqlite connect");

    planner::infra::storage::migrations::Migrator::up(&conn, None)
        .await
        .expect("planner migrations");

    let repo = Arc::new(SeaOrmPlannerRepository::new(conn.clone()));
    (Service::new(repo), conn)
}

fn new_appointment(user_id: Uuid, title: &str, day: u32) -> NewAppointment {
    NewAppointment {
        user_id,
        title: title.to_string(),
        description: Some("Bring the referral letter".to_string()),
        date: NaiveDate::from_ymd_opt(2026, 9, day).unwrap(),
        start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
        reminder: false,
    }
}

fn new_log(user_id: Uuid, appointment_id: Option<Uuid>, text: &str) -> NewLog {
    NewLog {
        user_id,
        appointment_id,
        text: text.to_string(),
        date: Utc::now(),
    }
}

#[tokio::test]
async fn appointments_are_listed_per_user_in_date_order() {
    let (svc, _conn) = service().await;
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    svc.create_appointment(new_appointment(alice, "Later", 20))
        .await
        .unwrap();
    svc.create_appointment(new_appointment(alice, "Sooner", 5))
        .await
        .unwrap();
    svc.create_appointment(new_appointment(bob, "Bob's", 1))
        .await
        .unwrap();

    let rows = svc.list_appointments(alice).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].title, "Sooner");
    assert_eq!(rows[1].title, "Later");
}

#[tokio::test]
async fn create_appointment_validates_input() {
    let (svc, _conn) = service().await;
    let user = Uuid::new_v4();

    let mut bad = new_appointment(user, "", 1);
    bad.title = "  ".to_string();
    assert!(matches!(
        svc.create_appointment(bad).await.unwrap_err(),
        DomainError::MissingField { field: "title" }
    ));

    let mut bad = new_appointment(user, "Backwards", 1);
    bad.start_time = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
    bad.end_time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
    assert!(matches!(
        svc.create_appointment(bad).await.unwrap_err(),
        DomainError::Validation { .. }
    ));
}

#[tokio::test]
async fn update_appointment_is_scoped_to_owner() {
    let (svc, _conn) = service().await;
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let row = svc
        .create_appointment(new_appointment(alice, "Checkup", 2))
        .await
        .unwrap();

    // Bob cannot see Alice's appointment, so for him it does not exist.
    let err = svc
        .update_appointment(row.id, bob, AppointmentPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AppointmentNotFound { .. }));

    let updated = svc
        .update_appointment(
            row.id,
            alice,
            AppointmentPatch {
                title: Some("Checkup (moved)".to_string()),
                reminder: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Checkup (moved)");
    assert!(updated.reminder);
}

#[tokio::test]
async fn delete_appointment_cascades_to_logs() {
    let (svc, conn) = service().await;
    let user = Uuid::new_v4();
    let row = svc
        .create_appointment(new_appointment(user, "Neurologist", 3))
        .await
        .unwrap();

    svc.create_log(new_log(user, Some(row.id), "Prepare questions"))
        .await
        .unwrap();
    svc.create_log(new_log(user, Some(row.id), "Pick up prescription"))
        .await
        .unwrap();
    svc.create_log(new_log(user, None, "Standalone note"))
        .await
        .unwrap();

    svc.delete_appointment(row.id, user).await.unwrap();

    assert_eq!(appointment::Entity::find().count(&conn).await.unwrap(), 0);
    // Only the standalone log survives.
    let remaining = care_log::Entity::find().all(&conn).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].text, "Standalone note");
}

#[tokio::test]
async fn delete_missing_appointment_is_not_found() {
    let (svc, _conn) = service().await;
    let err = svc
        .delete_appointment(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AppointmentNotFound { .. }));
}

#[tokio::test]
async fn create_log_checks_appointment_reference() {
    let (svc, _conn) = service().await;
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    // Unknown appointment.
    let err = svc
        .create_log(new_log(alice, Some(Uuid::new_v4()), "note"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AppointmentNotFound { .. }));

    // Someone else's appointment.
    let bobs = svc
        .create_appointment(new_appointment(bob, "Bob's", 4))
        .await
        .unwrap();
    let err = svc
        .create_log(new_log(alice, Some(bobs.id), "note"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotOwner));

    // Empty text.
    let err = svc.create_log(new_log(alice, None, "  ")).await.unwrap_err();
    assert!(matches!(err, DomainError::MissingField { field: "text" }));
}

#[tokio::test]
async fn logs_are_listed_newest_first() {
    let (svc, _conn) = service().await;
    let user = Uuid::new_v4();

    let mut old = new_log(user, None, "older");
    old.date = Utc::now() - chrono::Duration::days(2);
    svc.create_log(old).await.unwrap();
    svc.create_log(new_log(user, None, "newer")).await.unwrap();

    let rows = svc.list_logs(user).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].text, "newer");
}

#[tokio::test]
async fn update_log_enforces_ownership() {
    let (svc, _conn) = service().await;
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let log = svc.create_log(new_log(alice, None, "mine")).await.unwrap();

    let err = svc
        .update_log(log.id, bob, LogPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotOwner));

    let updated = svc
        .update_log(
            log.id,
            alice,
            LogPatch {
                text: Some("mine, edited".to_string()),
                date: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.text, "mine, edited");
}

#[tokio::test]
async fn delete_log_is_scoped_and_reports_missing() {
    let (svc, _conn) = service().await;
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let log = svc.create_log(new_log(alice, None, "mine")).await.unwrap();

    // Bob's scoped delete does not remove Alice's log.
    let err = svc.delete_log(log.id, bob).await.unwrap_err();
    assert!(matches!(err, DomainError::LogNotFound { .. }));

    svc.delete_log(log.id, alice).await.unwrap();
    let err = svc.delete_log(log.id, alice).await.unwrap_err();
    assert!(matches!(err, DomainError::LogNotFound { .. }));
}

#[tokio::test]
async fn purge_user_rows_removes_everything_owned() {
    let (svc, conn) = service().await;
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let appt = svc
        .create_appointment(new_appointment(alice, "A", 6))
        .await
        .unwrap();
    svc.create_log(new_log(alice, Some(appt.id), "a-note"))
        .await
        .unwrap();
    svc.create_appointment(new_appointment(bob, "B", 7))
        .await
        .unwrap();

    let removed = planner::infra::storage::repo::purge_user_rows(&conn, alice)
        .await
        .unwrap();
    assert_eq!(removed, 2);

    assert_eq!(appointment::Entity::find().count(&conn).await.unwrap(), 1);
    assert_eq!(care_log::Entity::find().count(&conn).await.unwrap(), 0);
}
