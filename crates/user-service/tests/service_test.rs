//! User service unit tests against a mocked repository.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;

use domain::{NewUser, UserPatch, UserRecord};
use user_service::{AppError, MockUserRepository, UserManager, UserService};

fn test_user(id: i64) -> UserRecord {
    UserRecord {
        id,
        name: "Anna Ivanova".to_string(),
        email: "anna@example.com".to_string(),
        age: 30,
        created_at: Utc::now(),
        version: 1,
    }
}

fn persisted(id: i64, new_user: NewUser) -> UserRecord {
    UserRecord {
        id,
        name: new_user.name,
        email: new_user.email,
        age: new_user.age,
        created_at: Utc::now(),
        version: 1,
    }
}

#[tokio::test]
async fn register_persists_valid_input() {
    let mut repo = MockUserRepository::new();
    repo.expect_exists_by_email()
        .with(eq("anna@example.com"))
        .returning(|_| Ok(false));
    repo.expect_insert()
        .returning(|new_user| Ok(persisted(1, new_user)));

    let service = UserManager::new(Arc::new(repo));
    let user = service
        .register("Anna Ivanova".to_string(), "anna@example.com".to_string(), 30)
        .await
        .unwrap();

    assert_eq!(user.id, 1);
    assert_eq!(user.name, "Anna Ivanova");
    assert_eq!(user.email, "anna@example.com");
    assert_eq!(user.age, 30);
    assert_eq!(user.version, 1);
}

#[tokio::test]
async fn register_rejects_taken_email_without_insert() {
    let mut repo = MockUserRepository::new();
    repo.expect_exists_by_email().returning(|_| Ok(true));
    repo.expect_insert().never();

    let service = UserManager::new(Arc::new(repo));
    let result = service
        .register("Boris".to_string(), "anna@example.com".to_string(), 40)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(email) if email == "anna@example.com"));
}

#[tokio::test]
async fn register_rejects_invalid_name_before_touching_store() {
    // No expectations: any repository call would panic the mock.
    let repo = MockUserRepository::new();

    let service = UserManager::new(Arc::new(repo));
    let result = service
        .register("Anna2".to_string(), "anna@example.com".to_string(), 30)
        .await;

    assert!(matches!(
        result.unwrap_err(),
        AppError::Validation { field: "name", .. }
    ));
}

#[tokio::test]
async fn register_reports_first_failing_field() {
    // Both name and email are invalid; name is checked first.
    let repo = MockUserRepository::new();

    let service = UserManager::new(Arc::new(repo));
    let result = service
        .register("A".to_string(), "not-an-email".to_string(), 0)
        .await;

    assert!(matches!(
        result.unwrap_err(),
        AppError::Validation { field: "name", .. }
    ));
}

#[tokio::test]
async fn register_rejects_out_of_range_ages() {
    for age in [0, 121] {
        let repo = MockUserRepository::new();
        let service = UserManager::new(Arc::new(repo));
        let result = service
            .register("Anna Ivanova".to_string(), "anna@example.com".to_string(), age)
            .await;
        assert!(matches!(
            result.unwrap_err(),
            AppError::Validation { field: "age", .. }
        ));
    }
}

#[tokio::test]
async fn register_accepts_boundary_ages() {
    for age in [1, 120] {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email().returning(|_| Ok(false));
        repo.expect_insert()
            .returning(|new_user| Ok(persisted(1, new_user)));

        let service = UserManager::new(Arc::new(repo));
        let user = service
            .register("Anna Ivanova".to_string(), "anna@example.com".to_string(), age)
            .await
            .unwrap();
        assert_eq!(user.age, age);
    }
}

#[tokio::test]
async fn get_by_id_rejects_non_positive_ids() {
    let repo = MockUserRepository::new();
    let service = UserManager::new(Arc::new(repo));

    for id in [0, -7] {
        let result = service.get_by_id(id).await;
        assert!(matches!(
            result.unwrap_err(),
            AppError::Validation { field: "id", .. }
        ));
    }
}

#[tokio::test]
async fn get_by_id_absence_is_not_an_error() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().with(eq(42)).returning(|_| Ok(None));

    let service = UserManager::new(Arc::new(repo));
    assert!(service.get_by_id(42).await.unwrap().is_none());
}

#[tokio::test]
async fn modify_unknown_id_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let service = UserManager::new(Arc::new(repo));
    let result = service.modify(9, UserPatch::default()).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound(9)));
}

#[tokio::test]
async fn modify_changed_email_checks_uniqueness() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id))));
    repo.expect_exists_by_email()
        .with(eq("taken@example.com"))
        .returning(|_| Ok(true));
    repo.expect_update().never();

    let service = UserManager::new(Arc::new(repo));
    let patch = UserPatch {
        email: Some("taken@example.com".to_string()),
        ..Default::default()
    };
    let result = service.modify(1, patch).await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn modify_keeping_current_email_skips_uniqueness_check() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id))));
    // No exists_by_email expectation: calling it would panic.
    repo.expect_update().returning(|mut record| {
        record.version += 1;
        Ok(record)
    });

    let service = UserManager::new(Arc::new(repo));
    let patch = UserPatch {
        email: Some("anna@example.com".to_string()),
        ..Default::default()
    };
    let updated = service.modify(1, patch).await.unwrap();

    assert_eq!(updated.email, "anna@example.com");
    assert_eq!(updated.version, 2);
}

#[tokio::test]
async fn modify_applies_only_supplied_fields() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id))));
    repo.expect_update().returning(|mut record| {
        record.version += 1;
        Ok(record)
    });

    let service = UserManager::new(Arc::new(repo));
    let patch = UserPatch {
        age: Some(31),
        ..Default::default()
    };
    let updated = service.modify(1, patch).await.unwrap();

    assert_eq!(updated.age, 31);
    assert_eq!(updated.name, "Anna Ivanova");
    assert_eq!(updated.email, "anna@example.com");
    assert_eq!(updated.version, 2);
}

#[tokio::test]
async fn modify_rejects_invalid_fields_without_update() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id))));
    repo.expect_update().never();

    let service = UserManager::new(Arc::new(repo));
    let patch = UserPatch {
        age: Some(121),
        ..Default::default()
    };
    let result = service.modify(1, patch).await;

    assert!(matches!(
        result.unwrap_err(),
        AppError::Validation { field: "age", .. }
    ));
}

#[tokio::test]
async fn modify_surfaces_optimistic_lock_conflicts() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id))));
    repo.expect_update()
        .returning(|record| Err(AppError::Concurrency(record.id)));

    let service = UserManager::new(Arc::new(repo));
    let patch = UserPatch {
        age: Some(31),
        ..Default::default()
    };
    let result = service.modify(1, patch).await;

    assert!(matches!(result.unwrap_err(), AppError::Concurrency(1)));
}

#[tokio::test]
async fn delete_unknown_id_returns_false() {
    let mut repo = MockUserRepository::new();
    repo.expect_delete_by_id().with(eq(5)).returning(|_| Ok(false));

    let service = UserManager::new(Arc::new(repo));
    assert!(!service.delete(5).await.unwrap());
}

#[tokio::test]
async fn delete_rejects_non_positive_ids() {
    let repo = MockUserRepository::new();
    let service = UserManager::new(Arc::new(repo));

    let result = service.delete(0).await;
    assert!(matches!(
        result.unwrap_err(),
        AppError::Validation { field: "id", .. }
    ));
}

#[tokio::test]
async fn find_by_email_rejects_blank_input() {
    let repo = MockUserRepository::new();
    let service = UserManager::new(Arc::new(repo));

    for email in ["", "   "] {
        let result = service.find_by_email(email).await;
        assert!(matches!(
            result.unwrap_err(),
            AppError::Validation { field: "email", .. }
        ));
    }
}

#[tokio::test]
async fn find_by_email_trims_before_lookup() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .with(eq("anna@example.com"))
        .returning(|_| Ok(Some(test_user(1))));

    let service = UserManager::new(Arc::new(repo));
    let user = service
        .find_by_email("  anna@example.com  ")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(user.id, 1);
}
