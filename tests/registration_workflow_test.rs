//! Registration workflow against the in-memory store

mod helpers;

use assert_matches::assert_matches;
use community_portal::database::EventStore;
use community_portal::models::RegistrationStatus;
use community_portal::utils::errors::RegistrationError;
use helpers::*;
use uuid::Uuid;

#[tokio::test]
async fn test_display_year_is_stored_as_digit() {
    let ctx = TestContext::new();
    let event = ctx.create_event("Intro to Rust", 2, standard_form_config()).await;

    let registration = ctx
        .services()
        .registration_workflow
        .register_for_event(event.id, submission("Asha Verma", "asha@college.test", "2nd Year"), &event.form_config)
        .await
        .unwrap();

    assert_eq!(registration.year, "2");
    assert_eq!(registration.status, RegistrationStatus::Confirmed);

    let stored = EventStore::find_by_id(ctx.store.as_ref(), event.id).await.unwrap().unwrap();
    assert_eq!(stored.current_participants, 1);

    let listed = ctx
        .services()
        .registration_workflow
        .event_registrations(event.id)
        .await
        .unwrap();
    assert_eq!(listed[0].year, "2nd Year");
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_case_insensitively() {
    let ctx = TestContext::new();
    let event = ctx.create_event("Workshop", 10, standard_form_config()).await;
    let workflow = &ctx.services().registration_workflow;

    workflow
        .register_for_event(event.id, submission("Asha", "Asha@College.test", "1"), &event.form_config)
        .await
        .unwrap();

    let result = workflow
        .register_for_event(event.id, submission("Asha again", " asha@college.test ", "1"), &event.form_config)
        .await;
    assert_matches!(result, Err(RegistrationError::AlreadyRegistered));

    let stored = EventStore::find_by_id(ctx.store.as_ref(), event.id).await.unwrap().unwrap();
    assert_eq!(stored.current_participants, 1);
}

#[tokio::test]
async fn test_full_event_rejects_new_registrants() {
    let ctx = TestContext::new();
    let event = ctx.create_event("Small room", 1, standard_form_config()).await;
    let workflow = &ctx.services().registration_workflow;

    workflow
        .register_for_event(event.id, fake_submission(1), &event.form_config)
        .await
        .unwrap();

    let result = workflow
        .register_for_event(event.id, fake_submission(2), &event.form_config)
        .await;
    assert_matches!(result, Err(RegistrationError::EventFull));
    assert_eq!(workflow.event_registrations(event.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_event_is_reported() {
    let ctx = TestContext::new();

    let result = ctx
        .services()
        .registration_workflow
        .register_for_event(Uuid::new_v4(), fake_submission(1), &standard_form_config())
        .await;
    assert_matches!(result, Err(RegistrationError::EventNotFound));
}

#[tokio::test]
async fn test_validation_collects_every_error() {
    let ctx = TestContext::new();
    let event = ctx.create_event("Workshop", 5, standard_form_config()).await;

    let mut bad = submission("", "not-an-email", "5th Year");
    bad.section = "Z".to_string();
    bad.phone = Some("12345".to_string());

    let result = ctx
        .services()
        .registration_workflow
        .register_for_event(event.id, bad, &event.form_config)
        .await;

    let errors = match result {
        Err(RegistrationError::Validation(errors)) => errors,
        other => panic!("expected validation errors, got {:?}", other),
    };
    assert!(errors.contains(&"name is required".to_string()));
    assert!(errors.contains(&"Please enter a valid email address".to_string()));
    assert!(errors.contains(&"Invalid section selected".to_string()));
    assert!(errors.contains(&"Invalid year selected".to_string()));
    assert!(errors.contains(&"Please enter a valid 10-digit phone number".to_string()));
}

#[tokio::test]
async fn test_counter_failure_keeps_registration() {
    let ctx = TestContext::new();
    let event = ctx.create_event("Workshop", 5, standard_form_config()).await;
    ctx.store.fail_counter_updates(true);

    let registration = ctx
        .services()
        .registration_workflow
        .register_for_event(event.id, fake_submission(1), &event.form_config)
        .await
        .unwrap();

    let listed = ctx
        .services()
        .registration_workflow
        .event_registrations(event.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, registration.id);

    let stored = EventStore::find_by_id(ctx.store.as_ref(), event.id).await.unwrap().unwrap();
    assert_eq!(stored.current_participants, 0);
}

#[tokio::test]
async fn test_concurrent_duplicates_yield_one_registration() {
    let ctx = TestContext::new();
    let event = ctx.create_event("Hackathon", 50, standard_form_config()).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let workflow = ctx.services().registration_workflow.clone();
        let form_config = event.form_config.clone();
        let event_id = event.id;
        handles.push(tokio::spawn(async move {
            workflow
                .register_for_event(event_id, submission("Ravi", "ravi@college.test", "3"), &form_config)
                .await
        }));
    }

    let mut confirmed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => confirmed += 1,
            Err(e) => assert_matches!(e, RegistrationError::AlreadyRegistered),
        }
    }

    assert_eq!(confirmed, 1);
    let stored = EventStore::find_by_id(ctx.store.as_ref(), event.id).await.unwrap().unwrap();
    assert_eq!(stored.current_participants, 1);
}

#[tokio::test]
async fn test_stats_group_by_display_year() {
    let ctx = TestContext::new();
    let event = ctx.create_event("Workshop", 10, standard_form_config()).await;
    let workflow = &ctx.services().registration_workflow;

    for index in 0..3 {
        workflow
            .register_for_event(event.id, fake_submission(index), &event.form_config)
            .await
            .unwrap();
    }

    let stats = workflow.registration_stats(event.id).await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_year["1st Year"], 3);
    assert_eq!(stats.by_branch["CSE"], 3);
}
