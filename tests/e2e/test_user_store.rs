//! The Postgres user-state store under concurrent callers

use crate::e2e::helpers;

use helpers::TestContext;
use std::collections::BTreeSet;
use std::sync::Arc;
use test_context::test_context;
use translation_relay::domain::language::LanguageCode;
use translation_relay::domain::user::{StoreError, UserProfile};
use translation_relay::infrastructure::repositories::{UserRepository, UserStateStore};

fn store(ctx: &TestContext) -> Arc<UserRepository> {
    Arc::new(UserRepository::new(Arc::new(ctx.pool.clone())))
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_lose_concurrent_increments(ctx: &TestContext) {
    let store = store(ctx);

    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.increment_message_count(7).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let record = store.get_or_create(7).await.unwrap();
    assert_eq!(record.message_count, 50);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_keep_both_counters_under_interleaving(ctx: &TestContext) {
    let store = store(ctx);

    let tasks: Vec<_> = (0..40)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                if i % 2 == 0 {
                    store.increment_message_count(7).await.map(|_| ())
                } else {
                    store.increment_voice_response_count(7).await.map(|_| ())
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let record = store.get_or_create(7).await.unwrap();
    assert_eq!(record.message_count, 20);
    assert_eq!(record.voice_response_count, 20);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_never_empty_preferences_under_concurrent_toggles(ctx: &TestContext) {
    let store = store(ctx);
    store.get_or_create(7).await.unwrap();

    let tasks: Vec<_> = LanguageCode::ALL
        .into_iter()
        .map(|language| {
            let store = store.clone();
            tokio::spawn(async move { store.toggle_language_preference(7, language).await })
        })
        .collect();

    let mut refused = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(targets) => assert!(!targets.is_empty()),
            Err(StoreError::LastTargetLanguage(_)) => refused += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    let record = store.get_or_create(7).await.unwrap();
    assert_eq!(refused, 1);
    assert_eq!(record.preferred_targets.len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_create_users_once(ctx: &TestContext) {
    let store = store(ctx);

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.get_or_create(7).await })
        })
        .collect();
    for task in tasks {
        let record = task.await.unwrap().unwrap();
        assert_eq!(record.preferred_targets, LanguageCode::all());
    }

    assert_eq!(store.list_all().await.unwrap().len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_keep_stored_profile_fields_that_are_missing(ctx: &TestContext) {
    let store = store(ctx);

    store
        .record_profile(
            7,
            &UserProfile {
                username: Some("mira".to_string()),
                first_name: Some("Mira".to_string()),
                last_name: None,
            },
        )
        .await
        .unwrap();
    let record = store
        .record_profile(
            7,
            &UserProfile {
                username: None,
                first_name: Some("Miroslava".to_string()),
                last_name: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(record.username.as_deref(), Some("mira"));
    assert_eq!(record.first_name.as_deref(), Some("Miroslava"));
    assert_eq!(record.display_name(), "mira");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_toggle_voice_replies_atomically(ctx: &TestContext) {
    let store = store(ctx);

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.toggle_voice_replies(7).await })
        })
        .collect();
    let mut enabled = BTreeSet::new();
    for task in tasks {
        enabled.insert(task.await.unwrap().unwrap());
    }

    // an even number of flips lands back on the default
    assert_eq!(enabled.len(), 2);
    assert!(!store.get_or_create(7).await.unwrap().voice_replies_enabled);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_none_when_disabling_unknown_users(ctx: &TestContext) {
    let store = store(ctx);
    assert!(store.set_disabled(404, true).await.unwrap().is_none());
    assert!(store.list_all().await.unwrap().is_empty());
}
