use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use test_context::test_context;
use translation_relay::domain::user::{PreferredTargetsResponse, UserRecord, VoiceRepliesResponse};

const USER: i64 = 200;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_create_profile_on_first_contact(ctx: &TestContext) {
    let token = ctx.fixtures.token_for(USER);

    let response = ctx.client.get_with_auth("/api/me", &token).await.unwrap();

    response.assert_status(StatusCode::OK);
    let record: UserRecord = response.json().unwrap();
    assert_eq!(record.user_id, USER);
    assert_eq!(record.preferred_targets.len(), 6);
    assert!(!record.voice_replies_enabled);
    assert!(!record.is_disabled);
    assert_eq!(record.message_count, 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_toggle_a_target_language(ctx: &TestContext) {
    let token = ctx.fixtures.token_for(USER);

    let response = ctx
        .client
        .post_empty_with_auth("/api/me/languages/ja/toggle", &token)
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    let targets: PreferredTargetsResponse = response.json().unwrap();
    assert_eq!(targets.preferred_targets.len(), 5);

    let response = ctx
        .client
        .post_empty_with_auth("/api/me/languages/ja/toggle", &token)
        .await
        .unwrap();
    let targets: PreferredTargetsResponse = response.json().unwrap();
    assert_eq!(targets.preferred_targets.len(), 6);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_refuse_to_disable_the_last_language(ctx: &TestContext) {
    ctx.fixtures.create_user(USER, &["ko"]).await.unwrap();
    let token = ctx.fixtures.token_for(USER);

    ctx.client
        .post_empty_with_auth("/api/me/languages/ko/toggle", &token)
        .await
        .unwrap()
        .assert_status(StatusCode::CONFLICT)
        .assert_error_message("at least one target language");

    let record: UserRecord = ctx
        .client
        .get_with_auth("/api/me", &token)
        .await
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(record.preferred_targets.len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unknown_language_codes(ctx: &TestContext) {
    let token = ctx.fixtures.token_for(USER);

    ctx.client
        .post_empty_with_auth("/api/me/languages/fr/toggle", &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_toggle_voice_replies(ctx: &TestContext) {
    let token = ctx.fixtures.token_for(USER);

    let first: VoiceRepliesResponse = ctx
        .client
        .post_empty_with_auth("/api/me/voice-replies/toggle", &token)
        .await
        .unwrap()
        .json()
        .unwrap();
    assert!(first.voice_replies_enabled);

    let second: VoiceRepliesResponse = ctx
        .client
        .post_empty_with_auth("/api/me/voice-replies/toggle", &token)
        .await
        .unwrap()
        .json()
        .unwrap();
    assert!(!second.voice_replies_enabled);
}
