use crate::e2e::helpers;

use base64::Engine;
use helpers::TestContext;
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;
use translation_relay::domain::language::LanguageCode;

const USER: i64 = 100;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_translate_text_into_preferred_targets(ctx: &TestContext) {
    ctx.fixtures.create_user(USER, &["ru", "th"]).await.unwrap();
    let token = ctx.fixtures.token_for(USER);

    let response = ctx
        .client
        .post_json_with_auth("/api/messages/text", &json!({ "text": "hello" }), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let texts = response.message_texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[0].contains("Russian") && texts[0].contains("[ru] hello"));
    assert!(texts[1].contains("Thai") && texts[1].contains("[th] hello"));

    assert_eq!(ctx.fixtures.counters(USER).await.unwrap(), (1, 0));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_never_translate_into_the_source_language(ctx: &TestContext) {
    ctx.fixtures.create_user(USER, &["ru", "th"]).await.unwrap();
    let token = ctx.fixtures.token_for(USER);

    let response = ctx
        .client
        .post_json_with_auth("/api/messages/text", &json!({ "text": "привет" }), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let texts = response.message_texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("[th] привет"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_create_new_users_with_every_language(ctx: &TestContext) {
    let token = ctx.fixtures.token_for(USER);

    let response = ctx
        .client
        .post_json_with_auth("/api/messages/text", &json!({ "text": "hello" }), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.message_texts().len(), LanguageCode::ALL.len() - 1);
    assert_eq!(ctx.fixtures.counters(USER).await.unwrap(), (1, 0));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_repeated_messages_from_cache(ctx: &TestContext) {
    ctx.fixtures.create_user(USER, &["ru", "th"]).await.unwrap();
    let token = ctx.fixtures.token_for(USER);
    let body = json!({ "text": "see you tomorrow" });

    let first = ctx
        .client
        .post_json_with_auth("/api/messages/text", &body, &token)
        .await
        .unwrap();
    let second = ctx
        .client
        .post_json_with_auth("/api/messages/text", &body, &token)
        .await
        .unwrap();

    assert_eq!(first.body, second.body);
    assert_eq!(ctx.translator.calls(), 2);
    assert_eq!(ctx.fixtures.counters(USER).await.unwrap(), (2, 0));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_failed_targets_alongside_successes(ctx: &TestContext) {
    ctx.fixtures.create_user(USER, &["ru", "th"]).await.unwrap();
    ctx.translator.fail_for(LanguageCode::Thai);
    let token = ctx.fixtures.token_for(USER);

    let response = ctx
        .client
        .post_json_with_auth("/api/messages/text", &json!({ "text": "hello" }), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let texts = response.message_texts();
    assert!(texts[0].contains("[ru] hello"));
    assert!(texts[1].contains("translation unavailable"));
    assert_eq!(ctx.fixtures.counters(USER).await.unwrap(), (1, 0));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_send_one_notice_when_every_target_fails(ctx: &TestContext) {
    ctx.fixtures.create_user(USER, &["ru"]).await.unwrap();
    ctx.translator.fail_for(LanguageCode::Russian);
    let token = ctx.fixtures.token_for(USER);

    let response = ctx
        .client
        .post_json_with_auth("/api/messages/text", &json!({ "text": "hello" }), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.message_texts(),
        vec!["❌ Translation failed. Please try again.".to_string()]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reply_with_supported_languages_when_detection_fails(ctx: &TestContext) {
    let token = ctx.fixtures.token_for(USER);

    let response = ctx
        .client
        .post_json_with_auth("/api/messages/text", &json!({ "text": "12345" }), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let texts = response.message_texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("Supported languages"));
    assert_eq!(ctx.translator.calls(), 0);
    assert_eq!(ctx.fixtures.counters(USER).await.unwrap(), (1, 0));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_invalid_text(ctx: &TestContext) {
    let token = ctx.fixtures.token_for(USER);

    ctx.client
        .post_json_with_auth("/api/messages/text", &json!({ "text": "   " }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("non-empty");

    let too_long = "a".repeat(ctx.config.translation_max_input_characters + 1);
    ctx.client
        .post_json_with_auth("/api/messages/text", &json!({ "text": too_long }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE)
        .assert_error_message("Text too long");

    assert_eq!(ctx.translator.calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_authentication(ctx: &TestContext) {
    ctx.client
        .post_json("/api/messages/text", &json!({ "text": "hello" }))
        .await
        .unwrap()
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error_message("Missing authorization header");

    ctx.client
        .post_json_with_auth("/api/messages/text", &json!({ "text": "hello" }), "garbage")
        .await
        .unwrap()
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_throttle_bursts(ctx: &TestContext) {
    ctx.fixtures.create_user(USER, &["ru"]).await.unwrap();
    let token = ctx.fixtures.token_for(USER);
    let limit = ctx.config.rate_limit_messages_per_minute;

    for _ in 0..limit {
        ctx.client
            .post_json_with_auth("/api/messages/text", &json!({ "text": "hi" }), &token)
            .await
            .unwrap()
            .assert_status(StatusCode::OK);
    }

    ctx.client
        .post_json_with_auth("/api/messages/text", &json!({ "text": "hi" }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::TOO_MANY_REQUESTS)
        .assert_error_message("Too many messages");

    assert_eq!(ctx.fixtures.counters(USER).await.unwrap().0, limit as i64);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_record_the_chat_profile(ctx: &TestContext) {
    let token = ctx.fixtures.token_for(USER);

    ctx.client
        .post_json_with_auth(
            "/api/messages/text",
            &json!({ "text": "hello", "profile": { "username": "mira", "first_name": "Mira" } }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let me = ctx.client.get_with_auth("/api/me", &token).await.unwrap();
    let body = me.body.as_ref().unwrap();
    assert_eq!(body.get("username").and_then(|v| v.as_str()), Some("mira"));
    assert_eq!(body.get("first_name").and_then(|v| v.as_str()), Some("Mira"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_transcribe_echo_and_translate_voice(ctx: &TestContext) {
    ctx.fixtures.create_user(USER, &["ru"]).await.unwrap();
    let token = ctx.fixtures.token_for(USER);

    let response = ctx
        .client
        .post_audio_with_auth("/api/messages/voice", b"hello there", &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let texts = response.message_texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[0].contains("hello there"));
    assert!(texts[1].contains("[ru] hello there"));
    assert_eq!(ctx.fixtures.counters(USER).await.unwrap(), (1, 0));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_attach_voice_replies_when_enabled(ctx: &TestContext) {
    ctx.fixtures.create_user(USER, &["ru", "th"]).await.unwrap();
    ctx.fixtures.enable_voice_replies(USER).await.unwrap();
    let token = ctx.fixtures.token_for(USER);

    let response = ctx
        .client
        .post_json_with_auth("/api/messages/text", &json!({ "text": "hello" }), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let voices: Vec<_> = response
        .messages()
        .into_iter()
        .filter(|m| m.get("kind").and_then(|v| v.as_str()) == Some("voice"))
        .collect();
    assert_eq!(voices.len(), 2);
    assert_eq!(voices[0].get("language").and_then(|v| v.as_str()), Some("ru"));

    let audio = voices[0].get("audio_base64").and_then(|v| v.as_str()).unwrap();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(audio)
        .unwrap();
    assert_eq!(decoded, b"opus:[ru] hello");

    assert_eq!(ctx.fixtures.counters(USER).await.unwrap(), (1, 1));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_invalid_audio(ctx: &TestContext) {
    let token = ctx.fixtures.token_for(USER);

    ctx.client
        .post_audio_with_auth("/api/messages/voice", b"", &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST);

    let oversized = vec![b'a'; ctx.config.max_audio_bytes + 1];
    ctx.client
        .post_audio_with_auth("/api/messages/voice", &oversized, &token)
        .await
        .unwrap()
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}
