use crate::e2e::helpers;

use helpers::{TestContext, ADMIN_ID};
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;
use translation_relay::domain::translation::ModelSelection;
use translation_relay::domain::user::{UserRecord, UsersOverview};

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_users_with_summary(ctx: &TestContext) {
    ctx.fixtures.create_user(10, &["ru"]).await.unwrap();
    ctx.fixtures.create_user(11, &["th", "vi"]).await.unwrap();
    ctx.fixtures.enable_voice_replies(11).await.unwrap();
    let token = ctx.fixtures.token_for(ADMIN_ID);

    let response = ctx
        .client
        .get_with_auth("/api/admin/users", &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let overview: UsersOverview = response.json().unwrap();
    assert_eq!(
        overview.users.iter().map(|u| u.user_id).collect::<Vec<_>>(),
        vec![10, 11]
    );
    assert_eq!(overview.summary.total_users, 2);
    assert_eq!(overview.summary.voice_enabled_users, 1);
    assert_eq!(overview.summary.disabled_users, 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_forbid_non_admins(ctx: &TestContext) {
    let token = ctx.fixtures.token_for(42);

    ctx.client
        .get_with_auth("/api/admin/users", &token)
        .await
        .unwrap()
        .assert_status(StatusCode::FORBIDDEN);

    ctx.client
        .put_json_with_auth("/api/admin/users/10/disabled", &json!({ "disabled": true }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::FORBIDDEN);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_block_and_unblock_a_user(ctx: &TestContext) {
    ctx.fixtures.create_user(10, &["ru"]).await.unwrap();
    let admin = ctx.fixtures.token_for(ADMIN_ID);
    let user = ctx.fixtures.token_for(10);

    let record: UserRecord = ctx
        .client
        .put_json_with_auth("/api/admin/users/10/disabled", &json!({ "disabled": true }), &admin)
        .await
        .unwrap()
        .json()
        .unwrap();
    assert!(record.is_disabled);

    ctx.client
        .post_json_with_auth("/api/messages/text", &json!({ "text": "hello" }), &user)
        .await
        .unwrap()
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error_message("Access disabled");
    assert_eq!(ctx.fixtures.counters(10).await.unwrap(), (0, 0));

    ctx.client
        .put_json_with_auth("/api/admin/users/10/disabled", &json!({ "disabled": false }), &admin)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    ctx.client
        .post_json_with_auth("/api/messages/text", &json!({ "text": "hello" }), &user)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_create_users_when_disabling_unknown_ids(ctx: &TestContext) {
    let token = ctx.fixtures.token_for(ADMIN_ID);

    ctx.client
        .put_json_with_auth("/api/admin/users/999/disabled", &json!({ "disabled": true }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);

    let overview: UsersOverview = ctx
        .client
        .get_with_auth("/api/admin/users", &token)
        .await
        .unwrap()
        .json()
        .unwrap();
    assert!(overview.users.is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_switch_the_translation_model(ctx: &TestContext) {
    ctx.fixtures.create_user(10, &["ru"]).await.unwrap();
    let admin = ctx.fixtures.token_for(ADMIN_ID);
    let user = ctx.fixtures.token_for(10);

    let selection: ModelSelection = ctx
        .client
        .get_with_auth("/api/admin/model", &admin)
        .await
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(selection.current, ctx.config.openai_model);
    assert!(selection.available.iter().any(|m| m.id == "gpt-4o-mini"));

    let selection: ModelSelection = ctx
        .client
        .put_json_with_auth("/api/admin/model", &json!({ "model": "gpt-4o-mini" }), &admin)
        .await
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(selection.current, "gpt-4o-mini");

    ctx.client
        .post_json_with_auth("/api/messages/text", &json!({ "text": "hello" }), &user)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    assert_eq!(ctx.translator.last_model().as_deref(), Some("gpt-4o-mini"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_refuse_unknown_models_and_non_admins(ctx: &TestContext) {
    let admin = ctx.fixtures.token_for(ADMIN_ID);
    let user = ctx.fixtures.token_for(42);

    ctx.client
        .put_json_with_auth("/api/admin/model", &json!({ "model": "gpt-2" }), &admin)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.client
        .put_json_with_auth("/api/admin/model", &json!({ "model": "gpt-4o-mini" }), &user)
        .await
        .unwrap()
        .assert_status(StatusCode::FORBIDDEN);

    let selection: ModelSelection = ctx
        .client
        .get_with_auth("/api/admin/model", &admin)
        .await
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(selection.current, ctx.config.openai_model);
}
