// tests/session_client_test.rs — Session/conversation client against a scripted transport

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

use common::{context, MockTransport};
use pension_chat::client::types::ConversationId;
use pension_chat::client::{ClientContext, Method, SessionClient, Transport};
use pension_chat::infra::errors::ClientError;

fn session_client(transport: &Arc<MockTransport>, ctx: &ClientContext) -> SessionClient {
    let transport: Arc<dyn Transport> = transport.clone();
    SessionClient::new(transport, ctx.clone())
}

#[tokio::test]
async fn test_create_session() {
    let transport = MockTransport::new();
    transport.respond(json!({
        "session_id": "7ebba939-e14d-4ae8-928f-f05438e49e41",
        "created_at": "2026-10-16T09:00:00Z",
        "expires_at": "2026-10-17T09:00:00Z"
    }));
    let sessions = session_client(&transport, &context());

    let session = sessions.create_session().await;

    assert!(session.is_valid());
    assert_eq!(session.session_id, "7ebba939-e14d-4ae8-928f-f05438e49e41");
    assert!(session.expires_at.is_some());
    let calls = transport.calls();
    assert_eq!(calls[0].method, Method::Post);
    assert_eq!(calls[0].path, "/session/create");
}

#[tokio::test]
async fn test_create_session_failure_is_degraded() {
    let transport = MockTransport::new();
    transport.fail(500);
    let sessions = session_client(&transport, &context());

    let session = sessions.create_session().await;

    assert!(!session.is_valid());
    assert_eq!(session.session_id, "");
}

#[tokio::test]
async fn test_fetch_conversations_persists_first() {
    let transport = MockTransport::new();
    transport.respond(json!({
        "session_id": "sid",
        "conversations": [
            {"id": 21, "title": "Early retirement"},
            {"id": 22, "title": "Top-ups"}
        ]
    }));
    let ctx = context();
    let sessions = session_client(&transport, &ctx);

    let list = sessions.fetch_conversations_for_session("sid").await;

    assert_eq!(list.len(), 2);
    assert_eq!(ctx.active_conversation_id(), Some(ConversationId::Number(21)));
    assert_eq!(transport.calls()[0].path, "/chat/conversations/sid");
}

#[tokio::test]
async fn test_fetch_conversations_skips_malformed_records() {
    let transport = MockTransport::new();
    transport.respond(json!({
        "conversations": [
            {"id": 21, "title": "ok"},
            {"id": null},
            {"title": "no id"},
            {"id": "c-23"}
        ]
    }));
    let ctx = context();
    let sessions = session_client(&transport, &ctx);

    let list = sessions.fetch_conversations_for_session("sid").await;

    let ids: Vec<ConversationId> = list.into_iter().map(|c| c.id).collect();
    assert_eq!(
        ids,
        vec![ConversationId::Number(21), ConversationId::Text("c-23".into())]
    );
    assert_eq!(ctx.active_conversation_id(), Some(ConversationId::Number(21)));
}

#[tokio::test]
async fn test_bootstrap_keeps_good_conversation_beside_bad_record() {
    let transport = MockTransport::new();
    transport.respond(json!({"conversations": [{"id": 21, "title": "ok"}, {"id": null}]}));
    let ctx = context();
    ctx.set_session_id("sid").unwrap();
    let sessions = session_client(&transport, &ctx);

    let active = sessions.bootstrap().await.unwrap();

    assert_eq!(active.conversation_id, ConversationId::Number(21));
    // Only the listing; no conversation was created.
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_fetch_conversations_encodes_session_id() {
    let transport = MockTransport::new();
    transport.respond(json!([]));
    let ctx = context();
    let sessions = session_client(&transport, &ctx);

    sessions.fetch_conversations_for_session("s/../../session/create?x=1").await;
    assert!(sessions.fetch_conversations_for_session("..").await.is_empty());

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].path,
        "/chat/conversations/s%2F..%2F..%2Fsession%2Fcreate%3Fx%3D1"
    );
}

#[tokio::test]
async fn test_fetch_conversations_empty_leaves_active_alone() {
    let transport = MockTransport::new();
    transport.respond(json!({"session_id": "sid", "conversations": []}));
    let ctx = context();
    ctx.set_active_conversation_id(&ConversationId::Number(5))
        .unwrap();
    let sessions = session_client(&transport, &ctx);

    assert!(sessions.fetch_conversations_for_session("sid").await.is_empty());
    assert_eq!(ctx.active_conversation_id(), Some(ConversationId::Number(5)));
}

#[tokio::test]
async fn test_fetch_conversations_failure_is_empty() {
    let transport = MockTransport::new();
    transport.fail(404);
    let ctx = context();
    let sessions = session_client(&transport, &ctx);

    assert!(sessions.fetch_conversations_for_session("sid").await.is_empty());
    assert!(ctx.active_conversation_id().is_none());
}

#[tokio::test]
async fn test_list_all_does_not_change_active() {
    let transport = MockTransport::new();
    transport.respond(json!([{"id": "a"}, {"id": "b"}]));
    let ctx = context();
    ctx.set_active_conversation_id(&"b".into()).unwrap();
    let sessions = session_client(&transport, &ctx);

    let all = sessions.list_all_conversations().await;

    assert_eq!(all.len(), 2);
    assert_eq!(ctx.active_conversation_id(), Some(ConversationId::Text("b".into())));
    let calls = transport.calls();
    assert_eq!(calls[0].method, Method::Get);
    assert_eq!(calls[0].path, "/chat/conversations");
}

#[tokio::test]
async fn test_create_conversation_becomes_active() {
    let transport = MockTransport::new();
    transport.respond(json!({"id": 77, "title": null}));
    let ctx = context();
    ctx.set_session_id("sid").unwrap();
    let sessions = session_client(&transport, &ctx);

    let conversation = sessions.create_conversation().await.unwrap();

    assert_eq!(conversation.id, ConversationId::Number(77));
    assert_eq!(ctx.active_conversation_id(), Some(ConversationId::Number(77)));
    let calls = transport.calls();
    assert_eq!(calls[0].path, "/chat/conversations");
    assert_eq!(calls[0].body, Some(json!({"session_id": "sid"})));
}

#[tokio::test]
async fn test_create_conversation_requires_session() {
    let transport = MockTransport::new();
    let sessions = session_client(&transport, &context());

    let err = sessions.create_conversation().await.unwrap_err();

    assert!(matches!(err, ClientError::InvalidSession));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_create_conversation_propagates_failure() {
    let transport = MockTransport::new();
    transport.fail(500);
    let ctx = context();
    ctx.set_session_id("sid").unwrap();
    let sessions = session_client(&transport, &ctx);

    assert!(sessions.create_conversation().await.is_err());
    assert!(ctx.active_conversation_id().is_none());
}

#[tokio::test]
async fn test_bootstrap_fresh_profile() {
    let transport = MockTransport::new();
    transport
        .respond(json!({"session_id": "new-sid"}))
        .respond(json!({"session_id": "new-sid", "conversations": []}))
        .respond(json!({"conversation_id": 1}));
    let ctx = context();
    let sessions = session_client(&transport, &ctx);

    let active = sessions.bootstrap().await.unwrap();

    assert_eq!(active.session_id, "new-sid");
    assert_eq!(active.conversation_id, ConversationId::Number(1));
    assert_eq!(ctx.session_id().as_deref(), Some("new-sid"));
    assert_eq!(ctx.active_conversation_id(), Some(ConversationId::Number(1)));

    let paths: Vec<String> = transport.calls().into_iter().map(|c| c.path).collect();
    assert_eq!(
        paths,
        vec![
            "/session/create".to_string(),
            "/chat/conversations/new-sid".to_string(),
            "/chat/conversations".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_bootstrap_picks_existing_conversation() {
    let transport = MockTransport::new();
    transport.respond(json!({"conversations": [{"id": 8}]}));
    let ctx = context();
    ctx.set_session_id("sid").unwrap();
    let sessions = session_client(&transport, &ctx);

    let active = sessions.bootstrap().await.unwrap();

    assert_eq!(active.conversation_id, ConversationId::Number(8));
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_bootstrap_reuses_stored_state() {
    let transport = MockTransport::new();
    let ctx = context();
    ctx.set_session_id("sid").unwrap();
    ctx.set_active_conversation_id(&ConversationId::Number(3))
        .unwrap();
    let sessions = session_client(&transport, &ctx);

    let active = sessions.bootstrap().await.unwrap();

    assert_eq!(active.session_id, "sid");
    assert_eq!(active.conversation_id, ConversationId::Number(3));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_bootstrap_rejects_invalid_session() {
    let transport = MockTransport::new();
    transport.fail(502);
    let ctx = context();
    let sessions = session_client(&transport, &ctx);

    let err = sessions.bootstrap().await.unwrap_err();

    assert!(matches!(err, ClientError::InvalidSession));
    assert!(ctx.session_id().is_none());
}
