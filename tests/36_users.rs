mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

fn kenny_row() -> Value {
    json!({
        "username": "kenny",
        "password": "$2b$04$stored",
        "first_name": "Ken",
        "last_name": "Lee",
        "email": "ken@example.com",
        "photo_url": null,
        "is_admin": false
    })
}

#[tokio::test]
async fn owner_updates_own_account() -> Result<()> {
    let server = TestServer::start().await?;
    server.storage.reply(vec![kenny_row()]);
    let token = server.token("kenny", false)?;

    let res = server
        .client
        .patch(server.url("/users/kenny"))
        .bearer_auth(&token)
        .json(&json!({"first_name": "Kenneth", "password": "newpass"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("is_admin").is_none());

    let update = server.storage.last().expect("update statement");
    assert_eq!(
        update.query,
        "UPDATE users SET first_name=$1, password=$2 WHERE username=$3 RETURNING *"
    );
    let stored = update.params[1].as_str().unwrap_or_default();
    assert!(bcrypt::verify("newpass", stored)?);
    Ok(())
}

#[tokio::test]
async fn other_user_is_rejected_even_with_valid_body() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.token("kenny", false)?;

    let res = server
        .client
        .patch(server.url("/users/someone"))
        .bearer_auth(&token)
        .json(&json!({"first_name": "Valid"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(server.storage.executed().is_empty());
    Ok(())
}

#[tokio::test]
async fn other_user_is_rejected_before_body_validation() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.token("kenny", false)?;

    let res = server
        .client
        .patch(server.url("/users/someone"))
        .bearer_auth(&token)
        .json(&json!({"is_admin": true}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn admin_flag_does_not_grant_ownership() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.token("root", true)?;

    let res = server
        .client
        .delete(server.url("/users/kenny"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(server.storage.executed().is_empty());
    Ok(())
}

#[tokio::test]
async fn owner_deletes_own_account() -> Result<()> {
    let server = TestServer::start().await?;
    server.storage.reply(vec![json!({"username": "kenny"})]);
    let token = server.token("kenny", false)?;

    let res = server
        .client
        .delete(server.url("/users/kenny"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["deleted"], "kenny");
    Ok(())
}

#[tokio::test]
async fn any_authenticated_user_can_read_profiles() -> Result<()> {
    let server = TestServer::start().await?;
    server.storage.reply(vec![json!({
        "username": "someone",
        "first_name": "Some",
        "last_name": "One",
        "email": "some@example.com",
        "photo_url": null
    })]);
    let token = server.token("kenny", false)?;

    let res = server
        .client
        .get(server.url("/users/someone"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["username"], "someone");
    Ok(())
}

#[tokio::test]
async fn listing_users_requires_token() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server.client.get(server.url("/users")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
