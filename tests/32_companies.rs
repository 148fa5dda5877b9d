mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;
use jobly_api::database::DatabaseError;

fn netflix() -> Value {
    json!({
        "handle": "NFLX",
        "name": "Netflix",
        "num_employees": 7500,
        "description": "Doing great!",
        "logo_url": "http://netflix.com"
    })
}

#[tokio::test]
async fn admin_creates_company() -> Result<()> {
    let server = TestServer::start().await?;
    server.storage.reply(vec![netflix()]);
    let token = server.token("root", true)?;

    let res = server
        .client
        .post(server.url("/companies"))
        .bearer_auth(&token)
        .json(&netflix())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["handle"], "NFLX");

    let insert = server.storage.last().expect("insert statement");
    assert!(insert.query.starts_with("INSERT INTO companies"));
    assert_eq!(insert.params.len(), 5);
    Ok(())
}

#[tokio::test]
async fn non_admin_cannot_create_company() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.token("kenny", false)?;

    let res = server
        .client
        .post(server.url("/companies"))
        .bearer_auth(&token)
        .json(&netflix())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(server.storage.executed().is_empty());
    Ok(())
}

#[tokio::test]
async fn create_reports_every_violation() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.token("root", true)?;

    let res = server
        .client
        .post(server.url("/companies"))
        .bearer_auth(&token)
        .json(&json!({"name": "Netflix", "num_employees": -5, "logo_url": "nope"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["errors"],
        json!([
            "instance requires property \"handle\"",
            "instance.num_employees must have a minimum value of 0",
            "instance.logo_url does not conform to the \"uri\" format"
        ])
    );
    Ok(())
}

#[tokio::test]
async fn duplicate_handle_is_conflict() -> Result<()> {
    let server = TestServer::start().await?;
    server
        .storage
        .fail(DatabaseError::Conflict("duplicate key value violates unique constraint".into()));
    let token = server.token("root", true)?;

    let res = server
        .client
        .post(server.url("/companies"))
        .bearer_auth(&token)
        .json(&netflix())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Duplicate company: NFLX");
    Ok(())
}

#[tokio::test]
async fn patch_builds_partial_update_in_body_order() -> Result<()> {
    let server = TestServer::start().await?;
    server.storage.reply(vec![netflix()]);
    let token = server.token("root", true)?;

    let res = server
        .client
        .patch(server.url("/companies/NFLX"))
        .bearer_auth(&token)
        .json(&json!({"description": "Doing great!", "logo_url": "http://netflix.com"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let update = server.storage.last().expect("update statement");
    assert_eq!(
        update.query,
        "UPDATE companies SET description=$1, logo_url=$2 WHERE handle=$3 RETURNING *"
    );
    assert_eq!(
        update.params,
        vec![json!("Doing great!"), json!("http://netflix.com"), json!("NFLX")]
    );
    Ok(())
}

#[tokio::test]
async fn patch_with_empty_body_is_bad_request() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.token("root", true)?;

    let res = server
        .client
        .patch(server.url("/companies/NFLX"))
        .bearer_auth(&token)
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(server.storage.executed().is_empty());
    Ok(())
}

#[tokio::test]
async fn patch_cannot_change_handle() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.token("root", true)?;

    let res = server
        .client
        .patch(server.url("/companies/NFLX"))
        .bearer_auth(&token)
        .json(&json!({"handle": "NETFLIX"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(server.storage.executed().is_empty());
    Ok(())
}

#[tokio::test]
async fn get_company_includes_jobs() -> Result<()> {
    let server = TestServer::start().await?;
    server
        .storage
        .reply(vec![netflix()])
        .reply(vec![json!({"id": 1, "title": "Engineer", "company_handle": "NFLX"})]);
    let token = server.token("kenny", false)?;

    let res = server
        .client
        .get(server.url("/companies/NFLX"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["name"], "Netflix");
    assert_eq!(body["data"]["jobs"][0]["title"], "Engineer");
    Ok(())
}

#[tokio::test]
async fn missing_company_is_not_found() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.token("kenny", false)?;

    let res = server
        .client
        .get(server.url("/companies/NOPE"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Company does not exist");
    Ok(())
}

#[tokio::test]
async fn admin_deletes_company() -> Result<()> {
    let server = TestServer::start().await?;
    server.storage.reply(vec![json!({"handle": "NFLX"})]);
    let token = server.token("root", true)?;

    let res = server
        .client
        .delete(server.url("/companies/NFLX"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["deleted"], "NFLX");
    Ok(())
}

#[tokio::test]
async fn storage_failure_passes_message_through() -> Result<()> {
    let server = TestServer::start().await?;
    server
        .storage
        .fail(DatabaseError::Query("relation \"companies\" does not exist".into()));
    let token = server.token("kenny", false)?;

    let res = server
        .client
        .get(server.url("/companies"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "relation \"companies\" does not exist");
    Ok(())
}
