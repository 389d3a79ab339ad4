use axum::http::{StatusCode, header};
use serde_json::json;
use temp_dir::TempDir;

mod helpers;

const DOWNLOAD: &str = "/api/recipes/download_shopping_list/";

#[tokio::test]
async fn download_sums_amounts_per_ingredient() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup_test_app(&dir).await?;
    app.seed_catalog().await?;
    let (_, alice) = app.create_user("alice").await?;
    let (_, bob) = app.create_user("bob").await?;

    let pancakes = app
        .create_recipe(&bob, "Pancakes", &[(1, 200), (2, 300), (3, 5)], &[1])
        .await?;
    let bread = app
        .create_recipe(&bob, "Bread", &[(1, 500), (3, 10)], &[2])
        .await?;
    app.create_recipe(&bob, "Omelette", &[(4, 3)], &[1]).await?;

    for id in [pancakes, bread] {
        let res = app
            .post(&format!("/api/recipes/{id}/shopping_list/"), Some(&alice), json!({}))
            .await?;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.text);
        assert_eq!(res.json()["id"], id);
    }

    let res = app
        .post(
            &format!("/api/recipes/{pancakes}/shopping_list/"),
            Some(&alice),
            json!({}),
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["errors"], "Record already exists.");

    let res = app.get(DOWNLOAD, Some(&alice)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.headers[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        res.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=shopping_cart_list.txt"
    );
    assert_eq!(
        res.text,
        "Shopping list of alice:\nflour: 700 g\nmilk: 300 ml\nsalt: 15 g\n"
    );

    let res = app
        .get(&format!("/api/recipes/{pancakes}/"), Some(&alice))
        .await?;
    assert_eq!(res.json()["is_in_shopping_list"], true);

    let res = app.get("/api/recipes/?is_in_shopping_list=1", Some(&alice)).await?;
    assert_eq!(res.json()["count"], 2);

    Ok(())
}

#[tokio::test]
async fn empty_list_is_header_only() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup_test_app(&dir).await?;
    let (_, alice) = app.create_user("alice").await?;

    let res = app.get(DOWNLOAD, Some(&alice)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.text, "Shopping list of alice:\n");

    Ok(())
}

#[tokio::test]
async fn remove_toggle_rules() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup_test_app(&dir).await?;
    app.seed_catalog().await?;
    let (_, alice) = app.create_user("alice").await?;
    let id = app.create_recipe(&alice, "Soup", &[(3, 5)], &[2]).await?;
    let uri = format!("/api/recipes/{id}/shopping_list/");

    let res = app.delete(&uri, Some(&alice)).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["errors"], "Record does not exist.");

    app.post(&uri, Some(&alice), json!({})).await?;

    let res = app.delete(&uri, Some(&alice)).await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = app
        .delete("/api/recipes/999/shopping_list/", Some(&alice))
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.post(&uri, None, json!({})).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn deleted_recipe_leaves_every_list() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup_test_app(&dir).await?;
    app.seed_catalog().await?;
    let (_, alice) = app.create_user("alice").await?;
    let (_, bob) = app.create_user("bob").await?;

    let id = app.create_recipe(&bob, "Soup", &[(3, 5)], &[2]).await?;
    for token in [&alice, &bob] {
        app.post(&format!("/api/recipes/{id}/shopping_list/"), Some(token), json!({}))
            .await?;
        app.post(&format!("/api/recipes/{id}/favorite/"), Some(token), json!({}))
            .await?;
    }

    let res = app.delete(&format!("/api/recipes/{id}/"), Some(&bob)).await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = app.get(DOWNLOAD, Some(&alice)).await?;
    assert_eq!(res.text, "Shopping list of alice:\n");

    let res = app.get("/api/recipes/?is_favorited=1", Some(&alice)).await?;
    assert_eq!(res.json()["count"], 0);

    Ok(())
}
