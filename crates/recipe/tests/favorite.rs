use foodgram_shared::Error;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn favorite_toggle() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    helpers::seed_catalog(&state).await?;
    let john = helpers::create_user(&state, "john").await?;
    let cmd = foodgram_recipe::Command::new(state.clone());

    let id = cmd
        .create(john, helpers::recipe_input("porridge", &[(2, 200)], &[1]))
        .await?;

    cmd.favorite.save(john, id).await?;
    let err = cmd.favorite.save(john, id).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    cmd.favorite.unsave(john, id).await?;
    let err = cmd.favorite.unsave(john, id).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    assert!(matches!(
        cmd.favorite.save(john, id + 1).await,
        Err(Error::NotFound)
    ));

    Ok(())
}

#[tokio::test]
async fn deleting_recipe_drops_favorites() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    helpers::seed_catalog(&state).await?;
    let john = helpers::create_user(&state, "john").await?;
    let jane = helpers::create_user(&state, "jane").await?;
    let cmd = foodgram_recipe::Command::new(state.clone());

    let id = cmd
        .create(john, helpers::recipe_input("porridge", &[(2, 200)], &[1]))
        .await?;
    cmd.favorite.save(jane, id).await?;
    assert!(
        foodgram_recipe::favorite::LINK
            .exists(&state.read_db, jane, id)
            .await?
    );

    cmd.delete(john, id).await?;

    assert!(
        !foodgram_recipe::favorite::LINK
            .exists(&state.read_db, jane, id)
            .await?
    );

    Ok(())
}
