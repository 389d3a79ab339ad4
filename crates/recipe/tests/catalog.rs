use foodgram_recipe::{ingredient::ImportInput, tag};
use foodgram_shared::Error;
use temp_dir::TempDir;

mod helpers;

fn item(name: &str, unit: &str) -> ImportInput {
    ImportInput {
        name: name.to_owned(),
        measurement_unit: unit.to_owned(),
    }
}

#[tokio::test]
async fn import_skips_existing_pairs() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = foodgram_recipe::ingredient::Command(state.clone());

    let imported = cmd
        .import(vec![item("salt", "g"), item("sugar", "g"), item("salt", "pinch")])
        .await?;
    assert_eq!(imported, 3);

    let imported = cmd
        .import(vec![item("salt", "g"), item("saffron", "g")])
        .await?;
    assert_eq!(imported, 1);

    Ok(())
}

#[tokio::test]
async fn search_is_a_name_prefix() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    foodgram_recipe::ingredient::Command(state.clone())
        .import(vec![
            item("sugar", "g"),
            item("salt", "g"),
            item("sea salt", "g"),
            item("100%_juice", "ml"),
        ])
        .await?;
    let query = foodgram_recipe::ingredient::Query(state);

    let names = |found: Vec<foodgram_recipe::ingredient::IngredientView>| {
        found.into_iter().map(|i| i.name).collect::<Vec<_>>()
    };

    assert_eq!(names(query.search(Some("s")).await?), vec!["salt", "sea salt", "sugar"]);
    assert_eq!(names(query.search(Some("SA")).await?), vec!["salt"]);
    assert_eq!(names(query.search(Some("1%")).await?), Vec::<String>::new());
    assert_eq!(names(query.search(Some("100%_")).await?), vec!["100%_juice"]);
    assert_eq!(query.search(None).await?.len(), 4);

    let salt = query.find(2).await?.unwrap();
    assert_eq!(salt.name, "salt");
    assert!(query.find(99).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn tags_are_unique() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    helpers::seed_catalog(&state).await?;
    let cmd = tag::Command(state.clone());
    let query = tag::Query(state);

    let err = cmd
        .create(tag::CreateInput {
            name: "Lunch".to_owned(),
            color: "#e26c2d".to_owned(),
            slug: "lunch".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Rejected(_)));

    let err = cmd
        .create(tag::CreateInput {
            name: "Lunch".to_owned(),
            color: "red".to_owned(),
            slug: "lunch!".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validate(_)));

    let tags = query.list().await?;
    assert_eq!(
        tags.iter().map(|t| t.slug.as_str()).collect::<Vec<_>>(),
        vec!["breakfast", "dinner"]
    );
    assert_eq!(query.find(2).await?.unwrap().color, "#49B64E");
    assert!(query.find(3).await?.is_none());

    Ok(())
}
