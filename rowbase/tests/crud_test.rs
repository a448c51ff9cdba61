use rowbase::{Conditions, Database, Error, Record, RecordModel, TableConfig, Value};

async fn setup() -> Result<RecordModel, Box<dyn std::error::Error>> {
    let _ = env_logger::builder().is_test(true).try_init();
    // max_connections(1) keeps every statement on the same in-memory database
    let db = Database::builder().max_connections(1).connect("sqlite::memory:").await?;
    sqlx::query(
        "CREATE TABLE posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL DEFAULT 'draft',
            score INTEGER
        )",
    )
    .execute(db.pool())
    .await?;

    Ok(RecordModel::new(db, TableConfig::new("posts"))?)
}

#[tokio::test]
async fn test_create_then_find_by_id_returns_inserted_columns() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup().await?;
    let data = Record::new().with("title", "Hello").with("status", "published").with("score", 42);

    let id = posts.create_returning_id(&data).await?;
    assert_eq!(id, Value::Int(1));

    let found = posts.find_by_id(id).await?.expect("row should exist");
    for (column, value) in data.iter() {
        assert_eq!(found.get(column), Some(value), "column {}", column);
    }
    assert_eq!(found.get("id"), Some(&Value::Int(1)));

    Ok(())
}

#[tokio::test]
async fn test_create_returning_id_prefers_supplied_primary_key() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup().await?;

    let id = posts.create_returning_id(&Record::new().with("id", 40).with("title", "Pinned")).await?;
    assert_eq!(id, Value::Int(40));
    assert!(posts.find_by_id(40).await?.is_some());

    Ok(())
}

#[tokio::test]
async fn test_missing_column_is_null_not_defaulted_by_rowbase() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup().await?;
    posts.create(&Record::new().with("title", "Bare")).await?;

    let row = posts.find_by_id(1).await?.expect("row should exist");
    assert_eq!(row.get("score"), Some(&Value::Null));
    // the database's own DEFAULT still applies
    assert_eq!(row.get("status"), Some(&Value::Text("draft".into())));

    Ok(())
}

#[tokio::test]
async fn test_constraint_violation_is_a_driver_error() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup().await?;
    let data = Record::new().with("title", "Twice");
    posts.create(&data).await?;

    let err = posts.create(&data).await.unwrap_err();
    assert!(err.is_driver_error(), "unexpected error: {}", err);
    assert!(!posts.lenient().create(&data).await);
    assert_eq!(posts.count(&Conditions::new()).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_update_changes_only_given_fields() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup().await?;
    posts.create(&Record::new().with("title", "Draft").with("score", 1)).await?;

    posts.update(1, &Record::new().with("status", "published")).await?;

    let row = posts.find_by_id(1).await?.expect("row should exist");
    assert_eq!(row.get("status"), Some(&Value::Text("published".into())));
    assert_eq!(row.get("title"), Some(&Value::Text("Draft".into())));
    assert_eq!(row.get("score"), Some(&Value::Int(1)));

    Ok(())
}

#[tokio::test]
async fn test_update_of_missing_id_is_not_found_and_mutates_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup().await?;
    posts.create(&Record::new().with("title", "Only")).await?;
    let before = posts.fetch_all(&Conditions::new()).await?;

    let err = posts.update(999, &Record::new().with("status", "archived")).await.unwrap_err();
    assert!(matches!(err, Error::NotFound));
    assert!(!posts.lenient().update(999, &Record::new().with("status", "archived")).await);

    assert_eq!(posts.fetch_all(&Conditions::new()).await?, before);

    Ok(())
}

#[tokio::test]
async fn test_delete_by_id() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup().await?;
    posts.create(&Record::new().with("title", "Gone")).await?;

    posts.delete(1).await?;
    assert!(posts.find_by_id(1).await?.is_none());
    assert!(matches!(posts.delete(1).await, Err(Error::NotFound)));

    Ok(())
}

#[tokio::test]
async fn test_delete_where_requires_an_explicit_wildcard() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup().await?;
    for title in ["a", "b", "c"] {
        posts.create(&Record::new().with("title", title)).await?;
    }

    let err = posts.delete_where(&Conditions::new()).await.unwrap_err();
    assert!(matches!(err, Error::UnconfirmedWildcard));
    assert!(!posts.lenient().delete_where(&Conditions::new()).await);
    assert_eq!(posts.count(&Conditions::new()).await?, 3);

    assert_eq!(posts.delete_where(&Conditions::new().eq("title", "a")).await?, 1);
    assert_eq!(posts.delete_where(&Conditions::wildcard()).await?, 2);
    assert_eq!(posts.count(&Conditions::new()).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_delete_where_with_empty_not_in_is_a_wildcard() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup().await?;
    for title in ["a", "b", "c"] {
        posts.create(&Record::new().with("title", title)).await?;
    }
    let none: Vec<i64> = Vec::new();

    let err = posts.delete_where(&Conditions::new().not_in("id", none.clone())).await.unwrap_err();
    assert!(matches!(err, Error::UnconfirmedWildcard));
    assert_eq!(posts.count(&Conditions::new()).await?, 3);

    // still a plain filter once another predicate narrows it
    let narrowed = Conditions::new().not_in("id", none.clone()).eq("title", "a");
    assert_eq!(posts.delete_where(&narrowed).await?, 1);
    assert_eq!(posts.delete_where(&Conditions::wildcard().not_in("id", none)).await?, 2);

    Ok(())
}

#[tokio::test]
async fn test_missing_table_binding_fails_construction() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::builder().max_connections(1).connect("sqlite::memory:").await?;

    let err = RecordModel::new(db.clone(), TableConfig::new("")).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    assert!(matches!(
        RecordModel::new(db, TableConfig::new("posts\"; --")),
        Err(Error::Configuration(_))
    ));

    Ok(())
}
