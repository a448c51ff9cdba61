use rowbase::{Conditions, Database, Error, Record, RecordModel, Sort, TableConfig, Value};

async fn setup(rows: i64) -> Result<RecordModel, Box<dyn std::error::Error>> {
    let _ = env_logger::builder().is_test(true).try_init();
    let db = Database::builder().max_connections(1).connect("sqlite::memory:").await?;
    sqlx::query(
        "CREATE TABLE posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            status TEXT NOT NULL,
            score INTEGER
        )",
    )
    .execute(db.pool())
    .await?;

    let posts = RecordModel::new(db, TableConfig::new("posts").sortable(["id", "title", "score"]))?;
    for i in 1..=rows {
        let status = if i % 2 == 0 { "published" } else { "draft" };
        posts
            .create(&Record::new().with("title", format!("post {}", i)).with("status", status).with("score", i * 10))
            .await?;
    }
    Ok(posts)
}

fn ids(rows: &[Record]) -> Vec<i64> {
    rows.iter().filter_map(|r| r.get("id").and_then(Value::as_i64)).collect()
}

#[tokio::test]
async fn test_count_matches_fetch_all_for_every_condition_set() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup(12).await?;
    let sets = vec![
        Conditions::new(),
        Conditions::new().eq("status", "published"),
        Conditions::new().eq("status", "draft").gt("score", 50),
        Conditions::new().is_in("id", [1, 2, 3, 99]),
        Conditions::new().is_in("id", Vec::<i64>::new()),
        Conditions::new().like("title", "post 1%"),
        Conditions::new().is_null("score"),
        Conditions::new().raw("score BETWEEN ? AND ?", vec![Value::Int(20), Value::Int(60)]),
        Conditions::from(Record::new().with("status", "published").with("score", 40)),
    ];

    for conditions in &sets {
        let count = posts.count(conditions).await?;
        let rows = posts.fetch_all(conditions).await?;
        assert_eq!(count as usize, rows.len(), "conditions: {:?}", conditions);
    }

    assert_eq!(posts.count(&sets[1]).await?, 6);
    assert_eq!(posts.count(&sets[3]).await?, 3);
    assert_eq!(posts.count(&sets[7]).await?, 5);

    Ok(())
}

#[tokio::test]
async fn test_paginate_second_page_descending() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup(25).await?;

    let page = posts.paginate(&Conditions::new(), &Sort::parse("id DESC")?, 10, 2).await?;

    assert_eq!(ids(&page.data), (6..=15).rev().collect::<Vec<_>>());
    assert_eq!(page.pagination.total_pages, 3);
    assert_eq!(page.pagination.total_records, 25);
    assert_eq!(page.pagination.current_page, 2);
    assert_eq!(page.pagination.per_page, 10);

    let last = posts.paginate(&Conditions::new(), &Sort::desc("id"), 10, 3).await?;
    assert_eq!(ids(&last.data), (1..=5).rev().collect::<Vec<_>>());

    let beyond = posts.paginate(&Conditions::new(), &Sort::desc("id"), 10, 4).await?;
    assert!(beyond.data.is_empty());

    assert!(matches!(
        posts.paginate(&Conditions::new(), &Sort::none(), 0, 1).await,
        Err(Error::InvalidArgument(_))
    ));

    Ok(())
}

#[tokio::test]
async fn test_paginate_far_page_is_rejected_not_overflowed() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup(1).await?;

    for (per_page, current_page) in [(10, u64::MAX / 2), (u64::MAX, 3), (1, u64::MAX)] {
        assert!(matches!(
            posts.paginate(&Conditions::new(), &Sort::none(), per_page, current_page).await,
            Err(Error::InvalidArgument(_))
        ));
    }
    assert!(posts.lenient().paginate(&Conditions::new(), &Sort::none(), 10, u64::MAX / 2).await.is_none());

    Ok(())
}

#[tokio::test]
async fn test_total_pages_uses_conditions() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup(25).await?;

    assert_eq!(posts.total_pages(10, &Conditions::new()).await?, 3);
    assert_eq!(posts.total_pages(5, &Conditions::new().eq("status", "published")).await?, 3);
    assert_eq!(posts.total_pages(10, &Conditions::new().eq("status", "none")).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_find_all_sorts_limits_and_offsets() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup(10).await?;

    let rows = posts.find_all(&Conditions::new().eq("status", "draft"), &Sort::desc("score"), Some(2), Some(1)).await?;
    assert_eq!(ids(&rows), vec![7, 5]);

    let rest = posts.find_all(&Conditions::new(), &Sort::asc("id"), None, Some(8)).await?;
    assert_eq!(ids(&rest), vec![9, 10]);

    Ok(())
}

#[tokio::test]
async fn test_sort_outside_allow_list_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup(3).await?;

    let err = posts.find_all(&Conditions::new(), &Sort::asc("status"), None, None).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    Ok(())
}

#[tokio::test]
async fn test_fetch_one_and_fetch_raw() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup(6).await?;

    let first_published = posts.fetch_one(&Conditions::new().eq("status", "published")).await?;
    assert_eq!(first_published.and_then(|r| r.get("id").and_then(Value::as_i64)), Some(2));
    assert!(posts.fetch_one(&Conditions::new().eq("status", "missing")).await?.is_none());

    let raw = posts
        .fetch_raw("SELECT MAX(score) AS top FROM posts WHERE status = ?", vec![Value::from("draft")])
        .await?
        .expect("aggregate always returns a row");
    assert_eq!(raw.get("top"), Some(&Value::Int(50)));

    let hostile = "x' OR '1'='1";
    assert!(posts.fetch_raw("SELECT * FROM posts WHERE title = ?", vec![Value::from(hostile)]).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_search_matches_keyword_anywhere() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup(12).await?;

    let rows = posts.search("title", "1", &Sort::asc("id"), None).await?;
    assert_eq!(ids(&rows), vec![1, 10, 11, 12]);

    let limited = posts.search("title", "post", &Sort::desc("id"), Some(2)).await?;
    assert_eq!(ids(&limited), vec![12, 11]);

    assert!(matches!(
        posts.search("title OR 1=1", "x", &Sort::none(), None).await,
        Err(Error::InvalidCondition(_))
    ));

    Ok(())
}

#[tokio::test]
async fn test_injected_condition_keys_never_execute() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup(3).await?;
    let hostile = Conditions::new().eq("id; DROP TABLE posts", 1);

    assert!(matches!(posts.fetch_all(&hostile).await, Err(Error::InvalidCondition(_))));
    assert!(matches!(posts.fetch_one(&hostile).await, Err(Error::InvalidCondition(_))));
    assert!(matches!(posts.count(&hostile).await, Err(Error::InvalidCondition(_))));
    assert!(matches!(posts.total_pages(10, &hostile).await, Err(Error::InvalidCondition(_))));
    assert!(matches!(
        posts.find_all(&hostile, &Sort::none(), None, None).await,
        Err(Error::InvalidCondition(_))
    ));
    assert!(matches!(
        posts.paginate(&hostile, &Sort::none(), 10, 1).await,
        Err(Error::InvalidCondition(_))
    ));
    assert!(matches!(posts.delete_where(&hostile).await, Err(Error::InvalidCondition(_))));
    assert!(matches!(
        posts.find_all(&Conditions::new(), &Sort::asc("id; DROP TABLE posts"), None, None).await,
        Err(Error::InvalidCondition(_))
    ));

    // the table is still there
    assert_eq!(posts.count(&Conditions::new()).await?, 3);

    Ok(())
}

#[tokio::test]
async fn test_lenient_reads_flatten_errors() -> Result<(), Box<dyn std::error::Error>> {
    let posts = setup(2).await?;
    let lenient = posts.lenient();
    let hostile = Conditions::new().eq("a b", 1);

    assert!(lenient.find_by_id(1).await.is_some());
    assert!(lenient.find_by_id(7).await.is_none());
    assert!(lenient.fetch_all(&hostile).await.is_empty());
    assert_eq!(lenient.count(&hostile).await, 0);
    assert_eq!(lenient.count(&Conditions::new()).await, 2);
    assert!(lenient.paginate(&Conditions::new(), &Sort::none(), 0, 1).await.is_none());

    assert_eq!(lenient.find_all(&Conditions::new(), &Sort::desc("id"), Some(1), None).await.len(), 1);
    assert!(lenient.find_all(&Conditions::new(), &Sort::asc("status"), None, None).await.is_empty());
    assert_eq!(lenient.search("title", "post", &Sort::none(), None).await.len(), 2);
    assert!(lenient.search("title; --", "post", &Sort::none(), None).await.is_empty());
    assert_eq!(lenient.total_pages(1, &Conditions::new()).await, 2);
    assert_eq!(lenient.total_pages(0, &Conditions::new()).await, 0);

    Ok(())
}
