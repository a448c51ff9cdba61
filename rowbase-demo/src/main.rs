use std::env;

use dotenvy::dotenv;
use rowbase::{Conditions, Database, EditEntry, Record, RecordModel, Sort, TableConfig};

struct Users(RecordModel);

impl Users {
    fn new(db: Database) -> Result<Self, rowbase::Error> {
        let config = TableConfig::new("users").sortable(["id", "username", "age"]);
        Ok(Self(RecordModel::new(db, config)?))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let db = Database::builder().max_connections(1).connect(&url).await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            age INTEGER,
            status TEXT NOT NULL DEFAULT 'active'
        )",
    )
    .execute(db.pool())
    .await?;

    let users = Users::new(db)?;

    for (name, age) in [("ana", 31), ("bruno", 17), ("carla", 45), ("diego", 22)] {
        let id = users.0.create_returning_id(&Record::new().with("username", name).with("age", age)).await?;
        log::info!("created {} with id {}", name, id);
    }

    let adults = users
        .0
        .find_all(&Conditions::new().gte("age", 18), &Sort::desc("age"), None, None)
        .await?;
    println!("adults: {}", serde_json::to_string(&adults)?);

    let page = users.0.paginate(&Conditions::new(), &Sort::asc("username"), 3, 1).await?;
    println!("page 1: {}", serde_json::to_string_pretty(&page)?);

    let batch: Vec<EditEntry> = serde_json::from_str(
        r#"[
            { "id": 1, "fields": { "status": "admin" } },
            { "id": 2 },
            { "id": 99, "fields": { "status": "ghost" } }
        ]"#,
    )?;
    let report = users.0.bulk_edit(batch).await?;
    println!("bulk edit: {}", serde_json::to_string(&report)?);

    if !users.0.lenient().delete(42).await {
        println!("no user 42 to delete");
    }

    println!("{} users left", users.0.count(&Conditions::new()).await?);
    Ok(())
}
