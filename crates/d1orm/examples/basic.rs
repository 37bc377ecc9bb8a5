//! Basic usage example for d1orm
//!
//! Run with: cargo run --example basic -p d1orm
//!
//! Set the D1 credentials in a .env file or the environment:
//! CLOUDFLARE_ACCOUNT_ID=...
//! CLOUDFLARE_DATABASE_ID=...
//! CLOUDFLARE_API_KEY=...

use d1orm::{D1Client, D1Config, Ddl, OrmError, QueryOutcome, TracingSqlHook, table};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct User {
    id: i64,
    name: String,
    age: i64,
}

#[tokio::main]
async fn main() -> Result<(), OrmError> {
    dotenvy::dotenv().ok();

    let client = D1Client::new(D1Config::from_env()?)?.with_hook(TracingSqlHook::new());

    // Setup
    client
        .query("CREATE TABLE IF NOT EXISTS example_users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INTEGER NOT NULL)")
        .await?;
    table("example_users").delete().get(&client).await?;

    // ============================================
    // Insert
    // ============================================
    println!("=== Insert ===");
    for (name, age) in [("alice", 34), ("bob", 17), ("carol", 52)] {
        let outcome = table("example_users")
            .insert([("name", d1orm::Value::from(name)), ("age", age.into())], &client)
            .await?;
        println!("inserted {name}: {:?}", outcome.meta());
    }

    // ============================================
    // Select
    // ============================================
    println!("\n=== Adults ===");
    let adults: Vec<User> = table("example_users")
        .and_where("age", ">=", 18)
        .order_by("name", "ASC")
        .fetch_all(&client)
        .await?;
    for user in &adults {
        println!("  {user:?}");
    }

    println!("\n=== First by age ===");
    let youngest = table("example_users")
        .select(&["id", "name", "age"])
        .order_by_asc("age")
        .first(&client)
        .await?;
    println!("  {youngest:?}");

    // ============================================
    // Update / delete
    // ============================================
    println!("\n=== Update ===");
    table("example_users")
        .update([("age", 18)])
        .and_where("name", "=", "bob")
        .get(&client)
        .await?;

    println!("\n=== Delete ===");
    table("example_users")
        .delete()
        .where_in("name", ["alice", "carol"])
        .get(&client)
        .await?;

    match table("example_users").get(&client).await? {
        QueryOutcome::Rows(rows) => println!("{} row(s) left", rows.len()),
        QueryOutcome::Done(_) => println!("table is empty"),
    }

    // Cleanup
    Ddl::drop_table("example_users").execute(&client).await?;
    Ok(())
}
