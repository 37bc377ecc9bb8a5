//! SQL rendering tests for the query builder.

use crate::qb::table;
use serde::Serialize;
use serde_json::json;

#[test]
fn test_select_basic() {
    let qb = table("users");
    assert_eq!(qb.to_sql(), "SELECT * FROM users");
    assert!(qb.to_statement().unwrap().params.is_empty());
}

#[test]
fn test_select_columns() {
    let qb = table("users").select(&["id", "name"]);
    assert_eq!(qb.to_sql(), "SELECT id, name FROM users");

    let single = table("users").select(&["email"]);
    assert_eq!(single.to_sql(), "SELECT email FROM users");

    let back_to_star = table("users").select(&["id"]).select_all();
    assert_eq!(back_to_star.to_sql(), "SELECT * FROM users");
}

#[test]
fn test_where_binds_value() {
    let stmt = table("users").and_where("age", ">", 18).to_statement().unwrap();
    assert_eq!(stmt.sql, "SELECT * FROM users WHERE age > ?");
    assert_eq!(stmt.params, vec![json!(18)]);
}

#[test]
fn test_or_where_after_where() {
    let stmt = table("users")
        .and_where("age", ">", 18)
        .or_where("age", "<", 5)
        .to_statement()
        .unwrap();
    assert_eq!(stmt.sql, "SELECT * FROM users WHERE age > ? OR age < ?");
    assert_eq!(stmt.params, vec![json!(18), json!(5)]);
}

#[test]
fn test_first_or_where_acts_as_where() {
    let a = table("users").or_where("name", "=", "x").to_sql();
    let b = table("users").and_where("name", "=", "x").to_sql();
    assert_eq!(a, b);
    assert_eq!(a, "SELECT * FROM users WHERE name = ?");
}

#[test]
fn test_chained_where_uses_and() {
    let sql = table("users")
        .and_where("status", "=", "active")
        .and_where("age", ">=", 21)
        .to_sql();
    assert_eq!(sql, "SELECT * FROM users WHERE status = ? AND age >= ?");
}

#[test]
fn test_where_in() {
    let stmt = table("users")
        .where_in("id", vec![1, 2, 3])
        .to_statement()
        .unwrap();
    assert_eq!(stmt.sql, "SELECT * FROM users WHERE id IN (?, ?, ?)");
    assert_eq!(stmt.params, vec![json!(1), json!(2), json!(3)]);
}

#[test]
fn test_where_in_after_where_uses_and() {
    let sql = table("users")
        .and_where("active", "=", true)
        .where_in("role", ["admin", "owner"])
        .to_sql();
    assert_eq!(sql, "SELECT * FROM users WHERE active = ? AND role IN (?, ?)");
}

#[test]
fn test_where_in_empty_matches_nothing() {
    let stmt = table("users")
        .where_in("id", Vec::<i64>::new())
        .to_statement()
        .unwrap();
    assert_eq!(stmt.sql, "SELECT * FROM users WHERE 1=0");
    assert!(stmt.params.is_empty());
}

#[test]
fn test_value_is_never_interpolated() {
    let stmt = table("users")
        .and_where("name", "=", "x' OR '1'='1")
        .to_statement()
        .unwrap();
    assert_eq!(stmt.sql, "SELECT * FROM users WHERE name = ?");
    assert_eq!(stmt.params, vec![json!("x' OR '1'='1")]);
}

#[test]
fn test_limit_normalization() {
    assert_eq!(table("users").limit(-5).to_sql(), "SELECT * FROM users LIMIT 1000");
    assert_eq!(table("users").limit(0).to_sql(), "SELECT * FROM users LIMIT 1000");
    assert_eq!(table("users").limit(25).to_sql(), "SELECT * FROM users LIMIT 25");
}

#[test]
fn test_offset_normalization() {
    assert_eq!(table("users").offset(-1).to_sql(), "SELECT * FROM users OFFSET 0");
    assert_eq!(table("users").offset(40).to_sql(), "SELECT * FROM users OFFSET 40");
}

#[test]
fn test_order_by_direction() {
    assert_eq!(
        table("users").order_by("name", "sideways").to_sql(),
        "SELECT * FROM users ORDER BY name ASC"
    );
    assert_eq!(
        table("users").order_by("name", "DESC").to_sql(),
        "SELECT * FROM users ORDER BY name DESC"
    );
    assert_eq!(
        table("users").order_by("name", "desc").to_sql(),
        "SELECT * FROM users ORDER BY name ASC"
    );
    assert_eq!(
        table("users").order_by_desc("created_at").to_sql(),
        "SELECT * FROM users ORDER BY created_at DESC"
    );
}

#[test]
fn test_clauses_render_in_call_order() {
    let sql = table("orders")
        .select(&["user_id", "COUNT(*) AS n"])
        .and_where("status", "=", "paid")
        .group_by("user_id")
        .order_by("n", "DESC")
        .limit(10)
        .offset(20)
        .to_sql();
    assert_eq!(
        sql,
        "SELECT user_id, COUNT(*) AS n FROM orders WHERE status = ? GROUP BY user_id ORDER BY n DESC LIMIT 10 OFFSET 20"
    );
}

#[test]
fn test_join() {
    let sql = table("users")
        .select(&["users.name", "orders.total"])
        .join("orders", "orders.user_id", "=", "users.id")
        .and_where("orders.total", ">", 100)
        .to_sql();
    assert_eq!(
        sql,
        "SELECT users.name, orders.total FROM users JOIN orders ON orders.user_id = users.id WHERE orders.total > ?"
    );
}

#[test]
fn test_join_rejects_unknown_operator() {
    let err = table("users")
        .join("orders", "orders.user_id", "= 1; --", "users.id")
        .to_statement()
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_union_carries_params() {
    let archived = table("archived_users").select(&["id"]).and_where("year", "<", 2020);
    let stmt = table("users")
        .select(&["id"])
        .and_where("active", "=", true)
        .union(&archived)
        .to_statement()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT id FROM users WHERE active = ? UNION (SELECT id FROM archived_users WHERE year < ?)"
    );
    assert_eq!(stmt.params, vec![json!(true), json!(2020)]);
}

#[test]
fn test_union_subquery_where_does_not_count() {
    let sub = table("b").and_where("x", "=", 1);
    let sql = table("a").union(&sub).and_where("y", "=", 2).to_sql();
    assert_eq!(sql, "SELECT * FROM a UNION (SELECT * FROM b WHERE x = ?) WHERE y = ?");
}

#[test]
fn test_union_raw() {
    let sql = table("a").union_raw("SELECT * FROM b").to_sql();
    assert_eq!(sql, "SELECT * FROM a UNION (SELECT * FROM b)");
}

#[test]
fn test_raw_fragment() {
    let sql = table("users").raw("WHERE deleted_at IS NULL").and_where("age", ">", 1).to_sql();
    assert_eq!(sql, "SELECT * FROM users WHERE deleted_at IS NULL AND age > ?");

    let sql = table("users").raw("INDEXED BY idx_age").and_where("age", ">", 1).to_sql();
    assert_eq!(sql, "SELECT * FROM users INDEXED BY idx_age WHERE age > ?");
}

#[test]
fn test_update() {
    let stmt = table("users")
        .update([("name", json!("Bob")), ("age", json!(30))])
        .and_where("id", "=", 7)
        .to_statement()
        .unwrap();
    assert_eq!(stmt.sql, "UPDATE users SET name = ?, age = ? WHERE id = ?");
    assert_eq!(stmt.params, vec![json!("Bob"), json!(30), json!(7)]);
}

#[test]
fn test_update_discards_previous_clauses() {
    let sql = table("users")
        .and_where("stale", "=", 1)
        .order_by("id", "ASC")
        .update([("status", "inactive")])
        .and_where("id", "=", 1)
        .to_sql();
    assert_eq!(sql, "UPDATE users SET status = ? WHERE id = ?");
}

#[test]
fn test_update_json() {
    #[derive(Serialize)]
    struct Patch {
        status: &'static str,
        reason: &'static str,
    }
    let stmt = table("users")
        .update_json(&Patch { status: "inactive", reason: "spam" })
        .and_where("id", "=", 1)
        .to_statement()
        .unwrap();
    // struct field order is kept
    assert_eq!(stmt.sql, "UPDATE users SET status = ?, reason = ? WHERE id = ?");
    assert_eq!(stmt.params, vec![json!("inactive"), json!("spam"), json!(1)]);
}

#[test]
fn test_update_rejects_non_mapping() {
    let err = table("users").update_json(&"not a map").to_statement().unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("a string"));

    let empty: Vec<(&str, i64)> = Vec::new();
    assert!(table("users").update(empty).to_statement().unwrap_err().is_validation());
}

#[test]
fn test_select_after_update_is_noop() {
    let sql = table("users").update([("a", 1)]).select(&["id"]).to_sql();
    assert_eq!(sql, "UPDATE users SET a = ?");
}

#[test]
fn test_delete() {
    let sql = table("users").delete().and_where("id", "=", 9).to_sql();
    assert_eq!(sql, "DELETE FROM users WHERE id = ?");

    let sql = table("users").and_where("x", "=", 1).delete().to_sql();
    assert_eq!(sql, "DELETE FROM users");
}

#[test]
fn test_insert_statement() {
    let stmt = table("users").insert_statement([("name", "Alice")]).unwrap();
    assert_eq!(stmt.sql, "INSERT INTO users (name) VALUES (?)");
    assert_eq!(stmt.params, vec![json!("Alice")]);

    let stmt = table("users")
        .insert_statement([("name", json!("Bob")), ("age", json!(41))])
        .unwrap();
    assert_eq!(stmt.sql, "INSERT INTO users (name, age) VALUES (?, ?)");
}

#[test]
fn test_insert_ignores_chained_clauses() {
    let stmt = table("users")
        .and_where("id", "=", 1)
        .insert_statement([("name", "Alice")])
        .unwrap();
    assert_eq!(stmt.sql, "INSERT INTO users (name) VALUES (?)");
}

#[test]
fn test_insert_rejects_bad_column() {
    let err = table("users")
        .insert_statement([("name) VALUES ('x'); --", "Alice")])
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_first_statement() {
    let qb = table("users").and_where("age", ">", 18);
    assert_eq!(
        qb.first_statement().unwrap().sql,
        "SELECT * FROM users WHERE age > ? LIMIT 1"
    );
    // the builder itself is untouched
    assert_eq!(qb.to_sql(), "SELECT * FROM users WHERE age > ?");

    let paged = table("users").limit(50).offset(100);
    assert_eq!(
        paged.first_statement().unwrap().sql,
        "SELECT * FROM users LIMIT 1 OFFSET 100"
    );

    let skipped = table("users").order_by("id", "ASC").offset(5);
    assert_eq!(
        skipped.first_statement().unwrap().sql,
        "SELECT * FROM users ORDER BY id ASC LIMIT 1 OFFSET 5"
    );
}

#[test]
fn test_validation_errors_are_deferred() {
    let qb = table("users")
        .and_where("age; DROP TABLE users", "=", 1)
        .and_where("age", "UNION SELECT", 2);
    let err = qb.to_statement().unwrap_err();
    assert!(err.is_validation());
    // the first recorded problem wins
    assert!(err.to_string().contains("column"));

    assert!(table("bad table").to_statement().unwrap_err().is_validation());
}

#[test]
fn test_builders_are_independent() {
    let base = table("users").and_where("active", "=", true);
    let admins = base.clone().and_where("role", "=", "admin");
    let guests = base.clone().and_where("role", "=", "guest");

    assert_eq!(base.to_sql(), "SELECT * FROM users WHERE active = ?");
    assert_eq!(admins.to_sql(), "SELECT * FROM users WHERE active = ? AND role = ?");
    assert_eq!(guests.to_statement().unwrap().params, vec![json!(true), json!("guest")]);
}
