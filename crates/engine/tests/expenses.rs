use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Category, Engine, EngineError, ExpenseStore, Money, NewExpense};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn lunch() -> NewExpense {
    NewExpense {
        date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        category: Category::Food,
        amount: "12.50".to_string(),
        description: "Lunch".to_string(),
    }
}

#[tokio::test]
async fn build_without_database_fails() {
    let err = Engine::builder().build().await.unwrap_err();
    assert_eq!(err, EngineError::MissingDatabase);
}

#[tokio::test]
async fn fresh_store_is_empty() {
    let (engine, _db) = engine_with_db().await;
    assert!(engine.list_expenses().await.unwrap().is_empty());
}

#[tokio::test]
async fn insert_list_delete_roundtrip() {
    let (engine, _db) = engine_with_db().await;

    let id = engine.add_expense(lunch()).await.unwrap();

    let expenses = engine.list_expenses().await.unwrap();
    assert_eq!(expenses.len(), 1);
    let stored = &expenses[0];
    assert_eq!(stored.id, id);
    assert_eq!(stored.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    assert_eq!(stored.category, Category::Food);
    assert_eq!(stored.amount, Money::new(1250));
    assert_eq!(stored.description, "Lunch");

    engine.delete_expense(id).await.unwrap();
    let expenses = engine.list_expenses().await.unwrap();
    assert!(expenses.iter().all(|e| e.id != id));
}

#[tokio::test]
async fn ids_are_unique_and_listed_in_insertion_order() {
    let (engine, _db) = engine_with_db().await;

    let first = engine.add_expense(lunch()).await.unwrap();
    let second = engine
        .add_expense(NewExpense {
            category: Category::Entertainment,
            amount: "9".to_string(),
            description: "Cinema".to_string(),
            ..lunch()
        })
        .await
        .unwrap();
    assert_ne!(first, second);

    let ids: Vec<i64> = engine
        .list_expenses()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![first, second]);
}

#[tokio::test]
async fn deleted_ids_are_not_reused() {
    let (engine, _db) = engine_with_db().await;

    let first = engine.add_expense(lunch()).await.unwrap();
    engine.delete_expense(first).await.unwrap();
    let second = engine.add_expense(lunch()).await.unwrap();
    assert!(second > first);
}

#[tokio::test]
async fn insert_rejects_non_numeric_amount() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .add_expense(NewExpense {
            amount: "twelve".to_string(),
            ..lunch()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert!(engine.list_expenses().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_missing_id_fails() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.delete_expense(42).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("expense 42".to_string()));
}

#[tokio::test]
async fn unknown_category_in_table_surfaces_as_error() {
    let (engine, db) = engine_with_db().await;
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO expenses (date, category, amount_minor, description) VALUES (?, ?, ?, ?)",
        vec![
            "2024-01-05".into(),
            "Rent".into(),
            100_000i64.into(),
            "January".into(),
        ],
    ))
    .await
    .unwrap();

    let err = engine.list_expenses().await.unwrap_err();
    assert_eq!(err, EngineError::InvalidCategory("Rent".to_string()));
}
