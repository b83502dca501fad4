pub use category::Category;
pub use error::EngineError;
pub use expenses::{Expense, NewExpense};
pub use money::Money;
use sea_orm::{QueryOrder, prelude::*};

mod category;
mod error;
mod expenses;
mod money;

pub type ResultEngine<T> = Result<T, EngineError>;

/// Persistence collaborator of the expense form.
///
/// Implemented by [`Engine`] on top of the database; front-ends are generic
/// over it so they can run against any backing store.
#[allow(async_fn_in_trait)]
pub trait ExpenseStore {
    /// Every stored expense, ordered by ascending id.
    async fn list_expenses(&self) -> ResultEngine<Vec<Expense>>;

    /// Persist a new expense and return the id assigned to it.
    async fn add_expense(&self, expense: NewExpense) -> ResultEngine<i64>;

    /// Remove the expense with the given id. Fails when it does not exist.
    async fn delete_expense(&self, id: i64) -> ResultEngine<()>;
}

#[derive(Debug, Clone)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

impl ExpenseStore for Engine {
    async fn list_expenses(&self) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .order_by_asc(expenses::Column::Id)
            .all(&self.database)
            .await?;

        models.into_iter().map(Expense::try_from).collect()
    }

    async fn add_expense(&self, expense: NewExpense) -> ResultEngine<i64> {
        let amount: Money = expense.amount.parse()?;
        let model = expenses::ActiveModel::for_insert(&expense, amount)
            .insert(&self.database)
            .await?;

        tracing::debug!(id = model.id, category = %expense.category, %amount, "expense added");
        Ok(model.id)
    }

    async fn delete_expense(&self, id: i64) -> ResultEngine<()> {
        let result = expenses::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(format!("expense {id}")));
        }

        tracing::debug!(id, "expense deleted");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct EngineBuilder {
    database: Option<DatabaseConnection>,
}

impl EngineBuilder {
    /// Pass the database connection the engine persists to.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = Some(db);
        self
    }

    /// Construct `Engine`, checking that the database answers.
    pub async fn build(self) -> ResultEngine<Engine> {
        let database = self.database.ok_or(EngineError::MissingDatabase)?;
        database.ping().await?;
        Ok(Engine { database })
    }
}
