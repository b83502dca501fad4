//! The module contains the `Expense` type, one persisted entry of the tracker.
use core::fmt;

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;

use crate::{Category, EngineError, Money};

/// A stored expense. Immutable once created: only insert and delete exist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub category: Category,
    pub amount: Money,
    pub description: String,
}

/// Input of an insert. `amount` is the raw text typed by the user; the engine
/// parses it when persisting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub category: Category,
    pub amount: String,
    pub description: String,
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} {} {}",
            self.id, self.date, self.category, self.amount, self.description
        )
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            date: model.date,
            category: Category::try_from(model.category.as_str())?,
            amount: Money::new(model.amount_minor),
            description: model.description,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: Date,
    pub category: String,
    pub amount_minor: i64,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn for_insert(expense: &NewExpense, amount: Money) -> Self {
        Self {
            id: ActiveValue::NotSet,
            date: ActiveValue::Set(expense.date),
            category: ActiveValue::Set(expense.category.label().to_string()),
            amount_minor: ActiveValue::Set(amount.cents()),
            description: ActiveValue::Set(expense.description.clone()),
        }
    }
}
