//! Form controller: turns user actions into store calls and keeps the table
//! in sync with the store.
//!
//! Every action runs to completion (store call, then reload) before the next
//! one is accepted. Failures are returned as [`FormError`] and never leave the
//! controller half-updated.
use chrono::{Days, NaiveDate};
use engine::{Category, EngineError, Expense, ExpenseStore, NewExpense};
use thiserror::Error;

pub const EMPTY_FIELDS: &str = "Amount and Description cannot be empty";
pub const NO_SELECTION: &str = "You Need To Choose a Row to Delete";
pub const ADD_FAILED: &str = "Could not Add Expense";
pub const DELETE_FAILED: &str = "Could not Delete Expense";
pub const CONFIRM_DELETE: &str = "Are you sure you want to Delete this Expense?";

#[derive(Debug, Error)]
pub enum FormError {
    /// Rejected locally, the store was not called.
    #[error("Input Error: {0}")]
    Input(&'static str),
    /// The store refused the mutation.
    #[error("Error: {0}")]
    Operation(&'static str),
    /// The store could not be listed; the session cannot continue.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] EngineError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Category,
    Amount,
    Description,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Category => "Category",
            Self::Amount => "Amount",
            Self::Description => "Description",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Date => Self::Category,
            Self::Category => Self::Amount,
            Self::Amount => Self::Description,
            Self::Description => Self::Date,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Date => Self::Description,
            Self::Category => Self::Date,
            Self::Amount => Self::Category,
            Self::Description => Self::Amount,
        }
    }
}

/// Values currently typed in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub date: NaiveDate,
    pub category: Category,
    pub amount: String,
    pub description: String,
    pub focus: Field,
}

impl FormInput {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today,
            category: Category::default(),
            amount: String::new(),
            description: String::new(),
            focus: Field::Date,
        }
    }

    /// Reset every value; focus stays where it is.
    fn clear(&mut self, today: NaiveDate) {
        self.date = today;
        self.category = Category::default();
        self.amount.clear();
        self.description.clear();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Amount => Some(&mut self.amount),
            Field::Description => Some(&mut self.description),
            Field::Date | Field::Category => None,
        }
    }

    /// Append to the focused text field. Ignored on date and category.
    pub fn push_char(&mut self, ch: char) {
        if let Some(text) = self.text_mut() {
            text.push(ch);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    /// Move the date by `days`, saturating at the calendar bounds.
    pub fn step_date(&mut self, days: i64) {
        let delta = Days::new(days.unsigned_abs());
        let stepped = if days >= 0 {
            self.date.checked_add_days(delta)
        } else {
            self.date.checked_sub_days(delta)
        };
        if let Some(date) = stepped {
            self.date = date;
        }
    }

    pub fn cycle_category(&mut self, forward: bool) {
        self.category = if forward {
            self.category.next()
        } else {
            self.category.prev()
        };
    }

    fn is_complete(&self) -> bool {
        !self.amount.is_empty() && !self.description.is_empty()
    }
}

pub struct Controller<S> {
    store: S,
    clock: fn() -> NaiveDate,
    pub form: FormInput,
    pub expenses: Vec<Expense>,
    pub selected: Option<usize>,
    pub pending_delete: Option<i64>,
}

impl<S: ExpenseStore> Controller<S> {
    pub fn new(store: S, clock: fn() -> NaiveDate) -> Self {
        Self {
            store,
            clock,
            form: FormInput::new(clock()),
            expenses: Vec::new(),
            selected: None,
            pending_delete: None,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Replace the table with the store's current contents.
    pub async fn reload(&mut self) -> Result<(), FormError> {
        let expenses = self
            .store
            .list_expenses()
            .await
            .map_err(FormError::Unavailable)?;
        tracing::debug!(count = expenses.len(), "expenses reloaded");
        self.expenses = expenses;
        self.selected = None;
        Ok(())
    }

    /// Submit the form. Inputs are cleared only when the store accepted it.
    pub async fn add_expense(&mut self) -> Result<i64, FormError> {
        if !self.form.is_complete() {
            return Err(FormError::Input(EMPTY_FIELDS));
        }

        let expense = NewExpense {
            date: self.form.date,
            category: self.form.category,
            amount: self.form.amount.clone(),
            description: self.form.description.clone(),
        };

        let id = match self.store.add_expense(expense).await {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(error = %err, "could not add expense");
                return Err(FormError::Operation(ADD_FAILED));
            }
        };

        self.reload().await?;
        let today = self.today();
        self.form.clear(today);
        Ok(id)
    }

    pub fn selected_expense(&self) -> Option<&Expense> {
        self.selected.and_then(|idx| self.expenses.get(idx))
    }

    pub fn select_next(&mut self) {
        if self.expenses.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(idx) => (idx + 1).min(self.expenses.len() - 1),
            None => 0,
        });
    }

    pub fn select_prev(&mut self) {
        if self.expenses.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(idx) => idx.saturating_sub(1),
            None => self.expenses.len() - 1,
        });
    }

    /// First half of a delete: remember the selected id until the user answers
    /// the confirmation.
    pub fn request_delete(&mut self) -> Result<i64, FormError> {
        let id = self
            .selected_expense()
            .map(|expense| expense.id)
            .ok_or(FormError::Input(NO_SELECTION))?;
        self.pending_delete = Some(id);
        Ok(id)
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Second half of a delete. Returns the removed id, or `None` when nothing
    /// was awaiting confirmation.
    pub async fn confirm_delete(&mut self) -> Result<Option<i64>, FormError> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(None);
        };

        if let Err(err) = self.store.delete_expense(id).await {
            tracing::warn!(id, error = %err, "could not delete expense");
            return Err(FormError::Operation(DELETE_FAILED));
        }

        self.reload().await?;
        Ok(Some(id))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use engine::{Money, ResultEngine};

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    }

    #[derive(Default)]
    struct MemoryStore {
        rows: RefCell<Vec<Expense>>,
        next_id: Cell<i64>,
        inserts: Cell<usize>,
        deletes: Cell<usize>,
        fail_insert: bool,
        fail_delete: bool,
    }

    impl ExpenseStore for MemoryStore {
        async fn list_expenses(&self) -> ResultEngine<Vec<Expense>> {
            Ok(self.rows.borrow().clone())
        }

        async fn add_expense(&self, expense: NewExpense) -> ResultEngine<i64> {
            self.inserts.set(self.inserts.get() + 1);
            if self.fail_insert {
                return Err(EngineError::InvalidAmount("rejected".to_string()));
            }
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            self.rows.borrow_mut().push(Expense {
                id,
                date: expense.date,
                category: expense.category,
                amount: expense.amount.parse::<Money>()?,
                description: expense.description,
            });
            Ok(id)
        }

        async fn delete_expense(&self, id: i64) -> ResultEngine<()> {
            self.deletes.set(self.deletes.get() + 1);
            if self.fail_delete {
                return Err(EngineError::KeyNotFound(id.to_string()));
            }
            let mut rows = self.rows.borrow_mut();
            let before = rows.len();
            rows.retain(|e| e.id != id);
            if rows.len() == before {
                return Err(EngineError::KeyNotFound(id.to_string()));
            }
            Ok(())
        }
    }

    fn fill(controller: &mut Controller<MemoryStore>, amount: &str, description: &str) {
        controller.form.amount = amount.to_string();
        controller.form.description = description.to_string();
    }

    #[tokio::test]
    async fn add_inserts_reloads_and_clears() {
        let mut controller = Controller::new(MemoryStore::default(), today);
        controller.form.category = Category::Shopping;
        controller.form.step_date(-3);
        fill(&mut controller, "12.50", "Lunch");

        let id = controller.add_expense().await.unwrap();

        assert_eq!(controller.expenses.len(), 1);
        let stored = &controller.expenses[0];
        assert_eq!(stored.id, id);
        assert_eq!(stored.amount, Money::new(1250));
        assert_eq!(stored.category, Category::Shopping);
        assert_eq!(stored.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(controller.form, FormInput::new(today()));
    }

    #[tokio::test]
    async fn add_with_empty_fields_never_reaches_the_store() {
        let mut controller = Controller::new(MemoryStore::default(), today);

        fill(&mut controller, "", "Lunch");
        let err = controller.add_expense().await.unwrap_err();
        assert!(matches!(err, FormError::Input(EMPTY_FIELDS)));

        fill(&mut controller, "12.50", "");
        let err = controller.add_expense().await.unwrap_err();
        assert!(matches!(err, FormError::Input(EMPTY_FIELDS)));

        assert_eq!(controller.store().inserts.get(), 0);
        assert_eq!(controller.form.amount, "12.50");
    }

    #[tokio::test]
    async fn failed_insert_keeps_inputs() {
        let store = MemoryStore {
            fail_insert: true,
            ..MemoryStore::default()
        };
        let mut controller = Controller::new(store, today);
        fill(&mut controller, "12.50", "Lunch");

        let err = controller.add_expense().await.unwrap_err();

        assert!(matches!(err, FormError::Operation(ADD_FAILED)));
        assert_eq!(err.to_string(), "Error: Could not Add Expense");
        assert_eq!(controller.store().inserts.get(), 1);
        assert_eq!(controller.form.amount, "12.50");
        assert_eq!(controller.form.description, "Lunch");
        assert!(controller.expenses.is_empty());
    }

    #[tokio::test]
    async fn delete_without_selection_is_rejected() {
        let mut controller = Controller::new(MemoryStore::default(), today);
        fill(&mut controller, "3", "Coffee");
        controller.add_expense().await.unwrap();

        let err = controller.request_delete().unwrap_err();
        assert!(matches!(err, FormError::Input(NO_SELECTION)));
        assert_eq!(controller.pending_delete, None);
        assert_eq!(controller.confirm_delete().await.unwrap(), None);
        assert_eq!(controller.store().deletes.get(), 0);
    }

    #[tokio::test]
    async fn confirmed_delete_removes_the_row() {
        let mut controller = Controller::new(MemoryStore::default(), today);
        fill(&mut controller, "3", "Coffee");
        let coffee = controller.add_expense().await.unwrap();
        fill(&mut controller, "12.50", "Lunch");
        let lunch = controller.add_expense().await.unwrap();

        controller.select_next();
        assert_eq!(controller.request_delete().unwrap(), coffee);
        assert_eq!(controller.confirm_delete().await.unwrap(), Some(coffee));

        let ids: Vec<i64> = controller.expenses.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![lunch]);
        assert_eq!(controller.selected, None);
        assert_eq!(controller.pending_delete, None);
    }

    #[tokio::test]
    async fn declined_delete_does_not_call_the_store() {
        let mut controller = Controller::new(MemoryStore::default(), today);
        fill(&mut controller, "3", "Coffee");
        controller.add_expense().await.unwrap();

        controller.select_prev();
        controller.request_delete().unwrap();
        controller.cancel_delete();

        assert_eq!(controller.confirm_delete().await.unwrap(), None);
        assert_eq!(controller.store().deletes.get(), 0);
        assert_eq!(controller.expenses.len(), 1);
    }

    #[tokio::test]
    async fn failed_delete_skips_reload() {
        let store = MemoryStore {
            fail_delete: true,
            ..MemoryStore::default()
        };
        let mut controller = Controller::new(store, today);
        fill(&mut controller, "3", "Coffee");
        controller.add_expense().await.unwrap();

        controller.select_next();
        controller.request_delete().unwrap();
        let err = controller.confirm_delete().await.unwrap_err();

        assert!(matches!(err, FormError::Operation(DELETE_FAILED)));
        assert_eq!(controller.selected, Some(0));
        assert_eq!(controller.expenses.len(), 1);
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut controller = Controller::new(MemoryStore::default(), today);
        controller.select_next();
        assert_eq!(controller.selected, None);

        controller.expenses = (1..=2)
            .map(|id| Expense {
                id,
                date: today(),
                category: Category::Other,
                amount: Money::new(100),
                description: "x".to_string(),
            })
            .collect();

        controller.select_prev();
        assert_eq!(controller.selected, Some(1));
        controller.select_next();
        assert_eq!(controller.selected, Some(1));
        controller.select_prev();
        controller.select_prev();
        assert_eq!(controller.selected, Some(0));
    }

    #[test]
    fn form_edits_only_text_fields() {
        let mut form = FormInput::new(today());
        form.push_char('9');
        assert_eq!(form.amount, "");

        form.focus_next();
        form.focus_next();
        assert_eq!(form.focus, Field::Amount);
        form.push_char('9');
        form.push_char('5');
        form.pop_char();
        assert_eq!(form.amount, "9");

        form.focus_prev();
        form.cycle_category(false);
        assert_eq!(form.category, Category::Other);

        form.step_date(7);
        assert_eq!(form.date, NaiveDate::from_ymd_opt(2024, 1, 12).unwrap());
    }
}
