use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use engine::ExpenseStore;

use crate::{
    controller::{Controller, Field, FormError},
    error::{AppError, Result},
    ui::{
        self,
        components::toast::{ToastLevel, ToastState},
        keymap::{AppAction, map_key},
    },
};

pub struct App<S> {
    controller: Controller<S>,
    toast: Option<ToastState>,
    should_quit: bool,
}

impl<S: ExpenseStore> App<S> {
    pub fn new(store: S, clock: fn() -> NaiveDate) -> Self {
        Self {
            controller: Controller::new(store, clock),
            toast: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.controller.reload().await.map_err(fatal)?;

        let mut guard = ui::TerminalGuard::enter()?;
        self.event_loop(&mut guard).await
    }

    async fn event_loop(&mut self, guard: &mut ui::TerminalGuard) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            if self
                .toast
                .as_ref()
                .is_some_and(|toast| toast.expired(Instant::now()))
            {
                self.toast = None;
            }

            guard
                .terminal()
                .draw(|frame| ui::render(frame, &self.controller, self.toast.as_ref()))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key).await?;
                }
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return Ok(());
        }

        if self.controller.pending_delete.is_some() {
            return self.handle_confirm(action).await;
        }

        match action {
            AppAction::Cancel => self.toast = None,
            AppAction::NextField => self.controller.form.focus_next(),
            AppAction::PrevField => self.controller.form.focus_prev(),
            AppAction::Submit => {
                let outcome = self.controller.add_expense().await;
                self.report(outcome.map(|id| format!("Expense #{id} added")))?;
            }
            AppAction::Backspace => self.controller.form.pop_char(),
            AppAction::Delete => {
                let outcome = self.controller.request_delete();
                self.report(outcome.map(|_| String::new()))?;
            }
            AppAction::Up => self.controller.select_prev(),
            AppAction::Down => self.controller.select_next(),
            AppAction::Left => self.step_focused(false),
            AppAction::Right => self.step_focused(true),
            AppAction::Input(ch) => self.handle_input(ch),
            AppAction::Quit | AppAction::None => {}
        }

        Ok(())
    }

    async fn handle_confirm(&mut self, action: AppAction) -> Result<()> {
        match action {
            AppAction::Submit | AppAction::Input('y' | 'Y') => {
                let outcome = self.controller.confirm_delete().await;
                self.report(outcome.map(|id| match id {
                    Some(id) => format!("Expense #{id} deleted"),
                    None => String::new(),
                }))?;
            }
            AppAction::Cancel | AppAction::Input('n' | 'N') => self.controller.cancel_delete(),
            _ => {}
        }
        Ok(())
    }

    fn step_focused(&mut self, forward: bool) {
        let form = &mut self.controller.form;
        match form.focus {
            Field::Date => form.step_date(if forward { 1 } else { -1 }),
            Field::Category => form.cycle_category(forward),
            Field::Amount | Field::Description => {}
        }
    }

    fn handle_input(&mut self, ch: char) {
        let today = self.controller.today();
        let form = &mut self.controller.form;
        match (form.focus, ch) {
            (Field::Date, '+') => form.step_date(7),
            (Field::Date, '-') => form.step_date(-7),
            (Field::Date, 't' | 'T') => form.date = today,
            (Field::Category, ' ') => form.cycle_category(true),
            _ => form.push_char(ch),
        }
    }

    /// Show the outcome of an action. Only an unavailable store ends the
    /// session; every other failure is shown and the form stays usable.
    fn report(&mut self, outcome: std::result::Result<String, FormError>) -> Result<()> {
        self.toast = match outcome {
            Ok(message) if message.is_empty() => None,
            Ok(message) => Some(ToastState::new(message, ToastLevel::Success)),
            Err(err @ FormError::Input(_)) => {
                Some(ToastState::new(err.to_string(), ToastLevel::Warning))
            }
            Err(err @ FormError::Operation(_)) => {
                Some(ToastState::new(err.to_string(), ToastLevel::Error))
            }
            Err(err @ FormError::Unavailable(_)) => return Err(fatal(err)),
        };
        Ok(())
    }
}

fn fatal(err: FormError) -> AppError {
    tracing::error!(error = %err, "expense store unavailable");
    match err {
        FormError::Unavailable(source) => AppError::Engine(source),
        other => AppError::Terminal(other.to_string()),
    }
}
