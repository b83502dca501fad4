use std::{error::Error, io::Write};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal,
};
use engine::{Category, Engine, Expense, ExpenseStore, Money, NewExpense};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "expense_cli")]
#[command(about = "List, add and delete expenses without the terminal UI")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./expenses.db?mode=rwc"
    )]
    database_url: String,

    /// Log level written to stderr.
    #[arg(long, default_value = "warn")]
    level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every expense, oldest first.
    List(ListArgs),
    /// Record a new expense.
    Add(AddArgs),
    /// Remove an expense by id.
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct AddArgs {
    /// Day of the expense (YYYY-MM-DD); today when omitted.
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long, default_value = "Food", value_parser = parse_category)]
    category: Category,
    #[arg(long, default_value = "")]
    amount: String,
    #[arg(long, default_value = "")]
    description: String,
}

#[derive(Args, Debug)]
struct DeleteArgs {
    id: i64,
    /// Skip the confirmation prompt.
    #[arg(long, short)]
    yes: bool,
}

fn parse_category(raw: &str) -> Result<Category, String> {
    Category::try_from(raw).map_err(|_| {
        let known: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        format!("unknown category {raw:?}, expected one of {}", known.join(", "))
    })
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> CliResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Single keypress yes/no question on stderr. Anything but `y` is a no.
fn confirm(question: &str) -> CliResult<bool> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(out, Print(format!("{question} [y/N] ")))?;
    out.flush()?;

    let answer = loop {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event::read()?
        else {
            continue;
        };

        break match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => false,
            KeyCode::Char('y' | 'Y') => true,
            _ => false,
        };
    };

    execute!(out, Print(if answer { "y\r\n" } else { "n\r\n" }))?;
    out.flush()?;
    Ok(answer)
}

fn print_table(expenses: &[Expense]) {
    println!(
        "{:>6}  {:<10}  {:<13}  {:>12}  Description",
        "ID", "Date", "Category", "Amount"
    );
    for expense in expenses {
        println!(
            "{:>6}  {:<10}  {:<13}  {:>12}  {}",
            expense.id,
            expense.date,
            expense.category.label(),
            expense.amount.to_string(),
            expense.description
        );
    }
    let total: Money = expenses.iter().map(|e| e.amount).sum();
    println!("{:>47}", format!("Total: {total}"));
}

async fn connect_db(database_url: &str) -> CliResult<DatabaseConnection> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(format!(
            "expense_cli={level},engine={level}",
            level = cli.level
        ))?)
        .with_writer(std::io::stderr)
        .init();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::List(args) => {
            let expenses = engine.list_expenses().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&expenses)?);
            } else {
                print_table(&expenses);
            }
        }
        Command::Add(args) => {
            if args.amount.is_empty() || args.description.is_empty() {
                eprintln!("Input Error: Amount and Description cannot be empty");
                std::process::exit(2);
            }

            let expense = NewExpense {
                date: args
                    .date
                    .unwrap_or_else(|| chrono::Local::now().date_naive()),
                category: args.category,
                amount: args.amount,
                description: args.description,
            };
            match engine.add_expense(expense).await {
                Ok(id) => println!("added expense #{id}"),
                Err(err) => {
                    tracing::warn!(error = %err, "could not add expense");
                    eprintln!("Error: Could not Add Expense");
                    std::process::exit(1);
                }
            }
        }
        Command::Delete(args) => {
            if !args.yes && !confirm("Are you sure you want to Delete this Expense?")? {
                return Ok(());
            }

            match engine.delete_expense(args.id).await {
                Ok(()) => println!("deleted expense #{}", args.id),
                Err(err) => {
                    tracing::warn!(id = args.id, error = %err, "could not delete expense");
                    eprintln!("Error: Could not Delete Expense");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
