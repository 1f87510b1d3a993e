use std::{error::Error, path::PathBuf};

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use engine::{
    AllocationInput, BudgetInput, BudgetPeriod, Currency, DEFAULT_USER_ID, Engine, GoalStatus,
    LocalStore, Money, NewCategory, NewSavingsGoal, NewTransaction, SavingsGoalUpdate,
    TransactionKind,
};
use uuid::Uuid;

mod render;

#[derive(Parser, Debug)]
#[command(name = "pennywise_offline")]
#[command(about = "Track money on this device without a server")]
struct Cli {
    /// JSON file holding this device's data (also read from `PENNYWISE_STORE`).
    #[arg(
        long,
        global = true,
        env = "PENNYWISE_STORE",
        default_value = "./pennywise.json"
    )]
    store: PathBuf,

    #[arg(long, global = true, default_value = DEFAULT_USER_ID)]
    user_id: String,

    /// Used until a currency preference is saved.
    #[arg(long, global = true, default_value = "USD", value_parser = parse_currency)]
    default_currency: Currency,

    /// Log level for the tracing subscriber.
    #[arg(long, global = true, default_value = "warn")]
    level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(subcommand)]
    Categories(CategoryCommand),
    #[command(subcommand)]
    Transactions(TransactionCommand),
    #[command(subcommand)]
    Budgets(BudgetCommand),
    #[command(subcommand)]
    Goals(GoalCommand),
    Dashboard(DashboardArgs),
    #[command(subcommand)]
    Currency(CurrencyCommand),
    Health,
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    List {
        #[arg(long = "type", value_parser = parse_kind)]
        kind: Option<TransactionKind>,
    },
    Add(CategoryAddArgs),
}

#[derive(Args, Debug)]
struct CategoryAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long = "type", value_parser = parse_kind)]
    kind: TransactionKind,
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    icon: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Subcommand, Debug)]
enum TransactionCommand {
    List {
        #[arg(long)]
        limit: Option<u64>,
    },
    Add(TransactionAddArgs),
}

#[derive(Args, Debug)]
struct TransactionAddArgs {
    #[arg(long)]
    amount: Money,
    #[arg(long = "type", value_parser = parse_kind)]
    kind: TransactionKind,
    #[arg(long)]
    description: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339; defaults to now.
    #[arg(long, value_parser = parse_date)]
    date: Option<DateTime<Utc>>,
    #[arg(long)]
    category: Option<Uuid>,
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    List {
        #[arg(long)]
        limit: Option<u64>,
    },
    Show {
        id: Uuid,
    },
    Add(BudgetArgs),
    /// Replace a budget and all of its allocations.
    Update {
        id: Uuid,
        #[command(flatten)]
        budget: BudgetArgs,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Args, Debug)]
struct BudgetArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    amount: Money,
    #[arg(long, value_parser = parse_period)]
    period: BudgetPeriod,
    #[arg(long, value_parser = parse_date)]
    start: DateTime<Utc>,
    /// Defaults to one period after `--start`.
    #[arg(long, value_parser = parse_date)]
    end: Option<DateTime<Utc>>,
    /// `<CATEGORY_ID>=<AMOUNT>`, repeatable.
    #[arg(long = "allocation", value_parser = parse_allocation)]
    allocations: Vec<(Uuid, Money)>,
}

impl BudgetArgs {
    fn into_input(self) -> BudgetInput {
        let end_date = self
            .end
            .unwrap_or_else(|| self.period.default_end(self.start));
        BudgetInput {
            name: self.name,
            amount: self.amount,
            period: self.period,
            start_date: self.start,
            end_date,
            categories: self
                .allocations
                .into_iter()
                .map(|(category_id, amount)| AllocationInput {
                    category_id,
                    amount,
                })
                .collect(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum GoalCommand {
    List {
        #[arg(long)]
        limit: Option<u64>,
    },
    Show {
        id: Uuid,
    },
    Add(GoalArgs),
    /// Replace a goal; omitted optional fields are cleared.
    Update {
        id: Uuid,
        #[command(flatten)]
        goal: GoalArgs,
        #[arg(long, value_parser = parse_status)]
        status: Option<GoalStatus>,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Args, Debug)]
struct GoalArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    target: Money,
    #[arg(long)]
    current: Option<Money>,
    #[arg(long, value_parser = parse_date)]
    target_date: Option<DateTime<Utc>>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct DashboardArgs {
    /// How many recent transactions the figures cover.
    #[arg(long)]
    limit: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum CurrencyCommand {
    Show,
    Set { code: String },
}

fn parse_kind(raw: &str) -> Result<TransactionKind, String> {
    TransactionKind::try_from(raw).map_err(|err| err.to_string())
}

fn parse_period(raw: &str) -> Result<BudgetPeriod, String> {
    BudgetPeriod::try_from(raw).map_err(|err| err.to_string())
}

fn parse_status(raw: &str) -> Result<GoalStatus, String> {
    GoalStatus::try_from(raw).map_err(|err| err.to_string())
}

fn parse_currency(raw: &str) -> Result<Currency, String> {
    Currency::try_from(raw).map_err(|err| err.to_string())
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    api_types::date::parse(raw).ok_or_else(|| format!("invalid date: {raw}"))
}

fn parse_allocation(raw: &str) -> Result<(Uuid, Money), String> {
    let (id, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <CATEGORY_ID>=<AMOUNT>, got {raw}"))?;
    let id = id
        .trim()
        .parse::<Uuid>()
        .map_err(|err| format!("invalid category id {id}: {err}"))?;
    let amount = amount.parse::<Money>().map_err(|err| err.to_string())?;
    Ok((id, amount))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "pennywise_offline={level},engine={level}",
            level = cli.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let store = LocalStore::open(&cli.store).await?;
    let engine = Engine::builder()
        .store(store)
        .user_id(cli.user_id)
        .default_currency(cli.default_currency)
        .build()
        .await?;
    tracing::debug!(store = %cli.store.display(), "opened local store");

    let currency = engine.currency_preference().await?;

    match cli.command {
        Command::Categories(CategoryCommand::List { kind }) => {
            render::categories(&engine.list_categories(kind).await?);
        }
        Command::Categories(CategoryCommand::Add(args)) => {
            let category = engine
                .create_category(NewCategory {
                    name: args.name,
                    kind: args.kind,
                    color: args.color,
                    icon: args.icon,
                    description: args.description,
                })
                .await?;
            println!("created category: {} ({})", category.name, category.id);
        }
        Command::Transactions(TransactionCommand::List { limit }) => {
            render::transactions(&engine.list_transactions(limit).await?, currency);
        }
        Command::Transactions(TransactionCommand::Add(args)) => {
            let transaction = engine
                .create_transaction(NewTransaction {
                    amount: args.amount,
                    kind: args.kind,
                    description: args.description,
                    date: args.date,
                    category_id: args.category,
                })
                .await?;
            println!(
                "recorded {} ({})",
                currency.format(transaction.signed_amount()),
                transaction.id
            );
        }
        Command::Budgets(BudgetCommand::List { limit }) => {
            for budget in engine.list_budgets(limit).await? {
                render::budget(&budget, currency);
            }
        }
        Command::Budgets(BudgetCommand::Show { id }) => {
            render::budget(&engine.budget(id).await?, currency);
        }
        Command::Budgets(BudgetCommand::Add(args)) => {
            let budget = engine.create_budget(args.into_input()).await?;
            println!("created budget: {} ({})", budget.name, budget.id);
        }
        Command::Budgets(BudgetCommand::Update { id, budget }) => {
            let budget = engine.update_budget(id, budget.into_input()).await?;
            render::budget(&budget, currency);
        }
        Command::Budgets(BudgetCommand::Delete { id }) => {
            engine.delete_budget(id).await?;
            println!("deleted budget: {id}");
        }
        Command::Goals(GoalCommand::List { limit }) => {
            for goal in engine.list_savings_goals(limit).await? {
                render::savings_goal(&goal, currency);
            }
        }
        Command::Goals(GoalCommand::Show { id }) => {
            render::savings_goal(&engine.savings_goal(id).await?, currency);
        }
        Command::Goals(GoalCommand::Add(args)) => {
            let goal = engine
                .create_savings_goal(NewSavingsGoal {
                    name: args.name,
                    target_amount: args.target,
                    current_amount: args.current,
                    target_date: args.target_date,
                    description: args.description,
                })
                .await?;
            println!("created savings goal: {} ({})", goal.name, goal.id);
        }
        Command::Goals(GoalCommand::Update { id, goal, status }) => {
            let goal = engine
                .update_savings_goal(
                    id,
                    SavingsGoalUpdate {
                        name: goal.name,
                        target_amount: goal.target,
                        current_amount: goal.current,
                        target_date: goal.target_date,
                        description: goal.description,
                        status,
                    },
                )
                .await?;
            render::savings_goal(&goal, currency);
        }
        Command::Goals(GoalCommand::Delete { id }) => {
            engine.delete_savings_goal(id).await?;
            println!("deleted savings goal: {id}");
        }
        Command::Dashboard(args) => {
            render::dashboard(&engine.dashboard(args.limit).await?);
        }
        Command::Currency(CurrencyCommand::Show) => {
            println!("{} ({}) {}", currency.name(), currency.code(), currency.symbol());
        }
        Command::Currency(CurrencyCommand::Set { code }) => {
            let currency = engine.set_currency_preference(&code).await?;
            println!("currency set to {} ({})", currency.name(), currency.code());
        }
        Command::Health => {
            let health = engine.health().await?;
            println!(
                "ok: {} backend, {} categories, {} transactions",
                health.backend, health.categories_count, health.transactions_count
            );
        }
    }

    Ok(())
}
