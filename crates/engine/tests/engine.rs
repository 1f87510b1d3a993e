use chrono::{DateTime, TimeZone, Utc};
use sea_orm::Database;
use uuid::Uuid;

use engine::{
    AllocationInput, Budget, BudgetCategory, BudgetInput, BudgetPeriod, Currency, Engine,
    EngineError, GoalStatus, LocalStore, Money, NewCategory, NewSavingsGoal, NewTransaction,
    RelationalStore, SavingsGoalUpdate, Store, StoreTx, TransactionKind,
};
use migration::MigratorTrait;

async fn relational_engine() -> Engine<RelationalStore> {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder()
        .store(RelationalStore::new(db))
        .build()
        .await
        .unwrap()
}

async fn local_engine() -> Engine<LocalStore> {
    Engine::builder()
        .store(LocalStore::in_memory())
        .build()
        .await
        .unwrap()
}

/// Runs each check once per backend.
macro_rules! on_both_backends {
    ($($check:ident),* $(,)?) => {
        mod relational {
            $(
                #[tokio::test]
                async fn $check() {
                    super::$check(super::relational_engine().await).await;
                }
            )*
        }

        mod local {
            $(
                #[tokio::test]
                async fn $check() {
                    super::$check(super::local_engine().await).await;
                }
            )*
        }
    };
}

on_both_backends!(
    seeds_default_categories_once,
    category_names_are_unique_per_kind,
    transaction_amount_round_trips_with_snapshot,
    transactions_list_newest_date_first,
    transaction_rejects_unknown_category,
    budgets_limit_returns_most_recent,
    budget_delete_leaves_no_orphans,
    budget_update_replaces_allocations,
    budget_update_unknown_id_changes_nothing,
    budget_validation,
    savings_goal_lifecycle,
    currency_preference_defaults_and_persists,
    dashboard_summarises_loaded_window,
    health_reports_counts,
    unbounded_limit_lists_every_row,
    oversized_amounts_are_rejected,
    largest_amounts_fill_the_dashboard,
    dropped_budget_tx_leaves_nothing,
);

fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

async fn category_id<S: Store>(engine: &Engine<S>, name: &str) -> Uuid {
    engine
        .list_categories(None)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == name)
        .map(|c| c.id)
        .unwrap()
}

fn expense(cents: i64, category_id: Option<Uuid>, date: DateTime<Utc>) -> NewTransaction {
    NewTransaction {
        amount: Money::new(cents),
        kind: TransactionKind::Expense,
        description: None,
        date: Some(date),
        category_id,
    }
}

fn budget_input(name: &str, categories: Vec<AllocationInput>) -> BudgetInput {
    BudgetInput {
        name: name.to_string(),
        amount: Money::new(50_000),
        period: BudgetPeriod::Monthly,
        start_date: day(2024, 1, 1),
        end_date: day(2024, 1, 31),
        categories,
    }
}

async fn stored_allocations<S: Store>(engine: &Engine<S>, budget_id: Uuid) -> usize {
    let mut tx = engine.store().begin().await.unwrap();
    tx.budget_categories(budget_id).await.unwrap().len()
}

async fn seeds_default_categories_once<S: Store>(engine: Engine<S>) {
    let categories = engine.list_categories(None).await.unwrap();
    assert_eq!(categories.len(), 13);

    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);

    let again = engine.list_categories(None).await.unwrap();
    assert_eq!(again, categories);

    let income = engine
        .list_categories(Some(TransactionKind::Income))
        .await
        .unwrap();
    assert_eq!(income.len(), 4);
    assert!(income.iter().all(|c| c.kind == TransactionKind::Income));
}

async fn category_names_are_unique_per_kind<S: Store>(engine: Engine<S>) {
    engine.list_categories(None).await.unwrap();

    let created = engine
        .create_category(NewCategory {
            name: "  Gifts ".to_string(),
            kind: TransactionKind::Expense,
            color: None,
            icon: None,
            description: Some("birthdays".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(created.name, "Gifts");
    assert_eq!(engine.category(created.id).await.unwrap(), created);

    let duplicate = engine
        .create_category(NewCategory {
            name: "gifts".to_string(),
            kind: TransactionKind::Expense,
            color: None,
            icon: None,
            description: None,
        })
        .await;
    assert!(matches!(duplicate, Err(EngineError::Conflict(_))));

    engine
        .create_category(NewCategory {
            name: "Gifts".to_string(),
            kind: TransactionKind::Income,
            color: None,
            icon: None,
            description: None,
        })
        .await
        .unwrap();

    let missing = engine.category(Uuid::now_v7()).await;
    assert!(matches!(missing, Err(EngineError::NotFound(_))));
}

async fn transaction_amount_round_trips_with_snapshot<S: Store>(engine: Engine<S>) {
    let food = category_id(&engine, "Food & Dining").await;

    let created = engine
        .create_transaction(expense(12_345, Some(food), day(2024, 2, 10)))
        .await
        .unwrap();
    assert_eq!(created.amount, Money::new(12_345));
    assert_eq!(created.signed_amount(), Money::new(-12_345));

    let listed = engine.list_transactions(None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].amount, Money::new(12_345));
    assert_eq!(listed[0].date, day(2024, 2, 10));
    let snapshot = listed[0].category.as_ref().unwrap();
    assert_eq!(snapshot.name, "Food & Dining");
    assert_eq!(snapshot.color, "#ef4444");

    let uncategorized = engine
        .create_transaction(NewTransaction {
            amount: Money::new(1),
            kind: TransactionKind::Income,
            description: Some("  ".to_string()),
            date: None,
            category_id: None,
        })
        .await
        .unwrap();
    assert!(uncategorized.category.is_none());
    assert!(uncategorized.description.is_none());
}

async fn transactions_list_newest_date_first<S: Store>(engine: Engine<S>) {
    for d in [5, 20, 1, 12] {
        engine
            .create_transaction(expense(100, None, day(2024, 3, d)))
            .await
            .unwrap();
    }

    let listed = engine.list_transactions(None).await.unwrap();
    let days: Vec<DateTime<Utc>> = listed.iter().map(|t| t.date).collect();
    assert_eq!(
        days,
        vec![
            day(2024, 3, 20),
            day(2024, 3, 12),
            day(2024, 3, 5),
            day(2024, 3, 1)
        ]
    );

    let limited = engine.list_transactions(Some(2)).await.unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[1].date, day(2024, 3, 12));
}

async fn transaction_rejects_unknown_category<S: Store>(engine: Engine<S>) {
    let result = engine
        .create_transaction(expense(100, Some(Uuid::now_v7()), day(2024, 1, 1)))
        .await;
    assert!(matches!(result, Err(EngineError::Validation(_))));

    let zero = engine
        .create_transaction(expense(0, None, day(2024, 1, 1)))
        .await;
    assert!(matches!(zero, Err(EngineError::Validation(_))));

    assert!(engine.list_transactions(None).await.unwrap().is_empty());
}

async fn budgets_limit_returns_most_recent<S: Store>(engine: Engine<S>) {
    let mut ids = Vec::new();
    for i in 0..10 {
        let budget = engine
            .create_budget(budget_input(&format!("Budget {i}"), Vec::new()))
            .await
            .unwrap();
        ids.push(budget.id);
    }

    let listed = engine.list_budgets(Some(3)).await.unwrap();
    let listed_ids: Vec<Uuid> = listed.iter().map(|b| b.id).collect();
    assert_eq!(listed_ids, vec![ids[9], ids[8], ids[7]]);

    assert_eq!(engine.list_budgets(None).await.unwrap().len(), 10);
}

async fn budget_delete_leaves_no_orphans<S: Store>(engine: Engine<S>) {
    let food = category_id(&engine, "Food & Dining").await;
    let travel = category_id(&engine, "Travel").await;

    let budget = engine
        .create_budget(budget_input(
            "January",
            vec![
                AllocationInput {
                    category_id: food,
                    amount: Money::new(20_000),
                },
                AllocationInput {
                    category_id: travel,
                    amount: Money::new(10_000),
                },
            ],
        ))
        .await
        .unwrap();
    assert_eq!(budget.categories.len(), 2);
    assert!(budget.categories.iter().all(|c| c.spent.is_zero()));
    assert_eq!(stored_allocations(&engine, budget.id).await, 2);

    engine.delete_budget(budget.id).await.unwrap();

    assert_eq!(stored_allocations(&engine, budget.id).await, 0);
    assert!(matches!(
        engine.budget(budget.id).await,
        Err(EngineError::NotFound(_))
    ));
    assert!(matches!(
        engine.delete_budget(budget.id).await,
        Err(EngineError::NotFound(_))
    ));
}

async fn budget_update_replaces_allocations<S: Store>(engine: Engine<S>) {
    let food = category_id(&engine, "Food & Dining").await;
    let shopping = category_id(&engine, "Shopping").await;

    let created = engine
        .create_budget(budget_input(
            "Groceries",
            vec![AllocationInput {
                category_id: food,
                amount: Money::new(30_000),
            }],
        ))
        .await
        .unwrap();

    let replaced = engine
        .update_budget(
            created.id,
            BudgetInput {
                amount: Money::new(60_000),
                period: BudgetPeriod::Quarterly,
                ..budget_input(
                    "Household",
                    vec![AllocationInput {
                        category_id: shopping,
                        amount: Money::new(5_000),
                    }],
                )
            },
        )
        .await
        .unwrap();
    assert_eq!(replaced.name, "Household");
    assert_eq!(replaced.created_at, created.created_at);
    assert_eq!(replaced.categories.len(), 1);
    assert_eq!(replaced.categories[0].category_id, shopping);

    let fetched = engine.budget(created.id).await.unwrap();
    assert_eq!(fetched.amount, Money::new(60_000));
    assert_eq!(fetched.period, BudgetPeriod::Quarterly);
    assert_eq!(fetched.categories.len(), 1);
    assert_eq!(
        fetched.categories[0].category.as_ref().unwrap().name,
        "Shopping"
    );

    let emptied = engine
        .update_budget(created.id, budget_input("Household", Vec::new()))
        .await
        .unwrap();
    assert!(emptied.categories.is_empty());
    assert_eq!(stored_allocations(&engine, created.id).await, 0);
}

async fn budget_update_unknown_id_changes_nothing<S: Store>(engine: Engine<S>) {
    let result = engine
        .update_budget(Uuid::now_v7(), budget_input("Ghost", Vec::new()))
        .await;
    assert!(matches!(result, Err(EngineError::NotFound(_))));
    assert!(engine.list_budgets(None).await.unwrap().is_empty());
}

async fn budget_validation<S: Store>(engine: Engine<S>) {
    let backwards = BudgetInput {
        start_date: day(2024, 2, 1),
        end_date: day(2024, 1, 1),
        ..budget_input("Backwards", Vec::new())
    };
    assert!(matches!(
        engine.create_budget(backwards).await,
        Err(EngineError::Validation(_))
    ));

    let unknown_category = budget_input(
        "Unknown",
        vec![AllocationInput {
            category_id: Uuid::now_v7(),
            amount: Money::new(100),
        }],
    );
    assert!(matches!(
        engine.create_budget(unknown_category).await,
        Err(EngineError::Validation(_))
    ));

    let blank = budget_input("   ", Vec::new());
    assert!(matches!(
        engine.create_budget(blank).await,
        Err(EngineError::Validation(_))
    ));

    assert!(engine.list_budgets(None).await.unwrap().is_empty());
}

async fn savings_goal_lifecycle<S: Store>(engine: Engine<S>) {
    let goal = engine
        .create_savings_goal(NewSavingsGoal {
            name: "Vacation".to_string(),
            target_amount: Money::new(200_000),
            current_amount: None,
            target_date: Some(day(2025, 6, 1)),
            description: Some("Lisbon".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(goal.current_amount, Money::ZERO);
    assert_eq!(goal.status, GoalStatus::Active);

    let updated = engine
        .update_savings_goal(
            goal.id,
            SavingsGoalUpdate {
                name: "Vacation".to_string(),
                target_amount: Money::new(200_000),
                current_amount: Some(Money::new(250_000)),
                target_date: None,
                description: None,
                status: None,
            },
        )
        .await
        .unwrap();
    assert!(updated.is_reached());
    assert_eq!(updated.status, GoalStatus::Active);
    assert_eq!(updated.progress_percent(), 100);
    assert!(updated.target_date.is_none());
    assert!(updated.description.is_none());

    let paused = engine
        .update_savings_goal(
            goal.id,
            SavingsGoalUpdate {
                name: "Vacation".to_string(),
                target_amount: Money::new(200_000),
                current_amount: None,
                target_date: None,
                description: None,
                status: Some(GoalStatus::Paused),
            },
        )
        .await
        .unwrap();
    assert_eq!(paused.current_amount, Money::ZERO);
    assert_eq!(engine.savings_goal(goal.id).await.unwrap(), paused);

    engine.delete_savings_goal(goal.id).await.unwrap();
    assert!(matches!(
        engine.savings_goal(goal.id).await,
        Err(EngineError::NotFound(_))
    ));
    assert!(matches!(
        engine.delete_savings_goal(goal.id).await,
        Err(EngineError::NotFound(_))
    ));
}

async fn currency_preference_defaults_and_persists<S: Store>(engine: Engine<S>) {
    assert_eq!(engine.currency_preference().await.unwrap(), Currency::USD);

    assert_eq!(
        engine.set_currency_preference("eur").await.unwrap(),
        Currency::EUR
    );
    assert_eq!(engine.currency_preference().await.unwrap(), Currency::EUR);

    assert!(matches!(
        engine.set_currency_preference("XYZ").await,
        Err(EngineError::Validation(_))
    ));
    assert_eq!(engine.currency_preference().await.unwrap(), Currency::EUR);
}

async fn dashboard_summarises_loaded_window<S: Store>(engine: Engine<S>) {
    let food = category_id(&engine, "Food & Dining").await;
    let salary = category_id(&engine, "Salary").await;

    // Oldest entry falls outside a window of 5.
    engine
        .create_transaction(expense(99_900, Some(food), day(2023, 12, 1)))
        .await
        .unwrap();
    engine
        .create_transaction(NewTransaction {
            amount: Money::new(300_000),
            kind: TransactionKind::Income,
            description: None,
            date: Some(day(2024, 1, 31)),
            category_id: Some(salary),
        })
        .await
        .unwrap();
    for (cents, d) in [(1_000, 2), (500, 3), (2_000, 4), (700, 5)] {
        let category = if cents == 2_000 { None } else { Some(food) };
        engine
            .create_transaction(expense(cents, category, day(2024, 1, d)))
            .await
            .unwrap();
    }
    for i in 0..4 {
        engine
            .create_budget(budget_input(&format!("B{i}"), Vec::new()))
            .await
            .unwrap();
    }

    let dashboard = engine.dashboard(None).await.unwrap();
    assert_eq!(dashboard.recent_transactions.len(), 5);
    assert_eq!(dashboard.budgets.len(), 3);
    assert!(dashboard.savings_goals.is_empty());
    assert_eq!(dashboard.summary.total_income, Money::new(300_000));
    assert_eq!(dashboard.summary.total_expenses, Money::new(4_200));
    assert_eq!(dashboard.summary.balance, Money::new(295_800));
    assert_eq!(dashboard.category_breakdown[0].category, "Food & Dining");
    assert_eq!(dashboard.category_breakdown[0].amount, Money::new(2_200));
    assert_eq!(dashboard.category_breakdown[1].category, "Uncategorized");
    assert_eq!(dashboard.monthly_trend.len(), 1);
    assert_eq!(dashboard.monthly_trend[0].month, "2024-01");
    assert_eq!(dashboard.currency, Currency::USD);

    let wide = engine.dashboard(Some(50)).await.unwrap();
    assert_eq!(wide.recent_transactions.len(), 6);
    assert_eq!(wide.monthly_trend.len(), 2);
}

async fn health_reports_counts<S: Store>(engine: Engine<S>) {
    let empty = engine.health().await.unwrap();
    assert_eq!(empty.categories_count, 0);
    assert_eq!(empty.transactions_count, 0);

    engine.list_categories(None).await.unwrap();
    engine
        .create_transaction(expense(100, None, day(2024, 1, 1)))
        .await
        .unwrap();

    let health = engine.health().await.unwrap();
    assert_eq!(health.categories_count, 13);
    assert_eq!(health.transactions_count, 1);
    assert_eq!(health.backend, engine.store().backend());
}

async fn unbounded_limit_lists_every_row<S: Store>(engine: Engine<S>) {
    for i in 0..4 {
        engine
            .create_budget(budget_input(&format!("Budget {i}"), Vec::new()))
            .await
            .unwrap();
        engine
            .create_transaction(expense(100 + i, None, day(2024, 1, 1 + i as u32)))
            .await
            .unwrap();
        engine
            .create_savings_goal(NewSavingsGoal {
                name: format!("Goal {i}"),
                target_amount: Money::new(10_000),
                current_amount: None,
                target_date: None,
                description: None,
            })
            .await
            .unwrap();
    }

    let all = Some(u64::MAX);
    assert_eq!(engine.list_budgets(all).await.unwrap().len(), 4);
    assert_eq!(engine.list_transactions(all).await.unwrap().len(), 4);
    assert_eq!(engine.list_savings_goals(all).await.unwrap().len(), 4);

    let dashboard = engine.dashboard(all).await.unwrap();
    assert_eq!(dashboard.recent_transactions.len(), 4);
    assert_eq!(dashboard.summary.total_expenses, Money::new(406));

    let past_signed = Some(i64::MAX.unsigned_abs() + 1);
    assert_eq!(engine.list_budgets(past_signed).await.unwrap().len(), 4);
}

async fn oversized_amounts_are_rejected<S: Store>(engine: Engine<S>) {
    assert!("92233720368547758.07".parse::<Money>().is_err());
    assert!("90071992547409.93".parse::<Money>().is_err());

    for cents in [Money::MAX.cents() + 1, i64::MAX] {
        assert!(matches!(
            engine
                .create_transaction(expense(cents, None, day(2024, 1, 1)))
                .await,
            Err(EngineError::Validation(_))
        ));
        let mut input = budget_input("Too much", Vec::new());
        input.amount = Money::new(cents);
        assert!(matches!(
            engine.create_budget(input).await,
            Err(EngineError::Validation(_))
        ));
    }

    assert!(engine.list_transactions(None).await.unwrap().is_empty());
    assert!(engine.list_budgets(None).await.unwrap().is_empty());
}

async fn largest_amounts_fill_the_dashboard<S: Store>(engine: Engine<S>) {
    for d in [1, 2] {
        engine
            .create_transaction(expense(Money::MAX.cents(), None, day(2024, 1, d)))
            .await
            .unwrap();
    }

    let dashboard = engine.dashboard(None).await.unwrap();
    let doubled = Money::new(Money::MAX.cents() * 2);
    assert_eq!(dashboard.summary.total_expenses, doubled);
    assert_eq!(dashboard.summary.balance, -doubled);
    assert_eq!(dashboard.category_breakdown[0].amount, doubled);
    assert_eq!(dashboard.monthly_trend[0].amount, doubled);
}

async fn dropped_budget_tx_leaves_nothing<S: Store>(engine: Engine<S>) {
    let food = category_id(&engine, "Food & Dining").await;
    let travel = category_id(&engine, "Travel").await;
    let now = Utc::now();
    let budget = Budget {
        id: Uuid::now_v7(),
        name: "Abandoned".to_string(),
        amount: Money::new(30_000),
        spent: Money::ZERO,
        period: BudgetPeriod::Monthly,
        start_date: day(2024, 1, 1),
        end_date: day(2024, 1, 31),
        user_id: engine::DEFAULT_USER_ID.to_string(),
        created_at: now,
        updated_at: now,
        categories: Vec::new(),
    };

    {
        let mut tx = engine.store().begin().await.unwrap();
        tx.insert_budget(&budget).await.unwrap();
        for (category_id, cents) in [(food, 20_000), (travel, 10_000)] {
            tx.insert_budget_category(&BudgetCategory {
                id: Uuid::now_v7(),
                budget_id: budget.id,
                category_id,
                amount: Money::new(cents),
                spent: Money::ZERO,
                category: None,
            })
            .await
            .unwrap();
        }
        assert!(tx.budget(budget.id).await.unwrap().is_some());
        assert_eq!(tx.budget_categories(budget.id).await.unwrap().len(), 2);
    }

    assert!(engine.list_budgets(None).await.unwrap().is_empty());
    assert_eq!(stored_allocations(&engine, budget.id).await, 0);
    assert!(matches!(
        engine.budget(budget.id).await,
        Err(EngineError::NotFound(_))
    ));
}

#[tokio::test]
async fn local_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("device").join("pennywise.json");

    let engine = Engine::builder()
        .store(LocalStore::open(&path).await.unwrap())
        .build()
        .await
        .unwrap();
    let food = category_id(&engine, "Food & Dining").await;
    engine
        .create_transaction(expense(4_250, Some(food), day(2024, 5, 1)))
        .await
        .unwrap();
    engine.set_currency_preference("GBP").await.unwrap();
    drop(engine);

    let reopened = Engine::builder()
        .store(LocalStore::open(&path).await.unwrap())
        .build()
        .await
        .unwrap();
    let transactions = reopened.list_transactions(None).await.unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].amount, Money::new(4_250));
    assert_eq!(
        transactions[0].category.as_ref().unwrap().name,
        "Food & Dining"
    );
    assert_eq!(reopened.list_categories(None).await.unwrap().len(), 13);
    assert_eq!(
        reopened.currency_preference().await.unwrap(),
        Currency::from_code("GBP").unwrap()
    );
    assert!(!path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn local_store_rejects_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pennywise.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let result = LocalStore::open(&path).await;
    assert!(matches!(result, Err(EngineError::Storage(_))));
}

#[tokio::test]
async fn builder_requires_store() {
    let result = Engine::<LocalStore>::builder().build().await;
    assert!(matches!(result, Err(EngineError::Validation(_))));
}
