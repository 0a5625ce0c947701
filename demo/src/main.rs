use aggregate_root::aggregate::{AggregateConfig, AggregateRoot, AggregateState};
use aggregate_root::apply_strategy::{ApplyStrategy, DefaultApplyStrategy, InstrumentedApplyStrategy};
use aggregate_root::dispatcher::Dispatcher;
use aggregate_root::error::AggregateRootError;
use aggregate_root::event_store::{EventStore, InMemoryEventStore, ReadSpec};
use aggregate_root::instrumentation::TracingInstrumentation;
use aggregate_root::persist::{
    AggregateRepository, InstrumentedRepository, SnapshotRepository, Snapshotting,
};
use aggregate_root_macros::{aggregate_root, domain_event};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[domain_event(event_type = "account.opened")]
struct AccountOpened {
    owner: String,
}

#[domain_event(event_type = "account.deposited")]
struct MoneyDeposited {
    amount: i64,
}

#[domain_event(event_type = "account.withdrawn")]
struct MoneyWithdrawn {
    amount: i64,
}

#[domain_event(event_type = "account.snapshot")]
struct AccountSnapshot {
    owner: Option<String>,
    balance: i64,
}

#[derive(Debug, thiserror::Error)]
enum AccountError {
    #[error("account already opened")]
    AlreadyOpened,
    #[error("account not opened")]
    NotOpened,
    #[error("insufficient funds: balance={balance}, requested={requested}")]
    InsufficientFunds { balance: i64, requested: i64 },
    #[error(transparent)]
    AggregateRoot(#[from] AggregateRootError),
}

#[aggregate_root(name = "Account")]
#[derive(Clone)]
struct Account {
    owner: Option<String>,
    balance: i64,
}

impl Account {
    fn new(config: &Arc<AggregateConfig<Account>>) -> Self {
        Self {
            aggregate_state: AggregateState::new(config),
            owner: None,
            balance: 0,
        }
    }

    fn open(&mut self, owner: &str) -> Result<(), AccountError> {
        if self.owner.is_some() {
            return Err(AccountError::AlreadyOpened);
        }
        Ok(self.apply_payload(&AccountOpened {
            owner: owner.to_string(),
        })?)
    }

    fn deposit(&mut self, amount: i64) -> Result<(), AccountError> {
        if self.owner.is_none() {
            return Err(AccountError::NotOpened);
        }
        Ok(self.apply_payload(&MoneyDeposited { amount })?)
    }

    fn withdraw(&mut self, amount: i64) -> Result<(), AccountError> {
        if self.owner.is_none() {
            return Err(AccountError::NotOpened);
        }
        if self.balance < amount {
            return Err(AccountError::InsufficientFunds {
                balance: self.balance,
                requested: amount,
            });
        }
        Ok(self.apply_payload(&MoneyWithdrawn { amount })?)
    }
}

impl Snapshotting for Account {
    type Snapshot = AccountSnapshot;

    fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            owner: self.owner.clone(),
            balance: self.balance,
        }
    }
}

fn account_config() -> anyhow::Result<Arc<AggregateConfig<Account>>> {
    let dispatcher = Dispatcher::builder()
        .on::<AccountOpened, _>(|account: &mut Account, e| account.owner = Some(e.owner))?
        .on::<MoneyDeposited, _>(|account: &mut Account, e| account.balance += e.amount)?
        .on::<MoneyWithdrawn, _>(|account: &mut Account, e| account.balance -= e.amount)?
        .on::<AccountSnapshot, _>(|account: &mut Account, s| {
            account.owner = s.owner;
            account.balance = s.balance;
        })?
        .build();

    let config = AggregateConfig::new(dispatcher).with_strategy(
        |dispatcher| -> Arc<dyn ApplyStrategy<Account>> {
            Arc::new(InstrumentedApplyStrategy::new(
                DefaultApplyStrategy::new(dispatcher),
                TracingInstrumentation,
            ))
        },
    );
    Ok(Arc::new(config))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = account_config()?;
    let store = Arc::new(InMemoryEventStore::new());
    let repository = InstrumentedRepository::new(
        SnapshotRepository::new(Arc::clone(&store)).with_interval(3),
        TracingInstrumentation,
    );
    let stream = "Account$alice";

    repository.with_aggregate(Account::new(&config), stream, |a: &mut Account| {
        a.open("alice")?;
        a.deposit(100)
    })?;
    let account = repository.with_aggregate(Account::new(&config), stream, |a: &mut Account| {
        a.withdraw(30)
    })?;
    tracing::info!(balance = account.balance, version = account.version(), "account updated");

    // 两个写者基于同一版本修改，后保存者收到并发冲突
    let mut first = repository.load(Account::new(&config), stream)?;
    let mut second = repository.load(Account::new(&config), stream)?;
    first.deposit(50)?;
    repository.store(&mut first, stream)?;

    second.withdraw(20)?;
    if let Err(e) = repository.store(&mut second, stream) {
        tracing::warn!(error = %e, conflict = e.is_concurrency_conflict(), "store rejected");
    }

    // 冲突后重新加载并重试
    let mut attempts = 0;
    let account = loop {
        attempts += 1;
        let result: Result<Account, AccountError> =
            repository.with_aggregate(Account::new(&config), stream, |a: &mut Account| {
                a.withdraw(20)
            });
        match result {
            Ok(account) => break account,
            Err(AccountError::AggregateRoot(e)) if e.is_concurrency_conflict() && attempts < 3 => {
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    };
    tracing::info!(balance = account.balance, attempts, "withdraw retried");

    let rejected: Result<Account, AccountError> =
        repository.with_aggregate(Account::new(&config), stream, |a: &mut Account| {
            a.withdraw(1_000)
        });
    if let Err(e) = rejected {
        tracing::info!(error = %e, "business rule rejected the command");
    }

    for event in store.read(&ReadSpec::stream(stream))? {
        println!("{} {} {}", event.event_id(), event.event_type(), event.data());
    }
    Ok(())
}
