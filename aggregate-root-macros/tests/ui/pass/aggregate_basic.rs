use aggregate_root::aggregate::{AggregateConfig, AggregateRoot, AggregateState};
use aggregate_root::dispatcher::Dispatcher;
use aggregate_root_macros::aggregate_root;
use std::sync::Arc;

#[aggregate_root]
#[derive(Clone)]
struct Account {
    name: String,
}

fn main() {
    let config = Arc::new(AggregateConfig::new(Dispatcher::<Account>::builder().build()));
    let account = Account {
        aggregate_state: AggregateState::new(&config),
        name: "ada".to_string(),
    };
    assert_eq!(Account::TYPE, "Account");
    assert_eq!(account.version(), -1);
    let _ = format!("{:?}", account.clone());
}
