use aggregate_root::aggregate::{AggregateConfig, AggregateRoot, AggregateState};
use aggregate_root::dispatcher::Dispatcher;
use aggregate_root_macros::aggregate_root;
use std::sync::Arc;

// 已声明的状态字段会被移到最前，类型保持不变
#[aggregate_root(name = "billing.Invoice", debug = false)]
struct Invoice {
    total: u64,
    aggregate_state: AggregateState<Invoice>,
}

fn main() {
    let config = Arc::new(AggregateConfig::new(Dispatcher::<Invoice>::builder().build()));
    let invoice = Invoice {
        aggregate_state: AggregateState::new(&config),
        total: 0,
    };
    assert_eq!(Invoice::TYPE, "billing.Invoice");
    assert_eq!(invoice.unpublished_events().len(), 0);
    assert_eq!(invoice.total, 0);
}
