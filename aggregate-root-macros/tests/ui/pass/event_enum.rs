use aggregate_root::domain_event::DomainEvent;
use aggregate_root_macros::domain_event;
use serde::Serialize;

// 已有的 Serialize 派生与宏追加的派生合并去重
#[domain_event(event_type = "order.status_changed")]
#[derive(Serialize)]
enum OrderStatusChanged {
    Paid { amount: u64 },
    Cancelled,
}

fn main() {
    assert_eq!(OrderStatusChanged::event_type(), "order.status_changed");
    let paid = OrderStatusChanged::Paid { amount: 10 };
    assert_eq!(paid.clone(), paid);
    assert_ne!(paid, OrderStatusChanged::Cancelled);
}
