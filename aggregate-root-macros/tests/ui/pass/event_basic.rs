use aggregate_root::domain_event::{DomainEvent, Event};
use aggregate_root_macros::domain_event;

#[domain_event]
struct OrderCreated {
    order_id: String,
}

#[domain_event(event_type = "order.expired")]
#[derive(Default)]
struct OrderExpired;

fn main() {
    assert!(OrderCreated::event_type().ends_with("OrderCreated"));
    assert_eq!(OrderExpired::event_type(), "order.expired");

    let created = OrderCreated {
        order_id: "o-1".to_string(),
    };
    let event = Event::new(&created).unwrap();
    assert_eq!(event.decode::<OrderCreated>().unwrap(), created.clone());
    assert_eq!(OrderExpired::default(), OrderExpired);
}
