use prometheus::{Counter, IntCounter, IntCounterVec, Opts, Registry};

/// Business metrics of the order service
#[derive(Clone)]
pub struct OrderMetrics {
    pub orders_total: IntCounter,
    pub orders_revenue_total: Counter,
    pub status_transitions: IntCounterVec,
}

impl OrderMetrics {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let orders_total = IntCounter::with_opts(Opts::new(
            "orders_total",
            "Total number of orders created",
        ))?;
        registry.register(Box::new(orders_total.clone()))?;

        let orders_revenue_total = Counter::with_opts(Opts::new(
            "orders_revenue_total",
            "Total value of created orders",
        ))?;
        registry.register(Box::new(orders_revenue_total.clone()))?;

        let status_transitions = IntCounterVec::new(
            Opts::new("order_status_transitions_total", "Persisted order status transitions"),
            &["status"],
        )?;
        registry.register(Box::new(status_transitions.clone()))?;

        Ok(Self {
            orders_total,
            orders_revenue_total,
            status_transitions,
        })
    }

    pub(crate) fn record_created(&self, total_price: f64) {
        self.orders_total.inc();
        self.orders_revenue_total.inc_by(total_price);
    }

    pub(crate) fn record_transition(&self, status: hangar_core::OrderStatus) {
        self.status_transitions
            .with_label_values(&[status.as_str()])
            .inc();
    }
}
