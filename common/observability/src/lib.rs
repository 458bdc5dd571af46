use prometheus::{IntCounter, IntCounterVec, Opts, Registry, TextEncoder, Encoder};

pub const RESTOCK_TOPPED_UP: &str = "topped_up";
pub const RESTOCK_ALREADY_STOCKED: &str = "already_stocked";

#[derive(Clone)]
pub struct InventoryMetrics {
    pub registry: Registry,
    pub item_mutations_total: IntCounterVec,
    pub restock_total: IntCounterVec,
    pub restock_units_total: IntCounter,
    pub http_errors_total: IntCounterVec,
}

impl InventoryMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let item_mutations_total = IntCounterVec::new(
            Opts::new(
                "inventory_item_mutations_total",
                "Inventory items created, updated or deleted"
            ),
            &["operation"]
        ).expect("valid item mutation metric");
        let restock_total = IntCounterVec::new(
            Opts::new(
                "inventory_restock_total",
                "Restock invocations by policy branch"
            ),
            &["outcome"]
        ).expect("valid restock metric");
        let restock_units_total = IntCounter::new(
            "inventory_restock_units_total",
            "Units added to stock by the restock top-up branch",
        ).expect("valid restock units metric");
        let http_errors_total = IntCounterVec::new(
            Opts::new(
                "http_errors_total",
                "Count of HTTP error responses emitted (status >= 400)"
            ),
            &["service", "code", "status"]
        ).expect("valid http error metric");
        let _ = registry.register(Box::new(item_mutations_total.clone()));
        let _ = registry.register(Box::new(restock_total.clone()));
        let _ = registry.register(Box::new(restock_units_total.clone()));
        let _ = registry.register(Box::new(http_errors_total.clone()));
        InventoryMetrics { registry, item_mutations_total, restock_total, restock_units_total, http_errors_total }
    }

    pub fn record_mutation(&self, operation: &str) {
        self.item_mutations_total.with_label_values(&[operation]).inc();
    }

    /// `added` is zero for the already-stocked branch.
    pub fn record_restock(&self, added: i32) {
        if added > 0 {
            self.restock_total.with_label_values(&[RESTOCK_TOPPED_UP]).inc();
            self.restock_units_total.inc_by(added as u64);
        } else {
            self.restock_total.with_label_values(&[RESTOCK_ALREADY_STOCKED]).inc();
        }
    }

    /// Text exposition of everything in the registry.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&families, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).to_string())
    }
}

impl Default for InventoryMetrics {
    fn default() -> Self { Self::new() }
}
