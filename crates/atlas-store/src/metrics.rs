//! Cumulative counters for a map store.

/// Operation counters maintained by the store.
///
/// All counters are cumulative since the store was created; `clear()` does
/// not reset them. Read a copy through
/// [`MapStore::metrics`](crate::MapStore::metrics).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreMetrics {
    /// Actions whose mutation ran.
    pub actions_executed: u64,
    /// Actions rejected as not executable.
    pub actions_rejected: u64,
    /// Rooms inserted (by factory, template, or predefined insert).
    pub rooms_created: u64,
    /// Rooms removed by actions.
    pub rooms_removed: u64,
    /// Generic searches run.
    pub searches: u64,
    /// Rooms handed to search recipients.
    pub rooms_delivered: u64,
}
