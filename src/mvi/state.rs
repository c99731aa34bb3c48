/// Marker trait for state snapshots.
///
/// Snapshots are cloned out to subscribers, so they must be cheap to
/// compare and self-contained.
pub trait ViewState: Clone + PartialEq + Default + Send + Sync + 'static {}
