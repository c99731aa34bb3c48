/// Marker trait for intents.
///
/// Intents are either user actions (change the search term) or
/// completions of async work (a page arrived, a fetch failed).
pub trait Intent: Send + 'static {}
