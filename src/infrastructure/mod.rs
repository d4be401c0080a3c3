// Infrastructure implementations for calldrawer.

pub mod fetcher;
pub mod notify;

pub use fetcher::{FetchError, HttpGraphSource};
pub use notify::LogNotifier;
