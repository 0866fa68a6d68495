pub mod client;
pub mod poller;
pub mod retry;

pub use client::DvmnClient;
pub use poller::{AttemptFeed, AttemptPoller};
pub use retry::RetryPolicy;
