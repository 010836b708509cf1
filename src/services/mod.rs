pub mod status_poller;

pub use status_poller::{PollPolicy, StatusPoller};
