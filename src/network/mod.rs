pub mod backend;
pub mod checkout;
pub mod poller;
pub mod stream;

#[cfg(test)]
pub(crate) mod test_support;

pub use backend::{HttpTrayBackend, TrayBackend};
pub use checkout::CheckoutSubmitter;
pub use poller::{PollResult, TrayPoller};
pub use stream::{FrameReceiver, FrameSubscription, StreamFrame};
