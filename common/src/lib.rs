//! Building blocks for delivering a text message through the Telegram Bot API
//! and reporting the outcome as a single normalized envelope.

#[macro_use]
mod macros;

agg_mod![config, error, models, sender, telegram, utils];

pub use error::SendError;
pub use models::{Envelope, MessageRequest, SendOutcome};
pub use sender::MessageSender;
