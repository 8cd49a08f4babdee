pub mod formatter;
pub mod line;
pub mod service;

pub use formatter::{DeliveryFormatter, MAX_MESSAGE_LENGTH, message_length};
pub use line::{LineClient, create_line_client};
pub use service::QuizDelivery;
