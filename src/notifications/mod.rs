pub mod dispatcher;
pub mod sms;

pub use dispatcher::{AppointmentEvent, Notifier};
pub use sms::{SmsSender, TextbeltSender};
