pub mod sweep;
pub mod transport;

pub use sweep::{SweepConfig, Sweeper};
pub use transport::{EmailTransport, SmsTransport, SmtpMailer, TransportError, TwilioSms};
