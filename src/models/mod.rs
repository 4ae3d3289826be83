pub mod email;

pub use email::EmailRequest;
