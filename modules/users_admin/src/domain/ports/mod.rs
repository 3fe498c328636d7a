pub mod hasher;
pub mod mailer;

pub use hasher::PasswordHasher;
pub use mailer::{Mailer, PasswordMail};
