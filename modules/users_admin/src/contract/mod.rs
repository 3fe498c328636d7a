pub mod client;
pub mod error;
pub mod model;

pub use client::UsersAdminApi;
pub use error::UsersAdminError;
pub use model::{Role, StoredUser, User, UserForm, UserInput};
