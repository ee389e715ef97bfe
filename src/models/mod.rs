pub mod account;
pub mod task;

pub use account::{Account, AccountResponse, RegisterRequest};
pub use task::{Task, TaskCreate, TaskQuery, TaskStatus, TaskUpdate};
