pub mod health;
pub mod positions;
pub mod tasks;
pub mod user_positions;
pub mod users;
