pub mod assignments;
pub mod auth;
pub mod classes;
pub mod health;
pub mod meetings;
pub mod pages;
pub mod submissions;
pub mod users;
