pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_admin_users_router, init_users_router};
