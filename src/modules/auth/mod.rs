pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_auth_router, init_callback_router, init_session_router};
