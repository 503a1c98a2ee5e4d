pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_assignment_submissions_router, init_submissions_router};
