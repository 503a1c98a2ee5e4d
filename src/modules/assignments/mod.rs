pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_assignments_router, init_class_assignments_router};
