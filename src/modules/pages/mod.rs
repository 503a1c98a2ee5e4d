pub mod controller;
pub mod router;

pub use router::{init_protected_pages_router, init_public_pages_router};
