pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_account_router, init_auth_router};
pub use service::AuthService;
