pub mod attendance;
pub mod auth;
pub mod classes;
pub mod conversations;
pub mod events;
pub mod grades;
pub mod parents;
pub mod users;
