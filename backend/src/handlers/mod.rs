pub mod attendance;
pub mod employees;
pub mod extract;
pub mod policy;
