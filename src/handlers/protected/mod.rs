// handlers/protected/mod.rs - endpoints open to any authenticated role

pub mod uploads;
pub mod whoami;

pub use uploads::validate_post;
pub use whoami::whoami_get;
