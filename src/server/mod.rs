pub mod server;

pub use server::{bind_listener, run};
