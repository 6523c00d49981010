//! Infrastructure Layer
//!
//! - `postgres`: user records
//! - `redis`: production session store
//! - `memory`: in-process stores for tests and local runs without Redis

pub mod memory;
pub mod postgres;
pub mod redis;

pub use self::memory::{MemorySessionStore, MemoryUserRepository};
pub use self::postgres::PgUserRepository;
pub use self::redis::RedisSessionStore;
