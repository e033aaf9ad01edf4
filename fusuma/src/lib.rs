pub mod clock;
pub mod core;
pub mod daemon;
pub mod dispatch;
pub mod ipc;
pub mod storage;
pub mod store;
pub mod sync;
