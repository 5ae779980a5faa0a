// Adapters layer: concrete implementations of the domain ports (storage, http, notifications).

pub mod http;
pub mod notifier;
pub mod storage;
