pub mod rollback_flow;

pub use rollback_flow::RollbackFlow;
