pub mod edit;

pub use edit::{ContinuationMap, ContribPage, Edit, RollbackOutcome, RollbackResponse};
