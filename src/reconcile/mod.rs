mod deployment_reconciler;
mod report;
pub use deployment_reconciler::*;
pub use report::*;
