pub mod orchestration;

pub use orchestration::{
    plan_release, run_release_workflow, ReleasePlan, ReleaseWorkflowArgs, WarningReporter,
    WorkflowResult,
};
