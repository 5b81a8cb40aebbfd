//! Pipeline state machine.
//!
//! Defines a pure state transition function for one hotkey-triggered run.

use serde::{Deserialize, Serialize};

/// Stage of the single in-flight run.
///
/// 单次运行所处的阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    Idle,
    Classifying,
    Converting,
    Resolving,
    BuildingPayload,
    Injecting,
    /// Reporting the outcome; `failed` marks the failure branch.
    Reporting { failed: bool },
}

/// Events that drive a run forward.
///
/// 驱动运行的事件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Hotkey fired.
    Trigger,
    /// The current step finished.
    StepDone,
    /// The current step failed; the run jumps to reporting.
    StepFailed,
    /// Nothing to do (empty clipboard); report without failing.
    Skip,
    /// The outcome was delivered to the notifier.
    Reported,
}

/// Pure pipeline state machine.
///
/// 纯状态机：不包含副作用。
pub struct PipelineStateMachine;

impl PipelineStateMachine {
    /// Returns the next stage, or `None` when the event is not valid in `stage`.
    ///
    /// A `Trigger` outside `Idle` is rejected, which is how the coordinator
    /// knows to skip a busy trigger.
    pub fn transition(stage: PipelineStage, event: PipelineEvent) -> Option<PipelineStage> {
        use PipelineEvent::*;
        use PipelineStage::*;

        match (stage, event) {
            (Idle, Trigger) => Some(Classifying),
            (Classifying, StepDone) => Some(Converting),
            (Converting, StepDone) => Some(Resolving),
            (Resolving, StepDone) => Some(BuildingPayload),
            (BuildingPayload, StepDone) => Some(Injecting),
            (Injecting, StepDone) => Some(Reporting { failed: false }),
            (Classifying | Converting | Resolving | BuildingPayload | Injecting, StepFailed) => {
                Some(Reporting { failed: true })
            }
            (Classifying | Converting | Resolving | BuildingPayload | Injecting, Skip) => {
                Some(Reporting { failed: false })
            }
            (Reporting { .. }, Reported) => Some(Idle),
            _ => None,
        }
    }

    pub fn is_busy(stage: PipelineStage) -> bool {
        stage != PipelineStage::Idle
    }
}
