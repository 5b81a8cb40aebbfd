use crate::pipeline::PipelineResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub result: PipelineResult,
    /// False when the user turned notifications off; the outcome is still logged.
    pub show_desktop: bool,
}

pub trait NotificationPort: Send + Sync {
    fn notify(&self, notification: &Notification);
}
