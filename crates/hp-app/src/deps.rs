//! # Pipeline Dependencies / 流水线依赖
//!
//! Parameter grouping for [`PipelineCoordinator`](crate::PipelineCoordinator)
//! construction. Not a builder: no defaults, no hidden logic.

use std::sync::Arc;

use hp_core::ports::*;

/// 流水线依赖分组（仅参数打包）
pub struct PipelineDeps {
    // Input / 输入
    pub clipboard: Arc<dyn ClipboardPort>,
    pub clock: Arc<dyn ClockPort>,

    // Conversion / 转换
    pub converter: Arc<dyn DocumentConverterPort>,
    pub artifacts: Arc<dyn ArtifactStorePort>,

    // Target resolution and delivery / 目标解析与投递
    pub inspector: Arc<dyn SystemInspectorPort>,
    pub focus: Arc<dyn WindowFocusPort>,
    pub keystrokes: Arc<dyn KeystrokePort>,
    pub document_host: Arc<dyn DocumentHostPort>,
    pub opener: Arc<dyn FileOpenerPort>,

    // Reporting / 结果通知
    pub notifier: Arc<dyn NotificationPort>,
}
