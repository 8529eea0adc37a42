//! Event type definitions for the module event system
//!
//! Every signal an audit module emits during its lifecycle is a `ModuleEvent`.
//! Signals exist on two channels: the module-specific one, whose wire names
//! are prefixed with the module id, and the generic module-lifecycle one
//! shared by all modules.

use serde::{Deserialize, Serialize};

use crate::audit_module::AnalysisResult;

/// Identity of the module that emitted an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub id: String,
    pub name: String,
}

impl ModuleInfo {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Logical channel an event is emitted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventChannel {
    /// Events specific to one module (`page_speed_module__*`)
    Module,
    /// Module-lifecycle events shared by every module (`module__*`)
    Generic,
}

/// Event types emitted by an audit module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ModuleEvent {
    /// Module finished its initialization
    CreateModule {
        module: ModuleInfo,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// An analysis pass started
    StartsComputing {
        module: ModuleInfo,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// An analysis pass finished
    EndsComputing {
        module: ModuleInfo,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// One context is about to be analysed
    BeforeAnalyse {
        channel: EventChannel,
        module: ModuleInfo,
        url: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// A result record was produced for one context
    OnResult {
        module: ModuleInfo,
        url: String,
        result: AnalysisResult,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// One context has been analysed and persisted
    AfterAnalyse {
        channel: EventChannel,
        module: ModuleInfo,
        url: String,
        result: AnalysisResult,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Helper functions for creating common events
impl ModuleEvent {
    #[must_use]
    pub fn create_module(module: ModuleInfo) -> Self {
        Self::CreateModule {
            module,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn starts_computing(module: ModuleInfo) -> Self {
        Self::StartsComputing {
            module,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn ends_computing(module: ModuleInfo) -> Self {
        Self::EndsComputing {
            module,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn before_analyse(channel: EventChannel, module: ModuleInfo, url: String) -> Self {
        Self::BeforeAnalyse {
            channel,
            module,
            url,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn on_result(module: ModuleInfo, url: String, result: AnalysisResult) -> Self {
        Self::OnResult {
            module,
            url,
            result,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn after_analyse(
        channel: EventChannel,
        module: ModuleInfo,
        url: String,
        result: AnalysisResult,
    ) -> Self {
        Self::AfterAnalyse {
            channel,
            module,
            url,
            result,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Module that emitted the event
    #[must_use]
    pub fn module(&self) -> &ModuleInfo {
        match self {
            Self::CreateModule { module, .. }
            | Self::StartsComputing { module, .. }
            | Self::EndsComputing { module, .. }
            | Self::BeforeAnalyse { module, .. }
            | Self::OnResult { module, .. }
            | Self::AfterAnalyse { module, .. } => module,
        }
    }

    /// Channel the event belongs to
    #[must_use]
    pub fn channel(&self) -> EventChannel {
        match self {
            Self::CreateModule { .. } | Self::OnResult { .. } => EventChannel::Module,
            Self::StartsComputing { .. } | Self::EndsComputing { .. } => EventChannel::Generic,
            Self::BeforeAnalyse { channel, .. } | Self::AfterAnalyse { channel, .. } => *channel,
        }
    }

    /// Result record carried by the event, if any
    #[must_use]
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::OnResult { result, .. } | Self::AfterAnalyse { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Wire name of the event, e.g. `page_speed_module__onResult` or
    /// `module__startsComputing`
    #[must_use]
    pub fn name(&self) -> String {
        let action = match self {
            Self::CreateModule { .. } => "createModule",
            Self::StartsComputing { .. } => "startsComputing",
            Self::EndsComputing { .. } => "endsComputing",
            Self::BeforeAnalyse { .. } => "beforeAnalyse",
            Self::OnResult { .. } => "onResult",
            Self::AfterAnalyse { .. } => "afterAnalyse",
        };
        match self.channel() {
            EventChannel::Module => format!("{}_module__{action}", self.module().id),
            EventChannel::Generic => format!("module__{action}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_speed() -> ModuleInfo {
        ModuleInfo::new("page_speed", "Page Speed")
    }

    #[test]
    fn wire_names_follow_channel() {
        assert_eq!(
            ModuleEvent::create_module(page_speed()).name(),
            "page_speed_module__createModule"
        );
        assert_eq!(
            ModuleEvent::starts_computing(page_speed()).name(),
            "module__startsComputing"
        );
        assert_eq!(
            ModuleEvent::before_analyse(EventChannel::Module, page_speed(), String::new()).name(),
            "page_speed_module__beforeAnalyse"
        );
        assert_eq!(
            ModuleEvent::before_analyse(EventChannel::Generic, page_speed(), String::new()).name(),
            "module__beforeAnalyse"
        );
    }
}
