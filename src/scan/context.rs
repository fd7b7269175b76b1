use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Coarse role of a PHP file, used to decide whether bare strings are user-facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileContext {
    Controller,
    Model,
    Service,
    Job,
    Notification,
    Mail,
    Component,
    Unknown,
}

impl FileContext {
    /// Detect the context from the path first, then from superclass/interface hints
    pub fn detect(path: &Path, content: &str) -> Self {
        Self::from_path(path).unwrap_or_else(|| Self::from_content(content))
    }

    fn from_path(path: &Path) -> Option<Self> {
        let path = path.to_string_lossy().replace('\\', "/");
        let stem = path
            .rsplit('/')
            .next()
            .unwrap_or("")
            .trim_end_matches(".php")
            .trim_end_matches(".blade");

        let context = if path.contains("/Http/Controllers/") || stem.ends_with("Controller") {
            FileContext::Controller
        } else if path.contains("/Models/") {
            FileContext::Model
        } else if path.contains("/Services/") || stem.ends_with("Service") {
            FileContext::Service
        } else if path.contains("/Jobs/") || stem.ends_with("Job") {
            FileContext::Job
        } else if path.contains("/Notifications/") || stem.ends_with("Notification") {
            FileContext::Notification
        } else if path.contains("/Mail/") {
            FileContext::Mail
        } else if path.contains("/Livewire/")
            || path.contains("/View/Components/")
            || path.contains("/views/livewire/")
        {
            FileContext::Component
        } else {
            return None;
        };
        Some(context)
    }

    fn from_content(content: &str) -> Self {
        if content.contains("extends Controller") {
            FileContext::Controller
        } else if content.contains("extends Model") || content.contains("extends Authenticatable") {
            FileContext::Model
        } else if content.contains("implements ShouldQueue") {
            FileContext::Job
        } else if content.contains("extends Notification") {
            FileContext::Notification
        } else if content.contains("extends Mailable") {
            FileContext::Mail
        } else if content.contains("extends Component") {
            FileContext::Component
        } else {
            FileContext::Unknown
        }
    }

    /// Contexts whose bare string literals are shown to users
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            FileContext::Controller
                | FileContext::Notification
                | FileContext::Mail
                | FileContext::Component
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileContext::Controller => "controller",
            FileContext::Model => "model",
            FileContext::Service => "service",
            FileContext::Job => "job",
            FileContext::Notification => "notification",
            FileContext::Mail => "mail",
            FileContext::Component => "component",
            FileContext::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
