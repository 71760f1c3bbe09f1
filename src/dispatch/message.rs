//! Outbound chat messages and their interactive actions.

use std::fmt;
use std::str::FromStr;

use crate::core::highlight::highlight_keywords;
use crate::core::job::JobRecord;
use crate::core::types::JobId;

/// What a button on a published job does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Append the job to the saved-jobs log.
    Save,
    /// Acknowledge only.
    Skip,
}

impl ActionKind {
    fn prefix(&self) -> &'static str {
        match self {
            ActionKind::Save => "save",
            ActionKind::Skip => "skip",
        }
    }
}

/// Visual weight of an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStyle {
    Success,
    Secondary,
}

/// A button attached to a message. `custom_id` encodes kind and job id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAction {
    pub label: String,
    pub style: ActionStyle,
    pub custom_id: String,
}

/// The decoded form of an action's `custom_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRef {
    pub kind: ActionKind,
    pub job_id: JobId,
}

impl ActionRef {
    pub fn new(kind: ActionKind, job_id: JobId) -> Self {
        Self { kind, job_id }
    }
}

impl fmt::Display for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.prefix(), self.job_id)
    }
}

impl FromStr for ActionRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, id) = s
            .split_once(':')
            .ok_or_else(|| format!("malformed action id: {}", s))?;
        let kind = match prefix {
            "save" => ActionKind::Save,
            "skip" => ActionKind::Skip,
            other => return Err(format!("unknown action: {}", other)),
        };
        if id.is_empty() {
            return Err(format!("missing job id in action: {}", s));
        }
        Ok(Self::new(kind, JobId::new(id)))
    }
}

/// A message ready to be published to the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub content: String,
    pub actions: Vec<MessageAction>,
}

/// Render the channel message for a newly found job: highlighted title,
/// location line, link line, plus Save and Skip buttons.
pub fn render_job_message<S: AsRef<str>>(job: &JobRecord, keywords: &[S]) -> OutboundMessage {
    let content = format!(
        "🏢 **{}**\n📍 {}\n🔗 {}",
        highlight_keywords(&job.title, keywords),
        job.location_or_unknown(),
        job.url
    );

    let actions = vec![
        MessageAction {
            label: "💾 Save".to_string(),
            style: ActionStyle::Success,
            custom_id: ActionRef::new(ActionKind::Save, job.id.clone()).to_string(),
        },
        MessageAction {
            label: "⏭️ Skip".to_string(),
            style: ActionStyle::Secondary,
            custom_id: ActionRef::new(ActionKind::Skip, job.id.clone()).to_string(),
        },
    ];

    OutboundMessage { content, actions }
}
