//! Timed-event nodes: emails, meetings, tasks and chat messages.
//!
//! A timed event is either activated by the game clock (`scheduled`, no input
//! port) or by upstream flow (`conditional`, one input port). Both modes have
//! a single output that fires once the event completes or is read.

use game_rules::{CharacterId, GameTime, MessageChannel, TaskPriority};
use serde::{Deserialize, Serialize};

use super::{truncate, NodeBehavior, PortLayout};
use crate::graph::Port;

/// How a timed event gets activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Activated by the game clock at `scheduled_at`.
    #[default]
    Scheduled,
    /// Activated when flow reaches the node.
    Conditional,
}

impl TriggerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerMode::Scheduled => "scheduled",
            TriggerMode::Conditional => "conditional",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            TriggerMode::Scheduled => TriggerMode::Conditional,
            TriggerMode::Conditional => TriggerMode::Scheduled,
        }
    }
}

fn timed_ports(mode: TriggerMode, output_label: &str) -> PortLayout {
    let inputs = match mode {
        TriggerMode::Scheduled => Vec::new(),
        TriggerMode::Conditional => vec![Port::flow("in")],
    };
    PortLayout {
        inputs,
        outputs: vec![Port::flow("out").with_label(output_label)],
    }
}

fn header(kind: &str, mode: TriggerMode, at: Option<&GameTime>) -> String {
    match (mode, at) {
        (TriggerMode::Scheduled, Some(at)) => format!("{} @ {}", kind, at),
        (TriggerMode::Scheduled, None) => format!("{} (unscheduled)", kind),
        (TriggerMode::Conditional, _) => format!("{} (on flow)", kind),
    }
}

/// An email arriving in the player's inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailData {
    pub trigger_mode: TriggerMode,
    pub scheduled_at: Option<GameTime>,
    pub sender: Option<CharacterId>,
    pub subject: String,
    pub body: String,
}

/// Partial update for an email node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmailPatch {
    pub trigger_mode: Option<TriggerMode>,
    pub scheduled_at: Option<Option<GameTime>>,
    pub sender: Option<Option<CharacterId>>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

impl EmailData {
    pub fn apply(&mut self, patch: EmailPatch) {
        if let Some(mode) = patch.trigger_mode {
            self.trigger_mode = mode;
        }
        if let Some(at) = patch.scheduled_at {
            self.scheduled_at = at;
        }
        if let Some(sender) = patch.sender {
            self.sender = sender;
        }
        if let Some(subject) = patch.subject {
            self.subject = subject;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
    }
}

impl NodeBehavior for EmailData {
    fn header_label(&self) -> String {
        header("Email", self.trigger_mode, self.scheduled_at.as_ref())
    }

    fn port_layout(&self) -> PortLayout {
        timed_ports(self.trigger_mode, "Read")
    }

    fn content_lines(&self) -> Vec<String> {
        let from = self
            .sender
            .as_ref()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        vec![
            format!("From: {}", from),
            format!("Subject: {}", truncate(&self.subject, 30)),
        ]
    }
}

/// A meeting the player has to attend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeetingData {
    pub trigger_mode: TriggerMode,
    pub scheduled_at: Option<GameTime>,
    pub title: String,
    pub duration_minutes: u32,
    pub participants: Vec<CharacterId>,
    pub location: Option<String>,
    pub energy_cost: i32,
    pub stress_cost: i32,
}

impl Default for MeetingData {
    fn default() -> Self {
        Self {
            trigger_mode: TriggerMode::Scheduled,
            scheduled_at: None,
            title: String::new(),
            duration_minutes: 30,
            participants: Vec::new(),
            location: None,
            energy_cost: 0,
            stress_cost: 0,
        }
    }
}

/// Partial update for a meeting node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeetingPatch {
    pub trigger_mode: Option<TriggerMode>,
    pub scheduled_at: Option<Option<GameTime>>,
    pub title: Option<String>,
    pub duration_minutes: Option<u32>,
    pub participants: Option<Vec<CharacterId>>,
    pub location: Option<Option<String>>,
    pub energy_cost: Option<i32>,
    pub stress_cost: Option<i32>,
}

impl MeetingData {
    pub fn apply(&mut self, patch: MeetingPatch) {
        if let Some(mode) = patch.trigger_mode {
            self.trigger_mode = mode;
        }
        if let Some(at) = patch.scheduled_at {
            self.scheduled_at = at;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(duration) = patch.duration_minutes {
            self.duration_minutes = duration;
        }
        if let Some(participants) = patch.participants {
            self.participants = participants;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(cost) = patch.energy_cost {
            self.energy_cost = cost;
        }
        if let Some(cost) = patch.stress_cost {
            self.stress_cost = cost;
        }
    }

    /// Time the meeting ends, if it is scheduled.
    pub fn ends_at(&self) -> Option<GameTime> {
        self.scheduled_at
            .map(|start| start.advanced_by(self.duration_minutes))
    }
}

impl NodeBehavior for MeetingData {
    fn header_label(&self) -> String {
        header("Meeting", self.trigger_mode, self.scheduled_at.as_ref())
    }

    fn port_layout(&self) -> PortLayout {
        timed_ports(self.trigger_mode, "Completed")
    }

    fn content_lines(&self) -> Vec<String> {
        let duration = match self.ends_at() {
            Some(end) => format!(
                "{} min, until {:02}:{:02}",
                self.duration_minutes, end.hour, end.minute
            ),
            None => format!("{} min", self.duration_minutes),
        };
        vec![
            truncate(&self.title, 30),
            format!("{}, {} participant(s)", duration, self.participants.len()),
            format!("energy {:+}, stress {:+}", -self.energy_cost, self.stress_cost),
        ]
    }
}

/// A task assigned to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskData {
    pub trigger_mode: TriggerMode,
    pub scheduled_at: Option<GameTime>,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub deadline: Option<GameTime>,
    pub duration_minutes: u32,
}

impl Default for TaskData {
    fn default() -> Self {
        Self {
            trigger_mode: TriggerMode::Scheduled,
            scheduled_at: None,
            title: String::new(),
            description: String::new(),
            priority: TaskPriority::Normal,
            deadline: None,
            duration_minutes: 60,
        }
    }
}

/// Partial update for a task node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskPatch {
    pub trigger_mode: Option<TriggerMode>,
    pub scheduled_at: Option<Option<GameTime>>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub deadline: Option<Option<GameTime>>,
    pub duration_minutes: Option<u32>,
}

impl TaskData {
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(mode) = patch.trigger_mode {
            self.trigger_mode = mode;
        }
        if let Some(at) = patch.scheduled_at {
            self.scheduled_at = at;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = deadline;
        }
        if let Some(duration) = patch.duration_minutes {
            self.duration_minutes = duration;
        }
    }
}

impl NodeBehavior for TaskData {
    fn header_label(&self) -> String {
        header("Task", self.trigger_mode, self.scheduled_at.as_ref())
    }

    fn port_layout(&self) -> PortLayout {
        timed_ports(self.trigger_mode, "Completed")
    }

    fn content_lines(&self) -> Vec<String> {
        let mut lines = vec![
            truncate(&self.title, 30),
            format!("{} priority, {} min", self.priority.as_str(), self.duration_minutes),
        ];
        if let Some(deadline) = &self.deadline {
            lines.push(format!("due {}", deadline));
        }
        lines
    }
}

/// A chat, SMS or social media message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageData {
    pub trigger_mode: TriggerMode,
    pub scheduled_at: Option<GameTime>,
    pub sender: Option<CharacterId>,
    pub channel: MessageChannel,
    pub text: String,
    pub requires_response: bool,
}

/// Partial update for a message node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessagePatch {
    pub trigger_mode: Option<TriggerMode>,
    pub scheduled_at: Option<Option<GameTime>>,
    pub sender: Option<Option<CharacterId>>,
    pub channel: Option<MessageChannel>,
    pub text: Option<String>,
    pub requires_response: Option<bool>,
}

impl MessageData {
    pub fn apply(&mut self, patch: MessagePatch) {
        if let Some(mode) = patch.trigger_mode {
            self.trigger_mode = mode;
        }
        if let Some(at) = patch.scheduled_at {
            self.scheduled_at = at;
        }
        if let Some(sender) = patch.sender {
            self.sender = sender;
        }
        if let Some(channel) = patch.channel {
            self.channel = channel;
        }
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(requires) = patch.requires_response {
            self.requires_response = requires;
        }
    }
}

impl NodeBehavior for MessageData {
    fn header_label(&self) -> String {
        header("Message", self.trigger_mode, self.scheduled_at.as_ref())
    }

    fn port_layout(&self) -> PortLayout {
        let label = if self.requires_response { "Replied" } else { "Read" };
        timed_ports(self.trigger_mode, label)
    }

    fn content_lines(&self) -> Vec<String> {
        let from = self
            .sender
            .as_ref()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        vec![
            format!("[{}] {}", self.channel.as_str(), from),
            truncate(&self.text, 36),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_rules::Weekday;
    use rstest::rstest;

    #[rstest]
    #[case(TriggerMode::Scheduled, 0)]
    #[case(TriggerMode::Conditional, 1)]
    fn test_inputs_follow_trigger_mode(#[case] mode: TriggerMode, #[case] inputs: usize) {
        let layouts = [
            EmailData { trigger_mode: mode, ..Default::default() }.port_layout(),
            MeetingData { trigger_mode: mode, ..Default::default() }.port_layout(),
            TaskData { trigger_mode: mode, ..Default::default() }.port_layout(),
            MessageData { trigger_mode: mode, ..Default::default() }.port_layout(),
        ];
        for layout in layouts {
            assert_eq!(layout.inputs.len(), inputs);
            assert_eq!(layout.outputs.len(), 1);
        }
    }

    #[test]
    fn test_trigger_mode_toggle() {
        assert_eq!(TriggerMode::Scheduled.toggled(), TriggerMode::Conditional);
        assert_eq!(TriggerMode::Conditional.toggled(), TriggerMode::Scheduled);
    }

    #[test]
    fn test_header_shows_schedule() {
        let email = EmailData {
            scheduled_at: Some(GameTime::new(1, Weekday::Tuesday, 10, 0)),
            subject: "Quarterly numbers".to_string(),
            ..Default::default()
        };
        assert_eq!(email.header_label(), "Email @ W1 Tue 10:00");

        let conditional = EmailData {
            trigger_mode: TriggerMode::Conditional,
            ..Default::default()
        };
        assert_eq!(conditional.header_label(), "Email (on flow)");
    }

    #[test]
    fn test_meeting_end_time() {
        let meeting = MeetingData {
            scheduled_at: Some(GameTime::new(1, Weekday::Monday, 16, 30)),
            duration_minutes: 90,
            ..Default::default()
        };
        assert_eq!(meeting.ends_at(), Some(GameTime::new(1, Weekday::Monday, 18, 0)));
        assert_eq!(meeting.content_lines()[1], "90 min, until 18:00, 0 participant(s)");

        let unscheduled = MeetingData {
            duration_minutes: u32::MAX,
            ..Default::default()
        };
        assert!(unscheduled.ends_at().is_none());
        assert!(unscheduled.content_lines()[1].starts_with("4294967295 min, "));
    }

    #[test]
    fn test_task_patch_clears_deadline() {
        let mut task = TaskData {
            deadline: Some(GameTime::default()),
            ..Default::default()
        };
        task.apply(TaskPatch {
            deadline: Some(None),
            priority: Some(TaskPriority::Urgent),
            ..Default::default()
        });
        assert!(task.deadline.is_none());
        assert_eq!(task.priority, TaskPriority::Urgent);
    }

    #[test]
    fn test_message_output_label_tracks_response_flag() {
        let message = MessageData {
            requires_response: true,
            ..Default::default()
        };
        assert_eq!(message.port_layout().outputs[0].label.as_deref(), Some("Replied"));
    }
}
