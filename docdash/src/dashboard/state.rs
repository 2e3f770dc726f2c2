use std::fmt;

/// Reachability badge for the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerStatus {
    /// No health check has resolved yet.
    #[default]
    Checking,
    Online,
    Offline,
}

impl ServerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerStatus::Checking => "checking",
            ServerStatus::Online => "online",
            ServerStatus::Offline => "offline",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            ServerStatus::Checking => "🟡 Checking...",
            ServerStatus::Online => "🟢 Online",
            ServerStatus::Offline => "🔴 Offline",
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-initiated actions that go through the shared loading flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Upload,
    ProcessExisting,
    Query,
    Delete,
    Search,
    LoadExamples,
}

impl Action {
    /// Label shown on the triggering control while the request is in flight.
    pub fn busy_label(&self) -> &'static str {
        match self {
            Action::Upload | Action::ProcessExisting | Action::Delete => "Processing...",
            Action::Query => "Querying...",
            Action::Search => "Searching...",
            Action::LoadExamples => "Loading...",
        }
    }
}

/// `idle → in-flight → {succeeded | failed}`; the next action starts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    InFlight(Action),
    Succeeded(Action),
    Failed(Action),
}

/// What a handler did with the user's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Failed local validation; nothing was sent.
    Rejected,
    /// The user declined confirmation; nothing was sent.
    Cancelled,
    Succeeded,
    Failed,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }
}

/// Colour of the inline message banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

impl Tone {
    /// Only messages carrying the success marker are shown as successes.
    pub fn of(message: &str) -> Self {
        if message.contains('✅') {
            Tone::Success
        } else {
            Tone::Error
        }
    }
}
