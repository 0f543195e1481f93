//! One level of a cascading dropdown (brand -> series -> model).

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Items of one dropdown plus the parent selection they were loaded for.
///
/// Every load gets a ticket; only the answer to the latest ticket is applied,
/// so a slow reply for a previous parent never fills the list of the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionLevel {
    state: LoadState,
    items: Vec<String>,
    parent: Option<String>,
    ticket: u64,
}

impl OptionLevel {
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Parent cleared: back to an empty, idle list. Pending loads are voided.
    pub fn reset(&mut self) {
        self.ticket += 1;
        self.state = LoadState::Idle;
        self.items.clear();
        self.parent = None;
    }

    /// Parent changed to `parent`: clear the list and start loading.
    pub fn begin(&mut self, parent: &str) -> u64 {
        self.ticket += 1;
        self.state = LoadState::Loading;
        self.items.clear();
        self.parent = Some(parent.to_string());
        self.ticket
    }

    /// Apply a load result. Returns `false` when `ticket` was superseded.
    pub fn finish(&mut self, ticket: u64, result: Result<Vec<String>, String>) -> bool {
        if ticket != self.ticket {
            tracing::debug!(ticket, latest = self.ticket, "dropping superseded option load");
            return false;
        }
        match result {
            Ok(items) => {
                self.items = items;
                self.state = LoadState::Loaded;
            },
            Err(message) => {
                self.items.clear();
                self.state = LoadState::Failed(message);
            },
        }
        true
    }

    /// Fill the list from another source (e.g. the dashboard payload).
    pub fn replace(&mut self, items: Vec<String>) {
        self.ticket += 1;
        self.items = items;
        self.state = LoadState::Loaded;
    }
}
