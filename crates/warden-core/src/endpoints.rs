use crate::types::{ServerId, TaskId};

/// The single route table for the panel REST API.
///
/// Every path the SDK requests is built here from the configured API version,
/// so a new panel API generation only changes the prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    prefix: String,
}

impl Endpoints {
    pub fn new(api_version: &str) -> Self {
        let version = api_version.trim_matches('/');
        Self {
            prefix: format!("/api/{version}"),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn servers(&self) -> String {
        format!("{}/servers", self.prefix)
    }

    pub fn server(&self, server: &ServerId) -> String {
        format!("{}/servers/{}", self.prefix, seg(server.as_str()))
    }

    pub fn server_power(&self, server: &ServerId) -> String {
        format!("{}/power", self.server(server))
    }

    pub fn server_console(&self, server: &ServerId) -> String {
        format!("{}/console", self.server(server))
    }

    pub fn server_backups(&self, server: &ServerId) -> String {
        format!("{}/backups", self.server(server))
    }

    /// Scheduler summary (task counts).
    pub fn scheduler(&self, server: &ServerId) -> String {
        format!("{}/scheduler", self.server(server))
    }

    /// Task list (GET) and task creation (POST).
    pub fn tasks(&self, server: &ServerId) -> String {
        format!("{}/tasks", self.scheduler(server))
    }

    /// Full task document (GET), partial update (PUT) and removal (DELETE).
    pub fn task(&self, server: &ServerId, task: &TaskId) -> String {
        format!("{}/{}", self.tasks(server), seg(task.as_str()))
    }

    /// Immediate manual execution of a task.
    pub fn task_run(&self, server: &ServerId, task: &TaskId) -> String {
        format!("{}/run", self.task(server, task))
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_API_VERSION)
    }
}

fn seg(raw: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(raw)
}
