// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT

#[derive(Debug, Clone, PartialEq)]
pub enum ControlPlaneEvent {
    /// A remote call is about to be issued.
    Request { operation: String, target: String },
    /// A remote call, or a sequence of calls, completed.
    Completed { operation: String, target: String },
    /// An operation failed, the error is passed on to the caller.
    Failed { operation: String, target: String, error: String },
    /// Unconditional wait, e.g., for a role to propagate.
    Waiting { reason: String, duration: std::time::Duration },
}

pub trait EventProcessor: Send {
    fn handle(&mut self, event: &ControlPlaneEvent, event_tags: &std::collections::BTreeMap<String, String>);
}

/// Forwards the events to the `log` facade.
pub struct EventLogger {}

fn format_tags(tags: &std::collections::BTreeMap<String, String>) -> String {
    tags.iter().map(|(k, v)| format!("{}={}", k, v)).collect::<Vec<String>>().join(",")
}

impl EventProcessor for EventLogger {
    fn handle(&mut self, event: &ControlPlaneEvent, event_tags: &std::collections::BTreeMap<String, String>) {
        let tags = format_tags(event_tags);
        match event {
            ControlPlaneEvent::Request { operation, target } => log::info!("[{}] {} {}", tags, operation, target),
            ControlPlaneEvent::Completed { operation, target } => log::info!("[{}] {} {} completed", tags, operation, target),
            ControlPlaneEvent::Failed { operation, target, error } => log::error!("[{}] error in {} {}: {}", tags, operation, target, error),
            ControlPlaneEvent::Waiting { reason, duration } => log::info!("[{}] waiting {} s for {}", tags, duration.as_secs_f64(), reason),
        }
    }
}

/// Process-scoped handle through which the components report what they do.
///
/// Cloning a handle shares the processing chain, forking it also adds tags
/// that are attached to every event observed through the child.
#[derive(Clone)]
pub struct EventHandle {
    handle_tags: std::collections::BTreeMap<String, String>,
    chain: std::sync::Arc<std::sync::Mutex<Vec<Box<dyn EventProcessor>>>>,
}

impl EventHandle {
    pub fn new(processors: Vec<Box<dyn EventProcessor>>) -> Self {
        Self {
            handle_tags: std::collections::BTreeMap::new(),
            chain: std::sync::Arc::new(std::sync::Mutex::new(processors)),
        }
    }

    /// Handle that only logs.
    pub fn logger() -> Self {
        Self::new(vec![Box::new(EventLogger {})])
    }

    pub fn observe(&self, event: ControlPlaneEvent) {
        match self.chain.lock() {
            Ok(mut chain) => {
                for processor in chain.iter_mut() {
                    processor.handle(&event, &self.handle_tags);
                }
            }
            Err(_) => log::warn!("event processing chain poisoned, dropping event: {:?}", event),
        }
    }

    /// Observe the outcome of a remote call and pass the result on unchanged.
    pub fn report<T, E: std::fmt::Display>(&self, operation: &str, target: &str, res: Result<T, E>) -> Result<T, E> {
        match &res {
            Ok(_) => self.observe(ControlPlaneEvent::Completed {
                operation: operation.to_string(),
                target: target.to_string(),
            }),
            Err(err) => self.observe(ControlPlaneEvent::Failed {
                operation: operation.to_string(),
                target: target.to_string(),
                error: err.to_string(),
            }),
        }
        res
    }

    pub fn fork(&self, child_tags: std::collections::BTreeMap<String, String>) -> EventHandle {
        let mut child_tags = child_tags;
        let mut merged_tags = self.handle_tags.clone();
        merged_tags.append(&mut child_tags);
        EventHandle {
            handle_tags: merged_tags,
            chain: self.chain.clone(),
        }
    }

    pub fn tags(&self) -> &std::collections::BTreeMap<String, String> {
        &self.handle_tags
    }
}
