//! Endpoint catalogue and lookup.
//!
//! # Responsibilities
//! - Name every backend operation the dashboard uses
//! - Compile configured templates into an immutable lookup table
//! - Return an explicit miss for unknown keys

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::endpoints::template::{EndpointTemplate, TemplateError};

/// Logical operations exposed by the review backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    CommentsList,
    CommentsCreate,
    CommentsDetail,
    CommentsUpdate,
    CommentsDelete,
    CommentsImport,
    CommentsExport,
    DetectionSingle,
    DetectionBatch,
    DetectionRealtime,
    DetectionCluster,
    AnalysisUser,
    AnalysisCluster,
    AnalysisReport,
    SystemUsers,
    SystemTasks,
    SystemSettings,
    SystemLogs,
}

impl Endpoint {
    pub const ALL: [Endpoint; 19] = [
        Endpoint::Health,
        Endpoint::CommentsList,
        Endpoint::CommentsCreate,
        Endpoint::CommentsDetail,
        Endpoint::CommentsUpdate,
        Endpoint::CommentsDelete,
        Endpoint::CommentsImport,
        Endpoint::CommentsExport,
        Endpoint::DetectionSingle,
        Endpoint::DetectionBatch,
        Endpoint::DetectionRealtime,
        Endpoint::DetectionCluster,
        Endpoint::AnalysisUser,
        Endpoint::AnalysisCluster,
        Endpoint::AnalysisReport,
        Endpoint::SystemUsers,
        Endpoint::SystemTasks,
        Endpoint::SystemSettings,
        Endpoint::SystemLogs,
    ];

    /// Key used in configuration and in `ApiClient::request`.
    pub fn key(self) -> &'static str {
        match self {
            Endpoint::Health => "health",
            Endpoint::CommentsList => "comments.list",
            Endpoint::CommentsCreate => "comments.create",
            Endpoint::CommentsDetail => "comments.detail",
            Endpoint::CommentsUpdate => "comments.update",
            Endpoint::CommentsDelete => "comments.delete",
            Endpoint::CommentsImport => "comments.import",
            Endpoint::CommentsExport => "comments.export",
            Endpoint::DetectionSingle => "detection.single",
            Endpoint::DetectionBatch => "detection.batch",
            Endpoint::DetectionRealtime => "detection.realtime",
            Endpoint::DetectionCluster => "detection.cluster",
            Endpoint::AnalysisUser => "analysis.user",
            Endpoint::AnalysisCluster => "analysis.cluster",
            Endpoint::AnalysisReport => "analysis.report",
            Endpoint::SystemUsers => "system.users",
            Endpoint::SystemTasks => "system.tasks",
            Endpoint::SystemSettings => "system.settings",
            Endpoint::SystemLogs => "system.logs",
        }
    }

    /// Built-in path template.
    pub fn default_template(self) -> &'static str {
        match self {
            Endpoint::Health => "/health",
            Endpoint::CommentsList | Endpoint::CommentsCreate => "/comments",
            Endpoint::CommentsDetail | Endpoint::CommentsUpdate | Endpoint::CommentsDelete => {
                "/comments/:id"
            }
            Endpoint::CommentsImport => "/comments/import",
            Endpoint::CommentsExport => "/comments/export",
            Endpoint::DetectionSingle => "/detect/single",
            Endpoint::DetectionBatch => "/detect/batch",
            Endpoint::DetectionRealtime => "/detect/realtime",
            Endpoint::DetectionCluster => "/detect/cluster",
            Endpoint::AnalysisUser => "/analysis/user",
            Endpoint::AnalysisCluster => "/analysis/cluster",
            Endpoint::AnalysisReport => "/analysis/report",
            Endpoint::SystemUsers => "/system/users",
            Endpoint::SystemTasks => "/system/tasks",
            Endpoint::SystemSettings => "/system/settings",
            Endpoint::SystemLogs => "/system/logs",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Compiled, immutable map of endpoint key → template.
#[derive(Debug, Clone, Default)]
pub struct EndpointTable {
    templates: HashMap<String, EndpointTemplate>,
}

impl EndpointTable {
    /// Compile a key → template map. Fails on the first malformed template.
    pub fn compile(raw: &BTreeMap<String, String>) -> Result<Self, (String, TemplateError)> {
        let mut templates = HashMap::with_capacity(raw.len());
        for (key, template) in raw {
            let parsed = EndpointTemplate::parse(template).map_err(|e| (key.clone(), e))?;
            templates.insert(key.clone(), parsed);
        }
        Ok(Self { templates })
    }

    pub fn get(&self, key: &str) -> Option<&EndpointTemplate> {
        self.templates.get(key)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
