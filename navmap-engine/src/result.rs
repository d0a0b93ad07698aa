use crate::error::{NavError, Result};
use crate::locate::SearchMode;
use crate::model::MenuTree;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub accepted: bool,
    pub reason: String,
    pub internal_ratio: f64,
}

impl Verdict {
    pub fn accepted(reason: impl Into<String>, internal_ratio: f64) -> Self {
        Self {
            accepted: true,
            reason: reason.into(),
            internal_ratio,
        }
    }

    pub fn rejected(reason: impl Into<String>, internal_ratio: f64) -> Self {
        Self {
            accepted: false,
            reason: reason.into(),
            internal_ratio,
        }
    }
}

/// How the navigation root was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub mode: SearchMode,
    /// `None` when a caller-supplied selector picked the root.
    pub score: Option<i32>,
    pub item_count: usize,
    pub container: String,
}

/// Everything one extraction produces. Holds no references into the
/// document, so it can outlive the parse and cross threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub base_url: String,
    pub tree: MenuTree,
    pub verdict: Verdict,
    pub detection: Detection,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub script_rendered: Vec<String>,
}

impl Extraction {
    pub fn is_accepted(&self) -> bool {
        self.verdict.accepted
    }

    pub fn into_accepted(self) -> Result<MenuTree> {
        if self.verdict.accepted {
            Ok(self.tree)
        } else {
            Err(NavError::Rejected(self.verdict.reason))
        }
    }
}
