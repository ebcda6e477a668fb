//! Messages exchanged between a coordinator and a worker

use crate::extractor::SearchRecord;
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A page to index: the rendered file and its canonical URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Path of the rendered HTML file
    pub path: PathBuf,

    /// URL the page is served under
    pub url: String,
}

impl Task {
    /// Create a task
    pub fn new(path: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
        }
    }
}

/// A message sent by a worker while processing a task.
///
/// Each task produces zero or more `Record` messages followed by exactly one
/// `Finished`. On the wire these are `[true, <record>]` and `[null, 0|1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    /// A record extracted from the page
    Record(SearchRecord),

    /// The task is done
    Finished {
        /// Whether at least one record was produced
        produced: bool,
    },
}

impl WorkerMessage {
    /// Whether this message terminates a task
    pub fn is_finished(&self) -> bool {
        matches!(self, WorkerMessage::Finished { .. })
    }
}

impl Serialize for WorkerMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        match self {
            WorkerMessage::Record(record) => {
                tuple.serialize_element(&true)?;
                tuple.serialize_element(record)?;
            }
            WorkerMessage::Finished { produced } => {
                tuple.serialize_element(&Option::<bool>::None)?;
                tuple.serialize_element(&u8::from(*produced))?;
            }
        }
        tuple.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::PageRecord;
    use serde_json::json;

    #[test]
    fn test_task_json() {
        let task: Task =
            serde_json::from_str(r#"{"path": "build/docs/intro/index.html", "url": "/docs/intro"}"#)
                .unwrap();

        assert_eq!(task, Task::new("build/docs/intro/index.html", "/docs/intro"));
    }

    #[test]
    fn test_null_means_shutdown() {
        let message: Option<Task> = serde_json::from_str("null").unwrap();
        assert!(message.is_none());
    }

    #[test]
    fn test_message_wire_shape() {
        let record = SearchRecord::Page(PageRecord {
            title: "T".to_string(),
            section_ref: "#".to_string(),
            url: "/t".to_string(),
            content: "c".to_string(),
            keywords: String::new(),
            version: None,
        });

        let data = serde_json::to_value(WorkerMessage::Record(record)).unwrap();
        assert_eq!(data[0], json!(true));
        assert_eq!(data[1]["type"], 0);
        assert_eq!(data[1]["title"], "T");

        let done = serde_json::to_string(&WorkerMessage::Finished { produced: true }).unwrap();
        assert_eq!(done, "[null,1]");
        let empty = serde_json::to_string(&WorkerMessage::Finished { produced: false }).unwrap();
        assert_eq!(empty, "[null,0]");
    }
}
