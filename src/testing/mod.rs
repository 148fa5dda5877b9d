//! In-memory storage double for unit and integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::database::{DatabaseError, Row, Storage};
use crate::query::ParameterizedStatement;

type Reply = Result<Vec<Row>, DatabaseError>;

/// Replays queued replies in order and records every statement it receives.
/// An exhausted queue answers with no rows.
#[derive(Default)]
pub struct ScriptedStorage {
    replies: Mutex<VecDeque<Reply>>,
    executed: Mutex<Vec<ParameterizedStatement>>,
}

impl ScriptedStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues rows given as JSON objects. Non-object values are skipped.
    pub fn reply(&self, rows: Vec<Value>) -> &Self {
        let rows = rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        self.push(Ok(rows));
        self
    }

    pub fn reply_empty(&self) -> &Self {
        self.push(Ok(Vec::new()));
        self
    }

    pub fn fail(&self, err: DatabaseError) -> &Self {
        self.push(Err(err));
        self
    }

    fn push(&self, reply: Reply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    pub fn executed(&self) -> Vec<ParameterizedStatement> {
        self.executed.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<ParameterizedStatement> {
        self.executed().pop()
    }
}

#[async_trait]
impl Storage for ScriptedStorage {
    async fn execute(&self, statement: &ParameterizedStatement) -> Result<Vec<Row>, DatabaseError> {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(statement.clone());
        }
        let next = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        next.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
