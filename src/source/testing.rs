//! In-memory path sources for tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use futures_channel::oneshot;

use crate::source::{PathSetSource, ReferencePoint, SourceError};

pub fn unavailable() -> SourceError {
    SourceError::UnsuccessfulExecution {
        command: "git diff --name-only".to_string(),
        status: 128,
        stderr: "fatal: not a git repository".to_string(),
    }
}

/// Answers every call immediately from fixed data.
#[derive(Debug, Default)]
pub struct StaticSource {
    pub paths: RefCell<Vec<String>>,
    pub default_reference: String,
    pub branches: Vec<String>,
    pub failing: Cell<bool>,
    pub requested: RefCell<Vec<ReferencePoint>>,
}

impl StaticSource {
    pub fn with_paths(paths: &[&str]) -> Self {
        Self {
            paths: RefCell::new(paths.iter().map(|path| path.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn set_paths(&self, paths: &[&str]) {
        *self.paths.borrow_mut() = paths.iter().map(|path| path.to_string()).collect();
    }
}

impl PathSetSource for StaticSource {
    async fn list_changed_paths(
        &self,
        reference: &ReferencePoint,
    ) -> Result<Vec<String>, SourceError> {
        self.requested.borrow_mut().push(reference.clone());
        if self.failing.get() {
            return Err(unavailable());
        }
        Ok(self.paths.borrow().clone())
    }

    async fn detect_default_reference(&self) -> Result<String, SourceError> {
        if self.failing.get() {
            return Err(unavailable());
        }
        Ok(self.default_reference.clone())
    }

    async fn list_reference_points(&self) -> Result<Vec<String>, SourceError> {
        if self.failing.get() {
            return Err(unavailable());
        }
        Ok(self.branches.clone())
    }
}

/// Suspends every path listing until the test releases it, so refreshes can overlap.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    fetches: RefCell<VecDeque<oneshot::Receiver<Vec<String>>>>,
}

impl ScriptedSource {
    /// Prepares `count` listings; the n-th sender answers the n-th call.
    pub fn new(count: usize) -> (Self, Vec<oneshot::Sender<Vec<String>>>) {
        let (senders, receivers): (Vec<_>, VecDeque<_>) =
            (0..count).map(|_| oneshot::channel()).unzip();
        let source = Self {
            fetches: RefCell::new(receivers),
        };
        (source, senders)
    }
}

impl PathSetSource for ScriptedSource {
    async fn list_changed_paths(
        &self,
        _reference: &ReferencePoint,
    ) -> Result<Vec<String>, SourceError> {
        let receiver = self.fetches.borrow_mut().pop_front();
        match receiver {
            Some(receiver) => receiver.await.map_err(|_| unavailable()),
            None => Err(unavailable()),
        }
    }

    async fn detect_default_reference(&self) -> Result<String, SourceError> {
        Ok(String::new())
    }

    async fn list_reference_points(&self) -> Result<Vec<String>, SourceError> {
        Ok(Vec::new())
    }
}

pub fn paths(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|path| path.to_string()).collect()
}
