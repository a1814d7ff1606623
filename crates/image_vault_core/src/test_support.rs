//! In-memory doubles shared by the unit tests of this crate.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use github_client::{
    models::Repository, CommitSummary, ContentClient, EntryType, Error, FileCommit, Session,
    TreeEntry,
};

/// A request the mock client received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    VerifyAccess { owner: String, repo: String },
    ListFolder { folder: String },
    PutFile { path: String, content: String, message: String, branch: String },
    DeleteFile { path: String, sha: String, message: String },
}

/// Mock implementation of `ContentClient`.
///
/// Listing responses are queued and consumed in order; once the queue is empty
/// the last configured listing keeps being returned.
pub struct MockContentClient {
    verify_error: Mutex<Option<Error>>,
    listings: Mutex<VecDeque<Result<Vec<TreeEntry>, Error>>>,
    failing_uploads: Vec<String>,
    delete_error: Mutex<Option<Error>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockContentClient {
    pub fn new() -> Self {
        Self {
            verify_error: Mutex::new(None),
            listings: Mutex::new(VecDeque::new()),
            failing_uploads: Vec::new(),
            delete_error: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_verify_error(self, error: Error) -> Self {
        *self.verify_error.lock().unwrap() = Some(error);
        self
    }

    /// Makes every later access check fail with `error`.
    pub fn set_verify_error(&self, error: Error) {
        *self.verify_error.lock().unwrap() = Some(error);
    }

    pub fn with_listing(self, names: &[&str]) -> Self {
        let entries = names.iter().map(|name| file_entry(name)).collect();
        self.listings.lock().unwrap().push_back(Ok(entries));
        self
    }

    pub fn with_entries(self, entries: Vec<TreeEntry>) -> Self {
        self.listings.lock().unwrap().push_back(Ok(entries));
        self
    }

    pub fn with_listing_error(self, error: Error) -> Self {
        self.listings.lock().unwrap().push_back(Err(error));
        self
    }

    /// Makes uploads whose path contains `fragment` fail.
    pub fn with_failing_upload(mut self, fragment: &str) -> Self {
        self.failing_uploads.push(fragment.to_string());
        self
    }

    pub fn with_delete_error(self, error: Error) -> Self {
        *self.delete_error.lock().unwrap() = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn put_calls(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, RecordedCall::PutFile { .. }))
            .collect()
    }

    pub fn count_list_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RecordedCall::ListFolder { .. }))
            .count()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn file_entry(name: &str) -> TreeEntry {
    TreeEntry {
        name: name.to_string(),
        path: format!("images/{name}"),
        entry_type: EntryType::File,
        sha: format!("sha-{name}"),
        size: 100,
        download_url: Some(format!(
            "https://raw.githubusercontent.com/octocat/pictures/main/images/{name}"
        )),
    }
}

pub fn dir_entry(name: &str) -> TreeEntry {
    TreeEntry {
        name: name.to_string(),
        path: format!("images/{name}"),
        entry_type: EntryType::Dir,
        sha: format!("sha-{name}"),
        size: 0,
        download_url: None,
    }
}

fn commit() -> FileCommit {
    FileCommit {
        content: None,
        commit: CommitSummary {
            sha: "commit-sha".to_string(),
            message: None,
        },
    }
}

fn clone_error(error: &Error) -> Error {
    match error {
        Error::ApiError(msg) => Error::ApiError(msg.clone()),
        Error::AuthError(msg) => Error::AuthError(msg.clone()),
        Error::Network(msg) => Error::Network(msg.clone()),
        Error::NotFound => Error::NotFound,
        Error::RateLimitExceeded => Error::RateLimitExceeded,
        _ => Error::InvalidResponse,
    }
}

#[async_trait]
impl ContentClient for MockContentClient {
    async fn verify_access(&self, session: &Session) -> Result<Repository, Error> {
        self.record(RecordedCall::VerifyAccess {
            owner: session.owner.clone(),
            repo: session.repo.clone(),
        });
        match self.verify_error.lock().unwrap().as_ref() {
            Some(error) => Err(clone_error(error)),
            None => Ok(Repository::new(
                session.repo.clone(),
                session.full_name(),
                "main".to_string(),
                false,
            )),
        }
    }

    async fn list_folder(&self, _session: &Session, folder: &str) -> Result<Vec<TreeEntry>, Error> {
        self.record(RecordedCall::ListFolder {
            folder: folder.to_string(),
        });
        let mut listings = self.listings.lock().unwrap();
        let next = if listings.len() > 1 {
            listings.pop_front()
        } else {
            listings.front().map(|r| match r {
                Ok(entries) => Ok(entries.clone()),
                Err(e) => Err(clone_error(e)),
            })
        };
        next.unwrap_or(Err(Error::NotFound))
    }

    async fn put_file(
        &self,
        session: &Session,
        path: &str,
        content: &str,
        message: &str,
    ) -> Result<FileCommit, Error> {
        self.record(RecordedCall::PutFile {
            path: path.to_string(),
            content: content.to_string(),
            message: message.to_string(),
            branch: session.branch.clone(),
        });
        if self.failing_uploads.iter().any(|f| path.contains(f.as_str())) {
            return Err(Error::ApiError("Upload rejected".to_string()));
        }
        Ok(commit())
    }

    async fn delete_file(
        &self,
        _session: &Session,
        path: &str,
        sha: &str,
        message: &str,
    ) -> Result<FileCommit, Error> {
        self.record(RecordedCall::DeleteFile {
            path: path.to_string(),
            sha: sha.to_string(),
            message: message.to_string(),
        });
        match self.delete_error.lock().unwrap().as_ref() {
            Some(error) => Err(clone_error(error)),
            None => Ok(commit()),
        }
    }
}
