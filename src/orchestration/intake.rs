// File intake: normalizes user picks into a selection and routes it by count

use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::core::errors::{ClientError, ClientResult};
use crate::core::types::FileHandle;
use crate::orchestration::upload_orchestrator::{SubmitOutcome, UploadOrchestrator};

/// Where a selection came from (logging only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeSource {
    Drop,
    Chooser,
    Paths,
}

impl fmt::Display for IntakeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntakeSource::Drop => "drop",
            IntakeSource::Chooser => "chooser",
            IntakeSource::Paths => "paths",
        };
        f.write_str(name)
    }
}

/// Ordered files gathered from one user action
#[derive(Debug, Clone, Default)]
pub struct FileSelection {
    files: Vec<FileHandle>,
}

/// Which endpoint a selection goes to
#[derive(Debug, Clone)]
pub enum Dispatch {
    Single(FileHandle),
    Batch(Vec<FileHandle>),
}

impl FileSelection {
    pub fn new(files: impl IntoIterator<Item = FileHandle>) -> Self {
        Self {
            files: files.into_iter().collect(),
        }
    }

    /// Read every path in order. Fails on the first unreadable file.
    pub async fn from_paths<P: AsRef<Path>>(paths: &[P]) -> ClientResult<Self> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let handle = FileHandle::from_path(path)
                .await
                .map_err(|source| ClientError::ReadFailed {
                    path: path.display().to_string(),
                    source,
                })?;
            files.push(handle);
        }
        Ok(Self { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[FileHandle] {
        &self.files
    }

    /// One file goes to the single endpoint, more than one to the batch
    /// endpoint, none nowhere.
    pub fn into_dispatch(self) -> Option<Dispatch> {
        let mut files = self.files;
        match files.len() {
            0 => None,
            1 => files.pop().map(Dispatch::Single),
            _ => Some(Dispatch::Batch(files)),
        }
    }
}

/// Entry point the host drives with user file picks
#[derive(Clone)]
pub struct FileIntake {
    orchestrator: UploadOrchestrator,
}

impl FileIntake {
    pub fn new(orchestrator: UploadOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Forward picked files to the orchestrator. An empty pick is a no-op.
    pub async fn accept(
        &self,
        source: IntakeSource,
        files: Vec<FileHandle>,
    ) -> ClientResult<SubmitOutcome> {
        let selection = FileSelection::new(files);
        if selection.is_empty() {
            debug!("Ignoring empty {} selection", source);
            return Ok(SubmitOutcome::Ignored);
        }

        debug!("Accepted {} file(s) from {}", selection.len(), source);
        self.orchestrator.submit(selection).await
    }

    /// Read files from disk and forward them
    pub async fn accept_paths<P: AsRef<Path>>(&self, paths: &[P]) -> ClientResult<SubmitOutcome> {
        let selection = FileSelection::from_paths(paths).await?;
        self.accept(IntakeSource::Paths, selection.files).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::types::ViewState;
    use crate::render::RecordingRenderer;
    use crate::services::scripted::{processed, ScriptedService};
    use crate::utils::Metrics;
    use std::sync::Arc;

    fn handle(name: &str) -> FileHandle {
        FileHandle::new(name, vec![0u8; 16])
    }

    fn intake(service: Arc<ScriptedService>) -> FileIntake {
        let config = Config::from_vars(|_| None).unwrap();
        let orchestrator = UploadOrchestrator::new(
            &config,
            service,
            Arc::new(RecordingRenderer::new()),
            Metrics::new(),
        );
        FileIntake::new(orchestrator)
    }

    #[test]
    fn test_dispatch_by_cardinality() {
        assert!(FileSelection::new(Vec::new()).into_dispatch().is_none());

        match FileSelection::new(vec![handle("a.png")]).into_dispatch() {
            Some(Dispatch::Single(file)) => assert_eq!(file.name, "a.png"),
            other => panic!("expected single dispatch, got {:?}", other),
        }

        match FileSelection::new(vec![handle("a.png"), handle("b.png"), handle("a.png")])
            .into_dispatch()
        {
            Some(Dispatch::Batch(files)) => {
                let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
                assert_eq!(names, vec!["a.png", "b.png", "a.png"]);
            }
            other => panic!("expected batch dispatch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_selection_issues_no_request() {
        let service = Arc::new(ScriptedService::new());
        let intake = intake(service.clone());

        let outcome = intake.accept(IntakeSource::Drop, Vec::new()).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert!(service.calls().is_empty());
        assert_eq!(intake.orchestrator.view_state(), ViewState::Idle);
    }

    #[tokio::test]
    async fn test_single_file_issues_one_single_request() {
        let service = Arc::new(ScriptedService::new());
        service.push_upload(processed("a.png", "/p/a.png", 10));
        let intake = intake(service.clone());

        intake
            .accept(IntakeSource::Chooser, vec![handle("a.png")])
            .await
            .unwrap();

        assert_eq!(service.upload_calls().len(), 1);
        assert!(service.batch_calls().is_empty());
    }

    #[tokio::test]
    async fn test_paths_are_read_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.png");
        let second = dir.path().join("second.jpg");
        tokio::fs::write(&first, b"one").await.unwrap();
        tokio::fs::write(&second, b"three").await.unwrap();

        let selection = FileSelection::from_paths(&[&first, &second]).await.unwrap();

        let files = selection.files();
        assert_eq!(files[0].name, "first.png");
        assert_eq!(files[0].size, 3);
        assert_eq!(files[1].name, "second.jpg");
        assert_eq!(files[1].size, 5);
    }

    #[tokio::test]
    async fn test_unreadable_path_fails_before_any_request() {
        let service = Arc::new(ScriptedService::new());
        let intake = intake(service.clone());

        let err = intake
            .accept_paths(&["/definitely/not/here.png"])
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::ReadFailed { .. }));
        assert!(service.calls().is_empty());
    }
}
