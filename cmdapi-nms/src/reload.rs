//! Live datapack reload
//!
//! A reload rebuilds the function library against the server's current
//! dispatcher and swaps it in together with a fresh resource manager. Each
//! release supplies the steps ([`DatapackReload`]); [`ReloadCoordinator`]
//! runs them one reload at a time and rolls back on failure.
//!
//! ```text
//! Idle -> Patching -> Rebuilding -> Committed
//!            |            |
//!            +------------+--> Failed
//! ```

use crate::error::ReloadError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mchost::resources::{DataPackContents, ReloadableResourceManager};
use mchost::{MinecraftServer, ServerCore};
use parking_lot::RwLock;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock, Weak};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReloadState {
    Idle,
    Patching,
    Rebuilding,
    Committed,
    Failed,
}

impl fmt::Display for ReloadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Patching => "patching",
            Self::Rebuilding => "rebuilding",
            Self::Committed => "committed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What the patch step found on the live server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patched {
    pub function_permission_level: i32,
    /// Whether the live handles sit behind a sealed field
    pub sealed: bool,
}

/// What a commit swapped in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Committed {
    pub functions: usize,
    pub tags: usize,
}

/// One release's reload, split into the coordinator's steps
///
/// Steps run in order: `patch`, `rebuild`, `load`, `commit`. Only `commit`
/// writes to the server, and its function library write is the last thing
/// it does. If any step fails the coordinator calls `abort`, which must
/// release whatever this attempt opened.
#[async_trait]
pub trait DatapackReload: Send {
    fn release(&self) -> &'static str;

    /// Capture the live handles and stage the dispatcher to rebuild against
    fn patch(&mut self) -> Result<Patched, ReloadError>;

    /// Build the new function library and open a resource manager
    fn rebuild(&mut self) -> Result<(), ReloadError>;

    /// Read datapacks through the new resource manager
    async fn load(&mut self) -> Result<(), ReloadError>;

    /// Bind functions and swap the new handles in
    fn commit(&mut self) -> Result<Committed, ReloadError>;

    fn abort(&mut self);
}

/// Outcome of a committed reload
#[derive(Debug, Clone, PartialEq)]
pub struct ReloadReport {
    pub release: &'static str,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub sealed: bool,
    pub functions: usize,
    pub tags: usize,
}

/// Coordinators handed out by [`ReloadCoordinator::for_server`]
struct Shared {
    core: Weak<ServerCore>,
    coordinator: Weak<ReloadCoordinator>,
}

static SHARED: OnceLock<parking_lot::Mutex<Vec<Shared>>> = OnceLock::new();

/// Runs reloads one at a time
pub struct ReloadCoordinator {
    running: Mutex<()>,
    state: RwLock<ReloadState>,
    last_report: RwLock<Option<ReloadReport>>,
}

impl ReloadCoordinator {
    pub fn new() -> Self {
        Self {
            running: Mutex::new(()),
            state: RwLock::new(ReloadState::Idle),
            last_report: RwLock::new(None),
        }
    }

    /// The coordinator every caller reloading `server` goes through
    ///
    /// Servers are told apart by their core, so wrappers around one server
    /// share its coordinator. Entries go away with the last holder.
    pub fn for_server(server: &dyn MinecraftServer) -> Arc<Self> {
        let core = server.core();
        let mut shared = SHARED.get_or_init(Default::default).lock();
        shared.retain(|entry| entry.core.strong_count() > 0 && entry.coordinator.strong_count() > 0);

        let existing = shared
            .iter()
            .filter(|entry| std::ptr::eq(entry.core.as_ptr(), Arc::as_ptr(core)))
            .find_map(|entry| entry.coordinator.upgrade());
        if let Some(coordinator) = existing {
            return coordinator;
        }

        let coordinator = Arc::new(Self::new());
        shared.push(Shared {
            core: Arc::downgrade(core),
            coordinator: Arc::downgrade(&coordinator),
        });
        coordinator
    }

    pub fn state(&self) -> ReloadState {
        *self.state.read()
    }

    /// The report of the most recent committed reload
    pub fn last_report(&self) -> Option<ReloadReport> {
        self.last_report.read().clone()
    }

    /// Run `steps` to completion, waiting for any reload already running
    pub async fn run(&self, mut steps: Box<dyn DatapackReload>) -> Result<ReloadReport, ReloadError> {
        let _running = self.running.lock().await;
        let release = steps.release();
        let started_at = Utc::now();

        match self.drive(steps.as_mut()).await {
            Ok((patched, committed)) => {
                let report = ReloadReport {
                    release,
                    started_at,
                    finished_at: Utc::now(),
                    sealed: patched.sealed,
                    functions: committed.functions,
                    tags: committed.tags,
                };
                self.transition(release, ReloadState::Committed);
                tracing::info!(
                    release,
                    functions = report.functions,
                    tags = report.tags,
                    elapsed_ms = (report.finished_at - started_at).num_milliseconds(),
                    "Datapack reload committed"
                );
                *self.last_report.write() = Some(report.clone());
                Ok(report)
            }
            Err(e) => {
                steps.abort();
                self.transition(release, ReloadState::Failed);
                tracing::warn!(release, error = %e, "Datapack reload failed, previous state kept");
                Err(e)
            }
        }
    }

    async fn drive(
        &self,
        steps: &mut dyn DatapackReload,
    ) -> Result<(Patched, Committed), ReloadError> {
        let release = steps.release();
        self.transition(release, ReloadState::Patching);
        let patched = steps.patch()?;
        tracing::debug!(
            release,
            permission_level = patched.function_permission_level,
            sealed = patched.sealed,
            "Captured live handles"
        );

        self.transition(release, ReloadState::Rebuilding);
        steps.rebuild()?;
        steps.load().await?;
        let committed = steps.commit()?;
        Ok((patched, committed))
    }

    fn transition(&self, release: &'static str, next: ReloadState) {
        let previous = std::mem::replace(&mut *self.state.write(), next);
        tracing::debug!(release, from = %previous, state = %next, "Reload state");
    }
}

impl Default for ReloadCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the host's asynchronous reload on `manager` and wait for it
pub(crate) async fn load_packs(
    manager: &Arc<ReloadableResourceManager>,
    packs: Vec<PathBuf>,
) -> Result<DataPackContents, ReloadError> {
    match manager.reload(packs).await {
        Ok(Ok(contents)) => Ok(contents),
        Ok(Err(e)) => Err(ReloadError::Load(e)),
        Err(e) => Err(ReloadError::LoaderAborted(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdapterError;

    #[derive(Clone, Copy, PartialEq)]
    enum FailAt {
        Nowhere,
        Rebuild,
        Load,
    }

    struct Scripted {
        fail_at: FailAt,
        log: Arc<parking_lot::Mutex<Vec<&'static str>>>,
    }

    impl Scripted {
        fn step(&self, name: &'static str, fail: bool) -> Result<(), ReloadError> {
            self.log.lock().push(name);
            if fail {
                Err(ReloadError::LoaderAborted(format!("{} failed", name)))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl DatapackReload for Scripted {
        fn release(&self) -> &'static str {
            "test"
        }

        fn patch(&mut self) -> Result<Patched, ReloadError> {
            self.step("patch", false)?;
            Ok(Patched {
                function_permission_level: 2,
                sealed: true,
            })
        }

        fn rebuild(&mut self) -> Result<(), ReloadError> {
            self.step("rebuild", self.fail_at == FailAt::Rebuild)
        }

        async fn load(&mut self) -> Result<(), ReloadError> {
            tokio::task::yield_now().await;
            self.step("load", self.fail_at == FailAt::Load)
        }

        fn commit(&mut self) -> Result<Committed, ReloadError> {
            self.step("commit", false)?;
            Ok(Committed {
                functions: 3,
                tags: 1,
            })
        }

        fn abort(&mut self) {
            self.log.lock().push("abort");
        }
    }

    fn scripted(fail_at: FailAt) -> (Box<dyn DatapackReload>, Arc<parking_lot::Mutex<Vec<&'static str>>>) {
        let log = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let steps = Scripted {
            fail_at,
            log: Arc::clone(&log),
        };
        (Box::new(steps), log)
    }

    #[tokio::test]
    async fn test_successful_run_commits() {
        let coordinator = ReloadCoordinator::new();
        assert_eq!(coordinator.state(), ReloadState::Idle);

        let (steps, log) = scripted(FailAt::Nowhere);
        let report = coordinator.run(steps).await.unwrap();

        assert_eq!(*log.lock(), vec!["patch", "rebuild", "load", "commit"]);
        assert_eq!(coordinator.state(), ReloadState::Committed);
        assert_eq!(report.functions, 3);
        assert!(report.sealed);
        assert_eq!(coordinator.last_report(), Some(report));
    }

    #[tokio::test]
    async fn test_failed_load_aborts() {
        let coordinator = ReloadCoordinator::new();
        let (steps, log) = scripted(FailAt::Load);
        let err = coordinator.run(steps).await.unwrap_err();

        assert!(err.is_recoverable());
        assert_eq!(*log.lock(), vec!["patch", "rebuild", "load", "abort"]);
        assert_eq!(coordinator.state(), ReloadState::Failed);
        assert!(coordinator.last_report().is_none());
    }

    #[tokio::test]
    async fn test_failure_then_success() {
        let coordinator = ReloadCoordinator::new();
        let (steps, _) = scripted(FailAt::Rebuild);
        assert!(coordinator.run(steps).await.is_err());

        let (steps, _) = scripted(FailAt::Nowhere);
        assert!(coordinator.run(steps).await.is_ok());
        assert_eq!(coordinator.state(), ReloadState::Committed);
    }

    #[tokio::test]
    async fn test_concurrent_runs_do_not_interleave() {
        let coordinator = Arc::new(ReloadCoordinator::new());
        let log = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let make = || -> Box<dyn DatapackReload> {
            Box::new(Scripted {
                fail_at: FailAt::Nowhere,
                log: Arc::clone(&log),
            })
        };

        let (a, b) = tokio::join!(coordinator.run(make()), coordinator.run(make()));
        assert!(a.is_ok() && b.is_ok());
        let log = log.lock();
        assert_eq!(log.len(), 8);
        assert_eq!(&log[..4], &["patch", "rebuild", "load", "commit"]);
        assert_eq!(&log[4..], &["patch", "rebuild", "load", "commit"]);
    }

    #[test]
    fn test_one_coordinator_per_server() {
        let server = mchost::v1_16_r1::DedicatedServer::start();
        let other = mchost::v1_16_r1::DedicatedServer::start();

        let first = ReloadCoordinator::for_server(server.as_ref());
        let second = ReloadCoordinator::for_server(server.as_ref());
        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &ReloadCoordinator::for_server(other.as_ref())));

        // released with the last holder
        drop((first, second));
        let fresh = ReloadCoordinator::for_server(server.as_ref());
        assert_eq!(fresh.state(), ReloadState::Idle);
    }

    #[test]
    fn test_adapter_errors_are_not_recoverable() {
        let err: ReloadError = AdapterError::WrongServer {
            expected: "1.16.1",
            actual: "1.15.2",
        }
        .into();
        assert!(!err.is_recoverable());
    }
}
