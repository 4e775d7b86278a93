//! The facade plugins hold on to

use crate::build_info;
use crate::command::{CommandSpec, Executor, Invocation, ParsedArgs};
use crate::config::Config;
use crate::error::{CommandError, StartupError};
use cmdapi_nms::{
    active, bind_active, native_provider, AdapterError, AdapterRegistry, ExtractError,
    ReloadCoordinator, ReloadError, ReloadReport, ReloadState, VersionAdapter,
};
use cmdapi_wrappers::{ArgumentKind, ArgumentValue, ParseFailure};
use mchost::brigadier::{CommandContext, CommandError as HostError, CommandNode};
use mchost::{CommandListenerWrapper, MinecraftServer};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Kinds taken out of service after an adapter error during execution
#[derive(Debug, Default)]
pub struct KindHealth {
    disabled: RwLock<HashSet<ArgumentKind>>,
}

impl KindHealth {
    pub fn is_disabled(&self, kind: ArgumentKind) -> bool {
        self.disabled.read().contains(&kind)
    }

    pub fn disabled(&self) -> Vec<ArgumentKind> {
        self.disabled.read().iter().copied().collect()
    }

    fn disable(&self, kind: ArgumentKind, cause: &AdapterError) {
        if self.disabled.write().insert(kind) {
            tracing::error!(
                kind = %kind,
                error = %cause,
                "Argument kind disabled; commands declaring it will fail"
            );
        }
    }
}

/// Extract every declared argument, refusing kinds already out of service
fn read_arguments<F>(
    health: &KindHealth,
    declared: &[(String, ArgumentKind)],
    mut extract: F,
) -> Result<ParsedArgs, CommandError>
where
    F: FnMut(ArgumentKind, &str) -> Result<ArgumentValue, ExtractError>,
{
    if let Some(kind) = declared
        .iter()
        .map(|(_, kind)| *kind)
        .find(|kind| health.is_disabled(*kind))
    {
        return Err(CommandError::KindUnusable { kind });
    }

    let mut args = ParsedArgs::with_capacity(declared.len());
    for (key, kind) in declared {
        match extract(*kind, key) {
            Ok(value) => args.push(key.clone(), value),
            Err(ExtractError::Syntax(failure)) => return Err(failure.into()),
            Err(ExtractError::Adapter(source)) => {
                health.disable(*kind, &source);
                return Err(CommandError::Extract {
                    key: key.clone(),
                    kind: *kind,
                    source,
                });
            }
        }
    }
    Ok(args)
}

/// Recover a plugin error that travelled through the server's dispatcher
fn from_host(err: HostError) -> CommandError {
    match err {
        HostError::Syntax(e) => CommandError::Parse(ParseFailure::new(e.to_string())),
        HostError::Other(boxed) => match boxed.downcast::<CommandError>() {
            Ok(err) => *err,
            Err(other) => CommandError::Failed(other.to_string()),
        },
        HostError::Failed(message) => CommandError::Failed(message),
        other => ExtractError::from(other).into(),
    }
}

struct Inner {
    server: Arc<dyn MinecraftServer>,
    adapter: Arc<dyn VersionAdapter>,
    config: Config,
    health: Arc<KindHealth>,
    reloads: Arc<ReloadCoordinator>,
    registered: RwLock<Vec<String>>,
}

/// Registration, execution and datapack reloads for one server
///
/// Cloning is cheap; clones share state.
#[derive(Clone)]
pub struct CommandApi {
    inner: Arc<Inner>,
}

impl CommandApi {
    /// Resolve the adapter for `server` and bind it for the whole process
    ///
    /// Starting again in the same process reuses the bound adapter as long
    /// as it drives the same release.
    pub fn start(server: Arc<dyn MinecraftServer>, config: Config) -> Result<Self, StartupError> {
        let resolved = AdapterRegistry::builtin().resolve_bukkit(&server.bukkit_version())?;
        let release = resolved.release();
        let adapter = match bind_active(resolved) {
            Ok(adapter) => adapter,
            Err(AdapterError::AlreadyBound(bound)) if bound == release => active()?,
            Err(e) => return Err(e.into()),
        };
        Self::new(server, adapter, config)
    }

    /// Use `adapter` for `server` without touching the process-wide binding
    pub fn new(
        server: Arc<dyn MinecraftServer>,
        adapter: Arc<dyn VersionAdapter>,
        config: Config,
    ) -> Result<Self, StartupError> {
        // fails with WrongServer when the adapter drives another release
        adapter.brigadier_dispatcher(server.as_ref())?;
        if !config.datapack_dirs.is_empty() {
            server.core().set_datapack_dirs(config.datapack_dirs.clone());
        }
        tracing::info!(
            release = adapter.release(),
            "{}",
            build_info::startup_banner(server.version(), adapter.release())
        );

        let reloads = ReloadCoordinator::for_server(server.as_ref());
        Ok(Self {
            inner: Arc::new(Inner {
                server,
                adapter,
                config,
                health: Arc::new(KindHealth::default()),
                reloads,
                registered: RwLock::new(Vec::new()),
            }),
        })
    }

    pub fn server(&self) -> &Arc<dyn MinecraftServer> {
        &self.inner.server
    }

    pub fn adapter(&self) -> &Arc<dyn VersionAdapter> {
        &self.inner.adapter
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn kind_health(&self) -> &KindHealth {
        &self.inner.health
    }

    /// Names of the commands registered through this instance
    pub fn registered(&self) -> Vec<String> {
        self.inner.registered.read().clone()
    }

    /// Register `spec` on the server's dispatcher
    ///
    /// Every argument kind must be satisfiable by the adapter; otherwise
    /// nothing is registered and the error is fatal.
    pub fn register(&self, spec: CommandSpec) -> Result<(), StartupError> {
        let adapter = &self.inner.adapter;
        let executor = spec
            .executor
            .clone()
            .ok_or_else(|| StartupError::NoExecutor(spec.name.clone()))?;

        let mut seen = HashSet::new();
        if let Some((key, _)) = spec.arguments.iter().find(|(key, _)| !seen.insert(key)) {
            return Err(StartupError::DuplicateArgument {
                command: spec.name.clone(),
                key: key.clone(),
            });
        }

        let mut nodes = Vec::with_capacity(spec.arguments.len());
        for (key, kind) in &spec.arguments {
            let parser = adapter
                .parser(*kind)
                .map_err(|source| StartupError::Register {
                    command: spec.name.clone(),
                    source,
                })?;
            let mut node = CommandNode::argument(key.clone(), parser.into_native());
            if let Some(provider) = kind.suggestions() {
                node = node.suggests(native_provider(Arc::clone(adapter), provider));
            }
            nodes.push(node);
        }

        let command = self.command_for(&spec, executor);
        let mut tail: Option<CommandNode> = None;
        for node in nodes.into_iter().rev() {
            tail = Some(match tail {
                Some(child) => node.then(child),
                None => node.executes_command(Arc::clone(&command)),
            });
        }
        let mut root = CommandNode::literal(spec.name.clone());
        root = match tail {
            Some(child) => root.then(child),
            None => root.executes_command(command),
        };
        if let Some(level) = spec.permission {
            root = root.requires(move |source: &CommandListenerWrapper| source.has_permission(level));
        }

        adapter
            .brigadier_dispatcher(self.inner.server.as_ref())?
            .register(root);
        self.inner.registered.write().push(spec.name.clone());
        tracing::info!(
            command = %spec.name,
            release = adapter.release(),
            kinds = ?spec.kinds().map(|k| k.name()).collect::<Vec<_>>(),
            "Registered command"
        );

        if self.inner.config.create_dispatcher_json {
            self.write_dispatcher_file()?;
        }
        Ok(())
    }

    fn command_for(
        &self,
        spec: &CommandSpec,
        executor: Executor,
    ) -> mchost::brigadier::Command {
        let adapter = Arc::clone(&self.inner.adapter);
        let health = Arc::clone(&self.inner.health);
        let name = spec.name.clone();
        let declared = spec.arguments.clone();

        Arc::new(move |ctx: &CommandContext| {
            let run = || -> Result<i32, CommandError> {
                let args = read_arguments(&health, &declared, |kind, key| {
                    adapter.extract(kind, ctx, key)
                })?;
                let invocation = Invocation {
                    command: name.clone(),
                    sender: adapter.sender_for_command(ctx)?,
                    args,
                    source: ctx.source_arc(),
                };
                executor(&invocation)
            };
            run().map_err(|e| {
                tracing::debug!(command = %name, error = %e, "Command failed");
                HostError::Other(Box::new(e))
            })
        })
    }

    /// Run `input` against the live dispatcher as `source`
    pub fn execute(
        &self,
        input: &str,
        source: Arc<CommandListenerWrapper>,
    ) -> Result<i32, CommandError> {
        self.inner
            .server
            .command_dispatcher()
            .execute(input, source)
            .map_err(from_host)
    }

    pub fn execute_as_console(&self, input: &str) -> Result<i32, CommandError> {
        self.execute(input, Arc::new(self.console()))
    }

    pub fn console(&self) -> CommandListenerWrapper {
        CommandListenerWrapper::console(Arc::clone(&self.inner.server))
    }

    /// Completions for the last word of `input`
    pub fn suggestions(&self, input: &str, source: Arc<CommandListenerWrapper>) -> Vec<String> {
        let input = input.strip_prefix('/').unwrap_or(input);
        self.inner
            .server
            .command_dispatcher()
            .completion_suggestions(input, source)
            .texts()
            .to_vec()
    }

    /// Rebuild datapack functions and tags
    ///
    /// One reload runs at a time per server, across every `CommandApi` over it.
    pub async fn reload_datapacks(&self) -> Result<ReloadReport, ReloadError> {
        let steps = self.inner.adapter.reload(Arc::clone(&self.inner.server))?;
        self.inner.reloads.run(steps).await
    }

    pub fn reload_state(&self) -> ReloadState {
        self.inner.reloads.state()
    }

    pub fn last_reload(&self) -> Option<ReloadReport> {
        self.inner.reloads.last_report()
    }

    /// Write the dispatcher tree to the configured path
    pub fn write_dispatcher_file(&self) -> Result<PathBuf, AdapterError> {
        let path = self.inner.config.dispatcher_json_path.clone();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| AdapterError::DispatcherFile {
                path: path.clone(),
                source,
            })?;
        }
        self.inner
            .adapter
            .create_dispatcher_file(self.inner.server.as_ref(), &path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mchost::brigadier::CommandSyntaxError;

    fn declared() -> Vec<(String, ArgumentKind)> {
        vec![
            ("ticks".to_string(), ArgumentKind::Time),
            ("slot".to_string(), ArgumentKind::ScoreboardSlot),
        ]
    }

    #[test]
    fn test_adapter_error_disables_kind() {
        let health = KindHealth::default();
        let err = read_arguments(&health, &declared(), |kind, _| match kind {
            ArgumentKind::Time => Ok(ArgumentValue::Time(20)),
            _ => Err(AdapterError::Unmapped("display slot 42".into()).into()),
        })
        .unwrap_err();

        assert!(matches!(
            err,
            CommandError::Extract { ref key, kind: ArgumentKind::ScoreboardSlot, .. } if key == "slot"
        ));
        assert!(health.is_disabled(ArgumentKind::ScoreboardSlot));
        assert!(!health.is_disabled(ArgumentKind::Time));

        // later commands fail before anything is extracted
        let mut calls = 0;
        let err = read_arguments(&health, &declared(), |_, _| {
            calls += 1;
            Ok(ArgumentValue::Time(1))
        })
        .unwrap_err();
        assert!(matches!(
            err,
            CommandError::KindUnusable {
                kind: ArgumentKind::ScoreboardSlot
            }
        ));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_syntax_error_does_not_disable() {
        let health = KindHealth::default();
        let err = read_arguments(&health, &declared(), |_, _| {
            Err(ParseFailure::new("Invalid unit").into())
        })
        .unwrap_err();
        assert!(err.is_user_error());
        assert!(health.disabled().is_empty());
    }

    #[test]
    fn test_host_errors_map_back() {
        let err = from_host(HostError::Other(Box::new(CommandError::KindUnusable {
            kind: ArgumentKind::Sound,
        })));
        assert!(matches!(err, CommandError::KindUnusable { kind: ArgumentKind::Sound }));

        let err = from_host(CommandSyntaxError::new("command.unknown.command", "Unknown command").into());
        assert!(matches!(err, CommandError::Parse(ref f) if f.reason().contains("Unknown command")));

        let err = from_host(HostError::NoSuchArgument("pos".into()));
        assert!(matches!(err, CommandError::Adapter(AdapterError::MissingArgument(_))));
    }
}
