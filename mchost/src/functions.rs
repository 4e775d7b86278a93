//! Datapack functions and function tags, compiled against one dispatcher

use crate::brigadier::{CommandDispatcher, CommandSyntaxError};
use crate::resources::DataPackContents;
use crate::source::CommandListenerWrapper;
use crate::ResourceLocation;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Nested `function` calls deeper than this are dropped
const MAX_CALL_DEPTH: usize = 64;

#[derive(Debug, Error)]
pub enum FunctionError {
    #[error("Whilst parsing command on line {line} of {function}: {source}")]
    Unparsable {
        function: ResourceLocation,
        line: usize,
        #[source]
        source: CommandSyntaxError,
    },

    #[error("Couldn't load tag {tag} as it references unknown {entry}")]
    UnknownTagEntry { tag: ResourceLocation, entry: String },
}

/// One function: its id and the command lines it runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomFunction {
    id: ResourceLocation,
    lines: Vec<String>,
}

impl CustomFunction {
    pub fn id(&self) -> &ResourceLocation {
        &self.id
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Functions and tags bound to the dispatcher their lines parse against
pub struct FunctionLibrary {
    dispatcher: Arc<CommandDispatcher>,
    permission_level: i32,
    functions: RwLock<BTreeMap<ResourceLocation, Arc<CustomFunction>>>,
    tags: RwLock<BTreeMap<ResourceLocation, Vec<Arc<CustomFunction>>>>,
    depth: AtomicUsize,
}

impl fmt::Debug for FunctionLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionLibrary")
            .field("permission_level", &self.permission_level)
            .field("functions", &self.functions.read().len())
            .field("tags", &self.tags.read().len())
            .finish()
    }
}

impl FunctionLibrary {
    pub fn new(dispatcher: Arc<CommandDispatcher>, permission_level: i32) -> Self {
        Self {
            dispatcher,
            permission_level,
            functions: RwLock::new(BTreeMap::new()),
            tags: RwLock::new(BTreeMap::new()),
            depth: AtomicUsize::new(0),
        }
    }

    pub fn dispatcher(&self) -> &Arc<CommandDispatcher> {
        &self.dispatcher
    }

    pub fn permission_level(&self) -> i32 {
        self.permission_level
    }

    /// Compile `contents` and replace everything this library holds
    ///
    /// Every line must parse against the dispatcher and every tag entry must
    /// name a known function or tag; on error nothing is replaced.
    pub fn bind(
        &self,
        contents: &DataPackContents,
        source: Arc<CommandListenerWrapper>,
    ) -> Result<(), FunctionError> {
        let source = Arc::new(source.with_permission(self.permission_level));
        let mut functions = BTreeMap::new();
        for (id, lines) in &contents.functions {
            for (index, line) in lines.iter().enumerate() {
                self.dispatcher
                    .parse(line, Arc::clone(&source))
                    .map_err(|source| FunctionError::Unparsable {
                        function: id.clone(),
                        line: index + 1,
                        source,
                    })?;
            }
            functions.insert(
                id.clone(),
                Arc::new(CustomFunction {
                    id: id.clone(),
                    lines: lines.clone(),
                }),
            );
        }

        let mut tags = BTreeMap::new();
        for tag in contents.function_tags.keys() {
            let mut resolved = Vec::new();
            let mut visiting = BTreeSet::new();
            resolve_tag(tag, contents, &functions, &mut visiting, &mut resolved)?;
            tags.insert(tag.clone(), resolved);
        }

        tracing::debug!(
            functions = functions.len(),
            tags = tags.len(),
            "Functions bound"
        );
        *self.functions.write() = functions;
        *self.tags.write() = tags;
        Ok(())
    }

    pub fn get(&self, id: &ResourceLocation) -> Option<Arc<CustomFunction>> {
        self.functions.read().get(id).cloned()
    }

    pub fn tag(&self, id: &ResourceLocation) -> Option<Vec<Arc<CustomFunction>>> {
        self.tags.read().get(id).cloned()
    }

    /// Function ids in library order
    pub fn function_ids(&self) -> Vec<ResourceLocation> {
        self.functions.read().keys().cloned().collect()
    }

    /// Tag ids in library order
    pub fn tag_ids(&self) -> Vec<ResourceLocation> {
        self.tags.read().keys().cloned().collect()
    }

    /// Run every line of `function`; returns how many lines succeeded
    pub fn execute(&self, function: &CustomFunction, source: &CommandListenerWrapper) -> i32 {
        if self.depth.fetch_add(1, Ordering::SeqCst) >= MAX_CALL_DEPTH {
            self.depth.fetch_sub(1, Ordering::SeqCst);
            tracing::warn!(function = %function.id, "Function call depth exceeded");
            return 0;
        }
        let source = Arc::new(source.with_permission(self.permission_level));
        let mut succeeded = 0;
        for line in &function.lines {
            match self.dispatcher.execute(line, Arc::clone(&source)) {
                Ok(_) => succeeded += 1,
                Err(e) => {
                    tracing::debug!(function = %function.id, line = %line, error = %e, "Function line failed")
                }
            }
        }
        self.depth.fetch_sub(1, Ordering::SeqCst);
        succeeded
    }
}

fn resolve_tag(
    tag: &ResourceLocation,
    contents: &DataPackContents,
    functions: &BTreeMap<ResourceLocation, Arc<CustomFunction>>,
    visiting: &mut BTreeSet<ResourceLocation>,
    out: &mut Vec<Arc<CustomFunction>>,
) -> Result<(), FunctionError> {
    if !visiting.insert(tag.clone()) {
        return Ok(());
    }
    let entries = contents.function_tags.get(tag).map(Vec::as_slice).unwrap_or_default();
    for entry in entries {
        let unknown = || FunctionError::UnknownTagEntry {
            tag: tag.clone(),
            entry: entry.clone(),
        };
        if let Some(nested) = entry.strip_prefix('#') {
            let nested: ResourceLocation = nested.parse().map_err(|_| unknown())?;
            if !contents.function_tags.contains_key(&nested) {
                return Err(unknown());
            }
            resolve_tag(&nested, contents, functions, visiting, out)?;
        } else {
            let id: ResourceLocation = entry.parse().map_err(|_| unknown())?;
            let function = functions.get(&id).ok_or_else(unknown)?;
            if !out.iter().any(|f| f.id == id) {
                out.push(Arc::clone(function));
            }
        }
    }
    Ok(())
}
