//! Datapack functions resolved from a function argument

use crate::{NamespacedKey, ParseFailure};
use std::fmt;
use std::sync::Arc;

/// Runs a resolved function against the live host
///
/// Implemented by each version adapter; the wrapper only holds it.
pub trait FunctionRunner: Send + Sync {
    /// Run the function, returning the number of commands that succeeded
    fn run(&self) -> Result<i32, ParseFailure>;
}

/// A function (or one member of a function tag) named in a command
#[derive(Clone)]
pub struct FunctionWrapper {
    key: NamespacedKey,
    commands: Vec<String>,
    runner: Arc<dyn FunctionRunner>,
}

impl FunctionWrapper {
    pub fn new(key: NamespacedKey, commands: Vec<String>, runner: Arc<dyn FunctionRunner>) -> Self {
        Self {
            key,
            commands,
            runner,
        }
    }

    pub fn key(&self) -> &NamespacedKey {
        &self.key
    }

    /// The command lines making up this function
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn run(&self) -> Result<i32, ParseFailure> {
        self.runner.run()
    }
}

impl fmt::Debug for FunctionWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionWrapper")
            .field("key", &self.key)
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

impl PartialEq for FunctionWrapper {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.commands == other.commands
    }
}
