//! The command engine: tree, parser and dispatcher
//!
//! Both releases share this engine; what changes between them is the set of
//! argument types registered on it and how parse results are read back.

mod context;
mod dispatcher;
mod error;
mod node;
mod reader;
mod suggestion;

pub use context::{CommandContext, ParsedArgument, ParsedValue};
pub use dispatcher::{CommandDispatcher, ParseResults};
pub use error::{CommandError, CommandSyntaxError};
pub use node::{ArgumentType, Command, CommandNode, NodeKind, Requirement};
pub use reader::StringReader;
pub use suggestion::{
    matches_resource, matches_sub_str, suggest_resources, SuggestionProvider, Suggestions,
    SuggestionsBuilder,
};
