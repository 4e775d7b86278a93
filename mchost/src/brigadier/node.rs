//! Command tree nodes

use super::{
    CommandContext, CommandError, CommandSyntaxError, ParsedValue, StringReader,
    SuggestionProvider, Suggestions, SuggestionsBuilder,
};
use crate::source::CommandListenerWrapper;
use serde_json::{json, Map, Value};
use std::sync::Arc;

pub type Command = Arc<dyn Fn(&CommandContext) -> Result<i32, CommandError> + Send + Sync>;

pub type Requirement = Arc<dyn Fn(&CommandListenerWrapper) -> bool + Send + Sync>;

/// Parses one argument out of a command line
pub trait ArgumentType: Send + Sync {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError>;

    /// Registry id of this parser, e.g. `minecraft:block_pos`
    fn id(&self) -> &'static str;

    /// Parser properties as they appear in the dispatcher dump
    fn properties(&self) -> Option<Value> {
        None
    }

    fn examples(&self) -> &'static [&'static str] {
        &[]
    }

    fn list_suggestions(&self, _ctx: &CommandContext, builder: SuggestionsBuilder) -> Suggestions {
        builder.build()
    }
}

#[derive(Clone)]
pub enum NodeKind {
    Root,
    Literal(String),
    Argument {
        name: String,
        parser: Arc<dyn ArgumentType>,
        suggestions: Option<SuggestionProvider>,
    },
}

#[derive(Clone)]
pub struct CommandNode {
    kind: NodeKind,
    children: Vec<CommandNode>,
    command: Option<Command>,
    requirement: Option<Requirement>,
}

impl CommandNode {
    pub fn root() -> Self {
        Self::with_kind(NodeKind::Root)
    }

    pub fn literal(name: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Literal(name.into()))
    }

    pub fn argument(name: impl Into<String>, parser: Arc<dyn ArgumentType>) -> Self {
        Self::with_kind(NodeKind::Argument {
            name: name.into(),
            parser,
            suggestions: None,
        })
    }

    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            command: None,
            requirement: None,
        }
    }

    pub fn then(mut self, child: CommandNode) -> Self {
        self.add_child(child);
        self
    }

    pub fn executes<F>(mut self, command: F) -> Self
    where
        F: Fn(&CommandContext) -> Result<i32, CommandError> + Send + Sync + 'static,
    {
        self.command = Some(Arc::new(command));
        self
    }

    pub fn executes_command(mut self, command: Command) -> Self {
        self.command = Some(command);
        self
    }

    pub fn requires<F>(mut self, requirement: F) -> Self
    where
        F: Fn(&CommandListenerWrapper) -> bool + Send + Sync + 'static,
    {
        self.requirement = Some(Arc::new(requirement));
        self
    }

    /// Attach a custom suggestion provider; ignored on literals
    pub fn suggests(mut self, provider: SuggestionProvider) -> Self {
        if let NodeKind::Argument { suggestions, .. } = &mut self.kind {
            *suggestions = Some(provider);
        }
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn name(&self) -> &str {
        match &self.kind {
            NodeKind::Root => "",
            NodeKind::Literal(name) => name,
            NodeKind::Argument { name, .. } => name,
        }
    }

    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children.iter().find(|c| c.name() == name)
    }

    pub fn command(&self) -> Option<&Command> {
        self.command.as_ref()
    }

    pub fn is_executable(&self) -> bool {
        self.command.is_some()
    }

    pub fn can_use(&self, source: &CommandListenerWrapper) -> bool {
        self.requirement.as_ref().map_or(true, |req| req(source))
    }

    /// Add a child, merging it into an existing child of the same name
    pub fn add_child(&mut self, node: CommandNode) {
        match self.children.iter_mut().find(|c| c.name() == node.name()) {
            Some(existing) => {
                if node.command.is_some() {
                    existing.command = node.command;
                }
                if node.requirement.is_some() {
                    existing.requirement = node.requirement;
                }
                for grandchild in node.children {
                    existing.add_child(grandchild);
                }
            }
            None => self.children.push(node),
        }
    }

    pub fn remove_child(&mut self, name: &str) -> bool {
        let before = self.children.len();
        self.children.retain(|c| c.name() != name);
        self.children.len() != before
    }

    /// Literal children matching the next word, or all argument children
    pub(crate) fn relevant_children(&self, reader: &StringReader<'_>) -> Vec<&CommandNode> {
        let remaining = reader.remaining();
        let word = remaining.split(' ').next().unwrap_or_default();
        let literal = self
            .children
            .iter()
            .find(|c| matches!(&c.kind, NodeKind::Literal(name) if name == word));
        match literal {
            Some(node) => vec![node],
            None => self
                .children
                .iter()
                .filter(|c| matches!(c.kind, NodeKind::Argument { .. }))
                .collect(),
        }
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        match &self.kind {
            NodeKind::Root => {
                obj.insert("type".into(), json!("root"));
            }
            NodeKind::Literal(_) => {
                obj.insert("type".into(), json!("literal"));
            }
            NodeKind::Argument { parser, .. } => {
                obj.insert("type".into(), json!("argument"));
                obj.insert("parser".into(), json!(parser.id()));
                if let Some(props) = parser.properties() {
                    obj.insert("properties".into(), props);
                }
            }
        }
        if !self.children.is_empty() {
            let children: Map<String, Value> = self
                .children
                .iter()
                .map(|c| (c.name().to_string(), c.to_json()))
                .collect();
            obj.insert("children".into(), Value::Object(children));
        }
        if self.is_executable() {
            obj.insert("executable".into(), json!(true));
        }
        Value::Object(obj)
    }
}
