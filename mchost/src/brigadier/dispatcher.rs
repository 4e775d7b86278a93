use super::{
    Command, CommandContext, CommandError, CommandNode, CommandSyntaxError, NodeKind,
    ParsedArgument, StringReader, Suggestions, SuggestionsBuilder,
};
use crate::source::CommandListenerWrapper;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

const ARGUMENT_SEPARATOR: char = ' ';

/// A successfully parsed command, ready to run
pub struct ParseResults {
    context: CommandContext,
    command: Command,
}

impl ParseResults {
    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    pub fn execute(&self) -> Result<i32, CommandError> {
        (self.command)(&self.context)
    }
}

type Arguments = HashMap<String, ParsedArgument>;

/// The command tree and the parse/execute entry points over it
pub struct CommandDispatcher {
    root: RwLock<CommandNode>,
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self {
            root: RwLock::new(CommandNode::root()),
        }
    }

    /// Register a top-level node, merging with any existing node of that name
    pub fn register(&self, node: CommandNode) {
        self.root.write().add_child(node);
    }

    pub fn unregister(&self, name: &str) -> bool {
        self.root.write().remove_child(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.root.read().child(name).is_some()
    }

    pub fn command_names(&self) -> Vec<String> {
        self.root
            .read()
            .children()
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    pub fn parse(
        &self,
        input: &str,
        source: Arc<CommandListenerWrapper>,
    ) -> Result<ParseResults, CommandSyntaxError> {
        let reader = StringReader::new(input);
        let (arguments, command) = {
            let root = self.root.read();
            parse_nodes(&root, &reader, &source, &Arguments::new())?
        };
        Ok(ParseResults {
            context: CommandContext::new(source, input, arguments),
            command,
        })
    }

    /// Parse and run a command; the tree lock is released before the executor runs
    pub fn execute(
        &self,
        input: &str,
        source: Arc<CommandListenerWrapper>,
    ) -> Result<i32, CommandError> {
        let input = input.strip_prefix('/').unwrap_or(input);
        self.parse(input, source)?.execute()
    }

    /// Completions for the last word of `input`
    pub fn completion_suggestions(
        &self,
        input: &str,
        source: Arc<CommandListenerWrapper>,
    ) -> Suggestions {
        let split = input.rfind(ARGUMENT_SEPARATOR).map_or(0, |i| i + 1);
        let root = self.root.read();
        let Some((node, arguments)) = walk_to(&root, &StringReader::new(&input[..split]), &source)
        else {
            return Suggestions::empty();
        };
        let ctx = CommandContext::new(Arc::clone(&source), input, arguments);
        let mut result = Suggestions::empty();
        for child in node.children() {
            if !child.can_use(&source) {
                continue;
            }
            let builder = SuggestionsBuilder::new(input, split);
            let suggestions = match child.kind() {
                NodeKind::Literal(name) if name.starts_with(builder.remaining()) => {
                    builder.suggest(name.clone()).build()
                }
                NodeKind::Argument {
                    suggestions: Some(provider),
                    ..
                } => provider(&ctx, builder),
                NodeKind::Argument { parser, .. } => parser.list_suggestions(&ctx, builder),
                _ => continue,
            };
            result = result.merge(suggestions);
        }
        result
    }

    pub fn to_json(&self) -> Value {
        self.root.read().to_json()
    }
}

fn keep_furthest(best: &mut Option<CommandSyntaxError>, err: CommandSyntaxError) {
    let replace = match best {
        Some(current) => err.cursor().unwrap_or(0) >= current.cursor().unwrap_or(0),
        None => true,
    };
    if replace {
        *best = Some(err);
    }
}

fn unknown_command(reader: &StringReader<'_>) -> CommandSyntaxError {
    reader.error(
        "command.unknown.command",
        "Unknown or incomplete command, see below for error",
    )
}

/// Consume one node's worth of input, recording argument values
fn parse_node(
    node: &CommandNode,
    reader: &mut StringReader<'_>,
    arguments: &mut Arguments,
) -> Result<(), CommandSyntaxError> {
    let start = reader.cursor();
    match node.kind() {
        NodeKind::Root => {}
        NodeKind::Literal(name) => {
            if !reader.remaining().starts_with(name.as_str()) {
                return Err(reader.error("command.unknown.argument", "Incorrect argument for command"));
            }
            reader.set_cursor(start + name.len());
        }
        NodeKind::Argument { name, parser, .. } => {
            let value = parser.parse(reader)?;
            arguments.insert(
                name.clone(),
                ParsedArgument {
                    start,
                    end: reader.cursor(),
                    value,
                },
            );
        }
    }
    if reader.can_read() && reader.peek() != Some(ARGUMENT_SEPARATOR) {
        return Err(reader.error(
            "command.expected.separator",
            "Expected whitespace to end one argument, but found trailing data",
        ));
    }
    Ok(())
}

fn parse_nodes(
    node: &CommandNode,
    reader: &StringReader<'_>,
    source: &CommandListenerWrapper,
    arguments: &Arguments,
) -> Result<(Arguments, Command), CommandSyntaxError> {
    let mut best: Option<CommandSyntaxError> = None;
    for child in node.relevant_children(reader) {
        if !child.can_use(source) {
            continue;
        }
        let mut r = reader.clone();
        let mut args = arguments.clone();
        if let Err(e) = parse_node(child, &mut r, &mut args) {
            keep_furthest(&mut best, e);
            continue;
        }
        if r.can_read() {
            r.skip();
            match parse_nodes(child, &r, source, &args) {
                Ok(found) => return Ok(found),
                Err(e) => keep_furthest(&mut best, e),
            }
        } else if let Some(command) = child.command() {
            return Ok((args, Arc::clone(command)));
        } else {
            keep_furthest(&mut best, unknown_command(&r));
        }
    }
    Err(best.unwrap_or_else(|| unknown_command(reader)))
}

/// Follow `reader` through the tree; the node whose children come next
fn walk_to<'n>(
    node: &'n CommandNode,
    reader: &StringReader<'_>,
    source: &CommandListenerWrapper,
) -> Option<(&'n CommandNode, Arguments)> {
    fn walk<'n>(
        node: &'n CommandNode,
        reader: &StringReader<'_>,
        source: &CommandListenerWrapper,
        arguments: Arguments,
    ) -> Option<(&'n CommandNode, Arguments)> {
        if !reader.can_read() {
            return Some((node, arguments));
        }
        for child in node.relevant_children(reader) {
            if !child.can_use(source) {
                continue;
            }
            let mut r = reader.clone();
            let mut args = arguments.clone();
            if parse_node(child, &mut r, &mut args).is_err() {
                continue;
            }
            r.skip();
            if let Some(found) = walk(child, &r, source, args) {
                return Some(found);
            }
        }
        None
    }
    walk(node, reader, source, Arguments::new())
}
