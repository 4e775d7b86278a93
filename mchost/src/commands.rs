//! The vanilla commands every release registers

use crate::arguments::{FunctionParser, FunctionRef, Message, MessageParser};
use crate::brigadier::{
    matches_resource, CommandContext, CommandDispatcher, CommandError, CommandNode,
    CommandSyntaxError, SuggestionProvider, SuggestionsBuilder,
};
use crate::functions::{CustomFunction, FunctionLibrary};
use std::sync::Arc;

/// Register `say` and `function` on `dispatcher`
pub fn register_vanilla(dispatcher: &CommandDispatcher) {
    dispatcher.register(
        CommandNode::literal("say")
            .requires(|source| source.has_permission(2))
            .then(
                CommandNode::argument("message", Arc::new(MessageParser)).executes(|ctx| {
                    let message = ctx.get_argument::<Message>("message")?;
                    let text = message.to_component(ctx.source()).contents();
                    ctx.source()
                        .send_message(format!("[{}] {}", ctx.source().name(), text));
                    Ok(1)
                }),
            ),
    );

    dispatcher.register(
        CommandNode::literal("function")
            .requires(|source| source.has_permission(2))
            .then(
                CommandNode::argument("name", Arc::new(FunctionParser))
                    .suggests(function_suggestions())
                    .executes(run_functions),
            ),
    );
}

/// `#tag` names, then function names, from the live library
fn function_suggestions() -> SuggestionProvider {
    Arc::new(|ctx: &CommandContext, builder: SuggestionsBuilder| {
        let library = ctx.source().server().function_library();
        let remaining = builder.remaining().to_string();
        let typed = remaining.strip_prefix('#').unwrap_or(&remaining);
        let mut builder = builder;
        for id in library.tag_ids() {
            if matches_resource(typed, &id) {
                builder = builder.suggest(format!("#{}", id));
            }
        }
        if !remaining.starts_with('#') {
            for id in library.function_ids() {
                if matches_resource(&remaining, &id) {
                    builder = builder.suggest(id.to_string());
                }
            }
        }
        builder.build()
    })
}

/// The functions a `function` argument names in `library`
pub fn resolve_functions(
    library: &FunctionLibrary,
    function: &FunctionRef,
) -> Result<Vec<Arc<CustomFunction>>, CommandSyntaxError> {
    match function {
        FunctionRef::Function(id) => library.get(id).map(|f| vec![f]).ok_or_else(|| {
            CommandSyntaxError::new(
                "arguments.function.unknown",
                format!("Unknown function {}", id),
            )
        }),
        FunctionRef::Tag(id) => library.tag(id).ok_or_else(|| {
            CommandSyntaxError::new(
                "arguments.function.tag.unknown",
                format!("Unknown function tag '{}'", id),
            )
        }),
    }
}

fn run_functions(ctx: &CommandContext) -> Result<i32, CommandError> {
    let function = ctx.get_argument::<FunctionRef>("name")?;
    let library = ctx.source().server().function_library();
    let mut total = 0;
    for f in resolve_functions(&library, function)? {
        total += library.execute(&f, ctx.source());
    }
    ctx.source()
        .send_message(format!("Executed {} commands from function(s)", total));
    Ok(total)
}
