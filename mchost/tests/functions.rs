use mchost::functions::FunctionLibrary;
use mchost::resources::{DataPackContents, ReloadableResourceManager};
use mchost::v1_16_r1::DedicatedServer;
use mchost::{MinecraftServer, ResourceLocation};
use std::sync::Arc;

fn write_pack(root: &std::path::Path) {
    let functions = root.join("data/demo/functions");
    let tags = root.join("data/minecraft/tags/functions");
    std::fs::create_dir_all(&functions).unwrap();
    std::fs::create_dir_all(&tags).unwrap();
    std::fs::write(functions.join("greet.mcfunction"), "say hello\nsay world\n").unwrap();
    std::fs::write(functions.join("outer.mcfunction"), "function demo:greet\n").unwrap();
    std::fs::write(tags.join("load.json"), r#"{"values":["demo:outer"]}"#).unwrap();
}

#[tokio::test]
async fn test_loaded_functions_run_through_the_function_command() {
    let dir = tempfile::tempdir().unwrap();
    write_pack(dir.path());

    let server = DedicatedServer::start();
    let manager = ReloadableResourceManager::open(server.core().resource_handles());
    let contents = manager
        .reload(vec![dir.path().to_path_buf()])
        .await
        .unwrap()
        .unwrap();

    let resources = server.data_pack_resources();
    let library = Arc::new(FunctionLibrary::new(
        Arc::clone(server.vanilla_command_dispatcher()),
        resources.function_permission_level(),
    ));
    library
        .bind(&contents, Arc::new(server.get_server_command_listener()))
        .unwrap();
    resources.function_manager.unseal().set(library).unwrap();

    let source = Arc::new(server.get_server_command_listener());
    let ran = server
        .command_dispatcher()
        .execute("function #minecraft:load", source)
        .unwrap();
    assert_eq!(ran, 1);

    let messages = server.core().messages();
    assert!(messages.contains(&"[Server] hello".to_string()));
    assert!(messages.contains(&"[Server] world".to_string()));
}

#[test]
fn test_unparsable_line_fails_bind() {
    let server = DedicatedServer::start();
    let mut contents = DataPackContents::default();
    contents.functions.insert(
        ResourceLocation::new("demo", "broken"),
        vec!["nosuchcommand 1 2".to_string()],
    );
    let library = FunctionLibrary::new(Arc::clone(server.vanilla_command_dispatcher()), 2);
    let err = library
        .bind(&contents, Arc::new(server.get_server_command_listener()))
        .unwrap_err();
    assert!(err.to_string().contains("demo:broken"));
    assert!(library.function_ids().is_empty());
}

#[test]
fn test_tag_with_unknown_entry_fails_bind() {
    let server = DedicatedServer::start();
    let mut contents = DataPackContents::default();
    contents.function_tags.insert(
        ResourceLocation::minecraft("tick"),
        vec!["demo:missing".to_string()],
    );
    let library = FunctionLibrary::new(Arc::clone(server.vanilla_command_dispatcher()), 2);
    assert!(library
        .bind(&contents, Arc::new(server.get_server_command_listener()))
        .is_err());
}
