//! Live datapack reloads against both releases

use cmdapi_nms::{v1_15_r1, v1_16_r1, ReloadCoordinator, ReloadError, ReloadState, VersionAdapter};
use mchost::brigadier::CommandNode;
use mchost::{CommandListenerWrapper, MinecraftServer, ResourceLocation};
use std::path::Path;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

fn servers() -> Vec<(Arc<dyn MinecraftServer>, Arc<dyn VersionAdapter>)> {
    vec![
        (
            mchost::v1_15_r1::DedicatedServer::start() as Arc<dyn MinecraftServer>,
            v1_15_r1::Adapter::shared(),
        ),
        (
            mchost::v1_16_r1::DedicatedServer::start() as Arc<dyn MinecraftServer>,
            v1_16_r1::Adapter::shared(),
        ),
    ]
}

fn write_pack(root: &Path, function_body: &str) {
    let functions = root.join("data/demo/functions");
    let tags = root.join("data/minecraft/tags/functions");
    std::fs::create_dir_all(&functions).unwrap();
    std::fs::create_dir_all(&tags).unwrap();
    std::fs::write(functions.join("greet.mcfunction"), function_body).unwrap();
    std::fs::write(tags.join("load.json"), r#"{"values":["demo:greet"]}"#).unwrap();
}

fn greet() -> ResourceLocation {
    "demo:greet".parse().unwrap()
}

#[tokio::test]
async fn test_reload_swaps_in_new_functions() {
    for (server, adapter) in servers() {
        let pack = tempfile::tempdir().unwrap();
        write_pack(pack.path(), "say hello\n");
        server.core().set_datapack_dirs(vec![pack.path().to_path_buf()]);

        let coordinator = ReloadCoordinator::new();
        let report = coordinator
            .run(adapter.reload(Arc::clone(&server)).unwrap())
            .await
            .unwrap();

        assert_eq!(report.release, adapter.release());
        assert_eq!((report.functions, report.tags), (1, 1));
        assert_eq!(coordinator.state(), ReloadState::Committed);

        let live = adapter.live_state(server.as_ref()).unwrap();
        assert_eq!(live.functions.function_ids(), vec![greet()]);
        // the previous resource manager was closed
        assert_eq!(server.core().resource_handles().open_handles(), 1);
    }
}

#[tokio::test]
async fn test_sealed_fields_stay_sealed_after_commit() {
    let server = mchost::v1_16_r1::DedicatedServer::start();
    let pack = tempfile::tempdir().unwrap();
    write_pack(pack.path(), "say hello\n");
    server.core().set_datapack_dirs(vec![pack.path().to_path_buf()]);

    let adapter = v1_16_r1::Adapter::shared();
    let report = ReloadCoordinator::new()
        .run(adapter.reload(server.clone()).unwrap())
        .await
        .unwrap();
    assert!(report.sealed);

    let resources = server.data_pack_resources();
    assert!(resources.function_manager.is_sealed());
    assert!(resources.command_dispatcher.is_sealed());
    assert!(resources.resource_manager.is_sealed());
    assert!(Arc::ptr_eq(
        &resources.command_dispatcher.get(),
        server.vanilla_command_dispatcher()
    ));
}

#[tokio::test]
async fn test_failed_bind_keeps_previous_state() {
    for (server, adapter) in servers() {
        let before = adapter.live_state(server.as_ref()).unwrap();
        let pack = tempfile::tempdir().unwrap();
        write_pack(pack.path(), "say hello\nnot_a_command 1 2 3\n");
        server.core().set_datapack_dirs(vec![pack.path().to_path_buf()]);

        let coordinator = ReloadCoordinator::new();
        let err = coordinator
            .run(adapter.reload(Arc::clone(&server)).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, ReloadError::Bind(_)), "{:?}", err);
        assert!(err.is_recoverable());
        assert_eq!(coordinator.state(), ReloadState::Failed);

        let after = adapter.live_state(server.as_ref()).unwrap();
        assert!(Arc::ptr_eq(&before.functions, &after.functions));
        assert!(Arc::ptr_eq(&before.dispatcher, &after.dispatcher));
        // the manager opened for the failed attempt was released
        assert_eq!(server.core().resource_handles().open_handles(), 1);
    }
}

#[tokio::test]
async fn test_malformed_tag_fails_to_load() {
    for (server, adapter) in servers() {
        let pack = tempfile::tempdir().unwrap();
        write_pack(pack.path(), "say hello\n");
        std::fs::write(
            pack.path().join("data/minecraft/tags/functions/load.json"),
            "{ not json",
        )
        .unwrap();
        server.core().set_datapack_dirs(vec![pack.path().to_path_buf()]);

        let err = ReloadCoordinator::new()
            .run(adapter.reload(Arc::clone(&server)).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ReloadError::Load(_)), "{:?}", err);
        assert_eq!(server.core().resource_handles().open_handles(), 1);
    }
}

#[tokio::test]
async fn test_reloaded_functions_can_call_plugin_commands() {
    for (server, adapter) in servers() {
        let hits = Arc::new(AtomicI32::new(0));
        let counter = Arc::clone(&hits);
        adapter
            .brigadier_dispatcher(server.as_ref())
            .unwrap()
            .register(CommandNode::literal("ping").executes(move |_| {
                Ok(counter.fetch_add(1, Ordering::SeqCst) + 1)
            }));

        let pack = tempfile::tempdir().unwrap();
        write_pack(pack.path(), "ping\nping\n");
        server.core().set_datapack_dirs(vec![pack.path().to_path_buf()]);
        ReloadCoordinator::new()
            .run(adapter.reload(Arc::clone(&server)).unwrap())
            .await
            .unwrap();

        let source = Arc::new(CommandListenerWrapper::console(Arc::clone(&server)));
        server
            .command_dispatcher()
            .execute("function demo:greet", source)
            .unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2, "{}", adapter.release());
    }
}

#[tokio::test]
async fn test_reload_after_failure_succeeds() {
    for (server, adapter) in servers() {
        let pack = tempfile::tempdir().unwrap();
        write_pack(pack.path(), "not_a_command\n");
        server.core().set_datapack_dirs(vec![pack.path().to_path_buf()]);

        let coordinator = ReloadCoordinator::new();
        assert!(coordinator
            .run(adapter.reload(Arc::clone(&server)).unwrap())
            .await
            .is_err());

        write_pack(pack.path(), "say fixed\n");
        coordinator
            .run(adapter.reload(Arc::clone(&server)).unwrap())
            .await
            .unwrap();
        let live = adapter.live_state(server.as_ref()).unwrap();
        assert_eq!(live.functions.function_ids(), vec![greet()]);
        assert_eq!(server.core().resource_handles().open_handles(), 1);
    }
}
