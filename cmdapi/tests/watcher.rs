//! Datapack directory watching

use cmdapi::{CommandApi, Config, DatapackWatcher, ReloadState, WatcherConfig};
use cmdapi_nms::v1_16_r1;
use mchost::{MinecraftServer, ResourceLocation};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn api_for(pack: &Path) -> CommandApi {
    let config = Config {
        datapack_dirs: vec![pack.to_path_buf()],
        ..Config::default()
    };
    CommandApi::new(
        mchost::v1_16_r1::DedicatedServer::start(),
        v1_16_r1::Adapter::shared(),
        config,
    )
    .unwrap()
}

fn function_ids(api: &CommandApi) -> Vec<ResourceLocation> {
    api.server().function_library().function_ids()
}

/// Poll until `check` holds or two seconds pass
async fn eventually(check: impl Fn() -> bool) -> bool {
    for _ in 0..40 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    check()
}

#[tokio::test]
async fn test_watcher_reloads_on_start() {
    let temp = TempDir::new().unwrap();
    let functions = temp.path().join("data/demo/functions");
    std::fs::create_dir_all(&functions).unwrap();
    std::fs::write(functions.join("greet.mcfunction"), "say hello\n").unwrap();

    let api = api_for(temp.path());
    let watcher = DatapackWatcher::new(api.clone(), vec![temp.path()], WatcherConfig::default())
        .await
        .unwrap();

    assert_eq!(function_ids(&api), vec!["demo:greet".parse::<ResourceLocation>().unwrap()]);
    assert_eq!(api.reload_state(), ReloadState::Committed);
    assert_eq!(watcher.directories(), &[temp.path().to_path_buf()]);
    watcher.shutdown().await;
}

#[tokio::test]
async fn test_watcher_reloads_after_changes() {
    let temp = TempDir::new().unwrap();
    let functions = temp.path().join("data/demo/functions");
    std::fs::create_dir_all(&functions).unwrap();

    let api = api_for(temp.path());
    let watcher = DatapackWatcher::new(
        api.clone(),
        vec![temp.path()],
        WatcherConfig {
            debounce: Duration::from_millis(100),
            reload_on_start: false,
        },
    )
    .await
    .unwrap();

    assert!(function_ids(&api).is_empty());
    assert_eq!(api.reload_state(), ReloadState::Idle);

    std::fs::write(functions.join("greet.mcfunction"), "say hello\n").unwrap();
    let greet: ResourceLocation = "demo:greet".parse().unwrap();
    assert!(eventually(|| function_ids(&api) == vec![greet.clone()]).await);

    // a broken edit keeps the last good functions live
    std::fs::write(functions.join("greet.mcfunction"), "not_a_command\n").unwrap();
    assert!(eventually(|| api.reload_state() == ReloadState::Failed).await);
    assert_eq!(function_ids(&api), vec![greet.clone()]);

    std::fs::write(functions.join("wave.mcfunction"), "say bye\n").unwrap();
    std::fs::write(functions.join("greet.mcfunction"), "say hello again\n").unwrap();
    assert!(eventually(|| function_ids(&api).len() == 2).await);

    watcher.shutdown().await;
}

#[tokio::test]
async fn test_missing_directory_is_skipped() {
    let temp = TempDir::new().unwrap();
    let api = api_for(temp.path());
    let missing = temp.path().join("does-not-exist");

    let watcher = DatapackWatcher::new(
        api,
        vec![missing],
        WatcherConfig {
            reload_on_start: false,
            ..WatcherConfig::default()
        },
    )
    .await;
    assert!(watcher.is_ok());
}
