//! Registering and running plugin commands on both releases

use cmdapi::{
    ArgumentKind, ArgumentValue, CommandApi, CommandError, CommandSpec, Config, EntitySelector,
    LocationType, Sender, StartupError,
};
use cmdapi_nms::{v1_15_r1, v1_16_r1, AdapterError, VersionAdapter};
use mchost::world::Vec3;
use mchost::MinecraftServer;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

fn apis(config: Config) -> Vec<CommandApi> {
    let pairs: Vec<(Arc<dyn MinecraftServer>, Arc<dyn VersionAdapter>)> = vec![
        (
            mchost::v1_15_r1::DedicatedServer::start() as Arc<dyn MinecraftServer>,
            v1_15_r1::Adapter::shared(),
        ),
        (
            mchost::v1_16_r1::DedicatedServer::start() as Arc<dyn MinecraftServer>,
            v1_16_r1::Adapter::shared(),
        ),
    ];
    pairs
        .into_iter()
        .map(|(server, adapter)| CommandApi::new(server, adapter, config.clone()).unwrap())
        .collect()
}

type Seen = Arc<Mutex<Vec<(Sender, Vec<(String, ArgumentValue)>)>>>;

/// A `tp <target> <destination>` command that records what it was given
fn tp(seen: &Seen) -> CommandSpec {
    let seen = Arc::clone(seen);
    CommandSpec::new("tp")
        .argument("target", ArgumentKind::EntitySelector(EntitySelector::OnePlayer))
        .argument("destination", ArgumentKind::Location(LocationType::BlockPosition))
        .executes(move |invocation| {
            let args = invocation
                .args()
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect();
            seen.lock().push((invocation.sender().clone(), args));
            Ok(1)
        })
}

#[test]
fn test_tp_nearest_player_to_block_position() {
    for api in apis(Config::default()) {
        api.server()
            .core()
            .spawn_player("Alex", Vec3::new(3.0, 64.0, 3.0));
        let seen = Seen::default();
        api.register(tp(&seen)).unwrap();

        assert_eq!(api.execute_as_console("/tp @p 10 64 -10").unwrap(), 1);

        let seen = seen.lock();
        let (sender, args) = &seen[0];
        assert_eq!(*sender, Sender::Console);
        match &args[0] {
            (key, ArgumentValue::Player(player)) => {
                assert_eq!(key, "target");
                assert_eq!(player.name, "Alex");
            }
            other => panic!("unexpected target {:?}", other),
        }
        let destination = args[1].1.as_location().unwrap();
        assert_eq!(
            (destination.x, destination.y, destination.z),
            (10.0, 64.0, -10.0)
        );
        assert_eq!(destination.world, "world");
    }
}

#[test]
fn test_ill_formed_position_is_a_parse_failure() {
    for api in apis(Config::default()) {
        api.server().core().spawn_player("Alex", Vec3::ZERO);
        let seen = Seen::default();
        api.register(tp(&seen)).unwrap();

        let err = api.execute_as_console("tp @p 10 sixty -10").unwrap_err();
        assert!(matches!(err, CommandError::Parse(_)), "{:?}", err);
        assert!(err.is_user_error());
        assert!(!err.to_string().is_empty());
        assert!(seen.lock().is_empty());
        assert!(api.kind_health().disabled().is_empty());
    }
}

#[test]
fn test_single_player_selector_without_players_fails() {
    for api in apis(Config::default()) {
        let seen = Seen::default();
        api.register(tp(&seen)).unwrap();

        let err = api.execute_as_console("tp @p 1 2 3").unwrap_err();
        assert!(matches!(err, CommandError::Parse(_)), "{:?}", err);
        assert!(seen.lock().is_empty());
    }
}

#[test]
fn test_many_selectors_without_matches_are_empty() {
    for api in apis(Config::default()) {
        let counts = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&counts);
        api.register(
            CommandSpec::new("heal")
                .argument("players", ArgumentKind::EntitySelector(EntitySelector::ManyPlayers))
                .argument("mobs", ArgumentKind::EntitySelector(EntitySelector::ManyEntities))
                .executes(move |invocation| {
                    let args = invocation.args();
                    let players = args.value("players")?.as_players().map(<[_]>::len);
                    let mobs = args.value("mobs")?.as_entities().map(<[_]>::len);
                    sink.lock().push((players, mobs));
                    Ok(0)
                }),
        )
        .unwrap();

        api.execute_as_console("heal @a @e[type=pig]").unwrap();
        assert_eq!(*counts.lock(), vec![(Some(0), Some(0))], "{}", api.adapter().release());
    }
}

#[test]
fn test_unsupported_kind_fails_registration() {
    for api in apis(Config::default()) {
        let result = api.register(
            CommandSpec::new("whois")
                .argument("id", ArgumentKind::Uuid)
                .executes(|_| Ok(1)),
        );
        let dispatcher = api.adapter().brigadier_dispatcher(api.server().as_ref()).unwrap();

        if api.adapter().release() == "1_15_R1" {
            match result {
                Err(StartupError::Register { command, source }) => {
                    assert_eq!(command, "whois");
                    assert!(matches!(
                        source,
                        AdapterError::UnsupportedKind {
                            kind: ArgumentKind::Uuid,
                            ..
                        }
                    ));
                }
                other => panic!("expected a registration failure, got {:?}", other),
            }
            assert!(!dispatcher.contains("whois"));
        } else {
            result.unwrap();
            assert!(dispatcher.contains("whois"));
        }
    }
}

#[test]
fn test_registration_rejects_incomplete_specs() {
    for api in apis(Config::default()) {
        let err = api.register(CommandSpec::new("noop")).unwrap_err();
        assert!(matches!(err, StartupError::NoExecutor(ref name) if name == "noop"));

        let err = api
            .register(
                CommandSpec::new("twice")
                    .argument("n", ArgumentKind::Time)
                    .argument("n", ArgumentKind::Time)
                    .executes(|_| Ok(1)),
            )
            .unwrap_err();
        assert!(matches!(err, StartupError::DuplicateArgument { ref key, .. } if key == "n"));
        assert!(api.registered().is_empty());
    }
}

#[test]
fn test_executor_failure_reaches_caller() {
    for api in apis(Config::default()) {
        api.register(
            CommandSpec::new("wait")
                .argument("duration", ArgumentKind::Time)
                .executes(|invocation| match invocation.args().value("duration")? {
                    ArgumentValue::Time(ticks) if *ticks > 100 => {
                        Err(CommandError::failed("Too long to wait"))
                    }
                    ArgumentValue::Time(ticks) => Ok(*ticks),
                    other => Err(CommandError::failed(format!("unexpected {:?}", other))),
                }),
        )
        .unwrap();

        assert_eq!(api.execute_as_console("wait 3s").unwrap(), 60);
        let err = api.execute_as_console("wait 1d").unwrap_err();
        assert!(matches!(err, CommandError::Failed(ref m) if m == "Too long to wait"));
    }
}

#[test]
fn test_permission_gate() {
    for api in apis(Config::default()) {
        let uuid = api.server().core().spawn_player("Alex", Vec3::ZERO);
        api.register(CommandSpec::new("stopall").permission(3).executes(|_| Ok(1)))
            .unwrap();

        assert_eq!(api.execute_as_console("stopall").unwrap(), 1);

        let player = api.server().core().entity(uuid).unwrap();
        let source = Arc::new(mchost::CommandListenerWrapper::of_entity(
            Arc::clone(api.server()),
            &player,
        ));
        assert!(api.execute("stopall", source).is_err());
    }
}

#[test]
fn test_suggestions_come_from_server_registries() {
    for api in apis(Config::default()) {
        api.register(
            CommandSpec::new("play")
                .argument("sound", ArgumentKind::Sound)
                .executes(|_| Ok(1)),
        )
        .unwrap();

        let source = Arc::new(api.console());
        let suggestions = api.suggestions("/play entity.pig", Arc::clone(&source));
        assert!(
            suggestions.contains(&"minecraft:entity.pig.ambient".to_string()),
            "{:?}",
            suggestions
        );
        assert!(api.suggestions("play zzz_nothing", source).is_empty());
    }
}

#[test]
fn test_dispatcher_file_written_on_registration() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("out/command_registration.json");
    let config = Config {
        create_dispatcher_json: true,
        dispatcher_json_path: path.clone(),
        ..Config::default()
    };

    for api in apis(config) {
        let seen = Seen::default();
        api.register(tp(&seen)).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let destination = &json["children"]["tp"]["children"]["target"]["children"]["destination"];
        assert_eq!(destination["type"], "argument");
        assert_eq!(destination["executable"], true);
        assert!(json["children"]["say"].is_object());
    }
}

#[tokio::test]
async fn test_reloaded_functions_run_plugin_commands() {
    let pack = tempfile::tempdir().unwrap();
    let functions = pack.path().join("data/demo/functions");
    std::fs::create_dir_all(&functions).unwrap();
    std::fs::write(functions.join("greet.mcfunction"), "# greet twice\nping\nping\n").unwrap();

    let config = Config {
        datapack_dirs: vec![pack.path().to_path_buf()],
        ..Config::default()
    };
    for api in apis(config) {
        let hits = Arc::new(AtomicI32::new(0));
        let counter = Arc::clone(&hits);
        api.register(CommandSpec::new("ping").executes(move |_| {
            Ok(counter.fetch_add(1, Ordering::SeqCst) + 1)
        }))
        .unwrap();

        let report = api.reload_datapacks().await.unwrap();
        assert_eq!(report.functions, 1);
        assert_eq!(api.reload_state(), cmdapi::ReloadState::Committed);
        assert_eq!(api.last_reload(), Some(report));

        api.execute_as_console("function demo:greet").unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2, "{}", api.adapter().release());
    }
}

#[test]
fn test_adapter_must_match_server() {
    let server = mchost::v1_16_r1::DedicatedServer::start();
    let err = CommandApi::new(server, v1_15_r1::Adapter::shared(), Config::default())
        .err()
        .unwrap();
    assert!(matches!(
        err,
        StartupError::Adapter(AdapterError::WrongServer { .. })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_reloads_through_two_apis_on_one_server() {
    let pack = tempfile::tempdir().unwrap();
    let functions = pack.path().join("data/demo/functions");
    std::fs::create_dir_all(&functions).unwrap();
    std::fs::write(functions.join("greet.mcfunction"), "say hello\n").unwrap();

    let config = Config {
        datapack_dirs: vec![pack.path().to_path_buf()],
        ..Config::default()
    };
    let server = mchost::v1_16_r1::DedicatedServer::start();
    let first = CommandApi::new(server.clone(), v1_16_r1::Adapter::shared(), config.clone()).unwrap();
    let second = CommandApi::new(server.clone(), v1_16_r1::Adapter::shared(), config).unwrap();

    for _ in 0..8 {
        let a = tokio::spawn({
            let api = first.clone();
            async move { api.reload_datapacks().await }
        });
        let b = tokio::spawn({
            let api = second.clone();
            async move { api.reload_datapacks().await }
        });
        let (a, b) = tokio::join!(a, b);
        a.unwrap().unwrap();
        b.unwrap().unwrap();
    }

    assert_eq!(first.reload_state(), cmdapi::ReloadState::Committed);
    assert_eq!(first.last_reload(), second.last_reload());
    // every superseded resource manager was closed
    assert_eq!(server.core().resource_handles().open_handles(), 1);
    let resources = server.data_pack_resources();
    assert!(resources.function_manager.is_sealed());
    assert!(resources.resource_manager.is_sealed());
    assert_eq!(
        server.function_library().function_ids(),
        vec!["demo:greet".parse::<mchost::ResourceLocation>().unwrap()]
    );
}
