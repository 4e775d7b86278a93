//! Argument kinds extracted through each release adapter

use cmdapi_nms::{v1_15_r1, v1_16_r1, ExtractError, ReloadCoordinator, VersionAdapter};
use cmdapi_wrappers::{
    ArgumentKind, ArgumentValue, Axis, BlockData, ChatColor, ChatComponent, EntitySelector,
    Environment, ItemStack, LocationType, MathOperation, NamespacedKey, NbtCompound, NbtTag,
    ScoreHolderType,
};
use mchost::brigadier::CommandNode;
use mchost::world::Vec3;
use mchost::{CommandListenerWrapper, MinecraftServer};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static NEXT_COMMAND: AtomicUsize = AtomicUsize::new(0);

struct Harness {
    server: Arc<dyn MinecraftServer>,
    adapter: Arc<dyn VersionAdapter>,
}

impl Harness {
    fn v1_15() -> Self {
        Self {
            server: mchost::v1_15_r1::DedicatedServer::start(),
            adapter: v1_15_r1::Adapter::shared(),
        }
    }

    fn v1_16() -> Self {
        Self {
            server: mchost::v1_16_r1::DedicatedServer::start(),
            adapter: v1_16_r1::Adapter::shared(),
        }
    }

    fn both() -> Vec<Self> {
        vec![Self::v1_15(), Self::v1_16()]
    }

    /// Register a one-argument command for `kind` and run it with `input`
    fn run(&self, kind: ArgumentKind, input: &str) -> Result<ArgumentValue, ExtractError> {
        let name = format!("probe{}", NEXT_COMMAND.fetch_add(1, Ordering::Relaxed));
        let parser = self.adapter.parser(kind).unwrap();
        let sink: Arc<Mutex<Option<Result<ArgumentValue, ExtractError>>>> = Arc::new(Mutex::new(None));
        let seen = Arc::clone(&sink);
        let adapter = Arc::clone(&self.adapter);
        self.adapter
            .brigadier_dispatcher(self.server.as_ref())
            .unwrap()
            .register(CommandNode::literal(name.clone()).then(
                CommandNode::argument("value", parser.into_native()).executes(move |ctx| {
                    *seen.lock() = Some(adapter.extract(kind, ctx, "value"));
                    Ok(1)
                }),
            ));

        let source = Arc::new(CommandListenerWrapper::console(Arc::clone(&self.server)));
        self.server
            .command_dispatcher()
            .execute(&format!("{} {}", name, input), source)?;
        let outcome = sink.lock().take();
        outcome.expect("command did not run")
    }

    fn release(&self) -> &'static str {
        self.adapter.release()
    }
}

fn key(path: &str) -> NamespacedKey {
    NamespacedKey::minecraft(path)
}

#[test]
fn test_block_position() {
    for h in Harness::both() {
        let value = h
            .run(ArgumentKind::Location(LocationType::BlockPosition), "10 64 -10")
            .unwrap();
        let location = value.as_location().unwrap();
        assert_eq!(
            (location.x, location.y, location.z),
            (10.0, 64.0, -10.0),
            "{}",
            h.release()
        );
        assert_eq!(location.world, "world");
    }
}

#[test]
fn test_precise_position() {
    for h in Harness::both() {
        let value = h
            .run(ArgumentKind::Location(LocationType::PrecisePosition), "1.5 64.25 -3.75")
            .unwrap();
        let location = value.as_location().unwrap();
        assert_eq!((location.x, location.y, location.z), (1.5, 64.25, -3.75));
    }
}

#[test]
fn test_ill_formed_position_is_parse_failure() {
    for h in Harness::both() {
        let err = h
            .run(ArgumentKind::Location(LocationType::BlockPosition), "10 sixty -10")
            .unwrap_err();
        assert!(err.is_user_error(), "{}: {:?}", h.release(), err);
    }
}

#[test]
fn test_column_position() {
    for h in Harness::both() {
        match h
            .run(ArgumentKind::Location2D(LocationType::BlockPosition), "7 -2")
            .unwrap()
        {
            ArgumentValue::Location2D(loc) => assert_eq!((loc.x, loc.z), (7.0, -2.0)),
            other => panic!("{}: {:?}", h.release(), other),
        }
    }
}

#[test]
fn test_rotation_is_yaw_then_pitch() {
    for h in Harness::both() {
        match h.run(ArgumentKind::Rotation, "90 -45").unwrap() {
            ArgumentValue::Rotation(rotation) => {
                assert_eq!(rotation.yaw, 90.0, "{}", h.release());
                assert_eq!(rotation.pitch, -45.0, "{}", h.release());
            }
            other => panic!("{:?}", other),
        }
    }
}

#[test]
fn test_axis_set() {
    for h in Harness::both() {
        let expected: BTreeSet<Axis> = [Axis::X, Axis::Z].into_iter().collect();
        assert_eq!(h.run(ArgumentKind::Axis, "zx").unwrap(), ArgumentValue::Axis(expected));
    }
}

#[test]
fn test_registry_keys() {
    for h in Harness::both() {
        assert_eq!(
            h.run(ArgumentKind::Sound, "entity.pig.ambient").unwrap(),
            ArgumentValue::Sound(key("entity.pig.ambient"))
        );
        assert_eq!(
            h.run(ArgumentKind::Biome, "desert").unwrap(),
            ArgumentValue::Biome(key("desert"))
        );
        assert_eq!(
            h.run(ArgumentKind::EntityType, "minecraft:pig").unwrap(),
            ArgumentValue::EntityType(key("pig"))
        );
        assert_eq!(
            h.run(ArgumentKind::Enchantment, "sharpness").unwrap(),
            ArgumentValue::Enchantment(key("sharpness"))
        );
        assert_eq!(
            h.run(ArgumentKind::LootTable, "entities/pig").unwrap(),
            ArgumentValue::LootTable(key("entities/pig"))
        );
        assert_eq!(
            h.run(ArgumentKind::Advancement, "story/root").unwrap(),
            ArgumentValue::Advancement(key("story/root"))
        );
    }
}

#[test]
fn test_unknown_registry_key_is_parse_failure() {
    for h in Harness::both() {
        let err = h.run(ArgumentKind::Sound, "entity.unicorn.neigh").unwrap_err();
        assert!(err.is_user_error(), "{}", h.release());
        let err = h.run(ArgumentKind::Biome, "moon").unwrap_err();
        assert!(err.is_user_error(), "{}", h.release());
    }
}

#[test]
fn test_recipe_carries_result() {
    for h in Harness::both() {
        match h.run(ArgumentKind::Recipe, "torch").unwrap() {
            ArgumentValue::Recipe(recipe) => {
                assert_eq!(recipe.key, key("torch"));
                assert_eq!(recipe.result.amount, 4);
            }
            other => panic!("{:?}", other),
        }
    }
}

#[test]
fn test_chat_color_and_time() {
    for h in Harness::both() {
        assert_eq!(
            h.run(ArgumentKind::ChatColor, "red").unwrap(),
            ArgumentValue::ChatColor(ChatColor::Red)
        );
        assert_eq!(h.run(ArgumentKind::Time, "2d").unwrap(), ArgumentValue::Time(48000));
        assert_eq!(h.run(ArgumentKind::Time, "5s").unwrap(), ArgumentValue::Time(100));
    }
}

#[test]
fn test_ranges_fill_open_bounds() {
    for h in Harness::both() {
        match h.run(ArgumentKind::IntRange, "3..").unwrap() {
            ArgumentValue::IntRange(range) => {
                assert_eq!(range.lower_bound(), 3);
                assert_eq!(range.upper_bound(), i32::MAX);
            }
            other => panic!("{:?}", other),
        }
        match h.run(ArgumentKind::FloatRange, "..2.5").unwrap() {
            ArgumentValue::FloatRange(range) => {
                assert_eq!(range.lower_bound(), -f32::MAX);
                assert_eq!(range.upper_bound(), 2.5);
            }
            other => panic!("{:?}", other),
        }
    }
}

#[test]
fn test_math_operations_classified() {
    let symbols = [
        ("=", MathOperation::Assign),
        ("+=", MathOperation::Add),
        ("-=", MathOperation::Subtract),
        ("*=", MathOperation::Multiply),
        ("/=", MathOperation::Divide),
        ("%=", MathOperation::Mod),
        ("<", MathOperation::Min),
        (">", MathOperation::Max),
        ("><", MathOperation::Swap),
    ];
    for h in Harness::both() {
        for (symbol, expected) in symbols {
            assert_eq!(
                h.run(ArgumentKind::MathOperation, symbol).unwrap(),
                ArgumentValue::MathOperation(expected),
                "{} {}",
                h.release(),
                symbol
            );
        }
    }
}

#[test]
fn test_dimension_maps_to_environment() {
    for h in Harness::both() {
        assert_eq!(
            h.run(ArgumentKind::Dimension, "minecraft:the_nether").unwrap(),
            ArgumentValue::Environment(Environment::Nether)
        );
    }
}

#[test]
fn test_score_holders() {
    for h in Harness::both() {
        assert_eq!(
            h.run(ArgumentKind::ScoreHolder(ScoreHolderType::Single), "Alex").unwrap(),
            ArgumentValue::ScoreHolder("Alex".into())
        );
    }
}

#[test]
fn test_objective_and_team_need_to_exist() {
    for h in Harness::both() {
        let scoreboard = h.server.core().scoreboard();
        scoreboard.add_objective("kills", "playerKillCount");
        scoreboard.add_team("blue", None);
        assert_eq!(
            h.run(ArgumentKind::Objective, "kills").unwrap(),
            ArgumentValue::Objective("kills".into())
        );
        assert_eq!(
            h.run(ArgumentKind::Team, "blue").unwrap(),
            ArgumentValue::Team("blue".into())
        );
        assert!(h.run(ArgumentKind::Objective, "deaths").unwrap_err().is_user_error());
    }
}

#[test]
fn test_uuid_only_on_newer_release() {
    let old = Harness::v1_15();
    assert!(!old.adapter.supports(ArgumentKind::Uuid));
    assert!(old.adapter.parser(ArgumentKind::Uuid).is_err());

    let new = Harness::v1_16();
    let id = "3f1c2a9e-4b7d-4e2a-9c61-0a8d5b3e7f10";
    assert_eq!(
        new.run(ArgumentKind::Uuid, id).unwrap(),
        ArgumentValue::Uuid(id.parse().unwrap())
    );
}

#[test]
fn test_many_entities_empty_on_both_releases() {
    for h in Harness::both() {
        let kind = ArgumentKind::EntitySelector(EntitySelector::ManyEntities);
        assert_eq!(
            h.run(kind, "@e[type=pig]").unwrap(),
            ArgumentValue::Entities(Vec::new()),
            "{}",
            h.release()
        );
        let kind = ArgumentKind::EntitySelector(EntitySelector::ManyPlayers);
        assert_eq!(h.run(kind, "@a").unwrap(), ArgumentValue::Players(Vec::new()));
    }
}

#[test]
fn test_single_entity_with_no_match_fails() {
    for h in Harness::both() {
        let kind = ArgumentKind::EntitySelector(EntitySelector::OneEntity);
        let err = h.run(kind, "@e[type=pig,limit=1]").unwrap_err();
        assert!(err.is_user_error(), "{}", h.release());
    }
}

#[test]
fn test_selectors_find_spawned_players() {
    for h in Harness::both() {
        let uuid = h.server.core().spawn_player("Steve", Vec3::new(1.0, 70.0, 2.0));
        match h
            .run(ArgumentKind::EntitySelector(EntitySelector::ManyPlayers), "@a")
            .unwrap()
        {
            ArgumentValue::Players(players) => {
                assert_eq!(players.len(), 1);
                assert_eq!(players[0].uuid, uuid);
                assert_eq!(players[0].name, "Steve");
            }
            other => panic!("{:?}", other),
        }
        match h.run(ArgumentKind::Player, "Steve").unwrap() {
            ArgumentValue::Player(player) => assert_eq!(player.uuid, uuid),
            other => panic!("{:?}", other),
        }
    }
}

#[test]
fn test_same_input_same_value_across_releases() {
    let inputs = [
        (ArgumentKind::Location(LocationType::PrecisePosition), "~1.5 ~ ~-2.5"),
        (ArgumentKind::NamespacedKey, "demo:thing"),
        (ArgumentKind::ItemSlot, "hotbar.3"),
        (ArgumentKind::ScoreboardSlot, "sidebar"),
    ];
    let (old, new) = (Harness::v1_15(), Harness::v1_16());
    for (kind, input) in inputs {
        assert_eq!(old.run(kind, input).unwrap(), new.run(kind, input).unwrap(), "{}", input);
    }
}

#[test]
fn test_validate_namespaced_key() {
    for h in Harness::both() {
        assert_eq!(
            h.adapter.validate_namespaced_key("demo:greet").unwrap(),
            NamespacedKey::new("demo", "greet")
        );
        assert!(h.adapter.validate_namespaced_key("Bad Key").is_err());
    }
}

#[test]
fn test_wrong_server_is_rejected() {
    let old = Harness::v1_15();
    let new = Harness::v1_16();
    assert!(old.adapter.live_state(new.server.as_ref()).is_err());
    assert!(new.adapter.brigadier_dispatcher(old.server.as_ref()).is_err());
}

#[test]
fn test_dispatcher_file_is_written() {
    let dir = tempfile::tempdir().unwrap();
    for h in Harness::both() {
        let path = dir.path().join(format!("{}.json", h.release()));
        h.adapter.create_dispatcher_file(h.server.as_ref(), &path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(json["children"]["say"].is_object(), "{}", h.release());
    }
}

#[test]
fn test_item_stack_keeps_nbt() {
    let mut nbt = NbtCompound::new();
    nbt.insert("Damage", NbtTag::Int(3));
    for h in Harness::both() {
        assert_eq!(
            h.run(ArgumentKind::ItemStack, "minecraft:diamond_sword{Damage:3}").unwrap(),
            ArgumentValue::ItemStack(ItemStack::new(key("diamond_sword"), 1).with_nbt(nbt.clone())),
            "{}",
            h.release()
        );
        assert_eq!(
            h.run(ArgumentKind::ItemStack, "stick").unwrap(),
            ArgumentValue::ItemStack(ItemStack::new(key("stick"), 1))
        );
        assert!(h.run(ArgumentKind::ItemStack, "laser_sword").unwrap_err().is_user_error());
    }
}

#[test]
fn test_block_state_properties() {
    for h in Harness::both() {
        let mut expected = BlockData::new(key("chest"));
        expected.properties.insert("facing".to_string(), "north".to_string());
        expected.properties.insert("waterlogged".to_string(), "true".to_string());
        assert_eq!(
            h.run(ArgumentKind::BlockState, "chest[facing=north,waterlogged=true]").unwrap(),
            ArgumentValue::BlockState(expected),
            "{}",
            h.release()
        );

        match h.run(ArgumentKind::BlockState, "furnace{CookTime:5}").unwrap() {
            ArgumentValue::BlockState(block) => {
                assert_eq!(block.material, key("furnace"));
                assert_eq!(block.nbt.and_then(|n| n.get_int("CookTime")), Some(5));
            }
            other => panic!("{:?}", other),
        }

        let err = h.run(ArgumentKind::BlockState, "chest[facing=up]").unwrap_err();
        assert!(err.is_user_error(), "{}", h.release());
    }
}

#[test]
fn test_nbt_compound() {
    for h in Harness::both() {
        match h
            .run(ArgumentKind::NbtCompound, r#"{CustomName:"Bob",Tags:["a","b"],Pos:{y:64}}"#)
            .unwrap()
        {
            ArgumentValue::Nbt(nbt) => {
                assert_eq!(nbt.get_string("CustomName"), Some("Bob"), "{}", h.release());
                assert_eq!(
                    nbt.get("Tags"),
                    Some(&NbtTag::List(vec![
                        NbtTag::String("a".into()),
                        NbtTag::String("b".into())
                    ]))
                );
                match nbt.get("Pos") {
                    Some(NbtTag::Compound(pos)) => assert_eq!(pos.get_int("y"), Some(64)),
                    other => panic!("{:?}", other),
                }
            }
            other => panic!("{:?}", other),
        }
    }
}

#[test]
fn test_chat_message_resolves_selectors() {
    for h in Harness::both() {
        assert_eq!(
            h.run(ArgumentKind::Chat, "hello there").unwrap(),
            ArgumentValue::Chat(ChatComponent::text("hello there"))
        );

        h.server.core().spawn_player("Alex", Vec3::ZERO);
        assert_eq!(
            h.run(ArgumentKind::Chat, "hi @a").unwrap(),
            ArgumentValue::Chat(ChatComponent::text("hi Alex")),
            "{}",
            h.release()
        );
    }
}

#[test]
fn test_chat_component_keeps_styling() {
    for h in Harness::both() {
        match h
            .run(ArgumentKind::ChatComponent, r#"{"text":"hi","color":"red","bold":true}"#)
            .unwrap()
        {
            ArgumentValue::ChatComponent(component) => {
                assert_eq!(component.text, "hi", "{}", h.release());
                assert_eq!(component.color, Some(ChatColor::Red));
                assert_eq!(component.bold, Some(true));
            }
            other => panic!("{:?}", other),
        }
    }
}

#[test]
fn test_particle_and_potion_effect() {
    for h in Harness::both() {
        assert_eq!(
            h.run(ArgumentKind::Particle, "minecraft:flame").unwrap(),
            ArgumentValue::Particle(key("flame"))
        );
        assert_eq!(
            h.run(ArgumentKind::PotionEffect, "night_vision").unwrap(),
            ArgumentValue::PotionEffect(key("night_vision"))
        );
        assert!(h.run(ArgumentKind::Particle, "glitter").unwrap_err().is_user_error());
        assert!(h.run(ArgumentKind::PotionEffect, "flight").unwrap_err().is_user_error());
    }
}

#[test]
fn test_objective_criteria() {
    for h in Harness::both() {
        assert_eq!(
            h.run(ArgumentKind::ObjectiveCriteria, "deathCount").unwrap(),
            ArgumentValue::ObjectiveCriteria("deathCount".to_string())
        );
        let err = h.run(ArgumentKind::ObjectiveCriteria, "luck").unwrap_err();
        assert!(err.is_user_error(), "{}", h.release());
    }
}

#[tokio::test]
async fn test_function_runs_against_reloaded_library() {
    for h in Harness::both() {
        let pack = tempfile::tempdir().unwrap();
        let functions = pack.path().join("data/demo/functions");
        let tags = pack.path().join("data/minecraft/tags/functions");
        std::fs::create_dir_all(&functions).unwrap();
        std::fs::create_dir_all(&tags).unwrap();
        std::fs::write(functions.join("greet.mcfunction"), "say hello\n").unwrap();
        std::fs::write(tags.join("load.json"), r#"{"values":["demo:greet"]}"#).unwrap();
        h.server.core().set_datapack_dirs(vec![pack.path().to_path_buf()]);
        ReloadCoordinator::new()
            .run(h.adapter.reload(Arc::clone(&h.server)).unwrap())
            .await
            .unwrap();

        for input in ["demo:greet", "#minecraft:load"] {
            match h.run(ArgumentKind::Function, input).unwrap() {
                ArgumentValue::Functions(resolved) => {
                    assert_eq!(resolved.len(), 1, "{} {}", h.release(), input);
                    assert_eq!(resolved[0].key(), &NamespacedKey::new("demo", "greet"));
                    assert_eq!(resolved[0].commands(), &["say hello".to_string()]);
                    assert_eq!(resolved[0].run().unwrap(), 1);
                }
                other => panic!("{:?}", other),
            }
        }

        let err = h.run(ArgumentKind::Function, "demo:missing").unwrap_err();
        assert!(err.is_user_error(), "{}", h.release());
    }
}
