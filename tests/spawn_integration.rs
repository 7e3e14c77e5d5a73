//! Spawn location integration tests

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hex_travel::map::{HexCoord, HexMap, MapFile, PointOfInterest, Terrain};
use hex_travel::movement::{NeverInterrupted, TravelController, TurnCounter, Walker};
use hex_travel::pathfinding::CostModel;
use hex_travel::{MovementConfig, MovementError, SpawnLocator};

#[test]
fn test_all_impassable_grid_has_no_spawn() {
    let map = HexMap::filled(9, 9, Terrain::Peaks);
    let config = MovementConfig::default();
    let costs = CostModel::from_config(&config);

    for seed in 0..5 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let result = SpawnLocator::new(&map, &config).with_costs(&costs).find_spawn(&mut rng);
        assert_eq!(result, Err(MovementError::NotFound));
    }
}

#[test]
fn test_settlement_spawn_is_town_or_neighbor() {
    let mut map = HexMap::new(8, 8);
    let town = HexCoord::new(3, 3);
    map.set_point_of_interest(town, PointOfInterest::settlement("Ashford"));
    for hex in map.neighbors(town) {
        map.set_terrain(hex, Terrain::Forest);
    }
    let config = MovementConfig::default();
    let costs = CostModel::from_config(&config);

    for seed in 0..100 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let hex = SpawnLocator::new(&map, &config)
            .with_costs(&costs)
            .find_spawn(&mut rng)
            .unwrap();
        assert!(hex == town || (town.is_adjacent(&hex) && costs.is_passable(map.terrain_at(hex).unwrap())));
    }
}

#[test]
fn test_generated_maps_spawn_on_valid_hexes() {
    let config = MovementConfig::default();
    let costs = CostModel::from_config(&config);

    for seed in 0..20 {
        let map = HexMap::generate(20, 15, seed);
        let locator = SpawnLocator::new(&map, &config).with_costs(&costs);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let hex = locator.find_spawn(&mut rng).unwrap();
        assert!(locator.is_valid(hex));
        // Generated maps always carry at least one settlement
        assert!(!map.settlements().is_empty());
    }
}

#[test]
fn test_spawn_from_map_file() {
    let file = MapFile::parse_toml(
        r#"
        width = 10
        height = 8
        default_terrain = "swamp"

        [[cells]]
        q = 6
        r = 1
        terrain = "ocean"

        [[points]]
        q = 6
        r = 1
        kind = "settlement"
        name = "Saltmere"
        "#,
    )
    .unwrap();
    let map = file.into_map().unwrap();
    let config = MovementConfig {
        seed: Some(5),
        ..MovementConfig::default()
    };

    let mut ctl = TravelController::builder()
        .map(map)
        .config(config)
        .agent(Walker::default())
        .clock(TurnCounter::default())
        .interrupts(NeverInterrupted)
        .build()
        .unwrap();

    // The only settlement sits in the ocean and everything else is harsh
    // swamp, so every tier comes up empty.
    assert_eq!(ctl.place_at_spawn(), Err(MovementError::NotFound));
    assert_eq!(ctl.agent().position, HexCoord::default());
}

#[test]
fn test_spawn_without_cost_model_uses_builtin_impassable() {
    let mut map = HexMap::filled(5, 5, Terrain::Ocean);
    map.set_terrain(HexCoord::new(4, 0), Terrain::Desert);
    let config = MovementConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let hex = SpawnLocator::new(&map, &config).find_spawn(&mut rng).unwrap();
    assert_eq!(hex, HexCoord::new(4, 0));
}
