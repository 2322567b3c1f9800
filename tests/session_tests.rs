use raycaster::{Config, Error, GridMap, Session, Side, TickInput};

fn forward() -> TickInput {
    TickInput {
        move_forward: true,
        ..TickInput::default()
    }
}

#[test]
fn loads_maps_from_disk() {
    let dir = tempfile::tempdir().unwrap();

    let json = dir.path().join("level.json");
    std::fs::write(&json, r#"{ "cell_size": 2.0, "cells": [[1,1,1],[1,0,1],[1,1,1]] }"#).unwrap();
    let map = GridMap::load(&json).unwrap();
    assert_eq!(map.cell_size(), 2.0);
    assert!(map.is_enclosed());

    let ascii = dir.path().join("level.txt");
    std::fs::write(&ascii, "###\n#.#\n###\n").unwrap();
    let map = GridMap::load(&ascii).unwrap();
    assert_eq!((map.width(), map.height()), (3, 3));

    let ragged = dir.path().join("ragged.json");
    std::fs::write(&ragged, r#"{ "cells": [[1,1,1],[1,0]] }"#).unwrap();
    assert!(matches!(GridMap::load(&ragged), Err(Error::MalformedMap(_))));

    assert!(matches!(
        GridMap::load(dir.path().join("nope.txt")),
        Err(Error::Io(_))
    ));
}

#[test]
fn walking_up_to_a_wall_stops_at_the_margin() {
    let map = GridMap::from_ascii("#######\n#.....#\n#######", 1.0).unwrap();
    let config = Config {
        spawn: [1.5, 1.5],
        heading_degrees: 0.0,
        move_speed: 0.25,
        collision_margin: 0.1,
        ray_count: 5,
        ..Config::default()
    };
    let mut session = Session::new(map, config).unwrap();

    let mut last = session.tick(forward()).unwrap();
    for _ in 0..40 {
        last = session.tick(forward()).unwrap();
    }

    let x = session.player().pos[0];
    assert!(x < 6.0 - 0.1 + 1e-4, "walked into the wall: {x}");
    assert!(x > 6.0 - 0.1 - 0.25 - 1e-4, "stopped too early: {x}");

    let centre = last.hits()[2];
    assert_eq!(centre.side, Side::EastWest);
    assert!((centre.distance - (6.0 - x)).abs() < 1e-4);
}

#[test]
fn full_cell_steps_never_end_inside_a_pillar() {
    let map = GridMap::from_ascii("#####\n#...#\n#.#.#\n#...#\n#####", 1.0).unwrap();
    let config = Config {
        spawn: [1.95, 1.5],
        heading_degrees: 90.0,
        move_speed: 1.0,
        turn_speed_degrees: 90.0,
        collision_margin: 0.1,
        ray_count: 8,
        ..Config::default()
    };
    let mut session = Session::new(map, config).unwrap();

    session.tick(forward()).unwrap();
    assert!((session.player().pos[1] - 2.5).abs() < 1e-5);

    // face east, straight at the pillar one step away
    session
        .tick(TickInput {
            turn_left: true,
            ..forward()
        })
        .unwrap();
    let [x, y] = session.player().pos;
    let (col, row) = session.map().cell_of(x, y);
    assert!(!session.map().is_wall(col, row), "player inside a wall at ({x}, {y})");
    assert!((x - 1.95).abs() < 1e-5);
}

#[test]
fn demo_session_runs() {
    let mut session = Session::new(GridMap::demo(), Config::default()).unwrap();
    let inputs = [
        forward(),
        TickInput {
            turn_right: true,
            ..forward()
        },
        TickInput {
            move_backward: true,
            turn_left: true,
            ..TickInput::default()
        },
    ];
    for i in 0..300 {
        let frame = session.tick(inputs[i % inputs.len()]).unwrap();
        assert_eq!(frame.len(), session.config().ray_count);
        assert!(frame.iter().all(|h| h.wall_id > 0 && h.distance > 0.0));
        let [x, y] = session.player().pos;
        let (col, row) = session.map().cell_of(x, y);
        assert!(!session.map().is_wall(col, row), "player inside a wall at ({x}, {y})");
    }
    assert_eq!(session.tick_count(), 300);
}

#[test]
fn unenclosed_map_aborts_the_session_when_seen() {
    let map = GridMap::from_ascii("#####\n#....\n#####", 1.0).unwrap();
    let config = Config {
        spawn: [1.5, 1.5],
        heading_degrees: 180.0,
        fov_degrees: 10.0,
        ..Config::default()
    };
    let mut session = Session::new(map, config).unwrap();
    assert!(session.tick(TickInput::default()).is_ok());

    // turn around to face the gap
    let turn = TickInput {
        turn_right: true,
        ..TickInput::default()
    };
    let mut result = Ok(raycaster::Frame::default());
    for _ in 0..72 {
        result = session.tick(turn);
        if result.is_err() {
            break;
        }
    }
    assert!(matches!(result, Err(Error::RayEscapedBounds { .. })));
}
