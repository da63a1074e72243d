// Integration tests (native) for the `picture-puzzle` crate.
// These drive the controller through the public input API only, the same
// way the browser shell does, without touching wasm/browser APIs.

use picture_puzzle::layout::Rect;
use picture_puzzle::{
    Completion, ConfigurationError, Coord, DropOutcome, Feedback, InputEvent, InputEventKind,
    InputOutcome, Point, PuzzleConfig, PuzzleController, SourceImage, TileId,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Default)]
struct Cues {
    new_games: u32,
    correct: u32,
    completions: Vec<Completion>,
}

impl Feedback for Cues {
    fn new_game(&mut self) {
        self.new_games += 1;
    }
    fn correct_placement(&mut self, _coord: Coord) {
        self.correct += 1;
    }
    fn completed(&mut self, completion: Completion) {
        self.completions.push(completion);
    }
}

type Game = PuzzleController<Cues, ChaCha8Rng>;

const PICTURE: SourceImage = SourceImage {
    width: 640,
    height: 480,
};

fn game(seed: u64) -> Game {
    let mut g = PuzzleController::new(
        PuzzleConfig::default(),
        Cues::default(),
        ChaCha8Rng::seed_from_u64(seed),
    )
    .unwrap();
    g.set_viewport_width(1280.0);
    g.load_image(PICTURE).unwrap();
    g
}

fn center(r: Rect) -> Point {
    Point::new(r.x + r.w / 2.0, r.y + r.h / 2.0)
}

fn tile_for(g: &Game, coord: Coord) -> TileId {
    let tiles = g.session().unwrap().tiles();
    TileId(tiles.iter().position(|t| t.coord == coord).unwrap())
}

fn tray_center(g: &Game, tile: TileId) -> Point {
    let idx = g
        .session()
        .unwrap()
        .tray()
        .iter()
        .position(|&t| t == tile)
        .unwrap();
    center(g.layout().unwrap().tray_cell_rect(idx))
}

fn slot_center(g: &Game, coord: Coord) -> Point {
    center(g.layout().unwrap().slot_rect(coord))
}

fn mouse_drag(g: &mut Game, from: Point, to: Point) -> InputOutcome {
    g.handle_input(InputEvent::mouse(InputEventKind::Down, from.x, from.y));
    g.handle_input(InputEvent::mouse(InputEventKind::Move, to.x, to.y));
    g.handle_input(InputEvent::mouse(InputEventKind::Up, to.x, to.y))
}

fn touch_drag(g: &mut Game, id: i32, from: Point, to: Point) -> InputOutcome {
    g.handle_input(InputEvent::touch(InputEventKind::Down, id, Some(from)));
    g.handle_input(InputEvent::touch(InputEventKind::Move, id, Some(to)));
    g.handle_input(InputEvent::touch(InputEventKind::Up, id, Some(to)))
}

fn assert_ownership(g: &Game) {
    let s = g.session().unwrap();
    let occupied = s.slots().iter().filter(|slot| slot.occupant.is_some()).count();
    assert_eq!(s.tray().len() + occupied, s.size().tile_count());
    assert!(s.ownership_is_consistent());
}

#[test]
fn solving_three_by_three_fires_completion_once() {
    let mut g = game(1);
    for _ in 0..3 {
        g.tick();
    }
    let coords: Vec<Coord> = g.session().unwrap().size().coords().collect();
    assert_eq!(coords.len(), 9);
    for (i, &coord) in coords.iter().enumerate() {
        let tile = tile_for(&g, coord);
        let (from, to) = (tray_center(&g, tile), slot_center(&g, coord));
        let outcome = mouse_drag(&mut g, from, to);
        let InputOutcome::Dropped(DropOutcome::Placed { completion, .. }) = outcome else {
            panic!("expected placement, got {outcome:?}");
        };
        assert_eq!(completion.is_some(), i == coords.len() - 1);
        assert_ownership(&g);
    }
    assert_eq!(g.feedback().correct, 9);
    assert_eq!(g.feedback().completions, vec![Completion { elapsed_secs: 3 }]);

    let s = g.session().unwrap();
    assert!(!s.is_running());
    assert!(s.tray().is_empty());

    // Timer frozen, checker silent, board no longer accepts drags.
    assert_eq!(g.tick(), None);
    assert_eq!(g.session().unwrap().timer().elapsed(), 3);
    let corner = slot_center(&g, Coord::new(0, 0));
    assert_eq!(mouse_drag(&mut g, corner, Point::new(5.0, 900.0)), InputOutcome::Ignored);
    assert_eq!(g.feedback().completions.len(), 1);
}

#[test]
fn mouse_and_touch_resolve_identically() {
    let mut by_mouse = game(42);
    let mut by_touch = game(42);
    assert_eq!(by_mouse.session().unwrap().tray(), by_touch.session().unwrap().tray());

    let plan = [
        (Coord::new(0, 0), Coord::new(0, 0)),
        (Coord::new(1, 2), Coord::new(2, 1)),
        (Coord::new(2, 2), Coord::new(2, 2)),
    ];
    for (tile_coord, target) in plan {
        let tile = tile_for(&by_mouse, tile_coord);
        let (from, to) = (tray_center(&by_mouse, tile), slot_center(&by_mouse, target));
        let m = mouse_drag(&mut by_mouse, from, to);
        let (from, to) = (tray_center(&by_touch, tile), slot_center(&by_touch, target));
        let t = touch_drag(&mut by_touch, 7, from, to);
        assert_eq!(m, t);
    }
    // Drop far outside the board.
    let tile = tile_for(&by_mouse, Coord::new(0, 1));
    let off = Point::new(-50.0, -50.0);
    let from = tray_center(&by_mouse, tile);
    let m = mouse_drag(&mut by_mouse, from, off);
    let from = tray_center(&by_touch, tile);
    let t = touch_drag(&mut by_touch, 7, from, off);
    assert_eq!(m, t);
    assert_eq!(m, InputOutcome::Dropped(DropOutcome::Returned { tile }));

    let (a, b) = (by_mouse.session().unwrap(), by_touch.session().unwrap());
    assert_eq!(a.tray(), b.tray());
    assert_eq!(a.slots(), b.slots());
}

#[test]
fn wrong_column_goes_back_to_tray() {
    let mut g = game(5);
    let tile = tile_for(&g, Coord::new(1, 0));
    let (from, to) = (tray_center(&g, tile), slot_center(&g, Coord::new(1, 1)));
    let outcome = mouse_drag(&mut g, from, to);
    assert_eq!(
        outcome,
        InputOutcome::Dropped(DropOutcome::Misplaced {
            tile,
            slot: Coord::new(1, 1)
        })
    );
    let s = g.session().unwrap();
    assert_eq!(s.tray().last(), Some(&tile));
    assert!(!s.tile(tile).unwrap().placed);
    assert!(s.slot(Coord::new(1, 1)).unwrap().occupant.is_none());
}

#[test]
fn foreign_pointer_cannot_steal_the_drag() {
    let mut g = game(9);
    let tile = tile_for(&g, Coord::new(2, 0));
    let from = tray_center(&g, tile);
    let home = slot_center(&g, Coord::new(2, 0));
    assert_eq!(
        g.handle_input(InputEvent::touch(InputEventKind::Down, 1, Some(from))),
        InputOutcome::DragStarted { tile }
    );
    // A second finger neither starts a drag nor drops the first one.
    assert_eq!(
        g.handle_input(InputEvent::touch(InputEventKind::Down, 2, Some(home))),
        InputOutcome::Ignored
    );
    assert_eq!(
        g.handle_input(InputEvent::touch(InputEventKind::Up, 2, Some(home))),
        InputOutcome::Ignored
    );
    let outcome = g.handle_input(InputEvent::touch(InputEventKind::Up, 1, Some(home)));
    assert!(matches!(
        outcome,
        InputOutcome::Dropped(DropOutcome::Placed { .. })
    ));
}

#[test]
fn touch_cancel_restores_origin() {
    let mut g = game(3);
    let tray_before = g.session().unwrap().tray().to_vec();
    let tile = tray_before[4];
    let from = tray_center(&g, tile);
    g.handle_input(InputEvent::touch(InputEventKind::Down, 1, Some(from)));
    let over = slot_center(&g, Coord::new(0, 0));
    g.handle_input(InputEvent::touch(InputEventKind::Move, 1, Some(over)));
    assert_eq!(
        g.handle_input(InputEvent::touch(InputEventKind::Cancel, 1, None)),
        InputOutcome::Cancelled { tile }
    );
    assert_eq!(g.session().unwrap().tray(), &tray_before[..]);
    assert_ownership(&g);
}

#[test]
fn touch_end_without_coordinates_returns_tile() {
    let mut g = game(8);
    let coord = Coord::new(0, 2);
    let tile = tile_for(&g, coord);
    let (from, to) = (tray_center(&g, tile), slot_center(&g, coord));
    touch_drag(&mut g, 3, from, to);
    g.handle_input(InputEvent::touch(InputEventKind::Down, 3, Some(to)));
    let outcome = g.handle_input(InputEvent::touch(InputEventKind::Up, 3, None));
    assert!(matches!(
        outcome,
        InputOutcome::Dropped(DropOutcome::Rejected { .. })
    ));
    let s = g.session().unwrap();
    assert!(s.slot(coord).unwrap().occupant.is_none());
    assert_eq!(s.tray().last(), Some(&tile));
}

#[test]
fn timer_counts_and_resets() {
    let mut g = game(2);
    assert_eq!(g.session().unwrap().timer().elapsed(), 0);
    for _ in 0..5 {
        g.tick();
    }
    assert_eq!(g.session().unwrap().timer().elapsed(), 5);
    assert_eq!(g.session().unwrap().timer().display(), "Time: 0:05");
    g.start_game().unwrap();
    assert_eq!(g.session().unwrap().timer().elapsed(), 0);
}

#[test]
fn difficulty_change_rebuilds_session() {
    let mut g = game(4);
    let tile = tile_for(&g, Coord::new(0, 0));
    let (from, to) = (tray_center(&g, tile), slot_center(&g, Coord::new(0, 0)));
    mouse_drag(&mut g, from, to);
    g.tick();

    assert_eq!(g.set_difficulty("5"), Ok(true));
    let s = g.session().unwrap();
    assert_eq!(s.size().get(), 5);
    assert_eq!(s.tiles().len(), 25);
    assert_eq!(s.tray().len(), 25);
    assert!(s.slots().iter().all(|slot| slot.occupant.is_none()));
    assert!(s.tiles().iter().all(|t| !t.placed && t.coord.row < 5 && t.coord.col < 5));
    assert_eq!(s.timer().elapsed(), 0);
    assert_eq!(g.layout().unwrap().size.get(), 5);
    assert_eq!(g.feedback().new_games, 2);
}

#[test]
fn difficulty_change_after_completion_starts_next_board() {
    let mut g = game(4);
    let coords: Vec<Coord> = g.session().unwrap().size().coords().collect();
    for coord in coords {
        let tile = tile_for(&g, coord);
        let (from, to) = (tray_center(&g, tile), slot_center(&g, coord));
        mouse_drag(&mut g, from, to);
    }
    assert_eq!(g.feedback().completions.len(), 1);
    assert!(!g.is_playing());

    assert_eq!(g.set_difficulty("4"), Ok(true));
    assert!(g.is_playing());
    let s = g.session().unwrap();
    assert_eq!(s.size().get(), 4);
    assert_eq!(s.tray().len(), 16);
    assert_eq!(s.timer().elapsed(), 0);
    assert_eq!(g.feedback().new_games, 2);
    assert_ownership(&g);
}

#[test]
fn difficulty_change_while_idle_waits_for_start() {
    let mut g = PuzzleController::new(
        PuzzleConfig::default(),
        Cues::default(),
        ChaCha8Rng::seed_from_u64(0),
    )
    .unwrap();
    assert_eq!(g.set_difficulty("4"), Ok(false));
    assert!(g.session().is_none());
    assert_eq!(g.start_game(), Err(ConfigurationError::MissingImage));
    g.load_image(PICTURE).unwrap();
    assert_eq!(g.session().unwrap().size().get(), 4);
}

#[test]
fn bad_difficulty_values_leave_session_alone() {
    let mut g = game(6);
    let before = g.session().unwrap().tray().to_vec();
    assert_eq!(
        g.set_difficulty("huge"),
        Err(ConfigurationError::UnparsableGridSize("huge".into()))
    );
    assert_eq!(g.set_difficulty("0"), Err(ConfigurationError::InvalidGridSize(0)));
    assert_eq!(
        g.set_difficulty("7"),
        Err(ConfigurationError::UnsupportedDifficulty(7))
    );
    assert_eq!(g.session().unwrap().tray(), &before[..]);
    assert_eq!(g.grid_size().get(), 3);
}

#[test]
fn random_gestures_never_orphan_a_tile() {
    use rand::Rng;

    let mut g = game(77);
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    let (w, h) = g.layout().unwrap().canvas_size();
    for step in 0..2000 {
        let x = rng.gen_range(-20.0..w + 20.0);
        let y = rng.gen_range(-20.0..h + 20.0);
        let kind = match rng.gen_range(0..4) {
            0 => InputEventKind::Down,
            1 => InputEventKind::Move,
            2 => InputEventKind::Up,
            _ => InputEventKind::Cancel,
        };
        let event = if step % 2 == 0 {
            InputEvent::mouse(kind, x, y)
        } else {
            InputEvent::touch(kind, rng.gen_range(0..2), Some(Point::new(x, y)))
        };
        g.handle_input(event);
        assert_ownership(&g);
    }
}
