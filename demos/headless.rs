use instant::Instant;
use isomap::prelude::*;
use std::time::Duration;

/// Drive an isometric map without any window: pan with the keyboard, paint a
/// stroke with the mouse and record the draw commands of one frame.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Isomap Headless Example");
    println!("=======================");

    let metrics = GridMetrics::new(64.0, 32.0, 16, 16)?;
    let mut map = IsoMap::new(metrics, Size::new(1024.0, 768.0), EngineConfig::default())?;
    let camera_events = map.subscribe_camera();

    map.register_sprite_sheet(
        1,
        SpriteSheet::from_json_str(
            r#"{
                "width": 64, "height": 96,
                "layout": { "grid": { "frame_width": 64, "frame_height": 96, "columns": 4, "rows": 1 } },
                "animations": { "idle": { "frames": [0, 1, 2, 3], "frame_duration_ms": 120, "loop_mode": "pingpong" } }
            }"#,
        )?,
    )?;
    map.add_entity(Entity::new("windmill", 1, TileCoord::new(3, 4)).with_animation("idle"));
    map.add_entity(Entity::new("house", 1, TileCoord::new(6, 2)).with_size(2, 2));

    let bounds = map.bounds();
    println!(
        "Grid {}x{}, background {}x{}",
        metrics.rows, metrics.cols, bounds.background_width, bounds.background_height
    );

    // Hold the left arrow for a quarter second of 60 Hz frames
    let start = Instant::now();
    map.handle_input(&InputEvent::KeyDown { key: Key::ArrowLeft }, start);
    for frame in 1..=15 {
        map.update(start + Duration::from_micros(16_667 * frame));
    }
    map.handle_input(&InputEvent::KeyUp { key: Key::ArrowLeft }, start);
    println!("Pan after keyboard: {:?}", map.camera().pan());

    map.camera_mut().set_zoom(1.5);
    println!("Zoom: {:.2}", map.camera().zoom());

    // Paint a row of tiles in edit mode
    map.set_mode(AppMode::Edit);
    map.set_constraint(PaintConstraint::Diagonal);
    map.set_paint_code(7);

    let transform = map.view_transform();
    let from = transform.world_to_screen(tile_center_world(TileCoord::new(8, 3), map.metrics(), map.bounds()));
    let to = transform.world_to_screen(tile_center_world(TileCoord::new(8, 9), map.metrics(), map.bounds()));
    let now = start + Duration::from_millis(300);

    map.handle_input(&InputEvent::PointerDown { position: from, button: MouseButton::Left }, now);
    map.handle_input(&InputEvent::PointerMove { position: to }, now);
    for event in map.handle_input(&InputEvent::PointerUp { position: to, button: MouseButton::Left }, now) {
        if let InteractionEvent::StrokeApplied(stroke) = event {
            println!(
                "Painted {} tiles from {:?} to {:?}",
                stroke.tiles.len(),
                stroke.start,
                stroke.end
            );
        }
    }

    let mut surface = RecordingSurface::new();
    let stats = map.render(&mut surface, now)?;
    println!(
        "Frame: {} commands, {} sprites, {} outlines",
        surface.commands().len(),
        stats.sprites,
        stats.outlines
    );

    let changes: Vec<CameraChange> = camera_events.try_iter().map(|event| event.cause).collect();
    println!("Camera events: {}", changes.len());

    map.undo();
    println!("Undo available after undo: {}", map.can_undo());

    Ok(())
}
