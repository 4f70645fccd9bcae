/// Headless lighting demo
///
/// Builds a small terrain strip, lights it, then plays a few seconds of
/// torch placement, cave digging and a sunset while printing per-frame stats.
///
/// Usage: lighting_demo [config.toml]

use anyhow::{Context, Result};
use cgmath::{Deg, Matrix4, Point3, Vector3};
use voxel_lighting::world::{BlockId, ChunkHandle, ChunkMeshUploader, ChunkPos, VoxelPos, VoxelWorld};
use voxel_lighting::{Frustum, LightingConfig, LightingSystem, TimeOfDay};

const FRAME_TIME: f32 = 1.0 / 60.0;

/// Stand-in for the GPU upload path: counts uploads
#[derive(Default)]
struct UploadCounter {
    uploads: usize,
}

impl ChunkMeshUploader for UploadCounter {
    fn upload_chunk_mesh(&mut self, handle: ChunkHandle, pos: ChunkPos) {
        log::trace!("upload {:?} at {:?}", handle, pos);
        self.uploads += 1;
    }
}

fn build_world() -> VoxelWorld {
    let mut world = VoxelWorld::new();
    for cx in -2..=2 {
        for cz in -2..=2 {
            for cy in 0..=1 {
                world.load_chunk(ChunkPos::new(cx, cy, cz));
            }
            let min = ChunkPos::new(cx, 0, cz).min_voxel();
            let max = VoxelPos::new(min.x + 31, 20, min.z + 31);
            world.fill(min, max, BlockId::STONE);
            world.fill(
                VoxelPos::new(min.x, 21, min.z),
                VoxelPos::new(max.x, 21, max.z),
                BlockId::GRASS,
            );
        }
    }

    // A cave with a lava pool, and a lamp on the surface
    world.fill(VoxelPos::new(-10, 5, -10), VoxelPos::new(10, 12, 10), BlockId::AIR);
    world.fill(VoxelPos::new(-3, 5, -3), VoxelPos::new(3, 5, 3), BlockId::LAVA);
    world.set_block(VoxelPos::new(20, 22, 20), BlockId::GLOWSTONE);
    world
}

fn run_until_settled(
    system: &mut LightingSystem,
    world: &mut VoxelWorld,
    uploader: &mut UploadCounter,
    label: &str,
) -> Result<usize> {
    let mut frames = 0;
    loop {
        let stats = system.update(FRAME_TIME, world, Some(&mut *uploader));
        frames += 1;
        if frames <= 3 || system.queues_empty() {
            println!("{label} frame {frames}: {}", serde_json::to_string(&stats)?);
        }
        if system.queues_empty() && system.dirty_chunk_count() == 0 {
            return Ok(frames);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => LightingConfig::load(&path)
            .with_context(|| format!("loading lighting config from {path}"))?,
        None => LightingConfig::default(),
    };
    log::info!("lighting config: {:?}", config);

    let mut world = build_world();
    let mut system = LightingSystem::new(config);
    let mut uploader = UploadCounter::default();

    system.initialize_world_lighting(&mut world);
    system.regenerate_all_dirty_chunks(&mut world, Some(&mut uploader));

    let surface = VoxelPos::new(0, 22, 0);
    let cave = VoxelPos::new(0, 8, 0);
    println!(
        "surface sky={} cave sky={} cave block={}",
        system.get_sky_light(&world, surface),
        system.get_sky_light(&world, cave),
        system.get_block_light(&world, cave),
    );

    // Torch on the cave floor
    let torch = VoxelPos::new(8, 6, 8);
    world.set_block(torch, BlockId::TORCH);
    system.add_light_source(&mut world, torch, BlockId::TORCH.light_emission());
    let frames = run_until_settled(&mut system, &mut world, &mut uploader, "torch")?;
    log::info!("torch settled in {} frames, light {}", frames, system.get_block_light(&world, torch));

    // Dig a shaft from the surface into the cave
    for y in 13..=21 {
        let pos = VoxelPos::new(0, y, 0);
        world.set_block(pos, BlockId::AIR);
        system.on_block_changed(&mut world, pos, true, false);
    }
    let frames = run_until_settled(&mut system, &mut world, &mut uploader, "shaft")?;
    log::info!(
        "shaft settled in {} frames, cave sky {}",
        frames,
        system.get_sky_light(&world, cave)
    );

    // Remove the torch again
    world.set_block(torch, BlockId::AIR);
    system.remove_light_source(&mut world, torch);
    let frames = run_until_settled(&mut system, &mut world, &mut uploader, "remove")?;
    log::info!("torch removal settled in {} frames", frames);

    // Sunset: refresh what the camera sees once the sky band changes
    system.set_time_of_day(TimeOfDay::new(17.5));
    let eye = Point3::new(0.0, 40.0, 0.0);
    let view = Matrix4::look_at_rh(eye, Point3::new(60.0, 20.0, 0.0), Vector3::unit_y());
    let projection = cgmath::perspective(Deg(70.0), 16.0 / 9.0, 0.1, 300.0);
    let frustum = Frustum::from_view_projection(&(projection * view));
    if system.take_viewport_refresh_request() {
        let visible = system.recalculate_viewport_lighting(&mut world, &frustum, eye);
        log::info!(
            "{:?} band, brightness {:.2}: refreshed {} visible chunks",
            system.light_band(),
            system.sky_brightness(),
            visible
        );
        run_until_settled(&mut system, &mut world, &mut uploader, "sunset")?;
    }

    println!(
        "done: {} sources, {} mesh uploads",
        system.sources().len(),
        uploader.uploads
    );
    Ok(())
}
