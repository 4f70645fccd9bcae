use std::io::Write;

use voxel_lighting::constants::budget::{
    MAX_LIGHT_ADDS_PER_FRAME, MAX_LIGHT_REMOVES_PER_FRAME, MAX_MESH_REGENERATIONS_PER_FRAME,
};
use voxel_lighting::world::{
    BlockId, ChunkHandle, ChunkMeshUploader, ChunkPos, LightWorld, LocalPos, VoxelPos, VoxelWorld,
};
use voxel_lighting::{LightMap, LightingConfig, LightingSystem};

fn load_cube(world: &mut VoxelWorld, min: i32, max: i32) {
    for x in min..=max {
        for y in min..=max {
            for z in min..=max {
                world.load_chunk(ChunkPos::new(x, y, z));
            }
        }
    }
}

fn open_world() -> VoxelWorld {
    let mut world = VoxelWorld::new();
    load_cube(&mut world, -1, 1);
    world
}

fn settle(system: &mut LightingSystem, world: &mut VoxelWorld) -> usize {
    let mut frames = 0;
    while !system.queues_empty() {
        system.update(0.016, world, None);
        frames += 1;
        assert!(frames < 100_000, "lighting never converged");
    }
    frames
}

fn light_snapshot(world: &VoxelWorld) -> Vec<(ChunkPos, LightMap)> {
    let mut maps: Vec<(ChunkPos, LightMap)> = world
        .loaded_chunks()
        .into_iter()
        .filter_map(|(_, pos)| world.chunk_at(pos).map(|c| (pos, c.light().clone())))
        .collect();
    maps.sort_by_key(|(pos, _)| (pos.x, pos.y, pos.z));
    maps
}

#[derive(Default)]
struct RecordingUploader {
    uploads: Vec<ChunkHandle>,
}

impl ChunkMeshUploader for RecordingUploader {
    fn upload_chunk_mesh(&mut self, handle: ChunkHandle, _pos: ChunkPos) {
        self.uploads.push(handle);
    }
}

#[test]
fn convergence_does_not_depend_on_insertion_order() {
    let sources = [
        (VoxelPos::new(0, 0, 0), 14),
        (VoxelPos::new(5, 3, -2), 9),
        (VoxelPos::new(-7, 1, 4), 15),
    ];

    let mut snapshots = Vec::new();
    for order in [[0, 1, 2], [2, 1, 0], [1, 2, 0]] {
        let mut world = open_world();
        world.fill(VoxelPos::new(-3, -10, -10), VoxelPos::new(-3, 10, 10), BlockId::STONE);
        let mut system = LightingSystem::default();
        for i in order {
            let (pos, level) = sources[i];
            system.add_light_source(&mut world, pos, level);
            // Interleave partial frames with insertions
            system.update(0.016, &mut world, None);
        }
        settle(&mut system, &mut world);
        snapshots.push(light_snapshot(&world));
    }

    assert!(snapshots.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn open_shaft_to_sky_is_fully_lit() {
    let mut world = VoxelWorld::new();
    for cy in -1..=1 {
        world.load_chunk(ChunkPos::new(0, cy, 0));
    }
    world.fill(VoxelPos::new(0, -32, 0), VoxelPos::new(31, 63, 31), BlockId::STONE);
    world.fill(VoxelPos::new(12, -32, 12), VoxelPos::new(12, 63, 12), BlockId::AIR);

    let mut system = LightingSystem::default();
    system.initialize_world_lighting(&mut world);

    for y in -32..=63 {
        assert_eq!(system.get_sky_light(&world, VoxelPos::new(12, y, 12)), 15, "y = {}", y);
    }
}

#[test]
fn update_respects_frame_quotas() {
    let mut world = open_world();
    let mut system = LightingSystem::default();
    let torch = VoxelPos::new(0, 0, 0);
    system.add_light_source(&mut world, torch, 15);

    let stats = system.update(0.016, &mut world, None);
    assert_eq!(stats.additions_processed, MAX_LIGHT_ADDS_PER_FRAME);
    assert!(stats.chunks_regenerated <= MAX_MESH_REGENERATIONS_PER_FRAME);
    assert!(system.pending_additions() > 0);

    loop {
        let stats = system.update(0.016, &mut world, None);
        assert!(stats.additions_processed <= MAX_LIGHT_ADDS_PER_FRAME);
        assert!(stats.chunks_regenerated <= MAX_MESH_REGENERATIONS_PER_FRAME);
        if system.queues_empty() {
            break;
        }
    }

    system.remove_light_source(&mut world, torch);
    let stats = system.update(0.016, &mut world, None);
    assert_eq!(stats.removal_work(), MAX_LIGHT_REMOVES_PER_FRAME);
    assert!(stats.additions_processed <= MAX_LIGHT_ADDS_PER_FRAME);
    assert!(system.pending_removals() > 0);

    while !system.queues_empty() {
        let stats = system.update(0.016, &mut world, None);
        assert!(stats.removal_work() <= MAX_LIGHT_REMOVES_PER_FRAME);
        assert!(stats.additions_processed <= MAX_LIGHT_ADDS_PER_FRAME);
    }
    assert_eq!(system.get_block_light(&world, torch), 0);
}

#[test]
fn new_sources_light_up_while_a_long_removal_runs() {
    let mut world = open_world();
    let mut system = LightingSystem::default();
    let torch = VoxelPos::new(0, 0, 0);
    system.add_light_source(&mut world, torch, 15);
    settle(&mut system, &mut world);

    system.remove_light_source(&mut world, torch);
    let lamp = VoxelPos::new(-30, 20, 25);
    system.add_light_source(&mut world, lamp, 10);

    let mut lit_during_removal = false;
    let mut frames = 0;
    while !system.queues_empty() {
        system.update(0.016, &mut world, None);
        if system.pending_removals() > 0
            && system.get_block_light(&world, VoxelPos::new(-30, 20, 20)) == 5
        {
            lit_during_removal = true;
        }
        frames += 1;
        assert!(frames < 100_000, "lighting never converged");
    }

    assert!(lit_during_removal, "additions starved behind the removal");
    assert_eq!(system.get_block_light(&world, torch), 0);
    assert_eq!(system.get_block_light(&world, VoxelPos::new(-30, 20, 20)), 5);
}

#[test]
fn removing_one_of_two_overlapping_sources_keeps_the_other() {
    let a = VoxelPos::new(-4, 0, 0);
    let b = VoxelPos::new(4, 0, 0);
    let sample = VoxelPos::new(0, 2, 1);

    // Reference: b alone
    let mut reference_world = open_world();
    let mut reference = LightingSystem::default();
    reference.add_light_source(&mut reference_world, b, 13);
    settle(&mut reference, &mut reference_world);

    let mut world = open_world();
    let mut system = LightingSystem::default();
    system.add_light_source(&mut world, a, 13);
    system.add_light_source(&mut world, b, 13);
    settle(&mut system, &mut world);
    assert_eq!(system.get_block_light(&world, sample), 6);

    system.remove_light_source(&mut world, a);
    settle(&mut system, &mut world);

    assert_eq!(
        system.get_block_light(&world, sample),
        reference.get_block_light(&reference_world, sample)
    );
    assert_eq!(light_snapshot(&world), light_snapshot(&reference_world));
}

#[test]
fn removing_unregistered_source_changes_nothing() {
    let mut world = open_world();
    let mut system = LightingSystem::default();
    system.add_light_source(&mut world, VoxelPos::new(1, 1, 1), 10);
    settle(&mut system, &mut world);
    let before = light_snapshot(&world);

    system.remove_light_source(&mut world, VoxelPos::new(2, 1, 1));
    system.remove_light_source(&mut world, VoxelPos::new(-20, 5, 9));

    assert!(system.queues_empty());
    assert_eq!(system.pending_removals(), 0);
    assert_eq!(light_snapshot(&world), before);
}

#[test]
fn dirty_marking_follows_chunk_faces() {
    let world = open_world();
    let mut system = LightingSystem::default();
    let origin = ChunkPos::new(0, 0, 0);

    system.mark_neighbor_chunks_dirty(&world, origin, LocalPos::new(16, 16, 16));
    assert_eq!(system.dirty_chunk_count(), 1);

    system.mark_neighbor_chunks_dirty(&world, origin, LocalPos::new(16, 0, 16));
    assert_eq!(system.dirty_chunk_count(), 2);
    let below = world.chunk_handle(ChunkPos::new(0, -1, 0)).expect("loaded");
    assert!(system.is_chunk_dirty(below));

    system.mark_neighbor_chunks_dirty(&world, origin, LocalPos::new(31, 31, 31));
    assert_eq!(system.dirty_chunk_count(), 5);
}

#[test]
fn unloaded_chunk_is_never_regenerated() {
    let mut world = VoxelWorld::new();
    world.load_chunk(ChunkPos::new(0, 0, 0));
    world.load_chunk(ChunkPos::new(1, 0, 0));
    let mut system = LightingSystem::default();
    system.add_light_source(&mut world, VoxelPos::new(31, 4, 4), 15);
    system.update(0.016, &mut world, None);

    let east = world.chunk_handle(ChunkPos::new(1, 0, 0)).expect("loaded");
    system.update(0.016, &mut world, None);
    system.add_light_source(&mut world, VoxelPos::new(33, 4, 4), 15);
    assert!(system.is_chunk_dirty(east));

    system.notify_chunk_unload(east);
    world.unload_chunk(ChunkPos::new(1, 0, 0));
    assert!(!system.is_chunk_dirty(east));

    // A new chunk may reuse the slot; the old handle must stay dead
    let reloaded = world.load_chunk(ChunkPos::new(1, 0, 0));
    assert_ne!(reloaded, east);

    let mut uploader = RecordingUploader::default();
    for _ in 0..100 {
        system.update(0.016, &mut world, Some(&mut uploader));
    }
    system.regenerate_all_dirty_chunks(&mut world, Some(&mut uploader));

    assert!(system.queues_empty());
    assert!(!uploader.uploads.contains(&east));
}

#[test]
fn torch_in_small_cavity() {
    let mut world = VoxelWorld::new();
    load_cube(&mut world, -1, 0);
    world.fill(VoxelPos::new(-32, -32, -32), VoxelPos::new(31, 31, 31), BlockId::STONE);
    world.fill(VoxelPos::new(-2, -2, -2), VoxelPos::new(2, 2, 2), BlockId::AIR);

    let mut system = LightingSystem::default();
    system.add_light_source(&mut world, VoxelPos::new(0, 0, 0), 14);
    settle(&mut system, &mut world);

    assert_eq!(system.get_block_light(&world, VoxelPos::new(0, 0, 0)), 14);
    assert_eq!(system.get_block_light(&world, VoxelPos::new(1, 0, 0)), 13);
    assert_eq!(system.get_block_light(&world, VoxelPos::new(2, 0, 0)), 12);
    assert_eq!(system.get_block_light(&world, VoxelPos::new(20, 0, 0)), 0);
    assert_eq!(system.get_block_light(&world, VoxelPos::new(3, 0, 0)), 0);
}

#[test]
fn midpoint_between_two_sources_takes_the_max() {
    let mut world = open_world();
    let mut system = LightingSystem::default();
    system.add_light_source(&mut world, VoxelPos::new(0, 0, 0), 15);
    system.add_light_source(&mut world, VoxelPos::new(6, 0, 0), 10);
    settle(&mut system, &mut world);

    // 15 - 3 = 12 against 10 - 3 = 7
    assert_eq!(system.get_block_light(&world, VoxelPos::new(3, 0, 0)), 12);
    assert_eq!(system.get_combined_light(&world, VoxelPos::new(3, 0, 0)), 12);
}

#[test]
fn quotas_come_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "max_light_adds_per_frame = 7").expect("write");
    writeln!(file, "max_mesh_regenerations_per_frame = 1").expect("write");

    let config = LightingConfig::load(file.path()).expect("valid config");
    let mut world = open_world();
    let mut system = LightingSystem::new(config);
    system.add_light_source(&mut world, VoxelPos::new(31, 31, 31), 12);

    let stats = system.update(0.016, &mut world, None);
    assert_eq!(stats.additions_processed, 7);
    assert_eq!(stats.chunks_regenerated, 1);
    assert!(system.dirty_chunk_count() > 0);
}
