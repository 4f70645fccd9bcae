/// Frustum-restricted sky light refresh.
///
/// Large global shifts (day/night band changes) would otherwise re-seed the
/// whole loaded world. Only chunks intersecting the camera frustum are
/// refreshed; off-screen chunks keep their lighting until dirty-marking or a
/// later refresh catches them.
///
/// A refresh both raises and lowers: columns are re-seeded, then any sky
/// light in a visible chunk brighter than its neighbours can supply is
/// handed to the removal walk.

use cgmath::{Matrix4, Point3};
use rustc_hash::FxHashSet;

use crate::constants::chunk::{CHUNK_SIZE, CHUNK_SIZE_F32};
use crate::lighting::skylight::chunk_column_tops;
use crate::lighting::{LightType, LightingSystem};
use crate::world::{ChunkHandle, ChunkPos, LightWorld, LocalPos};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Plane {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

impl Plane {
    pub fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self { a, b, c, d }
    }

    pub fn normalize(&mut self) {
        let len = (self.a * self.a + self.b * self.b + self.c * self.c).sqrt();
        if len > 0.0 {
            self.a /= len;
            self.b /= len;
            self.c /= len;
            self.d /= len;
        }
    }

    pub fn distance_to_point(&self, point: [f32; 3]) -> f32 {
        self.a * point[0] + self.b * point[1] + self.c * point[2] + self.d
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6], // Left, right, bottom, top, near, far
}

impl Frustum {
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Extract the six planes of a view-projection matrix (OpenGL clip space)
    pub fn from_view_projection(view_proj: &Matrix4<f32>) -> Self {
        let m: [[f32; 4]; 4] = (*view_proj).into();
        let row = |r: usize, sign: f32| {
            Plane::new(
                m[0][3] + sign * m[0][r],
                m[1][3] + sign * m[1][r],
                m[2][3] + sign * m[2][r],
                m[3][3] + sign * m[3][r],
            )
        };

        let mut planes = [
            row(0, 1.0),  // Left
            row(0, -1.0), // Right
            row(1, 1.0),  // Bottom
            row(1, -1.0), // Top
            row(2, 1.0),  // Near
            row(2, -1.0), // Far
        ];
        for plane in &mut planes {
            plane.normalize();
        }

        Self { planes }
    }

    pub fn contains_sphere(&self, center: [f32; 3], radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) >= -radius)
    }

    /// Conservative box test: false only when the box lies fully outside one plane
    pub fn contains_aabb(&self, min: [f32; 3], max: [f32; 3]) -> bool {
        self.planes.iter().all(|plane| {
            // Corner furthest along the plane normal
            let positive = [
                if plane.a >= 0.0 { max[0] } else { min[0] },
                if plane.b >= 0.0 { max[1] } else { min[1] },
                if plane.c >= 0.0 { max[2] } else { min[2] },
            ];
            plane.distance_to_point(positive) >= 0.0
        })
    }

    pub fn contains_chunk(&self, pos: ChunkPos) -> bool {
        let min = pos.to_world_pos();
        self.contains_aabb(
            [min.x, min.y, min.z],
            [min.x + CHUNK_SIZE_F32, min.y + CHUNK_SIZE_F32, min.z + CHUNK_SIZE_F32],
        )
    }
}

/// Loaded chunks intersecting `frustum`, nearest to `player_pos` first
pub fn visible_chunks(
    world: &dyn LightWorld,
    frustum: &Frustum,
    player_pos: Point3<f32>,
) -> Vec<(ChunkHandle, ChunkPos)> {
    let mut visible: Vec<(f32, ChunkHandle, ChunkPos)> = world
        .loaded_chunks()
        .into_iter()
        .filter(|&(_, pos)| frustum.contains_chunk(pos))
        .map(|(handle, pos)| {
            let center = pos.center();
            let dx = center.x - player_pos.x;
            let dy = center.y - player_pos.y;
            let dz = center.z - player_pos.z;
            (dx * dx + dy * dy + dz * dz, handle, pos)
        })
        .collect();

    visible.sort_by(|a, b| a.0.total_cmp(&b.0));
    visible
        .into_iter()
        .map(|(_, handle, pos)| (handle, pos))
        .collect()
}

impl LightingSystem {
    pub fn get_visible_chunks(
        &self,
        world: &dyn LightWorld,
        frustum: &Frustum,
        player_pos: Point3<f32>,
    ) -> Vec<(ChunkHandle, ChunkPos)> {
        visible_chunks(world, frustum, player_pos)
    }

    /// Re-seed sky light for every chunk column that has a visible chunk and
    /// mark the visible chunks dirty, nearest first. Stale sky light left in
    /// the visible chunks is queued for removal. Spill seeds and removals go
    /// through the ordinary frame-sliced queues. Returns the number of
    /// visible chunks.
    pub fn recalculate_viewport_lighting(
        &mut self,
        world: &mut dyn LightWorld,
        frustum: &Frustum,
        player_pos: Point3<f32>,
    ) -> usize {
        let visible = visible_chunks(&*world, frustum, player_pos);
        if visible.is_empty() {
            return 0;
        }

        for &(handle, _) in &visible {
            self.dirty.mark(handle);
        }

        let tops = chunk_column_tops(&*world);
        let columns: FxHashSet<(i32, i32)> = visible.iter().map(|(_, pos)| (pos.x, pos.z)).collect();
        let spans = self.seed_sky_columns(world, &tops, &columns);
        let seeds = self.queue_sky_spill(&*world, &spans);

        let mut stale = 0;
        for &(_, chunk_pos) in &visible {
            stale += self.clear_stale_sky(world, chunk_pos);
        }

        log::debug!(
            "[lighting] viewport refresh: {} visible chunks, {} columns, {} spill seeds, {} stale voxels",
            visible.len(),
            columns.len(),
            seeds,
            stale
        );
        visible.len()
    }

    /// Start a removal at every voxel of the chunk whose sky light exceeds
    /// what its registered source and neighbours support.
    ///
    /// Every over-bright region has at least one such voxel: sky light only
    /// holds its level when travelling straight down, so a region cannot
    /// support itself without a voxel on its upper edge.
    fn clear_stale_sky(&mut self, world: &mut dyn LightWorld, chunk_pos: ChunkPos) -> usize {
        let mut stale = 0;
        for y in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                for x in 0..CHUNK_SIZE {
                    let pos = LocalPos::new(x, y, z).to_voxel_pos(chunk_pos);
                    let stored = Self::read_light(&*world, pos, LightType::Sky);
                    if stored == 0 {
                        continue;
                    }

                    let mut supported = self.sources.level(pos, LightType::Sky).unwrap_or(0);
                    if world.is_block_transparent(pos) {
                        supported = supported.max(self.incoming_light(&*world, pos, LightType::Sky));
                    }
                    if stored > supported {
                        self.start_removal(world, pos, LightType::Sky);
                        stale += 1;
                    }
                }
            }
        }
        stale
    }
}
