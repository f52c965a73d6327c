//! Heightmap generation by chaining fractal refinement over growing maps.

use rand::Rng;
use tracing::debug;

use crate::geometry::GridError;
use crate::noise::{refine_heights, seed_heights, FractalConfig};
use super::icosahedron::{Icosahedron, MAX_HEIGHT};

/// Runs the full fractal chain described by `config` and returns the final map.
///
/// The base map is seeded at random, then each level doubles the face size
/// and refines against the previous level with half the variation.
pub fn fractal_height_map<R: Rng>(
    config: &FractalConfig,
    rng: &mut R,
) -> Result<Icosahedron, GridError> {
    let levels = config.levels()?;
    let mut parent = Icosahedron::new(config.base_face_size)?;
    seed_heights(&mut parent, rng);
    debug!(face_size = parent.face_size(), "terrain.heightmap.seeded");

    let mut variation = config.variation;
    for _ in 0..levels {
        let mut map = Icosahedron::new(parent.face_size() * 2)?;
        refine_heights(&mut map, &parent, variation, rng)?;
        debug!(face_size = map.face_size(), variation, "terrain.heightmap.refined");
        variation /= 2;
        parent = map;
    }

    Ok(parent)
}

/// Generates fractal heights for an existing map.
///
/// The chain ends at `grid.face_size()` whatever `config.face_size` says;
/// the resulting heights are copied into `grid`, leaving its tiles alone.
pub fn generate_height_map<R: Rng>(
    grid: &mut Icosahedron,
    config: &FractalConfig,
    rng: &mut R,
) -> Result<(), GridError> {
    let config = FractalConfig {
        face_size: grid.face_size(),
        ..config.clone()
    };
    let source = fractal_height_map(&config, rng)?;
    grid.copy_heights_from(&source)
}

/// The elevation below which `percentage` percent of the map lies.
///
/// Walks a histogram of elevations upward from zero until the requested
/// share of cells is covered.
pub fn sea_level(grid: &Icosahedron, percentage: u32) -> u8 {
    let mut histogram = [0usize; MAX_HEIGHT as usize + 1];
    for &h in grid.heights() {
        histogram[h as usize] += 1;
    }

    let mut to_cover = (grid.cell_count() * percentage as usize / 100) as isize;
    let mut height = 0usize;
    while to_cover > 0 && height < MAX_HEIGHT as usize {
        to_cover -= histogram[height] as isize;
        height += 1;
    }
    height as u8
}
