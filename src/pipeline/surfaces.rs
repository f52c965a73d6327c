//! Surface stages that paint tiles over a generated height map.
//!
//! Each world type is a short pipeline: the fractal height map first, then
//! one stage that classifies, floods and craters the surface.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::stage::{GenerationStage, Pipeline, PipelineError, StageContext};
use crate::dice::Dice;
use crate::growth::{add_rift, flood, flood_to_percentage, grow_border, scatter_craters};
use crate::terrain::{generate_height_map, sea_level, Icosahedron};
use crate::tile::Tile;

const HEIGHTMAP: &str = "heightmap";

/// Temperature assumed when a stage config sets none; temperate enough for
/// modest polar caps.
pub const DEFAULT_TEMPERATURE_K: f64 = 288.0;

fn maria() -> Tile {
    Tile::new("Seas", [0x40, 0x40, 0x40], false).with_jitter(2)
}

fn highlands() -> Tile {
    Tile::new("Highlands", [0x8B, 0x8B, 0x88], false).with_jitter(2)
}

fn dark_grey() -> Tile {
    Tile::new("Dark Grey", [0x80, 0x82, 0x80], false).with_jitter(2)
}

fn mid_grey() -> Tile {
    Tile::new("Mid Grey", [0x84, 0x86, 0x84], false).with_jitter(2)
}

fn light_grey() -> Tile {
    Tile::new("Light Grey", [0x8B, 0x8B, 0x88], false).with_jitter(2)
}

fn rift() -> Tile {
    Tile::new("Rift", [0x40, 0x40, 0x40], false).with_jitter(1)
}

fn water() -> Tile {
    Tile::new("Water", [0x70, 0x70, 0xC0], true).with_jitter(2)
}

fn land() -> Tile {
    Tile::new("Land", [0x80, 0x70, 0x50], false).with_jitter(3)
}

fn land_ice() -> Tile {
    Tile::new("Land Ice", [0xC0, 0xC0, 0xC0], false).with_jitter(2)
}

fn sea_ice() -> Tile {
    Tile::new("Sea Ice", [0xD0, 0xD0, 0xD0], true).with_jitter(2)
}

/// Collapses elevation to three bands so bump maps read cleanly.
fn quantize_height(h: u8) -> i32 {
    match h {
        0..=20 => 10,
        21..=89 => 50,
        _ => 100,
    }
}

/// Fractal elevation over the whole map. Tiles are left alone.
pub struct HeightmapStage;

impl GenerationStage for HeightmapStage {
    fn id(&self) -> &'static str {
        HEIGHTMAP
    }

    fn name(&self) -> &str {
        "Heightmap Generation"
    }

    fn execute(&self, grid: &mut Icosahedron, ctx: &mut StageContext) -> Result<(), PipelineError> {
        generate_height_map(grid, &ctx.config.fractal, &mut ctx.rng)?;
        Ok(())
    }
}

/// Paints every cell grey by elevation, for viewing the bare height map.
pub struct ReliefStage;

impl GenerationStage for ReliefStage {
    fn id(&self) -> &'static str {
        "relief"
    }

    fn name(&self) -> &str {
        "Relief Shading"
    }

    fn dependencies(&self) -> &[&'static str] {
        &[HEIGHTMAP]
    }

    fn execute(&self, grid: &mut Icosahedron, _ctx: &mut StageContext) -> Result<(), PipelineError> {
        grid.heights_to_tiles();
        Ok(())
    }
}

/// Barren grey highlands with dark lava seas in the lowlands.
pub struct MariaStage;

impl GenerationStage for MariaStage {
    fn id(&self) -> &'static str {
        "maria"
    }

    fn name(&self) -> &str {
        "Maria"
    }

    fn dependencies(&self) -> &[&'static str] {
        &[HEIGHTMAP]
    }

    fn execute(&self, grid: &mut Icosahedron, ctx: &mut StageContext) -> Result<(), PipelineError> {
        let (maria, highlands) = (maria(), highlands());
        let sea = sea_level(grid, 5);
        let cells: Vec<_> = grid.cells().collect();

        for &cell in &cells {
            let h = grid.height_at(cell);
            let tile = if h <= sea {
                maria.clone()
            } else {
                highlands.shaded(50 + h as u32 / 2)
            };
            grid.set_tile_at(cell, tile);
        }

        // Shade only once flooding is done, so seeds and flooded cells match.
        flood_to_percentage(grid, &maria, 20, false, &mut ctx.rng)?;
        grow_border(grid, &maria, 2, 2)?;
        for &cell in &cells {
            if grid.tile_at(cell).same_kind(&maria) {
                let h = grid.height_at(cell) as u32;
                grid.set_tile_at(cell, maria.shaded(75 + h / 2));
            }
        }

        tracing::debug!(sea_level = sea, maria = grid.count_kind(&maria), "pipeline.maria.painted");
        Ok(())
    }
}

/// Heavily cratered grey plains, as on a hot airless world.
///
/// Reads the `great_rift` param: when positive, one long rift is cut
/// across the surface.
pub struct CrateredPlainsStage;

impl CrateredPlainsStage {
    fn kind_for_height<R: Dice>(h: u8, rng: &mut R) -> Tile {
        match rng.dice(4, 2) + h as u32 / 24 {
            2 => light_grey(),
            3..=9 => mid_grey(),
            _ => dark_grey(),
        }
    }
}

impl GenerationStage for CrateredPlainsStage {
    fn id(&self) -> &'static str {
        "cratered_plains"
    }

    fn name(&self) -> &str {
        "Cratered Plains"
    }

    fn dependencies(&self) -> &[&'static str] {
        &[HEIGHTMAP]
    }

    fn execute(&self, grid: &mut Icosahedron, ctx: &mut StageContext) -> Result<(), PipelineError> {
        let rng = &mut ctx.rng;
        let light = light_grey();
        let cells: Vec<_> = grid.cells().collect();

        for &cell in &cells {
            let tile = Self::kind_for_height(grid.height_at(cell), rng);
            grid.set_tile_at(cell, tile);
        }
        flood(grid, &dark_grey(), 3, rng);
        flood(grid, &light, 7, rng);

        let mut cratered = 0usize;
        for &cell in &cells {
            let tile = grid.tile_at(cell);
            let hit = if tile.same_kind(&light) {
                rng.d3() == 1
            } else {
                rng.d2() == 1 || rng.d6() == 1
            };
            if hit {
                let detailed = tile.cratered();
                grid.set_tile_at(cell, detailed);
                cratered += 1;
            }
        }

        for &cell in &cells {
            let h = quantize_height(grid.height_at(cell));
            grid.set_height_at(cell, h);
        }
        scatter_craters(grid, 0, 250, rng);

        if ctx.config.get_param("great_rift", 0.0) > 0.0 {
            let length = 8 + rng.dice(6, 2);
            add_rift(grid, &rift(), length, rng);
        }

        tracing::debug!(cratered, "pipeline.cratered_plains.painted");
        Ok(())
    }
}

/// Oceans and continents with polar ice.
///
/// Reads the `temperature_k` param: above 250 K the ice line retreats
/// poleward at 1.5 degrees per kelvin.
pub struct OceanWorldStage;

impl OceanWorldStage {
    fn ice_line(temperature_k: f64) -> i32 {
        if temperature_k > 250.0 {
            ((temperature_k - 250.0) * 1.5) as i32
        } else {
            0
        }
    }
}

impl GenerationStage for OceanWorldStage {
    fn id(&self) -> &'static str {
        "ocean_world"
    }

    fn name(&self) -> &str {
        "Ocean World"
    }

    fn dependencies(&self) -> &[&'static str] {
        &[HEIGHTMAP]
    }

    fn execute(&self, grid: &mut Icosahedron, ctx: &mut StageContext) -> Result<(), PipelineError> {
        let rng = &mut ctx.rng;
        let (water, land) = (water(), land());
        let cells: Vec<_> = grid.cells().collect();

        for &cell in &cells {
            grid.set_tile_at(cell, water.clone());
        }

        let rows = grid.num_rows();
        let continents = 4 + rng.d6();
        for _ in 0..continents {
            let y = (rng.roll_zero(rows.saturating_sub(4)) + 2).min(rows - 1);
            let x = rng.roll_zero(grid.topology().width(y));
            grid.set_tile(x as isize, y as isize, land.clone());
        }
        flood_to_percentage(grid, &land, 30, true, rng)?;

        for &cell in &cells {
            let h = grid.height_at(cell) as u32;
            let shaded = if grid.tile_at(cell).is_water() {
                water.shaded((h + 200) / 3)
            } else {
                land.shaded((h + 100) / 2)
            };
            grid.set_tile_at(cell, shaded);
        }

        let temperature = ctx.config.get_param("temperature_k", DEFAULT_TEMPERATURE_K);
        let ice_line = Self::ice_line(temperature);
        for &cell in &cells {
            let lat = grid.latitude(cell.y) as i32;
            let h = grid.height_at(cell) as i32;
            if grid.tile_at(cell).is_water() {
                if lat + h / 10 > ice_line {
                    grid.set_tile_at(cell, sea_ice());
                }
            } else if lat + h / 5 > ice_line {
                grid.set_tile_at(cell, land_ice());
            }
        }

        for &cell in &cells {
            let h = if grid.tile_at(cell).is_water() {
                1
            } else if grid.height_at(cell) < 90 {
                50
            } else {
                100
            };
            grid.set_height_at(cell, h);
        }
        scatter_craters(grid, 0, 50, rng);

        tracing::debug!(continents, ice_line, temperature, "pipeline.ocean_world.painted");
        Ok(())
    }
}

/// World types with a ready-made pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    /// Bare elevation, shaded grey.
    Heightmap,
    /// Grey highlands and dark maria.
    Selenian,
    /// Cratered grey plains.
    Hermian,
    /// Oceans, continents and ice caps.
    Terrestrial,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 4] = [
        SurfaceKind::Heightmap,
        SurfaceKind::Selenian,
        SurfaceKind::Hermian,
        SurfaceKind::Terrestrial,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SurfaceKind::Heightmap => "heightmap",
            SurfaceKind::Selenian => "selenian",
            SurfaceKind::Hermian => "hermian",
            SurfaceKind::Terrestrial => "terrestrial",
        }
    }

    /// Builds the pipeline that generates this kind of surface.
    pub fn pipeline(self) -> Pipeline {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(HeightmapStage);
        match self {
            SurfaceKind::Heightmap => {
                pipeline.add_stage(ReliefStage);
            }
            SurfaceKind::Selenian => {
                pipeline.add_stage(MariaStage);
            }
            SurfaceKind::Hermian => {
                pipeline.add_stage(CrateredPlainsStage);
            }
            SurfaceKind::Terrestrial => {
                pipeline.add_stage(OceanWorldStage);
            }
        }
        pipeline
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SurfaceKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PipelineError::UnknownSurface(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::CRATER_HEIGHT;
    use crate::noise::FractalConfig;
    use crate::pipeline::StageConfig;
    use crate::tile::TileDetail;

    fn run(kind: SurfaceKind, face_size: usize, seed: u64, config: StageConfig) -> Icosahedron {
        let mut grid = Icosahedron::new(face_size).unwrap();
        let mut ctx = StageContext::new(seed, config);
        kind.pipeline().run(&mut grid, &mut ctx).unwrap();
        grid
    }

    fn config(face_size: usize) -> StageConfig {
        StageConfig::with_fractal(FractalConfig::with_face_size(face_size))
    }

    #[test]
    fn test_quantize_height() {
        assert_eq!(quantize_height(1), 10);
        assert_eq!(quantize_height(20), 10);
        assert_eq!(quantize_height(21), 50);
        assert_eq!(quantize_height(89), 50);
        assert_eq!(quantize_height(90), 100);
    }

    #[test]
    fn test_ice_line() {
        assert_eq!(OceanWorldStage::ice_line(200.0), 0);
        assert_eq!(OceanWorldStage::ice_line(250.0), 0);
        assert_eq!(OceanWorldStage::ice_line(288.0), 57);
    }

    #[test]
    fn test_heightmap_stage_leaves_tiles() {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(HeightmapStage);
        let mut grid = Icosahedron::new(6).unwrap();
        let mut ctx = StageContext::new(7, config(6));
        pipeline.run(&mut grid, &mut ctx).unwrap();
        assert!(grid.tiles().iter().all(|t| t == &Tile::default()));
        let distinct: std::collections::BTreeSet<_> = grid.heights().iter().collect();
        assert!(distinct.len() > 5);
    }

    #[test]
    fn test_relief_surface_is_grey_by_height() {
        let grid = run(SurfaceKind::Heightmap, 6, 7, config(6));
        for cell in grid.cells() {
            let level = grid.height_at(cell) as i32 * 2;
            assert_eq!(grid.tile_at(cell), &Tile::grey(level, false));
        }
    }

    #[test]
    fn test_selenian_surface() {
        let grid = run(SurfaceKind::Selenian, 6, 11, config(6));
        let maria = grid.count_kind(&maria());
        let highlands = grid.count_kind(&highlands());
        assert_eq!(maria + highlands, grid.cell_count());
        assert!(maria > grid.cell_count() * 20 / 100, "{} maria", maria);
        assert!(highlands > 0);
    }

    #[test]
    fn test_hermian_surface() {
        let grid = run(SurfaceKind::Hermian, 6, 5, config(6));
        let greys = grid.count_kind(&dark_grey())
            + grid.count_kind(&mid_grey())
            + grid.count_kind(&light_grey());
        assert_eq!(greys, grid.cell_count());
        assert!(grid
            .heights()
            .iter()
            .all(|h| [CRATER_HEIGHT, 50, 100].contains(h)));
        assert!(grid
            .tiles()
            .iter()
            .any(|t| t.detail() == TileDetail::Cratered));
    }

    #[test]
    fn test_hermian_great_rift() {
        let mut cfg = config(6);
        cfg.set_param("great_rift", 1.0);
        let grid = run(SurfaceKind::Hermian, 6, 5, cfg);
        assert!(grid.count_kind(&rift()) > 0);
    }

    #[test]
    fn test_warm_terrestrial_has_no_ice() {
        let mut cfg = config(6);
        cfg.set_param("temperature_k", 400.0);
        let grid = run(SurfaceKind::Terrestrial, 6, 3, cfg);
        let required = grid.cell_count() * 30 / 100;
        assert_eq!(grid.count_kind(&land()), required + 1);
        assert_eq!(grid.count_kind(&land()) + grid.count_kind(&water()), grid.cell_count());
        for cell in grid.cells() {
            let h = grid.height_at(cell);
            if grid.tile_at(cell).is_water() {
                assert_eq!(h, 1);
            } else {
                assert!([CRATER_HEIGHT, 50, 100].contains(&h));
            }
        }
    }

    #[test]
    fn test_frozen_terrestrial_is_all_ice() {
        let mut cfg = config(6);
        cfg.set_param("temperature_k", 200.0);
        let grid = run(SurfaceKind::Terrestrial, 6, 3, cfg);
        for cell in grid.cells().filter(|c| grid.latitude(c.y) > 0) {
            let tile = grid.tile_at(cell);
            assert!(tile.same_kind(&sea_ice()) || tile.same_kind(&land_ice()), "{:?}", cell);
        }
        assert!(grid.count_kind(&sea_ice()) > 0);
        assert!(grid.count_kind(&land_ice()) > 0);
    }

    #[test]
    fn test_temperate_ice_caps_are_polar() {
        let grid = run(SurfaceKind::Terrestrial, 6, 9, config(6));
        let rows = grid.num_rows();
        let middle = rows / 2;
        for x in 0..grid.topology().width(middle) {
            let tile = grid.tile(x as isize, middle as isize);
            assert!(!tile.same_kind(&sea_ice()) && !tile.same_kind(&land_ice()));
        }
        let pole = grid.tile(0, 0);
        assert!(pole.same_kind(&sea_ice()) || pole.same_kind(&land_ice()));
    }

    #[test]
    fn test_pipeline_is_reproducible() {
        let a = run(SurfaceKind::Hermian, 6, 21, config(6));
        let b = run(SurfaceKind::Hermian, 6, 21, config(6));
        assert_eq!(a.heights(), b.heights());
        assert_eq!(a.tiles(), b.tiles());
    }

    #[test]
    fn test_surface_kind_pipelines() {
        for kind in SurfaceKind::ALL {
            let pipeline = kind.pipeline();
            assert_eq!(pipeline.stage_count(), 2);
            assert_eq!(pipeline.stage_names()[0], "Heightmap Generation");
        }
    }

    #[test]
    fn test_surface_kind_from_str() {
        assert_eq!("Selenian".parse::<SurfaceKind>().unwrap(), SurfaceKind::Selenian);
        for kind in SurfaceKind::ALL {
            assert_eq!(kind.to_string().parse::<SurfaceKind>().unwrap(), kind);
        }
        assert!(matches!(
            "gaian".parse::<SurfaceKind>(),
            Err(PipelineError::UnknownSurface(_))
        ));
    }

    #[test]
    fn test_stage_without_heightmap_fails() {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(MariaStage);
        let mut grid = Icosahedron::new(3).unwrap();
        let mut ctx = StageContext::new(1, config(3));
        assert!(matches!(
            pipeline.run(&mut grid, &mut ctx),
            Err(PipelineError::MissingDependency { .. })
        ));
    }
}
