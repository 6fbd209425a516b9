//! Headless demo: build a world and report what a renderer would consume.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags. Run with `cargo run -p quasar-demo -- --render-distance 4` for a
//! quick populate, then watch the camera walk exercise the update gate.

use std::path::PathBuf;

use clap::Parser;
use glam::Vec3;
use tracing::info;

use quasar_config::{CliArgs, Config};
use quasar_octree::{HashedColors, OctreeLayout};
use quasar_voxel::{NoiseParams, NoiseSampler};
use quasar_world::World;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("config.ron"));
    let mut config = Config::load_or_default(&config_path)?;
    config.apply_cli_overrides(&args);

    quasar_log::init_logging(Some(&config));
    info!(?config_path, "configuration loaded");

    let layout = OctreeLayout::new(config.world.chunk_size);
    let sampler = NoiseSampler::new(NoiseParams {
        seed: config.generation.seed,
        frequency: config.generation.frequency,
        threshold: config.generation.threshold,
    });
    let metadata = HashedColors {
        seed: u64::from(config.generation.seed),
    };

    let mut world = World::new(
        layout,
        config.world.render_distance,
        sampler,
        metadata,
        config.world.workers,
    );
    world.populate()?;
    report(&world);

    // Walk the camera: two steps inside the first chunk (fast path), then
    // one step across a chunk boundary (full rebuild).
    let edge = world.chunk_size() as f32;
    let path = [
        Vec3::splat(edge * 0.25),
        Vec3::splat(edge * 0.75),
        Vec3::new(edge * 1.5, edge * 0.5, edge * 0.5),
    ];
    for camera in path {
        let rebuilt = world.update_if_needed(camera)?;
        info!(
            ?camera,
            rebuilt,
            rebuilds = world.rebuild_count(),
            "camera update"
        );
    }

    Ok(())
}

fn report<S, M>(world: &World<S, M>)
where
    S: quasar_voxel::SolidSampler,
    M: quasar_octree::NodeMetadata + Sync,
{
    let total_voxels: usize = world
        .store()
        .chunks()
        .iter()
        .map(|c| c.voxels.len())
        .sum();
    let solid_voxels: usize = world
        .store()
        .chunks()
        .iter()
        .map(|c| c.voxels.count_ones())
        .sum();
    let occupancy = if total_voxels == 0 {
        0.0
    } else {
        100.0 * solid_voxels as f64 / total_voxels as f64
    };

    info!(
        chunks = world.chunk_count(),
        chunk_size = world.chunk_size(),
        nodes = world.combined_nodes().len(),
        buffer_mib = world.combined_bytes().len() / (1024 * 1024),
        occupancy_pct = format!("{occupancy:.1}"),
        buckets = world.bucket_count(),
        "world ready"
    );

    if let Some(index) = world.spatial_index()
        && let Some(first) = world.store().chunks().first()
    {
        info!(
            chunk = ?first.position,
            offset = index.lookup(first.position),
            "sample index lookup"
        );
    }
}
