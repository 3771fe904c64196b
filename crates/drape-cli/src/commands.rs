//! CLI command implementations.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use drape_mesh::generators::quad_grid;
use drape_mesh::{Topology, TriangleMesh};
use drape_solver::{GraphColorer, ProjectionMode, Simulation, SimulatedBody};
use drape_telemetry::{EventBus, JsonLinesSink};

use crate::scenario::Scenario;

fn parse_mode(mode: &str) -> Result<ProjectionMode, Box<dyn std::error::Error>> {
    match mode {
        "direct" => Ok(ProjectionMode::Direct),
        "colored_sequential" | "sequential" => Ok(ProjectionMode::ColoredSequential),
        "colored_parallel" | "parallel" => Ok(ProjectionMode::ColoredParallel),
        other => Err(format!(
            "Unknown projection mode: '{other}'. Available: direct, colored_sequential, colored_parallel"
        )
        .into()),
    }
}

/// Run a scenario and print per-run statistics.
pub fn simulate(
    config_path: Option<&str>,
    ticks: Option<u32>,
    mode: Option<&str>,
    events_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("drape Simulation");
    println!("────────────────");

    let mut scenario = match config_path {
        Some(path) => {
            println!("Scenario:   {path}");
            tracing::info!(path, "loading scenario");
            Scenario::load(Path::new(path))?
        }
        None => {
            println!("Scenario:   hanging_sheet (built-in)");
            Scenario::hanging_sheet()
        }
    };
    if let Some(ticks) = ticks {
        scenario.ticks = ticks;
    }
    if let Some(mode) = mode {
        scenario.simulation.projection = parse_mode(mode)?;
    }

    let cloth = scenario.build_cloth()?;
    let vertex_count = cloth.mesh().vertex_count();
    let triangle_count = cloth.mesh().triangle_count();
    let initial = cloth.mesh().interleaved_positions();

    let mut sim = Simulation::new(scenario.simulation.clone())?;
    if let Some(path) = events_path {
        let file = BufWriter::new(File::create(path)?);
        sim = sim.with_event_bus(EventBus::new().with_sink(Box::new(JsonLinesSink::new(file))));
    }
    sim.add_body(Box::new(cloth))?;
    sim.initialize()?;

    println!(
        "Cloth:      {} verts, {} tris, {} pinned",
        vertex_count,
        triangle_count,
        scenario.pinned().iter().filter(|&&p| p).count()
    );
    if let Some(coloring) = sim.body(0).and_then(|b| b.coloring()) {
        println!(
            "Coloring:   {} classes (largest {})",
            coloring.class_count(),
            coloring.largest_class()
        );
    }
    println!(
        "Loop:       dt={}s, {} iterations, {} dispatcher",
        sim.timestep(),
        scenario.simulation.iterations,
        sim.dispatcher_name()
    );
    println!();

    let start = Instant::now();
    let mut min_step = f64::INFINITY;
    let mut max_step = 0.0f64;
    for _ in 0..scenario.ticks {
        let result = sim.step()?;
        min_step = min_step.min(result.wall_time);
        max_step = max_step.max(result.wall_time);
    }
    let total = start.elapsed().as_secs_f64();
    sim.finish();

    let positions = sim.positions()?;
    let max_displacement = positions
        .chunks_exact(3)
        .zip(initial.chunks_exact(3))
        .map(|(p, x)| {
            let d = [p[0] - x[0], p[1] - x[1], p[2] - x[2]];
            (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
        })
        .fold(0.0f32, f32::max);
    let lowest = positions
        .iter()
        .skip(1)
        .step_by(3)
        .copied()
        .fold(f32::INFINITY, f32::min);

    let ticks = scenario.ticks.max(1) as f64;
    println!("  Ticks:         {}", scenario.ticks);
    println!("  Sim time:      {:.3}s", sim.sim_time());
    println!("  Wall time:     {:.3}s", total);
    println!("  Avg step:      {:.3}ms", total / ticks * 1000.0);
    if scenario.ticks > 0 {
        println!("  Min/max step:  {:.3}ms / {:.3}ms", min_step * 1000.0, max_step * 1000.0);
    }
    println!("  Final KE:      {:.6e}", sim.kinetic_energy());
    println!("  Max displace:  {:.4}m", max_displacement);
    println!("  Lowest Y:      {:.4}m", lowest);
    if let Some(path) = events_path {
        println!();
        println!("Events written to: {path}");
    }

    Ok(())
}

/// Validate a scenario (.toml) or a mesh (.json).
pub fn validate(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("drape Validator");
    println!("───────────────");
    println!();

    if path.ends_with(".toml") {
        println!("Validating scenario: {path}");
        let scenario = Scenario::load(Path::new(path))?;
        scenario.build_cloth()?;
        println!(
            "✅ Scenario is valid ({}×{} grid, {} ticks).",
            scenario.cloth.cols, scenario.cloth.rows, scenario.ticks
        );
    } else if path.ends_with(".json") {
        println!("Validating mesh: {path}");
        let content = std::fs::read_to_string(path)?;
        let mesh: TriangleMesh = serde_json::from_str(&content)?;
        match mesh.validate().and_then(|()| Topology::build(&mesh)) {
            Ok(topo) => println!(
                "✅ Mesh is valid ({} verts, {} tris, {} edges, {} hinges).",
                mesh.vertex_count(),
                mesh.triangle_count(),
                topo.edge_count(),
                topo.bend_count()
            ),
            Err(e) => {
                println!("❌ Mesh validation failed: {e}");
                return Err(e.into());
            }
        }
    } else {
        return Err("Unsupported file format. Use .toml (scenario) or .json (mesh).".into());
    }

    Ok(())
}

/// Print topology and coloring statistics for a generated grid.
pub fn topology(cols: usize, rows: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("drape Topology");
    println!("──────────────");
    println!();

    let mesh = quad_grid(cols, rows, 1.0, 1.0);
    let topo = Topology::build(&mesh)?;

    let stretch = topo.stretch_pairs();
    let stretch_colors = GraphColorer::assign_colors(&stretch);
    let hinges: Vec<[u32; 4]> = topo.bend_candidates.iter().map(|h| h.vertices()).collect();
    let hinge_colors = GraphColorer::assign_colors(&hinges);

    let histogram = |colors: &[u32]| {
        let classes = colors.iter().max().map_or(0, |&m| m as usize + 1);
        let mut sizes = vec![0usize; classes];
        for &c in colors {
            sizes[c as usize] += 1;
        }
        sizes
    };

    println!("Grid:            {cols}×{rows} quads");
    println!("Vertices:        {}", mesh.vertex_count());
    println!("Triangles:       {}", mesh.triangle_count());
    println!("Edges:           {}", topo.edge_count());
    println!("  boundary:      {}", topo.boundary_edge_count());
    println!("Hinges:          {}", topo.bend_count());
    println!();
    println!("Stretch classes: {:?}", histogram(&stretch_colors));
    println!("Hinge classes:   {:?}", histogram(&hinge_colors));

    Ok(())
}
