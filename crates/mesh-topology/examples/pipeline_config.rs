//! Example: Pipeline Configuration Serialization
//!
//! Shows how a `PipelineConfig` describes a finalize + gradient limiting run
//! as TOML or JSON, and how to apply it to a mesh.
//!
//! Run with: `cargo run --example pipeline_config --features pipeline-config`

#[cfg(not(feature = "pipeline-config"))]
fn main() {
    eprintln!("This example requires the 'pipeline-config' feature.");
    eprintln!("Run with: cargo run --example pipeline_config --features pipeline-config");
}

#[cfg(feature = "pipeline-config")]
use mesh_topology::{FinalizeParams, LimgradParams, Mesh, PipelineConfig};

#[cfg(feature = "pipeline-config")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // =========================================================================
    // 1. Create a config programmatically
    // =========================================================================

    let config = PipelineConfig::with_name("estuary")
        .description("Drop islands under 0.5 and cap the size gradient")
        .finalize(FinalizeParams::default().with_sieve_area(0.5))
        .limgrad(LimgradParams::new(0.25));

    println!("=== TOML Output ===\n{}", config.to_toml()?);
    println!("=== JSON Output ===\n{}", config.to_json()?);

    // =========================================================================
    // 2. Parse config from TOML string
    // =========================================================================

    let toml_input = r#"
        name = "keep-largest"

        [finalize]
        max_iterations = 20

        [limgrad]
        dfdx = 0.5
        imax = 200
    "#;

    let parsed = PipelineConfig::from_toml(toml_input)?;
    println!(
        "\n=== Parsed Config ===\nName: {:?}\nSieve area: {:?}\nLimgrad: {:?}",
        parsed.name, parsed.finalize.sieve_area, parsed.limgrad
    );

    // =========================================================================
    // 3. Run the config on a test mesh
    // =========================================================================

    let mut mesh = create_test_mesh();
    println!(
        "\n=== Running Pipeline ===\nInput: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    let report = parsed.run(&mut mesh)?;

    println!(
        "Output: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    println!("Repair rounds: {}", report.finalize.iterations);
    println!("Regions sieved: {}", report.finalize.sieve.regions_removed);
    if let Some(limgrad) = &report.limgrad {
        println!(
            "Values lowered: {} (max decrease {:.3})",
            limgrad.vertices_lowered, limgrad.max_decrease
        );
    }

    Ok(())
}

/// A 3x3 block of unit squares plus one detached triangle, with a bumpy field.
#[cfg(feature = "pipeline-config")]
fn create_test_mesh() -> Mesh {
    let mut mesh = Mesh::new();
    for j in 0..4 {
        for i in 0..4 {
            mesh.add_vertex(i as f64, j as f64);
        }
    }
    for j in 0..3u32 {
        for i in 0..3u32 {
            let a = j * 4 + i;
            mesh.add_triangle([a, a + 1, a + 5]);
            mesh.add_triangle([a, a + 5, a + 4]);
        }
    }

    let a = mesh.add_vertex(8.0, 8.0);
    let b = mesh.add_vertex(9.0, 8.0);
    let c = mesh.add_vertex(8.0, 9.0);
    mesh.add_triangle([a, b, c]);

    mesh.values = (0..mesh.vertex_count())
        .map(|i| if i % 3 == 0 { 5.0 } else { 1.0 })
        .collect();
    mesh
}
