//! Builds a small nematic film and prints what a renderer would receive.
//!
//! Run with `RUST_LOG=debug` to see mesh generation and rebuild messages.

use mesoscope::*;

fn main() -> Result<()> {
    init();

    // A 4x4x2 lattice of spherocylinders, tilted a little around +z.
    let mut positions = Vec::new();
    let mut orientations = Vec::new();
    for i in 0..4 {
        for j in 0..4 {
            for k in 0..2 {
                positions.push(DVec3::new(
                    f64::from(i) - 1.5,
                    f64::from(j) - 1.5,
                    2.0 * f64::from(k) - 1.0,
                ));
                let tilt = 0.1 * f64::from(i * 4 + j) / 16.0;
                orientations.push(vec![tilt, -tilt, 1.0]);
            }
        }
    }

    let options = Options::default();
    let mut rods = ParticleSet::new(
        "rods",
        positions,
        &orientations,
        OrientationType::UnitVector,
        UnitBox::new([4.0, 4.0, 4.0])?,
        &ShapeSpec::parse("Spherocylinder", vec![0.25, 0.5], options.level_of_detail)?,
        &options,
    )?;

    println!("set '{}' with {} particles", rods.name(), rods.len());
    println!(
        "  director {}, S = {:.4}",
        rods.director(),
        rods.scalar_order_parameter()
    );
    println!("  {} triangles per particle", rods.mesh().num_triangles());

    for level in rods.lod_chain()? {
        println!(
            "  lod {} from distance {:.2}: {} triangles",
            level.level_of_detail,
            level.distance,
            level.mesh.num_triangles()
        );
    }

    rods.set_shape(&ShapeSpec::parse("Biconvex Lens", vec![0.5, 0.9], 0)?)?;
    rods.set_level_of_detail(5)?;
    println!(
        "  as {} at lod {}: {} triangles, {} bytes of vertex data",
        rods.shape().kind(),
        rods.level_of_detail(),
        rods.mesh().num_triangles(),
        rods.mesh().as_bytes().len()
    );

    let mut histogram = vec![0usize; rods.palette().len()];
    for element in rods.elements() {
        histogram[element.colour_index] += 1;
    }
    println!("  colour histogram {histogram:?}");

    let mut scene = Scene::new(options);
    scene.add(rods)?;
    println!("scene length scale {:.3}", scene.length_scale());
    Ok(())
}
