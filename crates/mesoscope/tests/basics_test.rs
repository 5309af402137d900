//! End-to-end tests for mesoscope-rs.

use mesoscope::*;

const ROD_FILM: &str = r#"{"model": {"sets": [
    {
        "name": "rods",
        "orientationType": "v",
        "positions": [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.2, 1.2, 0.0]],
        "orientations": [[0.0, 0.0, 1.0], [0.0, 0.1, 1.0], [0.1, 0.0, 1.0], [0.0, 0.0, -1.0]],
        "unitBox": [4.0, 4.0, 4.0],
        "shapeType": "Spherocylinder",
        "parameters": [0.5, 0.7]
    },
    {
        "name": "platelets",
        "orientationType": "q",
        "positions": [[0.5, 0.5, 0.5], [3.0, 0.0, 0.0]],
        "orientations": [[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0]],
        "unitBox": [4.0, 4.0, 4.0],
        "shapeType": "Spheroplatelet",
        "parameters": [0.3, 0.2]
    }
]}}"#;

#[test]
fn test_basics() {
    init();
    init();

    let mut scene = Scene::new(Options::default());
    scene.load_str(ROD_FILM).unwrap();
    assert_eq!(scene.names(), vec!["platelets", "rods"]);

    // Nearly aligned rods
    {
        let rods = scene.get("rods").unwrap();
        assert!(rods.director().z.abs() > 0.99);
        assert!(rods.scalar_order_parameter() > 0.9);
        assert_eq!(rods.instances().len(), 4);
        let (_, max) = rods.mesh().bounding_box().unwrap();
        assert!((max.z - 0.85).abs() < 1e-5);
    }

    // Folding is a no-op for the rods, and wraps the stray platelet
    {
        let rods = scene.get_mut("rods").unwrap();
        let before = rods.positions().to_vec();
        rods.fold().unwrap();
        assert_eq!(rods.positions(), before.as_slice());

        let platelets = scene.get_mut("platelets").unwrap();
        assert!(!platelets.is_folded());
        platelets.fold().unwrap();
        assert!(platelets.is_folded());
        assert!((platelets.positions()[1].x + 1.0).abs() < 1e-12);
    }

    // Reloading the same names fails and leaves the scene untouched
    {
        let err = scene.load_str(ROD_FILM).unwrap_err();
        assert!(matches!(err, MesoscopeError::SetExists(_)));
        assert_eq!(scene.len(), 2);
    }

    // Changing the shape keeps the director
    {
        let rods = scene.get_mut("rods").unwrap();
        let director = rods.director();
        rods.set_shape(&ShapeSpec::parse("Thick Lens", vec![1.0, 0.1, 0.7], 0).unwrap())
            .unwrap();
        assert_eq!(rods.shape().kind(), ShapeKind::ThickLens);
        assert_eq!(rods.director(), director);
    }

    scene.clear();
    assert!(scene.is_empty());
}

#[test]
fn test_shape_errors_surface_from_loader() {
    let json = r#"{
        "orientationType": "v",
        "positions": [[0.0, 0.0, 0.0]],
        "orientations": [[0.0, 0.0, 1.0]],
        "unitBox": [1.0, 1.0, 1.0],
        "shapeType": "Ellipsoid",
        "parameters": [1.0, 1.0, 0.2]
    }"#;
    assert_eq!(load_model_str(json, &Options::default()).unwrap().len(), 1);

    let short = json.replace("[1.0, 1.0, 0.2]", "[1.0, 1.0]");
    assert!(matches!(
        load_model_str(&short, &Options::default()),
        Err(MesoscopeError::ParameterArity { actual: 2, .. })
    ));

    let unknown = json.replace("Ellipsoid", "Dodecahedron");
    assert!(matches!(
        load_model_str(&unknown, &Options::default()),
        Err(MesoscopeError::UnknownShape(_))
    ));

    let mismatched = json.replace("[[0.0, 0.0, 1.0]]", "[]");
    assert!(matches!(
        load_model_str(&mismatched, &Options::default()),
        Err(MesoscopeError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_instance_buffer_layout() {
    let sets = load_model_str(ROD_FILM, &Options::default()).unwrap();
    let raw: Vec<InstanceRaw> = sets[0].instances().iter().map(Instance::to_raw).collect();
    assert_eq!(raw.len(), 4);
    assert_eq!(std::mem::size_of::<InstanceRaw>(), 80);
    assert_eq!(sets[0].mesh().as_bytes().len(), sets[0].mesh().num_vertices() * 24);
}
