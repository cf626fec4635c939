//! Picking demo application
//!
//! Builds a small scene graph (no window, no GPU), moves some nodes
//! around, and runs pick rays through the CPU collision path, logging
//! what they hit. Doubles as an end-to-end smoke test of the scene /
//! collision / picking stack.

use scene_engine::config::{Config, EngineConfig};
use scene_engine::foundation::math::{constants, Mat4, Point3, Vec3};
use scene_engine::geometry::primitives::{build_box, build_sphere};
use scene_engine::picking;
use scene_engine::prelude::*;

const CONFIG_PATH: &str = "picking_demo.toml";

fn main() {
    env_logger::init();

    // Optional config file next to the binary; defaults otherwise
    let config = match EngineConfig::load_from_file(CONFIG_PATH) {
        Ok(config) => {
            log::info!("loaded configuration from {CONFIG_PATH}");
            config
        }
        Err(_) => EngineConfig::default(),
    };

    let mut graph = SceneGraph::with_config(config.scene.clone());
    let mut meshes = MeshManager::new();
    let mut materials = MaterialLibrary::new();

    // A sphere orbiting a pivot node, and a ground box
    let pivot = graph.create_child(graph.root()).unwrap();
    let sphere_node = graph.create_child(pivot).unwrap();
    graph
        .node_mut(sphere_node)
        .unwrap()
        .local_transform_mut()
        .position = Vec3::new(3.0, 0.0, 0.0);

    let ground_node = graph.create_child(graph.root()).unwrap();
    graph
        .node_mut(ground_node)
        .unwrap()
        .local_transform_mut()
        .position = Vec3::new(0.0, -2.0, 0.0);

    let mesh = meshes.create_mesh(&mut graph, sphere_node, "probe").unwrap();
    build_sphere(mesh, 1.0, 24, 12);

    let mesh = meshes.create_mesh(&mut graph, ground_node, "ground").unwrap();
    build_box(mesh, 20.0, 0.5, 20.0);
    meshes
        .mesh_mut("ground")
        .unwrap()
        .set_pick_layers(PickLayers::STATIC_GEOMETRY);

    let mut glass = PbrtMaterial::new();
    glass.preset_perfect_glass(1.5);
    materials.insert("glass", glass);
    meshes.mesh_mut("probe").unwrap().set_material("glass");

    let mut lamp = PointLight::with_range("lamp", 10.0);
    lamp.attach_to_scene_node(&mut graph, pivot).unwrap();

    // Camera looking down -Z at the scene
    let view = Mat4::look_at_rh(
        &Point3::new(0.0, 2.0, 12.0),
        &Point3::new(0.0, 0.0, 0.0),
        &Vec3::y(),
    );
    let projection = Mat4::new_perspective(16.0 / 9.0, constants::PI / 3.0, 0.1, 100.0);

    // Swing the pivot and pick at the screen center each step
    for step in 0..8 {
        let angle = constants::TAU * step as f32 / 8.0;
        graph
            .node_mut(pivot)
            .unwrap()
            .local_transform_mut()
            .rotation = Quat::from_axis_angle(&Vec3::y_axis(), angle);
        // Transforms changed: world caches for the subtree are stale
        graph.clear_world_cache_recursive(pivot).unwrap();

        let world_aabb = meshes
            .mesh("probe")
            .unwrap()
            .compute_world_aabb_fast(&graph)
            .unwrap();
        log::info!(
            "step {step}: probe world AABB center = {:?}",
            world_aabb.center()
        );

        let mut result = RayHitResult::new();
        let hit = picking::pick_meshes(
            &graph,
            meshes.iter(),
            0.0,
            0.0,
            &view,
            &projection,
            PickLayers::ALL,
            &mut result,
        )
        .unwrap();

        if hit {
            result.sort_by_depth();
            let nearest = result.hits.first().unwrap();
            log::info!(
                "step {step}: center pick hit at {:?} (t = {:.2}, {} hits total)",
                nearest.position,
                nearest.t,
                result.hits.len()
            );
        } else {
            log::info!("step {step}: center pick hit nothing");
        }
    }

    // A direct world-space ray query against analytic shapes
    let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
    let sphere = LogicalSphere::new(Vec3::zeros(), 5.0);
    let mut result = RayHitResult::new();
    if intersect_ray_sphere(&ray, &sphere, &mut result) {
        log::info!(
            "analytic sphere hit at t = {:.2}, position = {:?}",
            result.hits[0].t,
            result.hits[0].position
        );
    }

    log::info!(
        "scene: {} nodes, {} meshes, default material roughness {}",
        graph.node_count(),
        meshes.len(),
        materials.default_material().desc().roughness
    );
}
