//! Turning a scene description into a renderable scene and camera.

use lux_core::config::ShapeConfig;
use lux_core::obj::{load_obj, ObjResult};
use lux_core::SceneConfig;

use crate::{Camera, Plane, RenderConfig, Scene, Sphere, Triangle, TriangleMesh};

/// Build the scene and camera a description names, loading meshes and
/// building the BVH.
pub fn build_scene(config: &SceneConfig) -> ObjResult<(Scene, Camera)> {
    let mut scene = Scene::new(config.light);

    for shape in &config.shapes {
        match shape {
            ShapeConfig::Sphere {
                center,
                radius,
                finish,
            } => scene.add_shape(Sphere::new(*center, *radius).with_finish(*finish)),

            ShapeConfig::Plane {
                point,
                normal,
                finish,
            } => scene.add_shape(Plane::new(*point, normal.normalize()).with_finish(*finish)),

            ShapeConfig::Triangle {
                vertices,
                uvs,
                normals,
                finish,
            } => {
                let [a, b, c] = *vertices;
                let mut triangle = Triangle::new(a, b, c).with_finish(*finish);
                if let Some(uvs) = uvs {
                    triangle = triangle.with_uvs(*uvs);
                }
                if let Some(normals) = normals {
                    triangle = triangle.with_normals(*normals);
                }
                scene.add_shape(triangle);
            }

            ShapeConfig::Mesh {
                path,
                as_triangles,
                finish,
            } => {
                for mesh in load_obj(path)? {
                    log::debug!(
                        "Mesh {}: bounds {:?} to {:?}",
                        mesh.name,
                        mesh.bounds.min,
                        mesh.bounds.max
                    );
                    if *as_triangles {
                        for corners in mesh.triangles() {
                            let triangle = Triangle::from_corners(corners, mesh.material.clone())
                                .with_finish(*finish);
                            scene.add_shape(triangle);
                        }
                    } else {
                        scene.add_shape(TriangleMesh::from_mesh(&mesh).with_finish(*finish));
                    }
                }
            }
        }
    }

    scene.build_bvh();
    log::info!(
        "Scene ready: {} shapes, {} triangles",
        scene.shape_count(),
        scene.triangle_count()
    );

    let camera = Camera::from_config(&config.camera)
        .with_render_config(RenderConfig::from(&config.render));
    Ok((scene, camera))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_core::{ObjError, Projection};
    use lux_math::{Ray, Vec3};
    use std::fs;

    #[test]
    fn test_build_inline_shapes() {
        let config = SceneConfig::from_json(
            r#"{
                "camera": {
                    "projection": "orthographic",
                    "eye": [0, 0, 5], "look_at": [0, 0, 0],
                    "width": 8, "height": 8,
                    "left": 0, "right": 1, "bottom": 0, "top": 1
                },
                "light": [0, 0, 10],
                "render": { "shadows": true },
                "shapes": [
                    { "type": "sphere", "center": [5, 0, 0], "radius": 1 },
                    { "type": "plane", "point": [0, -2, 0], "normal": [0, 1, 0] },
                    { "type": "triangle", "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]],
                      "finish": { "specular": [0, 0, 0] } }
                ]
            }"#,
        )
        .unwrap();

        let (scene, camera) = build_scene(&config).unwrap();
        assert_eq!(scene.shape_count(), 3);
        assert_eq!(scene.triangle_count(), 1);
        assert!(!scene.is_bvh_stale());
        assert_eq!(scene.light(), Vec3::new(0.0, 0.0, 10.0));

        assert_eq!(camera.projection(), Projection::Orthographic);
        assert_eq!(camera.resolution(), (8, 8));
        assert!(camera.config().shadows);

        let (surface, t) = scene.intersect(&Ray::new(Vec3::new(0.2, 0.2, 5.0), Vec3::NEG_Z));
        assert!(surface.unwrap().as_triangle().is_some());
        assert!((t - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_plane_normal_is_normalized() {
        let scene_json = |normal: &str| {
            format!(
                r#"{{
                    "camera": {{
                        "projection": "orthographic",
                        "eye": [0, 5, 0], "look_at": [0, 0, 0], "up": [0, 0, -1],
                        "width": 1, "height": 1,
                        "left": 0, "right": 1, "bottom": 0, "top": 1
                    }},
                    "light": [0, 10, 0],
                    "shapes": [{{
                        "type": "plane", "point": [0, 0, 0], "normal": {normal},
                        "finish": {{ "ambient": [0, 0, 0], "diffuse": [100, 100, 100], "specular": [0, 0, 0] }}
                    }}]
                }}"#
            )
        };

        let render = |normal: &str| {
            let config = SceneConfig::from_json(&scene_json(normal)).unwrap();
            let (scene, camera) = build_scene(&config).unwrap();
            camera.render_frame(&scene).get(0, 0)
        };

        let unit = render("[0, 1, 0]");
        let scaled = render("[0, 3, 0]");
        assert!((unit - Vec3::splat(100.0)).length() < 1e-9);
        assert!((scaled - unit).length() < 1e-9);
    }

    #[test]
    fn test_build_mesh_both_ways() {
        let dir = std::env::temp_dir().join("lux_setup_mesh_test");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("quad.obj"),
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .unwrap();

        let scene_json = |as_triangles: bool| {
            format!(
                r#"{{
                    "camera": {{
                        "eye": [0.5, 0.5, 5], "look_at": [0.5, 0.5, 0],
                        "width": 2, "height": 2,
                        "left": -0.1, "right": 0.1, "bottom": -0.1, "top": 0.1
                    }},
                    "light": [0, 0, 10],
                    "shapes": [{{ "type": "mesh", "path": "quad.obj", "as_triangles": {as_triangles} }}]
                }}"#
            )
        };
        let ray = Ray::new(Vec3::new(0.5, 0.25, 5.0), Vec3::NEG_Z);

        let mut config = SceneConfig::from_json(&scene_json(true)).unwrap();
        config.resolve_paths(&dir);
        let (scene, _) = build_scene(&config).unwrap();
        assert_eq!(scene.shape_count(), 2);
        assert_eq!(scene.triangle_count(), 2);
        assert!((scene.intersect(&ray).1 - 5.0).abs() < 1e-12);

        let mut config = SceneConfig::from_json(&scene_json(false)).unwrap();
        config.resolve_paths(&dir);
        let (scene, _) = build_scene(&config).unwrap();
        assert_eq!(scene.shape_count(), 1);
        assert_eq!(scene.triangle_count(), 0);
        assert!((scene.intersect(&ray).1 - 5.0).abs() < 1e-12);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_mesh_is_an_error() {
        let mut config = SceneConfig::from_json(
            r#"{
                "camera": {
                    "eye": [0, 0, 5], "look_at": [0, 0, 0],
                    "width": 1, "height": 1,
                    "left": -1, "right": 1, "bottom": -1, "top": 1
                },
                "light": [0, 0, 10],
                "shapes": [{ "type": "mesh", "path": "does_not_exist.obj" }]
            }"#,
        )
        .unwrap();
        config.resolve_paths(&std::env::temp_dir());

        assert!(matches!(build_scene(&config), Err(ObjError::Load { .. })));
    }
}
