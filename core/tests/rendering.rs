use meshcast_core::prelude::*;

use meshcast_core::{
    assert_approx_eq,
    math::vec::Vec3,
    render::{
        Collision,
        bake::BakeError,
        target::{render_attrib, render_depth, render_flat},
    },
};

const INF: f64 = f64::INFINITY;

fn mesh_of_squares(squares: &[(f64, f64, f64, f64)]) -> Mesh {
    let mut b = Mesh::builder();
    for (i, &(x, y, size, z)) in squares.iter().enumerate() {
        for (dx, dy) in [(0.0, 0.0), (size, 0.0), (size, size), (0.0, size)] {
            b.push_vert(pt3(x + dx, y + dy, z));
        }
        let n = 4 * i;
        b.push_face([n, n + 1, n + 2]);
        b.push_face([n, n + 2, n + 3]);
    }
    b.build()
}

fn top_down(height: f64) -> Perspective {
    Perspective::look_at(
        (64, 64),
        32.0,
        pt3(0.0, 0.0, height),
        pt3(0.0, 0.0, 0.0),
        vec3(0.0, 1.0, 0.0),
    )
}

#[test]
fn single_triangle_depth() {
    let mut buf = Buf2::new_fill((4, 4), INF);
    let verts = [pt2(0.0, 0.0), pt2(4.0, 0.0), pt2(0.0, 4.0)];
    render_depth(verts, [1.0; 3], &mut buf);

    for y in 0..4 {
        for x in 0..4 {
            let expected = if x + y < 4 { 1.0 } else { INF };
            assert_eq!(buf[[x, y]], expected, "at ({x}, {y})");
        }
    }
}

#[test]
fn nearer_wins_in_either_order() {
    let verts = [pt2(-1.0, -1.0), pt2(3.0, -1.0), pt2(-1.0, 3.0)];

    for order in [[2.0, 1.0], [1.0, 2.0]] {
        let mut buf = Buf2::new_fill((1, 1), INF);
        for d in order {
            render_depth(verts, [d; 3], &mut buf);
        }
        assert_eq!(buf[[0, 0]], 1.0);
    }
}

#[test]
fn uncovered_pixels_keep_sentinel() {
    let mut depth = Buf2::new_fill((8, 8), INF);
    let mut attr = Buf2::new_fill((8, 8), INF);
    let mut ids = Buf2::new_fill((8, 8), usize::MAX);
    let verts = [pt2(1.0, 1.0), pt2(5.0, 1.0), pt2(1.0, 5.0)];

    render_attrib(verts, [1.0; 3], [10.0, 20.0, 30.0], &mut depth, &mut attr);
    let mut depth2 = Buf2::new_fill((8, 8), INF);
    render_flat(verts, [1.0; 3], 7, &mut depth2, &mut ids);

    for y in 0..8 {
        for x in 0..8 {
            let inside = x >= 1 && y >= 1 && x + y < 6;
            assert_eq!(depth[[x, y]].is_finite(), inside, "at ({x}, {y})");
            assert_eq!(attr[[x, y]].is_finite(), inside, "at ({x}, {y})");
            assert_eq!(ids[[x, y]] == 7, inside, "at ({x}, {y})");
        }
    }
    assert_eq!(attr[[1, 1]], 10.0);
}

#[test]
fn height_map_equals_converted_depth_map() {
    let ctx = Context::default();
    let cam = Perspective::look_at(
        (48, 32),
        40.0,
        pt3(6.0, -8.0, 12.0),
        pt3(0.0, 0.0, 0.0),
        vec3(0.0, 0.0, 1.0),
    );
    let mesh = mesh_of_squares(&[(-4.0, -4.0, 8.0, 0.0), (-1.0, -1.0, 2.0, 1.5)]);

    let heights = render_height_map(&mesh, &cam, &ctx).unwrap();
    let depths = render_depth_map(&mesh, &cam, &ctx).unwrap();
    assert_eq!(heights, depth_to_height(&cam, &depths).unwrap());
    assert!(heights.iter().any(|h| h.is_finite()));
}

#[test]
fn perspective_height_map_of_tilted_plane() {
    let ctx = Context::default();
    let plane = |x: f64, y: f64| 0.2 * x + 0.1 * y + 1.0;

    let mut mesh = mesh_of_squares(&[(-5.0, -5.0, 10.0, 0.0)]);
    for v in &mut mesh.verts {
        *v = pt3(v.x(), v.y(), plane(v.x(), v.y()));
    }
    let cam = Perspective::look_at(
        (64, 64),
        50.0,
        pt3(-3.0, -12.0, 15.0),
        pt3(0.0, 0.0, 0.0),
        vec3(0.0, 0.0, 1.0),
    );

    let depths = render_depth_map(&mesh, &cam, &ctx).unwrap();
    let heights = render_height_map(&mesh, &cam, &ctx).unwrap();

    // Back-project each pixel to the world point it sees
    let p = cam.to_matrix();
    let inv = p.linear().inverse().unwrap();
    let mut seen = 0;
    for y in 0..64 {
        for x in 0..64 {
            let d = depths[[x, y]];
            if d.is_infinite() {
                assert!(heights[[x, y]].is_infinite());
                continue;
            }
            seen += 1;
            let img = vec3(d * x as f64, d * y as f64, d) - p.translation();
            let pt: Vec3<World> = inv.apply(&img);
            assert_approx_eq!(pt.z(), plane(pt.x(), pt.y()), eps = 1e-6);
            assert_approx_eq!(heights[[x, y]], pt.z(), eps = 1e-6);
        }
    }
    assert!(seen > 100);
}

#[test]
fn orthographic_and_perspective_agree_on_flat_surfaces() {
    let ctx = Context::default();
    let levels = [0.5, 2.0, -1.0];
    let mesh = mesh_of_squares(&[
        (-8.0, -8.0, 4.0, levels[0]),
        (2.0, 2.0, 5.0, levels[1]),
        (-6.0, 3.0, 3.0, levels[2]),
    ]);

    let persp = render_height_map(&mesh, &top_down(30.0), &ctx).unwrap();
    let ortho = Orthographic::new((64, 64), pt2(-16.0, 16.0), 0.5);
    let ortho = render_height_map(&mesh, &ortho, &ctx).unwrap();

    for buf in [&persp, &ortho] {
        for &h in buf.iter().filter(|h| h.is_finite()) {
            assert!(
                levels.iter().any(|&l| (h - l).abs() < 1e-9),
                "unexpected height {h}"
            );
        }
        for l in levels {
            assert!(buf.iter().any(|&h| (h - l).abs() < 1e-9));
        }
    }
}

#[test]
fn orthographic_depth_map_is_negated_height_map() {
    let ctx = Context::default();
    let mesh = mesh_of_squares(&[
        (-8.0, -8.0, 10.0, -1.0),
        (-4.0, -4.0, 10.0, 0.0),
        (0.0, 0.0, 6.0, 1.0),
    ]);
    let cam = Orthographic::new((64, 64), pt2(-16.0, 16.0), 0.5);

    let depths = render_depth_map(&mesh, &cam, &ctx).unwrap();
    let heights = render_height_map(&mesh, &cam, &ctx).unwrap();

    for (&d, &h) in depths.iter().zip(heights.iter()) {
        if h.is_finite() {
            assert_eq!(d, -h);
        } else {
            assert_eq!(d, INF);
        }
    }
    // World (3, 3) is covered by the two upper squares; the higher is visible
    assert_eq!(depths[[38, 26]], -1.0);
    // World (-2, -2) by the two lower ones
    assert_eq!(depths[[28, 36]], 0.0);
    assert_eq!(ctx.stats.borrow().degenerate, 0);
}

#[test]
fn non_triangular_mesh_is_an_error() {
    let ctx = Context::default();
    let mut mesh = mesh_of_squares(&[(-1.0, -1.0, 2.0, 0.0)]);
    mesh.faces.push(Polygon::from([0, 1, 2, 3]));

    let expected = Err(Error::NotTriangular { face: 2, degree: 4 });
    assert_eq!(render_depth_map(&mesh, &top_down(5.0), &ctx), expected);
    assert_eq!(render_height_map(&mesh, &top_down(5.0), &ctx), expected);
}

struct Brute(Vec<Point3<World>>);

impl NearestNeighbors for Brute {
    type Error = std::convert::Infallible;

    fn nearest(
        &self,
        queries: &[Point3<World>],
    ) -> Result<Vec<Neighbor>, Self::Error> {
        let res = queries.iter().map(|q| {
            let (index, dist_sqr) = self
                .0
                .iter()
                .map(|p| p.distance_sqr(q))
                .enumerate()
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .expect("cloud should not be empty");
            Neighbor { index, dist_sqr }
        });
        Ok(res.collect())
    }
}

#[test]
fn baked_face_takes_color_of_nearest_point() {
    let red = rgb(0xFF, 0, 0);
    let blue = rgb(0, 0, 0xFF);
    let cloud = PointCloud::new(
        vec![pt3(0.5, 0.5, 0.1), pt3(5.0, 5.0, 5.0)],
        vec![red, blue],
    )
    .unwrap();

    let mesh = Mesh::new(
        [[0, 1, 2]],
        [pt3(0.0, 0.0, 0.0), pt3(1.0, 0.0, 0.0), pt3(0.0, 1.0, 0.0)],
    )
    .with_tex_coords([[uv(0.0, 0.0), uv(1.0, 0.0), uv(0.0, 1.0)]]);

    let ctx = Context { texture_dims: (16, 16), ..Context::default() };
    let nn = Brute(cloud.positions().to_vec());
    let tex = bake(&mesh, &cloud, &nn, &ctx).unwrap();

    let mut covered = 0;
    for y in 0..16 {
        for x in 0..16 {
            // Center of texel (x, y) is at u + v ≤ 1 iff x + (15 − y) ≤ 15
            if x + (15 - y) <= 15 {
                assert_eq!(tex[[x, y]], red, "at ({x}, {y})");
                covered += 1;
            } else {
                assert_eq!(tex[[x, y]], Color3::BLACK, "at ({x}, {y})");
            }
        }
    }
    assert_eq!(covered, 136);
    let stats = ctx.stats.borrow();
    assert_eq!(stats.texels.o, 136);
}

#[test]
fn adjacent_faces_collide_on_shared_edge() {
    let cloud = PointCloud::new(vec![pt3(0.0, 0.0, 0.0)], vec![Color3::WHITE])
        .unwrap();
    let mesh = mesh_of_squares(&[(0.0, 0.0, 1.0, 0.0)]).with_tex_coords([
        [uv(0.0, 0.0), uv(1.0, 0.0), uv(1.0, 1.0)],
        [uv(0.0, 0.0), uv(1.0, 1.0), uv(0.0, 1.0)],
    ]);
    let nn = Brute(cloud.positions().to_vec());

    // The center of texel (4, 3) is at (0.5, 0.5), on the shared diagonal
    let ctx = Context { texture_dims: (9, 7), ..Context::default() };
    let res = bake(&mesh, &cloud, &nn, &ctx);
    let Err(BakeError::Render(e)) = res else {
        panic!("expected a collision, got {res:?}");
    };
    assert_eq!(e, Error::TexelCollision { x: 4, y: 3, first: 0, second: 1 });

    let ctx = Context {
        texture_dims: (9, 7),
        collision: Collision::Overwrite,
        ..Context::default()
    };
    let tex = bake(&mesh, &cloud, &nn, &ctx).unwrap();
    assert!(tex.iter().all(|&c| c == Color3::WHITE));
    assert_eq!(ctx.stats.borrow().collisions, 1);
}
