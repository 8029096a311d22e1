// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover resolution over a small town: a junction, a bridge, and a curve.
//!
//! This example shows how to combine:
//! - `crossway_network` for the scene model and its segment grid,
//! - `crossway_hover` for per-tick hover resolution and the ignore-set,
//! - `crossway_selection` for overlay contours of the hovered element,
//! - `crossway_trajectory` for marking where two roads cross.
//!
//! Run:
//! - `cargo run -p crossway_demos --example hover_walkthrough`

use crossway_hover::{HoverTester, SelectionMode};
use crossway_network::{GridLayout, Network, NetworkView, Ray};
use crossway_selection::OverlayStyle;
use crossway_trajectory::calculate_all;
use glam::DVec3;
use kurbo::{Point, Vec2};

fn main() {
    let mut net = Network::new(GridLayout {
        cell_size: 32.0,
        resolution: 64,
    });

    // A four-way junction at the origin.
    let hub = net.add_node(Point::new(0.0, 0.0), 0.0);
    net.set_node_corner_offset(hub, 9.0);
    let mut ends = Vec::new();
    let mut arms = Vec::new();
    for (x, z) in [(80.0, 0.0), (0.0, 80.0), (-80.0, 0.0), (0.0, -80.0)] {
        let end = net.add_node(Point::new(x, z), 0.0);
        arms.push(net.add_segment(hub, end, 4.0).expect("nodes exist"));
        ends.push(end);
    }

    // A bridge crossing the eastern arm at height 8.
    let south = net.add_node(Point::new(40.0, -60.0), 8.0);
    let north = net.add_node(Point::new(40.0, 60.0), 8.0);
    let bridge = net.add_segment(south, north, 3.0).expect("nodes exist");

    // A curved ramp leaving the northern end.
    let ramp_end = net.add_node(Point::new(60.0, 120.0), 0.0);
    let ramp = net
        .add_curved_segment(
            ends[1],
            ramp_end,
            Vec2::new(0.0, 1.0),
            Vec2::new(-1.0, 0.0),
            3.0,
        )
        .expect("nodes exist");

    let mut hover = HoverTester::default();
    let look_down = |x: f64, z: f64| (Ray::vertical(x, z, 200.0), DVec3::new(x, 0.0, z));

    println!("== Hover ==");
    for (label, x, z) in [
        ("junction", 2.0, 1.0),
        ("western arm", -40.0, 1.0),
        ("bridge over the eastern arm", 40.0, 0.5),
        ("ramp", 21.0, 109.0),
        ("open field", -50.0, -50.0),
    ] {
        let (ray, hit) = look_down(x, z);
        let result = hover.query_hover(&net, &ray, hit);
        println!("{label:>28} @ ({x:6.1}, {z:6.1}) -> {result:?}");
    }

    println!("\n== Ignore cycle at the bridge ==");
    let (ray, hit) = look_down(40.0, 0.5);
    for _ in 0..3 {
        let result = hover.query_hover(&net, &ray, hit);
        println!("hovered {result:?}");
        hover.ignore_current_hover();
    }

    println!("\n== Segments only ==");
    hover.set_mode(SelectionMode::SEGMENTS);
    let (ray, hit) = look_down(2.0, 1.0);
    println!("junction centre -> {:?}", hover.query_hover(&net, &ray, hit));

    println!("\n== Overlay ==");
    hover.set_mode(SelectionMode::default());
    let (ray, hit) = look_down(2.0, 1.0);
    if let Some(key) = hover.query_hover(&net, &ray, hit).key() {
        let contour = hover
            .render(&net, key, &OverlayStyle::default())
            .expect("hovered element exists");
        println!(
            "{key:?}: {} contour points, {} triangles at height {}",
            contour.points.len(),
            contour.triangles.len(),
            contour.height
        );
    }

    println!("\n== Crossings ==");
    let (Some(arm), Some(over)) = (
        net.segment_trajectory(arms[0]),
        net.segment_trajectory(bridge),
    ) else {
        return;
    };
    for hit in calculate_all(&arm, &over) {
        println!(
            "eastern arm x bridge at {:?} (t = {:.3} / {:.3}, {:.1} deg)",
            arm.position(hit.first_t),
            hit.first_t,
            hit.second_t,
            hit.angle.to_degrees()
        );
    }
    if let Some(curve) = net.segment_trajectory(ramp) {
        println!(
            "ramp: length {:.2}, turning {:.1} deg",
            curve.length(),
            curve.turning_angle().to_degrees()
        );
    }
}
