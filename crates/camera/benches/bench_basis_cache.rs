use std::hint::black_box;
use std::time::Instant;

use flycam_camera::{Camera, CameraMovement};

fn bench_look(label: &str, iterations: usize, dx: f32, dy: f32) {
    let mut camera = Camera::default();

    let start = Instant::now();
    for _ in 0..iterations {
        camera.process_mouse_movement(black_box(dx), black_box(dy), true);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  {label} ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
    black_box(camera.view_matrix());
}

fn bench_keyboard(iterations: usize) {
    let mut camera = Camera::default();

    let start = Instant::now();
    for i in 0..iterations {
        let direction = match i % 4 {
            0 => CameraMovement::Forward,
            1 => CameraMovement::Right,
            2 => CameraMovement::Backward,
            _ => CameraMovement::Left,
        };
        camera.process_keyboard(black_box(direction), black_box(0.016));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  keyboard ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
    black_box(camera.position());
}

fn main() {
    println!("=== Camera Basis Benchmarks ===\n");

    println!("Look:");
    bench_look("cache hit (zero delta)", 1_000_000, 0.0, 0.0);
    bench_look("cache miss (yaw only)", 1_000_000, 1.0, 0.0);
    bench_look("cache miss (yaw + pitch)", 1_000_000, 1.0, 0.5);

    println!("\nMove:");
    bench_keyboard(1_000_000);

    println!("\n=== Done ===");
}
