use glam::{Mat4, Vec3, Vec4};

/// World positions of the ten demo cubes.
pub const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

/// Spin shared by every cube, in degrees per second.
const SPIN_DEGREES_PER_SECOND: f32 = 45.0;
const SPIN_AXIS: Vec3 = Vec3::new(0.7, 1.0, 0.2);

/// Fixed tilt per cube index, in degrees.
const TILT_STEP_DEGREES: f32 = 20.0;
const TILT_AXIS: Vec3 = Vec3::new(1.0, 0.0, 0.5);
const TILT_AXIS_EVERY_THIRD: Vec3 = Vec3::new(1.0, 0.3, 0.5);

/// One cube ready to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeInstance {
    pub model: Mat4,
    /// Pulsing tint, RGBA in `[0, 1]`.
    pub color: Vec4,
}

/// The set of cubes the demo animates.
#[derive(Debug, Clone)]
pub struct CubeScene {
    positions: Vec<Vec3>,
}

impl Default for CubeScene {
    fn default() -> Self {
        Self::new(CUBE_POSITIONS.to_vec())
    }
}

impl CubeScene {
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Model matrices and tints for every cube at `time` seconds.
    pub fn instances(&self, time: f64) -> Vec<CubeInstance> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, &position)| CubeInstance {
                model: model_matrix(i, position, time as f32),
                color: pulse_color(i, time),
            })
            .collect()
    }
}

/// Translate, spin with time, then apply the per-index tilt.
pub fn model_matrix(index: usize, position: Vec3, time: f32) -> Mat4 {
    let spin = Mat4::from_axis_angle(
        SPIN_AXIS.normalize(),
        time * SPIN_DEGREES_PER_SECOND.to_radians(),
    );

    let angle = TILT_STEP_DEGREES * index as f32;
    let tilt = if index % 3 != 0 {
        Mat4::from_axis_angle(TILT_AXIS.normalize(), (-angle).to_radians())
    } else {
        Mat4::from_axis_angle(TILT_AXIS_EVERY_THIRD.normalize(), angle.to_radians())
    };

    Mat4::from_translation(position) * spin * tilt
}

/// Each channel is a sine in `[0, 1]` whose frequency grows with the index.
pub fn pulse_color(index: usize, time: f64) -> Vec4 {
    let scale = (index as f64 + 0.1) / 3.0;
    let channel = |rate: f64| ((time * rate * scale).sin() / 2.0 + 0.5) as f32;
    Vec4::new(channel(3.5), channel(1.5), channel(2.5), 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_has_ten_cubes() {
        let scene = CubeScene::default();
        assert_eq!(scene.len(), 10);
        assert!(!scene.is_empty());
        assert_eq!(scene.instances(0.0).len(), 10);
    }

    #[test]
    fn cubes_sit_at_their_positions() {
        let scene = CubeScene::default();
        for (instance, position) in scene.instances(3.7).iter().zip(CUBE_POSITIONS) {
            let origin = instance.model.transform_point3(Vec3::ZERO);
            assert!(origin.abs_diff_eq(position, 1e-5));
        }
    }

    #[test]
    fn first_cube_at_time_zero_is_identity() {
        let model = model_matrix(0, Vec3::ZERO, 0.0);
        assert!(model.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn spin_advances_with_time() {
        let a = model_matrix(1, Vec3::ZERO, 0.0);
        let b = model_matrix(1, Vec3::ZERO, 1.0);
        assert!(!a.abs_diff_eq(b, 1e-3));

        // A full turn takes 8 seconds at 45 degrees per second.
        let c = model_matrix(1, Vec3::ZERO, 8.0);
        assert!(a.abs_diff_eq(c, 1e-4));
    }

    #[test]
    fn every_third_cube_tilts_the_other_way() {
        let axis = TILT_AXIS_EVERY_THIRD.normalize();
        let expected = Mat4::from_axis_angle(axis, 60.0_f32.to_radians());
        assert!(model_matrix(3, Vec3::ZERO, 0.0).abs_diff_eq(expected, 1e-6));

        let axis = TILT_AXIS.normalize();
        let expected = Mat4::from_axis_angle(axis, (-40.0_f32).to_radians());
        assert!(model_matrix(2, Vec3::ZERO, 0.0).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn models_are_rigid() {
        for instance in CubeScene::default().instances(12.25) {
            let x = instance.model.transform_vector3(Vec3::X);
            assert!((x.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn colors_pulse_in_unit_range() {
        for step in 0..100 {
            let t = step as f64 * 0.37;
            for i in 0..10 {
                let c = pulse_color(i, t);
                for channel in [c.x, c.y, c.z] {
                    assert!((0.0..=1.0).contains(&channel));
                }
                assert_eq!(c.w, 1.0);
            }
        }
    }

    #[test]
    fn colors_start_mid_grey() {
        assert_eq!(pulse_color(4, 0.0), Vec4::new(0.5, 0.5, 0.5, 1.0));
    }
}
