//! Render-ready output of one simulation frame.
//!
//! A [`Frame`] borrows the live population and camera, so producing one is
//! free. Renderers either walk [`Frame::trails`] directly or flatten them
//! with [`Frame::line_batch`] into a vertex buffer of [`TrailVertex`] that can
//! be uploaded as-is (`bytemuck::cast_slice`) and drawn as one line strip
//! per range.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::{DMat4, DVec3, Vec3};

use crate::camera::Camera;
use crate::params::SimulationParams;
use crate::population::Population;
use crate::theme::OverlayStyle;

/// Opacity of trail lines.
pub const TRAIL_OPACITY: f32 = 0.95;

/// Smallest viewport the host is laid out at.
pub const MIN_VIEWPORT: (u32, u32) = (320, 560);

/// Host viewport size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Viewport no smaller than [`MIN_VIEWPORT`].
    pub fn clamped(width: u32, height: u32) -> Self {
        Self {
            width: width.max(MIN_VIEWPORT.0),
            height: height.max(MIN_VIEWPORT.1),
        }
    }

    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::clamped(1280, 720)
    }
}

/// One vertex of a trail line.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TrailVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// All trails flattened into one vertex buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineBatch {
    pub vertices: Vec<TrailVertex>,
    /// Vertex range of each trail, in draw order.
    pub lines: Vec<Range<u32>>,
}

/// A particle's trail as the renderer sees it.
#[derive(Clone, Copy, Debug)]
pub struct TrailView<'a> {
    pub id: u64,
    pub color: Vec3,
    /// Newest first.
    pub points: &'a [DVec3],
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub(crate) population: &'a Population,
    pub camera: &'a Camera,
    pub viewport: Viewport,
    pub overlay: OverlayStyle,
    pub params: SimulationParams,
    /// Scene rotation about +Y in radians.
    pub rotation_y: f64,
    /// Particles whose last step was bounded by the clamp policy.
    pub saturated: usize,
    /// Frames produced since start.
    pub index: u64,
}

impl<'a> Frame<'a> {
    /// Number of trails.
    #[inline]
    pub fn len(&self) -> usize {
        self.population.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    /// Trails in insertion order (also the draw order).
    pub fn trails(&self) -> impl Iterator<Item = TrailView<'a>> + 'a {
        let population = self.population;
        population.iter().map(|p| TrailView {
            id: p.id(),
            color: p.color(),
            points: p.trail().points(),
        })
    }

    /// Model matrix carrying the scene rotation.
    pub fn model_matrix(&self) -> DMat4 {
        DMat4::from_rotation_y(self.rotation_y)
    }

    /// Combined model-view-projection matrix for this frame's viewport.
    pub fn view_projection(&self) -> DMat4 {
        self.camera.projection_matrix(self.viewport.aspect())
            * self.camera.view_matrix()
            * self.model_matrix()
    }

    /// Flatten every trail into a single vertex buffer.
    pub fn line_batch(&self) -> LineBatch {
        let total: usize = self.population.iter().map(|p| p.trail().len()).sum();
        let mut batch = LineBatch {
            vertices: Vec::with_capacity(total),
            lines: Vec::with_capacity(self.len()),
        };
        for trail in self.trails() {
            let start = batch.vertices.len() as u32;
            let color = trail.color.extend(TRAIL_OPACITY).to_array();
            batch.vertices.extend(trail.points.iter().map(|p| TrailVertex {
                position: p.as_vec3().to_array(),
                color,
            }));
            batch.lines.push(start..batch.vertices.len() as u32);
        }
        batch
    }
}

/// Consumer of frames: the narrow interface to whatever draws the trails.
pub trait FrameSink {
    fn draw(&mut self, frame: &Frame<'_>);
}

impl<F> FrameSink for F
where
    F: FnMut(&Frame<'_>),
{
    fn draw(&mut self, frame: &Frame<'_>) {
        self(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::SpawnContext;
    use crate::theme::Theme;

    fn frame<'a>(population: &'a Population, camera: &'a Camera) -> Frame<'a> {
        Frame {
            population,
            camera,
            viewport: Viewport::default(),
            overlay: Theme::Dark.overlay(),
            params: SimulationParams::default(),
            rotation_y: 0.0,
            saturated: 0,
            index: 0,
        }
    }

    #[test]
    fn test_viewport_minimum() {
        assert_eq!(Viewport::clamped(100, 100), Viewport { width: 320, height: 560 });
        assert_eq!(Viewport::clamped(1920, 1080).aspect(), 1920.0 / 1080.0);
    }

    #[test]
    fn test_trail_vertex_layout() {
        assert_eq!(std::mem::size_of::<TrailVertex>(), 28);
        let v = TrailVertex {
            position: [1.0, 2.0, 3.0],
            color: [0.0; 4],
        };
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 28);
    }

    #[test]
    fn test_line_batch_ranges() {
        let mut pop = Population::new(10, 4);
        pop.spawn(3, &mut SpawnContext::seeded(5));
        let camera = Camera::default();
        let batch = frame(&pop, &camera).line_batch();
        assert_eq!(batch.vertices.len(), 12);
        assert_eq!(batch.lines, vec![0..4, 4..8, 8..12]);
        let first = pop.iter().next().unwrap();
        assert_eq!(batch.vertices[0].position, first.head().as_vec3().to_array());
        assert_eq!(batch.vertices[0].color[3], TRAIL_OPACITY);
    }

    #[test]
    fn test_trails_in_insertion_order() {
        let mut pop = Population::new(10, 2);
        pop.spawn(4, &mut SpawnContext::seeded(5));
        let camera = Camera::default();
        let ids: Vec<u64> = frame(&pop, &camera).trails().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_closure_is_sink() {
        let pop = Population::new(1, 1);
        let camera = Camera::default();
        let mut drawn = 0;
        let mut sink = |f: &Frame<'_>| drawn += f.len() + 1;
        sink.draw(&frame(&pop, &camera));
        assert_eq!(drawn, 1);
    }
}
