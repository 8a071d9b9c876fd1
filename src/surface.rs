use std::ops::{Deref, DerefMut};

use crate::color::{Rgb, Rgba};

/// A 2D drawing target the simulation renders onto.
///
/// Coordinates are surface units with the origin in the top-left corner and
/// `y` growing downwards. Opacity is a piece of saved state: `save` pushes
/// the current global alpha, `restore` pops it.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn save(&mut self);
    fn restore(&mut self);
    fn set_global_alpha(&mut self, alpha: f32);

    /// Filled circle, blended with the current global alpha.
    fn fill_arc(&mut self, x: f32, y: f32, radius: f32, color: Rgb);

    /// Filled rectangle with its own translucency. Ignores the global alpha.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba);

    /// Sets the global alpha until the returned guard is dropped.
    fn scoped_alpha(&mut self, alpha: f32) -> AlphaScope<'_, Self>
    where
        Self: Sized,
    {
        self.save();
        self.set_global_alpha(alpha);
        AlphaScope { surface: self }
    }
}

/// Restores the surface state saved by [`Surface::scoped_alpha`] on drop.
pub struct AlphaScope<'a, S: Surface> {
    surface: &'a mut S,
}

impl<S: Surface> Deref for AlphaScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface> DerefMut for AlphaScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface> Drop for AlphaScope<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Arc { x: f32, y: f32, radius: f32, color: Rgb, alpha: f32 },
    Rect { x: f32, y: f32, width: f32, height: f32, color: Rgba },
}

/// Headless surface that records draw calls instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    alpha: f32,
    saved: Vec<f32>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            alpha: 1.0,
            saved: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn global_alpha(&self) -> f32 {
        self.alpha
    }

    pub fn save_depth(&self) -> usize {
        self.saved.len()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn save(&mut self) {
        self.saved.push(self.alpha);
    }

    fn restore(&mut self) {
        if let Some(alpha) = self.saved.pop() {
            self.alpha = alpha;
        }
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_arc(&mut self, x: f32, y: f32, radius: f32, color: Rgb) {
        self.commands.push(DrawCommand::Arc { x, y, radius, color, alpha: self.alpha });
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        self.commands.push(DrawCommand::Rect { x, y, width, height, color });
    }
}
