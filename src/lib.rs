//! Particle fireworks drawn on an abstract 2D surface.
//!
//! A [`Show`] owns the active [`Firework`]s and advances them one tick per
//! frame. Each firework rises, bursts into [`Particle`]s in one of five
//! [`Pattern`]s and is dropped once every spark has faded. Drawing goes
//! through the [`Surface`] trait; [`TerminalCanvas`] renders to a truecolor
//! terminal and [`RecordingSurface`] records draw calls headlessly.
//! Launch timing lives outside the show, in [`Launcher`] and [`Scheduler`].

pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod firework;
pub mod particle;
pub mod pattern;
pub mod rng;
pub mod schedule;
pub mod show;
pub mod surface;
pub mod trigger;

pub use canvas::TerminalCanvas;
pub use config::Config;
pub use error::{Error, Result};
pub use firework::{Firework, LaunchParams};
pub use particle::Particle;
pub use pattern::{HeartPattern, Pattern};
pub use rng::{RandomSource, SequenceRng};
pub use schedule::{Scheduler, TimerId};
pub use show::Show;
pub use surface::{RecordingSurface, Surface};
pub use trigger::{Action, LaunchPolicy, Launcher, TriggerMode};
