//! Turtle state and geometry operations.
//!
//! The [`Turtle`] owns the pose, the bounds side-channel used by rendering
//! sinks, and the growing [`History`]. Every pose-changing operation updates
//! the pose deterministically and appends the corresponding normalized
//! record to the history.

use crate::history::{Command, History};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Heading the turtle faces after a reset: straight "up" the drawing plane.
pub const HOME_HEADING: f32 = 90.0;

/// Position, heading and pen state at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtlePose {
    /// Cartesian position. Unbounded; the drawing extent lives in [`Bounds`].
    pub position: Vec2,

    /// Heading in degrees, always stored normalized to `[0, 360)`.
    /// 0° points along +X, 90° along +Y.
    pub heading: f32,

    /// Whether moves currently leave a trace.
    pub pen_down: bool,
}

impl Default for TurtlePose {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            heading: HOME_HEADING,
            pen_down: true,
        }
    }
}

/// Axis-aligned extent of everything drawn so far, tracked for the
/// rendering sink. Not part of the history contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    fn include(&mut self, point: Vec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Width and height of the tracked rectangle.
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// The drawing turtle: pose, pen style, bounds and command history.
///
/// Style state (visibility, color, erase and fill modes) only matters to a
/// rendering sink; it never produces history entries of its own.
#[derive(Clone, Debug)]
pub struct Turtle {
    pose: TurtlePose,
    visible: bool,
    pen_color: u8,
    erasing: bool,
    filling: bool,
    bounds: Bounds,
    history: History,
}

impl Default for Turtle {
    fn default() -> Self {
        Self::new(HOME_HEADING)
    }
}

impl Turtle {
    /// Creates a turtle at the origin facing `home_heading` with the pen down.
    pub fn new(home_heading: f32) -> Self {
        let pose = TurtlePose {
            heading: home_heading.rem_euclid(360.0),
            ..TurtlePose::default()
        };
        Self {
            pose,
            visible: true,
            pen_color: 0,
            erasing: false,
            filling: false,
            bounds: Bounds {
                min: pose.position,
                max: pose.position,
            },
            history: History::new(),
        }
    }

    pub fn pose(&self) -> &TurtlePose {
        &self.pose
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn pen_color(&self) -> u8 {
        self.pen_color
    }

    /// Consumes the turtle, handing the run's artifacts to the caller.
    pub fn finish(self) -> (History, TurtlePose, Bounds) {
        (self.history, self.pose, self.bounds)
    }

    /// Advances `distance` units along the current heading.
    pub fn forward(&mut self, distance: f32) {
        let target = self.pose.position + displacement(self.pose.heading, distance);
        self.move_to(target);
        self.history.push(Command::Forward(distance));
    }

    /// Retreats `distance` units; the heading is unchanged.
    pub fn backward(&mut self, distance: f32) {
        let target = self.pose.position + displacement(self.pose.heading, -distance);
        self.move_to(target);
        self.history.push(Command::Backward(distance));
    }

    /// Rotates counterclockwise by `degrees`.
    pub fn left(&mut self, degrees: f32) {
        self.pose.heading = (self.pose.heading + degrees).rem_euclid(360.0);
        self.history.push(Command::TurnLeft(degrees));
    }

    /// Rotates clockwise by `degrees`.
    pub fn right(&mut self, degrees: f32) {
        self.pose.heading = (self.pose.heading - degrees).rem_euclid(360.0);
        self.history.push(Command::TurnRight(degrees));
    }

    /// Lifts the pen. Idempotent: only the up/down transition is recorded.
    pub fn pen_up(&mut self) {
        if self.pose.pen_down {
            self.pose.pen_down = false;
            self.history.push(Command::PenUp);
        }
    }

    /// Lowers the pen and leaves erase mode. Idempotent like [`pen_up`](Self::pen_up).
    pub fn pen_down(&mut self) {
        self.erasing = false;
        if !self.pose.pen_down {
            self.pose.pen_down = true;
            self.history.push(Command::PenDown);
        }
    }

    /// Makes the turtle cursor visible to rendering sinks (`st`).
    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Hides the turtle cursor (`ht`).
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Selects a pen color from the external palette (`setcolor`).
    pub fn set_pen_color(&mut self, color: u8) {
        self.pen_color = color;
    }

    /// Puts the pen into erase mode until the next `pd` (`penerase`).
    pub fn erase(&mut self) {
        self.erasing = true;
    }

    pub fn is_erasing(&self) -> bool {
        self.erasing
    }

    /// Marks the figure drawn from here on as a fill region (`fill`).
    pub fn fill(&mut self) {
        self.filling = true;
    }

    pub fn is_filling(&self) -> bool {
        self.filling
    }

    /// Moves to an absolute point by turning to face it and advancing.
    ///
    /// The only primitive motions are relative turn and relative advance, so
    /// the move decomposes into a [`left`](Self::left) by the signed delta
    /// between the current heading and the bearing to `target` (normalized
    /// into `(-180, 180]` so the turtle takes the short way around),
    /// followed by a [`forward`](Self::forward) over the straight-line
    /// distance. Both legs are recorded as ordinary history entries. A
    /// zero-length move records nothing.
    pub fn set_position(&mut self, target: Vec2) {
        let delta = target - self.pose.position;
        let distance = delta.length();
        if distance > 0.0 {
            let bearing = delta.y.atan2(delta.x).to_degrees();
            self.left(turn_delta(self.pose.heading, bearing));
            self.forward(distance);
        }
    }

    /// Traces a circular arc of `radius` sweeping `angle` degrees,
    /// approximated as `steps` chords.
    ///
    /// The arc's center sits `radius` units at 90° left of the current
    /// heading; a negative radius places it to the right, a negative angle
    /// sweeps clockwise. Each chord endpoint is reached with a
    /// [`set_position`](Self::set_position) move, so the history gains only
    /// primitive turn/advance pairs. Bounds are pre-extended to the full
    /// circle so the rendering sink reserves room for the swept region.
    pub fn arc(&mut self, radius: f32, angle: f32, steps: u32) {
        let steps = steps.max(1);
        let toward_center = (self.pose.heading + 90.0).to_radians();
        let center = self.pose.position + radius * Vec2::from_angle(toward_center);

        self.bounds.include(center - Vec2::splat(radius.abs()));
        self.bounds.include(center + Vec2::splat(radius.abs()));

        // Angle of the current position as seen from the center.
        let start = self.pose.heading - 90.0;
        let step_angle = angle / steps as f32;
        let sweep = angle.abs();

        for n in 0..=steps {
            let offset = step_angle * n as f32;
            let point = center + radius * Vec2::from_angle((start + offset).to_radians());
            if n == 0 {
                // Coincides with the current position; no motion to record.
                self.move_to(point);
            } else {
                self.set_position(point);
            }
            if offset.abs() >= sweep {
                break;
            }
        }
    }

    fn move_to(&mut self, target: Vec2) {
        self.pose.position = target;
        self.bounds.include(target);
    }
}

/// Cartesian displacement for travelling `distance` units along `heading`.
fn displacement(heading: f32, distance: f32) -> Vec2 {
    distance * Vec2::from_angle(heading.to_radians())
}

/// Signed turn taking `heading` to `bearing`, normalized into `(-180, 180]`.
fn turn_delta(heading: f32, bearing: f32) -> f32 {
    let delta = (bearing - heading).rem_euclid(360.0);
    if delta > 180.0 { delta - 360.0 } else { delta }
}
