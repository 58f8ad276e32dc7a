//! The bounded plane agents move on.
use crate::agent::{Agent, Position};
use crate::parameters::SimulationParameters;
use crate::random::RandomSource;

/// A `width` x `height` rectangle with its origin at the top-left corner. Agents are discs of
/// radius `agent_radius` and are kept entirely inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct World {
    width: f64,
    height: f64,
    agent_radius: f64,
}

impl World {
    #[must_use]
    pub fn new(width: f64, height: f64, agent_radius: f64) -> Self {
        World {
            width,
            height,
            agent_radius,
        }
    }

    #[must_use]
    pub fn from_parameters(params: &SimulationParameters) -> Self {
        World::new(
            f64::from(params.world_width),
            f64::from(params.world_height),
            params.agent_radius,
        )
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn agent_radius(&self) -> f64 {
        self.agent_radius
    }

    /// Moves `pos` onto or inside `[radius, width - radius] x [radius, height - radius]`.
    #[must_use]
    pub fn clamp_position(&self, mut pos: Position, radius: f64) -> Position {
        if pos.x - radius < 0.0 {
            pos.x = radius;
        }
        if pos.y - radius < 0.0 {
            pos.y = radius;
        }
        if pos.x + radius > self.width {
            pos.x = self.width - radius;
        }
        if pos.y + radius > self.height {
            pos.y = self.height - radius;
        }
        pos
    }

    /// Whether an agent centered at `pos` lies entirely inside the world.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        let r = self.agent_radius;
        pos.x >= r && pos.x <= self.width - r && pos.y >= r && pos.y <= self.height - r
    }

    /// Displaces `agent` by a velocity drawn uniformly from `[-max_speed, max_speed]` on each
    /// axis (x first, then y), then clamps it back into bounds.
    pub fn move_agent(&self, agent: &mut Agent, max_speed: u32, rng: &mut impl RandomSource) {
        let x_velocity = draw_velocity(max_speed, rng);
        let y_velocity = draw_velocity(max_speed, rng);
        let moved = Position::new(
            agent.position.x + x_velocity,
            agent.position.y + y_velocity,
        );
        agent.position = self.clamp_position(moved, self.agent_radius);
    }
}

fn draw_velocity(max_speed: u32, rng: &mut impl RandomSource) -> f64 {
    let max_speed = u64::from(max_speed);
    let draw = rng.next_int_less_than(2 * max_speed + 1);
    // Both operands fit in 33 bits, so the difference is exact in f64.
    draw as f64 - max_speed as f64
}
