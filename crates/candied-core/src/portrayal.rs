//! Rendering contract for live agents.
//!
//! A renderer draws one circle per live agent. Creatures are sized by their
//! view range and colored by how many candies they ate today (red, yellow,
//! green for 0, 1, 2), with well-fed creatures drawn underneath. Candies are
//! small filled blue circles on top that vanish once eaten.

use candied_agents::{Candy, Creature};
use candied_types::{Color, Portrayal, Shape};

use crate::evolution::Evolution;

/// Layer on which candies are drawn.
pub const CANDY_LAYER: u8 = 10;

/// Radius of an uneaten candy, in canvas units.
pub const CANDY_RADIUS: f64 = 2.0;

/// Canvas units per plane unit for a canvas `canvas_width` wide.
pub fn canvas_scale(canvas_width: f64, plane_width: f64) -> f64 {
    if plane_width > 0.0 {
        canvas_width / plane_width
    } else {
        0.0
    }
}

/// How to draw a creature; `scale` converts plane units to canvas units.
pub fn creature_portrayal(creature: &Creature, scale: f64) -> Portrayal {
    let (color, layer) = match creature.eaten_candies {
        0 => (Color::Red, 2),
        1 => (Color::Yellow, 1),
        _ => (Color::Green, 0),
    };
    Portrayal {
        position: creature.position,
        shape: Shape::Circle,
        color,
        layer,
        radius: (creature.genome.view_range * scale).max(0.0),
        filled: false,
    }
}

/// How to draw a candy.
pub fn candy_portrayal(candy: &Candy) -> Portrayal {
    Portrayal {
        position: candy.position,
        shape: Shape::Circle,
        color: Color::Blue,
        layer: CANDY_LAYER,
        radius: if candy.eaten { 0.0 } else { CANDY_RADIUS },
        filled: true,
    }
}

/// Portrayals of every live agent, creatures first, each group in id order.
pub fn portray(evolution: &Evolution, scale: f64) -> Vec<Portrayal> {
    let population = evolution.population();
    population
        .creatures()
        .values()
        .map(|creature| creature_portrayal(creature, scale))
        .chain(population.candies().values().map(candy_portrayal))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use candied_agents::BehaviorConfig;
    use candied_types::{AgentId, Genome, Position};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::SimulationConfig;

    fn creature(eaten: u8) -> Creature {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut creature = Creature::newborn(
            AgentId::from_raw(1),
            Position::new(3.0, 4.0),
            Genome {
                view_range: 5.0,
                ..Genome::default()
            },
            100.0,
            &BehaviorConfig::default(),
            &mut rng,
        );
        creature.eaten_candies = eaten;
        creature
    }

    #[test]
    fn creature_color_and_layer_follow_appetite() {
        let hungry = creature_portrayal(&creature(0), 2.0);
        assert_eq!((hungry.color, hungry.layer), (Color::Red, 2));
        assert!((hungry.radius - 10.0).abs() < 1e-12);
        assert!(!hungry.filled);

        let half = creature_portrayal(&creature(1), 2.0);
        assert_eq!((half.color, half.layer), (Color::Yellow, 1));

        let full = creature_portrayal(&creature(2), 2.0);
        assert_eq!((full.color, full.layer), (Color::Green, 0));
    }

    #[test]
    fn eaten_candy_collapses() {
        let mut candy = Candy::new(AgentId::from_raw(2), Position::new(1.0, 1.0));
        let fresh = candy_portrayal(&candy);
        assert_eq!(fresh.color, Color::Blue);
        assert_eq!(fresh.layer, CANDY_LAYER);
        assert!((fresh.radius - CANDY_RADIUS).abs() < f64::EPSILON);
        assert!(fresh.filled);

        candy.eaten = true;
        assert!(candy_portrayal(&candy).radius.abs() < f64::EPSILON);
    }

    #[test]
    fn negative_view_range_draws_nothing() {
        let mut c = creature(0);
        c.genome.view_range = -3.0;
        assert!(creature_portrayal(&c, 1.0).radius.abs() < f64::EPSILON);
    }

    #[test]
    fn portray_covers_every_live_creature() {
        let config = SimulationConfig {
            n_creatures: 4,
            seed: Some(3),
            ..SimulationConfig::default()
        };
        let evolution = Evolution::new(config).unwrap();
        let scale = canvas_scale(500.0, evolution.config().width);
        assert!((scale - 2.5).abs() < 1e-12);
        let portrayals = portray(&evolution, scale);
        assert_eq!(portrayals.len(), 4);
        assert!(portrayals.iter().all(|p| p.color == Color::Red));
    }
}
