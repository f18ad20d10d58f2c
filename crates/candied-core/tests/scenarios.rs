//! End-to-end scenarios for the day loop.
//!
//! Every run is seeded, but assertions stick to properties that hold for
//! any seed: population bounds, counts, and lifecycle rules.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use candied_core::config::SimulationConfig;
use candied_core::evolution::{DaySummary, Evolution};
use candied_core::runner::{DayCallback, run_to_completion};
use candied_types::AgentId;

fn config(n_creatures: u32, n_candies: u32, max_days: u32, seed: u64) -> SimulationConfig {
    SimulationConfig {
        n_creatures,
        n_candies,
        max_days,
        seed: Some(seed),
        ..SimulationConfig::default()
    }
}

#[test]
fn empty_world_reports_nan_means() {
    let mut evolution = Evolution::new(config(0, 5, 1, 1)).unwrap();
    let summary = evolution.step().unwrap().unwrap();

    assert!(!evolution.running());
    let row = summary.model;
    assert_eq!(row.n_creatures, 0);
    assert_eq!(row.n_candies, 5);
    assert!(row.mean_energy.is_nan());
    assert!(row.mean_speed.is_nan());
    assert!(row.mean_view_range.is_nan());
    assert!(row.mean_focus_angle.is_nan());
    assert!(row.mean_mut_rate.is_nan());
}

#[test]
fn lone_creature_without_food_starves() {
    let mut cfg = config(1, 0, 1, 2);
    cfg.max_steps_per_day = 10;
    let mut evolution = Evolution::new(cfg).unwrap();
    let summary = evolution.step().unwrap().unwrap();

    assert_eq!(summary.model.count_eaten_0, 1);
    assert_eq!(summary.evolve.starved, 1);
    assert_eq!(summary.creatures_at_dusk, 0);
    assert_eq!(evolution.population().creature_count(), 0);
    assert!(evolution.population().space().is_empty());
}

#[test]
fn two_full_creatures_double_the_population() {
    let mut evolution = Evolution::new(config(2, 0, 3, 3)).unwrap();
    let parents: Vec<AgentId> = evolution.population().creatures().keys().copied().collect();
    for id in &parents {
        let creature = evolution.population_mut().creature_mut(*id).unwrap();
        creature.eaten_candies = 2;
        creature.penalty = 0.25;
    }

    let report = evolution.evolve().unwrap();

    assert_eq!(report.offspring.len(), 2);
    assert_eq!(evolution.population().creature_count(), 4);
    for id in &parents {
        let parent = &evolution.population().creatures()[id];
        assert!(parent.penalty.abs() < f64::EPSILON);
    }
    for id in &report.offspring {
        let child = &evolution.population().creatures()[id];
        assert_eq!(child.age, 0);
        assert!(!parents.contains(id));
    }
}

#[test]
fn stepping_a_finished_simulation_changes_nothing() {
    let mut evolution = Evolution::new(config(5, 10, 2, 4)).unwrap();
    while evolution.running() {
        evolution.step().unwrap();
    }
    let creatures = evolution.population().creatures().clone();
    let rows = evolution.stats().model_rows().len();

    assert!(evolution.step().unwrap().is_none());
    assert!(evolution.step().unwrap().is_none());

    assert_eq!(evolution.day(), 2);
    assert_eq!(evolution.population().creatures(), &creatures);
    assert_eq!(evolution.stats().model_rows().len(), rows);
    assert_eq!(evolution.population().candy_count(), 0);
}

#[test]
fn extinct_population_keeps_counting_days() {
    let mut evolution = Evolution::new(config(1, 0, 3, 5)).unwrap();
    let result = run_to_completion(&mut evolution, &mut candied_core::runner::NoOpCallback).unwrap();

    assert_eq!(result.days, 3);
    assert_eq!(result.final_creatures, 0);
    let rows = evolution.stats().model_rows();
    assert_eq!(rows.len(), 3);
    assert!(rows[1].mean_energy.is_nan());
    assert!(rows[2].is_dead_population());
}

/// Checks population invariants after every day.
struct InvariantCheck {
    n_candies: u32,
    days: u32,
}

impl DayCallback for InvariantCheck {
    fn on_day(&mut self, summary: &DaySummary, evolution: &Evolution) {
        let row = &summary.model;
        assert_eq!(
            row.count_eaten_0 + row.count_eaten_1 + row.count_eaten_2,
            row.n_creatures,
            "eaten counts must partition the population"
        );
        assert_eq!(row.n_candies, self.n_candies, "candies are only spawned in the morning");
        assert_eq!(summary.candies_spawned, self.n_candies);
        assert!(summary.candies_eaten <= self.n_candies);
        assert_eq!(
            summary.creatures_at_dawn - summary.evolve.starved - summary.evolve.exhausted
                + u32::try_from(summary.evolve.offspring.len()).unwrap(),
            summary.creatures_at_dusk
        );

        let population = evolution.population();
        assert_eq!(population.candy_count(), 0, "candies never outlive their day");
        assert_eq!(population.space().len(), population.creature_count());
        for creature in population.creatures().values() {
            assert!(creature.eaten_candies <= 2);
            assert!((0.0..=1.0).contains(&creature.penalty));
            let width = evolution.config().width;
            let height = evolution.config().height;
            assert!((0.0..width).contains(&creature.position.x));
            assert!((0.0..height).contains(&creature.position.y));
        }
        self.days += 1;
    }
}

#[test]
fn invariants_hold_across_seeded_runs() {
    for seed in 0..6 {
        let mut cfg = config(12, 20, 15, seed);
        cfg.width = 60.0;
        cfg.height = 60.0;
        let mut evolution = Evolution::new(cfg).unwrap();
        let mut check = InvariantCheck {
            n_candies: 20,
            days: 0,
        };
        run_to_completion(&mut evolution, &mut check).unwrap();
        assert_eq!(check.days, 15);
        assert!(!evolution.running());
    }
}

#[test]
fn wild_mutation_rates_do_not_crash() {
    let mut cfg = config(20, 40, 12, 99);
    cfg.mut_rate = 5.0;
    cfg.width = 50.0;
    cfg.height = 50.0;
    let mut evolution = Evolution::new(cfg).unwrap();
    let result = run_to_completion(&mut evolution, &mut candied_core::runner::NoOpCallback);
    assert!(result.is_ok());
}

#[test]
fn agent_rows_follow_the_population() {
    let mut evolution = Evolution::new(config(4, 6, 1, 7)).unwrap();
    evolution.step().unwrap();
    let stats = evolution.take_stats();
    let (models, agents) = stats.into_rows();

    assert_eq!(models.len(), 1);
    assert_eq!(agents.len(), 4 + 6);
    assert!(agents.iter().all(|row| row.day == 1));
    assert!(evolution.stats().model_rows().is_empty());
}
