//! Enemy Behavior
//!
//! This demo drives an enemy through idle, patrol and attack states from a
//! host-owned frame loop.
//!
//! Key concepts:
//! - The host owns time; states count frames inside their own handlers
//! - States request transitions through their binding
//! - A guard keeps the enemy from attacking straight out of idle
//! - The shared context gives every state access to the enemy
//!
//! Run with: RUST_LOG=stance=debug cargo run --example enemy_behavior

use stance::core::{StateBinding, StateHandler};
use stance::{state_key, MachineError, StateMachine, TransitionGuard};
use std::cell::Cell;
use tracing_subscriber::EnvFilter;

state_key! {
    enum EnemyState {
        Idle,
        Patrol,
        Attack,
    }
}

/// The entity whose behavior the machine structures.
struct Enemy {
    name: &'static str,
    position: Cell<i32>,
    target_in_range: Cell<bool>,
}

type Binding = StateBinding<EnemyState, Enemy>;

/// Per-frame behavior the host calls on whichever state is active.
trait Tick {
    fn tick(&self, frame: u32);
}

struct Idle {
    frames: Cell<u32>,
    binding: Option<Binding>,
}

impl StateHandler<EnemyState, Enemy> for Idle {
    fn bind(&mut self, binding: Binding) {
        self.binding = Some(binding);
    }

    fn on_enter(&self) {
        self.frames.set(0);
        println!("  [idle] catching breath");
    }

    fn on_exit(&self) {
        println!("  [idle] done resting after {} frames", self.frames.get());
    }
}

impl Tick for Idle {
    fn tick(&self, _frame: u32) {
        self.frames.set(self.frames.get() + 1);
        if self.frames.get() >= 3 {
            if let Some(binding) = &self.binding {
                request(binding, EnemyState::Patrol);
            }
        }
    }
}

struct Patrol {
    direction: Cell<i32>,
    binding: Option<Binding>,
}

impl StateHandler<EnemyState, Enemy> for Patrol {
    fn bind(&mut self, binding: Binding) {
        self.binding = Some(binding);
    }

    fn on_enter(&self) {
        println!("  [patrol] setting out");
    }

    fn on_exit(&self) {
        println!("  [patrol] stopping");
    }
}

impl Tick for Patrol {
    fn tick(&self, _frame: u32) {
        let Some(binding) = &self.binding else {
            return;
        };
        let enemy = binding.context();
        let position = enemy.position.get() + self.direction.get();
        if position.abs() >= 3 {
            self.direction.set(-self.direction.get());
        }
        enemy.position.set(position);
        println!("  [patrol] {} walks to {}", enemy.name, position);

        if enemy.target_in_range.get() {
            request(binding, EnemyState::Attack);
        } else if position == 0 {
            request(binding, EnemyState::Idle);
        }
    }
}

struct Attack {
    binding: Option<Binding>,
}

impl StateHandler<EnemyState, Enemy> for Attack {
    fn bind(&mut self, binding: Binding) {
        self.binding = Some(binding);
    }

    fn on_enter(&self) {
        if let Some(binding) = &self.binding {
            let enemy = binding.context();
            println!("  [attack] {} strikes at position {}", enemy.name, enemy.position.get());
            enemy.target_in_range.set(false);
            request(binding, EnemyState::Patrol);
        }
    }

    fn on_exit(&self) {
        println!("  [attack] recovering");
    }
}

fn request(binding: &Binding, next: EnemyState) {
    if let Err(err) = binding.change_state(next) {
        eprintln!("  transition to {:?} failed: {}", next, err);
    }
}

fn tick(machine: &StateMachine<EnemyState, Enemy>, frame: u32) -> Result<(), MachineError> {
    let handler = machine.current_handler()?;
    if let Some(idle) = handler.downcast_ref::<Idle>() {
        idle.tick(frame);
    } else if let Some(patrol) = handler.downcast_ref::<Patrol>() {
        patrol.tick(frame);
    }
    Ok(())
}

fn main() -> Result<(), MachineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Enemy Behavior Demo ===\n");

    let enemy = Enemy {
        name: "goblin",
        position: Cell::new(0),
        target_in_range: Cell::new(false),
    };
    let mut machine = StateMachine::with_context(enemy);
    machine.register(
        EnemyState::Idle,
        Idle {
            frames: Cell::new(0),
            binding: None,
        },
    )?;
    machine.register(
        EnemyState::Patrol,
        Patrol {
            direction: Cell::new(1),
            binding: None,
        },
    )?;
    machine.register(EnemyState::Attack, Attack { binding: None })?;

    machine.set_guard(TransitionGuard::deny_edge(EnemyState::Idle, EnemyState::Attack));
    machine.subscribe(|from, to| println!("  -> {:?} to {:?}", from, to));

    machine.start(EnemyState::Idle)?;

    for frame in 1..=16 {
        println!("frame {}:", frame);
        if frame == 6 {
            machine.context().target_in_range.set(true);
        }
        tick(&machine, frame)?;
    }

    machine.clear()?;
    println!("\nTransitions recorded: {}", machine.history().len());
    println!("\n=== Demo Complete ===");
    Ok(())
}
