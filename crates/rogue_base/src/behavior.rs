//! # Behaviors
//!
//! AI sub-objects carried by [`Brain`](crate::Brain). A behavior is stateful
//! and polymorphic, so it clones through [`Behavior::box_clone`] rather than
//! by sharing.

use std::fmt;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rogue_core::{Entity, EntityDb};

use crate::components::{Location, LOCATION};

/// A one-cell movement intent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Step {
    /// X offset, `-1..=1`.
    pub dx: i64,
    /// Y offset, `-1..=1`.
    pub dy: i64,
    /// Z offset, `-1..=1`.
    pub dz: i64,
}

impl Step {
    /// Stay in place.
    pub const STAY: Self = Self::new(0, 0, 0);

    /// Creates a step.
    #[inline]
    #[must_use]
    pub const fn new(dx: i64, dy: i64, dz: i64) -> Self {
        Self { dx, dy, dz }
    }

    /// One cell from `from` in the direction of `to` on every axis.
    #[must_use]
    pub const fn toward(from: &Location, to: &Location) -> Self {
        Self::new(
            (to.x - from.x).signum(),
            (to.y - from.y).signum(),
            (to.z - from.z).signum(),
        )
    }

    /// Whether this step moves at all.
    #[inline]
    #[must_use]
    pub const fn is_stay(self) -> bool {
        self.dx == 0 && self.dy == 0 && self.dz == 0
    }

    /// The location reached by taking this step from `from`.
    #[must_use]
    pub const fn apply(self, from: &Location) -> Location {
        Location::new(from.region, from.x + self.dx, from.y + self.dy, from.z + self.dz)
    }
}

/// Decides what an entity does each turn.
pub trait Behavior: fmt::Debug {
    /// Chooses the next step for `me`. The database is read-only here.
    fn act(&mut self, me: Entity, db: &EntityDb) -> Step;

    /// Clones this behavior into a fresh box.
    fn box_clone(&self) -> Box<dyn Behavior>;
}

impl Clone for Box<dyn Behavior> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Never moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Idle;

impl Behavior for Idle {
    fn act(&mut self, _me: Entity, _db: &EntityDb) -> Step {
        Step::STAY
    }

    fn box_clone(&self) -> Box<dyn Behavior> {
        Box::new(*self)
    }
}

/// Random walk on the entity's z level.
///
/// The generator state is part of the behavior: a cloned wanderer replays
/// the same walk from the point it was cloned.
#[derive(Clone, Debug)]
pub struct Wander {
    rng: ChaCha8Rng,
}

impl Wander {
    /// Creates a wanderer with a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Behavior for Wander {
    fn act(&mut self, _me: Entity, _db: &EntityDb) -> Step {
        Step::new(self.rng.gen_range(-1..=1), self.rng.gen_range(-1..=1), 0)
    }

    fn box_clone(&self) -> Box<dyn Behavior> {
        Box::new(self.clone())
    }
}

/// Steps toward another entity in the same region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Follow {
    /// The entity to chase.
    pub target: Entity,
}

impl Follow {
    /// Creates a follower of `target`.
    #[must_use]
    pub const fn new(target: Entity) -> Self {
        Self { target }
    }
}

impl Behavior for Follow {
    fn act(&mut self, me: Entity, db: &EntityDb) -> Step {
        let here = db.get::<Location>(me, LOCATION);
        let there = db.get::<Location>(self.target, LOCATION);
        match (here, there) {
            (Some(here), Some(there)) if here.region == there.region => Step::toward(here, there),
            _ => Step::STAY,
        }
    }

    fn box_clone(&self) -> Box<dyn Behavior> {
        Box::new(*self)
    }
}
