//! Genomes: birth and survival rules plus a display hue.
//!
//! A [`Genome`] is an immutable value. [`mutate`] and [`breed`] always build
//! a new genome; the inputs are never modified. Identity is structural over
//! the hue and both rule sets. Two genomes that differ only in mutation rate
//! belong to the same colony.

use std::hash::{Hash, Hasher};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GenomeError;

/// Lower bound of a genome's mutation rate.
pub const MIN_MUTATION_RATE: f64 = 0.005;

/// Upper bound of a genome's mutation rate.
pub const MAX_MUTATION_RATE: f64 = 0.02;

/// Mutation rate of freshly seeded genomes.
pub const INITIAL_MUTATION_RATE: f64 = 0.01;

/// Largest hue shift applied by one mutation, in degrees.
pub const HUE_MUTATION_MAX: f64 = 20.0;

/// Chance that a qualifying dead cell breeds instead of following the
/// dominant birth rule.
pub const BREEDING_CHANCE: f64 = 0.02;

/// Minimum count of the most frequent neighbor genome required to breed.
pub const MIN_BREEDING_NEIGHBORS: usize = 5;

/// Chance that each rule set is rewritten during a mutation.
const RULE_MUTATION_CHANCE: f64 = 0.4;

/// Chance that a bred child is additionally mutated.
const CHILD_MUTATION_CHANCE: f64 = 0.3;

/// Largest mutation-rate shift applied by one mutation.
const RATE_MUTATION_MAX: f64 = 0.01;

/// Largest mutation-rate shift applied when breeding.
const RATE_BREEDING_JITTER: f64 = 0.005;

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

/// A non-empty subset of neighbor counts `1..=8`.
///
/// Stored as a bitmask where bit `n - 1` marks count `n`; iteration is
/// always ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct RuleSet(u8);

/// Mask bit for neighbor count `n`; zero outside `1..=8`.
const fn bit(n: u8) -> u8 {
    match n.checked_sub(1) {
        Some(shift) => match 1_u8.checked_shl(shift as u32) {
            Some(mask) => mask,
            None => 0,
        },
        None => 0,
    }
}

impl RuleSet {
    /// Build a rule set from neighbor counts. Duplicates are ignored.
    pub fn new(values: &[u8]) -> Result<Self, GenomeError> {
        let mut bits = 0_u8;
        for &value in values {
            if !(1..=8).contains(&value) {
                return Err(GenomeError::InvalidRuleValue(value));
            }
            bits |= bit(value);
        }
        if bits == 0 {
            return Err(GenomeError::EmptyRuleSet);
        }
        Ok(Self(bits))
    }

    /// Whether `count` is a member.
    pub fn contains(self, count: usize) -> bool {
        u8::try_from(count).is_ok_and(|n| self.0 & bit(n) != 0)
    }

    /// Number of members.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set has no members. Never true for a constructed set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (1..=8_u8).filter(move |&n| self.0 & bit(n) != 0)
    }

    /// Smallest member.
    pub fn first(self) -> u8 {
        self.iter().next().unwrap_or(1)
    }

    /// Members of either set.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    const fn with(self, value: u8) -> Self {
        Self(self.0 | bit(value))
    }

    /// Remove `value`, refusing to empty the set.
    const fn without(self, value: u8) -> Self {
        let bits = self.0 & !bit(value);
        if bits == 0 { self } else { Self(bits) }
    }

    /// Counts in `1..=8` that are not members.
    fn missing(self) -> impl Iterator<Item = u8> {
        (1..=8_u8).filter(move |&n| self.0 & bit(n) == 0)
    }
}

impl TryFrom<Vec<u8>> for RuleSet {
    type Error = GenomeError;

    fn try_from(values: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(&values)
    }
}

impl From<RuleSet> for Vec<u8> {
    fn from(rule: RuleSet) -> Self {
        rule.iter().collect()
    }
}

impl core::fmt::Display for RuleSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for n in self.iter() {
            write!(f, "{n}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Genome
// ---------------------------------------------------------------------------

/// Rules and appearance inherited by live cells.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Genome {
    /// Neighbor counts at which a dead cell comes alive.
    pub birth: RuleSet,
    /// Neighbor counts at which a live cell stays alive.
    pub survival: RuleSet,
    /// Display hue in degrees, `[0, 360)`.
    pub base_hue: f64,
    /// Probability that [`mutate`] changes anything, `[0.005, 0.02]`.
    pub mutation_rate: f64,
}

impl Genome {
    /// Conway's Life (B3/S23) in the given hue.
    pub fn classic(hue: f64) -> Self {
        Self {
            birth: RuleSet(0b0000_0100),
            survival: RuleSet(0b0000_0110),
            base_hue: wrap_hue(hue),
            mutation_rate: INITIAL_MUTATION_RATE,
        }
    }

    const fn key(&self) -> (u8, u8, u64) {
        (self.birth.0, self.survival.0, self.base_hue.to_bits())
    }
}

impl PartialEq for Genome {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Genome {}

impl Hash for Genome {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl core::fmt::Display for Genome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "B{}/S{}", self.birth, self.survival)
    }
}

/// Wrap a hue onto `[0, 360)`.
pub fn wrap_hue(hue: f64) -> f64 {
    let wrapped = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

fn clamp_rate(rate: f64) -> f64 {
    rate.clamp(MIN_MUTATION_RATE, MAX_MUTATION_RATE)
}

/// Uniform value in `[-1, 1)`.
fn signed_unit(rng: &mut impl Rng) -> f64 {
    rng.random::<f64>().mul_add(2.0, -1.0)
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// Either add a random missing count or drop a random member.
///
/// Adding needs a coin flip and room to grow; otherwise a member is dropped
/// as long as one would remain.
fn mutate_rule(rule: RuleSet, rng: &mut impl Rng) -> RuleSet {
    if rng.random::<f64>() < 0.5 && rule.len() < 8 {
        let missing: Vec<u8> = rule.missing().collect();
        let pick = rng.random_range(0..missing.len());
        missing.get(pick).map_or(rule, |&n| rule.with(n))
    } else if rule.len() > 1 {
        let members: Vec<u8> = rule.iter().collect();
        let pick = rng.random_range(0..members.len());
        members.get(pick).map_or(rule, |&n| rule.without(n))
    } else {
        rule
    }
}

/// Possibly mutate `genome`.
///
/// With probability `1 - mutation_rate` the input is returned unchanged.
/// Otherwise each rule set is rewritten with 40% chance, the hue shifts by up
/// to 20 degrees, and the mutation rate drifts by up to 0.01 (clamped).
pub fn mutate(genome: Genome, rng: &mut impl Rng) -> Genome {
    if rng.random::<f64>() > genome.mutation_rate {
        return genome;
    }
    let birth = if rng.random::<f64>() < RULE_MUTATION_CHANCE {
        mutate_rule(genome.birth, rng)
    } else {
        genome.birth
    };
    let survival = if rng.random::<f64>() < RULE_MUTATION_CHANCE {
        mutate_rule(genome.survival, rng)
    } else {
        genome.survival
    };
    let base_hue = wrap_hue(signed_unit(rng).mul_add(HUE_MUTATION_MAX, genome.base_hue));
    let mutation_rate = clamp_rate(signed_unit(rng).mul_add(RATE_MUTATION_MAX, genome.mutation_rate));
    Genome {
        birth,
        survival,
        base_hue,
        mutation_rate,
    }
}

/// Keep each member of `union` with 50% chance, falling back to the first
/// member of one parent's rule when nothing survives.
fn cross_rule(a: RuleSet, b: RuleSet, rng: &mut impl Rng) -> RuleSet {
    let mut bits = 0_u8;
    for n in a.union(b).iter() {
        if rng.random::<f64>() < 0.5 {
            bits |= bit(n);
        }
    }
    if bits != 0 {
        return RuleSet(bits);
    }
    let fallback = if rng.random::<f64>() < 0.5 { a.first() } else { b.first() };
    RuleSet(0).with(fallback)
}

/// Produce a child genome from two parents.
///
/// Rules are a random subset of the parents' union. The hue moves from `a`
/// toward `b` by a random fraction of the shortest signed angular distance.
/// The rate averages the parents with a small jitter. The child is then
/// passed through [`mutate`] with 30% chance.
pub fn breed(a: Genome, b: Genome, rng: &mut impl Rng) -> Genome {
    let birth = cross_rule(a.birth, b.birth, rng);
    let survival = cross_rule(a.survival, b.survival, rng);

    let distance = (b.base_hue - a.base_hue + 540.0).rem_euclid(360.0) - 180.0;
    let base_hue = wrap_hue(distance.mul_add(rng.random::<f64>(), a.base_hue));

    let average = (a.mutation_rate + b.mutation_rate) / 2.0;
    let jitter = rng.random::<f64>().mul_add(2.0 * RATE_BREEDING_JITTER, -RATE_BREEDING_JITTER);
    let mutation_rate = clamp_rate(average + jitter);

    let child = Genome {
        birth,
        survival,
        base_hue,
        mutation_rate,
    };
    if rng.random::<f64>() < CHILD_MUTATION_CHANCE {
        mutate(child, rng)
    } else {
        child
    }
}

/// Whether a dead cell whose dominant neighbor genome has `neighbor_count`
/// members should breed. Always false below five.
pub fn should_breed(neighbor_count: usize, rng: &mut impl Rng) -> bool {
    if neighbor_count < MIN_BREEDING_NEIGHBORS {
        return false;
    }
    rng.random::<f64>() < BREEDING_CHANCE
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    use super::*;

    /// Always yields the largest possible value, so every probability
    /// check fails.
    struct MaxRng;

    impl RngCore for MaxRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }
        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }
        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0xFF);
        }
    }

    /// Always yields zero, so every probability check passes.
    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    #[test]
    fn rule_set_rejects_bad_input() {
        assert_eq!(RuleSet::new(&[]), Err(GenomeError::EmptyRuleSet));
        assert_eq!(RuleSet::new(&[0]), Err(GenomeError::InvalidRuleValue(0)));
        assert_eq!(RuleSet::new(&[9]), Err(GenomeError::InvalidRuleValue(9)));
    }

    #[test]
    fn rule_set_iterates_ascending() {
        let rule = RuleSet::new(&[6, 2, 3, 2]).unwrap();
        assert_eq!(rule.iter().collect::<Vec<_>>(), vec![2, 3, 6]);
        assert_eq!(rule.len(), 3);
        assert!(rule.contains(6));
        assert!(!rule.contains(0));
        assert!(!rule.contains(9));
        assert!(!rule.contains(usize::MAX));
    }

    #[test]
    fn classic_displays_as_conway() {
        assert_eq!(Genome::classic(0.0).to_string(), "B3/S23");
    }

    #[test]
    fn equality_is_reflexive_and_symmetric() {
        let a = Genome::classic(33.0);
        let b = Genome {
            survival: RuleSet::new(&[3]).unwrap(),
            ..a
        };
        assert_eq!(a, a);
        assert_eq!(a == b, b == a);
        assert_ne!(a, b);
    }

    #[test]
    fn identity_ignores_mutation_rate() {
        let a = Genome::classic(90.0);
        let b = Genome {
            mutation_rate: 0.02,
            ..a
        };
        let c = Genome {
            base_hue: 91.0,
            ..a
        };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn mutate_is_identity_when_roll_fails() {
        let genome = Genome::classic(45.0);
        let out = mutate(genome, &mut MaxRng);
        assert_eq!(out, genome);
        assert_eq!(out.mutation_rate, genome.mutation_rate);
    }

    #[test]
    fn mutate_keeps_invariants() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut genome = Genome {
            mutation_rate: MAX_MUTATION_RATE,
            ..Genome::classic(350.0)
        };
        for _ in 0..5000 {
            // Force frequent mutation by resetting the rate each round.
            genome = mutate(
                Genome {
                    mutation_rate: MAX_MUTATION_RATE,
                    ..genome
                },
                &mut rng,
            );
            assert!(!genome.birth.is_empty());
            assert!(!genome.survival.is_empty());
            assert!((0.0..360.0).contains(&genome.base_hue));
            assert!((MIN_MUTATION_RATE..=MAX_MUTATION_RATE).contains(&genome.mutation_rate));
        }
    }

    #[test]
    fn mutate_with_zero_roll_changes_rules() {
        // ZeroRng: mutation fires, both rules mutate, the add branch is
        // taken with the smallest missing count, hue shifts by -20.
        let out = mutate(Genome::classic(10.0), &mut ZeroRng);
        assert_eq!(out.birth.iter().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(out.survival.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!((out.base_hue - 350.0).abs() < 1e-9);
        assert_eq!(out.mutation_rate, MIN_MUTATION_RATE);
    }

    #[test]
    fn full_rule_drops_a_member() {
        let full = RuleSet::new(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let out = mutate_rule(full, &mut ZeroRng);
        assert_eq!(out.len(), 7);
    }

    #[test]
    fn single_member_rule_never_empties() {
        let single = RuleSet::new(&[4]).unwrap();
        assert_eq!(mutate_rule(single, &mut MaxRng), single);
    }

    #[test]
    fn breed_keeps_invariants() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = Genome::classic(350.0);
        let b = Genome {
            birth: RuleSet::new(&[3, 6]).unwrap(),
            survival: RuleSet::new(&[1, 5]).unwrap(),
            ..Genome::classic(20.0)
        };
        for _ in 0..2000 {
            let child = breed(a, b, &mut rng);
            assert!(!child.birth.is_empty());
            assert!(!child.survival.is_empty());
            assert!((0.0..360.0).contains(&child.base_hue));
            assert!((MIN_MUTATION_RATE..=MAX_MUTATION_RATE).contains(&child.mutation_rate));
        }
    }

    #[test]
    fn breed_hue_crosses_zero_the_short_way() {
        // Hue moves from 350 toward 20 through 0, never through 180.
        let mut rng = StdRng::seed_from_u64(11);
        let a = Genome::classic(350.0);
        let b = Genome::classic(20.0);
        for _ in 0..500 {
            let hue = breed(a, b, &mut rng).base_hue;
            assert!(hue >= 325.0 || hue <= 45.0, "hue {hue} took the long way");
        }
    }

    #[test]
    fn breed_with_max_roll_drops_everything_then_falls_back() {
        let a = Genome {
            birth: RuleSet::new(&[2, 5]).unwrap(),
            ..Genome::classic(0.0)
        };
        let b = Genome::classic(0.0);
        let child = breed(a, b, &mut MaxRng);
        // Every keep roll fails; the fallback coin picks b's first member.
        assert_eq!(child.birth.iter().collect::<Vec<_>>(), vec![3]);
        assert_eq!(child.survival.iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn should_breed_requires_five_neighbors() {
        assert!(!should_breed(4, &mut ZeroRng));
        assert!(should_breed(5, &mut ZeroRng));
        assert!(!should_breed(8, &mut MaxRng));
    }

    #[test]
    fn hue_wrap_never_returns_360() {
        assert_eq!(wrap_hue(360.0), 0.0);
        assert_eq!(wrap_hue(-1e-20), 0.0);
        assert_eq!(wrap_hue(-10.0), 350.0);
    }

    #[test]
    fn genome_round_trips_through_yaml() {
        let genome = Genome::classic(120.0);
        let yaml = serde_yml::to_string(&genome).unwrap();
        let back: Genome = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(back, genome);
        assert!(serde_yml::from_str::<Genome>("birth: []\nsurvival: [2]\nbase_hue: 1.0\nmutation_rate: 0.01\n").is_err());
    }
}
