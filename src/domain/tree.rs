//! Tree record and its growth rule

use std::fmt;

use rand::Rng;

/// Earliest planting year produced by the random factory (inclusive).
pub const MIN_YEAR: i32 = 2000;
/// Latest planting year produced by the random factory (exclusive).
pub const MAX_YEAR: i32 = 2024;
/// Height range for random trees, in feet.
pub const MIN_HEIGHT: f64 = 10.0;
pub const MAX_HEIGHT: f64 = 20.0;
/// Growth rate range for random trees, in percent per year.
pub const MIN_GROWTH_RATE: f64 = 10.0;
pub const MAX_GROWTH_RATE: f64 = 20.0;

/// Tree species.
///
/// `Unknown` is the sentinel for records whose species name is not in the
/// vocabulary; it is never produced by the random factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Species {
    #[default]
    Unknown,
    Maple,
    Birch,
    Fir,
}

impl Species {
    /// Species the random factory draws from.
    pub const PLANTABLE: [Species; 3] = [Species::Maple, Species::Birch, Species::Fir];

    /// Look up a species by its record name.
    ///
    /// Matching ignores case and surrounding whitespace. Names outside the
    /// vocabulary map to [`Species::Unknown`].
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::PLANTABLE
            .into_iter()
            .find(|s| s.record_name().eq_ignore_ascii_case(name))
            .unwrap_or(Species::Unknown)
    }

    /// Name as it appears in import records.
    pub fn record_name(self) -> &'static str {
        match self {
            Species::Unknown => "Unknown",
            Species::Maple => "Maple",
            Species::Birch => "Birch",
            Species::Fir => "Fir",
        }
    }

    /// Name as it appears in reports.
    pub fn label(self) -> &'static str {
        match self {
            Species::Unknown => "UNKNOWN",
            Species::Maple => "MAPLE",
            Species::Birch => "BIRCH",
            Species::Fir => "FIR",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so width/alignment flags in report formats apply
        f.pad(self.label())
    }
}

/// A single tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tree {
    pub species: Species,
    pub year_planting: i32,
    /// Height in feet
    pub height: f64,
    /// Percent of the current height added per growth step
    pub growth_rate: f64,
}

impl Tree {
    pub fn new(species: Species, year_planting: i32, height: f64, growth_rate: f64) -> Self {
        Self {
            species,
            year_planting,
            height,
            growth_rate,
        }
    }

    /// Draw a random tree from `rng`.
    ///
    /// Species is uniform over [`Species::PLANTABLE`]; year, height and growth
    /// rate are uniform over their half-open ranges.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let species = Species::PLANTABLE[rng.gen_range(0..Species::PLANTABLE.len())];
        Self {
            species,
            year_planting: rng.gen_range(MIN_YEAR..MAX_YEAR),
            height: rng.gen_range(MIN_HEIGHT..MAX_HEIGHT),
            growth_rate: rng.gen_range(MIN_GROWTH_RATE..MAX_GROWTH_RATE),
        }
    }

    /// Random tree from the thread-local generator.
    pub fn make_random() -> Self {
        Self::random(&mut rand::thread_rng())
    }

    /// One year of growth: height increases by `growth_rate` percent.
    pub fn grow(&mut self) {
        self.height += self.height * self.growth_rate / 100.0;
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<5} {:<5} {:>5.2}' {:>5.2}%",
            self.species, self.year_planting, self.height, self.growth_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    #[test]
    fn given_tree_when_grow_once_then_height_increases_by_rate() {
        let mut tree = Tree::new(Species::Maple, 2010, 10.0, 15.0);
        tree.grow();
        assert!((tree.height - 11.5).abs() < 1e-9);
        assert_eq!(tree.growth_rate, 15.0);
        assert_eq!(tree.year_planting, 2010);
    }

    #[test]
    fn given_tree_when_grow_repeatedly_then_compounds() {
        let mut tree = Tree::new(Species::Fir, 2001, 12.0, 10.0);
        for _ in 0..3 {
            tree.grow();
        }
        let expected = 12.0 * 1.1_f64.powi(3);
        assert!((tree.height - expected).abs() < 1e-9);
    }

    #[test]
    fn given_zero_rate_when_grow_then_height_unchanged() {
        let mut tree = Tree::new(Species::Birch, 2005, 14.25, 0.0);
        tree.grow();
        assert_eq!(tree.height, 14.25);
    }

    #[test]
    fn given_seeded_rng_when_sampling_random_trees_then_all_fields_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2_000 {
            let tree = Tree::random(&mut rng);
            assert_ne!(tree.species, Species::Unknown);
            assert!((MIN_YEAR..MAX_YEAR).contains(&tree.year_planting));
            assert!(tree.height >= MIN_HEIGHT && tree.height < MAX_HEIGHT);
            assert!(tree.growth_rate >= MIN_GROWTH_RATE && tree.growth_rate < MAX_GROWTH_RATE);
            seen.insert(tree.species);
        }
        assert_eq!(seen.len(), Species::PLANTABLE.len());
    }

    #[test]
    fn given_thread_rng_when_make_random_then_species_is_plantable() {
        let tree = Tree::make_random();
        assert!(Species::PLANTABLE.contains(&tree.species));
    }

    #[rstest]
    #[case("Maple", Species::Maple)]
    #[case("Birch", Species::Birch)]
    #[case("Fir", Species::Fir)]
    #[case(" fir ", Species::Fir)]
    #[case("MAPLE", Species::Maple)]
    #[case("Oak", Species::Unknown)]
    #[case("", Species::Unknown)]
    fn given_record_name_when_from_name_then_maps_species(
        #[case] name: &str,
        #[case] expected: Species,
    ) {
        assert_eq!(Species::from_name(name), expected);
    }

    #[test]
    fn given_tree_when_displayed_then_uses_fixed_columns() {
        let tree = Tree::new(Species::Fir, 2019, 9.5, 12.346);
        assert_eq!(tree.to_string(), "FIR   2019   9.50' 12.35%");

        let tree = Tree::new(Species::Maple, 2000, 123.456, 5.0);
        assert_eq!(tree.to_string(), "MAPLE 2000  123.46'  5.00%");
    }

    #[test]
    fn given_unknown_species_when_displayed_then_label_overflows_width() {
        let tree = Tree::new(Species::Unknown, 1999, 10.0, 10.0);
        assert_eq!(tree.to_string(), "UNKNOWN 1999  10.00' 10.00%");
    }
}
