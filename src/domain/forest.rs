//! Forest: an owned, ordered collection of trees
//!
//! Position in the collection is the tree number shown in reports and used
//! when cutting. Tree numbers shift down after a cut; reaping keeps them.

use std::fmt;

use rand::Rng;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::tree::Tree;

/// Name shown in reports for a forest that has none.
pub const UNNAMED: &str = "(unnamed)";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Forest {
    name: Option<String>,
    trees: Vec<Tree>,
}

/// One replacement made by [`Forest::reap`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReapEvent {
    /// Tree number of the replaced tree (unchanged by the reap)
    pub index: usize,
    pub reaped: Tree,
    pub replacement: Tree,
}

impl Forest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            trees: Vec::new(),
        }
    }

    /// Build a forest from an existing tree sequence, keeping its order.
    pub fn with_trees(name: Option<String>, trees: Vec<Tree>) -> Self {
        Self { name, trees }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tree> {
        self.trees.get(index)
    }

    pub fn add_tree(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    /// Append a random tree drawn from the thread-local generator.
    pub fn add_random_tree(&mut self) {
        self.add_random_tree_with(&mut rand::thread_rng());
    }

    pub fn add_random_tree_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let tree = Tree::random(rng);
        debug!("add_random_tree: {}", tree);
        self.trees.push(tree);
    }

    /// Remove and return the tree at `index`.
    ///
    /// Out-of-range indices, negative ones included, leave the forest
    /// unchanged and return [`DomainError::TreeNotFound`].
    pub fn cut_tree(&mut self, index: i64) -> Result<Tree, DomainError> {
        let position = usize::try_from(index)
            .ok()
            .filter(|&i| i < self.trees.len())
            .ok_or(DomainError::TreeNotFound(index))?;
        debug!("cut_tree: index={}", position);
        Ok(self.trees.remove(position))
    }

    pub fn simulate_yearly_growth(&mut self) {
        self.trees.iter_mut().for_each(Tree::grow);
    }

    /// Replace every tree taller than `threshold` with a random tree.
    pub fn reap(&mut self, threshold: f64) -> Vec<ReapEvent> {
        self.reap_with(threshold, &mut rand::thread_rng())
    }

    /// Replace every tree taller than `threshold` with a tree drawn from `rng`.
    ///
    /// Qualifying positions are fixed before any replacement, so every tree
    /// over the threshold at the start of the pass is replaced exactly once,
    /// in place, and replacements are not re-examined.
    pub fn reap_with<R: Rng + ?Sized>(&mut self, threshold: f64, rng: &mut R) -> Vec<ReapEvent> {
        let tall: Vec<usize> = self
            .trees
            .iter()
            .enumerate()
            .filter(|(_, tree)| tree.height > threshold)
            .map(|(index, _)| index)
            .collect();
        debug!("reap: threshold={} qualifying={}", threshold, tall.len());

        tall.into_iter()
            .map(|index| {
                let replacement = Tree::random(&mut *rng);
                let reaped = std::mem::replace(&mut self.trees[index], replacement.clone());
                ReapEvent {
                    index,
                    reaped,
                    replacement,
                }
            })
            .collect()
    }

    /// Mean height, or 0 for an empty forest.
    pub fn calculate_average_height(&self) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: f64 = self.trees.iter().map(|t| t.height).sum();
        total / self.trees.len() as f64
    }
}

impl fmt::Display for Forest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Forest name: {}", self.name().unwrap_or(UNNAMED))?;
        for (index, tree) in self.trees.iter().enumerate() {
            writeln!(f, "{:>4} {}", index, tree)?;
        }
        writeln!(
            f,
            "There are {} trees, with an average height of {:.2}",
            self.trees.len(),
            self.calculate_average_height()
        )?;
        writeln!(f)
    }
}

fn write_reap_line(f: &mut fmt::Formatter<'_>, label: &str, tree: &Tree) -> fmt::Result {
    write!(
        f,
        "{} {:<7} {:>5}  {:>6.2}'  {:>4.1}%",
        label, tree.species, tree.year_planting, tree.height, tree.growth_rate
    )
}

impl fmt::Display for ReapEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_reap_line(f, "Reaping the tall tree ", &self.reaped)?;
        writeln!(f)?;
        write_reap_line(f, "Replaced with new tree", &self.replacement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tree::{Species, MAX_HEIGHT, MIN_HEIGHT};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    fn tree(height: f64) -> Tree {
        Tree::new(Species::Maple, 2010, height, 10.0)
    }

    fn forest_of(heights: &[f64]) -> Forest {
        let mut forest = Forest::new("test");
        for &h in heights {
            forest.add_tree(tree(h));
        }
        forest
    }

    #[test]
    fn given_empty_forest_when_average_then_zero() {
        assert_eq!(Forest::new("empty").calculate_average_height(), 0.0);
        assert_eq!(Forest::default().calculate_average_height(), 0.0);
    }

    #[test]
    fn given_trees_when_average_then_arithmetic_mean() {
        let forest = forest_of(&[10.0, 20.0, 33.0]);
        assert!((forest.calculate_average_height() - 21.0).abs() < 1e-9);
    }

    #[test]
    fn given_explicit_tree_when_added_then_kept_unchanged_at_end() {
        let mut forest = forest_of(&[11.0]);
        let birch = Tree::new(Species::Birch, 2003, 17.5, 12.5);
        forest.add_tree(birch.clone());
        assert_eq!(forest.len(), 2);
        assert_eq!(forest.get(1), Some(&birch));
    }

    #[test]
    fn given_forest_when_add_random_tree_then_appends_plantable_tree() {
        let mut forest = forest_of(&[11.0]);
        let mut rng = StdRng::seed_from_u64(1);
        forest.add_random_tree_with(&mut rng);
        forest.add_random_tree();
        assert_eq!(forest.len(), 3);
        assert_eq!(forest.trees()[0], tree(11.0));
        for added in &forest.trees()[1..] {
            assert_ne!(added.species, Species::Unknown);
        }
    }

    #[test]
    fn given_valid_index_when_cut_then_removes_exactly_that_tree() {
        let mut forest = forest_of(&[10.0, 11.0, 12.0, 13.0]);
        let cut = forest.cut_tree(1).unwrap();
        assert_eq!(cut.height, 11.0);
        let heights: Vec<f64> = forest.trees().iter().map(|t| t.height).collect();
        assert_eq!(heights, vec![10.0, 12.0, 13.0]);
    }

    #[rstest]
    #[case(-1)]
    #[case(3)]
    #[case(100)]
    #[case(i64::MIN)]
    fn given_out_of_range_index_when_cut_then_unchanged_and_reported(#[case] index: i64) {
        let mut forest = forest_of(&[10.0, 11.0, 12.0]);
        let before = forest.clone();
        let err = forest.cut_tree(index).unwrap_err();
        assert_eq!(err, DomainError::TreeNotFound(index));
        assert_eq!(err.to_string(), format!("Tree number {} does not exist", index));
        assert_eq!(forest, before);
    }

    #[test]
    fn given_forest_when_simulate_growth_then_every_tree_grows() {
        let mut forest = forest_of(&[10.0, 20.0]);
        forest.simulate_yearly_growth();
        let heights: Vec<f64> = forest.trees().iter().map(|t| t.height).collect();
        assert!((heights[0] - 11.0).abs() < 1e-9);
        assert!((heights[1] - 22.0).abs() < 1e-9);
    }

    #[test]
    fn given_mixed_heights_when_reap_then_tall_trees_replaced_in_place() {
        let mut forest = forest_of(&[25.0, 5.0, 30.0]);
        let mut rng = StdRng::seed_from_u64(42);

        let events = forest.reap_with(20.0, &mut rng);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].index, 0);
        assert_eq!(events[0].reaped.height, 25.0);
        assert_eq!(events[1].index, 2);
        assert_eq!(events[1].reaped.height, 30.0);

        assert_eq!(forest.len(), 3);
        assert_eq!(forest.trees()[1], tree(5.0));
        for event in &events {
            let now = &forest.trees()[event.index];
            assert_eq!(now, &event.replacement);
            assert!(now.height >= MIN_HEIGHT && now.height < MAX_HEIGHT);
        }
        assert_ne!(forest.trees()[0].height, 25.0);
        assert_ne!(forest.trees()[2].height, 30.0);
    }

    #[test]
    fn given_adjacent_tall_trees_when_reap_then_all_replaced_in_one_pass() {
        let mut forest = forest_of(&[50.0, 60.0, 70.0, 1.0]);
        let events = forest.reap(40.0);
        let indices: Vec<usize> = events.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(forest.trees()[..3].iter().all(|t| t.height < MAX_HEIGHT));
        assert_eq!(forest.trees()[3].height, 1.0);
    }

    #[test]
    fn given_low_threshold_when_reap_then_replacements_not_reexamined() {
        // every replacement is also above the threshold
        let mut forest = forest_of(&[5.0, 6.0]);
        let events = forest.reap(0.0);
        assert_eq!(events.len(), 2);
        assert_eq!(forest.len(), 2);
    }

    #[test]
    fn given_threshold_equal_to_height_when_reap_then_tree_kept() {
        let mut forest = forest_of(&[20.0]);
        assert!(forest.reap(20.0).is_empty());
        assert_eq!(forest.trees()[0], tree(20.0));
    }

    #[test]
    fn given_forest_when_displayed_then_lists_trees_and_summary() {
        let mut forest = Forest::new("Montane");
        forest.add_tree(Tree::new(Species::Maple, 2010, 12.0, 15.0));
        forest.add_tree(Tree::new(Species::Fir, 2020, 18.5, 10.25));

        let expected = "\nForest name: Montane\n\
                        \x20  0 MAPLE 2010  12.00' 15.00%\n\
                        \x20  1 FIR   2020  18.50' 10.25%\n\
                        There are 2 trees, with an average height of 15.25\n\n";
        assert_eq!(forest.to_string(), expected);
    }

    #[test]
    fn given_anonymous_empty_forest_when_displayed_then_zero_summary() {
        let expected = "\nForest name: (unnamed)\n\
                        There are 0 trees, with an average height of 0.00\n\n";
        assert_eq!(Forest::default().to_string(), expected);
    }

    #[test]
    fn given_reap_event_when_displayed_then_two_report_lines() {
        let event = ReapEvent {
            index: 0,
            reaped: Tree::new(Species::Birch, 2005, 25.0, 12.0),
            replacement: Tree::new(Species::Fir, 2021, 13.5, 17.3),
        };
        assert_eq!(
            event.to_string(),
            "Reaping the tall tree  BIRCH    2005   25.00'  12.0%\n\
             Replaced with new tree FIR      2021   13.50'  17.3%"
        );
    }
}
