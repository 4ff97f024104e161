use super::store::{CandidateList, Category, ListStore};
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

quick_error! {
    #[derive(Debug, PartialEq, Eq)]
    pub enum PickError {
        EmptyList(category: Category) {
            display("no {} options configured", category.name())
        }
    }
}

/// Random suggestions over the lists loaded at startup.
///
/// Draws are independent: nothing is remembered between calls, so the same
/// entry may come up twice in a row.
#[derive(Clone, Debug, Default)]
pub struct Suggester {
    food: CandidateList,
    drink: CandidateList,
}

impl Suggester {
    pub fn new(food: CandidateList, drink: CandidateList) -> Suggester {
        Suggester { food, drink }
    }

    /// Seeds any missing backing files, then loads both lists.
    pub fn from_store(store: &ListStore) -> Suggester {
        let food = store.seed_and_load(Category::Food);
        let drink = store.seed_and_load(Category::Drink);
        Suggester::new(food, drink)
    }

    pub fn list(&self, category: Category) -> &[String] {
        match category {
            Category::Food => &self.food,
            Category::Drink => &self.drink,
        }
    }

    pub fn pick(&self, category: Category) -> Result<&str, PickError> {
        self.pick_with(category, &mut thread_rng())
    }

    pub fn pick_with<R: Rng + ?Sized>(
        &self,
        category: Category,
        rng: &mut R,
    ) -> Result<&str, PickError> {
        self.list(category)
            .choose(rng)
            .map(String::as_str)
            .ok_or(PickError::EmptyList(category))
    }

    pub fn pick_combo(&self) -> Result<(&str, &str), PickError> {
        self.pick_combo_with(&mut thread_rng())
    }

    pub fn pick_combo_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(&str, &str), PickError> {
        let food = self.pick_with(Category::Food, rng)?;
        let drink = self.pick_with(Category::Drink, rng)?;
        Ok((food, drink))
    }
}

#[cfg(test)]
mod test {
    use super::super::store::{to_list, DefaultSet, DEFAULT_FOOD};
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::fs;

    fn suggester(food: &[&str], drink: &[&str]) -> Suggester {
        Suggester::new(to_list(food), to_list(drink))
    }

    #[test]
    fn pick_returns_member() {
        let s = suggester(&["火锅", "烤肉", "寿司"], &["茶"]);
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let food = s.pick_with(Category::Food, &mut rng).unwrap();
            assert!(s.list(Category::Food).iter().any(|f| f == food));
        }
        let food = s.pick(Category::Food).unwrap();
        assert!(s.list(Category::Food).iter().any(|f| f == food));
    }

    #[test]
    fn pick_covers_whole_list() {
        let s = suggester(&["火锅", "烤肉", "寿司"], &["茶"]);
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<&str> = (0..300)
            .map(|_| s.pick_with(Category::Food, &mut rng).unwrap())
            .collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn unseeded_pick_returns_member() {
        let s = suggester(&["火锅", "烤肉", "寿司"], &["茶", "咖啡"]);
        for _ in 0..200 {
            let food = s.pick(Category::Food).unwrap();
            assert!(s.list(Category::Food).iter().any(|f| f == food));
            let (food, drink) = s.pick_combo().unwrap();
            assert!(s.list(Category::Food).iter().any(|f| f == food));
            assert!(s.list(Category::Drink).iter().any(|d| d == drink));
        }
    }

    #[test]
    fn pick_may_repeat() {
        let s = suggester(&["饺子"], &["可乐"]);
        assert_eq!(s.pick(Category::Food), Ok("饺子"));
        assert_eq!(s.pick(Category::Food), Ok("饺子"));
    }

    #[test]
    fn pick_from_empty_list_fails() {
        let s = suggester(&[], &["可乐"]);
        assert_eq!(
            s.pick(Category::Food),
            Err(PickError::EmptyList(Category::Food))
        );
        assert_eq!(s.pick(Category::Drink), Ok("可乐"));
    }

    #[test]
    fn combo_draws_one_of_each() {
        let s = suggester(&["披萨", "汉堡"], &["可乐", "果汁"]);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let (food, drink) = s.pick_combo_with(&mut rng).unwrap();
            assert!(food == "披萨" || food == "汉堡");
            assert!(drink == "可乐" || drink == "果汁");
        }
    }

    #[test]
    fn combo_fails_when_either_list_is_empty() {
        let no_drink = suggester(&["披萨"], &[]);
        assert_eq!(
            no_drink.pick_combo(),
            Err(PickError::EmptyList(Category::Drink))
        );
        let nothing = suggester(&[], &[]);
        assert_eq!(
            nothing.pick_combo(),
            Err(PickError::EmptyList(Category::Food))
        );
    }

    #[test]
    fn empty_file_disables_picks() {
        let dir = tempfile::tempdir().unwrap();
        let store = ListStore::new(dir.path(), dir.path().join("templates"), DefaultSet::default());
        fs::write(store.backing_path(Category::Food), b"").unwrap();

        let s = Suggester::from_store(&store);
        assert!(s.list(Category::Food).is_empty());
        assert_eq!(
            s.pick(Category::Food),
            Err(PickError::EmptyList(Category::Food))
        );
    }

    #[test]
    fn loads_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("drink.txt"), "奶茶\n\n咖啡\n").unwrap();
        let store = ListStore::new(dir.path().join("data"), &templates, DefaultSet::default());

        let s = Suggester::from_store(&store);
        assert_eq!(s.list(Category::Food), &to_list(DEFAULT_FOOD)[..]);
        assert_eq!(s.list(Category::Drink), &["奶茶", "咖啡"]);
    }
}
