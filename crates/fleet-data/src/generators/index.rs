//! Id lookup over generated parent rows.

use std::collections::HashMap;

use rand::Rng;

use crate::errors::GenerationError;

/// A generated row addressable by its surrogate id.
pub trait Keyed {
    const TABLE: &'static str;

    fn id(&self) -> i32;
}

/// Maps ids to rows so child generators resolve attributes without scans.
///
/// Ids must be dense from 1, which lets [`IdIndex::sample_id`] draw a uniform
/// integer instead of picking from a list.
#[derive(Debug)]
pub struct IdIndex<'a, T> {
    rows: &'a [T],
    positions: HashMap<i32, usize>,
}

impl<'a, T: Keyed> IdIndex<'a, T> {
    pub fn build(rows: &'a [T]) -> Result<Self, GenerationError> {
        let mut positions = HashMap::with_capacity(rows.len());
        for (position, row) in rows.iter().enumerate() {
            let expected = position as i32 + 1;
            if row.id() != expected {
                return Err(GenerationError::NonDenseIds {
                    table: T::TABLE,
                    expected,
                    found: row.id(),
                });
            }
            positions.insert(row.id(), position);
        }
        Ok(Self { rows, positions })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: i32) -> Result<&'a T, GenerationError> {
        self.positions
            .get(&id)
            .map(|p| &self.rows[*p])
            .ok_or(GenerationError::UnknownReference {
                table: T::TABLE,
                id,
            })
    }

    /// Draws an id uniformly from `1..=len`.
    pub fn sample_id(&self, rng: &mut impl Rng) -> Result<i32, GenerationError> {
        if self.rows.is_empty() {
            return Err(GenerationError::InvalidConfig(format!(
                "cannot reference an empty {} table",
                T::TABLE
            )));
        }
        Ok(rng.gen_range(1..=self.rows.len() as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Row(i32);

    impl Keyed for Row {
        const TABLE: &'static str = "rows";

        fn id(&self) -> i32 {
            self.0
        }
    }

    #[test]
    fn test_lookup() {
        let rows = vec![Row(1), Row(2), Row(3)];
        let index = IdIndex::build(&rows).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.get(2).unwrap().0, 2);
        assert!(matches!(
            index.get(4),
            Err(GenerationError::UnknownReference { table: "rows", id: 4 })
        ));
    }

    #[test]
    fn test_rejects_gaps() {
        let rows = vec![Row(1), Row(3)];
        assert!(matches!(
            IdIndex::build(&rows),
            Err(GenerationError::NonDenseIds {
                expected: 2,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_sample_id_covers_range() {
        let rows: Vec<Row> = (1..=5).map(Row).collect();
        let index = IdIndex::build(&rows).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let mut seen = [false; 5];
        for _ in 0..200 {
            let id = index.sample_id(&mut rng).unwrap();
            seen[(id - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));

        let empty: Vec<Row> = Vec::new();
        let index = IdIndex::build(&empty).unwrap();
        assert!(index.sample_id(&mut rng).is_err());
    }
}
