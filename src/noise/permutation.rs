//! Seeded lattice permutation table shared by the Perlin and Simplex evaluators.

use rand::Rng;

/// Ken Perlin's reference permutation of 0..=255.
pub const BASE_PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// Number of entries in a built table (base table duplicated once).
pub const TABLE_LEN: usize = 512;

/// Where the Fisher-Yates swap draw takes its upper bound from.
///
/// The elevation generator bounds each draw by the length of the table being
/// rebuilt at the moment of the shuffle; the noise field bounds it by the
/// length of the array being shuffled. Both are 256 while the table is reset
/// to the base permutation before shuffling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShuffleBound {
    /// Draw in `[0, destination.len())`.
    Destination,
    /// Draw in `[0, values.len())`.
    Input,
}

/// A 512-entry lattice hash table.
///
/// Entries `[0, 256)` are always a permutation of `0..=255`; entries
/// `[256, 512)` repeat them so neighbour lookups at `i + 1` never wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationTable {
    entries: Vec<u8>,
}

impl Default for PermutationTable {
    fn default() -> Self {
        Self::canonical()
    }
}

impl PermutationTable {
    /// The unshuffled reference table.
    pub fn canonical() -> Self {
        let mut table = Self {
            entries: Vec::with_capacity(TABLE_LEN),
        };
        table.reset();
        table
    }

    /// Builds a table shuffled from `rng`.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R, bound: ShuffleBound) -> Self {
        let mut table = Self::canonical();
        table.reshuffle(rng, bound);
        table
    }

    /// Restores the canonical unshuffled table. Consumes no randomness.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.entries.extend_from_slice(&BASE_PERMUTATION);
        self.entries.extend_from_slice(&BASE_PERMUTATION);
    }

    /// Rebuilds the table from a freshly shuffled copy of the base permutation.
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R, bound: ShuffleBound) {
        self.entries.clear();
        self.entries.extend_from_slice(&BASE_PERMUTATION);

        let mut values = BASE_PERMUTATION;
        let upper = match bound {
            ShuffleBound::Destination => self.entries.len(),
            ShuffleBound::Input => values.len(),
        };
        shuffle(&mut values, upper, rng);

        self.entries.clear();
        self.entries.extend_from_slice(&values);
        self.entries.extend_from_slice(&values);
    }

    /// Raw lookup. `index` must be below [`TABLE_LEN`].
    #[inline]
    pub fn get(&self, index: usize) -> usize {
        self.entries[index] as usize
    }

    /// Hash of an arbitrary lattice coordinate, wrapped to the low byte.
    #[inline]
    pub fn hash(&self, i: i32) -> i32 {
        self.entries[(i as u8) as usize] as i32
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.entries
    }
}

/// Swaps every slot `i` with a slot drawn uniformly from `[0, upper)`.
fn shuffle<R: Rng + ?Sized>(values: &mut [u8], upper: usize, rng: &mut R) {
    debug_assert!(upper > 0 && upper <= values.len());
    for i in 0..values.len() {
        let j = rng.gen_range(0..upper);
        values.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn is_permutation(slice: &[u8]) -> bool {
        let mut seen = [false; 256];
        for &v in slice {
            if seen[v as usize] {
                return false;
            }
            seen[v as usize] = true;
        }
        seen.iter().all(|&s| s)
    }

    #[test]
    fn test_canonical_table() {
        let table = PermutationTable::canonical();
        assert_eq!(table.len(), TABLE_LEN);
        assert_eq!(&table.as_slice()[..256], &BASE_PERMUTATION[..]);
        assert_eq!(&table.as_slice()[256..], &BASE_PERMUTATION[..]);
    }

    #[test]
    fn test_reset_restores_canonical() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut table = PermutationTable::shuffled(&mut rng, ShuffleBound::Input);
        assert_ne!(table, PermutationTable::canonical());
        table.reset();
        assert_eq!(table, PermutationTable::canonical());
    }

    const SEED_1234_PREFIX: [u8; 12] = [180, 59, 75, 122, 33, 13, 61, 51, 10, 178, 206, 152];

    #[test]
    fn test_destination_bound_shuffle() {
        let mut rng = ChaCha8Rng::seed_from_u64(1234);
        let table = PermutationTable::shuffled(&mut rng, ShuffleBound::Destination);
        assert_eq!(table.len(), TABLE_LEN);
        assert_eq!(&table.as_slice()[..12], &SEED_1234_PREFIX);
        assert_eq!(&table.as_slice()[256..268], &SEED_1234_PREFIX);
    }

    #[test]
    fn test_input_bound_shuffle() {
        // Both bounds are 256 once the destination is reset, so the same
        // stream yields the same table.
        let mut rng = ChaCha8Rng::seed_from_u64(1234);
        let table = PermutationTable::shuffled(&mut rng, ShuffleBound::Input);
        assert_eq!(&table.as_slice()[..12], &SEED_1234_PREFIX);
        assert!(is_permutation(&table.as_slice()[..256]));
    }

    #[test]
    fn test_shuffle_draws_below_upper() {
        let mut rng = ChaCha8Rng::seed_from_u64(1234);
        let mut values = BASE_PERMUTATION;
        shuffle(&mut values, 128, &mut rng);
        assert_eq!(values[..12], [85, 83, 154, 128, 214, 82, 223, 31, 124, 113, 67, 241]);
        assert!(is_permutation(&values));
    }

    #[test]
    fn test_hash_wraps_to_low_byte() {
        let table = PermutationTable::canonical();
        assert_eq!(table.hash(0), 151);
        assert_eq!(table.hash(256), 151);
        assert_eq!(table.hash(-1), 180);
    }

    proptest! {
        #[test]
        fn prop_shuffled_table_is_doubled_permutation(seed in any::<u64>()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let table = PermutationTable::shuffled(&mut rng, ShuffleBound::Input);
            prop_assert_eq!(table.len(), TABLE_LEN);
            prop_assert!(is_permutation(&table.as_slice()[..256]));
            prop_assert_eq!(&table.as_slice()[..256], &table.as_slice()[256..]);
        }
    }
}
