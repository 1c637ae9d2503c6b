//! インデックスによる部分データセットとランダム分割

use std::sync::Arc;

use burn::data::dataset::Dataset;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{DatasetError, Result};

/// 共有データセットをインデックス列で参照する部分データセット
pub struct SubsetDataset<D> {
    dataset: Arc<D>,
    indices: Vec<usize>,
}

impl<D> std::fmt::Debug for SubsetDataset<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubsetDataset")
            .field("indices", &self.indices)
            .finish_non_exhaustive()
    }
}

impl<D> Clone for SubsetDataset<D> {
    fn clone(&self) -> Self {
        Self {
            dataset: Arc::clone(&self.dataset),
            indices: self.indices.clone(),
        }
    }
}

impl<D> SubsetDataset<D> {
    /// 元データセットの範囲外を指すインデックスがあれば [`DatasetError::IndexOutOfRange`]
    pub fn new<I>(dataset: Arc<D>, indices: Vec<usize>) -> Result<Self>
    where
        D: Dataset<I>,
    {
        let len = <D as Dataset<I>>::len(&dataset);
        if let Some(&index) = indices.iter().find(|&&index| index >= len) {
            return Err(DatasetError::IndexOutOfRange { index, len });
        }
        Ok(Self { dataset, indices })
    }

    /// 元データセットでのインデックス
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// データセットを重複なしにランダム分割
///
/// `lengths` の合計はデータセット長と一致する必要がある。
/// 同じ `seed` なら同じ分割になる。
pub fn random_split<D, I>(
    dataset: Arc<D>,
    lengths: &[usize],
    seed: u64,
) -> Result<Vec<SubsetDataset<D>>>
where
    D: Dataset<I>,
{
    let dataset_len = <D as Dataset<I>>::len(&dataset);
    let total: usize = lengths.iter().sum();
    if total != dataset_len {
        return Err(DatasetError::SplitLengths {
            total,
            len: dataset_len,
        });
    }

    let mut indices: Vec<usize> = (0..dataset_len).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    // 順列の区間なので範囲チェックは不要
    let mut subsets = Vec::with_capacity(lengths.len());
    let mut offset = 0;
    for &length in lengths {
        subsets.push(SubsetDataset {
            dataset: Arc::clone(&dataset),
            indices: indices[offset..offset + length].to_vec(),
        });
        offset += length;
    }

    Ok(subsets)
}

impl<D, I> Dataset<I> for SubsetDataset<D>
where
    D: Dataset<I>,
{
    fn get(&self, index: usize) -> Option<I> {
        let actual_index = *self.indices.get(index)?;
        self.dataset.get(actual_index)
    }

    fn len(&self) -> usize {
        self.indices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::data::dataset::InMemDataset;

    fn source(len: i32) -> Arc<InMemDataset<i32>> {
        Arc::new(InMemDataset::new((0..len).collect()))
    }

    #[test]
    fn test_split_sizes_and_disjoint() {
        let subsets = random_split(source(10), &[8, 2], 0).unwrap();
        assert_eq!(subsets[0].len(), 8);
        assert_eq!(subsets[1].len(), 2);

        let mut all: Vec<usize> = subsets
            .iter()
            .flat_map(|s| s.indices().iter().copied())
            .collect();
        all.sort();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_deterministic() {
        let source = source(50);
        let a = random_split(Arc::clone(&source), &[40, 10], 7).unwrap();
        let b = random_split(Arc::clone(&source), &[40, 10], 7).unwrap();
        let c = random_split(source, &[40, 10], 8).unwrap();
        assert_eq!(a[0].indices(), b[0].indices());
        assert_ne!(a[0].indices(), c[0].indices());
    }

    #[test]
    fn test_split_lengths_mismatch() {
        let err = random_split(source(10), &[8, 1], 0).unwrap_err();
        assert!(matches!(err, DatasetError::SplitLengths { total: 9, len: 10 }));
    }

    #[test]
    fn test_split_lengths_follow_dataset() {
        // 長さはデータセット自身から取るので、合計が超過しても分割されない
        let err = random_split(source(3), &[3, 1], 0).unwrap_err();
        assert!(matches!(err, DatasetError::SplitLengths { total: 4, len: 3 }));
    }

    #[test]
    fn test_split_empty() {
        let subsets = random_split(source(0), &[0, 0], 0).unwrap();
        assert!(subsets.iter().all(SubsetDataset::is_empty));
    }

    #[test]
    fn test_split_items_come_from_source() {
        let subsets = random_split(source(6), &[4, 2], 3).unwrap();
        for subset in &subsets {
            for (i, &index) in subset.indices().iter().enumerate() {
                assert_eq!(subset.get(i), Some(index as i32));
            }
        }
    }

    #[test]
    fn test_subset_dataset_get() {
        let subset = SubsetDataset::new(source(6), vec![4, 1]).unwrap();
        assert_eq!(Dataset::len(&subset), 2);
        assert_eq!(subset.get(0), Some(4));
        assert_eq!(subset.get(1), Some(1));
        assert_eq!(subset.get(2), None);
    }

    #[test]
    fn test_subset_rejects_out_of_range_index() {
        let err = SubsetDataset::new(source(3), vec![0, 3]).unwrap_err();
        assert!(matches!(err, DatasetError::IndexOutOfRange { index: 3, len: 3 }));
    }
}
