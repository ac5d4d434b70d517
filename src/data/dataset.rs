use rand::Rng;

use crate::error::{NetError, Result};

/// Fixed-size flat storage of input/ideal records.
///
/// Each record is `input_count` input values immediately followed by
/// `ideal_count` ideal values. Accessors hand out slices into the backing
/// buffer, never copies.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    input_count: usize,
    ideal_count: usize,
    data: Vec<f64>,
}

impl Dataset {
    /// Creates `record_count` zero-filled records.
    pub fn new(input_count: usize, ideal_count: usize, record_count: usize) -> Result<Dataset> {
        check_shape(input_count, ideal_count)?;
        Ok(Dataset {
            input_count,
            ideal_count,
            data: vec![0.0; record_count * (input_count + ideal_count)],
        })
    }

    /// Wraps an already flattened buffer.
    pub fn from_flat(input_count: usize, ideal_count: usize, data: Vec<f64>) -> Result<Dataset> {
        check_shape(input_count, ideal_count)?;
        let width = input_count + ideal_count;
        if data.len() % width != 0 {
            return Err(NetError::Dataset(format!(
                "{} values do not divide into records of {} values",
                data.len(),
                width
            )));
        }
        Ok(Dataset { input_count, ideal_count, data })
    }

    /// Builds a dataset from parallel input and ideal rows.
    pub fn from_rows(inputs: &[Vec<f64>], ideals: &[Vec<f64>]) -> Result<Dataset> {
        if inputs.len() != ideals.len() {
            return Err(NetError::Dataset(format!(
                "{} input rows but {} ideal rows",
                inputs.len(),
                ideals.len()
            )));
        }
        let (input_count, ideal_count) = match (inputs.first(), ideals.first()) {
            (Some(i), Some(o)) => (i.len(), o.len()),
            _ => return Err(NetError::Dataset("no rows given".into())),
        };
        check_shape(input_count, ideal_count)?;

        let mut data = Vec::with_capacity(inputs.len() * (input_count + ideal_count));
        for (row, (input, ideal)) in inputs.iter().zip(ideals).enumerate() {
            if input.len() != input_count || ideal.len() != ideal_count {
                return Err(NetError::Dataset(format!(
                    "row {} has {}/{} values, expected {}/{}",
                    row,
                    input.len(),
                    ideal.len(),
                    input_count,
                    ideal_count
                )));
            }
            data.extend_from_slice(input);
            data.extend_from_slice(ideal);
        }
        Ok(Dataset { input_count, ideal_count, data })
    }

    /// Builds a dataset from text rows such as `"0,1,  1"`, each holding
    /// the inputs followed by the ideals.
    pub fn from_text_rows(input_count: usize, ideal_count: usize, rows: &[&str]) -> Result<Dataset> {
        let mut dataset = Dataset::new(input_count, ideal_count, rows.len())?;
        for (index, row) in rows.iter().enumerate() {
            let values = Dataset::parse_row(row)?;
            dataset.set_record(index, &values)?;
        }
        Ok(dataset)
    }

    /// Parses one comma-separated record.
    pub fn parse_row(row: &str) -> Result<Vec<f64>> {
        row.split(',')
            .map(|cell| {
                let cell = cell.trim();
                cell.parse::<f64>()
                    .map_err(|_| NetError::Dataset(format!("'{}' is not a valid number", cell)))
            })
            .collect()
    }

    /// `record_count` records with every value drawn uniformly in `[low, high]`.
    pub fn generate_random<R: Rng + ?Sized>(
        input_count: usize,
        ideal_count: usize,
        record_count: usize,
        low: f64,
        high: f64,
        rng: &mut R,
    ) -> Result<Dataset> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(NetError::InvalidRange { low, high });
        }
        let mut dataset = Dataset::new(input_count, ideal_count, record_count)?;
        for value in dataset.data.iter_mut() {
            *value = rng.gen_range(low..=high);
        }
        Ok(dataset)
    }

    /// Overwrites record `index` with `values` (inputs then ideals).
    pub fn set_record(&mut self, index: usize, values: &[f64]) -> Result<()> {
        let width = self.record_width();
        if values.len() != width {
            return Err(NetError::Dataset(format!(
                "record has {} values, expected {}",
                values.len(),
                width
            )));
        }
        if index >= self.record_count() {
            return Err(NetError::Dataset(format!(
                "record {} is out of range ({} records)",
                index,
                self.record_count()
            )));
        }
        self.data[index * width..(index + 1) * width].copy_from_slice(values);
        Ok(())
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn ideal_count(&self) -> usize {
        self.ideal_count
    }

    pub fn record_width(&self) -> usize {
        self.input_count + self.ideal_count
    }

    pub fn record_count(&self) -> usize {
        self.data.len() / self.record_width()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Input segment of record `index`. Panics if out of range.
    pub fn input(&self, index: usize) -> &[f64] {
        let start = index * self.record_width();
        &self.data[start..start + self.input_count]
    }

    /// Ideal segment of record `index`. Panics if out of range.
    pub fn ideal(&self, index: usize) -> &[f64] {
        let start = index * self.record_width() + self.input_count;
        &self.data[start..start + self.ideal_count]
    }

    pub fn input_mut(&mut self, index: usize) -> &mut [f64] {
        let start = index * self.record_width();
        &mut self.data[start..start + self.input_count]
    }

    pub fn ideal_mut(&mut self, index: usize) -> &mut [f64] {
        let start = index * self.record_width() + self.input_count;
        &mut self.data[start..start + self.ideal_count]
    }

    /// Iterates `(input, ideal)` views in record order.
    pub fn iter(&self) -> impl Iterator<Item = (&[f64], &[f64])> + '_ {
        self.data
            .chunks_exact(self.record_width())
            .map(move |record| record.split_at(self.input_count))
    }

    /// The whole backing buffer.
    pub fn as_flat(&self) -> &[f64] {
        &self.data
    }
}

fn check_shape(input_count: usize, ideal_count: usize) -> Result<()> {
    if input_count == 0 || ideal_count == 0 {
        return Err(NetError::Dataset(format!(
            "input count ({}) and ideal count ({}) must both be at least 1",
            input_count, ideal_count
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn xor() -> Dataset {
        Dataset::from_text_rows(2, 1, &["0,0,  0", "1,0,  1", "0,1,  1", "1,1,  0"]).unwrap()
    }

    #[test]
    fn views_point_at_the_right_segments() {
        let data = xor();
        assert_eq!(data.record_count(), 4);
        assert_eq!(data.input(1), &[1.0, 0.0]);
        assert_eq!(data.ideal(1), &[1.0]);
        assert_eq!(data.input(3), &[1.0, 1.0]);
        assert_eq!(data.ideal(3), &[0.0]);
        let pairs: Vec<_> = data.iter().collect();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[2], (&[0.0, 1.0][..], &[1.0][..]));
    }

    #[test]
    fn mutable_views_write_through() {
        let mut data = xor();
        data.ideal_mut(0)[0] = 0.25;
        data.input_mut(0)[1] = -1.0;
        assert_eq!(data.ideal(0), &[0.25]);
        assert_eq!(data.input(0), &[0.0, -1.0]);
    }

    #[test]
    fn shape_errors_are_reported() {
        assert!(Dataset::new(0, 1, 4).is_err());
        assert!(Dataset::from_flat(2, 1, vec![0.0; 7]).is_err());
        assert!(Dataset::from_rows(&[vec![1.0, 2.0]], &[vec![1.0], vec![0.0]]).is_err());
        assert!(Dataset::from_rows(&[vec![1.0, 2.0], vec![1.0]], &[vec![1.0], vec![0.0]]).is_err());
        assert!(Dataset::from_text_rows(2, 1, &["0,1"]).is_err());
        assert!(Dataset::from_text_rows(2, 1, &["0,x,1"]).is_err());
    }

    #[test]
    fn from_rows_matches_text_rows() {
        let rows = Dataset::from_rows(
            &[vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]],
            &[vec![0.0], vec![1.0], vec![1.0], vec![0.0]],
        )
        .unwrap();
        assert_eq!(rows, xor());
    }

    #[test]
    fn random_data_is_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let data = Dataset::generate_random(10, 1, 50, -1.0, 1.0, &mut rng).unwrap();
        assert_eq!(data.record_count(), 50);
        assert!(data.as_flat().iter().all(|x| (-1.0..=1.0).contains(x)));
    }
}
