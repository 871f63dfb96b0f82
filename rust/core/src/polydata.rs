// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory polygonal mesh attributes for the pipeline tests
//!
//! A [`MeshData`] implementation carrying only what the viewer reads from a
//! mesh: named point and cell arrays and their ranges.

use crate::backend::{DataArray, DataRange, MeshData};
use crate::controls::{ComponentSelection, FieldLocation};
use crate::error::{Error, Result};

/// Named attribute array with interleaved tuples
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeArray {
    name: String,
    components: usize,
    values: Vec<f64>,
}

impl AttributeArray {
    /// # Panics
    /// Panics if `components` is zero.
    pub fn new(name: impl Into<String>, components: usize, values: Vec<f64>) -> Self {
        assert!(components > 0, "attribute arrays need at least one component");
        Self {
            name: name.into(),
            components,
            values,
        }
    }

    /// Single-component array
    pub fn scalars(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, 1, values)
    }

    pub fn number_of_tuples(&self) -> usize {
        self.values.len() / self.components
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    fn tuples(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.components)
    }
}

impl DataArray for AttributeArray {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn number_of_components(&self) -> usize {
        self.components
    }

    fn range(&self, component: ComponentSelection) -> DataRange {
        let range = match component {
            ComponentSelection::Magnitude if self.components > 1 => DataRange::of(
                self.tuples()
                    .map(|t| t.iter().map(|v| v * v).sum::<f64>().sqrt()),
            ),
            ComponentSelection::Magnitude => DataRange::of(self.values.iter().copied()),
            ComponentSelection::Component(index) if index < self.components => {
                DataRange::of(self.tuples().map(|t| t[index]))
            }
            ComponentSelection::Component(_) => None,
        };
        range.unwrap_or_default()
    }
}

/// Arrays attached to one location of the mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSet {
    arrays: Vec<AttributeArray>,
    scalars: Option<usize>,
}

impl AttributeSet {
    pub fn arrays(&self) -> &[AttributeArray] {
        &self.arrays
    }

    pub fn get(&self, name: &str) -> Option<&AttributeArray> {
        self.arrays.iter().find(|a| a.name == name)
    }

    pub fn scalars(&self) -> Option<&AttributeArray> {
        self.scalars.map(|i| &self.arrays[i])
    }
}

/// Polygonal mesh attributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyData {
    number_of_points: usize,
    number_of_cells: usize,
    point_data: AttributeSet,
    cell_data: AttributeSet,
}

impl PolyData {
    pub fn new(number_of_points: usize, number_of_cells: usize) -> Self {
        Self {
            number_of_points,
            number_of_cells,
            ..Self::default()
        }
    }

    pub fn number_of_points(&self) -> usize {
        self.number_of_points
    }

    pub fn number_of_cells(&self) -> usize {
        self.number_of_cells
    }

    pub fn attributes(&self, location: FieldLocation) -> &AttributeSet {
        match location {
            FieldLocation::PointData => &self.point_data,
            FieldLocation::CellData => &self.cell_data,
        }
    }

    /// Add an array; its tuple count must match the location's size.
    pub fn add_array(&mut self, location: FieldLocation, array: AttributeArray) -> Result<()> {
        let tuples = match location {
            FieldLocation::PointData => self.number_of_points,
            FieldLocation::CellData => self.number_of_cells,
        };
        let expected = tuples * array.components;
        if array.values.len() != expected {
            return Err(Error::ArrayLength {
                name: array.name,
                expected,
                actual: array.values.len(),
            });
        }

        let set = match location {
            FieldLocation::PointData => &mut self.point_data,
            FieldLocation::CellData => &mut self.cell_data,
        };
        match set.arrays.iter().position(|a| a.name == array.name) {
            Some(index) => set.arrays[index] = array,
            None => set.arrays.push(array),
        }
        Ok(())
    }

    /// Designate an existing point array as the default scalars.
    pub fn set_point_scalars(&mut self, name: &str) -> bool {
        match self.point_data.arrays.iter().position(|a| a.name == name) {
            Some(index) => {
                self.point_data.scalars = Some(index);
                true
            }
            None => false,
        }
    }
}

impl MeshData for PolyData {
    type Array = AttributeArray;

    fn arrays(&self, location: FieldLocation) -> Vec<AttributeArray> {
        self.attributes(location).arrays.clone()
    }

    fn array_by_name(&self, location: FieldLocation, name: &str) -> Option<AttributeArray> {
        self.attributes(location).get(name).cloned()
    }

    fn point_scalars(&self) -> Option<AttributeArray> {
        self.point_data.scalars().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scalar_range() {
        let array = AttributeArray::scalars("T", vec![10.0, 50.0, 30.0]);
        let range = array.range(ComponentSelection::Magnitude);
        assert_relative_eq!(range.min, 10.0);
        assert_relative_eq!(range.max, 50.0);
        assert_eq!(array.range(ComponentSelection::Component(0)), range);
    }

    #[test]
    fn test_vector_component_and_magnitude_ranges() {
        let array = AttributeArray::new("V", 2, vec![3.0, 4.0, 0.0, -1.0, 6.0, 8.0]);
        assert_eq!(array.number_of_tuples(), 3);

        let magnitude = array.range(ComponentSelection::Magnitude);
        assert_relative_eq!(magnitude.min, 1.0);
        assert_relative_eq!(magnitude.max, 10.0);

        let y = array.range(ComponentSelection::Component(1));
        assert_relative_eq!(y.min, -1.0);
        assert_relative_eq!(y.max, 8.0);

        // out-of-range component falls back to the default interval
        assert_eq!(array.range(ComponentSelection::Component(5)), DataRange::default());
    }

    #[test]
    fn test_add_array_checks_tuple_count() {
        let mut mesh = PolyData::new(3, 1);
        mesh.add_array(FieldLocation::PointData, AttributeArray::scalars("T", vec![1.0, 2.0, 3.0]))
            .unwrap();
        let err = mesh
            .add_array(FieldLocation::CellData, AttributeArray::new("V", 3, vec![1.0, 2.0]))
            .unwrap_err();
        assert!(matches!(err, Error::ArrayLength { expected: 3, actual: 2, .. }));
    }

    #[test]
    fn test_point_scalars_designation() {
        let mut mesh = PolyData::new(2, 0);
        mesh.add_array(FieldLocation::PointData, AttributeArray::scalars("T", vec![1.0, 2.0]))
            .unwrap();
        assert!(mesh.point_scalars().is_none());
        assert!(mesh.set_point_scalars("T"));
        assert!(!mesh.set_point_scalars("missing"));
        assert_eq!(mesh.point_scalars().map(|a| a.name()), Some("T".to_string()));
        assert_eq!(mesh.arrays(FieldLocation::PointData).len(), 1);
        assert!(mesh.array_by_name(FieldLocation::CellData, "T").is_none());
    }
}
