use simlens_core::{DataObject, ParameterState, ParameterValue};

/// Object with one normalized numeric value per coordinate
pub fn point(id: u64, coords: &[f64]) -> DataObject {
    let values = coords
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let param = ParameterState::numeric(i as u64 + 1, format!("x{}", i));
            ParameterValue::numeric(id * 100 + i as u64, param, x)
        })
        .collect();
    DataObject::new(id, format!("p{}", id), values)
}

/// Object with numeric coordinates followed by a one-hot categorical value
pub fn mixed(id: u64, coords: &[f64], one_hot: Vec<u8>) -> DataObject {
    let mut object = point(id, coords);
    let param = ParameterState::categorical(99, "category");
    if let Some(values) = object.values.as_mut() {
        values.push(ParameterValue::categorical(id * 100 + 99, param, one_hot));
    }
    object
}
